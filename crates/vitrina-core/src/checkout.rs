//! # Checkout
//!
//! Checkout form validation and the order submission state machine.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Checkout States                                    │
//! │                                                                         │
//! │   ┌─────────────┐  begin_submit   ┌────────────┐  order_created         │
//! │   │ FillingForm │ ──────────────► │ Submitting │ ──────────────┐        │
//! │   └─────────────┘                 └────────────┘               │        │
//! │          ▲        submit_failed          │                     ▼        │
//! │          └───────────────────────────────┘            ┌──────────────┐  │
//! │                                                       │ OrderCreated │  │
//! │                                                       └──────┬───────┘  │
//! │                           continue_after_order               │          │
//! │                 ┌────────────────────────────────────────────┤          │
//! │                 │ payment enabled               no payment   │          │
//! │                 ▼                                            ▼          │
//! │   ┌───────────────────────┐   skip_payment         ┌───────────┐       │
//! │   │ AwaitingPaymentChoice │ ─────────────────────► │ Confirmed │       │
//! │   └───────────────────────┘                        └───────────┘       │
//! │                                                                         │
//! │   The cart is cleared only in Confirmed, never on order creation, so   │
//! │   the payment step can still reference the same order.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## User Workflow
//! ```text
//! checkout submit --name Ana --phone ... --email ana@x.com
//!      │
//!      ▼
//! CheckoutForm::validate() ── errors? ──► printed together, no request
//!      │ ok
//!      ▼
//! POST /public/order/:subdomain
//!      │
//!      ├── error ──► FillingForm { error: server message or generic }
//!      ▼
//! OrderCreated ──► AwaitingPaymentChoice (checkout pay | checkout skip)
//!              └─► Confirmed ──► cart cleared
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{major_units, Money};
use crate::types::{OrderCustomer, OrderLine};
use crate::validation::{validate_email, validate_name, validate_optional_text, validate_phone};
use crate::GENERIC_ORDER_FAILURE;

// =============================================================================
// Checkout Form
// =============================================================================

/// Customer data entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutForm {
    /// Validates every field and collects all failures.
    ///
    /// Name, phone and email are required; email must be `local@domain.tld`.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let checks = [
            validate_name("name", &self.name),
            validate_phone(&self.phone),
            validate_email(&self.email),
            validate_optional_text("address", self.address.as_deref()),
            validate_optional_text("notes", self.notes.as_deref()),
        ];

        let errors: Vec<ValidationError> = checks.into_iter().filter_map(Result::err).collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Trimmed customer block for the order request. Blank optional
    /// fields are dropped.
    pub fn to_customer(&self) -> OrderCustomer {
        let optional = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        OrderCustomer {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: optional(&self.address),
            notes: optional(&self.notes),
        }
    }
}

// =============================================================================
// Order Request
// =============================================================================

/// Body of `POST /public/order/:subdomain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer: OrderCustomer,
    pub items: Vec<OrderLine>,
    #[serde(with = "major_units")]
    pub subtotal: Money,
    #[serde(with = "major_units")]
    pub discount: Money,
    #[serde(with = "major_units")]
    pub total: Money,
}

impl CreateOrderRequest {
    /// Serializes the cart and the customer block.
    pub fn from_cart(form: &CheckoutForm, cart: &Cart) -> Self {
        CreateOrderRequest {
            customer: form.to_customer(),
            items: cart.order_lines(),
            subtotal: cart.subtotal(),
            discount: cart.total_discount(),
            total: cart.total_with_discount(),
        }
    }
}

// =============================================================================
// Checkout State
// =============================================================================

/// Where the customer is in the checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CheckoutState {
    /// Form is editable. `error` holds the last submission failure.
    FillingForm { error: Option<String> },

    /// The order request is in flight.
    Submitting,

    /// The backend accepted the order.
    OrderCreated { order_id: String },

    /// Payment is offered; the customer pays through `payment_url` or skips.
    AwaitingPaymentChoice {
        order_id: String,
        payment_url: Option<String>,
    },

    /// Terminal. The cart is cleared on entering this state.
    Confirmed { order_id: String },
}

impl CheckoutState {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::FillingForm { .. } => "filling-form",
            CheckoutState::Submitting => "submitting",
            CheckoutState::OrderCreated { .. } => "order-created",
            CheckoutState::AwaitingPaymentChoice { .. } => "awaiting-payment-choice",
            CheckoutState::Confirmed { .. } => "confirmed",
        }
    }

    /// Order id once the backend has created the order.
    pub fn order_id(&self) -> Option<&str> {
        match self {
            CheckoutState::OrderCreated { order_id }
            | CheckoutState::AwaitingPaymentChoice { order_id, .. }
            | CheckoutState::Confirmed { order_id } => Some(order_id),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Confirmed { .. })
    }
}

impl fmt::Display for CheckoutState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Checkout Flow
// =============================================================================

/// Drives [`CheckoutState`] transitions.
///
/// The flow owns no I/O: the caller performs the request between
/// [`begin_submit`](Self::begin_submit) and
/// [`order_created`](Self::order_created) / [`submit_failed`](Self::submit_failed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutFlow {
    state: CheckoutState,
    payment_enabled: bool,
}

impl CheckoutFlow {
    /// Starts a checkout with an empty, editable form.
    pub fn new(payment_enabled: bool) -> Self {
        CheckoutFlow {
            state: CheckoutState::FillingForm { error: None },
            payment_enabled,
        }
    }

    /// Continues a checkout persisted by an earlier invocation.
    pub fn resume(state: CheckoutState, payment_enabled: bool) -> Self {
        CheckoutFlow {
            state,
            payment_enabled,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn payment_enabled(&self) -> bool {
        self.payment_enabled
    }

    /// Validates the form and cart and moves to `Submitting`.
    ///
    /// ## Returns
    /// - `Ok(request)` to send to the backend
    /// - `Err(InvalidForm)` with every field error; state is unchanged
    /// - `Err(EmptyCart)` when there is nothing to order
    pub fn begin_submit(&mut self, form: &CheckoutForm, cart: &Cart) -> CoreResult<CreateOrderRequest> {
        self.expect_filling("submit the order")?;

        form.validate()
            .map_err(|errors| CoreError::InvalidForm { errors })?;

        if cart.is_empty() {
            return Err(CoreError::EmptyCart);
        }

        let request = CreateOrderRequest::from_cart(form, cart);
        self.transition(CheckoutState::Submitting);
        Ok(request)
    }

    /// Records a created order.
    pub fn order_created(&mut self, order_id: impl Into<String>) -> CoreResult<()> {
        if self.state != CheckoutState::Submitting {
            return Err(self.invalid("record a created order"));
        }
        self.transition(CheckoutState::OrderCreated {
            order_id: order_id.into(),
        });
        Ok(())
    }

    /// Moves past `OrderCreated`: to the payment choice when payment is
    /// enabled, else straight to `Confirmed`.
    pub fn continue_after_order(&mut self) -> CoreResult<&CheckoutState> {
        let order_id = match &self.state {
            CheckoutState::OrderCreated { order_id } => order_id.clone(),
            _ => return Err(self.invalid("continue after the order")),
        };

        let next = if self.payment_enabled {
            CheckoutState::AwaitingPaymentChoice {
                order_id,
                payment_url: None,
            }
        } else {
            CheckoutState::Confirmed { order_id }
        };
        self.transition(next);
        Ok(&self.state)
    }

    /// Returns to the editable form with the failure message.
    ///
    /// The server message is kept verbatim; without one the generic
    /// failure text is used.
    pub fn submit_failed(&mut self, server_message: Option<&str>) -> CoreResult<()> {
        if self.state != CheckoutState::Submitting {
            return Err(self.invalid("record a failed submission"));
        }

        let message = server_message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(GENERIC_ORDER_FAILURE)
            .to_string();

        self.transition(CheckoutState::FillingForm {
            error: Some(message),
        });
        Ok(())
    }

    /// Stores the payment link generated for the pending order.
    pub fn payment_link_created(&mut self, url: impl Into<String>) -> CoreResult<()> {
        if let CheckoutState::AwaitingPaymentChoice { payment_url, .. } = &mut self.state {
            *payment_url = Some(url.into());
            return Ok(());
        }
        Err(self.invalid("attach a payment link"))
    }

    /// The customer opts out of paying online (before or after the link
    /// was generated). Confirms the order.
    pub fn skip_payment(&mut self) -> CoreResult<()> {
        let order_id = match &self.state {
            CheckoutState::AwaitingPaymentChoice { order_id, .. } => order_id.clone(),
            _ => return Err(self.invalid("skip payment")),
        };
        self.transition(CheckoutState::Confirmed { order_id });
        Ok(())
    }

    /// True once a terminal confirmation has been reached.
    pub fn should_clear_cart(&self) -> bool {
        self.state.is_terminal()
    }

    fn expect_filling(&self, action: &str) -> CoreResult<()> {
        match self.state {
            CheckoutState::FillingForm { .. } => Ok(()),
            _ => Err(self.invalid(action)),
        }
    }

    fn invalid(&self, action: &str) -> CoreError {
        CoreError::InvalidCheckoutTransition {
            state: self.state.name().to_string(),
            action: action.to_string(),
        }
    }

    fn transition(&mut self, next: CheckoutState) {
        self.state = next;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::money::DiscountRate;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            name: "Ana".into(),
            phone: "+54 11 5555 1234".into(),
            email: "ana@tienda.com".into(),
            address: Some("  ".into()),
            notes: Some(" Timbre 2B ".into()),
        }
    }

    fn cart_with_one_line() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(
            CartItem::new("p1", "s1", "Remera", "M", Money::from_cents(10_000))
                .with_quantity(2)
                .with_discount(DiscountRate::from_percentage(10.0)),
        );
        cart
    }

    #[test]
    fn test_form_collects_all_errors() {
        let form = CheckoutForm {
            name: "".into(),
            phone: "".into(),
            email: "foo@bar".into(),
            ..Default::default()
        };

        let errors = form.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(ValidationError::field).collect();
        assert_eq!(fields, vec!["name", "phone", "email"]);
    }

    #[test]
    fn test_invalid_email_keeps_form_state() {
        let mut flow = CheckoutFlow::new(false);
        let form = CheckoutForm {
            email: "foo@bar".into(),
            ..valid_form()
        };

        let err = flow.begin_submit(&form, &cart_with_one_line()).unwrap_err();
        assert!(matches!(err, CoreError::InvalidForm { .. }));
        assert_eq!(flow.state(), &CheckoutState::FillingForm { error: None });
    }

    #[test]
    fn test_empty_cart_rejected() {
        let mut flow = CheckoutFlow::new(false);
        let err = flow.begin_submit(&valid_form(), &Cart::new()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
    }

    #[test]
    fn test_request_serialization() {
        let request = CreateOrderRequest::from_cart(&valid_form(), &cart_with_one_line());

        assert_eq!(request.customer.address, None);
        assert_eq!(request.customer.notes.as_deref(), Some("Timbre 2B"));

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["items"][0]["productId"], "p1");
        assert_eq!(json["items"][0]["sizeId"], "s1");
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][0]["price"], 100.0);
        assert_eq!(json["items"][0]["discount"], 10.0);
        assert_eq!(json["subtotal"], 200.0);
        assert_eq!(json["discount"], 20.0);
        assert_eq!(json["total"], 180.0);
        assert!(json["customer"].get("address").is_none());
    }

    #[test]
    fn test_happy_path_without_payment() {
        let mut flow = CheckoutFlow::new(false);
        flow.begin_submit(&valid_form(), &cart_with_one_line()).unwrap();
        assert_eq!(flow.state(), &CheckoutState::Submitting);

        flow.order_created("o-1").unwrap();
        assert!(!flow.should_clear_cart());

        let state = flow.continue_after_order().unwrap();
        assert_eq!(state, &CheckoutState::Confirmed { order_id: "o-1".into() });
        assert!(flow.should_clear_cart());
    }

    #[test]
    fn test_payment_enabled_waits_for_choice() {
        let mut flow = CheckoutFlow::new(true);
        flow.begin_submit(&valid_form(), &cart_with_one_line()).unwrap();
        flow.order_created("o-2").unwrap();
        flow.continue_after_order().unwrap();

        assert!(matches!(flow.state(), CheckoutState::AwaitingPaymentChoice { .. }));
        assert!(!flow.should_clear_cart());

        flow.payment_link_created("https://mp/checkout").unwrap();
        assert_eq!(
            flow.state(),
            &CheckoutState::AwaitingPaymentChoice {
                order_id: "o-2".into(),
                payment_url: Some("https://mp/checkout".into()),
            }
        );

        flow.skip_payment().unwrap();
        assert_eq!(flow.state().order_id(), Some("o-2"));
        assert!(flow.should_clear_cart());
    }

    #[test]
    fn test_failure_returns_to_form() {
        let mut flow = CheckoutFlow::new(false);
        flow.begin_submit(&valid_form(), &cart_with_one_line()).unwrap();
        flow.submit_failed(Some("Sin stock para Remera M")).unwrap();

        assert_eq!(
            flow.state(),
            &CheckoutState::FillingForm {
                error: Some("Sin stock para Remera M".into())
            }
        );

        // The form is editable again
        flow.begin_submit(&valid_form(), &cart_with_one_line()).unwrap();
        flow.submit_failed(None).unwrap();
        assert_eq!(
            flow.state(),
            &CheckoutState::FillingForm {
                error: Some(GENERIC_ORDER_FAILURE.into())
            }
        );
    }

    #[test]
    fn test_invalid_transitions() {
        let mut flow = CheckoutFlow::new(true);
        assert!(flow.skip_payment().is_err());
        assert!(flow.order_created("x").is_err());
        assert!(flow.continue_after_order().is_err());

        flow.begin_submit(&valid_form(), &cart_with_one_line()).unwrap();
        let err = flow.begin_submit(&valid_form(), &cart_with_one_line()).unwrap_err();
        assert_eq!(err.to_string(), "Cannot submit the order while checkout is submitting");
    }

    #[test]
    fn test_state_round_trips_through_storage() {
        let state = CheckoutState::AwaitingPaymentChoice {
            order_id: "o-3".into(),
            payment_url: None,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["state"], "awaiting_payment_choice");
        assert_eq!(serde_json::from_value::<CheckoutState>(json).unwrap(), state);
    }
}
