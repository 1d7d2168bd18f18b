//! # Checkout Commands
//!
//! Each command runs one step of the [`CheckoutFlow`]; a checkout that
//! stops at the payment choice is saved and resumed by the next command.
//!
//! ```text
//! checkout submit
//!   │ validate form + cart            (no request on failure)
//!   │ GET  /public/store/:sub         (payment flag; failure ⇒ disabled)
//!   │ POST /public/order/:sub
//!   │   ├── error ──► FillingForm { server message | generic }  ──► CHECKOUT_ERROR
//!   │   └── ok ─────► save last order
//!   │                   ├── payment disabled ──► Confirmed ──► clear cart
//!   │                   └── payment enabled ───► AwaitingPaymentChoice (saved)
//!   ▼
//! checkout pay   ──► POST /payment/mercadopago/preference ──► payment URL (saved)
//! checkout skip  ──► Confirmed ──► clear cart, drop saved checkout
//! checkout track ──► GET /public/order/:sub/:id (last order)
//! ```

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use vitrina_core::{CheckoutFlow, CheckoutForm, CheckoutState, CoreError, Order};
use vitrina_store::{LastOrder, PendingCheckout};

use super::store::info_or_none;
use crate::error::{CliError, CliResult, ErrorCode};
use crate::render::Render;
use crate::state::AppContext;

/// Result of a checkout step.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutView {
    pub state: CheckoutState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<LastOrder>,
}

impl Render for CheckoutView {
    fn render(&self) -> String {
        let mut out = Vec::new();
        match &self.state {
            CheckoutState::Confirmed { order_id } => {
                out.push(format!("Order {} confirmed. Thank you!", order_id));
            }
            CheckoutState::AwaitingPaymentChoice {
                order_id,
                payment_url: None,
            } => {
                out.push(format!("Order {} created.", order_id));
                out.push("Pay online with `vitrina checkout pay` or skip with `vitrina checkout skip`.".into());
            }
            CheckoutState::AwaitingPaymentChoice {
                order_id,
                payment_url: Some(url),
            } => {
                out.push(format!("Pay order {} at:", order_id));
                out.push(url.clone());
                out.push("Run `vitrina checkout skip` to finish without paying online.".into());
            }
            other => out.push(format!("Checkout: {}", other)),
        }

        if let Some(order) = &self.order {
            out.push(String::new());
            out.push(format!("Customer: {} <{}>", order.customer.name, order.customer.email));
            out.push(format!("Items:    {}", order.items.iter().map(|l| l.quantity).sum::<u32>()));
            out.push(format!("Total:    {}", order.total));
        }
        out.join("\n")
    }
}

async fn pending(ctx: &AppContext) -> CliResult<Option<PendingCheckout>> {
    Ok(ctx.storage().checkout().pending().await?)
}

async fn require_pending(ctx: &AppContext) -> CliResult<PendingCheckout> {
    pending(ctx).await?.ok_or_else(|| {
        CliError::new(
            ErrorCode::CheckoutError,
            "No checkout is waiting for a payment choice.",
        )
    })
}

/// Clears the cart once the checkout is confirmed.
async fn finish(ctx: &AppContext, flow: &CheckoutFlow) -> CliResult<()> {
    if flow.should_clear_cart() {
        ctx.cart.with_cart_mut(|c| c.clear());
        ctx.storage().cart().clear().await?;
        ctx.storage().checkout().clear_pending().await?;
        info!(order_id = ?flow.state().order_id(), "Checkout confirmed, cart cleared");
    }
    Ok(())
}

/// Places the order for the current cart.
pub async fn submit(ctx: &AppContext, form: &CheckoutForm) -> CliResult<CheckoutView> {
    if let Some(pending) = pending(ctx).await? {
        if let Some(order_id) = pending.state.order_id() {
            return Err(CliError::new(
                ErrorCode::CheckoutError,
                format!(
                    "Order {} is waiting for a payment choice. Run `vitrina checkout pay` or `vitrina checkout skip`.",
                    order_id
                ),
            ));
        }
    }

    let subdomain = ctx.config.require_subdomain()?;
    form.validate()
        .map_err(|errors| CoreError::InvalidForm { errors })?;
    let cart = ctx.cart.snapshot();
    if cart.is_empty() {
        return Err(CoreError::EmptyCart.into());
    }

    let payment_enabled = info_or_none(ctx).await.is_some_and(|s| s.payment_enabled);
    let mut flow = CheckoutFlow::new(payment_enabled);
    let request = flow.begin_submit(form, &cart)?;

    let order = match ctx.client.public().create_order(&subdomain, &request).await {
        Ok(order) => order,
        Err(e) => {
            warn!(subdomain = %subdomain, error = %e, "Order submission failed");
            flow.submit_failed(e.server_message())?;
            let message = match flow.state() {
                CheckoutState::FillingForm { error: Some(message) } => message.clone(),
                _ => e.to_string(),
            };
            return Err(CliError::new(ErrorCode::CheckoutError, message));
        }
    };

    flow.order_created(order.id.clone())?;
    let last = LastOrder {
        order_id: order.id.clone(),
        subdomain: subdomain.clone(),
        customer: request.customer.clone(),
        items: request.items.clone(),
        subtotal: request.subtotal,
        discount: request.discount,
        total: request.total,
        placed_at: Utc::now(),
    };
    ctx.storage().checkout().save_last_order(&last).await?;
    info!(order_id = %order.id, total = %last.total, "Order created");

    flow.continue_after_order()?;
    if flow.should_clear_cart() {
        finish(ctx, &flow).await?;
    } else {
        ctx.storage()
            .checkout()
            .save_pending(&PendingCheckout {
                subdomain,
                payment_enabled,
                state: flow.state().clone(),
            })
            .await?;
    }

    Ok(CheckoutView {
        state: flow.state().clone(),
        order: Some(last),
    })
}

/// Generates the MercadoPago link for the pending order.
pub async fn pay(ctx: &AppContext) -> CliResult<CheckoutView> {
    let mut pending = require_pending(ctx).await?;
    let mut flow = CheckoutFlow::resume(pending.state.clone(), pending.payment_enabled);
    let order_id = flow
        .state()
        .order_id()
        .map(str::to_string)
        .ok_or_else(|| CliError::new(ErrorCode::CheckoutError, "Saved checkout has no order."))?;

    let preference = ctx.client.payments().create_preference(&order_id).await?;
    flow.payment_link_created(preference.init_point)?;

    pending.state = flow.state().clone();
    ctx.storage().checkout().save_pending(&pending).await?;
    Ok(CheckoutView {
        state: pending.state,
        order: None,
    })
}

/// Finishes the pending checkout without paying online.
pub async fn skip(ctx: &AppContext) -> CliResult<CheckoutView> {
    let pending = require_pending(ctx).await?;
    let mut flow = CheckoutFlow::resume(pending.state, pending.payment_enabled);
    flow.skip_payment()?;
    finish(ctx, &flow).await?;

    Ok(CheckoutView {
        state: flow.state().clone(),
        order: ctx.storage().checkout().last_order().await?,
    })
}

/// Current status of the last order placed from this machine.
pub async fn track(ctx: &AppContext) -> CliResult<Order> {
    let last = ctx
        .storage()
        .checkout()
        .last_order()
        .await?
        .ok_or_else(|| CliError::new(ErrorCode::CheckoutError, "No order placed yet."))?;
    Ok(ctx.client.public().order(&last.subdomain, &last.order_id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vitrina_core::cart::CartItem;
    use vitrina_core::GENERIC_ORDER_FAILURE;
    use vitrina_core::Money;

    use crate::commands::test_support::context;

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "Ana Gómez".into(),
            phone: "+54 11 5555-0000".into(),
            email: "ana@example.com".into(),
            address: Some("Calle 1".into()),
            notes: None,
        }
    }

    async fn with_cart(payment_enabled: bool) -> (AppContext, std::sync::Arc<vitrina_api::RecordingTransport>) {
        let (ctx, transport) = context(false).await;
        ctx.cart.with_cart_mut(|c| {
            c.add_item(CartItem::new("p1", "s1", "Remera", "M", Money::from_cents(10_000)).with_quantity(2))
        });
        ctx.cart.persist(ctx.storage()).await.unwrap();
        transport.push_json(
            200,
            json!({ "name": "Tienda Sol", "subdomain": "sol", "paymentEnabled": payment_enabled }),
        );
        (ctx, transport)
    }

    #[tokio::test]
    async fn test_invalid_email_sends_nothing() {
        let (ctx, transport) = with_cart(false).await;
        let mut bad = form();
        bad.email = "foo@bar".into();

        let err = submit(&ctx, &bad).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(transport.request_count(), 0);
        assert!(!ctx.cart.with_cart(|c| c.is_empty()));
    }

    #[tokio::test]
    async fn test_empty_cart_is_rejected() {
        let (ctx, transport) = context(false).await;

        let err = submit(&ctx, &form()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::CartError);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_confirmed_without_payment_clears_cart() {
        let (ctx, transport) = with_cart(false).await;
        transport.push_json(201, json!({ "id": "o-1", "total": 200 }));

        let view = submit(&ctx, &form()).await.unwrap();

        assert_eq!(view.state, CheckoutState::Confirmed { order_id: "o-1".into() });
        let request = &transport.requests()[1];
        assert_eq!(request.url.path(), "/api/public/order/sol");
        let body = request.json().unwrap();
        assert_eq!(body["total"], json!(200.0));
        assert_eq!(body["customer"]["email"], json!("ana@example.com"));

        assert!(ctx.cart.with_cart(|c| c.is_empty()));
        assert!(ctx.storage().cart().load().await.unwrap().is_empty());
        assert_eq!(
            ctx.storage().checkout().last_order().await.unwrap().unwrap().order_id,
            "o-1"
        );
    }

    #[tokio::test]
    async fn test_server_message_kept_verbatim() {
        let (ctx, transport) = with_cart(false).await;
        transport.push_json(400, json!({ "message": "Stock insuficiente para Remera" }));

        let err = submit(&ctx, &form()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::CheckoutError);
        assert_eq!(err.message, "Stock insuficiente para Remera");
        assert!(!ctx.cart.with_cart(|c| c.is_empty()));
    }

    #[tokio::test]
    async fn test_network_failure_uses_generic_message() {
        let (ctx, _transport) = with_cart(false).await;

        let err = submit(&ctx, &form()).await.unwrap_err();

        assert_eq!(err.message, GENERIC_ORDER_FAILURE);
    }

    #[tokio::test]
    async fn test_error_without_message_uses_generic_text() {
        let (ctx, transport) = with_cart(false).await;
        transport.push_raw(500, "");

        let err = submit(&ctx, &form()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::CheckoutError);
        assert_eq!(err.message, GENERIC_ORDER_FAILURE);
        assert!(!ctx.cart.with_cart(|c| c.is_empty()));

        let (ctx, transport) = with_cart(false).await;
        transport.push_raw(502, "<html>bad gateway</html>");

        let err = submit(&ctx, &form()).await.unwrap_err();

        assert_eq!(err.message, GENERIC_ORDER_FAILURE);
    }

    #[tokio::test]
    async fn test_payment_choice_pay_then_skip() {
        let (ctx, transport) = with_cart(true).await;
        transport.push_json(201, json!({ "id": "o-2", "total": 200 }));

        let view = submit(&ctx, &form()).await.unwrap();
        assert!(matches!(view.state, CheckoutState::AwaitingPaymentChoice { .. }));
        assert!(!ctx.cart.with_cart(|c| c.is_empty()));

        // A second submit is refused while the choice is pending.
        assert!(submit(&ctx, &form()).await.is_err());

        transport.push_json(200, json!({ "id": "pref-1", "initPoint": "https://mp.example/pay/1" }));
        let view = pay(&ctx).await.unwrap();
        assert_eq!(
            view.state,
            CheckoutState::AwaitingPaymentChoice {
                order_id: "o-2".into(),
                payment_url: Some("https://mp.example/pay/1".into()),
            }
        );
        assert_eq!(
            transport.requests().last().unwrap().json(),
            Some(&json!({ "orderId": "o-2" }))
        );

        let view = skip(&ctx).await.unwrap();
        assert_eq!(view.state, CheckoutState::Confirmed { order_id: "o-2".into() });
        assert!(ctx.storage().cart().load().await.unwrap().is_empty());
        assert!(ctx.storage().checkout().pending().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_track_last_order() {
        let (ctx, transport) = with_cart(false).await;
        transport.push_json(201, json!({ "id": "o-3", "total": 200 }));
        submit(&ctx, &form()).await.unwrap();

        transport.push_json(200, json!({ "id": "o-3", "status": "paid", "total": 200 }));
        let order = track(&ctx).await.unwrap();

        assert_eq!(order.id, "o-3");
        assert_eq!(
            transport.requests().last().unwrap().url.path(),
            "/api/public/order/sol/o-3"
        );
    }
}
