//! # Cart
//!
//! The shopping cart: an ordered list of line items with derived totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  User Action              Cart Method              Change               │
//! │  ───────────              ───────────              ──────               │
//! │                                                                         │
//! │  Add product/size ──────► add_item() ────────────► merge or push       │
//! │                                                                         │
//! │  Change quantity ───────► update_quantity() ─────► qty = max(n, 1)     │
//! │                                                                         │
//! │  Remove line ───────────► remove_item() ─────────► filter out          │
//! │                                                                         │
//! │  Empty cart / confirm ──► clear() ───────────────► items = []          │
//! │                                                                         │
//! │  View cart ─────────────► CartTotals::from() ────► (read only)         │
//! │                                                                         │
//! │  Line identity is (product_id, size_id): the same product in two       │
//! │  sizes is two lines.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! ```text
//! subtotal = Σ price × quantity
//! discount = Σ round_half_up(price × quantity × discount%)   (per line)
//! total    = subtotal − discount
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{DiscountRate, Money};
use crate::types::{OrderLine, Product, SizeStock};

// =============================================================================
// Cart Item
// =============================================================================

/// A line in the cart.
///
/// ## Design Notes
/// - Names, price and discount are a snapshot taken when the line was
///   added, so the cart renders without refetching the product.
/// - `max_stock` is the last size stock the client saw. It only feeds the
///   advisory clamp; the server decides at order time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub size_id: String,
    pub product_name: String,
    pub size_name: String,

    /// Unit price before discount (frozen).
    pub price: Money,

    /// Per-unit discount (frozen).
    #[serde(default)]
    pub discount: DiscountRate,

    /// Always at least 1.
    pub quantity: u32,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub max_stock: Option<u32>,
}

impl CartItem {
    /// Creates a line with quantity 1 and no discount.
    pub fn new(
        product_id: impl Into<String>,
        size_id: impl Into<String>,
        product_name: impl Into<String>,
        size_name: impl Into<String>,
        price: Money,
    ) -> Self {
        CartItem {
            product_id: product_id.into(),
            size_id: size_id.into(),
            product_name: product_name.into(),
            size_name: size_name.into(),
            price,
            discount: DiscountRate::zero(),
            quantity: 1,
            image: None,
            max_stock: None,
        }
    }

    /// Snapshots a product in one of its sizes.
    pub fn from_product(product: &Product, size: &SizeStock, quantity: u32) -> Self {
        CartItem {
            product_id: product.id.clone(),
            size_id: size.size_id.clone(),
            product_name: product.name.clone(),
            size_name: size.size_name.clone(),
            price: product.price,
            discount: product.discount,
            quantity: quantity.max(1),
            image: product.cover_image().map(str::to_string),
            max_stock: Some(size.quantity),
        }
    }

    pub fn with_discount(mut self, discount: DiscountRate) -> Self {
        self.discount = discount;
        self
    }

    /// Sets the quantity, never below 1.
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_max_stock(mut self, stock: u32) -> Self {
        self.max_stock = Some(stock);
        self
    }

    /// Checks whether this line is the `(product_id, size_id)` pair.
    pub fn is_line(&self, product_id: &str, size_id: &str) -> bool {
        self.product_id == product_id && self.size_id == size_id
    }

    /// price × quantity.
    pub fn line_subtotal(&self) -> Money {
        self.price * self.quantity
    }

    /// Discount for the whole line, rounded half-up to the cent.
    pub fn line_discount(&self) -> Money {
        self.line_subtotal().percentage(self.discount)
    }

    /// Line subtotal minus line discount.
    pub fn line_total(&self) -> Money {
        self.line_subtotal() - self.line_discount()
    }

    /// The line as sent in an order creation request.
    pub fn to_order_line(&self) -> OrderLine {
        OrderLine {
            product_id: self.product_id.clone(),
            size_id: self.size_id.clone(),
            product_name: Some(self.product_name.clone()),
            size_name: Some(self.size_name.clone()),
            quantity: self.quantity,
            price: self.price,
            discount: self.discount,
        }
    }
}

// =============================================================================
// Advisory Stock Clamp
// =============================================================================

/// Caps a requested quantity at the known stock, never below 1.
///
/// ## Example
/// ```rust
/// use vitrina_core::cart::clamp_quantity;
///
/// assert_eq!(clamp_quantity(5, Some(3)), 3);
/// assert_eq!(clamp_quantity(5, None), 5);
/// assert_eq!(clamp_quantity(0, Some(3)), 1);
/// assert_eq!(clamp_quantity(2, Some(0)), 1);
/// ```
pub fn clamp_quantity(requested: u32, stock: Option<u32>) -> u32 {
    let capped = match stock {
        Some(stock) => requested.min(stock),
        None => requested,
    };
    capped.max(1)
}

// =============================================================================
// Cart
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `(product_id, size_id)`; adding an existing pair
///   sums quantities
/// - Every quantity is at least 1
/// - No upper cap is enforced here; stock limits are advisory and applied
///   by the caller through [`Cart::clamp_to_stock`] or [`clamp_quantity`]
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Rebuilds a cart from persisted lines, restoring the invariants.
    ///
    /// Duplicate pairs are merged and zero quantities raised to 1, so a
    /// hand-edited or stale store can never produce an invalid cart.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Cart::new();
        for item in items {
            cart.add_item(item);
        }
        cart
    }

    /// Adds a line, merging with an existing `(product_id, size_id)` line.
    ///
    /// ## Behavior
    /// - Pair already in cart: quantities are summed; a newer stock
    ///   reading replaces the stored one
    /// - Otherwise: the line is appended
    ///
    /// Returns the resulting quantity of the line.
    pub fn add_item(&mut self, mut item: CartItem) -> u32 {
        item.quantity = item.quantity.max(1);

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|i| i.is_line(&item.product_id, &item.size_id))
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            if item.max_stock.is_some() {
                existing.max_stock = item.max_stock;
            }
            return existing.quantity;
        }

        let quantity = item.quantity;
        self.items.push(item);
        quantity
    }

    /// Sets the quantity of a line, clamped to at least 1.
    ///
    /// ## Returns
    /// - `Ok(quantity)` with the stored quantity
    /// - `Err(ItemNotInCart)` if the pair is not in the cart
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        size_id: &str,
        quantity: u32,
    ) -> CoreResult<u32> {
        let item = self.get_mut(product_id, size_id)?;
        item.quantity = quantity.max(1);
        Ok(item.quantity)
    }

    /// Removes a line. Removing an absent pair is a no-op.
    ///
    /// Returns whether a line was removed.
    pub fn remove_item(&mut self, product_id: &str, size_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|i| !i.is_line(product_id, size_id));
        self.items.len() != before
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Records the latest known stock for a line and caps its quantity.
    ///
    /// Returns the clamped quantity (never below 1, even at zero stock:
    /// removing the line is the caller's decision).
    pub fn clamp_to_stock(&mut self, product_id: &str, size_id: &str, stock: u32) -> CoreResult<u32> {
        let item = self.get_mut(product_id, size_id)?;
        item.max_stock = Some(stock);
        item.quantity = clamp_quantity(item.quantity, Some(stock));
        Ok(item.quantity)
    }

    /// How many more units of a pair can be added without exceeding `stock`.
    ///
    /// Accounts for the quantity already in the cart. Returns 0 when the
    /// line is already at (or above) the stock.
    pub fn addable_quantity(&self, product_id: &str, size_id: &str, requested: u32, stock: u32) -> u32 {
        let current = self.get(product_id, size_id).map_or(0, |i| i.quantity);
        requested.min(stock.saturating_sub(current))
    }

    /// Looks up a line.
    pub fn get(&self, product_id: &str, size_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.is_line(product_id, size_id))
    }

    fn get_mut(&mut self, product_id: &str, size_id: &str) -> CoreResult<&mut CartItem> {
        self.items
            .iter_mut()
            .find(|i| i.is_line(product_id, size_id))
            .ok_or_else(|| CoreError::ItemNotInCart {
                product_id: product_id.to_string(),
                size_id: size_id.to_string(),
            })
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Σ price × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartItem::line_subtotal).sum()
    }

    /// Σ per-line discount.
    pub fn total_discount(&self) -> Money {
        self.items.iter().map(CartItem::line_discount).sum()
    }

    /// Subtotal minus discount.
    pub fn total_with_discount(&self) -> Money {
        self.subtotal() - self.total_discount()
    }

    /// Lines in order-request form.
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.items.iter().map(CartItem::to_order_line).collect()
    }
}

// =============================================================================
// Totals Summary
// =============================================================================

/// Cart totals summary for rendering and JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: u32,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            discount: cart.total_discount(),
            total: cart.total_with_discount(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
