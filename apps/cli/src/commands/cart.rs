//! # Cart Commands
//!
//! ```text
//! vitrina cart add p1 M --quantity 2
//!      │
//!      ├── GET /public/store/:sub/products/p1   (fresh stock for the size)
//!      ├── addable = min(requested, stock − already in cart)
//!      │     └── 0 ──► CART_ERROR, cart untouched
//!      ├── cart.add_item (merges with an existing line)
//!      └── persist
//!
//! vitrina cart update p1 s1 5   ──► clamp to last seen stock, persist (no request)
//! vitrina cart remove p1 s1     ──► persist
//! vitrina cart clear            ──► remove stored cart
//! vitrina cart show             ──► totals + free-shipping bar (store info)
//! ```

use serde::Serialize;
use tracing::{debug, info};
use vitrina_core::cart::clamp_quantity;
use vitrina_core::{Cart, CartItem, CartTotals, FreeShippingProgress};

use super::find_size;
use super::store::info_or_none;
use crate::error::{CliError, CliResult};
use crate::render::{table, Render};
use crate::state::AppContext;

const BAR_WIDTH: usize = 20;

/// The cart as printed after every cart command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub totals: CartTotals,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_shipping: Option<FreeShippingProgress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl CartView {
    fn new(cart: &Cart) -> Self {
        CartView {
            items: cart.items.clone(),
            totals: CartTotals::from(cart),
            free_shipping: None,
            notice: None,
        }
    }

    fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }
}

impl Render for CartView {
    fn render(&self) -> String {
        let mut out = Vec::new();
        if let Some(notice) = &self.notice {
            out.push(notice.clone());
        }

        if self.items.is_empty() {
            out.push("Cart is empty.".to_string());
            return out.join("\n");
        }

        let rows: Vec<Vec<String>> = self
            .items
            .iter()
            .map(|i| {
                vec![
                    i.product_id.clone(),
                    i.product_name.clone(),
                    i.size_name.clone(),
                    i.quantity.to_string(),
                    i.price.to_string(),
                    i.discount.to_string(),
                    i.line_total().to_string(),
                ]
            })
            .collect();
        out.push(table(
            &["ID", "PRODUCT", "SIZE", "QTY", "PRICE", "DISC", "TOTAL"],
            &rows,
        ));

        out.push(String::new());
        out.push(format!("Subtotal:  {}", self.totals.subtotal));
        if self.totals.discount.is_positive() {
            out.push(format!("Discount: -{}", self.totals.discount));
        }
        out.push(format!("Total:     {}", self.totals.total));

        if let Some(shipping) = &self.free_shipping {
            let label = if shipping.qualifies() {
                "Free shipping!".to_string()
            } else {
                format!("{} away from free shipping", shipping.remaining)
            };
            out.push(format!("{} {:>3.0}%  {}", shipping.bar(BAR_WIDTH), shipping.progress, label));
        }
        out.join("\n")
    }
}

pub async fn show(ctx: &AppContext) -> CliResult<CartView> {
    let cart = ctx.cart.snapshot();
    let mut view = CartView::new(&cart);
    if !cart.is_empty() {
        if let Some(store) = info_or_none(ctx).await {
            view.free_shipping = FreeShippingProgress::compute(store.free_shipping_min, view.totals.total);
        }
    }
    Ok(view)
}

pub async fn add(ctx: &AppContext, product_id: &str, size: &str, quantity: u32) -> CliResult<CartView> {
    if quantity == 0 {
        return Err(CliError::validation("Quantity must be at least 1"));
    }

    let subdomain = ctx.config.require_subdomain()?;
    let product = ctx.client.public().product(&subdomain, product_id).await?;
    if !product.active {
        return Err(CliError::cart(format!("{} is not available", product.name)));
    }

    let size = find_size(&product, size).ok_or_else(|| {
        CliError::cart(format!("{} is not sold in size '{}'", product.name, size))
    })?;

    let addable = ctx
        .cart
        .with_cart(|c| c.addable_quantity(&product.id, &size.size_id, quantity, size.quantity));
    if addable == 0 {
        // Stock may have dropped below what the line already holds.
        let capped = ctx.cart.with_cart_mut(|c| {
            c.get(&product.id, &size.size_id)
                .is_some()
                .then(|| c.clamp_to_stock(&product.id, &size.size_id, size.quantity))
                .transpose()
        })?;
        if let Some(line_quantity) = capped {
            ctx.cart.persist(ctx.storage()).await?;
            debug!(product_id = %product.id, size_id = %size.size_id, line_quantity, "Cart line capped to stock");
        }
        return Err(CliError::cart(format!(
            "No more stock for {} ({})",
            product.name, size.size_name
        )));
    }

    let line_quantity = ctx
        .cart
        .with_cart_mut(|c| c.add_item(CartItem::from_product(&product, size, addable)));
    ctx.cart.persist(ctx.storage()).await?;
    info!(product_id = %product.id, size_id = %size.size_id, added = addable, line_quantity, "Added to cart");

    let notice = (addable < quantity).then(|| {
        format!(
            "Only {} of {} added: {} left in size {}.",
            addable, quantity, size.quantity, size.size_name
        )
    });
    Ok(ctx.cart.with_cart(CartView::new).with_notice(notice))
}

/// Sets a line quantity, capped by the stock seen when the line was added.
pub async fn update(ctx: &AppContext, product_id: &str, size_id: &str, quantity: u32) -> CliResult<CartView> {
    let result = ctx.cart.with_cart_mut(|c| {
        let stock = c.get(product_id, size_id).and_then(|i| i.max_stock);
        c.update_quantity(product_id, size_id, clamp_quantity(quantity, stock))
    })?;
    ctx.cart.persist(ctx.storage()).await?;
    debug!(product_id, size_id, quantity = result, "Cart line updated");

    let notice = (result != quantity.max(1))
        .then(|| format!("Quantity capped at {} (stock limit).", result));
    Ok(ctx.cart.with_cart(CartView::new).with_notice(notice))
}

pub async fn remove(ctx: &AppContext, product_id: &str, size_id: &str) -> CliResult<CartView> {
    let removed = ctx.cart.with_cart_mut(|c| c.remove_item(product_id, size_id));
    if !removed {
        return Err(CliError::cart(format!(
            "No cart line for product {} size {}",
            product_id, size_id
        )));
    }
    ctx.cart.persist(ctx.storage()).await?;
    Ok(ctx.cart.with_cart(CartView::new))
}

pub async fn clear(ctx: &AppContext) -> CliResult<CartView> {
    ctx.cart.with_cart_mut(Cart::clear);
    ctx.storage().cart().clear().await?;
    Ok(ctx.cart.with_cart(CartView::new).with_notice(Some("Cart cleared.".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::error::ErrorCode;
    use serde_json::json;
    use vitrina_core::Money;

    fn remera(stock: u32) -> serde_json::Value {
        json!({
            "id": "p1",
            "name": "Remera",
            "price": 100,
            "discount": 10,
            "stockBySize": [
                { "sizeId": "s1", "sizeName": "M", "quantity": stock },
                { "sizeId": "s2", "sizeName": "L", "quantity": 0 }
            ]
        })
    }

    #[tokio::test]
    async fn test_add_by_size_name_and_persist() {
        let (ctx, transport) = context(false).await;
        transport.push_json(200, remera(5));

        let view = add(&ctx, "p1", "m", 2).await.unwrap();

        assert_eq!(view.totals.total_quantity, 2);
        assert_eq!(view.totals.subtotal, Money::from_cents(20_000));
        assert_eq!(view.totals.total, Money::from_cents(18_000));
        assert!(view.notice.is_none());
        assert_eq!(
            transport.requests()[0].url.path(),
            "/api/public/store/sol/products/p1"
        );

        let stored = ctx.storage().cart().load().await.unwrap();
        assert_eq!(stored.get("p1", "s1").unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_add_caps_at_remaining_stock() {
        let (ctx, transport) = context(false).await;
        transport.push_json(200, remera(3));
        transport.push_json(200, remera(3));

        add(&ctx, "p1", "s1", 2).await.unwrap();
        let view = add(&ctx, "p1", "s1", 5).await.unwrap();

        assert_eq!(view.totals.total_quantity, 3);
        assert!(view.notice.unwrap().starts_with("Only 1 of 5 added"));
    }

    #[tokio::test]
    async fn test_add_without_stock_fails() {
        let (ctx, transport) = context(false).await;
        transport.push_json(200, remera(3));

        let err = add(&ctx, "p1", "L", 1).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::CartError);
        assert!(ctx.cart.with_cart(Cart::is_empty));
    }

    #[tokio::test]
    async fn test_add_caps_line_when_stock_dropped() {
        let (ctx, transport) = context(false).await;
        transport.push_json(200, remera(5));
        transport.push_json(200, remera(2));
        add(&ctx, "p1", "s1", 4).await.unwrap();

        let err = add(&ctx, "p1", "s1", 1).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::CartError);
        let stored = ctx.storage().cart().load().await.unwrap();
        let line = stored.get("p1", "s1").unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.max_stock, Some(2));
    }

    #[tokio::test]
    async fn test_update_clamps_to_seen_stock() {
        let (ctx, transport) = context(false).await;
        transport.push_json(200, remera(4));
        add(&ctx, "p1", "s1", 1).await.unwrap();

        let view = update(&ctx, "p1", "s1", 10).await.unwrap();
        assert_eq!(view.items[0].quantity, 4);
        assert!(view.notice.is_some());

        let view = update(&ctx, "p1", "s1", 0).await.unwrap();
        assert_eq!(view.items[0].quantity, 1);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let (ctx, transport) = context(false).await;
        transport.push_json(200, remera(4));
        add(&ctx, "p1", "s1", 1).await.unwrap();

        assert!(remove(&ctx, "p1", "s9").await.is_err());
        let view = remove(&ctx, "p1", "s1").await.unwrap();
        assert!(view.items.is_empty());

        let view = clear(&ctx).await.unwrap();
        assert_eq!(view.render(), "Cart cleared.\nCart is empty.");
        assert!(ctx.storage().cart().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_show_includes_free_shipping() {
        let (ctx, transport) = context(false).await;
        transport.push_json(200, remera(4));
        add(&ctx, "p1", "s1", 1).await.unwrap();
        transport.push_json(
            200,
            json!({ "name": "Tienda Sol", "subdomain": "sol", "freeShippingMin": 180 }),
        );

        let view = show(&ctx).await.unwrap();

        let shipping = view.free_shipping.unwrap();
        assert_eq!(shipping.remaining, Money::from_cents(9_000));
        assert_eq!(shipping.progress, 50.0);
        assert!(view.render().contains("$90.00 away from free shipping"));
    }
}
