//! # Exchange Commands
//!
//! ```text
//! vitrina exchanges create --sale v1 --return p1:M --take p2:L --payment cash
//!      │
//!      ├── GET /sell/v1            returned lines priced as sold (after discount)
//!      ├── GET /product/p2         new lines priced at the current final price
//!      ├── difference = taken − returned
//!      │     └── > 0 requires --payment
//!      └── POST /exchange
//! ```

use vitrina_api::services::CreateExchangeRequest;
use vitrina_core::{Exchange, ExchangeItem, PaymentMethod, Sale};

use super::{find_size, require_session, LineSpec};
use crate::error::{CliError, CliResult};
use crate::state::AppContext;

pub async fn list(ctx: &AppContext) -> CliResult<Vec<Exchange>> {
    require_session(ctx).await?;
    Ok(ctx.client.exchanges().list().await?)
}

pub async fn show(ctx: &AppContext, id: &str) -> CliResult<Exchange> {
    require_session(ctx).await?;
    Ok(ctx.client.exchanges().get(id).await?)
}

/// Picks the sold line a returned item refers to.
fn returned_item(sale: &Sale, spec: &LineSpec) -> CliResult<ExchangeItem> {
    let line = sale
        .items
        .iter()
        .find(|i| {
            i.product_id == spec.product_id
                && (i.size_id == spec.size
                    || i.size_name
                        .as_deref()
                        .is_some_and(|n| n.eq_ignore_ascii_case(&spec.size)))
        })
        .ok_or_else(|| {
            CliError::validation(format!(
                "Sale {} has no line for product {} size {}",
                sale.id, spec.product_id, spec.size
            ))
        })?;

    if spec.quantity > line.quantity {
        return Err(CliError::validation(format!(
            "Cannot return {} of {}: only {} sold",
            spec.quantity, spec.product_id, line.quantity
        )));
    }

    let unit = line.price - line.price.percentage(line.discount);
    Ok(ExchangeItem {
        product_id: line.product_id.clone(),
        size_id: line.size_id.clone(),
        product_name: line.product_name.clone(),
        size_name: line.size_name.clone(),
        quantity: spec.quantity,
        price: unit,
    })
}

pub async fn create(
    ctx: &AppContext,
    sale_id: &str,
    returns: &[LineSpec],
    takes: &[LineSpec],
    payment_method: Option<PaymentMethod>,
    notes: Option<String>,
) -> CliResult<Exchange> {
    require_session(ctx).await?;
    if returns.is_empty() {
        return Err(CliError::validation("Give at least one --return product:size[:quantity]"));
    }

    let sale = ctx.client.sales().get(sale_id).await?;
    let returned_items = returns
        .iter()
        .map(|spec| returned_item(&sale, spec))
        .collect::<CliResult<Vec<_>>>()?;

    let mut new_items = Vec::with_capacity(takes.len());
    for spec in takes {
        let product = ctx.client.products().get(&spec.product_id).await?;
        let size = find_size(&product, &spec.size).ok_or_else(|| {
            CliError::validation(format!("{} has no size '{}'", product.name, spec.size))
        })?;
        new_items.push(ExchangeItem {
            product_id: product.id.clone(),
            size_id: size.size_id.clone(),
            product_name: Some(product.name.clone()),
            size_name: Some(size.size_name.clone()),
            quantity: spec.quantity,
            price: product.final_price(),
        });
    }

    let request = CreateExchangeRequest {
        sale_id: sale.id.clone(),
        returned_items,
        new_items,
        payment_method,
        notes: notes.filter(|n| !n.trim().is_empty()),
    };
    Ok(ctx.client.exchanges().create(&request).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn sale() -> serde_json::Value {
        json!({
            "id": "v1",
            "total": 180,
            "paymentMethod": "cash",
            "items": [{
                "productId": "p1", "productName": "Remera",
                "sizeId": "s1", "sizeName": "M",
                "quantity": 2, "price": 100, "discount": 10
            }]
        })
    }

    fn buzo() -> serde_json::Value {
        json!({
            "id": "p2", "name": "Buzo", "price": 150,
            "stockBySize": [{ "sizeId": "s2", "sizeName": "L", "quantity": 3 }]
        })
    }

    fn exchange() -> serde_json::Value {
        json!({ "id": "x1", "saleId": "v1", "priceDifference": 60 })
    }

    #[tokio::test]
    async fn test_prices_come_from_sale_and_catalog() {
        let (ctx, transport) = context(true).await;
        transport.push_json(200, sale());
        transport.push_json(200, buzo());
        transport.push_json(201, exchange());

        let returns = vec!["p1:m".parse::<LineSpec>().unwrap()];
        let takes = vec!["p2:L".parse::<LineSpec>().unwrap()];
        create(&ctx, "v1", &returns, &takes, Some(PaymentMethod::Cash), None)
            .await
            .unwrap();

        let request = &transport.requests()[2];
        assert_eq!(request.url.path(), "/api/exchange");
        let body = request.json().unwrap();
        assert_eq!(body["returnedItems"][0]["price"], json!(90.0));
        assert_eq!(body["newItems"][0]["price"], json!(150.0));
        assert_eq!(body["newItems"][0]["sizeId"], json!("s2"));
        assert_eq!(body["paymentMethod"], json!("cash"));
    }

    #[tokio::test]
    async fn test_positive_difference_needs_payment() {
        let (ctx, transport) = context(true).await;
        transport.push_json(200, sale());
        transport.push_json(200, buzo());

        let returns = vec!["p1:s1".parse::<LineSpec>().unwrap()];
        let takes = vec!["p2:s2".parse::<LineSpec>().unwrap()];
        let err = create(&ctx, "v1", &returns, &takes, None, None).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_cannot_return_more_than_sold() {
        let (ctx, transport) = context(true).await;
        transport.push_json(200, sale());

        let returns = vec!["p1:s1:3".parse::<LineSpec>().unwrap()];
        let err = create(&ctx, "v1", &returns, &[], None, None).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("only 2 sold"));
    }
}
