//! # Product Commands
//!
//! Browsing uses the public storefront endpoints of the selected store;
//! `--admin` switches to the tenant endpoints (login required).

use tracing::info;
use vitrina_api::services::{ProductQuery, StockUpdate};
use vitrina_core::{Paginated, Product};

use super::require_session;
use crate::error::{CliError, CliResult};
use crate::render::Message;
use crate::state::AppContext;

/// Filters accepted by `products list`.
#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub search: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub gender: Option<String>,
    pub product_type: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub admin: bool,
}

impl ListArgs {
    fn query(&self) -> ProductQuery {
        ProductQuery {
            search: self.search.clone(),
            category_id: self.category.clone(),
            brand_id: self.brand.clone(),
            gender_id: self.gender.clone(),
            type_id: self.product_type.clone(),
            page: self.page,
            limit: self.limit,
        }
    }
}

pub async fn list(ctx: &AppContext, args: &ListArgs) -> CliResult<Paginated<Product>> {
    let query = args.query();
    if args.admin {
        require_session(ctx).await?;
        return Ok(ctx.client.products().list(&query).await?);
    }

    let subdomain = ctx.config.require_subdomain()?;
    let mut page = ctx.client.public().products(&subdomain, &query).await?;
    page.data.retain(|p| p.active);
    Ok(page)
}

pub async fn show(ctx: &AppContext, id: &str, admin: bool) -> CliResult<Product> {
    if admin {
        require_session(ctx).await?;
        return Ok(ctx.client.products().get(id).await?);
    }
    let subdomain = ctx.config.require_subdomain()?;
    Ok(ctx.client.public().product(&subdomain, id).await?)
}

/// Parses `size=quantity` pairs.
pub fn parse_stock(pairs: &[String]) -> CliResult<Vec<StockUpdate>> {
    pairs
        .iter()
        .map(|pair| {
            let (size, qty) = pair
                .split_once('=')
                .ok_or_else(|| CliError::validation(format!("Expected size=quantity, got '{}'", pair)))?;
            let quantity = qty
                .trim()
                .parse::<u32>()
                .map_err(|_| CliError::validation(format!("Invalid quantity in '{}'", pair)))?;
            Ok(StockUpdate {
                size_id: size.trim().to_string(),
                quantity,
            })
        })
        .collect()
}

/// Replaces stock for the given sizes. Sizes may be given by id or name.
pub async fn set_stock(ctx: &AppContext, id: &str, pairs: &[String]) -> CliResult<Product> {
    require_session(ctx).await?;
    let mut updates = parse_stock(pairs)?;
    if updates.is_empty() {
        return Err(CliError::validation("Give at least one size=quantity pair"));
    }

    let product = ctx.client.products().get(id).await?;
    for update in &mut updates {
        let size = product
            .stock_by_size
            .iter()
            .find(|s| s.size_id == update.size_id || s.size_name.eq_ignore_ascii_case(&update.size_id));
        if let Some(size) = size {
            update.size_id = size.size_id.clone();
        }
    }

    let updated = ctx.client.products().update_stock(id, &updates).await?;
    info!(product_id = %id, sizes = updates.len(), "Stock updated");
    Ok(updated)
}

pub async fn delete(ctx: &AppContext, id: &str) -> CliResult<Message> {
    require_session(ctx).await?;
    ctx.client.products().delete(id).await?;
    Ok(Message::new(format!("Product {} deleted.", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use serde_json::json;

    fn product(active: bool) -> serde_json::Value {
        json!({
            "id": if active { "p1" } else { "p2" },
            "name": "Remera",
            "price": 100,
            "active": active,
            "stockBySize": [{ "sizeId": "s1", "sizeName": "M", "quantity": 2 }]
        })
    }

    #[tokio::test]
    async fn test_public_list_hides_inactive() {
        let (ctx, transport) = context(false).await;
        transport.push_json(200, json!([product(true), product(false)]));

        let args = ListArgs {
            search: Some("remera".into()),
            ..ListArgs::default()
        };
        let page = list(&ctx, &args).await.unwrap();

        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, "p1");
        let url = &transport.requests()[0].url;
        assert_eq!(url.path(), "/api/public/store/sol/products");
        assert_eq!(url.query(), Some("search=remera"));
    }

    #[tokio::test]
    async fn test_admin_list_requires_login() {
        let (ctx, transport) = context(false).await;
        let args = ListArgs {
            admin: true,
            ..ListArgs::default()
        };

        assert!(list(&ctx, &args).await.is_err());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_set_stock_resolves_size_names() {
        let (ctx, transport) = context(true).await;
        transport.push_json(200, product(true));
        transport.push_json(200, product(true));

        set_stock(&ctx, "p1", &["m=7".to_string()]).await.unwrap();

        let request = &transport.requests()[1];
        assert_eq!(request.url.path(), "/api/product/p1/stock");
        assert_eq!(
            request.json(),
            Some(&json!({ "stockBySize": [{ "sizeId": "s1", "quantity": 7 }] }))
        );
    }

    #[test]
    fn test_parse_stock_rejects_garbage() {
        assert!(parse_stock(&["s1".to_string()]).is_err());
        assert!(parse_stock(&["s1=x".to_string()]).is_err());
        assert_eq!(parse_stock(&["s1 = 3".to_string()]).unwrap()[0].quantity, 3);
    }
}
