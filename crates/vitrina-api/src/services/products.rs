//! # Product Service
//!
//! Admin-side catalog of the current tenant: listing with filters, CRUD
//! and per-size stock updates.

use serde::Serialize;
use tracing::info;
use vitrina_core::money::major_units;
use vitrina_core::validation::{validate_name, validate_optional_text, validate_search_query};
use vitrina_core::{DiscountRate, Money, Paginated, Product};

use super::{segment, Listing};
use crate::client::ApiClient;
use crate::error::ApiResult;

// =============================================================================
// Requests
// =============================================================================

/// Filters for `GET /product`. Unset fields are left out of the query.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<String>,
    pub gender_id: Option<String>,
    pub type_id: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ProductQuery {
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    pub(crate) fn to_query(&self) -> ApiResult<Vec<(&'static str, Option<String>)>> {
        let search = match &self.search {
            Some(text) => validate_search_query(text)?,
            None => None,
        };

        Ok(vec![
            ("search", search),
            ("categoryId", self.category_id.clone()),
            ("brandId", self.brand_id.clone()),
            ("genderId", self.gender_id.clone()),
            ("typeId", self.type_id.clone()),
            ("page", self.page.map(|p| p.to_string())),
            ("limit", self.limit.map(|l| l.to_string())),
        ])
    }
}

/// Stock for one size, as sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdate {
    pub size_id: String,
    pub quantity: u32,
}

/// Body for creating or updating a product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "major_units")]
    pub price: Money,
    pub discount: DiscountRate,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stock_by_size: Vec<StockUpdate>,
}

impl ProductInput {
    pub fn validate(&self) -> ApiResult<()> {
        validate_name("name", &self.name)?;
        validate_optional_text("description", self.description.as_deref())?;
        if self.price.is_negative() {
            return Err(vitrina_core::ValidationError::MustBePositive {
                field: "price".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

// =============================================================================
// Service
// =============================================================================

pub struct ProductService<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        ProductService { client }
    }

    pub async fn list(&self, query: &ProductQuery) -> ApiResult<Paginated<Product>> {
        let listing: Listing<Product> = self.client.get("/product", &query.to_query()?).await?;
        Ok(listing.into_page())
    }

    pub async fn get(&self, id: &str) -> ApiResult<Product> {
        self.client
            .get(&format!("/product/{}", segment(id)), &[])
            .await
    }

    pub async fn create(&self, input: &ProductInput) -> ApiResult<Product> {
        input.validate()?;
        let product: Product = self.client.post("/product", input).await?;
        info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn update(&self, id: &str, input: &ProductInput) -> ApiResult<Product> {
        input.validate()?;
        self.client
            .patch(&format!("/product/{}", segment(id)), input)
            .await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/product/{}", segment(id))).await?;
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Replaces the per-size stock of a product.
    pub async fn update_stock(&self, id: &str, sizes: &[StockUpdate]) -> ApiResult<Product> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'b> {
            stock_by_size: &'b [StockUpdate],
        }

        self.client
            .patch(
                &format!("/product/{}/stock", segment(id)),
                &Body {
                    stock_by_size: sizes,
                },
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use crate::error::ApiError;
    use reqwest::Method;
    use serde_json::json;

    fn product_json() -> serde_json::Value {
        json!({
            "id": "p1",
            "name": "Remera",
            "price": 12500,
            "discount": 0,
            "stockBySize": [{ "sizeId": "s1", "sizeName": "M", "quantity": 4 }]
        })
    }

    #[tokio::test]
    async fn test_list_builds_query() {
        let (client, transport, _) = client(true);
        transport.push_json(200, json!({ "data": [product_json()], "total": 1, "page": 1, "limit": 20 }));

        let query = ProductQuery {
            category_id: Some("c1".into()),
            ..ProductQuery::default()
        }
        .search("  remera ")
        .page(1, 20);
        let page = client.products().list(&query).await.unwrap();

        assert_eq!(page.data.len(), 1);
        let url = &transport.requests()[0].url;
        assert_eq!(
            url.query(),
            Some("search=remera&categoryId=c1&page=1&limit=20")
        );
    }

    #[tokio::test]
    async fn test_update_stock_patches_sizes() {
        let (client, transport, _) = client(true);
        transport.push_json(200, product_json());

        let sizes = [StockUpdate {
            size_id: "s1".into(),
            quantity: 4,
        }];
        client.products().update_stock("p1", &sizes).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.url.path(), "/api/product/p1/stock");
        assert_eq!(
            request.json(),
            Some(&json!({ "stockBySize": [{ "sizeId": "s1", "quantity": 4 }] }))
        );
    }

    #[tokio::test]
    async fn test_create_validates_before_request() {
        let (client, transport, _) = client(true);
        let input = ProductInput {
            name: "  ".into(),
            description: None,
            price: Money::from_cents(1000),
            discount: DiscountRate::zero(),
            images: vec![],
            category_id: None,
            brand_id: None,
            gender_id: None,
            type_id: None,
            color_id: None,
            stock_by_size: vec![],
        };

        let err = client.products().create(&input).await.unwrap_err();

        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(transport.request_count(), 0);
    }
}
