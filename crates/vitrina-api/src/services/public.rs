//! # Public Storefront
//!
//! Unauthenticated endpoints of a storefront resolved by subdomain:
//! store info, the visible catalog and order placement.

use tracing::info;
use vitrina_core::checkout::CreateOrderRequest;
use vitrina_core::validation::validate_subdomain;
use vitrina_core::{Order, Paginated, Product, StoreInfo};

use super::products::ProductQuery;
use super::{segment, Listing};
use crate::client::ApiClient;
use crate::error::ApiResult;

pub struct PublicService<'a> {
    client: &'a ApiClient,
}

impl<'a> PublicService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        PublicService { client }
    }

    fn subdomain(subdomain: &str) -> ApiResult<String> {
        let subdomain = subdomain.trim();
        validate_subdomain(subdomain)?;
        Ok(segment(subdomain))
    }

    pub async fn store(&self, subdomain: &str) -> ApiResult<StoreInfo> {
        let sub = Self::subdomain(subdomain)?;
        self.client.get(&format!("/public/store/{}", sub), &[]).await
    }

    pub async fn products(&self, subdomain: &str, query: &ProductQuery) -> ApiResult<Paginated<Product>> {
        let sub = Self::subdomain(subdomain)?;
        let listing: Listing<Product> = self
            .client
            .get(&format!("/public/store/{}/products", sub), &query.to_query()?)
            .await?;
        Ok(listing.into_page())
    }

    pub async fn product(&self, subdomain: &str, id: &str) -> ApiResult<Product> {
        let sub = Self::subdomain(subdomain)?;
        self.client
            .get(&format!("/public/store/{}/products/{}", sub, segment(id)), &[])
            .await
    }

    pub async fn create_order(&self, subdomain: &str, request: &CreateOrderRequest) -> ApiResult<Order> {
        let sub = Self::subdomain(subdomain)?;
        let order: Order = self
            .client
            .post(&format!("/public/order/{}", sub), request)
            .await?;
        info!(order_id = %order.id, subdomain = %subdomain, total = %order.total, "Order created");
        Ok(order)
    }

    pub async fn order(&self, subdomain: &str, id: &str) -> ApiResult<Order> {
        let sub = Self::subdomain(subdomain)?;
        self.client
            .get(&format!("/public/order/{}/{}", sub, segment(id)), &[])
            .await
    }
}
