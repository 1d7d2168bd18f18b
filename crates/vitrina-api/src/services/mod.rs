//! # Resource Services
//!
//! One thin service per backend resource. Each method is a single request
//! through [`ApiClient`](crate::client::ApiClient); the services hold no
//! state of their own.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  client.products().list(&query)   → GET    /product?search=...         │
//! │  client.sales().create(&req)      → POST   /sell                       │
//! │  client.users().delete(id)        → DELETE /user/tenant-users/:id      │
//! │  client.public().store(sub)       → GET    /public/store/:sub          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod catalog;
pub mod exchanges;
pub mod payments;
pub mod products;
pub mod public;
pub mod sales;
pub mod users;

pub use auth::{AuthService, LoginRequest};
pub use catalog::{CatalogKind, CatalogService};
pub use exchanges::{CreateExchangeRequest, ExchangeService};
pub use payments::PaymentService;
pub use products::{ProductInput, ProductQuery, ProductService, StockUpdate};
pub use public::PublicService;
pub use sales::{BulkOutcome, CreateSaleRequest, DateRange, SaleQuery, SalesService};
pub use users::{CreateUserRequest, UserService};

use serde::Deserialize;
use vitrina_core::Paginated;

/// List endpoints answer either with a page envelope or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Paged(Paginated<T>),
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    pub(crate) fn into_page(self) -> Paginated<T> {
        match self {
            Listing::Paged(page) => page,
            Listing::Bare(data) => {
                let total = data.len() as u64;
                Paginated {
                    limit: data.len() as u32,
                    data,
                    total,
                    page: 1,
                }
            }
        }
    }
}

/// Encodes one path segment (ids and subdomains come from user input).
pub(crate) fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.trim().as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
