//! # Sales Service
//!
//! Sales recorded by the tenant, plus bulk registration and stats.
//!
//! ## Bulk Registration
//! ```text
//! register_many([s1, s2, s3, s4])
//!      │
//!      ├── POST /sell s1 ── ok ──► created = [s1]
//!      ├── POST /sell s2 ── ok ──► created = [s1, s2]
//!      ├── POST /sell s3 ── ERR ─► stop
//!      │
//!      ▼
//! BulkOutcome { created: [s1, s2], failed: Some((2, err)) }
//!
//! Requests are awaited one at a time. Nothing is rolled back.
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, info};
use vitrina_core::money::major_units;
use vitrina_core::validation::{validate_optional_text, validate_quantity};
use vitrina_core::{Money, Paginated, PaymentMethod, Sale, SaleItem, SaleStats, ValidationError};

use super::{segment, Listing};
use crate::client::ApiClient;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Requests
// =============================================================================

/// Inclusive date range for listings and stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    fn to_query(self) -> [(&'static str, Option<String>); 2] {
        [
            ("startDate", self.from.map(|d| d.format("%Y-%m-%d").to_string())),
            ("endDate", self.to.map(|d| d.format("%Y-%m-%d").to_string())),
        ]
    }
}

#[derive(Debug, Clone, Default)]
pub struct SaleQuery {
    pub range: DateRange,
    pub payment_method: Option<PaymentMethod>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl SaleQuery {
    fn to_query(&self) -> Vec<(&'static str, Option<String>)> {
        let mut query: Vec<(&'static str, Option<String>)> = self.range.to_query().into();
        query.push(("paymentMethod", self.payment_method.map(|m| m.to_string())));
        query.push(("page", self.page.map(|p| p.to_string())));
        query.push(("limit", self.limit.map(|l| l.to_string())));
        query
    }
}

/// Body of `POST /sell`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub items: Vec<SaleItem>,
    #[serde(with = "major_units")]
    pub total: Money,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateSaleRequest {
    /// Builds a request whose total is the sum of the line totals.
    pub fn new(items: Vec<SaleItem>, payment_method: PaymentMethod) -> Self {
        let total = items.iter().map(SaleItem::line_total).sum();
        CreateSaleRequest {
            items,
            total,
            payment_method,
            customer_name: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> ApiResult<()> {
        if self.items.is_empty() {
            return Err(ValidationError::Required {
                field: "items".to_string(),
            }
            .into());
        }
        for item in &self.items {
            validate_quantity(item.quantity)?;
        }
        validate_optional_text("notes", self.notes.as_deref())?;
        Ok(())
    }
}

/// Result of [`SalesService::register_many`].
#[derive(Debug)]
pub struct BulkOutcome {
    /// Sales created before the first failure, in submission order.
    pub created: Vec<Sale>,
    /// Index of the request that failed and its error.
    pub failed: Option<(usize, ApiError)>,
}

impl BulkOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

// =============================================================================
// Service
// =============================================================================

pub struct SalesService<'a> {
    client: &'a ApiClient,
}

impl<'a> SalesService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        SalesService { client }
    }

    pub async fn list(&self, query: &SaleQuery) -> ApiResult<Paginated<Sale>> {
        let listing: Listing<Sale> = self.client.get("/sell", &query.to_query()).await?;
        Ok(listing.into_page())
    }

    pub async fn get(&self, id: &str) -> ApiResult<Sale> {
        self.client.get(&format!("/sell/{}", segment(id)), &[]).await
    }

    pub async fn create(&self, request: &CreateSaleRequest) -> ApiResult<Sale> {
        request.validate()?;
        let sale: Sale = self.client.post("/sell", request).await?;
        info!(sale_id = %sale.id, total = %sale.total, method = %sale.payment_method, "Sale registered");
        Ok(sale)
    }

    pub async fn delete(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&format!("/sell/{}", segment(id))).await?;
        info!(sale_id = %id, "Sale deleted");
        Ok(())
    }

    /// Creates each sale in turn and stops at the first failure.
    pub async fn register_many(&self, requests: &[CreateSaleRequest]) -> BulkOutcome {
        let mut created = Vec::with_capacity(requests.len());

        for (index, request) in requests.iter().enumerate() {
            match self.create(request).await {
                Ok(sale) => created.push(sale),
                Err(e) => {
                    error!(index, created = created.len(), error = %e, "Bulk sale registration stopped");
                    return BulkOutcome {
                        created,
                        failed: Some((index, e)),
                    };
                }
            }
        }

        info!(count = created.len(), "Bulk sale registration complete");
        BulkOutcome {
            created,
            failed: None,
        }
    }

    pub async fn stats(&self, range: DateRange) -> ApiResult<SaleStats> {
        self.client.get("/sell/stats", &range.to_query()).await
    }
}
