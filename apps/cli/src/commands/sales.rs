//! # Sales Commands
//!
//! ```text
//! vitrina sales register --item p1:M:2 --item p7:s3 --payment cash
//!      │
//!      ├── GET /product/:id for each line (price, discount, size names)
//!      └── POST /sell { items, total, paymentMethod }
//!
//! vitrina sales register --file day.json
//!      │  [ { items: [...], paymentMethod }, ... ]
//!      └── POST /sell one draft at a time; the first failure stops the run
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use vitrina_api::services::{CreateSaleRequest, DateRange, SaleQuery};
use vitrina_core::{Paginated, PaymentMethod, Sale, SaleItem, SaleStats};

use super::{find_size, require_session, LineSpec};
use crate::error::{CliError, CliResult};
use crate::render::{Message, Render};
use crate::state::AppContext;

/// A sale as written in a `--file` batch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub items: Vec<SaleItem>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<SaleDraft> for CreateSaleRequest {
    fn from(draft: SaleDraft) -> Self {
        let mut request = CreateSaleRequest::new(draft.items, draft.payment_method);
        request.customer_name = draft.customer_name;
        request.notes = draft.notes;
        request
    }
}

/// Failure that stopped a batch.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkFailure {
    /// Zero-based position of the failed draft.
    pub index: usize,
    pub error: CliError,
}

/// Outcome of a batch registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkView {
    pub created: Vec<Sale>,
    pub submitted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<BulkFailure>,
}

impl Render for BulkView {
    fn render(&self) -> String {
        let mut out = format!("Registered {} of {} sales.", self.created.len(), self.submitted);
        for sale in &self.created {
            out.push_str(&format!("\n  {}  {}  {}", sale.id, sale.payment_method, sale.total));
        }
        if let Some(failure) = &self.failure {
            out.push_str(&format!(
                "\nSale #{} failed: {}. Later sales were not sent.",
                failure.index + 1,
                failure.error.message
            ));
        }
        out
    }
}

pub async fn list(ctx: &AppContext, query: &SaleQuery) -> CliResult<Paginated<Sale>> {
    require_session(ctx).await?;
    Ok(ctx.client.sales().list(query).await?)
}

pub async fn show(ctx: &AppContext, id: &str) -> CliResult<Sale> {
    require_session(ctx).await?;
    Ok(ctx.client.sales().get(id).await?)
}

pub async fn delete(ctx: &AppContext, id: &str) -> CliResult<Message> {
    require_session(ctx).await?;
    ctx.client.sales().delete(id).await?;
    Ok(Message::new(format!("Sale {} deleted.", id)))
}

pub async fn stats(ctx: &AppContext, range: DateRange) -> CliResult<SaleStats> {
    require_session(ctx).await?;
    Ok(ctx.client.sales().stats(range).await?)
}

/// Builds sale lines from the admin product catalog.
pub(crate) async fn lines_from_specs(ctx: &AppContext, specs: &[LineSpec]) -> CliResult<Vec<SaleItem>> {
    let mut items = Vec::with_capacity(specs.len());
    for spec in specs {
        let product = ctx.client.products().get(&spec.product_id).await?;
        let size = find_size(&product, &spec.size).ok_or_else(|| {
            CliError::validation(format!("{} has no size '{}'", product.name, spec.size))
        })?;
        if spec.quantity > size.quantity {
            warn!(
                product_id = %product.id,
                size_id = %size.size_id,
                requested = spec.quantity,
                stock = size.quantity,
                "Selling more than the recorded stock"
            );
        }

        items.push(SaleItem {
            product_id: product.id.clone(),
            product_name: Some(product.name.clone()),
            size_id: size.size_id.clone(),
            size_name: Some(size.size_name.clone()),
            quantity: spec.quantity,
            price: product.price,
            discount: product.discount,
        });
    }
    Ok(items)
}

/// Records one sale from `product:size[:quantity]` lines.
pub async fn register(
    ctx: &AppContext,
    specs: &[LineSpec],
    payment_method: PaymentMethod,
    customer_name: Option<String>,
    notes: Option<String>,
) -> CliResult<Sale> {
    require_session(ctx).await?;
    if specs.is_empty() {
        return Err(CliError::validation("Give at least one --item product:size[:quantity]"));
    }

    let items = lines_from_specs(ctx, specs).await?;
    let mut request = CreateSaleRequest::new(items, payment_method);
    request.customer_name = customer_name.filter(|n| !n.trim().is_empty());
    request.notes = notes.filter(|n| !n.trim().is_empty());

    Ok(ctx.client.sales().create(&request).await?)
}

/// Registers every draft in a JSON file, in order.
pub async fn register_file(ctx: &AppContext, path: &Path) -> CliResult<BulkView> {
    require_session(ctx).await?;
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CliError::validation(format!("Cannot read {}: {}", path.display(), e)))?;
    let drafts: Vec<SaleDraft> = serde_json::from_str(&text)
        .map_err(|e| CliError::validation(format!("Invalid sales file {}: {}", path.display(), e)))?;
    register_drafts(ctx, drafts).await
}

pub(crate) async fn register_drafts(ctx: &AppContext, drafts: Vec<SaleDraft>) -> CliResult<BulkView> {
    if drafts.is_empty() {
        return Err(CliError::validation("The sales file has no sales"));
    }

    let requests: Vec<CreateSaleRequest> = drafts.into_iter().map(CreateSaleRequest::from).collect();
    let outcome = ctx.client.sales().register_many(&requests).await;
    info!(
        submitted = requests.len(),
        created = outcome.created.len(),
        complete = outcome.is_complete(),
        "Batch registration finished"
    );

    Ok(BulkView {
        submitted: requests.len(),
        failure: outcome.failed.map(|(index, error)| BulkFailure {
            index,
            error: error.into(),
        }),
        created: outcome.created,
    })
}
