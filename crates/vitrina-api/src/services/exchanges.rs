//! Product exchanges against prior sales.

use serde::Serialize;
use tracing::info;
use vitrina_core::validation::{validate_optional_text, validate_quantity, validate_required};
use vitrina_core::{Exchange, ExchangeItem, Money, PaymentMethod, ValidationError};

use super::{segment, Listing};
use crate::client::ApiClient;
use crate::error::ApiResult;

/// Body of `POST /exchange`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExchangeRequest {
    pub sale_id: String,
    pub returned_items: Vec<ExchangeItem>,
    pub new_items: Vec<ExchangeItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateExchangeRequest {
    /// What the customer owes (positive) or gets back (negative).
    pub fn price_difference(&self) -> Money {
        let returned: Money = self.returned_items.iter().map(ExchangeItem::line_total).sum();
        let taken: Money = self.new_items.iter().map(ExchangeItem::line_total).sum();
        taken - returned
    }

    pub fn validate(&self) -> ApiResult<()> {
        validate_required("sale_id", &self.sale_id)?;
        if self.returned_items.is_empty() {
            return Err(ValidationError::Required {
                field: "returned_items".to_string(),
            }
            .into());
        }
        for item in self.returned_items.iter().chain(&self.new_items) {
            validate_quantity(item.quantity)?;
        }
        if self.price_difference().is_positive() && self.payment_method.is_none() {
            return Err(ValidationError::Required {
                field: "payment_method".to_string(),
            }
            .into());
        }
        validate_optional_text("notes", self.notes.as_deref())?;
        Ok(())
    }
}

pub struct ExchangeService<'a> {
    client: &'a ApiClient,
}

impl<'a> ExchangeService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        ExchangeService { client }
    }

    pub async fn list(&self) -> ApiResult<Vec<Exchange>> {
        let listing: Listing<Exchange> = self.client.get("/exchange", &[]).await?;
        Ok(listing.into_page().data)
    }

    pub async fn get(&self, id: &str) -> ApiResult<Exchange> {
        self.client
            .get(&format!("/exchange/{}", segment(id)), &[])
            .await
    }

    pub async fn create(&self, request: &CreateExchangeRequest) -> ApiResult<Exchange> {
        request.validate()?;
        let exchange: Exchange = self.client.post("/exchange", request).await?;
        info!(
            exchange_id = %exchange.id,
            sale_id = %exchange.sale_id,
            difference = %exchange.price_difference,
            "Exchange recorded"
        );
        Ok(exchange)
    }
}
