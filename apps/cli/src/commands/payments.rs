//! # Payment Commands
//!
//! MercadoPago settings for the logged-in tenant. The access token is
//! never printed in full.

use serde::Serialize;
use vitrina_core::MercadoPagoConfig;

use super::require_session;
use crate::error::CliResult;
use crate::render::{Message, Render};
use crate::state::AppContext;

/// MercadoPago settings with the access token masked.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigView {
    pub enabled: bool,
    pub public_key: Option<String>,
    pub access_token: Option<String>,
}

impl From<&MercadoPagoConfig> for PaymentConfigView {
    fn from(config: &MercadoPagoConfig) -> Self {
        PaymentConfigView {
            enabled: config.enabled,
            public_key: config.public_key.clone(),
            access_token: config.masked_access_token(),
        }
    }
}

impl Render for PaymentConfigView {
    fn render(&self) -> String {
        format!(
            "MercadoPago: {}\nPublic key:   {}\nAccess token: {}",
            if self.enabled { "enabled" } else { "disabled" },
            self.public_key.as_deref().unwrap_or("-"),
            self.access_token.as_deref().unwrap_or("-"),
        )
    }
}

/// Changes to apply on top of the stored settings.
#[derive(Debug, Clone, Default)]
pub struct PaymentUpdate {
    pub public_key: Option<String>,
    pub access_token: Option<String>,
    pub enabled: Option<bool>,
}

pub async fn show(ctx: &AppContext) -> CliResult<PaymentConfigView> {
    require_session(ctx).await?;
    let config = ctx.client.payments().get_config().await?;
    Ok(PaymentConfigView::from(&config))
}

/// Merges the update into the current settings and saves them.
pub async fn set(ctx: &AppContext, update: PaymentUpdate) -> CliResult<PaymentConfigView> {
    require_session(ctx).await?;
    let mut config = ctx.client.payments().get_config().await?;

    if let Some(key) = update.public_key {
        config.public_key = Some(key.trim().to_string()).filter(|k| !k.is_empty());
    }
    if let Some(token) = update.access_token {
        config.access_token = Some(token.trim().to_string()).filter(|t| !t.is_empty());
    }
    if let Some(enabled) = update.enabled {
        config.enabled = enabled;
    }

    ctx.client.payments().save_config(&config).await?;
    Ok(PaymentConfigView::from(&config))
}

/// The notification URL to paste in the MercadoPago panel.
pub async fn webhook(ctx: &AppContext) -> CliResult<Message> {
    let session = require_session(ctx).await?;
    Ok(Message::new(ctx.client.payments().webhook_url(session.tenant_id())))
}
