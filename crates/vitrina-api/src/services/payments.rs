//! # MercadoPago Payments
//!
//! Tenant-side MercadoPago configuration and checkout preferences.
//!
//! ```text
//! Admin                                   Storefront
//!   │ save_config(public key, token)        │ order created
//!   ▼                                       ▼
//! PUT /payment/mercadopago/config     POST /payment/mercadopago/preference
//!                                           │
//!                                           ▼
//!                                     init_point (URL the customer opens)
//!
//! MercadoPago notifies {origin}/api/payment/webhook/{tenantId}; the client
//! only shows that URL so the admin can paste it in the MercadoPago panel.
//! ```

use serde::Serialize;
use tracing::info;
use vitrina_core::validation::validate_required;
use vitrina_core::{MercadoPagoConfig, PaymentPreference};

use crate::client::ApiClient;
use crate::error::ApiResult;

pub struct PaymentService<'a> {
    client: &'a ApiClient,
}

impl<'a> PaymentService<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        PaymentService { client }
    }

    pub async fn get_config(&self) -> ApiResult<MercadoPagoConfig> {
        let config: Option<MercadoPagoConfig> =
            self.client.get("/payment/mercadopago/config", &[]).await?;
        Ok(config.unwrap_or_default())
    }

    pub async fn save_config(&self, config: &MercadoPagoConfig) -> ApiResult<()> {
        if config.enabled {
            validate_required("public_key", config.public_key.as_deref().unwrap_or(""))?;
            validate_required("access_token", config.access_token.as_deref().unwrap_or(""))?;
        }
        let _: serde::de::IgnoredAny = self
            .client
            .put("/payment/mercadopago/config", config)
            .await?;
        info!(enabled = config.enabled, "MercadoPago config saved");
        Ok(())
    }

    /// Creates a checkout preference for an order.
    pub async fn create_preference(&self, order_id: &str) -> ApiResult<PaymentPreference> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body<'b> {
            order_id: &'b str,
        }

        validate_required("order_id", order_id)?;
        let preference: PaymentPreference = self
            .client
            .post("/payment/mercadopago/preference", &Body { order_id })
            .await?;
        info!(order_id = %order_id, preference_id = %preference.id, "Payment preference created");
        Ok(preference)
    }

    /// URL MercadoPago notifies for this tenant. Informational only.
    pub fn webhook_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/api/payment/webhook/{}",
            self.client.origin(),
            tenant_id.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client;
    use reqwest::Method;
    use serde_json::json;

    #[test]
    fn test_webhook_url() {
        let (client, _, _) = client(false);
        assert_eq!(
            client.payments().webhook_url("tenant-9"),
            "http://localhost:3001/api/payment/webhook/tenant-9"
        );
    }

    #[tokio::test]
    async fn test_missing_config_is_default() {
        let (client, transport, _) = client(true);
        transport.push_raw(200, "");

        let config = client.payments().get_config().await.unwrap();
        assert!(!config.enabled);
        assert!(config.access_token.is_none());
    }

    #[tokio::test]
    async fn test_save_config_requires_keys_when_enabled() {
        let (client, transport, _) = client(true);
        let config = MercadoPagoConfig {
            public_key: Some("APP_USR-pk".into()),
            access_token: None,
            enabled: true,
        };

        assert!(client.payments().save_config(&config).await.is_err());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_create_preference() {
        let (client, transport, _) = client(true);
        transport.push_json(
            201,
            json!({ "id": "pref-1", "initPoint": "https://mp.com/checkout?pref=1" }),
        );

        let preference = client.payments().create_preference("o-77").await.unwrap();

        assert_eq!(preference.init_point, "https://mp.com/checkout?pref=1");
        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.json(), Some(&json!({ "orderId": "o-77" })));
    }
}
