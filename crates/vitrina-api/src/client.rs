//! # API Client
//!
//! The single HTTP wrapper every service goes through.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      One API Call                                       │
//! │                                                                         │
//! │  client.get::<Product>("/product/p1", &[])                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  base_url + path + query (None values skipped)                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CredentialStore::session()                                            │
//! │       ├── Authorization: Bearer <token>                                │
//! │       └── x-tenant-id: <session.user.tenant_id>                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  HttpTransport::send()                                                 │
//! │       │                                                                 │
//! │       ├── 2xx ──► JSON body → T   (empty body → null)                 │
//! │       ├── 401 ──► CredentialStore::clear() → ApiError::Unauthorized   │
//! │       └── else ─► { "message": "..." | ["...", ...] }                  │
//! │                   → ApiError::Server { status, message }               │
//! │                                                                         │
//! │  No retries. A failure is returned to the caller once.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::Method;
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};
use url::Url;
use vitrina_core::Session;

use crate::error::{ApiError, ApiResult};
use crate::services::{
    AuthService, CatalogService, ExchangeService, PaymentService, ProductService, PublicService,
    SalesService, UserService,
};
use crate::transport::{ApiRequest, HttpTransport, RequestBody};

/// Header carrying the tenant of the logged-in user.
pub const TENANT_HEADER: &str = "x-tenant-id";

// =============================================================================
// Credential Store
// =============================================================================

/// Where the client reads the session from, and clears it on 401.
///
/// The CLI backs this with local storage; tests use [`MemoryCredentials`].
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn session(&self) -> ApiResult<Option<Session>>;
    async fn clear(&self) -> ApiResult<()>;
}

/// Session held in memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    session: Mutex<Option<Session>>,
}

impl MemoryCredentials {
    pub fn new(session: Option<Session>) -> Self {
        MemoryCredentials {
            session: Mutex::new(session),
        }
    }

    pub fn set(&self, session: Option<Session>) {
        *self.session.lock().unwrap_or_else(|p| p.into_inner()) = session;
    }

    pub fn current(&self) -> Option<Session> {
        self.session.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentials {
    async fn session(&self) -> ApiResult<Option<Session>> {
        Ok(self.current())
    }

    async fn clear(&self) -> ApiResult<()> {
        self.set(None);
        Ok(())
    }
}

// =============================================================================
// Error Body
// =============================================================================

/// `{ "message": "..." }` or `{ "message": ["...", "..."] }`.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<ErrorMessage>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

impl ErrorMessage {
    fn into_text(self) -> String {
        match self {
            ErrorMessage::One(text) => text,
            ErrorMessage::Many(lines) => lines.join(", "),
        }
    }
}

/// The message the server put in the body, if any.
fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(ErrorMessage::into_text)
        .filter(|m| !m.trim().is_empty())
}

// =============================================================================
// API Client
// =============================================================================

/// HTTP wrapper for the backend REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:3001/api`).
    pub fn new(
        base_url: &str,
        transport: Arc<dyn HttpTransport>,
        credentials: Arc<dyn CredentialStore>,
    ) -> ApiResult<Self> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(ApiClient {
            base_url,
            transport,
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Server origin: the base URL without a trailing `/api` segment.
    pub fn origin(&self) -> &str {
        self.base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url)
    }

    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        Arc::clone(&self.transport)
    }

    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.credentials)
    }

    /// Tenant id of the stored session, if any.
    pub async fn tenant_id(&self) -> ApiResult<Option<String>> {
        Ok(self
            .credentials
            .session()
            .await?
            .map(|s| s.user.tenant_id))
    }

    // =========================================================================
    // Services
    // =========================================================================

    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self)
    }

    pub fn products(&self) -> ProductService<'_> {
        ProductService::new(self)
    }

    pub fn catalog(&self) -> CatalogService<'_> {
        CatalogService::new(self)
    }

    pub fn sales(&self) -> SalesService<'_> {
        SalesService::new(self)
    }

    pub fn exchanges(&self) -> ExchangeService<'_> {
        ExchangeService::new(self)
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self)
    }

    pub fn payments(&self) -> PaymentService<'_> {
        PaymentService::new(self)
    }

    pub fn public(&self) -> PublicService<'_> {
        PublicService::new(self)
    }

    // =========================================================================
    // URL Building
    // =========================================================================

    /// Joins `path` onto the base URL and appends the query.
    ///
    /// `None` values are skipped; an all-`None` query adds no `?`.
    pub fn url(&self, path: &str, query: &[(&str, Option<String>)]) -> ApiResult<Url> {
        let mut url = Url::parse(&format!(
            "{}/{}",
            self.base_url,
            path.trim_start_matches('/')
        ))?;

        let present: Vec<(&str, &str)> = query
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
            .collect();

        if !present.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in present {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, Option<String>)],
    ) -> ApiResult<T> {
        let url = self.url(path, query)?;
        self.execute(Method::GET, url, RequestBody::Empty).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        self.execute(Method::POST, url, json_body(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        self.execute(Method::PUT, url, json_body(body)?).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        self.execute(Method::PATCH, url, json_body(body)?).await
    }

    /// DELETE, ignoring whatever body the server returns.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let url = self.url(path, &[])?;
        self.execute::<IgnoredAny>(Method::DELETE, url, RequestBody::Empty)
            .await?;
        Ok(())
    }

    /// Drops the stored session. Logout is local only.
    pub async fn logout(&self) -> ApiResult<()> {
        self.credentials.clear().await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: RequestBody,
    ) -> ApiResult<T> {
        let mut request = ApiRequest::new(method, url).header("Accept", "application/json");

        if matches!(body, RequestBody::Json(_)) {
            request = request.header("Content-Type", "application/json");
        }

        if let Some(session) = self.credentials.session().await? {
            request = request
                .header("Authorization", format!("Bearer {}", session.token))
                .header(TENANT_HEADER, session.user.tenant_id);
        }

        let request = request.body(body);
        let method = request.method.clone();
        let path = request.url.path().to_string();

        debug!(method = %method, path = %path, "API request");
        let response = self.transport.send(request).await.map_err(|e| {
            error!(method = %method, path = %path, error = %e, "API request failed");
            e
        })?;

        if response.is_success() {
            let body = if response.body.trim().is_empty() {
                "null"
            } else {
                response.body.as_str()
            };
            return serde_json::from_str(body).map_err(|e| {
                error!(path = %path, error = %e, "Unexpected response body");
                ApiError::InvalidResponse(format!("{} {}: {}", method, path, e))
            });
        }

        if response.status == 401 {
            warn!(path = %path, "Unauthorized, clearing stored session");
            if let Err(e) = self.credentials.clear().await {
                error!(error = %e, "Failed to clear session after 401");
            }
            return Err(ApiError::Unauthorized);
        }

        let err = ApiError::Server {
            status: response.status,
            message: server_message(&response.body),
        };
        error!(status = response.status, path = %path, message = %err, "API error");
        Err(err)
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<RequestBody> {
    Ok(RequestBody::Json(serde_json::to_value(body)?))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::transport::RecordingTransport;
    use serde_json::json;
    use vitrina_core::SessionUser;

    pub(crate) fn session() -> Session {
        Session {
            token: "tok-123".into(),
            user: SessionUser {
                id: "u1".into(),
                name: "Ana".into(),
                email: "ana@tienda.com".into(),
                tenant_id: "tenant-9".into(),
                role: Some("owner".into()),
            },
        }
    }

    /// Client over a recording transport, logged in or not.
    pub(crate) fn client(logged_in: bool) -> (ApiClient, Arc<RecordingTransport>, Arc<MemoryCredentials>) {
        let transport = Arc::new(RecordingTransport::new());
        let credentials = Arc::new(MemoryCredentials::new(logged_in.then(session)));
        let client = ApiClient::new(
            "http://localhost:3001/api/",
            transport.clone(),
            credentials.clone(),
        )
        .unwrap();
        (client, transport, credentials)
    }

    #[test]
    fn test_url_building_skips_none() {
        let (client, _, _) = client(false);

        let url = client
            .url(
                "/product",
                &[
                    ("search", Some("remera azul".into())),
                    ("category", None),
                    ("page", Some("2".into())),
                ],
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/api/product?search=remera+azul&page=2"
        );

        let bare = client.url("product", &[("category", None)]).unwrap();
        assert_eq!(bare.as_str(), "http://localhost:3001/api/product");
    }

    #[test]
    fn test_origin_strips_api_segment() {
        let (client, _, _) = client(false);
        assert_eq!(client.base_url(), "http://localhost:3001/api");
        assert_eq!(client.origin(), "http://localhost:3001");
    }

    #[tokio::test]
    async fn test_headers_when_logged_in() {
        let (client, transport, _) = client(true);
        transport.push_json(200, json!({ "id": "c1", "name": "Remeras" }));

        let _: serde_json::Value = client.post("/category", &json!({ "name": "Remeras" })).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.header_value("authorization"), Some("Bearer tok-123"));
        assert_eq!(request.header_value(TENANT_HEADER), Some("tenant-9"));
        assert_eq!(request.header_value("content-type"), Some("application/json"));
        assert_eq!(request.json(), Some(&json!({ "name": "Remeras" })));
    }

    #[tokio::test]
    async fn test_no_auth_headers_when_logged_out() {
        let (client, transport, _) = client(false);
        transport.push_json(200, json!([]));

        let _: Vec<serde_json::Value> = client.get("/public/store/x/products", &[]).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.header_value("authorization"), None);
        assert_eq!(request.header_value(TENANT_HEADER), None);
    }

    #[tokio::test]
    async fn test_401_clears_session() {
        let (client, transport, credentials) = client(true);
        transport.push_json(401, json!({ "message": "Unauthorized" }));

        let err = client.get::<serde_json::Value>("/sell", &[]).await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(credentials.current(), None);
    }

    #[tokio::test]
    async fn test_error_message_verbatim() {
        let (client, transport, _) = client(true);
        transport.push_json(400, json!({ "message": "El producto no existe" }));
        transport.push_json(
            400,
            json!({ "message": ["name should not be empty", "price must be positive"] }),
        );
        transport.push_raw(502, "<html>bad gateway</html>");

        let first = client.get::<serde_json::Value>("/product/x", &[]).await.unwrap_err();
        let second = client.get::<serde_json::Value>("/product/x", &[]).await.unwrap_err();
        let third = client.get::<serde_json::Value>("/product/x", &[]).await.unwrap_err();

        assert_eq!(first.server_message(), Some("El producto no existe"));
        assert_eq!(
            second.server_message(),
            Some("name should not be empty, price must be positive")
        );
        assert_eq!(third.status(), Some(502));
        assert_eq!(third.server_message(), None);
        assert_eq!(third.to_string(), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_empty_success_body_and_delete() {
        let (client, transport, _) = client(true);
        transport.push_raw(204, "");
        transport.push_json(200, json!({ "id": "p1", "deleted": true }));

        let unit: () = client.put("/payment/mercadopago/config", &json!({})).await.unwrap();
        assert_eq!(unit, ());
        client.delete("/product/p1").await.unwrap();

        assert_eq!(transport.requests()[1].method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_invalid_success_body() {
        let (client, transport, _) = client(true);
        transport.push_raw(200, "{\"unexpected\": true}");

        let err = client.get::<Vec<String>>("/category", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let (client, transport, _) = client(false);
        transport.push_error(ApiError::Timeout);

        let err = client.get::<serde_json::Value>("/public/store/x", &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::Timeout));
        assert_eq!(transport.request_count(), 1);
    }
}
