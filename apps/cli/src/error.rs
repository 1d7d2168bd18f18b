//! # CLI Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Vitrina                                │
//! │                                                                         │
//! │  vitrina checkout submit --email foo@bar                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → CliResult<T>                                 │  │
//! │  │         │                                                        │  │
//! │  │  Form invalid?  ─── CoreError::InvalidForm ──────┐              │  │
//! │  │  Storage?       ─── StoreError::QueryFailed ─────┤              │  │
//! │  │  Backend?       ─── ApiError::Server {..} ───────┼──► CliError  │  │
//! │  │  401?           ─── ApiError::Unauthorized ──────┘              │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  stderr:  error[VALIDATION_ERROR]: email has invalid format            │
//! │  --json:  { "code": "VALIDATION_ERROR", "message": "..." }             │
//! │  exit code 1                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;
use vitrina_api::ApiError;
use vitrina_core::{CoreError, ValidationError};
use vitrina_store::StoreError;

pub type CliResult<T> = Result<T, CliError>;

/// Error returned by every command.
///
/// ## Serialization
/// With `--json` this is what gets printed:
/// ```json
/// { "code": "NOT_LOGGED_IN", "message": "Session expired. Please log in again." }
/// ```
#[derive(Debug, Clone, Serialize, Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input rejected before any request
    ValidationError,

    /// No session, or the backend rejected it (401)
    NotLoggedIn,

    /// The backend answered with an error
    ServerError,

    /// The backend could not be reached
    NetworkError,

    /// Config file or setting problem
    ConfigError,

    /// Local storage failed
    StorageError,

    /// Cart operation failed
    CartError,

    /// Checkout step not allowed from the current state
    CheckoutError,

    /// Image upload failed
    UploadError,

    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotLoggedIn => "NOT_LOGGED_IN",
            ErrorCode::ServerError => "SERVER_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::CheckoutError => "CHECKOUT_ERROR",
            ErrorCode::UploadError => "UPLOAD_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn not_logged_in() -> Self {
        CliError::new(ErrorCode::NotLoggedIn, "Not logged in. Run `vitrina login` first.")
    }

    pub fn config(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ConfigError, message)
    }

    pub fn cart(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::CartError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

/// Converts API errors. Server messages pass through verbatim.
impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        let code = match &err {
            ApiError::Unauthorized => ErrorCode::NotLoggedIn,
            ApiError::Server { .. } | ApiError::InvalidResponse(_) => ErrorCode::ServerError,
            e if e.is_network() => ErrorCode::NetworkError,
            ApiError::Validation(_) => ErrorCode::ValidationError,
            ApiError::Upload(_) => ErrorCode::UploadError,
            ApiError::Credentials(_) => ErrorCode::StorageError,
            ApiError::Serialization(_) => ErrorCode::Internal,
            e if e.is_config_error() => ErrorCode::ConfigError,
            _ => ErrorCode::Internal,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(e) => CliError::validation(e.to_string()),
            other => {
                tracing::error!(error = %other, "Local storage failed");
                CliError::new(ErrorCode::StorageError, other.to_string())
            }
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ItemNotInCart { .. } | CoreError::EmptyCart => ErrorCode::CartError,
            CoreError::InvalidForm { .. } | CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::InvalidCheckoutTransition { .. } => ErrorCode::CheckoutError,
        };
        CliError::new(code, err.to_string())
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_mapping() {
        let err = CliError::from(ApiError::Server {
            status: 409,
            message: Some("Sin stock".into()),
        });
        assert_eq!(err.code, ErrorCode::ServerError);
        assert_eq!(err.message, "Sin stock");

        assert_eq!(CliError::from(ApiError::Unauthorized).code, ErrorCode::NotLoggedIn);
        assert_eq!(CliError::from(ApiError::Timeout).code, ErrorCode::NetworkError);
        assert_eq!(
            CliError::from(ApiError::MissingSetting("cloudinary.cloud_name".into())).code,
            ErrorCode::ConfigError
        );
    }

    #[test]
    fn test_serializes_code_and_message() {
        let json = serde_json::to_value(CliError::cart("Cart is empty")).unwrap();
        assert_eq!(json, serde_json::json!({ "code": "CART_ERROR", "message": "Cart is empty" }));
    }
}
