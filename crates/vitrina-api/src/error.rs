//! # API Error Types
//!
//! Error types for configuration, transport and backend failures.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       API Error Categories                              │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Backend             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Unauthorized (401)     │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Server { status, msg } │ │
//! │  │  ConfigLoad/Save│  │  Request        │  │  InvalidResponse        │ │
//! │  │  MissingSetting │  │                 │  │  Upload (Cloudinary)    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │  Local input    │  │  Credentials    │                              │
//! │  │  Validation     │  │  Credentials    │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use vitrina_core::ValidationError;

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Every way a call to the backend (or Cloudinary) can fail.
#[derive(Debug, Error)]
pub enum ApiError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid URL (base URL, or a path that does not join).
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A setting the operation needs is not configured.
    #[error("Missing setting: {0}")]
    MissingSetting(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The server could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The request could not be built or sent.
    #[error("Request failed: {0}")]
    Request(String),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    /// 401: stored credentials were cleared.
    #[error("Session expired. Please log in again.")]
    Unauthorized,

    /// Any other non-2xx answer. `message` is the server's text verbatim,
    /// `None` when the body carried none.
    #[error("{}", describe_status(.status, .message))]
    Server { status: u16, message: Option<String> },

    /// A 2xx body that does not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Cloudinary rejected the upload.
    #[error("Upload failed: {0}")]
    Upload(String),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Reading or clearing stored credentials failed.
    #[error("Credential storage failed: {0}")]
    Credentials(String),

    /// Failed to serialize a request body.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::ConnectionFailed(err.to_string())
        } else {
            ApiError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization(err.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ApiError {
    fn from(err: toml::ser::Error) -> Self {
        ApiError::ConfigSaveFailed(err.to_string())
    }
}

/// Server text, or the canonical reason for the status.
fn describe_status(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(text) => text.clone(),
        None => reqwest::StatusCode::from_u16(*status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .map_or_else(|| format!("HTTP {}", status), str::to_string),
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ApiError {
    /// HTTP status behind the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The server's own message, when it sent one.
    ///
    /// Checkout shows this verbatim and falls back to a generic text.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the server could not be reached at all.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ApiError::ConnectionFailed(_) | ApiError::Timeout | ApiError::Request(_)
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ApiError::InvalidConfig(_)
                | ApiError::InvalidUrl(_)
                | ApiError::MissingSetting(_)
                | ApiError::ConfigLoadFailed(_)
                | ApiError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_verbatim() {
        let err = ApiError::Server {
            status: 409,
            message: Some("Sin stock para Remera (M)".into()),
        };
        assert_eq!(err.to_string(), "Sin stock para Remera (M)");
        assert_eq!(err.server_message(), Some("Sin stock para Remera (M)"));
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_status_reason_is_display_only() {
        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(err.server_message(), None);

        let odd = ApiError::Server {
            status: 599,
            message: None,
        };
        assert_eq!(odd.to_string(), "HTTP 599");
    }

    #[test]
    fn test_categories() {
        assert!(ApiError::Timeout.is_network());
        assert!(!ApiError::Unauthorized.is_network());
        assert_eq!(ApiError::Unauthorized.status(), Some(401));
        assert!(ApiError::MissingSetting("cloudinary.cloud_name".into()).is_config_error());
        assert_eq!(ApiError::Timeout.server_message(), None);
    }
}
