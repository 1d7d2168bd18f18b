//! # vitrina-api: REST Client for the Vitrina Backend
//!
//! Talks to the multi-tenant storefront backend and to Cloudinary.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vitrina Architecture                             │
//! │                                                                         │
//! │  vitrina CLI ─── commands ───┐                                          │
//! │                              ▼                                          │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 vitrina-api (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │  config ──► ApiClient ──► services::{auth, products, ...}       │   │
//! │  │                 │                                               │   │
//! │  │                 ├── CredentialStore  (token + tenant id)        │   │
//! │  │                 └── HttpTransport    (reqwest / recorder)       │   │
//! │  │                                                                 │   │
//! │  │  upload::CloudinaryUploader ──► api.cloudinary.com              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │                              ▼                                          │
//! │               Backend REST API  (VITRINA_API_URL)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`client`] - The HTTP wrapper, headers and response handling
//! - [`services`] - One service per backend resource
//! - [`upload`] - Cloudinary unsigned uploads
//! - [`transport`] - Transport trait and implementations
//! - [`config`] - Layered configuration
//! - [`error`] - API error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitrina_api::{ApiClient, MemoryCredentials, ReqwestTransport, VitrinaConfig};
//!
//! let config = VitrinaConfig::load(None)?;
//! let transport = Arc::new(ReqwestTransport::new(config.timeout())?);
//! let client = ApiClient::new(config.base_url(), transport, Arc::new(MemoryCredentials::default()))?;
//!
//! let store = client.public().store("sol").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod client;
pub mod config;
pub mod error;
pub mod services;
pub mod transport;
pub mod upload;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{ApiClient, CredentialStore, MemoryCredentials, TENANT_HEADER};
pub use config::VitrinaConfig;
pub use error::{ApiError, ApiResult};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport, RequestBody};
pub use upload::CloudinaryUploader;

#[cfg(any(test, feature = "test-util"))]
pub use transport::RecordingTransport;
