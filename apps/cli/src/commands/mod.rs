//! # Commands Module
//!
//! One module per command group. Each command takes the [`AppContext`]
//! and its arguments and returns a value that implements
//! [`Render`](crate::render::Render); printing is left to the caller.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (shared helpers)
//! ├── auth.rs       ◄─── login, logout, whoami
//! ├── store.rs      ◄─── public store info
//! ├── products.rs   ◄─── catalog browsing, stock
//! ├── cart.rs       ◄─── cart manipulation
//! ├── checkout.rs   ◄─── order submission and payment choice
//! ├── sales.rs      ◄─── sales bookkeeping
//! ├── exchanges.rs  ◄─── exchanges against sales
//! ├── users.rs      ◄─── tenant users and permissions
//! ├── catalog.rs    ◄─── categories, brands, sizes, ...
//! ├── payments.rs   ◄─── MercadoPago settings
//! ├── upload.rs     ◄─── Cloudinary image upload
//! └── config.rs     ◄─── local configuration
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod exchanges;
pub mod payments;
pub mod products;
pub mod sales;
pub mod store;
pub mod upload;
pub mod users;

use std::str::FromStr;
use vitrina_core::{Product, Session, SizeStock};

use crate::error::{CliError, CliResult};
use crate::state::AppContext;

/// The stored session, or a "log in first" error.
pub(crate) async fn require_session(ctx: &AppContext) -> CliResult<Session> {
    ctx.storage()
        .session()
        .get()
        .await?
        .ok_or_else(CliError::not_logged_in)
}

/// Finds a size by id, falling back to a case-insensitive name match.
pub(crate) fn find_size<'a>(product: &'a Product, size: &str) -> Option<&'a SizeStock> {
    product.size(size).or_else(|| {
        product
            .stock_by_size
            .iter()
            .find(|s| s.size_name.eq_ignore_ascii_case(size))
    })
}

/// `product:size[:quantity]` as typed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSpec {
    pub product_id: String,
    pub size: String,
    pub quantity: u32,
}

impl FromStr for LineSpec {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let invalid = || CliError::validation(format!("Expected product:size[:quantity], got '{}'", s));

        let (product_id, size, quantity) = match parts.as_slice() {
            [product, size] => (*product, *size, 1),
            [product, size, qty] => (
                *product,
                *size,
                qty.parse::<u32>().map_err(|_| invalid())?,
            ),
            _ => return Err(invalid()),
        };

        if product_id.is_empty() || size.is_empty() || quantity == 0 {
            return Err(invalid());
        }

        Ok(LineSpec {
            product_id: product_id.to_string(),
            size: size.to_string(),
            quantity,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use vitrina_api::{RecordingTransport, VitrinaConfig};
    use vitrina_core::{Session, SessionUser};
    use vitrina_store::{LocalStorage, StorageConfig};

    use crate::state::AppContext;

    pub(crate) fn session() -> Session {
        Session {
            token: "tok-1".into(),
            user: SessionUser {
                id: "u1".into(),
                name: "Ana".into(),
                email: "ana@tienda.com".into(),
                tenant_id: "tenant-9".into(),
                role: Some("owner".into()),
            },
        }
    }

    /// Context over in-memory storage and a recording transport, with
    /// the store `sol` selected.
    pub(crate) async fn context(logged_in: bool) -> (AppContext, Arc<RecordingTransport>) {
        let storage = LocalStorage::open(StorageConfig::in_memory()).await.unwrap();
        if logged_in {
            storage.session().save(&session()).await.unwrap();
        }

        let mut config = VitrinaConfig::default();
        config.store.subdomain = Some("sol".into());
        config.cloudinary.cloud_name = Some("demo".into());
        config.cloudinary.upload_preset = Some("unsigned".into());

        let transport = Arc::new(RecordingTransport::new());
        let ctx = AppContext::with_transport(config, storage, transport.clone())
            .await
            .unwrap();
        (ctx, transport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_spec_parsing() {
        assert_eq!(
            "p1:s1".parse::<LineSpec>().unwrap(),
            LineSpec {
                product_id: "p1".into(),
                size: "s1".into(),
                quantity: 1
            }
        );
        assert_eq!("p1:M:3".parse::<LineSpec>().unwrap().quantity, 3);
        assert!("p1".parse::<LineSpec>().is_err());
        assert!("p1:s1:0".parse::<LineSpec>().is_err());
        assert!("p1:s1:x".parse::<LineSpec>().is_err());
    }
}
