//! # Checkout Repository
//!
//! Order data that outlives a single command.
//!
//! ```text
//! checkout submit ──► save_last_order()  (tracking view: checkout track)
//!                 └─► save_pending()     (payment choice still open)
//!
//! checkout pay / skip ──► pending() ──► ... ──► clear_pending()
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vitrina_core::money::major_units;
use vitrina_core::{CheckoutState, Money, OrderCustomer, OrderLine};

use super::KeyValueStore;
use crate::error::StoreResult;

pub const LAST_ORDER_KEY: &str = "checkout.last_order";
pub const PENDING_KEY: &str = "checkout.pending";

/// Summary of the last placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastOrder {
    pub order_id: String,
    pub subdomain: String,
    pub customer: OrderCustomer,
    pub items: Vec<OrderLine>,
    #[serde(with = "major_units")]
    pub subtotal: Money,
    #[serde(with = "major_units")]
    pub discount: Money,
    #[serde(with = "major_units")]
    pub total: Money,
    pub placed_at: DateTime<Utc>,
}

/// A checkout stopped at the payment choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCheckout {
    pub subdomain: String,
    pub payment_enabled: bool,
    pub state: CheckoutState,
}

#[derive(Debug, Clone)]
pub struct CheckoutRepository {
    kv: KeyValueStore,
}

impl CheckoutRepository {
    pub fn new(kv: KeyValueStore) -> Self {
        CheckoutRepository { kv }
    }

    pub async fn save_last_order(&self, order: &LastOrder) -> StoreResult<()> {
        self.kv.set(LAST_ORDER_KEY, order).await
    }

    pub async fn last_order(&self) -> StoreResult<Option<LastOrder>> {
        self.kv.get(LAST_ORDER_KEY).await
    }

    pub async fn save_pending(&self, pending: &PendingCheckout) -> StoreResult<()> {
        self.kv.set(PENDING_KEY, pending).await
    }

    pub async fn pending(&self) -> StoreResult<Option<PendingCheckout>> {
        self.kv.get(PENDING_KEY).await
    }

    pub async fn clear_pending(&self) -> StoreResult<()> {
        self.kv.remove(PENDING_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{LocalStorage, StorageConfig};
    use vitrina_core::DiscountRate;

    fn last_order() -> LastOrder {
        LastOrder {
            order_id: "o-1".into(),
            subdomain: "tienda".into(),
            customer: OrderCustomer {
                name: "Ana".into(),
                phone: "1155551234".into(),
                email: "ana@tienda.com".into(),
                address: None,
                notes: None,
            },
            items: vec![OrderLine {
                product_id: "p1".into(),
                size_id: "s1".into(),
                product_name: Some("Remera".into()),
                size_name: Some("M".into()),
                quantity: 2,
                price: Money::from_cents(10_000),
                discount: DiscountRate::from_percentage(10.0),
            }],
            subtotal: Money::from_cents(20_000),
            discount: Money::from_cents(2_000),
            total: Money::from_cents(18_000),
            placed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_last_order_persists() {
        let storage = LocalStorage::open(StorageConfig::in_memory()).await.unwrap();
        let repo = storage.checkout();

        assert_eq!(repo.last_order().await.unwrap(), None);

        let order = last_order();
        repo.save_last_order(&order).await.unwrap();
        assert_eq!(repo.last_order().await.unwrap(), Some(order));
    }

    #[tokio::test]
    async fn test_pending_checkout_lifecycle() {
        let storage = LocalStorage::open(StorageConfig::in_memory()).await.unwrap();
        let repo = storage.checkout();

        let pending = PendingCheckout {
            subdomain: "tienda".into(),
            payment_enabled: true,
            state: CheckoutState::AwaitingPaymentChoice {
                order_id: "o-1".into(),
                payment_url: None,
            },
        };
        repo.save_pending(&pending).await.unwrap();
        assert_eq!(repo.pending().await.unwrap(), Some(pending));

        repo.clear_pending().await.unwrap();
        assert_eq!(repo.pending().await.unwrap(), None);
    }
}
