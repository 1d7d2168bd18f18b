//! # Cart Repository
//!
//! Persists the cart lines between invocations under `cart.items`.

use tracing::{debug, warn};
use vitrina_core::{Cart, CartItem};

use super::KeyValueStore;
use crate::error::{StoreError, StoreResult};

/// Storage key for the cart lines.
pub const CART_KEY: &str = "cart.items";

/// Repository for the persisted cart.
#[derive(Debug, Clone)]
pub struct CartRepository {
    kv: KeyValueStore,
}

impl CartRepository {
    pub fn new(kv: KeyValueStore) -> Self {
        CartRepository { kv }
    }

    /// Loads the cart. A missing key is an empty cart.
    ///
    /// An unreadable value is discarded with a warning rather than failing
    /// the command: the cart is a convenience copy, never authoritative.
    pub async fn load(&self) -> StoreResult<Cart> {
        match self.kv.get::<Vec<CartItem>>(CART_KEY).await {
            Ok(Some(items)) => {
                debug!(lines = items.len(), "Loaded cart");
                Ok(Cart::from_items(items))
            }
            Ok(None) => Ok(Cart::new()),
            Err(StoreError::CorruptValue { message, .. }) => {
                warn!(error = %message, "Discarding unreadable cart");
                self.kv.remove(CART_KEY).await?;
                Ok(Cart::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves the cart lines. An empty cart removes the key.
    pub async fn save(&self, cart: &Cart) -> StoreResult<()> {
        if cart.is_empty() {
            self.kv.remove(CART_KEY).await?;
            return Ok(());
        }
        self.kv.set(CART_KEY, &cart.items).await
    }

    /// Removes the persisted cart.
    pub async fn clear(&self) -> StoreResult<()> {
        self.kv.remove(CART_KEY).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{LocalStorage, StorageConfig};
    use vitrina_core::{DiscountRate, Money};

    async fn repo() -> (LocalStorage, CartRepository) {
        let storage = LocalStorage::open(StorageConfig::in_memory()).await.unwrap();
        let repo = storage.cart();
        (storage, repo)
    }

    #[tokio::test]
    async fn test_empty_by_default() {
        let (_storage, repo) = repo().await;
        assert!(repo.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load_keeps_lines_and_prices() {
        let (_storage, repo) = repo().await;

        let mut cart = Cart::new();
        cart.add_item(
            CartItem::new("p1", "s1", "Remera", "M", Money::from_cents(1999))
                .with_quantity(2)
                .with_discount(DiscountRate::from_percentage(12.5))
                .with_max_stock(4),
        );
        cart.add_item(CartItem::new("p2", "s1", "Gorra", "U", Money::from_cents(500)));
        repo.save(&cart).await.unwrap();

        let loaded = repo.load().await.unwrap();
        assert_eq!(loaded, cart);
        assert_eq!(loaded.total_with_discount(), cart.total_with_discount());
    }

    #[tokio::test]
    async fn test_clear_and_empty_save_remove_key() {
        let (storage, repo) = repo().await;

        let mut cart = Cart::new();
        cart.add_item(CartItem::new("p1", "s1", "Remera", "M", Money::from_cents(1000)));
        repo.save(&cart).await.unwrap();

        repo.clear().await.unwrap();
        assert!(repo.load().await.unwrap().is_empty());

        repo.save(&cart).await.unwrap();
        repo.save(&Cart::new()).await.unwrap();
        assert_eq!(storage.raw().get_raw(CART_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_cart_is_discarded() {
        let (storage, repo) = repo().await;
        storage.raw().set(CART_KEY, &"garbage").await.unwrap();

        assert!(repo.load().await.unwrap().is_empty());
        assert_eq!(storage.raw().get_raw(CART_KEY).await.unwrap(), None);
    }
}
