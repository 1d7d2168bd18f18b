//! # Cart State
//!
//! The cart for the current invocation, loaded from local storage and
//! written back after every change.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  Command                 Cart Change                 Storage            │
//! │  ───────                 ───────────                 ───────            │
//! │                                                                         │
//! │  cart add ──────────────► add_item (merge) ────────► save cart.items   │
//! │  cart update ───────────► update_quantity (≥ 1) ───► save cart.items   │
//! │  cart remove ───────────► remove_item ─────────────► save cart.items   │
//! │  cart clear ────────────► clear ───────────────────► remove key        │
//! │  checkout (confirmed) ──► clear ───────────────────► remove key        │
//! │  cart show ─────────────► (read only)                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use vitrina_core::Cart;
use vitrina_store::LocalStorage;

use crate::error::CliResult;

/// Shared cart.
///
/// A poisoned lock is recovered: the cart is plain data and stays
/// consistent after any single mutation.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    pub fn new(cart: Cart) -> Self {
        CartState {
            cart: Arc::new(Mutex::new(cart)),
        }
    }

    /// Loads the stored cart.
    pub async fn load(storage: &LocalStorage) -> CliResult<Self> {
        Ok(CartState::new(storage.cart().load().await?))
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|c| CartTotals::from(c));
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(|p| p.into_inner());
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut cart)
    }

    pub fn snapshot(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    /// Writes the current cart back to storage.
    pub async fn persist(&self, storage: &LocalStorage) -> CliResult<()> {
        let cart = self.snapshot();
        storage.cart().save(&cart).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrina_core::{CartItem, CartTotals, Money};
    use vitrina_store::StorageConfig;

    #[tokio::test]
    async fn test_persist_and_reload() {
        let storage = LocalStorage::open(StorageConfig::in_memory()).await.unwrap();
        let state = CartState::load(&storage).await.unwrap();
        assert!(state.with_cart(Cart::is_empty));

        state.with_cart_mut(|c| {
            c.add_item(CartItem::new("p1", "s1", "Remera", "M", Money::from_cents(10_000)).with_quantity(2))
        });
        state.persist(&storage).await.unwrap();

        let reloaded = CartState::load(&storage).await.unwrap();
        let totals = reloaded.with_cart(|c| CartTotals::from(c));
        assert_eq!(totals.total_quantity, 2);
        assert_eq!(totals.subtotal.cents(), 20_000);
    }
}
