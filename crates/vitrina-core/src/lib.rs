//! # vitrina-core: Pure Business Logic for Vitrina
//!
//! This crate holds the client-side rules of the storefront as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Vitrina Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    vitrina CLI (apps/cli)                       │   │
//! │  │    Catalog ──► Cart ──► Checkout ──► Payment choice            │   │
//! │  └─────────────┬───────────────────────────────────┬───────────────┘   │
//! │                │                                   │                    │
//! │  ┌─────────────▼─────────────┐       ┌─────────────▼─────────────┐     │
//! │  │  vitrina-store (SQLite)   │       │  vitrina-api (REST)       │     │
//! │  └─────────────┬─────────────┘       └─────────────┬─────────────┘     │
//! │                │                                   │                    │
//! │  ┌─────────────▼───────────────────────────────────▼───────────────┐   │
//! │  │               ★ vitrina-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐  │   │
//! │  │   │  types  │ │  money  │ │  cart   │ │ checkout │ │shipping│  │   │
//! │  │   │ Product │ │  Money  │ │  Cart   │ │  Flow    │ │Progress│  │   │
//! │  │   │  Sale   │ │Discount │ │CartItem │ │  Form    │ │        │  │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Server-owned records (Product, Sale, Exchange, ...)
//! - [`money`] - Money type with integer arithmetic, discount rates
//! - [`cart`] - Cart line items, mutations and derived totals
//! - [`checkout`] - Checkout form validation and order state machine
//! - [`shipping`] - Free-shipping progress
//! - [`error`] - Domain error types
//! - [`validation`] - Field validators
//!
//! ## Example Usage
//!
//! ```rust
//! use vitrina_core::cart::{Cart, CartItem};
//! use vitrina_core::money::{DiscountRate, Money};
//!
//! let mut cart = Cart::new();
//! cart.add_item(CartItem::new("p1", "s1", "Remera", "M", Money::from_cents(10_000))
//!     .with_discount(DiscountRate::from_percentage(10.0))
//!     .with_quantity(2));
//!
//! assert_eq!(cart.subtotal().cents(), 20_000);
//! assert_eq!(cart.total_discount().cents(), 2_000);
//! assert_eq!(cart.total_with_discount().cents(), 18_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod shipping;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartItem, CartTotals};
pub use checkout::{CheckoutFlow, CheckoutForm, CheckoutState};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{DiscountRate, Money};
pub use shipping::FreeShippingProgress;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Message shown when order creation fails and the server gave no reason.
pub const GENERIC_ORDER_FAILURE: &str = "Could not create the order. Please try again.";

/// Largest discount a line item may carry, in percent.
pub const MAX_DISCOUNT_PERCENT: u32 = 100;
