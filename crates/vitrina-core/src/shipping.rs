//! # Free-Shipping Progress
//!
//! Storefront-only indicator of how far the cart is from free shipping.
//!
//! ```text
//! min_amount = $200.00, cart total = $150.00
//!
//!   [███████████████░░░░░]  75%   "$50.00 away from free shipping"
//!
//! remaining = max(min_amount − total, 0)
//! progress  = min(total / min_amount × 100, 100)
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Progress toward the store's free-shipping minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeShippingProgress {
    pub min_amount: Money,
    pub remaining: Money,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
}

impl FreeShippingProgress {
    /// Computes progress for a cart total.
    ///
    /// Returns `None` when the store has no minimum configured (absent or
    /// zero), so there is nothing to show.
    ///
    /// ## Example
    /// ```rust
    /// use vitrina_core::money::Money;
    /// use vitrina_core::shipping::FreeShippingProgress;
    ///
    /// let p = FreeShippingProgress::compute(
    ///     Some(Money::from_cents(20_000)),
    ///     Money::from_cents(15_000),
    /// ).unwrap();
    /// assert_eq!(p.remaining, Money::from_cents(5_000));
    /// assert_eq!(p.progress, 75.0);
    /// ```
    pub fn compute(min_amount: Option<Money>, total: Money) -> Option<Self> {
        let min_amount = min_amount.filter(|m| m.is_positive())?;

        let remaining = min_amount.saturating_sub_floor_zero(total);
        let ratio = total.cents().max(0) as f64 / min_amount.cents() as f64 * 100.0;

        Some(FreeShippingProgress {
            min_amount,
            remaining,
            progress: ratio.min(100.0),
        })
    }

    /// Whether the cart already ships free.
    pub fn qualifies(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Text bar of `width` cells for terminal output.
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.progress / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_below_minimum() {
        let p = FreeShippingProgress::compute(Some(Money::from_cents(20_000)), Money::from_cents(15_000))
            .unwrap();
        assert_eq!(p.remaining, Money::from_cents(5_000));
        assert_eq!(p.progress, 75.0);
        assert!(!p.qualifies());
        assert_eq!(p.bar(4), "[███░]");
    }

    #[test]
    fn test_above_minimum_caps_at_100() {
        let p = FreeShippingProgress::compute(Some(Money::from_cents(20_000)), Money::from_cents(25_000))
            .unwrap();
        assert!(p.remaining.is_zero());
        assert_eq!(p.progress, 100.0);
        assert!(p.qualifies());
    }

    #[test]
    fn test_no_minimum_configured() {
        assert!(FreeShippingProgress::compute(None, Money::from_cents(100)).is_none());
        assert!(FreeShippingProgress::compute(Some(Money::zero()), Money::from_cents(100)).is_none());
    }

    #[test]
    fn test_empty_cart() {
        let p = FreeShippingProgress::compute(Some(Money::from_cents(20_000)), Money::zero()).unwrap();
        assert_eq!(p.remaining, Money::from_cents(20_000));
        assert_eq!(p.progress, 0.0);
    }
}
