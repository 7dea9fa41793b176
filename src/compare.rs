//! Canonical comparison of two raw price observations.
//!
//! Naive string equality on scraped text produces a high false-positive
//! rate on formatting churn alone, so comparison is two-tier: canonical
//! text first, then a numeric tolerance check that reclassifies
//! formatting-only differences as noise.

use crate::normalize::{self, Canonical};

/// Absolute tolerance under which two parsed prices count as the same value.
pub const PRICE_EPSILON: f64 = 0.0001;

/// Outcome of comparing a new observation against the stored baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceDelta {
    /// Canonical text is identical; nothing to record.
    Unchanged,
    /// Text differs but the numeric value is the same within tolerance.
    /// The canonical form replaces the stored baseline so formatting
    /// stabilizes over time, but no history entry and no notification.
    Noise(Canonical),
    /// A genuine change: append history and notify.
    Changed(Canonical),
}

impl PriceDelta {
    /// Whether this delta warrants a notification.
    pub fn is_change(&self) -> bool {
        matches!(self, PriceDelta::Changed(_))
    }
}

/// Compare the stored raw text against a fresh observation.
///
/// Both sides pass through the same canonicalization as every extraction
/// path, so a currency-symbol swap still registers as a change while
/// `$10.00` vs `$10.0000` does not.
pub fn compare(previous_raw: &str, new_raw: &str) -> PriceDelta {
    let prev = normalize::canonicalize(previous_raw);
    let new = normalize::canonicalize(new_raw);
    if prev.raw == new.raw {
        return PriceDelta::Unchanged;
    }

    match (prev.price, new.price) {
        (Some(a), Some(b)) if (a - b).abs() <= PRICE_EPSILON => PriceDelta::Noise(new),
        _ => PriceDelta::Changed(new),
    }
}
