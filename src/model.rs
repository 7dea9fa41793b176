//! Tracked item data model and history bookkeeping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::normalize::Canonical;

/// Maximum number of history entries retained per item. Oldest entries are
/// evicted first once the cap is reached.
pub const HISTORY_CAP: usize = 200;

/// A single accepted price observation, oldest-first within the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub ts: DateTime<Utc>,
    pub price: Option<f64>,
    pub raw: String,
}

/// A product page under watch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedItem {
    /// Unique identifier; lookups are fragment-insensitive.
    pub url: String,
    /// Best-effort display name.
    pub title: String,
    /// Selector hint reused to stabilize repeat extraction on this page.
    #[serde(default)]
    pub selector: Option<String>,
    /// Last canonical raw text observed.
    #[serde(default)]
    pub last_raw: String,
    /// Last canonical numeric value observed. None only if no numeric value
    /// has ever been parsed for this item.
    #[serde(default)]
    pub last_price: Option<f64>,
    /// Most recent fetch attempt, regardless of outcome.
    #[serde(default)]
    pub last_checked: Option<DateTime<Utc>>,
    /// Most recent accepted observation.
    pub updated_at: DateTime<Utc>,
    /// Accepted observations, oldest first, capped at [`HISTORY_CAP`].
    #[serde(default)]
    pub history: Vec<PricePoint>,
}

impl TrackedItem {
    /// Build a freshly tracked item from a canonicalized observation,
    /// seeding the history with its first entry.
    pub fn new(url: &str, title: &str, canonical: &Canonical, selector: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            url: url.to_string(),
            title: title.to_string(),
            selector,
            last_raw: canonical.raw.clone(),
            last_price: canonical.price,
            last_checked: Some(now),
            updated_at: now,
            history: vec![PricePoint {
                ts: now,
                price: canonical.price,
                raw: canonical.raw.clone(),
            }],
        }
    }

    /// Append an observation and evict from the head past the cap.
    ///
    /// This is the only growth path for the history.
    pub fn push_point(&mut self, point: PricePoint) {
        self.history.push(point);
        if self.history.len() > HISTORY_CAP {
            let excess = self.history.len() - HISTORY_CAP;
            self.history.drain(..excess);
        }
    }

    /// Rewrite the newest entry's raw/price in place.
    ///
    /// Used when a noise-only re-canonicalization adopts a cleaner form of
    /// the same value; the history length does not change.
    pub fn amend_last_point(&mut self, price: Option<f64>, raw: &str) {
        if let Some(last) = self.history.last_mut() {
            last.raw = raw.to_string();
            if price.is_some() {
                last.price = price;
            }
        }
    }
}

/// Fragment-insensitive URL equality (origin + path + query).
pub fn urls_match(a: &str, b: &str) -> bool {
    match (url::Url::parse(a), url::Url::parse(b)) {
        (Ok(mut ua), Ok(mut ub)) => {
            ua.set_fragment(None);
            ub.set_fragment(None);
            ua == ub
        }
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize;

    fn point(n: usize) -> PricePoint {
        PricePoint {
            ts: Utc::now(),
            price: Some(n as f64),
            raw: format!("${n}.00"),
        }
    }

    #[test]
    fn test_history_capped_at_200() {
        let canonical = normalize::canonicalize("$1.00");
        let mut item = TrackedItem::new("https://shop.example/p", "p", &canonical, None);
        item.history.clear();

        for n in 0..250 {
            item.push_point(point(n));
        }
        assert_eq!(item.history.len(), HISTORY_CAP);
        // Exactly the most recent 200 remain, oldest first.
        assert_eq!(item.history.first().unwrap().price, Some(50.0));
        assert_eq!(item.history.last().unwrap().price, Some(249.0));
    }

    #[test]
    fn test_amend_last_point_keeps_length() {
        let canonical = normalize::canonicalize("$10.00");
        let mut item = TrackedItem::new("https://shop.example/p", "p", &canonical, None);
        item.amend_last_point(Some(10.0), "$10.0000");
        assert_eq!(item.history.len(), 1);
        assert_eq!(item.history[0].raw, "$10.0000");
    }

    #[test]
    fn test_amend_on_empty_history_is_noop() {
        let canonical = normalize::canonicalize("$10.00");
        let mut item = TrackedItem::new("https://shop.example/p", "p", &canonical, None);
        item.history.clear();
        item.amend_last_point(Some(10.0), "$10.00");
        assert!(item.history.is_empty());
    }

    #[test]
    fn test_urls_match_ignores_fragment() {
        assert!(urls_match(
            "https://shop.example/p?v=1#reviews",
            "https://shop.example/p?v=1"
        ));
        assert!(!urls_match(
            "https://shop.example/p?v=1",
            "https://shop.example/p?v=2"
        ));
        assert!(!urls_match(
            "https://shop.example/p",
            "https://other.example/p"
        ));
    }
}
