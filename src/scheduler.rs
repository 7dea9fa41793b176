//! Periodic change detection over the watchlist.
//!
//! A cycle walks every tracked item in stored order: throttle, fetch,
//! extract, compare, persist, notify. Cycles are serialized behind an
//! async mutex so an operator-triggered check and the daemon tick never
//! interleave their read-modify-write of the store.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, Notify};

use crate::compare::{self, PriceDelta};
use crate::config;
use crate::extract;
use crate::fetch::PageFetcher;
use crate::model::PricePoint;
use crate::notify::Notifier;
use crate::store::TrackedStore;

/// Default daemon tick, overridable with `PRICEWATCH_TICK_SECS`.
const DEFAULT_TICK_SECS: u64 = 3600;

/// Counters for one completed cycle.
#[derive(Debug, Default, Clone, Serialize)]
pub struct CycleSummary {
    /// Items whose page was fetched this cycle.
    pub checked: u32,
    /// Items passed over by the interval throttle.
    pub skipped: u32,
    pub duration_ms: u64,
}

/// Runs check cycles against a store.
pub struct ChangeDetector {
    store: Mutex<TrackedStore>,
    fetcher: PageFetcher,
    notifier: Arc<dyn Notifier>,
}

impl ChangeDetector {
    pub fn new(store: TrackedStore, fetcher: PageFetcher, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store: Mutex::new(store),
            fetcher,
            notifier,
        }
    }

    /// Run one full cycle. With `force`, the interval throttle is ignored.
    ///
    /// Items are processed in stored order; a failed fetch is logged and
    /// skipped without counting toward either counter. State is persisted
    /// after every item so a crash mid-cycle loses at most one page's
    /// worth of work.
    pub async fn run_cycle(&self, force: bool) -> CycleSummary {
        let started = std::time::Instant::now();
        let mut summary = CycleSummary::default();

        let mut store = self.store.lock().await;
        let interval = chrono::Duration::minutes(store.check_interval_minutes() as i64);
        tracing::debug!(items = store.items().len(), force, "starting check cycle");

        for idx in 0..store.items().len() {
            let (url, selector, previous_raw, title, stamp) = {
                let item = &store.items()[idx];
                (
                    item.url.clone(),
                    item.selector.clone(),
                    item.last_raw.clone(),
                    item.title.clone(),
                    item.last_checked.unwrap_or(item.updated_at),
                )
            };

            if !force && Utc::now() - stamp < interval {
                summary.skipped += 1;
                continue;
            }

            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(%url, "price check fetch failed: {e:#}");
                    continue;
                }
            };
            summary.checked += 1;

            let now = Utc::now();
            let observation = extract::extract(&body, &url, selector.as_deref());

            // The fetch completed, whatever extraction makes of the body.
            store.items_mut()[idx].last_checked = Some(now);

            let Some(obs) = observation else {
                tracing::debug!(%url, "no price found on page");
                persist(&store);
                continue;
            };

            match compare::compare(&previous_raw, &obs.raw) {
                PriceDelta::Unchanged => {
                    persist(&store);
                }
                PriceDelta::Noise(canonical) => {
                    tracing::debug!(%url, raw = %canonical.raw, "formatting noise, baseline updated");
                    let item = &mut store.items_mut()[idx];
                    item.last_raw = canonical.raw.clone();
                    if canonical.price.is_some() {
                        item.last_price = canonical.price;
                    }
                    item.updated_at = now;
                    item.amend_last_point(canonical.price, &canonical.raw);
                    persist(&store);
                }
                PriceDelta::Changed(canonical) => {
                    tracing::info!(%url, from = %previous_raw, to = %canonical.raw, "price changed");
                    let item = &mut store.items_mut()[idx];
                    item.push_point(PricePoint {
                        ts: now,
                        price: canonical.price,
                        raw: canonical.raw.clone(),
                    });
                    item.last_raw = canonical.raw.clone();
                    if canonical.price.is_some() {
                        item.last_price = canonical.price;
                    }
                    item.updated_at = now;
                    persist(&store);

                    let display = if title.is_empty() { &url } else { &title };
                    let body = if previous_raw.is_empty() {
                        format!("Now {}", canonical.raw)
                    } else {
                        format!("Price changed from {previous_raw} → {}", canonical.raw)
                    };
                    self.notifier
                        .notify(
                            &format!("price-change-{idx}-{}", now.timestamp_millis()),
                            &format!("Price update: {display}"),
                            &body,
                        )
                        .await;
                }
            }
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            checked = summary.checked,
            skipped = summary.skipped,
            duration_ms = summary.duration_ms,
            "check cycle complete"
        );
        summary
    }

    /// Borrow the store for read-only inspection between cycles.
    pub async fn with_store<R>(&self, f: impl FnOnce(&TrackedStore) -> R) -> R {
        let store = self.store.lock().await;
        f(&store)
    }
}

fn persist(store: &TrackedStore) {
    if let Err(e) = store.save() {
        tracing::error!("failed to persist tracked store: {e:#}");
    }
}

/// Run the detector on a periodic tick until shutdown is signalled.
///
/// The first cycle runs immediately; subsequent cycles respect the
/// per-item interval throttle, so a short tick only adds scheduling
/// resolution, not extra fetch traffic.
pub async fn run_daemon(detector: Arc<ChangeDetector>, shutdown: Arc<Notify>) {
    let tick_secs = config::read_env_u64("PRICEWATCH_TICK_SECS", DEFAULT_TICK_SECS);
    let mut tick = tokio::time::interval(std::time::Duration::from_secs(tick_secs.max(1)));

    loop {
        tokio::select! {
            _ = tick.tick() => {
                detector.run_cycle(false).await;
            }
            _ = shutdown.notified() => {
                tracing::info!("shutdown requested, stopping watch loop");
                return;
            }
        }
    }
}
