//! Bounded wait-and-retry extraction against still-loading content.
//!
//! A live page may not carry its price in the first snapshot. The caller
//! feeds content snapshots through a watch channel as mutations arrive;
//! extraction is retried on each one until it succeeds or a hard window
//! elapses, resolving with whatever the last attempt produced. Single
//! shot, not resumable.

use std::time::Duration;

use tokio::sync::watch;

use super::{extract, PriceObservation};

/// Hard ceiling on how long to wait for content mutations.
pub const MUTATION_WINDOW: Duration = Duration::from_millis(1200);

/// Extract from the current snapshot, retrying on each mutation signal
/// until success or the window closes.
pub async fn extract_with_updates(
    mut snapshots: watch::Receiver<String>,
    page_url: &str,
    hint_selector: Option<&str>,
) -> Option<PriceObservation> {
    let deadline = tokio::time::Instant::now() + MUTATION_WINDOW;

    let mut last = {
        let html = snapshots.borrow_and_update().clone();
        extract(&html, page_url, hint_selector)
    };
    if last.is_some() {
        return last;
    }

    loop {
        tokio::select! {
            _ = tokio::time::sleep_until(deadline) => return last,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    // Sender gone: no further mutations will arrive.
                    return last;
                }
                let html = snapshots.borrow_and_update().clone();
                last = extract(&html, page_url, hint_selector);
                if last.is_some() {
                    return last;
                }
            }
        }
    }
}
