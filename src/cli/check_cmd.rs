//! Run one check cycle on demand.

use std::sync::Arc;

use anyhow::Result;

use crate::cli::output::{self, Styled};
use crate::fetch::PageFetcher;
use crate::notify::LogNotifier;
use crate::scheduler::ChangeDetector;
use crate::store::TrackedStore;

/// Check every tracked item now. With `force`, the interval throttle is
/// ignored and every item is fetched.
pub async fn run(force: bool) -> Result<()> {
    let store = TrackedStore::default_store()?;
    let detector = ChangeDetector::new(store, PageFetcher::default(), Arc::new(LogNotifier));

    let summary = detector.run_cycle(force).await;

    if output::is_json() {
        output::print_json(&serde_json::to_value(&summary)?);
    } else if !output::is_quiet() {
        let s = Styled::new();
        println!(
            "  {} Checked {} item(s), {} throttled ({} ms)",
            s.ok_sym(),
            summary.checked,
            summary.skipped,
            summary.duration_ms
        );
    }

    Ok(())
}
