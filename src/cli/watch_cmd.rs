//! Run the watch daemon in the foreground.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Notify;
use tracing::info;

use crate::cli::output;
use crate::config;
use crate::fetch::PageFetcher;
use crate::notify::{LogNotifier, Notifier, WebhookNotifier};
use crate::scheduler::{self, ChangeDetector};
use crate::store::TrackedStore;

/// Start the periodic check loop and run until Ctrl-C.
pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pricewatch=info".parse().unwrap()),
        )
        .init();

    info!("starting pricewatch v{}", env!("CARGO_PKG_VERSION"));

    let notifier: Arc<dyn Notifier> = match config::read_env_string("PRICEWATCH_WEBHOOK") {
        Some(url) if !url.is_empty() => {
            info!(%url, "alerts will be delivered to webhook");
            Arc::new(WebhookNotifier::new(url))
        }
        _ => Arc::new(LogNotifier),
    };

    let store = TrackedStore::default_store()?;
    if !output::is_quiet() {
        eprintln!(
            "  Watching {} item(s), interval {} min. Ctrl-C to stop.",
            store.items().len(),
            store.check_interval_minutes()
        );
    }

    let detector = Arc::new(ChangeDetector::new(
        store,
        PageFetcher::default(),
        notifier,
    ));
    let shutdown = Arc::new(Notify::new());

    let loop_handle = tokio::spawn(scheduler::run_daemon(
        Arc::clone(&detector),
        Arc::clone(&shutdown),
    ));

    tokio::signal::ctrl_c().await?;
    shutdown.notify_one();
    loop_handle.await?;

    Ok(())
}
