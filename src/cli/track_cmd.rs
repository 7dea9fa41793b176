//! Track a product page.

use anyhow::{Context, Result};

use crate::cli::output::{self, Styled};
use crate::extract;
use crate::fetch::PageFetcher;
use crate::store::{item_from_observation, TrackedStore};

/// Fetch the page, extract its price, and add it to the watchlist.
///
/// Tracking an already-tracked URL refreshes the item in place and keeps
/// its history.
pub async fn run(url: &str, selector: Option<&str>, title: Option<&str>) -> Result<()> {
    let mut store = TrackedStore::default_store()?;

    let fetcher = PageFetcher::default();
    let body = fetcher.fetch(url).await?;

    let obs = extract::extract(&body, url, selector)
        .with_context(|| format!("no price found on {url}; try --selector"))?;

    let page_title = match title {
        Some(t) => Some(t.to_string()),
        None => extract::extract_title(&body),
    };

    let item = item_from_observation(
        url,
        page_title.as_deref(),
        &obs.raw,
        selector.map(|s| s.to_string()),
    );
    let display_title = item.title.clone();
    let display_raw = item.last_raw.clone();
    store.upsert(item);
    store.save()?;

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "url": url,
            "title": display_title,
            "price": obs.price,
            "raw": display_raw,
        }));
    } else if !output::is_quiet() {
        let s = Styled::new();
        println!("  {} Tracking: {display_title}", s.ok_sym());
        println!("    Current price: {display_raw}");
    }

    Ok(())
}
