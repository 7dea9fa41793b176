//! Show the price history of one tracked item.

use anyhow::{Context, Result};

use crate::cli::output;
use crate::store::TrackedStore;

pub async fn run(url: &str, limit: usize) -> Result<()> {
    let store = TrackedStore::default_store()?;
    let item = store
        .get(url)
        .with_context(|| format!("not tracked: {url}"))?;

    let start = item.history.len().saturating_sub(limit);
    let points = &item.history[start..];

    if output::is_json() {
        let json_points: Vec<serde_json::Value> = points
            .iter()
            .map(|p| serde_json::json!([p.ts.to_rfc3339(), p.price, p.raw]))
            .collect();
        output::print_json(&serde_json::json!({
            "url": item.url,
            "title": item.title,
            "points": json_points,
        }));
    } else if points.is_empty() {
        println!("  No history recorded yet.");
    } else {
        println!("  History for {} ({} entries):\n", item.title, points.len());
        for p in points {
            println!("    {}  {}", p.ts.format("%Y-%m-%d %H:%M"), p.raw);
        }
    }

    Ok(())
}
