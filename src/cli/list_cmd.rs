//! List tracked items.

use anyhow::Result;

use crate::cli::output;
use crate::store::TrackedStore;

pub async fn run() -> Result<()> {
    let store = TrackedStore::default_store()?;

    if output::is_json() {
        let items: Vec<serde_json::Value> = store
            .items()
            .iter()
            .map(|i| {
                serde_json::json!({
                    "url": i.url,
                    "title": i.title,
                    "price": i.last_price,
                    "raw": i.last_raw,
                    "last_checked": i.last_checked.map(|t| t.to_rfc3339()),
                    "history_len": i.history.len(),
                })
            })
            .collect();
        output::print_json(&serde_json::json!({ "tracked": items }));
        return Ok(());
    }

    if store.items().is_empty() {
        println!("  No items tracked.");
        return Ok(());
    }

    println!(
        "  Tracking {} item(s), checked every {} min:\n",
        store.items().len(),
        store.check_interval_minutes()
    );
    for item in store.items() {
        let price = if item.last_raw.is_empty() {
            "(no price)".to_string()
        } else {
            item.last_raw.clone()
        };
        let checked = item
            .last_checked
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "never".to_string());
        println!("    {price:<14} {}", item.title);
        println!("    {:<14} {}  (last check {checked})", "", item.url);
    }

    Ok(())
}
