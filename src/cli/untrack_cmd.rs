//! Stop tracking a product page.

use anyhow::Result;

use crate::cli::output::{self, Styled};
use crate::store::TrackedStore;

pub async fn run(url: &str) -> Result<()> {
    let mut store = TrackedStore::default_store()?;
    let removed = store.remove(url);
    if removed {
        store.save()?;
    }

    if output::is_json() {
        output::print_json(&serde_json::json!({ "url": url, "removed": removed }));
    } else if !output::is_quiet() {
        let s = Styled::new();
        if removed {
            println!("  {} Stopped tracking {url}", s.ok_sym());
        } else {
            println!("  {} Not tracked: {url}", s.warn_sym());
        }
    }

    Ok(())
}
