//! Show or set the global check interval.

use anyhow::Result;

use crate::cli::output::{self, Styled};
use crate::store::TrackedStore;

pub async fn run(minutes: Option<u64>) -> Result<()> {
    let mut store = TrackedStore::default_store()?;

    if let Some(minutes) = minutes {
        store.set_check_interval_minutes(minutes);
        store.save()?;
    }

    let current = store.check_interval_minutes();
    if output::is_json() {
        output::print_json(&serde_json::json!({ "check_interval_minutes": current }));
    } else if !output::is_quiet() {
        let s = Styled::new();
        match minutes {
            Some(_) => println!("  {} Check interval set to {current} min", s.ok_sym()),
            None => println!("  Check interval: {current} min"),
        }
    }

    Ok(())
}
