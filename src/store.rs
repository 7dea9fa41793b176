//! Persistent tracked-item store.
//!
//! State lives as pretty JSON in a single file under the data directory
//! and is written atomically (tmp file + rename). The whole list is read
//! at cycle start and written back after each item's processing; callers
//! serialize concurrent access.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::model::{urls_match, PricePoint, TrackedItem};
use crate::normalize;

/// Bump when stored state needs a migration pass on load.
pub const SCHEMA_VERSION: u32 = 1;

/// Default global check interval in minutes.
pub const DEFAULT_INTERVAL_MINUTES: u64 = 60;

const STATE_FILE: &str = "tracked.json";

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_MINUTES
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    schema_version: u32,
    #[serde(default = "default_interval")]
    check_interval_minutes: u64,
    #[serde(default)]
    tracked: Vec<TrackedItem>,
}

/// On-disk store for the watchlist.
pub struct TrackedStore {
    storage_dir: PathBuf,
    state: StoreState,
}

impl TrackedStore {
    /// Create or open a store at the given directory, running any pending
    /// schema migration.
    pub fn open(storage_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&storage_dir)
            .with_context(|| format!("creating store dir: {}", storage_dir.display()))?;

        let state_path = storage_dir.join(STATE_FILE);
        let state = if state_path.exists() {
            let data = std::fs::read_to_string(&state_path)
                .with_context(|| format!("reading {}", state_path.display()))?;
            serde_json::from_str(&data).unwrap_or_else(|e| {
                tracing::warn!("store state unreadable, starting fresh: {e}");
                StoreState::default()
            })
        } else {
            StoreState {
                schema_version: SCHEMA_VERSION,
                check_interval_minutes: DEFAULT_INTERVAL_MINUTES,
                tracked: Vec::new(),
            }
        };

        let mut store = Self { storage_dir, state };
        store.migrate()?;
        Ok(store)
    }

    /// Open the store at the default data directory.
    pub fn default_store() -> Result<Self> {
        Self::open(config::data_dir())
    }

    /// Persist the current state atomically.
    pub fn save(&self) -> Result<()> {
        let path = self.storage_dir.join(STATE_FILE);
        let tmp = self.storage_dir.join(format!("{STATE_FILE}.tmp"));
        let data = serde_json::to_vec_pretty(&self.state)?;
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    pub fn items(&self) -> &[TrackedItem] {
        &self.state.tracked
    }

    pub fn items_mut(&mut self) -> &mut [TrackedItem] {
        &mut self.state.tracked
    }

    /// Look up an item, fragment-insensitive.
    pub fn get(&self, url: &str) -> Option<&TrackedItem> {
        self.state.tracked.iter().find(|i| urls_match(&i.url, url))
    }

    /// Insert a new item or refresh an existing one's observation.
    ///
    /// An existing item (same URL, fragment-insensitive) keeps its history
    /// and gains one entry for the fresh observation; the selector hint is
    /// replaced so the most recent pick wins.
    pub fn upsert(&mut self, item: TrackedItem) {
        match self
            .state
            .tracked
            .iter_mut()
            .find(|i| urls_match(&i.url, &item.url))
        {
            Some(existing) => {
                existing.title = item.title;
                existing.last_raw = item.last_raw.clone();
                existing.last_price = item.last_price;
                existing.updated_at = item.updated_at;
                existing.last_checked = item.last_checked;
                existing.selector = item.selector;
                existing.push_point(PricePoint {
                    ts: item.updated_at,
                    price: item.last_price,
                    raw: item.last_raw,
                });
            }
            None => self.state.tracked.push(item),
        }
    }

    /// Remove an item by URL, fragment-insensitive. Returns whether
    /// anything was removed.
    pub fn remove(&mut self, url: &str) -> bool {
        let before = self.state.tracked.len();
        self.state.tracked.retain(|i| !urls_match(&i.url, url));
        self.state.tracked.len() != before
    }

    pub fn check_interval_minutes(&self) -> u64 {
        self.state.check_interval_minutes
    }

    pub fn set_check_interval_minutes(&mut self, minutes: u64) {
        self.state.check_interval_minutes = minutes.max(1);
    }

    /// One-time normalization pass over stored raw/price fields, gated by
    /// the schema version rather than an ambient flag.
    fn migrate(&mut self) -> Result<()> {
        if self.state.schema_version >= SCHEMA_VERSION {
            return Ok(());
        }
        tracing::info!(
            from = self.state.schema_version,
            to = SCHEMA_VERSION,
            "migrating tracked store"
        );

        for item in &mut self.state.tracked {
            let source = if item.last_raw.is_empty() {
                item.last_price.map(|p| p.to_string()).unwrap_or_default()
            } else {
                item.last_raw.clone()
            };
            let norm = normalize::canonicalize(&source);
            if !norm.raw.is_empty() {
                item.last_raw = norm.raw;
            }
            if norm.price.is_some() {
                item.last_price = norm.price;
            }

            for point in &mut item.history {
                let source = if point.raw.is_empty() {
                    point.price.map(|p| p.to_string()).unwrap_or_default()
                } else {
                    point.raw.clone()
                };
                let norm = normalize::canonicalize(&source);
                if !norm.raw.is_empty() {
                    point.raw = norm.raw;
                }
                if norm.price.is_some() {
                    point.price = norm.price;
                }
            }
        }

        self.state.schema_version = SCHEMA_VERSION;
        self.save()
    }
}

/// Build the item a freshly accepted observation produces.
pub fn item_from_observation(
    url: &str,
    title: Option<&str>,
    raw: &str,
    selector: Option<String>,
) -> TrackedItem {
    let canonical = normalize::canonicalize(raw);
    let title = title
        .map(|t| t.to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| url.to_string());
    TrackedItem::new(url, &title, &canonical, selector)
}
