//! Persists mood check-ins under the `mood_entries` key.

use anyhow::Result;
use serde_json::Value;
use shared::MoodEntry;
use tracing::warn;

use crate::storage::scoped::ScopedStore;

pub const MOOD_ENTRIES_KEY: &str = "mood_entries";

#[derive(Clone)]
pub struct MoodRepository {
    store: ScopedStore,
}

impl MoodRepository {
    pub fn new(store: ScopedStore) -> Self {
        Self { store }
    }

    /// All entries, newest first; empty when absent or unreadable.
    /// Entries that no longer parse are skipped.
    pub fn load_all(&self) -> Vec<MoodEntry> {
        let raw_entries: Vec<Value> = self.store.read_json_or_default(MOOD_ENTRIES_KEY, Vec::new);
        raw_entries
            .into_iter()
            .filter_map(|raw| match serde_json::from_value(raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Dropping unreadable mood entry: {}", e);
                    None
                }
            })
            .collect()
    }

    pub fn save_all(&self, entries: &[MoodEntry]) -> Result<()> {
        self.store.write_json(MOOD_ENTRIES_KEY, entries)
    }
}
