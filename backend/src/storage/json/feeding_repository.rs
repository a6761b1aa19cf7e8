//! Persists feeding logs under the `feeding_logs` key.
//!
//! Stored feeding types are normalized on read: older spellings such as
//! `"left"` or `"breast_right"` map onto [`FeedingType`]; entries with an
//! unknown type or a broken shape are dropped with a warning instead of
//! failing the whole list.

use anyhow::Result;
use serde_json::Value;
use shared::{FeedingLog, FeedingType};
use tracing::warn;

use crate::storage::scoped::ScopedStore;

pub const FEEDING_LOGS_KEY: &str = "feeding_logs";

/// Map a stored feeding type spelling onto the closed enum
pub fn normalize_feeding_type(raw: &str) -> Option<FeedingType> {
    let normalized = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
    match normalized.as_str() {
        "left-breast" | "left" | "breast-left" | "l" => Some(FeedingType::LeftBreast),
        "right-breast" | "right" | "breast-right" | "r" => Some(FeedingType::RightBreast),
        "bottle" | "formula" | "bottle-feed" => Some(FeedingType::Bottle),
        _ => None,
    }
}

#[derive(Clone)]
pub struct FeedingRepository {
    store: ScopedStore,
}

impl FeedingRepository {
    pub fn new(store: ScopedStore) -> Self {
        Self { store }
    }

    /// All valid logs; empty when absent or unreadable
    pub fn load_all(&self) -> Vec<FeedingLog> {
        let raw_entries: Vec<Value> = self.store.read_json_or_default(FEEDING_LOGS_KEY, Vec::new);
        raw_entries.into_iter().filter_map(Self::parse_entry).collect()
    }

    pub fn save_all(&self, logs: &[FeedingLog]) -> Result<()> {
        self.store.write_json(FEEDING_LOGS_KEY, logs)
    }

    fn parse_entry(mut entry: Value) -> Option<FeedingLog> {
        let raw_type = entry.get("feedingType").and_then(Value::as_str).map(str::to_string);
        let feeding_type = match raw_type.as_deref().and_then(normalize_feeding_type) {
            Some(feeding_type) => feeding_type,
            None => {
                warn!("Dropping feeding log with unknown feeding type {:?}", raw_type);
                return None;
            }
        };

        if let Some(object) = entry.as_object_mut() {
            object.insert("feedingType".to_string(), Value::String(feeding_type.to_string()));
        }

        match serde_json::from_value(entry) {
            Ok(log) => Some(log),
            Err(e) => {
                warn!("Dropping malformed feeding log: {}", e);
                None
            }
        }
    }
}
