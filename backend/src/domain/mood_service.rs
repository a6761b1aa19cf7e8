//! Mood check-in service.
//!
//! Entries are append-only and deletable by id. The full list is reloaded for
//! every query and rewritten after every mutation.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use shared::{Mood, MoodEntry, MoodTodayResponse};
use tracing::info;
use uuid::Uuid;

use crate::domain::log_aggregates::{entries_today, mood_counts, most_recent};
use crate::domain::models::mood::{MoodError, MAX_MOOD_NOTES_LENGTH};
use crate::storage::MoodRepository;

#[derive(Clone)]
pub struct MoodService {
    mood_repository: MoodRepository,
}

impl MoodService {
    pub fn new(mood_repository: MoodRepository) -> Self {
        Self { mood_repository }
    }

    /// Record a check-in at `now`
    pub fn add_mood(&self, mood: Mood, notes: Option<String>, now: DateTime<Utc>) -> Result<MoodEntry> {
        let notes = notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());
        if notes.as_ref().is_some_and(|notes| notes.chars().count() > MAX_MOOD_NOTES_LENGTH) {
            return Err(MoodError::NotesTooLong.into());
        }

        let entry = MoodEntry {
            id: Uuid::new_v4(),
            mood,
            notes,
            timestamp: now,
        };

        let mut entries = self.mood_repository.load_all();
        entries.insert(0, entry.clone());
        self.mood_repository.save_all(&entries)?;

        info!("Recorded mood '{}' ({})", entry.mood, entry.id);
        Ok(entry)
    }

    pub fn delete_mood(&self, id: Uuid) -> Result<()> {
        let mut entries = self.mood_repository.load_all();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Err(MoodError::NotFound(id).into());
        }

        self.mood_repository.save_all(&entries)?;
        info!("Deleted mood entry {}", id);
        Ok(())
    }

    pub fn list_moods(&self) -> Vec<MoodEntry> {
        self.mood_repository.load_all()
    }

    pub fn latest_mood(&self) -> Option<MoodEntry> {
        let entries = self.mood_repository.load_all();
        most_recent(&entries).cloned()
    }

    /// Today's entries with per-mood counts
    pub fn moods_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> MoodTodayResponse {
        let all = self.mood_repository.load_all();
        let today = entries_today(&all, now);

        MoodTodayResponse {
            counts: mood_counts(today.iter().copied()),
            latest: today.iter().copied().max_by_key(|entry| entry.timestamp).cloned(),
            entries: today.into_iter().cloned().collect(),
        }
    }
}
