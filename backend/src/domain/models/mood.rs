use uuid::Uuid;

/// Longest accepted free-text note on a mood check-in
pub const MAX_MOOD_NOTES_LENGTH: usize = 1000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MoodError {
    #[error("Mood entry {0} not found")]
    NotFound(Uuid),
    #[error("Notes cannot exceed {} characters", MAX_MOOD_NOTES_LENGTH)]
    NotesTooLong,
}
