use chrono::{DateTime, Utc};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FeedingTimerError {
    #[error("A feeding timer is already running since {0}")]
    AlreadyRunning(DateTime<Utc>),
    #[error("No feeding timer is running")]
    NotRunning,
}
