//! # JSON File Storage
//!
//! File-backed implementation of the key-value store. Each logical store is a
//! single JSON document, rewritten in full after every mutation.
//!
//! ## File Layout
//!
//! ```text
//! data/
//! ├── nurture_config.yaml
//! ├── local.sleep_status.json
//! ├── local.mood_entries.json
//! ├── local.feeding_logs.json
//! ├── local.sleep_training_program.json
//! └── local.sleep_assessment.json
//! ```
//!
//! The `local.` prefix is the user scope from the configuration.

pub mod connection;
pub mod feeding_repository;
pub mod mood_repository;
pub mod sleep_status_repository;
pub mod sleep_training_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::JsonConnection;
pub use feeding_repository::FeedingRepository;
pub use mood_repository::MoodRepository;
pub use sleep_status_repository::SleepStatusRepository;
pub use sleep_training_repository::SleepTrainingRepository;
