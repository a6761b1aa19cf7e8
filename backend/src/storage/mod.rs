//! # Storage Module
//!
//! Handles all data persistence for the companion app's local state.
//!
//! Every logical store (sleep status, mood entries, feeding logs, the
//! sleep-training program and assessment) is one JSON document under a fixed
//! key. Documents are read once when a service starts and rewritten in full
//! after each mutation; there is a single writer, so last-writer-wins is
//! acceptable.
//!
//! ## Layers
//!
//! - **traits**: the [`KeyValueStore`] abstraction
//! - **json**: file-backed store plus typed repositories
//! - **memory**: in-memory store for tests
//! - **scoped**: per-user key prefixing and typed JSON helpers

pub mod json;
pub mod memory;
pub mod scoped;
pub mod traits;

pub use json::{
    FeedingRepository, JsonConnection, MoodRepository, SleepStatusRepository,
    SleepTrainingRepository,
};
pub use memory::MemoryStore;
pub use scoped::ScopedStore;
pub use traits::KeyValueStore;
