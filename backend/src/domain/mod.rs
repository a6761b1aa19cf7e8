//! # Domain Layer
//!
//! Business rules for the companion app, independent of storage format and
//! transport:
//!
//! - **wake_window / prediction**: age-bucketed wake windows and the pure
//!   prediction math derived from them
//! - **sleep_tracker**: the Awake/Asleep state machine with an injected
//!   persistence port
//! - **log_aggregates**: "today" filters and totals over timestamped logs
//! - **mood_service / feeding_service**: check-ins, the feeding timer and logs
//! - **daily_tips**: age-bucketed tip selection
//! - **chat_context**: sleep-training context attached to chat requests
//!
//! Every operation that depends on the current time takes `now` as a
//! parameter; nothing in this layer reads the clock.

pub mod chat_context;
pub mod daily_tips;
pub mod feeding_service;
pub mod log_aggregates;
pub mod models;
pub mod mood_service;
pub mod prediction;
pub mod sleep_tracker;
pub mod wake_window;

pub use chat_context::ChatContextService;
pub use daily_tips::{daily_tip, TipAudience};
pub use feeding_service::{FeedingService, FeedingTimer};
pub use mood_service::MoodService;
pub use sleep_tracker::{SleepTracker, StatusPersistence};
pub use wake_window::wake_window_for;
