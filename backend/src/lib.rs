//! # Nurture Backend
//!
//! Non-UI logic for the Nurture companion app: sleep tracking with wake-window
//! prediction, feeding and mood logs, daily tips and the chat context handed
//! to the assistant relay.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (REST API, prediction refresh)
//!     ↓
//! Domain Layer (state machine, aggregates, services)
//!     ↓
//! Storage Layer (scoped JSON key-value stores)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::Router;
use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::config::{AppConfig, MAX_CONFIG_MINUTES};
use crate::domain::models::sleep::{InitialStatusPolicy, SleepStatusMapper};
use crate::domain::{ChatContextService, FeedingService, MoodService, SleepTracker};
use crate::io::refresh::PredictionFeed;
use crate::storage::{
    FeedingRepository, JsonConnection, KeyValueStore, MoodRepository, ScopedStore,
    SleepStatusRepository, SleepTrainingRepository,
};

pub type SharedSleepTracker = Arc<Mutex<SleepTracker<SleepStatusRepository>>>;

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub sleep_tracker: SharedSleepTracker,
    pub mood_service: MoodService,
    pub feeding_service: FeedingService,
    pub chat_context_service: ChatContextService,
    pub sleep_training_repository: SleepTrainingRepository,
    pub prediction_feed: PredictionFeed,
}

/// Build the application state on top of the configured JSON data directory
pub fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up storage in {:?}", config.data_directory);
    let connection = JsonConnection::new(&config.data_directory)?;
    initialize_with_store(config, Arc::new(connection))
}

/// Build the application state on top of any key-value store
pub fn initialize_with_store(config: &AppConfig, store: Arc<dyn KeyValueStore>) -> Result<AppState> {
    let scoped = ScopedStore::new(store, config.user_scope.clone());

    info!("Loading sleep status for scope '{}'", scoped.scope());
    let status_repository = SleepStatusRepository::new(scoped.clone());
    let status = match status_repository.load() {
        Some(stored) => SleepStatusMapper::to_domain(stored),
        None => {
            let policy = InitialStatusPolicy {
                awake_offset: Duration::minutes(
                    config.default_awake_offset_minutes.clamp(0, MAX_CONFIG_MINUTES),
                ),
                baby_age_months: config.default_baby_age_months,
            };
            info!("No stored sleep status, starting awake {} minutes ago", config.default_awake_offset_minutes);
            policy.initial_status(Utc::now())
        }
    };
    let sleep_tracker = SleepTracker::new(status, status_repository)
        .with_overtired_grace(config.overtired_grace_minutes);

    info!("Setting up domain services");
    let sleep_training_repository = SleepTrainingRepository::new(scoped.clone());
    let app_state = AppState {
        sleep_tracker: Arc::new(Mutex::new(sleep_tracker)),
        mood_service: MoodService::new(MoodRepository::new(scoped.clone())),
        feeding_service: FeedingService::new(
            FeedingRepository::new(scoped),
            config.feeding_reminder_minutes,
        ),
        chat_context_service: ChatContextService::new(sleep_training_repository.clone()),
        sleep_training_repository,
        prediction_feed: PredictionFeed::new(),
    };

    io::refresh::refresh_once(&app_state.sleep_tracker, &app_state.prediction_feed);
    Ok(app_state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    io::rest::router().with_state(app_state)
}
