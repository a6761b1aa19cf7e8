/// Test utilities module for automatic cleanup and consistent test infrastructure
///
/// The temporary data directory is removed when the helper is dropped, even if
/// the test panics.
use anyhow::Result;
use std::sync::Arc;
use tempfile::TempDir;

use super::connection::JsonConnection;
use super::feeding_repository::FeedingRepository;
use super::mood_repository::MoodRepository;
use super::sleep_status_repository::SleepStatusRepository;
use super::sleep_training_repository::SleepTrainingRepository;
use crate::storage::scoped::ScopedStore;

pub const TEST_SCOPE: &str = "test-user";

/// Test environment that owns a temporary directory and a connection to it
pub struct TestEnvironment {
    pub connection: JsonConnection,
    pub store: ScopedStore,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = JsonConnection::new(temp_dir.path())?;
        let store = ScopedStore::new(Arc::new(connection.clone()), TEST_SCOPE);
        Ok(Self {
            connection,
            store,
            _temp_dir: temp_dir,
        })
    }
}

/// Test helper that provides repository instances for a test environment
pub struct TestHelper {
    pub env: TestEnvironment,
    pub sleep_status_repo: SleepStatusRepository,
    pub mood_repo: MoodRepository,
    pub feeding_repo: FeedingRepository,
    pub sleep_training_repo: SleepTrainingRepository,
}

impl TestHelper {
    pub fn new() -> Result<Self> {
        let env = TestEnvironment::new()?;
        Ok(Self {
            sleep_status_repo: SleepStatusRepository::new(env.store.clone()),
            mood_repo: MoodRepository::new(env.store.clone()),
            feeding_repo: FeedingRepository::new(env.store.clone()),
            sleep_training_repo: SleepTrainingRepository::new(env.store.clone()),
            env,
        })
    }

    /// Write an arbitrary document under a store key, bypassing serialization
    pub fn write_raw(&self, key: &str, raw: &str) -> Result<()> {
        use crate::storage::traits::KeyValueStore;
        self.env.connection.write(&format!("{}.{}", TEST_SCOPE, key), raw)
    }
}
