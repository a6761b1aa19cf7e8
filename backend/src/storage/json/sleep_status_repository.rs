//! Persists the sleep tracker's status under the `sleep_status` key.

use anyhow::Result;
use shared::SleepStatus;
use tracing::debug;

use crate::domain::sleep_tracker::StatusPersistence;
use crate::storage::scoped::ScopedStore;

pub const SLEEP_STATUS_KEY: &str = "sleep_status";

#[derive(Clone)]
pub struct SleepStatusRepository {
    store: ScopedStore,
}

impl SleepStatusRepository {
    pub fn new(store: ScopedStore) -> Self {
        Self { store }
    }

    /// Stored status, `None` when absent or unreadable
    pub fn load(&self) -> Option<SleepStatus> {
        self.store.read_json_or_default(SLEEP_STATUS_KEY, || None)
    }

    pub fn save(&self, status: &SleepStatus) -> Result<()> {
        self.store.write_json(SLEEP_STATUS_KEY, status)?;
        debug!("Saved sleep status with {} sessions", status.sessions.len());
        Ok(())
    }
}

impl StatusPersistence for SleepStatusRepository {
    fn save(&self, status: &SleepStatus) -> Result<()> {
        SleepStatusRepository::save(self, status)
    }
}
