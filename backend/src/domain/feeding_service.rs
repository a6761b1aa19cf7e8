//! Feeding timer and feeding log service.
//!
//! The timer lives in memory only; a [`FeedingLog`] is written when the timer
//! stops. Once the running feed reaches the reminder threshold (45 minutes by
//! default) `reminder_due` turns true.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use shared::{FeedingLog, FeedingTimerResponse, FeedingTodayResponse, FeedingType};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::domain::log_aggregates::{
    entries_today, most_recent_by_type, suggested_next_side, total_feeding_seconds,
};
use crate::domain::models::feeding::FeedingTimerError;
use crate::storage::FeedingRepository;

pub const DEFAULT_FEEDING_REMINDER_MINUTES: i64 = 45;
const MAX_FEEDING_REMINDER_MINUTES: i64 = 24 * 60;

/// A single running feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedingTimer {
    started_at: Option<DateTime<Utc>>,
}

impl FeedingTimer {
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), FeedingTimerError> {
        if let Some(started_at) = self.started_at {
            return Err(FeedingTimerError::AlreadyRunning(started_at));
        }
        self.started_at = Some(now);
        Ok(())
    }

    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        self.started_at
            .map(|started_at| (now - started_at).num_seconds().max(0))
            .unwrap_or(0)
    }

    pub fn reminder_due(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.is_running() && self.elapsed_seconds(now) >= threshold.num_seconds()
    }

    /// Log entry for the running feed, leaving the timer running
    pub fn completed_log(
        &self,
        now: DateTime<Utc>,
        feeding_type: FeedingType,
        notes: &str,
    ) -> Result<FeedingLog, FeedingTimerError> {
        let started_at = self.started_at.ok_or(FeedingTimerError::NotRunning)?;
        Ok(FeedingLog {
            id: FeedingLog::generate_id(started_at),
            start_time: started_at,
            duration_seconds: self.elapsed_seconds(now),
            feeding_type,
            notes: notes.trim().to_string(),
        })
    }

    pub fn reset(&mut self) {
        self.started_at = None;
    }

    /// Stop the timer and build the finished log entry
    pub fn stop(
        &mut self,
        now: DateTime<Utc>,
        feeding_type: FeedingType,
        notes: String,
    ) -> Result<FeedingLog, FeedingTimerError> {
        let log = self.completed_log(now, feeding_type, &notes)?;
        self.reset();
        Ok(log)
    }
}

#[derive(Clone)]
pub struct FeedingService {
    feeding_repository: FeedingRepository,
    timer: Arc<Mutex<FeedingTimer>>,
    reminder_threshold: Duration,
}

impl FeedingService {
    pub fn new(feeding_repository: FeedingRepository, reminder_minutes: i64) -> Self {
        Self {
            feeding_repository,
            timer: Arc::new(Mutex::new(FeedingTimer::default())),
            reminder_threshold: Duration::minutes(reminder_minutes.clamp(1, MAX_FEEDING_REMINDER_MINUTES)),
        }
    }

    fn with_timer<T>(&self, f: impl FnOnce(&mut FeedingTimer) -> T) -> Result<T> {
        let mut timer = self
            .timer
            .lock()
            .map_err(|_| anyhow!("feeding timer lock poisoned"))?;
        Ok(f(&mut timer))
    }

    pub fn start_timer(&self, now: DateTime<Utc>) -> Result<FeedingTimerResponse> {
        self.with_timer(|timer| timer.start(now))??;
        info!("Feeding timer started at {}", now.to_rfc3339());
        self.timer_status(now)
    }

    pub fn timer_status(&self, now: DateTime<Utc>) -> Result<FeedingTimerResponse> {
        let threshold = self.reminder_threshold;
        self.with_timer(|timer| FeedingTimerResponse {
            is_running: timer.is_running(),
            started_at: timer.started_at(),
            elapsed_seconds: timer.elapsed_seconds(now),
            reminder_due: timer.reminder_due(now, threshold),
        })
    }

    /// Stop the running timer and append the resulting log
    ///
    /// The timer keeps running if the log cannot be saved.
    pub fn stop_timer(
        &self,
        now: DateTime<Utc>,
        feeding_type: FeedingType,
        notes: String,
    ) -> Result<FeedingLog> {
        let mut timer = self
            .timer
            .lock()
            .map_err(|_| anyhow!("feeding timer lock poisoned"))?;
        let log = timer.completed_log(now, feeding_type, &notes)?;

        let mut logs = self.feeding_repository.load_all();
        logs.insert(0, log.clone());
        self.feeding_repository.save_all(&logs)?;
        timer.reset();

        info!(
            "Recorded {} feed of {} seconds ({})",
            log.feeding_type, log.duration_seconds, log.id
        );
        Ok(log)
    }

    pub fn list_logs(&self) -> Vec<FeedingLog> {
        self.feeding_repository.load_all()
    }

    pub fn feeding_today<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> FeedingTodayResponse {
        let all = self.feeding_repository.load_all();
        let today: Vec<FeedingLog> = entries_today(&all, now).into_iter().cloned().collect();

        FeedingTodayResponse {
            feed_count_today: today.len(),
            total_feeding_seconds_today: total_feeding_seconds(&today),
            last_by_type: most_recent_by_type(&all).into_iter().cloned().collect(),
            suggested_next_side: suggested_next_side(&all),
            logs: today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, ScopedStore};

    /// Store whose reads work but whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow!("disk full"))
        }

        fn remove(&self, _key: &str) -> Result<bool> {
            Ok(false)
        }
    }

    fn create_test_service() -> FeedingService {
        let store = ScopedStore::new(Arc::new(MemoryStore::new()), "test");
        FeedingService::new(FeedingRepository::new(store), DEFAULT_FEEDING_REMINDER_MINUTES)
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 6, 0, 0).unwrap()
    }

    #[test]
    fn test_timer_lifecycle() {
        let mut timer = FeedingTimer::default();
        assert_eq!(timer.elapsed_seconds(t0()), 0);

        timer.start(t0()).unwrap();
        assert_eq!(timer.start(t0()), Err(FeedingTimerError::AlreadyRunning(t0())));
        assert_eq!(timer.elapsed_seconds(t0() + Duration::seconds(95)), 95);

        let log = timer
            .stop(t0() + Duration::minutes(12), FeedingType::LeftBreast, " sleepy ".to_string())
            .unwrap();
        assert_eq!(log.duration_seconds, 720);
        assert_eq!(log.start_time, t0());
        assert_eq!(log.notes, "sleepy");
        assert!(!timer.is_running());

        assert_eq!(
            timer.stop(t0(), FeedingType::Bottle, String::new()),
            Err(FeedingTimerError::NotRunning)
        );
    }

    #[test]
    fn test_reminder_threshold() {
        let mut timer = FeedingTimer::default();
        let threshold = Duration::minutes(DEFAULT_FEEDING_REMINDER_MINUTES);
        assert!(!timer.reminder_due(t0() + Duration::hours(2), threshold));

        timer.start(t0()).unwrap();
        assert!(!timer.reminder_due(t0() + Duration::minutes(44), threshold));
        assert!(timer.reminder_due(t0() + Duration::minutes(45), threshold));
    }

    #[test]
    fn test_stop_appends_log_and_reports_today() {
        let service = create_test_service();

        service.start_timer(t0()).unwrap();
        service
            .stop_timer(t0() + Duration::minutes(10), FeedingType::LeftBreast, String::new())
            .unwrap();
        service.start_timer(t0() + Duration::hours(3)).unwrap();
        let status = service.timer_status(t0() + Duration::hours(4)).unwrap();
        assert!(status.is_running);
        assert!(status.reminder_due);
        service
            .stop_timer(t0() + Duration::hours(4), FeedingType::Bottle, String::new())
            .unwrap();

        let today = service.feeding_today(&(t0() + Duration::hours(5)));
        assert_eq!(today.feed_count_today, 2);
        assert_eq!(today.total_feeding_seconds_today, 600 + 3600);
        assert_eq!(today.logs[0].feeding_type, FeedingType::Bottle);
        assert_eq!(today.last_by_type.len(), 2);
        assert_eq!(today.suggested_next_side, Some(FeedingType::RightBreast));
    }

    #[test]
    fn test_double_start_is_a_typed_error() {
        let service = create_test_service();
        service.start_timer(t0()).unwrap();

        let err = service.start_timer(t0() + Duration::minutes(1)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<FeedingTimerError>(),
            Some(&FeedingTimerError::AlreadyRunning(t0()))
        );
    }

    #[test]
    fn test_stop_without_start_is_a_typed_error() {
        let service = create_test_service();
        let err = service
            .stop_timer(t0(), FeedingType::Bottle, String::new())
            .unwrap_err();
        assert_eq!(err.downcast_ref::<FeedingTimerError>(), Some(&FeedingTimerError::NotRunning));
        assert!(service.list_logs().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_timer_running() {
        let store = ScopedStore::new(Arc::new(ReadOnlyStore), "test");
        let service = FeedingService::new(FeedingRepository::new(store), DEFAULT_FEEDING_REMINDER_MINUTES);

        service.start_timer(t0()).unwrap();
        let err = service
            .stop_timer(t0() + Duration::minutes(20), FeedingType::LeftBreast, String::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "disk full");

        let status = service.timer_status(t0() + Duration::minutes(21)).unwrap();
        assert!(status.is_running);
        assert_eq!(status.started_at, Some(t0()));
        assert_eq!(status.elapsed_seconds, 21 * 60);
    }

    #[test]
    fn test_huge_reminder_threshold_is_capped() {
        let store = ScopedStore::new(Arc::new(MemoryStore::new()), "test");
        let service = FeedingService::new(FeedingRepository::new(store), i64::MAX);

        service.start_timer(t0()).unwrap();
        assert!(!service.timer_status(t0() + Duration::hours(23)).unwrap().reminder_due);
        assert!(service.timer_status(t0() + Duration::hours(24)).unwrap().reminder_due);
    }
}
