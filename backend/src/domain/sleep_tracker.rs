//! Sleep tracking state machine.
//!
//! The tracker owns one user's [`DomainSleepStatus`] and moves it between
//! `Awake` and `Asleep`:
//!
//! ```text
//! Awake  --fell_asleep-->        Asleep
//! Asleep --woke_up-->            Awake   (records a completed session)
//! Awake  --manual_wake_update--> Awake   (resets last wake time only)
//! ```
//!
//! After every mutation the whole status is handed to the injected
//! [`StatusPersistence`] port. A failed save is logged; the in-memory state
//! stays authoritative.

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use shared::{PredictionSnapshot, SleepSession, SleepStatus, SleepSummary, WakePrediction, WakeWindow};
use tracing::{error, info};

use crate::domain::log_aggregates::{entries_today, total_sleep_minutes};
use crate::domain::models::sleep::{
    clamp_baby_age, session_duration_minutes, DomainSleepStatus, SleepState, SleepStatusMapper,
    SleepTransitionError,
};
use crate::domain::prediction::{floor_minutes_between, predict};
use crate::domain::wake_window::wake_window_for;

/// Side-effect port invoked after each state change
pub trait StatusPersistence: Send {
    fn save(&self, status: &SleepStatus) -> Result<()>;
}

impl<F> StatusPersistence for F
where
    F: Fn(&SleepStatus) -> Result<()> + Send,
{
    fn save(&self, status: &SleepStatus) -> Result<()> {
        self(status)
    }
}

pub struct SleepTracker<P: StatusPersistence> {
    status: DomainSleepStatus,
    persistence: P,
    overtired_grace_minutes: i64,
}

impl<P: StatusPersistence> SleepTracker<P> {
    pub fn new(status: DomainSleepStatus, persistence: P) -> Self {
        Self {
            status,
            persistence,
            overtired_grace_minutes: 0,
        }
    }

    pub fn with_overtired_grace(mut self, minutes: i64) -> Self {
        self.overtired_grace_minutes = minutes.max(0);
        self
    }

    pub fn status(&self) -> &DomainSleepStatus {
        &self.status
    }

    pub fn status_dto(&self) -> SleepStatus {
        SleepStatusMapper::to_dto(&self.status)
    }

    pub fn wake_window(&self) -> WakeWindow {
        wake_window_for(self.status.baby_age_months as i32)
    }

    /// Awake -> Asleep
    pub fn fell_asleep(&mut self, now: DateTime<Utc>) -> Result<(), SleepTransitionError> {
        if self.status.is_asleep() {
            return Err(SleepTransitionError::AlreadyAsleep);
        }

        self.status.state = SleepState::Asleep { since: now };
        info!("Baby fell asleep at {}", now.to_rfc3339());
        self.persist();
        Ok(())
    }

    /// Asleep -> Awake, returning the completed session
    pub fn woke_up(&mut self, now: DateTime<Utc>) -> Result<SleepSession, SleepTransitionError> {
        let since = match self.status.state {
            SleepState::Asleep { since } => since,
            SleepState::Awake => return Err(SleepTransitionError::NotAsleep),
        };
        if now <= since {
            return Err(SleepTransitionError::WakeBeforeSleepStart);
        }

        let session = SleepSession {
            id: SleepSession::generate_id(since),
            start_time: since,
            end_time: Some(now),
            duration_minutes: Some(session_duration_minutes(since, now)),
        };

        self.status.sessions.insert(0, session.clone());
        self.status.last_wake_time = now;
        self.status.state = SleepState::Awake;
        info!(
            "Baby woke up at {} after {} minutes",
            now.to_rfc3339(),
            session.duration_minutes.unwrap_or_default()
        );
        self.persist();
        Ok(session)
    }

    /// Awake -> Awake, correcting an unknown or wrong wake time
    pub fn manual_wake_update(&mut self, now: DateTime<Utc>) -> Result<(), SleepTransitionError> {
        if self.status.is_asleep() {
            return Err(SleepTransitionError::CurrentlyAsleep);
        }

        self.status.last_wake_time = now;
        info!("Wake time manually set to {}", now.to_rfc3339());
        self.persist();
        Ok(())
    }

    /// Set the baby's age, clamped to `[0, 48]` months; returns the stored value
    pub fn set_baby_age(&mut self, age_months: i32) -> u8 {
        let clamped = clamp_baby_age(age_months);
        self.status.baby_age_months = clamped;
        info!("Baby age set to {} months", clamped);
        self.persist();
        clamped
    }

    /// Remove a completed session; returns true if it existed
    pub fn delete_session(&mut self, session_id: &str) -> bool {
        let before = self.status.sessions.len();
        self.status.sessions.retain(|session| session.id != session_id);
        let removed = self.status.sessions.len() != before;
        if removed {
            info!("Deleted sleep session {}", session_id);
            self.persist();
        }
        removed
    }

    /// Wake-window prediction, `None` while asleep
    pub fn prediction(&self, now: DateTime<Utc>) -> Option<WakePrediction> {
        match self.status.state {
            SleepState::Asleep { .. } => None,
            SleepState::Awake => Some(predict(
                self.wake_window(),
                self.status.last_wake_time,
                now,
                self.overtired_grace_minutes,
            )),
        }
    }

    pub fn asleep_minutes(&self, now: DateTime<Utc>) -> Option<i64> {
        self.status
            .current_sleep_start()
            .map(|since| floor_minutes_between(since, now))
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> PredictionSnapshot {
        PredictionSnapshot {
            computed_at: now,
            is_asleep: self.status.is_asleep(),
            asleep_minutes: self.asleep_minutes(now),
            prediction: self.prediction(now),
        }
    }

    /// Today's sessions and totals relative to `now`'s calendar day
    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> SleepSummary {
        let sessions_today: Vec<SleepSession> = entries_today(&self.status.sessions, now)
            .into_iter()
            .cloned()
            .collect();

        SleepSummary {
            total_sleep_minutes_today: total_sleep_minutes(&sessions_today),
            nap_count_today: sessions_today.len(),
            sessions_today,
        }
    }

    fn persist(&self) {
        let dto = SleepStatusMapper::to_dto(&self.status);
        if let Err(e) = self.persistence.save(&dto) {
            error!("Failed to persist sleep status: {:#}", e);
        }
    }
}
