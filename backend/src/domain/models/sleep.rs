use chrono::{DateTime, Duration, Utc};
use shared::{SleepSession, SleepStatus};
use tracing::warn;

/// Oldest age accepted for manual age entry
pub const MAX_BABY_AGE_MONTHS: u8 = 48;

/// Whether the baby is currently sleeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepState {
    Awake,
    Asleep { since: DateTime<Utc> },
}

/// Owned sleep tracker state for one user
///
/// The asleep flag and the current sleep start live together in
/// [`SleepState`], so they cannot disagree.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainSleepStatus {
    pub baby_age_months: u8,
    pub state: SleepState,
    pub last_wake_time: DateTime<Utc>,
    /// Completed sessions, newest first
    pub sessions: Vec<SleepSession>,
}

impl DomainSleepStatus {
    pub fn is_asleep(&self) -> bool {
        matches!(self.state, SleepState::Asleep { .. })
    }

    pub fn current_sleep_start(&self) -> Option<DateTime<Utc>> {
        match self.state {
            SleepState::Asleep { since } => Some(since),
            SleepState::Awake => None,
        }
    }
}

/// Clamp any integer age into the accepted `[0, 48]` month range
pub fn clamp_baby_age(age_months: i32) -> u8 {
    age_months.clamp(0, MAX_BABY_AGE_MONTHS as i32) as u8
}

/// How a tracker is initialized when no stored state exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitialStatusPolicy {
    /// The baby is assumed to have woken this long before first launch
    pub awake_offset: Duration,
    pub baby_age_months: u8,
}

impl Default for InitialStatusPolicy {
    fn default() -> Self {
        Self {
            awake_offset: Duration::hours(2),
            baby_age_months: 0,
        }
    }
}

impl InitialStatusPolicy {
    pub fn initial_status(&self, now: DateTime<Utc>) -> DomainSleepStatus {
        DomainSleepStatus {
            baby_age_months: self.baby_age_months.min(MAX_BABY_AGE_MONTHS),
            state: SleepState::Awake,
            last_wake_time: now - self.awake_offset,
            sessions: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SleepTransitionError {
    #[error("Baby is already asleep")]
    AlreadyAsleep,
    #[error("Baby is not asleep")]
    NotAsleep,
    #[error("Cannot update wake time while the baby is asleep")]
    CurrentlyAsleep,
    #[error("Wake time must be after the sleep start")]
    WakeBeforeSleepStart,
}

/// Duration of a completed session in whole minutes, rounded to nearest
pub fn session_duration_minutes(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let millis = (end - start).num_milliseconds();
    (millis + 30_000).div_euclid(60_000)
}

pub struct SleepStatusMapper;

impl SleepStatusMapper {
    /// Convert the persisted shape into domain state, repairing inconsistencies
    pub fn to_domain(dto: SleepStatus) -> DomainSleepStatus {
        let state = match (dto.is_asleep, dto.current_sleep_start) {
            (true, Some(since)) => SleepState::Asleep { since },
            (true, None) => {
                warn!("Stored status is asleep without a sleep start, treating as awake");
                SleepState::Awake
            }
            (false, Some(_)) => {
                warn!("Stored status is awake but has a sleep start, discarding it");
                SleepState::Awake
            }
            (false, None) => SleepState::Awake,
        };

        let total = dto.sessions.len();
        let sessions: Vec<SleepSession> = dto
            .sessions
            .into_iter()
            .filter(|session| match session.end_time {
                Some(end) => end > session.start_time,
                None => true,
            })
            .map(|mut session| {
                if let Some(end) = session.end_time {
                    session.duration_minutes =
                        Some(session_duration_minutes(session.start_time, end));
                }
                session
            })
            .collect();
        if sessions.len() != total {
            warn!("Dropped {} stored sleep sessions ending before they started", total - sessions.len());
        }

        DomainSleepStatus {
            baby_age_months: clamp_baby_age(dto.baby_age_months as i32),
            state,
            last_wake_time: dto.last_wake_time,
            sessions,
        }
    }

    pub fn to_dto(domain: &DomainSleepStatus) -> SleepStatus {
        SleepStatus {
            baby_age_months: domain.baby_age_months,
            is_asleep: domain.is_asleep(),
            current_sleep_start: domain.current_sleep_start(),
            last_wake_time: domain.last_wake_time,
            sessions: domain.sessions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, 0).unwrap()
    }

    fn stored(is_asleep: bool, start: Option<DateTime<Utc>>) -> SleepStatus {
        SleepStatus {
            baby_age_months: 6,
            is_asleep,
            current_sleep_start: start,
            last_wake_time: at(7, 0),
            sessions: vec![],
        }
    }

    #[test]
    fn test_initial_status_is_awake_two_hours_ago() {
        let status = InitialStatusPolicy::default().initial_status(at(10, 0));
        assert_eq!(status.state, SleepState::Awake);
        assert_eq!(status.last_wake_time, at(8, 0));
        assert!(status.sessions.is_empty());
    }

    #[test]
    fn test_clamp_baby_age() {
        assert_eq!(clamp_baby_age(-3), 0);
        assert_eq!(clamp_baby_age(7), 7);
        assert_eq!(clamp_baby_age(60), 48);
    }

    #[test]
    fn test_session_duration_rounds_to_nearest_minute() {
        assert_eq!(session_duration_minutes(at(9, 0), at(10, 0)), 60);
        let start = at(9, 0);
        assert_eq!(session_duration_minutes(start, start + Duration::seconds(89)), 1);
        assert_eq!(session_duration_minutes(start, start + Duration::seconds(90)), 2);
    }

    #[test]
    fn test_consistent_asleep_status_maps_to_asleep() {
        let domain = SleepStatusMapper::to_domain(stored(true, Some(at(9, 0))));
        assert_eq!(domain.state, SleepState::Asleep { since: at(9, 0) });
        assert_eq!(SleepStatusMapper::to_dto(&domain), stored(true, Some(at(9, 0))));
    }

    #[test]
    fn test_asleep_without_start_is_normalized_to_awake() {
        let domain = SleepStatusMapper::to_domain(stored(true, None));
        assert_eq!(domain.state, SleepState::Awake);
        let dto = SleepStatusMapper::to_dto(&domain);
        assert!(!dto.is_asleep);
        assert!(dto.current_sleep_start.is_none());
    }

    #[test]
    fn test_awake_with_stray_start_is_normalized() {
        let domain = SleepStatusMapper::to_domain(stored(false, Some(at(9, 0))));
        assert_eq!(domain.state, SleepState::Awake);
        assert!(domain.current_sleep_start().is_none());
    }

    #[test]
    fn test_invalid_sessions_are_dropped_and_durations_recomputed() {
        let mut dto = stored(false, None);
        dto.sessions = vec![
            SleepSession {
                id: "sleep::1".to_string(),
                start_time: at(12, 0),
                end_time: Some(at(13, 30)),
                duration_minutes: Some(5),
            },
            SleepSession {
                id: "sleep::2".to_string(),
                start_time: at(11, 0),
                end_time: Some(at(10, 0)),
                duration_minutes: Some(60),
            },
        ];

        let domain = SleepStatusMapper::to_domain(dto);
        assert_eq!(domain.sessions.len(), 1);
        assert_eq!(domain.sessions[0].duration_minutes, Some(90));
    }

    #[test]
    fn test_out_of_range_stored_age_is_clamped() {
        let mut dto = stored(false, None);
        dto.baby_age_months = 200;
        assert_eq!(SleepStatusMapper::to_domain(dto).baby_age_months, 48);
    }

    #[test]
    fn test_negative_stored_age_keeps_sessions() {
        let dto: SleepStatus = serde_json::from_str(
            r#"{
                "babyAgeMonths": -1,
                "isAsleep": false,
                "lastWakeTime": "2025-03-10T13:00:00Z",
                "sessions": [{
                    "id": "sleep::1",
                    "startTime": "2025-03-10T12:00:00Z",
                    "endTime": "2025-03-10T13:00:00Z",
                    "durationMinutes": 60
                }]
            }"#,
        )
        .unwrap();

        let domain = SleepStatusMapper::to_domain(dto);
        assert_eq!(domain.baby_age_months, 0);
        assert_eq!(domain.sessions.len(), 1);
        assert_eq!(domain.sessions[0].duration_minutes, Some(60));
    }
}
