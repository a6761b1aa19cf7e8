//! Aggregate queries over the append-only logs.
//!
//! "Today" is the half-open range `[local midnight, local midnight + 24h)` of
//! the calendar day containing `now`, in `now`'s own time zone. Nothing is
//! cached; each query walks the full list.

use chrono::{DateTime, Duration, NaiveTime, Offset, TimeZone, Utc};
use shared::{FeedingLog, FeedingType, Mood, MoodCount, MoodEntry, SleepSession};
use std::collections::BTreeMap;

// Skipped local times are tried in quarter-hour steps, up to three hours
const GAP_STEP_MINUTES: i64 = 15;
const MAX_GAP_STEPS: i64 = 12;

/// Anything recorded at a point in time
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

impl Timestamped for SleepSession {
    fn timestamp(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Timestamped for FeedingLog {
    fn timestamp(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Timestamped for MoodEntry {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Start and end of the calendar day containing `now`
///
/// When a DST jump skips local midnight the day starts at the first local
/// time that exists.
pub fn today_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let local_midnight = now.date_naive().and_time(NaiveTime::MIN);
    let timezone = now.timezone();
    let start = (0..=MAX_GAP_STEPS)
        .map(|step| local_midnight + Duration::minutes(step * GAP_STEP_MINUTES))
        .find_map(|local| timezone.from_local_datetime(&local).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or_else(|| {
            let offset_seconds = i64::from(now.offset().fix().local_minus_utc());
            (local_midnight - Duration::seconds(offset_seconds)).and_utc()
        });
    (start, start + Duration::hours(24))
}

/// Entries whose timestamp falls on `now`'s calendar day
pub fn entries_today<'a, T, Tz>(entries: &'a [T], now: &DateTime<Tz>) -> Vec<&'a T>
where
    T: Timestamped,
    Tz: TimeZone,
{
    let (start, end) = today_bounds(now);
    entries
        .iter()
        .filter(|entry| {
            let ts = entry.timestamp();
            start <= ts && ts < end
        })
        .collect()
}

/// Entry with the latest timestamp
pub fn most_recent<T: Timestamped>(entries: &[T]) -> Option<&T> {
    entries.iter().max_by_key(|entry| entry.timestamp())
}

pub fn total_sleep_minutes<'a, I>(sessions: I) -> i64
where
    I: IntoIterator<Item = &'a SleepSession>,
{
    sessions
        .into_iter()
        .map(|session| session.duration_minutes.unwrap_or(0))
        .sum()
}

pub fn total_sleep_minutes_today<Tz: TimeZone>(sessions: &[SleepSession], now: &DateTime<Tz>) -> i64 {
    total_sleep_minutes(entries_today(sessions, now))
}

pub fn nap_count_today<Tz: TimeZone>(sessions: &[SleepSession], now: &DateTime<Tz>) -> usize {
    entries_today(sessions, now).len()
}

pub fn total_feeding_seconds<'a, I>(logs: I) -> i64
where
    I: IntoIterator<Item = &'a FeedingLog>,
{
    logs.into_iter().map(|log| log.duration_seconds).sum()
}

/// Latest log for each feeding type, ordered left, right, bottle
pub fn most_recent_by_type(logs: &[FeedingLog]) -> Vec<&FeedingLog> {
    [FeedingType::LeftBreast, FeedingType::RightBreast, FeedingType::Bottle]
        .into_iter()
        .filter_map(|feeding_type| {
            logs.iter()
                .filter(|log| log.feeding_type == feeding_type)
                .max_by_key(|log| log.start_time)
        })
        .collect()
}

/// The breast not used by the most recent breast feed
pub fn suggested_next_side(logs: &[FeedingLog]) -> Option<FeedingType> {
    logs.iter()
        .filter(|log| log.feeding_type.is_breast())
        .max_by_key(|log| log.start_time)
        .map(|log| match log.feeding_type {
            FeedingType::LeftBreast => FeedingType::RightBreast,
            _ => FeedingType::LeftBreast,
        })
}

/// Count of each mood among the given entries, most frequent first
pub fn mood_counts<'a, I>(entries: I) -> Vec<MoodCount>
where
    I: IntoIterator<Item = &'a MoodEntry>,
{
    let mut counts: BTreeMap<Mood, usize> = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.mood).or_insert(0) += 1;
    }

    let mut counts: Vec<MoodCount> = counts
        .into_iter()
        .map(|(mood, count)| MoodCount { mood, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then(a.mood.cmp(&b.mood)));
    counts
}
