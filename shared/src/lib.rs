use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One completed (or, transiently, open) sleep interval.
///
/// Session ID in format: "sleep::epoch_millis" (start time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSession {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
}

impl SleepSession {
    pub fn generate_id(start_time: DateTime<Utc>) -> String {
        format!("sleep::{}", start_time.timestamp_millis())
    }
}

/// Persisted shape of the per-user sleep tracker state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepStatus {
    #[serde(deserialize_with = "deserialize_saturating_age")]
    pub baby_age_months: u8,
    pub is_asleep: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_sleep_start: Option<DateTime<Utc>>,
    pub last_wake_time: DateTime<Utc>,
    #[serde(default)]
    pub sessions: Vec<SleepSession>,
}

/// Read any numeric age, saturating into `u8` instead of rejecting the document
fn deserialize_saturating_age<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAge {
        Whole(i64),
        Fractional(f64),
    }

    let age = match RawAge::deserialize(deserializer)? {
        RawAge::Whole(age) => age,
        RawAge::Fractional(age) if age.is_finite() => age.floor() as i64,
        RawAge::Fractional(_) => 0,
    };
    Ok(age.clamp(0, u8::MAX as i64) as u8)
}

/// Recommended awake range for a baby's age
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WakeWindow {
    pub min_minutes: i64,
    pub max_minutes: i64,
    pub min_naps: u8,
    pub max_naps: u8,
}

impl WakeWindow {
    /// Human readable nap count, e.g. "3 naps" or "2-3 naps"
    pub fn nap_count_label(&self) -> String {
        if self.min_naps == self.max_naps {
            let noun = if self.min_naps == 1 { "nap" } else { "naps" };
            format!("{} {}", self.min_naps, noun)
        } else {
            format!("{}-{} naps", self.min_naps, self.max_naps)
        }
    }
}

/// Wake window plus its display label, as returned to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WakeWindowResponse {
    pub age_months: i32,
    pub window: WakeWindow,
    pub nap_count_label: String,
}

/// Derived values shown while the baby is awake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WakePrediction {
    pub window: WakeWindow,
    pub elapsed_minutes: i64,
    pub is_in_window: bool,
    pub is_past_window: bool,
    pub is_overtired: bool,
    pub progress_percent: f64,
    pub minutes_until_window_opens: i64,
    pub minutes_until_window_closes: i64,
    pub window_opens_at: DateTime<Utc>,
    pub window_closes_at: DateTime<Utc>,
}

/// What the periodic refresh publishes for the sleep screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionSnapshot {
    pub computed_at: DateTime<Utc>,
    pub is_asleep: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asleep_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<WakePrediction>,
}

/// Today's sleep totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSummary {
    pub total_sleep_minutes_today: i64,
    pub nap_count_today: usize,
    pub sessions_today: Vec<SleepSession>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBabyAgeRequest {
    pub baby_age_months: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WokeUpResponse {
    pub session: SleepSession,
    pub status: SleepStatus,
}

/// Mood options offered by the daily check-in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Good,
    Okay,
    Tired,
    Anxious,
    Sad,
    Overwhelmed,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Tired => "tired",
            Mood::Anxious => "anxious",
            Mood::Sad => "sad",
            Mood::Overwhelmed => "overwhelmed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub id: Uuid,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMoodRequest {
    pub mood: Mood,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodTodayResponse {
    pub entries: Vec<MoodEntry>,
    pub counts: Vec<MoodCount>,
    pub latest: Option<MoodEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodCount {
    pub mood: Mood,
    pub count: usize,
}

/// How a feed was given
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedingType {
    LeftBreast,
    RightBreast,
    Bottle,
}

impl FeedingType {
    pub fn is_breast(&self) -> bool {
        matches!(self, FeedingType::LeftBreast | FeedingType::RightBreast)
    }
}

impl fmt::Display for FeedingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FeedingType::LeftBreast => "left-breast",
            FeedingType::RightBreast => "right-breast",
            FeedingType::Bottle => "bottle",
        };
        f.write_str(label)
    }
}

/// Feed ID in format: "feed::epoch_millis" (start time)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingLog {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub duration_seconds: i64,
    pub feeding_type: FeedingType,
    #[serde(default)]
    pub notes: String,
}

impl FeedingLog {
    pub fn generate_id(start_time: DateTime<Utc>) -> String {
        format!("feed::{}", start_time.timestamp_millis())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopFeedingRequest {
    pub feeding_type: FeedingType,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingTimerResponse {
    pub is_running: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub elapsed_seconds: i64,
    pub reminder_due: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedingTodayResponse {
    pub logs: Vec<FeedingLog>,
    pub feed_count_today: usize,
    pub total_feeding_seconds_today: i64,
    pub last_by_type: Vec<FeedingLog>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_next_side: Option<FeedingType>,
}

/// Feeding approach declared in the user's profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedingPreference {
    Breastfeeding,
    Formula,
    Combination,
}

/// Read-only profile data supplied by the auth/profile backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baby_age_months: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feeding_type: Option<FeedingPreference>,
    #[serde(default)]
    pub is_expecting: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTipResponse {
    pub audience: String,
    pub tip: String,
}

/// Active sleep training plan, owned by the sleep-training feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepTrainingProgram {
    pub method_id: String,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
}

/// Answers from the sleep assessment questionnaire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepAssessment {
    pub baby_name: String,
    pub baby_age_months: u8,
    #[serde(default)]
    pub main_problems: Vec<String>,
    #[serde(default)]
    pub crying_tolerance: String,
}

/// Sleep-training details attached to an outgoing chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepContext {
    pub has_active_program: bool,
    #[serde(flatten)]
    pub program: Option<ActiveProgramContext>,
}

impl SleepContext {
    pub fn inactive() -> Self {
        Self {
            has_active_program: false,
            program: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveProgramContext {
    pub baby_name: String,
    pub baby_age_months: u8,
    pub method_id: String,
    pub current_night: i64,
    pub main_problems: Vec<String>,
    pub crying_tolerance: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

/// Body accepted by the chat relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRelayRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baby_age: Option<u8>,
}

/// Body returned by the chat relay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatRelayResponse {
    Message { message: String },
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub baby_age: Option<u8>,
}
