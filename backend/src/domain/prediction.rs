//! Wake-window prediction math.
//!
//! The progress bar is split in two halves: the first half fills while the
//! baby is awake for less than the window minimum, the second half fills
//! across the ideal nap zone `[min, max]`. Past `max` it stays full.

use chrono::{DateTime, Duration, Utc};
use shared::{WakePrediction, WakeWindow};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Whole minutes between two instants, floored (negative if `to` precedes `from`)
pub fn floor_minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    (to - from).num_milliseconds().div_euclid(MILLIS_PER_MINUTE)
}

/// Piecewise progress through the wake window, in `[0, 100]`
pub fn progress_percent(window: &WakeWindow, elapsed_minutes: i64) -> f64 {
    let elapsed = elapsed_minutes as f64;
    let min = window.min_minutes as f64;
    let max = window.max_minutes as f64;

    let percent = if elapsed_minutes > window.max_minutes {
        100.0
    } else if elapsed_minutes >= window.min_minutes {
        if window.max_minutes > window.min_minutes {
            50.0 + ((elapsed - min) / (max - min)) * 50.0
        } else {
            100.0
        }
    } else if window.min_minutes > 0 {
        (elapsed / min) * 50.0
    } else {
        0.0
    };

    percent.clamp(0.0, 100.0)
}

/// Derive the awake-state display values at `now`
pub fn predict(
    window: WakeWindow,
    last_wake_time: DateTime<Utc>,
    now: DateTime<Utc>,
    overtired_grace_minutes: i64,
) -> WakePrediction {
    let elapsed_minutes = floor_minutes_between(last_wake_time, now);

    WakePrediction {
        window,
        elapsed_minutes,
        is_in_window: window.min_minutes <= elapsed_minutes && elapsed_minutes <= window.max_minutes,
        is_past_window: elapsed_minutes > window.max_minutes,
        is_overtired: elapsed_minutes > window.max_minutes.saturating_add(overtired_grace_minutes.max(0)),
        progress_percent: progress_percent(&window, elapsed_minutes),
        minutes_until_window_opens: window.min_minutes - elapsed_minutes,
        minutes_until_window_closes: window.max_minutes - elapsed_minutes,
        window_opens_at: last_wake_time + Duration::minutes(window.min_minutes),
        window_closes_at: last_wake_time + Duration::minutes(window.max_minutes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::wake_window::wake_window_for;
    use chrono::TimeZone;

    fn wake() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_six_month_examples() {
        let window = wake_window_for(6);
        assert_eq!(progress_percent(&window, 60), 25.0);
        assert_eq!(progress_percent(&window, 150), 75.0);
        assert_eq!(progress_percent(&window, 200), 100.0);

        let prediction = predict(window, wake(), wake() + Duration::minutes(200), 0);
        assert!(prediction.is_past_window);
        assert!(!prediction.is_in_window);
        assert_eq!(prediction.progress_percent, 100.0);
    }

    #[test]
    fn test_window_edges() {
        let window = wake_window_for(6);
        assert_eq!(progress_percent(&window, 0), 0.0);
        assert_eq!(progress_percent(&window, 120), 50.0);
        assert_eq!(progress_percent(&window, 180), 100.0);
        assert_eq!(progress_percent(&window, 181), 100.0);
    }

    #[test]
    fn test_progress_is_monotonic_and_bounded() {
        for age in 0..=12 {
            let window = wake_window_for(age);
            let mut previous = progress_percent(&window, -30);
            for elapsed in -30..=600 {
                let current = progress_percent(&window, elapsed);
                assert!((0.0..=100.0).contains(&current), "age {} elapsed {}", age, elapsed);
                assert!(current >= previous, "age {} elapsed {}", age, elapsed);
                previous = current;
            }
        }
    }

    #[test]
    fn test_degenerate_window_jumps_to_full() {
        let window = WakeWindow { min_minutes: 60, max_minutes: 60, min_naps: 1, max_naps: 1 };
        assert_eq!(progress_percent(&window, 30), 25.0);
        assert_eq!(progress_percent(&window, 60), 100.0);
    }

    #[test]
    fn test_elapsed_minutes_are_floored() {
        let now = wake() + Duration::seconds(59 * 60 + 59);
        let prediction = predict(wake_window_for(6), wake(), now, 0);
        assert_eq!(prediction.elapsed_minutes, 59);
    }

    #[test]
    fn test_future_wake_time_floors_below_zero() {
        assert_eq!(floor_minutes_between(wake(), wake() - Duration::seconds(30)), -1);
        let prediction = predict(wake_window_for(6), wake(), wake() - Duration::seconds(30), 0);
        assert_eq!(prediction.progress_percent, 0.0);
    }

    #[test]
    fn test_countdowns_and_window_times() {
        let prediction = predict(wake_window_for(6), wake(), wake() + Duration::minutes(150), 0);
        assert!(prediction.is_in_window);
        assert_eq!(prediction.minutes_until_window_opens, -30);
        assert_eq!(prediction.minutes_until_window_closes, 30);
        assert_eq!(prediction.window_opens_at, wake() + Duration::minutes(120));
        assert_eq!(prediction.window_closes_at, wake() + Duration::minutes(180));
    }

    #[test]
    fn test_overtired_respects_grace() {
        let now = wake() + Duration::minutes(190);
        assert!(predict(wake_window_for(6), wake(), now, 0).is_overtired);
        let with_grace = predict(wake_window_for(6), wake(), now, 15);
        assert!(with_grace.is_past_window);
        assert!(!with_grace.is_overtired);
    }

    #[test]
    fn test_huge_grace_never_overtired() {
        let prediction = predict(wake_window_for(6), wake(), wake() + Duration::days(3), i64::MAX);
        assert!(prediction.is_past_window);
        assert!(!prediction.is_overtired);
    }
}
