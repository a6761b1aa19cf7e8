//! Age-to-wake-window lookup.
//!
//! Twelve buckets run from newborn (0-1 months) to 12+ months. Ages are
//! clamped to `[0, 12]` before lookup, so toddlers reuse the 12-month bucket
//! and negative ages read as newborn.

use shared::WakeWindow;

/// Oldest age with its own bucket
pub const MAX_TABLE_AGE_MONTHS: i32 = 12;

/// (first age in bucket, min minutes, max minutes, min naps, max naps)
const WAKE_WINDOW_TABLE: [(i32, i64, i64, u8, u8); 12] = [
    (0, 45, 60, 5, 6),
    (2, 60, 90, 4, 5),
    (3, 75, 105, 4, 5),
    (4, 90, 120, 3, 4),
    (5, 105, 150, 3, 4),
    (6, 120, 180, 3, 3),
    (7, 150, 210, 2, 3),
    (8, 150, 210, 2, 3),
    (9, 180, 240, 2, 2),
    (10, 180, 240, 2, 2),
    (11, 195, 255, 2, 2),
    (12, 210, 270, 1, 2),
];

/// Recommended awake range for a baby of `age_months`
pub fn wake_window_for(age_months: i32) -> WakeWindow {
    let age = age_months.clamp(0, MAX_TABLE_AGE_MONTHS);
    let (_, min_minutes, max_minutes, min_naps, max_naps) = WAKE_WINDOW_TABLE
        .iter()
        .rev()
        .find(|(first_age, ..)| *first_age <= age)
        .copied()
        .unwrap_or(WAKE_WINDOW_TABLE[0]);

    WakeWindow {
        min_minutes,
        max_minutes,
        min_naps,
        max_naps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_months() {
        let window = wake_window_for(6);
        assert_eq!(window.min_minutes, 120);
        assert_eq!(window.max_minutes, 180);
        assert_eq!(window.nap_count_label(), "3 naps");
    }

    #[test]
    fn test_newborn_bucket_covers_first_two_ages() {
        assert_eq!(wake_window_for(0), wake_window_for(1));
        assert_eq!(wake_window_for(0).min_minutes, 45);
    }

    #[test]
    fn test_min_never_exceeds_max() {
        for age in 0..=MAX_TABLE_AGE_MONTHS {
            let window = wake_window_for(age);
            assert!(window.min_minutes <= window.max_minutes, "age {}", age);
            assert!(window.min_naps <= window.max_naps, "age {}", age);
        }
    }

    #[test]
    fn test_windows_are_monotonic_in_age() {
        for age in 1..=MAX_TABLE_AGE_MONTHS {
            let previous = wake_window_for(age - 1);
            let current = wake_window_for(age);
            assert!(current.min_minutes >= previous.min_minutes, "min at age {}", age);
            assert!(current.max_minutes >= previous.max_minutes, "max at age {}", age);
        }
    }

    #[test]
    fn test_older_ages_reuse_twelve_month_bucket() {
        let twelve = wake_window_for(12);
        for age in [13, 18, 24, 48, 120] {
            assert_eq!(wake_window_for(age), twelve);
        }
    }

    #[test]
    fn test_negative_age_clamps_to_newborn() {
        assert_eq!(wake_window_for(-5), wake_window_for(0));
    }

    #[test]
    fn test_table_has_twelve_ordered_buckets() {
        assert_eq!(WAKE_WINDOW_TABLE.len(), 12);
        assert!(WAKE_WINDOW_TABLE.windows(2).all(|pair| pair[0].0 < pair[1].0));
    }
}
