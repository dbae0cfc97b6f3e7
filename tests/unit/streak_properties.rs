/// Properties of the streak computation
use chrono::{Duration, NaiveDate};
use habit_streaks::*;

fn days_from(start: &str, offsets: &[i64]) -> Vec<String> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    offsets
        .iter()
        .map(|o| (start + Duration::days(*o)).format("%Y-%m-%d").to_string())
        .collect()
}

#[test]
fn test_empty_and_single() {
    let empty: Vec<String> = Vec::new();
    assert_eq!(compute_streak(&empty, 1).unwrap(), StreakCounts::new(0, 0));
    assert_eq!(compute_streak(&["2023-01-01"], 7).unwrap(), StreakCounts::new(1, 1));
}

#[test]
fn test_reference_daily_history() {
    let offsets: Vec<i64> = (0..16).chain(17..29).collect();
    let dates = days_from("2023-01-01", &offsets);

    assert_eq!(compute_streak(&dates, 1).unwrap(), StreakCounts::new(12, 16));
}

#[test]
fn test_reference_weekly_history() {
    let dates = ["2023-01-01", "2023-01-08", "2023-01-15", "2023-01-22", "2023-02-04", "2023-02-11"];
    assert_eq!(compute_streak(&dates, 7).unwrap(), StreakCounts::new(2, 4));
}

#[test]
fn test_order_independence() {
    let offsets = [0, 1, 2, 4, 5, 9, 10, 11, 12];
    let forward = days_from("2024-02-26", &offsets);
    let mut reversed = forward.clone();
    reversed.reverse();
    let mut rotated = forward.clone();
    rotated.rotate_left(4);

    let expected = compute_streak(&forward, 1).unwrap();
    assert_eq!(expected, StreakCounts::new(4, 4));
    assert_eq!(compute_streak(&reversed, 1).unwrap(), expected);
    assert_eq!(compute_streak(&rotated, 1).unwrap(), expected);
}

#[test]
fn test_longest_never_below_current() {
    let histories: [&[i64]; 4] = [&[0], &[0, 1, 2], &[0, 5, 6], &[0, 1, 3, 4, 5, 6]];

    for offsets in histories {
        let streak = compute_streak(&days_from("2023-07-01", offsets), 1).unwrap();
        assert!(streak.longest >= streak.current, "{:?} for {:?}", streak, offsets);
    }
}

#[test]
fn test_leap_day_counts_as_consecutive() {
    let streak = compute_streak(&["2024-02-28", "2024-02-29", "2024-03-01"], 1).unwrap();
    assert_eq!(streak, StreakCounts::new(3, 3));
}

#[test]
fn test_parsed_and_string_paths_agree() {
    let strings = days_from("2023-03-01", &[0, 7, 14, 28]);
    let dates: CompletionDates = strings
        .iter()
        .map(|s| parse_calendar_date(s).unwrap())
        .collect();

    assert_eq!(
        StreakCounts::from_dates(dates.iter().copied(), Cadence::Weekly.interval_days()),
        compute_streak(&strings, 7).unwrap()
    );
}

#[test]
fn test_invalid_date_is_rejected() {
    let result = compute_streak(&["2023-02-30"], 1);
    assert!(matches!(result, Err(DomainError::InvalidDate(_))));
}

#[test]
fn test_name_normalization_matches_store_keys() {
    assert_eq!(normalize_habit_name(" drink WATER").unwrap(), "Drink Water");
    assert!(normalize_habit_name("").is_err());
}
