/// Streak engine for recomputing and persisting streak counters
///
/// The calculation itself is pure and lives in `domain::streak`. This module
/// wires it to the store: it loads completion dates, derives the streak pair
/// for the habit's cadence and writes the result back.

use chrono::NaiveDate;
use serde::Serialize;
use crate::domain::{compute_streak, Cadence, CompletionDates, StreakCounts};
use crate::storage::{HabitStorage, StorageError};

/// Result of checking off a habit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckOffOutcome {
    /// Habit that was checked off
    pub name: String,
    /// Cadence the streaks were computed with
    pub cadence: Cadence,
    /// Date that was recorded
    pub date: NaiveDate,
    /// False when the date had already been recorded
    pub recorded: bool,
    /// Streaks after recomputation
    pub streaks: StreakCounts,
}

/// Streak engine
///
/// Recomputation always replaces the stored pair. A longest streak that
/// shrinks because dates were edited is stored as the smaller value.
#[derive(Debug, Default, Clone, Copy)]
pub struct StreakEngine;

impl StreakEngine {
    /// Create a new streak engine
    pub fn new() -> Self {
        Self
    }

    /// Compute streaks from a completion set and store them on the habit
    pub fn recompute<S: HabitStorage>(
        &self,
        storage: &S,
        name: &str,
        dates: &CompletionDates,
        cadence: Cadence,
    ) -> Result<StreakCounts, StorageError> {
        let streaks = StreakCounts::from_dates(dates.iter().copied(), cadence.interval_days());
        storage.set_streaks(name, streaks)?;

        tracing::debug!(
            "Recomputed {} streaks for '{}' over {} dates: {:?}",
            cadence, name, dates.len(), streaks
        );
        Ok(streaks)
    }

    /// Compute streaks from raw `YYYY-MM-DD` strings and store them
    ///
    /// Nothing is written if any entry fails to parse.
    pub fn recompute_from_strings<S: HabitStorage, D: AsRef<str>>(
        &self,
        storage: &S,
        name: &str,
        dates: &[D],
        interval_days: i64,
    ) -> Result<StreakCounts, StorageError> {
        let streaks = compute_streak(dates, interval_days)?;
        storage.set_streaks(name, streaks)?;
        Ok(streaks)
    }

    /// Record a completion for `date` and refresh the habit's streaks
    ///
    /// When `expected_cadence` is given the habit must have that cadence;
    /// the check happens before anything is written. The steps commit one
    /// by one, so a failure while storing streaks leaves the appended date
    /// in place.
    pub fn check_off<S: HabitStorage>(
        &self,
        storage: &S,
        name: &str,
        expected_cadence: Option<Cadence>,
        date: NaiveDate,
    ) -> Result<CheckOffOutcome, StorageError> {
        let summary = storage.get_summary(name)?;

        if let Some(expected) = expected_cadence {
            if summary.cadence != expected {
                return Err(StorageError::HabitNotFound {
                    name: format!("{} ({})", name, expected),
                });
            }
        }

        let recorded = storage.append_completion(&summary.name, date)?;

        // Streaks are derived from what was actually persisted
        let stored = storage.get_summary(&summary.name)?;
        let streaks = self.recompute(storage, &stored.name, &stored.completed_dates, stored.cadence)?;

        tracing::info!(
            "Checked off '{}' for {} (new entry: {}), current streak {}",
            stored.name, date, recorded, streaks.current
        );

        Ok(CheckOffOutcome {
            name: stored.name,
            cadence: stored.cadence,
            date,
            recorded,
            streaks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DomainError, Habit};
    use crate::storage::SqliteStorage;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn storage_with(name: &str, cadence: Cadence) -> SqliteStorage {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let habit = Habit::new(name.to_string(), "Test habit".to_string(), cadence).unwrap();
        storage.create_habit(&habit).unwrap();
        storage
    }

    #[test]
    fn test_check_off_builds_daily_streak() {
        let storage = storage_with("Read", Cadence::Daily);
        let engine = StreakEngine::new();

        for day in ["2023-01-01", "2023-01-02", "2023-01-03"] {
            engine.check_off(&storage, "Read", Some(Cadence::Daily), date(day)).unwrap();
        }
        let outcome = engine.check_off(&storage, "Read", None, date("2023-01-05")).unwrap();

        assert!(outcome.recorded);
        assert_eq!(outcome.streaks, StreakCounts::new(1, 3));
        assert_eq!(storage.get_streaks("Read", Cadence::Daily).unwrap(), StreakCounts::new(1, 3));
    }

    #[test]
    fn test_repeat_check_off_is_noop() {
        let storage = storage_with("Read", Cadence::Daily);
        let engine = StreakEngine::new();

        engine.check_off(&storage, "Read", None, date("2023-01-01")).unwrap();
        let again = engine.check_off(&storage, "Read", None, date("2023-01-01")).unwrap();

        assert!(!again.recorded);
        assert_eq!(again.streaks, StreakCounts::new(1, 1));
        assert_eq!(storage.get_habit("Read").unwrap().completed_dates.len(), 1);
    }

    #[test]
    fn test_weekly_check_off_uses_seven_day_interval() {
        let storage = storage_with("Swim", Cadence::Weekly);
        let engine = StreakEngine::new();

        for day in ["2023-01-01", "2023-01-08", "2023-01-15"] {
            engine.check_off(&storage, "Swim", Some(Cadence::Weekly), date(day)).unwrap();
        }

        assert_eq!(storage.get_streaks("Swim", Cadence::Weekly).unwrap(), StreakCounts::new(3, 3));
    }

    #[test]
    fn test_cadence_mismatch_writes_nothing() {
        let storage = storage_with("Read", Cadence::Daily);
        let engine = StreakEngine::new();

        let result = engine.check_off(&storage, "Read", Some(Cadence::Weekly), date("2023-01-01"));
        assert!(matches!(result, Err(StorageError::HabitNotFound { .. })));
        assert!(storage.get_habit("Read").unwrap().completed_dates.is_empty());
    }

    #[test]
    fn test_check_off_unknown_habit() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let result = StreakEngine::new().check_off(&storage, "Ghost", None, date("2023-01-01"));
        assert!(matches!(result, Err(StorageError::HabitNotFound { .. })));
    }

    #[test]
    fn test_recompute_replaces_previous_longest() {
        let storage = storage_with("Read", Cadence::Daily);
        storage.set_streaks("Read", StreakCounts::new(10, 10)).unwrap();

        let streaks = StreakEngine::new()
            .recompute_from_strings(&storage, "Read", &["2023-02-01", "2023-02-02"], 1)
            .unwrap();

        assert_eq!(streaks, StreakCounts::new(2, 2));
        assert_eq!(storage.get_habit("Read").unwrap().longest_streak, Some(2));
    }

    #[test]
    fn test_recompute_with_bad_date_keeps_stored_streaks() {
        let storage = storage_with("Read", Cadence::Daily);
        storage.set_streaks("Read", StreakCounts::new(4, 6)).unwrap();

        let result = StreakEngine::new().recompute_from_strings(&storage, "Read", &["2023-13-01"], 1);

        assert!(matches!(result, Err(StorageError::Domain(DomainError::InvalidDate(_)))));
        assert_eq!(storage.get_streaks("Read", Cadence::Daily).unwrap(), StreakCounts::new(4, 6));
    }
}
