/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. It provides
/// a keyed interface over habit records: the habit name is the only key.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{
    Cadence, DomainError, Habit, HabitListing, HabitSummary, LongestStreak, StreakCounts,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Habit not found: {name}")]
    HabitNotFound { name: String },

    #[error("A habit named '{name}' already exists")]
    DuplicateName { name: String },

    #[error("Stored data is invalid: {0}")]
    Domain(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl StorageError {
    pub(crate) fn not_found(name: &str) -> Self {
        StorageError::HabitNotFound { name: name.to_string() }
    }
}

/// Trait defining the storage interface for habits
///
/// Every mutating call commits before it returns. Names are used exactly as
/// given; normalizing them is the caller's job.
pub trait HabitStorage {
    /// Insert a new habit; fails with `DuplicateName` if the name is taken
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get the complete record for a habit
    fn get_habit(&self, name: &str) -> Result<Habit, StorageError>;

    /// Get the name, completion dates and cadence of a habit
    fn get_summary(&self, name: &str) -> Result<HabitSummary, StorageError>;

    /// List habits in insertion order, optionally restricted to one cadence
    fn list_habits(&self, cadence: Option<Cadence>) -> Result<HabitListing, StorageError>;

    /// Change a habit's name and description in one step
    fn rename_habit(
        &self,
        old_name: &str,
        new_name: &str,
        description: &str,
    ) -> Result<(), StorageError>;

    /// Remove a habit record entirely
    fn delete_habit(&self, name: &str) -> Result<(), StorageError>;

    /// Add a completion date, returning false when it was already recorded
    fn append_completion(&self, name: &str, date: NaiveDate) -> Result<bool, StorageError>;

    /// Get stored streaks for a habit with the given name and cadence
    fn get_streaks(&self, name: &str, cadence: Cadence) -> Result<StreakCounts, StorageError>;

    /// Overwrite the stored streak counters
    fn set_streaks(&self, name: &str, streaks: StreakCounts) -> Result<(), StorageError>;

    /// The habit with the highest longest streak, or None if there are no habits
    fn longest_streak_record(&self) -> Result<Option<LongestStreak>, StorageError>;

    /// Number of stored habits, without decoding any row
    fn count_habits(&self) -> Result<usize, StorageError>;
}
