/// Habit entity and its query projections
///
/// This module defines the full Habit record along with the smaller shapes
/// the store returns for the check-off path, listings and streak lookups.

use serde::{Deserialize, Serialize};
use chrono::{Local, NaiveDateTime, Timelike};
use crate::domain::{Cadence, CompletionDates, DomainError, StreakCounts};

/// A habit the user wants to repeat on a fixed cadence
///
/// The name is the primary key. Streak counters are absent until the
/// first check-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique, title-cased name (e.g., "Morning Run")
    pub name: String,
    /// What the habit is about; never empty
    pub description: String,
    /// Local time of creation, truncated to the minute
    pub created_at: Option<NaiveDateTime>,
    /// Daily or weekly; fixed at creation
    pub cadence: Cadence,
    /// Dates the habit was checked off
    pub completed_dates: CompletionDates,
    /// Most recent run, if ever computed
    pub current_streak: Option<u32>,
    /// Longest run, if ever computed
    pub longest_streak: Option<u32>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// The creation time is the current local time with seconds and
    /// sub-seconds dropped.
    pub fn new(name: String, description: String, cadence: Cadence) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;

        Ok(Self {
            name,
            description,
            created_at: Some(truncate_to_minute(Local::now().naive_local())),
            cadence,
            completed_dates: CompletionDates::new(),
            current_streak: None,
            longest_streak: None,
        })
    }

    /// Stored streak counters, treating never-computed values as zero
    pub fn streaks(&self) -> StreakCounts {
        StreakCounts::new(
            self.current_streak.unwrap_or(0),
            self.longest_streak.unwrap_or(0),
        )
    }

    /// Check the name and description given to a rename
    pub fn validate_update(new_name: &str, description: &str) -> Result<(), DomainError> {
        Self::validate_name(new_name)?;
        Self::validate_description(description)
    }

    fn validate_name(name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        Ok(())
    }

    fn validate_description(description: &str) -> Result<(), DomainError> {
        if description.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Description cannot be empty".to_string()
            });
        }

        Ok(())
    }
}

/// Drop seconds and sub-second precision from a timestamp
pub fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// The three fields the check-off path needs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitSummary {
    pub name: String,
    pub completed_dates: CompletionDates,
    pub cadence: Cadence,
}

/// One row of a habit listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitRow {
    pub name: String,
    pub description: String,
    pub created_at: Option<NaiveDateTime>,
    pub cadence: Cadence,
    /// Entries exactly as stored
    pub completed_dates: Vec<String>,
}

impl HabitRow {
    /// Cell values in column order, formatted for plain-text display
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.description.clone(),
            self.created_at
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "None".to_string()),
            self.cadence.to_string(),
            format!("{:?}", self.completed_dates),
        ]
    }
}

/// Column names plus rows, as returned by the listing queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HabitListing {
    pub columns: Vec<String>,
    pub rows: Vec<HabitRow>,
}

impl HabitListing {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The habit holding the all-time longest streak
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LongestStreak {
    pub name: String,
    pub longest_streak: u32,
}
