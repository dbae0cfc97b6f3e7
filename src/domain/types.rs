/// Core types used throughout the domain layer
///
/// This module defines the Cadence enum and the habit-name normalization
/// rule that every caller applies before touching the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use crate::domain::DomainError;

/// How often a habit should be performed
///
/// A cadence is a fixed day-count between completions. Streaks compare the
/// exact gap between consecutive dates against this count, so a weekly habit
/// has to be checked off on the same weekday to keep its streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cadence {
    /// Every single day
    Daily,
    /// Once every seven days
    Weekly,
}

impl Cadence {
    /// Number of days expected between two consecutive completions
    pub fn interval_days(&self) -> i64 {
        match self {
            Cadence::Daily => 1,
            Cadence::Weekly => 7,
        }
    }

    /// Value stored in the `period` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Daily => "Daily",
            Cadence::Weekly => "Weekly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = DomainError;

    /// Parse a cadence, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Cadence::Daily),
            "weekly" => Ok(Cadence::Weekly),
            _ => Err(DomainError::InvalidCadence(format!(
                "'{}' is not a cadence. Valid options: daily, weekly",
                s
            ))),
        }
    }
}

/// Normalize a habit name the way every caller must before using it as a key
///
/// Surrounding whitespace is trimmed and the name is title-cased: a letter
/// that follows another letter is lowercased, any other letter is uppercased
/// ("  morning RUN " becomes "Morning Run").
pub fn normalize_habit_name(raw: &str) -> Result<String, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidHabitName(
            "Habit name cannot be empty".to_string(),
        ));
    }

    let mut normalized = String::with_capacity(trimmed.len());
    let mut previous_is_letter = false;
    for ch in trimmed.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                normalized.extend(ch.to_lowercase());
            } else {
                normalized.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            normalized.push(ch);
            previous_is_letter = false;
        }
    }

    Ok(normalized)
}
