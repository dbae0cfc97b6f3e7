/// Streak calculation functionality
///
/// This module defines the StreakCounts pair stored on every habit and the
/// pure calculation that derives it from a list of completion dates.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{parse_calendar_date, DomainError};

/// Current and longest streak for a habit
///
/// A streak is a run of completions spaced exactly one cadence interval
/// apart. `current` is the run the sorted date list ends with, which is not
/// necessarily a run that reaches today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakCounts {
    /// Length of the most recent run
    pub current: u32,
    /// Length of the longest run in the list
    pub longest: u32,
}

impl StreakCounts {
    pub fn new(current: u32, longest: u32) -> Self {
        Self { current, longest }
    }

    /// Walk already-parsed dates and count runs
    ///
    /// The dates are sorted first, so input order does not matter. An empty
    /// list gives (0, 0) and any non-empty list starts both counters at 1.
    pub fn from_dates<I>(dates: I, interval_days: i64) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut sorted: Vec<NaiveDate> = dates.into_iter().collect();
        sorted.sort_unstable();

        if sorted.is_empty() {
            return Self::default();
        }

        let mut current = 1;
        let mut longest = 1;

        for pair in sorted.windows(2) {
            if (pair[1] - pair[0]).num_days() == interval_days {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 1;
            }
        }

        Self { current, longest }
    }

    /// Get a short message describing the current streak
    pub fn summary_message(&self) -> String {
        match self.current {
            0 => "No completions yet. Check off the habit to start a streak.".to_string(),
            1 => format!("Current streak: 1 | Longest streak: {}", self.longest),
            n => format!("🔥 Current streak: {} | Longest streak: {}", n, self.longest),
        }
    }
}

/// Compute the streak pair from `YYYY-MM-DD` strings and a cadence interval
///
/// Every entry is parsed before anything is counted; the first malformed
/// entry fails the whole computation with `DomainError::InvalidDate`.
pub fn compute_streak<S: AsRef<str>>(
    dates: &[S],
    interval_days: i64,
) -> Result<StreakCounts, DomainError> {
    let parsed = dates
        .iter()
        .map(|d| parse_calendar_date(d.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StreakCounts::from_dates(parsed, interval_days))
}
