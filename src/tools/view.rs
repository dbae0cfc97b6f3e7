/// Tools for viewing a habit and its streaks
///
/// This module implements habit_view, habit_streaks and
/// habit_longest_streak.

use serde::{Deserialize, Serialize};
use crate::domain::{normalize_habit_name, Cadence, Habit, LongestStreak, StreakCounts};
use crate::storage::HabitStorage;
use crate::TrackerError;

/// Parameters for viewing one habit
#[derive(Debug, Deserialize)]
pub struct ViewHabitParams {
    pub name: String,
}

/// Response with the full habit record
#[derive(Debug, Serialize)]
pub struct ViewHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Parameters for looking up streaks
#[derive(Debug, Deserialize)]
pub struct StreaksParams {
    pub name: String,
    pub cadence: String,
}

/// Response with a habit's stored streaks
#[derive(Debug, Serialize)]
pub struct StreaksResponse {
    pub name: String,
    pub streaks: StreakCounts,
    pub message: String,
}

/// Response naming the habit with the longest streak on record
#[derive(Debug, Serialize)]
pub struct LongestStreakResponse {
    pub record: Option<LongestStreak>,
    pub message: String,
}

/// Show every field of a habit
pub fn view_habit<S: HabitStorage>(
    storage: &S,
    params: ViewHabitParams,
) -> Result<ViewHabitResponse, TrackerError> {
    let name = normalize_habit_name(&params.name)?;
    let habit = storage.get_habit(&name)?;

    let created = habit
        .created_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let message = format!(
        "Habit: {}\nDescription: {}\nDate and Time of Creation: {}\nPeriod: {}\nCompleted Dates: {:?}",
        habit.name,
        habit.description,
        created,
        habit.cadence,
        habit.completed_dates.to_strings(),
    );

    Ok(ViewHabitResponse { habit, message })
}

/// Show the stored current and longest streak of a habit
pub fn get_habit_streaks<S: HabitStorage>(
    storage: &S,
    params: StreaksParams,
) -> Result<StreaksResponse, TrackerError> {
    let name = normalize_habit_name(&params.name)?;
    let cadence: Cadence = params.cadence.parse()?;

    let streaks = storage.get_streaks(&name, cadence)?;

    Ok(StreaksResponse {
        message: format!(
            "Longest Streak: {}\nCurrent Streak: {}",
            streaks.longest, streaks.current
        ),
        name,
        streaks,
    })
}

/// Find the longest streak across all habits
pub fn get_longest_streak<S: HabitStorage>(storage: &S) -> Result<LongestStreakResponse, TrackerError> {
    let record = storage.longest_streak_record()?;

    let message = match &record {
        Some(best) => format!(
            "Your longest all-time streak is '{}' for the habit '{}'",
            best.longest_streak, best.name
        ),
        None => "No habit data found.".to_string(),
    };

    Ok(LongestStreakResponse { record, message })
}
