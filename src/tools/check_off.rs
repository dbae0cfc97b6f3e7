/// Tool for checking off habits
///
/// This module implements the habit_check_off MCP tool: record a completion
/// and recompute the habit's streaks.

use serde::{Deserialize, Serialize};
use chrono::{Local, NaiveDate};
use crate::domain::{normalize_habit_name, parse_calendar_date, Cadence, StreakCounts};
use crate::engine::StreakEngine;
use crate::storage::HabitStorage;
use crate::TrackerError;

/// Parameters for checking off a habit
#[derive(Debug, Deserialize)]
pub struct CheckOffParams {
    pub name: String,
    pub cadence: Option<String>, // When given, the habit must have this cadence
    pub date: Option<String>,    // Optional date, defaults to today
}

/// Response from checking off a habit
#[derive(Debug, Serialize)]
pub struct CheckOffResponse {
    pub success: bool,
    pub message: String,
    pub date: NaiveDate,
    pub streaks: StreakCounts,
}

/// Check off a habit using the provided storage and engine
pub fn check_off_habit<S: HabitStorage>(
    storage: &S,
    engine: &StreakEngine,
    params: CheckOffParams,
) -> Result<CheckOffResponse, TrackerError> {
    let name = normalize_habit_name(&params.name)?;

    let cadence = params
        .cadence
        .as_deref()
        .map(str::parse::<Cadence>)
        .transpose()?;

    let date = match params.date.as_deref() {
        Some(raw) => parse_calendar_date(raw.trim())?,
        None => Local::now().date_naive(),
    };

    let outcome = engine.check_off(storage, &name, cadence, date)?;

    let message = if outcome.recorded {
        format!(
            "✅ Checked off '{}' for {}. {}",
            outcome.name,
            date,
            outcome.streaks.summary_message()
        )
    } else {
        format!(
            "'{}' was already checked off for {}. {}",
            outcome.name,
            date,
            outcome.streaks.summary_message()
        )
    };

    Ok(CheckOffResponse {
        success: true,
        message,
        date,
        streaks: outcome.streaks,
    })
}
