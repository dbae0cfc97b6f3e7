/// Tool for updating existing habits
///
/// This module implements the habit_update MCP tool, which renames a habit
/// and replaces its description. Cadence cannot be changed.

use serde::{Deserialize, Serialize};
use crate::domain::{normalize_habit_name, Habit};
use crate::storage::HabitStorage;
use crate::TrackerError;

/// Parameters for updating an existing habit
#[derive(Debug, Deserialize)]
pub struct UpdateHabitParams {
    pub name: String,
    pub new_name: String,
    pub description: String,
}

/// Response from updating a habit
#[derive(Debug, Serialize)]
pub struct UpdateHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Update an existing habit using the provided storage
pub fn update_habit<S: HabitStorage>(
    storage: &S,
    params: UpdateHabitParams,
) -> Result<UpdateHabitResponse, TrackerError> {
    let name = normalize_habit_name(&params.name)?;
    let new_name = normalize_habit_name(&params.new_name)?;
    Habit::validate_update(&new_name, &params.description)?;

    storage.rename_habit(&name, &new_name, &params.description)?;

    let message = if name == new_name {
        format!("✅ Updated habit '{}'", new_name)
    } else {
        format!("✅ Renamed habit '{}' to '{}'", name, new_name)
    };

    Ok(UpdateHabitResponse {
        success: true,
        message,
    })
}
