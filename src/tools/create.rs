/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use serde::{Deserialize, Serialize};
use crate::domain::{normalize_habit_name, Cadence, Habit};
use crate::storage::HabitStorage;
use crate::TrackerError;

/// Parameters for creating a new habit
#[derive(Debug, Deserialize)]
pub struct CreateHabitParams {
    pub name: String,
    pub description: String,
    pub cadence: String, // Parsed to the Cadence enum
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub name: String,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, TrackerError> {
    let name = normalize_habit_name(&params.name)?;
    let cadence: Cadence = params.cadence.parse()?;

    let habit = Habit::new(name, params.description, cadence)?;
    storage.create_habit(&habit)?;

    Ok(CreateHabitResponse {
        success: true,
        message: format!("✅ Created {} habit '{}'! Ready to start your streak!", cadence, habit.name),
        name: habit.name,
    })
}
