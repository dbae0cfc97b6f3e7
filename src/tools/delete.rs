/// Tool for deleting habits
///
/// This module implements the habit_delete MCP tool. Deletion removes the
/// whole record; there is no way to restore it.

use serde::{Deserialize, Serialize};
use crate::domain::normalize_habit_name;
use crate::storage::HabitStorage;
use crate::TrackerError;

/// Parameters for deleting a habit
#[derive(Debug, Deserialize)]
pub struct DeleteHabitParams {
    pub name: String,
}

/// Response from deleting a habit
#[derive(Debug, Serialize)]
pub struct DeleteHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Delete a habit using the provided storage
pub fn delete_habit<S: HabitStorage>(
    storage: &S,
    params: DeleteHabitParams,
) -> Result<DeleteHabitResponse, TrackerError> {
    let name = normalize_habit_name(&params.name)?;
    storage.delete_habit(&name)?;

    Ok(DeleteHabitResponse {
        success: true,
        message: format!("🗑️ Deleted habit '{}'", name),
    })
}
