/// Tool for listing habits
///
/// This module implements the habit_list MCP tool, which renders the
/// listing as a plain-text table.

use serde::{Deserialize, Serialize};
use crate::domain::{Cadence, HabitListing};
use crate::storage::HabitStorage;
use crate::TrackerError;

/// Width of the horizontal rules around the table
const RULE_WIDTH: usize = 120;

/// Parameters for listing habits
#[derive(Debug, Deserialize)]
pub struct ListHabitsParams {
    pub cadence: Option<String>, // Filter by cadence; lists all habits if omitted
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub listing: HabitListing,
    pub message: String,
}

/// List habits using the provided storage
pub fn list_habits<S: HabitStorage>(
    storage: &S,
    params: ListHabitsParams,
) -> Result<ListHabitsResponse, TrackerError> {
    let cadence = params
        .cadence
        .as_deref()
        .map(str::parse::<Cadence>)
        .transpose()?;

    let listing = storage.list_habits(cadence)?;
    let message = render_table(&listing);

    Ok(ListHabitsResponse { listing, message })
}

/// Render column names and rows as a ` | `-separated text table
pub fn render_table(listing: &HabitListing) -> String {
    if listing.is_empty() {
        return "No habits found".to_string();
    }

    let rule = "-".repeat(RULE_WIDTH);
    let mut lines = vec![
        "Table: Habits".to_string(),
        rule.clone(),
        listing.columns.join(" | "),
        rule.clone(),
    ];

    lines.extend(listing.rows.iter().map(|row| row.cells().join(" | ")));
    lines.push(rule);

    lines.join("\n")
}
