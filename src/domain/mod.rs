/// Domain module containing core business logic and data types
///
/// This module defines the habit record and its query projections, the
/// completion-date set, and the pure streak computation. None of it touches
/// the database.

pub mod habit;
pub mod dates;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use dates::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid cadence: {0}")]
    InvalidCadence(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}
