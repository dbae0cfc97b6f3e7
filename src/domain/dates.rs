/// Completion-date collection for a habit
///
/// Completions are a set of calendar dates. Keeping them in an ordered set
/// makes a repeated check-off on the same day a no-op and hands the streak
/// walk its dates already sorted.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::domain::DomainError;

/// Date format used for stored completions (`YYYY-MM-DD`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a single `YYYY-MM-DD` calendar date
///
/// Unpadded month and day fields (`2023-1-01`) are accepted so that older
/// stored lists keep loading. Surrounding whitespace is not.
pub fn parse_calendar_date(s: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| DomainError::InvalidDate(format!("'{}': {}", s, e)))
}

/// Raw entries of a `completed_dates` column, without validating them
///
/// A column that is not a JSON list of strings is returned as one entry.
pub fn stored_entries(raw: Option<&str>) -> Vec<String> {
    match raw.map(str::trim) {
        None | Some("") => Vec::new(),
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!("completed dates column is not a JSON list ({}), showing it verbatim", e);
            vec![raw.to_string()]
        }),
    }
}

/// Ordered set of the dates on which a habit was completed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionDates(BTreeSet<NaiveDate>);

impl CompletionDates {
    /// An empty completion set
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Record a completion, returning false if the date was already present
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.0.insert(date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Dates in chronological order
    pub fn iter(&self) -> impl Iterator<Item = &NaiveDate> + '_ {
        self.0.iter()
    }

    /// Dates rendered as `YYYY-MM-DD` strings
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|d| d.format(DATE_FORMAT).to_string()).collect()
    }

    /// Encode as the JSON array stored in the `completed_dates` column
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_strings())
    }

    /// Decode the `completed_dates` column
    ///
    /// A NULL or blank column is an empty set. Entries are parsed one by one
    /// so a single malformed date is reported instead of silently dropped.
    pub fn from_json(raw: Option<&str>) -> Result<Self, DomainError> {
        let raw = match raw.map(str::trim) {
            None | Some("") => return Ok(Self::new()),
            Some(raw) => raw,
        };

        let entries: Vec<String> = serde_json::from_str(raw).map_err(|e| {
            DomainError::InvalidDate(format!("completed dates are not a JSON list: {}", e))
        })?;

        entries.iter().map(|s| parse_calendar_date(s)).collect()
    }
}

impl FromIterator<NaiveDate> for CompletionDates {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CompletionDates {
    type Item = &'a NaiveDate;
    type IntoIter = std::collections::btree_set::Iter<'a, NaiveDate>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
