/// SQLite implementation of the habit storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving habit data. It handles all SQL queries and data conversion.

use std::path::PathBuf;
use rusqlite::{Connection, OptionalExtension, Row, params};
use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::{
    stored_entries, Cadence, CompletionDates, DomainError, Habit, HabitListing, HabitRow, HabitSummary,
    LongestStreak, StreakCounts,
};
use crate::storage::{StorageError, HabitStorage, migrations};

const FULL_COLUMNS: &str = "name, description, date_and_time_of_creation, period, \
                            completed_dates, current_streak, longest_streak";

const LIST_COLUMNS: &str = "name, description, date_and_time_of_creation, period, completed_dates";

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {:?}", db_path);

        Ok(Self { conn })
    }

    /// Open a private in-memory database with the schema applied
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// True when an insert or update collided with an existing primary key
    fn is_duplicate_name(error: &rusqlite::Error) -> bool {
        matches!(
            error,
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
        )
    }

    fn name_exists(conn: &Connection, name: &str) -> Result<bool, StorageError> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM habit WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

/// Column values as they come out of the `habit` table
///
/// Cadence and completion dates are decoded after the row is read so that
/// bad stored values surface as domain errors rather than driver errors.
struct StoredHabit {
    name: String,
    description: String,
    created_at: Option<NaiveDateTime>,
    period: Option<String>,
    completed_dates: Option<String>,
    current_streak: Option<u32>,
    longest_streak: Option<u32>,
}

impl StoredHabit {
    fn from_full_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            description: row.get(1)?,
            created_at: row.get(2)?,
            period: row.get(3)?,
            completed_dates: row.get(4)?,
            current_streak: row.get(5)?,
            longest_streak: row.get(6)?,
        })
    }

    fn from_list_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            name: row.get(0)?,
            description: row.get(1)?,
            created_at: row.get(2)?,
            period: row.get(3)?,
            completed_dates: row.get(4)?,
            current_streak: None,
            longest_streak: None,
        })
    }

    fn cadence(&self) -> Result<Cadence, DomainError> {
        match self.period.as_deref() {
            Some(period) => period.parse(),
            None => Err(DomainError::InvalidCadence(format!(
                "habit '{}' has no period",
                self.name
            ))),
        }
    }

    fn into_habit(self) -> Result<Habit, StorageError> {
        let cadence = self.cadence()?;
        let completed_dates = CompletionDates::from_json(self.completed_dates.as_deref())?;

        Ok(Habit {
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            cadence,
            completed_dates,
            current_streak: self.current_streak,
            longest_streak: self.longest_streak,
        })
    }

    /// Listing rows show completions as stored, so one bad entry
    /// does not hide every other habit
    fn into_row(self) -> Result<HabitRow, StorageError> {
        let cadence = self.cadence()?;
        let completed_dates = stored_entries(self.completed_dates.as_deref());

        Ok(HabitRow {
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            cadence,
            completed_dates,
        })
    }
}

impl HabitStorage for SqliteStorage {
    /// Create a new habit in the database
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let dates_json = habit.completed_dates.to_json()?;

        let result = self.conn.execute(
            "INSERT INTO habit (
                name, description, date_and_time_of_creation, period,
                completed_dates, current_streak, longest_streak
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                habit.name,
                habit.description,
                habit.created_at,
                habit.cadence.as_str(),
                dates_json,
                habit.current_streak,
                habit.longest_streak
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!("Created {} habit: {}", habit.cadence, habit.name);
                Ok(())
            }
            Err(e) if Self::is_duplicate_name(&e) => Err(StorageError::DuplicateName {
                name: habit.name.clone(),
            }),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    /// Get a habit by its name
    fn get_habit(&self, name: &str) -> Result<Habit, StorageError> {
        let sql = format!("SELECT {} FROM habit WHERE name = ?1", FULL_COLUMNS);

        self.conn
            .query_row(&sql, params![name], StoredHabit::from_full_row)
            .optional()?
            .ok_or_else(|| StorageError::not_found(name))?
            .into_habit()
    }

    /// Get the check-off projection of a habit
    fn get_summary(&self, name: &str) -> Result<HabitSummary, StorageError> {
        let stored = self
            .conn
            .query_row(
                "SELECT name, completed_dates, period FROM habit WHERE name = ?1",
                params![name],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        let (name, completed_dates, period) = stored.ok_or_else(|| StorageError::not_found(name))?;

        let cadence = period
            .as_deref()
            .ok_or_else(|| DomainError::InvalidCadence(format!("habit '{}' has no period", name)))?
            .parse::<Cadence>()?;

        Ok(HabitSummary {
            completed_dates: CompletionDates::from_json(completed_dates.as_deref())?,
            name,
            cadence,
        })
    }

    /// List habits in insertion order with optional cadence filtering
    fn list_habits(&self, cadence: Option<Cadence>) -> Result<HabitListing, StorageError> {
        let mut sql = format!("SELECT {} FROM habit", LIST_COLUMNS);

        if cadence.is_some() {
            sql.push_str(" WHERE period = ?1");
        }

        sql.push_str(" ORDER BY rowid");

        let mut stmt = self.conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let stored = match cadence {
            Some(cadence) => stmt
                .query_map(params![cadence.as_str()], StoredHabit::from_list_row)?
                .collect::<Result<Vec<_>, _>>()?,
            None => stmt
                .query_map([], StoredHabit::from_list_row)?
                .collect::<Result<Vec<_>, _>>()?,
        };

        let rows = stored
            .into_iter()
            .map(StoredHabit::into_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(HabitListing { columns, rows })
    }

    /// Rename a habit and replace its description
    fn rename_habit(
        &self,
        old_name: &str,
        new_name: &str,
        description: &str,
    ) -> Result<(), StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        if !Self::name_exists(&tx, old_name)? {
            return Err(StorageError::not_found(old_name));
        }

        if new_name != old_name && Self::name_exists(&tx, new_name)? {
            return Err(StorageError::DuplicateName {
                name: new_name.to_string(),
            });
        }

        tx.execute(
            "UPDATE habit SET name = ?1, description = ?2 WHERE name = ?3",
            params![new_name, description, old_name],
        )?;
        tx.commit()?;

        tracing::debug!("Renamed habit '{}' to '{}'", old_name, new_name);
        Ok(())
    }

    /// Delete a habit record
    fn delete_habit(&self, name: &str) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM habit WHERE name = ?1",
            params![name],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::not_found(name));
        }

        tracing::debug!("Deleted habit: {}", name);
        Ok(())
    }

    /// Record a completion date unless it is already present
    fn append_completion(&self, name: &str, date: NaiveDate) -> Result<bool, StorageError> {
        let tx = self.conn.unchecked_transaction()?;

        let stored: Option<String> = tx
            .query_row(
                "SELECT completed_dates FROM habit WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StorageError::not_found(name))?;

        let mut dates = CompletionDates::from_json(stored.as_deref())?;
        if !dates.insert(date) {
            tracing::debug!("Habit '{}' already completed on {}", name, date);
            return Ok(false);
        }

        tx.execute(
            "UPDATE habit SET completed_dates = ?1 WHERE name = ?2",
            params![dates.to_json()?, name],
        )?;
        tx.commit()?;

        tracing::debug!("Recorded completion of '{}' on {}", name, date);
        Ok(true)
    }

    /// Get the stored streaks of a habit with a matching cadence
    fn get_streaks(&self, name: &str, cadence: Cadence) -> Result<StreakCounts, StorageError> {
        let stored = self
            .conn
            .query_row(
                "SELECT current_streak, longest_streak FROM habit WHERE name = ?1 AND period = ?2",
                params![name, cadence.as_str()],
                |row| Ok((row.get::<_, Option<u32>>(0)?, row.get::<_, Option<u32>>(1)?)),
            )
            .optional()?;

        match stored {
            Some((current, longest)) => Ok(StreakCounts::new(
                current.unwrap_or(0),
                longest.unwrap_or(0),
            )),
            None => Err(StorageError::HabitNotFound {
                name: format!("{} ({})", name, cadence),
            }),
        }
    }

    /// Overwrite the streak counters of a habit
    fn set_streaks(&self, name: &str, streaks: StreakCounts) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habit SET current_streak = ?1, longest_streak = ?2 WHERE name = ?3",
            params![streaks.current, streaks.longest, name],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::not_found(name));
        }

        tracing::debug!(
            "Updated streaks for '{}': current {}, longest {}",
            name, streaks.current, streaks.longest
        );
        Ok(())
    }

    /// Find the habit with the highest longest streak
    ///
    /// Habits whose streaks were never computed count as zero. Ties go to
    /// the habit created first.
    fn longest_streak_record(&self) -> Result<Option<LongestStreak>, StorageError> {
        let record = self
            .conn
            .query_row(
                "SELECT name, COALESCE(longest_streak, 0) AS longest FROM habit
                 ORDER BY longest DESC, rowid ASC LIMIT 1",
                [],
                |row| {
                    Ok(LongestStreak {
                        name: row.get(0)?,
                        longest_streak: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn count_habits(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM habit", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}
