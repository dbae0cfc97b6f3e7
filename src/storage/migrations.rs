/// Database migration management
///
/// This module creates the `habit` table and keeps track of the schema
/// version so that later changes can be applied in order.

use rusqlite::Connection;
use crate::storage::StorageError;

/// Current database schema version
///
/// Increment this when you add new migrations
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema
///
/// This creates all required tables and indexes if they don't exist.
/// Databases created by earlier versions of the tracker already hold a
/// `habit` table with the same columns; `IF NOT EXISTS` leaves them intact.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| StorageError::Migration(format!("Failed to start migration: {}", e)))?;
        run_migrations(&tx, current_version)?;
        set_version(&tx, CURRENT_VERSION)?;
        tx.commit()
            .map_err(|e| StorageError::Migration(format!("Failed to commit migration: {}", e)))?;
    }

    Ok(())
}

/// Get the current database schema version
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    match conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
        row.get::<_, i32>(0)
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(StorageError::Query(e)),
    }
}

/// Set the database schema version
fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Run database migrations from the current version to the latest
fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }

    Ok(())
}

/// Migration to version 1: create the habit table
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS habit (
            name TEXT PRIMARY KEY,
            description TEXT NOT NULL,
            date_and_time_of_creation DATETIME,
            period TEXT,
            completed_dates TEXT,
            current_streak INT,
            longest_streak INT
        )",
        [],
    )?;

    // Listing by cadence and the streak lookups filter on period
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_habit_period ON habit (period)",
        [],
    )?;

    tracing::info!("Applied migration v1: Created habit table");
    Ok(())
}
