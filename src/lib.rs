/// Public library interface for the habit streak tracker
///
/// This module exports the habit store, the streak engine and the MCP
/// server that exposes them, together with the public domain types.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod engine;
mod mcp;
pub mod tools;

// Re-export public modules and types
pub use domain::*;
pub use storage::{SqliteStorage, StorageError, HabitStorage};
pub use engine::{CheckOffOutcome, StreakEngine};
pub use mcp::McpServer;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of a failure, for callers that report errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No habit with the given key
    NotFound,
    /// Create or rename collided with an existing name
    DuplicateKey,
    /// A completion date could not be parsed
    InvalidDate,
    /// Input was rejected before reaching the store
    Validation,
    /// The database or I/O layer failed
    StorageFailure,
}

impl TrackerError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TrackerError::Database(e) => match e {
                StorageError::HabitNotFound { .. } => ErrorKind::NotFound,
                StorageError::DuplicateName { .. } => ErrorKind::DuplicateKey,
                StorageError::Domain(domain) => domain_error_kind(domain),
                StorageError::Connection(_)
                | StorageError::Query(_)
                | StorageError::Serialization(_)
                | StorageError::Migration(_) => ErrorKind::StorageFailure,
            },
            TrackerError::Domain(e) => domain_error_kind(e),
            TrackerError::Io(_) | TrackerError::Json(_) => ErrorKind::StorageFailure,
        }
    }
}

fn domain_error_kind(error: &DomainError) -> ErrorKind {
    match error {
        DomainError::InvalidDate(_) => ErrorKind::InvalidDate,
        _ => ErrorKind::Validation,
    }
}

/// Main habit tracker server that implements the MCP protocol
///
/// This server owns the SQLite store and the streak engine and hands them
/// to the tool functions for each request.
pub struct HabitTrackerServer {
    storage: SqliteStorage,
    engine: StreakEngine,
}

impl HabitTrackerServer {
    /// Create a new habit tracker server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, TrackerError> {
        tracing::info!("Initializing habit tracker with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;

        Ok(Self::with_storage(storage))
    }

    /// Build a server around an already opened store
    pub fn with_storage(storage: SqliteStorage) -> Self {
        Self {
            storage,
            engine: StreakEngine::new(),
        }
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), TrackerError> {
        tracing::info!("Starting MCP server...");

        let count = self.check_database()?;
        tracing::info!("Server started successfully, found {} existing habits", count);

        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Confirm the database answers, returning the number of habits
    ///
    /// Rows are counted, not decoded, so a habit with bad stored data can
    /// still be reached through the tools and deleted.
    pub fn check_database(&self) -> Result<usize, TrackerError> {
        Ok(self.storage.count_habits()?)
    }

    /// Get a reference to the storage layer (useful for testing)
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get a reference to the streak engine
    pub fn engine(&self) -> &StreakEngine {
        &self.engine
    }
}
