/// MCP tools for habit management
///
/// This module contains the operations that external clients call. Each
/// tool normalizes the habit name, invokes the store and streak engine, and
/// returns a response whose `message` is ready to display verbatim.

pub mod create;
pub mod update;
pub mod delete;
pub mod check_off;
pub mod view;
pub mod list;

// Re-export tool functions for easy access
pub use create::*;
pub use update::*;
pub use delete::*;
pub use check_off::*;
pub use view::*;
pub use list::*;
