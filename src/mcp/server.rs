/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads line-delimited JSON-RPC requests
/// 2. Dispatches tool calls to the habit tools
/// 3. Writes one JSON-RPC response per request

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools;
use crate::{HabitTrackerServer, TrackerError};

/// Why a tool call did not produce a result
enum ToolFailure {
    UnknownTool(String),
    InvalidArguments(serde_json::Error),
    Tracker(TrackerError),
}

impl From<TrackerError> for ToolFailure {
    fn from(error: TrackerError) -> Self {
        ToolFailure::Tracker(error)
    }
}

/// Decode tool arguments into a tool's parameter struct
fn arguments<T: DeserializeOwned>(args: Value) -> Result<T, ToolFailure> {
    serde_json::from_value(args).map_err(ToolFailure::InvalidArguments)
}

/// Serialize a result payload into a response for `id`
fn respond<T: Serialize>(id: Value, payload: T) -> JsonRpcResponse {
    match serde_json::to_value(payload) {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to encode result: {}", e),
            None,
        ),
    }
}

/// MCP server exposing the habit tools
pub struct McpServer {
    /// The underlying habit tracker server
    habit_tracker: HabitTrackerServer,
    /// Whether the client has completed initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_tracker: HabitTrackerServer) -> Self {
        Self {
            habit_tracker,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), TrackerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();

        self.serve(reader, writer).await
    }

    /// Serve requests from `reader` until it is exhausted
    ///
    /// Each non-empty input line is one request; each response is written
    /// as one line and flushed immediately.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), TrackerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    return Err(TrackerError::Io(e));
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a JSON-RPC request; notifications get no response
    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.method == "initialized" || request.method == "notifications/initialized" {
            self.initialized = true;
            return request.id.map(|id| JsonRpcResponse::success(id, json!(null)));
        }

        let id = match request.id {
            Some(id) => id,
            None => {
                debug!("Ignoring notification '{}'", request.method);
                return None;
            }
        };

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id).await,
            "tools/list" => self.handle_tools_list(id).await,
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        };

        Some(response)
    }

    /// Handle MCP initialization request
    async fn handle_initialize(&mut self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Habit Streaks MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, result)
    }

    /// Handle tools/list request
    async fn handle_tools_list(&mut self, id: Value) -> JsonRpcResponse {
        let name_property = json!({"type": "string", "description": "Habit name (trimmed and title-cased before use)"});
        let cadence_property = json!({"type": "string", "enum": ["daily", "weekly"], "description": "Habit cadence"});

        let tools = vec![
            ToolDefinition {
                name: "habit_create".to_string(),
                description: "Create a new daily or weekly habit".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": name_property,
                        "description": {"type": "string", "description": "What the habit is about"},
                        "cadence": cadence_property
                    },
                    "required": ["name", "description", "cadence"]
                }),
            },
            ToolDefinition {
                name: "habit_update".to_string(),
                description: "Rename a habit and replace its description".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": name_property,
                        "new_name": {"type": "string", "description": "New habit name (may equal the current one)"},
                        "description": {"type": "string", "description": "New description"}
                    },
                    "required": ["name", "new_name", "description"]
                }),
            },
            ToolDefinition {
                name: "habit_delete".to_string(),
                description: "Delete a habit and its completion history".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {"name": name_property},
                    "required": ["name"]
                }),
            },
            ToolDefinition {
                name: "habit_check_off".to_string(),
                description: "Mark a habit complete for today or a specific date and update its streaks".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": name_property,
                        "cadence": {"type": "string", "enum": ["daily", "weekly"], "description": "Expected cadence (optional)"},
                        "date": {"type": "string", "description": "Date completed (YYYY-MM-DD, optional - defaults to today)"}
                    },
                    "required": ["name"]
                }),
            },
            ToolDefinition {
                name: "habit_view".to_string(),
                description: "Show every field of a habit".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {"name": name_property},
                    "required": ["name"]
                }),
            },
            ToolDefinition {
                name: "habit_list".to_string(),
                description: "List all habits, or only daily or weekly ones, as a table".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "cadence": {"type": "string", "enum": ["daily", "weekly"], "description": "Filter by cadence (optional)"}
                    },
                    "required": []
                }),
            },
            ToolDefinition {
                name: "habit_streaks".to_string(),
                description: "Get the current and longest recorded streak of a habit".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": name_property,
                        "cadence": cadence_property
                    },
                    "required": ["name", "cadence"]
                }),
            },
            ToolDefinition {
                name: "habit_longest_streak".to_string(),
                description: "Find the longest streak on record across all habits".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
        ];

        respond(id, json!({"tools": tools}))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        if !self.initialized {
            warn!("Tool call received before initialization completed");
        }

        let tool_params: ToolCallParams = match params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = match self.call_tool(&tool_params.name, Value::Object(tool_params.arguments)) {
            Ok(text) => ToolCallResult::success(text),
            Err(ToolFailure::UnknownTool(name)) => {
                ToolCallResult::error(format!("Unknown tool: {}", name), error_codes::METHOD_NOT_FOUND)
            }
            Err(ToolFailure::InvalidArguments(e)) => {
                ToolCallResult::error(format!("Invalid arguments: {}", e), error_codes::INVALID_PARAMS)
            }
            Err(ToolFailure::Tracker(e)) => {
                debug!("Tool '{}' failed: {}", tool_params.name, e);
                ToolCallResult::error(e.to_string(), error_kind_to_json_rpc_code(e.kind()))
            }
        };

        respond(id, result)
    }

    /// Run a tool and return its display message
    fn call_tool(&self, name: &str, args: Value) -> Result<String, ToolFailure> {
        let storage = self.habit_tracker.storage();
        let engine = self.habit_tracker.engine();

        let message = match name {
            "habit_create" => tools::create_habit(storage, arguments(args)?)?.message,
            "habit_update" => tools::update_habit(storage, arguments(args)?)?.message,
            "habit_delete" => tools::delete_habit(storage, arguments(args)?)?.message,
            "habit_check_off" => tools::check_off_habit(storage, engine, arguments(args)?)?.message,
            "habit_view" => tools::view_habit(storage, arguments(args)?)?.message,
            "habit_list" => tools::list_habits(storage, arguments(args)?)?.message,
            "habit_streaks" => tools::get_habit_streaks(storage, arguments(args)?)?.message,
            "habit_longest_streak" => tools::get_longest_streak(storage)?.message,
            other => return Err(ToolFailure::UnknownTool(other.to_string())),
        };

        Ok(message)
    }
}
