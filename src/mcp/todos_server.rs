//! MCP server for the todo store.
//!
//! Exposes the six todo operations as MCP tools so agents can work against
//! the same records as the CLI. Every tool answers with a structured
//! `{"success": ...}` envelope; errors from the store are caught and turned
//! into `{"success": false, "message": ...}` rather than surfaced as
//! transport-level faults.

// The rmcp `#[tool(aggr)]` macro requires ownership of input structs,
// making pass-by-value necessary for all tool handler functions.
#![allow(clippy::needless_pass_by_value)]

use crate::todos::{
    FieldUpdate, NewTodo, Priority, SqliteTodoStore, Todo, TodoFilter, TodoStore, TodoUpdate,
};
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::tool;
use rmcp::Error as McpError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Instructions for the MCP server, shown to agents using this server.
const INSTRUCTIONS: &str = r#"Todo tracking server. Use these tools to create, list, update, complete, and delete todos in a store shared with the `todo` CLI.

Todos are addressed by their task text. Task text is NOT unique: `todo_get`, `todo_update`, and `todo_complete` act on the earliest-created match, while `todo_delete` removes every record with a listed name. If you need to tell duplicates apart, read the `id` field from `todo_list` output.

Optional metadata for coordinating between agents: `assignedTo`, `priority` (high/medium/low), `estimatedMinutes`, `actualMinutes`, `parentTaskId` for breaking large tasks into subtasks, and `tags`.

Every tool returns a JSON object with a `success` flag. A `false` flag means the operation did not apply (for example, no todo had the given task name) - the message explains why, and the store is unchanged."#;

/// MCP server for todo management.
#[derive(Clone)]
pub struct TodosServer {
    store: Arc<SqliteTodoStore>,
}

impl TodosServer {
    /// Create a server over the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_path: &Path) -> crate::error::Result<Self> {
        Ok(Self { store: Arc::new(SqliteTodoStore::new(db_path)?) })
    }

    /// Create a server over the configured default database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn open_default() -> crate::error::Result<Self> {
        Ok(Self { store: Arc::new(SqliteTodoStore::open_default()?) })
    }
}

// Tool input schemas - field names match the wire format of todo records.

/// Input for adding a todo.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoAddInput {
    /// The task description for the todo.
    pub task: String,
    /// Assignee identifier for agent coordination.
    pub assigned_to: Option<String>,
    /// Priority level: high, medium, or low.
    pub priority: Option<String>,
    /// Estimated time to complete in minutes.
    pub estimated_minutes: Option<u32>,
    /// Actual time spent in minutes.
    pub actual_minutes: Option<u32>,
    /// Parent task ID for hierarchical task breakdown.
    pub parent_task_id: Option<String>,
    /// Tags for categorization.
    pub tags: Option<Vec<String>>,
}

/// Input for listing todos.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TodoListInput {
    /// Filter by completion status. If true, show only completed todos.
    /// If false, show only incomplete todos. If omitted, show all todos.
    pub completed: Option<bool>,
}

/// Input for getting a todo by task name.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TodoGetInput {
    /// The task name to search for.
    pub task: String,
}

/// Input for updating a todo addressed by its current task name.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoUpdateInput {
    /// The current task name identifying the todo.
    pub current_task: String,
    /// The new task description (optional).
    pub new_task: Option<String>,
    /// The new completion status (optional).
    pub completed: Option<bool>,
    /// Assignee identifier (optional).
    pub assigned_to: Option<String>,
    /// Priority level: high, medium, or low (optional).
    pub priority: Option<String>,
    /// Estimated time to complete in minutes (optional).
    pub estimated_minutes: Option<u32>,
    /// Actual time spent in minutes (optional).
    pub actual_minutes: Option<u32>,
    /// Parent task ID (optional).
    pub parent_task_id: Option<String>,
    /// Tags (optional; replaces the whole tag list).
    pub tags: Option<Vec<String>>,
}

/// Input for deleting todos by task name.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TodoDeleteInput {
    /// Task names to delete. Every record with a listed name is removed.
    pub tasks: Vec<String>,
}

/// Input for completing a todo by task name.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TodoCompleteInput {
    /// The task name to mark as completed.
    pub task: String,
}

// Result envelopes.

/// Status-only result.
#[derive(Debug, Serialize)]
struct StatusResponse {
    success: bool,
    message: String,
}

/// Result carrying a single todo.
#[derive(Debug, Serialize)]
struct TodoResponse {
    success: bool,
    todo: Todo,
}

/// Result carrying a list of todos.
#[derive(Debug, Serialize)]
struct TodoListResponse {
    success: bool,
    todos: Vec<Todo>,
}

fn respond<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(e.to_string(), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

fn success(message: String) -> Result<CallToolResult, McpError> {
    respond(&StatusResponse { success: true, message })
}

fn failure(message: String) -> Result<CallToolResult, McpError> {
    respond(&StatusResponse { success: false, message })
}

/// Build the engine update from a tool input.
///
/// Absent fields stay untouched; there is no clear path over MCP, matching
/// the original tool contract.
fn build_update(input: &TodoUpdateInput) -> Result<TodoUpdate, String> {
    let priority = match input.priority.as_deref().map(Priority::from_str).transpose() {
        Ok(p) => p,
        Err(e) => return Err(e.to_string()),
    };

    Ok(TodoUpdate {
        task: input.new_task.clone(),
        completed: input.completed,
        updated_at: None,
        completed_at: FieldUpdate::Keep,
        assigned_to: input.assigned_to.clone().map_or(FieldUpdate::Keep, FieldUpdate::Set),
        priority: priority.map_or(FieldUpdate::Keep, FieldUpdate::Set),
        estimated_minutes: input.estimated_minutes.map_or(FieldUpdate::Keep, FieldUpdate::Set),
        actual_minutes: input.actual_minutes.map_or(FieldUpdate::Keep, FieldUpdate::Set),
        parent_task_id: input.parent_task_id.clone().map_or(FieldUpdate::Keep, FieldUpdate::Set),
        tags: input.tags.clone().map_or(FieldUpdate::Keep, FieldUpdate::Set),
    })
}

#[tool(tool_box)]
impl TodosServer {
    /// Add a new todo.
    #[tool(
        description = "Add a new todo with a task description and optional metadata for agent coordination"
    )]
    fn todo_add(&self, #[tool(aggr)] input: TodoAddInput) -> Result<CallToolResult, McpError> {
        let priority = match input.priority.as_deref().map(Priority::from_str).transpose() {
            Ok(p) => p,
            Err(e) => return failure(format!("Failed to add todo: {e}")),
        };

        let options = NewTodo {
            assigned_to: input.assigned_to,
            priority,
            estimated_minutes: input.estimated_minutes,
            actual_minutes: input.actual_minutes,
            parent_task_id: input.parent_task_id,
            tags: input.tags,
        };

        match self.store.add(&input.task, options) {
            Ok(_) => success(format!("Todo added: \"{}\"", input.task)),
            Err(e) => failure(format!("Failed to add todo: {e}")),
        }
    }

    /// List todos.
    #[tool(description = "List all todos, optionally filtered by completion status")]
    fn todo_list(&self, #[tool(aggr)] input: TodoListInput) -> Result<CallToolResult, McpError> {
        let filter = TodoFilter { completed: input.completed, ..Default::default() };

        match self.store.list(&filter) {
            Ok(todos) => respond(&TodoListResponse { success: true, todos }),
            Err(e) => failure(format!("Failed to list todos: {e}")),
        }
    }

    /// Get a todo by task name.
    #[tool(description = "Get a specific todo by task name")]
    fn todo_get(&self, #[tool(aggr)] input: TodoGetInput) -> Result<CallToolResult, McpError> {
        match self.store.get_by_name(&input.task) {
            Ok(todo) => respond(&TodoResponse { success: true, todo }),
            Err(e) => failure(format!("Failed to get todo: {e}")),
        }
    }

    /// Update a todo addressed by its current task name.
    #[tool(description = "Update a todo's task description, completion status, or metadata")]
    fn todo_update(
        &self,
        #[tool(aggr)] input: TodoUpdateInput,
    ) -> Result<CallToolResult, McpError> {
        let update = match build_update(&input) {
            Ok(u) => u,
            Err(message) => return failure(format!("Failed to update todo: {message}")),
        };

        match self.store.update_by_name(&input.current_task, update) {
            Ok(_) => success(format!("Todo updated: \"{}\"", input.current_task)),
            Err(e) => failure(format!("Failed to update todo: {e}")),
        }
    }

    /// Delete todos by task name.
    #[tool(description = "Delete one or more todos by task name")]
    fn todo_delete(
        &self,
        #[tool(aggr)] input: TodoDeleteInput,
    ) -> Result<CallToolResult, McpError> {
        let names: HashSet<String> = input.tasks.iter().cloned().collect();

        match self.store.delete_by_names(&names) {
            Ok(removed) => {
                let described = if input.tasks.len() == 1 {
                    format!("\"{}\"", input.tasks[0])
                } else {
                    format!("{} name(s)", input.tasks.len())
                };
                success(format!("Deleted {removed} todo(s) matching {described}"))
            }
            Err(e) => failure(format!("Failed to delete todos: {e}")),
        }
    }

    /// Complete a todo by task name.
    #[tool(description = "Mark a todo as completed by task name")]
    fn todo_complete(
        &self,
        #[tool(aggr)] input: TodoCompleteInput,
    ) -> Result<CallToolResult, McpError> {
        match self.store.complete_by_name(&input.task) {
            Ok(_) => success(format!("Todo marked as completed: \"{}\"", input.task)),
            Err(e) => failure(format!("Failed to complete todo: {e}")),
        }
    }
}

#[rmcp::tool(tool_box)]
impl rmcp::ServerHandler for TodosServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "todo-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_server() -> (TempDir, TodosServer) {
        let dir = TempDir::new().unwrap();
        let server = TodosServer::new(&dir.path().join("todos.sqlite3")).unwrap();
        (dir, server)
    }

    fn response_json(result: &CallToolResult) -> serde_json::Value {
        // Go through the wire representation rather than Content accessors
        let value = serde_json::to_value(result).expect("result should serialize");
        let text = value["content"][0]["text"].as_str().expect("tool output should be text");
        serde_json::from_str(text).expect("tool output should be JSON")
    }

    #[test]
    fn test_add_then_get_round_trips_through_tools() {
        let (_dir, server) = create_test_server();

        let result = server
            .todo_add(TodoAddInput {
                task: "Buy milk".to_string(),
                assigned_to: None,
                priority: Some("high".to_string()),
                estimated_minutes: Some(10),
                actual_minutes: None,
                parent_task_id: None,
                tags: None,
            })
            .unwrap();
        assert_eq!(response_json(&result)["success"], true);

        let result = server.todo_get(TodoGetInput { task: "Buy milk".to_string() }).unwrap();
        let json = response_json(&result);
        assert_eq!(json["success"], true);
        assert_eq!(json["todo"]["task"], "Buy milk");
        assert_eq!(json["todo"]["priority"], "high");
        assert_eq!(json["todo"]["estimatedMinutes"], 10);
        assert_eq!(json["todo"]["completed"], false);
    }

    #[test]
    fn test_get_missing_todo_is_a_structured_failure() {
        let (_dir, server) = create_test_server();

        let result = server.todo_get(TodoGetInput { task: "ghost".to_string() }).unwrap();
        let json = response_json(&result);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("ghost"));
    }

    #[test]
    fn test_add_invalid_priority_is_a_structured_failure() {
        let (_dir, server) = create_test_server();

        let result = server
            .todo_add(TodoAddInput {
                task: "Task".to_string(),
                assigned_to: None,
                priority: Some("urgent".to_string()),
                estimated_minutes: None,
                actual_minutes: None,
                parent_task_id: None,
                tags: None,
            })
            .unwrap();
        let json = response_json(&result);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("urgent"));
    }

    #[test]
    fn test_list_filters_by_completion() {
        let (_dir, server) = create_test_server();

        server.store.add("Open", NewTodo::default()).unwrap();
        server.store.add("Done", NewTodo::default()).unwrap();
        server.store.complete_by_name("Done").unwrap();

        let result = server.todo_list(TodoListInput { completed: Some(true) }).unwrap();
        let json = response_json(&result);
        assert_eq!(json["success"], true);
        let todos = json["todos"].as_array().unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0]["task"], "Done");

        let result = server.todo_list(TodoListInput { completed: None }).unwrap();
        assert_eq!(response_json(&result)["todos"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_update_by_current_name() {
        let (_dir, server) = create_test_server();
        server.store.add("Old", NewTodo::default()).unwrap();

        let result = server
            .todo_update(TodoUpdateInput {
                current_task: "Old".to_string(),
                new_task: Some("New".to_string()),
                completed: Some(true),
                assigned_to: None,
                priority: None,
                estimated_minutes: None,
                actual_minutes: None,
                parent_task_id: None,
                tags: None,
            })
            .unwrap();
        assert_eq!(response_json(&result)["success"], true);

        let todo = server.store.get_by_name("New").unwrap();
        assert!(todo.completed);
        assert!(todo.completed_at.is_some());
    }

    #[test]
    fn test_delete_removes_all_matches() {
        let (_dir, server) = create_test_server();
        server.store.add("Dup", NewTodo::default()).unwrap();
        server.store.add("Dup", NewTodo::default()).unwrap();
        server.store.add("Keep", NewTodo::default()).unwrap();

        let result =
            server.todo_delete(TodoDeleteInput { tasks: vec!["Dup".to_string()] }).unwrap();
        let json = response_json(&result);
        assert_eq!(json["success"], true);
        assert!(json["message"].as_str().unwrap().contains("Deleted 2"));

        assert!(server.store.get_by_name("Keep").is_ok());
        assert!(server.store.get_by_name("Dup").is_err());
    }

    #[test]
    fn test_complete_missing_todo_is_a_structured_failure() {
        let (_dir, server) = create_test_server();

        let result =
            server.todo_complete(TodoCompleteInput { task: "ghost".to_string() }).unwrap();
        assert_eq!(response_json(&result)["success"], false);
    }

    #[test]
    fn test_build_update_leaves_absent_fields_untouched() {
        let input = TodoUpdateInput {
            current_task: "Task".to_string(),
            new_task: None,
            completed: None,
            assigned_to: Some("agent-1".to_string()),
            priority: None,
            estimated_minutes: None,
            actual_minutes: None,
            parent_task_id: None,
            tags: None,
        };

        let update = build_update(&input).unwrap();
        assert_eq!(update.assigned_to, FieldUpdate::Set("agent-1".to_string()));
        assert!(update.priority.is_keep());
        assert!(update.tags.is_keep());
        assert!(update.task.is_none());
    }

    #[test]
    fn test_build_update_rejects_invalid_priority() {
        let input = TodoUpdateInput {
            current_task: "Task".to_string(),
            new_task: None,
            completed: None,
            assigned_to: None,
            priority: Some("urgent".to_string()),
            estimated_minutes: None,
            actual_minutes: None,
            parent_task_id: None,
            tags: None,
        };

        assert!(build_update(&input).is_err());
    }
}
