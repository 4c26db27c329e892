//! Command execution for the CLI.
//!
//! This module handles running CLI commands and producing output. Output is
//! collected into a [`CliOutput`] instead of printed directly so the whole
//! dispatch layer is testable without spawning processes.

use crate::cli::Command;
use crate::paths;
use crate::todos::{
    FieldUpdate, NewTodo, Priority, SqliteTodoStore, TodoFilter, TodoStore, TodoUpdate,
};
use serde::Serialize;
use std::collections::HashSet;
use std::process::ExitCode;

/// Output from running the CLI, with separate stdout and stderr messages.
#[derive(Debug)]
pub struct CliOutput {
    /// Exit code for the process.
    pub exit_code: ExitCode,
    /// Messages to print to stdout.
    pub stdout: Vec<String>,
    /// Messages to print to stderr.
    pub stderr: Vec<String>,
}

/// Run a CLI command against the store at the configured default location.
pub fn run(command: Command) -> CliOutput {
    let store = match SqliteTodoStore::new(paths::db_path()) {
        Ok(s) => s,
        Err(e) => return error_output(e.to_string()),
    };
    run_with_store(command, &store)
}

/// Run a CLI command against a specific store.
///
/// The store handle is injected rather than global, so tests (and embedders)
/// can point commands at isolated databases.
#[allow(clippy::too_many_lines)]
pub fn run_with_store(command: Command, store: &SqliteTodoStore) -> CliOutput {
    match command {
        Command::Add {
            task,
            assigned_to,
            priority,
            estimated_minutes,
            actual_minutes,
            parent_task_id,
            tags,
        } => {
            let priority = match parse_priority(priority.as_deref()) {
                Ok(p) => p,
                Err(e) => return error_output(e),
            };
            let options = NewTodo {
                assigned_to,
                priority,
                estimated_minutes,
                actual_minutes,
                parent_task_id,
                tags: if tags.is_empty() { None } else { Some(tags) },
            };
            match store.add(&task, options) {
                Ok(todo) => json_output(&todo),
                Err(e) => error_output(e.to_string()),
            }
        }

        Command::List { completed, incomplete, priority, assigned_to, tag } => {
            let priority = match parse_priority(priority.as_deref()) {
                Ok(p) => p,
                Err(e) => return error_output(e),
            };
            let filter = TodoFilter {
                completed: match (completed, incomplete) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
                priority,
                assigned_to,
                tag,
            };
            match store.list(&filter) {
                Ok(todos) => json_output(&todos),
                Err(e) => error_output(e.to_string()),
            }
        }

        Command::Get { task } => match store.get_by_name(&task) {
            Ok(todo) => json_output(&todo),
            Err(e) => error_output(e.to_string()),
        },

        Command::Show { id } => match store.get_by_id(&id) {
            Ok(todo) => json_output(&todo),
            Err(e) => error_output(e.to_string()),
        },

        Command::Update {
            task,
            new_task,
            completed,
            assigned_to,
            priority,
            estimated_minutes,
            actual_minutes,
            parent_task_id,
            tags,
            clear_assigned_to,
            clear_priority,
            clear_estimated_minutes,
            clear_actual_minutes,
            clear_parent_task_id,
            clear_tags,
        } => {
            let priority = match parse_priority(priority.as_deref()) {
                Ok(p) => p,
                Err(e) => return error_output(e),
            };
            let update = TodoUpdate {
                task: new_task,
                completed,
                updated_at: None,
                completed_at: FieldUpdate::Keep,
                assigned_to: field_update(assigned_to, clear_assigned_to),
                priority: field_update(priority, clear_priority),
                estimated_minutes: field_update(estimated_minutes, clear_estimated_minutes),
                actual_minutes: field_update(actual_minutes, clear_actual_minutes),
                parent_task_id: field_update(parent_task_id, clear_parent_task_id),
                tags: field_update(
                    if tags.is_empty() { None } else { Some(tags) },
                    clear_tags,
                ),
            };
            match store.update_by_name(&task, update) {
                Ok(todo) => json_output(&todo),
                Err(e) => error_output(e.to_string()),
            }
        }

        Command::Complete { task } => match store.complete_by_name(&task) {
            Ok(todo) => json_output(&todo),
            Err(e) => error_output(e.to_string()),
        },

        Command::Delete { tasks } => {
            let names: HashSet<String> = tasks.into_iter().collect();
            match store.delete_by_names(&names) {
                Ok(removed) => success_output(format!("Deleted {removed} todo(s)")),
                Err(e) => error_output(e.to_string()),
            }
        }

        Command::DeleteId { id } => match store.delete_by_id(&id) {
            Ok(true) => success_output(format!("Deleted todo: {id}")),
            Ok(false) => success_output(format!("Nothing to delete: {id}")),
            Err(e) => error_output(e.to_string()),
        },

        Command::Version => CliOutput {
            exit_code: ExitCode::SUCCESS,
            stdout: vec![],
            stderr: vec![format!("todo-tracker v{}", crate::VERSION)],
        },
    }
}

fn parse_priority(value: Option<&str>) -> Result<Option<Priority>, String> {
    value.map(Priority::from_str).transpose().map_err(|e| e.to_string())
}

/// Map a value/clear flag pair to the tri-state update for one field.
fn field_update<T>(value: Option<T>, clear: bool) -> FieldUpdate<T> {
    match value {
        Some(v) => FieldUpdate::Set(v),
        None if clear => FieldUpdate::Clear,
        None => FieldUpdate::Keep,
    }
}

fn json_output<T: Serialize>(value: &T) -> CliOutput {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![json], stderr: vec![] },
        Err(e) => error_output(e.to_string()),
    }
}

fn success_output(message: String) -> CliOutput {
    CliOutput { exit_code: ExitCode::SUCCESS, stdout: vec![message], stderr: vec![] }
}

fn error_output(message: String) -> CliOutput {
    CliOutput { exit_code: ExitCode::from(1), stdout: vec![], stderr: vec![message] }
}
