//! Todo store trait and `SQLite` implementation.
//!
//! The engine owns everything the storage layer does not: id generation,
//! defaulting, schema validation on every write path, timestamp derivation,
//! and the by-name lookup semantics over the non-unique task text.

use crate::error::{Error, Result};
use crate::todos::id::generate_todo_id;
use crate::todos::models::{Priority, Todo};
use crate::todos::storage::{FieldUpdate, SqliteStorage, TodoUpdate};
use std::collections::HashSet;
use std::path::Path;

/// Optional metadata supplied when creating a todo.
#[derive(Debug, Default, Clone)]
pub struct NewTodo {
    /// Assignee identifier.
    pub assigned_to: Option<String>,
    /// Priority level.
    pub priority: Option<Priority>,
    /// Estimated time to complete in minutes.
    pub estimated_minutes: Option<u32>,
    /// Actual time spent in minutes.
    pub actual_minutes: Option<u32>,
    /// Parent todo id (not validated for existence).
    pub parent_task_id: Option<String>,
    /// Tags for categorization.
    pub tags: Option<Vec<String>>,
}

/// Equality filters for listing todos.
///
/// Filtering is a pure post-scan predicate; no index is maintained, which is
/// fine at the record counts a personal tracker sees.
#[derive(Debug, Default, Clone)]
pub struct TodoFilter {
    /// Keep only todos with this completion status.
    pub completed: Option<bool>,
    /// Keep only todos with this priority.
    pub priority: Option<Priority>,
    /// Keep only todos with this assignee.
    pub assigned_to: Option<String>,
    /// Keep only todos whose tags contain this value.
    pub tag: Option<String>,
}

impl TodoFilter {
    fn matches(&self, todo: &Todo) -> bool {
        if let Some(completed) = self.completed {
            if todo.completed != completed {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if todo.priority != Some(priority) {
                return false;
            }
        }
        if let Some(ref assigned_to) = self.assigned_to {
            if todo.assigned_to.as_deref() != Some(assigned_to.as_str()) {
                return false;
            }
        }
        if let Some(ref tag) = self.tag {
            if !todo.tags.as_ref().is_some_and(|tags| tags.iter().any(|t| t == tag)) {
                return false;
            }
        }
        true
    }
}

/// Trait for todo store operations.
///
/// This is the complete surface both front ends call; neither goes around it
/// to the storage layer.
#[allow(clippy::missing_errors_doc)]
pub trait TodoStore {
    /// Create a new todo with the given task text and optional metadata.
    fn add(&self, task: &str, options: NewTodo) -> Result<Todo>;

    /// List todos in insertion order, narrowed by `filter`.
    fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>>;

    /// Get a todo by exact task text.
    ///
    /// Task text is not unique. When several todos share the text, the first
    /// one in insertion order wins; callers who need a specific record should
    /// address it by id.
    fn get_by_name(&self, task: &str) -> Result<Todo>;

    /// Get a todo by id.
    fn get_by_id(&self, id: &str) -> Result<Todo>;

    /// Merge `update` into the todo at `id`.
    ///
    /// `updated_at` is always refreshed. When the update touches `completed`,
    /// `completed_at` is set or cleared to keep the pair consistent,
    /// regardless of what the caller put in the update.
    fn update(&self, id: &str, update: TodoUpdate) -> Result<Todo>;

    /// Merge `update` into the first todo whose task text equals `task`.
    fn update_by_name(&self, task: &str, update: TodoUpdate) -> Result<Todo>;

    /// Mark the first todo whose task text equals `task` as completed.
    fn complete_by_name(&self, task: &str) -> Result<Todo>;

    /// Delete every todo whose task text is in `names`.
    ///
    /// All records sharing a listed name are removed. Returns the count
    /// removed; zero matches is not an error.
    fn delete_by_names(&self, names: &HashSet<String>) -> Result<usize>;

    /// Delete a todo by id.
    ///
    /// Idempotent: returns `false` (not an error) when nothing existed.
    fn delete_by_id(&self, id: &str) -> Result<bool>;
}

/// `SQLite`-backed todo store.
#[derive(Debug, Clone)]
pub struct SqliteTodoStore {
    storage: SqliteStorage,
}

impl SqliteTodoStore {
    /// Open (or create) a store at the given database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self { storage: SqliteStorage::new(db_path)? })
    }

    /// Open the store at the configured default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn open_default() -> Result<Self> {
        Self::new(crate::paths::db_path())
    }

    /// Access the underlying storage adapter.
    #[must_use]
    pub const fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Current time as an RFC 3339 UTC string.
    fn now() -> String {
        chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
    }

    fn not_found_by_id(id: &str) -> Error {
        Error::NotFound(format!("todo with id {id}"))
    }

    fn not_found_by_name(task: &str) -> Error {
        Error::NotFound(format!("todo with task \"{task}\""))
    }
}

impl TodoStore for SqliteTodoStore {
    fn add(&self, task: &str, options: NewTodo) -> Result<Todo> {
        let todo = Todo {
            id: generate_todo_id(task),
            task: task.to_string(),
            completed: false,
            created_at: Self::now(),
            updated_at: None,
            completed_at: None,
            assigned_to: options.assigned_to,
            priority: options.priority,
            estimated_minutes: options.estimated_minutes,
            actual_minutes: options.actual_minutes,
            parent_task_id: options.parent_task_id,
            tags: options.tags,
        };
        todo.validate()?;
        self.storage.put(&todo)?;
        Ok(todo)
    }

    fn list(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        Ok(self.storage.scan_all()?.into_iter().filter(|t| filter.matches(t)).collect())
    }

    fn get_by_name(&self, task: &str) -> Result<Todo> {
        self.storage
            .scan_all()?
            .into_iter()
            .find(|t| t.task == task)
            .ok_or_else(|| Self::not_found_by_name(task))
    }

    fn get_by_id(&self, id: &str) -> Result<Todo> {
        self.storage.get(id)?.ok_or_else(|| Self::not_found_by_id(id))
    }

    fn update(&self, id: &str, mut update: TodoUpdate) -> Result<Todo> {
        let mut merged = self.get_by_id(id)?;

        update.updated_at = Some(Self::now());
        // completed drives completed_at, whatever the caller supplied
        match update.completed {
            Some(true) => update.completed_at = FieldUpdate::Set(Self::now()),
            Some(false) => update.completed_at = FieldUpdate::Clear,
            None => {}
        }

        update.apply(&mut merged);
        merged.validate()?;

        if !self.storage.merge_update(id, &update)? {
            return Err(Self::not_found_by_id(id));
        }
        Ok(merged)
    }

    fn update_by_name(&self, task: &str, update: TodoUpdate) -> Result<Todo> {
        let todo = self.get_by_name(task)?;
        self.update(&todo.id, update)
    }

    fn complete_by_name(&self, task: &str) -> Result<Todo> {
        self.update_by_name(task, TodoUpdate { completed: Some(true), ..Default::default() })
    }

    fn delete_by_names(&self, names: &HashSet<String>) -> Result<usize> {
        self.storage.delete_if(|t| names.contains(&t.task))
    }

    fn delete_by_id(&self, id: &str) -> Result<bool> {
        self.storage.delete_if(|t| t.id == id).map(|removed| removed > 0)
    }
}
