//! Identifier-keyed `SQLite` persistence for todo records.
//!
//! This layer owns the persisted representation (table layout, column
//! encoding) and nothing else: validation, defaulting, and timestamp policy
//! belong to the store engine in [`crate::todos::store`].

use crate::error::Result;
use crate::todos::models::{Priority, Todo};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

/// Tri-state update for an optional field: leave alone, overwrite, or clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value untouched.
    Keep,
    /// Overwrite with a new value.
    Set(T),
    /// Remove the stored value.
    Clear,
}

// Hand-written so `FieldUpdate<T>: Default` does not require `T: Default`.
impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T> FieldUpdate<T> {
    /// Check whether the field is left untouched.
    #[must_use]
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Merge this update into a stored value.
    fn merge_into(&self, slot: &mut Option<T>)
    where
        T: Clone,
    {
        match self {
            Self::Keep => {}
            Self::Set(value) => *slot = Some(value.clone()),
            Self::Clear => *slot = None,
        }
    }
}

/// Fields that can change in a merge update.
///
/// Required fields (`task`, `completed`, timestamps) use `Option` since they
/// can be overwritten but never cleared; optional metadata uses
/// [`FieldUpdate`] so callers can distinguish "leave alone" from "remove".
#[derive(Debug, Default, Clone)]
pub struct TodoUpdate {
    /// New task text (if Some).
    pub task: Option<String>,
    /// New completion flag (if Some).
    pub completed: Option<bool>,
    /// Last-update timestamp; the engine sets this on every update.
    pub updated_at: Option<String>,
    /// Completion timestamp; the engine derives this from `completed`.
    pub completed_at: FieldUpdate<String>,
    /// Assignee.
    pub assigned_to: FieldUpdate<String>,
    /// Priority.
    pub priority: FieldUpdate<Priority>,
    /// Estimated minutes.
    pub estimated_minutes: FieldUpdate<u32>,
    /// Actual minutes.
    pub actual_minutes: FieldUpdate<u32>,
    /// Parent todo id.
    pub parent_task_id: FieldUpdate<String>,
    /// Tags.
    pub tags: FieldUpdate<Vec<String>>,
}

impl TodoUpdate {
    /// Check if any fields are set for update.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.task.is_none()
            && self.completed.is_none()
            && self.updated_at.is_none()
            && self.completed_at.is_keep()
            && self.assigned_to.is_keep()
            && self.priority.is_keep()
            && self.estimated_minutes.is_keep()
            && self.actual_minutes.is_keep()
            && self.parent_task_id.is_keep()
            && self.tags.is_keep()
    }

    /// Apply this update to an in-memory record.
    ///
    /// This is the merge contract the SQL path implements: fields not present
    /// in the update are untouched, `Set` overwrites, `Clear` removes.
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(ref task) = self.task {
            todo.task.clone_from(task);
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(ref at) = self.updated_at {
            todo.updated_at = Some(at.clone());
        }
        self.completed_at.merge_into(&mut todo.completed_at);
        self.assigned_to.merge_into(&mut todo.assigned_to);
        self.priority.merge_into(&mut todo.priority);
        self.estimated_minutes.merge_into(&mut todo.estimated_minutes);
        self.actual_minutes.merge_into(&mut todo.actual_minutes);
        self.parent_task_id.merge_into(&mut todo.parent_task_id);
        self.tags.merge_into(&mut todo.tags);
    }
}

/// Identifier-keyed `SQLite` storage for todo records.
///
/// Each operation opens its own connection; WAL mode keeps a CLI process and
/// an MCP process pointed at the same file from tripping over each other.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Create storage backed by the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let storage = Self { db_path: db_path.as_ref().to_path_buf() };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Get the database path.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open a connection to the database.
    fn open(&self) -> Result<Connection> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Ok(conn)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.open()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS todos (
                id TEXT PRIMARY KEY,
                task TEXT NOT NULL,
                completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT,
                completed_at TEXT,
                assigned_to TEXT,
                priority TEXT CHECK (priority IN ('high', 'medium', 'low')),
                estimated_minutes INTEGER CHECK (estimated_minutes >= 0),
                actual_minutes INTEGER CHECK (actual_minutes >= 0),
                parent_task_id TEXT,
                tags TEXT
            );
            ",
        )?;

        Ok(())
    }

    /// Parse a todo from a row.
    fn parse_todo(row: &rusqlite::Row) -> rusqlite::Result<Todo> {
        let priority: Option<String> = row.get(7)?;
        let tags: Option<String> = row.get(11)?;

        Ok(Todo {
            id: row.get(0)?,
            task: row.get(1)?,
            completed: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
            completed_at: row.get(5)?,
            assigned_to: row.get(6)?,
            // The CHECK constraint keeps stored values inside the enumeration
            priority: priority.and_then(|p| Priority::from_str(&p).ok()),
            estimated_minutes: row.get(8)?,
            actual_minutes: row.get(9)?,
            parent_task_id: row.get(10)?,
            tags: tags.and_then(|t| serde_json::from_str(&t).ok()),
        })
    }

    /// Insert or overwrite the record at its id.
    ///
    /// No validation happens here; callers validate before persisting.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn put(&self, todo: &Todo) -> Result<()> {
        let conn = self.open()?;
        let tags = todo.tags.as_ref().map(serde_json::to_string).transpose()?;

        conn.execute(
            "INSERT OR REPLACE INTO todos
             (id, task, completed, created_at, updated_at, completed_at,
              assigned_to, priority, estimated_minutes, actual_minutes, parent_task_id, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                todo.id,
                todo.task,
                todo.completed,
                todo.created_at,
                todo.updated_at,
                todo.completed_at,
                todo.assigned_to,
                todo.priority.map(|p| p.as_str()),
                todo.estimated_minutes,
                todo.actual_minutes,
                todo.parent_task_id,
                tags,
            ],
        )?;

        Ok(())
    }

    /// Get the record at `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    pub fn get(&self, id: &str) -> Result<Option<Todo>> {
        let conn = self.open()?;
        let todo = conn
            .query_row("SELECT * FROM todos WHERE id = ?1", params![id], Self::parse_todo)
            .optional()?;
        Ok(todo)
    }

    /// Snapshot of every record in insertion (rowid) order.
    ///
    /// The order carries no meaning of its own, but it is the documented
    /// tie-break for by-name lookups over the non-unique task text.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan fails.
    pub fn scan_all(&self) -> Result<Vec<Todo>> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT * FROM todos ORDER BY rowid")?;
        let todos = stmt.query_map([], Self::parse_todo)?.flatten().collect();
        Ok(todos)
    }

    /// Delete every record matching `predicate`; returns the count removed.
    ///
    /// Deletes are issued one record at a time, so an interrupted scan leaves
    /// earlier deletions applied and later records intact, never a partially
    /// applied delete of a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the scan or a delete fails.
    pub fn delete_if(&self, predicate: impl Fn(&Todo) -> bool) -> Result<usize> {
        let conn = self.open()?;
        let mut stmt = conn.prepare("SELECT * FROM todos ORDER BY rowid")?;
        let todos: Vec<Todo> = stmt.query_map([], Self::parse_todo)?.flatten().collect();

        let mut removed = 0;
        for todo in todos.iter().filter(|t| predicate(t)) {
            removed += conn.execute("DELETE FROM todos WHERE id = ?1", params![todo.id])?;
        }
        Ok(removed)
    }

    /// Merge `update` into the record at `id`.
    ///
    /// Only fields present in the update overwrite stored columns; `Keep`
    /// fields are untouched and `Clear` fields become NULL. Returns `false`
    /// when no record exists at `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn merge_update(&self, id: &str, update: &TodoUpdate) -> Result<bool> {
        let conn = self.open()?;

        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM todos WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        if !exists {
            return Ok(false);
        }
        if update.is_empty() {
            return Ok(true);
        }

        let mut sets: Vec<String> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref task) = update.task {
            sets.push("task = ?".to_string());
            values.push(Box::new(task.clone()));
        }
        if let Some(completed) = update.completed {
            sets.push("completed = ?".to_string());
            values.push(Box::new(completed));
        }
        if let Some(ref at) = update.updated_at {
            sets.push("updated_at = ?".to_string());
            values.push(Box::new(at.clone()));
        }

        push_field(&mut sets, &mut values, "completed_at", &update.completed_at);
        push_field(&mut sets, &mut values, "assigned_to", &update.assigned_to);
        push_field(&mut sets, &mut values, "estimated_minutes", &update.estimated_minutes);
        push_field(&mut sets, &mut values, "actual_minutes", &update.actual_minutes);
        push_field(&mut sets, &mut values, "parent_task_id", &update.parent_task_id);

        match &update.priority {
            FieldUpdate::Keep => {}
            FieldUpdate::Set(priority) => {
                sets.push("priority = ?".to_string());
                values.push(Box::new(priority.as_str().to_string()));
            }
            FieldUpdate::Clear => sets.push("priority = NULL".to_string()),
        }
        match &update.tags {
            FieldUpdate::Keep => {}
            FieldUpdate::Set(tags) => {
                sets.push("tags = ?".to_string());
                values.push(Box::new(serde_json::to_string(tags)?));
            }
            FieldUpdate::Clear => sets.push("tags = NULL".to_string()),
        }

        values.push(Box::new(id.to_string()));
        let sql = format!("UPDATE todos SET {} WHERE id = ?", sets.join(", "));

        let params: Vec<&dyn rusqlite::ToSql> = values.iter().map(AsRef::as_ref).collect();
        conn.execute(&sql, params.as_slice())?;

        Ok(true)
    }
}

/// Append the SET fragment for a directly-storable tri-state column.
fn push_field<T: rusqlite::ToSql + Clone + 'static>(
    sets: &mut Vec<String>,
    values: &mut Vec<Box<dyn rusqlite::ToSql>>,
    column: &str,
    field: &FieldUpdate<T>,
) {
    match field {
        FieldUpdate::Keep => {}
        FieldUpdate::Set(value) => {
            sets.push(format!("{column} = ?"));
            values.push(Box::new(value.clone()));
        }
        FieldUpdate::Clear => sets.push(format!("{column} = NULL")),
    }
}
