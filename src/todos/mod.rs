//! Todo tracking core.
//!
//! This module provides the record schema, the identifier-keyed storage
//! adapter, and the store engine with:
//! - Create, list, and lookup by id or by task text
//! - Merge updates with explicit keep/set/clear semantics per optional field
//! - Completion tracking with derived timestamps
//! - Deletion by id (idempotent) or by one or more task names
//!
//! # Example
//!
//! ```no_run
//! use todo_tracker::todos::{NewTodo, Priority, SqliteTodoStore, TodoFilter, TodoStore};
//!
//! let store = SqliteTodoStore::new("/tmp/todos.sqlite3").unwrap();
//!
//! // Create a todo with coordination metadata
//! store
//!     .add(
//!         "Implement auth",
//!         NewTodo { priority: Some(Priority::High), ..Default::default() },
//!     )
//!     .unwrap();
//!
//! // Mark it done by name and list what remains
//! store.complete_by_name("Implement auth").unwrap();
//! let open = store.list(&TodoFilter { completed: Some(false), ..Default::default() }).unwrap();
//! assert!(open.is_empty());
//! ```

pub mod id;
pub mod models;
pub mod storage;
pub mod store;

pub use models::{Priority, Todo, ValidationError};
pub use storage::{FieldUpdate, SqliteStorage, TodoUpdate};
pub use store::{NewTodo, SqliteTodoStore, TodoFilter, TodoStore};
