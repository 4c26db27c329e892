//! Integration tests for `todo_tracker`.

use std::collections::HashSet;
use tempfile::TempDir;
use todo_tracker::todos::{NewTodo, Priority, SqliteTodoStore, TodoFilter, TodoStore};
use todo_tracker::VERSION;

#[test]
fn test_version_exists() {
    assert!(!VERSION.is_empty());
}

#[test]
fn test_full_lifecycle_through_public_api() {
    let dir = TempDir::new().unwrap();
    let store = SqliteTodoStore::new(dir.path().join("todos.sqlite3")).unwrap();

    store.add("Task A", NewTodo::default()).unwrap();
    store
        .add("Task B", NewTodo { priority: Some(Priority::High), ..Default::default() })
        .unwrap();

    store.complete_by_name("Task A").unwrap();
    let done = store.list(&TodoFilter { completed: Some(true), ..Default::default() }).unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].task, "Task A");
    assert!(done[0].completed_at.is_some());

    let removed = store.delete_by_names(&HashSet::from(["Task A".to_string()])).unwrap();
    assert_eq!(removed, 1);

    let remaining = store.list(&TodoFilter::default()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].task, "Task B");
}

#[test]
fn test_records_persist_across_store_handles() {
    // The CLI is invoked process-per-command, so every command sees the
    // previous command's writes through a fresh handle.
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("todos.sqlite3");

    {
        let store = SqliteTodoStore::new(&db_path).unwrap();
        store.add("Persist me", NewTodo::default()).unwrap();
    }

    let store = SqliteTodoStore::new(&db_path).unwrap();
    let todo = store.get_by_name("Persist me").unwrap();
    assert!(!todo.completed);
    assert!(todo.id.starts_with("persist-me-"));
}

#[test]
fn test_two_handles_share_one_database() {
    // One handle per front end (CLI + MCP server) against the same file.
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("todos.sqlite3");

    let cli_store = SqliteTodoStore::new(&db_path).unwrap();
    let mcp_store = SqliteTodoStore::new(&db_path).unwrap();

    cli_store.add("Shared", NewTodo::default()).unwrap();
    mcp_store.complete_by_name("Shared").unwrap();

    assert!(cli_store.get_by_name("Shared").unwrap().completed);
}
