//! Database location resolution.
//!
//! The store lives in a single `SQLite` file. The location is resolved in
//! order: the `TODO_TRACKER_DB_PATH` environment variable, then
//! `~/.todo-tracker/todos.sqlite3`, then `./todos.sqlite3` as a last resort
//! when no home directory can be determined.

use std::path::{Path, PathBuf};

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "TODO_TRACKER_DB_PATH";

/// The data directory name under the home directory.
const DATA_DIR_NAME: &str = ".todo-tracker";

/// The database filename.
pub const DATABASE_FILENAME: &str = "todos.sqlite3";

/// Resolve the database path.
#[must_use]
pub fn db_path() -> PathBuf {
    if let Some(path) = std::env::var_os(DB_PATH_ENV) {
        return PathBuf::from(path);
    }
    dirs::home_dir().map_or_else(
        || PathBuf::from(DATABASE_FILENAME),
        |home| home.join(DATA_DIR_NAME).join(DATABASE_FILENAME),
    )
}

/// Directory holding the database, used for sibling files such as the MCP log.
#[must_use]
pub fn data_dir() -> PathBuf {
    db_path().parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_var_overrides_db_path() {
        std::env::set_var(DB_PATH_ENV, "/tmp/custom-todos.sqlite3");
        assert_eq!(db_path(), PathBuf::from("/tmp/custom-todos.sqlite3"));
        std::env::remove_var(DB_PATH_ENV);
    }

    #[test]
    #[serial]
    fn test_default_path_uses_home_directory() {
        std::env::remove_var(DB_PATH_ENV);
        let path = db_path();
        assert!(path.to_string_lossy().ends_with(DATABASE_FILENAME));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join(DATA_DIR_NAME).join(DATABASE_FILENAME));
        }
    }

    #[test]
    #[serial]
    fn test_data_dir_is_db_parent() {
        std::env::set_var(DB_PATH_ENV, "/tmp/todo-data/todos.sqlite3");
        assert_eq!(data_dir(), PathBuf::from("/tmp/todo-data"));
        std::env::remove_var(DB_PATH_ENV);
    }
}
