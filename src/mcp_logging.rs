//! MCP server logging.
//!
//! Stdout is reserved for the JSON-RPC stream and stderr is captured by most
//! MCP clients, so the server logs to `mcp.log` next to the database instead.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

/// The log filename within the data directory.
const LOG_FILENAME: &str = "mcp.log";

/// Maximum log file size before rotation (1MB).
const MAX_LOG_SIZE: u64 = 1_048_576;

/// Global log file handle (set once at startup).
static LOG_FILE: Mutex<Option<File>> = Mutex::new(None);

/// Get the path to the MCP log file.
#[must_use]
pub fn log_path() -> PathBuf {
    crate::paths::data_dir().join(LOG_FILENAME)
}

/// Initialize the MCP logger.
///
/// This should be called once at MCP server startup.
///
/// # Errors
///
/// Returns an error if the log file cannot be created.
pub fn init() -> std::io::Result<()> {
    let path = log_path();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Rotate the log file if it has grown too large
    if let Ok(metadata) = fs::metadata(&path) {
        if metadata.len() > MAX_LOG_SIZE {
            let _ = fs::rename(&path, path.with_extension("log.old"));
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    if let Ok(mut guard) = LOG_FILE.lock() {
        *guard = Some(file);
    }

    log_event("MCP server starting");
    Ok(())
}

/// Write a log entry.
fn write_log(message: &str) {
    if let Ok(mut guard) = LOG_FILE.lock() {
        if let Some(ref mut file) = *guard {
            let ts = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
            let _ = writeln!(file, "[{ts}] {message}");
            let _ = file.flush();
        }
    }
}

/// Log a general event.
pub fn log_event(message: &str) {
    write_log(&format!("EVENT: {message}"));
}

/// Log a warning.
pub fn log_warning(message: &str) {
    write_log(&format!("WARN: {message}"));
}

/// Install a panic hook that records panics before the process dies.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        write_log(&format!("PANIC: {info}"));
        default_hook(info);
    }));
}
