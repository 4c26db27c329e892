//! # `todo_tracker`
//!
//! A persistent todo tracker shared by two front ends: a human-facing CLI
//! and an agent-facing MCP server. Both call the same store engine in
//! [`todos`], so records created from the command line are visible to agents
//! and vice versa.

pub mod error;
pub mod paths;
pub mod todos;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "mcp")]
pub mod mcp;
#[cfg(feature = "mcp")]
pub mod mcp_logging;

pub use error::{Error, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
