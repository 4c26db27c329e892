//! MCP server exposing the todo store to agents.
//!
//! This module provides an MCP server that makes the six todo operations
//! available through the Model Context Protocol.

mod todos_server;

pub use todos_server::TodosServer;
