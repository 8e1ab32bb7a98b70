//! MCP (Model Context Protocol) server implementation.
//!
//! This module provides an MCP server following the JSON-RPC 2.0
//! specification and MCP protocol version 2025-06-18, exposing the resume
//! pipeline to clients over stdio.

#[cfg(test)]
mod tests;

pub mod protocol;
pub mod server;
pub mod tools;

pub use protocol::{CallToolParams, CallToolResult, Tool, ToolContent};
pub use server::{McpServer, ToolHandler};
