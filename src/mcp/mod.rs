//! MCP (Model Context Protocol) server for Prepdesk.
//!
//! Exposes the interview, price and review tools to AI assistants.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
