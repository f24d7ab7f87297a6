//! # pocketbase-mcp
//!
//! MCP (Model Context Protocol) server for PocketBase.
//!
//! This crate exposes a remote PocketBase instance's HTTP API as MCP tools
//! for AI agents: collection management, record CRUD, authentication, and
//! static schema/rules references. It implements the MCP protocol over
//! stdin/stdout using JSON-RPC 2.0; each tool call is validated, mapped to
//! one HTTP request against the target server, and the JSON response (or a
//! structured error) is relayed back.
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in AI tools
//! like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "pocketbase": {
//!       "command": "/path/to/pocketbase-mcp",
//!       "args": ["--url", "http://localhost:8090"]
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! For testing or embedding, you can use the library API:
//!
//! ```no_run
//! use pocketbase_mcp::{HttpClient, McpServer, PocketBaseApi};
//!
//! # async fn run() -> pocketbase_mcp::Result<()> {
//! let http = HttpClient::new("http://localhost:8090", None);
//! let api = PocketBaseApi::new(http);
//! let mut server = McpServer::new(api);
//!
//! // Run the server (reads from stdin, writes to stdout)
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod api;
mod error;
mod http;
mod reference;
mod server;
pub mod tools;
pub mod validate;

pub use api::PocketBaseApi;
pub use error::{McpError, Result};
pub use http::HttpClient;
pub use reference::{field_schema_reference, rules_reference};
pub use server::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer};
pub use tools::{ToolDef, ToolRegistry};
