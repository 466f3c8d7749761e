//! MCP tool implementations.
//!
//! This module contains all tools exposed by the terravue server.

pub mod cache;
pub mod details;
pub mod search;
pub mod suggest;

use rmcp::{ErrorData as McpError, model::*};
use serde::Serialize;
use terravue_core::Error;

pub use details::{WebsiteDetailsParams, details_impl};
pub use search::{WebsiteSearchParams, search_impl};
pub use suggest::{WebsiteSuggestParams, suggest_impl};

/// Render a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
