//! cache_purge tool implementation.
//!
//! Clears the catalogue cache, the description cache, or both.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::tools::json_result;

/// Which cache to clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PurgeTarget {
    /// The joined catalogue; the next load refetches both documents.
    Records,
    /// Generated descriptions.
    Descriptions,
    #[default]
    All,
}

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// records, descriptions, or all (default).
    #[serde(default)]
    pub target: PurgeTarget,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Names of the caches that held an entry and were cleared.
    pub cleared: Vec<String>,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(state: &AppState, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let mut cleared = Vec::new();

    if matches!(params.target, PurgeTarget::Records | PurgeTarget::All) && state.records.clear().await? {
        cleared.push("records".to_string());
    }

    if matches!(params.target, PurgeTarget::Descriptions | PurgeTarget::All) && state.descriptions.clear().await? {
        cleared.push("descriptions".to_string());
    }

    tracing::info!(scope = ?params.target, cleared = cleared.len(), "cache purged");

    json_result(&CachePurgeOutput { cleared })
}
