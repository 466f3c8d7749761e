//! website_suggest tool implementation.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use terravue_core::query::suggestions;

use super::json_result;
use crate::state::AppState;

/// Input parameters for website_suggest tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct WebsiteSuggestParams {
    /// Partial website identifier as typed so far.
    #[serde(default)]
    pub query: String,
}

/// Output structure for website_suggest tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebsiteSuggestOutput {
    /// At most five identifiers containing the query, in identifier order.
    pub suggestions: Vec<String>,
}

/// Implementation of the website_suggest tool.
pub async fn suggest_impl(state: &AppState, params: WebsiteSuggestParams) -> Result<CallToolResult, McpError> {
    if params.query.trim().is_empty() {
        return json_result(&WebsiteSuggestOutput { suggestions: Vec::new() });
    }

    let records = state.loader.load().await?;
    let suggestions = suggestions(&records, &params.query).into_iter().map(String::from).collect();

    json_result(&WebsiteSuggestOutput { suggestions })
}
