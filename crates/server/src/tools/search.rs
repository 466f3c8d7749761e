//! website_search tool implementation.
//!
//! Filters the catalogue by impact, ranks it against a free-text query and
//! applies the requested sort order. A blank query returns the full
//! (filtered) listing instead of matching nothing.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use terravue_core::{Impact, ImpactFilter, QueryEngine, ScoredRecord, SearchOutcome, SortOrder, model::website_url};

use super::json_result;
use crate::state::AppState;

/// Input parameters for website_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebsiteSearchParams {
    /// Free-text query. Blank lists every website.
    #[serde(default)]
    pub query: String,

    /// Impact filter: all (default), high, medium, low, unknown.
    #[serde(default = "default_impact")]
    pub impact: String,

    /// Sort order: relevance (default), alphabetical, impact-high, impact-low, category.
    /// Unrecognized values fall back to relevance.
    #[serde(default = "default_sort")]
    pub sort: String,
}

impl Default for WebsiteSearchParams {
    fn default() -> Self {
        Self { query: String::new(), impact: default_impact(), sort: default_sort() }
    }
}

fn default_impact() -> String {
    "all".into()
}

fn default_sort() -> String {
    "relevance".into()
}

/// One result card.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebsiteCard {
    pub website: String,
    /// Visit URL.
    pub url: String,
    pub category: String,
    pub category_name: String,
    pub impact: Impact,
    pub badge: String,
    pub description: String,
    /// Icon key, or null when the site's favicon should be used.
    pub icon: Option<String>,
    /// Relevance score (0 in the unranked listing).
    pub score: u32,
}

impl From<&ScoredRecord> for WebsiteCard {
    fn from(scored: &ScoredRecord) -> Self {
        let entry = &scored.entry;
        Self {
            website: entry.website.clone(),
            url: website_url(&entry.website),
            category: entry.category.clone(),
            category_name: entry.category_name(),
            impact: entry.impact,
            badge: entry.impact.badge().to_string(),
            description: entry.description.clone(),
            icon: entry.has_icon().then(|| entry.icon.clone()),
            score: scored.score,
        }
    }
}

/// Output structure for website_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebsiteSearchOutput {
    /// "Search Results" for a ranked query, "All Websites" otherwise.
    pub title: String,
    pub query: String,
    pub impact: String,
    pub sort: SortOrder,
    pub count: usize,
    pub results: Vec<WebsiteCard>,
}

/// Implementation of the website_search tool.
pub async fn search_impl(state: &AppState, params: WebsiteSearchParams) -> Result<CallToolResult, McpError> {
    let filter: ImpactFilter = params.impact.parse()?;
    let order: SortOrder = params.sort.parse().unwrap_or_default();

    let records = state.loader.load().await?;

    let mut engine = QueryEngine::new(records);
    engine.set_filter(filter);
    let title = match engine.query(&params.query) {
        SearchOutcome::Ranked(_) => "Search Results",
        SearchOutcome::DefaultView => "All Websites",
    };
    let results: Vec<WebsiteCard> = engine.sort(order).iter().map(WebsiteCard::from).collect();

    tracing::debug!(query = %params.query, count = results.len(), "website search");

    let output = WebsiteSearchOutput {
        title: title.to_string(),
        query: params.query.trim().to_string(),
        impact: params.impact.trim().to_lowercase(),
        sort: order,
        count: results.len(),
        results,
    };

    json_result(&output)
}
