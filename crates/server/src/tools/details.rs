//! website_details tool implementation.
//!
//! Resolves one website through the cached catalogue (falling back to a
//! fresh fetch) and renders its detail panel. The description is the
//! generated one when it is already cached; otherwise the catalogue text is
//! returned at once and generation starts in the background for next time.

use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use terravue_core::{AnnualEstimate, Impact, model::website_url};

use super::json_result;
use crate::state::AppState;

/// Input parameters for website_details tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebsiteDetailsParams {
    /// Website identifier, e.g. "netflix.com".
    pub website: String,
}

/// Output structure for website_details tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WebsiteDetailsOutput {
    pub website: String,
    /// Visit URL.
    pub url: String,
    pub category: String,
    pub category_name: String,
    pub impact: Impact,
    pub badge: String,
    pub icon: Option<String>,
    pub description: String,
    /// True when `description` is a generated description.
    pub enhanced: bool,
    /// True when generation was started by this call.
    pub enrichment_pending: bool,
    pub annual_estimate: Option<AnnualEstimate>,
    /// Citation for the estimate; null when none is available.
    pub source: Option<String>,
}

/// Implementation of the website_details tool.
pub async fn details_impl(state: &AppState, params: WebsiteDetailsParams) -> Result<CallToolResult, McpError> {
    let entry = state.loader.find(&params.website).await?;

    let cached = state.enricher.cached(&entry.website).await;
    let enhanced = cached.is_some();
    let enrichment_pending = !enhanced && state.enrichment_enabled;

    if enrichment_pending {
        tracing::debug!(website = %entry.website, "starting background description");
        // Detached: the result lands in the description cache.
        drop(state.enricher.spawn(entry.clone()).await);
    }

    let output = WebsiteDetailsOutput {
        url: website_url(&entry.website),
        category_name: entry.category_name(),
        badge: entry.impact.badge().to_string(),
        icon: entry.has_icon().then(|| entry.icon.clone()),
        description: cached.unwrap_or_else(|| entry.description.clone()),
        enhanced,
        enrichment_pending,
        annual_estimate: entry.category_data.annual_estimate.clone(),
        source: entry.category_data.source().map(str::to_string),
        impact: entry.impact,
        category: entry.category,
        website: entry.website,
    };

    json_result(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::state::test_support::{StubDescriber, state, state_with, text_of};

    fn params(website: &str) -> WebsiteDetailsParams {
        WebsiteDetailsParams { website: website.into() }
    }

    #[tokio::test]
    async fn test_details_with_estimate_and_source() {
        let (_, state) = state().await;
        let output = text_of(&details_impl(&state, params("netflix.com")).await.unwrap());

        assert_eq!(output["category_name"], "Video Streaming");
        assert_eq!(output["impact"], "high");
        assert_eq!(output["badge"], "🔴 High Impact");
        assert_eq!(output["description"], "Streaming video uses a lot of energy");
        assert_eq!(output["annual_estimate"]["wh-comparison"], "a fridge for a year");
        assert_eq!(output["source"], "https://example.org/study");
        assert_eq!(output["url"], "https://netflix.com");
        assert_eq!(output["enhanced"], false);
        assert_eq!(output["enrichment_pending"], false);
    }

    #[tokio::test]
    async fn test_missing_estimate_and_blank_source_are_null() {
        let (_, state) = state().await;
        let output = text_of(&details_impl(&state, params("wikipedia.org")).await.unwrap());

        assert_eq!(output["description"], "Free encyclopedia");
        assert!(output["annual_estimate"].is_null());
        assert!(output["source"].is_null());
    }

    #[tokio::test]
    async fn test_unknown_category_gets_synthesized_description() {
        let (_, state) = state().await;
        let output = text_of(&details_impl(&state, params("example.com")).await.unwrap());

        assert_eq!(output["impact"], "unknown");
        assert_eq!(output["badge"], "❓ Unknown");
        assert_eq!(output["description"], "Uncatalogued website with unknown environmental impact");
    }

    #[tokio::test]
    async fn test_unknown_website_is_not_found() {
        let (_, state) = state().await;
        let err = details_impl(&state, params("nowhere.example")).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_enrichment_runs_in_background_then_is_served() {
        let (_, state) = state_with(Some(Arc::new(StubDescriber))).await;

        let first = text_of(&details_impl(&state, params("netflix.com")).await.unwrap());
        assert_eq!(first["enhanced"], false);
        assert_eq!(first["enrichment_pending"], true);
        assert_eq!(first["description"], "Streaming video uses a lot of energy");

        let mut cached = None;
        for _ in 0..50 {
            cached = state.enricher.cached("netflix.com").await;
            if cached.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(cached.as_deref(), Some("netflix.com is a stub."));

        let second = text_of(&details_impl(&state, params("netflix.com")).await.unwrap());
        assert_eq!(second["enhanced"], true);
        assert_eq!(second["enrichment_pending"], false);
        assert_eq!(second["description"], "netflix.com is a stub.");
    }
}
