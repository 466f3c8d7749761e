//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use crate::state::AppState;
use crate::tools::{
    WebsiteDetailsParams, WebsiteSearchParams, WebsiteSuggestParams,
    cache::{CachePurgeParams, purge_impl},
    details_impl, search_impl, suggest_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for terravue.
#[derive(Clone)]
pub struct TerraVueServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl TerraVueServer {
    /// Create a new server handler.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Search the website catalogue by environmental impact. Filter by impact (all, high, medium, low, unknown) and sort (relevance, alphabetical, impact-high, impact-low, category). A blank query lists every website."
    )]
    async fn website_search(&self, params: Parameters<WebsiteSearchParams>) -> Result<CallToolResult, McpError> {
        search_impl(&self.state, params.0).await
    }

    #[tool(description = "Suggest up to five catalogued website identifiers containing the typed text.")]
    async fn website_suggest(&self, params: Parameters<WebsiteSuggestParams>) -> Result<CallToolResult, McpError> {
        suggest_impl(&self.state, params.0).await
    }

    /// Detail panel for one website.
    ///
    /// Returns immediately; description generation, when configured, runs in
    /// the background and is served from cache on later calls.
    #[tool(
        description = "Show environmental impact details for one website: category, impact, description, annual energy and CO2 estimate, and source."
    )]
    async fn website_details(&self, params: Parameters<WebsiteDetailsParams>) -> Result<CallToolResult, McpError> {
        details_impl(&self.state, params.0).await
    }

    #[tool(description = "Clear cached data: records (the joined catalogue), descriptions, or all.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.state, params.0).await
    }
}

impl ServerHandler for TerraVueServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "terravue".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Browse websites by estimated environmental impact. Use website_search to list or rank sites, \
                 website_suggest for autocomplete and website_details for a single site."
                    .into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
