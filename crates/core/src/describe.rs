//! Optional generated descriptions for the detail view.
//!
//! Generation sits behind the [`Describer`] capability so the catalogue
//! never depends on it. Every failure is "no enrichment".

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::{AbortHandle, JoinHandle};

use crate::cache::DescriptionCache;
use crate::model::{Impact, WebsiteEntry, format_category_name};

/// Text generation capability.
#[async_trait::async_trait]
pub trait Describer: Send + Sync {
    /// Generate a short description, or None when unavailable.
    async fn describe(&self, website: &str, category: &str, impact: Impact) -> Option<String>;
}

/// Prompt pair sent to a text generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionPrompt {
    pub system: String,
    pub user: String,
}

const SYSTEM_PROMPT: &str = "You are an environmental impact analyst. Generate concise, factual descriptions \
about websites and their environmental impact. Do not use markdown formatting. Keep responses brief and informative.";

impl DescriptionPrompt {
    /// Build the prompt for one website. `category` is the raw category key.
    pub fn build(website: &str, category: &str, impact: Impact) -> Self {
        let user = format!(
            "Generate a brief, informative description about {website} and its environmental impact. \
The website belongs to the {} category and has a {impact} environmental impact.\n\n\
Focus on:\n\
- What the website/service does\n\
- Why it has environmental impact (energy usage, data centers, user behavior, etc.)\n\
- Keep it concise (2-3 sentences maximum)\n\
- Write in a neutral, informative tone\n\
- Don't use markdown formatting\n\n\
Start your response with: \"{website} is\"",
            format_category_name(category)
        );

        Self { system: SYSTEM_PROMPT.to_string(), user }
    }
}

/// Cache-first description enrichment.
///
/// At most one background request is alive at a time: spawning a new one
/// aborts the previous task.
pub struct Enricher {
    describer: Arc<dyn Describer>,
    cache: DescriptionCache,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl Enricher {
    pub fn new(describer: Arc<dyn Describer>, cache: DescriptionCache) -> Self {
        Self { describer, cache, in_flight: Mutex::new(None) }
    }

    /// Previously generated description, without generating.
    pub async fn cached(&self, website: &str) -> Option<String> {
        self.cache.get(website).await
    }

    /// Cached description, else generate one and cache it.
    pub async fn describe(&self, entry: &WebsiteEntry) -> Option<String> {
        describe_and_cache(self.describer.as_ref(), &self.cache, entry).await
    }

    /// Start enrichment in the background and return immediately.
    ///
    /// Any request still running from an earlier call is aborted first.
    pub async fn spawn(&self, entry: WebsiteEntry) -> JoinHandle<Option<String>> {
        let mut in_flight = self.in_flight.lock().await;
        if let Some(previous) = in_flight.take()
            && !previous.is_finished()
        {
            tracing::debug!("aborting previous description request");
            previous.abort();
        }

        let describer = Arc::clone(&self.describer);
        let cache = self.cache.clone();
        let task = tokio::spawn(async move { describe_and_cache(describer.as_ref(), &cache, &entry).await });
        *in_flight = Some(task.abort_handle());
        task
    }
}

async fn describe_and_cache(
    describer: &dyn Describer, cache: &DescriptionCache, entry: &WebsiteEntry,
) -> Option<String> {
    if let Some(cached) = cache.get(&entry.website).await {
        tracing::debug!(website = %entry.website, "using cached description");
        return Some(cached);
    }

    let generated = describer
        .describe(&entry.website, &entry.category, entry.impact)
        .await
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    match &generated {
        Some(text) => cache.set(&entry.website, text).await,
        None => tracing::debug!(website = %entry.website, "no generated description"),
    }

    generated
}

/// Describer that never produces text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDescriber;

#[async_trait::async_trait]
impl Describer for NoDescriber {
    async fn describe(&self, _website: &str, _category: &str, _impact: Impact) -> Option<String> {
        None
    }
}
