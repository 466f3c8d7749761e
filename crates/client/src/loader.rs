//! Cache-first catalogue loading.
//!
//! The record cache is consulted before any network activity. On a miss
//! both documents are fetched, joined, written back to the cache and
//! returned. A failed fetch surfaces immediately; there is no retry.

use std::sync::Arc;

use tokio::sync::Mutex;

use terravue_core::{Error, RecordCache, RecordSet, WebsiteEntry, join_with_stats};

use crate::fetch::DataSource;

/// Loads the joined catalogue through the record cache.
///
/// Loads are serialized, so at most one fetch-join cycle is in flight.
pub struct DataLoader {
    source: Arc<dyn DataSource>,
    cache: RecordCache,
    loading: Mutex<()>,
}

impl DataLoader {
    pub fn new(source: Arc<dyn DataSource>, cache: RecordCache) -> Self {
        Self { source, cache, loading: Mutex::new(()) }
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    /// Cached catalogue if valid, otherwise a fresh fetch and join.
    pub async fn load(&self) -> Result<RecordSet, Error> {
        let _guard = self.loading.lock().await;

        if let Some(records) = self.cache.read().await {
            return Ok(records);
        }

        self.fetch_and_store().await
    }

    /// Fetch and join regardless of cache state.
    pub async fn refresh(&self) -> Result<RecordSet, Error> {
        let _guard = self.loading.lock().await;
        self.fetch_and_store().await
    }

    /// Resolve a single website for the detail view.
    ///
    /// Looks in the cached catalogue first; if the website is not there the
    /// catalogue is fetched fresh before giving up.
    pub async fn find(&self, website: &str) -> Result<WebsiteEntry, Error> {
        let website = website.trim();
        if website.is_empty() {
            return Err(Error::InvalidInput("website cannot be empty".into()));
        }

        let _guard = self.loading.lock().await;

        if let Some(records) = self.cache.read().await {
            if let Some(entry) = records.get(website) {
                return Ok(entry.clone());
            }
            tracing::debug!(website, "website not in cached catalogue, fetching");
        }

        let records = self.fetch_and_store().await?;
        records
            .get(website)
            .cloned()
            .ok_or_else(|| Error::WebsiteNotFound(website.to_string()))
    }

    async fn fetch_and_store(&self) -> Result<RecordSet, Error> {
        let documents = self.source.fetch().await.inspect_err(|e| {
            tracing::error!(error = %e, "failed to load catalogue");
        })?;

        let (records, stats) = join_with_stats(&documents.links, &documents.categories);
        tracing::info!(
            websites = records.len(),
            high = stats.high,
            medium = stats.medium,
            low = stats.low,
            unknown = stats.unknown,
            "catalogue loaded from source"
        );

        self.cache.write(&records).await;
        Ok(records)
    }
}
