//! Cache for generated website descriptions.
//!
//! All descriptions share one stored blob: a map from website to text,
//! stamped when the blob was first created. The whole blob expires at once.

use std::collections::BTreeMap;
use std::time::Duration;

use super::connection::CacheDb;
use super::envelope::{CacheEnvelope, TtlSlot};
use crate::Error;

/// Store key for generated descriptions.
pub const DESCRIPTIONS_KEY: &str = "terraVueAIDescriptions";

/// Default validity window for generated descriptions (7 days).
pub const DESCRIPTIONS_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

type DescriptionMap = BTreeMap<String, String>;

#[derive(Debug, Clone)]
pub struct DescriptionCache {
    slot: TtlSlot,
}

impl DescriptionCache {
    pub fn new(db: CacheDb, ttl: Duration) -> Self {
        Self { slot: TtlSlot::new(db, DESCRIPTIONS_KEY, ttl) }
    }

    /// Cached description for `website`, if the blob is still valid.
    pub async fn get(&self, website: &str) -> Option<String> {
        let mut envelope = self.slot.load::<DescriptionMap>().await?;
        envelope.data.remove(website)
    }

    /// Add or replace the description for `website`.
    ///
    /// Keeps the blob's original timestamp; an expired or corrupt blob is
    /// replaced by a fresh one.
    pub async fn set(&self, website: &str, description: &str) {
        let mut envelope = self
            .slot
            .load::<DescriptionMap>()
            .await
            .unwrap_or_else(|| CacheEnvelope::new(DescriptionMap::new()));

        envelope.data.insert(website.to_string(), description.to_string());
        self.slot.store(&envelope).await;
    }

    pub async fn clear(&self) -> Result<bool, Error> {
        self.slot.clear().await
    }
}
