//! Cache for the joined catalogue.

use std::time::Duration;

use super::connection::CacheDb;
use super::envelope::{CacheEnvelope, TtlSlot};
use crate::Error;
use crate::model::RecordSet;

/// Store key for the joined record set.
pub const RECORDS_KEY: &str = "terraVueData";

/// Default validity window for the joined record set.
pub const RECORDS_TTL: Duration = Duration::from_secs(30 * 60);

/// Expiring cache for the joined [`RecordSet`].
///
/// An entry is served only while unexpired and non-empty; anything else
/// is deleted on read and reported as a miss.
#[derive(Debug, Clone)]
pub struct RecordCache {
    slot: TtlSlot,
}

impl RecordCache {
    pub fn new(db: CacheDb, ttl: Duration) -> Self {
        Self { slot: TtlSlot::new(db, RECORDS_KEY, ttl) }
    }

    /// Cached record set, or None on any kind of miss.
    pub async fn read(&self) -> Option<RecordSet> {
        let envelope = self.slot.load::<RecordSet>().await?;
        if envelope.data.is_empty() {
            self.slot.purge("empty").await;
            return None;
        }

        tracing::debug!(websites = envelope.data.len(), "record cache hit");
        Some(envelope.data)
    }

    /// Persist `records` stamped with the current time.
    ///
    /// Failures are logged, never returned.
    pub async fn write(&self, records: &RecordSet) {
        self.slot.store(&CacheEnvelope::new(records)).await;
    }

    /// Remove the cached record set.
    pub async fn clear(&self) -> Result<bool, Error> {
        self.slot.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CategoryMetadata, Impact, WebsiteEntry};
    use serde_json::json;

    fn sample() -> RecordSet {
        [WebsiteEntry {
            website: "a.com".into(),
            category: "streaming".into(),
            icon: "a".into(),
            impact: Impact::High,
            description: "desc".into(),
            category_data: CategoryMetadata { impact: Some("HIGH".into()), ..Default::default() },
        }]
        .into_iter()
        .collect()
    }

    async fn cache() -> (CacheDb, RecordCache) {
        let db = CacheDb::open_in_memory().await.unwrap();
        (db.clone(), RecordCache::new(db, RECORDS_TTL))
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (_, cache) = cache().await;
        let records = sample();

        cache.write(&records).await;
        assert_eq!(cache.read().await, Some(records));
    }

    #[tokio::test]
    async fn test_missing_is_miss() {
        let (_, cache) = cache().await;
        assert!(cache.read().await.is_none());
    }

    #[tokio::test]
    async fn test_expired_is_miss_and_purged() {
        let (db, cache) = cache().await;
        let timestamp = chrono::Utc::now().timestamp_millis() - 31 * 60 * 1000;
        let envelope = json!({ "data": sample(), "timestamp": timestamp });
        db.put_value(RECORDS_KEY, &envelope.to_string()).await.unwrap();

        assert!(cache.read().await.is_none());
        assert!(db.get_value(RECORDS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_data_is_miss_and_purged() {
        let (db, cache) = cache().await;
        let envelope = json!({ "data": {}, "timestamp": chrono::Utc::now().timestamp_millis() });
        db.put_value(RECORDS_KEY, &envelope.to_string()).await.unwrap();

        assert!(cache.read().await.is_none());
        assert!(db.get_value(RECORDS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_fields_is_miss_and_purged() {
        let (db, cache) = cache().await;
        db.put_value(RECORDS_KEY, r#"{"data":{"a.com":{"website":"a.com"}}}"#)
            .await
            .unwrap();

        assert!(cache.read().await.is_none());
        assert!(db.get_value(RECORDS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let (db, cache) = cache().await;
        cache.write(&sample()).await;

        let mut records = sample();
        records.insert(WebsiteEntry {
            website: "b.org".into(),
            category: "unknown".into(),
            icon: "default".into(),
            impact: Impact::Unknown,
            description: "Unknown website with unknown environmental impact".into(),
            category_data: CategoryMetadata::default(),
        });
        cache.write(&records).await;

        assert_eq!(cache.read().await.map(|r| r.len()), Some(2));
        assert_eq!(db.count_values().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let (db, cache) = cache().await;
        db.conn
            .call(|conn| conn.execute_batch("DROP TABLE kv_store"))
            .await
            .unwrap();

        cache.write(&sample()).await;
        assert!(cache.read().await.is_none());
    }

    #[tokio::test]
    async fn test_mismatched_key_is_corrupt_and_purged() {
        let (db, cache) = cache().await;
        let mut entry = serde_json::to_value(sample()).unwrap()["a.com"].clone();
        entry["website"] = json!("evil.com");
        let envelope = json!({ "data": { "a.com": entry }, "timestamp": chrono::Utc::now().timestamp_millis() });
        db.put_value(RECORDS_KEY, &envelope.to_string()).await.unwrap();

        assert!(cache.read().await.is_none());
        assert!(db.get_value(RECORDS_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let (_, cache) = cache().await;
        cache.write(&sample()).await;
        assert!(cache.clear().await.unwrap());
        assert!(cache.read().await.is_none());
    }
}
