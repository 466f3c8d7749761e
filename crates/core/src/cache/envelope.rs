//! Timestamped cache envelopes stored under fixed keys.

use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::connection::CacheDb;

/// A cached value plus the instant it was written (epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEnvelope<T> {
    pub data: T,
    pub timestamp: i64,
}

impl<T> CacheEnvelope<T> {
    /// Wrap `data` stamped with the current time.
    pub fn new(data: T) -> Self {
        Self { data, timestamp: now_millis() }
    }

    /// Valid while `now - timestamp` is strictly less than `ttl`.
    ///
    /// A timestamp in the future is never valid.
    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let age = now_ms.saturating_sub(self.timestamp);
        (0..ttl_ms).contains(&age)
    }
}

pub(crate) fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One key in the store with expiry semantics.
///
/// Reads never fail: expired or unparseable envelopes are deleted and
/// reported as absent. Write failures are logged and swallowed.
#[derive(Debug, Clone)]
pub(crate) struct TtlSlot {
    db: CacheDb,
    key: &'static str,
    ttl: Duration,
}

impl TtlSlot {
    pub(crate) fn new(db: CacheDb, key: &'static str, ttl: Duration) -> Self {
        Self { db, key, ttl }
    }

    /// Load the envelope if present, parseable and unexpired.
    pub(crate) async fn load<T: DeserializeOwned>(&self) -> Option<CacheEnvelope<T>> {
        let raw = match self.db.get_value(self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "failed to read cache entry");
                return None;
            }
        };

        match serde_json::from_str::<CacheEnvelope<T>>(&raw) {
            Ok(envelope) if envelope.is_fresh(now_millis(), self.ttl) => Some(envelope),
            Ok(_) => {
                self.purge("expired").await;
                None
            }
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "cache entry is corrupt");
                self.purge("corrupt").await;
                None
            }
        }
    }

    pub(crate) async fn store<T: Serialize>(&self, envelope: &CacheEnvelope<T>) {
        let json = match serde_json::to_string(envelope) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "failed to serialize cache entry");
                return;
            }
        };

        if let Err(e) = self.db.put_value(self.key, &json).await {
            tracing::warn!(key = self.key, error = %e, "failed to write cache entry");
        }
    }

    /// Delete the entry, logging why.
    pub(crate) async fn purge(&self, reason: &str) {
        tracing::debug!(key = self.key, reason, "removing cache entry");
        if let Err(e) = self.db.delete_value(self.key).await {
            tracing::warn!(key = self.key, error = %e, "failed to remove cache entry");
        }
    }

    pub(crate) async fn clear(&self) -> Result<bool, crate::Error> {
        self.db.delete_value(self.key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE_MS: i64 = 60 * 1000;

    #[test]
    fn test_envelope_freshness() {
        let ttl = Duration::from_secs(30 * 60);
        let now = now_millis();

        let fresh = CacheEnvelope { data: (), timestamp: now - 29 * MINUTE_MS };
        assert!(fresh.is_fresh(now, ttl));

        let stale = CacheEnvelope { data: (), timestamp: now - 31 * MINUTE_MS };
        assert!(!stale.is_fresh(now, ttl));

        let boundary = CacheEnvelope { data: (), timestamp: now - 30 * MINUTE_MS };
        assert!(!boundary.is_fresh(now, ttl));

        let just_written = CacheEnvelope { data: (), timestamp: now };
        assert!(just_written.is_fresh(now, ttl));
    }

    #[test]
    fn test_future_timestamp_is_stale() {
        let now = now_millis();
        let ahead = CacheEnvelope { data: (), timestamp: now + 365 * 24 * 60 * MINUTE_MS };
        assert!(!ahead.is_fresh(now, Duration::from_secs(7 * 24 * 60 * 60)));
    }

    #[tokio::test]
    async fn test_slot_purges_future_entry() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let envelope = CacheEnvelope { data: 1u8, timestamp: now_millis() + 60 * MINUTE_MS };
        db.put_value("slot", &serde_json::to_string(&envelope).unwrap()).await.unwrap();

        let slot = TtlSlot::new(db.clone(), "slot", Duration::from_secs(60));
        assert!(slot.load::<u8>().await.is_none());
        assert!(db.get_value("slot").await.unwrap().is_none());
    }

    #[test]
    fn test_envelope_json_shape() {
        let envelope = CacheEnvelope { data: vec![1, 2], timestamp: 42 };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [1, 2], "timestamp": 42 }));
    }

    #[tokio::test]
    async fn test_slot_purges_corrupt_entry() {
        let db = CacheDb::open_in_memory().await.unwrap();
        db.put_value("slot", "{not json").await.unwrap();

        let slot = TtlSlot::new(db.clone(), "slot", Duration::from_secs(60));
        assert!(slot.load::<Vec<u8>>().await.is_none());
        assert!(db.get_value("slot").await.unwrap().is_none());
    }
}
