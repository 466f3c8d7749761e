//! Shared state behind every tool call.

use std::sync::Arc;

use terravue_client::{DataLoader, DataSource, HttpDescriber, SourceClient, SourceConfig};
use terravue_core::{AppConfig, CacheDb, DescriptionCache, Describer, Enricher, Error, NoDescriber, RecordCache};

/// Catalogue loader, description enrichment and the caches they share.
pub struct AppState {
    pub loader: DataLoader,
    pub enricher: Enricher,
    pub records: RecordCache,
    pub descriptions: DescriptionCache,
    /// Whether a real describer is configured.
    pub enrichment_enabled: bool,
}

impl AppState {
    /// Wire up the HTTP source and describer described by `config`.
    pub fn from_config(db: CacheDb, config: &AppConfig) -> Result<Self, Error> {
        let source = SourceClient::new(SourceConfig::from(config))?;

        let describer: Option<Arc<dyn Describer>> = match HttpDescriber::from_app_config(config)? {
            Some(describer) => Some(Arc::new(describer)),
            None => {
                tracing::info!("no description API configured, enrichment disabled");
                None
            }
        };

        Ok(Self::new(db, config, Arc::new(source), describer))
    }

    pub fn new(
        db: CacheDb, config: &AppConfig, source: Arc<dyn DataSource>, describer: Option<Arc<dyn Describer>>,
    ) -> Self {
        let records = RecordCache::new(db.clone(), config.records_ttl());
        let descriptions = DescriptionCache::new(db, config.descriptions_ttl());
        let enrichment_enabled = describer.is_some();
        let describer = describer.unwrap_or_else(|| Arc::new(NoDescriber));

        Self {
            loader: DataLoader::new(source, records.clone()),
            enricher: Enricher::new(describer, descriptions.clone()),
            records,
            descriptions,
            enrichment_enabled,
        }
    }
}
