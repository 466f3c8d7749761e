//! Core types and shared functionality for terravue.
//!
//! This crate provides:
//! - The catalogue model and the links/categories join
//! - Search, filter and sort over the joined catalogue
//! - Expiring cache with SQLite backend
//! - Optional description enrichment
//! - Unified error types and configuration

pub mod cache;
pub mod config;
pub mod describe;
pub mod error;
pub mod join;
pub mod model;
pub mod query;

pub use cache::{CacheDb, DescriptionCache, RecordCache};
pub use config::{AppConfig, ConfigError};
pub use describe::{DescriptionPrompt, Describer, Enricher, NoDescriber};
pub use error::Error;
pub use join::{CategoriesDocument, ImpactStats, LinksDocument, join, join_with_stats};
pub use model::{AnnualEstimate, CategoryMetadata, Impact, ImpactFilter, RecordSet, WebsiteEntry};
pub use query::{QueryEngine, ScoredList, ScoredRecord, SearchOutcome, SortOrder};
