//! Client code for terravue.
//!
//! This crate provides the HTTP side of the catalogue pipeline: fetching the
//! two source documents, cache-first loading of the joined catalogue, and the
//! optional description API client.

pub mod describer;
pub mod fetch;
pub mod loader;

#[cfg(test)]
mod test_support;

pub use describer::{DescribeError, DescriberConfig, HttpDescriber};
pub use fetch::{DataSource, SourceClient, SourceConfig, SourceDocuments};
pub use loader::DataLoader;
