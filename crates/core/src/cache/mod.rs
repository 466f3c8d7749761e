//! SQLite-backed key-value cache with expiring envelopes.
//!
//! Two fixed keys are used: one for the joined catalogue and one for
//! generated descriptions. Values are JSON envelopes `{ data, timestamp }`.

pub mod connection;
pub mod descriptions;
pub mod envelope;
pub mod migrations;
pub mod records;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use descriptions::{DESCRIPTIONS_KEY, DESCRIPTIONS_TTL, DescriptionCache};
pub use envelope::CacheEnvelope;
pub use records::{RECORDS_KEY, RECORDS_TTL, RecordCache};
