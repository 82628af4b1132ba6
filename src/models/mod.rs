//! Domain models for the mortality dataset
//!
//! Reference lookups (causes, municipalities), the processed row type and
//! the dataset produced by the normalizer.

pub mod dataset;
pub mod lookup;
pub mod record;

// Re-export commonly used types
pub use dataset::{NormalizationStats, ProcessedDataset, batch_to_records, records_to_batch};
pub use lookup::{CauseEntry, CauseLookup, GeoEntry, GeoKey, GeoLookup};
pub use record::MortalityRecord;
