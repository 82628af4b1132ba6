//! Parquet cache of the processed dataset
//!
//! The cache is a single Parquet file replaced atomically on every write.
//! Its key-value metadata records when it was generated and how many rows it
//! holds, so the orchestrator can report on an existing cache without
//! reading its data.

pub mod reader;
pub mod writer;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use reader::{CachedDataset, read_cache, read_metadata};
pub use writer::write_cache;

/// Key-value metadata key holding the RFC 3339 generation timestamp
pub const GENERATED_AT_KEY: &str = "mortalidad.generated_at";
/// Key-value metadata key holding the row count
pub const ROW_COUNT_KEY: &str = "mortalidad.row_count";
/// Maximum rows per Parquet row group
pub const MAX_ROW_GROUP_SIZE: usize = 65_536;
/// Rows per record batch when reading the cache
pub const DEFAULT_BATCH_SIZE: usize = 16_384;

/// Facts about a cache file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Location of the cache file
    pub path: PathBuf,
    /// Rows in the cache
    pub row_count: usize,
    /// When the cache was generated
    pub generated_at: DateTime<Utc>,
}
