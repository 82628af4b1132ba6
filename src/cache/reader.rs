//! Parquet cache reader

use std::fs::File;
use std::path::Path;
use std::time::Instant;

use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::metadata::FileMetaData;

use crate::cache::{CacheMetadata, DEFAULT_BATCH_SIZE, GENERATED_AT_KEY, ROW_COUNT_KEY};
use crate::error::{MortalityError, Result};
use crate::models::{MortalityRecord, batch_to_records};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// A cache file read back into memory
#[derive(Debug, Clone)]
pub struct CachedDataset {
    /// Record batches in file order
    pub batches: Vec<RecordBatch>,
    /// Metadata of the file
    pub metadata: CacheMetadata,
}

impl CachedDataset {
    /// Total rows over all batches
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Deserialize the batches into rows
    pub fn records(&self) -> Result<Vec<MortalityRecord>> {
        let mut records = Vec::with_capacity(self.num_rows());
        for batch in &self.batches {
            records.extend(batch_to_records(batch)?);
        }
        Ok(records)
    }
}

/// Read the whole cache file
pub fn read_cache(path: &Path) -> Result<CachedDataset> {
    let start = Instant::now();
    let builder = open(path)?;
    log_operation_start("Reading cache", path);

    let metadata = cache_metadata(path, builder.metadata().file_metadata())?;
    let reader = builder.with_batch_size(DEFAULT_BATCH_SIZE).build()?;
    let batches = reader
        .collect::<std::result::Result<Vec<_>, ArrowError>>()
        .map_err(|e| unreadable_cache(path, &e))?;

    let dataset = CachedDataset { batches, metadata };
    log_operation_complete("read from", path, dataset.num_rows(), Some(start.elapsed()));
    Ok(dataset)
}

/// Read only the metadata of the cache file
pub fn read_metadata(path: &Path) -> Result<CacheMetadata> {
    let builder = open(path)?;
    cache_metadata(path, builder.metadata().file_metadata())
}

fn open(path: &Path) -> Result<ParquetRecordBatchReaderBuilder<File>> {
    if !path.is_file() {
        return Err(MortalityError::NoCache {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path)?;
    ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| unreadable_cache(path, &e))
}

fn unreadable_cache(path: &Path, error: &impl std::fmt::Display) -> MortalityError {
    MortalityError::UnreadableCache {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

/// Build the cache metadata, falling back to the file's own facts
///
/// A Parquet file written by another tool has no `mortalidad.*` keys: the row
/// count then comes from the footer and the timestamp from the modification
/// time.
fn cache_metadata(path: &Path, file_metadata: &FileMetaData) -> Result<CacheMetadata> {
    let value = |key: &str| {
        file_metadata
            .key_value_metadata()
            .and_then(|kv| kv.iter().find(|entry| entry.key == key))
            .and_then(|entry| entry.value.clone())
    };

    let row_count = value(ROW_COUNT_KEY)
        .and_then(|v| v.parse::<usize>().ok())
        .or_else(|| usize::try_from(file_metadata.num_rows()).ok())
        .unwrap_or_default();

    let generated_at = match value(GENERATED_AT_KEY)
        .and_then(|v| DateTime::parse_from_rfc3339(&v).ok())
    {
        Some(timestamp) => timestamp.with_timezone(&Utc),
        None => DateTime::<Utc>::from(std::fs::metadata(path)?.modified()?),
    };

    Ok(CacheMetadata {
        path: path.to_path_buf(),
        row_count,
        generated_at,
    })
}
