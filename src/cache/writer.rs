//! Atomic Parquet cache writer

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;

use crate::cache::{CacheMetadata, GENERATED_AT_KEY, MAX_ROW_GROUP_SIZE, ROW_COUNT_KEY};
use crate::error::Result;
use crate::error::util::ensure_parent_dir;
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Temporary file written next to the cache before the rename
#[must_use]
pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

/// Write `batch` to the cache at `path`, replacing any existing cache
///
/// The data goes to `<path>.tmp` first and is renamed over `path` once fully
/// written and synced, so readers see either the old cache or the new one.
/// On failure the temporary file is removed and `path` is left untouched.
pub fn write_cache(path: &Path, batch: &RecordBatch) -> Result<CacheMetadata> {
    let start = Instant::now();
    log_operation_start("Writing cache", path);
    ensure_parent_dir(path)?;

    let generated_at = Utc::now().trunc_subsecs(6);
    let tmp = temp_path(path);

    if let Err(e) = write_parquet(&tmp, batch, generated_at) {
        discard(&tmp);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, path) {
        discard(&tmp);
        return Err(e.into());
    }

    log_operation_complete("wrote to", path, batch.num_rows(), Some(start.elapsed()));
    Ok(CacheMetadata {
        path: path.to_path_buf(),
        row_count: batch.num_rows(),
        generated_at,
    })
}

fn write_parquet(tmp: &Path, batch: &RecordBatch, generated_at: DateTime<Utc>) -> Result<()> {
    let metadata = vec![
        KeyValue::new(
            GENERATED_AT_KEY.to_string(),
            generated_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        ),
        KeyValue::new(ROW_COUNT_KEY.to_string(), batch.num_rows().to_string()),
    ];
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_max_row_group_size(MAX_ROW_GROUP_SIZE)
        .set_key_value_metadata(Some(metadata))
        .build();

    let file = File::create(tmp)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    let file = writer.into_inner()?;
    file.sync_all()?;
    Ok(())
}

fn discard(tmp: &Path) {
    if tmp.exists() {
        if let Err(e) = fs::remove_file(tmp) {
            log_warning(&format!("Could not remove temporary file ({e})"), Some(tmp));
        }
    }
}
