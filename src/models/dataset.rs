//! The processed dataset and its normalization statistics

use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::record::MortalityRecord;
use crate::schema::mortality::mortality_schema;

/// Data-quality counters collected while normalizing the records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationStats {
    /// Data rows read from the records table
    pub input_rows: usize,
    /// Fetal deaths excluded from the dataset
    pub fetal_excluded: usize,
    /// Rows in the processed dataset
    pub output_rows: usize,
    /// Rows whose cause code is not in the cause table
    pub unmatched_causes: usize,
    /// Rows whose municipality is not in the geographic table
    pub unmatched_geo: usize,
    /// Rows with a missing or unparseable date
    pub invalid_dates: usize,
    /// Rows with a sex value outside the known synonyms
    pub unrecognized_sex: usize,
    /// Rows with a non-numeric or out-of-range age group
    pub unrecognized_age_groups: usize,
}

impl NormalizationStats {
    /// Log the counters at info level, and a warning when anything was flagged
    pub fn log_summary(&self) {
        log::info!(
            "Normalized {} of {} rows ({} fetal excluded)",
            self.output_rows,
            self.input_rows,
            self.fetal_excluded
        );
        let flagged = self.unmatched_causes
            + self.unmatched_geo
            + self.invalid_dates
            + self.unrecognized_sex
            + self.unrecognized_age_groups;
        if flagged > 0 {
            log::warn!(
                "Flagged values: {} unmatched causes, {} unmatched municipalities, {} invalid dates, {} unrecognized sex values, {} unrecognized age groups",
                self.unmatched_causes,
                self.unmatched_geo,
                self.invalid_dates,
                self.unrecognized_sex,
                self.unrecognized_age_groups
            );
        }
    }
}

/// Denormalized death records ready for validation and caching
#[derive(Debug, Clone, Default)]
pub struct ProcessedDataset {
    /// One row per non-fetal death, in source order
    pub records: Vec<MortalityRecord>,
    /// Counters collected while building `records`
    pub stats: NormalizationStats,
}

impl ProcessedDataset {
    /// Number of rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Convert the rows to a record batch with the cache schema
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        records_to_batch(&self.records)
    }
}

/// Convert rows to a record batch with the cache schema
pub fn records_to_batch(records: &[MortalityRecord]) -> Result<RecordBatch> {
    let schema = mortality_schema();
    let fields = schema.fields().to_vec();
    let batch = serde_arrow::to_record_batch(&fields, &records)?;
    Ok(batch)
}

/// Convert a record batch with the cache schema back to rows
pub fn batch_to_records(batch: &RecordBatch) -> Result<Vec<MortalityRecord>> {
    let records = serde_arrow::from_record_batch(batch)?;
    Ok(records)
}
