//! Pipeline orchestration
//!
//! Sequences the readers, the normalizer, the schema validator and the cache
//! writer. A run that hits a blocking violation or any error leaves the
//! previous cache file in place.

use std::fs;
use std::path::Path;
use std::time::Instant;

use log::{debug, info};
use serde::Serialize;

use crate::cache::{CacheMetadata, read_cache, read_metadata, write_cache};
use crate::config::{PipelineConfig, SourceFile};
use crate::error::util::{ensure_input_file, latest_modification};
use crate::error::{MortalityError, Result};
use crate::models::{NormalizationStats, ProcessedDataset};
use crate::normalize::{
    Normalizer, build_cause_lookup, build_geo_lookup, load_coordinates_catalog,
    load_coordinates_sheet,
};
use crate::reader::{RawTable, read_spreadsheet};
use crate::schema::columns::{
    SourceVocabulary, causes_vocabulary, divipola_vocabulary, records_vocabulary,
};
use crate::utils::logging::{create_spinner, finish_and_clear};
use crate::validation::{SchemaValidator, ValidationReport};

/// Whether a cache file exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CacheState {
    /// No cache has been written yet
    NoCache,
    /// A cache exists
    Cached(CacheMetadata),
}

/// Result of an `ingest` call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// An existing cache was kept as is
    Skipped {
        /// Metadata of the kept cache
        metadata: CacheMetadata,
    },
    /// A new cache was written
    Written {
        /// Metadata of the new cache
        metadata: CacheMetadata,
        /// Report of the validation run before writing
        report: ValidationReport,
        /// Normalization counters
        stats: NormalizationStats,
    },
}

impl IngestOutcome {
    /// Metadata of the cache left on disk
    #[must_use]
    pub const fn metadata(&self) -> &CacheMetadata {
        match self {
            Self::Skipped { metadata } | Self::Written { metadata, .. } => metadata,
        }
    }

    /// Validation report, when the run wrote a new cache
    #[must_use]
    pub const fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Skipped { .. } => None,
            Self::Written { report, .. } => Some(report),
        }
    }

    /// Whether the existing cache was kept
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Ingestion pipeline over one configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Report whether a cache exists, with its metadata
    pub fn cache_state(&self) -> Result<CacheState> {
        if !self.config.cache_path.is_file() {
            return Ok(CacheState::NoCache);
        }
        read_metadata(&self.config.cache_path).map(CacheState::Cached)
    }

    /// Build the cache from the raw spreadsheets
    ///
    /// Without `force`, an existing cache is kept and its metadata returned,
    /// unless stale-cache rebuilding is enabled and a raw input is newer than
    /// the cache. A blocking validation result aborts with
    /// [`MortalityError::ValidationBlocking`] before anything is written.
    pub fn ingest(&self, force: bool) -> Result<IngestOutcome> {
        if !force {
            if let CacheState::Cached(metadata) = self.cache_state()? {
                if !self.is_stale()? {
                    info!(
                        "Cache {} already exists ({} rows), skipping ingestion",
                        metadata.path.display(),
                        metadata.row_count
                    );
                    return Ok(IngestOutcome::Skipped { metadata });
                }
                info!("Raw inputs are newer than the cache, rebuilding");
            }
        }

        let start = Instant::now();
        let dataset = self.build_dataset()?;
        let batch = dataset.to_record_batch()?;

        let spinner = create_spinner(Some("Validating dataset"), self.config.show_progress);
        let report = SchemaValidator::new(self.config.thresholds).validate_batch(&batch);
        finish_and_clear(&spinner);
        let report = report?;
        report.log();

        if report.is_blocking() {
            return Err(MortalityError::ValidationBlocking {
                report: Box::new(report),
            });
        }

        let spinner = create_spinner(Some("Writing cache"), self.config.show_progress);
        let metadata = write_cache(&self.config.cache_path, &batch);
        finish_and_clear(&spinner);
        let metadata = metadata?;

        info!(
            "Ingested {} rows into {} in {:?}",
            metadata.row_count,
            metadata.path.display(),
            start.elapsed()
        );
        Ok(IngestOutcome::Written {
            metadata,
            report,
            stats: dataset.stats,
        })
    }

    /// Re-run the schema validator against the existing cache
    pub fn validate(&self) -> Result<ValidationReport> {
        let cached = read_cache(&self.config.cache_path)?;
        let report = SchemaValidator::new(self.config.thresholds).validate(&cached.batches)?;
        report.log();
        Ok(report)
    }

    fn build_dataset(&self) -> Result<ProcessedDataset> {
        let config = &self.config;
        ensure_input_file(&config.records_path(), "death records")?;
        ensure_input_file(&config.causes_path(), "cause codes")?;
        ensure_input_file(&config.divipola_path(), "DIVIPOLA codes")?;

        let causes_table = self.read_source(
            &config.causes_path(),
            &config.causes,
            &causes_vocabulary(),
            "cause codes",
        )?;
        let causes = build_cause_lookup(&causes_table)?;
        debug!("Loaded {} cause codes", causes.len());

        let divipola_table = self.read_source(
            &config.divipola_path(),
            &config.divipola,
            &divipola_vocabulary(),
            "DIVIPOLA codes",
        )?;
        let mut geo = build_geo_lookup(&divipola_table)?;
        let sheet = config
            .coordinates_sheet
            .as_deref()
            .and_then(|sheet| load_coordinates_sheet(&config.divipola_path(), sheet));
        let catalog = load_coordinates_catalog(&config.coordinates_path());
        for extra in [sheet, catalog].into_iter().flatten() {
            geo = geo.merged_with(&extra);
        }
        debug!("Loaded {} municipalities", geo.len());

        let records_table = self.read_source(
            &config.records_path(),
            &config.records,
            &records_vocabulary(),
            "death records",
        )?;

        let spinner = create_spinner(Some("Normalizing records"), config.show_progress);
        let dataset =
            Normalizer::new(&causes, &geo, &config.date_format_config).normalize(&records_table);
        finish_and_clear(&spinner);
        dataset
    }

    fn read_source(
        &self,
        path: &Path,
        source: &SourceFile,
        vocabulary: &SourceVocabulary,
        purpose: &str,
    ) -> Result<RawTable> {
        let spinner = create_spinner(
            Some(&format!("Reading {purpose}")),
            self.config.show_progress,
        );
        let table = read_spreadsheet(path, source.sheet.as_deref(), vocabulary, purpose);
        finish_and_clear(&spinner);
        table
    }

    /// Whether stale rebuilding is enabled and a raw input is newer than the cache
    fn is_stale(&self) -> Result<bool> {
        if !self.config.rebuild_stale_cache {
            return Ok(false);
        }
        let cache_time = fs::metadata(&self.config.cache_path)?.modified()?;
        let inputs = self.config.input_paths();
        Ok(latest_modification(inputs.iter().map(|p| p.as_path()))
            .is_some_and(|latest| latest > cache_time))
    }
}
