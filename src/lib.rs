//! Ingestion, normalization and schema validation of the DANE 2019 mortality
//! spreadsheets into a single Parquet cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod utils;
pub mod validation;

// Core types
pub use config::{AppEnv, PipelineConfig, SourceFile, ValidationThresholds};
pub use error::{MortalityError, Result};
pub use pipeline::{CacheState, IngestOutcome, Pipeline};

// Data model
pub use cache::{CacheMetadata, CachedDataset};
pub use models::{MortalityRecord, NormalizationStats, ProcessedDataset};
pub use validation::{ReportStatus, Rule, SchemaValidator, Severity, ValidationReport, Violation};

// Arrow types
pub use arrow::record_batch::RecordBatch;
