//! Error handling for the mortality ingestion pipeline.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

use crate::validation::ValidationReport;

/// Errors raised while ingesting, validating or caching the mortality dataset
#[derive(Debug, thiserror::Error)]
pub enum MortalityError {
    /// A required input spreadsheet does not exist
    #[error("Missing input file for {purpose}: {}", path.display())]
    MissingInput { path: PathBuf, purpose: String },

    /// The input exists but could not be parsed as a spreadsheet
    #[error("Unreadable input {}: {reason}", path.display())]
    UnreadableInput { path: PathBuf, reason: String },

    /// An expected source column was not found after header normalization
    #[error("Unknown column: '{column}' not found in {table} table")]
    UnknownColumn { table: String, column: String },

    /// The dataset has at least one blocking schema violation
    #[error("Validation failed with {} blocking violation(s)", report.blocking_count())]
    ValidationBlocking { report: Box<ValidationReport> },

    /// `validate` was requested but no cache file exists
    #[error("No cache file found at {}; run ingest first", path.display())]
    NoCache { path: PathBuf },

    /// A file exists at the cache path but is not a readable Parquet file
    #[error("Unreadable cache {}: {reason}; rebuild it with `ingest --force`", path.display())]
    UnreadableCache { path: PathBuf, reason: String },

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Error reading or writing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error converting rows to or from record batches
    #[error("Record batch conversion error: {0}")]
    SerdeArrow(#[from] serde_arrow::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MortalityError {
    /// Stable name of the error kind, printed by the command line
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingInput { .. } => "MissingInputError",
            Self::UnreadableInput { .. } => "UnreadableInputError",
            Self::UnknownColumn { .. } => "UnknownColumnError",
            Self::ValidationBlocking { .. } => "ValidationBlockingError",
            Self::NoCache { .. } => "NoCacheError",
            Self::UnreadableCache { .. } => "UnreadableCacheError",
            Self::Config(_) => "ConfigError",
            Self::Io(_) => "IoError",
            Self::Parquet(_) => "ParquetError",
            Self::Arrow(_) => "ArrowError",
            Self::SerdeArrow(_) => "ConversionError",
            Self::Json(_) => "JsonError",
        }
    }

    /// The validation report attached to this error, if any
    #[must_use]
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::ValidationBlocking { report } => Some(report.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnreadableInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, MortalityError>;
