//! Schema validation of the processed dataset
//!
//! The validator runs on Arrow record batches so a freshly normalized dataset
//! and a cache read back from disk are checked by the same code and produce
//! the same report.

pub mod report;
pub mod validator;

pub use report::{QualityCounters, ReportStatus, Rule, Severity, ValidationReport, Violation};
pub use validator::{SchemaValidator, quality_counters};
