//! Validation report types

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a violation is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Reported, ingestion proceeds
    Warning,
    /// Aborts ingestion, the previous cache is kept
    Blocking,
}

/// The check that produced a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// A schema column is absent
    RequiredColumn,
    /// A column has a different Arrow type than declared
    ColumnType,
    /// A non-nullable column contains nulls
    NotNull,
    /// A nullable column has too many nulls
    NullFraction,
    /// Too many rows did not match a lookup
    ReferentialCompleteness,
    /// Values outside the declared domain
    Domain,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RequiredColumn => "required_column",
            Self::ColumnType => "column_type",
            Self::NotNull => "not_null",
            Self::NullFraction => "null_fraction",
            Self::ReferentialCompleteness => "referential_completeness",
            Self::Domain => "domain",
        };
        f.write_str(name)
    }
}

/// One failed check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Column the check ran on
    pub column: String,
    /// Check that failed
    pub rule: Rule,
    /// Severity of the failure
    pub severity: Severity,
    /// Observed value(s) or a short description of what was found
    pub observed: String,
    /// Number of offending rows
    pub count: usize,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Blocking => "blocking",
        };
        write!(
            f,
            "[{severity}] {}.{}: {} ({} rows)",
            self.column, self.rule, self.observed, self.count
        )
    }
}

/// Overall outcome of a validation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// No violations
    Passed,
    /// Warnings only
    Warned,
    /// At least one blocking violation
    Failed,
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("passed"),
            Self::Warned => f.write_str("warned"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Data-quality counters computed from the dataset itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCounters {
    /// Rows whose cause description is null
    pub unmatched_causes: usize,
    /// Rows whose department or municipality name is null
    pub unmatched_geo: usize,
    /// Rows whose date is null
    pub invalid_dates: usize,
}

/// Result of validating a dataset against the cache schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Passed, warned or failed
    pub status: ReportStatus,
    /// Rows checked
    pub row_count: usize,
    /// Violations in schema column order, then rule order
    pub violations: Vec<Violation>,
    /// Data-quality counters
    pub quality: QualityCounters,
}

impl ValidationReport {
    /// Build a report, deriving the status from the violations
    #[must_use]
    pub fn new(row_count: usize, violations: Vec<Violation>, quality: QualityCounters) -> Self {
        let status = if violations.iter().any(|v| v.severity == Severity::Blocking) {
            ReportStatus::Failed
        } else if violations.is_empty() {
            ReportStatus::Passed
        } else {
            ReportStatus::Warned
        };
        Self {
            status,
            row_count,
            violations,
            quality,
        }
    }

    /// Number of blocking violations
    #[must_use]
    pub fn blocking_count(&self) -> usize {
        self.blocking().count()
    }

    /// Number of warnings
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    /// Whether ingestion must abort
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        self.status == ReportStatus::Failed
    }

    /// Blocking violations
    pub fn blocking(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Blocking)
    }

    /// Warnings
    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Warning)
    }

    /// Violations of a given column and rule
    pub fn find<'a>(&'a self, column: &'a str, rule: Rule) -> impl Iterator<Item = &'a Violation> {
        self.violations
            .iter()
            .filter(move |v| v.column == column && v.rule == rule)
    }

    /// Log every violation at the level matching its severity
    pub fn log(&self) {
        for violation in &self.violations {
            match violation.severity {
                Severity::Blocking => log::error!("{violation}"),
                Severity::Warning => log::warn!("{violation}"),
            }
        }
        log::info!(
            "Validation {}: {} rows, {} blocking, {} warnings",
            self.status,
            self.row_count,
            self.blocking_count(),
            self.warning_count()
        );
    }
}
