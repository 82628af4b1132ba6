//! Schema validation of the processed dataset

use arrow::array::{Array, ArrayRef};
use arrow::compute::concat_batches;
use arrow::datatypes::{Field, SchemaRef};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;

use crate::config::ValidationThresholds;
use crate::error::Result;
use crate::schema::adapt::{TypeCompatibility, check_type_compatibility};
use crate::schema::mortality::{
    self, ALLOWED_SEXES, ANIO, CAUSA, CAUSA_COD, DEPTO, DEPTO_COD, FECHA, GRUPO_EDAD,
    HOMICIDIO_X95, MES, MUNI_COD, MUNICIPIO, SEXO, is_known_age_group,
};
use crate::utils::arrow::{int_values, rows_with_any_null, string_values};
use crate::validation::report::{QualityCounters, Rule, Severity, ValidationReport, Violation};

/// Number of distinct offending values listed in a domain violation
pub const MAX_OBSERVED_VALUES: usize = 5;

/// Checks record batches against the cache schema
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: SchemaRef,
    thresholds: ValidationThresholds,
}

impl SchemaValidator {
    /// Validator for the mortality cache schema
    #[must_use]
    pub fn new(thresholds: ValidationThresholds) -> Self {
        Self::with_schema(mortality::mortality_schema(), thresholds)
    }

    /// Validator for an arbitrary expected schema
    #[must_use]
    pub const fn with_schema(schema: SchemaRef, thresholds: ValidationThresholds) -> Self {
        Self { schema, thresholds }
    }

    /// Validate a dataset split over any number of batches
    pub fn validate(&self, batches: &[RecordBatch]) -> Result<ValidationReport> {
        match batches {
            [] => self.validate_batch(&RecordBatch::new_empty(self.schema.clone())),
            [batch] => self.validate_batch(batch),
            [first, ..] => {
                let combined = concat_batches(&first.schema(), batches)?;
                self.validate_batch(&combined)
            }
        }
    }

    /// Validate a single batch
    pub fn validate_batch(&self, batch: &RecordBatch) -> Result<ValidationReport> {
        let rows = batch.num_rows();
        let mut violations: Vec<(usize, Violation)> = Vec::new();

        for (position, expected) in self.schema.fields().iter().enumerate() {
            let mut push = |rule, severity, observed: String, count| {
                violations.push((
                    position,
                    Violation {
                        column: expected.name().clone(),
                        rule,
                        severity,
                        observed,
                        count,
                    },
                ));
            };

            let Some(array) = batch.column_by_name(expected.name()) else {
                push(Rule::RequiredColumn, Severity::Blocking, "missing".to_string(), rows);
                continue;
            };

            match check_type_compatibility(array.data_type(), expected.data_type()) {
                TypeCompatibility::Exact => {}
                TypeCompatibility::Compatible => push(
                    Rule::ColumnType,
                    Severity::Warning,
                    format!("{} (expected {})", array.data_type(), expected.data_type()),
                    rows,
                ),
                TypeCompatibility::Incompatible => {
                    push(
                        Rule::ColumnType,
                        Severity::Blocking,
                        format!("{} (expected {})", array.data_type(), expected.data_type()),
                        rows,
                    );
                    continue;
                }
            }

            let nulls = array.null_count();
            if !expected.is_nullable() && nulls > 0 {
                push(Rule::NotNull, Severity::Blocking, format!("{nulls} nulls"), nulls);
            } else if expected.is_nullable() && exceeds(nulls, rows, self.thresholds.max_null_fraction) {
                push(
                    Rule::NullFraction,
                    Severity::Warning,
                    format!(
                        "{} null (max {})",
                        percent(nulls, rows),
                        percent_of(self.thresholds.max_null_fraction)
                    ),
                    nulls,
                );
            }

            if let Some((count, observed)) = self.domain_violation(expected, array)? {
                push(Rule::Domain, Severity::Warning, observed, count);
            }
        }

        let quality = quality_counters(batch);
        self.referential_violations(batch, &quality, &mut violations);

        violations.sort_by_key(|(position, violation)| (*position, violation.rule));
        let violations = violations.into_iter().map(|(_, v)| v).collect();
        Ok(ValidationReport::new(rows, violations, quality))
    }

    fn domain_violation(&self, field: &Field, array: &ArrayRef) -> Result<Option<(usize, String)>> {
        let name = field.name().as_str();
        let result = match name {
            SEXO => string_domain(array, name, |v| ALLOWED_SEXES.contains(&v))?,
            DEPTO_COD => string_domain(array, name, |v| v.chars().count() == 2)?,
            MUNI_COD => string_domain(array, name, |v| v.chars().count() == 5)?,
            CAUSA_COD => string_domain(array, name, |v| (3..=5).contains(&v.chars().count()))?,
            GRUPO_EDAD => int_domain(array, name, |v| {
                i32::try_from(v).is_ok_and(is_known_age_group)
            })?,
            MES => int_domain(array, name, |v| (1..=12).contains(&v))?,
            HOMICIDIO_X95 => int_domain(array, name, |v| v == 0 || v == 1)?,
            ANIO => match self.thresholds.expected_year {
                Some(year) => int_domain(array, name, |v| v == i64::from(year))?,
                None => None,
            },
            _ => None,
        };
        Ok(result)
    }

    fn referential_violations(
        &self,
        batch: &RecordBatch,
        quality: &QualityCounters,
        violations: &mut Vec<(usize, Violation)>,
    ) {
        let rows = batch.num_rows();
        let max = self.thresholds.max_unmatched_fraction;
        let checks = [
            (MUNI_COD, quality.unmatched_geo, "unmatched municipalities"),
            (CAUSA_COD, quality.unmatched_causes, "unmatched cause codes"),
        ];

        for (column, unmatched, what) in checks {
            let Ok(position) = self.schema.index_of(column) else {
                continue;
            };
            if exceeds(unmatched, rows, max) {
                violations.push((
                    position,
                    Violation {
                        column: column.to_string(),
                        rule: Rule::ReferentialCompleteness,
                        severity: Severity::Warning,
                        observed: format!("{} {what} (max {})", percent(unmatched, rows), percent_of(max)),
                        count: unmatched,
                    },
                ));
            }
        }
    }
}

/// Quality counters derived from the enriched columns of a batch
#[must_use]
pub fn quality_counters(batch: &RecordBatch) -> QualityCounters {
    let nulls = |name: &str| batch.column_by_name(name).map_or(0, |a| a.null_count());
    let unmatched_geo = match (batch.column_by_name(DEPTO), batch.column_by_name(MUNICIPIO)) {
        (Some(depto), Some(municipio)) => rows_with_any_null(&[depto, municipio]),
        (Some(only), None) | (None, Some(only)) => only.null_count(),
        (None, None) => 0,
    };
    QualityCounters {
        unmatched_causes: nulls(CAUSA),
        unmatched_geo,
        invalid_dates: nulls(FECHA),
    }
}

#[allow(clippy::cast_precision_loss)]
fn exceeds(count: usize, rows: usize, max_fraction: f64) -> bool {
    rows > 0 && count as f64 / rows as f64 > max_fraction
}

#[allow(clippy::cast_precision_loss)]
fn percent(count: usize, rows: usize) -> String {
    if rows == 0 {
        return "0.00%".to_string();
    }
    format!("{:.2}%", count as f64 * 100.0 / rows as f64)
}

fn percent_of(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}

fn string_domain<F>(array: &ArrayRef, column: &str, allowed: F) -> Result<Option<(usize, String)>>
where
    F: Fn(&str) -> bool,
{
    let offending: Vec<String> = string_values(array, column)?
        .into_iter()
        .filter(|v| !allowed(v.as_str()))
        .collect();
    if offending.is_empty() {
        return Ok(None);
    }
    let observed = offending
        .iter()
        .map(|v| if v.is_empty() { "(empty)" } else { v.as_str() })
        .sorted()
        .dedup()
        .take(MAX_OBSERVED_VALUES)
        .join(", ");
    Ok(Some((offending.len(), observed)))
}

fn int_domain<F>(array: &ArrayRef, column: &str, allowed: F) -> Result<Option<(usize, String)>>
where
    F: Fn(i64) -> bool,
{
    let offending: Vec<i64> = int_values(array, column)?
        .into_iter()
        .filter(|v| !allowed(*v))
        .collect();
    if offending.is_empty() {
        return Ok(None);
    }
    let observed = offending
        .iter()
        .sorted()
        .dedup()
        .take(MAX_OBSERVED_VALUES)
        .join(", ");
    Ok(Some((offending.len(), observed)))
}
