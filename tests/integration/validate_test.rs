use std::sync::Arc;

use arrow::array::{Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use mortalidad::cache::write_cache;
use mortalidad::{ReportStatus, Rule, Severity};

use crate::utils::{TestData, records_with_sexes};

#[test]
fn test_validate_without_cache() {
    let data = TestData::new();
    let err = data.pipeline().validate().unwrap_err();
    assert_eq!(err.kind(), "NoCacheError");
}

#[test]
fn test_validate_matches_ingest_report() {
    let data = TestData::with_records(&records_with_sexes(["1", "X", "2"]));
    let pipeline = data.pipeline();

    let outcome = pipeline.ingest(false).unwrap();
    let ingest_report = outcome.report().unwrap().clone();
    let report = pipeline.validate().unwrap();

    assert_eq!(report, ingest_report);
    assert_eq!(report.status, ReportStatus::Warned);
}

#[test]
fn test_validate_clean_cache_passes() {
    let data = TestData::new();
    let pipeline = data.pipeline();
    pipeline.ingest(false).unwrap();

    let report = pipeline.validate().unwrap();
    assert_eq!(report.status, ReportStatus::Passed);
    assert_eq!(report.row_count, 3);
    assert!(report.violations.is_empty());
}

#[test]
fn test_validate_reports_blocking_violations() {
    let data = TestData::new();
    let schema = Arc::new(Schema::new(vec![
        Field::new("depto_cod", DataType::Utf8, true),
        Field::new("sexo", DataType::Utf8, true),
        Field::new("mes", DataType::Int32, true),
    ]));
    let batch = RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec![Some("05"), None])),
            Arc::new(StringArray::from(vec![Some("M"), Some("F")])),
            Arc::new(Int32Array::from(vec![Some(1), Some(2)])),
        ],
    )
    .unwrap();
    write_cache(&data.cache_path(), &batch).unwrap();

    let report = data.pipeline().validate().unwrap();
    assert_eq!(report.status, ReportStatus::Failed);
    assert!(report.is_blocking());

    let not_null = report.find("depto_cod", Rule::NotNull).next().unwrap();
    assert_eq!(not_null.severity, Severity::Blocking);
    assert_eq!(not_null.count, 1);

    let missing: Vec<&str> = report
        .violations
        .iter()
        .filter(|v| v.rule == Rule::RequiredColumn)
        .map(|v| v.column.as_str())
        .collect();
    assert!(missing.contains(&"causa_cod"));
    assert!(missing.contains(&"muni_cod"));
    assert!(!missing.contains(&"sexo"));
}
