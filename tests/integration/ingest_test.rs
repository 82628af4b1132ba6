use std::fs;
use std::time::{Duration, SystemTime};

use chrono::NaiveDate;
use mortalidad::cache::read_cache;
use mortalidad::{CacheState, IngestOutcome, ReportStatus, Rule, Severity};

use crate::utils::{RECORDS_HEADER, TestData, record_row, records_with_sexes, row, write_sheet};

#[test]
fn test_ingest_writes_normalized_cache() {
    let data = TestData::new();
    let pipeline = data.pipeline();
    assert_eq!(pipeline.cache_state().unwrap(), CacheState::NoCache);

    let outcome = pipeline.ingest(false).unwrap();
    let IngestOutcome::Written {
        metadata,
        report,
        stats,
    } = outcome
    else {
        panic!("expected a written cache");
    };

    assert_eq!(metadata.row_count, 3);
    assert_eq!(metadata.path, data.cache_path());
    assert_eq!(report.status, ReportStatus::Passed, "{:?}", report.violations);
    assert_eq!(stats.input_rows, 3);
    assert_eq!(stats.output_rows, 3);
    assert_eq!(stats.unmatched_causes, 0);
    assert_eq!(stats.unmatched_geo, 0);

    let records = read_cache(&data.cache_path()).unwrap().records().unwrap();
    assert_eq!(records.len(), 3);

    let first = &records[0];
    assert_eq!(first.depto_cod, "05");
    assert_eq!(first.muni_cod, "05001");
    assert_eq!(first.depto.as_deref(), Some("Antioquia"));
    assert_eq!(first.municipio.as_deref(), Some("Medellín"));
    assert_eq!(first.sexo, "M");
    assert_eq!(first.grupo_edad, Some(12));
    assert_eq!(first.fecha, NaiveDate::from_ymd_opt(2019, 3, 15));
    assert_eq!(first.anio, Some(2019));
    assert_eq!(first.mes, Some(3));
    assert_eq!(
        first.causa.as_deref(),
        Some("Infarto agudo del miocardio, sin otra especificación")
    );
    assert_eq!(first.causa_grupo.as_deref(), Some("Infarto agudo del miocardio"));
    assert_eq!(first.homicidio_x95, 0);
    assert_eq!(first.lat, Some(6.2518));
    assert_eq!(first.lon, Some(-75.5636));

    let second = &records[1];
    assert_eq!(second.muni_cod, "11001");
    assert_eq!(second.sexo, "F");
    assert_eq!(second.fecha, NaiveDate::from_ymd_opt(2019, 6, 15));
    assert_eq!(second.homicidio_x95, 1);

    let third = &records[2];
    assert_eq!(third.sexo, "NR");
    assert_eq!(
        third.causa.as_deref(),
        Some("Neumonía, organismo no especificado")
    );

    assert!(matches!(pipeline.cache_state().unwrap(), CacheState::Cached(m) if m.row_count == 3));
}

#[test]
fn test_second_ingest_is_skipped() {
    let data = TestData::new();
    let pipeline = data.pipeline();

    let written = pipeline.ingest(false).unwrap();
    let bytes = fs::read(data.cache_path()).unwrap();

    let skipped = pipeline.ingest(false).unwrap();
    assert!(skipped.is_skipped());
    assert!(skipped.report().is_none());
    assert_eq!(skipped.metadata(), written.metadata());
    assert_eq!(fs::read(data.cache_path()).unwrap(), bytes);
}

#[test]
fn test_force_rebuilds_existing_cache() {
    let data = TestData::new();
    let pipeline = data.pipeline();
    pipeline.ingest(false).unwrap();

    let mut records = records_with_sexes(["1", "2", "1"]);
    records.push(record_row("11", "001", "2", "10", "2019-08-20", "I219", "2"));
    data.write_records(RECORDS_HEADER.as_slice(), &records);

    assert!(pipeline.ingest(false).unwrap().is_skipped());

    let outcome = pipeline.ingest(true).unwrap();
    assert!(!outcome.is_skipped());
    assert_eq!(outcome.metadata().row_count, 4);
    assert_eq!(read_cache(&data.cache_path()).unwrap().num_rows(), 4);
}

#[test]
fn test_stale_cache_rebuilt_when_enabled() {
    let mut data = TestData::new();
    data.config.rebuild_stale_cache = true;
    let pipeline = data.pipeline();
    pipeline.ingest(false).unwrap();
    assert!(pipeline.ingest(false).unwrap().is_skipped());

    let records = fs::File::options()
        .write(true)
        .open(data.config.records_path())
        .unwrap();
    records
        .set_modified(SystemTime::now() + Duration::from_secs(3600))
        .unwrap();

    assert!(!pipeline.ingest(false).unwrap().is_skipped());
}

#[test]
fn test_unknown_sex_is_warned_and_kept() {
    let data = TestData::with_records(&records_with_sexes(["M", "F", "X"]));

    let outcome = data.pipeline().ingest(false).unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.status, ReportStatus::Warned);
    assert!(!report.is_blocking());

    let sexo = report.find("sexo", Rule::Domain).next().unwrap();
    assert_eq!(sexo.severity, Severity::Warning);
    assert_eq!(sexo.observed, "X");
    assert_eq!(sexo.count, 1);

    let records = read_cache(&data.cache_path()).unwrap().records().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].sexo, "X");
}

#[test]
fn test_missing_cause_column_fails_without_cache() {
    let data = TestData::new();
    let header = &RECORDS_HEADER[..5];
    let records: Vec<Vec<String>> = records_with_sexes(["1", "2", "3"])
        .into_iter()
        .map(|r| r[..5].to_vec())
        .collect();
    data.write_records(header, &records);

    let err = data.pipeline().ingest(false).unwrap_err();
    assert_eq!(err.kind(), "UnknownColumnError");
    assert!(err.to_string().contains("causa_cod"));
    assert!(!data.cache_path().exists());
}

#[test]
fn test_failed_ingest_keeps_previous_cache() {
    let data = TestData::new();
    let pipeline = data.pipeline();
    pipeline.ingest(false).unwrap();
    let bytes = fs::read(data.cache_path()).unwrap();

    write_sheet(
        &data.config.records_path(),
        None,
        &["SEXO", "GRUPO_EDAD1"],
        &[row(&["1", "5"])],
    );

    let err = pipeline.ingest(true).unwrap_err();
    assert_eq!(err.kind(), "UnknownColumnError");
    assert_eq!(fs::read(data.cache_path()).unwrap(), bytes);
}

#[test]
fn test_missing_input_file() {
    let data = TestData::new();
    fs::remove_file(data.config.divipola_path()).unwrap();

    let err = data.pipeline().ingest(false).unwrap_err();
    assert_eq!(err.kind(), "MissingInputError");
    assert!(err.to_string().contains("DIVIPOLA"));
    assert!(!data.cache_path().exists());
}

#[test]
fn test_unreadable_input_file() {
    let data = TestData::new();
    fs::write(data.config.causes_path(), b"definitely not a workbook").unwrap();

    let err = data.pipeline().ingest(false).unwrap_err();
    assert_eq!(err.kind(), "UnreadableInputError");
}

#[test]
fn test_fetal_deaths_excluded() {
    let mut records = records_with_sexes(["1", "2", "3"]);
    records.push(record_row("05", "001", "1", "1", "2019-02-02", "P95X", "1"));
    let data = TestData::with_records(&records);

    let IngestOutcome::Written { stats, metadata, .. } = data.pipeline().ingest(false).unwrap()
    else {
        panic!("expected a written cache");
    };
    assert_eq!(stats.input_rows, 4);
    assert_eq!(stats.fetal_excluded, 1);
    assert_eq!(metadata.row_count, 3);
}

#[test]
fn test_unmatched_codes_are_kept_and_warned() {
    let mut records = records_with_sexes(["1", "2", "3"]);
    records.push(record_row("99", "999", "1", "8", "2019-04-04", "Z999", "2"));
    let data = TestData::with_records(&records);

    let outcome = data.pipeline().ingest(false).unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.quality.unmatched_causes, 1);
    assert_eq!(report.quality.unmatched_geo, 1);
    assert!(report.find("muni_cod", Rule::ReferentialCompleteness).next().is_some());
    assert!(report.find("causa_cod", Rule::ReferentialCompleteness).next().is_some());

    let records = read_cache(&data.cache_path()).unwrap().records().unwrap();
    let unmatched = &records[3];
    assert_eq!(unmatched.muni_cod, "99999");
    assert_eq!(unmatched.causa_cod, "Z999");
    assert!(unmatched.causa.is_none());
    assert!(unmatched.municipio.is_none());
}

#[test]
fn test_coordinates_catalog_fills_lookup() {
    let data = TestData::new();
    data.write_divipola_without_coordinates();
    data.write_coordinates(
        "COD_DPTO,NOM_DPTO,COD_MPIO,NOM_MPIO,LATITUD,LONGITUD\n\
         05,ANTIOQUIA,05001,MEDELLÍN,6.2518,-75.5636\n\
         76,VALLE DEL CAUCA,76001,CALI,3.4516,-76.532\n",
    );

    data.pipeline().ingest(false).unwrap();
    let records = read_cache(&data.cache_path()).unwrap().records().unwrap();
    assert_eq!(records[0].lat, Some(6.2518));
    assert_eq!(records[0].lon, Some(-75.5636));
    assert_eq!(records[1].lat, None);
}

#[test]
fn test_coordinates_sheet_fills_divipola() {
    let data = TestData::new();
    data.write_divipola_with_coordinates_sheet();

    let outcome = data.pipeline().ingest(false).unwrap();
    let report = outcome.report().unwrap();
    assert_eq!(report.status, ReportStatus::Passed, "{:?}", report.violations);

    let records = read_cache(&data.cache_path()).unwrap().records().unwrap();
    assert_eq!(records[0].municipio.as_deref(), Some("Medellín"));
    assert_eq!(records[0].lat, Some(6.2518));
    assert_eq!(records[0].lon, Some(-75.5636));
    assert_eq!(records[1].lat, Some(4.711));
    assert_eq!(records[1].lon, Some(-74.0721));
}

#[test]
fn test_disabled_coordinates_sheet_is_not_read() {
    let mut data = TestData::new();
    data.write_divipola_with_coordinates_sheet();
    data.config.coordinates_sheet = None;

    data.pipeline().ingest(false).unwrap();
    let records = read_cache(&data.cache_path()).unwrap().records().unwrap();
    assert_eq!(records[0].municipio, None);
    assert_eq!(records[1].municipio.as_deref(), Some("Bogotá, D.C."));
    assert_eq!(records[1].lat, None);
}

#[test]
fn test_unnamed_municipality_counts_as_unmatched() {
    let data = TestData::new();
    data.write_divipola_rows(&[
        row(&["05", "ANTIOQUIA", "05001", "", "6,2518", "-75,5636"]),
        row(&["11", "BOGOTÁ, D.C.", "11001", "BOGOTÁ, D.C.", "4,711", "-74,0721"]),
    ]);

    let IngestOutcome::Written { report, stats, .. } = data.pipeline().ingest(false).unwrap()
    else {
        panic!("expected a written cache");
    };
    assert_eq!(stats.unmatched_geo, 2);
    assert_eq!(report.quality.unmatched_geo, stats.unmatched_geo);

    let records = read_cache(&data.cache_path()).unwrap().records().unwrap();
    assert_eq!(records[0].depto, None);
    assert_eq!(records[0].lat, None);
}

#[test]
fn test_corrupt_cache_requires_force() {
    let data = TestData::new();
    fs::create_dir_all(data.cache_path().parent().unwrap()).unwrap();
    fs::write(data.cache_path(), b"not a parquet file").unwrap();

    let err = data.pipeline().ingest(false).unwrap_err();
    assert_eq!(err.kind(), "UnreadableCacheError");
    assert!(err.to_string().contains("--force"));

    let outcome = data.pipeline().ingest(true).unwrap();
    assert_eq!(outcome.metadata().row_count, 3);
    assert_eq!(read_cache(&data.cache_path()).unwrap().num_rows(), 3);
}
