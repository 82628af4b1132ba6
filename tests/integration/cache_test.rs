use std::fs::File;
use std::sync::Arc;

use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use mortalidad::cache::writer::temp_path;
use mortalidad::cache::{read_cache, read_metadata, write_cache};
use parquet::arrow::ArrowWriter;

fn codes_batch(codes: &[&str]) -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![Field::new("causa_cod", DataType::Utf8, false)]));
    RecordBatch::try_new(schema, vec![Arc::new(StringArray::from(codes.to_vec()))]).unwrap()
}

#[test]
fn test_write_replaces_existing_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("processed").join("mortalidad_2019.parquet");

    write_cache(&path, &codes_batch(&["I219", "X954"])).unwrap();
    let second = write_cache(&path, &codes_batch(&["J189"])).unwrap();

    assert_eq!(second.row_count, 1);
    assert!(!temp_path(&path).exists());
    assert_eq!(read_cache(&path).unwrap().num_rows(), 1);
    assert_eq!(read_metadata(&path).unwrap(), second);
}

#[test]
fn test_failed_write_leaves_cache_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mortalidad_2019.parquet");
    write_cache(&path, &codes_batch(&["I219"])).unwrap();
    let bytes = std::fs::read(&path).unwrap();

    // A directory in place of the temporary file makes the write fail
    std::fs::create_dir(temp_path(&path)).unwrap();
    assert!(write_cache(&path, &codes_batch(&["J189", "X954"])).is_err());

    assert_eq!(std::fs::read(&path).unwrap(), bytes);
}

#[test]
fn test_foreign_parquet_metadata_falls_back_to_footer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("external.parquet");
    let batch = codes_batch(&["I219", "X954", "J189"]);

    let file = File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let metadata = read_metadata(&path).unwrap();
    assert_eq!(metadata.row_count, 3);
    assert_eq!(metadata.path, path);
}
