//! Source table readers
//!
//! The three DANE inputs are Excel workbooks; the optional coordinates
//! catalog is a CSV file. Both are read into a [`RawTable`]: the detected
//! header row plus the remaining non-empty rows as minimally typed cells.

pub mod cell;

use std::path::{Path, PathBuf};
use std::time::Instant;

use calamine::{Reader, open_workbook_auto};

use crate::error::util::ensure_input_file;
use crate::error::{MortalityError, Result};
use crate::schema::columns::{ColumnMap, SourceVocabulary};
use crate::utils::logging::{log_operation_complete, log_operation_start};

pub use cell::Cell;

/// Number of leading rows searched for the header row
pub const HEADER_SCAN_ROWS: usize = 20;

static EMPTY_CELL: Cell = Cell::Empty;

/// A source table as read from disk
#[derive(Debug, Clone)]
pub struct RawTable {
    /// File the table was read from
    pub source: PathBuf,
    /// Worksheet name (`csv` for CSV files)
    pub sheet: String,
    /// Header row as text, empty strings for blank header cells
    pub headers: Vec<String>,
    /// Data rows following the header, fully empty rows removed
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Number of data rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cell at (`row`, `column`); [`Cell::Empty`] when the row is short
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Resolve the header row against a vocabulary
    #[must_use]
    pub fn column_map(&self, vocabulary: &SourceVocabulary) -> ColumnMap {
        vocabulary.resolve(&self.headers)
    }
}

/// Read one worksheet of a spreadsheet
///
/// # Arguments
/// * `path` - Workbook path (xlsx, xls, ods)
/// * `sheet` - Worksheet name; the first worksheet when `None`
/// * `vocabulary` - Column vocabulary used to recognize the header row
/// * `purpose` - Which input this is, for `MissingInputError` messages
pub fn read_spreadsheet(
    path: &Path,
    sheet: Option<&str>,
    vocabulary: &SourceVocabulary,
    purpose: &str,
) -> Result<RawTable> {
    ensure_input_file(path, purpose)?;
    let start = Instant::now();
    log_operation_start("Reading spreadsheet", path);

    let mut workbook =
        open_workbook_auto(path).map_err(|e| MortalityError::unreadable(path, e.to_string()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| MortalityError::unreadable(path, "workbook has no worksheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| MortalityError::unreadable(path, format!("sheet '{sheet_name}': {e}")))?;

    let rows = range
        .rows()
        .map(|row| row.iter().map(Cell::from).collect::<Vec<_>>());
    let table = table_from_rows(path, sheet_name, rows, vocabulary)?;

    log_operation_complete("read from", path, table.num_rows(), Some(start.elapsed()));
    Ok(table)
}

/// Read a CSV file with every field kept as text
pub fn read_csv(path: &Path, vocabulary: &SourceVocabulary, purpose: &str) -> Result<RawTable> {
    ensure_input_file(path, purpose)?;
    let start = Instant::now();
    log_operation_start("Reading CSV", path);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| MortalityError::unreadable(path, e.to_string()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| MortalityError::unreadable(path, e.to_string()))?;
        rows.push(record.iter().map(Cell::from).collect::<Vec<_>>());
    }

    let table = table_from_rows(path, "csv".to_string(), rows, vocabulary)?;
    log_operation_complete("read from", path, table.num_rows(), Some(start.elapsed()));
    Ok(table)
}

/// Build a [`RawTable`] from rows of cells
///
/// The header is the first row among the leading [`HEADER_SCAN_ROWS`] that
/// contains at least one header known to `vocabulary`; anything above it
/// (titles, notes) is skipped.
pub fn table_from_rows<I>(
    source: &Path,
    sheet: String,
    rows: I,
    vocabulary: &SourceVocabulary,
) -> Result<RawTable>
where
    I: IntoIterator<Item = Vec<Cell>>,
{
    let mut rows = rows.into_iter();

    let mut header = None;
    for _ in 0..HEADER_SCAN_ROWS {
        let Some(row) = rows.next() else { break };
        let recognized = row
            .iter()
            .filter_map(Cell::as_text)
            .any(|text| vocabulary.recognizes(&text));
        if recognized {
            header = Some(row);
            break;
        }
    }

    let header = header.ok_or_else(|| {
        MortalityError::unreadable(
            source,
            format!(
                "no header row with {} columns in the first {HEADER_SCAN_ROWS} rows",
                vocabulary.table()
            ),
        )
    })?;

    let headers = header
        .iter()
        .map(|c| c.as_text().unwrap_or_default())
        .collect();
    let rows = rows
        .filter(|row| !row.iter().all(Cell::is_empty))
        .collect();

    Ok(RawTable {
        source: source.to_path_buf(),
        sheet,
        headers,
        rows,
    })
}
