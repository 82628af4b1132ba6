//! Cause-of-death lookup from the CIE-10 code table

use crate::error::{MortalityError, Result};
use crate::models::{CauseEntry, CauseLookup};
use crate::normalize::values::cause_code;
use crate::reader::RawTable;
use crate::schema::columns::{ColumnMap, causes_vocabulary};

/// Description used when a code row carries no description
pub const MISSING_DESCRIPTION: &str = "Sin descripción";

/// Build the cause lookup from the cause table
///
/// Two layouts are accepted: the DANE sheet with separate three- and
/// four-character code columns, where the three-character description is the
/// category of every code below it, and a flat code/description table with an
/// optional category column.
pub fn build_cause_lookup(table: &RawTable) -> Result<CauseLookup> {
    let columns = table.column_map(&causes_vocabulary());

    let entries = if columns.contains("codigo_3") && columns.contains("descripcion_3") {
        dane_entries(table, &columns)
    } else {
        flat_entries(table, &columns)?
    };

    if entries.is_empty() {
        return Err(MortalityError::unreadable(
            &table.source,
            "no cause codes found in the cause table",
        ));
    }

    let lookup: CauseLookup = entries.into_iter().collect();
    log::debug!(
        "Loaded {} cause codes from {}",
        lookup.len(),
        table.source.display()
    );
    Ok(lookup)
}

fn dane_entries(table: &RawTable, columns: &ColumnMap) -> Vec<(String, CauseEntry)> {
    let code3 = columns.get("codigo_3");
    let desc3 = columns.get("descripcion_3");
    let code4 = columns.get("codigo_4");
    let desc4 = columns.get("descripcion_4");
    let text = |row: usize, col: Option<usize>| col.and_then(|c| table.cell(row, c).as_text());
    let code = |row: usize, col: Option<usize>| col.and_then(|c| cause_code(table.cell(row, c)));

    let mut entries = Vec::with_capacity(table.num_rows() * 2);
    for row in 0..table.num_rows() {
        let group = text(row, desc3);

        if let Some(short_code) = code(row, code3) {
            let description = group.clone().unwrap_or_else(|| MISSING_DESCRIPTION.to_string());
            entries.push((
                short_code,
                CauseEntry {
                    description,
                    category: group.clone(),
                },
            ));
        }

        if let Some(full_code) = code(row, code4) {
            let description = text(row, desc4)
                .or_else(|| group.clone())
                .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());
            entries.push((
                full_code,
                CauseEntry {
                    description,
                    category: group,
                },
            ));
        }
    }
    entries
}

fn flat_entries(table: &RawTable, columns: &ColumnMap) -> Result<Vec<(String, CauseEntry)>> {
    let code_col = columns.require("causa_cod")?;
    let desc_col = columns.require("causa")?;
    let category_col = columns.get("causa_grupo");

    let entries = (0..table.num_rows())
        .filter_map(|row| {
            let code = cause_code(table.cell(row, code_col))?;
            let description = table
                .cell(row, desc_col)
                .as_text()
                .unwrap_or_else(|| MISSING_DESCRIPTION.to_string());
            let category = category_col.and_then(|c| table.cell(row, c).as_text());
            Some((code, CauseEntry { description, category }))
        })
        .collect();
    Ok(entries)
}
