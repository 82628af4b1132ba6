//! Cell-level normalization of codes, names and categorical values

use chrono::NaiveDate;

use crate::reader::Cell;
use crate::schema::adapt::{DateFormatConfig, excel_serial_to_date, parse_date_string};
use crate::schema::columns::normalize_header;
use crate::schema::mortality::is_known_age_group;

/// Largest serial Excel can represent (9999-12-31)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Trimmed text of a code cell, without the `.0` left by numeric cells
#[must_use]
pub fn code_text(cell: &Cell) -> Option<String> {
    let text = cell.as_text()?;
    let code = text.strip_suffix(".0").unwrap_or(&text).trim();
    (!code.is_empty()).then(|| code.to_string())
}

/// Left-pad an all-digit code with zeros up to `width`
#[must_use]
pub fn pad_code(code: &str, width: usize) -> String {
    if !code.is_empty() && code.len() < width && code.bytes().all(|b| b.is_ascii_digit()) {
        format!("{code:0>width$}")
    } else {
        code.to_string()
    }
}

/// Two-digit department code
#[must_use]
pub fn department_code(cell: &Cell) -> Option<String> {
    code_text(cell).map(|code| pad_code(&code, 2))
}

/// Five-digit DIVIPOLA municipality code
///
/// Codes of three digits or fewer are local to the department and get the
/// department code as prefix (`1` in department `11` becomes `11001`).
#[must_use]
pub fn municipality_code(cell: &Cell, depto_cod: Option<&str>) -> Option<String> {
    code_text(cell).map(|code| expand_municipality_code(&code, depto_cod))
}

/// Five-digit form of an already trimmed municipality code
#[must_use]
pub fn expand_municipality_code(code: &str, depto_cod: Option<&str>) -> String {
    let local = code.len() <= 3 && code.bytes().all(|b| b.is_ascii_digit());
    match depto_cod {
        Some(depto) if local && !depto.is_empty() => format!("{depto}{code:0>3}"),
        _ => pad_code(code, 5),
    }
}

/// Trimmed, upper-cased CIE-10 code
#[must_use]
pub fn cause_code(cell: &Cell) -> Option<String> {
    code_text(cell).map(|code| code.to_uppercase())
}

/// Whether a cause code is a firearm homicide (X95 and its subcodes)
#[must_use]
pub fn is_firearm_homicide(code: &str) -> bool {
    code.starts_with("X95")
}

/// Canonical sex value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SexValue {
    /// One of `M`, `F`, `NR`
    Known(&'static str),
    /// Unrecognized source value, upper-cased
    Unrecognized(String),
}

impl SexValue {
    /// Consume into the stored value
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Known(code) => code.to_string(),
            Self::Unrecognized(value) => value,
        }
    }
}

/// Map a sex cell onto `M`, `F` or `NR`
#[must_use]
pub fn normalize_sex(cell: &Cell) -> SexValue {
    let Some(raw) = code_text(cell) else {
        return SexValue::Known("NR");
    };
    match normalize_header(&raw).as_str() {
        "M" | "MASCULINO" | "HOMBRE" | "1" => SexValue::Known("M"),
        "F" | "FEMENINO" | "MUJER" | "2" => SexValue::Known("F"),
        "NR" | "SIN_INFORMACION" | "3" | "9" | "0" | "" => SexValue::Known("NR"),
        _ => SexValue::Unrecognized(raw.to_uppercase()),
    }
}

/// Parsed age group and whether it needs flagging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeGroup {
    /// Bucket number, `None` when the cell is not numeric
    pub group: Option<i32>,
    /// Not numeric, or outside the DANE buckets
    pub flagged: bool,
}

/// Parse an age group cell
#[must_use]
pub fn parse_age_group(cell: &Cell) -> AgeGroup {
    let group = cell.as_i64().and_then(|g| i32::try_from(g).ok());
    let flagged = group.is_none_or(|g| !is_known_age_group(g));
    AgeGroup { group, flagged }
}

/// Parse a date cell: date cells, Excel serial numbers or date text
#[must_use]
pub fn parse_date_cell(cell: &Cell, config: &DateFormatConfig) -> Option<NaiveDate> {
    match cell {
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Float(_) | Cell::Int(_) => cell.as_f64().and_then(serial_to_date),
        Cell::Text(text) => parse_date_string(text.trim(), config)
            .or_else(|| cell.as_f64().and_then(serial_to_date)),
        Cell::Empty | Cell::Bool(_) => None,
    }
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if (1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        excel_serial_to_date(serial)
    } else {
        None
    }
}

/// First day of the month given by separate year and month cells
#[must_use]
pub fn date_from_parts(year: &Cell, month: &Cell) -> Option<NaiveDate> {
    let year = i32::try_from(year.as_i64()?).ok()?;
    let month = u32::try_from(month.as_i64()?).ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Whether a `TIPO_DEFUN` value marks a fetal death
#[must_use]
pub fn is_fetal(cell: &Cell) -> bool {
    code_text(cell).is_some_and(|v| matches!(normalize_header(&v).as_str(), "1" | "FETAL"))
}

/// Title-case a place name: upper-case after any non-letter, lower-case otherwise
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut previous_is_letter = false;
    for ch in name.trim().chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

/// Optional place name from a cell, title-cased
#[must_use]
pub fn place_name(cell: &Cell) -> Option<String> {
    cell.as_text().map(|name| title_case(&name))
}
