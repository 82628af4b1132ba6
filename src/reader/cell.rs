//! Minimally typed spreadsheet cells

use calamine::Data;
use chrono::NaiveDateTime;

/// A cell value as read from a spreadsheet or CSV file
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// Blank cell (also used for formula errors)
    Empty,
    /// Text
    Text(String),
    /// Integer
    Int(i64),
    /// Floating point number; Excel stores every number this way
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Date-time cell
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Whether the cell carries no value
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering of the cell, trimmed; `None` when empty
    ///
    /// Whole floats render without a fractional part so numeric codes read
    /// from Excel (`11001.0`) come back as `11001`.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Self::Int(i) => Some(i.to_string()),
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 => {
                Some(format!("{f:.0}"))
            }
            Self::Float(f) => Some(f.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }

    /// Integer value of the cell, accepting whole floats and numeric text
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Self::Text(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i64>().ok().or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite() && f.fract() == 0.0)
                        .map(|f| {
                            #[allow(clippy::cast_possible_truncation)]
                            let i = f as i64;
                            i
                        })
                })
            }
            _ => None,
        }
    }

    /// Floating point value of the cell; text may use a decimal comma
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) if f.is_finite() => Some(*f),
            Self::Text(s) => s.trim().replace(',', ".").parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }
}

impl From<&Data> for Cell {
    fn from(value: &Data) -> Self {
        match value {
            Data::Empty | Data::Error(_) => Self::Empty,
            Data::String(s) => Self::Text(s.clone()),
            Data::Int(i) => Self::Int(*i),
            Data::Float(f) => Self::Float(*f),
            Data::Bool(b) => Self::Bool(*b),
            Data::DateTime(dt) => dt.as_datetime().map_or(Self::Empty, Self::DateTime),
            Data::DateTimeIso(s) => s
                .parse::<NaiveDateTime>()
                .map_or_else(|_| Self::Text(s.clone()), Self::DateTime),
            Data::DurationIso(s) => Self::Text(s.clone()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        if value.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(value.to_string())
        }
    }
}
