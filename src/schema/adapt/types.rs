//! Core types for type compatibility and date parsing.

/// Types of data type compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCompatibility {
    /// Types match exactly
    Exact,
    /// Types differ but convert without loss
    Compatible,
    /// Types are incompatible
    Incompatible,
}

/// Configuration for date format handling
#[derive(Debug, Clone)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
    /// Date-time format strings; only the date part is kept
    pub datetime_formats: Vec<String>,
    /// Enable heuristic format detection
    pub enable_format_detection: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2019-01-15
                "%d/%m/%Y".to_string(), // Colombian: 15/01/2019
                "%d-%m-%Y".to_string(), // 15-01-2019
                "%Y/%m/%d".to_string(), // 2019/01/15
                "%d.%m.%Y".to_string(), // 15.01.2019
                "%Y%m%d".to_string(),   // Compact: 20190115
            ],
            datetime_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%d/%m/%Y %H:%M:%S".to_string(),
                "%d/%m/%Y %H:%M".to_string(),
            ],
            enable_format_detection: true,
        }
    }
}
