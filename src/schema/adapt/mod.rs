//! Type compatibility and date handling used by normalization and validation.

pub mod compatibility;
pub mod date_utils;
pub mod types;

pub use compatibility::{check_type_compatibility, is_string};
pub use date_utils::{detect_date_format, excel_serial_to_date, parse_date_string};
pub use types::{DateFormatConfig, TypeCompatibility};
