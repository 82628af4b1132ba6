//! Arrow data handling utilities
//!
//! Helpers for reading typed values out of record batch columns.

pub mod array_utils;

// Re-export commonly used functions for convenience
pub use array_utils::{downcast_array, int_values, rows_with_any_null, string_values};
