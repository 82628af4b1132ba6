//! Array access helpers for validating record batches
//!
//! Columns are cast to a canonical type first (`Utf8` for text, `Int64` for
//! integers) so checks work the same on exact and widened column types.

use arrow::array::{Array, ArrayRef, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::error::ArrowError;

use crate::error::Result;

/// Downcast an array reference to a concrete array type
///
/// # Arguments
///
/// * `array` - The array reference to downcast
/// * `column_name` - The name of the column (for error messages)
/// * `expected_type_name` - A human-readable name of the expected type (for error messages)
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        ArrowError::CastError(format!(
            "column '{column_name}' is {}, expected {expected_type_name}",
            array.data_type()
        ))
        .into()
    })
}

/// Cast a column to `Utf8`
pub fn utf8_column(array: &ArrayRef) -> Result<ArrayRef> {
    Ok(cast(array, &DataType::Utf8)?)
}

/// Cast a column to `Int64`
pub fn int64_column(array: &ArrayRef) -> Result<ArrayRef> {
    Ok(cast(array, &DataType::Int64)?)
}

/// Non-null string values of a column
pub fn string_values(array: &ArrayRef, column_name: &str) -> Result<Vec<String>> {
    let utf8 = utf8_column(array)?;
    let strings = downcast_array::<StringArray>(&utf8, column_name, "Utf8")?;
    Ok(strings.iter().flatten().map(str::to_string).collect())
}

/// Non-null integer values of a column
pub fn int_values(array: &ArrayRef, column_name: &str) -> Result<Vec<i64>> {
    let ints = int64_column(array)?;
    let ints = downcast_array::<Int64Array>(&ints, column_name, "Int64")?;
    Ok(ints.iter().flatten().collect())
}

/// Number of rows where at least one of the arrays is null
#[must_use]
pub fn rows_with_any_null(arrays: &[&ArrayRef]) -> usize {
    let Some(len) = arrays.first().map(|a| a.len()) else {
        return 0;
    };
    (0..len)
        .filter(|&row| arrays.iter().any(|a| a.is_null(row)))
        .count()
}
