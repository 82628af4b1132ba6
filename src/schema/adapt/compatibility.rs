//! Module for handling data type compatibility checks.

use crate::schema::adapt::types::TypeCompatibility;
use arrow::datatypes::DataType;

/// Check whether data read as `from` satisfies a column declared as `to`
///
/// `Compatible` means a lossless widening: a cache written by another tool
/// with narrower integers or large strings still satisfies the schema.
#[must_use]
pub fn check_type_compatibility(from: &DataType, to: &DataType) -> TypeCompatibility {
    if from == to {
        return TypeCompatibility::Exact;
    }

    match (from, to) {
        // Numeric type conversions (widening)
        (DataType::Int8, DataType::Int16 | DataType::Int32 | DataType::Int64)
        | (DataType::Int16, DataType::Int32 | DataType::Int64)
        | (DataType::Int32, DataType::Int64)
        | (DataType::UInt8, DataType::Int16 | DataType::Int32 | DataType::Int64)
        | (DataType::UInt16, DataType::Int32 | DataType::Int64)
        | (DataType::Float32, DataType::Float64) => TypeCompatibility::Compatible,

        // Integer to float conversions
        (
            DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::UInt8 | DataType::UInt16,
            DataType::Float64,
        ) => TypeCompatibility::Compatible,

        // Between string types
        (DataType::LargeUtf8 | DataType::Utf8View, DataType::Utf8)
        | (DataType::Utf8 | DataType::Utf8View, DataType::LargeUtf8) => {
            TypeCompatibility::Compatible
        }

        // Dictionary-encoded strings, as written by pandas for categoricals
        (DataType::Dictionary(_, value), DataType::Utf8 | DataType::LargeUtf8)
            if is_string(value) =>
        {
            TypeCompatibility::Compatible
        }

        // Date and timestamp interconversions
        (DataType::Date64 | DataType::Timestamp(_, _), DataType::Date32) => {
            TypeCompatibility::Compatible
        }

        // Default - Incompatible
        _ => TypeCompatibility::Incompatible,
    }
}

/// Identifies whether a data type is a string type
#[must_use]
pub const fn is_string(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
    )
}
