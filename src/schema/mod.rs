//! Column vocabularies, the cache schema and type/date helpers.

pub mod adapt;
pub mod columns;
pub mod field;
pub mod mortality;

pub use adapt::{DateFormatConfig, TypeCompatibility, check_type_compatibility};
pub use columns::{
    ColumnMap, SourceVocabulary, causes_vocabulary, divipola_vocabulary, normalize_header,
    records_vocabulary,
};
pub use field::{FieldDefinition, FieldType};
pub use mortality::{mortality_fields, mortality_schema};
