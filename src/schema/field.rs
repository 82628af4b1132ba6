//! Field definitions shared by the source vocabularies and the cache schema

use arrow::datatypes::{DataType, Field};

/// Represents the semantic type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Text value
    String,
    /// Code value kept as zero-padded text (DIVIPOLA, CIE-10)
    Code,
    /// Integer value
    Integer,
    /// Decimal value
    Decimal,
    /// Date value
    Date,
}

impl FieldType {
    /// Convert to Arrow `DataType`
    #[must_use]
    pub const fn to_arrow_type(&self) -> DataType {
        match self {
            Self::String | Self::Code => DataType::Utf8,
            Self::Integer => DataType::Int32,
            Self::Decimal => DataType::Float64,
            Self::Date => DataType::Date32,
        }
    }
}

/// A field definition with its canonical name and source aliases
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Canonical snake-case name
    pub name: String,
    /// Semantic type of the field
    pub field_type: FieldType,
    /// Whether the field can be null
    pub nullable: bool,
    /// Normalized source headers that map to this field
    pub aliases: Vec<String>,
}

impl FieldDefinition {
    /// Create a new field definition
    pub fn new(
        name: impl Into<String>,
        field_type: FieldType,
        nullable: bool,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            nullable,
            aliases: Vec::new(),
        }
    }

    /// Add multiple aliases for this field
    #[must_use]
    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| (*a).to_string()));
        self
    }

    /// Convert to an Arrow Field
    #[must_use]
    pub fn to_arrow_field(&self) -> Field {
        Field::new(&self.name, self.field_type.to_arrow_type(), self.nullable)
    }

    /// Check if a normalized header matches one of this field's aliases
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.aliases.iter().any(|alias| alias == name)
    }
}
