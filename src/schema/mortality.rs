//! Schema of the processed mortality cache
//!
//! This is the contract between the ingestion pipeline and the dashboard:
//! column names, order, Arrow types and nullability.

use std::sync::Arc;

use arrow::datatypes::{Schema, SchemaRef};

use crate::schema::field::{FieldDefinition, FieldType};

pub const DEPTO_COD: &str = "depto_cod";
pub const DEPTO: &str = "depto";
pub const MUNI_COD: &str = "muni_cod";
pub const MUNICIPIO: &str = "municipio";
pub const SEXO: &str = "sexo";
pub const GRUPO_EDAD: &str = "grupo_edad";
pub const GRUPO_EDAD_LABEL: &str = "grupo_edad_label";
pub const FECHA: &str = "fecha";
pub const ANIO: &str = "anio";
pub const MES: &str = "mes";
pub const CAUSA_COD: &str = "causa_cod";
pub const CAUSA: &str = "causa";
pub const CAUSA_GRUPO: &str = "causa_grupo";
pub const HOMICIDIO_X95: &str = "homicidio_x95";
pub const LAT: &str = "lat";
pub const LON: &str = "lon";

/// Canonical sex codes: male, female, not reported
pub const ALLOWED_SEXES: [&str; 3] = ["M", "F", "NR"];

/// Label used for age groups outside the DANE buckets
pub const UNCLASSIFIED_AGE_LABEL: &str = "Sin clasificación";

/// DANE `GRUPO_EDAD1` buckets
pub const AGE_GROUP_LABELS: [(i32, &str); 12] = [
    (1, "Menor de 1 año"),
    (2, "1 a 4 años"),
    (3, "5 a 9 años"),
    (4, "10 a 14 años"),
    (5, "15 a 19 años"),
    (6, "20 a 24 años"),
    (7, "25 a 34 años"),
    (8, "35 a 44 años"),
    (9, "45 a 54 años"),
    (10, "55 a 64 años"),
    (11, "65 a 74 años"),
    (12, "75 años o más"),
];

/// Label for a DANE age bucket
#[must_use]
pub fn age_group_label(group: Option<i32>) -> &'static str {
    group
        .and_then(|g| AGE_GROUP_LABELS.iter().find(|(code, _)| *code == g))
        .map_or(UNCLASSIFIED_AGE_LABEL, |(_, label)| label)
}

/// Whether `group` is one of the declared DANE buckets
#[must_use]
pub fn is_known_age_group(group: i32) -> bool {
    AGE_GROUP_LABELS.iter().any(|(code, _)| *code == group)
}

/// Field definitions of the cache, in column order
#[must_use]
pub fn mortality_fields() -> Vec<FieldDefinition> {
    vec![
        FieldDefinition::new(DEPTO_COD, FieldType::Code, false),
        FieldDefinition::new(DEPTO, FieldType::String, true),
        FieldDefinition::new(MUNI_COD, FieldType::Code, false),
        FieldDefinition::new(MUNICIPIO, FieldType::String, true),
        FieldDefinition::new(SEXO, FieldType::String, false),
        FieldDefinition::new(GRUPO_EDAD, FieldType::Integer, true),
        FieldDefinition::new(GRUPO_EDAD_LABEL, FieldType::String, false),
        FieldDefinition::new(FECHA, FieldType::Date, true),
        FieldDefinition::new(ANIO, FieldType::Integer, true),
        FieldDefinition::new(MES, FieldType::Integer, true),
        FieldDefinition::new(CAUSA_COD, FieldType::Code, false),
        FieldDefinition::new(CAUSA, FieldType::String, true),
        FieldDefinition::new(CAUSA_GRUPO, FieldType::String, true),
        FieldDefinition::new(HOMICIDIO_X95, FieldType::Integer, false),
        FieldDefinition::new(LAT, FieldType::Decimal, true),
        FieldDefinition::new(LON, FieldType::Decimal, true),
    ]
}

/// Arrow schema of the cache
#[must_use]
pub fn mortality_schema() -> SchemaRef {
    let fields = mortality_fields()
        .iter()
        .map(FieldDefinition::to_arrow_field)
        .collect::<Vec<_>>();
    Arc::new(Schema::new(fields))
}
