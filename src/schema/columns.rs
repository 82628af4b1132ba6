//! Source column vocabularies
//!
//! DANE spreadsheets name the same column differently across releases
//! (`DPTO_OCURRE` vs `COD_DEPARTAMENTO`, accents, stray spaces). Headers are
//! folded with [`normalize_header`] and then looked up in an explicit alias
//! table per source, giving each column a canonical snake-case name.

use rustc_hash::FxHashMap;

use crate::error::{MortalityError, Result};
use crate::schema::field::{FieldDefinition, FieldType};

/// Fold a header (or categorical value) to upper-case ASCII snake-case
///
/// Accents are stripped, any run of non-alphanumeric characters becomes a
/// single underscore and leading/trailing separators are dropped, so
/// `" Código de la CIE-10 "` becomes `CODIGO_DE_LA_CIE_10` and `AÑO` becomes
/// `ANO`.
#[must_use]
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.chars() {
        let folded = fold_accent(ch);
        if folded.is_ascii_alphanumeric() {
            if pending_separator && !out.is_empty() {
                out.push('_');
            }
            pending_separator = false;
            out.push(folded.to_ascii_uppercase());
        } else {
            pending_separator = true;
        }
    }
    out
}

const fn fold_accent(ch: char) -> char {
    match ch {
        'á' | 'à' | 'ä' | 'â' | 'Á' | 'À' | 'Ä' | 'Â' => 'A',
        'é' | 'è' | 'ë' | 'ê' | 'É' | 'È' | 'Ë' | 'Ê' => 'E',
        'í' | 'ì' | 'ï' | 'î' | 'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
        'ó' | 'ò' | 'ö' | 'ô' | 'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
        'ú' | 'ù' | 'ü' | 'û' | 'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
        'ñ' | 'Ñ' => 'N',
        'ç' | 'Ç' => 'C',
        other => other,
    }
}

/// Canonical columns and their aliases for one source table
#[derive(Debug, Clone)]
pub struct SourceVocabulary {
    table: &'static str,
    fields: Vec<FieldDefinition>,
}

impl SourceVocabulary {
    /// Create a vocabulary for `table`
    #[must_use]
    pub fn new(table: &'static str, fields: Vec<FieldDefinition>) -> Self {
        Self { table, fields }
    }

    /// Name of the source table, used in error messages
    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    /// Canonical name for a raw header, if the header is recognized
    #[must_use]
    pub fn canonical_name(&self, raw_header: &str) -> Option<&str> {
        let normalized = normalize_header(raw_header);
        self.fields
            .iter()
            .find(|f| f.matches_name(&normalized))
            .map(|f| f.name.as_str())
    }

    /// Whether a raw header maps to any canonical column
    #[must_use]
    pub fn recognizes(&self, raw_header: &str) -> bool {
        self.canonical_name(raw_header).is_some()
    }

    /// Map canonical names to column positions; the first matching header wins
    #[must_use]
    pub fn resolve(&self, headers: &[String]) -> ColumnMap {
        let mut indices = FxHashMap::default();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(name) = self.canonical_name(header) {
                indices.entry(name.to_string()).or_insert(idx);
            }
        }
        ColumnMap {
            table: self.table,
            indices,
        }
    }
}

/// Canonical column name to position, for one table
#[derive(Debug, Clone)]
pub struct ColumnMap {
    table: &'static str,
    indices: FxHashMap<String, usize>,
}

impl ColumnMap {
    /// Position of an optional column
    #[must_use]
    pub fn get(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    /// Position of a required column
    pub fn require(&self, name: &str) -> Result<usize> {
        self.get(name)
            .ok_or_else(|| MortalityError::unknown_column(self.table, name))
    }

    /// Whether a column was resolved
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.indices.contains_key(name)
    }
}

/// Vocabulary of the death records spreadsheet (`NoFetal2019.xlsx`)
#[must_use]
pub fn records_vocabulary() -> SourceVocabulary {
    SourceVocabulary::new(
        "records",
        vec![
            FieldDefinition::new("depto_cod", FieldType::Code, false)
                .with_aliases(&["DPTO_OCURRE", "DEPTO_OCURRE", "COD_DEPARTAMENTO", "COD_DPTO"]),
            FieldDefinition::new("muni_cod", FieldType::Code, false)
                .with_aliases(&["MUN_OCURRE", "MUNI_OCURRE", "COD_MUNICIPIO", "COD_MPIO"]),
            FieldDefinition::new("cod_dane", FieldType::Code, true)
                .with_aliases(&["COD_DANE"]),
            FieldDefinition::new("sexo", FieldType::String, false)
                .with_aliases(&["SEXO", "SEXO_DEF"]),
            FieldDefinition::new("grupo_edad", FieldType::Integer, false)
                .with_aliases(&["GRUPO_EDAD1", "GRUPO_EDAD"]),
            FieldDefinition::new("fecha", FieldType::Date, true)
                .with_aliases(&["FECHA_DEF", "FECHA_OCURR"]),
            FieldDefinition::new("anio", FieldType::Integer, true)
                .with_aliases(&["ANO", "ANIO"]),
            FieldDefinition::new("mes", FieldType::Integer, true)
                .with_aliases(&["MES"]),
            FieldDefinition::new("causa_cod", FieldType::Code, false)
                .with_aliases(&["CAUSA_DEF", "COD_MUERTE", "COD_CAUSA"]),
            FieldDefinition::new("tipo_defuncion", FieldType::Code, true)
                .with_aliases(&["TIPO_DEFUN", "TIPO_DEFUNCION"]),
        ],
    )
}

/// Vocabulary of the CIE-10 cause table (`CodigosDeMuerte.xlsx`)
///
/// Covers both the DANE sheet with three- and four-character code columns
/// and a plain code/description table.
#[must_use]
pub fn causes_vocabulary() -> SourceVocabulary {
    SourceVocabulary::new(
        "causes",
        vec![
            FieldDefinition::new("codigo_3", FieldType::Code, true)
                .with_aliases(&["CODIGO_DE_LA_CIE_10_TRES_CARACTERES"]),
            FieldDefinition::new("descripcion_3", FieldType::String, true)
                .with_aliases(&["DESCRIPCION_DE_CODIGOS_MORTALIDAD_A_TRES_CARACTERES"]),
            FieldDefinition::new("codigo_4", FieldType::Code, true)
                .with_aliases(&["CODIGO_DE_LA_CIE_10_CUATRO_CARACTERES"]),
            FieldDefinition::new("descripcion_4", FieldType::String, true)
                .with_aliases(&["DESCRIPCION_DE_CODIGOS_MORTALIDAD_A_CUATRO_CARACTERES"]),
            FieldDefinition::new("causa_cod", FieldType::Code, false)
                .with_aliases(&["CODIGO", "COD_CAUSA", "CODIGO_CIE_10"]),
            FieldDefinition::new("causa", FieldType::String, true)
                .with_aliases(&["DESCRIPCION", "NOMBRE"]),
            FieldDefinition::new("causa_grupo", FieldType::String, true)
                .with_aliases(&["CATEGORIA", "GRUPO", "CAPITULO"]),
        ],
    )
}

/// Vocabulary of the DIVIPOLA table and of the coordinates catalog
#[must_use]
pub fn divipola_vocabulary() -> SourceVocabulary {
    SourceVocabulary::new(
        "divipola",
        vec![
            FieldDefinition::new("depto_cod", FieldType::Code, false)
                .with_aliases(&["COD_DEPTO", "COD_DEPARTAMENTO", "COD_DPTO"]),
            FieldDefinition::new("depto", FieldType::String, true)
                .with_aliases(&["NOM_DEPTO", "NOM_DEPARTAMENTO", "DEPARTAMENTO", "NOM_DPTO"]),
            FieldDefinition::new("muni_cod", FieldType::Code, false)
                .with_aliases(&["COD_MPIO", "COD_MUNICIPIO"]),
            FieldDefinition::new("municipio", FieldType::String, true)
                .with_aliases(&["NOM_MPIO", "NOM_MUNICIPIO", "MUNICIPIO"]),
            FieldDefinition::new("cod_dane", FieldType::Code, true)
                .with_aliases(&["COD_DANE"]),
            FieldDefinition::new("lat", FieldType::Decimal, true)
                .with_aliases(&["LAT", "LATITUD"]),
            FieldDefinition::new("lon", FieldType::Decimal, true)
                .with_aliases(&["LON", "LONGITUD"]),
        ],
    )
}

/// Vocabulary of the DIVIPOLA coordinates worksheet
///
/// Each of these headers spans two columns: code and name for the
/// department and the municipality, longitude and latitude for the location.
#[must_use]
pub fn coordinates_sheet_vocabulary() -> SourceVocabulary {
    SourceVocabulary::new(
        "divipola coordinates",
        vec![
            FieldDefinition::new("depto_cod", FieldType::Code, false).with_aliases(&["DEPARTAMENTO"]),
            FieldDefinition::new("muni_cod", FieldType::Code, false).with_aliases(&["MUNICIPIO"]),
            FieldDefinition::new("lon", FieldType::Decimal, true).with_aliases(&["LOCALIZACION"]),
        ],
    )
}
