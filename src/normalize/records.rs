//! Death records normalization and lookup joins

use crate::error::{MortalityError, Result};
use crate::models::{CauseLookup, GeoLookup, MortalityRecord, NormalizationStats, ProcessedDataset};
use crate::normalize::values::{
    cause_code, date_from_parts, department_code, is_fetal, is_firearm_homicide,
    municipality_code, normalize_sex, pad_code, parse_age_group, parse_date_cell, code_text,
    SexValue,
};
use crate::reader::RawTable;
use crate::schema::adapt::DateFormatConfig;
use crate::schema::columns::records_vocabulary;
use crate::schema::mortality::age_group_label;

/// Column positions of the records table, resolved before any row is read
#[derive(Debug, Clone, Copy)]
struct RecordColumns {
    depto: usize,
    muni: Option<usize>,
    cod_dane: Option<usize>,
    sex: usize,
    age_group: usize,
    date: Option<usize>,
    year: Option<usize>,
    month: Option<usize>,
    cause: usize,
    death_type: Option<usize>,
}

impl RecordColumns {
    fn resolve(table: &RawTable) -> Result<Self> {
        let columns = table.column_map(&records_vocabulary());

        let depto = columns.require("depto_cod")?;
        let muni = columns.get("muni_cod");
        let cod_dane = columns.get("cod_dane");
        if muni.is_none() && cod_dane.is_none() {
            return Err(MortalityError::unknown_column("records", "muni_cod"));
        }
        let sex = columns.require("sexo")?;
        let age_group = columns.require("grupo_edad")?;
        let cause = columns.require("causa_cod")?;

        let date = columns.get("fecha");
        let year = columns.get("anio");
        let month = columns.get("mes");
        if date.is_none() && (year.is_none() || month.is_none()) {
            return Err(MortalityError::unknown_column("records", "fecha"));
        }

        Ok(Self {
            depto,
            muni,
            cod_dane,
            sex,
            age_group,
            date,
            year,
            month,
            cause,
            death_type: columns.get("tipo_defuncion"),
        })
    }
}

/// Turns the raw records table into the processed dataset
///
/// Holds the reference lookups for one ingestion run. Rows that do not match
/// a lookup, or carry values outside the known domains, are kept with null
/// descriptions and counted in [`NormalizationStats`].
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    causes: &'a CauseLookup,
    geo: &'a GeoLookup,
    date_config: &'a DateFormatConfig,
}

impl<'a> Normalizer<'a> {
    /// Create a normalizer over the given lookups
    #[must_use]
    pub const fn new(
        causes: &'a CauseLookup,
        geo: &'a GeoLookup,
        date_config: &'a DateFormatConfig,
    ) -> Self {
        Self {
            causes,
            geo,
            date_config,
        }
    }

    /// Normalize every non-fetal row of the records table
    pub fn normalize(&self, table: &RawTable) -> Result<ProcessedDataset> {
        let columns = RecordColumns::resolve(table)?;
        let mut stats = NormalizationStats {
            input_rows: table.num_rows(),
            ..NormalizationStats::default()
        };
        let mut records = Vec::with_capacity(table.num_rows());

        for row in 0..table.num_rows() {
            if columns
                .death_type
                .is_some_and(|c| is_fetal(table.cell(row, c)))
            {
                stats.fetal_excluded += 1;
                continue;
            }
            records.push(self.normalize_row(table, row, &columns, &mut stats));
        }

        stats.output_rows = records.len();
        stats.log_summary();
        Ok(ProcessedDataset { records, stats })
    }

    fn normalize_row(
        &self,
        table: &RawTable,
        row: usize,
        columns: &RecordColumns,
        stats: &mut NormalizationStats,
    ) -> MortalityRecord {
        let cell = |col: usize| table.cell(row, col);

        let depto_cod = department_code(cell(columns.depto)).unwrap_or_default();
        let muni_cod = columns
            .cod_dane
            .and_then(|c| code_text(cell(c)))
            .map(|code| pad_code(&code, 5))
            .or_else(|| columns.muni.and_then(|c| municipality_code(cell(c), Some(&depto_cod))))
            .unwrap_or_default();

        let sexo = normalize_sex(cell(columns.sex));
        if matches!(sexo, SexValue::Unrecognized(_)) {
            stats.unrecognized_sex += 1;
        }

        let age = parse_age_group(cell(columns.age_group));
        if age.flagged {
            stats.unrecognized_age_groups += 1;
        }

        let date = columns
            .date
            .and_then(|c| parse_date_cell(cell(c), self.date_config))
            .or_else(|| match (columns.year, columns.month) {
                (Some(y), Some(m)) => date_from_parts(cell(y), cell(m)),
                _ => None,
            });
        if date.is_none() {
            stats.invalid_dates += 1;
        }

        let causa_cod = cause_code(cell(columns.cause)).unwrap_or_default();
        let cause = self.causes.get(&causa_cod);
        if cause.is_none() {
            stats.unmatched_causes += 1;
        }

        // A code without names counts as unmatched, like the validator sees it
        let geo = self
            .geo
            .get(&depto_cod, &muni_cod)
            .filter(|g| g.is_named());
        if geo.is_none() {
            stats.unmatched_geo += 1;
        }

        let mut record = MortalityRecord {
            depto: geo.and_then(|g| g.depto.clone()),
            municipio: geo.and_then(|g| g.municipio.clone()),
            lat: geo.and_then(|g| g.lat),
            lon: geo.and_then(|g| g.lon),
            depto_cod,
            muni_cod,
            sexo: sexo.into_string(),
            grupo_edad: age.group,
            grupo_edad_label: age_group_label(age.group).to_string(),
            fecha: None,
            anio: None,
            mes: None,
            causa: cause.map(|c| c.description.clone()),
            causa_grupo: cause.and_then(|c| c.category.clone()),
            homicidio_x95: i32::from(is_firearm_homicide(&causa_cod)),
            causa_cod,
        };
        record.set_date(date);
        record
    }
}
