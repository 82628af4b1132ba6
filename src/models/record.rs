//! One row of the processed mortality dataset

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A non-fetal death enriched with cause and geographic descriptions
///
/// Field order and types follow [`crate::schema::mortality_schema`], which is
/// what [`serde_arrow`] uses to build record batches from these rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortalityRecord {
    /// Department code, two digits
    pub depto_cod: String,
    /// Department name, `None` when the code is not in DIVIPOLA
    pub depto: Option<String>,
    /// Municipality code, five digits
    pub muni_cod: String,
    /// Municipality name, `None` when the code is not in DIVIPOLA
    pub municipio: Option<String>,
    /// `M`, `F`, `NR`, or the unrecognized source value
    pub sexo: String,
    /// DANE age bucket
    pub grupo_edad: Option<i32>,
    /// Label of the age bucket
    pub grupo_edad_label: String,
    /// Date of death
    pub fecha: Option<NaiveDate>,
    /// Year of death
    pub anio: Option<i32>,
    /// Month of death
    pub mes: Option<i32>,
    /// CIE-10 code of the basic cause
    pub causa_cod: String,
    /// Cause description, `None` when the code is not in the cause table
    pub causa: Option<String>,
    /// Cause category
    pub causa_grupo: Option<String>,
    /// 1 when the cause is a firearm homicide (X95*)
    pub homicidio_x95: i32,
    /// Municipality latitude
    pub lat: Option<f64>,
    /// Municipality longitude
    pub lon: Option<f64>,
}

impl MortalityRecord {
    /// Set the date and derive year and month from it
    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.fecha = date;
        self.anio = date.map(|d| d.year());
        #[allow(clippy::cast_possible_wrap)]
        let month = date.map(|d| d.month() as i32);
        self.mes = month;
    }
}
