use std::fs;
use std::path::{Path, PathBuf};

use mortalidad::{Pipeline, PipelineConfig};
use rust_xlsxwriter::{Workbook, Worksheet};
use tempfile::TempDir;

/// Header of the death records fixture
pub const RECORDS_HEADER: [&str; 7] = [
    "COD_DEPARTAMENTO",
    "COD_MUNICIPIO",
    "SEXO",
    "GRUPO_EDAD1",
    "FECHA_DEF",
    "COD_MUERTE",
    "TIPO_DEFUN",
];

/// Header of the cause table fixture, DANE layout
pub const CAUSES_HEADER: [&str; 4] = [
    "Código de la CIE-10 tres caracteres",
    "Descripción  de códigos mortalidad a tres caracteres",
    "Código de la CIE-10 cuatro caracteres",
    "Descripcion  de códigos mortalidad a cuatro caracteres",
];

/// Header of the DIVIPOLA fixture
pub const DIVIPOLA_HEADER: [&str; 6] = ["COD_DPTO", "NOM_DPTO", "COD_MPIO", "NOM_MPIO", "LATITUD", "LONGITUD"];

/// Convert string slices into an owned sheet row
#[must_use]
pub fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// One death record row; `tipo` is "1" for fetal deaths, "2" otherwise
#[must_use]
pub fn record_row(depto: &str, muni: &str, sexo: &str, edad: &str, fecha: &str, causa: &str, tipo: &str) -> Vec<String> {
    row(&[depto, muni, sexo, edad, fecha, causa, tipo])
}

/// Three non-fetal deaths with the given sex values, every code resolvable
#[must_use]
pub fn records_with_sexes(sexes: [&str; 3]) -> Vec<Vec<String>> {
    vec![
        record_row("05", "001", sexes[0], "12", "2019-03-15", "I219", "2"),
        record_row("11", "001", sexes[1], "7", "15/06/2019", "X954", "2"),
        record_row("05", "001", sexes[2], "9", "2019-12-01", "J189", "2"),
    ]
}

/// The default records fixture: one male, one female and one not reported
#[must_use]
pub fn default_records() -> Vec<Vec<String>> {
    records_with_sexes(["1", "2", "3"])
}

/// Write a single-sheet workbook; empty strings leave the cell blank
///
/// `title` is written on the first row above the header, like the DANE files.
pub fn write_sheet(path: &Path, title: Option<&str>, header: &[&str], rows: &[Vec<String>]) {
    let mut workbook = Workbook::new();
    fill_sheet(workbook.add_worksheet(), title, header, rows);
    workbook.save(path).unwrap();
}

fn fill_sheet(worksheet: &mut Worksheet, title: Option<&str>, header: &[&str], rows: &[Vec<String>]) {
    let mut current: u32 = 0;
    if let Some(title) = title {
        worksheet.write_string(current, 0, title).unwrap();
        current += 2;
    }
    for (col, name) in header.iter().enumerate() {
        if !name.is_empty() {
            worksheet.write_string(current, col as u16, *name).unwrap();
        }
    }
    for values in rows {
        current += 1;
        for (col, value) in values.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string(current, col as u16, value).unwrap();
            }
        }
    }
}

/// A scratch data directory with the three raw inputs
pub struct TestData {
    pub dir: TempDir,
    pub config: PipelineConfig,
}

impl TestData {
    /// Cause and DIVIPOLA tables plus the default records
    #[must_use]
    pub fn new() -> Self {
        Self::with_records(&default_records())
    }

    /// Cause and DIVIPOLA tables plus the given records
    #[must_use]
    pub fn with_records(records: &[Vec<String>]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let raw_dir = dir.path().join("raw");
        fs::create_dir_all(&raw_dir).unwrap();
        let config = PipelineConfig::with_raw_dir(&raw_dir);

        let data = Self { dir, config };
        data.write_causes();
        data.write_divipola();
        data.write_records(RECORDS_HEADER.as_slice(), records);
        data
    }

    /// Replace the records workbook
    pub fn write_records(&self, header: &[&str], records: &[Vec<String>]) {
        write_sheet(
            &self.config.records_path(),
            Some("Defunciones no fetales 2019"),
            header,
            records,
        );
    }

    /// Write the coordinates catalog next to the DIVIPOLA file
    pub fn write_coordinates(&self, csv: &str) {
        fs::write(self.config.coordinates_path(), csv).unwrap();
    }

    fn write_causes(&self) {
        let rows = vec![
            row(&[
                "I21",
                "Infarto agudo del miocardio",
                "I219",
                "Infarto agudo del miocardio, sin otra especificación",
            ]),
            row(&[
                "X95",
                "Agresión con disparo de otras armas de fuego, y las no especificadas",
                "X954",
                "Agresión con disparo de otras armas de fuego, en calles y carreteras",
            ]),
            row(&["J18", "Neumonía, organismo no especificado", "J189", ""]),
        ];
        write_sheet(&self.config.causes_path(), None, CAUSES_HEADER.as_slice(), &rows);
    }

    fn write_divipola(&self) {
        self.write_divipola_rows(&[
            row(&["05", "ANTIOQUIA", "05001", "MEDELLÍN", "6,2518", "-75,5636"]),
            row(&["11", "BOGOTÁ, D.C.", "11001", "BOGOTÁ, D.C.", "4,711", "-74,0721"]),
        ]);
    }

    /// Replace the DIVIPOLA workbook with the given rows
    pub fn write_divipola_rows(&self, rows: &[Vec<String>]) {
        write_sheet(&self.config.divipola_path(), None, DIVIPOLA_HEADER.as_slice(), rows);
    }

    /// Replace the DIVIPOLA workbook with a codes-only first sheet and a
    /// `Hoja3` sheet carrying names and centroids, like the DANE release
    pub fn write_divipola_with_coordinates_sheet(&self) {
        let mut workbook = Workbook::new();
        fill_sheet(
            workbook.add_worksheet(),
            None,
            &DIVIPOLA_HEADER[..4],
            &[
                row(&["05", "ANTIOQUIA", "05001", ""]),
                row(&["11", "BOGOTÁ, D.C.", "11001", "BOGOTÁ, D.C."]),
            ],
        );
        fill_sheet(
            workbook.add_worksheet().set_name("Hoja3").unwrap(),
            None,
            &["Departamento", "", "Municipio", "", "Tipo", "Localización", ""],
            &[
                row(&["Código", "Nombre", "Código", "Nombre", "", "Longitud", "Latitud"]),
                row(&["05", "ANTIOQUIA", "05001", "MEDELLÍN", "Municipio", "-75,5636", "6,2518"]),
                row(&["11", "BOGOTÁ, D.C.", "11001", "BOGOTÁ, D.C.", "Municipio", "-74,0721", "4,711"]),
            ],
        );
        workbook.save(self.config.divipola_path()).unwrap();
    }

    /// Replace the DIVIPOLA workbook with one that has no coordinate columns
    pub fn write_divipola_without_coordinates(&self) {
        let rows = vec![
            row(&["05", "ANTIOQUIA", "05001", "MEDELLÍN"]),
            row(&["11", "BOGOTÁ, D.C.", "11001", "BOGOTÁ, D.C."]),
        ];
        write_sheet(&self.config.divipola_path(), None, &DIVIPOLA_HEADER[..4], &rows);
    }

    /// Location of the cache
    #[must_use]
    pub fn cache_path(&self) -> PathBuf {
        self.config.cache_path.clone()
    }

    /// Pipeline over this directory
    #[must_use]
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.config.clone())
    }
}
