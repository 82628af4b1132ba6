//! Municipality lookup from DIVIPOLA, its coordinates sheet and the optional
//! coordinates catalog

use std::path::Path;

use crate::error::{MortalityError, Result};
use crate::models::{GeoEntry, GeoLookup};
use crate::normalize::values::{code_text, expand_municipality_code, pad_code, place_name};
use crate::reader::{self, Cell, RawTable};
use crate::schema::columns::{coordinates_sheet_vocabulary, divipola_vocabulary};
use crate::utils::logging::log_warning;

/// Build the municipality lookup from a DIVIPOLA-like table
///
/// Codes are reduced to their digits, department codes padded to two digits
/// and municipality codes expanded to five. A full `COD_DANE` column takes
/// precedence over the municipality column. Rows without codes are skipped.
pub fn build_geo_lookup(table: &RawTable) -> Result<GeoLookup> {
    let columns = table.column_map(&divipola_vocabulary());

    let depto_col = columns.require("depto_cod")?;
    let depto_name_col = columns.require("depto")?;
    let muni_name_col = columns.require("municipio")?;
    let dane_col = columns.get("cod_dane");
    let muni_col = match (columns.get("muni_cod"), dane_col) {
        (Some(col), _) => Some(col),
        (None, Some(_)) => None,
        (None, None) => return Err(MortalityError::unknown_column("divipola", "muni_cod")),
    };
    let lat_col = columns.get("lat");
    let lon_col = columns.get("lon");
    let number = |row: usize, col: Option<usize>| col.and_then(|c| table.cell(row, c).as_f64());

    let entries = (0..table.num_rows()).filter_map(|row| {
        let depto_cod = digits(table.cell(row, depto_col)).map(|code| pad_code(&code, 2))?;
        let muni_cod = dane_col
            .and_then(|c| digits(table.cell(row, c)))
            .map(|code| pad_code(&code, 5))
            .or_else(|| {
                muni_col
                    .and_then(|c| digits(table.cell(row, c)))
                    .map(|code| expand_municipality_code(&code, Some(&depto_cod)))
            })?;

        let entry = GeoEntry {
            depto: place_name(table.cell(row, depto_name_col)),
            municipio: place_name(table.cell(row, muni_name_col)),
            lat: number(row, lat_col),
            lon: number(row, lon_col),
        };
        Some(((depto_cod, muni_cod), entry))
    });

    let lookup: GeoLookup = entries.collect();
    log::debug!(
        "Loaded {} municipalities from {}",
        lookup.len(),
        table.source.display()
    );
    Ok(lookup)
}

/// Build a lookup from the DIVIPOLA coordinates worksheet
///
/// The worksheet has a two-row header: `Departamento`, `Municipio` and
/// `Localización` each span two columns (code then name, longitude then
/// latitude) and a second row labels them. Rows whose department cell holds
/// no digits, that second header row included, are skipped.
pub fn build_sheet_coordinates(table: &RawTable) -> Result<GeoLookup> {
    let columns = table.column_map(&coordinates_sheet_vocabulary());
    let depto_col = columns.require("depto_cod")?;
    let muni_col = columns.require("muni_cod")?;
    let lon_col = columns.require("lon")?;

    let entries = (0..table.num_rows()).filter_map(|row| {
        let depto_cod = digits(table.cell(row, depto_col)).map(|code| pad_code(&code, 2))?;
        let muni_cod = digits(table.cell(row, muni_col))
            .map(|code| expand_municipality_code(&code, Some(&depto_cod)))?;

        let entry = GeoEntry {
            depto: place_name(table.cell(row, depto_col + 1)),
            municipio: place_name(table.cell(row, muni_col + 1)),
            lat: table.cell(row, lon_col + 1).as_f64(),
            lon: table.cell(row, lon_col).as_f64(),
        };
        Some(((depto_cod, muni_cod), entry))
    });

    Ok(entries.collect())
}

/// Read the coordinates worksheet of the DIVIPOLA workbook, if it has one
///
/// A workbook without the worksheet is common and only logged at debug
/// level; a worksheet without the expected headers is logged and skipped.
#[must_use]
pub fn load_coordinates_sheet(path: &Path, sheet: &str) -> Option<GeoLookup> {
    let table = match reader::read_spreadsheet(
        path,
        Some(sheet),
        &coordinates_sheet_vocabulary(),
        "DIVIPOLA coordinates",
    ) {
        Ok(table) => table,
        Err(e) => {
            log::debug!("No coordinates sheet '{sheet}' in {} ({e})", path.display());
            return None;
        }
    };

    match build_sheet_coordinates(&table) {
        Ok(coordinates) => {
            log::debug!("Loaded {} centroids from sheet '{sheet}'", coordinates.len());
            Some(coordinates)
        }
        Err(e) => {
            log_warning(&format!("Ignoring coordinates sheet '{sheet}' ({e})"), Some(path));
            None
        }
    }
}

/// Read the coordinates catalog next to the DIVIPOLA file, if there is one
///
/// The catalog only enriches the lookup, so a catalog that cannot be read or
/// lacks the expected columns is logged and skipped.
#[must_use]
pub fn load_coordinates_catalog(path: &Path) -> Option<GeoLookup> {
    if !path.is_file() {
        log::debug!("No coordinates catalog at {}", path.display());
        return None;
    }

    match reader::read_csv(path, &divipola_vocabulary(), "coordinates catalog")
        .and_then(|table| build_geo_lookup(&table))
    {
        Ok(catalog) => Some(catalog),
        Err(e) => {
            log_warning(&format!("Ignoring coordinates catalog ({e})"), Some(path));
            None
        }
    }
}

fn digits(cell: &Cell) -> Option<String> {
    let code: String = code_text(cell)?
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    (!code.is_empty()).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::table_from_rows;

    fn table(rows: Vec<Vec<Cell>>) -> RawTable {
        table_from_rows(Path::new("Divipola.xlsx"), "Hoja1".into(), rows, &divipola_vocabulary())
            .unwrap()
    }

    fn text(values: &[&str]) -> Vec<Cell> {
        values.iter().map(|v| Cell::from(*v)).collect()
    }

    #[test]
    fn divipola_codes_names_and_coordinates() {
        let lookup = build_geo_lookup(&table(vec![
            text(&["COD_DEPARTAMENTO", "DEPARTAMENTO", "COD_MUNICIPIO", "MUNICIPIO", "LATITUD", "LONGITUD"]),
            vec![
                Cell::Float(11.0),
                Cell::from("BOGOTÁ, D.C."),
                Cell::Float(1.0),
                Cell::from("BOGOTÁ, D.C."),
                Cell::from("4,711"),
                Cell::Float(-74.0721),
            ],
            vec![
                Cell::Float(5.0),
                Cell::from("ANTIOQUIA"),
                Cell::Float(5001.0),
                Cell::from("MEDELLÍN"),
                Cell::Empty,
                Cell::Empty,
            ],
            text(&["05", "Duplicado", "05001", "Duplicado", "", ""]),
        ]))
        .unwrap();

        assert_eq!(lookup.len(), 2);
        let bogota = lookup.get("11", "11001").unwrap();
        assert_eq!(bogota.municipio.as_deref(), Some("Bogotá, D.C."));
        assert_eq!(bogota.lat, Some(4.711));
        assert_eq!(bogota.lon, Some(-74.0721));

        let medellin = lookup.get("05", "05001").unwrap();
        assert_eq!(medellin.depto.as_deref(), Some("Antioquia"));
        assert_eq!(medellin.lat, None);
    }

    #[test]
    fn cod_dane_takes_precedence() {
        let lookup = build_geo_lookup(&table(vec![
            text(&["COD_DPTO", "NOM_DPTO", "COD_DANE", "NOM_MPIO"]),
            text(&["76", "VALLE DEL CAUCA", "76001", "CALI"]),
        ]))
        .unwrap();
        assert_eq!(lookup.get("76", "76001").unwrap().municipio.as_deref(), Some("Cali"));
    }

    #[test]
    fn missing_municipality_column() {
        let err = build_geo_lookup(&table(vec![
            text(&["COD_DPTO", "NOM_DPTO", "NOM_MPIO"]),
            text(&["76", "VALLE DEL CAUCA", "CALI"]),
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), "UnknownColumnError");
    }

    #[test]
    fn coordinates_sheet_skips_sub_header() {
        let rows = vec![
            text(&["Departamento", "", "Municipio", "", "Tipo", "Localización", ""]),
            text(&["Código", "Nombre", "Código", "Nombre", "", "Longitud", "Latitud"]),
            text(&["05", "ANTIOQUIA", "05001", "MEDELLÍN", "Municipio", "-75,5636", "6,2518"]),
            vec![
                Cell::Float(11.0),
                Cell::from("BOGOTÁ, D.C."),
                Cell::Float(11001.0),
                Cell::from("BOGOTÁ, D.C."),
                Cell::from("Municipio"),
                Cell::Float(-74.0721),
                Cell::Float(4.711),
            ],
        ];
        let table = table_from_rows(
            Path::new("Divipola.xlsx"),
            "Hoja3".into(),
            rows,
            &coordinates_sheet_vocabulary(),
        )
        .unwrap();

        let lookup = build_sheet_coordinates(&table).unwrap();
        assert_eq!(lookup.len(), 2);
        let medellin = lookup.get("05", "05001").unwrap();
        assert_eq!(medellin.municipio.as_deref(), Some("Medellín"));
        assert_eq!(medellin.lat, Some(6.2518));
        assert_eq!(medellin.lon, Some(-75.5636));
        assert_eq!(lookup.get("11", "11001").unwrap().lon, Some(-74.0721));
    }

    #[test]
    fn missing_coordinates_sheet_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Divipola.xlsx");
        assert!(load_coordinates_sheet(&path, "Hoja3").is_none());
    }

    #[test]
    fn catalog_is_optional_and_tolerant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dane_municipios.csv");
        assert!(load_coordinates_catalog(&path).is_none());

        std::fs::write(&path, "foo,bar\n1,2\n").unwrap();
        assert!(load_coordinates_catalog(&path).is_none());

        std::fs::write(
            &path,
            "COD_DPTO,NOM_DPTO,COD_MPIO,NOM_MPIO,LATITUD,LONGITUD\n11,BOGOTÁ,11001,BOGOTÁ,4.6,-74.08\n",
        )
        .unwrap();
        let catalog = load_coordinates_catalog(&path).unwrap();
        assert_eq!(catalog.get("11", "11001").unwrap().lon, Some(-74.08));
    }
}
