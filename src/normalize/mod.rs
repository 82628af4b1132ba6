//! Normalization of the raw source tables into the processed dataset
//!
//! The cause and geographic tables become immutable lookups; the records
//! table is mapped onto the canonical vocabulary and left-joined with them.

pub mod causes;
pub mod geo;
pub mod records;
pub mod values;

pub use causes::build_cause_lookup;
pub use geo::{build_geo_lookup, load_coordinates_catalog, load_coordinates_sheet};
pub use records::Normalizer;
