//! Immutable reference lookups joined onto the death records
//!
//! Both lookups are built once per ingestion run from their source tables
//! and passed to the normalizer by reference. When a code appears more than
//! once in a source, the first occurrence wins.

use rustc_hash::FxHashMap;

/// Description of a CIE-10 code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CauseEntry {
    /// Human readable description
    pub description: String,
    /// Category (3-character group description or an explicit category column)
    pub category: Option<String>,
}

/// CIE-10 code to description
#[derive(Debug, Clone, Default)]
pub struct CauseLookup {
    entries: FxHashMap<String, CauseEntry>,
}

impl CauseLookup {
    /// Look up a normalized cause code
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&CauseEntry> {
        self.entries.get(code)
    }

    /// Number of codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lookup has no codes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, CauseEntry)> for CauseLookup {
    fn from_iter<I: IntoIterator<Item = (String, CauseEntry)>>(iter: I) -> Self {
        let mut entries = FxHashMap::default();
        for (code, entry) in iter {
            entries.entry(code).or_insert(entry);
        }
        Self { entries }
    }
}

/// Names and centroid of a municipality
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoEntry {
    /// Department name
    pub depto: Option<String>,
    /// Municipality name
    pub municipio: Option<String>,
    /// Centroid latitude
    pub lat: Option<f64>,
    /// Centroid longitude
    pub lon: Option<f64>,
}

impl GeoEntry {
    /// Whether both the department and the municipality name are known
    #[must_use]
    pub const fn is_named(&self) -> bool {
        self.depto.is_some() && self.municipio.is_some()
    }

    /// Fill the fields that are missing here from `other`
    fn fill_missing(&mut self, other: &Self) {
        if self.depto.is_none() {
            self.depto.clone_from(&other.depto);
        }
        if self.municipio.is_none() {
            self.municipio.clone_from(&other.municipio);
        }
        if self.lat.is_none() {
            self.lat = other.lat;
        }
        if self.lon.is_none() {
            self.lon = other.lon;
        }
    }
}

/// Key of a municipality: two-digit department code, five-digit DIVIPOLA code
pub type GeoKey = (String, String);

/// (department, municipality) code to names and coordinates
#[derive(Debug, Clone, Default)]
pub struct GeoLookup {
    entries: FxHashMap<GeoKey, GeoEntry>,
}

impl GeoLookup {
    /// Look up a municipality by normalized codes
    #[must_use]
    pub fn get(&self, depto_cod: &str, muni_cod: &str) -> Option<&GeoEntry> {
        self.entries
            .get(&(depto_cod.to_string(), muni_cod.to_string()))
    }

    /// Number of municipalities
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lookup has no municipalities
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Complete this lookup with a secondary catalog
    ///
    /// Entries keep their values and only gain what they lack; municipalities
    /// that are only in `catalog` are ignored.
    #[must_use]
    pub fn merged_with(mut self, catalog: &Self) -> Self {
        for (key, entry) in &mut self.entries {
            if let Some(extra) = catalog.entries.get(key) {
                entry.fill_missing(extra);
            }
        }
        self
    }
}

impl FromIterator<(GeoKey, GeoEntry)> for GeoLookup {
    fn from_iter<I: IntoIterator<Item = (GeoKey, GeoEntry)>>(iter: I) -> Self {
        let mut entries = FxHashMap::default();
        for (key, entry) in iter {
            entries.entry(key).or_insert(entry);
        }
        Self { entries }
    }
}
