//! Configuration for the ingestion pipeline.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{MortalityError, Result};
use crate::schema::adapt::DateFormatConfig;

/// Default name of the death records spreadsheet
pub const RECORDS_FILENAME: &str = "NoFetal2019.xlsx";
/// Default name of the CIE-10 cause code spreadsheet
pub const CAUSES_FILENAME: &str = "CodigosDeMuerte.xlsx";
/// Default name of the DIVIPOLA geographic code spreadsheet
pub const DIVIPOLA_FILENAME: &str = "Divipola.xlsx";
/// Worksheet of the DIVIPOLA workbook holding municipality centroids
pub const COORDINATES_SHEET: &str = "Hoja3";
/// Optional municipality coordinates catalog, looked up next to the DIVIPOLA file
pub const COORDINATES_FILENAME: &str = "dane_municipios.csv";
/// Default name of the processed cache
pub const CACHE_FILENAME: &str = "mortalidad_2019.parquet";

/// Runtime environment, selects the log format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    /// Human readable logs at debug level
    #[default]
    Development,
    /// JSON logs at info level
    Production,
}

impl FromStr for AppEnv {
    type Err = MortalityError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(MortalityError::Config(format!(
                "ENV must be 'development'/'dev' or 'production'/'prod', got '{other}'"
            ))),
        }
    }
}

/// One spreadsheet input
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// File name inside the raw directory
    pub file_name: String,
    /// Worksheet to read; the first sheet when `None`
    pub sheet: Option<String>,
}

impl SourceFile {
    /// A source read from the first worksheet of `file_name`
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            sheet: None,
        }
    }
}

/// Thresholds applied by the schema validator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationThresholds {
    /// Maximum fraction of nulls allowed in a nullable column before a warning
    pub max_null_fraction: f64,
    /// Maximum fraction of rows with unmatched cause or geographic codes
    pub max_unmatched_fraction: f64,
    /// Year every record is expected to fall in; `None` disables the check
    pub expected_year: Option<i32>,
}

impl Default for ValidationThresholds {
    fn default() -> Self {
        Self {
            max_null_fraction: 0.05,
            max_unmatched_fraction: 0.01,
            expected_year: Some(2019),
        }
    }
}

/// Configuration for the ingestion pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the raw spreadsheets
    pub raw_dir: PathBuf,
    /// Location of the processed Parquet cache
    pub cache_path: PathBuf,
    /// Death records input
    pub records: SourceFile,
    /// Cause code table input
    pub causes: SourceFile,
    /// Geographic code table input
    pub divipola: SourceFile,
    /// DIVIPOLA worksheet with centroids; `None` skips it
    pub coordinates_sheet: Option<String>,
    /// Optional coordinates catalog file name
    pub coordinates_file: String,
    /// Validation thresholds
    pub thresholds: ValidationThresholds,
    /// Rebuild an existing cache when a raw input is newer than it
    pub rebuild_stale_cache: bool,
    /// Show progress spinners while ingesting
    pub show_progress: bool,
    /// Date formats tried when a date cell holds text
    pub date_format_config: DateFormatConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::with_raw_dir("data/raw")
    }
}

impl PipelineConfig {
    /// Default configuration rooted at `raw_dir`
    ///
    /// The cache goes to `<raw_dir>/../processed/mortalidad_2019.parquet`.
    pub fn with_raw_dir(raw_dir: impl Into<PathBuf>) -> Self {
        let raw_dir = raw_dir.into();
        let cache_path = default_cache_path(&raw_dir);
        Self {
            raw_dir,
            cache_path,
            records: SourceFile::new(RECORDS_FILENAME),
            causes: SourceFile::new(CAUSES_FILENAME),
            divipola: SourceFile::new(DIVIPOLA_FILENAME),
            coordinates_sheet: Some(COORDINATES_SHEET.to_string()),
            coordinates_file: COORDINATES_FILENAME.to_string(),
            thresholds: ValidationThresholds::default(),
            rebuild_stale_cache: false,
            show_progress: false,
            date_format_config: DateFormatConfig::default(),
        }
    }

    /// Build the configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => Self::with_raw_dir(dir.trim()),
            _ => Self::default(),
        };

        if let Some(path) = lookup("MORTALIDAD_CACHE_PATH").filter(|p| !p.trim().is_empty()) {
            config.cache_path = PathBuf::from(path.trim());
        }
        if let Some(value) = lookup("MORTALIDAD_MAX_NULL_FRACTION") {
            config.thresholds.max_null_fraction =
                parse_fraction("MORTALIDAD_MAX_NULL_FRACTION", &value)?;
        }
        if let Some(value) = lookup("MORTALIDAD_MAX_UNMATCHED_FRACTION") {
            config.thresholds.max_unmatched_fraction =
                parse_fraction("MORTALIDAD_MAX_UNMATCHED_FRACTION", &value)?;
        }
        if let Some(value) = lookup("MORTALIDAD_EXPECTED_YEAR") {
            config.thresholds.expected_year = match value.trim().to_lowercase().as_str() {
                "" | "none" => None,
                year => Some(year.parse::<i32>().map_err(|_| {
                    MortalityError::Config(format!(
                        "MORTALIDAD_EXPECTED_YEAR must be a year or 'none', got '{value}'"
                    ))
                })?),
            };
        }
        if let Some(value) = lookup("MORTALIDAD_COORDINATES_SHEET") {
            config.coordinates_sheet = match value.trim() {
                "" => None,
                sheet if sheet.eq_ignore_ascii_case("none") => None,
                sheet => Some(sheet.to_string()),
            };
        }
        if let Some(value) = lookup("MORTALIDAD_REBUILD_STALE") {
            config.rebuild_stale_cache = parse_bool("MORTALIDAD_REBUILD_STALE", &value)?;
        }

        Ok(config)
    }

    /// Path of the death records spreadsheet
    #[must_use]
    pub fn records_path(&self) -> PathBuf {
        self.raw_dir.join(&self.records.file_name)
    }

    /// Path of the cause code spreadsheet
    #[must_use]
    pub fn causes_path(&self) -> PathBuf {
        self.raw_dir.join(&self.causes.file_name)
    }

    /// Path of the DIVIPOLA spreadsheet
    #[must_use]
    pub fn divipola_path(&self) -> PathBuf {
        self.raw_dir.join(&self.divipola.file_name)
    }

    /// Path of the optional coordinates catalog
    #[must_use]
    pub fn coordinates_path(&self) -> PathBuf {
        let divipola = self.divipola_path();
        divipola
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&self.coordinates_file)
    }

    /// All three required input paths
    #[must_use]
    pub fn input_paths(&self) -> [PathBuf; 3] {
        [self.records_path(), self.causes_path(), self.divipola_path()]
    }
}

/// Read the runtime environment from `ENV`
pub fn app_env_from_env() -> Result<AppEnv> {
    std::env::var("ENV").map_or(Ok(AppEnv::default()), |v| v.parse())
}

fn default_cache_path(raw_dir: &Path) -> PathBuf {
    raw_dir
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("processed")
        .join(CACHE_FILENAME)
}

fn parse_fraction(name: &str, value: &str) -> Result<f64> {
    match value.trim().parse::<f64>() {
        Ok(f) if (0.0..=1.0).contains(&f) => Ok(f),
        _ => Err(MortalityError::Config(format!(
            "{name} must be a fraction between 0 and 1, got '{value}'"
        ))),
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(MortalityError::Config(format!(
            "{name} must be a boolean, got '{value}'"
        ))),
    }
}
