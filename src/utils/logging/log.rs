//! Logger setup and standardized log lines
//!
//! Development runs log human readable lines at debug level. Production runs
//! log one JSON object per line at info level. `RUST_LOG` overrides the
//! default filter in both cases.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};

use crate::config::AppEnv;

/// Install the global logger for `env`
///
/// Calling it again is harmless: the first logger stays installed.
pub fn init_logging(env: AppEnv) {
    let default_filter = match env {
        AppEnv::Development => "debug",
        AppEnv::Production => "info",
    };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));

    if env == AppEnv::Production {
        builder.format(|buf, record| {
            let line = serde_json::json!({
                "level": record.level().to_string(),
                "logger": record.target(),
                "message": record.args().to_string(),
                "time": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            });
            writeln!(buf, "{line}")
        });
    }

    if builder.try_init().is_err() {
        log::debug!("Logger already installed");
    }
}

/// Log the start of an operation on a file
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{} {}", operation, path.display());
}

/// Log the completion of an operation on a file
///
/// # Arguments
/// * `operation` - Past-tense verb with its preposition, e.g. "read from" or "wrote to"
/// * `path` - File that was operated on
/// * `rows` - Rows processed
/// * `elapsed` - Optional elapsed time
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    log::info!("{}", operation_summary(operation, path, rows, elapsed));
}

fn operation_summary(operation: &str, path: &Path, rows: usize, elapsed: Option<Duration>) -> String {
    let (verb, preposition) = operation.split_once(' ').unwrap_or((operation, "on"));
    match elapsed {
        Some(duration) => format!(
            "Successfully {verb} {rows} rows {preposition} {} in {duration:?}",
            path.display()
        ),
        None => format!("Successfully {verb} {rows} rows {preposition} {}", path.display()),
    }
}

/// Log a warning, optionally tied to a file
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{}: {}", message, path.display()),
        None => log::warn!("{message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_places_preposition_before_path() {
        let path = Path::new("data/processed/mortalidad_2019.parquet");
        assert_eq!(
            operation_summary("wrote to", path, 3, None),
            "Successfully wrote 3 rows to data/processed/mortalidad_2019.parquet"
        );
        assert_eq!(
            operation_summary("read from", path, 3, Some(Duration::from_millis(5))),
            "Successfully read 3 rows from data/processed/mortalidad_2019.parquet in 5ms"
        );
    }
}
