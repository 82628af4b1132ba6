use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use mortalidad::config::app_env_from_env;
use mortalidad::utils::logging::console::{print_cache_metadata, print_report, print_stats};
use mortalidad::utils::logging::init_logging;
use mortalidad::{IngestOutcome, MortalityError, Pipeline, PipelineConfig, ValidationReport};
use serde::Serialize;

/// Ingest the DANE 2019 mortality spreadsheets into a validated Parquet cache.
#[derive(Parser, Debug)]
#[command(name = "mortalidad", version, about = "Mortality data ingestion and validation")]
struct Cli {
    /// Directory with the raw spreadsheets (overrides DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Cache file location (overrides MORTALIDAD_CACHE_PATH)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the cache from the raw spreadsheets
    Ingest {
        /// Rebuild even when a cache already exists
        #[arg(long)]
        force: bool,

        /// Show progress spinners
        #[arg(long)]
        progress: bool,
    },
    /// Re-run schema validation against the existing cache
    Validate,
}

#[derive(Serialize)]
struct ErrorOutput<'a> {
    error: &'static str,
    message: String,
    report: Option<&'a ValidationReport>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(app_env_from_env().context("Invalid ENV")?);

    let data_dir = cli.data_dir.as_ref().map(|dir| dir.display().to_string());
    let mut config = PipelineConfig::from_lookup(|key| match key {
        "DATA_DIR" if data_dir.is_some() => data_dir.clone(),
        _ => std::env::var(key).ok(),
    })
    .context("Invalid pipeline configuration")?;
    if let Some(cache) = cli.cache {
        config.cache_path = cache;
    }

    let result = match cli.command {
        Command::Ingest { force, progress } => {
            config.show_progress = progress && !cli.json;
            run_ingest(&Pipeline::new(config), force, cli.json)
        }
        Command::Validate => run_validate(&Pipeline::new(config), cli.json),
    };

    match result {
        Ok(code) => Ok(code),
        Err(e) => {
            report_error(&e, cli.json)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run_ingest(pipeline: &Pipeline, force: bool, json: bool) -> mortalidad::Result<ExitCode> {
    let outcome = pipeline.ingest(force)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(ExitCode::SUCCESS);
    }

    match &outcome {
        IngestOutcome::Skipped { metadata } => {
            println!("Cache is up to date, nothing to do (use --force to rebuild)");
            print_cache_metadata(metadata);
        }
        IngestOutcome::Written {
            metadata,
            report,
            stats,
        } => {
            print_stats(stats);
            print_report(report);
            print_cache_metadata(metadata);
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_validate(pipeline: &Pipeline, json: bool) -> mortalidad::Result<ExitCode> {
    let report = pipeline.validate()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.is_blocking() {
        info!("Cache failed validation");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn report_error(error: &MortalityError, json: bool) -> Result<()> {
    if json {
        let output = ErrorOutput {
            error: error.kind(),
            message: error.to_string(),
            report: error.report(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    eprintln!("{}: {error}", error.kind());
    if let Some(report) = error.report() {
        print_report(report);
    }
    Ok(())
}
