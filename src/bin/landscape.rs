use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use isoplot::cli;
use isoplot::config::PlotConfig;
use isoplot::error::LandscapeError;
use isoplot::landscape::{self, Landscape, LandscapeTable};

#[derive(Parser)]
#[command(name = "landscape", about = "Validate a proviral landscape CSV and build sample tracks")]
struct Cli {
    /// Proviral landscape CSV produced by the proviral pipeline
    input: PathBuf,

    /// Path to the JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write the sample tracks as JSON
    #[arg(short = 'j', long = "json")]
    json: Option<PathBuf>,
}

fn main() -> ExitCode {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Proviral Landscape");

    match run(&cli_args) {
        Ok(()) => {
            cli::print_summary(start);
            ExitCode::SUCCESS
        }
        Err(err) => {
            cli::failure(&format!("{err:#}"));
            eprintln!();
            ExitCode::FAILURE
        }
    }
}

fn run(cli_args: &Cli) -> Result<()> {
    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = PlotConfig::load(cli_args.config.as_deref())?;
    let window = &config.landscape;
    cli::kv("Input", &cli_args.input.display().to_string());
    cli::kv("Window", &format!("{}-{}", window.start_pos, window.end_pos));

    eprintln!();

    // ── Validation ───────────────────────────────────────
    cli::section("Validation");

    let table = LandscapeTable::from_path(&cli_args.input)
        .with_context(|| format!("failed to read {}", cli_args.input.display()))?;
    let report = landscape::validate(&table, window.max_inspect_rows);
    cli::kv("Rows inspected", &report.inspected.to_string());

    for issue in &report.errors {
        cli::failure(&issue.to_string());
    }
    for issue in &report.warnings {
        cli::warning(&issue.to_string());
    }
    if !report.is_ok() {
        return Err(LandscapeError::Rejected {
            errors: report.errors,
        }
        .into());
    }
    cli::success("input is valid");

    eprintln!();

    // ── Tracks ───────────────────────────────────────────
    cli::section("Tracks");

    let plot = landscape::build(&table, window)?;
    cli::kv("Samples", &plot.tracks.len().to_string());
    cli::kv("Segments", &plot.segments().count().to_string());
    let legend: Vec<&str> = plot.legend.iter().map(|e| e.defect.name()).collect();
    cli::kv("Defects", &legend.join(", "));

    if let Some(path) = &cli_args.json {
        write_json(path, &plot)?;
        cli::kv("JSON", &path.display().to_string());
    }

    Ok(())
}

fn write_json(path: &Path, plot: &Landscape) -> Result<()> {
    let json = serde_json::to_string_pretty(plot).context("failed to serialize tracks")?;
    fs::write(path, json).with_context(|| format!("failed to write JSON: {}", path.display()))
}
