use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use isoplot::cli;
use isoplot::compiler::Compiled;
use isoplot::config::PlotConfig;
use isoplot::nl43::{self, EXAMPLE_CSV};
use isoplot::pipeline;

#[derive(Parser)]
#[command(name = "isoforms", about = "Compile an HIV splicing isoform plot description")]
struct Cli {
    /// Sectioned CSV input ([title], [transcripts], [donors], [acceptors])
    input: PathBuf,

    /// Path to the JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write the compiled plot as JSON
    #[arg(short = 'j', long = "json")]
    json: Option<PathBuf>,

    /// Write the bundled example to INPUT instead of reading it
    #[arg(long)]
    example: bool,
}

fn main() -> ExitCode {
    let start = Instant::now();
    let cli_args = Cli::parse();

    cli::banner("Isoforms");

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
    if cli_args.example {
        fs::write(&cli_args.input, EXAMPLE_CSV)
            .with_context(|| format!("failed to write example: {}", cli_args.input.display()))?;
        cli::success(&format!("example written to {}", cli_args.input.display()));
        return Ok(());
    }

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let config = PlotConfig::load(cli_args.config.as_deref())?;
    cli::kv("Input", &cli_args.input.display().to_string());
    if let Some(path) = &cli_args.config {
        cli::kv("Config", &path.display().to_string());
    }
    cli::kv("Genome end", &config.genome_end.to_string());

    eprintln!();

    // ── Compilation ──────────────────────────────────────
    cli::section("Compilation");

    let output = pipeline::run_path(&cli_args.input, config.genome_end)
        .with_context(|| format!("failed to compile {}", cli_args.input.display()))?;
    let compiled = &output.compiled;

    cli::kv("Encoding", &output.encoding.to_string());
    cli::kv("Title", compiled.title.as_deref().unwrap_or("(none)"));
    print_counts(compiled);
    for name in &output.unrecognized_sections {
        cli::warning(&format!("section [{name}] is not used"));
    }
    warn_off_reference(compiled);
    cli::success("plot description is valid");

    if let Some(path) = &cli_args.json {
        write_json(path, compiled)?;
        cli::kv("JSON", &path.display().to_string());
    }

    Ok(())
}

fn print_counts(compiled: &Compiled) {
    let named_groups = compiled.groups.iter().filter(|g| g.name.is_some()).count();
    cli::kv("Transcripts", &compiled.transcripts.len().to_string());
    cli::kv(
        "Groups",
        &format!(
            "{} {}",
            compiled.groups.len(),
            format!("({named_groups} named)").dimmed()
        ),
    );
    cli::kv("Splicing sites", &compiled.splicing_sites.len().to_string());
}

/// Warn about NL4-3 site names declared at a non-reference position.
fn warn_off_reference(compiled: &Compiled) {
    for site in &compiled.splicing_sites {
        match nl43::reference_position(site.site_type, &site.name) {
            Some(reference) if reference != site.position => cli::warning(&format!(
                "{} {} at {} (NL4-3 reference position is {reference})",
                site.site_type, site.name, site.position
            )),
            _ => {}
        }
    }
}

fn write_json(path: &Path, compiled: &Compiled) -> Result<()> {
    let json = serde_json::to_string_pretty(compiled).context("failed to serialize plot")?;
    fs::write(path, json).with_context(|| format!("failed to write JSON: {}", path.display()))
}
