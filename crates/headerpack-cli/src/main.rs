//! HeaderPack CLI
//!
//! Packages a library project: merges its headers into one header and
//! copies its prebuilt binary next to it.

use anyhow::{Context, Result};
use clap::Parser;
use headerpack_core::{PackConfig, PackRequest};
use headerpack_engine::{pack, AmalgamationReport, PackOutcome};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "headerpack")]
#[command(author, version, about = "Merge a directory of headers into one header", long_about = None)]
struct Cli {
    /// Project kind (Application, StaticLibrary, DynamicLibrary)
    #[arg(value_name = "PROJECT_KIND")]
    project_kind: String,

    /// Prebuilt binary to publish
    #[arg(value_name = "BINARY")]
    binary: PathBuf,

    /// Directory of headers to merge
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Merged header to write
    #[arg(value_name = "OUT_HEADER")]
    out_header: PathBuf,

    /// Binary destination; the placeholder token is replaced by OUT_EXT
    #[arg(value_name = "OUT_BINARY")]
    out_binary: String,

    /// Output extension, leading '.' optional
    #[arg(value_name = "OUT_EXT")]
    out_ext: String,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => PackConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => PackConfig::default(),
    };
    debug!("Using {:?}", config);

    let request = PackRequest::new(
        &cli.project_kind,
        &cli.binary,
        &cli.input_dir,
        &cli.out_header,
        &cli.out_binary,
        &cli.out_ext,
        &config,
    )
    .context("invalid arguments")?;

    let outcome = pack(&request, &config).with_context(|| {
        format!(
            "failed to package {} into {}",
            request.input_dir.display(),
            request.output_header.display()
        )
    })?;

    match outcome {
        PackOutcome::Skipped => {
            println!("Nothing to package for {} projects.", request.project_kind);
        }
        PackOutcome::Packed(report) if cli.json => {
            println!("{}", report.to_json()?);
        }
        PackOutcome::Packed(report) => print_summary(&request, &report),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

fn print_summary(request: &PackRequest, report: &AmalgamationReport) {
    println!(
        "OK. {} headers, {} lines -> {}",
        report.headers_emitted(),
        report.lines_written,
        request.output_header.display()
    );
    println!("    binary -> {}", request.output_binary.display());
    if !report.unresolved.is_empty() {
        println!("    {} include(s) kept unresolved", report.unresolved.len());
    }
}
