//! revolver: revolve a height/radius profile into a solid and export it.
//!
//! The configuration file (TOML, or RON for `.ron` files) holds the profile
//! under `[Model]` and one `[[Output]]` table per STL or STEP target.
//!
//! # Logging
//!
//! `RUST_LOG` takes precedence over the `-v` flags:
//! - `RUST_LOG=rv_core=info` - Stage and per-file logging
//! - `RUST_LOG=rv_cad=debug` - Tessellation statistics
//!
//! # Example
//!
//! ```bash
//! revolver -v part.toml
//! revolver --dry-run --sequential part.ron
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rv_cad::StepExportOptions;
use rv_core::{Revolver, RevolverConfig, RunOptions, RunReport};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Revolve a profile 360° about the Z axis and export STL/STEP files.
#[derive(Parser)]
#[command(name = "revolver")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Run configuration (TOML, or RON with a .ron extension)
    #[arg(value_name = "conf-file")]
    conf_file: PathBuf,

    /// Export targets one after another instead of concurrently
    #[arg(long)]
    sequential: bool,

    /// Build and tessellate, but write no files
    #[arg(long)]
    dry_run: bool,

    /// Author recorded in STEP headers
    #[arg(long)]
    author: Option<String>,

    /// Organization recorded in STEP headers
    #[arg(long)]
    organization: Option<String>,

    /// Suppress all non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "warn",
            1 => "rv_core=info,rv_cad=info",
            2 => "rv_core=debug,rv_cad=debug",
            _ => "trace",
        };
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> Result<RunReport> {
    let config = RevolverConfig::load(&cli.conf_file)
        .with_context(|| format!("Failed to load config {}", cli.conf_file.display()))?;

    let options = RunOptions {
        parallel: !cli.sequential,
        dry_run: cli.dry_run,
        step: StepExportOptions {
            author: cli.author.clone(),
            organization: cli.organization.clone(),
            ..Default::default()
        },
    };

    Revolver::default()
        .run(&config, &options)
        .with_context(|| format!("Failed to build solid from {}", cli.conf_file.display()))
}

fn print_report(report: &RunReport, dry_run: bool) {
    println!(
        "Solid: {} faces, volume {:.6}",
        report.shape_faces, report.shape_volume
    );
    for outcome in &report.outcomes {
        match outcome {
            Ok(summary) => {
                let triangles = summary
                    .triangle_count
                    .map(|n| format!(" ({n} triangles)"))
                    .unwrap_or_default();
                let note = if dry_run { " [dry run]" } else { "" };
                println!(
                    "  ✓ {} {}{}{}",
                    summary.format,
                    summary.path.display(),
                    triangles,
                    note
                );
            }
            Err(e) => println!("  ✗ {e}"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(report) => {
            if !cli.quiet {
                print_report(&report, cli.dry_run);
            }
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                let failed = report.failures().count();
                tracing::error!(failed, "Some targets failed");
                eprintln!("Error: {failed} of {} targets failed", report.outcomes.len());
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {cause}");
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::try_parse_from(["revolver", "-vv", "--sequential", "--dry-run", "part.toml"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.sequential);
        assert!(cli.dry_run);
        assert!(!cli.quiet);
        assert_eq!(cli.conf_file, PathBuf::from("part.toml"));
    }

    #[test]
    fn test_conf_file_required() {
        assert!(Cli::try_parse_from(["revolver"]).is_err());
    }
}
