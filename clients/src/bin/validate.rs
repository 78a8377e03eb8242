//! `causeway-validate`: builds a domain's metamodel and runs the validator suite.
//!
//! **Usage:**
//! ```text
//! causeway-validate --domain <dir|file> [--config <toml>] [--log-level <level>] [--json]
//! ```
//!
//! Exits non-zero if any check fails. Outside production, validation
//! problems are reported as warnings and do not fail the run.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::process;

use anyhow::Result;
use causeway_clients::{init_logging, DomainArgs};
use causeway_conformance::{run_all, Severity};
use clap::Parser;

/// Validate a Causeway domain model.
#[derive(Parser)]
#[command(
    name = "causeway-validate",
    about = "Build a domain's metamodel and report validation problems"
)]
struct Cli {
    #[command(flatten)]
    domain: DomainArgs,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.domain.log_level)?;

    let report = run_all(&cli.domain.paths())?;

    if cli.json {
        println!("{}", report.to_json()?);
    } else {
        println!("Causeway Metamodel Conformance Report");
        println!("=====================================");
        println!();
        for result in &report.results {
            println!("[{}] {}: {}", result.severity.label(), result.validator, result.message);
            for detail in &result.details {
                println!("       {detail}");
            }
        }
        println!();
        println!(
            "Summary: {} passed, {} warnings, {} failed",
            report.count(Severity::Pass),
            report.count(Severity::Warning),
            report.count(Severity::Failure)
        );
    }

    let failed = report.failure_count();
    if failed > 0 {
        eprintln!("Conformance FAILED: {failed} check(s) did not pass.");
        process::exit(1);
    }

    if !cli.json {
        println!("Conformance PASSED.");
    }
    Ok(())
}
