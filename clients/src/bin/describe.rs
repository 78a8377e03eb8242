//! `causeway-describe`: prints a domain's metamodel as JSON.
//!
//! **Usage:**
//! ```text
//! causeway-describe --domain <dir|file> [--config <toml>] [--output <file>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use causeway_clients::{init_logging, DomainArgs};
use causeway_conformance::build;
use causeway_metamodel::serializer;
use clap::Parser;
use tracing::info;

/// Describe a Causeway domain model.
#[derive(Parser)]
#[command(
    name = "causeway-describe",
    about = "Dump specifications, members and facets of a domain as JSON"
)]
struct Cli {
    #[command(flatten)]
    domain: DomainArgs,

    /// Write the dump to a file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.domain.log_level)?;

    let metamodel = build(&cli.domain.paths())?;
    let json = serializer::to_json(&metamodel).context("serializing the metamodel")?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), bytes = json.len(), "metamodel written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
