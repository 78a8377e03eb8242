//! Shared plumbing for the Causeway admin binaries.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use causeway_conformance::DomainPaths;
use clap::Args;

/// Arguments every binary accepts.
#[derive(Debug, Args)]
pub struct DomainArgs {
    /// Descriptor file, or directory searched for `*.toml` / `*.json` descriptors.
    #[arg(long)]
    pub domain: PathBuf,

    /// Metamodel configuration file (TOML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl DomainArgs {
    /// The paths handed to the conformance runner.
    #[must_use]
    pub fn paths(&self) -> DomainPaths {
        DomainPaths {
            domain: self.domain.clone(),
            config: self.config.clone(),
        }
    }
}

/// Installs a compact `tracing` subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence over `level`.
///
/// # Errors
///
/// Returns an error if `level` is not a valid filter directive.
pub fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        domain: DomainArgs,
    }

    #[test]
    fn domain_arguments_map_to_paths() {
        let parsed = Cli::try_parse_from(["test", "--domain", "dom", "--config", "causeway.toml"]);
        let Ok(cli) = parsed else {
            unreachable!("arguments are valid");
        };
        let paths = cli.domain.paths();
        assert_eq!(paths.domain, PathBuf::from("dom"));
        assert_eq!(paths.config, Some(PathBuf::from("causeway.toml")));
        assert_eq!(cli.domain.log_level, "warn");
    }

    #[test]
    fn domain_is_required() {
        assert!(Cli::try_parse_from(["test"]).is_err());
    }
}
