//! Causeway metamodel conformance suite.
//!
//! Loads a domain from descriptor files, builds its metamodel and runs the
//! post-build validators over it. Every validator contributes one result to
//! the [`ConformanceReport`], listing each problem it found.
//!
//! # Validators
//!
//! | Validator | Checks |
//! |-----------|--------|
//! | `title/strategy-conflict` | `@Title` members and a `title()` method on one type |
//! | `logical-type/unique` | logical type names shared between types |
//! | `logical-type/explicit` | managed types without a logical type name (opt-in) |
//! | `members/unique-ids` | member ids declared twice on one type |
//! | `members/orphaned-supporting-method` | supporting methods matching no member |
//! | `members/optional-primitive` | optional primitives |
//! | `layout/group-conflict` | field set ids with two names, blank field sets |
//! | `action/semantics-required` | actions without declared semantics (opt-in) |
//!
//! # Entry Point
//!
//! ```no_run
//! use causeway_conformance::{run_all, DomainPaths};
//! use std::path::PathBuf;
//!
//! let paths = DomainPaths {
//!     domain: PathBuf::from("domain"),
//!     config: Some(PathBuf::from("causeway.toml")),
//! };
//! let report = run_all(&paths).expect("Failed to run conformance");
//! assert!(report.all_passed());
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use causeway_metamodel::{
    Environment, MetaModel, MetaModelConfig, MetaModelValidator, SpecificationLoader, TypeRegistry,
};
use tracing::{debug, info};
use walkdir::WalkDir;

pub use report::{ConformanceReport, Severity, TestResult};

use validators::action::ActionSemanticsRequired;
use validators::layout::LayoutGroupConflicts;
use validators::logical_type::{ExplicitLogicalTypes, UniqueLogicalTypes};
use validators::members::{OptionalPrimitives, OrphanedSupportingMethods, UniqueMemberIds};
use validators::title::TitleStrategyConflict;

/// Paths required by the conformance runner.
#[derive(Debug, Clone)]
pub struct DomainPaths {
    /// A descriptor file, or a directory searched recursively for
    /// `*.toml` and `*.json` descriptor files.
    pub domain: PathBuf,
    /// Optional metamodel configuration file.
    pub config: Option<PathBuf>,
}

/// The validators enabled by `config`, in the order they run:
///
/// 1. Title strategy conflicts
/// 2. Unique logical type names
/// 3. Explicit logical type names (`validator.explicit-logical-type-names`)
/// 4. Unique member ids
/// 5. Orphaned supporting methods (unless `validator.allow-orphaned-supporting-methods`)
/// 6. Optional primitives
/// 7. Layout group conflicts
/// 8. Required action semantics (`validator.action-semantics-required`)
#[must_use]
pub fn default_validators(config: &MetaModelConfig) -> Vec<Box<dyn MetaModelValidator>> {
    let flags = &config.validator;
    let mut validators: Vec<Box<dyn MetaModelValidator>> = Vec::new();

    // 1. Title
    validators.push(Box::new(TitleStrategyConflict));

    // 2-3. Logical types
    validators.push(Box::new(UniqueLogicalTypes));
    if flags.explicit_logical_type_names {
        validators.push(Box::new(ExplicitLogicalTypes));
    }

    // 4-6. Members
    validators.push(Box::new(UniqueMemberIds));
    if !flags.allow_orphaned_supporting_methods {
        validators.push(Box::new(OrphanedSupportingMethods));
    }
    validators.push(Box::new(OptionalPrimitives));

    // 7. Layout
    validators.push(Box::new(LayoutGroupConflicts));

    // 8. Actions
    if flags.action_semantics_required {
        validators.push(Box::new(ActionSemanticsRequired));
    }

    validators
}

/// Reads the configuration file, or returns the defaults when none is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
pub fn load_config(path: Option<&Path>) -> Result<MetaModelConfig> {
    match path {
        Some(path) => MetaModelConfig::from_path(path)
            .with_context(|| format!("reading configuration {}", path.display())),
        None => Ok(MetaModelConfig::default()),
    }
}

/// Registers every descriptor file found under `domain`.
///
/// Files are visited in name order so that the registry, and with it the
/// metamodel, does not depend on directory listing order.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked or a descriptor file
/// cannot be read or parsed.
pub fn load_domain(domain: &Path) -> Result<TypeRegistry> {
    let mut registry = TypeRegistry::new();
    let mut files = 0usize;
    for entry in WalkDir::new(domain).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", domain.display()))?;
        let path = entry.path();
        let is_descriptor = path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json");
        if !entry.file_type().is_file() || !is_descriptor {
            continue;
        }
        let types = registry
            .register_file(path)
            .with_context(|| format!("loading descriptors from {}", path.display()))?;
        debug!(file = %path.display(), types, "registered descriptor file");
        files += 1;
    }
    info!(files, types = registry.len(), domain = %domain.display(), "domain loaded");
    Ok(registry)
}

/// Loads the domain and builds its metamodel with the default validators.
///
/// # Errors
///
/// Returns an error if the configuration or a descriptor file cannot be loaded.
pub fn build(paths: &DomainPaths) -> Result<MetaModel> {
    let config = load_config(paths.config.as_deref())?;
    let registry = load_domain(&paths.domain)?;
    let validators = default_validators(&config);
    Ok(SpecificationLoader::new(config)
        .with_validators(validators)
        .load(&registry))
}

/// One result per enabled validator, preceded by a summary of the build.
///
/// Outside production, problems are reported as warnings.
#[must_use]
pub fn report(metamodel: &MetaModel) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let members: usize = metamodel
        .specifications()
        .iter()
        .map(|s| s.members().count())
        .sum();
    report.push(TestResult::pass(
        "metamodel/build",
        format!(
            "{} types, {} members (v{})",
            metamodel.specifications().len(),
            members,
            metamodel.version()
        ),
    ));

    let tolerate = metamodel.config().environment != Environment::Production;
    for validator in default_validators(metamodel.config()) {
        report.push(TestResult::from_failures(
            validator.name(),
            metamodel.validation_failures(),
            tolerate,
        ));
    }
    report
}

/// Builds the metamodel and reports on it.
///
/// # Errors
///
/// Returns an error only if the configuration or the domain cannot be loaded.
pub fn run_all(paths: &DomainPaths) -> Result<ConformanceReport> {
    let metamodel = build(paths)?;
    Ok(report(&metamodel))
}
