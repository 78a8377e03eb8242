//! Metamodel configuration.
//!
//! Loaded from TOML; every key is optional and defaults to the framework's
//! out-of-the-box behaviour.
//!
//! ```toml
//! environment = "prototyping"
//!
//! [introspection]
//! policy = "annotation-required"
//!
//! [domain-object]
//! editing = true
//!
//! [[action-layout.css-class-fa-patterns]]
//! pattern = "archive.*"
//! value = "fa-archive"
//!
//! [validator]
//! action-semantics-required = true
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Deployment environment; decides how validation failures and title
/// failures are surfaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Environment {
    /// Validation failures abort bootstrap.
    #[default]
    Production,
    /// Validation failures are logged and tolerated; prototype-only actions are visible.
    Prototyping,
    /// Like prototyping, without warning logs for failed titles.
    UnitTesting,
}

impl Environment {
    /// Returns true for prototyping and unit testing.
    #[must_use]
    pub fn is_prototyping(self) -> bool {
        !matches!(self, Environment::Production)
    }

    /// Returns true for unit testing.
    #[must_use]
    pub fn is_unit_testing(self) -> bool {
        matches!(self, Environment::UnitTesting)
    }
}

/// Which methods are introspected as members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntrospectionPolicy {
    /// Accessors and public methods become members by convention.
    #[default]
    AnnotationOptional,
    /// Only methods annotated `@Property`, `@Collection` or `@Action` become members.
    AnnotationRequired,
}

/// `[introspection]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IntrospectionConfig {
    /// Member introspection policy.
    pub policy: IntrospectionPolicy,
}

/// `[domain-object]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DomainObjectConfig {
    /// Whether properties are editable unless declared otherwise.
    pub editing: bool,
}

/// Maps member names matching `pattern` (in full) to `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMapping {
    /// Regular expression over the member id.
    pub pattern: String,
    /// Value applied on match.
    pub value: String,
}

impl PatternMapping {
    /// Creates a mapping.
    pub fn new(pattern: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            value: value.into(),
        }
    }
}

/// `[action-layout]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ActionLayoutConfig {
    /// Ordered css-class patterns; the first match wins.
    pub css_class_patterns: Vec<PatternMapping>,
    /// Ordered font-awesome patterns; the first match wins.
    pub css_class_fa_patterns: Vec<PatternMapping>,
}

impl Default for ActionLayoutConfig {
    fn default() -> Self {
        Self {
            css_class_patterns: vec![PatternMapping::new("delete.*", "btn-danger")],
            css_class_fa_patterns: [
                ("new.*", "fa-plus"),
                ("add.*", "fa-plus-square"),
                ("create.*", "fa-plus"),
                ("update.*", "fa-edit"),
                ("change.*", "fa-edit"),
                ("delete.*", "fa-trash"),
                ("remove.*", "fa-minus-square"),
                ("find.*", "fa-search"),
                ("search.*", "fa-search"),
                ("list.*", "fa-list"),
                ("all.*", "fa-list"),
                ("download.*", "fa-download"),
                ("upload.*", "fa-upload"),
                ("approve.*", "fa-thumbs-o-up"),
                ("decline.*", "fa-thumbs-o-down"),
            ]
            .into_iter()
            .map(|(pattern, value)| PatternMapping::new(pattern, value))
            .collect(),
        }
    }
}

/// `[collection-layout]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CollectionLayoutConfig {
    /// Default page size of collections.
    pub paged: usize,
}

impl Default for CollectionLayoutConfig {
    fn default() -> Self {
        Self { paged: 12 }
    }
}

/// `[validator]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ValidatorConfig {
    /// Entities and view models must declare a logical type name.
    pub explicit_logical_type_names: bool,
    /// Actions must declare their semantics.
    pub action_semantics_required: bool,
    /// Tolerate supporting methods that match no member.
    pub allow_orphaned_supporting_methods: bool,
}

/// Root of the metamodel configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MetaModelConfig {
    /// Deployment environment.
    pub environment: Environment,
    /// `[introspection]`.
    pub introspection: IntrospectionConfig,
    /// `[domain-object]`.
    pub domain_object: DomainObjectConfig,
    /// `[action-layout]`.
    pub action_layout: ActionLayoutConfig,
    /// `[collection-layout]`.
    pub collection_layout: CollectionLayoutConfig,
    /// `[validator]`.
    pub validator: ValidatorConfig,
}

impl MetaModelConfig {
    /// Parses a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`MetaModelError::Config`](crate::MetaModelError::Config) if the
    /// document does not parse.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Default configuration for the given environment.
    #[must_use]
    pub fn for_environment(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }
}
