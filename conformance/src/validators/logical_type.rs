//! Logical type name validators.
//!
//! Logical type names identify types across persistence, REST and security
//! configuration, so they must be unique and, when configured, declared.

use std::collections::HashMap;

use causeway_metamodel::facet::NatureFacet;
use causeway_metamodel::{MetaModel, MetaModelValidator, ValidationFailures};

/// Reports specifications that share a logical type name.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueLogicalTypes;

impl UniqueLogicalTypes {
    /// Validator name.
    pub const NAME: &'static str = "logical-type/unique";
}

impl MetaModelValidator for UniqueLogicalTypes {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, metamodel: &MetaModel, failures: &mut ValidationFailures) {
        let mut first_use: HashMap<&str, &str> = HashMap::new();
        for spec in metamodel.specifications() {
            let type_name = spec.descriptor().type_name.as_str();
            match first_use.get(spec.logical_type_name()) {
                Some(owner) => failures.add(
                    spec.identifier().clone(),
                    Self::NAME,
                    "{} reuses logical type name {} already used by {}",
                    vec![
                        type_name.to_owned(),
                        spec.logical_type_name().to_owned(),
                        (*owner).to_owned(),
                    ],
                ),
                None => {
                    first_use.insert(spec.logical_type_name(), type_name);
                }
            }
        }
    }
}

/// Reports entities and view models relying on their type name.
///
/// Only registered when `validator.explicit-logical-type-names` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitLogicalTypes;

impl ExplicitLogicalTypes {
    /// Validator name.
    pub const NAME: &'static str = "logical-type/explicit";
}

impl MetaModelValidator for ExplicitLogicalTypes {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, metamodel: &MetaModel, failures: &mut ValidationFailures) {
        for spec in metamodel.specifications() {
            let Some(nature) = spec.holder().lookup::<NatureFacet>().map(|n| n.nature) else {
                continue;
            };
            if nature.is_managed() && spec.descriptor().explicit_logical_type_name().is_none() {
                failures.add(
                    spec.identifier().clone(),
                    Self::NAME,
                    "{} is managed but declares no logical type name",
                    vec![spec.descriptor().type_name.clone()],
                );
            }
        }
    }
}
