//! Member validators: identity, leftover supporting methods and optionality.

use std::collections::{HashMap, HashSet};

use causeway_metamodel::descriptor::annotation::{AnnotationLookup, Optionality};
use causeway_metamodel::factory::conventions::is_supporting_method;
use causeway_metamodel::{MetaModel, MetaModelValidator, ValidationFailures};

/// Reports member ids declared more than once on a type.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniqueMemberIds;

impl UniqueMemberIds {
    /// Validator name.
    pub const NAME: &'static str = "members/unique-ids";
}

impl MetaModelValidator for UniqueMemberIds {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, metamodel: &MetaModel, failures: &mut ValidationFailures) {
        for spec in metamodel.specifications() {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for member in spec.members() {
                *counts.entry(member.id()).or_default() += 1;
            }
            let mut reported = HashSet::new();
            for member in spec.members() {
                let count = counts.get(member.id()).copied().unwrap_or_default();
                if count > 1 && reported.insert(member.id()) {
                    failures.add(
                        member.identifier().clone(),
                        Self::NAME,
                        "member id {} is declared {} times on {}",
                        vec![
                            member.id().to_owned(),
                            count.to_string(),
                            spec.logical_type_name().to_owned(),
                        ],
                    );
                }
            }
        }
    }
}

/// Reports supporting methods that no member claimed, usually a typo in the
/// member name (`hideNmae`).
///
/// Not registered when `validator.allow-orphaned-supporting-methods` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrphanedSupportingMethods;

impl OrphanedSupportingMethods {
    /// Validator name.
    pub const NAME: &'static str = "members/orphaned-supporting-method";
}

impl MetaModelValidator for OrphanedSupportingMethods {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, metamodel: &MetaModel, failures: &mut ValidationFailures) {
        for spec in metamodel.specifications() {
            for method in spec.unclaimed_methods() {
                if is_supporting_method(&method.name) {
                    failures.add(
                        spec.identifier().clone(),
                        Self::NAME,
                        "supporting method {} matches no member of {}",
                        vec![method.name.clone(), spec.logical_type_name().to_owned()],
                    );
                }
            }
        }
    }
}

/// Reports primitive properties and parameters annotated as optional.
/// A primitive can never hold null, so the annotation cannot be honoured.
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionalPrimitives;

impl OptionalPrimitives {
    /// Validator name.
    pub const NAME: &'static str = "members/optional-primitive";

    const MESSAGE: &'static str = "{} is primitive and cannot be optional";
}

fn is_optional(optionality: Option<Optionality>) -> bool {
    optionality == Some(Optionality::Optional)
}

impl MetaModelValidator for OptionalPrimitives {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, metamodel: &MetaModel, failures: &mut ValidationFailures) {
        for spec in metamodel.specifications() {
            for property in spec.properties() {
                let method = property.method();
                let optional = is_optional(method.annotations.property().map(|p| p.optionality));
                if optional && method.returns.is_primitive() {
                    failures.add(
                        property.identifier().clone(),
                        Self::NAME,
                        Self::MESSAGE,
                        vec![property.identifier().to_string()],
                    );
                }
            }
            for parameter in spec.actions().iter().flat_map(|a| a.parameters()) {
                let descriptor = parameter.descriptor();
                let optional = is_optional(descriptor.annotations.parameter().map(|p| p.optionality));
                if optional && descriptor.value_type.is_primitive() {
                    let origin = parameter.holder().identifier();
                    failures.add(
                        origin.clone(),
                        Self::NAME,
                        Self::MESSAGE,
                        vec![origin.to_string()],
                    );
                }
            }
        }
    }
}
