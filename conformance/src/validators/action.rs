//! Action semantics validator.

use causeway_metamodel::{FacetKind, MetaModel, MetaModelValidator, Precedence, ValidationFailures};

/// Reports actions whose semantics fell back to the framework default.
///
/// Only registered when `validator.action-semantics-required` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionSemanticsRequired;

impl ActionSemanticsRequired {
    /// Validator name.
    pub const NAME: &'static str = "action/semantics-required";
}

impl MetaModelValidator for ActionSemanticsRequired {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, metamodel: &MetaModel, failures: &mut ValidationFailures) {
        for action in metamodel.specifications().iter().flat_map(|s| s.actions()) {
            let explicit = action
                .holder()
                .facet(FacetKind::ActionSemantics)
                .is_some_and(|f| f.precedence() >= Precedence::Explicit);
            if !explicit {
                failures.add(
                    action.identifier().clone(),
                    Self::NAME,
                    "{} does not declare its semantics",
                    vec![action.identifier().to_string()],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use causeway_metamodel::MetaModelConfig;

    use super::*;
    use crate::validators::testing::{messages, run};

    #[test]
    fn actions_without_declared_semantics_are_reported() {
        let domain = r#"
[[type]]
type-name = "demo.Customer"

[[type.methods]]
name = "placeOrder"
returns = "void"

[[type.methods.annotations]]
annotation = "action"
semantics = "non-idempotent"

[[type.methods]]
name = "archive"
returns = "void"
"#;
        let metamodel = run(domain, MetaModelConfig::default(), ActionSemanticsRequired);
        assert_eq!(
            messages(&metamodel),
            vec!["demo.Customer#archive does not declare its semantics"]
        );
    }
}
