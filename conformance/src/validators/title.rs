//! Title strategy validator.
//!
//! `@Title` components take precedence over a conventional `title()` method,
//! so declaring both leaves the method silently unused. The conflict is
//! reported once per type.

use causeway_metamodel::descriptor::annotation::AnnotationLookup;
use causeway_metamodel::factory::conventions::TITLE_METHOD;
use causeway_metamodel::{
    MetaModel, MetaModelValidator, MethodDescriptor, ObjectSpecification, ValidationFailures,
};

/// Reports types that declare both `@Title` members and a `title()` method.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleStrategyConflict;

impl TitleStrategyConflict {
    /// Validator name.
    pub const NAME: &'static str = "title/strategy-conflict";
}

fn is_title_method(method: &MethodDescriptor) -> bool {
    method.name == TITLE_METHOD && method.param_count() == 0 && !method.returns.is_void()
}

fn has_conflict(spec: &ObjectSpecification) -> bool {
    let annotated = spec.methods().iter().any(|m| m.annotations.title().is_some());
    annotated && spec.methods().iter().any(is_title_method)
}

impl MetaModelValidator for TitleStrategyConflict {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, metamodel: &MetaModel, failures: &mut ValidationFailures) {
        for spec in metamodel.specifications().iter().filter(|s| has_conflict(s)) {
            failures.add(
                spec.identifier().clone(),
                Self::NAME,
                "{} declares @Title members and a {}() method; the method is ignored",
                vec![spec.logical_type_name().to_owned(), TITLE_METHOD.to_owned()],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use causeway_metamodel::MetaModelConfig;

    use super::*;
    use crate::validators::testing::{messages, run};

    const CONFLICTING: &str = r#"
[[type]]
type-name = "demo.Titled"

[[type.methods]]
name = "getFirst"
returns = "string"

[[type.methods.annotations]]
annotation = "title"
sequence = "1"

[[type.methods]]
name = "getSecond"
returns = "string"

[[type.methods.annotations]]
annotation = "title"
sequence = "2"

[[type.methods]]
name = "title"
returns = "string"
"#;

    #[test]
    fn both_strategies_yield_exactly_one_failure() {
        let metamodel = run(CONFLICTING, MetaModelConfig::default(), TitleStrategyConflict);
        assert_eq!(
            messages(&metamodel),
            vec!["demo.Titled declares @Title members and a title() method; the method is ignored"]
        );
    }

    #[test]
    fn a_single_strategy_is_fine() {
        let domain = r#"
[[type]]
type-name = "demo.Plain"

[[type.methods]]
name = "title"
returns = "string"
"#;
        let metamodel = run(domain, MetaModelConfig::default(), TitleStrategyConflict);
        assert!(metamodel.validation_failures().is_empty());
    }
}
