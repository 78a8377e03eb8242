//! Layout group validator.

use std::collections::HashMap;

use causeway_metamodel::descriptor::annotation::AnnotationLookup;
use causeway_metamodel::facet::LayoutGroupFacet;
use causeway_metamodel::layout::GroupIdAndName;
use causeway_metamodel::{MetaModel, MetaModelValidator, ObjectMember, ValidationFailures};

/// Reports field sets whose id is used with two different names on one type,
/// and field set declarations that give neither an id nor a name.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutGroupConflicts;

impl LayoutGroupConflicts {
    /// Validator name.
    pub const NAME: &'static str = "layout/group-conflict";
}

/// The raw field set id and name declared on a member, if it declares one.
fn declared_field_set(member: &ObjectMember) -> Option<(Option<&str>, Option<&str>)> {
    let annotations = &member.method().annotations;
    let declared = match annotations.property_layout() {
        Some(layout) => (layout.field_set_id.as_deref(), layout.field_set_name.as_deref()),
        None => annotations
            .action_layout()
            .map(|layout| (layout.field_set_id.as_deref(), layout.field_set_name.as_deref()))?,
    };
    (declared.0.is_some() || declared.1.is_some()).then_some(declared)
}

impl MetaModelValidator for LayoutGroupConflicts {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn validate(&self, metamodel: &MetaModel, failures: &mut ValidationFailures) {
        for spec in metamodel.specifications() {
            let mut names: HashMap<&str, &str> = HashMap::new();
            for member in spec.members() {
                if let Some((id, name)) = declared_field_set(member) {
                    if GroupIdAndName::infer(id, name).is_none() {
                        failures.add(
                            member.identifier().clone(),
                            Self::NAME,
                            "{} declares a layout group with neither id nor name",
                            vec![member.identifier().to_string()],
                        );
                    }
                }

                let Some(group) = member.holder().lookup::<LayoutGroupFacet>().map(|g| &g.group)
                else {
                    continue;
                };
                match names.get(group.id()) {
                    Some(first) if *first != group.name() => failures.add(
                        member.identifier().clone(),
                        Self::NAME,
                        "layout group {} is named both {} and {} on {}",
                        vec![
                            group.id().to_owned(),
                            (*first).to_owned(),
                            group.name().to_owned(),
                            spec.logical_type_name().to_owned(),
                        ],
                    ),
                    Some(_) => {}
                    None => {
                        names.insert(group.id(), group.name());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use causeway_metamodel::MetaModelConfig;

    use super::*;
    use crate::validators::testing::{messages, run};

    const DOMAIN: &str = r#"
[[type]]
type-name = "demo.Customer"

[[type.methods]]
name = "getEmail"
returns = "string"

[[type.methods.annotations]]
annotation = "property-layout"
sequence = "1"
field-set-id = "contact"
field-set-name = "Contact"

[[type.methods]]
name = "getPhone"
returns = "string"

[[type.methods.annotations]]
annotation = "property-layout"
sequence = "2"
field-set-id = "contact"
field-set-name = "Contact Details"

[[type.methods]]
name = "getFax"
returns = "string"

[[type.methods.annotations]]
annotation = "property-layout"
sequence = "3"
field-set-name = "Contact"

[[type.methods]]
name = "getNotes"
returns = "string"

[[type.methods.annotations]]
annotation = "property-layout"
sequence = "4"
field-set-id = "  "
"#;

    #[test]
    fn conflicting_names_and_blank_groups_are_reported() {
        let metamodel = run(DOMAIN, MetaModelConfig::default(), LayoutGroupConflicts);
        assert_eq!(
            messages(&metamodel),
            vec![
                "layout group contact is named both Contact and Contact Details on demo.Customer",
                "demo.Customer#notes declares a layout group with neither id nor name",
            ]
        );
    }
}
