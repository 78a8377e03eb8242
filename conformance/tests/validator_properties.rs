//! Property-based tests for the cross-type validators.

use std::collections::HashSet;

use causeway_conformance::validators::logical_type::UniqueLogicalTypes;
use causeway_conformance::validators::members::OrphanedSupportingMethods;
use causeway_metamodel::descriptor::annotation::{Annotation, DomainObjectAnnotation};
use causeway_metamodel::{
    MetaModel, MetaModelConfig, MetaModelValidator, MethodDescriptor, SpecificationLoader,
    TypeDescriptor, TypeRegistry, ValueType,
};
use proptest::prelude::*;

fn with_logical_type(type_name: String, logical_type: &str) -> TypeDescriptor {
    TypeDescriptor::new(type_name).with_annotation(Annotation::DomainObject(
        DomainObjectAnnotation {
            logical_type_name: Some(logical_type.to_owned()),
            ..DomainObjectAnnotation::default()
        },
    ))
}

fn build(registry: &TypeRegistry, validator: impl MetaModelValidator + 'static) -> MetaModel {
    SpecificationLoader::new(MetaModelConfig::default())
        .with_validator(validator)
        .load(registry)
}

// =============================================================================
// Logical type uniqueness
// =============================================================================

proptest! {
    /// Every type beyond the first to claim a logical type name is reported,
    /// and nothing else is.
    #[test]
    fn prop_one_failure_per_reused_logical_type(
        logical_types in prop::collection::vec("[a-d]", 0..12)
    ) {
        let mut registry = TypeRegistry::new();
        for (i, logical_type) in logical_types.iter().enumerate() {
            registry.register(with_logical_type(format!("demo.T{i:02}"), logical_type));
        }
        let distinct: HashSet<&String> = logical_types.iter().collect();

        let metamodel = build(&registry, UniqueLogicalTypes);
        prop_assert_eq!(
            metamodel.validation_failures().len(),
            logical_types.len() - distinct.len()
        );
    }
}

// =============================================================================
// Orphaned supporting methods
// =============================================================================

proptest! {
    /// A `hideXxx` method is an orphan exactly when no property `xxx` exists.
    #[test]
    fn prop_hide_methods_orphaned_without_their_property(
        properties in prop::collection::btree_set("[A-E]", 0..5),
        hidden in prop::collection::btree_set("[A-E]", 0..5),
    ) {
        let mut descriptor = TypeDescriptor::new("demo.Customer");
        for property in &properties {
            descriptor = descriptor
                .with_method(MethodDescriptor::new(format!("get{property}"), ValueType::String));
        }
        for member in &hidden {
            descriptor = descriptor
                .with_method(MethodDescriptor::new(format!("hide{member}"), ValueType::Boolean));
        }
        let registry = TypeRegistry::new().with(descriptor);

        let metamodel = build(&registry, OrphanedSupportingMethods);
        prop_assert_eq!(
            metamodel.validation_failures().len(),
            hidden.difference(&properties).count()
        );
    }
}
