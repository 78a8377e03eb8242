//! Builds a [`MetaModel`] from a [`TypeRegistry`].
//!
//! For each registered type, in discovery order:
//!
//! 1. Resolve the type's methods across its hierarchy, dropping
//!    `@Programmatic` ones.
//! 2. Run the object factories.
//! 3. Discover properties and collections among the remaining accessors,
//!    then actions among what is left.
//! 4. Run the member factories on each member, then the parameter factories
//!    on each action parameter.
//! 5. Order members by their member-order sequence.
//!
//! Validators run once every type is built.

use std::cmp::Ordering;

use tracing::{debug, info};

use super::{ActionParameter, ObjectMember, ObjectSpecification};
use crate::config::{IntrospectionPolicy, MetaModelConfig};
use crate::descriptor::annotation::AnnotationLookup;
use crate::descriptor::{MethodDescriptor, TypeDescriptor, TypeRegistry};
use crate::facet::{FacetHolder, MemberOrderFacet};
use crate::factory::conventions::{accessor_member_id, is_supporting_method};
use crate::factory::{MethodContext, MethodRemover, ObjectContext, ParameterContext, ProgrammingModel};
use crate::identifier::{FeatureType, Identifier};
use crate::metamodel::MetaModel;
use crate::sequence::compare_sequences;
use crate::validation::{MetaModelValidator, ValidationFailures};

/// Introspects registered types into object specifications.
pub struct SpecificationLoader {
    config: MetaModelConfig,
    programming_model: ProgrammingModel,
    validators: Vec<Box<dyn MetaModelValidator>>,
}

impl SpecificationLoader {
    /// A loader with the default factory chain and no validators.
    #[must_use]
    pub fn new(config: MetaModelConfig) -> Self {
        let programming_model = ProgrammingModel::default_chain(&config);
        Self {
            config,
            programming_model,
            validators: Vec::new(),
        }
    }

    /// Replaces the factory chain.
    #[must_use]
    pub fn with_programming_model(mut self, programming_model: ProgrammingModel) -> Self {
        self.programming_model = programming_model;
        self
    }

    /// Appends a validator.
    #[must_use]
    pub fn with_validator(mut self, validator: impl MetaModelValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Appends validators, keeping their order.
    #[must_use]
    pub fn with_validators(mut self, validators: Vec<Box<dyn MetaModelValidator>>) -> Self {
        self.validators.extend(validators);
        self
    }

    /// The configuration every build uses.
    #[must_use]
    pub fn config(&self) -> &MetaModelConfig {
        &self.config
    }

    /// The factory chain.
    #[must_use]
    pub fn programming_model(&self) -> &ProgrammingModel {
        &self.programming_model
    }

    /// Builds version 1 of the metamodel.
    #[must_use]
    pub fn load(&self, registry: &TypeRegistry) -> MetaModel {
        self.load_version(registry, 1)
    }

    /// Builds the metamodel and stamps it with `version`.
    #[must_use]
    pub fn load_version(&self, registry: &TypeRegistry, version: u64) -> MetaModel {
        let specifications: Vec<ObjectSpecification> = registry
            .types()
            .map(|descriptor| self.introspect(registry, descriptor))
            .collect();
        let mut metamodel = MetaModel::new(specifications, version, self.config.clone());

        let mut failures = ValidationFailures::new();
        for validator in &self.validators {
            let before = failures.len();
            validator.validate(&metamodel, &mut failures);
            debug!(
                validator = validator.name(),
                failures = failures.len() - before,
                "validator finished"
            );
        }
        metamodel.set_validation_failures(failures);

        info!(
            version,
            types = metamodel.specifications().len(),
            members = metamodel.specifications().iter().map(|s| s.members().count()).sum::<usize>(),
            failures = metamodel.validation_failures().len(),
            "metamodel built"
        );
        metamodel
    }

    /// Introspects a single type.
    #[must_use]
    pub fn introspect(&self, registry: &TypeRegistry, descriptor: &TypeDescriptor) -> ObjectSpecification {
        let methods: Vec<MethodDescriptor> = registry
            .resolved_methods(&descriptor.type_name)
            .into_iter()
            .filter(|m| !m.annotations.is_programmatic())
            .collect();
        let mut remover = MethodRemover::new(methods.clone());
        let mut holder = FacetHolder::new(
            Identifier::type_identifier(descriptor.logical_type_name()),
            FeatureType::Object,
        );

        for factory in self.programming_model.for_feature(FeatureType::Object) {
            factory.process_object(&mut ObjectContext {
                descriptor,
                methods: &methods,
                remover: &mut remover,
                holder: &mut holder,
                config: &self.config,
            });
        }

        let annotation_required =
            self.config.introspection.policy == IntrospectionPolicy::AnnotationRequired;
        let accessors = remover.take_where(|m| is_accessor(m, annotation_required));
        let action_methods = remover.take_where(|m| is_action(m, annotation_required));

        let mut properties = Vec::new();
        let mut collections = Vec::new();
        for method in accessors {
            let Some(id) = accessor_member_id(&method) else {
                continue;
            };
            let feature_type = if method.returns.is_collection() {
                FeatureType::Collection
            } else {
                FeatureType::Property
            };
            let member = self.member(descriptor, &holder, &mut remover, method, id, feature_type);
            match feature_type {
                FeatureType::Collection => collections.push(member),
                _ => properties.push(member),
            }
        }
        let mut actions: Vec<ObjectMember> = action_methods
            .into_iter()
            .map(|method| {
                let id = method.name.clone();
                self.member(descriptor, &holder, &mut remover, method, id, FeatureType::Action)
            })
            .collect();

        for members in [&mut properties, &mut collections, &mut actions] {
            members.sort_by(by_member_order);
        }

        let unclaimed_methods = remover.into_remaining();
        debug!(
            logical_type = holder.identifier().logical_type(),
            properties = properties.len(),
            collections = collections.len(),
            actions = actions.len(),
            unclaimed = unclaimed_methods.len(),
            "type introspected"
        );

        ObjectSpecification {
            descriptor: descriptor.clone(),
            holder,
            properties,
            collections,
            actions,
            methods,
            unclaimed_methods,
        }
    }

    fn member(
        &self,
        descriptor: &TypeDescriptor,
        object: &FacetHolder,
        remover: &mut MethodRemover,
        method: MethodDescriptor,
        id: String,
        feature_type: FeatureType,
    ) -> ObjectMember {
        let mut holder = FacetHolder::new(object.identifier().member(id.as_str()), feature_type);
        for factory in self.programming_model.for_feature(feature_type) {
            factory.process_method(&mut MethodContext {
                descriptor,
                method: &method,
                member_id: &id,
                feature_type,
                object,
                remover: &mut *remover,
                holder: &mut holder,
                config: &self.config,
            });
        }

        let mut parameters = Vec::new();
        if feature_type == FeatureType::Action {
            for (index, parameter) in method.parameters.iter().enumerate() {
                let mut parameter_holder = FacetHolder::new(
                    holder.identifier().parameter(index),
                    FeatureType::ActionParameter,
                );
                for factory in self.programming_model.for_feature(FeatureType::ActionParameter) {
                    factory.process_parameter(&mut ParameterContext {
                        descriptor,
                        method: &method,
                        member_id: &id,
                        index,
                        parameter,
                        remover: &mut *remover,
                        holder: &mut parameter_holder,
                        config: &self.config,
                    });
                }
                parameters.push(ActionParameter {
                    holder: parameter_holder,
                    descriptor: parameter.clone(),
                    index,
                });
            }
        }

        ObjectMember {
            id,
            holder,
            method,
            parameters,
        }
    }
}

impl std::fmt::Debug for SpecificationLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpecificationLoader")
            .field("config", &self.config)
            .field("programming_model", &self.programming_model)
            .field(
                "validators",
                &self.validators.iter().map(|v| v.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

fn is_accessor(method: &MethodDescriptor, annotation_required: bool) -> bool {
    if method.annotations.action().is_some() || accessor_member_id(method).is_none() {
        return false;
    }
    !annotation_required
        || method.annotations.property().is_some()
        || method.annotations.collection().is_some()
}

fn is_action(method: &MethodDescriptor, annotation_required: bool) -> bool {
    if method.annotations.action().is_some() {
        return true;
    }
    !annotation_required && !is_supporting_method(&method.name)
}

/// Members with a sequence come first, in dewey order; the rest keep their
/// discovery order.
fn by_member_order(a: &ObjectMember, b: &ObjectMember) -> Ordering {
    let sequence = |m: &ObjectMember| {
        m.holder
            .lookup::<MemberOrderFacet>()
            .map(|order| order.sequence.clone())
    };
    match (sequence(a), sequence(b)) {
        (Some(x), Some(y)) => compare_sequences(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::annotation::{
        Annotation, PropertyAnnotation, PropertyLayoutAnnotation, TitleAnnotation,
    };
    use crate::descriptor::{ParameterDescriptor, ValueType};
    use crate::facet::{FacetKind, TitleFacet};

    fn customer() -> TypeDescriptor {
        TypeDescriptor::new("demo.Customer")
            .with_method(
                MethodDescriptor::new("getLastName", ValueType::String)
                    .with_annotation(Annotation::Title(TitleAnnotation::default()))
                    .with_annotation(Annotation::PropertyLayout(PropertyLayoutAnnotation {
                        sequence: Some("2".into()),
                        ..PropertyLayoutAnnotation::default()
                    })),
            )
            .with_method(
                MethodDescriptor::new("setLastName", ValueType::Void)
                    .with_parameter(ParameterDescriptor::new("name", ValueType::String)),
            )
            .with_method(
                MethodDescriptor::new("getFirstName", ValueType::String).with_annotation(
                    Annotation::PropertyLayout(PropertyLayoutAnnotation {
                        sequence: Some("1".into()),
                        ..PropertyLayoutAnnotation::default()
                    }),
                ),
            )
            .with_method(MethodDescriptor::new(
                "getOrders",
                ValueType::Collection(Box::new(ValueType::Reference("demo.Order".into()))),
            ))
            .with_method(
                MethodDescriptor::new("placeOrder", ValueType::Reference("demo.Order".into()))
                    .with_parameter(ParameterDescriptor::new("product", ValueType::String)),
            )
            .with_method(MethodDescriptor::new("hidePlaceOrder", ValueType::Boolean))
            .with_method(MethodDescriptor::new("validateNothing", ValueType::String))
            .with_method(
                MethodDescriptor::new("internalHelper", ValueType::Void)
                    .with_annotation(Annotation::Programmatic),
            )
    }

    #[test]
    fn discovers_members_in_member_order() {
        let registry = TypeRegistry::new().with(customer());
        let metamodel = SpecificationLoader::new(MetaModelConfig::default()).load(&registry);
        let Some(spec) = metamodel.specification("demo.Customer") else {
            unreachable!("customer is registered");
        };

        let properties: Vec<&str> = spec.properties().iter().map(ObjectMember::id).collect();
        assert_eq!(properties, vec!["firstName", "lastName"]);
        assert_eq!(spec.collections().len(), 1);
        let actions: Vec<&str> = spec.actions().iter().map(ObjectMember::id).collect();
        assert_eq!(actions, vec!["placeOrder"]);
        assert_eq!(spec.actions()[0].parameters().len(), 1);

        let unclaimed: Vec<&str> = spec.unclaimed_methods().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(unclaimed, vec!["validateNothing"]);
        assert!(spec.methods().iter().all(|m| m.name != "internalHelper"));
    }

    #[test]
    fn supporting_methods_attach_to_their_members() {
        let registry = TypeRegistry::new().with(customer());
        let metamodel = SpecificationLoader::new(MetaModelConfig::default()).load(&registry);
        let spec = metamodel.specification("demo.Customer");
        let place_order = spec.and_then(|s| s.member("placeOrder"));
        assert!(place_order.is_some_and(|m| m.holder().has_facet(FacetKind::HideForContext)));
        let last_name = spec.and_then(|s| s.member("lastName"));
        assert!(last_name.is_some_and(|m| m.holder().has_facet(FacetKind::PropertySetter)));
        assert!(matches!(
            spec.and_then(|s| s.holder().lookup::<TitleFacet>()),
            Some(TitleFacet::Components { .. })
        ));
    }

    #[test]
    fn annotation_required_policy_limits_members() {
        let descriptor = TypeDescriptor::new("demo.Strict")
            .with_method(MethodDescriptor::new("getHidden", ValueType::String))
            .with_method(
                MethodDescriptor::new("getShown", ValueType::String)
                    .with_annotation(Annotation::Property(PropertyAnnotation::default())),
            )
            .with_method(MethodDescriptor::new("doSomething", ValueType::Void));
        let mut config = MetaModelConfig::default();
        config.introspection.policy = IntrospectionPolicy::AnnotationRequired;
        let registry = TypeRegistry::new().with(descriptor);
        let metamodel = SpecificationLoader::new(config).load(&registry);
        let Some(spec) = metamodel.specification("demo.Strict") else {
            unreachable!("strict is registered");
        };
        let members: Vec<&str> = spec.members().map(ObjectMember::id).collect();
        assert_eq!(members, vec!["shown"]);
        assert_eq!(spec.unclaimed_methods().len(), 2);
    }

    #[test]
    fn load_version_stamps_the_snapshot() {
        let loader = SpecificationLoader::new(MetaModelConfig::default());
        let metamodel = loader.load_version(&TypeRegistry::new(), 7);
        assert_eq!(metamodel.version(), 7);
        assert!(metamodel.specifications().is_empty());
    }
}
