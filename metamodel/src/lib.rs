//! Causeway metamodel facet engine.
//!
//! Domain types are registered as declarative [`TypeDescriptor`]s. A
//! [`SpecificationLoader`] introspects them once, running an ordered chain of
//! facet factories over every type, member and action parameter, and then the
//! registered validators over the finished model. The result is an immutable,
//! versioned [`MetaModel`] that viewers and persistence layers query.
//!
//! # Entry Point
//!
//! ```
//! use causeway_metamodel::descriptor::annotation::{Annotation, TitleAnnotation};
//! use causeway_metamodel::facet::TitleRenderRequest;
//! use causeway_metamodel::object::{ObjectRef, Record};
//! use causeway_metamodel::{
//!     MetaModelConfig, MethodDescriptor, SpecificationLoader, TypeDescriptor, TypeRegistry,
//!     ValueType,
//! };
//!
//! let registry = TypeRegistry::new().with(
//!     TypeDescriptor::new("demo.Customer").with_method(
//!         MethodDescriptor::new("getName", ValueType::String)
//!             .with_annotation(Annotation::Title(TitleAnnotation::default())),
//!     ),
//! );
//! let metamodel = SpecificationLoader::new(MetaModelConfig::default()).load(&registry);
//!
//! let ada = ObjectRef::new("demo.Customer", Record::new().with_value("getName", "Ada"));
//! assert_eq!(metamodel.title_of(&ada, &TitleRenderRequest::new()), "Ada");
//! ```
//!
//! # Hot reload
//!
//! [`MetaModelContext`] holds the current snapshot and swaps in a rebuilt one
//! atomically; readers keep whichever snapshot they already hold.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod facet;
pub mod factory;
pub mod identifier;
pub mod layout;
pub mod metamodel;
pub mod naming;
pub mod object;
pub mod sequence;
pub mod serializer;
pub mod specification;
pub mod validation;

pub use config::{Environment, IntrospectionPolicy, MetaModelConfig};
pub use context::MetaModelContext;
pub use descriptor::{
    MethodDescriptor, ParameterDescriptor, TypeDescriptor, TypeKind, TypeRegistry, ValueType,
};
pub use error::{InvocationError, MetaModelError, Recoverability, Result};
pub use facet::{Facet, FacetHolder, FacetKind, Precedence};
pub use factory::{FacetFactory, ProgrammingModel};
pub use identifier::{FeatureType, Identifier};
pub use metamodel::{Consent, MetaModel};
pub use object::{DomainObject, ObjectRef, Value};
pub use specification::{ActionParameter, ObjectMember, ObjectSpecification, SpecificationLoader};
pub use validation::{MetaModelValidator, ValidationFailure, ValidationFailures};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metamodel_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MetaModel>();
        assert_send_sync::<MetaModelContext>();
    }

    #[test]
    fn empty_registry_builds_an_empty_model() {
        let metamodel = SpecificationLoader::new(MetaModelConfig::default()).load(&TypeRegistry::new());
        assert!(metamodel.specifications().is_empty());
        assert!(metamodel.validation_failures().is_empty());
    }
}
