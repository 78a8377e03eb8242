//! The facet factory chain.
//!
//! Each factory is a small, single-purpose policy: it inspects one program
//! element (a type, a member's method or an action parameter) and offers
//! facets to that element's holder. Factories never fail; malformed metadata
//! is logged at `debug` and produces no facet, and anything structurally
//! wrong is left for the validators to report.
//!
//! [`ProgrammingModel::default_chain`] registers the standard factories in a
//! fixed order. Explicit annotations beat conventions through
//! [`Precedence`](crate::facet::Precedence), not through their position in
//! the chain.

pub mod conventions;
pub mod member;
pub mod object;
pub mod parameter;
pub mod support;
pub mod title;

use crate::config::MetaModelConfig;
use crate::descriptor::{MethodDescriptor, ParameterDescriptor, TypeDescriptor};
use crate::facet::FacetHolder;
use crate::identifier::FeatureType;

/// Methods of a type not yet claimed by a member or factory.
///
/// Claiming a method removes it, so one method is never interpreted twice
/// (say, as both a title method and an action).
#[derive(Debug, Clone, Default)]
pub struct MethodRemover {
    methods: Vec<MethodDescriptor>,
}

impl MethodRemover {
    /// Starts with every method unclaimed.
    #[must_use]
    pub fn new(methods: Vec<MethodDescriptor>) -> Self {
        Self { methods }
    }

    /// An unclaimed method by name, optionally with a given parameter count.
    #[must_use]
    pub fn find(&self, name: &str, param_count: Option<usize>) -> Option<&MethodDescriptor> {
        self.methods
            .iter()
            .find(|m| m.name == name && param_count.map_or(true, |n| m.param_count() == n))
    }

    /// Claims a method by name and parameter count.
    pub fn take(&mut self, name: &str, param_count: usize) -> Option<MethodDescriptor> {
        let at = self
            .methods
            .iter()
            .position(|m| m.name == name && m.param_count() == param_count)?;
        Some(self.methods.remove(at))
    }

    /// Claims every method matching `predicate`, in declaration order.
    pub fn take_where<F>(&mut self, mut predicate: F) -> Vec<MethodDescriptor>
    where
        F: FnMut(&MethodDescriptor) -> bool,
    {
        let (taken, kept) = std::mem::take(&mut self.methods)
            .into_iter()
            .partition(|m| predicate(m));
        self.methods = kept;
        taken
    }

    /// Returns true if a method of that name is still unclaimed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name == name)
    }

    /// Unclaimed methods.
    #[must_use]
    pub fn remaining(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Consumes the remover, returning what is still unclaimed.
    #[must_use]
    pub fn into_remaining(self) -> Vec<MethodDescriptor> {
        self.methods
    }
}

/// What an object-level factory sees.
pub struct ObjectContext<'a> {
    /// The type being introspected.
    pub descriptor: &'a TypeDescriptor,
    /// Every introspectable method of the type, claimed or not.
    pub methods: &'a [MethodDescriptor],
    /// Methods not yet claimed.
    pub remover: &'a mut MethodRemover,
    /// The type's holder.
    pub holder: &'a mut FacetHolder,
    /// Metamodel configuration.
    pub config: &'a MetaModelConfig,
}

/// What a member-level factory sees.
pub struct MethodContext<'a> {
    /// The owning type.
    pub descriptor: &'a TypeDescriptor,
    /// The method backing the member (accessor or action).
    pub method: &'a MethodDescriptor,
    /// Member id.
    pub member_id: &'a str,
    /// Property, collection or action.
    pub feature_type: FeatureType,
    /// The owning type's holder, fully processed.
    pub object: &'a FacetHolder,
    /// Methods not yet claimed.
    pub remover: &'a mut MethodRemover,
    /// The member's holder.
    pub holder: &'a mut FacetHolder,
    /// Metamodel configuration.
    pub config: &'a MetaModelConfig,
}

/// What a parameter-level factory sees.
pub struct ParameterContext<'a> {
    /// The owning type.
    pub descriptor: &'a TypeDescriptor,
    /// The action method.
    pub method: &'a MethodDescriptor,
    /// Action id.
    pub member_id: &'a str,
    /// Zero-based parameter index.
    pub index: usize,
    /// The parameter.
    pub parameter: &'a ParameterDescriptor,
    /// Methods not yet claimed.
    pub remover: &'a mut MethodRemover,
    /// The parameter's holder.
    pub holder: &'a mut FacetHolder,
    /// Metamodel configuration.
    pub config: &'a MetaModelConfig,
}

/// A policy contributing facets to holders of some feature types.
///
/// Only the entry points matching [`feature_types`](Self::feature_types) are
/// called; the others default to no-ops.
pub trait FacetFactory: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// Feature types this factory processes.
    fn feature_types(&self) -> &'static [FeatureType];

    /// Processes a type.
    fn process_object(&self, _ctx: &mut ObjectContext<'_>) {}

    /// Processes a property, collection or action.
    fn process_method(&self, _ctx: &mut MethodContext<'_>) {}

    /// Processes an action parameter.
    fn process_parameter(&self, _ctx: &mut ParameterContext<'_>) {}
}

/// The ordered list of facet factories.
pub struct ProgrammingModel {
    factories: Vec<Box<dyn FacetFactory>>,
}

impl ProgrammingModel {
    /// A model without factories.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// The standard factory chain.
    #[must_use]
    pub fn default_chain(config: &MetaModelConfig) -> Self {
        Self::empty()
            // object
            .with_factory(object::ObjectNatureFactory)
            .with_factory(object::ObjectEditingFactory)
            .with_factory(object::ObjectNamingFactory)
            .with_factory(object::ObjectLayoutFactory)
            .with_factory(object::IconMethodFactory)
            .with_factory(object::CssClassMethodFactory)
            .with_factory(title::TitleMethodFactory)
            .with_factory(title::TitleAnnotationFactory)
            .with_factory(title::TitleToStringFactory)
            // members
            .with_factory(member::MemberAccessorFactory)
            .with_factory(member::PropertySetterFactory)
            .with_factory(member::MemberNamingFactory)
            .with_factory(member::MemberLayoutFactory)
            .with_factory(member::PropertyAnnotationFactory)
            .with_factory(member::PropertyEditingDefaultsFactory)
            .with_factory(member::CollectionPagingFactory)
            .with_factory(member::ActionAnnotationFactory)
            .with_factory(member::ActionSemanticsFallbackFactory)
            .with_factory(member::ActionCssClassFromConfigFactory::new(
                &config.action_layout,
            ))
            .with_factory(support::HideMethodFactory)
            .with_factory(support::DisableMethodFactory)
            .with_factory(support::ValidateMethodFactory)
            .with_factory(support::ChoicesMethodFactory)
            .with_factory(support::DefaultMethodFactory)
            .with_factory(support::AutoCompleteMethodFactory)
            // parameters
            .with_factory(parameter::ParameterNamingFactory)
            .with_factory(parameter::ParameterAnnotationFactory)
            .with_factory(parameter::ParameterSupportFactory)
            // properties and parameters
            .with_factory(parameter::MandatoryDefaultsFactory)
    }

    /// Appends a factory to the chain.
    #[must_use]
    pub fn with_factory(mut self, factory: impl FacetFactory + 'static) -> Self {
        self.factories.push(Box::new(factory));
        self
    }

    /// All factories in chain order.
    pub fn factories(&self) -> impl Iterator<Item = &(dyn FacetFactory + 'static)> {
        self.factories.iter().map(Box::as_ref)
    }

    /// Factories processing `feature_type`, in chain order.
    pub fn for_feature(
        &self,
        feature_type: FeatureType,
    ) -> impl Iterator<Item = &(dyn FacetFactory + 'static)> {
        self.factories()
            .filter(move |f| f.feature_types().contains(&feature_type))
    }

    /// Number of factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if there are no factories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for ProgrammingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.factories.iter().map(|factory| factory.name()))
            .finish()
    }
}
