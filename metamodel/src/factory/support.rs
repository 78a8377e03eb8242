//! Supporting method factories: `hideXxx`, `disableXxx`, `validateXxx`,
//! `choicesXxx`, `defaultXxx`, `autoCompleteXxx`.
//!
//! A supporting method is claimed only when its shape fits. A misshapen one
//! stays unclaimed and is reported by the orphaned-supporting-method
//! validator.

use tracing::debug;

use super::conventions::{
    supporting_name, AUTO_COMPLETE_PREFIX, CHOICES_PREFIX, DEFAULT_PREFIX, DISABLE_PREFIX,
    HIDE_PREFIX, VALIDATE_PREFIX,
};
use super::{FacetFactory, MethodContext};
use crate::facet::{
    AutoCompleteFacet, ChoicesFacet, DefaultValueFacet, DisableForContextFacet, Facet,
    HideForContextFacet, ValidateFacet,
};
use crate::identifier::FeatureType;

const MEMBERS: &[FeatureType] = FeatureType::MEMBERS;
const PROPERTY: &[FeatureType] = &[FeatureType::Property];
const PROPERTY_OR_ACTION: &[FeatureType] = &[FeatureType::Property, FeatureType::Action];

/// Claims `prefix + MemberId` taking `param_count` parameters when `shape`
/// accepts it, returning the claimed method name.
fn claim(
    ctx: &mut MethodContext<'_>,
    prefix: &str,
    param_count: usize,
    shape: impl Fn(&crate::descriptor::MethodDescriptor) -> bool,
) -> Option<String> {
    let name = supporting_name(prefix, ctx.member_id);
    let fits = ctx.remover.find(&name, Some(param_count)).map(shape)?;
    if !fits {
        debug!(member = %ctx.holder.identifier(), method = %name, "supporting method has the wrong shape");
        return None;
    }
    ctx.remover.take(&name, param_count).map(|m| m.name)
}

/// `hideXxx() -> bool`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HideMethodFactory;

impl FacetFactory for HideMethodFactory {
    fn name(&self) -> &'static str {
        "HideMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        MEMBERS
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        if let Some(method) = claim(ctx, HIDE_PREFIX, 0, |m| m.returns.is_boolean()) {
            ctx.holder
                .add_facet(Facet::synthesized(HideForContextFacet::new(method)));
        }
    }
}

/// `disableXxx() -> String`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisableMethodFactory;

impl FacetFactory for DisableMethodFactory {
    fn name(&self) -> &'static str {
        "DisableMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        MEMBERS
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        if let Some(method) = claim(ctx, DISABLE_PREFIX, 0, |m| m.returns.is_string()) {
            ctx.holder
                .add_facet(Facet::synthesized(DisableForContextFacet::new(method)));
        }
    }
}

/// `validateXxx(v) -> String` for properties, `validateXxx(args..) -> String`
/// for actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateMethodFactory;

impl FacetFactory for ValidateMethodFactory {
    fn name(&self) -> &'static str {
        "ValidateMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PROPERTY_OR_ACTION
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let arity = match ctx.feature_type {
            FeatureType::Property => 1,
            _ => ctx.method.param_count(),
        };
        if let Some(method) = claim(ctx, VALIDATE_PREFIX, arity, |m| m.returns.is_string()) {
            ctx.holder.add_facet(Facet::synthesized(ValidateFacet::new(method)));
        }
    }
}

/// `choicesXxx()` returning a collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChoicesMethodFactory;

impl FacetFactory for ChoicesMethodFactory {
    fn name(&self) -> &'static str {
        "ChoicesMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PROPERTY
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        if let Some(method) = claim(ctx, CHOICES_PREFIX, 0, |m| m.returns.is_collection()) {
            ctx.holder.add_facet(Facet::synthesized(ChoicesFacet::new(method)));
        }
    }
}

/// `defaultXxx()` returning a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMethodFactory;

impl FacetFactory for DefaultMethodFactory {
    fn name(&self) -> &'static str {
        "DefaultMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PROPERTY
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        if let Some(method) = claim(ctx, DEFAULT_PREFIX, 0, |m| !m.returns.is_void()) {
            ctx.holder
                .add_facet(Facet::synthesized(DefaultValueFacet::new(method)));
        }
    }
}

/// `autoCompleteXxx(search: String)` returning a collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoCompleteMethodFactory;

impl FacetFactory for AutoCompleteMethodFactory {
    fn name(&self) -> &'static str {
        "AutoCompleteMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PROPERTY
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let shape = |m: &crate::descriptor::MethodDescriptor| {
            m.returns.is_collection()
                && m.parameters.first().is_some_and(|p| p.value_type.is_string())
        };
        if let Some(method) = claim(ctx, AUTO_COMPLETE_PREFIX, 1, shape) {
            ctx.holder.add_facet(Facet::synthesized(AutoCompleteFacet {
                method,
                min_length: AutoCompleteFacet::DEFAULT_MIN_LENGTH,
            }));
        }
    }
}
