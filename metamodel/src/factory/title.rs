//! Title strategy factories.
//!
//! Three strategies compete for the title facet: `@Title` components
//! (explicit), a `title()` method (synthesized) and `toString()` (inferred).
//! The strongest one present wins on precedence. Declaring both `@Title`
//! members and `title()` is reported by the `title/strategy-conflict`
//! validator.

use super::conventions::{accessor_member_id, TITLE_METHOD, TO_STRING_METHOD};
use super::{FacetFactory, ObjectContext};
use crate::descriptor::annotation::AnnotationLookup;
use crate::facet::{Facet, FacetSource, Precedence, TitleComponent, TitleFacet};
use crate::identifier::FeatureType;

const OBJECT: &[FeatureType] = &[FeatureType::Object];

/// A conventional `title()` method returning a value.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleMethodFactory;

impl FacetFactory for TitleMethodFactory {
    fn name(&self) -> &'static str {
        "TitleMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        OBJECT
    }

    fn process_object(&self, ctx: &mut ObjectContext<'_>) {
        let is_title_method = ctx
            .remover
            .find(TITLE_METHOD, Some(0))
            .is_some_and(|m| !m.returns.is_void());
        if !is_title_method {
            return;
        }
        if let Some(method) = ctx.remover.take(TITLE_METHOD, 0) {
            ctx.holder
                .add_facet(Facet::synthesized(TitleFacet::Method { method: method.name }));
        }
    }
}

/// `@Title` components, collected across the type hierarchy.
///
/// Annotated accessors stay available as properties; any other annotated
/// method is claimed so it does not also become an action.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleAnnotationFactory;

impl FacetFactory for TitleAnnotationFactory {
    fn name(&self) -> &'static str {
        "TitleAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        OBJECT
    }

    fn process_object(&self, ctx: &mut ObjectContext<'_>) {
        let components: Vec<TitleComponent> = ctx
            .methods
            .iter()
            .filter(|m| m.is_nullary_query())
            .filter_map(|m| {
                m.annotations
                    .title()
                    .map(|annotation| TitleComponent::from_annotation(m.name.clone(), annotation))
            })
            .collect();
        if components.is_empty() {
            return;
        }
        for component in &components {
            let accessor = ctx
                .remover
                .find(&component.method, Some(0))
                .is_some_and(|m| accessor_member_id(m).is_some());
            if !accessor {
                ctx.remover.take(&component.method, 0);
            }
        }
        ctx.holder
            .add_facet(Facet::explicit(TitleFacet::components(components)));
    }
}

/// `toString()`, the weakest title strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleToStringFactory;

impl FacetFactory for TitleToStringFactory {
    fn name(&self) -> &'static str {
        "TitleToString"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        OBJECT
    }

    fn process_object(&self, ctx: &mut ObjectContext<'_>) {
        if ctx.remover.take(TO_STRING_METHOD, 0).is_some() {
            ctx.holder.add_facet(Facet::new(
                TitleFacet::ToString,
                Precedence::Inferred,
                FacetSource::Convention,
            ));
        }
    }
}
