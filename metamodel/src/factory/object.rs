//! Object-level factories: identity, naming, editing policy and layout hints.

use tracing::debug;

use super::conventions::{CSS_CLASS_METHOD, ICON_NAME_METHOD};
use super::{FacetFactory, ObjectContext};
use crate::descriptor::annotation::{AnnotationLookup, Editing, Nature, Position};
use crate::descriptor::TypeKind;
use crate::facet::{
    CssClassFaFacet, CssClassFacet, DescribedFacet, EditingFacet, Facet, IconFacet,
    LogicalTypeFacet, NamedFacet, NatureFacet, PagedFacet, PluralFacet,
};
use crate::identifier::FeatureType;
use crate::naming::plural_name;

const OBJECT: &[FeatureType] = &[FeatureType::Object];

/// Logical type name and nature.
///
/// The logical type name is explicit when `@DomainObject` declares one and
/// inferred from the type name otherwise. Abstract types and interfaces get
/// their nature from their kind unless an annotation says otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectNatureFactory;

impl FacetFactory for ObjectNatureFactory {
    fn name(&self) -> &'static str {
        "ObjectNature"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        OBJECT
    }

    fn process_object(&self, ctx: &mut ObjectContext<'_>) {
        let descriptor = ctx.descriptor;
        let logical_type = match descriptor.explicit_logical_type_name() {
            Some(name) => Facet::explicit(LogicalTypeFacet { name: name.to_owned() }),
            None => Facet::inferred(LogicalTypeFacet {
                name: descriptor.type_name.clone(),
            }),
        };
        ctx.holder.add_facet(logical_type);

        let declared = descriptor
            .annotations
            .domain_object()
            .and_then(|d| d.nature)
            .filter(|n| *n != Nature::Unspecified);
        if let Some(nature) = declared {
            ctx.holder.add_facet(Facet::explicit(NatureFacet { nature }));
        }
        let inferred = match descriptor.kind {
            TypeKind::Abstract => Some(Nature::Abstract),
            TypeKind::Interface => Some(Nature::Interface),
            TypeKind::Class => None,
        };
        if let Some(nature) = inferred {
            ctx.holder.add_facet(Facet::inferred(NatureFacet { nature }));
        }
    }
}

/// Type-level editing policy: `@DomainObject(editing)` or the
/// `domain-object.editing` configuration default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectEditingFactory;

impl FacetFactory for ObjectEditingFactory {
    fn name(&self) -> &'static str {
        "ObjectEditing"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        OBJECT
    }

    fn process_object(&self, ctx: &mut ObjectContext<'_>) {
        let annotation = ctx.descriptor.annotations.domain_object();
        let facet = match annotation.map(|d| d.editing).unwrap_or_default() {
            Editing::Enabled => Facet::explicit(EditingFacet::Enabled),
            Editing::Disabled => Facet::explicit(EditingFacet::Disabled {
                reason: annotation.and_then(|d| d.editing_disabled_reason.clone()),
            }),
            Editing::AsConfigured if ctx.config.domain_object.editing => {
                Facet::configured(EditingFacet::Enabled)
            }
            Editing::AsConfigured => Facet::configured(EditingFacet::Disabled { reason: None }),
        };
        ctx.holder.add_facet(facet);
    }
}

/// Singular name, plural name and description.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectNamingFactory;

impl FacetFactory for ObjectNamingFactory {
    fn name(&self) -> &'static str {
        "ObjectNaming"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        OBJECT
    }

    fn process_object(&self, ctx: &mut ObjectContext<'_>) {
        let layout = ctx.descriptor.annotations.domain_object_layout();
        let explicit_named = layout
            .and_then(|l| l.named.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let singular = match explicit_named {
            Some(named) => {
                ctx.holder.add_facet(Facet::explicit(NamedFacet::new(named)));
                named.to_owned()
            }
            None => {
                let natural = ctx.descriptor.natural_name();
                ctx.holder.add_facet(Facet::inferred(NamedFacet::new(natural.clone())));
                natural
            }
        };

        match layout.and_then(|l| l.plural.as_deref()).filter(|s| !s.trim().is_empty()) {
            Some(plural) => ctx.holder.add_facet(Facet::explicit(PluralFacet::new(plural))),
            None => ctx
                .holder
                .add_facet(Facet::inferred(PluralFacet::new(plural_name(&singular)))),
        };

        if let Some(described) = layout.and_then(|l| l.described_as.as_deref()) {
            ctx.holder.add_facet(Facet::explicit(DescribedFacet::new(described)));
        }
    }
}

/// `@DomainObjectLayout` presentation hints: css class, icon and page size.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectLayoutFactory;

impl FacetFactory for ObjectLayoutFactory {
    fn name(&self) -> &'static str {
        "ObjectLayout"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        OBJECT
    }

    fn process_object(&self, ctx: &mut ObjectContext<'_>) {
        let Some(layout) = ctx.descriptor.annotations.domain_object_layout() else {
            return;
        };
        if let Some(css) = layout.css_class.as_deref().filter(|s| !s.trim().is_empty()) {
            ctx.holder
                .add_facet(Facet::explicit(CssClassFacet::Static(css.trim().to_owned())));
        }
        if let Some(fa) = layout.css_class_fa.as_deref().filter(|s| !s.trim().is_empty()) {
            ctx.holder
                .add_facet(Facet::explicit(CssClassFaFacet::new(fa, Position::Left)));
        }
        match layout.paged {
            Some(0) => debug!(type_name = %ctx.descriptor.type_name, "ignoring paged = 0"),
            Some(page_size) => {
                ctx.holder.add_facet(Facet::explicit(PagedFacet { page_size }));
            }
            None => {}
        }
    }
}

/// `iconName()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IconMethodFactory;

impl FacetFactory for IconMethodFactory {
    fn name(&self) -> &'static str {
        "IconMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        OBJECT
    }

    fn process_object(&self, ctx: &mut ObjectContext<'_>) {
        if let Some(method) = ctx.remover.take(ICON_NAME_METHOD, 0) {
            ctx.holder.add_facet(Facet::synthesized(IconFacet { method: method.name }));
        }
    }
}

/// `cssClass()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssClassMethodFactory;

impl FacetFactory for CssClassMethodFactory {
    fn name(&self) -> &'static str {
        "CssClassMethod"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        OBJECT
    }

    fn process_object(&self, ctx: &mut ObjectContext<'_>) {
        if let Some(method) = ctx.remover.take(CSS_CLASS_METHOD, 0) {
            ctx.holder
                .add_facet(Facet::synthesized(CssClassFacet::Method(method.name)));
        }
    }
}
