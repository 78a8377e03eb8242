//! Member-level factories: accessors, naming, layout and annotation-driven
//! semantics of properties, collections and actions.

use regex::Regex;
use tracing::{debug, warn};

use super::conventions::{supporting_name, CLEAR_PREFIX, MODIFY_PREFIX, SET_PREFIX};
use super::{FacetFactory, MethodContext};
use crate::config::{ActionLayoutConfig, PatternMapping};
use crate::descriptor::annotation::{
    AnnotationLookup, Editing, Optionality, RestrictTo, SemanticsOf, Where,
};
use crate::descriptor::ValueType;
use crate::facet::{
    ActionInvocationFacet, ActionSemanticsFacet, CollectionAccessorFacet, CssClassFaFacet,
    CssClassFacet, DescribedFacet, EditingFacet, Facet, FacetSource, HiddenFacet,
    LayoutGroupFacet, MandatoryFacet, MaxLengthFacet, MemberOrderFacet, MultiLineFacet,
    NamedFacet, PagedFacet, Pattern, Precedence, PropertyAccessorFacet, PropertySetterFacet,
    PrototypeFacet, RegexFacet,
};
use crate::identifier::FeatureType;
use crate::layout::GroupIdAndName;
use crate::naming::natural_name;

const MEMBERS: &[FeatureType] = FeatureType::MEMBERS;
const PROPERTY: &[FeatureType] = &[FeatureType::Property];
const COLLECTION: &[FeatureType] = &[FeatureType::Collection];
const ACTION: &[FeatureType] = &[FeatureType::Action];
const PROPERTY_OR_COLLECTION: &[FeatureType] = &[FeatureType::Property, FeatureType::Collection];

/// Reason given for properties that have no setter.
pub const NO_SETTER_REASON: &str = "Not editable: no setter";

/// How the member is read or invoked.
///
/// Installed at [`Precedence::High`]: these are structural facts.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberAccessorFactory;

impl FacetFactory for MemberAccessorFactory {
    fn name(&self) -> &'static str {
        "MemberAccessor"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        MEMBERS
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let method = ctx.method;
        let facet = match ctx.feature_type {
            FeatureType::Property => Facet::new(
                PropertyAccessorFacet {
                    method: method.name.clone(),
                    value_type: method.returns.clone(),
                },
                Precedence::High,
                FacetSource::Convention,
            ),
            FeatureType::Collection => {
                let element_type = match method.returns.unwrapped() {
                    ValueType::Collection(element) => element.as_ref().clone(),
                    other => other.clone(),
                };
                Facet::new(
                    CollectionAccessorFacet {
                        method: method.name.clone(),
                        element_type,
                    },
                    Precedence::High,
                    FacetSource::Convention,
                )
            }
            FeatureType::Action => Facet::new(
                ActionInvocationFacet {
                    method: method.name.clone(),
                    returns: method.returns.clone(),
                },
                Precedence::High,
                FacetSource::Convention,
            ),
            FeatureType::Object | FeatureType::ActionParameter => return,
        };
        ctx.holder.add_facet(facet);
    }
}

/// `setXxx(v)` or `modifyXxx(v)`, plus `clearXxx()`.
///
/// A property without a setter is read-only, whatever its annotations say.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertySetterFactory;

impl FacetFactory for PropertySetterFactory {
    fn name(&self) -> &'static str {
        "PropertySetter"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PROPERTY
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let set = ctx.remover.take(&supporting_name(SET_PREFIX, ctx.member_id), 1);
        let modify = ctx.remover.take(&supporting_name(MODIFY_PREFIX, ctx.member_id), 1);
        let clear = ctx.remover.take(&supporting_name(CLEAR_PREFIX, ctx.member_id), 0);

        match modify.or(set) {
            Some(setter) => {
                ctx.holder.add_facet(Facet::synthesized(PropertySetterFacet {
                    setter: setter.name,
                    clear: clear.map(|m| m.name),
                }));
            }
            None => {
                ctx.holder.add_facet(Facet::new(
                    EditingFacet::Disabled {
                        reason: Some(NO_SETTER_REASON.to_owned()),
                    },
                    Precedence::High,
                    FacetSource::Convention,
                ));
            }
        }
    }
}

/// Member display name and description.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberNamingFactory;

impl FacetFactory for MemberNamingFactory {
    fn name(&self) -> &'static str {
        "MemberNaming"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        MEMBERS
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let annotations = &ctx.method.annotations;
        let (named, described) = match ctx.feature_type {
            FeatureType::Property => annotations
                .property_layout()
                .map(|l| (l.named.as_deref(), l.described_as.as_deref()))
                .unwrap_or_default(),
            FeatureType::Collection => annotations
                .collection_layout()
                .map(|l| (l.named.as_deref(), l.described_as.as_deref()))
                .unwrap_or_default(),
            FeatureType::Action => annotations
                .action_layout()
                .map(|l| (l.named.as_deref(), l.described_as.as_deref()))
                .unwrap_or_default(),
            FeatureType::Object | FeatureType::ActionParameter => return,
        };

        match named.map(str::trim).filter(|s| !s.is_empty()) {
            Some(named) => ctx.holder.add_facet(Facet::explicit(NamedFacet::new(named))),
            None => ctx
                .holder
                .add_facet(Facet::inferred(NamedFacet::new(natural_name(ctx.member_id)))),
        };
        if let Some(described) = described.filter(|s| !s.trim().is_empty()) {
            ctx.holder.add_facet(Facet::explicit(DescribedFacet::new(described)));
        }
    }
}

/// Member order, field set, css classes, multi-line and collection paging
/// from the layout annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemberLayoutFactory;

impl MemberLayoutFactory {
    fn order_and_group(
        ctx: &mut MethodContext<'_>,
        sequence: Option<&str>,
        field_set_id: Option<&str>,
        field_set_name: Option<&str>,
    ) {
        if let Some(sequence) = sequence.map(str::trim).filter(|s| !s.is_empty()) {
            ctx.holder.add_facet(Facet::explicit(MemberOrderFacet {
                sequence: sequence.to_owned(),
            }));
        }
        if let Some(group) = GroupIdAndName::infer(field_set_id, field_set_name) {
            ctx.holder.add_facet(Facet::explicit(LayoutGroupFacet { group }));
        }
    }

    fn css_class(ctx: &mut MethodContext<'_>, css_class: Option<&str>) {
        if let Some(css) = css_class.map(str::trim).filter(|s| !s.is_empty()) {
            ctx.holder
                .add_facet(Facet::explicit(CssClassFacet::Static(css.to_owned())));
        }
    }
}

impl FacetFactory for MemberLayoutFactory {
    fn name(&self) -> &'static str {
        "MemberLayout"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        MEMBERS
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let method = ctx.method;
        match ctx.feature_type {
            FeatureType::Property => {
                let Some(layout) = method.annotations.property_layout() else {
                    return;
                };
                Self::order_and_group(
                    ctx,
                    layout.sequence.as_deref(),
                    layout.field_set_id.as_deref(),
                    layout.field_set_name.as_deref(),
                );
                Self::css_class(ctx, layout.css_class.as_deref());
                if let Some(lines) = layout.multi_line {
                    if method.returns.is_string() && lines > 0 {
                        ctx.holder.add_facet(Facet::explicit(MultiLineFacet { lines }));
                    } else {
                        debug!(member = %ctx.holder.identifier(), lines, "multi-line ignored");
                    }
                }
            }
            FeatureType::Collection => {
                let Some(layout) = method.annotations.collection_layout() else {
                    return;
                };
                Self::order_and_group(ctx, layout.sequence.as_deref(), None, None);
                Self::css_class(ctx, layout.css_class.as_deref());
                if let Some(page_size) = layout.paged.filter(|n| *n > 0) {
                    ctx.holder.add_facet(Facet::explicit(PagedFacet { page_size }));
                }
            }
            FeatureType::Action => {
                let Some(layout) = method.annotations.action_layout() else {
                    return;
                };
                Self::order_and_group(
                    ctx,
                    layout.sequence.as_deref(),
                    layout.field_set_id.as_deref(),
                    layout.field_set_name.as_deref(),
                );
                Self::css_class(ctx, layout.css_class.as_deref());
                if let Some(fa) = layout.css_class_fa.as_deref().filter(|s| !s.trim().is_empty()) {
                    ctx.holder.add_facet(Facet::explicit(CssClassFaFacet::new(
                        fa,
                        layout.css_class_fa_position,
                    )));
                }
            }
            FeatureType::Object | FeatureType::ActionParameter => {}
        }
    }
}

/// Compiles a regex annotation value, logging and returning `None` if it is
/// invalid.
pub(crate) fn compile_pattern(source: &str, on: &dyn std::fmt::Display) -> Option<Pattern> {
    match Pattern::new(source) {
        Ok(pattern) => Some(pattern),
        Err(error) => {
            debug!(holder = %on, %error, "invalid regex pattern ignored");
            None
        }
    }
}

/// `@Property` and `@Collection`: editing, optionality, length and pattern
/// constraints, static hiding.
///
/// Length, pattern and multi-line constraints apply only to string values;
/// on anything else they are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyAnnotationFactory;

impl FacetFactory for PropertyAnnotationFactory {
    fn name(&self) -> &'static str {
        "PropertyAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PROPERTY_OR_COLLECTION
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let method = ctx.method;
        if ctx.feature_type == FeatureType::Collection {
            let hidden = method.annotations.collection().and_then(|c| c.hidden);
            if let Some(location) = hidden.filter(|w| *w != Where::Nowhere) {
                ctx.holder.add_facet(Facet::explicit(HiddenFacet { location }));
            }
            return;
        }
        let Some(property) = method.annotations.property() else {
            return;
        };

        match property.editing {
            Editing::Enabled => {
                ctx.holder.add_facet(Facet::explicit(EditingFacet::Enabled));
            }
            Editing::Disabled => {
                ctx.holder.add_facet(Facet::explicit(EditingFacet::Disabled {
                    reason: property.editing_disabled_reason.clone(),
                }));
            }
            Editing::AsConfigured => {}
        }

        match property.optionality {
            Optionality::Mandatory => {
                ctx.holder.add_facet(Facet::explicit(MandatoryFacet::Required));
            }
            Optionality::Optional => {
                ctx.holder.add_facet(Facet::explicit(MandatoryFacet::Optional));
            }
            Optionality::Default => {}
        }

        let is_string = method.returns.is_string();
        if let Some(max) = property.max_length {
            if is_string {
                ctx.holder.add_facet(Facet::explicit(MaxLengthFacet { max }));
            } else {
                debug!(member = %ctx.holder.identifier(), "max-length on non-string ignored");
            }
        }
        if let Some(source) = property.regex_pattern.as_deref() {
            if !is_string {
                debug!(member = %ctx.holder.identifier(), "regex on non-string ignored");
            } else if let Some(pattern) = compile_pattern(source, ctx.holder.identifier()) {
                ctx.holder.add_facet(Facet::explicit(RegexFacet { pattern }));
            }
        }

        if let Some(location) = property.hidden.filter(|w| *w != Where::Nowhere) {
            ctx.holder.add_facet(Facet::explicit(HiddenFacet { location }));
        }
    }
}

/// Properties inherit the type's editing policy at configuration precedence.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyEditingDefaultsFactory;

impl FacetFactory for PropertyEditingDefaultsFactory {
    fn name(&self) -> &'static str {
        "PropertyEditingDefaults"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PROPERTY
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let inherited = match ctx.object.lookup::<EditingFacet>() {
            Some(editing) => editing.clone(),
            None if ctx.config.domain_object.editing => EditingFacet::Enabled,
            None => EditingFacet::Disabled { reason: None },
        };
        ctx.holder.add_facet(Facet::configured(inherited));
    }
}

/// Collection page size from `collection-layout.paged`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionPagingFactory;

impl FacetFactory for CollectionPagingFactory {
    fn name(&self) -> &'static str {
        "CollectionPaging"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        COLLECTION
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let page_size = ctx.config.collection_layout.paged;
        if page_size > 0 {
            ctx.holder.add_facet(Facet::configured(PagedFacet { page_size }));
        }
    }
}

/// `@Action`: semantics, prototyping restriction, static hiding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionAnnotationFactory;

impl FacetFactory for ActionAnnotationFactory {
    fn name(&self) -> &'static str {
        "ActionAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        ACTION
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        let Some(action) = ctx.method.annotations.action() else {
            return;
        };
        if let Some(semantics) = action.semantics {
            ctx.holder
                .add_facet(Facet::explicit(ActionSemanticsFacet { semantics }));
        }
        if action.restrict_to == RestrictTo::Prototyping {
            ctx.holder.add_facet(Facet::explicit(PrototypeFacet));
        }
        if let Some(location) = action.hidden.filter(|w| *w != Where::Nowhere) {
            ctx.holder.add_facet(Facet::explicit(HiddenFacet { location }));
        }
    }
}

/// Actions without declared semantics are assumed non-idempotent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionSemanticsFallbackFactory;

impl FacetFactory for ActionSemanticsFallbackFactory {
    fn name(&self) -> &'static str {
        "ActionSemanticsFallback"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        ACTION
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        ctx.holder.add_facet(Facet::fallback(ActionSemanticsFacet {
            semantics: SemanticsOf::NonIdempotent,
        }));
    }
}

/// Action css classes and icons from the `action-layout` pattern lists.
///
/// Patterns are matched against the whole action id; the first match wins.
#[derive(Debug, Clone, Default)]
pub struct ActionCssClassFromConfigFactory {
    css_classes: Vec<(Regex, String)>,
    icons: Vec<(Regex, String)>,
}

impl ActionCssClassFromConfigFactory {
    /// Compiles the configured patterns. Invalid patterns are logged and
    /// skipped.
    #[must_use]
    pub fn new(config: &ActionLayoutConfig) -> Self {
        Self {
            css_classes: compile_mappings(&config.css_class_patterns),
            icons: compile_mappings(&config.css_class_fa_patterns),
        }
    }
}

fn compile_mappings(mappings: &[PatternMapping]) -> Vec<(Regex, String)> {
    mappings
        .iter()
        .filter_map(|mapping| match Regex::new(&format!("^(?:{})$", mapping.pattern)) {
            Ok(regex) => Some((regex, mapping.value.clone())),
            Err(error) => {
                warn!(pattern = %mapping.pattern, %error, "invalid action-layout pattern skipped");
                None
            }
        })
        .collect()
}

fn first_match<'a>(mappings: &'a [(Regex, String)], id: &str) -> Option<&'a str> {
    mappings
        .iter()
        .find(|(regex, _)| regex.is_match(id))
        .map(|(_, value)| value.as_str())
}

impl FacetFactory for ActionCssClassFromConfigFactory {
    fn name(&self) -> &'static str {
        "ActionCssClassFromConfig"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        ACTION
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        if let Some(css) = first_match(&self.css_classes, ctx.member_id) {
            ctx.holder
                .add_facet(Facet::configured(CssClassFacet::Static(css.to_owned())));
        }
        if let Some(icon) = first_match(&self.icons, ctx.member_id) {
            ctx.holder.add_facet(Facet::configured(CssClassFaFacet::new(
                icon,
                crate::descriptor::annotation::Position::Left,
            )));
        }
    }
}
