//! Action parameter factories, plus the mandatory defaults shared with
//! properties.

use tracing::debug;

use super::conventions::{
    parameter_supporting_name, AUTO_COMPLETE_PREFIX, CHOICES_PREFIX, DEFAULT_PREFIX,
    VALIDATE_PREFIX,
};
use super::member::compile_pattern;
use super::{FacetFactory, MethodContext, ParameterContext};
use crate::descriptor::annotation::{AnnotationLookup, Optionality};
use crate::descriptor::ValueType;
use crate::facet::{
    AutoCompleteFacet, ChoicesFacet, DefaultValueFacet, DescribedFacet, Facet, MandatoryFacet,
    MaxLengthFacet, MultiLineFacet, NamedFacet, RegexFacet, ValidateFacet,
};
use crate::identifier::FeatureType;
use crate::naming::natural_name;

const PARAMETER: &[FeatureType] = &[FeatureType::ActionParameter];
const PROPERTY_OR_PARAMETER: &[FeatureType] = &[FeatureType::Property, FeatureType::ActionParameter];

/// Parameter display name and description.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterNamingFactory;

impl FacetFactory for ParameterNamingFactory {
    fn name(&self) -> &'static str {
        "ParameterNaming"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PARAMETER
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) {
        let layout = ctx.parameter.annotations.parameter_layout();
        match layout
            .and_then(|l| l.named.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(named) => ctx.holder.add_facet(Facet::explicit(NamedFacet::new(named))),
            None => ctx.holder.add_facet(Facet::inferred(NamedFacet::new(natural_name(
                &ctx.parameter.name,
            )))),
        };
        if let Some(described) = layout.and_then(|l| l.described_as.as_deref()) {
            ctx.holder.add_facet(Facet::explicit(DescribedFacet::new(described)));
        }
    }
}

/// `@Parameter` and `@ParameterLayout` constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterAnnotationFactory;

impl FacetFactory for ParameterAnnotationFactory {
    fn name(&self) -> &'static str {
        "ParameterAnnotation"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PARAMETER
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) {
        let parameter = ctx.parameter;
        let is_string = parameter.value_type.is_string();

        if let Some(annotation) = parameter.annotations.parameter() {
            match annotation.optionality {
                Optionality::Mandatory => {
                    ctx.holder.add_facet(Facet::explicit(MandatoryFacet::Required));
                }
                Optionality::Optional => {
                    ctx.holder.add_facet(Facet::explicit(MandatoryFacet::Optional));
                }
                Optionality::Default => {}
            }
            if let Some(max) = annotation.max_length {
                if is_string {
                    ctx.holder.add_facet(Facet::explicit(MaxLengthFacet { max }));
                } else {
                    debug!(parameter = %ctx.holder.identifier(), "max-length on non-string ignored");
                }
            }
            if let Some(source) = annotation.regex_pattern.as_deref() {
                if !is_string {
                    debug!(parameter = %ctx.holder.identifier(), "regex on non-string ignored");
                } else if let Some(pattern) = compile_pattern(source, ctx.holder.identifier()) {
                    ctx.holder.add_facet(Facet::explicit(RegexFacet { pattern }));
                }
            }
        }

        if let Some(lines) = parameter.annotations.parameter_layout().and_then(|l| l.multi_line) {
            if is_string && lines > 0 {
                ctx.holder.add_facet(Facet::explicit(MultiLineFacet { lines }));
            } else {
                debug!(parameter = %ctx.holder.identifier(), lines, "multi-line ignored");
            }
        }
    }
}

/// Per-parameter supporting methods: `defaultNXxx()`, `choicesNXxx()`,
/// `autoCompleteNXxx(search)` and `validateNXxx(v)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterSupportFactory;

impl FacetFactory for ParameterSupportFactory {
    fn name(&self) -> &'static str {
        "ParameterSupport"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PARAMETER
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) {
        let (index, action) = (ctx.index, ctx.member_id);

        let default = parameter_supporting_name(DEFAULT_PREFIX, index, action);
        if let Some(method) = ctx.remover.take(&default, 0) {
            ctx.holder
                .add_facet(Facet::synthesized(DefaultValueFacet::new(method.name)));
        }

        let choices = parameter_supporting_name(CHOICES_PREFIX, index, action);
        if let Some(method) = ctx.remover.take(&choices, 0) {
            ctx.holder
                .add_facet(Facet::synthesized(ChoicesFacet::new(method.name)));
        }

        let auto_complete = parameter_supporting_name(AUTO_COMPLETE_PREFIX, index, action);
        let searchable = ctx
            .remover
            .find(&auto_complete, Some(1))
            .is_some_and(|m| m.parameters.first().is_some_and(|p| p.value_type.is_string()));
        if searchable {
            if let Some(method) = ctx.remover.take(&auto_complete, 1) {
                ctx.holder.add_facet(Facet::synthesized(AutoCompleteFacet {
                    method: method.name,
                    min_length: AutoCompleteFacet::DEFAULT_MIN_LENGTH,
                }));
            }
        }

        let validate = parameter_supporting_name(VALIDATE_PREFIX, index, action);
        if let Some(method) = ctx.remover.take(&validate, 1) {
            ctx.holder
                .add_facet(Facet::synthesized(ValidateFacet::new(method.name)));
        }
    }
}

fn default_mandatory(value_type: &ValueType) -> Facet {
    if value_type.is_optional() {
        Facet::inferred(MandatoryFacet::Optional)
    } else {
        Facet::fallback(MandatoryFacet::Required)
    }
}

/// Values are required unless declared `Optional` in their type or
/// annotations.
#[derive(Debug, Clone, Copy, Default)]
pub struct MandatoryDefaultsFactory;

impl FacetFactory for MandatoryDefaultsFactory {
    fn name(&self) -> &'static str {
        "MandatoryDefaults"
    }

    fn feature_types(&self) -> &'static [FeatureType] {
        PROPERTY_OR_PARAMETER
    }

    fn process_method(&self, ctx: &mut MethodContext<'_>) {
        ctx.holder.add_facet(default_mandatory(&ctx.method.returns));
    }

    fn process_parameter(&self, ctx: &mut ParameterContext<'_>) {
        ctx.holder
            .add_facet(default_mandatory(&ctx.parameter.value_type));
    }
}
