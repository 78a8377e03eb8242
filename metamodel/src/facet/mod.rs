//! Facets: units of synthesized metadata attached to a holder.
//!
//! A facet pairs a typed payload (one struct per [`FacetKind`]) with the
//! [`Precedence`] it was installed at and the [`FacetSource`] it came from.
//! Holders keep at most one facet per kind; see
//! [`FacetHolder::add_facet`](holder::FacetHolder::add_facet) for the
//! replacement rules.

pub mod holder;
pub mod payloads;
pub mod title;

use serde::Serialize;

pub use holder::{FacetChange, FacetHolder};
pub use payloads::*;
pub use title::{TitleComponent, TitleContext, TitleFacet, TitleRenderRequest};

use crate::identifier::Identifier;

/// Rank of a facet when competing with another of the same kind.
///
/// Variants are declared lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Precedence {
    /// Framework defaults applied when nothing else is known.
    Fallback,
    /// Derived from names and declared types.
    Inferred,
    /// Derived from configuration.
    Default,
    /// Derived from conventionally named methods.
    Synthesized,
    /// Declared by an annotation.
    Explicit,
    /// Structural facts that not even annotations can override.
    High,
}

/// Where a facet's information came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacetSource {
    /// An annotation on the descriptor.
    Annotation,
    /// A conventionally named method.
    Convention,
    /// Metamodel configuration.
    Configuration,
    /// Names and types.
    Inference,
    /// Framework default.
    Fallback,
}

/// What a facet means to its consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacetIntent {
    /// Presentation only; never constrains data.
    UiHint,
    /// Constrains values a user may enter.
    Constraint,
    /// Drives interaction (invocation, visibility, usability).
    Behaviour,
    /// Identifies the element.
    Identity,
}

/// Typed access to one facet family's payload.
pub trait FacetPayload: Sized {
    /// The kind this payload belongs to.
    const KIND: FacetKind;

    /// Wraps the payload in the tagged union.
    fn into_data(self) -> FacetData;

    /// Borrows the payload back out of the tagged union.
    fn from_data(data: &FacetData) -> Option<&Self>;
}

macro_rules! facet_kinds {
    ($($variant:ident($payload:ty, $label:literal, $intent:ident);)+) => {
        /// Facet family tag.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum FacetKind {
            $(
                #[doc = concat!("`", $label, "`")]
                $variant,
            )+
        }

        impl FacetKind {
            /// Every facet kind, in declaration order.
            pub const ALL: &'static [FacetKind] = &[$(FacetKind::$variant),+];

            /// Kebab-case label.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(FacetKind::$variant => $label,)+
                }
            }

            /// What facets of this kind mean to consumers.
            #[must_use]
            pub fn intent(self) -> FacetIntent {
                match self {
                    $(FacetKind::$variant => FacetIntent::$intent,)+
                }
            }
        }

        /// Tagged union of facet payloads.
        #[derive(Debug, Clone, PartialEq, Serialize)]
        #[serde(tag = "kind", content = "payload", rename_all = "kebab-case")]
        pub enum FacetData {
            $(
                #[doc = concat!("`", $label, "`")]
                $variant($payload),
            )+
        }

        impl FacetData {
            /// The kind of the wrapped payload.
            #[must_use]
            pub fn kind(&self) -> FacetKind {
                match self {
                    $(FacetData::$variant(_) => FacetKind::$variant,)+
                }
            }
        }

        $(
            impl FacetPayload for $payload {
                const KIND: FacetKind = FacetKind::$variant;

                fn into_data(self) -> FacetData {
                    FacetData::$variant(self)
                }

                fn from_data(data: &FacetData) -> Option<&Self> {
                    match data {
                        FacetData::$variant(payload) => Some(payload),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }
        )+
    };
}

facet_kinds! {
    LogicalType(LogicalTypeFacet, "logical-type", Identity);
    Nature(NatureFacet, "nature", Identity);
    Named(NamedFacet, "named", UiHint);
    Plural(PluralFacet, "plural", UiHint);
    Described(DescribedFacet, "described", UiHint);
    Title(TitleFacet, "title", Identity);
    Icon(IconFacet, "icon", UiHint);
    CssClass(CssClassFacet, "css-class", UiHint);
    CssClassFa(CssClassFaFacet, "css-class-fa", UiHint);
    Paged(PagedFacet, "paged", UiHint);
    Editing(EditingFacet, "editing", Behaviour);
    PropertyAccessor(PropertyAccessorFacet, "property-accessor", Behaviour);
    PropertySetter(PropertySetterFacet, "property-setter", Behaviour);
    CollectionAccessor(CollectionAccessorFacet, "collection-accessor", Behaviour);
    ActionInvocation(ActionInvocationFacet, "action-invocation", Behaviour);
    MemberOrder(MemberOrderFacet, "member-order", UiHint);
    LayoutGroup(LayoutGroupFacet, "layout-group", UiHint);
    MultiLine(MultiLineFacet, "multi-line", UiHint);
    Hidden(HiddenFacet, "hidden", Behaviour);
    Mandatory(MandatoryFacet, "mandatory", Constraint);
    MaxLength(MaxLengthFacet, "max-length", Constraint);
    Regex(RegexFacet, "regex", Constraint);
    ActionSemantics(ActionSemanticsFacet, "action-semantics", Behaviour);
    Prototype(PrototypeFacet, "prototype", Behaviour);
    HideForContext(HideForContextFacet, "hide-for-context", Behaviour);
    DisableForContext(DisableForContextFacet, "disable-for-context", Behaviour);
    Validate(ValidateFacet, "validate", Constraint);
    Choices(ChoicesFacet, "choices", Constraint);
    DefaultValue(DefaultValueFacet, "default-value", UiHint);
    AutoComplete(AutoCompleteFacet, "auto-complete", Constraint);
}

impl std::fmt::Display for FacetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload installed (or about to be installed) on a holder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Facet {
    #[serde(flatten)]
    data: FacetData,
    precedence: Precedence,
    source: FacetSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    holder: Option<Identifier>,
}

impl Facet {
    /// Creates a facet with an explicit precedence and source.
    pub fn new(payload: impl FacetPayload, precedence: Precedence, source: FacetSource) -> Self {
        Self {
            data: payload.into_data(),
            precedence,
            source,
            holder: None,
        }
    }

    /// An annotation-declared facet.
    pub fn explicit(payload: impl FacetPayload) -> Self {
        Self::new(payload, Precedence::Explicit, FacetSource::Annotation)
    }

    /// A facet derived from a conventionally named method.
    pub fn synthesized(payload: impl FacetPayload) -> Self {
        Self::new(payload, Precedence::Synthesized, FacetSource::Convention)
    }

    /// A configuration-derived facet.
    pub fn configured(payload: impl FacetPayload) -> Self {
        Self::new(payload, Precedence::Default, FacetSource::Configuration)
    }

    /// A facet inferred from names or types.
    pub fn inferred(payload: impl FacetPayload) -> Self {
        Self::new(payload, Precedence::Inferred, FacetSource::Inference)
    }

    /// A framework default.
    pub fn fallback(payload: impl FacetPayload) -> Self {
        Self::new(payload, Precedence::Fallback, FacetSource::Fallback)
    }

    /// The facet family.
    #[must_use]
    pub fn kind(&self) -> FacetKind {
        self.data.kind()
    }

    /// The tagged payload.
    #[must_use]
    pub fn data(&self) -> &FacetData {
        &self.data
    }

    /// The payload, if it is of type `P`.
    #[must_use]
    pub fn payload<P: FacetPayload>(&self) -> Option<&P> {
        P::from_data(&self.data)
    }

    /// Installed precedence.
    #[must_use]
    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// Where the information came from.
    #[must_use]
    pub fn source(&self) -> FacetSource {
        self.source
    }

    /// What the facet means to consumers.
    #[must_use]
    pub fn intent(&self) -> FacetIntent {
        self.kind().intent()
    }

    /// The holder this facet is installed on, once installed.
    #[must_use]
    pub fn holder(&self) -> Option<&Identifier> {
        self.holder.as_ref()
    }

    /// Returns true if both facets carry the same payload, regardless of
    /// precedence, source or holder.
    #[must_use]
    pub fn semantic_equals(&self, other: &Facet) -> bool {
        self.data == other.data
    }

    pub(crate) fn attach(mut self, holder: &Identifier) -> Self {
        self.holder = Some(holder.clone());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_is_totally_ordered_lowest_first() {
        use Precedence::*;
        let ranks = [Fallback, Inferred, Default, Synthesized, Explicit, High];
        assert!(ranks.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn payload_round_trips_through_tagged_union() {
        let facet = Facet::explicit(MaxLengthFacet { max: 30 });
        assert_eq!(facet.kind(), FacetKind::MaxLength);
        assert_eq!(facet.payload::<MaxLengthFacet>().map(|p| p.max), Some(30));
        assert!(facet.payload::<NamedFacet>().is_none());
        assert_eq!(facet.intent(), FacetIntent::Constraint);
    }

    #[test]
    fn semantic_equality_ignores_precedence() {
        let a = Facet::explicit(NamedFacet::new("Customer"));
        let b = Facet::inferred(NamedFacet::new("Customer"));
        let c = Facet::explicit(NamedFacet::new("Client"));
        assert!(a.semantic_equals(&b));
        assert!(!a.semantic_equals(&c));
    }

    #[test]
    fn kinds_have_unique_labels() {
        let mut labels: Vec<&str> = FacetKind::ALL.iter().map(|k| k.as_str()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), FacetKind::ALL.len());
    }

    #[test]
    fn serializes_kind_and_payload() {
        let facet = Facet::synthesized(IconFacet {
            method: "iconName".into(),
        });
        let json = serde_json::to_value(&facet).unwrap_or_default();
        assert_eq!(json["kind"], "icon");
        assert_eq!(json["payload"]["method"], "iconName");
        assert_eq!(json["precedence"], "synthesized");
        assert_eq!(json["source"], "convention");
    }
}
