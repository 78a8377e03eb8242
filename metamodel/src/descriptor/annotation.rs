//! Declarative annotations carried by type, method and parameter descriptors.
//!
//! These mirror the applib annotations a domain developer writes on domain
//! code. Every field is optional: an absent value means "not specified" and
//! leaves the decision to conventions, configuration or framework defaults.

use serde::{Deserialize, Serialize};

/// Kind of domain type, as declared or as inferred from its descriptor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Nature {
    /// Persisted entity.
    Entity,
    /// Stateless view model, recreated from its memento.
    ViewModel,
    /// Value type with no identity.
    Value,
    /// Abstract type; never instantiated directly.
    Abstract,
    /// Interface type.
    Interface,
    /// Not declared.
    #[default]
    Unspecified,
}

impl Nature {
    /// Returns true for entities and view models.
    #[must_use]
    pub fn is_managed(self) -> bool {
        matches!(self, Nature::Entity | Nature::ViewModel)
    }
}

/// Whether a type or property may be edited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Editing {
    /// Defer to the type-level setting or configuration.
    #[default]
    AsConfigured,
    /// Editable.
    Enabled,
    /// Read-only.
    Disabled,
}

/// Whether a property or parameter value is required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Optionality {
    /// Defer to type-based inference and defaults.
    #[default]
    Default,
    /// A value is required.
    Mandatory,
    /// A value may be omitted.
    Optional,
}

/// Where a member is hidden.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Where {
    /// Hidden in every context.
    Everywhere,
    /// Hidden in parented and standalone tables.
    AllTables,
    /// Hidden on the owning object's form.
    ObjectForms,
    /// Not hidden.
    #[default]
    Nowhere,
}

impl Where {
    /// Returns true if this location hides the member on an object form.
    #[must_use]
    pub fn hides_on_forms(self) -> bool {
        matches!(self, Where::Everywhere | Where::ObjectForms)
    }
}

/// Side-effect semantics of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SemanticsOf {
    /// No side effects.
    Safe,
    /// No side effects; results may be cached for the request.
    SafeAndRequestCacheable,
    /// Repeated invocations have the same effect as one.
    Idempotent,
    /// Idempotent, with a confirmation prompt.
    IdempotentAreYouSure,
    /// Every invocation has an effect.
    NonIdempotent,
    /// Non-idempotent, with a confirmation prompt.
    NonIdempotentAreYouSure,
}

impl SemanticsOf {
    /// Returns true for the safe variants.
    #[must_use]
    pub fn is_safe(self) -> bool {
        matches!(self, SemanticsOf::Safe | SemanticsOf::SafeAndRequestCacheable)
    }

    /// Returns true if the viewer should ask for confirmation.
    #[must_use]
    pub fn is_are_you_sure(self) -> bool {
        matches!(
            self,
            SemanticsOf::IdempotentAreYouSure | SemanticsOf::NonIdempotentAreYouSure
        )
    }
}

/// Deployment restriction of an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestrictTo {
    /// Available in every environment.
    #[default]
    NoRestrictions,
    /// Only available while prototyping.
    Prototyping,
}

/// Placement of a font-awesome icon relative to its label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    /// Before the label.
    #[default]
    Left,
    /// After the label.
    Right,
}

/// `@DomainObject`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DomainObjectAnnotation {
    /// Explicit logical type name.
    pub logical_type_name: Option<String>,
    /// Declared nature.
    pub nature: Option<Nature>,
    /// Type-level editing policy.
    pub editing: Editing,
    /// Reason shown when editing is disabled.
    pub editing_disabled_reason: Option<String>,
}

/// `@DomainObjectLayout`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DomainObjectLayoutAnnotation {
    /// Singular name.
    pub named: Option<String>,
    /// Plural name.
    pub plural: Option<String>,
    /// Description.
    pub described_as: Option<String>,
    /// CSS class.
    pub css_class: Option<String>,
    /// Font-awesome icon.
    pub css_class_fa: Option<String>,
    /// Page size when rendered in a table.
    pub paged: Option<usize>,
}

/// `@Title`, marking a member as a title component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TitleAnnotation {
    /// Dewey-decimal position among the type's title components.
    pub sequence: String,
    /// Text emitted before the component.
    pub prepend: String,
    /// Text emitted after the component.
    pub append: String,
    /// Maximum rendered length, unlimited when absent.
    pub abbreviated_to: Option<usize>,
}

impl Default for TitleAnnotation {
    fn default() -> Self {
        Self {
            sequence: "1.0".to_owned(),
            prepend: " ".to_owned(),
            append: String::new(),
            abbreviated_to: None,
        }
    }
}

/// `@Property`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PropertyAnnotation {
    /// Editing policy.
    pub editing: Editing,
    /// Reason shown when editing is disabled.
    pub editing_disabled_reason: Option<String>,
    /// Whether a value is required.
    pub optionality: Optionality,
    /// Maximum length of a string value.
    pub max_length: Option<usize>,
    /// Pattern a string value must match in full.
    pub regex_pattern: Option<String>,
    /// Where the property is hidden.
    pub hidden: Option<Where>,
}

/// `@PropertyLayout`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PropertyLayoutAnnotation {
    /// Display name.
    pub named: Option<String>,
    /// Description.
    pub described_as: Option<String>,
    /// CSS class.
    pub css_class: Option<String>,
    /// Dewey-decimal position within the field set.
    pub sequence: Option<String>,
    /// Field set id.
    pub field_set_id: Option<String>,
    /// Field set name.
    pub field_set_name: Option<String>,
    /// Number of text lines for string values.
    pub multi_line: Option<u32>,
}

/// `@Collection`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CollectionAnnotation {
    /// Where the collection is hidden.
    pub hidden: Option<Where>,
}

/// `@CollectionLayout`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CollectionLayoutAnnotation {
    /// Display name.
    pub named: Option<String>,
    /// Description.
    pub described_as: Option<String>,
    /// CSS class.
    pub css_class: Option<String>,
    /// Dewey-decimal position among the type's collections.
    pub sequence: Option<String>,
    /// Page size.
    pub paged: Option<usize>,
}

/// `@Action`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ActionAnnotation {
    /// Side-effect semantics.
    pub semantics: Option<SemanticsOf>,
    /// Deployment restriction.
    pub restrict_to: RestrictTo,
    /// Where the action is hidden.
    pub hidden: Option<Where>,
}

/// `@ActionLayout`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ActionLayoutAnnotation {
    /// Display name.
    pub named: Option<String>,
    /// Description.
    pub described_as: Option<String>,
    /// CSS class.
    pub css_class: Option<String>,
    /// Font-awesome icon.
    pub css_class_fa: Option<String>,
    /// Placement of the icon.
    pub css_class_fa_position: Position,
    /// Dewey-decimal position.
    pub sequence: Option<String>,
    /// Field set the action is associated with, by id.
    pub field_set_id: Option<String>,
    /// Field set the action is associated with, by name.
    pub field_set_name: Option<String>,
}

/// `@Parameter`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParameterAnnotation {
    /// Whether an argument is required.
    pub optionality: Optionality,
    /// Maximum length of a string argument.
    pub max_length: Option<usize>,
    /// Pattern a string argument must match in full.
    pub regex_pattern: Option<String>,
}

/// `@ParameterLayout`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ParameterLayoutAnnotation {
    /// Display name.
    pub named: Option<String>,
    /// Description.
    pub described_as: Option<String>,
    /// Number of text lines for string arguments.
    pub multi_line: Option<u32>,
}

/// A single annotation on a type, method or parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "annotation", rename_all = "kebab-case")]
pub enum Annotation {
    /// `@DomainObject`.
    DomainObject(DomainObjectAnnotation),
    /// `@DomainObjectLayout`.
    DomainObjectLayout(DomainObjectLayoutAnnotation),
    /// `@Title`.
    Title(TitleAnnotation),
    /// `@Property`.
    Property(PropertyAnnotation),
    /// `@PropertyLayout`.
    PropertyLayout(PropertyLayoutAnnotation),
    /// `@Collection`.
    Collection(CollectionAnnotation),
    /// `@CollectionLayout`.
    CollectionLayout(CollectionLayoutAnnotation),
    /// `@Action`.
    Action(ActionAnnotation),
    /// `@ActionLayout`.
    ActionLayout(ActionLayoutAnnotation),
    /// `@Parameter`.
    Parameter(ParameterAnnotation),
    /// `@ParameterLayout`.
    ParameterLayout(ParameterLayoutAnnotation),
    /// `@Programmatic`: excluded from the metamodel.
    Programmatic,
}

macro_rules! annotation_lookups {
    ($($(#[$doc:meta])* $fn_name:ident => $variant:ident($ty:ty);)+) => {
        /// Typed lookups over a list of annotations.
        pub trait AnnotationLookup {
            $(
                $(#[$doc])*
                fn $fn_name(&self) -> Option<&$ty>;
            )+

            /// Returns true if `@Programmatic` is present.
            fn is_programmatic(&self) -> bool;
        }

        impl AnnotationLookup for [Annotation] {
            $(
                fn $fn_name(&self) -> Option<&$ty> {
                    self.iter().find_map(|a| match a {
                        Annotation::$variant(inner) => Some(inner),
                        _ => None,
                    })
                }
            )+

            fn is_programmatic(&self) -> bool {
                self.iter().any(|a| matches!(a, Annotation::Programmatic))
            }
        }
    };
}

annotation_lookups! {
    /// The `@DomainObject` annotation, if present.
    domain_object => DomainObject(DomainObjectAnnotation);
    /// The `@DomainObjectLayout` annotation, if present.
    domain_object_layout => DomainObjectLayout(DomainObjectLayoutAnnotation);
    /// The `@Title` annotation, if present.
    title => Title(TitleAnnotation);
    /// The `@Property` annotation, if present.
    property => Property(PropertyAnnotation);
    /// The `@PropertyLayout` annotation, if present.
    property_layout => PropertyLayout(PropertyLayoutAnnotation);
    /// The `@Collection` annotation, if present.
    collection => Collection(CollectionAnnotation);
    /// The `@CollectionLayout` annotation, if present.
    collection_layout => CollectionLayout(CollectionLayoutAnnotation);
    /// The `@Action` annotation, if present.
    action => Action(ActionAnnotation);
    /// The `@ActionLayout` annotation, if present.
    action_layout => ActionLayout(ActionLayoutAnnotation);
    /// The `@Parameter` annotation, if present.
    parameter => Parameter(ParameterAnnotation);
    /// The `@ParameterLayout` annotation, if present.
    parameter_layout => ParameterLayout(ParameterLayoutAnnotation);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_defaults() {
        let title = TitleAnnotation::default();
        assert_eq!(title.sequence, "1.0");
        assert_eq!(title.prepend, " ");
        assert_eq!(title.append, "");
        assert_eq!(title.abbreviated_to, None);
    }

    #[test]
    fn lookup_finds_first_matching_variant() {
        let annotations = vec![
            Annotation::Programmatic,
            Annotation::Property(PropertyAnnotation {
                max_length: Some(30),
                ..PropertyAnnotation::default()
            }),
        ];
        assert!(annotations.is_programmatic());
        assert_eq!(annotations.property().and_then(|p| p.max_length), Some(30));
        assert!(annotations.title().is_none());
    }

    #[test]
    fn deserializes_tagged_annotations() {
        let parsed: Vec<Annotation> = serde_json::from_str(
            r#"[{"annotation":"title","sequence":"2","prepend":","},
                {"annotation":"action","semantics":"safe"},
                {"annotation":"programmatic"}]"#,
        )
        .unwrap_or_default();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed.title().map(|t| t.sequence.as_str()), Some("2"));
        assert_eq!(parsed.title().map(|t| t.append.as_str()), Some(""));
        assert_eq!(
            parsed.action().and_then(|a| a.semantics),
            Some(SemanticsOf::Safe)
        );
    }
}
