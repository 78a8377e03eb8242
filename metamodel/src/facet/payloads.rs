//! Payload structs, one per facet family.

use std::fmt;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::descriptor::annotation::{Nature, Position, SemanticsOf, Where};
use crate::descriptor::ValueType;
use crate::layout::GroupIdAndName;

/// The logical type name of a domain type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogicalTypeFacet {
    /// Logical type name.
    pub name: String,
}

/// The nature of a domain type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NatureFacet {
    /// Declared or inferred nature.
    pub nature: Nature,
}

macro_rules! text_facets {
    ($($(#[$doc:meta])* $name:ident;)+) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
            pub struct $name {
                /// The text.
                pub text: String,
            }

            impl $name {
                /// Wraps a text.
                pub fn new(text: impl Into<String>) -> Self {
                    Self { text: text.into() }
                }
            }
        )+
    };
}

text_facets! {
    /// Singular display name.
    NamedFacet;
    /// Plural display name of a type.
    PluralFacet;
    /// Description, shown as a tooltip.
    DescribedFacet;
}

/// Icon name obtained from a method of the domain object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconFacet {
    /// Method returning the icon name.
    pub method: String,
}

/// A CSS class hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CssClassFacet {
    /// The same class for every instance.
    Static(String),
    /// Obtained per instance from a method.
    Method(String),
}

/// A font-awesome icon hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CssClassFaFacet {
    /// Icon classes, e.g. `"fa fa-fw fa-trash"`.
    pub icon: String,
    /// Placement relative to the label.
    pub position: Position,
}

impl CssClassFaFacet {
    /// Normalizes an icon name: `"trash"` and `"fa-trash"` both become
    /// `"fa fa-fw fa-trash"`; classes already carrying `fa ` are kept.
    pub fn new(icon: &str, position: Position) -> Self {
        let trimmed = icon.trim();
        let icon = if trimmed.starts_with("fa ") || trimmed.contains(" fa-") {
            trimmed.to_owned()
        } else if trimmed.starts_with("fa-") {
            format!("fa fa-fw {trimmed}")
        } else {
            format!("fa fa-fw fa-{trimmed}")
        };
        Self { icon, position }
    }
}

/// Page size of a collection or type rendered as a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PagedFacet {
    /// Rows per page.
    pub page_size: usize,
}

/// Whether a member may be edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditingFacet {
    /// Editable.
    Enabled,
    /// Read-only, with an optional reason shown to the user.
    Disabled {
        /// Reason shown to the user.
        reason: Option<String>,
    },
}

impl EditingFacet {
    /// Reason shown when editing is vetoed.
    pub const DEFAULT_REASON: &'static str = "Disabled";

    /// Returns the veto reason, or `None` if editable.
    #[must_use]
    pub fn disabled_reason(&self) -> Option<&str> {
        match self {
            EditingFacet::Enabled => None,
            EditingFacet::Disabled { reason } => {
                Some(reason.as_deref().unwrap_or(Self::DEFAULT_REASON))
            }
        }
    }
}

/// Reads a property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PropertyAccessorFacet {
    /// Accessor method.
    pub method: String,
    /// Declared type of the value.
    pub value_type: ValueType,
}

/// Writes a property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySetterFacet {
    /// `setXxx` or `modifyXxx`.
    pub setter: String,
    /// `clearXxx`, if declared.
    pub clear: Option<String>,
}

/// Reads a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CollectionAccessorFacet {
    /// Accessor method.
    pub method: String,
    /// Declared element type.
    pub element_type: ValueType,
}

/// Invokes an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionInvocationFacet {
    /// Action method.
    pub method: String,
    /// Declared return type.
    pub returns: ValueType,
}

/// Position of a member among its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberOrderFacet {
    /// Dewey-decimal sequence.
    pub sequence: String,
}

/// The field set a member is rendered in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutGroupFacet {
    /// Group id and name.
    pub group: GroupIdAndName,
}

/// Number of text lines for a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MultiLineFacet {
    /// Line count.
    pub lines: u32,
}

/// Statically hidden member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HiddenFacet {
    /// Where it is hidden.
    pub location: Where,
}

/// Whether a value is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MandatoryFacet {
    /// A value is required.
    Required,
    /// A value may be omitted.
    Optional,
}

impl MandatoryFacet {
    /// Returns true for `Required`.
    #[must_use]
    pub fn is_required(self) -> bool {
        matches!(self, MandatoryFacet::Required)
    }
}

/// Maximum length of a string value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaxLengthFacet {
    /// Maximum number of characters.
    pub max: usize,
}

/// A compiled regular expression that must match a string value in full.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    compiled: Regex,
}

impl Pattern {
    /// Compiles `source`, anchored at both ends.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `source` is not a valid pattern.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let compiled = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_owned(),
            compiled,
        })
    }

    /// The pattern as written.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns true if `text` matches in full.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.compiled.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for Pattern {}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Pattern a string value must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegexFacet {
    /// The compiled pattern.
    pub pattern: Pattern,
}

/// Side-effect semantics of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionSemanticsFacet {
    /// The semantics.
    pub semantics: SemanticsOf,
}

/// Action only available while prototyping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrototypeFacet;

macro_rules! method_facets {
    ($($(#[$doc:meta])* $name:ident;)+) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
            pub struct $name {
                /// Supporting method name.
                pub method: String,
            }

            impl $name {
                /// Names the supporting method.
                pub fn new(method: impl Into<String>) -> Self {
                    Self { method: method.into() }
                }
            }
        )+
    };
}

method_facets! {
    /// `hideXxx()`: returns true to hide the member for an instance.
    HideForContextFacet;
    /// `disableXxx()`: returns a reason to disable the member for an instance.
    DisableForContextFacet;
    /// `validateXxx(v)`: returns a reason to reject a proposed value or arguments.
    ValidateFacet;
    /// `choicesXxx()`: returns the permitted values.
    ChoicesFacet;
    /// `defaultXxx()`: returns the initial value.
    DefaultValueFacet;
}

/// `autoCompleteXxx(search)`: returns values matching a search string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AutoCompleteFacet {
    /// Supporting method name.
    pub method: String,
    /// Minimum search length before the method is consulted.
    pub min_length: usize,
}

impl AutoCompleteFacet {
    /// Default minimum search length.
    pub const DEFAULT_MIN_LENGTH: usize = 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_match_in_full() {
        let Ok(pattern) = Pattern::new("[A-Z]{2}[0-9]+") else {
            unreachable!("pattern is valid");
        };
        assert!(pattern.is_match("AB123"));
        assert!(!pattern.is_match("xAB123"));
        assert!(!pattern.is_match("AB123x"));
        assert!(Pattern::new("(unclosed").is_err());
    }

    #[test]
    fn font_awesome_names_are_normalized() {
        assert_eq!(CssClassFaFacet::new("trash", Position::Left).icon, "fa fa-fw fa-trash");
        assert_eq!(CssClassFaFacet::new("fa-plus", Position::Left).icon, "fa fa-fw fa-plus");
        assert_eq!(CssClassFaFacet::new("fa fa-lg fa-cog", Position::Right).icon, "fa fa-lg fa-cog");
    }

    #[test]
    fn disabled_reason_defaults() {
        assert_eq!(EditingFacet::Enabled.disabled_reason(), None);
        assert_eq!(
            EditingFacet::Disabled { reason: None }.disabled_reason(),
            Some(EditingFacet::DEFAULT_REASON)
        );
    }
}
