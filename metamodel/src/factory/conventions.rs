//! Naming conventions of the programming model.

use crate::descriptor::MethodDescriptor;
use crate::naming::{capitalize, decapitalize};

/// `title()`.
pub const TITLE_METHOD: &str = "title";
/// `toString()`.
pub const TO_STRING_METHOD: &str = "toString";
/// `iconName()`.
pub const ICON_NAME_METHOD: &str = "iconName";
/// `cssClass()`.
pub const CSS_CLASS_METHOD: &str = "cssClass";

/// `setXxx(v)`.
pub const SET_PREFIX: &str = "set";
/// `modifyXxx(v)`.
pub const MODIFY_PREFIX: &str = "modify";
/// `clearXxx()`.
pub const CLEAR_PREFIX: &str = "clear";
/// `hideXxx()`.
pub const HIDE_PREFIX: &str = "hide";
/// `disableXxx()`.
pub const DISABLE_PREFIX: &str = "disable";
/// `validateXxx(..)` and `validateNXxx(v)`.
pub const VALIDATE_PREFIX: &str = "validate";
/// `defaultXxx()` and `defaultNXxx()`.
pub const DEFAULT_PREFIX: &str = "default";
/// `choicesXxx()` and `choicesNXxx()`.
pub const CHOICES_PREFIX: &str = "choices";
/// `autoCompleteXxx(search)` and `autoCompleteNXxx(search)`.
pub const AUTO_COMPLETE_PREFIX: &str = "autoComplete";

/// Prefixes reserved for supporting methods; such methods never become actions
/// unless explicitly annotated.
pub const SUPPORTING_PREFIXES: &[&str] = &[
    SET_PREFIX,
    MODIFY_PREFIX,
    CLEAR_PREFIX,
    HIDE_PREFIX,
    DISABLE_PREFIX,
    VALIDATE_PREFIX,
    DEFAULT_PREFIX,
    CHOICES_PREFIX,
    AUTO_COMPLETE_PREFIX,
];

const GET_PREFIX: &str = "get";
const IS_PREFIX: &str = "is";

/// Strips `prefix` from `name` when an upper-case letter or digit follows it.
#[must_use]
pub fn strip_prefix<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = name.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .filter(|c| c.is_uppercase() || c.is_ascii_digit())
        .map(|_| rest)
}

/// Returns true if `name` carries a supporting method prefix.
#[must_use]
pub fn is_supporting_method(name: &str) -> bool {
    SUPPORTING_PREFIXES
        .iter()
        .any(|prefix| strip_prefix(name, prefix).is_some())
}

/// The member id of an accessor-shaped method: `getFirstName` gives
/// `firstName`, `isActive` gives `active` if it returns a boolean.
///
/// Accessors take no parameters and return a value.
#[must_use]
pub fn accessor_member_id(method: &MethodDescriptor) -> Option<String> {
    if !method.is_nullary_query() {
        return None;
    }
    if let Some(rest) = strip_prefix(&method.name, GET_PREFIX) {
        return Some(decapitalize(rest));
    }
    strip_prefix(&method.name, IS_PREFIX)
        .filter(|_| method.returns.is_boolean())
        .map(decapitalize)
}

/// `prefix` followed by the capitalized member id: `hideName`.
#[must_use]
pub fn supporting_name(prefix: &str, member_id: &str) -> String {
    format!("{prefix}{}", capitalize(member_id))
}

/// `prefix`, the zero-based parameter index and the capitalized action id:
/// `default0PlaceOrder`.
#[must_use]
pub fn parameter_supporting_name(prefix: &str, index: usize, member_id: &str) -> String {
    format!("{prefix}{index}{}", capitalize(member_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ParameterDescriptor, PrimitiveKind, ValueType};

    #[test]
    fn prefix_must_be_followed_by_upper_case_or_digit() {
        assert_eq!(strip_prefix("hideName", "hide"), Some("Name"));
        assert_eq!(strip_prefix("default0Place", "default"), Some("0Place"));
        assert_eq!(strip_prefix("hidden", "hide"), None);
        assert_eq!(strip_prefix("settle", "set"), None);
        assert_eq!(strip_prefix("set", "set"), None);
    }

    #[test]
    fn supporting_methods() {
        assert!(is_supporting_method("validatePlaceOrder"));
        assert!(is_supporting_method("autoComplete0Customer"));
        assert!(!is_supporting_method("settle"));
        assert!(!is_supporting_method("placeOrder"));
    }

    #[test]
    fn accessor_shapes() {
        let getter = MethodDescriptor::new("getFirstName", ValueType::String);
        let is_bool = MethodDescriptor::new("isActive", ValueType::Primitive(PrimitiveKind::Boolean));
        let is_text = MethodDescriptor::new("isbn", ValueType::String);
        let is_string = MethodDescriptor::new("isCode", ValueType::String);
        let void = MethodDescriptor::new("getNothing", ValueType::Void);
        let with_param = MethodDescriptor::new("getItem", ValueType::String)
            .with_parameter(ParameterDescriptor::new("index", ValueType::Integer));

        assert_eq!(accessor_member_id(&getter).as_deref(), Some("firstName"));
        assert_eq!(accessor_member_id(&is_bool).as_deref(), Some("active"));
        assert_eq!(accessor_member_id(&is_text), None);
        assert_eq!(accessor_member_id(&is_string), None);
        assert_eq!(accessor_member_id(&void), None);
        assert_eq!(accessor_member_id(&with_param), None);
    }

    #[test]
    fn supporting_method_names() {
        assert_eq!(supporting_name(HIDE_PREFIX, "firstName"), "hideFirstName");
        assert_eq!(
            parameter_supporting_name(CHOICES_PREFIX, 1, "placeOrder"),
            "choices1PlaceOrder"
        );
    }
}
