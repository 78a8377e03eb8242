//! Stable identities for metamodel elements.
//!
//! Every consumer of the metamodel (viewers, change tracking, security policy)
//! correlates its own state to a member through an [`Identifier`]: the owning
//! logical type name, optionally a member id, optionally a parameter index.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The category of program element a facet holder represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureType {
    /// A domain type.
    Object,
    /// A scalar or reference-valued member.
    Property,
    /// A collection-valued member.
    Collection,
    /// An invokable member.
    Action,
    /// A parameter of an action.
    ActionParameter,
}

impl FeatureType {
    /// Property, collection and action.
    pub const MEMBERS: &'static [FeatureType] = &[
        FeatureType::Property,
        FeatureType::Collection,
        FeatureType::Action,
    ];

    /// Returns the kebab-case label used in reports and JSON dumps.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FeatureType::Object => "object",
            FeatureType::Property => "property",
            FeatureType::Collection => "collection",
            FeatureType::Action => "action",
            FeatureType::ActionParameter => "action-parameter",
        }
    }

    /// Returns true for property, collection and action.
    #[must_use]
    pub fn is_member(self) -> bool {
        Self::MEMBERS.contains(&self)
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logical identity of a type, member or action parameter.
///
/// Renders as `demo.Customer`, `demo.Customer#firstName` or
/// `demo.Customer#placeOrder[0]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Identifier {
    logical_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    member: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parameter: Option<usize>,
}

impl Identifier {
    /// Identifies a domain type by its logical type name.
    pub fn type_identifier(logical_type: impl Into<String>) -> Self {
        Self {
            logical_type: logical_type.into(),
            member: None,
            parameter: None,
        }
    }

    /// Identifies a member of a domain type.
    pub fn member_identifier(logical_type: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            logical_type: logical_type.into(),
            member: Some(member.into()),
            parameter: None,
        }
    }

    /// Derives a member identifier sharing this identifier's logical type.
    #[must_use]
    pub fn member(&self, member: impl Into<String>) -> Self {
        Self::member_identifier(self.logical_type.clone(), member)
    }

    /// Derives the identifier of the parameter at `index` of this member.
    #[must_use]
    pub fn parameter(&self, index: usize) -> Self {
        Self {
            logical_type: self.logical_type.clone(),
            member: self.member.clone(),
            parameter: Some(index),
        }
    }

    /// The owning logical type name.
    #[must_use]
    pub fn logical_type(&self) -> &str {
        &self.logical_type
    }

    /// The member id, if this identifies a member or parameter.
    #[must_use]
    pub fn member_id(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// The parameter index, if this identifies an action parameter.
    #[must_use]
    pub fn parameter_index(&self) -> Option<usize> {
        self.parameter
    }

    /// The identifier of the owning type.
    #[must_use]
    pub fn type_part(&self) -> Self {
        Self::type_identifier(self.logical_type.clone())
    }

    /// The full identity string, stable across metamodel rebuilds.
    #[must_use]
    pub fn full_identity_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.logical_type)?;
        if let Some(member) = &self.member {
            write!(f, "#{member}")?;
        }
        if let Some(index) = self.parameter {
            write!(f, "[{index}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_strings() {
        let ty = Identifier::type_identifier("demo.Customer");
        let member = ty.member("placeOrder");
        let param = member.parameter(1);
        assert_eq!(ty.to_string(), "demo.Customer");
        assert_eq!(member.to_string(), "demo.Customer#placeOrder");
        assert_eq!(param.full_identity_string(), "demo.Customer#placeOrder[1]");
        assert_eq!(param.type_part(), ty);
        assert_eq!(param.member_id(), Some("placeOrder"));
    }

    #[test]
    fn members_are_not_objects() {
        assert!(FeatureType::Collection.is_member());
        assert!(!FeatureType::Object.is_member());
        assert!(!FeatureType::ActionParameter.is_member());
    }
}
