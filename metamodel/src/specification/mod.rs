//! Introspected domain types and their members.

pub mod loader;

use serde::Serialize;

pub use loader::SpecificationLoader;

use crate::descriptor::{MethodDescriptor, ParameterDescriptor, TypeDescriptor};
use crate::facet::{FacetHolder, LogicalTypeFacet, NamedFacet};
use crate::identifier::{FeatureType, Identifier};

/// An action parameter.
#[derive(Debug, Clone)]
pub struct ActionParameter {
    pub(crate) holder: FacetHolder,
    pub(crate) descriptor: ParameterDescriptor,
    pub(crate) index: usize,
}

impl ActionParameter {
    /// The parameter's facets.
    #[must_use]
    pub fn holder(&self) -> &FacetHolder {
        &self.holder
    }

    /// The declared parameter.
    #[must_use]
    pub fn descriptor(&self) -> &ParameterDescriptor {
        &self.descriptor
    }

    /// Zero-based position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }
}

/// A property, collection or action.
#[derive(Debug, Clone)]
pub struct ObjectMember {
    pub(crate) id: String,
    pub(crate) holder: FacetHolder,
    pub(crate) method: MethodDescriptor,
    pub(crate) parameters: Vec<ActionParameter>,
}

impl ObjectMember {
    /// Member id, unique within the type.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Property, collection or action.
    #[must_use]
    pub fn feature_type(&self) -> FeatureType {
        self.holder.feature_type()
    }

    /// The member's facets.
    #[must_use]
    pub fn holder(&self) -> &FacetHolder {
        &self.holder
    }

    /// The member's identity.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        self.holder.identifier()
    }

    /// The accessor or action method.
    #[must_use]
    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    /// Action parameters; empty for properties and collections.
    #[must_use]
    pub fn parameters(&self) -> &[ActionParameter] {
        &self.parameters
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.holder
            .lookup::<NamedFacet>()
            .map_or(self.id.as_str(), |n| n.text.as_str())
    }
}

/// An introspected domain type.
#[derive(Debug, Clone)]
pub struct ObjectSpecification {
    pub(crate) descriptor: TypeDescriptor,
    pub(crate) holder: FacetHolder,
    pub(crate) properties: Vec<ObjectMember>,
    pub(crate) collections: Vec<ObjectMember>,
    pub(crate) actions: Vec<ObjectMember>,
    pub(crate) methods: Vec<MethodDescriptor>,
    pub(crate) unclaimed_methods: Vec<MethodDescriptor>,
}

impl ObjectSpecification {
    /// The registered descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// The type's facets.
    #[must_use]
    pub fn holder(&self) -> &FacetHolder {
        &self.holder
    }

    /// The type's identity.
    #[must_use]
    pub fn identifier(&self) -> &Identifier {
        self.holder.identifier()
    }

    /// The logical type name.
    #[must_use]
    pub fn logical_type_name(&self) -> &str {
        self.holder
            .lookup::<LogicalTypeFacet>()
            .map_or(self.descriptor.type_name.as_str(), |l| l.name.as_str())
    }

    /// Singular display name.
    #[must_use]
    pub fn singular_name(&self) -> String {
        self.holder
            .lookup::<NamedFacet>()
            .map_or_else(|| self.descriptor.natural_name(), |n| n.text.clone())
    }

    /// Properties in member order.
    #[must_use]
    pub fn properties(&self) -> &[ObjectMember] {
        &self.properties
    }

    /// Collections in member order.
    #[must_use]
    pub fn collections(&self) -> &[ObjectMember] {
        &self.collections
    }

    /// Actions in member order.
    #[must_use]
    pub fn actions(&self) -> &[ObjectMember] {
        &self.actions
    }

    /// Properties, then collections, then actions.
    pub fn members(&self) -> impl Iterator<Item = &ObjectMember> {
        self.properties
            .iter()
            .chain(&self.collections)
            .chain(&self.actions)
    }

    /// A member by id.
    #[must_use]
    pub fn member(&self, id: &str) -> Option<&ObjectMember> {
        self.members().find(|m| m.id == id)
    }

    /// Every introspectable method of the type, including inherited ones.
    #[must_use]
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// Methods no member or factory claimed.
    #[must_use]
    pub fn unclaimed_methods(&self) -> &[MethodDescriptor] {
        &self.unclaimed_methods
    }
}

/// Serializable summary of a specification, used by the JSON dump.
#[derive(Debug, Serialize)]
pub(crate) struct SpecificationSummary<'a> {
    pub(crate) logical_type: &'a str,
    pub(crate) type_name: &'a str,
    pub(crate) facets: Vec<&'a crate::facet::Facet>,
    pub(crate) members: Vec<MemberSummary<'a>>,
    pub(crate) unclaimed_methods: Vec<&'a str>,
}

/// Serializable summary of a member.
#[derive(Debug, Serialize)]
pub(crate) struct MemberSummary<'a> {
    pub(crate) id: &'a str,
    pub(crate) feature_type: FeatureType,
    pub(crate) facets: Vec<&'a crate::facet::Facet>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) parameters: Vec<ParameterSummary<'a>>,
}

/// Serializable summary of a parameter.
#[derive(Debug, Serialize)]
pub(crate) struct ParameterSummary<'a> {
    pub(crate) index: usize,
    pub(crate) name: &'a str,
    pub(crate) facets: Vec<&'a crate::facet::Facet>,
}

impl ObjectSpecification {
    pub(crate) fn summary(&self) -> SpecificationSummary<'_> {
        SpecificationSummary {
            logical_type: self.logical_type_name(),
            type_name: &self.descriptor.type_name,
            facets: self.holder.facets().collect(),
            members: self
                .members()
                .map(|member| MemberSummary {
                    id: &member.id,
                    feature_type: member.feature_type(),
                    facets: member.holder.facets().collect(),
                    parameters: member
                        .parameters
                        .iter()
                        .map(|p| ParameterSummary {
                            index: p.index,
                            name: &p.descriptor.name,
                            facets: p.holder.facets().collect(),
                        })
                        .collect(),
                })
                .collect(),
            unclaimed_methods: self.unclaimed_methods.iter().map(|m| m.name.as_str()).collect(),
        }
    }
}
