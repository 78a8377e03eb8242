//! Registration-time metadata for domain types.
//!
//! A [`TypeDescriptor`] is the declarative stand-in for a reflected class: its
//! name, place in the type hierarchy, annotations and methods. Descriptors are
//! plain serde data so they can be registered programmatically through the
//! fluent `with_*` methods or loaded from TOML/JSON descriptor files.

pub mod annotation;
pub mod registry;

use serde::{Deserialize, Serialize};

pub use annotation::{Annotation, AnnotationLookup};
pub use registry::TypeRegistry;

use crate::naming;

/// Whether a type is concrete, abstract or an interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    /// Concrete class.
    #[default]
    Class,
    /// Abstract class.
    Abstract,
    /// Interface.
    Interface,
}

/// Primitive (non-nullable) value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrimitiveKind {
    /// Primitive integer.
    Integer,
    /// Primitive boolean.
    Boolean,
    /// Primitive floating point.
    Decimal,
}

/// The declared type of a method return value or parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueType {
    /// No value.
    #[default]
    Void,
    /// Text.
    String,
    /// Boxed integer.
    Integer,
    /// Boxed boolean.
    Boolean,
    /// Boxed decimal.
    Decimal,
    /// Calendar date.
    Date,
    /// Non-nullable primitive.
    Primitive(PrimitiveKind),
    /// Reference to another domain type, by type name.
    Reference(String),
    /// Collection of elements.
    Collection(Box<ValueType>),
    /// Explicitly nullable wrapper.
    Optional(Box<ValueType>),
}

impl ValueType {
    /// Strips an `Optional` wrapper, if any.
    #[must_use]
    pub fn unwrapped(&self) -> &ValueType {
        match self {
            ValueType::Optional(inner) => inner.unwrapped(),
            other => other,
        }
    }

    /// Returns true for `Void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, ValueType::Void)
    }

    /// Returns true for text, optional or not.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self.unwrapped(), ValueType::String)
    }

    /// Returns true for boxed or primitive booleans.
    #[must_use]
    pub fn is_boolean(&self) -> bool {
        matches!(
            self.unwrapped(),
            ValueType::Boolean | ValueType::Primitive(PrimitiveKind::Boolean)
        )
    }

    /// Returns true for primitives.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, ValueType::Primitive(_))
    }

    /// Returns true for collections.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self.unwrapped(), ValueType::Collection(_))
    }

    /// Returns true for the explicitly nullable wrapper.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, ValueType::Optional(_))
    }
}

/// A declared parameter of a method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParameterDescriptor {
    /// Parameter name.
    pub name: String,
    /// Declared type.
    pub value_type: ValueType,
    /// Parameter annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ParameterDescriptor {
    /// Creates an unannotated parameter.
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
            annotations: Vec::new(),
        }
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A declared method of a domain type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct MethodDescriptor {
    /// Method name.
    pub name: String,
    /// Declared return type.
    #[serde(default)]
    pub returns: ValueType,
    /// Declared parameters, in order.
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Method annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MethodDescriptor {
    /// Creates an unannotated method without parameters.
    pub fn new(name: impl Into<String>, returns: ValueType) -> Self {
        Self {
            name: name.into(),
            returns,
            parameters: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Appends a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Adds an annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Number of declared parameters.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.parameters.len()
    }

    /// Returns true if the method takes no parameters and returns a value.
    #[must_use]
    pub fn is_nullary_query(&self) -> bool {
        self.parameters.is_empty() && !self.returns.is_void()
    }
}

/// A domain type registered with the metamodel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TypeDescriptor {
    /// Fully qualified type name (e.g. `"demo.Customer"`).
    pub type_name: String,
    /// Concrete, abstract or interface.
    #[serde(default)]
    pub kind: TypeKind,
    /// Type name of the direct super type.
    #[serde(default)]
    pub super_type: Option<String>,
    /// Type names of directly implemented interfaces.
    #[serde(default)]
    pub interfaces: Vec<String>,
    /// Type-level annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Methods declared directly on this type.
    #[serde(default)]
    pub methods: Vec<MethodDescriptor>,
}

impl TypeDescriptor {
    /// Creates an empty concrete type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: TypeKind::Class,
            super_type: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Sets the type kind.
    #[must_use]
    pub fn with_kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the direct super type.
    #[must_use]
    pub fn extends(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Adds a type-level annotation.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Adds a declared method.
    #[must_use]
    pub fn with_method(mut self, method: MethodDescriptor) -> Self {
        self.methods.push(method);
        self
    }

    /// The last dot-separated segment of the type name.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        self.type_name
            .rsplit('.')
            .next()
            .unwrap_or(self.type_name.as_str())
    }

    /// The logical type name declared by `@DomainObject`, if any.
    #[must_use]
    pub fn explicit_logical_type_name(&self) -> Option<&str> {
        self.annotations
            .domain_object()
            .and_then(|d| d.logical_type_name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// The logical type name: explicit if declared, the type name otherwise.
    #[must_use]
    pub fn logical_type_name(&self) -> &str {
        self.explicit_logical_type_name()
            .unwrap_or(self.type_name.as_str())
    }

    /// The naturalized simple name, used when no name is declared.
    #[must_use]
    pub fn natural_name(&self) -> String {
        naming::natural_name(self.simple_name())
    }
}

#[cfg(test)]
mod tests {
    use super::annotation::DomainObjectAnnotation;
    use super::*;

    #[test]
    fn logical_type_name_prefers_explicit() {
        let plain = TypeDescriptor::new("demo.dom.Customer");
        assert_eq!(plain.simple_name(), "Customer");
        assert_eq!(plain.logical_type_name(), "demo.dom.Customer");

        let named = plain.with_annotation(Annotation::DomainObject(DomainObjectAnnotation {
            logical_type_name: Some(" demo.Customer ".into()),
            ..DomainObjectAnnotation::default()
        }));
        assert_eq!(named.logical_type_name(), "demo.Customer");
    }

    #[test]
    fn blank_logical_type_name_is_ignored() {
        let blank = TypeDescriptor::new("demo.Order").with_annotation(Annotation::DomainObject(
            DomainObjectAnnotation {
                logical_type_name: Some("  ".into()),
                ..DomainObjectAnnotation::default()
            },
        ));
        assert_eq!(blank.explicit_logical_type_name(), None);
        assert_eq!(blank.logical_type_name(), "demo.Order");
    }

    #[test]
    fn value_type_queries_see_through_optional() {
        let text = ValueType::Optional(Box::new(ValueType::String));
        assert!(text.is_string());
        assert!(text.is_optional());
        assert!(!text.is_primitive());
        assert!(ValueType::Primitive(PrimitiveKind::Boolean).is_boolean());
        assert!(ValueType::Collection(Box::new(ValueType::Reference("demo.Order".into())))
            .is_collection());
    }
}
