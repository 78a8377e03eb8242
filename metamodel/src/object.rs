//! Runtime adapter over domain object instances.
//!
//! The metamodel never reaches into an object's fields. Everything it needs
//! (accessor values, supporting method answers, title parts) is obtained by
//! invoking a named method through [`DomainObject::invoke`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::InvocationError;

/// A value passed to or returned from a domain object method.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text.
    Str(String),
    /// Integer.
    Int(i64),
    /// Boolean.
    Bool(bool),
    /// Decimal.
    Decimal(f64),
    /// Calendar date, ISO-8601 (`YYYY-MM-DD`).
    Date(String),
    /// Reference to another domain object.
    Object(ObjectRef),
    /// Ordered values, as returned by collection accessors and choices.
    List(Vec<Value>),
}

impl Value {
    /// The plain string representation.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        self.plain_string_at(0)
    }

    fn plain_string_at(&self, depth: usize) -> String {
        match self {
            Value::Str(s) | Value::Date(s) => s.clone(),
            Value::Int(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Decimal(d) => d.to_string(),
            Value::Object(object) => object.plain_string_at(depth + 1),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.plain_string_at(depth)).collect();
                format!("[{}]", parts.join(", "))
            }
        }
    }

    /// Borrows the text of a `Str`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value of a `Bool`.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The referenced object of an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Decimal(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

/// A domain object instance as seen by the metamodel.
pub trait DomainObject: Send + Sync {
    /// Invokes a method by name. `Ok(None)` is a null return.
    ///
    /// # Errors
    ///
    /// Returns an [`InvocationError`] when the method does not exist or
    /// fails. Recoverable errors raised by supporting methods are turned
    /// into vetoes by the caller.
    fn invoke(&self, method: &str, args: &[Option<Value>]) -> Result<Option<Value>, InvocationError>;
}

/// How many `toString()` hops [`ObjectRef::plain_string`] follows.
pub const MAX_PLAIN_STRING_DEPTH: usize = 3;

/// A domain object paired with its logical type name.
#[derive(Clone)]
pub struct ObjectRef {
    logical_type: String,
    target: Arc<dyn DomainObject>,
}

impl ObjectRef {
    /// Wraps a domain object.
    pub fn new(logical_type: impl Into<String>, target: impl DomainObject + 'static) -> Self {
        Self::from_arc(logical_type, Arc::new(target))
    }

    /// Wraps an already shared domain object.
    pub fn from_arc(logical_type: impl Into<String>, target: Arc<dyn DomainObject>) -> Self {
        Self {
            logical_type: logical_type.into(),
            target,
        }
    }

    /// The logical type name used to look up the object's specification.
    #[must_use]
    pub fn logical_type(&self) -> &str {
        &self.logical_type
    }

    /// Invokes a method on the wrapped object.
    ///
    /// # Errors
    ///
    /// Propagates the object's [`InvocationError`].
    pub fn invoke(&self, method: &str, args: &[Option<Value>]) -> Result<Option<Value>, InvocationError> {
        self.target.invoke(method, args)
    }

    /// `toString()` if the object answers it, its logical type name otherwise.
    ///
    /// Objects whose `toString()` returns further objects are followed at
    /// most [`MAX_PLAIN_STRING_DEPTH`] levels deep.
    #[must_use]
    pub fn plain_string(&self) -> String {
        self.plain_string_at(0)
    }

    fn plain_string_at(&self, depth: usize) -> String {
        if depth >= MAX_PLAIN_STRING_DEPTH {
            return self.logical_type.clone();
        }
        match self.invoke("toString", &[]) {
            Ok(Some(value)) => value.plain_string_at(depth),
            _ => self.logical_type.clone(),
        }
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("logical_type", &self.logical_type)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.logical_type == other.logical_type && Arc::ptr_eq(&self.target, &other.target)
    }
}

type MethodFn = dyn Fn(&[Option<Value>]) -> Result<Option<Value>, InvocationError> + Send + Sync;

/// A domain object assembled from constants and closures.
///
/// ```
/// use causeway_metamodel::object::{DomainObject, Record, Value};
///
/// let customer = Record::new()
///     .with_value("getFirstName", "Ada")
///     .with_null("getMiddleName");
/// assert_eq!(customer.invoke("getFirstName", &[]), Ok(Some(Value::from("Ada"))));
/// assert_eq!(customer.invoke("getMiddleName", &[]), Ok(None));
/// ```
#[derive(Default, Clone)]
pub struct Record {
    methods: HashMap<String, Arc<MethodFn>>,
}

impl Record {
    /// Creates a record that answers nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers `method` with a constant.
    #[must_use]
    pub fn with_value(self, method: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.with_method(method, move |_| Ok(Some(value.clone())))
    }

    /// Answers `method` with null.
    #[must_use]
    pub fn with_null(self, method: &str) -> Self {
        self.with_method(method, |_| Ok(None))
    }

    /// Answers `method` by calling `body`.
    #[must_use]
    pub fn with_method<F>(mut self, method: &str, body: F) -> Self
    where
        F: Fn(&[Option<Value>]) -> Result<Option<Value>, InvocationError> + Send + Sync + 'static,
    {
        self.methods.insert(method.to_owned(), Arc::new(body));
        self
    }
}

impl DomainObject for Record {
    fn invoke(&self, method: &str, args: &[Option<Value>]) -> Result<Option<Value>, InvocationError> {
        match self.methods.get(method) {
            Some(body) => body(args),
            None => Err(InvocationError::fatal(format!("no such method: {method}"))),
        }
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.methods.keys().collect();
        names.sort();
        f.debug_struct("Record").field("methods", &names).finish()
    }
}

/// Key naming the logical type of a nested JSON object.
pub const JSON_TYPE_KEY: &str = "$type";

/// A domain object backed by a JSON object: each key answers the method of
/// the same name with a constant.
///
/// Nested objects must carry a [`JSON_TYPE_KEY`] entry naming their logical
/// type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl JsonObject {
    /// Wraps a JSON map.
    #[must_use]
    pub fn new(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { fields }
    }

    /// The declared logical type, if any.
    #[must_use]
    pub fn logical_type(&self) -> Option<&str> {
        self.fields.get(JSON_TYPE_KEY).and_then(serde_json::Value::as_str)
    }

    /// Converts a JSON document into an [`ObjectRef`], using `$type` when
    /// present and `fallback_type` otherwise.
    ///
    /// Returns `None` if the document is not a JSON object.
    #[must_use]
    pub fn into_object_ref(value: serde_json::Value, fallback_type: &str) -> Option<ObjectRef> {
        match value {
            serde_json::Value::Object(fields) => {
                let object = JsonObject::new(fields);
                let logical_type = object.logical_type().unwrap_or(fallback_type).to_owned();
                Some(ObjectRef::new(logical_type, object))
            }
            _ => None,
        }
    }
}

fn json_to_value(json: &serde_json::Value) -> Result<Option<Value>, InvocationError> {
    Ok(match json {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(Value::Bool(*b)),
        serde_json::Value::Number(n) => Some(match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Decimal(n.as_f64().unwrap_or_default()),
        }),
        serde_json::Value::String(s) => Some(Value::Str(s.clone())),
        serde_json::Value::Array(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                if let Some(value) = json_to_value(item)? {
                    values.push(value);
                }
            }
            Some(Value::List(values))
        }
        serde_json::Value::Object(fields) => {
            let nested = JsonObject::new(fields.clone());
            let Some(logical_type) = nested.logical_type().map(str::to_owned) else {
                return Err(InvocationError::fatal(format!(
                    "nested object without {JSON_TYPE_KEY}"
                )));
            };
            Some(Value::Object(ObjectRef::new(logical_type, nested)))
        }
    })
}

impl DomainObject for JsonObject {
    fn invoke(&self, method: &str, _args: &[Option<Value>]) -> Result<Option<Value>, InvocationError> {
        match self.fields.get(method) {
            Some(json) => json_to_value(json),
            None => Err(InvocationError::fatal(format!("no such method: {method}"))),
        }
    }
}
