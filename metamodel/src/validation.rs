//! Post-build validation: failures and the validator contract.
//!
//! Validators run once the whole metamodel is built. Each inspects the
//! read-only snapshot and appends [`ValidationFailure`]s; none of them can
//! mutate the metamodel or stop the others from running.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;
use crate::metamodel::MetaModel;

/// A structural problem found after the metamodel was built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// The type, member or parameter the problem was found on.
    pub origin: Identifier,
    /// Name of the validator that reported it.
    pub validator: String,
    /// Message with `{}` placeholders.
    pub message_template: String,
    /// Placeholder values, in order.
    pub args: Vec<String>,
}

impl ValidationFailure {
    /// Creates a failure.
    pub fn new(
        origin: Identifier,
        validator: impl Into<String>,
        message_template: impl Into<String>,
        args: Vec<String>,
    ) -> Self {
        Self {
            origin,
            validator: validator.into(),
            message_template: message_template.into(),
            args,
        }
    }

    /// The message with placeholders substituted in order.
    ///
    /// Surplus placeholders are left as-is; surplus args are ignored.
    #[must_use]
    pub fn message(&self) -> String {
        let mut out = String::with_capacity(self.message_template.len());
        let mut args = self.args.iter();
        let mut rest = self.message_template.as_str();
        while let Some(at) = rest.find("{}") {
            out.push_str(&rest[..at]);
            match args.next() {
                Some(arg) => out.push_str(arg),
                None => out.push_str("{}"),
            }
            rest = &rest[at + 2..];
        }
        out.push_str(rest);
        out
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.validator, self.origin, self.message())
    }
}

/// Append-only collection of validation failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationFailures {
    failures: Vec<ValidationFailure>,
}

impl ValidationFailures {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a failure.
    pub fn push(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }

    /// Appends a failure built from its parts.
    pub fn add(
        &mut self,
        origin: Identifier,
        validator: &str,
        message_template: &str,
        args: Vec<String>,
    ) {
        self.push(ValidationFailure::new(origin, validator, message_template, args));
    }

    /// Number of failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns true if nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// All failures in the order they were reported.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationFailure> {
        self.failures.iter()
    }

    /// Failures reported on an origin or anything below it.
    pub fn for_origin<'a>(
        &'a self,
        origin: &'a Identifier,
    ) -> impl Iterator<Item = &'a ValidationFailure> + 'a {
        self.failures.iter().filter(move |f| {
            f.origin.logical_type() == origin.logical_type()
                && origin.member_id().map_or(true, |m| f.origin.member_id() == Some(m))
                && origin
                    .parameter_index()
                    .map_or(true, |i| f.origin.parameter_index() == Some(i))
        })
    }

    /// Failures reported by one validator.
    pub fn by_validator<'a>(
        &'a self,
        validator: &'a str,
    ) -> impl Iterator<Item = &'a ValidationFailure> + 'a {
        self.failures.iter().filter(move |f| f.validator == validator)
    }
}

impl<'a> IntoIterator for &'a ValidationFailures {
    type Item = &'a ValidationFailure;
    type IntoIter = std::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

/// A check over the completed metamodel.
pub trait MetaModelValidator: Send + Sync {
    /// Short name reported with each failure (e.g. `"title/strategy-conflict"`).
    fn name(&self) -> &'static str;

    /// Appends a failure for every problem found.
    fn validate(&self, metamodel: &MetaModel, failures: &mut ValidationFailures);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(origin: Identifier, validator: &str) -> ValidationFailure {
        ValidationFailure::new(origin, validator, "{} clashes with {}", vec!["a".into(), "b".into()])
    }

    #[test]
    fn message_substitutes_in_order() {
        let f = failure(Identifier::type_identifier("demo.X"), "v");
        assert_eq!(f.message(), "a clashes with b");
        assert_eq!(f.to_string(), "[v] demo.X: a clashes with b");
    }

    #[test]
    fn missing_args_leave_placeholders() {
        let f = ValidationFailure::new(
            Identifier::type_identifier("demo.X"),
            "v",
            "{} and {}",
            vec!["one".into()],
        );
        assert_eq!(f.message(), "one and {}");
    }

    #[test]
    fn for_origin_includes_members_of_a_type() {
        let ty = Identifier::type_identifier("demo.Customer");
        let mut failures = ValidationFailures::new();
        failures.push(failure(ty.clone(), "a"));
        failures.push(failure(ty.member("name"), "b"));
        failures.push(failure(Identifier::type_identifier("demo.Order"), "c"));

        assert_eq!(failures.len(), 3);
        assert_eq!(failures.for_origin(&ty).count(), 2);
        assert_eq!(failures.for_origin(&ty.member("name")).count(), 1);
        assert_eq!(failures.by_validator("c").count(), 1);
    }
}
