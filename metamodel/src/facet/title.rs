//! Title synthesis.
//!
//! A type's title comes from one of three strategies, in order of strength:
//! `@Title` components, a conventional `title()` method, or `toString()`.
//! Components are rendered in dewey order; each contributes
//! `prepend + value + append` unless its value is null, skipped or blank.
//! Rendering never fails: panics and fatal errors raised by the domain object
//! are replaced by a fixed fallback string.

use std::panic::{catch_unwind, AssertUnwindSafe};

use serde::Serialize;
use tracing::warn;

use crate::config::Environment;
use crate::descriptor::annotation::TitleAnnotation;
use crate::error::InvocationError;
use crate::object::{ObjectRef, Value};
use crate::sequence::compare_sequences;

/// Title shown when rendering failed.
pub const FAILED_TITLE: &str = "Failed Title";

/// Title shown when rendering failed while unit testing.
pub const FAILED_TITLE_UNIT_TESTING: &str = "Failed Title (unit testing)";

/// One `@Title` member contributing to a type's title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TitleComponent {
    /// Method producing the value.
    pub method: String,
    /// Dewey-decimal position.
    pub sequence: String,
    /// Emitted before the value.
    pub prepend: String,
    /// Emitted after the value.
    pub append: String,
    /// Maximum rendered length of the value.
    pub abbreviated_to: Option<usize>,
}

impl TitleComponent {
    /// A component with the default affixes (`" "` before, nothing after).
    pub fn new(method: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self::from_annotation(
            method,
            &TitleAnnotation {
                sequence: sequence.into(),
                ..TitleAnnotation::default()
            },
        )
    }

    /// A component described by a `@Title` annotation.
    pub fn from_annotation(method: impl Into<String>, annotation: &TitleAnnotation) -> Self {
        Self {
            method: method.into(),
            sequence: annotation.sequence.clone(),
            prepend: annotation.prepend.clone(),
            append: annotation.append.clone(),
            abbreviated_to: annotation.abbreviated_to,
        }
    }

    /// Sets the text emitted before the value.
    #[must_use]
    pub fn prepend(mut self, prepend: impl Into<String>) -> Self {
        self.prepend = prepend.into();
        self
    }

    /// Sets the text emitted after the value.
    #[must_use]
    pub fn append(mut self, append: impl Into<String>) -> Self {
        self.append = append.into();
        self
    }

    /// Caps the rendered length of the value.
    #[must_use]
    pub fn abbreviated_to(mut self, max: usize) -> Self {
        self.abbreviated_to = Some(max);
        self
    }
}

/// How a type's title is obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum TitleFacet {
    /// From `@Title` components, in dewey order.
    Components {
        /// Ordered, deduplicated components.
        components: Vec<TitleComponent>,
    },
    /// From a `title()` method.
    Method {
        /// The method name.
        method: String,
    },
    /// From `toString()`.
    ToString,
}

impl TitleFacet {
    /// Orders components by sequence and drops repeats of a method.
    ///
    /// The sort is stable, so components sharing a sequence keep their
    /// declaration order.
    #[must_use]
    pub fn components(mut components: Vec<TitleComponent>) -> Self {
        let mut seen = std::collections::HashSet::new();
        components.retain(|c| seen.insert(c.method.clone()));
        components.sort_by(|a, b| compare_sequences(&a.sequence, &b.sequence));
        TitleFacet::Components { components }
    }

    /// Renders the title of `target`.
    ///
    /// Never fails. If the domain object panics or raises a fatal error the
    /// fallback title for the context's environment is returned; outside
    /// unit testing a warning is logged.
    pub fn title(
        &self,
        target: &ObjectRef,
        request: &TitleRenderRequest<'_>,
        context: &dyn TitleContext,
    ) -> String {
        let outcome = catch_unwind(AssertUnwindSafe(|| self.render(target, request, context)));
        let failure = match outcome {
            Ok(Ok(title)) => return title,
            Ok(Err(error)) => error.to_string(),
            Err(_) => "panic while rendering title".to_owned(),
        };
        if context.environment().is_unit_testing() {
            FAILED_TITLE_UNIT_TESTING.to_owned()
        } else {
            warn!(logical_type = target.logical_type(), %failure, "title rendering failed");
            FAILED_TITLE.to_owned()
        }
    }

    /// Renders the title of `target`, propagating invocation errors.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a title method or component.
    pub fn render(
        &self,
        target: &ObjectRef,
        request: &TitleRenderRequest<'_>,
        context: &dyn TitleContext,
    ) -> Result<String, InvocationError> {
        match self {
            TitleFacet::Components { components } => {
                let mut title = String::new();
                for component in components {
                    let Some(value) = target.invoke(&component.method, &[])? else {
                        continue;
                    };
                    if request.skips(&value) {
                        continue;
                    }
                    let resolved = resolve(&value, request.depth, context);
                    if resolved.is_empty() {
                        continue;
                    }
                    title.push_str(&component.prepend);
                    title.push_str(&abbreviated(&resolved, component.abbreviated_to));
                    title.push_str(&component.append);
                }
                Ok(title.trim().to_owned())
            }
            TitleFacet::Method { method } => Ok(target
                .invoke(method, &[])?
                .map(|value| resolve(&value, request.depth, context))
                .unwrap_or_default()),
            TitleFacet::ToString => Ok(target.plain_string().trim().to_owned()),
        }
    }
}

fn resolve(value: &Value, depth: usize, context: &dyn TitleContext) -> String {
    if let Value::Object(object) = value {
        if let Some(title) = context.nested_title(object, depth + 1) {
            let title = title.trim();
            if !title.is_empty() {
                return title.to_owned();
            }
        }
    }
    value.to_plain_string().trim().to_owned()
}

/// Truncates `text` to `max` characters in total, ending in `"..."`.
///
/// Text no longer than `max` is returned unchanged. Limits below the
/// length of the ellipsis yield that many dots.
#[must_use]
pub fn abbreviated(text: &str, max: Option<usize>) -> String {
    const ELLIPSIS: &str = "...";
    match max {
        Some(max) if text.chars().count() > max && max < ELLIPSIS.len() => {
            ELLIPSIS[..max].to_owned()
        }
        Some(max) if text.chars().count() > max => {
            let kept: String = text.chars().take(max - ELLIPSIS.len()).collect();
            format!("{kept}{ELLIPSIS}")
        }
        _ => text.to_owned(),
    }
}

/// Per-call options for title rendering.
#[derive(Default, Clone, Copy)]
pub struct TitleRenderRequest<'a> {
    skip: Option<&'a (dyn Fn(&Value) -> bool + 'a)>,
    depth: usize,
}

impl<'a> TitleRenderRequest<'a> {
    /// Renders every component.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Omits components whose value matches `predicate`, e.g. the parent
    /// object when a child is rendered inline beneath it.
    #[must_use]
    pub fn skipping(predicate: &'a (dyn Fn(&Value) -> bool + 'a)) -> Self {
        Self {
            skip: Some(predicate),
            depth: 0,
        }
    }

    /// A request for a nested object's title: no skip predicate.
    #[must_use]
    pub fn nested(depth: usize) -> Self {
        Self { skip: None, depth }
    }

    /// Nesting depth; zero for the object being titled.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn skips(&self, value: &Value) -> bool {
        self.skip.is_some_and(|predicate| predicate(value))
    }
}

impl std::fmt::Debug for TitleRenderRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleRenderRequest")
            .field("skip", &self.skip.is_some())
            .field("depth", &self.depth)
            .finish()
    }
}

/// What title rendering needs from the surrounding metamodel.
pub trait TitleContext {
    /// Title of an object referenced by a component, or `None` if the
    /// object has no specification or `depth` is too deep.
    fn nested_title(&self, object: &ObjectRef, depth: usize) -> Option<String>;

    /// Decides the failure fallback.
    fn environment(&self) -> Environment;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Record;

    struct Flat(Environment);

    impl TitleContext for Flat {
        fn nested_title(&self, _object: &ObjectRef, _depth: usize) -> Option<String> {
            None
        }

        fn environment(&self) -> Environment {
            self.0
        }
    }

    fn render(facet: &TitleFacet, record: Record) -> String {
        facet.title(
            &ObjectRef::new("demo.Thing", record),
            &TitleRenderRequest::new(),
            &Flat(Environment::UnitTesting),
        )
    }

    #[test]
    fn components_sorted_by_dewey_order() {
        let facet = TitleFacet::components(vec![
            TitleComponent::new("b", "2").prepend(","),
            TitleComponent::new("a", "1").append("."),
            TitleComponent::new("c", "1.5"),
        ]);
        let record = Record::new()
            .with_value("a", "titleElement1")
            .with_value("b", "titleElement2")
            .with_value("c", "titleElement3");
        assert_eq!(render(&facet, record), "titleElement1. titleElement3,titleElement2");
    }

    #[test]
    fn blank_and_null_components_emit_nothing() {
        let facet = TitleFacet::components(vec![
            TitleComponent::new("a", "1").append("|"),
            TitleComponent::new("b", "2").append("|"),
            TitleComponent::new("c", "3"),
        ]);
        let record = Record::new()
            .with_null("a")
            .with_value("b", "   ")
            .with_value("c", "  this needs to be trimmed      ");
        assert_eq!(render(&facet, record), "this needs to be trimmed");
    }

    #[test]
    fn skip_predicate_omits_matching_values() {
        let facet = TitleFacet::components(vec![
            TitleComponent::new("parent", "1"),
            TitleComponent::new("name", "2"),
        ]);
        let record = Record::new()
            .with_value("parent", "Acme")
            .with_value("name", "Widget");
        let skip_parent = |v: &Value| v.as_str() == Some("Acme");
        let title = facet.title(
            &ObjectRef::new("demo.Thing", record),
            &TitleRenderRequest::skipping(&skip_parent),
            &Flat(Environment::Production),
        );
        assert_eq!(title, "Widget");
    }

    #[test]
    fn duplicate_methods_contribute_once() {
        let facet = TitleFacet::components(vec![
            TitleComponent::new("name", "1"),
            TitleComponent::new("name", "1"),
        ]);
        assert_eq!(render(&facet, Record::new().with_value("name", "Ada")), "Ada");
    }

    #[test]
    fn errors_fall_back_per_environment() {
        let facet = TitleFacet::Method {
            method: "title".into(),
        };
        let failing = Record::new().with_method("title", |_| Err(InvocationError::fatal("boom")));
        assert_eq!(render(&facet, failing.clone()), FAILED_TITLE_UNIT_TESTING);
        let production = facet.title(
            &ObjectRef::new("demo.Thing", failing),
            &TitleRenderRequest::new(),
            &Flat(Environment::Production),
        );
        assert_eq!(production, FAILED_TITLE);
    }

    #[test]
    fn abbreviation() {
        assert_eq!(abbreviated("Hello World", Some(8)), "Hello...");
        assert_eq!(abbreviated("Hello World", Some(8)).chars().count(), 8);
        assert_eq!(abbreviated("Hello", Some(5)), "Hello");
        assert_eq!(abbreviated("Hello", None), "Hello");
        for max in 0..=3 {
            let short = abbreviated("Hello World", Some(max));
            assert_eq!(short.chars().count(), max);
            assert!(short.chars().all(|c| c == '.'));
        }
        assert_eq!(abbreviated("Hi", Some(1)), ".");
        assert_eq!(abbreviated("", Some(0)), "");
    }
}
