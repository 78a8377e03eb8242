//! The built metamodel: an immutable, versioned snapshot and the queries
//! viewers and persistence layers run against it.

use std::collections::HashMap;

use tracing::warn;

use crate::config::{Environment, MetaModelConfig};
use crate::error::{InvocationError, MetaModelError, Result};
use crate::facet::{
    ActionInvocationFacet, CollectionAccessorFacet, CssClassFacet, DisableForContextFacet,
    EditingFacet, FacetHolder, HiddenFacet, HideForContextFacet, IconFacet, MandatoryFacet,
    MaxLengthFacet, NamedFacet, PropertyAccessorFacet, PrototypeFacet, RegexFacet, TitleContext,
    TitleFacet, TitleRenderRequest, ValidateFacet,
};
use crate::identifier::{FeatureType, Identifier};
use crate::object::{ObjectRef, Value};
use crate::specification::{ObjectMember, ObjectSpecification};
use crate::validation::ValidationFailures;

/// How deep nested object titles are followed before falling back to the
/// plain string of the value.
pub const MAX_TITLE_DEPTH: usize = 3;

/// Reason given when a member is hidden everywhere.
pub const HIDDEN_REASON: &str = "Hidden";

/// Reason given for prototype actions outside prototyping.
pub const PROTOTYPE_REASON: &str = "Prototyping only";

/// The outcome of a visibility, usability or validity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Consent {
    /// The interaction may go ahead.
    Allowed,
    /// The interaction is vetoed, with the reason shown to the user.
    Veto(String),
}

impl Consent {
    /// Returns true for [`Consent::Allowed`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Consent::Allowed)
    }

    /// Returns true for [`Consent::Veto`].
    #[must_use]
    pub fn is_vetoed(&self) -> bool {
        !self.is_allowed()
    }

    /// The veto reason, if vetoed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Consent::Allowed => None,
            Consent::Veto(reason) => Some(reason),
        }
    }

    fn from_reason(reason: Option<String>) -> Self {
        reason.map_or(Consent::Allowed, Consent::Veto)
    }
}

/// Every introspected type, plus the validation failures found on them.
///
/// Built once by a [`SpecificationLoader`](crate::specification::SpecificationLoader)
/// and never mutated afterwards, so it can be shared across threads freely.
#[derive(Debug)]
pub struct MetaModel {
    specifications: Vec<ObjectSpecification>,
    by_logical_type: HashMap<String, usize>,
    by_type_name: HashMap<String, usize>,
    version: u64,
    config: MetaModelConfig,
    failures: ValidationFailures,
}

impl MetaModel {
    pub(crate) fn new(
        specifications: Vec<ObjectSpecification>,
        version: u64,
        config: MetaModelConfig,
    ) -> Self {
        let mut by_logical_type = HashMap::new();
        let mut by_type_name = HashMap::new();
        for (at, spec) in specifications.iter().enumerate() {
            by_logical_type
                .entry(spec.logical_type_name().to_owned())
                .or_insert(at);
            by_type_name.insert(spec.descriptor().type_name.clone(), at);
        }
        Self {
            specifications,
            by_logical_type,
            by_type_name,
            version,
            config,
            failures: ValidationFailures::new(),
        }
    }

    pub(crate) fn set_validation_failures(&mut self, failures: ValidationFailures) {
        self.failures = failures;
    }

    /// Snapshot version; increases with every reload.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The configuration the snapshot was built with.
    #[must_use]
    pub fn config(&self) -> &MetaModelConfig {
        &self.config
    }

    /// Every specification, in discovery order.
    #[must_use]
    pub fn specifications(&self) -> &[ObjectSpecification] {
        &self.specifications
    }

    /// A specification by logical type name, or by type name.
    ///
    /// When two types share a logical type name the first discovered wins.
    #[must_use]
    pub fn specification(&self, name: &str) -> Option<&ObjectSpecification> {
        self.by_logical_type
            .get(name)
            .or_else(|| self.by_type_name.get(name))
            .and_then(|&at| self.specifications.get(at))
    }

    /// The holder a type, member or parameter identifier refers to.
    #[must_use]
    pub fn find_holder(&self, identifier: &Identifier) -> Option<&FacetHolder> {
        let spec = self.specification(identifier.logical_type())?;
        let Some(member_id) = identifier.member_id() else {
            return Some(spec.holder());
        };
        let member = spec.member(member_id)?;
        match identifier.parameter_index() {
            None => Some(member.holder()),
            Some(index) => member.parameters().get(index).map(|p| p.holder()),
        }
    }

    /// Failures reported by the validators.
    #[must_use]
    pub fn validation_failures(&self) -> &ValidationFailures {
        &self.failures
    }

    fn spec_of(&self, target: &ObjectRef) -> Result<&ObjectSpecification> {
        self.specification(target.logical_type())
            .ok_or_else(|| MetaModelError::UnknownType(target.logical_type().to_owned()))
    }

    fn member_of<'a>(&'a self, target: &ObjectRef, member_id: &str) -> Result<&'a ObjectMember> {
        let spec = self.spec_of(target)?;
        spec.member(member_id).ok_or_else(|| {
            MetaModelError::UnknownMember(spec.identifier().member(member_id))
        })
    }

    /// The title of `target`.
    ///
    /// Never fails. Types without a title facet, and titles rendering empty,
    /// give `"Untitled <singular name>"`. Unknown types give the object's
    /// plain string.
    #[must_use]
    pub fn title_of(&self, target: &ObjectRef, request: &TitleRenderRequest<'_>) -> String {
        let Some(spec) = self.specification(target.logical_type()) else {
            return target.plain_string().trim().to_owned();
        };
        let title = spec
            .holder()
            .lookup::<TitleFacet>()
            .map(|facet| facet.title(target, request, self))
            .unwrap_or_default();
        if title.is_empty() {
            format!("Untitled {}", spec.singular_name())
        } else {
            title
        }
    }

    /// The icon name of `target`, from its `iconName()` method.
    ///
    /// Failures are logged and yield no icon.
    #[must_use]
    pub fn icon_name_of(&self, target: &ObjectRef) -> Option<String> {
        let icon = self
            .specification(target.logical_type())?
            .holder()
            .lookup::<IconFacet>()?;
        plain_hint(target, &icon.method)
    }

    /// The css class of `target`, static or from its `cssClass()` method.
    ///
    /// Failures are logged and yield no class.
    #[must_use]
    pub fn css_class_of(&self, target: &ObjectRef) -> Option<String> {
        match self
            .specification(target.logical_type())?
            .holder()
            .lookup::<CssClassFacet>()?
        {
            CssClassFacet::Static(class) => Some(class.clone()),
            CssClassFacet::Method(method) => plain_hint(target, method),
        }
    }

    /// Whether `member_id` is visible on `target`.
    ///
    /// # Errors
    ///
    /// Returns [`MetaModelError::UnknownType`] or
    /// [`MetaModelError::UnknownMember`] for unknown targets, and
    /// [`MetaModelError::Invocation`] if `hideXxx()` fails fatally.
    pub fn visibility(&self, target: &ObjectRef, member_id: &str) -> Result<Consent> {
        let member = self.member_of(target, member_id)?;
        let holder = member.holder();

        if holder
            .lookup::<HiddenFacet>()
            .is_some_and(|h| h.location.hides_on_forms())
        {
            return Ok(Consent::Veto(HIDDEN_REASON.to_owned()));
        }
        if holder.lookup::<PrototypeFacet>().is_some() && !self.config.environment.is_prototyping() {
            return Ok(Consent::Veto(PROTOTYPE_REASON.to_owned()));
        }
        let Some(hide) = holder.lookup::<HideForContextFacet>() else {
            return Ok(Consent::Allowed);
        };
        veto_or_allow(target.invoke(&hide.method, &[]).map(|value| {
            value
                .as_ref()
                .and_then(Value::as_bool)
                .unwrap_or(false)
                .then(|| HIDDEN_REASON.to_owned())
        }))
    }

    /// Whether `member_id` can be edited or invoked on `target`.
    ///
    /// # Errors
    ///
    /// As for [`visibility`](Self::visibility), with `disableXxx()`.
    pub fn usability(&self, target: &ObjectRef, member_id: &str) -> Result<Consent> {
        let member = self.member_of(target, member_id)?;
        let holder = member.holder();

        if member.feature_type() != FeatureType::Action {
            if let Some(reason) = holder.lookup::<EditingFacet>().and_then(EditingFacet::disabled_reason) {
                return Ok(Consent::Veto(reason.to_owned()));
            }
        }
        let Some(disable) = holder.lookup::<DisableForContextFacet>() else {
            return Ok(Consent::Allowed);
        };
        veto_or_allow(
            target
                .invoke(&disable.method, &[])
                .map(|value| non_empty_reason(value.as_ref())),
        )
    }

    /// Whether `proposed` is a valid new value of property `member_id`.
    ///
    /// Checks mandatory, max-length and regex facets, then `validateXxx(v)`.
    ///
    /// # Errors
    ///
    /// As for [`visibility`](Self::visibility), with `validateXxx(v)`.
    pub fn validate_property(
        &self,
        target: &ObjectRef,
        member_id: &str,
        proposed: Option<&Value>,
    ) -> Result<Consent> {
        let member = self.member_of(target, member_id)?;
        veto_or_allow(check_value(target, member.holder(), member.name(), proposed))
    }

    /// Whether `args` are valid arguments for action `action_id`.
    ///
    /// Each argument is checked against its parameter's facets and
    /// `validateNXxx(v)`, then the whole list against `validateXxx(..)`.
    ///
    /// # Errors
    ///
    /// As for [`visibility`](Self::visibility), with the validate methods.
    pub fn validate_action(
        &self,
        target: &ObjectRef,
        action_id: &str,
        args: &[Option<Value>],
    ) -> Result<Consent> {
        let action = self.member_of(target, action_id)?;
        if action.feature_type() != FeatureType::Action {
            return Err(MetaModelError::UnknownMember(action.identifier().clone()));
        }
        if args.len() != action.parameters().len() {
            return Ok(Consent::Veto(format!(
                "Expected {} argument(s), got {}",
                action.parameters().len(),
                args.len()
            )));
        }
        for (parameter, arg) in action.parameters().iter().zip(args) {
            let name = parameter
                .holder()
                .lookup::<NamedFacet>()
                .map_or(parameter.descriptor().name.as_str(), |n| n.text.as_str());
            let consent = veto_or_allow(check_value(target, parameter.holder(), name, arg.as_ref()))?;
            if consent.is_vetoed() {
                return Ok(consent);
            }
        }
        let Some(validate) = action.holder().lookup::<ValidateFacet>() else {
            return Ok(Consent::Allowed);
        };
        veto_or_allow(
            target
                .invoke(&validate.method, args)
                .map(|value| non_empty_reason(value.as_ref())),
        )
    }

    /// The current value of property or collection `member_id`.
    ///
    /// # Errors
    ///
    /// Returns [`MetaModelError::UnknownMember`] if `member_id` is an action,
    /// and any error the accessor raises.
    pub fn property_value(&self, target: &ObjectRef, member_id: &str) -> Result<Option<Value>> {
        let member = self.member_of(target, member_id)?;
        let holder = member.holder();
        let accessor = holder
            .lookup::<PropertyAccessorFacet>()
            .map(|a| a.method.as_str())
            .or_else(|| holder.lookup::<CollectionAccessorFacet>().map(|a| a.method.as_str()))
            .ok_or_else(|| MetaModelError::UnknownMember(member.identifier().clone()))?;
        Ok(target.invoke(accessor, &[])?)
    }

    /// The method an action invokes.
    #[must_use]
    pub fn action_method(&self, logical_type: &str, action_id: &str) -> Option<&str> {
        self.specification(logical_type)?
            .member(action_id)?
            .holder()
            .lookup::<ActionInvocationFacet>()
            .map(|a| a.method.as_str())
    }
}

impl TitleContext for MetaModel {
    fn nested_title(&self, object: &ObjectRef, depth: usize) -> Option<String> {
        if depth > MAX_TITLE_DEPTH {
            return None;
        }
        let title = self
            .specification(object.logical_type())?
            .holder()
            .lookup::<TitleFacet>()?
            .title(object, &TitleRenderRequest::nested(depth), self);
        Some(title)
    }

    fn environment(&self) -> Environment {
        self.config.environment
    }
}

/// Recoverable errors become vetoes; fatal ones propagate.
fn veto_or_allow(outcome: std::result::Result<Option<String>, InvocationError>) -> Result<Consent> {
    match outcome {
        Ok(reason) => Ok(Consent::from_reason(reason)),
        Err(error) if error.is_recoverable() => Ok(Consent::Veto(error.message().to_owned())),
        Err(error) => Err(error.into()),
    }
}

fn non_empty_reason(value: Option<&Value>) -> Option<String> {
    value
        .map(Value::to_plain_string)
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

fn plain_hint(target: &ObjectRef, method: &str) -> Option<String> {
    match target.invoke(method, &[]) {
        Ok(value) => non_empty_reason(value.as_ref()),
        Err(error) => {
            warn!(logical_type = target.logical_type(), method, %error, "ui hint method failed");
            None
        }
    }
}

fn check_value(
    target: &ObjectRef,
    holder: &FacetHolder,
    name: &str,
    proposed: Option<&Value>,
) -> std::result::Result<Option<String>, InvocationError> {
    let Some(value) = proposed else {
        let required = holder
            .lookup::<MandatoryFacet>()
            .is_some_and(|m| m.is_required());
        return Ok(required.then(|| format!("'{name}' is mandatory")));
    };
    if let Some(text) = value.as_str() {
        if let Some(max) = holder.lookup::<MaxLengthFacet>().map(|m| m.max) {
            if text.chars().count() > max {
                return Ok(Some(format!("'{name}' may not exceed {max} characters")));
            }
        }
        if let Some(regex) = holder.lookup::<RegexFacet>() {
            if !regex.pattern.is_match(text) {
                return Ok(Some(format!("'{name}' doesn't match pattern")));
            }
        }
    }
    let Some(validate) = holder.lookup::<ValidateFacet>() else {
        return Ok(None);
    };
    target
        .invoke(&validate.method, &[Some(value.clone())])
        .map(|reason| non_empty_reason(reason.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::annotation::{Annotation, PropertyAnnotation, TitleAnnotation};
    use crate::descriptor::{MethodDescriptor, ParameterDescriptor, TypeDescriptor, TypeRegistry, ValueType};
    use crate::object::Record;
    use crate::specification::SpecificationLoader;

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                TypeDescriptor::new("demo.Customer")
                    .with_method(
                        MethodDescriptor::new("getName", ValueType::String)
                            .with_annotation(Annotation::Title(TitleAnnotation::default()))
                            .with_annotation(Annotation::Property(PropertyAnnotation {
                                max_length: Some(5),
                                ..PropertyAnnotation::default()
                            })),
                    )
                    .with_method(
                        MethodDescriptor::new("setName", ValueType::Void)
                            .with_parameter(ParameterDescriptor::new("name", ValueType::String)),
                    )
                    .with_method(
                        MethodDescriptor::new("validateName", ValueType::String)
                            .with_parameter(ParameterDescriptor::new("name", ValueType::String)),
                    )
                    .with_method(MethodDescriptor::new("getCode", ValueType::String))
                    .with_method(MethodDescriptor::new("hideCode", ValueType::Boolean))
                    .with_method(
                        MethodDescriptor::new("getBest", ValueType::Reference("demo.Customer".into())),
                    ),
            )
            .with(TypeDescriptor::new("demo.Note"))
    }

    fn metamodel() -> MetaModel {
        let mut config = MetaModelConfig::for_environment(Environment::UnitTesting);
        config.domain_object.editing = true;
        SpecificationLoader::new(config).load(&registry())
    }

    fn customer(name: &str) -> ObjectRef {
        let rejected = name == "Bob";
        ObjectRef::new(
            "demo.Customer",
            Record::new()
                .with_value("getName", name)
                .with_value("hideCode", true)
                .with_method("validateName", move |_| {
                    Ok(rejected.then(|| Value::from("Bob may not rename")))
                }),
        )
    }

    #[test]
    fn title_falls_back_to_untitled() {
        let metamodel = metamodel();
        assert_eq!(metamodel.title_of(&customer("Ada"), &TitleRenderRequest::new()), "Ada");
        let note = ObjectRef::new("demo.Note", Record::new());
        assert_eq!(metamodel.title_of(&note, &TitleRenderRequest::new()), "Untitled Note");
    }

    #[test]
    fn hide_method_vetoes_visibility() {
        let metamodel = metamodel();
        let target = customer("Ada");
        assert_eq!(metamodel.visibility(&target, "name").ok(), Some(Consent::Allowed));
        assert_eq!(
            metamodel.visibility(&target, "code").ok(),
            Some(Consent::Veto(HIDDEN_REASON.to_owned()))
        );
        assert!(matches!(
            metamodel.visibility(&target, "missing"),
            Err(MetaModelError::UnknownMember(_))
        ));
    }

    #[test]
    fn properties_without_setters_are_disabled() {
        let metamodel = metamodel();
        let target = customer("Ada");
        assert!(metamodel.usability(&target, "name").is_ok_and(|c| c.is_allowed()));
        assert!(metamodel.usability(&target, "code").is_ok_and(|c| c.is_vetoed()));
    }

    #[test]
    fn property_validation_checks_facets_then_method() {
        let metamodel = metamodel();
        let target = customer("Bob");
        let too_long = Value::from("Bartholomew");
        let fine = Value::from("Rob");
        assert!(metamodel
            .validate_property(&target, "name", None)
            .is_ok_and(|c| c.reason() == Some("'Name' is mandatory")));
        assert!(metamodel
            .validate_property(&target, "name", Some(&too_long))
            .is_ok_and(|c| c.is_vetoed()));
        assert!(metamodel
            .validate_property(&target, "name", Some(&fine))
            .is_ok_and(|c| c.reason() == Some("Bob may not rename")));
    }

    #[test]
    fn find_holder_resolves_members() {
        let metamodel = metamodel();
        let id = Identifier::member_identifier("demo.Customer", "code");
        assert_eq!(
            metamodel.find_holder(&id).map(FacetHolder::feature_type),
            Some(FeatureType::Property)
        );
        assert!(metamodel
            .find_holder(&Identifier::type_identifier("demo.Missing"))
            .is_none());
    }
}
