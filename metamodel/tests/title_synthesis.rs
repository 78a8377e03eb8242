//! Title synthesis through a built metamodel.

use causeway_metamodel::descriptor::annotation::{Annotation, TitleAnnotation};
use causeway_metamodel::facet::title::{FAILED_TITLE, FAILED_TITLE_UNIT_TESTING};
use causeway_metamodel::facet::{TitleFacet, TitleRenderRequest};
use causeway_metamodel::object::{ObjectRef, Record};
use causeway_metamodel::{
    Environment, InvocationError, MetaModel, MetaModelConfig, MethodDescriptor,
    SpecificationLoader, TypeDescriptor, TypeRegistry, Value, ValueType,
};

fn titled(name: &str, title: TitleAnnotation) -> MethodDescriptor {
    MethodDescriptor::new(name, ValueType::String).with_annotation(Annotation::Title(title))
}

fn sequenced(sequence: &str) -> TitleAnnotation {
    TitleAnnotation {
        sequence: sequence.into(),
        ..TitleAnnotation::default()
    }
}

fn build(environment: Environment, registry: &TypeRegistry) -> MetaModel {
    SpecificationLoader::new(MetaModelConfig::for_environment(environment)).load(registry)
}

fn elements() -> TypeRegistry {
    TypeRegistry::new().with(
        TypeDescriptor::new("demo.Titled")
            .with_method(titled(
                "titleElement1",
                TitleAnnotation {
                    append: ".".into(),
                    ..sequenced("1")
                },
            ))
            .with_method(titled(
                "titleElement2",
                TitleAnnotation {
                    prepend: ",".into(),
                    ..sequenced("2")
                },
            ))
            .with_method(titled("titleElement3", sequenced("1.5")))
            .with_method(MethodDescriptor::new("title", ValueType::String)),
    )
}

fn titled_object(first: Option<&str>, second: Option<&str>, third: Option<&str>) -> ObjectRef {
    let answer = |value: Option<&str>| value.map(Value::from);
    let (first, second, third) = (answer(first), answer(second), answer(third));
    ObjectRef::new(
        "demo.Titled",
        Record::new()
            .with_method("titleElement1", move |_| Ok(first.clone()))
            .with_method("titleElement2", move |_| Ok(second.clone()))
            .with_method("titleElement3", move |_| Ok(third.clone()))
            .with_value("title", "from the title method"),
    )
}

#[test]
fn components_render_in_dewey_order_with_affixes() {
    let metamodel = build(Environment::UnitTesting, &elements());
    let target = titled_object(Some("titleElement1"), Some("titleElement2"), Some("titleElement3"));
    assert_eq!(
        metamodel.title_of(&target, &TitleRenderRequest::new()),
        "titleElement1. titleElement3,titleElement2"
    );
}

#[test]
fn annotations_win_over_the_title_method() {
    let metamodel = build(Environment::UnitTesting, &elements());
    let spec = metamodel.specification("demo.Titled");
    assert!(matches!(
        spec.and_then(|s| s.holder().lookup::<TitleFacet>()),
        Some(TitleFacet::Components { components }) if components.len() == 3
    ));
    assert!(spec.is_some_and(|s| s.member("title").is_none()));
}

#[test]
fn null_and_blank_components_leave_no_separators() {
    let metamodel = build(Environment::UnitTesting, &elements());
    let target = titled_object(None, Some("  this needs to be trimmed      "), Some("   "));
    assert_eq!(
        metamodel.title_of(&target, &TitleRenderRequest::new()),
        ",this needs to be trimmed"
    );
}

#[test]
fn skip_predicate_omits_matching_values() {
    let metamodel = build(Environment::UnitTesting, &elements());
    let target = titled_object(Some("parent"), Some("child"), None);
    let is_parent = |value: &Value| value.as_str() == Some("parent");
    assert_eq!(
        metamodel.title_of(&target, &TitleRenderRequest::skipping(&is_parent)),
        ",child"
    );
}

#[test]
fn failing_components_render_the_fallback() {
    let failing = ObjectRef::new(
        "demo.Titled",
        Record::new()
            .with_value("titleElement1", "fine")
            .with_method("titleElement2", |_| Err(InvocationError::fatal("database gone")))
            .with_null("titleElement3"),
    );
    let unit = build(Environment::UnitTesting, &elements());
    assert_eq!(unit.title_of(&failing, &TitleRenderRequest::new()), FAILED_TITLE_UNIT_TESTING);
    let production = build(Environment::Production, &elements());
    assert_eq!(production.title_of(&failing, &TitleRenderRequest::new()), FAILED_TITLE);
}

#[test]
fn panicking_components_render_the_fallback() {
    let panicking = ObjectRef::new(
        "demo.Titled",
        Record::new().with_method("titleElement1", |_| -> Result<Option<Value>, InvocationError> {
            panic!("accessor blew up")
        }),
    );
    let metamodel = build(Environment::UnitTesting, &elements());
    assert_eq!(
        metamodel.title_of(&panicking, &TitleRenderRequest::new()),
        FAILED_TITLE_UNIT_TESTING
    );
}

#[test]
fn referenced_objects_contribute_their_own_title() {
    let registry = TypeRegistry::new()
        .with(TypeDescriptor::new("demo.Customer").with_method(titled("getName", sequenced("1"))))
        .with(
            TypeDescriptor::new("demo.Order")
                .with_method(
                    MethodDescriptor::new("getCustomer", ValueType::Reference("demo.Customer".into()))
                        .with_annotation(Annotation::Title(sequenced("1"))),
                )
                .with_method(titled(
                    "getNumber",
                    TitleAnnotation {
                        prepend: " #".into(),
                        ..sequenced("2")
                    },
                )),
        );
    let metamodel = build(Environment::UnitTesting, &registry);
    let ada = ObjectRef::new("demo.Customer", Record::new().with_value("getName", "Ada"));
    let order = ObjectRef::new(
        "demo.Order",
        Record::new()
            .with_value("getCustomer", ada)
            .with_value("getNumber", 42_i64),
    );
    assert_eq!(metamodel.title_of(&order, &TitleRenderRequest::new()), "Ada #42");
}

#[test]
fn types_without_a_title_are_untitled() {
    let registry = TypeRegistry::new().with(TypeDescriptor::new("demo.PurchaseOrder"));
    let metamodel = build(Environment::UnitTesting, &registry);
    let target = ObjectRef::new("demo.PurchaseOrder", Record::new());
    assert_eq!(
        metamodel.title_of(&target, &TitleRenderRequest::new()),
        "Untitled Purchase Order"
    );
}

#[test]
fn components_are_abbreviated_to_their_declared_length() {
    let registry = TypeRegistry::new().with(
        TypeDescriptor::new("demo.Product")
            .with_method(titled(
                "getName",
                TitleAnnotation {
                    abbreviated_to: Some(8),
                    ..sequenced("1")
                },
            ))
            .with_method(titled(
                "getCode",
                TitleAnnotation {
                    prepend: " / ".into(),
                    abbreviated_to: Some(2),
                    ..sequenced("2")
                },
            ))
            .with_method(titled(
                "getSize",
                TitleAnnotation {
                    abbreviated_to: Some(10),
                    ..sequenced("3")
                },
            )),
    );
    let metamodel = build(Environment::UnitTesting, &registry);
    let product = ObjectRef::new(
        "demo.Product",
        Record::new()
            .with_value("getName", "Hello World")
            .with_value("getCode", "ABCDE")
            .with_value("getSize", "XL"),
    );
    assert_eq!(
        metamodel.title_of(&product, &TitleRenderRequest::new()),
        "Hello... / .. XL"
    );
}
