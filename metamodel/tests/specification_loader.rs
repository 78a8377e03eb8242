//! Building specifications from descriptor documents.

use causeway_metamodel::facet::{
    ActionSemanticsFacet, EditingFacet, LayoutGroupFacet, MandatoryFacet, NamedFacet, PagedFacet,
    PluralFacet, TitleFacet,
};
use causeway_metamodel::descriptor::annotation::SemanticsOf;
use causeway_metamodel::{
    Consent, FeatureType, MetaModel, MetaModelConfig, ObjectMember, Precedence,
    SpecificationLoader, TypeRegistry,
};

const DOMAIN: &str = r#"
[[type]]
type-name = "demo.Named"
kind = "interface"

[[type.methods]]
name = "getName"
returns = "string"

[[type.methods.annotations]]
annotation = "title"
sequence = "1"

[[type]]
type-name = "demo.Party"
kind = "abstract"
interfaces = ["demo.Named"]

[[type.methods]]
name = "getName"
returns = "string"

[[type.methods.annotations]]
annotation = "property-layout"
sequence = "1"
field-set-name = "Identity"

[[type]]
type-name = "demo.dom.Customer"
super-type = "demo.Party"
interfaces = ["demo.Named"]

[[type.annotations]]
annotation = "domain-object"
logical-type-name = "demo.Customer"
nature = "entity"
editing = "enabled"

[[type.methods]]
name = "setName"
returns = "void"

[[type.methods.parameters]]
name = "name"
value-type = "string"

[[type.methods]]
name = "getEmail"
returns = { optional = "string" }

[[type.methods.annotations]]
annotation = "property-layout"
sequence = "2"
field-set-name = "Contact"

[[type.methods]]
name = "setEmail"
returns = "void"

[[type.methods.parameters]]
name = "email"
value-type = { optional = "string" }

[[type.methods]]
name = "getOrders"
returns = { collection = { reference = "demo.Order" } }

[[type.methods]]
name = "placeOrder"
returns = { reference = "demo.Order" }

[[type.methods.parameters]]
name = "quantity"
value-type = "integer"

[[type.methods.annotations]]
annotation = "action"
semantics = "non-idempotent"

[[type.methods]]
name = "findOrders"
returns = { collection = { reference = "demo.Order" } }

[[type.methods]]
name = "audit"
returns = "void"

[[type.methods.annotations]]
annotation = "programmatic"
"#;

fn build() -> MetaModel {
    let mut registry = TypeRegistry::new();
    let registered = registry.register_toml_str(DOMAIN);
    assert_eq!(registered.ok(), Some(3));
    SpecificationLoader::new(MetaModelConfig::default()).load(&registry)
}

#[test]
fn types_are_found_by_logical_and_type_name() {
    let metamodel = build();
    assert!(metamodel.specification("demo.Customer").is_some());
    assert!(metamodel.specification("demo.dom.Customer").is_some());
    assert_eq!(metamodel.specifications().len(), 3);
}

#[test]
fn inherited_title_components_contribute_once() {
    let metamodel = build();
    let title = metamodel
        .specification("demo.Customer")
        .and_then(|s| s.holder().lookup::<TitleFacet>());
    assert!(matches!(
        title,
        Some(TitleFacet::Components { components }) if components.len() == 1
    ));
}

#[test]
fn members_follow_conventions_and_annotations() {
    let metamodel = build();
    let Some(customer) = metamodel.specification("demo.Customer") else {
        unreachable!("customer is registered");
    };

    let properties: Vec<&str> = customer.properties().iter().map(ObjectMember::id).collect();
    assert_eq!(properties, vec!["name", "email"]);
    let collections: Vec<&str> = customer.collections().iter().map(ObjectMember::id).collect();
    assert_eq!(collections, vec!["orders"]);
    let actions: Vec<&str> = customer.actions().iter().map(ObjectMember::id).collect();
    assert_eq!(actions, vec!["placeOrder", "findOrders"]);
    assert!(customer.methods().iter().all(|m| m.name != "audit"));

    let email = customer.member("email").map(ObjectMember::holder);
    assert_eq!(
        email.and_then(|h| h.lookup::<MandatoryFacet>()),
        Some(&MandatoryFacet::Optional)
    );
    assert_eq!(
        email.and_then(|h| h.lookup::<LayoutGroupFacet>()).map(|g| g.group.id()),
        Some("contact")
    );
    assert_eq!(
        customer.member("name").and_then(|m| m.holder().lookup::<EditingFacet>()),
        Some(&EditingFacet::Enabled)
    );
}

#[test]
fn object_facets_come_from_annotations_and_inference() {
    let metamodel = build();
    let Some(customer) = metamodel.specification("demo.Customer") else {
        unreachable!("customer is registered");
    };
    let holder = customer.holder();
    assert_eq!(holder.lookup::<NamedFacet>().map(|n| n.text.as_str()), Some("Customer"));
    assert_eq!(holder.lookup::<PluralFacet>().map(|p| p.text.as_str()), Some("Customers"));

    let orders = customer.member("orders").map(ObjectMember::holder);
    assert_eq!(orders.and_then(|h| h.lookup::<PagedFacet>()).map(|p| p.page_size), Some(12));
}

#[test]
fn action_semantics_prefer_annotations_over_fallback() {
    let metamodel = build();
    let customer = metamodel.specification("demo.Customer");
    let semantics = |id: &str| {
        customer
            .and_then(|s| s.member(id))
            .and_then(|m| m.holder().facet(causeway_metamodel::FacetKind::ActionSemantics))
            .map(|f| (f.precedence(), f.payload::<ActionSemanticsFacet>().map(|s| s.semantics)))
    };
    assert_eq!(
        semantics("placeOrder"),
        Some((Precedence::Explicit, Some(SemanticsOf::NonIdempotent)))
    );
    assert_eq!(
        semantics("findOrders").map(|(precedence, _)| precedence),
        Some(Precedence::Fallback)
    );
}

#[test]
fn parameters_carry_their_own_holders() {
    let metamodel = build();
    let place_order = metamodel
        .specification("demo.Customer")
        .and_then(|s| s.member("placeOrder"));
    let parameter = place_order.and_then(|m| m.parameters().first());
    assert_eq!(
        parameter.map(|p| p.holder().feature_type()),
        Some(FeatureType::ActionParameter)
    );
    assert_eq!(
        parameter.map(|p| p.holder().identifier().to_string()),
        Some("demo.Customer#placeOrder[0]".to_owned())
    );
}

#[test]
fn unknown_members_are_errors_not_vetoes() {
    let metamodel = build();
    let target = causeway_metamodel::ObjectRef::new(
        "demo.Customer",
        causeway_metamodel::object::Record::new(),
    );
    assert!(metamodel.visibility(&target, "nothing").is_err());
    assert_eq!(metamodel.visibility(&target, "name").ok(), Some(Consent::Allowed));
}
