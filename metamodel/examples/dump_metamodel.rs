//! Builds a small domain model and prints its members and titles.
//!
//! Run with: `cargo run --example dump_metamodel -p causeway-metamodel`

use causeway_metamodel::descriptor::annotation::{Annotation, TitleAnnotation};
use causeway_metamodel::facet::TitleRenderRequest;
use causeway_metamodel::object::{ObjectRef, Record};
use causeway_metamodel::{
    serializer, MetaModelConfig, MethodDescriptor, ParameterDescriptor, SpecificationLoader,
    TypeDescriptor, TypeRegistry, ValueType,
};

fn main() {
    let registry = TypeRegistry::new().with(
        TypeDescriptor::new("demo.Customer")
            .with_method(
                MethodDescriptor::new("getFirstName", ValueType::String).with_annotation(
                    Annotation::Title(TitleAnnotation {
                        sequence: "1".into(),
                        ..TitleAnnotation::default()
                    }),
                ),
            )
            .with_method(
                MethodDescriptor::new("getLastName", ValueType::String).with_annotation(
                    Annotation::Title(TitleAnnotation {
                        sequence: "2".into(),
                        ..TitleAnnotation::default()
                    }),
                ),
            )
            .with_method(
                MethodDescriptor::new("placeOrder", ValueType::Void)
                    .with_parameter(ParameterDescriptor::new("product", ValueType::String)),
            ),
    );
    let metamodel = SpecificationLoader::new(MetaModelConfig::default()).load(&registry);

    println!("Causeway metamodel v{}", metamodel.version());
    for spec in metamodel.specifications() {
        println!("  {} ({})", spec.logical_type_name(), spec.singular_name());
        for member in spec.members() {
            println!(
                "    {:10} {:20} {:>2} facets",
                member.feature_type().as_str(),
                member.id(),
                member.holder().len()
            );
        }
    }

    let ada = ObjectRef::new(
        "demo.Customer",
        Record::new()
            .with_value("getFirstName", "Ada")
            .with_value("getLastName", "Lovelace"),
    );
    println!();
    println!("Title: {}", metamodel.title_of(&ada, &TitleRenderRequest::new()));

    let json = serializer::to_json(&metamodel).unwrap_or_else(|e| format!("JSON error: {e}"));
    println!("JSON dump: {} bytes", json.len());
}
