//! Integration tests for interface and union handling.

mod common;

use common::*;
use schema_mapping_inspector::inspector::{
    ClassResolver, InspectorBuilder, MappingClassResolver, MemberTypes,
};
use schema_mapping_inspector::schema::{InMemorySchema, NamedType, ObjectType, SchemaBuilder};
use schema_mapping_inspector::{
    Binding, BindingRegistry, ClassDescriptor, ImplType, SchemaMappingInspector, SkipReason,
    TypePath, TypeRef, TypeRegistry,
};
use smol_str::SmolStr;

fn pets_schema() -> InMemorySchema {
    SchemaBuilder::new()
        .with_object("Query", |b| b.field("pets", TypeRef::list(TypeRef::named("Pet"))))
        .with_union("Pet", ["Dog", "Cat"])
        .with_object("Dog", |b| {
            b.field("name", TypeRef::named("String"))
                .field("barks", TypeRef::named("Boolean"))
        })
        .with_object("Cat", |b| {
            b.field("name", TypeRef::named("String"))
                .field("lives", TypeRef::named("Int"))
        })
        .build()
}

fn pets_registry() -> TypeRegistry {
    TypeRegistry::new()
        .with_class(
            ClassDescriptor::new("app::pets::Dog")
                .with_property("name", string())
                .with_property("barks", ImplType::named("bool")),
        )
        .with_class(ClassDescriptor::new("app::pets::Cat").with_property("name", string()))
}

fn pets_binding(return_type: ImplType) -> BindingRegistry {
    BindingRegistry::new().with_binding(
        "Query",
        "pets",
        Binding::returning(ImplType::list(return_type)),
    )
}

#[test]
fn test_union_fan_out_walks_every_member() {
    let schema = pets_schema();
    let registry = pets_registry();
    let bindings = pets_binding(ImplType::named("app::pets::Pet"));

    let report = inspect(&schema, &bindings, &registry);
    assert_eq!(report.unmapped_fields(), &[coords("Cat", "lives")]);
}

#[test]
fn test_reflection_resolver_learns_prefixes_from_bindings() {
    let (schema, bindings, registry) = bookstore();
    let inspector = SchemaMappingInspector::builder()
        .build(&schema, &bindings, &registry)
        .unwrap();
    let lookup = inspector.lookup();

    assert_eq!(
        lookup.reflection_resolver().unwrap().class_prefixes("SearchResult"),
        &[SmolStr::new(MODEL)]
    );
    assert_eq!(
        lookup.resolve_union("SearchResult"),
        &[
            MemberTypes {
                member: "Book".into(),
                impl_types: vec![model("Book")],
            },
            MemberTypes {
                member: "Author".into(),
                impl_types: vec![model("Author")],
            },
        ]
    );
    let node_members = lookup
        .resolve_interface("Node")
        .iter()
        .map(|m| m.member.as_str())
        .collect::<Vec<_>>();
    assert_eq!(node_members, ["Author", "Book"]);
}

#[test]
fn test_interface_fan_out_reports_member_fields() {
    let schema = bookstore_builder()
        .with_object("Query", |b| b.field("node", TypeRef::named("Node")))
        .build();
    let registry = bookstore_registry().with_class(
        ClassDescriptor::new("app::model::Author")
            .with_property("id", string())
            .with_property("books", ImplType::list(model("Book"))),
    );
    let bindings = BindingRegistry::new()
        .with_binding("Query", "node", Binding::returning(model("Node")))
        .with_binding("Mutation", "addBook", Binding::returning(model("Book")))
        .with_binding(
            "Subscription",
            "bookAdded",
            Binding::returning(ImplType::stream(model("Book"))),
        )
        .with_binding(
            "Subscription",
            "bookBatches",
            Binding::returning(ImplType::stream(ImplType::list(model("Book")))),
        );

    let report = inspect(&schema, &bindings, &registry);
    assert_eq!(report.unmapped_fields(), &[coords("Author", "name")]);
}

#[test]
fn test_core_return_types_leave_members_unresolved() {
    let schema = pets_schema();
    let bindings = pets_binding(ImplType::named("std::boxed::Box"));

    let report = inspect(&schema, &bindings, &pets_registry());
    let skipped = report
        .skipped_types()
        .iter()
        .map(|s| (s.output_type.to_string(), s.coordinates.to_string(), s.reason))
        .collect::<Vec<_>>();
    assert_eq!(
        skipped,
        [
            ("Dog".to_string(), "Query.pets".to_string(), SkipReason::NoClassInformation),
            ("Cat".to_string(), "Query.pets".to_string(), SkipReason::NoClassInformation),
        ]
    );
    assert!(report.unmapped_fields().is_empty());
}

#[test]
fn test_explicit_mapping_wins_over_reflection() {
    let schema = pets_schema();
    let registry = pets_registry().with_class(
        ClassDescriptor::new("app::legacy::Cat")
            .with_property("name", string())
            .with_property("lives", ImplType::named("u8")),
    );
    let bindings = pets_binding(ImplType::named("app::pets::Pet"));

    let report = InspectorBuilder::new()
        .with_class_resolver(
            MappingClassResolver::new().with_mapping("Cat", ImplType::named("app::legacy::Cat")),
        )
        .inspect(&schema, &bindings, &registry)
        .unwrap();
    assert!(report.is_empty(), "{report}");
}

#[test]
fn test_mapping_from_type_resolver_table() {
    let schema = pets_schema();
    let registry = TypeRegistry::new()
        .with_class(ClassDescriptor::new("zoo::Hound").with_property("name", string()))
        .with_class(ClassDescriptor::new("zoo::Tabby").with_property("name", string()));
    let bindings = pets_binding(ImplType::Any);
    let table = MappingClassResolver::from_type_name_mappings([
        (TypePath::new("zoo::Hound"), "Dog"),
        (TypePath::new("zoo::Tabby"), "Cat"),
    ]);

    let report = InspectorBuilder::new()
        .with_class_resolver(table)
        .inspect(&schema, &bindings, &registry)
        .unwrap();
    assert_eq!(report.unmapped_fields(), &[coords("Dog", "barks"), coords("Cat", "lives")]);
}

#[test]
fn test_every_mapped_implementation_is_checked() {
    let schema = pets_schema();
    let registry = pets_registry()
        .with_class(
            ClassDescriptor::new("app::pets::Cat")
                .with_property("name", string())
                .with_property("lives", ImplType::named("u8")),
        )
        .with_class(ClassDescriptor::new("app::pets::Kitten").with_property("name", string()));
    let bindings = pets_binding(ImplType::named("app::pets::Pet"));
    let resolver = MappingClassResolver::new()
        .with_mapping("Cat", ImplType::named("app::pets::Cat"))
        .with_mapping("Cat", ImplType::named("app::pets::Kitten"));

    let report = InspectorBuilder::new()
        .with_class_resolver(resolver)
        .inspect(&schema, &bindings, &registry)
        .unwrap();
    assert_eq!(report.unmapped_fields(), &[coords("Cat", "lives")]);
}

#[test]
fn test_custom_class_resolver() {
    let schema = pets_schema();
    let registry = TypeRegistry::new()
        .with_class(ClassDescriptor::new("custom::Pet::Dog").with_property("name", string()))
        .with_class(ClassDescriptor::new("custom::Pet::Cat").with_property("name", string()));
    let bindings = pets_binding(ImplType::Any);

    let report = InspectorBuilder::new()
        .with_custom_class_resolver(|object: &ObjectType, owner: &NamedType| {
            vec![ImplType::named(format!("custom::{}::{}", owner.name(), object.name))]
        })
        .inspect(&schema, &bindings, &registry)
        .unwrap();
    assert_eq!(report.unmapped_fields(), &[coords("Dog", "barks"), coords("Cat", "lives")]);
}

#[test]
fn test_resolvers_run_in_registration_order() {
    let schema = pets_schema();
    let registry = pets_registry();
    let bindings = pets_binding(ImplType::Any);

    let report = InspectorBuilder::new()
        .with_class_resolver(ClassResolver::custom(|object: &ObjectType, _: &NamedType| {
            if object.name == "Dog" {
                vec![ImplType::named("app::pets::Dog")]
            } else {
                vec![]
            }
        }))
        .with_class_resolver(MappingClassResolver::new().with_mapping("Dog", ImplType::Any))
        .with_class_resolver(
            MappingClassResolver::new().with_mapping("Cat", ImplType::named("app::pets::Cat")),
        )
        .inspect(&schema, &bindings, &registry)
        .unwrap();
    assert_eq!(report.unmapped_fields(), &[coords("Cat", "lives")]);
    assert!(report.skipped_types().is_empty());
}

#[test]
fn test_class_name_function() {
    let schema = pets_schema();
    let registry = TypeRegistry::new()
        .with_class(
            ClassDescriptor::new("app::pets::DogModel")
                .with_property("name", string())
                .with_property("barks", ImplType::named("bool")),
        )
        .with_class(ClassDescriptor::new("app::pets::CatModel").with_property("name", string()));
    let bindings = pets_binding(ImplType::named("app::pets::Pet"));

    let report = InspectorBuilder::new()
        .with_class_name_fn(|object| SmolStr::new(format!("{}Model", object.name)))
        .inspect(&schema, &bindings, &registry)
        .unwrap();
    assert_eq!(report.unmapped_fields(), &[coords("Cat", "lives")]);
}

#[test]
fn test_member_without_class_is_walked_when_referenced_directly() {
    let schema = SchemaBuilder::new()
        .with_object("Query", |b| {
            b.field("node", TypeRef::named("Node"))
                .field("book", TypeRef::named("Book"))
        })
        .with_interface("Node", |b| b.field("id", TypeRef::named("ID").required()))
        .with_object("Book", |b| {
            b.field("id", TypeRef::named("ID").required())
                .field("author", TypeRef::named("String"))
                .implements("Node")
        })
        .build();
    let registry = TypeRegistry::new()
        .with_class(ClassDescriptor::new("app::Book").with_property("id", string()));
    let bindings = BindingRegistry::new()
        .with_binding("Query", "node", Binding::opaque())
        .with_binding("Query", "book", Binding::returning(ImplType::named("app::Book")));

    let report = inspect(&schema, &bindings, &registry);
    assert_eq!(report.unmapped_fields(), &[coords("Book", "author")]);

    let skipped = &report.skipped_types()[0];
    assert_eq!(skipped.output_type, TypeRef::named("Book"));
    assert_eq!(skipped.coordinates, coords("Query", "node"));
    assert_eq!(skipped.reason, SkipReason::NoClassInformation);
}
