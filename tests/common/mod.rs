//! Common test utilities
//!
//! Shared fixtures for the integration tests: a small bookstore schema, the
//! type registry describing its data model and the bindings that serve it.
//! The three fit together without findings; tests add the defect they need.
//!
//! # Fixtures
//! - [`bookstore_schema`] - Schema with query, mutation and subscription roots
//! - [`bookstore_registry`] - Descriptors for the `app::model` types
//! - [`bookstore_bindings`] - Bindings for every root field
//! - [`bookstore`] - All three at once
//!
//! # Helpers
//! - [`inspect`] - Run an inspection with default configuration
//! - [`coords`] - Shorthand for [`FieldCoordinates`]

#![allow(dead_code)]

use schema_mapping_inspector::schema::{FieldDef, FieldsContainerBuilder, InMemorySchema};
use schema_mapping_inspector::{
    Binding, BindingRegistry, ClassDescriptor, FieldCoordinates, ImplType, SchemaBuilder,
    SchemaMappingInspector, SchemaReport, TypeRef, TypeRegistry,
};

// ============================================================================
// Bookstore Fixture
// ============================================================================

pub const MODEL: &str = "app::model::";

/// Qualified data model type.
pub fn model(name: &str) -> ImplType {
    ImplType::named(format!("{MODEL}{name}"))
}

pub fn string() -> ImplType {
    ImplType::named("std::string::String")
}

fn node_fields(builder: FieldsContainerBuilder) -> FieldsContainerBuilder {
    builder
        .field("id", TypeRef::named("ID").required())
        .implements("Node")
}

/// The fields of the bookstore query root.
pub fn bookstore_query(builder: FieldsContainerBuilder) -> FieldsContainerBuilder {
    builder
        .add_field(
            FieldDef::new("book", TypeRef::named("Book"))
                .with_argument("id", TypeRef::named("ID").required()),
        )
        .field("books", TypeRef::list(TypeRef::named("Book").required()).required())
        .add_field(
            FieldDef::new("bookPage", TypeRef::named("BookConnection").required())
                .with_argument("first", TypeRef::named("Int")),
        )
        .add_field(
            FieldDef::new("search", TypeRef::list(TypeRef::named("SearchResult")))
                .with_argument("text", TypeRef::named("String")),
        )
        .add_field(
            FieldDef::new("node", TypeRef::named("Node"))
                .with_argument("id", TypeRef::named("ID").required()),
        )
}

/// The bookstore schema:
///
/// ```graphql
/// type Query {
///   book(id: ID!): Book
///   books: [Book!]!
///   bookPage(first: Int): BookConnection!
///   search(text: String): [SearchResult]
///   node(id: ID!): Node
/// }
/// type Mutation { addBook(title: String!): Book }
/// type Subscription { bookAdded: Book!  bookBatches: [Book] }
/// interface Node { id: ID! }
/// type Book implements Node { id: ID!  title: String!  author: Author  genre: Genre }
/// type Author implements Node { id: ID!  name: String!  books: [Book] }
/// union SearchResult = Book | Author
/// enum Genre { FICTION SCIENCE }
/// type BookConnection { edges: [BookEdge]  pageInfo: PageInfo! }
/// type BookEdge { cursor: String!  node: Book }
/// type PageInfo { hasNextPage: Boolean! }
/// ```
pub fn bookstore_builder() -> SchemaBuilder {
    SchemaBuilder::new()
        .with_object("Query", bookstore_query)
        .with_object("Mutation", |b| {
            b.add_field(
                FieldDef::new("addBook", TypeRef::named("Book"))
                    .with_argument("title", TypeRef::named("String").required()),
            )
        })
        .with_object("Subscription", |b| {
            b.field("bookAdded", TypeRef::named("Book").required())
                .field("bookBatches", TypeRef::list(TypeRef::named("Book")))
        })
        .with_interface("Node", |b| b.field("id", TypeRef::named("ID").required()))
        .with_object("Book", |b| {
            node_fields(b)
                .field("title", TypeRef::named("String").required())
                .field("author", TypeRef::named("Author"))
                .field("genre", TypeRef::named("Genre"))
        })
        .with_object("Author", |b| {
            node_fields(b)
                .field("name", TypeRef::named("String").required())
                .field("books", TypeRef::list(TypeRef::named("Book")))
        })
        .with_union("SearchResult", ["Book", "Author"])
        .with_enum("Genre", ["FICTION", "SCIENCE"])
        .with_object("BookConnection", |b| {
            b.field("edges", TypeRef::list(TypeRef::named("BookEdge")))
                .field("pageInfo", TypeRef::named("PageInfo").required())
        })
        .with_object("BookEdge", |b| {
            b.field("cursor", TypeRef::named("String").required())
                .field("node", TypeRef::named("Book"))
        })
        .with_object("PageInfo", |b| b.field("hasNextPage", TypeRef::named("Boolean").required()))
}

pub fn bookstore_schema() -> InMemorySchema {
    bookstore_builder().build()
}

pub fn bookstore_registry() -> TypeRegistry {
    TypeRegistry::new()
        .with_class(
            ClassDescriptor::new("app::model::Book")
                .with_property("id", string())
                .with_property("title", string())
                .with_property("author", ImplType::optional(model("Author")))
                .with_property("genre", model("Genre")),
        )
        .with_class(
            ClassDescriptor::new("app::model::Author")
                .with_property("id", string())
                .with_property("name", string())
                .with_property("books", ImplType::list(model("Book"))),
        )
        .with_class(ClassDescriptor::new("app::model::Genre"))
        .with_class(ClassDescriptor::new("app::page::Connection").with_type_parameters(1))
        .with_class(ClassDescriptor::new("app::page::Edge").with_type_parameters(1))
}

pub fn book_page() -> ImplType {
    ImplType::future(ImplType::generic(
        "app::page::Connection",
        vec![ImplType::generic("app::page::Edge", vec![model("Book")])],
    ))
}

/// Schema, bindings and registry of the bookstore, in that order.
pub fn bookstore() -> (InMemorySchema, BindingRegistry, TypeRegistry) {
    (bookstore_schema(), bookstore_bindings(), bookstore_registry())
}

pub fn bookstore_bindings() -> BindingRegistry {
    BindingRegistry::new()
        .with_binding(
            "Query",
            "book",
            Binding::returning(ImplType::optional(model("Book"))).with_argument("id"),
        )
        .with_binding(
            "Query",
            "books",
            Binding::returning(ImplType::future(ImplType::list(model("Book")))),
        )
        .with_binding("Query", "bookPage", Binding::returning(book_page()).with_argument("first"))
        .with_binding(
            "Query",
            "search",
            Binding::returning(ImplType::list(model("SearchResult"))).with_argument("text"),
        )
        .with_binding("Query", "node", Binding::returning(model("Node")).with_argument("id"))
        .with_binding(
            "Mutation",
            "addBook",
            Binding::returning(model("Book")).with_argument("title"),
        )
        .with_binding(
            "Subscription",
            "bookAdded",
            Binding::returning(ImplType::stream(model("Book"))),
        )
        .with_binding(
            "Subscription",
            "bookBatches",
            Binding::returning(ImplType::stream(ImplType::list(model("Book")))),
        )
}

// ============================================================================
// Helpers
// ============================================================================

/// Run an inspection with default configuration, panicking on fatal errors.
pub fn inspect<'a>(
    schema: &'a InMemorySchema,
    bindings: &'a BindingRegistry,
    registry: &TypeRegistry,
) -> SchemaReport<'a> {
    SchemaMappingInspector::inspect(schema, bindings, registry)
        .unwrap_or_else(|err| panic!("inspection failed: {err}"))
}

pub fn coords(type_name: &str, field_name: &str) -> FieldCoordinates {
    FieldCoordinates::new(type_name, field_name)
}
