//! Consistency checks between a GraphQL schema and the code that serves it.
//!
//! Given a schema graph, the resolver bindings registered for its fields and
//! a way to introspect implementation types, the inspector reports:
//!
//! - schema fields with no binding and no same-named readable property,
//! - bindings registered for fields the schema does not have,
//! - binding arguments the schema field does not declare,
//! - reachable types that could not be inspected, and why.
//!
//! Findings convert to diagnostics built on miette, so an application can
//! render them or refuse to start.
//!
//! # Example
//!
//! ```
//! use schema_mapping_inspector::{
//!     Binding, BindingRegistry, ClassDescriptor, FieldCoordinates, ImplType,
//!     SchemaBuilder, SchemaMappingInspector, TypeRef, TypeRegistry,
//! };
//!
//! let schema = SchemaBuilder::new()
//!     .with_object("Query", |b| {
//!         b.add_field(
//!             schema_mapping_inspector::schema::FieldDef::new("book", TypeRef::named("Book"))
//!                 .with_argument("id", TypeRef::named("ID").required()),
//!         )
//!     })
//!     .with_object("Book", |b| {
//!         b.field("title", TypeRef::named("String").required())
//!             .field("author", TypeRef::named("String"))
//!     })
//!     .build();
//!
//! let registry = TypeRegistry::new().with_class(
//!     ClassDescriptor::new("app::Book")
//!         .with_property("title", ImplType::named("std::string::String")),
//! );
//!
//! let bindings = BindingRegistry::new().with_binding(
//!     "Query",
//!     "book",
//!     Binding::returning(ImplType::named("app::Book")).with_argument("id"),
//! );
//!
//! let report = SchemaMappingInspector::inspect(&schema, &bindings, &registry).unwrap();
//! assert_eq!(report.unmapped_fields(), &[FieldCoordinates::new("Book", "author")]);
//! assert!(report.unmapped_registrations().is_empty());
//! assert!(report.into_result().is_err());
//! ```

pub mod binding;
pub mod diag;
pub mod error;
pub mod inspector;
pub mod introspection;
pub mod report;
pub mod schema;

pub use binding::{Binding, BindingRegistry};
pub use diag::{Diag, DiagSeverity};
pub use error::{InspectError, InspectResult, IntrospectionError};
pub use inspector::{
    ClassResolver, InspectorBuilder, InspectorConfig, MappingClassResolver, SchemaMappingInspector,
};
pub use introspection::{ClassDescriptor, ImplType, TypeIntrospector, TypePath, TypeRegistry};
pub use report::{SchemaReport, SkipReason, SkippedType, UnmappedArguments};
pub use schema::{FieldCoordinates, InMemorySchema, NamedType, SchemaBuilder, SchemaGraph, TypeRef};
