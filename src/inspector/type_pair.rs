//! Resolution of the `(schema type, implementation type)` pair for a field.
//!
//! Schema-side wrappers (non-null, list, pagination envelope) are removed and
//! the implementation type is unwrapped in step with them, so that both sides
//! describe the same element type.

use super::config::ConnectionConvention;
use crate::error::{InspectError, InspectResult};
use crate::introspection::{AsyncShape, ImplType};
use crate::schema::{FieldDef, NamedType, SchemaGraph, TypeRef};
use tracing::debug;

/// A matched schema type and implementation type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypePair {
    /// Schema type with field wrappers removed.
    pub output_type: TypeRef,
    /// Implementation type, or [`ImplType::None`] if unresolved.
    pub impl_type: ImplType,
}

impl TypePair {
    /// Creates a pair.
    pub fn new(output_type: TypeRef, impl_type: ImplType) -> Self {
        Self {
            output_type,
            impl_type,
        }
    }

    /// Resolves the pair for `field` of `parent` given the implementation
    /// type associated with the field.
    ///
    /// # Errors
    ///
    /// Fails if the field's type is a pagination envelope whose node type
    /// does not exist.
    pub fn resolve(
        parent: &str,
        field: &FieldDef,
        impl_type: &ImplType,
        schema: &dyn SchemaGraph,
        convention: &ConnectionConvention,
    ) -> InspectResult<TypePair> {
        let output_type = field.ty.unwrap_non_null();

        if let Some(node_type) = paginated_node_type(output_type, schema, convention)? {
            return Ok(TypePair::new(node_type, nest_for_connection(impl_type)));
        }

        match output_type {
            TypeRef::List(element) => {
                let subscription = schema.is_subscription_type(parent);
                Ok(TypePair::new(
                    element.unwrap_non_null().clone(),
                    nest_for_list(impl_type, subscription),
                ))
            }
            _ => Ok(TypePair::new(output_type.clone(), nest_if_wrapped(impl_type))),
        }
    }
}

/// Returns the node type if `output_type` is a pagination envelope.
fn paginated_node_type(
    output_type: &TypeRef,
    schema: &dyn SchemaGraph,
    convention: &ConnectionConvention,
) -> InspectResult<Option<TypeRef>> {
    let Some(NamedType::Object(object)) = output_type.name().and_then(|n| schema.named_type(n))
    else {
        return Ok(None);
    };
    if !convention.is_envelope(object) {
        return Ok(None);
    }

    let node = &object.name[..object.name.len() - convention.type_suffix.len()];
    if schema.named_type(node).is_none() {
        return Err(InspectError::MissingNodeType {
            connection: object.name.clone(),
            node: node.into(),
        });
    }
    Ok(Some(TypeRef::named(node)))
}

fn nest_for_connection(impl_type: &ImplType) -> ImplType {
    if impl_type.is_none() {
        return ImplType::None;
    }
    let envelope = nest_if_wrapped(impl_type);
    if envelope.generic_count() != 1 {
        debug!(impl_type = %envelope, "Expected connection type to have a generic parameter");
    }
    let element = envelope.nested();
    match element {
        // Edge wrapper around the node
        ImplType::Generic(_, ref arguments) if !arguments.is_empty() => element.nested(),
        _ => element,
    }
}

fn nest_if_wrapped(impl_type: &ImplType) -> ImplType {
    match impl_type {
        ImplType::Optional(inner) => {
            if inner.is_none() {
                debug!(
                    impl_type = %impl_type,
                    "Expected optional type to have a generic parameter"
                );
            }
            impl_type.nested()
        }
        ImplType::Async(shape, _) => {
            if *shape == AsyncShape::NoValue {
                debug!(
                    impl_type = %impl_type,
                    "Expected async return type that can produce value(s)"
                );
            }
            impl_type.nested()
        }
        _ => impl_type.clone(),
    }
}

fn nest_for_list(impl_type: &ImplType, subscription: bool) -> ImplType {
    if impl_type.is_none() {
        return ImplType::None;
    }

    let mut current = impl_type.clone();
    if let Some(shape) = current.async_shape() {
        if shape == AsyncShape::NoValue {
            debug!(impl_type = %impl_type, "Expected list compatible type");
        }
        current = current.nested();
        // A stream is the list itself, except for subscriptions where each
        // event carries a whole field value.
        if shape == AsyncShape::Multi && !subscription {
            return current;
        }
    }
    if let ImplType::Optional(_) = current {
        current = current.nested();
    }

    if !current.is_list() && current.generic_count() != 1 {
        debug!(impl_type = %impl_type, "Expected list compatible type");
    }
    current.nested()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{InMemorySchema, SchemaBuilder};

    fn schema() -> InMemorySchema {
        SchemaBuilder::new()
            .with_object("Query", |b| b)
            .with_object("Subscription", |b| b)
            .with_object("Book", |b| b.field("title", TypeRef::named("String")))
            .with_object("BookConnection", |b| {
                b.field("edges", TypeRef::list(TypeRef::named("BookEdge")))
                    .field("pageInfo", TypeRef::named("PageInfo").required())
            })
            .with_object("AuthorConnection", |b| {
                b.field("edges", TypeRef::list(TypeRef::named("String")))
                    .field("pageInfo", TypeRef::named("PageInfo"))
            })
            .with_object("PartialConnection", |b| b.field("edges", TypeRef::named("String")))
            .build()
    }

    fn resolve(parent: &str, ty: TypeRef, impl_type: ImplType) -> InspectResult<TypePair> {
        let field = FieldDef::new("f", ty);
        TypePair::resolve(parent, &field, &impl_type, &schema(), &ConnectionConvention::default())
    }

    fn book() -> ImplType {
        ImplType::named("app::Book")
    }

    #[test]
    fn scalar_position_strips_optional_and_async() {
        let pair = resolve("Query", TypeRef::named("Book"), ImplType::optional(book())).unwrap();
        assert_eq!(pair, TypePair::new(TypeRef::named("Book"), book()));

        let pair = resolve("Query", TypeRef::named("Book"), ImplType::future(book())).unwrap();
        assert_eq!(pair.impl_type, book());

        let pair = resolve("Query", TypeRef::named("Book"), ImplType::stream(book())).unwrap();
        assert_eq!(pair.impl_type, book());
    }

    #[test]
    fn scalar_position_does_not_unwrap_lists() {
        let pair = resolve("Query", TypeRef::named("Book"), ImplType::list(book())).unwrap();
        assert_eq!(pair.impl_type, ImplType::list(book()));
    }

    #[test]
    fn non_null_wrappers_are_transparent() {
        let property = ImplType::list(book());
        let wrapped = resolve(
            "Query",
            TypeRef::non_null(TypeRef::list(TypeRef::named("Book").required())),
            property.clone(),
        )
        .unwrap();
        let bare = resolve("Query", TypeRef::list(TypeRef::named("Book")), property).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(bare, TypePair::new(TypeRef::named("Book"), book()));
    }

    #[test]
    fn list_strips_future_then_collection() {
        let pair = resolve(
            "Query",
            TypeRef::list(TypeRef::named("Book")),
            ImplType::future(ImplType::list(book())),
        )
        .unwrap();
        assert_eq!(pair.impl_type, book());
    }

    #[test]
    fn list_accepts_optional_collection() {
        let pair = resolve(
            "Query",
            TypeRef::list(TypeRef::named("Book")),
            ImplType::optional(ImplType::list(book())),
        )
        .unwrap();
        assert_eq!(pair.impl_type, book());
    }

    #[test]
    fn stream_counts_as_the_list_layer() {
        let pair = resolve(
            "Query",
            TypeRef::list(TypeRef::named("Book")),
            ImplType::stream(book()),
        )
        .unwrap();
        assert_eq!(pair.impl_type, book());
    }

    #[test]
    fn subscription_stream_is_separate_from_the_list() {
        let pair = resolve(
            "Subscription",
            TypeRef::list(TypeRef::named("Book")),
            ImplType::stream(ImplType::list(book())),
        )
        .unwrap();
        assert_eq!(pair.impl_type, book());
    }

    #[test]
    fn nested_list_unwraps_one_level() {
        let pair = resolve(
            "Query",
            TypeRef::list(TypeRef::list(TypeRef::named("Book"))),
            ImplType::list(ImplType::list(book())),
        )
        .unwrap();
        assert_eq!(pair.output_type, TypeRef::list(TypeRef::named("Book")));
        assert_eq!(pair.impl_type, ImplType::list(book()));
    }

    #[test]
    fn connection_resolves_to_node_type() {
        let pair = resolve(
            "Query",
            TypeRef::named("BookConnection").required(),
            ImplType::future(ImplType::generic("app::Connection", vec![book()])),
        )
        .unwrap();
        assert_eq!(pair, TypePair::new(TypeRef::named("Book"), book()));
    }

    #[test]
    fn connection_unwraps_edge_wrapper() {
        let edge = ImplType::generic("app::Edge", vec![book()]);
        let pair = resolve(
            "Query",
            TypeRef::named("BookConnection"),
            ImplType::generic("app::Connection", vec![edge]),
        )
        .unwrap();
        assert_eq!(pair.impl_type, book());
    }

    #[test]
    fn connection_without_node_type_is_fatal() {
        let err = resolve("Query", TypeRef::named("AuthorConnection"), ImplType::None).unwrap_err();
        assert_eq!(
            err,
            InspectError::MissingNodeType {
                connection: "AuthorConnection".into(),
                node: "Author".into(),
            }
        );
    }

    #[test]
    fn envelope_requires_both_fields() {
        let pair = resolve("Query", TypeRef::named("PartialConnection"), ImplType::None).unwrap();
        assert_eq!(pair.output_type, TypeRef::named("PartialConnection"));
    }

    #[test]
    fn unresolved_type_stays_unresolved() {
        for ty in [
            TypeRef::named("Book"),
            TypeRef::list(TypeRef::named("Book")),
            TypeRef::named("BookConnection"),
        ] {
            let pair = resolve("Query", ty, ImplType::None).unwrap();
            assert_eq!(pair.impl_type, ImplType::None);
        }
    }

    #[test]
    fn malformed_wrappers_resolve_best_effort() {
        let pair = resolve("Query", TypeRef::list(TypeRef::named("Book")), book()).unwrap();
        assert_eq!(pair.impl_type, ImplType::None);

        let pair = resolve(
            "Query",
            TypeRef::named("BookConnection"),
            ImplType::generic("app::Page", vec![ImplType::named("app::Cursor"), book()]),
        )
        .unwrap();
        assert_eq!(pair.impl_type, book());
    }
}
