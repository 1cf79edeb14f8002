//! Fatal inspection errors.
//!
//! Mismatches between schema and bindings are never errors; they are findings
//! in the [`SchemaReport`](crate::report::SchemaReport). The errors here abort
//! an inspection because its inputs cannot be inspected at all.

use crate::introspection::TypePath;
use crate::schema::FieldCoordinates;
use miette::Diagnostic;
use smol_str::SmolStr;
use thiserror::Error;

/// Result type for inspection operations.
pub type InspectResult<T> = Result<T, InspectError>;

/// Failure reported by a [`TypeIntrospector`](crate::introspection::TypeIntrospector).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct IntrospectionError {
    message: String,
}

impl IntrospectionError {
    /// Creates an error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors that abort an inspection.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum InspectError {
    /// The schema has no query root object type.
    #[error("Query root type '{name}' is not defined in the schema")]
    #[diagnostic(
        code(schema_inspection::missing_query_type),
        help("every schema must declare a query root object type")
    )]
    MissingQueryType { name: SmolStr },

    /// A pagination envelope whose node type does not exist.
    #[error("No node type '{node}' for '{connection}'")]
    #[diagnostic(
        code(schema_inspection::missing_node_type),
        help("declare the node type, or rename the type so it is not read as a pagination envelope")
    )]
    MissingNodeType { connection: SmolStr, node: SmolStr },

    /// A field refers to a type the schema does not define.
    #[error("Type '{name}' referenced by '{coordinates}' is not defined in the schema")]
    #[diagnostic(code(schema_inspection::undefined_type))]
    UndefinedType {
        name: SmolStr,
        coordinates: FieldCoordinates,
    },

    /// The property-introspection capability failed.
    #[error("Failed to get property on {type_path} for field '{field}'")]
    #[diagnostic(
        code(schema_inspection::introspection),
        help("the implementation type descriptor is unusable; register it with the introspector")
    )]
    Introspection {
        type_path: TypePath,
        field: SmolStr,
        #[source]
        source: IntrospectionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn messages_carry_context() {
        let err = InspectError::MissingNodeType {
            connection: "BookConnection".into(),
            node: "Book".into(),
        };
        assert_eq!(err.to_string(), "No node type 'Book' for 'BookConnection'");

        let err = InspectError::UndefinedType {
            name: "Author".into(),
            coordinates: FieldCoordinates::new("Book", "author"),
        };
        assert_eq!(
            err.to_string(),
            "Type 'Author' referenced by 'Book.author' is not defined in the schema"
        );
    }

    #[test]
    fn introspection_error_is_the_source() {
        let err = InspectError::Introspection {
            type_path: TypePath::new("app::Book"),
            field: "title".into(),
            source: IntrospectionError::new("no descriptor registered for 'app::Book'"),
        };
        assert_eq!(err.to_string(), "Failed to get property on app::Book for field 'title'");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("no descriptor registered for 'app::Book'".to_string())
        );
    }

    #[test]
    fn diagnostic_codes() {
        let err = InspectError::MissingQueryType { name: "Query".into() };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("schema_inspection::missing_query_type"));
        assert!(err.help().is_some());
    }
}
