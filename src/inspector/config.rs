//! Inspection configuration.

use crate::introspection::TypePath;
use crate::schema::ObjectType;
use smol_str::SmolStr;

/// Naming convention that identifies pagination envelope types.
///
/// An object type is an envelope if its name ends with `type_suffix` and it
/// declares both `edges_field` and `page_info_field`. The node type is the
/// envelope name without the suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConvention {
    /// Envelope type name suffix.
    pub type_suffix: SmolStr,
    /// Name of the field holding the edges.
    pub edges_field: SmolStr,
    /// Name of the field holding page metadata.
    pub page_info_field: SmolStr,
}

impl ConnectionConvention {
    /// Returns true if `object` follows this convention.
    pub fn is_envelope(&self, object: &ObjectType) -> bool {
        let has_field = |name: &str| object.fields.iter().any(|f| f.name == name);
        object.name.ends_with(self.type_suffix.as_str())
            && has_field(self.edges_field.as_str())
            && has_field(self.page_info_field.as_str())
    }
}

impl Default for ConnectionConvention {
    fn default() -> Self {
        Self {
            type_suffix: "Connection".into(),
            edges_field: "edges".into(),
            page_info_field: "pageInfo".into(),
        }
    }
}

/// Configuration for schema mapping inspection.
#[derive(Debug, Clone)]
pub struct InspectorConfig {
    /// Pagination envelope convention.
    pub connection: ConnectionConvention,

    /// Path prefixes of language-provided types. Bindings returning such
    /// types do not teach the reflection resolver where to find
    /// implementations of interfaces and unions.
    pub core_path_prefixes: Vec<SmolStr>,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConvention::default(),
            core_path_prefixes: vec!["std::".into(), "core::".into(), "alloc::".into()],
        }
    }
}

impl InspectorConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pagination envelope convention.
    pub fn with_connection(mut self, connection: ConnectionConvention) -> Self {
        self.connection = connection;
        self
    }

    /// Sets the pagination envelope type name suffix.
    pub fn with_connection_suffix(mut self, suffix: impl Into<SmolStr>) -> Self {
        self.connection.type_suffix = suffix.into();
        self
    }

    /// Replaces the core path prefixes.
    pub fn with_core_path_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.core_path_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if `path` names a language-provided type.
    pub fn is_core_type(&self, path: &TypePath) -> bool {
        self.core_path_prefixes
            .iter()
            .any(|prefix| path.as_str().starts_with(prefix.as_str()))
    }
}
