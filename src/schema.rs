//! Schema graph model for mapping inspection.
//!
//! The inspector does not parse schemas. It consumes an already-built graph
//! through the [`SchemaGraph`] trait, which exposes root operation types,
//! named types, and fields with their wrapper structure.
//!
//! # Architecture
//!
//! - **Core Types**: [`TypeRef`], [`FieldDef`], [`ArgumentDef`], [`NamedType`]
//! - **Capability**: [`SchemaGraph`] - read-only, query-time view
//! - **In-Memory Implementation**: [`InMemorySchema`], assembled with [`SchemaBuilder`]

use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

/// Scalars every schema defines implicitly.
pub const BUILTIN_SCALARS: [&str; 5] = ["Boolean", "Float", "ID", "Int", "String"];

// ============================================================================
// Coordinates
// ============================================================================

/// A `(container type name, field name)` pair identifying one schema field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldCoordinates {
    /// Name of the object or interface type declaring the field.
    pub type_name: SmolStr,
    /// Name of the field.
    pub field_name: SmolStr,
}

impl FieldCoordinates {
    /// Creates coordinates for `type_name.field_name`.
    pub fn new(type_name: impl Into<SmolStr>, field_name: impl Into<SmolStr>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }
}

impl fmt::Display for FieldCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.type_name, self.field_name)
    }
}

// ============================================================================
// Type References
// ============================================================================

/// Output or argument type of a field, including its wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// Reference to a named type.
    Named(SmolStr),
    /// Non-null wrapper.
    NonNull(Box<TypeRef>),
    /// List wrapper.
    List(Box<TypeRef>),
}

impl TypeRef {
    /// Creates a reference to a named type.
    pub fn named(name: impl Into<SmolStr>) -> Self {
        TypeRef::Named(name.into())
    }

    /// Wraps `inner` in a list.
    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Wraps `inner` in a non-null wrapper.
    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    /// Wraps this type in a non-null wrapper.
    pub fn required(self) -> Self {
        TypeRef::non_null(self)
    }

    /// Strips one non-null wrapper, if present.
    pub fn unwrap_non_null(&self) -> &TypeRef {
        match self {
            TypeRef::NonNull(inner) => inner,
            other => other,
        }
    }

    /// Returns the type name if this reference is not wrapped.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns the innermost named type, looking through all wrappers.
    pub fn innermost_name(&self) -> &str {
        match self {
            TypeRef::Named(name) => name.as_str(),
            TypeRef::NonNull(inner) | TypeRef::List(inner) => inner.innermost_name(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
        }
    }
}

// ============================================================================
// Fields and Named Types
// ============================================================================

/// A named argument declared on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentDef {
    /// Argument name
    pub name: SmolStr,
    /// Declared input type
    pub ty: TypeRef,
}

/// A field of an object or interface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name, unique within its container
    pub name: SmolStr,
    /// Output type including wrappers
    pub ty: TypeRef,
    /// Declared arguments, in declaration order
    pub arguments: Vec<ArgumentDef>,
}

impl FieldDef {
    /// Creates a field without arguments.
    pub fn new(name: impl Into<SmolStr>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            arguments: Vec::new(),
        }
    }

    /// Adds an argument to the field.
    pub fn with_argument(mut self, name: impl Into<SmolStr>, ty: TypeRef) -> Self {
        self.arguments.push(ArgumentDef {
            name: name.into(),
            ty,
        });
        self
    }

    /// Looks up an argument by name.
    pub fn argument(&self, name: &str) -> Option<&ArgumentDef> {
        self.arguments.iter().find(|arg| arg.name == name)
    }
}

/// Object type: fields plus implemented interfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectType {
    pub name: SmolStr,
    pub fields: Vec<FieldDef>,
    pub interfaces: Vec<SmolStr>,
}

/// Interface type: fields plus interfaces it extends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceType {
    pub name: SmolStr,
    pub fields: Vec<FieldDef>,
    pub interfaces: Vec<SmolStr>,
}

/// Union type and its member object types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnionType {
    pub name: SmolStr,
    pub members: Vec<SmolStr>,
}

/// Enum type and its values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    pub name: SmolStr,
    pub values: Vec<SmolStr>,
}

/// Kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Object,
    Interface,
    Union,
    Scalar,
    Enum,
    InputObject,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Object => write!(f, "object"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Union => write!(f, "union"),
            TypeKind::Scalar => write!(f, "scalar"),
            TypeKind::Enum => write!(f, "enum"),
            TypeKind::InputObject => write!(f, "input object"),
        }
    }
}

/// A named node in the schema graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamedType {
    Object(ObjectType),
    Interface(InterfaceType),
    Union(UnionType),
    Scalar(SmolStr),
    Enum(EnumType),
    InputObject(SmolStr),
}

impl NamedType {
    /// Returns the type name.
    pub fn name(&self) -> &str {
        match self {
            NamedType::Object(t) => &t.name,
            NamedType::Interface(t) => &t.name,
            NamedType::Union(t) => &t.name,
            NamedType::Scalar(name) => name,
            NamedType::Enum(t) => &t.name,
            NamedType::InputObject(name) => name,
        }
    }

    /// Returns the kind of this type.
    pub fn kind(&self) -> TypeKind {
        match self {
            NamedType::Object(_) => TypeKind::Object,
            NamedType::Interface(_) => TypeKind::Interface,
            NamedType::Union(_) => TypeKind::Union,
            NamedType::Scalar(_) => TypeKind::Scalar,
            NamedType::Enum(_) => TypeKind::Enum,
            NamedType::InputObject(_) => TypeKind::InputObject,
        }
    }

    /// Returns the fields of an object or interface type.
    pub fn fields(&self) -> Option<&[FieldDef]> {
        match self {
            NamedType::Object(t) => Some(&t.fields),
            NamedType::Interface(t) => Some(&t.fields),
            _ => None,
        }
    }

    /// Looks up a field of an object or interface type.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields()?.iter().find(|field| field.name == name)
    }

    /// Returns true for object and interface types.
    pub fn is_fields_container(&self) -> bool {
        self.fields().is_some()
    }

    /// Returns true for leaf types.
    pub fn is_scalar_or_enum(&self) -> bool {
        matches!(self, NamedType::Scalar(_) | NamedType::Enum(_))
    }

    /// Returns the object type, if this is one.
    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            NamedType::Object(t) => Some(t),
            _ => None,
        }
    }
}

// ============================================================================
// Schema Graph Trait
// ============================================================================

/// Read-only view of a schema.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so an inspector can be shared
/// between threads that race to produce the report.
pub trait SchemaGraph: Send + Sync {
    /// Name of the query root type.
    fn query_type_name(&self) -> &str;

    /// Name of the mutation root type, if the schema supports mutations.
    fn mutation_type_name(&self) -> Option<&str>;

    /// Name of the subscription root type, if the schema supports subscriptions.
    fn subscription_type_name(&self) -> Option<&str>;

    /// Looks up a named type.
    fn named_type(&self, name: &str) -> Option<&NamedType>;

    /// All named types, ordered by name.
    fn all_types(&self) -> Vec<&NamedType>;

    /// Looks up a field by coordinates.
    ///
    /// Returns `None` if the type does not exist, is not an object or
    /// interface, or does not declare the field.
    fn field(&self, coordinates: &FieldCoordinates) -> Option<&FieldDef> {
        self.named_type(&coordinates.type_name)?
            .field(&coordinates.field_name)
    }

    /// Returns true if `type_name` is the subscription root.
    fn is_subscription_type(&self, type_name: &str) -> bool {
        self.subscription_type_name() == Some(type_name)
    }
}

// ============================================================================
// In-Memory Implementation
// ============================================================================

/// In-memory schema graph.
#[derive(Debug, Clone)]
pub struct InMemorySchema {
    /// Named types by name
    types: BTreeMap<SmolStr, NamedType>,
    query_type: SmolStr,
    mutation_type: SmolStr,
    subscription_type: SmolStr,
}

impl InMemorySchema {
    fn root_object(&self, name: &SmolStr) -> Option<&str> {
        match self.types.get(name) {
            Some(NamedType::Object(object)) => Some(object.name.as_str()),
            _ => None,
        }
    }
}

impl SchemaGraph for InMemorySchema {
    fn query_type_name(&self) -> &str {
        &self.query_type
    }

    fn mutation_type_name(&self) -> Option<&str> {
        self.root_object(&self.mutation_type)
    }

    fn subscription_type_name(&self) -> Option<&str> {
        self.root_object(&self.subscription_type)
    }

    fn named_type(&self, name: &str) -> Option<&NamedType> {
        self.types.get(name)
    }

    fn all_types(&self) -> Vec<&NamedType> {
        self.types.values().collect()
    }
}

// ============================================================================
// Schema Builder
// ============================================================================

/// Builder for [`InMemorySchema`] with a fluent API.
///
/// # Example
///
/// ```
/// use schema_mapping_inspector::schema::{FieldDef, SchemaBuilder, SchemaGraph, TypeRef};
///
/// let schema = SchemaBuilder::new()
///     .with_object("Query", |builder| {
///         builder.add_field(
///             FieldDef::new("book", TypeRef::named("Book"))
///                 .with_argument("id", TypeRef::named("ID").required()),
///         )
///     })
///     .with_object("Book", |builder| {
///         builder.field("title", TypeRef::named("String").required())
///     })
///     .build();
///
/// assert!(schema.named_type("Book").is_some());
/// assert_eq!(schema.mutation_type_name(), None);
/// ```
pub struct SchemaBuilder {
    types: BTreeMap<SmolStr, NamedType>,
    query_type: SmolStr,
    mutation_type: SmolStr,
    subscription_type: SmolStr,
}

impl SchemaBuilder {
    /// Creates a builder holding only the built-in scalars.
    pub fn new() -> Self {
        let types = BUILTIN_SCALARS
            .iter()
            .map(|name| (SmolStr::new(name), NamedType::Scalar(SmolStr::new(name))))
            .collect();
        Self {
            types,
            query_type: "Query".into(),
            mutation_type: "Mutation".into(),
            subscription_type: "Subscription".into(),
        }
    }

    /// Adds or replaces a named type.
    pub fn add_type(mut self, named_type: NamedType) -> Self {
        self.types.insert(named_type.name().into(), named_type);
        self
    }

    /// Adds an object type using a builder closure.
    pub fn with_object<F>(self, name: impl Into<SmolStr>, builder_fn: F) -> Self
    where
        F: FnOnce(FieldsContainerBuilder) -> FieldsContainerBuilder,
    {
        let (name, fields, interfaces) =
            builder_fn(FieldsContainerBuilder::new(name.into())).finish();
        self.add_type(NamedType::Object(ObjectType {
            name,
            fields,
            interfaces,
        }))
    }

    /// Adds an interface type using a builder closure.
    pub fn with_interface<F>(self, name: impl Into<SmolStr>, builder_fn: F) -> Self
    where
        F: FnOnce(FieldsContainerBuilder) -> FieldsContainerBuilder,
    {
        let (name, fields, interfaces) =
            builder_fn(FieldsContainerBuilder::new(name.into())).finish();
        self.add_type(NamedType::Interface(InterfaceType {
            name,
            fields,
            interfaces,
        }))
    }

    /// Adds a union type.
    pub fn with_union<I, S>(self, name: impl Into<SmolStr>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.add_type(NamedType::Union(UnionType {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
        }))
    }

    /// Adds a custom scalar.
    pub fn with_scalar(self, name: impl Into<SmolStr>) -> Self {
        self.add_type(NamedType::Scalar(name.into()))
    }

    /// Adds an enum type.
    pub fn with_enum<I, S>(self, name: impl Into<SmolStr>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.add_type(NamedType::Enum(EnumType {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }))
    }

    /// Adds an input object type. Its fields are irrelevant for inspection.
    pub fn with_input_object(self, name: impl Into<SmolStr>) -> Self {
        self.add_type(NamedType::InputObject(name.into()))
    }

    /// Overrides the query root type name.
    pub fn with_query_type(mut self, name: impl Into<SmolStr>) -> Self {
        self.query_type = name.into();
        self
    }

    /// Overrides the mutation root type name.
    pub fn with_mutation_type(mut self, name: impl Into<SmolStr>) -> Self {
        self.mutation_type = name.into();
        self
    }

    /// Overrides the subscription root type name.
    pub fn with_subscription_type(mut self, name: impl Into<SmolStr>) -> Self {
        self.subscription_type = name.into();
        self
    }

    /// Builds the schema.
    pub fn build(self) -> InMemorySchema {
        InMemorySchema {
            types: self.types,
            query_type: self.query_type,
            mutation_type: self.mutation_type,
            subscription_type: self.subscription_type,
        }
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the fields of an object or interface type.
pub struct FieldsContainerBuilder {
    name: SmolStr,
    fields: Vec<FieldDef>,
    interfaces: Vec<SmolStr>,
}

impl FieldsContainerBuilder {
    /// Creates a new builder for the named container.
    pub fn new(name: SmolStr) -> Self {
        Self {
            name,
            fields: Vec::new(),
            interfaces: Vec::new(),
        }
    }

    /// Adds a field without arguments.
    pub fn field(self, name: impl Into<SmolStr>, ty: TypeRef) -> Self {
        self.add_field(FieldDef::new(name, ty))
    }

    /// Adds a field. A field with the same name is replaced in place.
    pub fn add_field(mut self, field: FieldDef) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    /// Declares an implemented interface.
    pub fn implements(mut self, interface: impl Into<SmolStr>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    fn finish(self) -> (SmolStr, Vec<FieldDef>, Vec<SmolStr>) {
        (self.name, self.fields, self.interfaces)
    }
}
