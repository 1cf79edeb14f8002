//! Implementation type descriptors and the property-introspection capability.
//!
//! An [`ImplType`] describes the data-model type a binding returns or a
//! property holds, including the wrappers that must be looked through before
//! it can be compared with a schema type: optional values, async values and
//! streams, collections, and user generics such as pagination envelopes.
//!
//! Rust has no runtime reflection, so property lookup is an injected
//! [`TypeIntrospector`]. [`TypeRegistry`] is the explicit registration table
//! implementation.

use crate::error::IntrospectionError;
use smol_str::SmolStr;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

const PATH_SEPARATOR: &str = "::";

/// Qualified path of an implementation type, e.g. `app::model::Book`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypePath(SmolStr);

impl TypePath {
    /// Creates a type path.
    pub fn new(path: impl Into<SmolStr>) -> Self {
        Self(path.into())
    }

    /// Returns the full path.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the last path segment.
    pub fn simple_name(&self) -> &str {
        match self.0.rfind(PATH_SEPARATOR) {
            Some(index) => &self.0[index + PATH_SEPARATOR.len()..],
            None => &self.0,
        }
    }

    /// Returns everything before the simple name, including the trailing
    /// separator. Empty for unqualified paths.
    pub fn prefix(&self) -> &str {
        let simple_len = self.simple_name().len();
        &self.0[..self.0.len() - simple_len]
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TypePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// Shape of an asynchronous wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AsyncShape {
    /// Produces one value (a future).
    Single,
    /// Produces many values (a stream).
    Multi,
    /// Completes without a value.
    NoValue,
}

/// Descriptor of an implementation type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImplType {
    /// Unknown or absent type information.
    None,
    /// The universal type; carries no class information.
    Any,
    /// A concrete data-model type.
    Named(TypePath),
    /// A concrete generic type with type arguments, e.g. `Connection<Book>`.
    Generic(TypePath, Vec<ImplType>),
    /// Optional value.
    Optional(Box<ImplType>),
    /// Asynchronous value or stream of values.
    Async(AsyncShape, Box<ImplType>),
    /// Collection or array.
    List(Box<ImplType>),
}

impl ImplType {
    /// Creates a concrete named type.
    pub fn named(path: impl Into<SmolStr>) -> Self {
        ImplType::Named(TypePath::new(path))
    }

    /// Creates a generic type.
    pub fn generic(path: impl Into<SmolStr>, arguments: Vec<ImplType>) -> Self {
        ImplType::Generic(TypePath::new(path), arguments)
    }

    /// Wraps `inner` in an optional.
    pub fn optional(inner: ImplType) -> Self {
        ImplType::Optional(Box::new(inner))
    }

    /// Wraps `inner` in a single-value async wrapper.
    pub fn future(inner: ImplType) -> Self {
        ImplType::Async(AsyncShape::Single, Box::new(inner))
    }

    /// Wraps `inner` in a multi-value async wrapper.
    pub fn stream(inner: ImplType) -> Self {
        ImplType::Async(AsyncShape::Multi, Box::new(inner))
    }

    /// Wraps `inner` in a collection.
    pub fn list(inner: ImplType) -> Self {
        ImplType::List(Box::new(inner))
    }

    /// Returns true for [`ImplType::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, ImplType::None)
    }

    /// Returns true for collections.
    pub fn is_list(&self) -> bool {
        matches!(self, ImplType::List(_))
    }

    /// Returns the async shape if this is an async wrapper.
    pub fn async_shape(&self) -> Option<AsyncShape> {
        match self {
            ImplType::Async(shape, _) => Some(*shape),
            _ => None,
        }
    }

    /// Number of type parameters this descriptor nests.
    pub fn generic_count(&self) -> usize {
        match self {
            ImplType::Generic(_, arguments) => arguments.len(),
            ImplType::Optional(_) | ImplType::Async(..) | ImplType::List(_) => 1,
            ImplType::None | ImplType::Any | ImplType::Named(_) => 0,
        }
    }

    /// Unwraps one level of nesting.
    ///
    /// Wrappers yield their inner type and generics yield their last type
    /// argument. Anything without a type parameter yields [`ImplType::None`].
    pub fn nested(&self) -> ImplType {
        match self {
            ImplType::Optional(inner) | ImplType::Async(_, inner) | ImplType::List(inner) => {
                (**inner).clone()
            }
            ImplType::Generic(_, arguments) => arguments.last().cloned().unwrap_or(ImplType::None),
            ImplType::None | ImplType::Any | ImplType::Named(_) => ImplType::None,
        }
    }

    /// Returns the concrete type this descriptor resolves to.
    ///
    /// Wrappers, [`ImplType::Any`] and [`ImplType::None`] carry no class
    /// information of their own.
    pub fn class(&self) -> Option<&TypePath> {
        match self {
            ImplType::Named(path) | ImplType::Generic(path, _) => Some(path),
            _ => None,
        }
    }
}

impl fmt::Display for ImplType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImplType::None => write!(f, "?"),
            ImplType::Any => write!(f, "any"),
            ImplType::Named(path) => write!(f, "{}", path),
            ImplType::Generic(path, arguments) => {
                write!(f, "{}<", path)?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", argument)?;
                }
                write!(f, ">")
            }
            ImplType::Optional(inner) => write!(f, "Option<{}>", inner),
            ImplType::Async(AsyncShape::Single, inner) => write!(f, "Future<{}>", inner),
            ImplType::Async(AsyncShape::Multi, inner) => write!(f, "Stream<{}>", inner),
            ImplType::Async(AsyncShape::NoValue, _) => write!(f, "Future<()>"),
            ImplType::List(inner) => write!(f, "Vec<{}>", inner),
        }
    }
}

// ============================================================================
// Introspection Trait
// ============================================================================

/// Looks up implementation types and their readable properties.
///
/// # Example
///
/// ```ignore
/// struct GeneratedDescriptors;
///
/// impl TypeIntrospector for GeneratedDescriptors {
///     fn property_type(&self, owner: &TypePath, name: &str)
///         -> Result<Option<ImplType>, IntrospectionError> {
///         // Consult descriptors emitted by a derive macro
///         generated::property(owner.as_str(), name)
///     }
///
///     fn lookup_type(&self, path: &str) -> Option<ImplType> {
///         generated::type_by_path(path)
///     }
/// }
/// ```
pub trait TypeIntrospector: Send + Sync {
    /// Returns the declared type of the readable property `name` on `owner`.
    ///
    /// `Ok(None)` means the type has no such readable property. An error
    /// means the descriptor for `owner` cannot be used at all.
    fn property_type(&self, owner: &TypePath, name: &str)
    -> Result<Option<ImplType>, IntrospectionError>;

    /// Looks up a concrete type by its qualified path.
    fn lookup_type(&self, path: &str) -> Option<ImplType>;
}

// ============================================================================
// In-Memory Registration Table
// ============================================================================

/// A property of a registered implementation type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// Property name
    pub name: SmolStr,
    /// Declared type
    pub ty: ImplType,
    /// Whether the property can be read
    pub readable: bool,
}

/// A registered implementation type and its properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDescriptor {
    /// Qualified path
    pub path: TypePath,
    /// Type parameters, if the type is generic
    pub type_parameters: usize,
    /// Properties ordered by name
    pub properties: BTreeMap<SmolStr, PropertyDescriptor>,
}

impl ClassDescriptor {
    /// Creates a descriptor without properties.
    pub fn new(path: impl Into<SmolStr>) -> Self {
        Self {
            path: TypePath::new(path),
            type_parameters: 0,
            properties: BTreeMap::new(),
        }
    }

    /// Adds a readable property.
    pub fn with_property(mut self, name: impl Into<SmolStr>, ty: ImplType) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            PropertyDescriptor {
                name,
                ty,
                readable: true,
            },
        );
        self
    }

    /// Adds a property without a read accessor.
    pub fn with_write_only_property(mut self, name: impl Into<SmolStr>, ty: ImplType) -> Self {
        let name = name.into();
        self.properties.insert(
            name.clone(),
            PropertyDescriptor {
                name,
                ty,
                readable: false,
            },
        );
        self
    }

    /// Declares the number of type parameters.
    pub fn with_type_parameters(mut self, count: usize) -> Self {
        self.type_parameters = count;
        self
    }
}

/// Explicit registration table implementing [`TypeIntrospector`].
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    classes: HashMap<TypePath, ClassDescriptor>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type, replacing any previous registration for its path.
    pub fn register(&mut self, class: ClassDescriptor) {
        self.classes.insert(class.path.clone(), class);
    }

    /// Registers a type and returns the registry.
    pub fn with_class(mut self, class: ClassDescriptor) -> Self {
        self.register(class);
        self
    }

    /// Returns the descriptor registered for `path`.
    pub fn class(&self, path: &str) -> Option<&ClassDescriptor> {
        self.classes.get(&TypePath::new(path))
    }
}

impl TypeIntrospector for TypeRegistry {
    fn property_type(
        &self,
        owner: &TypePath,
        name: &str,
    ) -> Result<Option<ImplType>, IntrospectionError> {
        let class = self.classes.get(owner).ok_or_else(|| {
            IntrospectionError::new(format!("no descriptor registered for '{}'", owner))
        })?;
        Ok(class
            .properties
            .get(name)
            .filter(|property| property.readable)
            .map(|property| property.ty.clone()))
    }

    fn lookup_type(&self, path: &str) -> Option<ImplType> {
        let class = self.class(path)?;
        if class.type_parameters == 0 {
            Some(ImplType::Named(class.path.clone()))
        } else {
            Some(ImplType::Generic(
                class.path.clone(),
                vec![ImplType::None; class.type_parameters],
            ))
        }
    }
}
