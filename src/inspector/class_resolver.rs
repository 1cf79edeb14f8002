//! Strategies that find implementation types for concrete schema types.
//!
//! A class resolver is the reverse of a runtime type resolver: given an
//! object type that is a member of a union or implements an interface, it
//! returns the implementation type(s) that represent it. Resolvers are tried
//! in order and the first non-empty result wins.

use crate::introspection::{ImplType, TypeIntrospector, TypePath};
use crate::schema::{NamedType, ObjectType};
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Derives the simple implementation type name for a schema object type.
pub type ClassNameFn = Arc<dyn Fn(&ObjectType) -> SmolStr + Send + Sync>;

/// The default [`ClassNameFn`]: the schema type name itself.
pub fn default_class_name_fn() -> ClassNameFn {
    Arc::new(|object: &ObjectType| object.name.clone())
}

/// A user-supplied class resolution strategy.
pub trait CustomClassResolver: Send + Sync {
    /// Returns the implementation types for `object` as a member of, or an
    /// implementation of, `owner`.
    fn resolve_class(&self, object: &ObjectType, owner: &NamedType) -> Vec<ImplType>;
}

impl<F> CustomClassResolver for F
where
    F: Fn(&ObjectType, &NamedType) -> Vec<ImplType> + Send + Sync,
{
    fn resolve_class(&self, object: &ObjectType, owner: &NamedType) -> Vec<ImplType> {
        self(object, owner)
    }
}

/// Explicit schema type name to implementation type table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingClassResolver {
    mappings: BTreeMap<SmolStr, Vec<ImplType>>,
}

impl MappingClassResolver {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a schema type name to an implementation type.
    pub fn add_mapping(&mut self, type_name: impl Into<SmolStr>, impl_type: ImplType) {
        self.mappings.entry(type_name.into()).or_default().push(impl_type);
    }

    /// Maps a schema type name to an implementation type and returns the table.
    pub fn with_mapping(mut self, type_name: impl Into<SmolStr>, impl_type: ImplType) -> Self {
        self.add_mapping(type_name, impl_type);
        self
    }

    /// Builds a table from `implementation path -> schema type name` pairs,
    /// as kept by a runtime type resolver.
    pub fn from_type_name_mappings<I, S>(mappings: I) -> Self
    where
        I: IntoIterator<Item = (TypePath, S)>,
        S: Into<SmolStr>,
    {
        let mut resolver = Self::new();
        for (path, type_name) in mappings {
            resolver.add_mapping(type_name, ImplType::Named(path));
        }
        resolver
    }

    fn resolve_class(&self, object: &ObjectType) -> Vec<ImplType> {
        self.mappings.get(&object.name).cloned().unwrap_or_default()
    }
}

/// Finds implementation types by naming convention.
///
/// The simple name comes from a [`ClassNameFn`]; it is prefixed with the
/// module paths learned, per interface or union, from bindings that return
/// that interface or union. The first prefix that names a known type wins.
#[derive(Clone)]
pub struct ReflectionClassResolver {
    class_name_fn: ClassNameFn,
    prefixes: BTreeMap<SmolStr, Vec<SmolStr>>,
}

impl ReflectionClassResolver {
    /// Creates a resolver without prefixes.
    pub fn new(class_name_fn: ClassNameFn) -> Self {
        Self {
            class_name_fn,
            prefixes: BTreeMap::new(),
        }
    }

    /// Registers a path prefix for an interface or union.
    pub fn add_class_prefix(&mut self, owner: impl Into<SmolStr>, prefix: impl Into<SmolStr>) {
        let prefix = prefix.into();
        let prefixes = self.prefixes.entry(owner.into()).or_default();
        if !prefixes.contains(&prefix) {
            prefixes.push(prefix);
        }
    }

    /// Returns the prefixes learned for `owner`.
    pub fn class_prefixes(&self, owner: &str) -> &[SmolStr] {
        self.prefixes.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    fn resolve_class(
        &self,
        object: &ObjectType,
        owner: &NamedType,
        introspector: &dyn TypeIntrospector,
    ) -> Vec<ImplType> {
        let class_name = (self.class_name_fn)(object);
        self.class_prefixes(owner.name())
            .iter()
            .find_map(|prefix| introspector.lookup_type(&format!("{}{}", prefix, class_name)))
            .into_iter()
            .collect()
    }
}

impl fmt::Debug for ReflectionClassResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionClassResolver")
            .field("prefixes", &self.prefixes)
            .finish_non_exhaustive()
    }
}

/// A class resolution strategy.
pub enum ClassResolver {
    /// Explicit mapping table.
    Mapping(MappingClassResolver),
    /// Naming convention seeded from bindings.
    Reflection(ReflectionClassResolver),
    /// User-supplied strategy.
    Custom(Box<dyn CustomClassResolver>),
}

impl ClassResolver {
    /// Wraps a user-supplied strategy.
    pub fn custom(resolver: impl CustomClassResolver + 'static) -> Self {
        ClassResolver::Custom(Box::new(resolver))
    }

    /// Returns the implementation types for `object` within `owner`.
    pub fn resolve(
        &self,
        object: &ObjectType,
        owner: &NamedType,
        introspector: &dyn TypeIntrospector,
    ) -> Vec<ImplType> {
        match self {
            ClassResolver::Mapping(resolver) => resolver.resolve_class(object),
            ClassResolver::Reflection(resolver) => {
                resolver.resolve_class(object, owner, introspector)
            }
            ClassResolver::Custom(resolver) => resolver.resolve_class(object, owner),
        }
    }
}

impl From<MappingClassResolver> for ClassResolver {
    fn from(resolver: MappingClassResolver) -> Self {
        ClassResolver::Mapping(resolver)
    }
}

impl fmt::Debug for ClassResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassResolver::Mapping(resolver) => f.debug_tuple("Mapping").field(resolver).finish(),
            ClassResolver::Reflection(resolver) => {
                f.debug_tuple("Reflection").field(resolver).finish()
            }
            ClassResolver::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
