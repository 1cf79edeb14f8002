//! Precomputed implementation types for interface and union members.

use super::class_resolver::{ClassNameFn, ClassResolver, ReflectionClassResolver};
use super::config::InspectorConfig;
use super::type_pair::TypePair;
use crate::binding::BindingRegistry;
use crate::error::InspectResult;
use crate::introspection::{ImplType, TypeIntrospector};
use crate::schema::{NamedType, ObjectType, SchemaGraph};
use smol_str::SmolStr;
use std::collections::BTreeMap;
use tracing::debug;

/// A concrete member type and the implementation types chosen for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberTypes {
    /// Object type name.
    pub member: SmolStr,
    /// Implementation types; a single [`ImplType::None`] if none was found.
    pub impl_types: Vec<ImplType>,
}

/// Interface and union members paired with their implementation types.
///
/// Built once before inspection and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct InterfaceUnionLookup {
    mappings: BTreeMap<SmolStr, Vec<MemberTypes>>,
    reflection: Option<ReflectionClassResolver>,
}

impl InterfaceUnionLookup {
    /// Builds the lookup.
    ///
    /// A [`ClassResolver::Reflection`] seeded with module paths observed in
    /// `bindings` is appended after `resolvers`.
    ///
    /// # Errors
    ///
    /// Fails if resolving a binding's type pair fails.
    pub fn build(
        schema: &dyn SchemaGraph,
        bindings: &BindingRegistry,
        introspector: &dyn TypeIntrospector,
        mut resolvers: Vec<ClassResolver>,
        class_name_fn: ClassNameFn,
        config: &InspectorConfig,
    ) -> InspectResult<Self> {
        let reflection = reflection_resolver(schema, bindings, class_name_fn, config)?;
        resolvers.push(ClassResolver::Reflection(reflection.clone()));

        let mut lookup = Self {
            mappings: BTreeMap::new(),
            reflection: Some(reflection),
        };

        for named_type in schema.all_types() {
            match named_type {
                NamedType::Union(union) => {
                    for member in &union.members {
                        match schema.named_type(member) {
                            Some(NamedType::Object(object)) => {
                                lookup.add_type_mapping(
                                    named_type,
                                    object,
                                    &resolvers,
                                    introspector,
                                )
                            }
                            _ => debug!(
                                union = %union.name,
                                member = %member,
                                "Union member is not an object type"
                            ),
                        }
                    }
                }
                NamedType::Object(object) => {
                    for interface in &object.interfaces {
                        if let Some(owner) = schema.named_type(interface) {
                            lookup.add_type_mapping(owner, object, &resolvers, introspector);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(lookup)
    }

    fn add_type_mapping(
        &mut self,
        owner: &NamedType,
        object: &ObjectType,
        resolvers: &[ClassResolver],
        introspector: &dyn TypeIntrospector,
    ) {
        let mut impl_types = resolvers
            .iter()
            .map(|resolver| resolver.resolve(object, owner, introspector))
            .find(|resolved| !resolved.is_empty())
            .unwrap_or_default();
        if impl_types.is_empty() {
            impl_types.push(ImplType::None);
        }

        self.mappings
            .entry(owner.name().into())
            .or_default()
            .push(MemberTypes {
                member: object.name.clone(),
                impl_types,
            });
    }

    /// Member pairs for an interface, or an empty slice if unknown.
    pub fn resolve_interface(&self, name: &str) -> &[MemberTypes] {
        self.resolve(name)
    }

    /// Member pairs for a union, or an empty slice if unknown.
    pub fn resolve_union(&self, name: &str) -> &[MemberTypes] {
        self.resolve(name)
    }

    fn resolve(&self, name: &str) -> &[MemberTypes] {
        self.mappings.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The reflection resolver appended during construction.
    pub fn reflection_resolver(&self) -> Option<&ReflectionClassResolver> {
        self.reflection.as_ref()
    }
}

/// Creates the reflection resolver, learning module paths from bindings
/// whose return type resolves to an interface or union.
fn reflection_resolver(
    schema: &dyn SchemaGraph,
    bindings: &BindingRegistry,
    class_name_fn: ClassNameFn,
    config: &InspectorConfig,
) -> InspectResult<ReflectionClassResolver> {
    let mut resolver = ReflectionClassResolver::new(class_name_fn);

    for (coordinates, binding) in bindings.iter() {
        // Unmapped registration
        let Some(field) = schema.field(&coordinates) else {
            continue;
        };
        let pair = TypePair::resolve(
            &coordinates.type_name,
            field,
            &binding.return_type(),
            schema,
            &config.connection,
        )?;

        let Some(output_name) = pair.output_type.name() else {
            continue;
        };
        if !matches!(
            schema.named_type(output_name),
            Some(NamedType::Union(_) | NamedType::Interface(_))
        ) {
            continue;
        }
        if let Some(path) = pair.impl_type.class() {
            if !config.is_core_type(path) {
                resolver.add_class_prefix(output_name, path.prefix());
            }
        }
    }

    Ok(resolver)
}
