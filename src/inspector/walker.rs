//! Depth-first walk over the schema, matching fields to bindings and
//! implementation properties.

use super::config::InspectorConfig;
use super::lookup::{InterfaceUnionLookup, MemberTypes};
use super::type_pair::TypePair;
use crate::binding::{Binding, BindingRegistry};
use crate::error::{InspectError, InspectResult};
use crate::introspection::{ImplType, TypeIntrospector};
use crate::report::{ReportBuilder, SkipReason, SkippedType};
use crate::schema::{FieldCoordinates, FieldDef, NamedType, SchemaGraph, TypeRef};
use smol_str::SmolStr;
use std::collections::HashSet;
use tracing::debug;

/// State of a single inspection pass.
///
/// Every named schema type is walked at most once.
pub(crate) struct Walker<'a, 'l> {
    schema: &'a dyn SchemaGraph,
    bindings: &'a BindingRegistry,
    introspector: &'l dyn TypeIntrospector,
    lookup: &'l InterfaceUnionLookup,
    config: &'l InspectorConfig,
    inspected_types: HashSet<SmolStr>,
    report: ReportBuilder<'a>,
}

impl<'a, 'l> Walker<'a, 'l> {
    pub(crate) fn new(
        schema: &'a dyn SchemaGraph,
        bindings: &'a BindingRegistry,
        introspector: &'l dyn TypeIntrospector,
        lookup: &'l InterfaceUnionLookup,
        config: &'l InspectorConfig,
    ) -> Self {
        Self {
            schema,
            bindings,
            introspector,
            lookup,
            config,
            inspected_types: HashSet::new(),
            report: ReportBuilder::new(),
        }
    }

    /// Walks the root types, then checks every binding against the schema.
    #[tracing::instrument(level = "debug", skip_all)]
    pub(crate) fn run(mut self) -> InspectResult<ReportBuilder<'a>> {
        self.check_schema_fields()?;
        self.check_binding_registrations();
        Ok(self.report)
    }

    fn check_schema_fields(&mut self) -> InspectResult<()> {
        let schema = self.schema;

        let query = schema.query_type_name();
        match schema.named_type(query) {
            Some(root @ NamedType::Object(_)) => self.check_root(root)?,
            _ => return Err(InspectError::MissingQueryType { name: query.into() }),
        }

        let optional_roots = [schema.mutation_type_name(), schema.subscription_type_name()];
        for name in optional_roots.into_iter().flatten() {
            if let Some(root) = schema.named_type(name) {
                self.check_root(root)?;
            }
        }
        Ok(())
    }

    fn check_root(&mut self, root: &'a NamedType) -> InspectResult<()> {
        self.inspected_types.insert(root.name().into());
        self.check_fields_container(root, None)
    }

    fn check_fields_container(
        &mut self,
        container: &'a NamedType,
        impl_type: Option<&ImplType>,
    ) -> InspectResult<()> {
        let bindings = self.bindings;
        let type_name = container.name();
        let Some(fields) = container.fields() else {
            return Ok(());
        };

        for field in fields {
            match bindings.get(type_name, &field.name) {
                Some(binding @ Binding::SelfDescribing { return_type, .. }) => {
                    self.check_field_arguments(type_name, field, binding);
                    self.check_field(type_name, field, return_type)?;
                }
                Some(Binding::Opaque) => self.check_field(type_name, field, &ImplType::None)?,
                None => match self.property_type(impl_type, &field.name)? {
                    Some(property_type) => self.check_field(type_name, field, &property_type)?,
                    None => self
                        .report
                        .unmapped_field(FieldCoordinates::new(type_name, field.name.clone())),
                },
            }
        }
        Ok(())
    }

    fn check_field_arguments(&mut self, type_name: &str, field: &FieldDef, binding: &'a Binding) {
        let unmapped = binding
            .arguments()
            .iter()
            .filter(|name| field.argument(name).is_none())
            .cloned()
            .collect::<Vec<_>>();
        if !unmapped.is_empty() {
            self.report.unmapped_arguments(
                FieldCoordinates::new(type_name, field.name.clone()),
                binding,
                unmapped,
            );
        }
    }

    /// Looks up a readable property named `field_name` on the container's
    /// implementation type.
    fn property_type(
        &self,
        impl_type: Option<&ImplType>,
        field_name: &SmolStr,
    ) -> InspectResult<Option<ImplType>> {
        let Some(path) = impl_type.and_then(ImplType::class) else {
            return Ok(None);
        };
        self.introspector
            .property_type(path, field_name)
            .map_err(|source| InspectError::Introspection {
                type_path: path.clone(),
                field: field_name.clone(),
                source,
            })
    }

    fn check_field(
        &mut self,
        parent: &str,
        field: &FieldDef,
        impl_type: &ImplType,
    ) -> InspectResult<()> {
        let schema = self.schema;
        let lookup = self.lookup;

        let pair = TypePair::resolve(parent, field, impl_type, schema, &self.config.connection)?;
        if self.add_and_check_if_already_inspected(&pair.output_type) {
            return Ok(());
        }

        let output_type = pair.output_type.name().and_then(|n| schema.named_type(n));
        let members: &[MemberTypes] = match output_type {
            Some(NamedType::Interface(interface)) => lookup.resolve_interface(&interface.name),
            Some(NamedType::Union(union)) => lookup.resolve_union(&union.name),
            _ => &[],
        };

        let coordinates = FieldCoordinates::new(parent, field.name.clone());
        if members.is_empty() {
            return self.check_type_pair(&pair, &coordinates);
        }
        for member in members {
            if self.inspected_types.contains(&member.member) {
                continue;
            }
            // Only a member walked with a concrete class counts as inspected;
            // a direct reference may still supply one later.
            if member.impl_types.iter().any(|t| t.class().is_some()) {
                self.inspected_types.insert(member.member.clone());
            }
            let member_type = TypeRef::named(member.member.clone());
            for member_impl in &member.impl_types {
                let member_pair = TypePair::new(member_type.clone(), member_impl.clone());
                self.check_type_pair(&member_pair, &coordinates)?;
            }
        }
        Ok(())
    }

    fn check_type_pair(
        &mut self,
        pair: &TypePair,
        coordinates: &FieldCoordinates,
    ) -> InspectResult<()> {
        let schema = self.schema;
        let named = match &pair.output_type {
            TypeRef::Named(name) => Some(schema.named_type(name).ok_or_else(|| {
                InspectError::UndefinedType {
                    name: name.clone(),
                    coordinates: coordinates.clone(),
                }
            })?),
            _ => None,
        };

        let container = match named {
            Some(named) if named.is_fields_container() => named,
            Some(named) if named.is_scalar_or_enum() => return Ok(()),
            _ => {
                self.add_skipped_type(pair, coordinates, SkipReason::UnsupportedSchemaType);
                return Ok(());
            }
        };

        if pair.impl_type.class().is_none() {
            self.add_skipped_type(pair, coordinates, SkipReason::NoClassInformation);
            return Ok(());
        }

        self.check_fields_container(container, Some(&pair.impl_type))
    }

    /// Marks a named output type visited; returns true if it already was.
    fn add_and_check_if_already_inspected(&mut self, output_type: &TypeRef) -> bool {
        match output_type {
            TypeRef::Named(name) => !self.inspected_types.insert(name.clone()),
            _ => false,
        }
    }

    fn add_skipped_type(
        &mut self,
        pair: &TypePair,
        coordinates: &FieldCoordinates,
        reason: SkipReason,
    ) {
        debug!(
            output_type = %pair.output_type,
            impl_type = %pair.impl_type,
            coordinates = %coordinates,
            %reason,
            "Skipping type"
        );
        self.report.skipped_type(SkippedType {
            output_type: pair.output_type.clone(),
            coordinates: coordinates.clone(),
            reason,
        });
    }

    fn check_binding_registrations(&mut self) {
        let schema = self.schema;
        for (coordinates, binding) in self.bindings.iter() {
            if schema.field(&coordinates).is_none() {
                self.report.unmapped_registration(coordinates, binding);
            }
        }
    }
}
