//! Schema mapping inspection.
//!
//! [`SchemaMappingInspector`] walks the schema from its root operation types
//! and checks that every reachable field is backed by a binding or by a
//! same-named readable property of the implementation type, producing a
//! [`SchemaReport`].

pub mod class_resolver;
pub mod config;
pub mod lookup;
pub mod type_pair;
mod walker;

pub use class_resolver::{
    ClassNameFn, ClassResolver, CustomClassResolver, MappingClassResolver,
    ReflectionClassResolver, default_class_name_fn,
};
pub use config::{ConnectionConvention, InspectorConfig};
pub use lookup::{InterfaceUnionLookup, MemberTypes};
pub use type_pair::TypePair;

use crate::binding::BindingRegistry;
use crate::error::InspectResult;
use crate::introspection::TypeIntrospector;
use crate::report::SchemaReport;
use crate::schema::{ObjectType, SchemaGraph};
use smol_str::SmolStr;
use std::sync::{Arc, OnceLock};
use tracing::info;
use walker::Walker;

/// Checks schema fields against bindings and implementation types.
///
/// The walk runs at most once. Its outcome, a report or a fatal error, is
/// cached and handed to every caller, including callers on other threads.
///
/// # Example
///
/// ```
/// use schema_mapping_inspector::binding::{Binding, BindingRegistry};
/// use schema_mapping_inspector::inspector::SchemaMappingInspector;
/// use schema_mapping_inspector::introspection::{ClassDescriptor, ImplType, TypeRegistry};
/// use schema_mapping_inspector::schema::{SchemaBuilder, TypeRef};
///
/// let schema = SchemaBuilder::new()
///     .with_object("Query", |b| b.field("book", TypeRef::named("Book")))
///     .with_object("Book", |b| b.field("title", TypeRef::named("String")))
///     .build();
/// let registry = TypeRegistry::new().with_class(
///     ClassDescriptor::new("app::Book")
///         .with_property("title", ImplType::named("std::string::String")),
/// );
/// let bindings = BindingRegistry::new()
///     .with_binding("Query", "book", Binding::returning(ImplType::named("app::Book")));
///
/// let inspector = SchemaMappingInspector::builder()
///     .build(&schema, &bindings, &registry)
///     .unwrap();
/// let report = inspector.get_or_create_report().unwrap();
/// assert!(report.is_empty());
/// ```
pub struct SchemaMappingInspector<'a, 'i> {
    schema: &'a dyn SchemaGraph,
    bindings: &'a BindingRegistry,
    introspector: &'i dyn TypeIntrospector,
    lookup: InterfaceUnionLookup,
    config: InspectorConfig,
    report: OnceLock<InspectResult<SchemaReport<'a>>>,
}

impl<'a, 'i> SchemaMappingInspector<'a, 'i> {
    /// Returns a builder with default configuration.
    pub fn builder() -> InspectorBuilder {
        InspectorBuilder::new()
    }

    /// Inspects with default configuration and resolvers.
    ///
    /// # Errors
    ///
    /// See [`InspectError`](crate::error::InspectError).
    pub fn inspect(
        schema: &'a dyn SchemaGraph,
        bindings: &'a BindingRegistry,
        introspector: &dyn TypeIntrospector,
    ) -> InspectResult<SchemaReport<'a>> {
        InspectorBuilder::new().inspect(schema, bindings, introspector)
    }

    /// Returns the report, running the inspection on first use.
    ///
    /// Repeat calls return the same report instance.
    ///
    /// # Errors
    ///
    /// Returns the fatal error of the first run on every call.
    pub fn get_or_create_report(&self) -> InspectResult<&SchemaReport<'a>> {
        self.report
            .get_or_init(|| self.run())
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Consumes the inspector and returns the report.
    ///
    /// # Errors
    ///
    /// See [`get_or_create_report`](Self::get_or_create_report).
    pub fn into_report(mut self) -> InspectResult<SchemaReport<'a>> {
        match self.report.take() {
            Some(outcome) => outcome,
            None => self.run(),
        }
    }

    /// The precomputed interface and union members.
    pub fn lookup(&self) -> &InterfaceUnionLookup {
        &self.lookup
    }

    /// The configuration in use.
    pub fn config(&self) -> &InspectorConfig {
        &self.config
    }

    fn run(&self) -> InspectResult<SchemaReport<'a>> {
        let walker = Walker::new(
            self.schema,
            self.bindings,
            self.introspector,
            &self.lookup,
            &self.config,
        );
        let report = walker.run()?.build(self.schema, self.bindings);
        info!(
            unmapped_fields = report.unmapped_fields().len(),
            unmapped_registrations = report.unmapped_registrations().len(),
            unmapped_arguments = report.unmapped_arguments().len(),
            skipped_types = report.skipped_types().len(),
            "Schema inspection complete"
        );
        Ok(report)
    }
}

/// Builder for [`SchemaMappingInspector`].
pub struct InspectorBuilder {
    config: InspectorConfig,
    class_name_fn: ClassNameFn,
    class_resolvers: Vec<ClassResolver>,
}

impl InspectorBuilder {
    /// Creates a builder with default configuration, the default class name
    /// function and no class resolvers.
    pub fn new() -> Self {
        Self {
            config: InspectorConfig::default(),
            class_name_fn: default_class_name_fn(),
            class_resolvers: Vec::new(),
        }
    }

    /// Sets the configuration.
    pub fn with_config(mut self, config: InspectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the function deriving implementation type names from schema
    /// object types for the reflection resolver.
    pub fn with_class_name_fn<F>(mut self, class_name_fn: F) -> Self
    where
        F: Fn(&ObjectType) -> SmolStr + Send + Sync + 'static,
    {
        self.class_name_fn = Arc::new(class_name_fn);
        self
    }

    /// Appends a class resolver. Resolvers are tried in the order added,
    /// before the reflection resolver.
    pub fn with_class_resolver(mut self, resolver: impl Into<ClassResolver>) -> Self {
        self.class_resolvers.push(resolver.into());
        self
    }

    /// Appends a user-supplied class resolver.
    pub fn with_custom_class_resolver(self, resolver: impl CustomClassResolver + 'static) -> Self {
        self.with_class_resolver(ClassResolver::custom(resolver))
    }

    /// Builds the inspector, precomputing interface and union members.
    ///
    /// # Errors
    ///
    /// Fails if a binding's return type cannot be resolved against the schema.
    pub fn build<'a, 'i>(
        self,
        schema: &'a dyn SchemaGraph,
        bindings: &'a BindingRegistry,
        introspector: &'i dyn TypeIntrospector,
    ) -> InspectResult<SchemaMappingInspector<'a, 'i>> {
        let lookup = InterfaceUnionLookup::build(
            schema,
            bindings,
            introspector,
            self.class_resolvers,
            self.class_name_fn,
            &self.config,
        )?;
        Ok(SchemaMappingInspector {
            schema,
            bindings,
            introspector,
            lookup,
            config: self.config,
            report: OnceLock::new(),
        })
    }

    /// Builds the inspector and runs it.
    ///
    /// # Errors
    ///
    /// See [`build`](Self::build) and
    /// [`get_or_create_report`](SchemaMappingInspector::get_or_create_report).
    pub fn inspect<'a>(
        self,
        schema: &'a dyn SchemaGraph,
        bindings: &'a BindingRegistry,
        introspector: &dyn TypeIntrospector,
    ) -> InspectResult<SchemaReport<'a>> {
        self.build(schema, bindings, introspector)?.into_report()
    }
}

impl Default for InspectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
