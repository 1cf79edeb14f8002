//! The outcome of an inspection.

use crate::binding::{Binding, BindingRegistry};
use crate::diag::{Diag, aggregate_report};
use crate::schema::{FieldCoordinates, SchemaGraph, TypeRef};
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

/// Why a reachable type was not inspected further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The schema type is not an object or interface.
    UnsupportedSchemaType,
    /// No concrete implementation type is known for the schema type.
    NoClassInformation,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedSchemaType => write!(f, "Unsupported schema type"),
            SkipReason::NoClassInformation => write!(f, "No class information"),
        }
    }
}

/// A type that was reached but not inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedType {
    /// The schema type, with field wrappers removed.
    pub output_type: TypeRef,
    /// The field through which the type was reached.
    pub coordinates: FieldCoordinates,
    /// Why the type was not inspected.
    pub reason: SkipReason,
}

impl fmt::Display for SkippedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.output_type)
    }
}

/// Arguments declared by a binding that the schema field does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmappedArguments<'a> {
    /// The field the binding is registered for.
    pub coordinates: FieldCoordinates,
    /// The binding declaring the arguments.
    pub binding: &'a Binding,
    /// Undeclared argument names, in binding order.
    pub arguments: Vec<SmolStr>,
}

/// Accumulates findings during a walk.
#[derive(Debug, Default)]
pub(crate) struct ReportBuilder<'a> {
    unmapped_fields: Vec<FieldCoordinates>,
    unmapped_registrations: BTreeMap<FieldCoordinates, &'a Binding>,
    unmapped_arguments: Vec<UnmappedArguments<'a>>,
    skipped_types: Vec<SkippedType>,
}

impl<'a> ReportBuilder<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn unmapped_field(&mut self, coordinates: FieldCoordinates) {
        self.unmapped_fields.push(coordinates);
    }

    pub(crate) fn unmapped_registration(
        &mut self,
        coordinates: FieldCoordinates,
        binding: &'a Binding,
    ) {
        self.unmapped_registrations.insert(coordinates, binding);
    }

    pub(crate) fn unmapped_arguments(
        &mut self,
        coordinates: FieldCoordinates,
        binding: &'a Binding,
        arguments: Vec<SmolStr>,
    ) {
        self.unmapped_arguments.push(UnmappedArguments {
            coordinates,
            binding,
            arguments,
        });
    }

    pub(crate) fn skipped_type(&mut self, skipped: SkippedType) {
        self.skipped_types.push(skipped);
    }

    pub(crate) fn build(
        self,
        schema: &'a dyn SchemaGraph,
        bindings: &'a BindingRegistry,
    ) -> SchemaReport<'a> {
        SchemaReport {
            unmapped_fields: self.unmapped_fields,
            unmapped_registrations: self.unmapped_registrations,
            unmapped_arguments: self.unmapped_arguments,
            skipped_types: self.skipped_types,
            schema,
            bindings,
        }
    }
}

/// Immutable inspection report.
///
/// `Display` renders a deterministic summary with unmapped fields grouped
/// by container type in the order they were found.
#[derive(Clone)]
pub struct SchemaReport<'a> {
    unmapped_fields: Vec<FieldCoordinates>,
    unmapped_registrations: BTreeMap<FieldCoordinates, &'a Binding>,
    unmapped_arguments: Vec<UnmappedArguments<'a>>,
    skipped_types: Vec<SkippedType>,
    schema: &'a dyn SchemaGraph,
    bindings: &'a BindingRegistry,
}

impl<'a> SchemaReport<'a> {
    /// Schema fields with neither a binding nor a matching property.
    pub fn unmapped_fields(&self) -> &[FieldCoordinates] {
        &self.unmapped_fields
    }

    /// Bindings registered for coordinates that are not schema fields.
    pub fn unmapped_registrations(&self) -> &BTreeMap<FieldCoordinates, &'a Binding> {
        &self.unmapped_registrations
    }

    /// Bindings declaring arguments their schema field does not have.
    pub fn unmapped_arguments(&self) -> &[UnmappedArguments<'a>] {
        &self.unmapped_arguments
    }

    /// The unmapped argument names of the binding at `coordinates`.
    pub fn unmapped_arguments_for(&self, coordinates: &FieldCoordinates) -> Option<&[SmolStr]> {
        self.unmapped_arguments
            .iter()
            .find(|entry| entry.coordinates == *coordinates)
            .map(|entry| entry.arguments.as_slice())
    }

    /// Types reached but not inspected.
    pub fn skipped_types(&self) -> &[SkippedType] {
        &self.skipped_types
    }

    /// The inspected schema.
    pub fn schema(&self) -> &'a dyn SchemaGraph {
        self.schema
    }

    /// The binding registered at `coordinates`, if any.
    pub fn binding(&self, coordinates: &FieldCoordinates) -> Option<&'a Binding> {
        self.bindings.binding(coordinates)
    }

    /// Returns true if nothing was found.
    pub fn is_empty(&self) -> bool {
        self.unmapped_fields.is_empty()
            && self.unmapped_registrations.is_empty()
            && self.unmapped_arguments.is_empty()
            && self.skipped_types.is_empty()
    }

    /// Converts every finding to a diagnostic.
    pub fn diagnostics(&self) -> Vec<Diag> {
        let mut diagnostics = Vec::new();

        for coordinates in &self.unmapped_fields {
            diagnostics.push(
                Diag::error("No binding and no matching property")
                    .with_coordinates(coordinates.clone())
                    .with_code("schema_inspection::unmapped_field")
                    .with_help(format!(
                        "register a binding for '{}' or add a readable property '{}' to the \
                         implementation type",
                        coordinates, coordinates.field_name
                    )),
            );
        }

        for (coordinates, binding) in &self.unmapped_registrations {
            diagnostics.push(
                Diag::error(format!("Binding '{}' does not match a schema field", binding))
                    .with_coordinates(coordinates.clone())
                    .with_code("schema_inspection::unmapped_registration")
                    .with_help("remove the binding or add the field to the schema"),
            );
        }

        for entry in &self.unmapped_arguments {
            let mut diag = Diag::error(format!(
                "Binding declares {} argument(s) the schema field does not have",
                entry.arguments.len()
            ))
            .with_coordinates(entry.coordinates.clone())
            .with_code("schema_inspection::unmapped_argument");
            for argument in &entry.arguments {
                diag = diag
                    .with_note(format!("argument '{}' is not declared on the field", argument));
            }
            diagnostics.push(diag);
        }

        for skipped in &self.skipped_types {
            let diag = Diag::warning(format!(
                "Skipped type '{}': {}",
                skipped.output_type, skipped.reason
            ))
            .with_coordinates(skipped.coordinates.clone())
            .with_code("schema_inspection::skipped_type");
            diagnostics.push(match skipped.reason {
                SkipReason::NoClassInformation => diag.with_help(
                    "bind the field to a concrete implementation type or register a class resolver",
                ),
                SkipReason::UnsupportedSchemaType => diag,
            });
        }

        diagnostics
    }

    /// Returns the report if it has no findings, or a `miette` report
    /// listing every finding.
    pub fn into_result(self) -> miette::Result<Self> {
        if self.is_empty() {
            return Ok(self);
        }
        let diagnostics = self.diagnostics();
        Err(aggregate_report(
            format!("Schema inspection found {} problem(s)", diagnostics.len()),
            &diagnostics,
        ))
    }
}

impl PartialEq for SchemaReport<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.unmapped_fields == other.unmapped_fields
            && self.unmapped_registrations == other.unmapped_registrations
            && self.unmapped_arguments == other.unmapped_arguments
            && self.skipped_types == other.skipped_types
    }
}

impl fmt::Debug for SchemaReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaReport")
            .field("unmapped_fields", &self.unmapped_fields)
            .field("unmapped_registrations", &self.unmapped_registrations)
            .field("unmapped_arguments", &self.unmapped_arguments)
            .field("skipped_types", &self.skipped_types)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for SchemaReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GraphQL schema inspection:")?;

        let mut grouped: Vec<(&str, Vec<&str>)> = Vec::new();
        for coordinates in &self.unmapped_fields {
            let type_name = coordinates.type_name.as_str();
            let field_name = coordinates.field_name.as_str();
            match grouped.iter_mut().find(|(name, _)| *name == type_name) {
                Some((_, fields)) => fields.push(field_name),
                None => grouped.push((type_name, vec![field_name])),
            }
        }
        write!(f, "\tUnmapped fields: {{")?;
        for (i, (type_name, fields)) in grouped.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}=[{}]", type_name, fields.join(", "))?;
        }
        writeln!(f, "}}")?;

        write!(f, "\tUnmapped registrations: {{")?;
        for (i, (coordinates, binding)) in self.unmapped_registrations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", coordinates, binding)?;
        }
        writeln!(f, "}}")?;

        write!(f, "\tUnmapped arguments: {{")?;
        for (i, entry) in self.unmapped_arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}=[{}]", entry.coordinates, entry.arguments.join(", "))?;
        }
        writeln!(f, "}}")?;

        write!(f, "\tSkipped types: [")?;
        for (i, skipped) in self.skipped_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", skipped)?;
        }
        write!(f, "]")
    }
}
