//! Field bindings: the resolvers registered for schema field coordinates.

use crate::introspection::ImplType;
use crate::schema::FieldCoordinates;
use smol_str::SmolStr;
use std::collections::BTreeMap;
use std::fmt;

/// A resolver association for one field coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    /// A resolver that does not describe itself. Always satisfies its field
    /// and is never checked for arguments.
    Opaque,
    /// A resolver that declares its return type and argument names.
    SelfDescribing {
        return_type: ImplType,
        arguments: Vec<SmolStr>,
    },
}

impl Binding {
    /// Creates an opaque binding.
    pub fn opaque() -> Self {
        Binding::Opaque
    }

    /// Creates a self-describing binding without arguments.
    pub fn returning(return_type: ImplType) -> Self {
        Binding::SelfDescribing {
            return_type,
            arguments: Vec::new(),
        }
    }

    /// Adds a declared argument. Has no effect on opaque bindings.
    pub fn with_argument(mut self, name: impl Into<SmolStr>) -> Self {
        if let Binding::SelfDescribing { arguments, .. } = &mut self {
            arguments.push(name.into());
        }
        self
    }

    /// Returns the declared return type, or [`ImplType::None`] when opaque.
    pub fn return_type(&self) -> ImplType {
        match self {
            Binding::Opaque => ImplType::None,
            Binding::SelfDescribing { return_type, .. } => return_type.clone(),
        }
    }

    /// Returns the declared argument names.
    pub fn arguments(&self) -> &[SmolStr] {
        match self {
            Binding::Opaque => &[],
            Binding::SelfDescribing { arguments, .. } => arguments,
        }
    }

    /// Returns true for self-describing bindings.
    pub fn is_self_describing(&self) -> bool {
        matches!(self, Binding::SelfDescribing { .. })
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Opaque => write!(f, "opaque"),
            Binding::SelfDescribing {
                return_type,
                arguments,
            } => {
                write!(f, "({}) -> {}", arguments.join(", "), return_type)
            }
        }
    }
}

/// Bindings keyed by container type name, then by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingRegistry {
    bindings: BTreeMap<SmolStr, BTreeMap<SmolStr, Binding>>,
}

impl BindingRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a binding, replacing any previous binding at the coordinate.
    pub fn register(
        &mut self,
        type_name: impl Into<SmolStr>,
        field_name: impl Into<SmolStr>,
        binding: Binding,
    ) {
        self.bindings
            .entry(type_name.into())
            .or_default()
            .insert(field_name.into(), binding);
    }

    /// Registers a binding and returns the registry.
    pub fn with_binding(
        mut self,
        type_name: impl Into<SmolStr>,
        field_name: impl Into<SmolStr>,
        binding: Binding,
    ) -> Self {
        self.register(type_name, field_name, binding);
        self
    }

    /// Looks up the binding for a type and field name.
    pub fn get(&self, type_name: &str, field_name: &str) -> Option<&Binding> {
        self.bindings.get(type_name)?.get(field_name)
    }

    /// Looks up the binding at `coordinates`.
    pub fn binding(&self, coordinates: &FieldCoordinates) -> Option<&Binding> {
        self.get(&coordinates.type_name, &coordinates.field_name)
    }

    /// Iterates over all bindings in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldCoordinates, &Binding)> + '_ {
        self.bindings.iter().flat_map(|(type_name, fields)| {
            fields.iter().map(move |(field_name, binding)| {
                (FieldCoordinates::new(type_name.clone(), field_name.clone()), binding)
            })
        })
    }

    /// Total number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.values().map(BTreeMap::len).sum()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
