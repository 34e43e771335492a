//! Attribute descriptors.
//!
//! A descriptor is the static metadata for one declared attribute of an entity
//! type. Descriptors are created while an [`EntityType`] is declared and are
//! read-only afterwards.

use crate::{
    hooks::Hooks,
    naming::{output_key, parse_declared},
    registry::EntityType,
    value::ValueType,
};
use once_cell::sync::Lazy;
use std::fmt;

/// Key whose presence marks a raw object as a reference
pub const REFERENCE_KEY: &str = "$ref";

/// How many values an attribute holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Scalar,
    Array,
    Map,
}

/// Late-bound handle to a statically declared entity type.
///
/// Holding the `Lazy` rather than the initialized value lets entity types refer
/// to each other, and to themselves, while they are being declared.
#[derive(Clone, Copy)]
pub struct EntityRef(&'static Lazy<EntityType>);

impl EntityRef {
    pub fn get(self) -> &'static EntityType {
        Lazy::force(self.0)
    }
}

impl From<&'static Lazy<EntityType>> for EntityRef {
    fn from(entity: &'static Lazy<EntityType>) -> Self {
        Self(entity)
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match Lazy::get(self.0) {
            Some(entity) => write!(f, "EntityRef({})", entity.name()),
            None => f.write_str("EntityRef(<uninitialized>)"),
        }
    }
}

/// A named construction entry point bound to one concrete entity type
#[derive(Debug, Clone)]
pub struct Variant {
    entry: String,
    entity: EntityRef,
    discriminator: Option<String>,
    positional: Vec<Option<String>>,
    hooks: Hooks,
}

impl Variant {
    /// Inline variant, selected when no discriminator key is present
    pub fn new(entry: impl Into<String>, entity: impl Into<EntityRef>) -> Self {
        Self {
            entry: entry.into(),
            entity: entity.into(),
            discriminator: None,
            positional: Vec::new(),
            hooks: Hooks::default(),
        }
    }

    /// Reference variant, selected by the presence of `$ref`
    pub fn reference(entry: impl Into<String>, entity: impl Into<EntityRef>) -> Self {
        Self::new(entry, entity).discriminator(REFERENCE_KEY)
    }

    pub fn discriminator(mut self, key: impl Into<String>) -> Self {
        self.discriminator = Some(key.into());
        self
    }

    /// Map positional slot *i* to the named argument `names[i]`; `None` slots
    /// stay positional.
    pub fn positional(mut self, names: &[Option<&str>]) -> Self {
        self.positional = names.iter().map(|n| n.map(str::to_string)).collect();
        self
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn entity(&self) -> &'static EntityType {
        self.entity.get()
    }

    pub fn discriminator_key(&self) -> Option<&str> {
        self.discriminator.as_deref()
    }

    pub fn positional_names(&self) -> &[Option<String>] {
        &self.positional
    }

    /// Object hooks that run only for this entry point, after the
    /// attribute's own
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub(crate) fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }
}

/// Kind-specific part of a descriptor
#[derive(Debug, Clone)]
pub enum AttributeKind {
    /// Scalar leaf. The type is a tag, not enforced on storage.
    Field { value_type: ValueType },
    /// Nested entity, or a collection of them
    Object { variants: Vec<Variant> },
    /// Either a plain value or a nested entity
    FieldOrObject {
        value_type: ValueType,
        entity: EntityRef,
    },
}

/// Static metadata for one declared attribute
#[derive(Debug, Clone)]
pub struct AttributeDescriptor {
    name: String,
    output_key: String,
    required: bool,
    cardinality: Cardinality,
    kind: AttributeKind,
    hooks: Hooks,
}

impl AttributeDescriptor {
    /// Create a descriptor from a declared name such as `summary?`
    pub fn new(declared: &str, cardinality: Cardinality, kind: AttributeKind) -> Self {
        let (name, required) = parse_declared(declared);
        Self {
            name: name.to_string(),
            output_key: output_key(name),
            required,
            cardinality,
            kind,
            hooks: Hooks::default(),
        }
    }

    pub fn field(declared: &str, value_type: ValueType, cardinality: Cardinality) -> Self {
        Self::new(declared, cardinality, AttributeKind::Field { value_type })
    }

    pub fn object(declared: &str, cardinality: Cardinality, variants: Vec<Variant>) -> Self {
        Self::new(declared, cardinality, AttributeKind::Object { variants })
    }

    pub fn field_or_object(
        declared: &str,
        value_type: ValueType,
        entity: impl Into<EntityRef>,
    ) -> Self {
        Self::new(
            declared,
            Cardinality::Scalar,
            AttributeKind::FieldOrObject {
                value_type,
                entity: entity.into(),
            },
        )
    }

    /// Override the required flag derived from the declared name
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Override the derived output key
    pub fn output_key(mut self, key: impl Into<String>) -> Self {
        self.output_key = key.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.output_key
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    /// Declared value type of fields and field-or-object attributes
    pub fn value_type(&self) -> Option<ValueType> {
        match self.kind {
            AttributeKind::Field { value_type }
            | AttributeKind::FieldOrObject { value_type, .. } => Some(value_type),
            AttributeKind::Object { .. } => None,
        }
    }

    /// Entry points of object attributes; empty for everything else
    pub fn variants(&self) -> &[Variant] {
        match &self.kind {
            AttributeKind::Object { variants } => variants,
            _ => &[],
        }
    }

    pub(crate) fn variants_mut(&mut self) -> &mut [Variant] {
        match &mut self.kind {
            AttributeKind::Object { variants } => variants,
            _ => &mut [],
        }
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    pub(crate) fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }
}
