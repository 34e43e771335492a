//! Descriptor registry.
//!
//! Every entity type is declared once, usually inside a `once_cell` `Lazy`
//! static, through the [`Declaration`] builder. [`Declaration::build`] freezes
//! the descriptor table and indexes every callable name (attributes, entry
//! points and shortcuts). The resulting [`EntityType`] is immutable and shared
//! by all of its instances.
//!
//! ```
//! use oas_spec::{EntityType, ValueType};
//! use once_cell::sync::Lazy;
//!
//! static CONTACT: Lazy<EntityType> = Lazy::new(|| {
//!     EntityType::define("Contact")
//!         .fields(["name?", "url?", "email?"])
//!         .build()
//! });
//!
//! assert_eq!(CONTACT.attributes().len(), 3);
//! ```

use crate::{
    descriptor::{AttributeDescriptor, Cardinality, EntityRef, Variant},
    hooks::{FieldHook, KeyHook, ObjectHook},
    instance::Instance,
    op::Call,
    shortcut::Shortcut,
    value::{Bundle, Input, ValueType},
    SpecResult,
};
use serde_json::Value;
use std::collections::HashMap;

/// What a callable name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Attribute(usize),
    Entry { attribute: usize, variant: usize },
    Shortcut(usize),
}

/// Immutable descriptor table of one entity type
#[derive(Debug)]
pub struct EntityType {
    name: &'static str,
    attributes: Vec<AttributeDescriptor>,
    shortcuts: Vec<(String, Shortcut)>,
    index: HashMap<String, Target>,
}

impl EntityType {
    /// Start declaring an entity type
    pub fn define(name: &'static str) -> Declaration {
        Declaration {
            name,
            attributes: Vec::new(),
            shortcuts: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Descriptors in declaration order
    pub fn attributes(&self) -> &[AttributeDescriptor] {
        &self.attributes
    }

    /// Descriptor by canonical name
    pub fn attribute(&self, name: &str) -> Option<&AttributeDescriptor> {
        self.position(name).map(|index| &self.attributes[index])
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|attr| attr.name() == name)
    }

    pub(crate) fn shortcut_at(&self, index: usize) -> &Shortcut {
        &self.shortcuts[index].1
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<Target> {
        self.index.get(name).copied()
    }

    /// Fresh, empty instance of this type
    pub fn instance(&'static self) -> Instance {
        Instance::new(self)
    }
}

/// Builder for an [`EntityType`].
///
/// Declaration mistakes (hooks on unknown attributes, clashing names, dangling
/// shortcut targets) are programming errors and make [`Declaration::build`]
/// panic, which surfaces them the first time the type is used.
pub struct Declaration {
    name: &'static str,
    attributes: Vec<AttributeDescriptor>,
    shortcuts: Vec<(String, Shortcut)>,
}

impl Declaration {
    /// Append a fully specified descriptor
    pub fn declare(mut self, attribute: AttributeDescriptor) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn field(self, declared: &str, value_type: ValueType) -> Self {
        self.declare(AttributeDescriptor::field(
            declared,
            value_type,
            Cardinality::Scalar,
        ))
    }

    /// Declare several string fields at once
    pub fn fields<'n, I>(mut self, declared: I) -> Self
    where
        I: IntoIterator<Item = &'n str>,
    {
        for name in declared {
            self = self.field(name, ValueType::String);
        }
        self
    }

    pub fn array_field(self, declared: &str, value_type: ValueType) -> Self {
        self.declare(AttributeDescriptor::field(
            declared,
            value_type,
            Cardinality::Array,
        ))
    }

    pub fn map_field(self, declared: &str, value_type: ValueType) -> Self {
        self.declare(AttributeDescriptor::field(
            declared,
            value_type,
            Cardinality::Map,
        ))
    }

    /// Single nested object whose entry point is the attribute name itself
    pub fn object(self, declared: &str, entity: impl Into<EntityRef>) -> Self {
        let (name, _) = crate::naming::parse_declared(declared);
        let variant = Variant::new(name, entity);
        self.object_variants(declared, [variant])
    }

    /// Single nested object with several entry points, e.g. inline or reference
    pub fn object_variants<I>(self, declared: &str, variants: I) -> Self
    where
        I: IntoIterator<Item = Variant>,
    {
        self.declare(AttributeDescriptor::object(
            declared,
            Cardinality::Scalar,
            variants.into_iter().collect(),
        ))
    }

    /// Array of nested objects, appended through the variants' entry points
    pub fn array<I>(self, declared: &str, variants: I) -> Self
    where
        I: IntoIterator<Item = Variant>,
    {
        self.declare(AttributeDescriptor::object(
            declared,
            Cardinality::Array,
            variants.into_iter().collect(),
        ))
    }

    /// Keyed map of nested objects, inserted through the variants' entry points
    pub fn map<I>(self, declared: &str, variants: I) -> Self
    where
        I: IntoIterator<Item = Variant>,
    {
        self.declare(AttributeDescriptor::object(
            declared,
            Cardinality::Map,
            variants.into_iter().collect(),
        ))
    }

    pub fn field_or_object(
        self,
        declared: &str,
        value_type: ValueType,
        entity: impl Into<EntityRef>,
    ) -> Self {
        self.declare(AttributeDescriptor::field_or_object(
            declared, value_type, entity,
        ))
    }

    /// Object hook scoped to one entry point of a variant collection
    pub fn before_entry<F>(mut self, entry: &str, hook: F) -> Self
    where
        F: for<'a> Fn(&mut Instance, Call<'a>) -> SpecResult<Option<Call<'a>>>
            + Send
            + Sync
            + 'static,
    {
        let variant = self
            .attributes
            .iter_mut()
            .flat_map(|attr| attr.variants_mut().iter_mut())
            .find(|variant| variant.entry() == entry);
        match variant {
            Some(variant) => variant
                .hooks_mut()
                .push_object(crate::hooks::object_hook(hook)),
            None => panic!("{}: no entry point named `{}`", self.name, entry),
        }
        self
    }

    pub fn before_field<F>(mut self, target: &str, hook: F) -> Self
    where
        F: Fn(&mut Instance, Input) -> SpecResult<Input> + Send + Sync + 'static,
    {
        let hook: FieldHook = crate::hooks::field_hook(hook);
        self.attribute_mut(target).hooks_mut().push_field(hook);
        self
    }

    /// Attach an already boxed field hook, e.g. [`crate::hooks::prefix_symbol`]
    pub fn before_field_hook(mut self, target: &str, hook: FieldHook) -> Self {
        self.attribute_mut(target).hooks_mut().push_field(hook);
        self
    }

    pub fn before_object<F>(mut self, target: &str, hook: F) -> Self
    where
        F: for<'a> Fn(&mut Instance, Call<'a>) -> SpecResult<Option<Call<'a>>>
            + Send
            + Sync
            + 'static,
    {
        let hook: ObjectHook = crate::hooks::object_hook(hook);
        self.attribute_mut(target).hooks_mut().push_object(hook);
        self
    }

    pub fn before_object_hook(mut self, target: &str, hook: ObjectHook) -> Self {
        self.attribute_mut(target).hooks_mut().push_object(hook);
        self
    }

    pub fn before_key<F>(mut self, target: &str, hook: F) -> Self
    where
        F: Fn(&mut Instance, Option<String>) -> SpecResult<Option<String>> + Send + Sync + 'static,
    {
        let hook: KeyHook = crate::hooks::key_hook(hook);
        self.attribute_mut(target).hooks_mut().push_key(hook);
        self
    }

    pub fn before_key_hook(mut self, target: &str, hook: KeyHook) -> Self {
        self.attribute_mut(target).hooks_mut().push_key(hook);
        self
    }

    /// `shortcut(...)` calls `target(key, ...)`
    pub fn map_shortcuts<'n, I>(mut self, target: &str, shortcuts: I) -> Self
    where
        I: IntoIterator<Item = (&'n str, &'n str)>,
    {
        for (name, key) in shortcuts {
            self.shortcuts.push((
                name.to_string(),
                Shortcut::Map {
                    target: target.to_string(),
                    key: key.to_string(),
                },
            ));
        }
        self
    }

    /// `shortcut(...)` calls `target { block_target(...) }`
    pub fn block_shortcuts<'n, I>(mut self, target: &str, shortcuts: I) -> Self
    where
        I: IntoIterator<Item = (&'n str, &'n str)>,
    {
        for (name, block_target) in shortcuts {
            self.shortcuts.push((
                name.to_string(),
                Shortcut::Block {
                    target: target.to_string(),
                    block_target: block_target.to_string(),
                },
            ));
        }
        self
    }

    /// `shortcut(...)` calls `target(...)` with default named arguments
    pub fn object_shortcuts<'n, I>(mut self, target: &str, shortcuts: I) -> Self
    where
        I: IntoIterator<Item = (&'n str, Bundle)>,
    {
        for (name, defaults) in shortcuts {
            self.shortcuts.push((
                name.to_string(),
                Shortcut::Object {
                    target: target.to_string(),
                    defaults,
                },
            ));
        }
        self
    }

    /// `shortcut()` calls `target(value)`
    pub fn field_shortcuts<'n, I, V>(mut self, target: &str, shortcuts: I) -> Self
    where
        I: IntoIterator<Item = (&'n str, V)>,
        V: Into<Value>,
    {
        for (name, value) in shortcuts {
            self.shortcuts.push((
                name.to_string(),
                Shortcut::Field {
                    target: target.to_string(),
                    value: value.into(),
                },
            ));
        }
        self
    }

    /// `name(...)` calls `target(...)`
    pub fn alias(mut self, name: &str, target: &str) -> Self {
        self.shortcuts.push((
            name.to_string(),
            Shortcut::Alias {
                target: target.to_string(),
            },
        ));
        self
    }

    /// Freeze the declaration.
    ///
    /// # Panics
    ///
    /// Panics when two callables share a name or a shortcut targets a name the
    /// type does not respond to.
    pub fn build(self) -> EntityType {
        let mut index = HashMap::new();

        for (position, attr) in self.attributes.iter().enumerate() {
            if index
                .insert(attr.name().to_string(), Target::Attribute(position))
                .is_some()
            {
                panic!("{}: attribute `{}` declared twice", self.name, attr.name());
            }
        }

        for (position, attr) in self.attributes.iter().enumerate() {
            for (variant, entry) in attr.variants().iter().enumerate() {
                let target = Target::Entry {
                    attribute: position,
                    variant,
                };
                match index.insert(entry.entry().to_string(), target) {
                    None => {}
                    Some(Target::Attribute(owner)) if owner == position => {}
                    Some(_) => panic!(
                        "{}: entry point `{}` clashes with another name",
                        self.name,
                        entry.entry()
                    ),
                }
            }
        }

        for (position, (name, _)) in self.shortcuts.iter().enumerate() {
            if index
                .insert(name.clone(), Target::Shortcut(position))
                .is_some()
            {
                panic!("{}: shortcut `{}` clashes with another name", self.name, name);
            }
        }

        for (name, shortcut) in &self.shortcuts {
            if !index.contains_key(shortcut.target()) {
                panic!(
                    "{}: shortcut `{}` targets unknown `{}`",
                    self.name,
                    name,
                    shortcut.target()
                );
            }
        }

        tracing::trace!(
            entity = self.name,
            attributes = self.attributes.len(),
            shortcuts = self.shortcuts.len(),
            "entity type declared"
        );

        EntityType {
            name: self.name,
            attributes: self.attributes,
            shortcuts: self.shortcuts,
            index,
        }
    }

    fn attribute_mut(&mut self, target: &str) -> &mut AttributeDescriptor {
        let position = self.attributes.iter().position(|attr| {
            attr.name() == target || attr.variants().iter().any(|v| v.entry() == target)
        });
        match position {
            Some(position) => &mut self.attributes[position],
            None => panic!("{}: no attribute named `{}`", self.name, target),
        }
    }
}
