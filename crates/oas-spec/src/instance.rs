//! Entity instances and the generic setter dispatch.
//!
//! An [`Instance`] is a bag of slots, one per declared attribute. It is only
//! mutated through [`Instance::call`], which resolves a name against the
//! entity's descriptor table and routes the call to the field setter, the
//! nested-object setter, the array or map entry points, or a shortcut. Hooks
//! run inside those setters just before anything is stored.

use crate::{
    descriptor::{AttributeDescriptor, AttributeKind, Cardinality, Variant},
    error::{SpecError, SpecResult},
    op::{Call, Op},
    registry::{EntityType, Target},
    shortcut::{map_positional, Shortcut},
    value::{Bundle, Input},
};
use serde_json::{Map, Value};
use std::fmt;

/// Ordered string-keyed entries; inserting an existing key replaces the value
/// in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyed<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for Keyed<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Keyed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value`, returning the value it replaced
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => Some(std::mem::replace(&mut entry.1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Stored value of one attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Value(Value),
    Values(Vec<Value>),
    Entries(Map<String, Value>),
    Object(Box<Instance>),
    Objects(Vec<Instance>),
    Children(Keyed<Instance>),
}

/// A mutable entity under construction, or a read document node
#[derive(Clone)]
pub struct Instance {
    entity: &'static EntityType,
    slots: Vec<Option<Slot>>,
}

impl Instance {
    /// Create an empty instance
    pub fn new(entity: &'static EntityType) -> Self {
        Self {
            entity,
            slots: vec![None; entity.attributes().len()],
        }
    }

    /// Create an instance and run `call` against it: the named bundle first,
    /// in bundle order, then the nested block.
    pub fn construct(entity: &'static EntityType, call: Call<'_>) -> SpecResult<Self> {
        tracing::trace!(entity = entity.name(), "constructing instance");
        let Call { args, named, block } = call;
        if !args.is_empty() {
            return Err(SpecError::invalid_argument(
                entity.name(),
                entity.name(),
                format!("{} unexpected positional argument(s)", args.len()),
            ));
        }

        let mut instance = Self::new(entity);
        instance.apply_bundle(named)?;
        if let Some(block) = block {
            block(&mut instance)?;
        }
        Ok(instance)
    }

    pub fn entity(&self) -> &'static EntityType {
        self.entity
    }

    /// True when no attribute is set
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    // ---- reading -------------------------------------------------------

    pub fn get(&self, name: &str) -> Option<&Slot> {
        let index = self.entity.position(name)?;
        self.slots[index].as_ref()
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Scalar value of a field
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.get(name)? {
            Slot::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(Value::as_str)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(Value::as_bool)
    }

    /// Values of an array field
    pub fn values(&self, name: &str) -> &[Value] {
        match self.get(name) {
            Some(Slot::Values(values)) => values,
            _ => &[],
        }
    }

    /// Nested object of a scalar object or field-or-object attribute
    pub fn child(&self, name: &str) -> Option<&Instance> {
        match self.get(name)? {
            Slot::Object(child) => Some(child),
            _ => None,
        }
    }

    /// Elements of an array-of-objects attribute
    pub fn children(&self, name: &str) -> &[Instance] {
        match self.get(name) {
            Some(Slot::Objects(children)) => children,
            _ => &[],
        }
    }

    /// Entries of a map-of-objects attribute
    pub fn entries(&self, name: &str) -> Option<&Keyed<Instance>> {
        match self.get(name)? {
            Slot::Children(entries) => Some(entries),
            _ => None,
        }
    }

    /// Set slots paired with their descriptors, in declaration order
    pub fn slots(&self) -> impl Iterator<Item = (&'static AttributeDescriptor, &Slot)> {
        let entity: &'static EntityType = self.entity;
        entity
            .attributes()
            .iter()
            .zip(&self.slots)
            .filter_map(|(attr, slot)| slot.as_ref().map(|slot| (attr, slot)))
    }

    pub(crate) fn put(&mut self, index: usize, slot: Slot) {
        self.slots[index] = Some(slot);
    }

    // ---- building ------------------------------------------------------

    /// Dispatch a call by name.
    ///
    /// Entry points win over attributes of the same name; shortcuts are
    /// expanded and re-dispatched. A call without arguments or block is a
    /// getter: it changes nothing and runs no hooks, entry points included.
    pub fn call(&mut self, name: &str, call: Call<'_>) -> SpecResult<()> {
        let entity = self.entity;
        let target = entity
            .resolve(name)
            .ok_or_else(|| SpecError::no_such_attribute(entity.name(), name))?;
        tracing::trace!(entity = entity.name(), name, ?call, "dispatch");

        match target {
            Target::Shortcut(index) => self.invoke_shortcut(name, entity.shortcut_at(index), call),
            Target::Attribute(index) => {
                let attr = &entity.attributes()[index];
                match attr.kind() {
                    AttributeKind::Field { .. } => self.set_field(index, call),
                    AttributeKind::FieldOrObject { .. } => self.set_field_or_object(index, call),
                    AttributeKind::Object { variants } => match attr.cardinality() {
                        Cardinality::Scalar if !variants.is_empty() => {
                            self.set_object(index, 0, call)
                        }
                        _ => {
                            let entries: Vec<_> = variants.iter().map(|v| v.entry()).collect();
                            Err(SpecError::invalid_argument(
                                entity.name(),
                                name,
                                format!("use one of its entry points: {}", entries.join(", ")),
                            ))
                        }
                    },
                }
            }
            Target::Entry { attribute, variant } => {
                match entity.attributes()[attribute].cardinality() {
                    Cardinality::Scalar => self.set_object(attribute, variant, call),
                    Cardinality::Array => self.add_item(attribute, variant, call),
                    Cardinality::Map => self.insert_item(attribute, variant, call),
                }
            }
        }
    }

    /// Apply one data operation
    pub fn apply(&mut self, op: Op) -> SpecResult<()> {
        let (name, call) = op.into_call();
        self.call(&name, call)
    }

    /// Apply operations in order, stopping at the first failure
    pub fn apply_all<I>(&mut self, ops: I) -> SpecResult<()>
    where
        I: IntoIterator<Item = Op>,
    {
        for op in ops {
            self.apply(op)?;
        }
        Ok(())
    }

    /// Apply a named bundle: each entry is dispatched with its value as the
    /// single positional argument. Null entries are skipped.
    pub fn apply_bundle(&mut self, bundle: Bundle) -> SpecResult<()> {
        for (name, value) in bundle {
            if value.is_null() {
                continue;
            }
            self.call(&name, Call::new().arg(value))?;
        }
        Ok(())
    }

    /// `name(value)`
    pub fn set(&mut self, name: &str, value: impl Into<Input>) -> SpecResult<()> {
        self.call(name, Call::new().arg(value))
    }

    /// `name(values...)`
    pub fn append<I, V>(&mut self, name: &str, values: I) -> SpecResult<()>
    where
        I: IntoIterator<Item = V>,
        V: Into<Input>,
    {
        self.call(name, Call::new().args(values))
    }

    /// `name { block }`
    pub fn object<F>(&mut self, name: &str, f: F) -> SpecResult<()>
    where
        F: FnOnce(&mut Instance) -> SpecResult<()>,
    {
        self.call(name, Call::new().block(f))
    }

    /// `name(bundle) { block }`
    pub fn object_with<F>(&mut self, name: &str, named: Bundle, f: F) -> SpecResult<()>
    where
        F: FnOnce(&mut Instance) -> SpecResult<()>,
    {
        self.call(name, Call::new().named(named).block(f))
    }

    /// `entry(bundle) { block }` on an array attribute
    pub fn add<F>(&mut self, entry: &str, named: Bundle, f: F) -> SpecResult<()>
    where
        F: FnOnce(&mut Instance) -> SpecResult<()>,
    {
        self.call(entry, Call::new().named(named).block(f))
    }

    /// `entry(key, bundle) { block }` on a map attribute
    pub fn insert<F>(
        &mut self,
        entry: &str,
        key: impl Into<Input>,
        named: Bundle,
        f: F,
    ) -> SpecResult<()>
    where
        F: FnOnce(&mut Instance) -> SpecResult<()>,
    {
        self.call(entry, Call::new().arg(key).named(named).block(f))
    }

    fn invoke_shortcut(
        &mut self,
        name: &str,
        shortcut: &'static Shortcut,
        call: Call<'_>,
    ) -> SpecResult<()> {
        let call = shortcut
            .expand(call)
            .map_err(|message| SpecError::invalid_argument(self.entity.name(), name, message))?;
        self.call(shortcut.target(), call)
    }

    fn attribute(&self, index: usize) -> &'static AttributeDescriptor {
        let entity: &'static EntityType = self.entity;
        &entity.attributes()[index]
    }

    fn invalid(&self, name: &str, message: impl ToString) -> SpecError {
        SpecError::invalid_argument(self.entity.name(), name, message)
    }

    /// Run the field hooks and turn the result into a storable value
    fn field_value(&mut self, attr: &'static AttributeDescriptor, input: Input) -> SpecResult<Value> {
        let input = attr.hooks().run_field(self, input)?;
        input.into_value().ok_or_else(|| {
            self.invalid(
                attr.name(),
                "array-of arguments are only accepted by object attributes",
            )
        })
    }

    fn set_field(&mut self, index: usize, mut call: Call<'_>) -> SpecResult<()> {
        let attr = self.attribute(index);
        if call.is_getter() {
            return Ok(());
        }
        if call.block.is_some() {
            return Err(self.invalid(attr.name(), "fields do not take a block"));
        }

        match attr.cardinality() {
            Cardinality::Scalar => {
                let input = match (call.args.len(), call.named.is_empty()) {
                    (1, true) => call.args.remove(0),
                    (0, false) => self.named_literal(attr, call.named)?,
                    _ => return Err(self.invalid(attr.name(), "expects a single value")),
                };
                let value = self.field_value(attr, input)?;
                self.slots[index] = if value.is_null() {
                    None
                } else {
                    Some(Slot::Value(value))
                };
            }
            Cardinality::Array => {
                if call.named.is_empty() && call.args.len() == 1 && call.args[0].is_null() {
                    return Ok(());
                }
                let mut inputs = Vec::new();
                for arg in call.args {
                    match arg {
                        Input::Literal(Value::Array(items)) => {
                            inputs.extend(items.into_iter().map(Input::Literal))
                        }
                        other => inputs.push(other),
                    }
                }
                if !call.named.is_empty() {
                    inputs.push(self.named_literal(attr, call.named)?);
                }

                let mut added = Vec::with_capacity(inputs.len());
                for input in inputs {
                    added.push(self.field_value(attr, input)?);
                }
                match &mut self.slots[index] {
                    Some(Slot::Values(values)) => values.extend(added),
                    slot if !added.is_empty() => *slot = Some(Slot::Values(added)),
                    _ => {}
                }
            }
            Cardinality::Map => {
                let mut pairs = Vec::new();
                match call.args.len() {
                    0 => {}
                    2 => {
                        let value = call.args.pop();
                        let key = call.args.pop().and_then(Input::into_key);
                        match (key, value) {
                            (Some(key), Some(value)) => pairs.push((key, value)),
                            _ => return Err(self.invalid(attr.name(), "map keys must be text")),
                        }
                    }
                    _ => return Err(self.invalid(attr.name(), "expects a key and a value")),
                }
                pairs.extend(call.named);

                let mut entries = match self.slots[index].take() {
                    Some(Slot::Entries(entries)) => entries,
                    _ => Map::new(),
                };
                for (key, input) in pairs {
                    let value = self.field_value(attr, input)?;
                    if value.is_null() {
                        entries.remove(&key);
                    } else {
                        entries.insert(key, value);
                    }
                }
                if !entries.is_empty() {
                    self.slots[index] = Some(Slot::Entries(entries));
                }
            }
        }
        Ok(())
    }

    /// Named arguments given to a field become one object literal
    fn named_literal(&self, attr: &AttributeDescriptor, named: Bundle) -> SpecResult<Input> {
        named
            .into_value()
            .map(Input::Literal)
            .ok_or_else(|| self.invalid(attr.name(), "named values must be plain values"))
    }

    fn set_field_or_object(&mut self, index: usize, mut call: Call<'_>) -> SpecResult<()> {
        let attr = self.attribute(index);
        if call.is_getter() {
            return Ok(());
        }

        let plain = call.block.is_none()
            && call.named.is_empty()
            && call.args.len() == 1
            && matches!(&call.args[0], Input::Literal(value) if !value.is_object());
        if plain {
            let value = self.field_value(attr, call.args.remove(0))?;
            self.slots[index] = if value.is_null() {
                None
            } else {
                Some(Slot::Value(value))
            };
            return Ok(());
        }

        let AttributeKind::FieldOrObject { entity, .. } = attr.kind() else {
            return Err(self.invalid(attr.name(), "not a field-or-object attribute"));
        };
        if let Some(child) = self.build_child(attr, entity.get(), None, call)? {
            self.slots[index] = Some(Slot::Object(Box::new(child)));
        }
        Ok(())
    }

    fn set_object(&mut self, index: usize, variant: usize, call: Call<'_>) -> SpecResult<()> {
        let attr = self.attribute(index);
        if call.is_getter() {
            return Ok(());
        }
        let variant = &attr.variants()[variant];
        if let Some(child) = self.build_child(attr, variant.entity(), Some(variant), call)? {
            self.slots[index] = Some(Slot::Object(Box::new(child)));
        }
        Ok(())
    }

    fn add_item(&mut self, index: usize, variant: usize, call: Call<'_>) -> SpecResult<()> {
        let attr = self.attribute(index);
        if call.is_getter() {
            return Ok(());
        }
        let variant = &attr.variants()[variant];
        let Some(child) = self.build_child(attr, variant.entity(), Some(variant), call)? else {
            return Ok(());
        };

        let mut children = match self.slots[index].take() {
            Some(Slot::Objects(children)) => children,
            _ => Vec::new(),
        };
        children.push(child);
        self.slots[index] = Some(Slot::Objects(children));
        Ok(())
    }

    fn insert_item(&mut self, index: usize, variant: usize, mut call: Call<'_>) -> SpecResult<()> {
        let attr = self.attribute(index);
        if call.is_getter() {
            return Ok(());
        }
        let variant = &attr.variants()[variant];

        let key = if call.args.is_empty() {
            None
        } else {
            let key = call.args.remove(0).into_key().ok_or_else(|| {
                self.invalid(variant.entry(), "map keys must be text, numbers or symbols")
            })?;
            Some(key)
        };
        let key = attr
            .hooks()
            .run_key(self, key)?
            .ok_or_else(|| SpecError::MissingKey {
                entity: self.entity.name(),
                attribute: attr.name().to_string(),
            })?;

        let Some(child) = self.build_child(attr, variant.entity(), Some(variant), call)? else {
            return Ok(());
        };

        let mut children = match self.slots[index].take() {
            Some(Slot::Children(children)) => children,
            _ => Keyed::new(),
        };
        if children.insert(key.as_str(), child).is_some() {
            tracing::debug!(
                entity = self.entity.name(),
                attribute = attr.name(),
                key = key.as_str(),
                "replaced existing map entry"
            );
        }
        self.slots[index] = Some(Slot::Children(children));
        Ok(())
    }

    /// Positional mapping, object hooks, then construction of the child
    fn build_child(
        &mut self,
        attr: &'static AttributeDescriptor,
        entity: &'static EntityType,
        variant: Option<&'static Variant>,
        mut call: Call<'_>,
    ) -> SpecResult<Option<Instance>> {
        map_positional(variant.map(Variant::positional_names).unwrap_or(&[]), &mut call);

        // A lone object literal doubles as the named bundle
        if call.named.is_empty() && call.args.len() == 1 {
            if let Some(Input::Literal(Value::Object(map))) = call.args.first() {
                call.named = Bundle::from_object(map.clone());
                call.args.clear();
            }
        }

        let Some(call) = attr.hooks().run_object(self, call)? else {
            return Ok(None);
        };
        let call = match variant {
            Some(variant) => match variant.hooks().run_object(self, call)? {
                Some(call) => call,
                None => return Ok(None),
            },
            None => call,
        };
        if !call.args.is_empty() {
            return Err(self.invalid(
                attr.name(),
                format!("{} unexpected positional argument(s)", call.args.len()),
            ));
        }

        Instance::construct(entity, call).map(Some)
    }
}

impl PartialEq for Instance {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.entity, other.entity) && self.slots == other.slots
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.entity.name())?;
        f.debug_map()
            .entries(self.slots().map(|(attr, slot)| (attr.name(), slot)))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use crate::{bundle, sym, EntityType, ValueType};
    use once_cell::sync::Lazy;
    use serde_json::json;

    #[test]
    fn test_scalar_set_and_overwrite() {
        let mut pet = PET.instance();
        pet.set("name", "Rex").unwrap();
        pet.set("name", "Fido").unwrap();
        assert_eq!(pet.str("name"), Some("Fido"));
    }

    #[test]
    fn test_null_unsets_field() {
        let mut pet = PET.instance();
        pet.set("name", "Rex").unwrap();
        pet.set("name", Value::Null).unwrap();
        assert!(!pet.is_set("name"));
        assert!(pet.is_empty());
    }

    #[test]
    fn test_unknown_name_fails() {
        let mut pet = PET.instance();
        let err = pet.set("colour", "brown").unwrap_err();
        assert!(matches!(
            err,
            SpecError::NoSuchAttribute { entity: "Pet", ref name } if name == "colour"
        ));
    }

    #[test]
    fn test_getter_shaped_call_changes_nothing() {
        let mut pet = PET.instance();
        pet.call("name", Call::new()).unwrap();
        pet.call("owner", Call::new()).unwrap();
        assert!(pet.is_empty());
    }

    #[test]
    fn test_bare_entry_points_are_getters() {
        let mut pet = PET.instance();
        pet.call("toy", Call::new()).unwrap();
        pet.call("toy_ref", Call::new()).unwrap();
        pet.call("note", Call::new()).unwrap();
        assert!(pet.is_empty());
        assert_eq!(pet.to_tree(), json!({}));
    }

    #[test]
    fn test_array_field_keeps_null_elements() {
        let mut pet = PET.instance();
        pet.append("tags", [json!(null), json!("a")]).unwrap();
        assert_eq!(pet.values("tags"), &[json!(null), json!("a")]);

        pet.set("tags", Value::Null).unwrap();
        assert_eq!(pet.values("tags"), &[json!(null), json!("a")]);

        let mut empty = PET.instance();
        empty.set("tags", Value::Null).unwrap();
        assert!(!empty.is_set("tags"));
    }

    #[test]
    fn test_array_field_error_keeps_existing_values() {
        static TAGGED: Lazy<EntityType> = Lazy::new(|| {
            EntityType::define("Tagged")
                .array_field("tags?", ValueType::String)
                .before_field("tags", |_, input| match input.text() {
                    Some("") => Err(SpecError::hook_error("tags", "empty tag")),
                    _ => Ok(input),
                })
                .build()
        });

        let mut tagged = TAGGED.instance();
        tagged.append("tags", ["a"]).unwrap();
        assert!(tagged.append("tags", ["b", ""]).is_err());
        assert_eq!(tagged.values("tags"), &[json!("a")]);
    }

    #[test]
    fn test_array_field_accumulates() {
        let mut pet = PET.instance();
        pet.append("tags", ["a", "b"]).unwrap();
        pet.append("tags", ["c"]).unwrap();
        pet.set("tags", json!(["d", "e"])).unwrap();
        assert_eq!(pet.values("tags"), &[json!("a"), json!("b"), json!("c"), json!("d"), json!("e")]);
    }

    #[test]
    fn test_map_field_inserts() {
        let mut pet = PET.instance();
        pet.call("labels", Call::new().arg("colour").arg("brown")).unwrap();
        pet.call("labels", Call::new().with("size", "small")).unwrap();
        assert_eq!(
            pet.get("labels"),
            Some(&Slot::Entries(
                json!({"colour": "brown", "size": "small"})
                    .as_object()
                    .cloned()
                    .unwrap()
            ))
        );
    }

    #[test]
    fn test_nested_object_from_block_and_bundle() {
        let mut pet = PET.instance();
        pet.object_with("owner", bundle! { "name" => "Kim" }, |owner| {
            owner.set("email", "kim@example.com")
        })
        .unwrap();

        let owner = pet.child("owner").unwrap();
        assert_eq!(owner.str("name"), Some("Kim"));
        assert_eq!(owner.str("email"), Some("kim@example.com"));
    }

    #[test]
    fn test_object_literal_doubles_as_bundle() {
        let mut pet = PET.instance();
        pet.set("owner", json!({"name": "Kim"})).unwrap();
        assert_eq!(pet.child("owner").unwrap().str("name"), Some("Kim"));
    }

    #[test]
    fn test_array_entry_points_share_collection() {
        let mut pet = PET.instance();
        pet.add("toy", bundle! { "name" => "ball" }, |_| Ok(())).unwrap();
        pet.call("toy_ref", Call::new().arg(sym("bone"))).unwrap();
        pet.add("toy", Bundle::new(), |toy| toy.set("name", "rope"))
            .unwrap();

        let toys = pet.children("toys");
        assert_eq!(toys.len(), 3);
        assert_eq!(toys[0].entity().name(), "Toy");
        assert_eq!(toys[1].entity().name(), "ToyReference");
        assert_eq!(toys[1].str("ref"), Some("#/toys/bone"));
        assert_eq!(toys[2].str("name"), Some("rope"));
    }

    #[test]
    fn test_collection_attribute_name_is_not_callable() {
        let mut pet = PET.instance();
        let err = pet.call("toys", Call::new().with("name", "ball")).unwrap_err();
        assert!(matches!(err, SpecError::InvalidArgument { .. }));
    }

    #[test]
    fn test_map_insert_last_write_wins() {
        let mut pet = PET.instance();
        pet.insert("note", "a", bundle! { "text" => "first" }, |_| Ok(()))
            .unwrap();
        pet.insert("note", "b", bundle! { "text" => "second" }, |_| Ok(()))
            .unwrap();
        pet.insert("note", "a", bundle! { "text" => "third" }, |_| Ok(()))
            .unwrap();

        let notes = pet.entries("notes").unwrap();
        assert_eq!(notes.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(notes.get("a").unwrap().str("text"), Some("third"));
    }

    #[test]
    fn test_map_insert_without_key_uses_hook_or_fails() {
        let mut pet = PET.instance();
        pet.add("note", bundle! { "text" => "keyless" }, |_| Ok(()))
            .unwrap();
        assert!(pet.entries("notes").unwrap().contains_key("general"));

        let mut owner = OWNER.instance();
        let err = owner.add("pet", Bundle::new(), |_| Ok(())).unwrap_err();
        assert!(matches!(err, SpecError::MissingKey { entity: "Owner", .. }));
    }

    #[test]
    fn test_field_or_object_shapes() {
        let mut pet = PET.instance();
        pet.set("extra", false).unwrap();
        assert_eq!(pet.value("extra"), Some(&json!(false)));

        pet.object_with("extra", bundle! { "name" => "spare" }, |_| Ok(()))
            .unwrap();
        assert_eq!(pet.child("extra").unwrap().str("name"), Some("spare"));
    }

    #[test]
    fn test_shortcuts_expand_to_canonical_calls() {
        let mut pet = PET.instance();
        pet.call("nickname", Call::new().arg("Rexy")).unwrap();
        pet.call("good_boy", Call::new()).unwrap();
        pet.call("first_note", Call::new().with("text", "hi")).unwrap();
        pet.call("squeaky", Call::new().arg("duck")).unwrap();

        assert_eq!(pet.str("name"), Some("Rexy"));
        assert_eq!(pet.str("status"), Some("good"));
        assert_eq!(
            pet.entries("notes").unwrap().get("first").unwrap().str("text"),
            Some("hi")
        );
        let toy = &pet.children("toys")[0];
        assert_eq!(toy.str("name"), Some("duck"));
        assert_eq!(toy.bool("squeaks"), Some(true));
    }

    #[test]
    fn test_map_shortcut_matches_canonical_call() {
        let mut short = PET.instance();
        short.call("first_note", Call::new().with("text", "hi")).unwrap();

        let mut canonical = PET.instance();
        canonical
            .call("note", Call::new().arg("first").with("text", "hi"))
            .unwrap();

        assert_eq!(short.to_tree(), canonical.to_tree());
        assert_eq!(short.to_tree(), json!({"notes": {"first": {"text": "hi"}}}));
    }

    #[test]
    fn test_object_shortcut_matches_canonical_call() {
        let mut short = PET.instance();
        short.call("squeaky", Call::new().arg("duck")).unwrap();

        let mut canonical = PET.instance();
        canonical
            .call("toy", Call::new().arg("duck").with("squeaks", true))
            .unwrap();

        assert_eq!(short.to_tree(), canonical.to_tree());
        assert_eq!(
            short.to_tree(),
            json!({"toys": [{"name": "duck", "squeaks": true}]})
        );
    }

    #[test]
    fn test_object_shortcut_defaults_yield_to_caller() {
        let mut pet = PET.instance();
        pet.call("squeaky", Call::new().arg("rope").with("squeaks", false))
            .unwrap();
        assert_eq!(pet.children("toys")[0].bool("squeaks"), Some(false));
    }

    #[test]
    fn test_field_shortcut_matches_canonical_call() {
        let mut short = PET.instance();
        short.call("good_boy", Call::new()).unwrap();

        let mut canonical = PET.instance();
        canonical.set("status", "good").unwrap();

        assert_eq!(short.to_tree(), canonical.to_tree());
        assert_eq!(short.to_tree(), json!({"status": "good"}));
    }

    #[test]
    fn test_object_hooks_see_lifted_literals() {
        static KENNEL: Lazy<EntityType> = Lazy::new(|| {
            EntityType::define("Kennel")
                .object("owner?", &OWNER)
                .before_object("owner", |_, mut call| {
                    call.named.insert_default("email", "unknown");
                    Ok(Some(call))
                })
                .build()
        });

        let mut kennel = KENNEL.instance();
        kennel.set("owner", json!({"name": "Kim"})).unwrap();
        assert_eq!(
            kennel.to_tree(),
            json!({"owner": {"name": "Kim", "email": "unknown"}})
        );
    }

    #[test]
    fn test_object_hook_can_redispatch_and_suppress() {
        static BASKET: Lazy<EntityType> = Lazy::new(|| {
            EntityType::define("Basket")
                .array("items?", [Variant::new("item", &TOY).positional(&[Some("name")])])
                .before_object("items", |basket, mut call| {
                    match call.named.remove("names") {
                        Some(Input::Literal(Value::Array(names))) => {
                            for name in names {
                                basket.call("item", Call::new().arg(name))?;
                            }
                            Ok(None)
                        }
                        Some(other) => {
                            call.named.insert("names", other);
                            Ok(Some(call))
                        }
                        None => Ok(Some(call)),
                    }
                })
                .build()
        });

        let mut basket = BASKET.instance();
        basket
            .call("item", Call::new().with("names", json!(["ball", "rope"])))
            .unwrap();

        let items = basket.children("items");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].str("name"), Some("ball"));
        assert_eq!(items[1].str("name"), Some("rope"));
    }

    #[test]
    fn test_field_shortcut_rejects_arguments() {
        let mut pet = PET.instance();
        let err = pet
            .call("good_boy", Call::new().arg("very"))
            .unwrap_err();
        assert!(matches!(err, SpecError::InvalidArgument { .. }));
    }

    #[test]
    fn test_fields_reject_blocks() {
        let mut pet = PET.instance();
        let err = pet.object("name", |_| Ok(())).unwrap_err();
        assert!(matches!(err, SpecError::InvalidArgument { .. }));
    }

    #[test]
    fn test_hook_errors_propagate() {
        let mut pet = PET.instance();
        let err = pet.call("toy_ref", Call::new().arg(sym(""))).unwrap_err();
        assert!(matches!(err, SpecError::Hook { .. }));
        assert!(pet.children("toys").is_empty());
    }

    #[test]
    fn test_apply_ops() {
        let mut pet = PET.instance();
        pet.apply_all(vec![
            Op::set("name", "Rex"),
            Op::append("tags", ["x"]),
            Op::object("owner", bundle! { "name" => "Kim" }, vec![]),
            Op::add("toy", bundle! { "name" => "ball" }, vec![]),
            Op::insert("note", "a", Bundle::new(), vec![Op::set("text", "hi")]),
        ])
        .unwrap();

        assert_eq!(pet.str("name"), Some("Rex"));
        assert_eq!(pet.values("tags"), &[json!("x")]);
        assert_eq!(pet.child("owner").unwrap().str("name"), Some("Kim"));
        assert_eq!(pet.children("toys").len(), 1);
        assert_eq!(
            pet.entries("notes").unwrap().get("a").unwrap().str("text"),
            Some("hi")
        );
    }
}
