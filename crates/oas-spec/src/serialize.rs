//! Instance graph to ordered key/value tree.
//!
//! Keys are written in declaration order using each descriptor's output key.
//! Unset attributes are skipped; required attributes are not checked here.

use crate::instance::{Instance, Keyed, Slot};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Map, Value};

impl Instance {
    /// Serialize into an ordered JSON tree
    pub fn to_tree(&self) -> Value {
        let mut map = Map::new();
        for (attr, slot) in self.slots() {
            map.insert(attr.key().to_string(), slot.to_tree());
        }
        Value::Object(map)
    }

    /// Serialize into JSON text
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

impl Slot {
    pub fn to_tree(&self) -> Value {
        match self {
            Slot::Value(value) => value.clone(),
            Slot::Values(values) => Value::Array(values.clone()),
            Slot::Entries(entries) => Value::Object(entries.clone()),
            Slot::Object(child) => child.to_tree(),
            Slot::Objects(children) => Value::Array(children.iter().map(Instance::to_tree).collect()),
            Slot::Children(children) => Value::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.to_string(), child.to_tree()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Instance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let slots: Vec<_> = self.slots().collect();
        let mut map = serializer.serialize_map(Some(slots.len()))?;
        for (attr, slot) in slots {
            map.serialize_entry(attr.key(), slot)?;
        }
        map.end()
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Slot::Value(value) => value.serialize(serializer),
            Slot::Values(values) => values.serialize(serializer),
            Slot::Entries(entries) => entries.serialize(serializer),
            Slot::Object(child) => child.serialize(serializer),
            Slot::Objects(children) => {
                let mut seq = serializer.serialize_seq(Some(children.len()))?;
                for child in children {
                    seq.serialize_element(child)?;
                }
                seq.end()
            }
            Slot::Children(children) => children.serialize(serializer),
        }
    }
}

impl<T: Serialize> Serialize for Keyed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
