//! DOM reader.
//!
//! Turns an already decoded key/value tree into a read-only instance graph
//! using the same descriptor tables the builder uses. Object slots pick their
//! variant from the raw value's shape: a present discriminator key (`$ref` for
//! references) selects its variant, anything else falls back to the inline
//! variant. Nothing is defaulted and no hooks run.

use crate::{
    descriptor::{AttributeDescriptor, AttributeKind, Cardinality, Variant},
    error::{SpecError, SpecResult},
    instance::{Instance, Keyed, Slot},
    registry::EntityType,
};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::ops::Deref;

/// Read-only view of a parsed document node
#[derive(Debug, Clone, PartialEq)]
pub struct Node(Instance);

impl Deref for Node {
    type Target = Instance;

    fn deref(&self) -> &Instance {
        &self.0
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

/// Parse `raw` as an instance of `entity`
pub fn read(entity: &'static EntityType, raw: &Value) -> SpecResult<Node> {
    tracing::debug!(entity = entity.name(), "reading document");
    read_instance(entity, raw, "").map(Node)
}

fn read_instance(entity: &'static EntityType, raw: &Value, path: &str) -> SpecResult<Instance> {
    let Value::Object(fields) = raw else {
        return Err(SpecError::unresolved_variant(
            entity.name(),
            "",
            display_path(path),
            format!("expected an object, found {}", shape(raw)),
        ));
    };

    let mut instance = Instance::new(entity);
    for (index, attr) in entity.attributes().iter().enumerate() {
        let Some(value) = fields.get(attr.key()) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let path = child_path(path, attr.key());
        instance.put(index, read_slot(entity, attr, value, &path)?);
    }
    Ok(instance)
}

fn read_slot(
    entity: &'static EntityType,
    attr: &AttributeDescriptor,
    value: &Value,
    path: &str,
) -> SpecResult<Slot> {
    match attr.kind() {
        AttributeKind::Field { .. } => Ok(match (attr.cardinality(), value) {
            (Cardinality::Array, Value::Array(values)) => Slot::Values(values.clone()),
            (Cardinality::Map, Value::Object(entries)) => Slot::Entries(entries.clone()),
            _ => Slot::Value(value.clone()),
        }),
        AttributeKind::FieldOrObject { entity: child, .. } => match value {
            Value::Object(_) => Ok(Slot::Object(Box::new(read_instance(
                child.get(),
                value,
                path,
            )?))),
            _ => Ok(Slot::Value(value.clone())),
        },
        AttributeKind::Object { variants } => match attr.cardinality() {
            Cardinality::Scalar => {
                let child = read_variant(entity, attr, variants, value, path)?;
                Ok(Slot::Object(Box::new(child)))
            }
            Cardinality::Array => {
                let Value::Array(items) = value else {
                    return Err(mismatch(entity, attr, path, "an array", value));
                };
                let children = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        read_variant(entity, attr, variants, item, &child_path(path, &i.to_string()))
                    })
                    .collect::<SpecResult<Vec<_>>>()?;
                Ok(Slot::Objects(children))
            }
            Cardinality::Map => {
                let Value::Object(items) = value else {
                    return Err(mismatch(entity, attr, path, "an object", value));
                };
                let mut children = Keyed::new();
                for (key, item) in items {
                    let child =
                        read_variant(entity, attr, variants, item, &child_path(path, key))?;
                    children.insert(key.as_str(), child);
                }
                Ok(Slot::Children(children))
            }
        },
    }
}

fn read_variant(
    entity: &'static EntityType,
    attr: &AttributeDescriptor,
    variants: &[Variant],
    raw: &Value,
    path: &str,
) -> SpecResult<Instance> {
    let Value::Object(fields) = raw else {
        return Err(mismatch(entity, attr, path, "an object", raw));
    };

    let discriminated = variants.iter().find(|variant| {
        variant
            .discriminator_key()
            .is_some_and(|key| fields.contains_key(key))
    });
    if let Some(variant) = discriminated {
        tracing::trace!(path, entry = variant.entry(), "variant selected by discriminator");
        return read_instance(variant.entity(), raw, path);
    }

    let Some(inline) = variants.iter().find(|v| v.discriminator_key().is_none()) else {
        return Err(SpecError::unresolved_variant(
            entity.name(),
            attr.name(),
            display_path(path),
            "no variant matches the value",
        ));
    };

    // Polymorphic slots only accept an inline value carrying its required keys
    if variants.len() > 1 {
        let missing = inline
            .entity()
            .attributes()
            .iter()
            .find(|field| field.is_required() && !fields.contains_key(field.key()));
        if let Some(field) = missing {
            return Err(SpecError::unresolved_variant(
                entity.name(),
                attr.name(),
                display_path(path),
                format!(
                    "no discriminator found and `{}` is missing for {}",
                    field.key(),
                    inline.entity().name()
                ),
            ));
        }
    }
    read_instance(inline.entity(), raw, path)
}

fn mismatch(
    entity: &'static EntityType,
    attr: &AttributeDescriptor,
    path: &str,
    expected: &str,
    found: &Value,
) -> SpecError {
    SpecError::unresolved_variant(
        entity.name(),
        attr.name(),
        display_path(path),
        format!("expected {}, found {}", expected, shape(found)),
    )
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Append one JSON-pointer segment
fn child_path(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent, segment.replace('~', "~0").replace('/', "~1"))
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use serde_json::json;

    #[test]
    fn test_read_round_trips_built_tree() {
        let raw = json!({
            "name": "Rex",
            "tags": ["a", "b"],
            "labels": {"colour": "brown"},
            "owner": {"name": "Kim"},
            "toys": [{"name": "ball"}, {"$ref": "#/toys/bone"}],
            "notes": {"z": {"text": "last"}, "a": {"text": "first"}},
            "extra": {"name": "spare"}
        });
        let node = read(&PET, &raw).unwrap();

        assert_eq!(node.str("name"), Some("Rex"));
        assert_eq!(node.child("owner").unwrap().entity().name(), "Owner");
        let toys = node.children("toys");
        assert_eq!(toys[0].entity().name(), "Toy");
        assert_eq!(toys[1].entity().name(), "ToyReference");
        assert_eq!(
            node.entries("notes").unwrap().keys().collect::<Vec<_>>(),
            vec!["z", "a"]
        );
        assert_eq!(node.child("extra").unwrap().str("name"), Some("spare"));
        assert_eq!(node.to_tree(), raw);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let node = read(&OWNER, &json!({"name": "Kim", "x-internal": 1})).unwrap();
        assert_eq!(node.to_tree(), json!({"name": "Kim"}));
    }

    #[test]
    fn test_field_or_object_keeps_scalars() {
        let node = read(&PET, &json!({"name": "Rex", "extra": false})).unwrap();
        assert_eq!(node.value("extra"), Some(&json!(false)));
    }

    #[test]
    fn test_scalar_where_object_expected() {
        let err = read(&PET, &json!({"toys": [{"name": "ball"}, 42]})).unwrap_err();
        match err {
            SpecError::UnresolvedVariant {
                entity,
                attribute,
                path,
                ..
            } => {
                assert_eq!(entity, "Pet");
                assert_eq!(attribute, "toys");
                assert_eq!(path, "/toys/1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_polymorphic_inline_needs_required_keys() {
        let err = read(&PET, &json!({"toys": [{"squeaks": true}]})).unwrap_err();
        assert!(matches!(err, SpecError::UnresolvedVariant { ref path, .. } if path == "/toys/0"));
    }

    #[test]
    fn test_pointer_segments_are_escaped() {
        let err = read(&OWNER, &json!({"pets": {"a/b": 1}})).unwrap_err();
        assert!(matches!(err, SpecError::UnresolvedVariant { ref path, .. } if path == "/pets/a~1b"));
    }

    #[test]
    fn test_root_must_be_object() {
        assert!(read(&PET, &json!([1, 2])).is_err());
    }
}
