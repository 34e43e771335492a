//! Opt-in check for unset required attributes.

use crate::instance::{Instance, Slot};
use std::fmt;

/// A required attribute left unset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingRequired {
    /// JSON pointer of the instance owning the attribute
    pub path: String,
    pub entity: &'static str,
    pub attribute: String,
}

impl fmt::Display for MissingRequired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}.{} is required", path, self.entity, self.attribute)
    }
}

/// Walk `instance` and its children, collecting every unset required attribute
pub fn missing_required(instance: &Instance) -> Vec<MissingRequired> {
    let mut missing = Vec::new();
    walk(instance, "", &mut missing);
    missing
}

fn walk(instance: &Instance, path: &str, missing: &mut Vec<MissingRequired>) {
    let entity = instance.entity();
    for attr in entity.attributes() {
        if attr.is_required() && !instance.is_set(attr.name()) {
            missing.push(MissingRequired {
                path: path.to_string(),
                entity: entity.name(),
                attribute: attr.key().to_string(),
            });
        }
    }

    for (attr, slot) in instance.slots() {
        let path = format!("{}/{}", path, escape(attr.key()));
        match slot {
            Slot::Object(child) => walk(child, &path, missing),
            Slot::Objects(children) => {
                for (i, child) in children.iter().enumerate() {
                    walk(child, &format!("{}/{}", path, i), missing);
                }
            }
            Slot::Children(children) => {
                for (key, child) in children.iter() {
                    walk(child, &format!("{}/{}", path, escape(key)), missing);
                }
            }
            Slot::Value(_) | Slot::Values(_) | Slot::Entries(_) => {}
        }
    }
}

fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle;
    use crate::test_utils::*;

    #[test]
    fn test_reports_nested_missing_fields() {
        let mut pet = PET.instance();
        pet.object("owner", |_| Ok(())).unwrap();
        pet.insert("note", "a/b", bundle! {}, |_| Ok(())).unwrap();

        let missing = missing_required(&pet);
        let rendered: Vec<_> = missing.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec![
                "/: Pet.name is required",
                "/owner: Owner.name is required",
                "/notes/a~1b: Note.text is required",
            ]
        );
    }

    #[test]
    fn test_complete_instance_passes() {
        let mut pet = PET.instance();
        pet.set("name", "Rex").unwrap();
        assert!(missing_required(&pet).is_empty());
    }
}
