//! Entry points that turn construction input into a finished instance.

use crate::{
    error::SpecResult,
    instance::Instance,
    op::{Call, Op},
    registry::EntityType,
    script::parse_script,
    value::Bundle,
};

/// Builds instances of one root entity type
#[derive(Debug, Clone, Copy)]
pub struct Builder {
    entity: &'static EntityType,
}

impl Builder {
    pub fn new(entity: &'static EntityType) -> Self {
        Self { entity }
    }

    pub fn entity(&self) -> &'static EntityType {
        self.entity
    }

    /// Run a construction closure against a fresh instance
    pub fn build<F>(&self, f: F) -> SpecResult<Instance>
    where
        F: FnOnce(&mut Instance) -> SpecResult<()>,
    {
        Instance::construct(self.entity, Call::new().block(f))
    }

    /// Build from named arguments, applied in bundle order
    pub fn from_bundle(&self, named: Bundle) -> SpecResult<Instance> {
        Instance::construct(self.entity, Call::new().named(named))
    }

    /// Build from a data-driven operation sequence
    pub fn from_ops(&self, ops: Vec<Op>) -> SpecResult<Instance> {
        Instance::construct(self.entity, Call::new().ops(ops))
    }

    /// Build from script text
    pub fn from_script(&self, text: &str) -> SpecResult<Instance> {
        let ops = parse_script(text)?;
        tracing::debug!(entity = self.entity.name(), steps = ops.len(), "building from script");
        self.from_ops(ops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use crate::{bundle, sym};
    use serde_json::json;

    #[test]
    fn test_all_entry_points_agree() {
        let builder = Builder::new(&PET);

        let by_closure = builder
            .build(|pet| {
                pet.set("name", "Rex")?;
                pet.call("toy_ref", Call::new().arg(sym("bone")))
            })
            .unwrap();
        let by_ops = builder
            .from_ops(vec![
                Op::set("name", "Rex"),
                Op::invoke("toy_ref", vec![sym("bone")], Bundle::new()),
            ])
            .unwrap();
        let by_script = builder
            .from_script("- name: Rex\n- toy_ref: \":bone\"\n")
            .unwrap();

        let expected = json!({"name": "Rex", "toys": [{"$ref": "#/toys/bone"}]});
        assert_eq!(by_closure.to_tree(), expected);
        assert_eq!(by_ops.to_tree(), expected);
        assert_eq!(by_script.to_tree(), expected);
    }

    #[test]
    fn test_bundle_skips_nulls() {
        let pet = Builder::new(&PET)
            .from_bundle(bundle! { "name" => "Rex", "status" => json!(null) })
            .unwrap();
        assert_eq!(pet.to_tree(), json!({"name": "Rex"}));
    }

    #[test]
    fn test_bundle_with_unknown_name_fails() {
        let err = Builder::new(&OWNER)
            .from_bundle(bundle! { "nickname" => "K" })
            .unwrap_err();
        assert!(matches!(err, crate::SpecError::NoSuchAttribute { .. }));
    }
}
