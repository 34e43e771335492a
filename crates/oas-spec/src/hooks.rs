//! Hook pipeline.
//!
//! Hooks are attached per attribute at declaration time and run, in
//! declaration order, right before the generic setter stores a value, builds a
//! nested child, or picks a map key. Every hook receives the instance being
//! built so it can set sibling attributes or re-dispatch a rewritten call.

use crate::{
    error::{SpecError, SpecResult},
    instance::Instance,
    op::Call,
    value::Input,
};
use std::{fmt, sync::Arc};

/// `transform(raw value) -> stored value`
pub type FieldHook = Arc<dyn Fn(&mut Instance, Input) -> SpecResult<Input> + Send + Sync>;

/// `transform(call) -> call`; `None` suppresses construction
pub type ObjectHook =
    Arc<dyn for<'a> Fn(&mut Instance, Call<'a>) -> SpecResult<Option<Call<'a>>> + Send + Sync>;

/// `transform(key) -> key`
pub type KeyHook =
    Arc<dyn Fn(&mut Instance, Option<String>) -> SpecResult<Option<String>> + Send + Sync>;

pub fn field_hook<F>(f: F) -> FieldHook
where
    F: Fn(&mut Instance, Input) -> SpecResult<Input> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn object_hook<F>(f: F) -> ObjectHook
where
    F: for<'a> Fn(&mut Instance, Call<'a>) -> SpecResult<Option<Call<'a>>>
        + Send
        + Sync
        + 'static,
{
    Arc::new(f)
}

pub fn key_hook<F>(f: F) -> KeyHook
where
    F: Fn(&mut Instance, Option<String>) -> SpecResult<Option<String>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Ordered hook lists of one attribute
#[derive(Clone, Default)]
pub struct Hooks {
    before_field: Vec<FieldHook>,
    before_object: Vec<ObjectHook>,
    before_key: Vec<KeyHook>,
}

impl Hooks {
    pub(crate) fn push_field(&mut self, hook: FieldHook) {
        self.before_field.push(hook);
    }

    pub(crate) fn push_object(&mut self, hook: ObjectHook) {
        self.before_object.push(hook);
    }

    pub(crate) fn push_key(&mut self, hook: KeyHook) {
        self.before_key.push(hook);
    }

    pub(crate) fn run_field(&self, instance: &mut Instance, mut input: Input) -> SpecResult<Input> {
        for hook in &self.before_field {
            input = hook(instance, input)?;
        }
        Ok(input)
    }

    pub(crate) fn run_object<'a>(
        &self,
        instance: &mut Instance,
        mut call: Call<'a>,
    ) -> SpecResult<Option<Call<'a>>> {
        for hook in &self.before_object {
            match hook(instance, call)? {
                Some(next) => call = next,
                None => {
                    tracing::trace!(
                        entity = instance.entity().name(),
                        "construction suppressed by hook"
                    );
                    return Ok(None);
                }
            }
        }
        Ok(Some(call))
    }

    pub(crate) fn run_key(
        &self,
        instance: &mut Instance,
        mut key: Option<String>,
    ) -> SpecResult<Option<String>> {
        for hook in &self.before_key {
            key = hook(instance, key)?;
        }
        Ok(key)
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_field", &self.before_field.len())
            .field("before_object", &self.before_object.len())
            .field("before_key", &self.before_key.len())
            .finish()
    }
}

/// Expand symbolic inputs into `prefix + symbol`; anything else passes through.
pub fn prefix_symbol(prefix: &'static str) -> FieldHook {
    field_hook(move |instance, input| match input {
        Input::Symbol(name) if name.is_empty() => Err(SpecError::hook_error(
            instance.entity().name(),
            "empty reference name",
        )),
        Input::Symbol(name) => Ok(Input::from(format!("{prefix}{name}"))),
        other => Ok(other),
    })
}

/// Inject a named argument only when the caller did not supply one.
pub fn default_named(name: &'static str, value: Input) -> ObjectHook {
    object_hook(move |_, mut call| {
        call.named.insert_default(name, value.clone());
        Ok(Some(call))
    })
}

/// Use `key` whenever a map entry point is called without one.
pub fn default_key(key: &'static str) -> KeyHook {
    key_hook(move |_, current| Ok(Some(current.unwrap_or_else(|| key.to_string()))))
}
