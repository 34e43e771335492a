//! Shortcut entry points.
//!
//! A shortcut owns no state. Invoking one rewrites the call into the canonical
//! call it stands for, which the instance then dispatches as usual.

use crate::{op::Call, value::Bundle};
use serde_json::Value;

#[derive(Debug, Clone)]
pub enum Shortcut {
    /// `name(...)` is `target(key, ...)`
    Map { target: String, key: String },
    /// `name(...)` is `target { block_target(...) }`
    Block { target: String, block_target: String },
    /// `name(...)` is `target(...)` with `defaults` merged under the caller's
    /// named arguments
    Object { target: String, defaults: Bundle },
    /// `name()` is `target(value)`
    Field { target: String, value: Value },
    /// `name(...)` is `target(...)`
    Alias { target: String },
}

impl Shortcut {
    pub fn target(&self) -> &str {
        match self {
            Shortcut::Map { target, .. }
            | Shortcut::Block { target, .. }
            | Shortcut::Object { target, .. }
            | Shortcut::Field { target, .. }
            | Shortcut::Alias { target } => target,
        }
    }

    /// Rewrite an invocation into the call for [`Shortcut::target`]
    pub fn expand<'a>(&self, mut call: Call<'a>) -> Result<Call<'a>, &'static str> {
        match self {
            Shortcut::Map { key, .. } => {
                call.args.insert(0, key.as_str().into());
                Ok(call)
            }
            Shortcut::Block { block_target, .. } => {
                let block_target = block_target.clone();
                Ok(Call::new().block(move |inner| inner.call(&block_target, call)))
            }
            Shortcut::Object { defaults, .. } => {
                call.named.merge_under(defaults);
                Ok(call)
            }
            Shortcut::Field { value, .. } => {
                if !call.is_getter() {
                    return Err("takes no arguments");
                }
                Ok(Call::new().arg(value.clone()))
            }
            Shortcut::Alias { .. } => Ok(call),
        }
    }
}

/// Move positional arguments into the named slots listed in `names`.
///
/// Slot *i* fills `names[i]` unless the caller already supplied that name.
/// Slots without a name, and slots whose name was supplied, stay positional in
/// their original order.
pub fn map_positional(names: &[Option<String>], call: &mut Call<'_>) {
    if names.is_empty() || call.args.is_empty() {
        return;
    }
    let args = std::mem::take(&mut call.args);
    for (index, arg) in args.into_iter().enumerate() {
        match names.get(index).and_then(|name| name.as_deref()) {
            Some(name) if !call.named.contains(name) => call.named.insert(name, arg),
            _ => call.args.push(arg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{sym, Input};

    #[test]
    fn test_map_positional_fills_missing_names() {
        let names = vec![Some("name".to_string()), None];
        let mut call = Call::new().arg(sym("id")).arg(7).with("in", "path");
        map_positional(&names, &mut call);

        assert_eq!(call.named.get("name"), Some(&sym("id")));
        assert_eq!(call.args, vec![Input::from(7)]);
    }

    #[test]
    fn test_map_positional_keeps_explicit_names() {
        let names = vec![Some("name".to_string())];
        let mut call = Call::new().arg("positional").with("name", "explicit");
        map_positional(&names, &mut call);

        assert_eq!(call.named.get("name"), Some(&Input::from("explicit")));
        assert_eq!(call.args, vec![Input::from("positional")]);
    }

    #[test]
    fn test_expand_map_and_field_shortcuts() {
        let json = Shortcut::Map {
            target: "content".to_string(),
            key: "application/json".to_string(),
        };
        let call = json.expand(Call::new().with("example", 1)).unwrap();
        assert_eq!(call.args, vec![Input::from("application/json")]);

        let query = Shortcut::Field {
            target: "in".to_string(),
            value: Value::from("query"),
        };
        assert!(query.expand(Call::new().arg("x")).is_err());
        let call = query.expand(Call::new()).unwrap();
        assert_eq!(call.args, vec![Input::from("query")]);
    }
}
