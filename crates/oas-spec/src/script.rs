//! Builder scripts.
//!
//! A script is YAML text (JSON works too) listing setter calls in order:
//!
//! ```yaml
//! - title: Pet store
//! - version: "1.0"
//! - contact:
//!     name: API team
//!     do:
//!       - email: api@example.com
//! - parameter:
//!     args: [id]
//!     in: path
//! - schema:
//!     args: [[":Pet"]]
//! ```
//!
//! Each step is `name: arguments`. A scalar is one positional argument, a
//! sequence is a positional list and a mapping is a named bundle whose `args`
//! and `do` keys carry the positional list and the nested steps. Strings
//! written `:name` are symbols, and a one-element list holding a symbol is an
//! array-of argument.

use crate::{
    error::{SpecError, SpecResult},
    op::Op,
    value::{Bundle, Input},
};
use serde_json::{Map, Value};

/// Positional-argument key inside a step's mapping
pub const ARGS_KEY: &str = "args";

/// Nested-steps key inside a step's mapping
pub const BLOCK_KEY: &str = "do";

const SYMBOL_MARKER: char = ':';

/// Parse script text into operations
pub fn parse_script(text: &str) -> SpecResult<Vec<Op>> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    let tree = serde_json::to_value(yaml)?;
    let ops = parse_steps(tree)?;
    tracing::debug!(steps = ops.len(), "parsed builder script");
    Ok(ops)
}

/// Parse an already decoded step list
pub fn parse_steps(tree: Value) -> SpecResult<Vec<Op>> {
    match tree {
        Value::Null => Ok(Vec::new()),
        Value::Array(steps) => {
            let mut ops = Vec::new();
            for step in steps {
                match step {
                    Value::Object(step) => ops.extend(parse_mapping(step)?),
                    other => {
                        return Err(SpecError::script_error(format!(
                            "each step must be a `name: arguments` mapping, found {other}"
                        )))
                    }
                }
            }
            Ok(ops)
        }
        Value::Object(steps) => parse_mapping(steps),
        other => Err(SpecError::script_error(format!(
            "a script is a list of steps, found {other}"
        ))),
    }
}

fn parse_mapping(steps: Map<String, Value>) -> SpecResult<Vec<Op>> {
    steps
        .into_iter()
        .map(|(name, arguments)| parse_step(name, arguments))
        .collect()
}

fn parse_step(name: String, arguments: Value) -> SpecResult<Op> {
    let mut args = Vec::new();
    let mut named = Bundle::new();
    let mut block = None;

    match arguments {
        Value::Null => {}
        Value::Array(values) => args.extend(values.into_iter().map(argument)),
        Value::Object(map) => {
            for (key, value) in map {
                match key.as_str() {
                    ARGS_KEY => match value {
                        Value::Array(values) => args.extend(values.into_iter().map(argument)),
                        value => args.push(argument(value)),
                    },
                    BLOCK_KEY => block = Some(parse_steps(value)?),
                    _ => named.insert(key, argument(value)),
                }
            }
        }
        scalar => args.push(argument(scalar)),
    }

    Ok(Op::Invoke {
        name,
        args,
        named,
        block,
    })
}

/// Convert one argument, recognising symbols and array-of forms
fn argument(value: Value) -> Input {
    match value {
        Value::String(text) => match symbol(&text) {
            Some(name) => Input::symbol(name),
            None => Input::Literal(Value::String(text)),
        },
        Value::Array(items) if items.len() == 1 && is_symbol(&items[0]) => {
            let inner = items.into_iter().next().map(argument);
            match inner {
                Some(inner) => Input::array_of(inner),
                None => Input::Literal(Value::Array(Vec::new())),
            }
        }
        value => Input::Literal(value),
    }
}

fn symbol(text: &str) -> Option<&str> {
    text.strip_prefix(SYMBOL_MARKER).filter(|name| !name.is_empty())
}

fn is_symbol(value: &Value) -> bool {
    value.as_str().and_then(symbol).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{bundle, sym};
    use serde_json::json;

    #[test]
    fn test_scalar_sequence_and_null_steps() {
        let ops = parse_script("- name: Rex\n- tags: [a, b]\n- good_boy:\n").unwrap();
        assert_eq!(
            ops,
            vec![
                Op::invoke("name", vec!["Rex".into()], Bundle::new()),
                Op::invoke("tags", vec!["a".into(), "b".into()], Bundle::new()),
                Op::invoke("good_boy", vec![], Bundle::new()),
            ]
        );
    }

    #[test]
    fn test_mapping_step_with_args_and_block() {
        let text = r#"
- toy:
    args: ":bone"
    squeaks: true
    do:
      - name: chew
"#;
        let ops = parse_script(text).unwrap();
        assert_eq!(
            ops,
            vec![Op::Invoke {
                name: "toy".to_string(),
                args: vec![sym("bone")],
                named: bundle! { "squeaks" => true },
                block: Some(vec![Op::invoke("name", vec!["chew".into()], Bundle::new())]),
            }]
        );
    }

    #[test]
    fn test_array_of_symbol() {
        let ops = parse_script("- schema:\n    args: [[\":Pet\"]]\n").unwrap();
        let Op::Invoke { args, .. } = &ops[0] else {
            panic!("expected an invoke step");
        };
        assert_eq!(args, &vec![Input::array_of(sym("Pet"))]);
    }

    #[test]
    fn test_numeric_keys_and_json_input() {
        let ops = parse_script(r#"[{"response": {"args": [200], "description": "ok"}}]"#).unwrap();
        let Op::Invoke { args, named, .. } = &ops[0] else {
            panic!("expected an invoke step");
        };
        assert_eq!(args, &vec![Input::from(json!(200))]);
        assert_eq!(named.get("description"), Some(&Input::from("ok")));
    }

    #[test]
    fn test_rejects_scalar_steps() {
        assert!(matches!(
            parse_script("- just text"),
            Err(SpecError::Script(_))
        ));
        assert!(matches!(parse_script("[a: b"), Err(SpecError::Yaml(_))));
    }
}
