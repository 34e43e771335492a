//! Schema objects.
//!
//! Schemas accept a few positional forms wherever a schema is expected:
//! a symbol is a reference to a component schema, a type argument sets
//! `type`, and an array-of argument wraps its element in an array schema.
//!
//! ```
//! use oas_openapi::specification::SCHEMA;
//! use oas_spec::{bundle, sym, Call, Input, ValueType};
//! use serde_json::json;
//!
//! let mut schema = SCHEMA.instance();
//! schema.set("type", ValueType::Object).unwrap();
//! schema.call("string", Call::new().arg("name")).unwrap();
//! schema.call("integer", Call::new().arg("age?").with("minimum", 0)).unwrap();
//! schema.call("items", Call::new().arg(Input::array_of(sym("Pet")))).unwrap();
//!
//! assert_eq!(schema.to_tree(), json!({
//!     "type": "object",
//!     "required": ["name"],
//!     "properties": {
//!         "name": {"type": "string"},
//!         "age": {"type": "integer", "minimum": 0}
//!     },
//!     "items": {"type": "array", "items": {"$ref": "#/components/schemas/Pet"}}
//! }));
//! ```

use super::reference::SCHEMAS;
use oas_spec::{
    hooks::{object_hook, prefix_symbol, ObjectHook},
    AttributeDescriptor, Call, Cardinality, EntityType, Input, SpecResult, ValueType, Variant,
};
use once_cell::sync::Lazy;

/// Attributes of [`SCHEMA`] whose values are themselves schemas
const NESTED: [&str; 11] = [
    "additional_properties",
    "items",
    "unevaluated_items",
    "properties",
    "pattern_properties",
    "prefix_items",
    "contains",
    "all_of",
    "any_of",
    "one_of",
    "not",
];

pub static SCHEMA: Lazy<EntityType> = Lazy::new(|| {
    let mut schema = EntityType::define("Schema")
        .declare(
            AttributeDescriptor::field("ref?", ValueType::String, Cardinality::Scalar)
                .output_key("$ref"),
        )
        .fields(["title?", "description?", "type?", "format?"])
        .field("nullable?", ValueType::Boolean)
        .array_field("required?", ValueType::String)
        .array_field("enum?", ValueType::Any)
        .field("const?", ValueType::Any)
        .field("default?", ValueType::Any)
        .field("minimum?", ValueType::Number)
        .field("maximum?", ValueType::Number)
        .field("exclusive_minimum?", ValueType::Number)
        .field("exclusive_maximum?", ValueType::Number)
        .field("multiple_of?", ValueType::Number)
        .field("min_length?", ValueType::Integer)
        .field("max_length?", ValueType::Integer)
        .field("pattern?", ValueType::String)
        .field("min_items?", ValueType::Integer)
        .field("max_items?", ValueType::Integer)
        .field("unique_items?", ValueType::Boolean)
        .field("min_properties?", ValueType::Integer)
        .field("max_properties?", ValueType::Integer)
        .field("read_only?", ValueType::Boolean)
        .field("write_only?", ValueType::Boolean)
        .field("deprecated?", ValueType::Boolean)
        .array_field("examples?", ValueType::Any)
        .map("properties?", [Variant::new("property", &SCHEMA)])
        .map(
            "pattern_properties?",
            [Variant::new("pattern_property", &SCHEMA)],
        )
        .field_or_object("additional_properties?", ValueType::Boolean, &SCHEMA)
        .field_or_object("items?", ValueType::Boolean, &SCHEMA)
        .field_or_object("unevaluated_items?", ValueType::Boolean, &SCHEMA)
        .array("prefix_items?", [Variant::new("prefix_item", &SCHEMA)])
        .object("contains?", &SCHEMA)
        .array("all_of?", [Variant::new("all_of", &SCHEMA)])
        .array("any_of?", [Variant::new("any_of", &SCHEMA)])
        .array("one_of?", [Variant::new("one_of", &SCHEMA)])
        .object("not?", &SCHEMA)
        .before_field_hook("ref", prefix_symbol(SCHEMAS))
        .before_key("properties", |schema, key| {
            let Some(key) = key else {
                return Ok(None);
            };
            let (name, required) = oas_spec::naming::parse_declared(&key);
            if required && !schema.values("required").iter().any(|v| v == name) {
                schema.append("required", [name])?;
            }
            Ok(Some(name.to_string()))
        })
        .object_shortcuts(
            "property",
            [
                ("object", typed(ValueType::Object)),
                ("array", typed(ValueType::Array)),
                ("string", typed(ValueType::String)),
                ("integer", typed(ValueType::Integer)),
                ("number", typed(ValueType::Number)),
                ("boolean", typed(ValueType::Boolean)),
            ],
        )
        .alias("p", "property")
        .alias("prop", "property")
        .alias("desc", "description");

    for name in NESTED {
        schema = schema.before_object_hook(name, schema_arguments());
    }
    schema.build()
});

fn typed(value_type: ValueType) -> oas_spec::Bundle {
    oas_spec::bundle! { "type" => value_type }
}

/// Rewrite the positional forms accepted wherever a schema is expected.
///
/// - a symbol becomes `ref`
/// - a type argument becomes `type`
/// - an array-of argument becomes `{type: array, items: <element>}`, with the
///   remaining arguments and the block applied to the element schema
pub fn schema_arguments() -> ObjectHook {
    object_hook(|_, mut call| {
        match call.args.first() {
            Some(Input::Symbol(_)) => {
                let reference = call.args.remove(0);
                call.named.insert_default("ref", reference);
            }
            Some(Input::Type(_)) => {
                let value_type = call.args.remove(0);
                call.named.insert_default("type", value_type);
            }
            Some(Input::ArrayOf(_)) => {
                let Input::ArrayOf(element) = call.args.remove(0) else {
                    return Ok(Some(call));
                };
                return Ok(Some(array_of(*element, call)));
            }
            _ => {}
        }
        Ok(Some(call))
    })
}

fn array_of<'a>(element: Input, call: Call<'a>) -> Call<'a> {
    let Call { args, named, block } = call;
    let mut items = Call::new().arg(element).args(args).named(named);
    items.block = block;
    Call::new()
        .with("type", ValueType::Array)
        .block(move |array| -> SpecResult<()> { array.call("items", items) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oas_spec::{bundle, sym, Builder};
    use serde_json::json;

    #[test]
    fn test_property_shortcuts_and_required() {
        let schema = Builder::new(&SCHEMA)
            .build(|s| {
                s.set("type", ValueType::Object)?;
                s.call("string", Call::new().arg("name"))?;
                s.call("integer", Call::new().arg("age?").named(bundle! { "minimum" => 0, "maximum" => 150 }))?;
                s.call("string", Call::new().arg("email").with("format", sym("email")))?;
                s.call("p", Call::new().arg("foo").with("enum", json!([1, 2, 3, 4])))?;
                s.call("prop", Call::new().arg("bar").with("ref", sym("Bar")))?;
                s.set("additional_properties", false)
            })
            .unwrap();

        assert_eq!(
            schema.to_tree(),
            json!({
                "type": "object",
                "required": ["name", "email", "foo", "bar"],
                "properties": {
                    "name": {"type": "string"},
                    "age": {"type": "integer", "minimum": 0, "maximum": 150},
                    "email": {"type": "string", "format": "email"},
                    "foo": {"enum": [1, 2, 3, 4]},
                    "bar": {"$ref": "#/components/schemas/Bar"}
                },
                "additionalProperties": false
            })
        );
    }

    #[test]
    fn test_enum_keeps_null_member() {
        let mut schema = SCHEMA.instance();
        schema.append("enum", [json!(null), json!("a")]).unwrap();
        assert_eq!(schema.to_tree(), json!({"enum": [null, "a"]}));
    }

    #[test]
    fn test_redeclared_property_is_required_once() {
        let mut schema = SCHEMA.instance();
        schema.call("string", Call::new().arg("name")).unwrap();
        schema.call("integer", Call::new().arg("name")).unwrap();
        assert_eq!(schema.values("required"), &[json!("name")]);
        assert_eq!(
            schema.entries("properties").unwrap().get("name").unwrap().str("type"),
            Some("integer")
        );
    }

    #[test]
    fn test_array_property_with_items_block() {
        let mut schema = SCHEMA.instance();
        schema
            .call(
                "array",
                Call::new().arg("owners").block(|owners| {
                    owners.call("items", Call::new().with("ref", sym("OwnerData")))
                }),
            )
            .unwrap();
        schema
            .call("all_of", Call::new().with("ref", sym("CompanyData")))
            .unwrap();

        assert_eq!(
            schema.to_tree(),
            json!({
                "required": ["owners"],
                "properties": {
                    "owners": {
                        "type": "array",
                        "items": {"$ref": "#/components/schemas/OwnerData"}
                    }
                },
                "allOf": [{"$ref": "#/components/schemas/CompanyData"}]
            })
        );
    }

    #[test]
    fn test_prefix_items_and_contains() {
        let mut schema = SCHEMA.instance();
        schema.call("prefix_item", Call::new().arg(ValueType::Number)).unwrap();
        schema.call("prefix_item", Call::new().arg(ValueType::String)).unwrap();
        schema.call("contains", Call::new().arg(ValueType::Number)).unwrap();
        schema.set("unevaluated_items", false).unwrap();

        assert_eq!(
            schema.to_tree(),
            json!({
                "prefixItems": [{"type": "number"}, {"type": "string"}],
                "unevaluatedItems": false,
                "contains": {"type": "number"}
            })
        );
    }

    #[test]
    fn test_array_of_wraps_element() {
        let mut schema = SCHEMA.instance();
        schema
            .call(
                "items",
                Call::new()
                    .arg(Input::array_of(ValueType::String))
                    .with("min_length", 1),
            )
            .unwrap();
        assert_eq!(
            schema.to_tree(),
            json!({"items": {"type": "array", "items": {"type": "string", "minLength": 1}}})
        );
    }

    #[test]
    fn test_property_without_key_fails() {
        let mut schema = SCHEMA.instance();
        let err = schema.call("property", Call::new().with("type", "string")).unwrap_err();
        assert!(matches!(err, oas_spec::SpecError::MissingKey { entity: "Schema", .. }));
    }
}
