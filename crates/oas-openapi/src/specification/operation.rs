//! Paths, operations and the objects they carry.

use super::{
    info::SERVER,
    info::EXTERNAL_DOCS,
    reference::{
        HEADER_REFERENCE, LINK_REFERENCE, PARAMETER_REFERENCE, REQUEST_BODY_REFERENCE,
        RESPONSE_REFERENCE,
    },
    schema::{schema_arguments, SCHEMA},
};
use oas_spec::{
    hooks::{default_key, field_hook, FieldHook},
    Call, Declaration, EntityType, Input, SpecError, ValueType, Variant,
};
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value};

/// Media-type shortcuts shared by request bodies and responses
const MEDIA_TYPES: [(&str, &str); 3] = [
    ("json", "application/json"),
    ("xml", "text/xml"),
    ("plain", "text/plain"),
];

/// Parameter locations, each exposed as a zero-argument shortcut
pub const LOCATIONS: [&str; 4] = ["query", "header", "path", "cookie"];

/// HTTP methods in path item order
pub const METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// `content` map plus the `json`/`xml`/`plain` and `schema` shortcuts
fn with_content(declaration: Declaration, declared: &str) -> Declaration {
    declaration
        .map(declared, [Variant::new("content", &MEDIA_TYPE)])
        .map_shortcuts("content", MEDIA_TYPES)
        .block_shortcuts("json", [("schema", "schema")])
}

pub static MEDIA_TYPE: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("MediaType")
        .object("schema?", &SCHEMA)
        .field("example?", ValueType::Any)
        .map_field("examples?", ValueType::Any)
        .before_object_hook("schema", schema_arguments())
        .build()
});

pub static REQUEST_BODY: Lazy<EntityType> = Lazy::new(|| {
    let body = EntityType::define("RequestBody")
        .field("description?", ValueType::String)
        .field("required?", ValueType::Boolean);
    with_content(body, "content")
        .alias("desc", "description")
        .build()
});

pub static HEADER: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Header")
        .field("description?", ValueType::String)
        .field("required?", ValueType::Boolean)
        .field("deprecated?", ValueType::Boolean)
        .object("schema?", &SCHEMA)
        .field("example?", ValueType::Any)
        .before_object_hook("schema", schema_arguments())
        .alias("desc", "description")
        .build()
});

pub static LINK: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Link")
        .fields(["operation_ref?", "operation_id?"])
        .map_field("parameters?", ValueType::Any)
        .field("request_body?", ValueType::Any)
        .field("description?", ValueType::String)
        .object("server?", &SERVER)
        .alias("desc", "description")
        .build()
});

pub static RESPONSE: Lazy<EntityType> = Lazy::new(|| {
    let response = EntityType::define("Response")
        .field("description", ValueType::String)
        .map(
            "headers?",
            [
                Variant::new("header", &HEADER),
                Variant::reference("header_ref", &HEADER_REFERENCE).positional(&[Some("ref")]),
            ],
        );
    with_content(response, "content?")
        .map(
            "links?",
            [
                Variant::new("link", &LINK),
                Variant::reference("link_ref", &LINK_REFERENCE).positional(&[Some("ref")]),
            ],
        )
        .alias("desc", "description")
        .build()
});

pub static PARAMETER: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Parameter")
        .fields(["name", "in", "description?"])
        .field("required?", ValueType::Boolean)
        .field("deprecated?", ValueType::Boolean)
        .field("allow_empty_value?", ValueType::Boolean)
        .field("style?", ValueType::String)
        .field("explode?", ValueType::Boolean)
        .object("schema?", &SCHEMA)
        .field("example?", ValueType::Any)
        .map_field("examples?", ValueType::Any)
        .before_field("in", |parameter, location| {
            if location.text() == Some("path") {
                parameter.set("required", true)?;
                if !parameter.is_set("schema") {
                    parameter.call("schema", Call::new().with("type", ValueType::String))?;
                }
            }
            Ok(location)
        })
        .before_object_hook("schema", schema_arguments())
        .field_shortcuts("in", LOCATIONS.map(|location| (location, location)))
        .alias("desc", "description")
        .build()
});

/// Parameter collection shared by path items and operations
fn with_parameters(declaration: Declaration) -> Declaration {
    declaration
        .array(
            "parameters?",
            [
                Variant::new("parameter", &PARAMETER).positional(&[Some("name")]),
                Variant::reference("parameter_ref", &PARAMETER_REFERENCE)
                    .positional(&[Some("ref")]),
            ],
        )
}

pub static OPERATION: Lazy<EntityType> = Lazy::new(|| {
    let operation = EntityType::define("Operation")
        .array_field("tags?", ValueType::String)
        .fields(["summary?", "description?"])
        .object("external_docs?", &EXTERNAL_DOCS)
        .field("operation_id?", ValueType::String);
    with_parameters(operation)
        .object_variants(
            "request_body?",
            [
                Variant::new("request_body", &REQUEST_BODY),
                Variant::reference("request_body_ref", &REQUEST_BODY_REFERENCE)
                    .positional(&[Some("ref")]),
            ],
        )
        .map(
            "responses?",
            [
                Variant::new("response", &RESPONSE),
                Variant::reference("response_ref", &RESPONSE_REFERENCE)
                    .positional(&[Some("ref")]),
            ],
        )
        .field("deprecated?", ValueType::Boolean)
        .array_field("security?", ValueType::Object)
        .array("servers?", [Variant::new("server", &SERVER)])
        // Inline request bodies are required unless written `request_body?`
        .before_entry("request_body", |_, mut call| {
            call.named.insert_default("required", true);
            Ok(Some(call))
        })
        .before_key_hook("responses", default_key("default"))
        .before_field_hook("security", security_requirement())
        .object_shortcuts(
            "request_body",
            [("request_body?", oas_spec::bundle! { "required" => Value::Null })],
        )
        .alias("oid", "operation_id")
        .alias("desc", "description")
        .build()
});

pub static PATH_ITEM: Lazy<EntityType> = Lazy::new(|| {
    let mut item = EntityType::define("PathItem")
        .declare(
            oas_spec::AttributeDescriptor::field(
                "ref?",
                ValueType::String,
                oas_spec::Cardinality::Scalar,
            )
            .output_key("$ref"),
        )
        .fields(["summary?", "description?"]);
    for method in METHODS {
        item = item.object(&format!("{}?", method), &OPERATION);
    }
    with_parameters(item.array("servers?", [Variant::new("server", &SERVER)]))
        .alias("desc", "description")
        .build()
});

/// Turn `{requirement: name, scopes?: [...]}` or a bare name into a security
/// requirement object `{name: scopes}`
pub fn security_requirement() -> FieldHook {
    field_hook(|instance, input| {
        let (name, scopes) = match &input {
            Input::Symbol(name) | Input::Literal(Value::String(name)) => (name.clone(), json!([])),
            Input::Literal(Value::Object(fields)) if fields.contains_key("requirement") => {
                let Some(name) = fields.get("requirement").and_then(Value::as_str) else {
                    return Err(SpecError::hook_error(
                        instance.entity().name(),
                        "security requirement name must be text",
                    ));
                };
                let scopes = fields.get("scopes").cloned().unwrap_or_else(|| json!([]));
                (name.to_string(), scopes)
            }
            _ => return Ok(input),
        };
        let mut requirement = Map::new();
        requirement.insert(name, scopes);
        Ok(Input::Literal(Value::Object(requirement)))
    })
}
