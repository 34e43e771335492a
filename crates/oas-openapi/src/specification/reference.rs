//! Reference objects.
//!
//! Each referenced kind gets its own entity type so that a symbolic name
//! passed to its entry point expands with the right components prefix.

use oas_spec::{hooks::prefix_symbol, AttributeDescriptor, Cardinality, EntityType, ValueType};
use once_cell::sync::Lazy;

pub const SCHEMAS: &str = "#/components/schemas/";
pub const PARAMETERS: &str = "#/components/parameters/";
pub const RESPONSES: &str = "#/components/responses/";
pub const HEADERS: &str = "#/components/headers/";
pub const LINKS: &str = "#/components/links/";
pub const REQUEST_BODIES: &str = "#/components/requestBodies/";

fn reference(name: &'static str, prefix: &'static str) -> EntityType {
    EntityType::define(name)
        .declare(
            AttributeDescriptor::field("ref", ValueType::String, Cardinality::Scalar)
                .output_key("$ref"),
        )
        .fields(["summary?", "description?"])
        .before_field_hook("ref", prefix_symbol(prefix))
        .alias("desc", "description")
        .build()
}

pub static PARAMETER_REFERENCE: Lazy<EntityType> =
    Lazy::new(|| reference("ParameterReference", PARAMETERS));

pub static RESPONSE_REFERENCE: Lazy<EntityType> =
    Lazy::new(|| reference("ResponseReference", RESPONSES));

pub static HEADER_REFERENCE: Lazy<EntityType> =
    Lazy::new(|| reference("HeaderReference", HEADERS));

pub static LINK_REFERENCE: Lazy<EntityType> = Lazy::new(|| reference("LinkReference", LINKS));

pub static REQUEST_BODY_REFERENCE: Lazy<EntityType> =
    Lazy::new(|| reference("RequestBodyReference", REQUEST_BODIES));

/// Component name of a local reference, if it points under `prefix`
pub fn component_name<'a>(reference: &'a str, prefix: &str) -> Option<&'a str> {
    reference.strip_prefix(prefix).filter(|name| !name.is_empty())
}
