//! Reusable components, security schemes and the document root.

use super::{
    info::{EXTERNAL_DOCS, INFO, SERVER, TAG},
    operation::{security_requirement, HEADER, LINK, PARAMETER, PATH_ITEM, REQUEST_BODY, RESPONSE},
    schema::{schema_arguments, SCHEMA},
};
use oas_spec::{EntityType, ValueType, Variant};
use once_cell::sync::Lazy;

pub static OAUTH_FLOW: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("OAuthFlow")
        .fields(["authorization_url?", "token_url?", "refresh_url?"])
        .map_field("scopes", ValueType::String)
        .build()
});

pub static OAUTH_FLOWS: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("OAuthFlows")
        .object("implicit?", &OAUTH_FLOW)
        .object("password?", &OAUTH_FLOW)
        .object("client_credentials?", &OAUTH_FLOW)
        .object("authorization_code?", &OAUTH_FLOW)
        .build()
});

pub static SECURITY_SCHEME: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("SecurityScheme")
        .fields([
            "type",
            "description?",
            "name?",
            "in?",
            "scheme?",
            "bearer_format?",
        ])
        .object("flows?", &OAUTH_FLOWS)
        .field("open_id_connect_url?", ValueType::String)
        .alias("desc", "description")
        .build()
});

pub static COMPONENTS: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Components")
        .map("schemas?", [Variant::new("schema", &SCHEMA)])
        .map("responses?", [Variant::new("response", &RESPONSE)])
        .map("parameters?", [Variant::new("parameter", &PARAMETER)])
        .map("request_bodies?", [Variant::new("request_body", &REQUEST_BODY)])
        .map("headers?", [Variant::new("header", &HEADER)])
        .map(
            "security_schemes?",
            [Variant::new("security_scheme", &SECURITY_SCHEME)],
        )
        .map("links?", [Variant::new("link", &LINK)])
        .map("path_items?", [Variant::new("path_item", &PATH_ITEM)])
        .before_object_hook("schemas", schema_arguments())
        .build()
});

/// Root document object
pub static OPENAPI: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("OpenAPI")
        .field("openapi", ValueType::String)
        .object("info", &INFO)
        .field("json_schema_dialect?", ValueType::String)
        .array("servers?", [Variant::new("server", &SERVER)])
        .map("paths?", [Variant::new("path", &PATH_ITEM)])
        .map("webhooks?", [Variant::new("webhook", &PATH_ITEM)])
        .object("components?", &COMPONENTS)
        .array_field("security?", ValueType::Object)
        .array("tags?", [Variant::new("tag", &TAG).positional(&[Some("name")])])
        .object("external_docs?", &EXTERNAL_DOCS)
        .before_field_hook("security", security_requirement())
        .build()
});
