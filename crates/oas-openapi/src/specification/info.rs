//! Document metadata: info, servers, tags and external documentation.

use oas_spec::{EntityType, ValueType, Variant};
use once_cell::sync::Lazy;

pub static CONTACT: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Contact")
        .fields(["name?", "url?", "email?"])
        .build()
});

pub static LICENSE: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("License")
        .fields(["name", "identifier?", "url?"])
        .build()
});

pub static INFO: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Info")
        .fields([
            "title",
            "summary?",
            "description?",
            "terms_of_service?",
            "version",
        ])
        .object("contact?", &CONTACT)
        .object("license?", &LICENSE)
        .alias("desc", "description")
        .build()
});

pub static SERVER_VARIABLE: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("ServerVariable")
        .fields(["default", "description?"])
        .array_field("enum?", ValueType::String)
        .alias("desc", "description")
        .build()
});

pub static SERVER: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Server")
        .fields(["url", "description?"])
        .map("variables?", [Variant::new("variable", &SERVER_VARIABLE)])
        .alias("desc", "description")
        .build()
});

pub static EXTERNAL_DOCS: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("ExternalDocumentation")
        .fields(["description?", "url"])
        .alias("desc", "description")
        .build()
});

pub static TAG: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Tag")
        .fields(["name", "description?"])
        .object("external_docs?", &EXTERNAL_DOCS)
        .alias("desc", "description")
        .build()
});
