//! Small entity catalog used by the engine's unit tests.

use crate::{
    descriptor::{AttributeDescriptor, Cardinality, Variant},
    hooks::{default_key, prefix_symbol},
    registry::EntityType,
    value::ValueType,
};
use once_cell::sync::Lazy;

pub static PET: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Pet")
        .field("name", ValueType::String)
        .field("status?", ValueType::String)
        .field("date_of_birth?", ValueType::String)
        .array_field("tags?", ValueType::String)
        .map_field("labels?", ValueType::String)
        .object("owner?", &OWNER)
        .array(
            "toys?",
            [
                Variant::new("toy", &TOY).positional(&[Some("name")]),
                Variant::reference("toy_ref", &TOY_REFERENCE).positional(&[Some("ref")]),
            ],
        )
        .map("notes?", [Variant::new("note", &NOTE)])
        .before_key_hook("notes", default_key("general"))
        .field_or_object("extra?", ValueType::Boolean, &TOY)
        .alias("nickname", "name")
        .field_shortcuts("status", [("good_boy", "good")])
        .map_shortcuts("note", [("first_note", "first")])
        .object_shortcuts("toy", [("squeaky", crate::bundle! { "squeaks" => true })])
        .build()
});

pub static OWNER: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Owner")
        .field("name", ValueType::String)
        .field("email?", ValueType::String)
        .map("pets?", [Variant::new("pet", &PET)])
        .build()
});

pub static TOY: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Toy")
        .field("name", ValueType::String)
        .field("squeaks?", ValueType::Boolean)
        .build()
});

pub static TOY_REFERENCE: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("ToyReference")
        .declare(
            AttributeDescriptor::field("ref", ValueType::String, Cardinality::Scalar)
                .output_key("$ref"),
        )
        .before_field_hook("ref", prefix_symbol("#/toys/"))
        .build()
});

pub static NOTE: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Note")
        .field("text", ValueType::String)
        .build()
});
