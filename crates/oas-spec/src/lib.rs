/*!
# oas-spec

Descriptor-driven object engine for declaring, building, serializing and
reading document trees.

Entity types are declared once as static descriptor tables. Instances are
built through a single generic setter dispatch that understands scalar
fields, nested objects, arrays and keyed maps of objects, and values that may
be either. Hooks and shortcuts layer domain conveniences on top of that
dispatch. A finished instance serializes into an ordered key/value tree, and
the same descriptors read such a tree back into a read-only graph.

## Features

- Lazy, immutable per-type descriptor tables
- Closure, operation-list, bundle and YAML script construction
- Field, object and key hooks; map, block, object, field and alias shortcuts
- Ordered serialization through `serde`
- DOM reading with reference-vs-inline variant resolution

## Usage

```rust
use oas_spec::{bundle, Builder, EntityType, ValueType};
use once_cell::sync::Lazy;
use serde_json::json;

static CONTACT: Lazy<EntityType> = Lazy::new(|| {
    EntityType::define("Contact")
        .fields(["name?", "url?", "email?"])
        .build()
});

let contact = Builder::new(&CONTACT)
    .from_bundle(bundle! { "name" => "API team" })
    .unwrap();
assert_eq!(contact.to_tree(), json!({"name": "API team"}));
```
*/

// Re-export main types
pub use crate::{
    builder::Builder,
    descriptor::{AttributeDescriptor, AttributeKind, Cardinality, EntityRef, Variant, REFERENCE_KEY},
    error::{SpecError, SpecResult},
    hooks::{FieldHook, Hooks, KeyHook, ObjectHook},
    instance::{Instance, Keyed, Slot},
    op::{Block, Call, Op},
    reader::{read, Node},
    registry::{Declaration, EntityType},
    script::parse_script,
    shortcut::Shortcut,
    validate::{missing_required, MissingRequired},
    value::{sym, Bundle, Input, ValueType},
};

// Declarations
pub mod descriptor;
pub mod naming;
pub mod registry;

// Construction
pub mod builder;
pub mod hooks;
pub mod instance;
pub mod op;
pub mod script;
pub mod shortcut;
pub mod value;

// Output and input
pub mod reader;
pub mod serialize;
pub mod validate;

pub mod error;

/// Everything a schema author needs to declare and build entities
pub mod prelude {
    pub use crate::{
        bundle,
        hooks::{default_key, default_named, prefix_symbol},
        sym, AttributeDescriptor, Builder, Bundle, Call, Cardinality, EntityType, Input,
        Instance, Op, SpecError, SpecResult, ValueType, Variant,
    };
}

// Test utilities
#[cfg(test)]
mod test_utils;
