/*!
# oas-openapi

OpenAPI 3.1 document authoring and reading on top of the `oas-spec` engine.

This crate declares the OpenAPI object model as entity types, builds
documents from closures or YAML builder scripts, renders them as JSON or
YAML, and reads existing documents back into a navigable tree.

## Features

- The full OpenAPI 3.1 object model with reference variants
- Schema, content, parameter and security conveniences
- JSON and YAML rendering with opt-in required-field validation
- Document reading with `$ref` resolution against components
- Endpoint extraction and companion TypeScript declarations

## Usage

```rust
use oas_openapi::{DocumentConfig, OpenApiGenerator};

let mut generator = OpenApiGenerator::new(DocumentConfig::default().with_pretty_print(false));
generator
    .generate_script(
        r#"
- info:
    title: Pets
    version: "1.0"
- path:
    args: /pets
    do:
      - get:
          oid: ":listPets"
          do:
            - response:
                args: 200
                desc: All pets
                schema: [":Pet"]
"#,
    )
    .unwrap();
assert!(generator.render().unwrap().starts_with(r#"{"openapi":"3.1.0","info":{"title":"Pets""#));
```
*/

// Re-export main types
pub use crate::{
    config::{DocumentConfig, OutputFormat, TypingsConfig},
    dom::OpenApiDocument,
    endpoints::{EndpointDiscovery, EndpointMetadata},
    error::{OpenApiError, OpenApiResult},
    generator::OpenApiGenerator,
    specification::{COMPONENTS, INFO, OPENAPI, OPERATION, PATH_ITEM, SCHEMA},
    typings::TypingsGenerator,
};

// Core modules
pub mod config;
pub mod error;
pub mod generator;
pub mod specification;

// Reading documents
pub mod dom;
pub mod endpoints;

// Companion declarations
pub mod typings;

// Test utilities
#[cfg(test)]
mod test_utils;
