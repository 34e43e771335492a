//! Shared fixtures for unit tests.

use crate::{config::DocumentConfig, dom::OpenApiDocument, generator::OpenApiGenerator};

/// Small pet store script: one schema, a create and a read operation
pub const PETS_SCRIPT: &str = include_str!("../tests/fixtures/pets.oas.yaml");

/// Company API script with shared path parameters and a security scheme
pub const COMPANY_SCRIPT: &str = include_str!("../tests/fixtures/company.oas.yaml");

/// Build `script` with the default configuration and read the result back
pub fn read_script(script: &str) -> OpenApiDocument {
    let mut generator = OpenApiGenerator::new(DocumentConfig::default());
    let document = generator.generate_script(script).unwrap();
    OpenApiDocument::read(&document.to_tree()).unwrap()
}
