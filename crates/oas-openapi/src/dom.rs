/*!
Read-only access to parsed OpenAPI documents.

A document is decoded from JSON or YAML text and read through the same
entity declarations the builder uses, so every node exposes the declared
attribute names (`operation_id`, `request_body`, ...) rather than raw keys.
*/

use crate::{
    config::OutputFormat,
    error::{OpenApiError, OpenApiResult},
    specification::{reference::component_name, OPENAPI},
};
use oas_spec::{read, Instance, Node};
use serde_json::Value;
use std::path::Path;

/// A parsed, read-only OpenAPI document
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    root: Node,
}

impl OpenApiDocument {
    /// Read an already decoded document tree
    pub fn read(raw: &Value) -> OpenApiResult<Self> {
        Ok(Self {
            root: read(&OPENAPI, raw)?,
        })
    }

    /// Decode `text` in the given format and read it
    pub fn parse(text: &str, format: OutputFormat) -> OpenApiResult<Self> {
        let raw = match format {
            OutputFormat::Json => serde_json::from_str(text)?,
            OutputFormat::Yaml => {
                // Integer keys such as response codes become strings
                let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
                serde_json::to_value(yaml)?
            }
        };
        Self::read(&raw)
    }

    /// Load a document file, choosing the format from its extension
    pub fn load(path: impl AsRef<Path>) -> OpenApiResult<Self> {
        let path = path.as_ref();
        let format = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => OutputFormat::Yaml,
            _ => OutputFormat::Json,
        };
        tracing::debug!(path = %path.display(), ?format, "loading document");
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text, format)
    }

    /// Root `OpenAPI` node
    pub fn root(&self) -> &Instance {
        &self.root
    }

    pub fn openapi(&self) -> Option<&str> {
        self.root.str("openapi")
    }

    pub fn title(&self) -> Option<&str> {
        self.root.child("info").and_then(|info| info.str("title"))
    }

    /// Path items in document order
    pub fn paths(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.root.entries("paths").into_iter().flat_map(|paths| paths.iter())
    }

    /// Component schemas in document order
    pub fn schemas(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.components("schemas")
    }

    /// Entries of one `components` map, e.g. `parameters` or `request_bodies`
    pub fn components(&self, attribute: &str) -> impl Iterator<Item = (&str, &Instance)> {
        self.root
            .child("components")
            .and_then(|components| components.entries(attribute))
            .into_iter()
            .flat_map(|entries| entries.iter())
    }

    /// Follow `node`'s `$ref` into `components.<attribute>`, or return the
    /// node itself when it is inline
    pub fn resolve<'a>(
        &'a self,
        node: &'a Instance,
        attribute: &str,
        prefix: &str,
    ) -> OpenApiResult<&'a Instance> {
        let Some(reference) = node.str("ref") else {
            return Ok(node);
        };
        let target = component_name(reference, prefix).and_then(|name| {
            self.root
                .child("components")
                .and_then(|components| components.entries(attribute))
                .and_then(|entries| entries.get(name))
        });
        match target {
            Some(target) => {
                tracing::trace!(reference, "reference resolved");
                Ok(target)
            }
            None => Err(OpenApiError::reference_error(reference)),
        }
    }

    /// Serialize back into the document tree
    pub fn to_tree(&self) -> Value {
        self.root.to_tree()
    }
}
