use crate::{
    config::{DocumentConfig, OutputFormat},
    dom::OpenApiDocument,
    error::{OpenApiError, OpenApiResult},
    specification::OPENAPI,
    typings::TypingsGenerator,
};
use oas_spec::{missing_required, Builder, Instance, Op};
use std::path::Path;

/// Main OpenAPI document generator
pub struct OpenApiGenerator {
    /// Configuration
    config: DocumentConfig,
    /// Generated document
    document: Option<Instance>,
}

impl OpenApiGenerator {
    /// Create a new OpenAPI generator
    pub fn new(config: DocumentConfig) -> Self {
        Self {
            config,
            document: None,
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    /// Generate a document by running `f` against the root object
    pub fn generate<F>(&mut self, f: F) -> OpenApiResult<&Instance>
    where
        F: FnOnce(&mut Instance) -> oas_spec::SpecResult<()>,
    {
        let document = Builder::new(&OPENAPI).build(f)?;
        self.finish(document)
    }

    /// Generate a document from a data-driven operation sequence
    pub fn generate_ops(&mut self, ops: Vec<Op>) -> OpenApiResult<&Instance> {
        let document = Builder::new(&OPENAPI).from_ops(ops)?;
        self.finish(document)
    }

    /// Generate a document from builder script text
    pub fn generate_script(&mut self, script: &str) -> OpenApiResult<&Instance> {
        let document = Builder::new(&OPENAPI).from_script(script)?;
        self.finish(document)
    }

    /// Generate a document from a builder script file
    pub fn generate_file(&mut self, path: impl AsRef<Path>) -> OpenApiResult<&Instance> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "generating document from script");
        let script = std::fs::read_to_string(path)?;
        self.generate_script(&script)
    }

    fn finish(&mut self, mut document: Instance) -> OpenApiResult<&Instance> {
        if !document.is_set("openapi") {
            document.set("openapi", self.config.openapi_version.as_str())?;
        }
        if self.config.validate_required {
            validate_document(&document)?;
        }
        tracing::debug!(
            paths = document.entries("paths").map_or(0, |paths| paths.len()),
            "document generated"
        );
        Ok(&*self.document.insert(document))
    }

    /// Get the generated document
    pub fn document(&self) -> Option<&Instance> {
        self.document.as_ref()
    }

    /// Export document as JSON
    pub fn export_json(&self, pretty: bool) -> OpenApiResult<String> {
        let document = self.generated()?;

        if pretty {
            serde_json::to_string_pretty(document).map_err(OpenApiError::from)
        } else {
            serde_json::to_string(document).map_err(OpenApiError::from)
        }
    }

    /// Export document as YAML
    pub fn export_yaml(&self) -> OpenApiResult<String> {
        let document = self.generated()?;

        serde_yaml::to_string(document).map_err(OpenApiError::from)
    }

    /// Render in the configured format
    pub fn render(&self) -> OpenApiResult<String> {
        match self.config.format {
            OutputFormat::Json => self.export_json(self.config.pretty_print),
            OutputFormat::Yaml => self.export_yaml(),
        }
    }

    /// Render in the configured format and write to `path`
    pub fn write(&self, path: impl AsRef<Path>) -> OpenApiResult<()> {
        let rendered = self.render()?;
        std::fs::write(path.as_ref(), rendered)?;
        tracing::info!(path = %path.as_ref().display(), "document written");
        Ok(())
    }

    /// Check the generated document for unset required attributes
    pub fn validate(&self) -> OpenApiResult<()> {
        validate_document(self.generated()?)
    }

    /// Read the generated document back through the DOM
    pub fn read_back(&self) -> OpenApiResult<OpenApiDocument> {
        OpenApiDocument::read(&self.generated()?.to_tree())
    }

    /// Companion TypeScript declarations for the generated document
    pub fn typings(&self) -> OpenApiResult<String> {
        let document = self.read_back()?;
        TypingsGenerator::new(self.config.typings.clone())?.generate(&document)
    }

    fn generated(&self) -> OpenApiResult<&Instance> {
        self.document.as_ref().ok_or_else(|| {
            OpenApiError::generic("No document generated yet. Call generate() first.")
        })
    }
}

/// Fail with every unset required attribute in `document`
pub fn validate_document(document: &Instance) -> OpenApiResult<()> {
    let missing = missing_required(document);
    if missing.is_empty() {
        return Ok(());
    }
    for entry in &missing {
        tracing::warn!(%entry, "required attribute missing");
    }
    let message = missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(OpenApiError::validation_error(message))
}
