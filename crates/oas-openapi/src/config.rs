use crate::error::{OpenApiError, OpenApiResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for document generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Version written to `openapi` when the document does not set one
    pub openapi_version: String,

    /// Output format used by [`crate::OpenApiGenerator::render`]
    pub format: OutputFormat,

    /// Pretty print JSON output
    pub pretty_print: bool,

    /// Reject documents with unset required attributes before rendering
    pub validate_required: bool,

    /// Companion TypeScript declaration settings
    pub typings: TypingsConfig,
}

/// Available output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
}

/// Settings for [`crate::typings::TypingsGenerator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypingsConfig {
    /// Module the generated declarations import `components` and
    /// `operations` from
    pub types_module: String,

    /// `$id` given to the exported schema map
    pub schemas_id: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            openapi_version: "3.1.0".to_string(),
            format: OutputFormat::Json,
            pretty_print: true,
            validate_required: false,
            typings: TypingsConfig::default(),
        }
    }
}

impl Default for TypingsConfig {
    fn default() -> Self {
        Self {
            types_module: "./openapi.d.ts".to_string(),
            schemas_id: "schemas.json".to_string(),
        }
    }
}

impl DocumentConfig {
    /// Load a configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> OpenApiResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml(content: &str) -> OpenApiResult<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| OpenApiError::config_error(format!("invalid configuration: {}", e)))?;
        if config.openapi_version.trim().is_empty() {
            return Err(OpenApiError::config_error("openapi_version must not be empty"));
        }
        Ok(config)
    }

    pub fn with_openapi_version(mut self, version: &str) -> Self {
        self.openapi_version = version.to_string();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    pub fn with_validate_required(mut self, validate_required: bool) -> Self {
        self.validate_required = validate_required;
        self
    }

    pub fn with_typings(mut self, types_module: &str, schemas_id: &str) -> Self {
        self.typings = TypingsConfig {
            types_module: types_module.to_string(),
            schemas_id: schemas_id.to_string(),
        };
        self
    }
}
