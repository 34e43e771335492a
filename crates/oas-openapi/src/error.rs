use oas_spec::SpecError;
use thiserror::Error;

/// Result type for OpenAPI document operations
pub type OpenApiResult<T> = Result<T, OpenApiError>;

/// Errors that can occur while authoring, rendering or reading documents
#[derive(Debug, Error)]
pub enum OpenApiError {
    /// Building or reading an entity failed
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// A `$ref` that does not point into the document's components
    #[error("Unresolved reference: {0}")]
    Reference(String),

    /// Generic error with context
    #[error("OpenAPI error: {0}")]
    Generic(String),
}

impl OpenApiError {
    /// Create a new configuration error
    pub fn config_error<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }

    /// Create a new validation error
    pub fn validation_error<T: ToString>(msg: T) -> Self {
        Self::Validation(msg.to_string())
    }

    /// Create a new unresolved reference error
    pub fn reference_error<T: ToString>(reference: T) -> Self {
        Self::Reference(reference.to_string())
    }

    /// Create a generic error
    pub fn generic<T: ToString>(msg: T) -> Self {
        Self::Generic(msg.to_string())
    }
}
