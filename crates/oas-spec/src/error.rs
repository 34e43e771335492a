use thiserror::Error;

/// Result type for engine operations
pub type SpecResult<T> = Result<T, SpecError>;

/// Errors that can occur while building, hooking or reading entity instances
#[derive(Debug, Error)]
pub enum SpecError {
    /// No attribute, entry point or shortcut matches the requested name
    #[error("{entity} has no attribute named `{name}`")]
    NoSuchAttribute { entity: &'static str, name: String },

    /// A raw value matched none of the variants declared for its slot
    #[error("cannot resolve {entity}.{attribute} at `{path}`: {reason}")]
    UnresolvedVariant {
        entity: &'static str,
        attribute: String,
        path: String,
        reason: String,
    },

    /// A map entry point was called without a key and no hook supplied one
    #[error("{entity}.{attribute} needs a key")]
    MissingKey {
        entity: &'static str,
        attribute: String,
    },

    /// Arguments that do not fit the shape of the attribute they target
    #[error("invalid argument for {entity}.{name}: {message}")]
    InvalidArgument {
        entity: &'static str,
        name: String,
        message: String,
    },

    /// Domain error raised from inside a hook
    #[error("hook on `{attribute}` failed: {message}")]
    Hook { attribute: String, message: String },

    /// Malformed builder script
    #[error("script error: {0}")]
    Script(String),

    /// YAML decoding error while reading a builder script
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON conversion error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SpecError {
    /// Create a new unknown attribute error
    pub fn no_such_attribute<T: ToString>(entity: &'static str, name: T) -> Self {
        Self::NoSuchAttribute {
            entity,
            name: name.to_string(),
        }
    }

    /// Create a new variant resolution error
    pub fn unresolved_variant<A: ToString, P: ToString, R: ToString>(
        entity: &'static str,
        attribute: A,
        path: P,
        reason: R,
    ) -> Self {
        Self::UnresolvedVariant {
            entity,
            attribute: attribute.to_string(),
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new invalid argument error
    pub fn invalid_argument<N: ToString, M: ToString>(
        entity: &'static str,
        name: N,
        message: M,
    ) -> Self {
        Self::InvalidArgument {
            entity,
            name: name.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a new hook error
    pub fn hook_error<A: ToString, M: ToString>(attribute: A, message: M) -> Self {
        Self::Hook {
            attribute: attribute.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a new script error
    pub fn script_error<T: ToString>(msg: T) -> Self {
        Self::Script(msg.to_string())
    }
}
