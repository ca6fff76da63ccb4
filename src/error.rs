//! Error types for schema resolution

use thiserror::Error;

use crate::schema::extensions::ExtensionError;

/// Result type for resolution operations
pub type Result<T> = std::result::Result<T, TypeModelError>;

/// Type model errors
#[derive(Error, Debug)]
pub enum TypeModelError {
    #[error("invalid value for {key:?}: {source}")]
    Extension {
        key: &'static str,
        #[source]
        source: ExtensionError,
    },

    #[error("unhandled schema type: {0}")]
    UnsupportedType(String),

    #[error("invalid format ({format}) for {kind}")]
    InvalidFormat { kind: &'static str, format: String },

    #[error("unresolvable reference {reference}: {reason}")]
    UnresolvableRef { reference: String, reason: String },

    #[error("unsupported schema shape at {path}: {reason}")]
    UnsupportedShape { path: String, reason: String },

    #[error("parameter '{0}' has no schema or content")]
    ParameterWithoutSchema(String),

    #[error("allOf reference cycle through {0}")]
    MergeCycle(String),

    #[error("property '{0}' already exists with a different type")]
    PropertyConflict(String),

    #[error("ambiguous discriminator.mapping: please replace inlined object {0} with $ref")]
    AmbiguousDiscriminator(String),

    #[error("discriminator {property:?}: not all schemas were mapped ({mapped} of {elements})")]
    DiscriminatorIncomplete {
        property: String,
        mapped: usize,
        elements: usize,
    },

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<TypeModelError>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl TypeModelError {
    /// Wrap this error with a description of where it happened.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any `Context` layers.
    pub fn root_cause(&self) -> &TypeModelError {
        match self {
            Self::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Attach context to the error side of a `Result`.
pub trait ResultExt<T> {
    fn context_with<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context_with<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| e.context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_skips_context() {
        let err = TypeModelError::PropertyConflict("id".to_string())
            .context("merging allOf")
            .context("property 'pet'");

        assert!(matches!(err.root_cause(), TypeModelError::PropertyConflict(name) if name == "id"));
        assert_eq!(
            err.to_string(),
            "property 'pet': merging allOf: property 'id' already exists with a different type"
        );
    }
}
