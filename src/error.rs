//! Error types for schema construction, loading, and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while defining or composing a schema.
///
/// The fluent builder itself never fails; these come from the strict
/// structural operators, the combinator, and from re-opening compiled
/// documents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaDefinitionError {
    #[error("unknown field \"{name}\": not present in schema properties")]
    UnknownField { name: String },

    #[error("oneOf requires at least one branch")]
    EmptyOneOf,

    #[error("not an object schema: expected root type \"object\", got {actual}")]
    NotAnObjectSchema { actual: String },

    #[error("invalid definition at {path}: {message}")]
    InvalidDefinition { path: String, message: String },
}

/// Errors while reading schema or payload documents.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Definition(#[from] SchemaDefinitionError),
}

/// Errors during validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("validation failed with {} error(s): {}", errors.len(), first_message(errors))]
    Invalid { errors: Vec<SchemaError> },

    #[error("validated input does not fit target type: {source}")]
    Deserialize {
        #[source]
        source: serde_json::Error,
    },
}

fn first_message(errors: &[SchemaError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Single validation failure reported by the validator.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaError {
    /// JSON Pointer (RFC 6901) to the invalid part of the instance.
    pub path: String,
    /// JSON Pointer to the schema keyword that rejected it.
    pub schema_path: String,
    /// The validator's message, unmodified.
    pub message: String,
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "/: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl SchemaDefinitionError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
            LoadError::Definition(e) => e.exit_code(),
        }
    }
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Invalid { .. } | ValidateError::Deserialize { .. } => 1,
            ValidateError::InvalidSchema { .. } => 2,
        }
    }

    /// The individual validator failures, empty for non-validation errors.
    pub fn errors(&self) -> &[SchemaError] {
        match self {
            ValidateError::Invalid { errors } => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("schema.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::Definition(SchemaDefinitionError::NotAnObjectSchema {
            actual: "string".into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn validate_error_exit_codes() {
        let err = ValidateError::Invalid {
            errors: vec![SchemaError {
                path: "/name".into(),
                schema_path: "/properties/name/type".into(),
                message: r#"1 is not of type "string""#.into(),
            }],
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.errors().len(), 1);

        let err = ValidateError::InvalidSchema {
            message: "bad".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.errors().is_empty());
    }

    #[test]
    fn invalid_display_includes_first_message() {
        let err = ValidateError::Invalid {
            errors: vec![SchemaError {
                path: "/age".into(),
                schema_path: "/properties/age/type".into(),
                message: r#""x" is not of type "integer""#.into(),
            }],
        };
        let text = err.to_string();
        assert!(text.starts_with("validation failed with 1 error(s)"));
        assert!(text.contains("/age"));
        assert!(text.contains("integer"));
    }

    #[test]
    fn schema_error_display_root_path() {
        let err = SchemaError {
            path: String::new(),
            schema_path: "/required".into(),
            message: r#""name" is a required property"#.into(),
        };
        assert_eq!(err.to_string(), r#"/: "name" is a required property"#);
    }
}
