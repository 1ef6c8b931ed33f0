//! Validation of untyped input against compiled schemas.
//!
//! The JSON Schema engine does the checking; this module picks how a
//! failure surfaces. [`validate`] reports a boolean, [`assert_valid`]
//! returns the engine's errors, and [`Typed`] narrows a `serde_json::Value`
//! to a concrete Rust type once it has passed.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{SchemaError, ValidateError};
use crate::schema::ToJsonSchema;
use crate::types::ValidateOptions;

/// Check `input` against `schema`, reporting only pass/fail.
///
/// A schema that fails to compile validates nothing and yields `false`,
/// with a `warn!` event naming the compile error. Use [`assert_valid`]
/// to tell a broken schema (`ValidateError::InvalidSchema`) apart from
/// invalid input.
pub fn validate<S>(input: &Value, schema: &S, options: &ValidateOptions) -> bool
where
    S: ToJsonSchema + ?Sized,
{
    match compile(&schema.to_json_schema(), options) {
        Ok(validator) => {
            let valid = validator.is_valid(input);
            tracing::debug!(valid, "validated input");
            valid
        }
        Err(e) => {
            tracing::warn!(error = %e, "schema did not compile; reporting input as invalid");
            false
        }
    }
}

/// Check `input` against `schema`, returning the validator's errors.
///
/// # Errors
///
/// Returns `ValidateError::InvalidSchema` if the schema does not compile,
/// or `ValidateError::Invalid` carrying the validator's messages.
pub fn assert_valid<S>(
    input: &Value,
    schema: &S,
    options: &ValidateOptions,
) -> Result<(), ValidateError>
where
    S: ToJsonSchema + ?Sized,
{
    let validator = compile(&schema.to_json_schema(), options)?;
    check(&validator, input, options)
}

/// A compiled schema bound to the Rust type it describes.
///
/// `T` is the pure type: what the data looks like after it passed. Input
/// is the dirty `serde_json::Value`.
pub struct Typed<T> {
    document: Value,
    options: ValidateOptions,
    validator: jsonschema::Validator,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Typed<T> {
    /// Compile `schema` with default options.
    pub fn new<S>(schema: &S) -> Result<Self, ValidateError>
    where
        S: ToJsonSchema + ?Sized,
    {
        Self::with_options(schema, ValidateOptions::default())
    }

    pub fn with_options<S>(schema: &S, options: ValidateOptions) -> Result<Self, ValidateError>
    where
        S: ToJsonSchema + ?Sized,
    {
        let document = schema.to_json_schema();
        let validator = compile(&document, &options)?;
        Ok(Self {
            document,
            options,
            validator,
            _marker: PhantomData,
        })
    }

    /// The JSON Schema document this was compiled from.
    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn is_valid(&self, dirty: &Value) -> bool {
        self.validator.is_valid(dirty)
    }

    /// Type guard: `Some(T)` when `dirty` passes and fits `T`.
    pub fn narrow(&self, dirty: &Value) -> Option<T> {
        if !self.validator.is_valid(dirty) {
            return None;
        }
        serde_json::from_value(dirty.clone()).ok()
    }

    /// Assertion: `T` or the validator's errors.
    ///
    /// # Errors
    ///
    /// Returns `ValidateError::Invalid` when `dirty` fails the schema, or
    /// `ValidateError::Deserialize` when it passes but does not fit `T`.
    pub fn parse(&self, dirty: Value) -> Result<T, ValidateError> {
        check(&self.validator, &dirty, &self.options)?;
        serde_json::from_value(dirty).map_err(|source| ValidateError::Deserialize { source })
    }
}

impl<T> std::fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typed")
            .field("target", &std::any::type_name::<T>())
            .field("document", &self.document)
            .field("options", &self.options)
            .finish()
    }
}

impl crate::schema::Schema {
    /// Bind this schema to the pure type `T`.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<Typed<T>, ValidateError> {
        Typed::new(self)
    }
}

impl crate::combine::OneOf {
    /// Bind this combinator to the pure type `T`.
    pub fn typed<T: DeserializeOwned>(&self) -> Result<Typed<T>, ValidateError> {
        Typed::new(self)
    }
}

// --- Internal implementation ---

fn compile(
    document: &Value,
    options: &ValidateOptions,
) -> Result<jsonschema::Validator, ValidateError> {
    let document = if options.strict {
        let mut closed = document.clone();
        close_additional_properties(&mut closed);
        closed
    } else {
        document.clone()
    };

    tracing::debug!(strict = options.strict, "compiling schema");
    jsonschema::options()
        .with_draft(jsonschema::Draft::Draft7)
        .should_validate_formats(options.validate_formats)
        .build(&document)
        .map_err(|e| ValidateError::InvalidSchema {
            message: e.to_string(),
        })
}

fn check(
    validator: &jsonschema::Validator,
    input: &Value,
    options: &ValidateOptions,
) -> Result<(), ValidateError> {
    let limit = if options.all_errors { usize::MAX } else { 1 };
    let errors: Vec<SchemaError> = validator
        .iter_errors(input)
        .take(limit)
        .map(|e| SchemaError {
            path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        tracing::debug!(count = errors.len(), "validation failed");
        Err(ValidateError::Invalid { errors })
    }
}

/// Recursively set `additionalProperties: false` on all object schemas.
///
/// Only sets the value if `additionalProperties` is missing or `true`.
/// A custom `additionalProperties` schema is left untouched.
fn close_additional_properties(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    let is_object_schema = map.get("type").and_then(Value::as_str) == Some("object")
        || map.contains_key("properties");

    if is_object_schema {
        match map.get("additionalProperties") {
            None | Some(Value::Bool(true)) => {
                map.insert("additionalProperties".to_string(), Value::Bool(false));
            }
            _ => {}
        }
    }

    for (key, child) in map.iter_mut() {
        match key.as_str() {
            "properties" => {
                if let Value::Object(props) = child {
                    for prop in props.values_mut() {
                        close_additional_properties(prop);
                    }
                }
            }
            "items" | "additionalProperties" => close_additional_properties(child),
            "oneOf" | "anyOf" | "allOf" => {
                if let Value::Array(branches) = child {
                    for branch in branches {
                        close_additional_properties(branch);
                    }
                }
            }
            _ => {}
        }
    }
}
