//! Core types shared by the builders and the validation adapter.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Option keys that configure the builder instead of landing in a fragment.
pub const BUILDER_FLAGS: &[&str] = &["optional", "nullable"];

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JSON Schema primitive type names used in `type` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Object,
    Array,
}

impl PrimitiveType {
    /// Returns the `type` keyword value for this primitive.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Null => "null",
            PrimitiveType::Object => "object",
            PrimitiveType::Array => "array",
        }
    }

    /// Parse a `type` keyword value.
    ///
    /// Returns `None` for unknown names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "string" => Some(PrimitiveType::String),
            "number" => Some(PrimitiveType::Number),
            "integer" => Some(PrimitiveType::Integer),
            "boolean" => Some(PrimitiveType::Boolean),
            "null" => Some(PrimitiveType::Null),
            "object" => Some(PrimitiveType::Object),
            "array" => Some(PrimitiveType::Array),
            _ => None,
        }
    }
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PrimitiveType> for Value {
    fn from(t: PrimitiveType) -> Self {
        Value::String(t.as_str().to_string())
    }
}

/// Per-field options.
///
/// `optional` and `nullable` drive the `required` list and the null
/// wrapper; every other keyword is copied into the field fragment in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    /// Leave the field out of `required`.
    pub optional: bool,
    /// Accept `null` alongside the field's type.
    pub nullable: bool,
    keywords: Map<String, Value>,
}

impl FieldOptions {
    /// Options for a required, non-nullable field with no extra keywords.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Set an arbitrary schema keyword on the fragment.
    ///
    /// `optional` and `nullable` passed here set the flags instead.
    pub fn keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            "optional" => self.optional = value.as_bool().unwrap_or(false),
            "nullable" => self.nullable = value.as_bool().unwrap_or(false),
            _ => {
                self.keywords.insert(name, value);
            }
        }
        self
    }

    pub fn min_length(self, n: u64) -> Self {
        self.keyword("minLength", n)
    }

    pub fn max_length(self, n: u64) -> Self {
        self.keyword("maxLength", n)
    }

    pub fn pattern(self, pattern: impl Into<String>) -> Self {
        self.keyword("pattern", pattern.into())
    }

    pub fn format(self, format: impl Into<String>) -> Self {
        self.keyword("format", format.into())
    }

    pub fn minimum(self, n: impl Into<Value>) -> Self {
        self.keyword("minimum", n)
    }

    pub fn maximum(self, n: impl Into<Value>) -> Self {
        self.keyword("maximum", n)
    }

    pub fn min_items(self, n: u64) -> Self {
        self.keyword("minItems", n)
    }

    pub fn max_items(self, n: u64) -> Self {
        self.keyword("maxItems", n)
    }

    pub fn description(self, text: impl Into<String>) -> Self {
        self.keyword("description", text.into())
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.keyword("default", value)
    }

    /// Keywords copied into the fragment, flags excluded.
    pub fn keywords(&self) -> &Map<String, Value> {
        &self.keywords
    }
}

/// Validator configuration passed through to the JSON Schema engine.
///
/// Whether a failure is reported as `false` or as an error is not an
/// option here: it follows from calling `validate` or `assert_valid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Enforce `format` keywords (`email`, `date-time`, ...).
    pub validate_formats: bool,
    /// Set `additionalProperties: false` on every object schema that
    /// leaves it open.
    pub strict: bool,
    /// Collect every failure instead of stopping at the first.
    pub all_errors: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            validate_formats: true,
            strict: false,
            all_errors: true,
        }
    }
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate_formats(mut self, validate_formats: bool) -> Self {
        self.validate_formats = validate_formats;
        self
    }

    /// Set strict mode (additionalProperties: false on all objects).
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn all_errors(mut self, all_errors: bool) -> Self {
        self.all_errors = all_errors;
        self
    }
}
