//! Fluent JSON Schema Builder
//!
//! Build JSON Schema (Draft 7) object schemas with an immutable, chainable
//! API, compose them, and validate untyped input against the result.
//!
//! # Example
//!
//! ```
//! use fluent_schema::{
//!     assert_valid, validate, FieldOptions, Schema, ToJsonSchema, ValidateOptions,
//! };
//! use serde_json::json;
//!
//! let user = Schema::new()
//!     .string("name", FieldOptions::new().min_length(1))
//!     .integer("age", FieldOptions::new().optional(true).nullable(true));
//!
//! assert_eq!(
//!     user.to_json_schema(),
//!     json!({
//!         "type": "object",
//!         "properties": {
//!             "name": { "type": "string", "minLength": 1 },
//!             "age": { "oneOf": [{ "type": "integer" }, { "type": "null" }] }
//!         },
//!         "required": ["name"]
//!     })
//! );
//!
//! let options = ValidateOptions::default();
//! assert!(validate(&json!({ "name": "a", "age": null }), &user, &options));
//! assert!(assert_valid(&json!({ "name": 1 }), &user, &options).is_err());
//! ```
//!
//! # Fragments
//!
//! | Builder | Fragment |
//! |---------|----------|
//! | `string`, `number`, `integer`, `boolean` | `{"type": T, ...keywords}` |
//! | `null` | `{"type": "null"}` (never wrapped) |
//! | `enumeration` | `{"type": T, "enum": [...], ...}` |
//! | `constant` | `{"const": v, ...}` |
//! | `array` | `{"type": "array", "items": {...}, ...}` |
//! | `object` | `{"type": "object", ...nested}` |
//!
//! A nullable field becomes `{"oneOf": [<fragment>, {"type": "null"}]}`.
//! Optional fields are left out of `required`.
//!
//! # Composition
//!
//! `pick`, `omit` and `extend` derive new schemas from existing ones;
//! [`one_of`] combines finished schemas into an exactly-one-of schema.
//! Every operation returns a new value and leaves its inputs usable.

mod combine;
mod error;
mod fragment;
mod linter;
mod loader;
mod schema;
mod types;
mod validator;

pub use combine::{one_of, Branch, OneOf};
pub use error::{LoadError, SchemaDefinitionError, SchemaError, ValidateError};
pub use fragment::{ItemSpec, ObjectDefinition};
pub use linter::{
    lint, lint_document, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity,
};
pub use loader::{load_branch, load_schema, load_schema_str};
pub use schema::{Schema, ToJsonSchema};
pub use types::{json_type_name, FieldOptions, PrimitiveType, ValidateOptions};
pub use validator::{assert_valid, validate, Typed};
