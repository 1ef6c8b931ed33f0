//! Loading JSON documents and re-opening compiled schemas.

use std::path::Path;

use serde_json::{Map, Value};

use crate::combine::{one_of, Branch};
use crate::error::{LoadError, SchemaDefinitionError};
use crate::schema::{Schema, STRUCTURAL_KEYS};
use crate::types::json_type_name;

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// or `LoadError::InvalidJson` if the file isn't valid JSON.
pub fn load_schema(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "loaded document");
    load_schema_str(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON.
pub fn load_schema_str(content: &str) -> Result<Value, LoadError> {
    serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })
}

/// Load a file and re-open it as a schema or combinator branch.
pub fn load_branch(path: &Path) -> Result<Branch, LoadError> {
    let document = load_schema(path)?;
    Ok(Branch::from_json_schema(&document)?)
}

impl Schema {
    /// Rebuild an accumulator from a compiled object schema.
    ///
    /// The root must be `type: "object"` (or carry `properties` without a
    /// `type`). Property fragments are taken as-is, and every other root
    /// keyword is kept so operators on the result do not loosen it.
    ///
    /// # Errors
    ///
    /// Returns `SchemaDefinitionError::NotAnObjectSchema` for other roots
    /// and `SchemaDefinitionError::InvalidDefinition` for malformed
    /// `properties` or `required`.
    pub fn from_json_schema(document: &Value) -> Result<Self, SchemaDefinitionError> {
        let Value::Object(root) = document else {
            return Err(SchemaDefinitionError::NotAnObjectSchema {
                actual: json_type_name(document).to_string(),
            });
        };

        match root.get("type") {
            Some(Value::String(t)) if t == "object" => {}
            None if root.contains_key("properties") => {}
            Some(Value::String(t)) => {
                return Err(SchemaDefinitionError::NotAnObjectSchema { actual: t.clone() })
            }
            Some(other) => {
                return Err(SchemaDefinitionError::NotAnObjectSchema {
                    actual: other.to_string(),
                })
            }
            None => {
                return Err(SchemaDefinitionError::NotAnObjectSchema {
                    actual: "untyped schema".to_string(),
                })
            }
        }

        let properties = match root.get("properties") {
            None => Map::new(),
            Some(Value::Object(props)) => props.clone(),
            Some(other) => {
                return Err(SchemaDefinitionError::InvalidDefinition {
                    path: "/properties".to_string(),
                    message: format!("expected object, got {}", json_type_name(other)),
                })
            }
        };

        let required = match root.get("required") {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_str().map(String::from).ok_or_else(|| {
                        SchemaDefinitionError::InvalidDefinition {
                            path: format!("/required/{}", i),
                            message: format!("expected string, got {}", json_type_name(item)),
                        }
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(SchemaDefinitionError::InvalidDefinition {
                    path: "/required".to_string(),
                    message: format!("expected array, got {}", json_type_name(other)),
                })
            }
        };

        let keywords: Map<String, Value> = root
            .iter()
            .filter(|(key, _)| !STRUCTURAL_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Schema::from_parts(properties, required).with_keywords(keywords))
    }
}

impl Branch {
    /// Re-open a compiled document: `{"oneOf": [...]}` becomes a combinator,
    /// anything else must be an object schema.
    pub fn from_json_schema(document: &Value) -> Result<Self, SchemaDefinitionError> {
        match document.get("oneOf") {
            Some(Value::Array(branches)) => {
                let branches = branches
                    .iter()
                    .map(Branch::from_json_schema)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Branch::OneOf(one_of(branches)?))
            }
            Some(other) => Err(SchemaDefinitionError::InvalidDefinition {
                path: "/oneOf".to_string(),
                message: format!("expected array, got {}", json_type_name(other)),
            }),
            None => Ok(Branch::Schema(Schema::from_json_schema(document)?)),
        }
    }
}
