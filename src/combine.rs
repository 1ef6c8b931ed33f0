//! `oneOf` composition over finished schemas.

use serde_json::{json, Value};

use crate::error::SchemaDefinitionError;
use crate::schema::{Schema, ToJsonSchema};

/// One alternative of a [`OneOf`].
#[derive(Debug, Clone, PartialEq)]
pub enum Branch {
    Schema(Schema),
    OneOf(OneOf),
}

impl From<Schema> for Branch {
    fn from(schema: Schema) -> Self {
        Branch::Schema(schema)
    }
}

impl From<&Schema> for Branch {
    fn from(schema: &Schema) -> Self {
        Branch::Schema(schema.clone())
    }
}

impl From<OneOf> for Branch {
    fn from(one_of: OneOf) -> Self {
        Branch::OneOf(one_of)
    }
}

impl From<&OneOf> for Branch {
    fn from(one_of: &OneOf) -> Self {
        Branch::OneOf(one_of.clone())
    }
}

impl ToJsonSchema for Branch {
    fn to_json_schema(&self) -> Value {
        match self {
            Branch::Schema(schema) => schema.to_json_schema(),
            Branch::OneOf(one_of) => one_of.to_json_schema(),
        }
    }
}

/// Exactly one of the branches must match.
///
/// Compiles to `{"oneOf": [...]}` in branch order. It has no field
/// builders or structural operators; wrap it again to compose further.
#[derive(Debug, Clone, PartialEq)]
pub struct OneOf {
    branches: Vec<Branch>,
}

impl OneOf {
    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    /// A new combinator with `branch` appended.
    pub fn or(&self, branch: impl Into<Branch>) -> Self {
        let mut branches = self.branches.clone();
        branches.push(branch.into());
        Self { branches }
    }
}

impl ToJsonSchema for OneOf {
    fn to_json_schema(&self) -> Value {
        let branches: Vec<Value> = self.branches.iter().map(Branch::to_json_schema).collect();
        json!({ "oneOf": branches })
    }
}

/// Combine schemas so that exactly one of them must match.
///
/// # Errors
///
/// Returns `SchemaDefinitionError::EmptyOneOf` if `branches` is empty.
pub fn one_of<I, B>(branches: I) -> Result<OneOf, SchemaDefinitionError>
where
    I: IntoIterator<Item = B>,
    B: Into<Branch>,
{
    let branches: Vec<Branch> = branches.into_iter().map(Into::into).collect();
    if branches.is_empty() {
        return Err(SchemaDefinitionError::EmptyOneOf);
    }
    Ok(OneOf { branches })
}
