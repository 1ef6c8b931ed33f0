//! Field fragments: one JSON Schema (Draft 7) description per field.
//!
//! Every builder here is a pure function from a field name and options to
//! a [`FieldDescriptor`]: the fragment stored under that name plus whether
//! the name belongs in `required`.
//!
//! Nullable fields are wrapped as `{"oneOf": [<fragment>, {"type": "null"}]}`,
//! never as a `type` union.

use serde_json::{json, Map, Value};

use crate::schema::ToJsonSchema;
use crate::types::{FieldOptions, PrimitiveType, BUILDER_FLAGS};

/// A finished field: name, fragment, and required flag.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FieldDescriptor {
    pub name: String,
    pub fragment: Value,
    pub required: bool,
}

/// Element description for array fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemSpec {
    /// Items of a primitive type, with item-level options.
    Primitive {
        item_type: PrimitiveType,
        options: FieldOptions,
    },
    /// Items described by an already compiled schema.
    Compiled(Value),
}

impl ItemSpec {
    pub fn of(item_type: PrimitiveType) -> Self {
        ItemSpec::Primitive {
            item_type,
            options: FieldOptions::new(),
        }
    }

    pub fn with_options(item_type: PrimitiveType, options: FieldOptions) -> Self {
        ItemSpec::Primitive { item_type, options }
    }

    /// Items matching a nested schema or combinator.
    pub fn schema<S: ToJsonSchema + ?Sized>(schema: &S) -> Self {
        ItemSpec::Compiled(schema.to_json_schema())
    }

    fn to_fragment(&self) -> Value {
        match self {
            ItemSpec::Primitive { item_type, options } => {
                let fragment = typed_fragment(*item_type, options.keywords());
                if *item_type == PrimitiveType::Null {
                    fragment
                } else {
                    wrap_nullable(fragment, options.nullable)
                }
            }
            ItemSpec::Compiled(value) => value.clone(),
        }
    }
}

impl From<PrimitiveType> for ItemSpec {
    fn from(item_type: PrimitiveType) -> Self {
        ItemSpec::of(item_type)
    }
}

impl From<&crate::schema::Schema> for ItemSpec {
    fn from(schema: &crate::schema::Schema) -> Self {
        ItemSpec::schema(schema)
    }
}

impl From<&crate::combine::OneOf> for ItemSpec {
    fn from(one_of: &crate::combine::OneOf) -> Self {
        ItemSpec::schema(one_of)
    }
}

/// Nested definition for object fields.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectDefinition {
    /// A compiled nested schema; carries no nullability of its own.
    Compiled(Value),
    /// A raw JSON object definition copied key by key. A `nullable: true`
    /// key marks the nested object as nullable and is not copied.
    Raw(Map<String, Value>),
}

impl ObjectDefinition {
    pub fn schema<S: ToJsonSchema + ?Sized>(schema: &S) -> Self {
        ObjectDefinition::Compiled(schema.to_json_schema())
    }

    fn is_nullable(&self) -> bool {
        match self {
            ObjectDefinition::Compiled(_) => false,
            ObjectDefinition::Raw(map) => map
                .get("nullable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

impl From<&crate::schema::Schema> for ObjectDefinition {
    fn from(schema: &crate::schema::Schema) -> Self {
        ObjectDefinition::schema(schema)
    }
}

impl From<Map<String, Value>> for ObjectDefinition {
    fn from(map: Map<String, Value>) -> Self {
        ObjectDefinition::Raw(map)
    }
}

/// Scalar field (`string`, `number`, `integer`, `boolean`).
pub(crate) fn primitive(
    name: &str,
    field_type: PrimitiveType,
    options: &FieldOptions,
) -> FieldDescriptor {
    if field_type == PrimitiveType::Null {
        return null(name, options);
    }
    let fragment = typed_fragment(field_type, options.keywords());
    descriptor(name, wrap_nullable(fragment, options.nullable), options)
}

/// Null field. `nullable` has no effect here.
pub(crate) fn null(name: &str, options: &FieldOptions) -> FieldDescriptor {
    let fragment = typed_fragment(PrimitiveType::Null, options.keywords());
    descriptor(name, fragment, options)
}

pub(crate) fn enumeration(
    name: &str,
    field_type: PrimitiveType,
    values: Vec<Value>,
    options: &FieldOptions,
) -> FieldDescriptor {
    let mut fragment = Map::new();
    fragment.insert("type".to_string(), field_type.into());
    fragment.insert("enum".to_string(), Value::Array(values));
    copy_keywords(&mut fragment, options.keywords());
    descriptor(
        name,
        wrap_nullable(Value::Object(fragment), options.nullable),
        options,
    )
}

pub(crate) fn constant(name: &str, value: Value, options: &FieldOptions) -> FieldDescriptor {
    let mut fragment = Map::new();
    fragment.insert("const".to_string(), value);
    copy_keywords(&mut fragment, options.keywords());
    descriptor(
        name,
        wrap_nullable(Value::Object(fragment), options.nullable),
        options,
    )
}

/// Array field; `options.nullable` wraps the whole array fragment.
pub(crate) fn array(name: &str, items: &ItemSpec, options: &FieldOptions) -> FieldDescriptor {
    let mut fragment = Map::new();
    fragment.insert("type".to_string(), PrimitiveType::Array.into());
    fragment.insert("items".to_string(), items.to_fragment());
    copy_keywords(&mut fragment, options.keywords());
    descriptor(
        name,
        wrap_nullable(Value::Object(fragment), options.nullable),
        options,
    )
}

/// Object field.
///
/// The nested definition is merged over `{"type": "object"}`, then the
/// field keywords. The null wrapper applies when either the field options
/// or a raw definition ask for it.
pub(crate) fn object(
    name: &str,
    definition: &ObjectDefinition,
    options: &FieldOptions,
) -> FieldDescriptor {
    let mut fragment = Map::new();
    fragment.insert("type".to_string(), PrimitiveType::Object.into());
    match definition {
        ObjectDefinition::Compiled(Value::Object(map)) => copy_keywords(&mut fragment, map),
        ObjectDefinition::Compiled(_) => {}
        ObjectDefinition::Raw(map) => copy_keywords(&mut fragment, map),
    }
    copy_keywords(&mut fragment, options.keywords());

    let nullable = options.nullable || definition.is_nullable();
    descriptor(name, wrap_nullable(Value::Object(fragment), nullable), options)
}

/// Wrap a fragment as `oneOf [fragment, null]` when `nullable` is set.
pub(crate) fn wrap_nullable(fragment: Value, nullable: bool) -> Value {
    if nullable {
        json!({ "oneOf": [fragment, { "type": "null" }] })
    } else {
        fragment
    }
}

// --- Internal helpers ---

fn typed_fragment(field_type: PrimitiveType, keywords: &Map<String, Value>) -> Value {
    let mut fragment = Map::new();
    fragment.insert("type".to_string(), field_type.into());
    copy_keywords(&mut fragment, keywords);
    Value::Object(fragment)
}

fn copy_keywords(target: &mut Map<String, Value>, keywords: &Map<String, Value>) {
    for (key, value) in keywords {
        if BUILDER_FLAGS.contains(&key.as_str()) {
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

fn descriptor(name: &str, fragment: Value, options: &FieldOptions) -> FieldDescriptor {
    FieldDescriptor {
        name: name.to_string(),
        fragment,
        required: !options.optional,
    }
}
