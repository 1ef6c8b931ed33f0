//! The immutable schema accumulator and its structural operators.
//!
//! Every builder call returns a new [`Schema`]; the receiver is never
//! touched and stays usable. Property maps and required lists sit behind
//! `Arc`, so clones are cheap and a new accumulator copies the map only
//! when it adds to it.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::SchemaDefinitionError;
use crate::fragment::{self, FieldDescriptor, ItemSpec, ObjectDefinition};
use crate::types::{FieldOptions, PrimitiveType};

/// Anything that compiles to a JSON Schema document.
pub trait ToJsonSchema {
    fn to_json_schema(&self) -> Value;
}

impl ToJsonSchema for Value {
    fn to_json_schema(&self) -> Value {
        self.clone()
    }
}

impl<T: ToJsonSchema + ?Sized> ToJsonSchema for &T {
    fn to_json_schema(&self) -> Value {
        (**self).to_json_schema()
    }
}

/// Root keys the accumulator owns; everything else is a root keyword.
pub(crate) const STRUCTURAL_KEYS: [&str; 3] = ["type", "properties", "required"];

/// An object schema under construction: field fragments plus the
/// `required` list.
///
/// `required` keeps insertion order and may hold duplicates after
/// [`Schema::extend`]; they are dropped when compiling. Other root
/// keywords (`additionalProperties`, `title`, `$schema`, ...) ride along
/// through every operator and are emitted after `required`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    properties: Arc<Map<String, Value>>,
    required: Arc<Vec<String>>,
    keywords: Arc<Map<String, Value>>,
}

impl Schema {
    /// Empty schema: no properties, nothing required.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(properties: Map<String, Value>, required: Vec<String>) -> Self {
        Self {
            properties: Arc::new(properties),
            required: Arc::new(required),
            keywords: Arc::default(),
        }
    }

    /// Same root keywords as `self`, new properties and required list.
    fn with_parts(&self, properties: Map<String, Value>, required: Vec<String>) -> Self {
        Self {
            keywords: Arc::clone(&self.keywords),
            ..Self::from_parts(properties, required)
        }
    }

    pub(crate) fn with_keywords(mut self, keywords: Map<String, Value>) -> Self {
        self.keywords = Arc::new(keywords);
        self
    }

    /// Set a root keyword such as `additionalProperties` or `title`.
    ///
    /// `type`, `properties` and `required` belong to the accumulator and
    /// are ignored here.
    pub fn keyword(&self, name: &str, value: impl Into<Value>) -> Self {
        if STRUCTURAL_KEYS.contains(&name) {
            tracing::warn!(keyword = name, "ignoring structural root keyword");
            return self.clone();
        }
        let mut keywords = (*self.keywords).clone();
        keywords.insert(name.to_string(), value.into());
        Self {
            keywords: Arc::new(keywords),
            ..self.clone()
        }
    }

    // --- Field builders ---

    pub fn string(&self, name: &str, options: FieldOptions) -> Self {
        self.with_field(fragment::primitive(name, PrimitiveType::String, &options))
    }

    pub fn number(&self, name: &str, options: FieldOptions) -> Self {
        self.with_field(fragment::primitive(name, PrimitiveType::Number, &options))
    }

    pub fn integer(&self, name: &str, options: FieldOptions) -> Self {
        self.with_field(fragment::primitive(name, PrimitiveType::Integer, &options))
    }

    pub fn boolean(&self, name: &str, options: FieldOptions) -> Self {
        self.with_field(fragment::primitive(name, PrimitiveType::Boolean, &options))
    }

    /// A field whose only value is `null`. `options.nullable` is ignored.
    pub fn null(&self, name: &str, options: FieldOptions) -> Self {
        self.with_field(fragment::null(name, &options))
    }

    /// A field restricted to `values`, all of type `field_type`.
    pub fn enumeration<I, V>(
        &self,
        name: &str,
        field_type: PrimitiveType,
        values: I,
        options: FieldOptions,
    ) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.with_field(fragment::enumeration(name, field_type, values, &options))
    }

    /// A field that must equal `value` exactly.
    pub fn constant(&self, name: &str, value: impl Into<Value>, options: FieldOptions) -> Self {
        self.with_field(fragment::constant(name, value.into(), &options))
    }

    /// An array field. `options` applies to the array itself; item
    /// options travel inside `items`.
    pub fn array(&self, name: &str, items: impl Into<ItemSpec>, options: FieldOptions) -> Self {
        self.with_field(fragment::array(name, &items.into(), &options))
    }

    /// A nested object field.
    pub fn object(
        &self,
        name: &str,
        definition: impl Into<ObjectDefinition>,
        options: FieldOptions,
    ) -> Self {
        self.with_field(fragment::object(name, &definition.into(), &options))
    }

    // --- Structural operators ---

    /// Keep only the named properties.
    ///
    /// Names absent from the schema are skipped; see [`Schema::try_pick`]
    /// for the checked form.
    pub fn pick(&self, names: &[&str]) -> Self {
        self.warn_unknown("pick", names);
        let properties = self
            .properties
            .iter()
            .filter(|(key, _)| names.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let required = self
            .required
            .iter()
            .filter(|name| names.contains(&name.as_str()))
            .cloned()
            .collect();
        self.with_parts(properties, required)
    }

    /// Like [`Schema::pick`], but fails on the first unknown name.
    pub fn try_pick(&self, names: &[&str]) -> Result<Self, SchemaDefinitionError> {
        self.check_known(names)?;
        Ok(self.pick(names))
    }

    /// Drop the named properties.
    pub fn omit(&self, names: &[&str]) -> Self {
        self.warn_unknown("omit", names);
        let properties = self
            .properties
            .iter()
            .filter(|(key, _)| !names.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let required = self
            .required
            .iter()
            .filter(|name| !names.contains(&name.as_str()))
            .cloned()
            .collect();
        self.with_parts(properties, required)
    }

    /// Like [`Schema::omit`], but fails on the first unknown name.
    pub fn try_omit(&self, names: &[&str]) -> Result<Self, SchemaDefinitionError> {
        self.check_known(names)?;
        Ok(self.omit(names))
    }

    /// Merge `other` into this schema.
    ///
    /// `other` wins on key collisions, for properties and root keywords
    /// alike. The required list is `other.required` followed by
    /// `self.required`.
    pub fn extend(&self, other: &Schema) -> Self {
        let mut properties = (*self.properties).clone();
        for (key, value) in other.properties.iter() {
            properties.insert(key.clone(), value.clone());
        }
        let mut keywords = (*self.keywords).clone();
        for (key, value) in other.keywords.iter() {
            keywords.insert(key.clone(), value.clone());
        }
        let required = other
            .required
            .iter()
            .chain(self.required.iter())
            .cloned()
            .collect();
        Self::from_parts(properties, required).with_keywords(keywords)
    }

    /// The same schema, unchanged.
    pub fn identical(&self) -> Self {
        self.clone()
    }

    // --- Accessors ---

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    /// Raw required list, duplicates included.
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Fragment stored under `name`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Root keywords other than `type`, `properties` and `required`.
    pub fn keywords(&self) -> &Map<String, Value> {
        &self.keywords
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    // --- Internal implementation ---

    fn with_field(&self, field: FieldDescriptor) -> Self {
        let FieldDescriptor {
            name,
            fragment,
            required: is_required,
        } = field;

        let mut properties = (*self.properties).clone();
        properties.insert(name.clone(), fragment);

        // Redefinition replaces the previous required status.
        let mut required: Vec<String> = self
            .required
            .iter()
            .filter(|r| **r != name)
            .cloned()
            .collect();
        if is_required {
            required.push(name);
        }

        self.with_parts(properties, required)
    }

    fn check_known(&self, names: &[&str]) -> Result<(), SchemaDefinitionError> {
        match names.iter().find(|name| !self.properties.contains_key(**name)) {
            Some(name) => Err(SchemaDefinitionError::UnknownField {
                name: name.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn warn_unknown(&self, operation: &str, names: &[&str]) {
        for name in names {
            if !self.properties.contains_key(*name) {
                tracing::warn!(operation, field = %name, "ignoring unknown field");
            }
        }
    }
}

impl ToJsonSchema for Schema {
    fn to_json_schema(&self) -> Value {
        let mut seen = HashSet::new();
        let required: Vec<Value> = self
            .required
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .map(|name| Value::String(name.clone()))
            .collect();

        let mut out = Map::new();
        out.insert("type".to_string(), PrimitiveType::Object.into());
        out.insert(
            "properties".to_string(),
            Value::Object((*self.properties).clone()),
        );
        out.insert("required".to_string(), Value::Array(required));
        for (key, value) in self.keywords.iter() {
            out.insert(key.clone(), value.clone());
        }
        Value::Object(out)
    }
}
