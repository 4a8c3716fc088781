//! Input schema descriptors for blocks.
//!
//! A descriptor is a closed tagged union used both to validate input values
//! and to drive interactive form synthesis. Descriptor trees are finite and
//! acyclic by construction (owned children, no references).

use serde::Deserialize;
use serde_json::Value;

/// Expected shape of a block's input.
///
/// Manifests may declare a `kind` this engine does not know; such descriptors
/// parse into [`Schema::Other`] and are rejected later, at form time, so one
/// unrenderable block does not poison the whole discovery pass.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    String,
    Number,
    Boolean,
    Array { items: Box<Schema> },
    Enum { choices: Vec<String> },
    Object { fields: Vec<Field> },
    /// Unrecognized `kind`, preserved verbatim for error reporting.
    Other(String),
}

/// Named field of an [`Schema::Object`], in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

impl Schema {
    /// Stable kind label used in prompts and error messages.
    pub fn kind(&self) -> &str {
        match self {
            Schema::String => "string",
            Schema::Number => "number",
            Schema::Boolean => "boolean",
            Schema::Array { .. } => "array",
            Schema::Enum { .. } => "enum",
            Schema::Object { .. } => "object",
            Schema::Other(kind) => kind,
        }
    }

    /// Validate `value` against this descriptor.
    ///
    /// Returns every violation found, each annotated with the path to the
    /// offending value (e.g. `input.tags[2]`).
    pub fn validate(&self, value: &Value) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        self.check(value, "input", &mut errors);
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    fn check(&self, value: &Value, path: &str, errors: &mut Vec<String>) {
        match self {
            Schema::String => {
                if !value.is_string() {
                    errors.push(format!("{path}: expected a string"));
                }
            }
            Schema::Number => {
                if !value.is_number() {
                    errors.push(format!("{path}: expected a number"));
                }
            }
            Schema::Boolean => {
                if !value.is_boolean() {
                    errors.push(format!("{path}: expected a boolean"));
                }
            }
            Schema::Array { items } => match value.as_array() {
                Some(elements) => {
                    for (i, element) in elements.iter().enumerate() {
                        items.check(element, &format!("{path}[{i}]"), errors);
                    }
                }
                None => errors.push(format!("{path}: expected an array")),
            },
            Schema::Enum { choices } => match value.as_str() {
                Some(chosen) if choices.iter().any(|c| c == chosen) => {}
                Some(chosen) => {
                    errors.push(format!("{path}: '{chosen}' is not one of {choices:?}"));
                }
                None => errors.push(format!("{path}: expected one of {choices:?}")),
            },
            Schema::Object { fields } => match value.as_object() {
                Some(map) => {
                    for field in fields {
                        match map.get(&field.name) {
                            Some(inner) => {
                                field
                                    .schema
                                    .check(inner, &format!("{path}.{}", field.name), errors);
                            }
                            None => {
                                errors.push(format!("{path}: missing field '{}'", field.name));
                            }
                        }
                    }
                }
                None => errors.push(format!("{path}: expected an object")),
            },
            Schema::Other(kind) => {
                errors.push(format!("{path}: unsupported field kind '{kind}'"));
            }
        }
    }
}

/// Wire shape of a descriptor as written in manifests (TOML or JSON).
#[derive(Debug, Deserialize)]
struct RawSchema {
    kind: String,
    items: Option<Box<RawSchema>>,
    choices: Option<Vec<String>>,
    fields: Option<Vec<RawField>>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    name: String,
    #[serde(flatten)]
    schema: RawSchema,
}

impl RawSchema {
    fn into_schema(self) -> Result<Schema, String> {
        match self.kind.as_str() {
            "string" => Ok(Schema::String),
            "number" => Ok(Schema::Number),
            "boolean" => Ok(Schema::Boolean),
            "array" => {
                let items = self
                    .items
                    .ok_or("array schema requires `items`".to_string())?;
                Ok(Schema::Array {
                    items: Box::new(items.into_schema()?),
                })
            }
            "enum" => {
                let choices = self
                    .choices
                    .ok_or("enum schema requires `choices`".to_string())?;
                if choices.is_empty() {
                    return Err("enum schema requires at least one choice".to_string());
                }
                Ok(Schema::Enum { choices })
            }
            "object" => {
                let fields = self
                    .fields
                    .ok_or("object schema requires `fields`".to_string())?;
                let mut converted = Vec::with_capacity(fields.len());
                for field in fields {
                    if field.name.is_empty() {
                        return Err("object field names must be non-empty".to_string());
                    }
                    converted.push(Field {
                        name: field.name,
                        schema: field.schema.into_schema()?,
                    });
                }
                Ok(Schema::Object { fields: converted })
            }
            _ => Ok(Schema::Other(self.kind)),
        }
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawSchema::deserialize(deserializer)?;
        raw.into_schema().map_err(serde::de::Error::custom)
    }
}
