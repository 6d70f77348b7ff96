//! Authoring-side schema definitions.
//!
//! A [`Definition`] is the raw, un-normalized mapping from field names to
//! [`FieldDef`]s. It can be built in Rust or parsed from JSON; either way it
//! only becomes usable once [`Schema`](crate::Schema) normalizes it.

use schemata_types::{Kind, Value};

use crate::error::{ConstructionError, SchemaResult};
use crate::validator::{Validator, ValidatorRegistry};

/// Descriptor keys that are modifiers rather than nested field names.
pub const RESERVED_KEYS: [&str; 6] = ["type", "default", "required", "primaryKey", "validate", "of"];

/// Returns `true` if `key` is a descriptor modifier.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// An ordered mapping from field name to field definition.
#[derive(Clone, Debug, Default)]
pub struct Definition {
    fields: Vec<(String, FieldDef)>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, builder style.
    pub fn field(mut self, name: impl Into<String>, def: impl Into<FieldDef>) -> Self {
        self.push(name, def);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, def: impl Into<FieldDef>) {
        self.fields.push((name.into(), def.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDef)> {
        self.fields.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a JSON definition.
    ///
    /// `validate` entries are resolved by name against `validators`. Unknown
    /// names and non-string values are kept as non-callable and rejected when
    /// the definition is normalized.
    pub fn from_json(json: &serde_json::Value, validators: &ValidatorRegistry) -> SchemaResult<Self> {
        match json {
            serde_json::Value::Null => Err(ConstructionError::MissingDefinition),
            serde_json::Value::Object(map) => parse_fields(map, "", validators),
            other => Err(ConstructionError::NotAnObject {
                found: json_kind(other).to_string(),
            }),
        }
    }
}

/// One field of a definition: a bare type name or a full descriptor.
#[derive(Clone, Debug)]
pub enum FieldDef {
    Bare(String),
    Descriptor(Descriptor),
}

impl From<Kind> for FieldDef {
    fn from(kind: Kind) -> Self {
        Self::Bare(kind.name().to_string())
    }
}

impl From<&str> for FieldDef {
    fn from(type_name: &str) -> Self {
        Self::Bare(type_name.to_string())
    }
}

impl From<Descriptor> for FieldDef {
    fn from(descriptor: Descriptor) -> Self {
        Self::Descriptor(descriptor)
    }
}

/// What a `validate` modifier resolved to.
#[derive(Clone, Debug)]
pub enum ValidatorSpec {
    Callable(Validator),
    /// Anything that is not a predicate, described for error messages.
    NotCallable(String),
}

/// A field descriptor: type plus modifiers, plus nested fields for objects.
#[derive(Clone, Debug, Default)]
pub struct Descriptor {
    pub(crate) type_name: Option<String>,
    pub(crate) default: Option<Value>,
    pub(crate) required: bool,
    pub(crate) primary_key: bool,
    pub(crate) validate: Option<ValidatorSpec>,
    pub(crate) of: Option<Box<FieldDef>>,
    pub(crate) fields: Definition,
}

impl Descriptor {
    pub fn new(kind: Kind) -> Self {
        Self::typed(kind.name())
    }

    /// A descriptor with an arbitrary (possibly unsupported) type name.
    pub fn typed(type_name: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            ..Default::default()
        }
    }

    /// A descriptor without a type. Normalization rejects it.
    pub fn untyped() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn validate<F>(self, predicate: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validator(Validator::new(predicate))
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validate = Some(ValidatorSpec::Callable(validator));
        self
    }

    /// Element definition for an `Array` field.
    pub fn of(mut self, element: impl Into<FieldDef>) -> Self {
        self.of = Some(Box::new(element.into()));
        self
    }

    /// Nested field for an `Object` field.
    pub fn field(mut self, name: impl Into<String>, def: impl Into<FieldDef>) -> Self {
        self.fields.push(name, def);
        self
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

// ---------------------------------------------------------------------------
// JSON parsing
// ---------------------------------------------------------------------------

fn parse_fields(
    map: &serde_json::Map<String, serde_json::Value>,
    parent_path: &str,
    validators: &ValidatorRegistry,
) -> SchemaResult<Definition> {
    let mut definition = Definition::new();
    for (name, raw) in map {
        let path = format!("{parent_path}.{name}");
        definition.push(name.clone(), parse_field(raw, &path, validators)?);
    }
    Ok(definition)
}

fn parse_field(
    raw: &serde_json::Value,
    path: &str,
    validators: &ValidatorRegistry,
) -> SchemaResult<FieldDef> {
    let map = match raw {
        serde_json::Value::String(type_name) => return Ok(FieldDef::Bare(type_name.clone())),
        serde_json::Value::Object(map) => map,
        other => return Ok(FieldDef::Bare(other.to_string())),
    };

    let children: serde_json::Map<String, serde_json::Value> = map
        .iter()
        .filter(|(key, _)| !is_reserved(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let of = match map.get("of") {
        Some(element) => Some(Box::new(parse_field(element, &format!("{path}.of"), validators)?)),
        None => None,
    };

    Ok(FieldDef::Descriptor(Descriptor {
        type_name: map
            .get("type")
            .map(|t| t.as_str().map(str::to_string).unwrap_or_else(|| t.to_string())),
        default: map.get("default").map(Value::from),
        required: parse_flag(map, "required", path)?,
        primary_key: parse_flag(map, "primaryKey", path)?,
        validate: map.get("validate").map(|v| resolve_validator(v, validators)),
        of,
        fields: parse_fields(&children, path, validators)?,
    }))
}

fn parse_flag(
    map: &serde_json::Map<String, serde_json::Value>,
    modifier: &str,
    path: &str,
) -> SchemaResult<bool> {
    match map.get(modifier) {
        None => Ok(false),
        Some(serde_json::Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(ConstructionError::InvalidModifier {
            path: path.to_string(),
            modifier: modifier.to_string(),
            found: other.to_string(),
        }),
    }
}

fn resolve_validator(raw: &serde_json::Value, validators: &ValidatorRegistry) -> ValidatorSpec {
    match raw.as_str() {
        Some(name) => validators
            .get(name)
            .map(ValidatorSpec::Callable)
            .unwrap_or_else(|| ValidatorSpec::NotCallable(format!("unregistered name {name:?}"))),
        None => ValidatorSpec::NotCallable(raw.to_string()),
    }
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
