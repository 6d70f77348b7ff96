//! Canonical property descriptors and the normalizer that builds them.

use std::sync::Arc;

use schemata_types::{Kind, Value};
use tracing::{debug, warn};

use crate::config::SchemaConfig;
use crate::definition::{is_reserved, Definition, Descriptor, FieldDef, ValidatorSpec};
use crate::error::{ConstructionError, SchemaResult, ValidationError, ValidationResult};
use crate::path::ELEMENT_SEGMENT;
use crate::schema::Schema;
use crate::validator::Validator;

/// A normalized field of a [`Schema`].
///
/// Object fields own the schema of their children; array fields with an `of`
/// element own a single-field schema that validates one element.
#[derive(Clone, Debug)]
pub struct Property {
    key: String,
    path: String,
    kind: Kind,
    default: Option<Value>,
    required: bool,
    primary_key: bool,
    validator: Option<Validator>,
    children: Option<Schema>,
    of: Option<Schema>,
}

impl Property {
    /// Field name, relative to the enclosing object.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Root-anchored dotted path (`.parent.child`).
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn validator(&self) -> Option<&Validator> {
        self.validator.as_ref()
    }

    /// Nested schema of an `Object` field that declares children.
    pub fn children(&self) -> Option<&Schema> {
        self.children.as_ref()
    }

    /// Element schema of an `Array` field that declares `of`.
    pub fn element(&self) -> Option<&Schema> {
        self.of.as_ref()
    }

    /// The schema a lookup continues into below this property.
    pub(crate) fn descend(&self) -> Option<&Schema> {
        self.children.as_ref().or(self.of.as_ref())
    }

    fn implicit_key(name: &str) -> Self {
        Self {
            key: name.to_string(),
            path: format!(".{name}"),
            kind: Kind::String,
            default: None,
            required: true,
            primary_key: true,
            validator: None,
            children: None,
            of: None,
        }
    }

    /// Validate one present (or defaulted) value and build its accepted form.
    pub(crate) fn accept(&self, value: Value, config: &SchemaConfig) -> ValidationResult<Value> {
        if !self.kind.matches(&value) {
            return Err(ValidationError::Type {
                path: self.path.clone(),
                field: self.key.clone(),
                expected: self.kind,
            });
        }

        if let Some(validator) = &self.validator {
            if !validator.check(&value) {
                return Err(ValidationError::Custom {
                    path: self.path.clone(),
                    field: self.key.clone(),
                });
            }
        }

        match (&self.children, &self.of, value) {
            (Some(children), _, value) => children.create(&value),
            (_, Some(element), Value::Array(items)) => self.accept_elements(element, items, config),
            (_, _, value) => Ok(value),
        }
    }

    fn accept_elements(
        &self,
        element: &Schema,
        items: Vec<Value>,
        config: &SchemaConfig,
    ) -> ValidationResult<Value> {
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                element.accept_element(item).map_err(|err| {
                    err.relocate_element(&self.path, &self.key, index, config.array_errors)
                })
            })
            .collect::<ValidationResult<Vec<_>>>()
            .map(Value::Array)
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Builds schemas from definitions, level by level.
pub(crate) struct Normalizer {
    config: Arc<SchemaConfig>,
}

impl Normalizer {
    pub(crate) fn new(config: SchemaConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Normalize a root definition.
    pub(crate) fn root(&self, definition: &Definition) -> SchemaResult<Schema> {
        let mut properties = Vec::with_capacity(definition.len());
        for (name, def) in definition.iter() {
            if is_reserved(name) {
                warn!(field = name, "reserved key at schema root ignored");
                continue;
            }
            check_field_name(name, "")?;
            properties.push(self.normalize(name, def, "", 0)?);
        }

        let mut primary_key = single_primary_key(&properties)?;
        if primary_key.is_none() {
            if let Some(name) = self.config.implicit_primary_key.as_deref() {
                if is_reserved(name) {
                    return Err(ConstructionError::InvalidFieldName {
                        path: format!(".{name}"),
                    });
                }
                check_field_name(name, "")?;
                match properties.iter_mut().find(|p| p.key == name) {
                    Some(existing) => existing.primary_key = true,
                    None => properties.insert(0, Property::implicit_key(name)),
                }
                debug!(field = name, "implicit primary key applied");
                primary_key = Some(name.to_string());
            }
        }

        check_overlaps(&properties)?;
        Ok(Schema::from_parts(properties, primary_key, Arc::clone(&self.config)))
    }

    /// Normalize the children of an object field.
    fn level(&self, fields: &Definition, path: &str, depth: usize) -> SchemaResult<Schema> {
        let properties = fields
            .iter()
            .map(|(name, def)| {
                if is_reserved(name) {
                    return Err(ConstructionError::InvalidFieldName {
                        path: format!("{path}.{name}"),
                    });
                }
                check_field_name(name, path)?;
                self.normalize(name, def, path, depth)
            })
            .collect::<SchemaResult<Vec<_>>>()?;
        let primary_key = single_primary_key(&properties)?;
        check_overlaps(&properties)?;
        Ok(Schema::from_parts(properties, primary_key, Arc::clone(&self.config)))
    }

    /// Normalize the element definition of an array field.
    ///
    /// The element schema is built relative to the array (its single property
    /// is the synthetic `of` field) so it can be reused for every index.
    fn element(&self, of: &FieldDef, array_path: &str, depth: usize) -> SchemaResult<Schema> {
        let property = self
            .normalize(ELEMENT_SEGMENT, of, "", depth)
            .map_err(|err| err.with_path_prefix(array_path))?;
        Ok(Schema::from_parts(vec![property], None, Arc::clone(&self.config)))
    }

    fn normalize(
        &self,
        name: &str,
        def: &FieldDef,
        parent_path: &str,
        depth: usize,
    ) -> SchemaResult<Property> {
        let path = format!("{parent_path}.{name}");

        if depth > self.config.max_depth {
            return Err(ConstructionError::TooDeep {
                path,
                max_depth: self.config.max_depth,
            });
        }

        let bare;
        let descriptor = match def {
            FieldDef::Bare(type_name) => {
                bare = Descriptor::typed(type_name.clone());
                &bare
            }
            FieldDef::Descriptor(descriptor) => descriptor,
        };

        let kind = match descriptor.type_name.as_deref() {
            None => return Err(ConstructionError::MissingType { path }),
            Some(type_name) => type_name.parse::<Kind>().map_err(|_| {
                ConstructionError::UnsupportedType {
                    type_name: type_name.to_string(),
                    path: path.clone(),
                }
            })?,
        };

        let validator = match &descriptor.validate {
            None => None,
            Some(ValidatorSpec::Callable(validator)) => Some(validator.clone()),
            Some(ValidatorSpec::NotCallable(found)) => {
                return Err(ConstructionError::InvalidValidator {
                    path,
                    found: found.clone(),
                })
            }
        };

        if let Some(default) = &descriptor.default {
            if !kind.matches(default) {
                return Err(ConstructionError::InvalidDefault {
                    path,
                    expected: kind,
                });
            }
        }

        if !descriptor.fields.is_empty() && kind != Kind::Object {
            return Err(ConstructionError::UnexpectedChildren { path, kind });
        }

        let children = if kind == Kind::Object && !descriptor.fields.is_empty() {
            Some(self.level(&descriptor.fields, &path, depth + 1)?)
        } else {
            None
        };

        let of = match (&descriptor.of, kind) {
            (None, _) => None,
            (Some(element), Kind::Array) => Some(self.element(element, &path, depth + 1)?),
            (Some(_), _) => return Err(ConstructionError::UnexpectedOf { path }),
        };

        let property = Property {
            key: name.to_string(),
            path,
            kind,
            default: descriptor.default.clone(),
            required: descriptor.required,
            primary_key: descriptor.primary_key,
            validator,
            children,
            of,
        };

        // A default must survive the same processing as a supplied value.
        if let Some(default) = &property.default {
            if let Err(err) = property.accept(default.clone(), &self.config) {
                return Err(ConstructionError::DefaultRejected {
                    path: property.path.clone(),
                    reason: err.to_string(),
                });
            }
        }

        Ok(property)
    }
}

/// Field names may be dotted (a flat key addressing a nested location) but
/// never contain empty segments or the element segment.
fn check_field_name(name: &str, parent_path: &str) -> SchemaResult<()> {
    if name
        .split('.')
        .any(|segment| segment.is_empty() || segment == ELEMENT_SEGMENT)
    {
        return Err(ConstructionError::InvalidFieldName {
            path: format!("{parent_path}.{name}"),
        });
    }
    Ok(())
}

/// No two fields of a level may write to the same or nested locations, as
/// `address.city` next to an `address` object would.
fn check_overlaps(properties: &[Property]) -> SchemaResult<()> {
    let keys: Vec<Vec<&str>> = properties
        .iter()
        .map(|p| crate::path::segments(&p.key))
        .collect();
    for (i, later) in keys.iter().enumerate() {
        for (j, earlier) in keys[..i].iter().enumerate() {
            if later.starts_with(earlier) || earlier.starts_with(later) {
                return Err(ConstructionError::ConflictingPaths {
                    path: properties[i].path.clone(),
                    other: properties[j].path.clone(),
                });
            }
        }
    }
    Ok(())
}

fn single_primary_key(properties: &[Property]) -> SchemaResult<Option<String>> {
    let mut marked = properties.iter().filter(|p| p.primary_key).map(|p| p.key.clone());
    let first = marked.next();
    let rest: Vec<String> = marked.collect();
    if rest.is_empty() {
        return Ok(first);
    }
    let mut fields: Vec<String> = first.into_iter().collect();
    fields.extend(rest);
    Err(ConstructionError::MultiplePrimaryKeys { fields })
}
