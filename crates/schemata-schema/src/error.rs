use schemata_types::Kind;
use thiserror::Error;

use crate::config::ArrayErrorStyle;
use crate::path::ELEMENT_SEGMENT;

/// Errors raised while building a [`Schema`](crate::Schema) from a definition.
///
/// All of these are fatal: a definition that fails to normalize never yields
/// a schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// No definition was given at all.
    #[error("A schema definition object should be passed")]
    MissingDefinition,

    /// The definition is not a JSON object.
    #[error("schema definition must be an object, got {found}")]
    NotAnObject { found: String },

    /// A field names a type outside the supported set.
    #[error("Type {type_name} is not supported")]
    UnsupportedType { type_name: String, path: String },

    /// A descriptor (or plain nested map) has no `type`.
    #[error("Property {path} must declare a type")]
    MissingType { path: String },

    /// A field name is reserved, empty, or contains an empty or `of` segment.
    #[error("Property {path} is not a valid field name")]
    InvalidFieldName { path: String },

    /// Two fields of one level address the same or nested locations.
    #[error("Property {path} overlaps property {other}")]
    ConflictingPaths { path: String, other: String },

    /// More than one field of a level is marked `primaryKey`.
    #[error("Only one field can be designated as the primary key (found {fields:?})")]
    MultiplePrimaryKeys { fields: Vec<String> },

    /// `validate` is not a predicate (or names an unregistered one).
    #[error("Validator for property {path} should be a callable predicate, got {found}")]
    InvalidValidator { path: String, found: String },

    /// `of` on a field that is not an Array.
    #[error("Property {path} declares `of` but is not of type Array")]
    UnexpectedOf { path: String },

    /// Nested fields on a field that is not an Object.
    #[error("Property {path} of type {kind} cannot declare nested fields")]
    UnexpectedChildren { path: String, kind: Kind },

    /// The default's runtime type differs from the field's type.
    #[error("Default for property {path} should be of type {expected}")]
    InvalidDefault { path: String, expected: Kind },

    /// The default has the right type but fails the field's own rules.
    #[error("Default for property {path} is rejected: {reason}")]
    DefaultRejected { path: String, reason: String },

    /// A boolean modifier holds a non-boolean value.
    #[error("Modifier `{modifier}` of property {path} should be a boolean, got {found}")]
    InvalidModifier {
        path: String,
        modifier: String,
        found: String,
    },

    /// Object/Array nesting goes past `SchemaConfig::max_depth`.
    #[error("Property {path} exceeds the maximum nesting depth of {max_depth}")]
    TooDeep { path: String, max_depth: usize },
}

impl ConstructionError {
    /// Prefix the path of path-carrying variants.
    ///
    /// Array element schemas are built relative to their array field; this
    /// anchors their errors back at the root.
    pub(crate) fn with_path_prefix(self, prefix: &str) -> Self {
        let anchor = |path: String| format!("{prefix}{path}");
        match self {
            Self::UnsupportedType { type_name, path } => Self::UnsupportedType {
                type_name,
                path: anchor(path),
            },
            Self::MissingType { path } => Self::MissingType { path: anchor(path) },
            Self::InvalidFieldName { path } => Self::InvalidFieldName { path: anchor(path) },
            Self::InvalidValidator { path, found } => Self::InvalidValidator {
                path: anchor(path),
                found,
            },
            Self::UnexpectedOf { path } => Self::UnexpectedOf { path: anchor(path) },
            Self::UnexpectedChildren { path, kind } => Self::UnexpectedChildren {
                path: anchor(path),
                kind,
            },
            Self::InvalidDefault { path, expected } => Self::InvalidDefault {
                path: anchor(path),
                expected,
            },
            Self::InvalidModifier {
                path,
                modifier,
                found,
            } => Self::InvalidModifier {
                path: anchor(path),
                modifier,
                found,
            },
            Self::ConflictingPaths { path, other } => Self::ConflictingPaths {
                path: anchor(path),
                other: anchor(other),
            },
            Self::DefaultRejected { path, reason } => Self::DefaultRejected {
                path: anchor(path),
                reason,
            },
            Self::TooDeep { path, max_depth } => Self::TooDeep {
                path: anchor(path),
                max_depth,
            },
            other => other,
        }
    }
}

/// Coarse classification of a [`ValidationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// A value is missing or has the wrong runtime type.
    Type,
    /// A value passed its type check but failed a custom predicate.
    Custom,
    /// The candidate as a whole is unusable.
    Invalid,
}

/// Errors returned by [`Schema::create`](crate::Schema::create).
///
/// Every variant names the full dotted path of the offending property, so
/// nested failures read as `Property .parent.child ...` and array failures as
/// `Property .items[1].name ...`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Property {path} is required")]
    Required { path: String, field: String },

    #[error("Property {path} should be of type {expected}")]
    Type {
        path: String,
        field: String,
        expected: Kind,
    },

    #[error("Property {path} failed custom validation")]
    Custom { path: String, field: String },

    #[error("{message}")]
    Invalid { message: String },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::Required { .. } | Self::Type { .. } => ValidationErrorKind::Type,
            Self::Custom { .. } => ValidationErrorKind::Custom,
            Self::Invalid { .. } => ValidationErrorKind::Invalid,
        }
    }

    /// Name of the offending field, if the error concerns one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Required { field, .. } | Self::Type { field, .. } | Self::Custom { field, .. } => {
                Some(field)
            }
            Self::Invalid { .. } => None,
        }
    }

    /// Full dotted path of the offending property, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Required { path, .. } | Self::Type { path, .. } | Self::Custom { path, .. } => {
                Some(path)
            }
            Self::Invalid { .. } => None,
        }
    }

    /// The expected type, for type mismatches.
    pub fn expected(&self) -> Option<Kind> {
        match self {
            Self::Type { expected, .. } => Some(*expected),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Re-anchor an error raised by an array element schema under the array
    /// property that owns it.
    pub(crate) fn relocate_element(
        self,
        array_path: &str,
        array_field: &str,
        index: usize,
        style: ArrayErrorStyle,
    ) -> Self {
        let relocate = |path: String| {
            let rest = path
                .strip_prefix('.')
                .and_then(|p| p.strip_prefix(ELEMENT_SEGMENT))
                .unwrap_or(&path);
            match style {
                ArrayErrorStyle::Indexed => format!("{array_path}[{index}]{rest}"),
                ArrayErrorStyle::FieldOnly => format!("{array_path}{rest}"),
            }
        };
        let field_of = |field: String| {
            if field == ELEMENT_SEGMENT {
                array_field.to_string()
            } else {
                field
            }
        };
        match self {
            Self::Required { path, field } => Self::Required {
                path: relocate(path),
                field: field_of(field),
            },
            Self::Type {
                path,
                field,
                expected,
            } => Self::Type {
                path: relocate(path),
                field: field_of(field),
                expected,
            },
            Self::Custom { path, field } => Self::Custom {
                path: relocate(path),
                field: field_of(field),
            },
            invalid @ Self::Invalid { .. } => invalid,
        }
    }
}

/// Errors from the path resolver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    /// A segment of the path does not exist in the container.
    #[error("path not found: {path}")]
    NotFound { path: String },
}

/// Result alias for schema construction.
pub type SchemaResult<T> = Result<T, ConstructionError>;

/// Result alias for instance creation.
pub type ValidationResult<T> = Result<T, ValidationError>;
