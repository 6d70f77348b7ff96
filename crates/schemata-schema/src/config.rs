use serde::{Deserialize, Serialize};

/// How a failing array element is located in validation messages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayErrorStyle {
    /// `Property .items[1].name ...`
    #[default]
    Indexed,
    /// `Property .items.name ...`
    FieldOnly,
}

/// Knobs fixed at schema construction time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Field that becomes the primary key when no field is explicitly marked.
    ///
    /// If the definition already has a top-level field with this name it is
    /// promoted; otherwise a required `String` field is prepended.
    pub implicit_primary_key: Option<String>,
    /// Location format for array element failures.
    pub array_errors: ArrayErrorStyle,
    /// Maximum nesting of Object/Array levels below the root.
    pub max_depth: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            implicit_primary_key: None,
            array_errors: ArrayErrorStyle::Indexed,
            max_depth: 32,
        }
    }
}

impl SchemaConfig {
    /// Default configuration with an implicit primary key named `name`.
    pub fn with_implicit_primary_key(name: impl Into<String>) -> Self {
        Self {
            implicit_primary_key: Some(name.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = SchemaConfig::default();
        assert!(c.implicit_primary_key.is_none());
        assert_eq!(c.array_errors, ArrayErrorStyle::Indexed);
        assert_eq!(c.max_depth, 32);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: SchemaConfig =
            serde_json::from_str(r#"{"array_errors": "field_only"}"#).unwrap();
        assert_eq!(c.array_errors, ArrayErrorStyle::FieldOnly);
        assert_eq!(c.max_depth, 32);
    }

    #[test]
    fn implicit_primary_key_constructor() {
        let c = SchemaConfig::with_implicit_primary_key("pk");
        assert_eq!(c.implicit_primary_key.as_deref(), Some("pk"));
        assert_eq!(c.array_errors, ArrayErrorStyle::Indexed);
    }
}
