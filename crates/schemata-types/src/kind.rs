use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::value::Value;

/// A field type a schema may declare.
///
/// The set is closed. Each kind matches values by runtime tag equality:
/// a `Date` is never a `String`, an `Array` is never an `Object`, and `Null`
/// matches nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
}

impl Kind {
    /// Every supported kind, in declaration order.
    pub const ALL: [Kind; 6] = [
        Kind::String,
        Kind::Number,
        Kind::Boolean,
        Kind::Date,
        Kind::Object,
        Kind::Array,
    ];

    /// The type name as written in schema definitions.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::Date => "Date",
            Self::Object => "Object",
            Self::Array => "Array",
        }
    }

    /// Returns `true` if `value` carries this kind's runtime tag.
    pub fn matches(&self, value: &Value) -> bool {
        value.kind_tag() == self.name()
    }

    /// Returns `true` for kinds that own a nested schema.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Kind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| TypeError::UnsupportedKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn parse_every_kind_name() {
        for kind in Kind::ALL {
            assert_eq!(kind.name().parse::<Kind>().unwrap(), kind);
        }
    }

    #[test]
    fn parse_is_case_sensitive() {
        assert_eq!(
            "string".parse::<Kind>(),
            Err(TypeError::UnsupportedKind("string".into()))
        );
    }

    #[test]
    fn unsupported_kind_message_names_the_type() {
        let err = "InvalidType".parse::<Kind>().unwrap_err();
        assert_eq!(err.to_string(), "Type InvalidType is not supported");
    }

    #[test]
    fn matches_by_tag_only() {
        let date = Value::Date(Utc.with_ymd_and_hms(2021, 3, 4, 0, 0, 0).unwrap());
        assert!(Kind::Date.matches(&date));
        assert!(!Kind::String.matches(&date));
        assert!(Kind::String.matches(&Value::from("2021-03-04")));
        assert!(!Kind::Date.matches(&Value::from("2021-03-04")));
        assert!(!Kind::Object.matches(&Value::Array(vec![])));
        assert!(!Kind::Array.matches(&Value::object()));
        assert!(Kind::Boolean.matches(&Value::Bool(false)));
        assert!(Kind::Number.matches(&Value::Number(0.0)));
    }

    #[test]
    fn null_matches_nothing() {
        assert!(Kind::ALL.iter().all(|k| !k.matches(&Value::Null)));
    }

    #[test]
    fn composite_kinds() {
        assert!(Kind::Object.is_composite());
        assert!(Kind::Array.is_composite());
        assert!(!Kind::Date.is_composite());
    }

    #[test]
    fn serde_uses_type_names() {
        assert_eq!(serde_json::to_string(&Kind::Boolean).unwrap(), "\"Boolean\"");
        let parsed: Kind = serde_json::from_str("\"Array\"").unwrap();
        assert_eq!(parsed, Kind::Array);
    }
}
