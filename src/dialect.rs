//! Schema dialects of the control document.
//!
//! Document versions disagree on the attribute names used for the control
//! identifier and its labels. A dialect is chosen once per document, from
//! configuration or the command line, and carries those names as data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element name of every control-bearing element.
pub const CONTROL_ELEMENT: &str = "paragraph";

/// Attribute holding the dotted control title, identical in both dialects.
pub const TITLE_ATTRIBUTE: &str = "title";

/// Accepted as `"v1"`/`"v2"` (any case), `"1"`/`"2"`, or the integers 1 and 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "DialectSelector")]
pub enum SchemaDialect {
    /// `CID`, `classifications`, `compliances`
    #[default]
    V1,
    /// `cid`, `classification`, `compliance`
    V2,
}

/// Configured form of a dialect, by number or by name.
#[derive(Deserialize)]
#[serde(untagged)]
enum DialectSelector {
    Number(u64),
    Name(String),
}

impl TryFrom<DialectSelector> for SchemaDialect {
    type Error = String;

    fn try_from(selector: DialectSelector) -> Result<Self, Self::Error> {
        match selector {
            DialectSelector::Number(1) => Ok(SchemaDialect::V1),
            DialectSelector::Number(2) => Ok(SchemaDialect::V2),
            DialectSelector::Number(n) => Err(format!("unknown schema dialect {}", n)),
            DialectSelector::Name(name) => match name.trim().to_ascii_lowercase().as_str() {
                "v1" | "1" => Ok(SchemaDialect::V1),
                "v2" | "2" => Ok(SchemaDialect::V2),
                _ => Err(format!("unknown schema dialect '{}'", name)),
            },
        }
    }
}

impl SchemaDialect {
    pub fn id_attribute(&self) -> &'static str {
        match self {
            SchemaDialect::V1 => "CID",
            SchemaDialect::V2 => "cid",
        }
    }

    pub fn classification_attribute(&self) -> &'static str {
        match self {
            SchemaDialect::V1 => "classifications",
            SchemaDialect::V2 => "classification",
        }
    }

    pub fn compliance_attribute(&self) -> &'static str {
        match self {
            SchemaDialect::V1 => "compliances",
            SchemaDialect::V2 => "compliance",
        }
    }

    pub fn control_element(&self) -> &'static str {
        CONTROL_ELEMENT
    }
}

impl fmt::Display for SchemaDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaDialect::V1 => write!(f, "v1"),
            SchemaDialect::V2 => write!(f, "v2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_names() {
        assert_eq!(SchemaDialect::V1.id_attribute(), "CID");
        assert_eq!(SchemaDialect::V2.id_attribute(), "cid");
        assert_eq!(SchemaDialect::V1.classification_attribute(), "classifications");
        assert_eq!(SchemaDialect::V2.compliance_attribute(), "compliance");
    }

    #[test]
    fn test_deserialize_aliases() {
        let v: SchemaDialect = serde_json::from_str("\"v2\"").unwrap();
        assert_eq!(v, SchemaDialect::V2);
        let v: SchemaDialect = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(v, SchemaDialect::V1);
        let v: SchemaDialect = serde_json::from_str("\"V2\"").unwrap();
        assert_eq!(v, SchemaDialect::V2);
    }

    #[test]
    fn test_deserialize_integer_selector() {
        let v: SchemaDialect = serde_json::from_str("2").unwrap();
        assert_eq!(v, SchemaDialect::V2);
        assert!(serde_json::from_str::<SchemaDialect>("3").is_err());
    }

    #[test]
    fn test_serialize_lowercase_name() {
        assert_eq!(serde_json::to_string(&SchemaDialect::V2).unwrap(), "\"v2\"");
    }

    #[test]
    fn test_display() {
        assert_eq!(SchemaDialect::V2.to_string(), "v2");
    }
}
