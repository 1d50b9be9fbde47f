//! JSON schema documents.
//!
//! ```json
//! {
//!   "name": "orders",
//!   "attributes": ["order_id", {"name": "amount", "type": "NUMERIC"}],
//!   "dependencies": [{"lhs": ["order_id"], "rhs": ["amount"]}],
//!   "keys": [["order_id"]],
//!   "multivalued": [],
//!   "rows": [["1", 10]]
//! }
//! ```

use crate::error::NormalizeError;
use crate::{Normalizer, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// An attribute given either as a bare name or with a column type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeSpec {
    Name(String),
    Typed {
        name: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        sql_type: Option<String>,
    },
}

impl AttributeSpec {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            AttributeSpec::Name(name) => name,
            AttributeSpec::Typed { name, .. } => name,
        }
    }

    #[must_use]
    pub fn sql_type(&self) -> Option<&str> {
        match self {
            AttributeSpec::Name(_) => None,
            AttributeSpec::Typed { sql_type, .. } => sql_type.as_deref(),
        }
    }
}

/// `lhs -> rhs` or `lhs ->> rhs` by attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    pub lhs: Vec<String>,
    pub rhs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub attributes: Vec<AttributeSpec>,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
    #[serde(default)]
    pub keys: Vec<Vec<String>>,
    #[serde(default)]
    pub multivalued: Vec<DependencySpec>,
    /// Sample rows, one value per attribute; only used to check multivalued dependencies.
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

impl SchemaDocument {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| NormalizeError::Document(e.to_string()))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| NormalizeError::Io {
            path: path.display().to_string(),
            e: e.to_string(),
        })?;
        Self::parse(&text)
    }

    /// Build the attribute model this document describes.
    ///
    /// Rows are installed before multivalued dependencies so each one is
    /// checked against them as it is declared.
    pub fn to_normalizer(&self) -> Result<Normalizer> {
        let mut normalizer = Normalizer::new();
        for attribute in &self.attributes {
            normalizer.add_attribute(attribute.name(), attribute.sql_type())?;
        }
        for dependency in &self.dependencies {
            normalizer.add_functional_dependency_by_name(&dependency.lhs, &dependency.rhs)?;
        }
        for key in &self.keys {
            normalizer.add_unique_key_by_name(key)?;
        }
        normalizer.set_sample_rows(self.rows.iter().map(|row| row_values(row)).collect())?;
        for dependency in &self.multivalued {
            normalizer.add_multivalued_dependency_by_name(&dependency.lhs, &dependency.rhs)?;
        }
        Ok(normalizer)
    }
}

// Strings keep their text, anything else its JSON rendering.
fn row_values(row: &[Value]) -> Vec<String> {
    row.iter()
        .map(|value| match value {
            Value::String(s) => s.trim().to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDERS: &str = r#"{
        "name": "orders",
        "attributes": ["order_id", {"name": "amount", "type": "NUMERIC"}, "customer", "city"],
        "dependencies": [
            {"lhs": ["order_id"], "rhs": ["amount", "customer"]},
            {"lhs": ["customer"], "rhs": ["city"]}
        ],
        "rows": [["1", 10, "ann", "oslo"], ["2", 12.5, "bob", null]]
    }"#;

    #[test]
    fn parse_document() {
        let doc = SchemaDocument::parse(ORDERS).unwrap();
        assert_eq!(doc.name.as_deref(), Some("orders"));
        assert_eq!(doc.attributes[1].name(), "amount");
        assert_eq!(doc.attributes[1].sql_type(), Some("NUMERIC"));
        assert_eq!(doc.attributes[0].sql_type(), None);
        assert!(doc.keys.is_empty());
    }

    #[test]
    fn build_normalizer() {
        let n = SchemaDocument::parse(ORDERS).unwrap().to_normalizer().unwrap();
        assert_eq!(n.len(), 4);
        assert_eq!(n.closure(&[0]), Ok(vec![0, 1, 2, 3]));
        assert_eq!(
            n.sample_rows()[1],
            vec!["2".to_string(), "12.5".into(), "bob".into(), "".into()]
        );
        assert_eq!(n.attributes()[1].sql_type_or_default(), "NUMERIC");
    }

    #[test]
    fn unknown_names_and_bad_json() {
        let doc = r#"{"attributes": ["a"], "dependencies": [{"lhs": ["a"], "rhs": ["b"]}]}"#;
        assert_eq!(
            SchemaDocument::parse(doc).unwrap().to_normalizer().err(),
            Some(NormalizeError::UnknownAttribute("b".into()))
        );
        assert!(matches!(
            SchemaDocument::parse("{\"attributes\": 3}"),
            Err(NormalizeError::Document(_))
        ));
        assert!(matches!(
            SchemaDocument::from_path("/nonexistent/schema.json"),
            Err(NormalizeError::Io { .. })
        ));
    }
}
