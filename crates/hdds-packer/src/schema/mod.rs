// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative type descriptions.
//!
//! Descriptions are plain data (JSON or TOML friendly) and use the key names
//! existing peers exchange: `name`, `type`, `items`, `fields`, `entryType`
//! and `typeCode`.
//!
//! ```json
//! { "name": "Person", "type": "struct", "fields": [
//!     { "name": "name", "type": "string" },
//!     { "name": "age",  "type": "int" },
//!     { "name": "mood", "type": "enum", "items": ["happy", "sad"] },
//!     { "name": "tags", "type": "array", "entryType": "string" }
//! ] }
//! ```

mod builder;
pub(crate) mod resolver;

use crate::error::SchemaError;
use crate::registry::TypeCode;
use serde::{Deserialize, Serialize};

/// Either a reference to a registered type or an inline definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDescription {
    /// Name of an already registered type.
    Alias(String),
    /// Full definition.
    Definition(Box<TypeDefinition>),
}

impl From<&str> for TypeDescription {
    fn from(name: &str) -> Self {
        Self::Alias(name.to_string())
    }
}

impl From<String> for TypeDescription {
    fn from(name: String) -> Self {
        Self::Alias(name)
    }
}

impl From<TypeDefinition> for TypeDescription {
    fn from(def: TypeDefinition) -> Self {
        Self::Definition(Box::new(def))
    }
}

/// Object form of a type description.
///
/// Every key is optional at the data level; the resolver reports what a
/// given base type requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    /// Registered name (top-level definitions) or field name (struct fields).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Base: a built-in (`int`, `string`, `enum`, ...) or a registered type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Enum labels, in ordinal order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,

    /// Struct fields, in wire order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<TypeDefinition>>,

    /// Array element type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<Box<TypeDescription>>,

    /// Explicit wire code, typically from a reserved block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<TypeCode>,
}

impl TypeDefinition {
    /// Parse a single definition from JSON text.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::Json(e.to_string()))
    }

    /// Parse a JSON array of definitions.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, SchemaError> {
        serde_json::from_str(json).map_err(|e| SchemaError::Json(e.to_string()))
    }

    /// Serialize back to JSON text.
    pub fn to_json(&self) -> String {
        // Plain data with string keys, serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_definition() {
        let def = TypeDefinition::from_json(
            r#"{
                "name": "Person",
                "type": "struct",
                "typeCode": 40,
                "fields": [
                    { "name": "age", "type": "int" },
                    { "name": "tags", "type": "array", "entryType": "string" },
                    { "name": "pets", "type": "array",
                      "entryType": { "type": "enum", "items": ["cat", "dog"] } }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(def.name.as_deref(), Some("Person"));
        assert_eq!(def.base.as_deref(), Some("struct"));
        assert_eq!(def.type_code, Some(40));

        let fields = def.fields.as_ref().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(
            fields[1].entry_type.as_deref(),
            Some(&TypeDescription::Alias("string".into()))
        );
        match fields[2].entry_type.as_deref() {
            Some(TypeDescription::Definition(inner)) => {
                assert_eq!(inner.items.as_ref().map(Vec::len), Some(2));
            }
            other => panic!("expected inline definition, got {other:?}"),
        }
    }

    #[test]
    fn test_json_roundtrip_uses_wire_keys() {
        let def = TypeDefinition {
            name: Some("Ids".into()),
            base: Some("array".into()),
            entry_type: Some(Box::new("int".into())),
            type_code: Some(12),
            ..Default::default()
        };
        let json = def.to_json();
        assert!(json.contains("\"entryType\":\"int\""));
        assert!(json.contains("\"typeCode\":12"));
        assert!(json.contains("\"type\":\"array\""));
        assert_eq!(TypeDefinition::from_json(&json).unwrap(), def);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            TypeDefinition::from_json("{ \"name\": 3 }"),
            Err(SchemaError::Json(_))
        ));
    }
}
