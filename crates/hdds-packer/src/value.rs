// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values packed and unpacked by the codec.

use crate::error::{Error, Result};
use std::collections::HashMap;

/// A value conforming to some registered type.
///
/// Struct fields are optional: a missing key and an absent field are the
/// same thing on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    /// Enum label.
    Enum(String),
    Struct(HashMap<String, Value>),
    Array(Vec<Value>),
}

impl Value {
    /// Struct value from `(field, value)` pairs.
    pub fn structure<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Enum label value.
    pub fn label(label: impl Into<String>) -> Self {
        Self::Enum(label.into())
    }

    /// Short kind name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Enum(_) => "enum",
            Self::Struct(_) => "struct",
            Self::Array(_) => "array",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// String contents or enum label.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) | Self::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_fields(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Self::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Struct field, `None` when absent or not a struct.
    pub fn get_field(&self, name: &str) -> Option<&Value> {
        self.as_fields()?.get(name)
    }

    /// Set a struct field. Returns false if this is not a struct.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) -> bool {
        match self {
            Self::Struct(fields) => {
                fields.insert(name.into(), value);
                true
            }
            _ => false,
        }
    }

    /// Convert from JSON.
    ///
    /// `null` object members are dropped (absent fields). Booleans and other
    /// `null`s have no counterpart and are rejected. JSON strings become
    /// [`Value::String`]; the encoder accepts them where a label is expected.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        use serde_json::Value as Json;

        match json {
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if n.is_u64() {
                    Err(Error::UnsupportedJson(format!("integer {n} exceeds i64")))
                } else {
                    n.as_f64()
                        .map(Self::Float)
                        .ok_or_else(|| Error::UnsupportedJson(n.to_string()))
                }
            }
            Json::String(s) => Ok(Self::String(s.clone())),
            Json::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>>>()
                .map(Self::Array),
            Json::Object(members) => {
                let mut fields = HashMap::with_capacity(members.len());
                for (key, member) in members {
                    if member.is_null() {
                        continue;
                    }
                    fields.insert(key.clone(), Self::from_json(member)?);
                }
                Ok(Self::Struct(fields))
            }
            Json::Bool(_) => Err(Error::UnsupportedJson("boolean".into())),
            Json::Null => Err(Error::UnsupportedJson("null".into())),
        }
    }

    /// Convert to JSON. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Self::Int(v) => Json::from(*v),
            Self::Float(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Self::String(v) | Self::Enum(v) => Json::String(v.clone()),
            Self::Struct(fields) => Json::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Array(items) => Json::Array(items.iter().map(Self::to_json).collect()),
        }
    }
}

// Conversion traits
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(v.into())
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_struct_value() {
        let mut v = Value::structure([("x", Value::from(10)), ("y", Value::from(2.5))]);
        assert_eq!(v.get_field("x").and_then(Value::as_i64), Some(10));
        assert_eq!(v.get_field("y").and_then(Value::as_f64), Some(2.5));
        assert!(v.get_field("z").is_none());

        assert!(v.set_field("z", "zed".into()));
        assert_eq!(v.get_field("z").and_then(Value::as_str), Some("zed"));
        assert!(!Value::from(1).set_field("z", Value::from(2)));
    }

    #[test]
    fn test_from_json() {
        let v = Value::from_json(&json!({
            "id": 7,
            "ratio": 0.5,
            "name": "probe",
            "tags": ["a", "b"],
            "gone": null
        }))
        .unwrap();

        assert_eq!(v.get_field("id"), Some(&Value::Int(7)));
        assert_eq!(v.get_field("ratio"), Some(&Value::Float(0.5)));
        assert_eq!(
            v.get_field("tags"),
            Some(&Value::from(vec!["a", "b"]))
        );
        assert!(v.get_field("gone").is_none());
    }

    #[test]
    fn test_from_json_rejects_unrepresentable() {
        assert!(matches!(
            Value::from_json(&json!(true)),
            Err(Error::UnsupportedJson(_))
        ));
        assert!(matches!(
            Value::from_json(&json!([1, null])),
            Err(Error::UnsupportedJson(_))
        ));
        assert!(matches!(
            Value::from_json(&json!(u64::MAX)),
            Err(Error::UnsupportedJson(_))
        ));
    }

    #[test]
    fn test_to_json() {
        let v = Value::structure([
            ("mood", Value::label("happy")),
            ("scores", Value::from(vec![1, -2])),
            ("nan", Value::Float(f64::NAN)),
        ]);
        assert_eq!(
            v.to_json(),
            json!({ "mood": "happy", "scores": [1, -2], "nan": null })
        );
    }
}
