// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema definition, packing and unpacking.

use crate::registry::TypeCode;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed or incomplete type definition.
///
/// Raised only while defining types, never during pack/unpack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("missing 'name' in type definition")]
    MissingName,

    #[error("missing 'type' in definition of '{0}'")]
    MissingType(String),

    #[error("unknown type '{referenced}' referenced by '{name}'")]
    UnknownType { name: String, referenced: String },

    #[error("missing 'items' in enum definition '{0}'")]
    MissingItems(String),

    #[error("enum '{0}' declares no items")]
    EmptyItems(String),

    #[error("enum '{name}' declares item '{item}' twice")]
    DuplicateItem { name: String, item: String },

    #[error("missing 'fields' in struct definition '{0}'")]
    MissingFields(String),

    #[error("struct '{0}' declares no fields")]
    EmptyFields(String),

    #[error("missing name of field #{index} in struct '{name}'")]
    MissingFieldName { name: String, index: usize },

    #[error("struct '{name}' declares field '{field}' twice")]
    DuplicateField { name: String, field: String },

    #[error("missing 'entryType' in array definition '{0}'")]
    MissingEntryType(String),

    #[error("invalid type description: {0}")]
    Json(String),
}

/// Codec errors. Every variant is fatal to the single operation that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("unknown type code {0}")]
    UnknownTypeCode(TypeCode),

    #[error("built-in type '{0}' has no structure of its own")]
    AbstractType(String),

    #[error("type '{0}' is already registered")]
    DuplicateType(String),

    #[error("type code {code} is already used by '{existing}'")]
    DuplicateTypeCode { code: TypeCode, existing: String },

    #[error("unknown value '{label}' for enum '{enum_name}'")]
    UnknownEnumValue { enum_name: String, label: String },

    #[error("unknown ordinal {ordinal} for enum '{enum_name}'")]
    UnknownEnumOrdinal { enum_name: String, ordinal: u64 },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("truncated varint at offset {offset}")]
    TruncatedVarint { offset: usize },

    #[error("varint at offset {offset} does not fit in 64 bits")]
    VarintOverflow { offset: usize },

    #[error("truncated record: need {needed} bytes, have {available}")]
    TruncatedRecord { needed: usize, available: usize },

    #[error("type code space exhausted")]
    CodeSpaceExhausted,

    #[error("empty record for type code {0} where a value is required")]
    EmptyRecord(TypeCode),

    #[error("invalid {kind} payload of {len} bytes")]
    InvalidPayload { kind: &'static str, len: usize },

    #[error("integer magnitude {0} does not fit in i64")]
    IntegerOverflow(u64),

    #[error("invalid character code {0:#x}")]
    InvalidCharCode(u64),

    #[error("nesting depth exceeds limit of {0}")]
    DepthLimitExceeded(usize),

    #[error("unsupported JSON value: {0}")]
    UnsupportedJson(String),
}
