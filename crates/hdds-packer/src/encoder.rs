// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TLV encoder.
//!
//! Every value becomes one record, `[type code][payload length][payload]`,
//! with both header fields written as varints. Composite payloads are the
//! concatenated records of their children.
//!
//! Encoding runs in two passes. The first validates the value against its
//! type and records every composite payload length in pre-order; the second
//! writes headers and children straight into the output buffer, so nested
//! payloads are never staged and copied.

use crate::config::CharUnits;
use crate::descriptor::{BaseKind, TypeDescriptor, TypeKind, TypeRef};
use crate::error::{Error, Result};
use crate::registry::{TypeCode, TypeRegistry};
use crate::value::Value;
use crate::varint::{varint_len, write_varint};
use std::collections::HashMap;

/// Largest float magnitude below which every integral value fits in `i64`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Payload of a non-composite record, validated and ready to write.
enum Scalar<'v> {
    Varint(u64),
    Float([u8; 8]),
    Chars(&'v str),
}

impl Scalar<'_> {
    fn len(&self, units: CharUnits) -> usize {
        match self {
            Scalar::Varint(v) => varint_len(*v),
            Scalar::Float(raw) => raw.len(),
            Scalar::Chars(s) => match units {
                CharUnits::Utf16 => s.encode_utf16().map(|u| varint_len(u64::from(u))).sum(),
                CharUnits::CodePoints => s
                    .chars()
                    .map(|c| varint_len(u64::from(u32::from(c))))
                    .sum(),
            },
        }
    }

    fn write(&self, out: &mut Vec<u8>, units: CharUnits) {
        match self {
            Scalar::Varint(v) => write_varint(out, *v),
            Scalar::Float(raw) => out.extend_from_slice(raw),
            Scalar::Chars(s) => match units {
                CharUnits::Utf16 => s
                    .encode_utf16()
                    .for_each(|unit| write_varint(out, u64::from(unit))),
                CharUnits::CodePoints => s
                    .chars()
                    .for_each(|c| write_varint(out, u64::from(u32::from(c)))),
            },
        }
    }
}

/// Walks a type graph and writes the matching records.
pub(crate) struct TlvEncoder<'a> {
    registry: &'a TypeRegistry,
    max_depth: usize,
    char_units: CharUnits,
}

impl<'a> TlvEncoder<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, max_depth: usize, char_units: CharUnits) -> Self {
        Self {
            registry,
            max_depth,
            char_units,
        }
    }

    /// Encode `value` as the registered type `type_name`.
    ///
    /// Nothing is returned unless the whole value encodes.
    pub(crate) fn encode(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        let entry = self.registry.entry_by_name(type_name)?;
        let descriptor = entry.descriptor()?;

        let mut lengths = Vec::new();
        let total = self.measure(entry.code, descriptor, value, 1, &mut lengths)?;

        let mut out = Vec::with_capacity(total);
        self.write(&mut out, entry.code, descriptor, value, &mut lengths.into_iter())?;
        Ok(out)
    }

    /// Tag code and descriptor for a child slot.
    fn resolve<'d>(&'d self, type_ref: &'d TypeRef) -> Result<(TypeCode, &'d TypeDescriptor)> {
        match type_ref {
            TypeRef::Named(code) => Ok((*code, self.registry.lookup_by_code(*code)?.as_ref())),
            TypeRef::Inline(descriptor) => Ok((descriptor.base().code(), descriptor.as_ref())),
        }
    }

    /// Validate `value` and return its full record length.
    ///
    /// Pushes one payload length per composite, parent before children.
    fn measure(
        &self,
        code: TypeCode,
        descriptor: &TypeDescriptor,
        value: &Value,
        depth: usize,
        lengths: &mut Vec<usize>,
    ) -> Result<usize> {
        if depth > self.max_depth {
            return Err(Error::DepthLimitExceeded(self.max_depth));
        }

        let (tag, payload_len) = match &descriptor.kind {
            TypeKind::Struct(layout) => {
                let fields = struct_fields(value)?;
                for key in fields.keys().filter(|key| layout.field(key).is_none()) {
                    log::debug!(
                        "[packer] ignoring unknown field '{}' of struct '{}'",
                        key,
                        descriptor.name
                    );
                }

                let slot = lengths.len();
                lengths.push(0);
                let mut len = 0;
                for field in layout.fields() {
                    let (field_code, field_type) = self.resolve(&field.type_ref)?;
                    len += match fields.get(&field.name) {
                        Some(v) => self.measure(field_code, field_type, v, depth + 1, lengths)?,
                        None => record_len(field_code, 0),
                    };
                }
                lengths[slot] = len;
                (code, len)
            }
            TypeKind::Array(array) => {
                let items = value.as_array().ok_or_else(|| mismatch("array", value))?;
                let (entry_code, entry_type) = self.resolve(&array.entry)?;

                let slot = lengths.len();
                lengths.push(0);
                let mut len = 0;
                for item in items {
                    len += self.measure(entry_code, entry_type, item, depth + 1, lengths)?;
                }
                lengths[slot] = len;
                (code, len)
            }
            _ => {
                let (tag, payload) = scalar(code, descriptor, value)?;
                (tag, payload.len(self.char_units))
            }
        };

        Ok(record_len(tag, payload_len))
    }

    /// Write a value already accepted by [`Self::measure`], consuming its
    /// composite lengths in the same order.
    fn write(
        &self,
        out: &mut Vec<u8>,
        code: TypeCode,
        descriptor: &TypeDescriptor,
        value: &Value,
        lengths: &mut impl Iterator<Item = usize>,
    ) -> Result<()> {
        match &descriptor.kind {
            TypeKind::Struct(layout) => {
                let fields = struct_fields(value)?;
                write_header(out, code, lengths.next().unwrap_or_default());
                for field in layout.fields() {
                    let (field_code, field_type) = self.resolve(&field.type_ref)?;
                    match fields.get(&field.name) {
                        Some(v) => self.write(out, field_code, field_type, v, lengths)?,
                        None => write_header(out, field_code, 0),
                    }
                }
            }
            TypeKind::Array(array) => {
                let items = value.as_array().ok_or_else(|| mismatch("array", value))?;
                let (entry_code, entry_type) = self.resolve(&array.entry)?;
                write_header(out, code, lengths.next().unwrap_or_default());
                for item in items {
                    self.write(out, entry_code, entry_type, item, lengths)?;
                }
            }
            _ => {
                let (tag, payload) = scalar(code, descriptor, value)?;
                write_header(out, tag, payload.len(self.char_units));
                payload.write(out, self.char_units);
            }
        }
        Ok(())
    }
}

/// Validate a non-composite value and pick its tag.
fn scalar<'v>(
    code: TypeCode,
    descriptor: &TypeDescriptor,
    value: &'v Value,
) -> Result<(TypeCode, Scalar<'v>)> {
    match &descriptor.kind {
        TypeKind::Int => {
            let v = int_value(value)?;
            // Sign is carried by the tag alone.
            let tag = if v < 0 { BaseKind::NegInt.code() } else { code };
            Ok((tag, Scalar::Varint(v.unsigned_abs())))
        }
        TypeKind::NegInt => {
            let v = int_value(value)?;
            if v > 0 {
                return Err(Error::TypeMismatch {
                    expected: "non-positive int",
                    found: "positive int",
                });
            }
            Ok((code, Scalar::Varint(v.unsigned_abs())))
        }
        TypeKind::Float => {
            let v = value.as_f64().ok_or_else(|| mismatch("float", value))?;
            Ok((code, Scalar::Float(v.to_le_bytes())))
        }
        TypeKind::String => match value {
            Value::String(s) => Ok((code, Scalar::Chars(s))),
            other => Err(mismatch("string", other)),
        },
        TypeKind::Enum(items) => {
            let label = value.as_str().ok_or_else(|| mismatch("enum", value))?;
            let ordinal = items
                .ordinal(label)
                .ok_or_else(|| Error::UnknownEnumValue {
                    enum_name: descriptor.name.clone(),
                    label: label.to_string(),
                })?;
            Ok((code, Scalar::Varint(ordinal)))
        }
        TypeKind::Struct(_) | TypeKind::Array(_) => Err(mismatch("scalar", value)),
    }
}

fn struct_fields(value: &Value) -> Result<&HashMap<String, Value>> {
    value.as_fields().ok_or_else(|| mismatch("struct", value))
}

fn record_len(code: TypeCode, payload_len: usize) -> usize {
    varint_len(code) + varint_len(payload_len as u64) + payload_len
}

/// Append a record header; the payload follows.
fn write_header(out: &mut Vec<u8>, code: TypeCode, payload_len: usize) {
    write_varint(out, code);
    write_varint(out, payload_len as u64);
    log::trace!("[packer] wrote record code={} len={}", code, payload_len);
}

/// Integer slots also take floats without a fractional part.
fn int_value(value: &Value) -> Result<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::Float(f) if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(f) => {
            Ok(*f as i64)
        }
        other => Err(mismatch("int", other)),
    }
}

fn mismatch(expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        expected,
        found: found.kind_name(),
    }
}
