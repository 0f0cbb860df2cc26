// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! TLV decoder.
//!
//! Input is untrusted: every header and payload is bounds-checked against the
//! slice it came from before use, and nesting is capped, so malformed input
//! always ends in an error rather than a panic.

use crate::descriptor::{BaseKind, TypeDescriptor, TypeKind, TypeRef};
use crate::error::{Error, Result};
use crate::registry::{TypeCode, TypeRegistry};
use crate::value::Value;
use crate::varint::{decode_varint, decode_varint_sequence};
use std::collections::HashMap;

/// Smallest possible record: one-byte code, one-byte length.
const MIN_RECORD_LEN: usize = 2;

/// One record split out of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Record<'b> {
    pub code: TypeCode,
    pub payload: &'b [u8],
}

/// Split the record at the front of `bytes`, returning it and what follows.
pub(crate) fn read_record(bytes: &[u8]) -> Result<(Record<'_>, &[u8])> {
    let (header, consumed) = decode_varint_sequence(bytes, Some(2))?;
    let &[code, len] = header.as_slice() else {
        return Err(Error::TruncatedVarint { offset: consumed });
    };

    let body = &bytes[consumed..];
    let len = usize::try_from(len).unwrap_or(usize::MAX);
    if len > body.len() {
        return Err(Error::TruncatedRecord {
            needed: len,
            available: body.len(),
        });
    }

    let (payload, rest) = body.split_at(len);
    log::trace!("[packer] read record code={} len={}", code, len);
    Ok((Record { code, payload }, rest))
}

/// Walks a type graph and rebuilds values from records.
pub(crate) struct TlvDecoder<'a> {
    registry: &'a TypeRegistry,
    max_depth: usize,
}

impl<'a> TlvDecoder<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    /// Decode the first record of `bytes`, typed by its own code.
    ///
    /// Bytes after the first record are ignored.
    pub(crate) fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let (record, _) = read_record(bytes)?;
        let descriptor = self.registry.lookup_by_code(record.code)?;
        self.decode_required(record, descriptor, 1)
    }

    /// Decode the first record of `bytes` as the registered type `type_name`.
    pub(crate) fn decode_as(&self, type_name: &str, bytes: &[u8]) -> Result<Value> {
        let descriptor = self.registry.lookup_by_name(type_name)?;
        let (record, _) = read_record(bytes)?;
        self.decode_required(record, descriptor, 1)
    }

    /// Decode one record, `None` if its payload is empty (absent).
    ///
    /// With `expected`, the stream code does not pick the type; it only
    /// marks negative integers.
    pub(crate) fn decode_record<'b>(
        &self,
        bytes: &'b [u8],
        expected: Option<&TypeRef>,
        depth: usize,
    ) -> Result<(Option<Value>, &'b [u8])> {
        let (record, rest) = read_record(bytes)?;
        if record.payload.is_empty() {
            return Ok((None, rest));
        }

        let descriptor = match expected {
            Some(type_ref) => self.resolve(type_ref)?,
            None => self.registry.lookup_by_code(record.code)?.as_ref(),
        };
        let value = self.decode_payload(record, descriptor, depth)?;
        Ok((Some(value), rest))
    }

    fn resolve<'d>(&'d self, type_ref: &'d TypeRef) -> Result<&'d TypeDescriptor> {
        match type_ref {
            TypeRef::Named(code) => Ok(self.registry.lookup_by_code(*code)?.as_ref()),
            TypeRef::Inline(descriptor) => Ok(descriptor.as_ref()),
        }
    }

    /// Decode where absence cannot be represented: empty payloads become the
    /// empty value of the kind, if it has one.
    fn decode_required(
        &self,
        record: Record<'_>,
        descriptor: &TypeDescriptor,
        depth: usize,
    ) -> Result<Value> {
        if !record.payload.is_empty() {
            return self.decode_payload(record, descriptor, depth);
        }
        match descriptor.kind {
            TypeKind::String => Ok(Value::String(String::new())),
            TypeKind::Array(_) => Ok(Value::Array(Vec::new())),
            _ => Err(Error::EmptyRecord(record.code)),
        }
    }

    fn decode_payload(
        &self,
        record: Record<'_>,
        descriptor: &TypeDescriptor,
        depth: usize,
    ) -> Result<Value> {
        if depth > self.max_depth {
            return Err(Error::DepthLimitExceeded(self.max_depth));
        }

        let payload = record.payload;
        match &descriptor.kind {
            TypeKind::Int => {
                let magnitude = single_varint(payload, "int")?;
                if record.code == BaseKind::NegInt.code() {
                    negate(magnitude).map(Value::Int)
                } else {
                    i64::try_from(magnitude)
                        .map(Value::Int)
                        .map_err(|_| Error::IntegerOverflow(magnitude))
                }
            }
            TypeKind::NegInt => negate(single_varint(payload, "neg-int")?).map(Value::Int),
            TypeKind::Float => {
                let raw: [u8; 8] = payload.try_into().map_err(|_| Error::InvalidPayload {
                    kind: "float",
                    len: payload.len(),
                })?;
                Ok(Value::Float(f64::from_le_bytes(raw)))
            }
            TypeKind::String => {
                let (codes, _) = decode_varint_sequence(payload, None)?;
                decode_chars(&codes).map(Value::String)
            }
            TypeKind::Enum(items) => {
                let ordinal = single_varint(payload, "enum")?;
                items
                    .label(ordinal)
                    .map(Value::label)
                    .ok_or_else(|| Error::UnknownEnumOrdinal {
                        enum_name: descriptor.name.clone(),
                        ordinal,
                    })
            }
            TypeKind::Struct(layout) => {
                let mut fields = HashMap::with_capacity(layout.fields().len());
                let mut rest = payload;

                for field in layout.fields() {
                    if rest.len() < MIN_RECORD_LEN {
                        return Err(Error::TruncatedRecord {
                            needed: MIN_RECORD_LEN,
                            available: rest.len(),
                        });
                    }
                    let (value, tail) = self.decode_record(rest, Some(&field.type_ref), depth + 1)?;
                    if let Some(value) = value {
                        fields.insert(field.name.clone(), value);
                    }
                    rest = tail;
                }

                // Leftover bytes: the declared length disagrees with the fields.
                if !rest.is_empty() {
                    return Err(Error::TruncatedRecord {
                        needed: payload.len() - rest.len(),
                        available: payload.len(),
                    });
                }
                Ok(Value::Struct(fields))
            }
            TypeKind::Array(array) => {
                let entry = self.resolve(&array.entry)?;
                let mut items = Vec::new();
                let mut rest = payload;

                // Every record consumes at least two bytes, so this ends.
                while !rest.is_empty() {
                    let (element, tail) = read_record(rest)?;
                    items.push(self.decode_required(element, entry, depth + 1)?);
                    rest = tail;
                }
                Ok(Value::Array(items))
            }
        }
    }
}

/// Payload holding exactly one varint.
fn single_varint(payload: &[u8], kind: &'static str) -> Result<u64> {
    let (value, used) = decode_varint(payload, 0)?;
    if used != payload.len() {
        return Err(Error::InvalidPayload {
            kind,
            len: payload.len(),
        });
    }
    Ok(value)
}

fn negate(magnitude: u64) -> Result<i64> {
    0i64.checked_sub_unsigned(magnitude)
        .ok_or(Error::IntegerOverflow(magnitude))
}

/// Rebuild a string from character codes.
///
/// Accepts code points and UTF-16 units alike: surrogate pairs are joined,
/// lone surrogates are rejected.
fn decode_chars(codes: &[u64]) -> Result<String> {
    let mut out = String::with_capacity(codes.len());
    let mut iter = codes.iter().copied().peekable();

    while let Some(code) = iter.next() {
        let scalar = match code {
            0xD800..=0xDBFF => match iter.peek() {
                Some(&low) if (0xDC00..=0xDFFF).contains(&low) => {
                    iter.next();
                    0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00)
                }
                _ => return Err(Error::InvalidCharCode(code)),
            },
            _ => code,
        };
        let c = u32::try_from(scalar)
            .ok()
            .and_then(char::from_u32)
            .ok_or(Error::InvalidCharCode(scalar))?;
        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ArrayDescriptor, FieldDescriptor, StructDescriptor};
    use std::sync::Arc;

    fn registry() -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        let pair = TypeDescriptor::new(
            "Pair",
            TypeKind::Struct(StructDescriptor::new(vec![
                FieldDescriptor::new("a", TypeRef::Named(BaseKind::Int.code())),
                FieldDescriptor::new("b", TypeRef::Named(BaseKind::String.code())),
            ])),
        );
        registry.store_type("Pair", Arc::new(pair), None).unwrap();

        let ids = TypeDescriptor::new(
            "Ids",
            TypeKind::Array(ArrayDescriptor::new(TypeRef::Named(BaseKind::Int.code()))),
        );
        registry.store_type("Ids", Arc::new(ids), None).unwrap();
        registry
    }

    fn decode(bytes: &[u8]) -> Result<Value> {
        let registry = registry();
        TlvDecoder::new(&registry, 64).decode(bytes)
    }

    #[test]
    fn test_read_record() {
        let (record, rest) = read_record(&[6, 2, 0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(record.code, 6);
        assert_eq!(record.payload, &[0xAA, 0xBB]);
        assert_eq!(rest, &[0xCC]);

        assert_eq!(
            read_record(&[6]).unwrap_err(),
            Error::TruncatedVarint { offset: 1 }
        );
        assert_eq!(
            read_record(&[6, 5, 1]).unwrap_err(),
            Error::TruncatedRecord {
                needed: 5,
                available: 1
            }
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(decode(&[0, 1, 5]).unwrap(), Value::Int(5));
        assert_eq!(decode(&[1, 1, 5]).unwrap(), Value::Int(-5));
        assert_eq!(decode(&[2, 2, b'o', b'k']).unwrap(), Value::from("ok"));
        assert_eq!(decode(&[2, 0]).unwrap(), Value::from(""));

        let mut float = vec![3, 8];
        float.extend_from_slice(&(-0.25f64).to_le_bytes());
        assert_eq!(decode(&float).unwrap(), Value::Float(-0.25));
    }

    #[test]
    fn test_surrogate_pairs() {
        // U+1F600 as two UTF-16 units and as one code point.
        assert_eq!(
            decode(&[2, 6, 0xBD, 0xB0, 0x03, 0x80, 0xBC, 0x03]).unwrap(),
            Value::from("😀")
        );
        assert_eq!(
            decode(&[2, 3, 0x80, 0xEC, 0x07]).unwrap(),
            Value::from("😀")
        );
        assert_eq!(
            decode(&[2, 3, 0xBD, 0xB0, 0x03]).unwrap_err(),
            Error::InvalidCharCode(0xD83D)
        );
    }

    #[test]
    fn test_struct_absent_and_negative_fields() {
        // a = -3 (neg-int tag), b absent.
        let value = decode(&[7, 5, 1, 1, 3, 2, 0]).unwrap();
        assert_eq!(value, Value::structure([("a", Value::Int(-3))]));
    }

    #[test]
    fn test_struct_shape_errors() {
        assert_eq!(
            decode(&[7, 3, 0, 1, 1]).unwrap_err(),
            Error::TruncatedRecord {
                needed: 2,
                available: 0
            }
        );
        assert_eq!(
            decode(&[7, 5, 0, 0, 2, 0, 9]).unwrap_err(),
            Error::TruncatedRecord {
                needed: 4,
                available: 5
            }
        );
    }

    #[test]
    fn test_array_elements() {
        assert_eq!(
            decode(&[8, 6, 0, 1, 1, 1, 1, 2]).unwrap(),
            Value::from(vec![1, -2])
        );
        assert_eq!(decode(&[8, 0]).unwrap(), Value::Array(vec![]));
        assert_eq!(decode(&[8, 2, 0, 0]).unwrap_err(), Error::EmptyRecord(0));
    }

    #[test]
    fn test_payload_validation() {
        assert_eq!(
            decode(&[0, 2, 1, 1]).unwrap_err(),
            Error::InvalidPayload { kind: "int", len: 2 }
        );
        assert_eq!(
            decode(&[3, 1, 0]).unwrap_err(),
            Error::InvalidPayload {
                kind: "float",
                len: 1
            }
        );
        assert_eq!(decode(&[0, 0]).unwrap_err(), Error::EmptyRecord(0));

        let mut huge = vec![0, 10];
        huge.extend_from_slice(&[0xFF; 9]);
        huge.push(0x01);
        assert_eq!(
            decode(&huge).unwrap_err(),
            Error::IntegerOverflow(u64::MAX)
        );
    }

    #[test]
    fn test_unknown_and_abstract_codes() {
        assert_eq!(decode(&[42, 1, 0]).unwrap_err(), Error::UnknownTypeCode(42));
        assert!(matches!(
            decode(&[6, 1, 0]),
            Err(Error::AbstractType(_))
        ));
    }

    #[test]
    fn test_trailing_top_level_bytes_ignored() {
        assert_eq!(decode(&[0, 1, 7, 0xFF, 0xFF]).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_decode_as() {
        let registry = registry();
        let decoder = TlvDecoder::new(&registry, 64);
        // Stream code is ignored when the type is given.
        assert_eq!(
            decoder.decode_as("Ids", &[5, 3, 0, 1, 4]).unwrap(),
            Value::from(vec![4])
        );
        assert_eq!(
            decoder.decode_as("Nope", &[0, 1, 4]).unwrap_err(),
            Error::UnknownType("Nope".into())
        );
    }

    #[test]
    fn test_depth_limit() {
        let registry = registry();
        let err = TlvDecoder::new(&registry, 1)
            .decode(&[8, 3, 0, 1, 1])
            .unwrap_err();
        assert_eq!(err, Error::DepthLimitExceeded(1));
    }
}
