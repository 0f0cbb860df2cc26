// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Variable-length unsigned integers.
//!
//! Each byte carries 7 bits of the value, least-significant group first.
//! The high bit (0x80) is set on every byte except the last one.
//!
//! ```text
//!   0       -> 00
//!   127     -> 7f
//!   128     -> 80 01
//!   300     -> ac 02
//!   16384   -> 80 80 01
//! ```

use crate::error::{Error, Result};

/// Continuation bit.
const CONTINUATION: u8 = 0x80;

/// Payload bits per byte.
const GROUP_MASK: u8 = 0x7f;

/// Longest encoding of a `u64` (ceil(64 / 7)).
pub const MAX_VARINT_LEN: usize = 10;

/// Number of bytes needed to encode `value`.
pub fn varint_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Append the varint encoding of `value` to `out`.
pub fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value > u64::from(GROUP_MASK) {
        out.push((value as u8 & GROUP_MASK) | CONTINUATION);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Encode `value` into a fresh buffer. Always at least one byte.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(varint_len(value));
    write_varint(&mut out, value);
    out
}

/// Decode one varint starting at `offset`.
///
/// Returns the value and the number of bytes consumed (terminating byte
/// included).
pub fn decode_varint(bytes: &[u8], offset: usize) -> Result<(u64, usize)> {
    let tail = bytes.get(offset..).unwrap_or_default();
    let mut value = 0u64;
    let mut shift = 0u32;

    for (i, &byte) in tail.iter().enumerate() {
        let group = u64::from(byte & GROUP_MASK);
        if shift > 63 || (shift == 63 && group > 1) {
            return Err(Error::VarintOverflow { offset });
        }
        value |= group << shift;
        if byte & CONTINUATION == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }

    Err(Error::TruncatedVarint { offset })
}

/// Decode consecutive varints from the start of `bytes`.
///
/// With `limit`, stops once that many values were read; otherwise reads until
/// the buffer is exhausted. Returns the values and the total bytes consumed.
pub fn decode_varint_sequence(bytes: &[u8], limit: Option<usize>) -> Result<(Vec<u64>, usize)> {
    let mut values = Vec::with_capacity(limit.unwrap_or(bytes.len()).min(bytes.len()));
    let mut offset = 0;

    while offset < bytes.len() {
        if limit.is_some_and(|max| values.len() >= max) {
            break;
        }
        let (value, used) = decode_varint(bytes, offset)?;
        values.push(value);
        offset += used;
    }

    Ok((values, offset))
}
