// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Codec entry point.
//!
//! A [`Packer`] owns one type registry. Definitions take `&mut self`, packing
//! and unpacking take `&self`, so after the definition phase a packer can be
//! shared as `Arc<Packer>`. [`SharedPacker`] covers the case where types are
//! still being defined while other threads pack.

use crate::config::{CharUnits, PackerConfig, MAX_DEPTH_LIMIT};
use crate::decoder::TlvDecoder;
use crate::encoder::TlvEncoder;
use crate::error::Result;
use crate::registry::{TypeCode, TypeRegistry};
use crate::schema::{resolver, TypeDefinition};
use crate::value::Value;
use parking_lot::RwLock;

/// Schema-driven TLV codec.
#[derive(Debug, Clone)]
pub struct Packer {
    registry: TypeRegistry,
    max_depth: usize,
    char_units: CharUnits,
}

impl Default for Packer {
    fn default() -> Self {
        Self::new()
    }
}

impl Packer {
    /// Packer with only the built-in types and default options.
    pub fn new() -> Self {
        let config = PackerConfig::default();
        Self {
            registry: TypeRegistry::new(),
            max_depth: config.max_depth,
            char_units: config.char_units,
        }
    }

    /// Build a packer from configuration: reserve codes, then define the
    /// configured types in order.
    pub fn from_config(config: PackerConfig) -> Result<Self> {
        let mut packer = Self {
            registry: TypeRegistry::new(),
            max_depth: clamp_depth(config.max_depth),
            char_units: config.char_units,
        };
        if config.reserved_codes > 0 {
            packer.reserve_type_codes(config.reserved_codes)?;
        }
        for def in &config.types {
            packer.define_type(def)?;
        }

        log::info!(
            "[packer] loaded {} types from config (max_depth={}, char_units={:?})",
            config.types.len(),
            packer.max_depth,
            packer.char_units
        );
        Ok(packer)
    }

    /// Nesting bound for pack and unpack, clamped to `1..=MAX_DEPTH_LIMIT`.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = clamp_depth(max_depth);
        self
    }

    pub fn with_char_units(mut self, char_units: CharUnits) -> Self {
        self.char_units = char_units;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn char_units(&self) -> CharUnits {
        self.char_units
    }

    /// Registered types.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Register a type and return its wire code.
    ///
    /// On error the registry is left exactly as it was.
    pub fn define_type(&mut self, def: &TypeDefinition) -> Result<TypeCode> {
        resolver::define(&mut self.registry, def)
    }

    /// Register a type from its JSON description.
    pub fn define_type_json(&mut self, json: &str) -> Result<TypeCode> {
        let def = TypeDefinition::from_json(json)?;
        self.define_type(&def)
    }

    /// Register every type of a JSON array, in order.
    ///
    /// Stops at the first failure; types defined before it stay registered.
    pub fn define_types_json(&mut self, json: &str) -> Result<Vec<TypeCode>> {
        TypeDefinition::list_from_json(json)?
            .iter()
            .map(|def| self.define_type(def))
            .collect()
    }

    /// Reserve `count` consecutive codes for explicit assignment.
    ///
    /// Returns the first reserved code, or [`crate::Error::CodeSpaceExhausted`]
    /// if the block does not fit below `u64::MAX`.
    pub fn reserve_type_codes(&mut self, count: u64) -> Result<TypeCode> {
        self.registry.reserve_codes(count)
    }

    /// Encode `value` as the registered type `type_name`.
    pub fn pack(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        TlvEncoder::new(&self.registry, self.max_depth, self.char_units).encode(type_name, value)
    }

    /// Encode a JSON value as the registered type `type_name`.
    pub fn pack_json(&self, type_name: &str, json: &serde_json::Value) -> Result<Vec<u8>> {
        self.pack(type_name, &Value::from_json(json)?)
    }

    /// Decode the first record of `bytes`; its type code selects the type.
    pub fn unpack(&self, bytes: &[u8]) -> Result<Value> {
        TlvDecoder::new(&self.registry, self.max_depth).decode(bytes)
    }

    /// Decode the first record of `bytes` as the registered type `type_name`.
    pub fn unpack_as(&self, type_name: &str, bytes: &[u8]) -> Result<Value> {
        TlvDecoder::new(&self.registry, self.max_depth).decode_as(type_name, bytes)
    }

    /// Decode to JSON.
    pub fn unpack_json(&self, bytes: &[u8]) -> Result<serde_json::Value> {
        self.unpack(bytes).map(|value| value.to_json())
    }
}

fn clamp_depth(max_depth: usize) -> usize {
    let clamped = max_depth.clamp(1, MAX_DEPTH_LIMIT);
    if clamped != max_depth {
        log::warn!(
            "[packer] max_depth {} out of range, using {}",
            max_depth,
            clamped
        );
    }
    clamped
}

/// A [`Packer`] behind a read/write lock.
///
/// Definitions take the write lock; packing and unpacking share the read
/// lock.
#[derive(Debug, Default)]
pub struct SharedPacker {
    inner: RwLock<Packer>,
}

impl SharedPacker {
    pub fn new(packer: Packer) -> Self {
        Self {
            inner: RwLock::new(packer),
        }
    }

    pub fn define_type(&self, def: &TypeDefinition) -> Result<TypeCode> {
        self.inner.write().define_type(def)
    }

    pub fn define_type_json(&self, json: &str) -> Result<TypeCode> {
        // Parse outside the lock.
        let def = TypeDefinition::from_json(json)?;
        self.define_type(&def)
    }

    pub fn reserve_type_codes(&self, count: u64) -> Result<TypeCode> {
        self.inner.write().reserve_type_codes(count)
    }

    pub fn pack(&self, type_name: &str, value: &Value) -> Result<Vec<u8>> {
        self.inner.read().pack(type_name, value)
    }

    pub fn unpack(&self, bytes: &[u8]) -> Result<Value> {
        self.inner.read().unpack(bytes)
    }

    pub fn unpack_as(&self, type_name: &str, bytes: &[u8]) -> Result<Value> {
        self.inner.read().unpack_as(type_name, bytes)
    }

    /// Code of a registered type.
    pub fn code_of(&self, type_name: &str) -> Option<TypeCode> {
        self.inner.read().registry().code_of(type_name)
    }

    pub fn into_inner(self) -> Packer {
        self.inner.into_inner()
    }
}

impl From<Packer> for SharedPacker {
    fn from(packer: Packer) -> Self {
        Self::new(packer)
    }
}
