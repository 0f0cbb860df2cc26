// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type registry: names and wire codes for every known type.
//!
//! Entries are append-only. Once traffic has named a type by code, that code
//! keeps its meaning for the lifetime of the registry.

use crate::descriptor::{BaseKind, TypeDescriptor};
use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Wire identifier of a type.
pub type TypeCode = u64;

/// One registered type.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    pub code: TypeCode,
    pub name: String,
    /// `None` only for the composite built-ins (`enum`, `array`, `struct`),
    /// which have no structure until a definition supplies one.
    descriptor: Option<Arc<TypeDescriptor>>,
}

impl TypeEntry {
    /// Resolved descriptor, or [`Error::AbstractType`] for bare built-ins.
    pub fn descriptor(&self) -> Result<&Arc<TypeDescriptor>> {
        self.descriptor
            .as_ref()
            .ok_or_else(|| Error::AbstractType(self.name.clone()))
    }

    /// True for the `enum`, `array` and `struct` built-ins.
    pub fn is_abstract(&self) -> bool {
        self.descriptor.is_none()
    }
}

/// Name/code table owned by one codec instance.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    by_code: BTreeMap<TypeCode, TypeEntry>,
    by_name: HashMap<String, TypeCode>,
    next_code: TypeCode,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Registry holding the seven built-ins at codes 0..=6.
    pub fn new() -> Self {
        let mut registry = Self {
            by_code: BTreeMap::new(),
            by_name: HashMap::new(),
            next_code: 0,
        };
        for kind in BaseKind::ALL {
            let code = registry.next_code;
            registry.insert(
                code,
                kind.name().to_string(),
                TypeDescriptor::scalar(kind).map(Arc::new),
            );
            registry.next_code += 1;
        }
        registry
    }

    fn insert(&mut self, code: TypeCode, name: String, descriptor: Option<Arc<TypeDescriptor>>) {
        self.by_name.insert(name.clone(), code);
        self.by_code.insert(
            code,
            TypeEntry {
                code,
                name,
                descriptor,
            },
        );
    }

    /// Code the next sequential registration will receive.
    ///
    /// Skips codes already taken by explicitly numbered entries. Fails with
    /// [`Error::CodeSpaceExhausted`] once every code up to `u64::MAX` is used.
    pub fn peek_code(&self) -> Result<TypeCode> {
        let mut code = self.next_code;
        while self.by_code.contains_key(&code) {
            code = code.checked_add(1).ok_or(Error::CodeSpaceExhausted)?;
        }
        Ok(code)
    }

    /// Value of the sequential counter (reservations included).
    pub fn next_code(&self) -> TypeCode {
        self.next_code
    }

    /// Check that `name` and `explicit_code` are both free.
    pub fn check_available(&self, name: &str, explicit_code: Option<TypeCode>) -> Result<()> {
        if self.by_name.contains_key(name) {
            return Err(Error::DuplicateType(name.to_string()));
        }
        if let Some(code) = explicit_code {
            if let Some(existing) = self.by_code.get(&code) {
                return Err(Error::DuplicateTypeCode {
                    code,
                    existing: existing.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Register `descriptor` under `name`.
    ///
    /// Without `explicit_code` the next sequential code is assigned and the
    /// counter advances; an explicit code leaves the counter alone.
    pub fn store_type(
        &mut self,
        name: &str,
        descriptor: Arc<TypeDescriptor>,
        explicit_code: Option<TypeCode>,
    ) -> Result<TypeCode> {
        self.check_available(name, explicit_code)?;

        let code = match explicit_code {
            Some(code) => code,
            None => {
                let code = self.peek_code()?;
                // At u64::MAX the counter stays put; the next peek sees the
                // code taken and reports exhaustion.
                self.next_code = code.checked_add(1).unwrap_or(code);
                code
            }
        };

        self.insert(code, name.to_string(), Some(descriptor));
        log::debug!("[packer] registered type '{}' as code {}", name, code);
        Ok(code)
    }

    /// Skip `count` codes so the caller can hand them out explicitly.
    ///
    /// Returns the first code of the reserved block. A block that would run
    /// past `u64::MAX` is refused and the counter is left alone.
    pub fn reserve_codes(&mut self, count: u64) -> Result<TypeCode> {
        let first = self.next_code;
        self.next_code = first
            .checked_add(count)
            .ok_or(Error::CodeSpaceExhausted)?;
        log::debug!(
            "[packer] reserved {} type codes starting at {}",
            count,
            first
        );
        Ok(first)
    }

    pub fn entry_by_name(&self, name: &str) -> Result<&TypeEntry> {
        self.by_name
            .get(name)
            .and_then(|code| self.by_code.get(code))
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    pub fn entry_by_code(&self, code: TypeCode) -> Result<&TypeEntry> {
        self.by_code.get(&code).ok_or(Error::UnknownTypeCode(code))
    }

    pub fn lookup_by_name(&self, name: &str) -> Result<&Arc<TypeDescriptor>> {
        self.entry_by_name(name)?.descriptor()
    }

    pub fn lookup_by_code(&self, code: TypeCode) -> Result<&Arc<TypeDescriptor>> {
        self.entry_by_code(code)?.descriptor()
    }

    pub fn code_of(&self, name: &str) -> Option<TypeCode> {
        self.by_name.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Entries in code order.
    pub fn entries(&self) -> impl Iterator<Item = &TypeEntry> {
        self.by_code.values()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{EnumDescriptor, TypeKind};

    fn color() -> Arc<TypeDescriptor> {
        Arc::new(TypeDescriptor::new(
            "Color",
            TypeKind::Enum(EnumDescriptor::new(["red", "green"])),
        ))
    }

    #[test]
    fn test_builtins_preloaded() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.code_of("int"), Some(0));
        assert_eq!(registry.code_of("struct"), Some(6));
        assert_eq!(registry.next_code(), 7);
        assert!(registry.entry_by_name("enum").unwrap().is_abstract());
        assert_eq!(
            registry.lookup_by_code(2).unwrap().kind,
            TypeKind::String
        );
    }

    #[test]
    fn test_sequential_codes() {
        let mut registry = TypeRegistry::new();
        assert_eq!(registry.store_type("Color", color(), None).unwrap(), 7);
        assert_eq!(registry.store_type("Shade", color(), None).unwrap(), 8);
        assert_eq!(registry.lookup_by_name("Shade").unwrap().name, "Color");
    }

    #[test]
    fn test_reserve_then_explicit() {
        let mut registry = TypeRegistry::new();
        let first = registry.reserve_codes(10).unwrap();
        assert_eq!(first, 7);
        assert_eq!(registry.next_code(), 17);

        assert_eq!(registry.store_type("Color", color(), Some(9)).unwrap(), 9);
        assert_eq!(registry.next_code(), 17);
        assert_eq!(registry.store_type("Other", color(), None).unwrap(), 17);
    }

    #[test]
    fn test_sequential_skips_explicit_codes() {
        let mut registry = TypeRegistry::new();
        registry.store_type("A", color(), Some(7)).unwrap();
        assert_eq!(registry.peek_code(), Ok(8));
        assert_eq!(registry.store_type("B", color(), None).unwrap(), 8);
    }

    #[test]
    fn test_code_space_exhaustion() {
        let mut registry = TypeRegistry::new();
        assert_eq!(
            registry.reserve_codes(u64::MAX),
            Err(Error::CodeSpaceExhausted)
        );
        assert_eq!(registry.next_code(), 7);

        // Leave exactly one sequential code: u64::MAX itself.
        assert_eq!(registry.reserve_codes(u64::MAX - 7), Ok(7));
        assert_eq!(
            registry.store_type("Last", color(), None).unwrap(),
            u64::MAX
        );
        assert_eq!(registry.peek_code(), Err(Error::CodeSpaceExhausted));
        assert_eq!(
            registry.store_type("Over", color(), None),
            Err(Error::CodeSpaceExhausted)
        );
        assert_eq!(registry.reserve_codes(1), Err(Error::CodeSpaceExhausted));
        assert!(!registry.contains("Over"));

        // Explicit codes below the counter are still available.
        assert_eq!(registry.store_type("Low", color(), Some(100)).unwrap(), 100);
    }

    #[test]
    fn test_duplicates_rejected() {
        let mut registry = TypeRegistry::new();
        registry.store_type("Color", color(), None).unwrap();

        assert_eq!(
            registry.store_type("Color", color(), None),
            Err(Error::DuplicateType("Color".into()))
        );
        assert_eq!(
            registry.store_type("Paint", color(), Some(3)),
            Err(Error::DuplicateTypeCode {
                code: 3,
                existing: "float".into()
            })
        );
        assert_eq!(registry.len(), 8);
    }

    #[test]
    fn test_unknown_lookups() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.lookup_by_name("Nope").unwrap_err(),
            Error::UnknownType("Nope".into())
        );
        assert_eq!(
            registry.lookup_by_code(99).unwrap_err(),
            Error::UnknownTypeCode(99)
        );
        assert_eq!(
            registry.lookup_by_name("array").unwrap_err(),
            Error::AbstractType("array".into())
        );
    }
}
