// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema resolver: declarative descriptions to descriptors.
//!
//! Resolution never touches the registry. The finished descriptor is stored
//! in one step at the end, so a failed definition leaves no trace.

use crate::descriptor::{
    ArrayDescriptor, BaseKind, EnumDescriptor, FieldDescriptor, StructDescriptor, TypeDescriptor,
    TypeKind, TypeRef,
};
use crate::error::{Result, SchemaError};
use crate::registry::{TypeCode, TypeRegistry};
use crate::schema::{TypeDefinition, TypeDescription};
use std::collections::HashSet;
use std::sync::Arc;

type Resolved<T> = std::result::Result<T, SchemaError>;

/// Resolve `def` and register it under its own name.
pub(crate) fn define(registry: &mut TypeRegistry, def: &TypeDefinition) -> Result<TypeCode> {
    let name = def.name.as_deref().ok_or(SchemaError::MissingName)?;
    registry.check_available(name, def.type_code)?;

    let code = match def.type_code {
        Some(code) => code,
        None => registry.peek_code()?,
    };
    let resolved = Resolver::new(registry, name, code).resolve_top(def)?;

    let descriptor = match resolved {
        TypeRef::Inline(descriptor) => descriptor,
        TypeRef::Named(target) => registry.lookup_by_code(target)?.clone(),
    };
    registry.store_type(name, descriptor, def.type_code)
}

struct Resolver<'r> {
    registry: &'r TypeRegistry,
    /// Type being defined; its name resolves to its future code.
    pending: (&'r str, TypeCode),
}

impl<'r> Resolver<'r> {
    fn new(registry: &'r TypeRegistry, name: &'r str, code: TypeCode) -> Self {
        Self {
            registry,
            pending: (name, code),
        }
    }

    fn resolve_top(&self, def: &TypeDefinition) -> Resolved<TypeRef> {
        let name = self.pending.0;
        let base = def
            .base
            .as_deref()
            .ok_or_else(|| SchemaError::MissingType(name.to_string()))?;

        if base == name {
            // Plain self-alias has nothing to point at.
            return Err(SchemaError::UnknownType {
                name: name.to_string(),
                referenced: base.to_string(),
            });
        }
        self.resolve_definition(def, name)
    }

    fn resolve_description(
        &self,
        description: &TypeDescription,
        context: &str,
    ) -> Resolved<TypeRef> {
        match description {
            TypeDescription::Alias(referenced) => self.reference(referenced, context),
            TypeDescription::Definition(def) => {
                let name = def.name.as_deref().unwrap_or(context);
                self.resolve_definition(def, name)
            }
        }
    }

    fn resolve_definition(&self, def: &TypeDefinition, name: &str) -> Resolved<TypeRef> {
        let base = def
            .base
            .as_deref()
            .ok_or_else(|| SchemaError::MissingType(name.to_string()))?;

        let kind = match BaseKind::from_name(base) {
            Some(BaseKind::Enum) => TypeKind::Enum(self.resolve_enum(def, name)?),
            Some(BaseKind::Struct) => TypeKind::Struct(self.resolve_struct(def, name)?),
            Some(BaseKind::Array) => TypeKind::Array(self.resolve_array(def, name)?),
            _ => return self.reference(base, name),
        };

        Ok(TypeRef::Inline(Arc::new(TypeDescriptor::new(name, kind))))
    }

    fn resolve_enum(&self, def: &TypeDefinition, name: &str) -> Resolved<EnumDescriptor> {
        let items = def
            .items
            .as_ref()
            .ok_or_else(|| SchemaError::MissingItems(name.to_string()))?;
        if items.is_empty() {
            return Err(SchemaError::EmptyItems(name.to_string()));
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in items {
            if !seen.insert(item.as_str()) {
                return Err(SchemaError::DuplicateItem {
                    name: name.to_string(),
                    item: item.clone(),
                });
            }
        }
        Ok(EnumDescriptor::new(items.iter().cloned()))
    }

    fn resolve_struct(&self, def: &TypeDefinition, name: &str) -> Resolved<StructDescriptor> {
        let field_defs = def
            .fields
            .as_ref()
            .ok_or_else(|| SchemaError::MissingFields(name.to_string()))?;
        if field_defs.is_empty() {
            return Err(SchemaError::EmptyFields(name.to_string()));
        }

        let mut seen = HashSet::with_capacity(field_defs.len());
        let mut fields = Vec::with_capacity(field_defs.len());
        for (index, field) in field_defs.iter().enumerate() {
            let field_name = field.name.as_deref().ok_or_else(|| SchemaError::MissingFieldName {
                name: name.to_string(),
                index,
            })?;
            if !seen.insert(field_name) {
                return Err(SchemaError::DuplicateField {
                    name: name.to_string(),
                    field: field_name.to_string(),
                });
            }
            let type_ref = self.resolve_definition(field, field_name)?;
            fields.push(FieldDescriptor::new(field_name, type_ref));
        }
        Ok(StructDescriptor::new(fields))
    }

    fn resolve_array(&self, def: &TypeDefinition, name: &str) -> Resolved<ArrayDescriptor> {
        let entry = def
            .entry_type
            .as_deref()
            .ok_or_else(|| SchemaError::MissingEntryType(name.to_string()))?;
        let entry = self.resolve_description(entry, name)?;
        Ok(ArrayDescriptor::new(entry))
    }

    /// Resolve a by-name reference.
    fn reference(&self, referenced: &str, context: &str) -> Resolved<TypeRef> {
        let (pending_name, pending_code) = self.pending;
        if referenced == pending_name {
            return Ok(TypeRef::Named(pending_code));
        }

        // Bare composites carry no structure to refer to.
        match BaseKind::from_name(referenced) {
            Some(BaseKind::Enum) => return Err(SchemaError::MissingItems(context.to_string())),
            Some(BaseKind::Struct) => return Err(SchemaError::MissingFields(context.to_string())),
            Some(BaseKind::Array) => {
                return Err(SchemaError::MissingEntryType(context.to_string()))
            }
            _ => {}
        }

        self.registry
            .code_of(referenced)
            .map(TypeRef::Named)
            .ok_or_else(|| SchemaError::UnknownType {
                name: context.to_string(),
                referenced: referenced.to_string(),
            })
    }
}
