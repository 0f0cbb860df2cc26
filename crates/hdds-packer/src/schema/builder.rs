// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builder API for [`TypeDefinition`].

use crate::registry::TypeCode;
use crate::schema::{TypeDefinition, TypeDescription};

impl TypeDefinition {
    fn with_base(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            base: Some(base.into()),
            ..Default::default()
        }
    }

    /// Alias of a built-in or registered type.
    pub fn alias(name: impl Into<String>, base: impl Into<String>) -> Self {
        Self::with_base(name, base)
    }

    /// Struct with no fields yet.
    pub fn structure(name: impl Into<String>) -> Self {
        Self {
            fields: Some(Vec::new()),
            ..Self::with_base(name, "struct")
        }
    }

    /// Enum with the given labels.
    pub fn enumeration<I, S>(name: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: Some(items.into_iter().map(Into::into).collect()),
            ..Self::with_base(name, "enum")
        }
    }

    /// Array of `entry`.
    pub fn array(name: impl Into<String>, entry: impl Into<TypeDescription>) -> Self {
        Self {
            entry_type: Some(Box::new(entry.into())),
            ..Self::with_base(name, "array")
        }
    }

    /// Add a field whose type is a built-in or registered type.
    pub fn field(self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.field_def(Self::with_base(name, type_name))
    }

    /// Add a field with an inline definition. Its `name` is the field name.
    pub fn field_def(mut self, field: TypeDefinition) -> Self {
        self.fields.get_or_insert_with(Vec::new).push(field);
        self
    }

    /// Add an enum label.
    pub fn item(mut self, label: impl Into<String>) -> Self {
        self.items.get_or_insert_with(Vec::new).push(label.into());
        self
    }

    /// Pin the wire code instead of taking the next sequential one.
    pub fn with_code(mut self, code: TypeCode) -> Self {
        self.type_code = Some(code);
        self
    }
}
