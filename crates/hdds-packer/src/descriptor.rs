// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Resolved type descriptors.
//!
//! A [`TypeDescriptor`] is the immutable, structural form of a type after the
//! schema resolver has processed its declarative description. Child types of
//! structs and arrays are held as [`TypeRef`]s: a registry code for named
//! types, or an inline descriptor for anonymous ones. Referring to named
//! types by code is what lets a struct contain itself.

use crate::registry::TypeCode;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The seven built-in kinds, in wire-code order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseKind {
    Int,
    NegInt,
    String,
    Float,
    Enum,
    Array,
    Struct,
}

impl BaseKind {
    /// All built-ins in code order (`int` = 0 ... `struct` = 6).
    pub const ALL: [BaseKind; 7] = [
        BaseKind::Int,
        BaseKind::NegInt,
        BaseKind::String,
        BaseKind::Float,
        BaseKind::Enum,
        BaseKind::Array,
        BaseKind::Struct,
    ];

    /// Fixed wire code of the built-in.
    pub const fn code(self) -> TypeCode {
        match self {
            Self::Int => 0,
            Self::NegInt => 1,
            Self::String => 2,
            Self::Float => 3,
            Self::Enum => 4,
            Self::Array => 5,
            Self::Struct => 6,
        }
    }

    /// Registered name of the built-in.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::NegInt => "neg-int",
            Self::String => "string",
            Self::Float => "float",
            Self::Enum => "enum",
            Self::Array => "array",
            Self::Struct => "struct",
        }
    }

    /// Look up a built-in by name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Built-ins that need `items`, `fields` or `entryType` to mean anything.
    pub const fn is_composite(self) -> bool {
        matches!(self, Self::Enum | Self::Array | Self::Struct)
    }
}

impl fmt::Display for BaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference from a composite type to one of its children.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// A registered type, by code. Tagged on the wire with that code.
    Named(TypeCode),
    /// An anonymous type defined in place. Tagged with its base kind code.
    Inline(Arc<TypeDescriptor>),
}

/// Resolved type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Name the descriptor was defined under (field name for inline types).
    pub name: String,
    /// Structure.
    pub kind: TypeKind,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Descriptor of a scalar built-in.
    pub(crate) fn scalar(kind: BaseKind) -> Option<Self> {
        let kind = match kind {
            BaseKind::Int => TypeKind::Int,
            BaseKind::NegInt => TypeKind::NegInt,
            BaseKind::String => TypeKind::String,
            BaseKind::Float => TypeKind::Float,
            BaseKind::Enum | BaseKind::Array | BaseKind::Struct => return None,
        };
        Some(Self::new(kind.base().name(), kind))
    }

    pub fn base(&self) -> BaseKind {
        self.kind.base()
    }

    /// Struct layout, if this is a struct.
    pub fn as_struct(&self) -> Option<&StructDescriptor> {
        match &self.kind {
            TypeKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Enum items, if this is an enum.
    pub fn as_enum(&self) -> Option<&EnumDescriptor> {
        match &self.kind {
            TypeKind::Enum(e) => Some(e),
            _ => None,
        }
    }
}

/// Type structure, one variant per base kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Int,
    NegInt,
    String,
    Float,
    Enum(EnumDescriptor),
    Struct(StructDescriptor),
    Array(ArrayDescriptor),
}

impl TypeKind {
    pub fn base(&self) -> BaseKind {
        match self {
            Self::Int => BaseKind::Int,
            Self::NegInt => BaseKind::NegInt,
            Self::String => BaseKind::String,
            Self::Float => BaseKind::Float,
            Self::Enum(_) => BaseKind::Enum,
            Self::Struct(_) => BaseKind::Struct,
            Self::Array(_) => BaseKind::Array,
        }
    }
}

/// Enumeration items. Ordinals follow declaration order, starting at 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnumDescriptor {
    items: Vec<String>,
    ordinals: HashMap<String, u64>,
}

impl EnumDescriptor {
    /// Build from labels. Later duplicates are dropped; the resolver rejects
    /// them before this point.
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut desc = Self::default();
        for item in items {
            let item = item.into();
            if desc.ordinals.contains_key(&item) {
                continue;
            }
            desc.ordinals.insert(item.clone(), desc.items.len() as u64);
            desc.items.push(item);
        }
        desc
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ordinal of `label`.
    pub fn ordinal(&self, label: &str) -> Option<u64> {
        self.ordinals.get(label).copied()
    }

    /// Label at `ordinal`.
    pub fn label(&self, ordinal: u64) -> Option<&str> {
        let index = usize::try_from(ordinal).ok()?;
        self.items.get(index).map(String::as_str)
    }
}

/// Struct field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_ref: TypeRef,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_ref: TypeRef) -> Self {
        Self {
            name: name.into(),
            type_ref,
        }
    }
}

/// Struct layout. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructDescriptor {
    fields: Vec<FieldDescriptor>,
    index: HashMap<String, usize>,
}

impl StructDescriptor {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self { fields, index }
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.index.get(name).and_then(|&i| self.fields.get(i))
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

/// Array element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDescriptor {
    pub entry: TypeRef,
}

impl ArrayDescriptor {
    pub fn new(entry: TypeRef) -> Self {
        Self { entry }
    }
}
