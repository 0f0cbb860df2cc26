// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds-packer - schema-driven TLV binary codec
//!
//! Two endpoints that share a schema exchange structured values (integers,
//! floats, strings, enums, structs and arrays) as compact tag-length-value
//! records, with no compression and no self-description beyond type codes.
//!
//! ## Quick Start
//!
//! ```rust
//! use hdds_packer::{Packer, Result, Value};
//!
//! fn main() -> Result<()> {
//!     let mut packer = Packer::new();
//!     packer.define_type_json(
//!         r#"{ "name": "Person", "type": "struct", "fields": [
//!             { "name": "name", "type": "string" },
//!             { "name": "age",  "type": "int" },
//!             { "name": "mood", "type": "enum", "items": ["happy", "sad"] }
//!         ] }"#,
//!     )?;
//!
//!     let person = Value::structure([
//!         ("name", Value::from("Ada")),
//!         ("mood", Value::label("happy")),
//!     ]);
//!     let bytes = packer.pack("Person", &person)?;
//!
//!     // `age` was absent and stays absent.
//!     assert_eq!(packer.unpack(&bytes)?, person);
//!     Ok(())
//! }
//! ```
//!
//! ## Wire format
//!
//! ```text
//! record  := type-code:varint  payload-length:varint  payload
//! varint  := 7-bit groups, least significant first, 0x80 = more follow
//!
//! int      magnitude varint; negative values are tagged neg-int (1)
//! float    8 bytes, IEEE-754 binary64, little-endian
//! string   one varint per character code
//! enum     ordinal varint
//! struct   one record per field in declaration order (empty = absent)
//! array    one record per element
//! ```
//!
//! Built-in codes are fixed: `int`=0, `neg-int`=1, `string`=2, `float`=3,
//! `enum`=4, `array`=5, `struct`=6. User types take the next free code, or
//! an explicit `typeCode` out of a block reserved with
//! [`Packer::reserve_type_codes`].
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`varint`] | Variable-length integers |
//! | [`registry`] | Name/code table |
//! | [`schema`] | Declarative type descriptions |
//! | [`descriptor`] | Resolved type graph |
//! | [`config`] | File-based configuration |

pub mod config;
pub mod descriptor;
pub mod error;
pub mod registry;
pub mod schema;
pub mod value;
pub mod varint;

mod decoder;
mod encoder;
mod packer;

pub use config::{CharUnits, ConfigError, PackerConfig, MAX_DEPTH_LIMIT};
pub use descriptor::{BaseKind, TypeDescriptor, TypeKind, TypeRef};
pub use error::{Error, Result, SchemaError};
pub use packer::{Packer, SharedPacker};
pub use registry::{TypeCode, TypeEntry, TypeRegistry};
pub use schema::{TypeDefinition, TypeDescription};
pub use value::Value;
