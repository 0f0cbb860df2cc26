// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Packer configuration.
//!
//! Supports both programmatic and file-based configuration. A config file
//! carries codec options plus the schema itself:
//!
//! ```toml
//! max_depth = 32
//! reserved_codes = 4
//!
//! [[types]]
//! name = "Color"
//! type = "enum"
//! items = ["red", "green", "blue"]
//!
//! [[types]]
//! name = "Pixel"
//! type = "struct"
//! fields = [
//!     { name = "x", type = "int" },
//!     { name = "color", type = "Color" },
//! ]
//! ```

use crate::schema::TypeDefinition;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Unit of the character codes written for strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharUnits {
    /// UTF-16 code units. Characters outside the BMP take two codes.
    #[default]
    Utf16,
    /// Unicode scalar values, one code per character.
    CodePoints,
}

/// Packer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Maximum nesting depth for encode and decode.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// String character code unit.
    #[serde(default)]
    pub char_units: CharUnits,

    /// Type codes reserved before `types` are defined.
    #[serde(default)]
    pub reserved_codes: u64,

    /// Type definitions, applied in order.
    #[serde(default)]
    pub types: Vec<TypeDefinition>,
}

/// Upper bound for `max_depth`. Encode and decode recurse once per level.
pub const MAX_DEPTH_LIMIT: usize = 1024;

fn default_max_depth() -> usize {
    64
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            char_units: CharUnits::default(),
            reserved_codes: 0,
            types: Vec::new(),
        }
    }
}

impl PackerConfig {
    /// Load configuration from a file.
    ///
    /// Files with a `.json` extension are parsed as JSON, anything else as TOML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Add a type definition.
    pub fn with_type(mut self, def: TypeDefinition) -> Self {
        self.types.push(def);
        self
    }

    /// Validate configuration.
    ///
    /// Only checks what can be checked without a registry; type definitions
    /// are validated when the packer applies them.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "max_depth {} exceeds limit of {}",
                self.max_depth, MAX_DEPTH_LIMIT
            )));
        }

        for (i, def) in self.types.iter().enumerate() {
            if def.name.is_none() {
                return Err(ConfigError::Invalid(format!("Type #{} has no name", i)));
            }
        }

        Ok(())
    }
}
