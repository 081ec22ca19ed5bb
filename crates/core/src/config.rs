//! Emulator configuration.
//!
//! Configuration is deliberately small: a memory size and a cache-mode
//! selector. Values arrive either from command-line flags or from a JSON
//! file deserialized with serde; defaults live in the `defaults` module
//! so the CLI and tests share them.

use serde::Deserialize;

use crate::cache::Organization;
use crate::common::error::ConfigError;

/// Default configuration constants.
mod defaults {
    /// Default memory size in bytes (128 KiB).
    pub const MEM_SIZE: u32 = 131_072;
}

/// Cache organization selector.
///
/// The numeric selectors are fixed by the external interface:
/// 0 = no cache, 1 = direct-mapped, 2 = fully associative,
/// 3 = two-way set-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheMode {
    /// No cache: direct backing access with streaming-burst costs.
    #[default]
    #[serde(alias = "none")]
    Off,
    /// Direct-mapped: 32 sets of one way.
    #[serde(alias = "direct")]
    DirectMapped,
    /// Fully associative: one set of 32 ways.
    #[serde(alias = "fully")]
    FullyAssociative,
    /// Two-way set-associative: 16 sets of two ways.
    #[serde(alias = "two-way")]
    TwoWaySetAssociative,
}

impl CacheMode {
    /// Numeric selector as it appears on the command line.
    pub fn selector(self) -> u32 {
        match self {
            Self::Off => 0,
            Self::DirectMapped => 1,
            Self::FullyAssociative => 2,
            Self::TwoWaySetAssociative => 3,
        }
    }

    /// Cache organization for this mode, or `None` when the cache is off.
    pub fn organization(self) -> Option<Organization> {
        match self {
            Self::Off => None,
            Self::DirectMapped => Some(Organization::DirectMapped),
            Self::FullyAssociative => Some(Organization::FullyAssociative),
            Self::TwoWaySetAssociative => Some(Organization::TwoWaySetAssociative),
        }
    }
}

impl TryFrom<u32> for CacheMode {
    type Error = ConfigError;

    fn try_from(selector: u32) -> Result<Self, ConfigError> {
        match selector {
            0 => Ok(Self::Off),
            1 => Ok(Self::DirectMapped),
            2 => Ok(Self::FullyAssociative),
            3 => Ok(Self::TwoWaySetAssociative),
            _ => Err(ConfigError::Cache),
        }
    }
}

/// Root emulator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EmuConfig {
    /// Memory size in bytes.
    #[serde(default = "EmuConfig::default_mem_size")]
    pub mem_size: u32,

    /// Cache organization.
    #[serde(default)]
    pub cache: CacheMode,
}

impl EmuConfig {
    /// Returns the default memory size in bytes.
    fn default_mem_size() -> u32 {
        defaults::MEM_SIZE
    }
}

impl Default for EmuConfig {
    fn default() -> Self {
        Self {
            mem_size: defaults::MEM_SIZE,
            cache: CacheMode::default(),
        }
    }
}
