//! Enum manager configuration

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EnumError, EnumResult};

/// Minimum `server_version_num` that supports `ALTER TYPE ... RENAME VALUE` (PostgreSQL 10)
pub const RENAME_VALUE_MIN_VERSION: i64 = 100_000;

const CACHE_MODE_ENV: &str = "ELIF_ENUM_CACHE_MODE";
const RENAME_VALUE_MIN_VERSION_ENV: &str = "ELIF_ENUM_RENAME_VALUE_MIN_VERSION";

/// How the catalog cache reacts to a successful mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Apply the mutation to the cached catalog
    #[default]
    Incremental,
    /// Clear the whole cache; the next read re-queries the catalog
    Invalidate,
}

impl FromStr for CacheMode {
    type Err = EnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "incremental" => Ok(CacheMode::Incremental),
            "invalidate" | "clear" => Ok(CacheMode::Invalidate),
            _ => Err(EnumError::Configuration(format!(
                "invalid cache mode '{}', expected incremental or invalidate",
                s
            ))),
        }
    }
}

/// Configuration for an `EnumManager`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumKitConfig {
    pub cache_mode: CacheMode,
    pub rename_value_min_version: i64,
}

impl Default for EnumKitConfig {
    fn default() -> Self {
        Self {
            cache_mode: CacheMode::default(),
            rename_value_min_version: RENAME_VALUE_MIN_VERSION,
        }
    }
}

impl EnumKitConfig {
    /// Load configuration from environment variables, using defaults for unset ones
    pub fn from_env() -> EnumResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> EnumResult<Self> {
        let mut config = Self::default();

        if let Some(mode) = lookup(CACHE_MODE_ENV) {
            config.cache_mode = mode.parse()?;
        }

        if let Some(version) = lookup(RENAME_VALUE_MIN_VERSION_ENV) {
            config.rename_value_min_version = version.trim().parse().map_err(|_| {
                EnumError::Configuration(format!(
                    "{} must be an integer server_version_num, got '{}'",
                    RENAME_VALUE_MIN_VERSION_ENV, version
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> EnumResult<()> {
        if self.rename_value_min_version <= 0 {
            return Err(EnumError::Configuration(
                "rename_value_min_version must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
