//! Configuration file for the urkit CLI
//!
//! ```toml
//! [decoder]
//! expand_sub_plans = true
//! max_sub_plan_depth = 4
//!
//! [logging]
//! level = "debug"
//! json = false
//!
//! [[routers]]
//! address = "0x00000000000000000000000000000000000c0ffe"
//! name = "fork"
//! kind = "universal-router"
//! ```

use alloy_primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use urkit_core::{DecodeOptions, KnownRouter, RouterDirectory, RouterKind};

/// CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decoder: DecodeOptions,
    pub logging: LoggingConfig,
    /// Routers added on top of the mainnet directory
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub routers: Vec<RouterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output logs as JSON
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// An extra router directory entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterEntry {
    pub address: Address,
    pub name: String,
    pub kind: RouterKind,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load an explicit config file, or the default one if it exists
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let path = default_config_file();
                if path.exists() {
                    Self::load(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Mainnet routers plus configured entries
    pub fn directory(&self) -> RouterDirectory {
        let mut directory = RouterDirectory::mainnet();
        for entry in &self.routers {
            directory.insert(entry.address, KnownRouter::new(&entry.name, entry.kind));
        }
        directory
    }
}

/// Get the default config file path
pub fn default_config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("urkit")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.decoder.expand_sub_plans);
        assert_eq!(config.decoder.max_sub_plan_depth, 4);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_default_roundtrip() {
        let text = toml::to_string(&Config::default()).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [decoder]
            expand_sub_plans = true

            [logging]
            json = true
            "#,
        )
        .unwrap();

        assert!(config.decoder.expand_sub_plans);
        assert_eq!(config.decoder.max_sub_plan_depth, 4);
        assert!(config.logging.json);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_router_entries() {
        let config = Config::from_toml(
            r#"
            [[routers]]
            address = "0x00000000000000000000000000000000000c0ffe"
            name = "fork"
            kind = "universal-router"
            "#,
        )
        .unwrap();

        let fork = address!("00000000000000000000000000000000000c0ffe");
        let directory = config.directory();
        assert_eq!(directory.len(), RouterDirectory::mainnet().len() + 1);
        assert_eq!(directory.get(&fork).map(|r| r.kind), Some(RouterKind::UniversalRouter));
    }

    #[test]
    fn test_unknown_router_kind_rejected() {
        let result = Config::from_toml(
            r#"
            [[routers]]
            address = "0x00000000000000000000000000000000000c0ffe"
            name = "fork"
            kind = "sushiswap"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_default_path() {
        let path = default_config_file();
        assert!(path.ends_with("urkit/config.toml"));
    }
}
