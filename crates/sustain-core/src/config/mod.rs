//! # Sustain Core Loader Configuration
//!
//! [`LoaderConfig`] lets a host reorder resolvers without recompiling them: each
//! entry overrides the load and/or unload order a resolver reports for itself.
//!
//! ```toml
//! [resolvers.service]
//! load_order = 20
//! unload_order = 90
//! ```
//!
//! JSON is always supported; YAML and TOML sit behind the `yaml-config` and
//! `toml-config` features (both on by default).
pub mod error;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use error::ConfigError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Order override for one resolver; unset fields keep the resolver's own value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOrderOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unload_order: Option<i32>,
}

/// Configuration of a component loader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Order overrides keyed by resolver name
    #[serde(default)]
    pub resolvers: HashMap<String, ResolverOrderOverride>,
}

impl LoaderConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the load order of a resolver
    pub fn with_load_order(mut self, resolver: &str, order: i32) -> Self {
        self.resolvers.entry(resolver.to_string()).or_default().load_order = Some(order);
        self
    }

    /// Override the unload order of a resolver
    pub fn with_unload_order(mut self, resolver: &str, order: i32) -> Self {
        self.resolvers.entry(resolver.to_string()).or_default().unload_order = Some(order);
        self
    }

    /// Override for a resolver, if configured
    pub fn resolver_override(&self, resolver: &str) -> Option<&ResolverOrderOverride> {
        self.resolvers.get(resolver)
    }

    /// Parse a configuration from a string
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| ConfigError::parse("JSON", e)),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| ConfigError::parse("YAML", e)),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| ConfigError::parse("TOML", e)),
        }
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        match format {
            ConfigFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|e| ConfigError::serialize("JSON", e))
            }
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| ConfigError::serialize("YAML", e))
            }
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::serialize("TOML", e))
            }
        }
    }

    /// Load a configuration file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path)
            .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading loader configuration from {}", path.display());
        Self::parse(&data, format)
    }

    /// Names of overridden resolvers missing from `registered`
    pub fn unknown_resolvers(&self, registered: &[String]) -> Vec<String> {
        let mut unknown: Vec<String> = self
            .resolvers
            .keys()
            .filter(|name| !registered.contains(name))
            .cloned()
            .collect();
        unknown.sort();
        unknown
    }
}
