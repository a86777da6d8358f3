//! Configuration for selecting and loading network parameters
//!
//! Loaded from JSON or TOML, then optionally overridden from the environment:
//! - `BLLVM_NETWORK` replaces `network`
//! - `BLLVM_LOG_FILTER` replaces `logging.filter`
//! - `BLLVM_LOG_JSON` enables `logging.json_format`

use crate::params::{NetworkVariant, ParameterBundle};
use crate::registry::Registry;
use crate::utils::env::{env_bool, env_opt};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

pub const NETWORK_ENV: &str = "BLLVM_NETWORK";
pub const LOG_FILTER_ENV: &str = "BLLVM_LOG_FILTER";
pub const LOG_JSON_ENV: &str = "BLLVM_LOG_JSON";

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "bllvm_chainparams=debug"
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines (needs the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsConfig {
    /// Network variant name
    #[serde(default = "default_network")]
    pub network: String,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

fn default_network() -> String {
    NetworkVariant::Main.as_str().to_string()
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            logging: None,
        }
    }
}

impl ParamsConfig {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: ParamsConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: ParamsConfig =
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Load by extension: `.toml` as TOML, anything else as JSON
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_file(path),
            _ => Self::from_json_file(path),
        }
    }

    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(network) = env_opt(NETWORK_ENV) {
            self.network = network;
        }
        if let Some(filter) = env_opt(LOG_FILTER_ENV) {
            self.logging.get_or_insert_with(LoggingConfig::default).filter = Some(filter);
        }
        if env_bool(LOG_JSON_ENV) {
            self.logging.get_or_insert_with(LoggingConfig::default).json_format = true;
        }
    }

    pub fn network_variant(&self) -> anyhow::Result<NetworkVariant> {
        Ok(self.network.parse::<NetworkVariant>()?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.network_variant()
            .with_context(|| format!("invalid network {:?}", self.network))?;

        if let Some(filter) = self.logging.as_ref().and_then(|l| l.filter.as_deref()) {
            tracing_subscriber::EnvFilter::try_new(filter)
                .with_context(|| format!("invalid log filter {:?}", filter))?;
        }

        Ok(())
    }

    /// Bundle for the configured network from the process-wide registry
    pub fn load_bundle(&self) -> anyhow::Result<Arc<ParameterBundle>> {
        self.validate()?;
        let registry = Registry::try_global()
            .map_err(|e| anyhow::anyhow!("network parameter registry unavailable: {}", e))?;
        Ok(registry.get_variant(self.network_variant()?))
    }

    /// Bundle for the configured network from a freshly built registry
    pub fn load_registry(&self) -> anyhow::Result<(Registry, Arc<ParameterBundle>)> {
        self.validate()?;
        let registry = Registry::new()?;
        let bundle = registry.get_variant(self.network_variant()?);
        Ok((registry, bundle))
    }
}
