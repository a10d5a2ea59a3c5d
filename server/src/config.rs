//! TOML configuration loading and validation.
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! server on `0.0.0.0:8080` with the default optimizer limits.

use std::path::Path;

use gridfolio::{DEFAULT_MAX_ASSETS, Optimizer};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerConfig {
    /// Longest ticker list the grid search accepts
    #[serde(default = "default_max_assets")]
    pub max_assets: usize,
}

fn default_max_assets() -> usize {
    DEFAULT_MAX_ASSETS
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_assets: default_max_assets(),
        }
    }
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&contents)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate config invariants.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".into()));
        }
        if self.server.port == 0 {
            return Err(Error::Config("port must be > 0".into()));
        }
        if self.optimizer.max_assets == 0 {
            return Err(Error::Config("max_assets must be >= 1".into()));
        }
        Ok(())
    }

    /// Listen address string.
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Optimizer built from the `[optimizer]` section.
    pub fn optimizer(&self) -> Optimizer {
        Optimizer::new().with_max_assets(self.optimizer.max_assets)
    }
}
