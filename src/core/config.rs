//! Configuration file management.
//!
//! Handles reading and validating the optional `.sealant.toml` file. Every
//! section is optional; a missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::broker::LookupPolicy;
use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Project configuration stored in `.sealant.toml`
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Deployment naming
    pub deployment: DeploymentConfig,
    /// Argument rewriting for wrapped tools
    pub wrap: WrapConfig,
    /// Executables for wrapped tools
    pub tools: ToolsConfig,
    /// Key store connection and lookup
    pub keystore: KeyStoreConfig,
}

/// `[deployment]` section
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeploymentConfig {
    /// Deployment name used when none is given on the command line
    pub name: Option<String>,
}

/// `[wrap]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WrapConfig {
    /// Arguments whose value is a secret file path
    pub file_flags: Vec<String>,
    /// Arguments whose value is the helm release name
    pub release_flags: Vec<String>,
    /// Directory for decrypted copies; defaults to `/dev/shm` when present
    pub scratch_dir: Option<PathBuf>,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            file_flags: owned(constants::DEFAULT_FILE_FLAGS),
            release_flags: owned(constants::DEFAULT_RELEASE_FLAGS),
            scratch_dir: None,
        }
    }
}

/// `[tools]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    pub helm: String,
    pub kubectl: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            helm: "helm".to_string(),
            kubectl: "kubectl".to_string(),
        }
    }
}

/// `[keystore]` section
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyStoreConfig {
    /// Key-manager endpoint, bypassing service catalog discovery
    pub endpoint: Option<String>,
    /// Behaviour when several records share a deployment name
    pub lookup: LookupPolicy,
}

impl Config {
    /// Path to the configuration file in `dir`
    pub fn config_path(dir: &Path) -> PathBuf {
        dir.join(constants::CONFIG_FILE)
    }

    /// Load configuration from `.sealant.toml` in `dir`, or defaults if absent
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file exists but can't be read,
    /// `ConfigError::Parse` if the TOML is malformed, or
    /// `ConfigError::InvalidValue` if validation fails.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = Self::config_path(dir);
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(&path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;

        debug!(
            file_flags = config.wrap.file_flags.len(),
            lookup = ?config.keystore.lookup,
            "config loaded"
        );
        Ok(config)
    }

    /// Validate the configuration contents
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.wrap.file_flags.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "wrap.file_flags",
                reason: "flags must not be empty".to_string(),
            }
            .into());
        }
        if self.wrap.release_flags.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "wrap.release_flags",
                reason: "flags must not be empty".to_string(),
            }
            .into());
        }
        if self.tools.helm.trim().is_empty() || self.tools.kubectl.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "tools",
                reason: "tool names must not be empty".to_string(),
            }
            .into());
        }
        if let Some(name) = &self.deployment.name {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "deployment.name",
                    reason: "name must not be empty".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Directory for decrypted copies
    ///
    /// The configured directory if set, else `/dev/shm` when it exists, else
    /// the system temp directory.
    pub fn scratch_dir(&self) -> PathBuf {
        if let Some(dir) = &self.wrap.scratch_dir {
            return dir.clone();
        }
        let shm = Path::new(constants::SHM_DIR);
        if shm.is_dir() {
            shm.to_path_buf()
        } else {
            std::env::temp_dir()
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
