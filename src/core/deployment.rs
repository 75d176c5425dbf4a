//! Deployment names.
//!
//! A deployment name scopes one key in the key store and every secret file
//! sealed with it. The engine only ever sees an already resolved
//! [`Deployment`]; the helpers here are what the CLI uses to resolve one.

use std::fmt;
use std::path::Path;

use crate::error::{ConfigError, Result};

/// A validated, non-empty deployment name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Deployment(String);

impl Deployment {
    /// Validate a deployment name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDeployment` for blank names or names
    /// containing control characters.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ConfigError::InvalidDeployment("name is empty".to_string()).into());
        }
        if name.chars().any(char::is_control) {
            return Err(ConfigError::InvalidDeployment(format!(
                "'{}' contains control characters",
                name.escape_default()
            ))
            .into());
        }
        Ok(Self(name))
    }

    /// Name taken from the last component of `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                ConfigError::InvalidDeployment(format!(
                    "cannot derive a name from {}",
                    dir.display()
                ))
            })?;
        Self::new(name)
    }

    /// Value of the last `flags` argument in `args` that has a value.
    ///
    /// Mirrors how helm reads a release name given as `--name <release>`.
    pub fn from_args(args: &[String], flags: &[String]) -> Option<Result<Self>> {
        args.windows(2)
            .filter(|pair| flags.contains(&pair[0]))
            .last()
            .map(|pair| Self::new(pair[1].clone()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Deployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Deployment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
