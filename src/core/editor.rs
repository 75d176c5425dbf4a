//! Terminal editor collaborator.
//!
//! `sealant edit` hands a decrypted copy of a secret file to the user's
//! editor and reads the result back. The editor is an opaque subprocess
//! with the terminal inherited.

use std::path::{Path, PathBuf};
use std::process::Command;

use zeroize::Zeroizing;

use crate::core::constants;
use crate::error::{Result, WrapError};

/// A resolved editor executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    program: PathBuf,
}

impl Editor {
    /// Resolve an editor from the value of `$EDITOR`.
    ///
    /// Only the first word is used; unset or blank falls back to `vim`.
    ///
    /// # Errors
    ///
    /// Returns `WrapError::ToolNotFound` if the program is not on `PATH`.
    pub fn from_env_value(value: Option<String>) -> Result<Self> {
        let name = value
            .as_deref()
            .and_then(|v| v.split_whitespace().next())
            .unwrap_or(constants::DEFAULT_EDITOR)
            .to_string();
        Self::resolve(&name)
    }

    /// Resolve `name` on `PATH`.
    pub fn resolve(name: &str) -> Result<Self> {
        let program = which::which(name).map_err(|_| WrapError::ToolNotFound(name.to_string()))?;
        Ok(Self { program })
    }

    /// Path of the editor executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Open `path` and wait for the editor to exit.
    ///
    /// # Errors
    ///
    /// Returns `WrapError::ToolFailed` if the editor exits unsuccessfully.
    pub fn launch(&self, path: &Path) -> Result<()> {
        let status = Command::new(&self.program).arg(path).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(WrapError::ToolFailed {
                tool: self.program.display().to_string(),
                code: status.code(),
                output: Vec::new(),
            }
            .into())
        }
    }

    /// Edit `content` in a temporary `.yaml` file under `dir`.
    ///
    /// The file is owner-only and removed before returning.
    pub fn edit(&self, content: &[u8], dir: &Path) -> Result<Zeroizing<Vec<u8>>> {
        let file = tempfile::Builder::new()
            .prefix("sealant-")
            .suffix(".yaml")
            .tempfile_in(dir)?;
        std::fs::write(file.path(), content)?;

        self.launch(file.path())?;

        Ok(Zeroizing::new(std::fs::read(file.path())?))
    }
}
