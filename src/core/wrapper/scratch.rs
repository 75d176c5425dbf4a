//! Ephemeral decrypted files.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::Result;

/// Owner of the decrypted copies written during one wrapped invocation.
///
/// Every file written through [`Scratch::write`] is removed when the guard
/// is dropped, on success and error paths alike. Removal after a hard kill
/// of the process is not possible.
#[derive(Debug)]
pub struct Scratch {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl Scratch {
    /// Guard writing into `dir`, which must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: Vec::new(),
        }
    }

    /// Write `contents` to a fresh file named by a random UUID.
    ///
    /// The file is created exclusively and, on Unix, readable by the owner
    /// only.
    pub fn write(&mut self, contents: &[u8]) -> Result<PathBuf> {
        let path = self.dir.join(Uuid::new_v4().to_string());

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&path)?;
        self.files.push(path.clone());
        file.write_all(contents)?;
        file.flush()?;

        Ok(path)
    }

    /// Files written so far.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Directory the files are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        for path in &self.files {
            let _ = fs::remove_file(path);
        }
    }
}
