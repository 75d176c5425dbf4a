//! Process wrapper.
//!
//! Runs an external deployment tool with sealed secret file arguments
//! swapped for decrypted ephemeral copies:
//!
//! 1. scan the arguments for file flags and collect the path after each;
//! 2. leave paths alone that don't exist or aren't sealed;
//! 3. decrypt the rest into [`Scratch`] files and rewrite their slots;
//! 4. run `tool verb args...` with stdin closed and stdout and stderr
//!    merged into one pipe;
//! 5. drop the scratch guard, removing every decrypted copy.
//!
//! Key store and cipher failures abort before the tool is spawned.

mod scratch;

pub use scratch::Scratch;

use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use zeroize::Zeroizing;

use crate::core::broker::KeyBroker;
use crate::core::cipher;
use crate::core::constants;
use crate::core::deployment::Deployment;
use crate::core::detect::looks_encrypted;
use crate::core::keys::KeyMaterial;
use crate::core::store::KeyStore;
use crate::error::{Result, WrapError};

/// Outcome of a successful wrapped run.
#[derive(Debug)]
pub struct Invocation {
    /// Combined stdout and stderr of the tool.
    pub output: Vec<u8>,
    /// Arguments the tool was given, after rewriting.
    pub args: Vec<String>,
    /// Original paths of the secret files that were decrypted.
    pub decrypted: Vec<PathBuf>,
}

/// Wraps one external tool for one deployment.
pub struct Wrapper<S> {
    tool: String,
    file_flags: Vec<String>,
    deployment: Deployment,
    broker: KeyBroker<S>,
    scratch_dir: PathBuf,
}

impl<S: KeyStore> Wrapper<S> {
    /// Wrapper for `tool`, writing decrypted copies under `scratch_dir`.
    ///
    /// Uses the default file flags (`--values`, `-f`, `--filename`).
    pub fn new(
        tool: impl Into<String>,
        deployment: Deployment,
        broker: KeyBroker<S>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            tool: tool.into(),
            file_flags: constants::DEFAULT_FILE_FLAGS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            deployment,
            broker,
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Replace the flags whose value is a secret file path.
    pub fn with_file_flags(mut self, flags: Vec<String>) -> Self {
        self.file_flags = flags;
        self
    }

    /// The wrapped executable.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Run `tool verb args...`.
    ///
    /// # Errors
    ///
    /// - key store or cipher errors while decrypting a secret file
    /// - `WrapError::ToolNotFound` if the tool can't be spawned
    /// - `WrapError::ToolFailed` if it exits unsuccessfully, carrying its
    ///   combined output
    pub fn run(&self, verb: &str, args: &[String]) -> Result<Invocation> {
        let mut scratch = Scratch::new(&self.scratch_dir);
        let mut args = args.to_vec();
        let mut decrypted = Vec::new();
        let mut material: Option<KeyMaterial> = None;

        for slot in self.secret_slots(&args) {
            let path = PathBuf::from(&args[slot]);
            let Some(blob) = read_sealed(&path)? else {
                continue;
            };

            if material.is_none() {
                material = Some(self.broker.get_or_create_key(&self.deployment)?);
            }
            let Some(material) = material.as_ref() else {
                continue;
            };

            let plaintext = Zeroizing::new(cipher::decrypt(material.key(), material.nonce(), &blob)?);
            let ephemeral = scratch.write(&plaintext)?;
            args[slot] = ephemeral.to_string_lossy().into_owned();
            decrypted.push(path);
        }

        let output = self.execute(verb, &args)?;

        Ok(Invocation {
            output,
            args,
            decrypted,
        })
    }

    /// Indices of arguments that follow a file flag.
    fn secret_slots(&self, args: &[String]) -> Vec<usize> {
        args.iter()
            .enumerate()
            .filter(|(i, arg)| *i + 1 < args.len() && self.file_flags.contains(arg))
            .map(|(i, _)| i + 1)
            .collect()
    }

    fn execute(&self, verb: &str, args: &[String]) -> Result<Vec<u8>> {
        let (mut reader, writer) = std::io::pipe()?;

        // The Command holds pipe writers until it is dropped at the end of
        // this statement; reading to EOF depends on that.
        let spawned = Command::new(&self.tool)
            .arg(verb)
            .args(args)
            .stdin(Stdio::null())
            .stdout(writer.try_clone()?)
            .stderr(writer)
            .spawn();

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(WrapError::ToolNotFound(self.tool.clone()).into())
            }
            Err(e) => return Err(e.into()),
        };

        let mut output = Vec::new();
        reader.read_to_end(&mut output)?;
        let status = child.wait()?;

        if status.success() {
            Ok(output)
        } else {
            Err(WrapError::ToolFailed {
                tool: self.tool.clone(),
                code: status.code(),
                output,
            }
            .into())
        }
    }
}

/// Content of `path` if it is an existing file holding a sealed blob.
fn read_sealed(path: &Path) -> Result<Option<String>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read(path)?;
    match String::from_utf8(content) {
        Ok(text) if looks_encrypted(&text) => Ok(Some(text)),
        _ => Ok(None),
    }
}
