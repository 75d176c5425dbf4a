//! Error types.
//!
//! Each layer has its own error enum; all of them convert into [`Error`]
//! so commands can propagate with `?`.

use thiserror::Error;

/// Top-level error returned by every sealant operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    #[error(transparent)]
    Wrap(#[from] WrapError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Envelope cipher failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("invalid key: {0}")]
    KeyFormat(String),

    #[error("invalid nonce: {0}")]
    NonceFormat(String),

    #[error("content is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("authentication failed: wrong key or tampered ciphertext")]
    Authentication,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),
}

/// Failures talking to, or interpreting data from, the remote key store.
#[derive(Error, Debug)]
pub enum KeyStoreError {
    #[error("key store unavailable: {0}")]
    Unavailable(String),

    #[error("key store rejected request: {status} {body}")]
    Rejected { status: u16, body: String },

    #[error("key lookup for '{name}' failed: {reason}")]
    Lookup { name: String, reason: String },

    #[error("malformed key record for '{name}': expected 2 fields, found {fields}")]
    MalformedKeyRecord { name: String, fields: usize },
}

/// Failures of a wrapped tool invocation.
#[derive(Error, Debug)]
pub enum WrapError {
    #[error("{tool} exited with {}", describe_code(.code))]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        output: Vec<u8>,
    },

    #[error("{0} not found in PATH")]
    ToolNotFound(String),
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "a signal".to_string(),
    }
}

/// Configuration and ambient-context failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid deployment name: {0}")]
    InvalidDeployment(String),

    #[error("failed to read config: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
