//! Constants used throughout sealant.
//!
//! Centralizes magic strings and configuration values.

/// Configuration file name (.sealant.toml).
pub const CONFIG_FILE: &str = ".sealant.toml";

/// Arguments that take a secret file path as their value.
pub const DEFAULT_FILE_FLAGS: &[&str] = &["--values", "-f", "--filename"];

/// Arguments whose value names the helm release.
pub const DEFAULT_RELEASE_FLAGS: &[&str] = &["--name"];

/// Memory-backed directory for decrypted copies, when the platform has one.
pub const SHM_DIR: &str = "/dev/shm";

/// Editor launched by `sealant edit` when `$EDITOR` is unset.
pub const DEFAULT_EDITOR: &str = "vim";

/// Raw key length for AES-256-GCM.
pub const KEY_LEN: usize = 32;

/// Raw nonce length for AES-256-GCM.
pub const NONCE_LEN: usize = 12;

/// Record attributes submitted when a deployment key is created.
pub const KEY_ALGORITHM: &str = "aes";
pub const KEY_BIT_LENGTH: u32 = 256;
pub const KEY_MODE: &str = "gcm";
pub const KEY_CONTENT_TYPE: &str = "text/plain";
pub const KEY_SECRET_TYPE: &str = "opaque";
