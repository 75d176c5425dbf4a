//! Sealant - encrypted deployment secrets with keys held in Barbican.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── secrets       # enc, dec, view, edit
//! │   ├── wrap          # helm and kubectl verbs
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── cipher/       # Envelope cipher
//!     │   ├── mod       # Cipher trait, base64 text form
//!     │   └── aes       # AES-256-GCM implementation
//!     ├── detect        # "already sealed?" heuristic
//!     ├── keys          # Deployment key material
//!     ├── broker        # Get-or-create deployment keys
//!     ├── store/        # Key store backends
//!     │   ├── mod       # KeyStore trait
//!     │   ├── barbican  # OpenStack Barbican client
//!     │   └── memory    # In-memory store
//!     ├── wrapper/      # Decrypt-and-run for external tools
//!     ├── deployment    # Deployment names
//!     ├── config        # .sealant.toml
//!     └── editor        # $EDITOR integration
//! ```
//!
//! # Features
//!
//! - AES-256-GCM sealed YAML files, safe to commit
//! - One key per deployment, created on first use in Barbican
//! - helm and kubectl see decrypted copies in memory-backed storage only
//! - Decrypted copies are removed however the wrapped tool exits

pub mod cli;
pub mod core;
pub mod error;
