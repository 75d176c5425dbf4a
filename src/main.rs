//! Sealant - encrypted deployment secrets with keys held in Barbican.

use std::io::Write;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sealant::cli::output;
use sealant::cli::{execute, Cli};
use sealant::error::{CipherError, ConfigError, Error, KeyStoreError, WrapError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("SEALANT_LOG").unwrap_or_else(|_| {
        if cli.debug {
            EnvFilter::new("sealant=debug")
        } else {
            EnvFilter::new("sealant=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        // A failed tool already explained itself; pass its output and exit
        // code through.
        if let Error::Wrap(WrapError::ToolFailed { output: tool_output, code, .. }) = &e {
            let mut stderr = std::io::stderr().lock();
            let _ = stderr.write_all(tool_output);
            let _ = stderr.flush();
            drop(stderr);
            output::error(&e.to_string());
            std::process::exit(code.unwrap_or(1));
        }

        let suggestion = match &e {
            Error::Config(ConfigError::MissingCredential(_)) => Some(
                "export OS_AUTH_URL, OS_USERNAME, OS_PASSWORD and OS_PROJECT_NAME, or OS_TOKEN with OS_KEY_MANAGER_URL",
            ),
            Error::KeyStore(KeyStoreError::Unavailable(_)) => {
                Some("check your OpenStack credentials and the key manager endpoint")
            }
            Error::KeyStore(KeyStoreError::Lookup { .. }) => {
                Some("remove the duplicate records or set [keystore] lookup = \"first\"")
            }
            Error::Cipher(CipherError::Authentication) => {
                Some("the file was sealed for a different deployment; try --deployment")
            }
            Error::Wrap(WrapError::ToolNotFound(_)) => {
                Some("install it or set its path under [tools] in .sealant.toml")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
