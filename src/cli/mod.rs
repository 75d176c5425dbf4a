//! Command-line interface.

pub mod completions;
pub mod output;
pub mod secrets;
pub mod wrap;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::core::broker::KeyBroker;
use crate::core::config::Config;
use crate::core::deployment::Deployment;
use crate::core::store::LazyBarbican;
use crate::error::Result;

/// Sealant - encrypted deployment secrets with keys held in Barbican.
#[derive(Parser)]
#[command(
    name = "sealant",
    about = "Encrypted deployment secrets with keys held in Barbican",
    version
)]
pub struct Cli {
    /// Deployment name (defaults to --name in the tool arguments, then
    /// .sealant.toml, then the current directory name)
    #[arg(short = 'r', long, global = true, env = "SEALANT_DEPLOYMENT")]
    pub deployment: Option<String>,

    /// Print debugging info
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt a secrets file in place
    Enc {
        /// Secrets file
        file: PathBuf,
    },

    /// Decrypt a secrets file in place
    Dec {
        /// Secrets file
        file: PathBuf,
    },

    /// Print the decrypted contents of a secrets file
    View {
        /// Secrets file
        file: PathBuf,
    },

    /// Edit a secrets file in $EDITOR, encrypting it on save
    Edit {
        /// Secrets file (created if missing)
        file: PathBuf,
    },

    /// Run `helm install` with secrets files decrypted
    Install {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run `helm upgrade` with secrets files decrypted
    Upgrade {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run `helm lint` with secrets files decrypted
    Lint {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run `helm template` with secrets files decrypted
    Template {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run `kubectl apply` with secrets files decrypted
    Apply {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Run `kubectl create` with secrets files decrypted
    Create {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Ambient state shared by commands: working directory, config file and
/// the deployment flag.
pub struct Context {
    pub dir: PathBuf,
    pub config: Config,
    deployment: Option<String>,
}

impl Context {
    /// Load `.sealant.toml` from the current directory.
    pub fn load(deployment: Option<String>) -> Result<Self> {
        let dir = std::env::current_dir()?;
        let config = Config::load_from(&dir)?;
        Ok(Self {
            dir,
            config,
            deployment,
        })
    }

    /// Resolve the deployment name.
    ///
    /// Order: `--deployment`, a release flag in `args`, the config file, the
    /// working directory name.
    pub fn deployment(&self, args: &[String]) -> Result<Deployment> {
        let deployment = if let Some(name) = &self.deployment {
            Deployment::new(name.clone())?
        } else if let Some(found) = Deployment::from_args(args, &self.config.wrap.release_flags) {
            found?
        } else if let Some(name) = &self.config.deployment.name {
            Deployment::new(name.clone())?
        } else {
            Deployment::from_dir(&self.dir)?
        };
        debug!(deployment = %deployment, "resolved deployment");
        Ok(deployment)
    }

    /// Key broker over Barbican, authenticating on first use.
    pub fn broker(&self) -> KeyBroker<LazyBarbican> {
        let store = LazyBarbican::from_env(self.config.keystore.endpoint.clone());
        KeyBroker::new(store).with_policy(self.config.keystore.lookup)
    }
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    use Command::*;

    // Completions need neither the config file nor the key store.
    if let Completions { shell } = &cli.command {
        return completions::execute(shell.clone());
    }

    let ctx = Context::load(cli.deployment)?;
    let tools = ctx.config.tools.clone();

    match cli.command {
        Enc { file } => secrets::enc(&ctx, &file),
        Dec { file } => secrets::dec(&ctx, &file),
        View { file } => secrets::view(&ctx, &file),
        Edit { file } => secrets::edit(&ctx, &file),
        Install { args } => wrap::execute(&ctx, &tools.helm, "install", &args),
        Upgrade { args } => wrap::execute(&ctx, &tools.helm, "upgrade", &args),
        Lint { args } => wrap::execute(&ctx, &tools.helm, "lint", &args),
        Template { args } => wrap::execute(&ctx, &tools.helm, "template", &args),
        Apply { args } => wrap::execute(&ctx, &tools.kubectl, "apply", &args),
        Create { args } => wrap::execute(&ctx, &tools.kubectl, "create", &args),
        Completions { shell } => completions::execute(shell),
    }
}
