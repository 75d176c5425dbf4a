//! Wrapped tool commands (helm and kubectl verbs).

use std::io::Write;

use tracing::{debug, info};

use crate::cli::Context;
use crate::core::wrapper::Wrapper;
use crate::error::Result;

/// Run `tool verb args...` with secrets files decrypted.
///
/// The tool's combined output is printed to stdout on success. On failure
/// it travels inside the returned `WrapError::ToolFailed`.
pub fn execute(ctx: &Context, tool: &str, verb: &str, args: &[String]) -> Result<()> {
    let deployment = ctx.deployment(args)?;
    let scratch_dir = ctx.config.scratch_dir();
    info!(tool, verb, deployment = %deployment, "running wrapped tool");
    debug!(scratch_dir = %scratch_dir.display(), "decrypted copies go here");

    let wrapper = Wrapper::new(tool, deployment, ctx.broker(), scratch_dir)
        .with_file_flags(ctx.config.wrap.file_flags.clone());
    let invocation = wrapper.run(verb, args)?;

    for path in &invocation.decrypted {
        debug!(file = %path.display(), "passed decrypted copy");
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&invocation.output)?;
    stdout.flush()?;
    Ok(())
}
