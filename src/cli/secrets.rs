//! Secret file commands (enc, dec, view, edit).

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::cli::{output, Context};
use crate::core::cipher;
use crate::core::detect::looks_encrypted_bytes;
use crate::core::editor::Editor;
use crate::core::keys::KeyMaterial;
use crate::error::{Error, Result};

/// Encrypt a secrets file in place.
pub fn enc(ctx: &Context, file: &Path) -> Result<()> {
    let content = Zeroizing::new(fs::read(file)?);
    if looks_encrypted_bytes(&content) {
        return Err(Error::Other(
            "content is empty or already encrypted".to_string(),
        ));
    }

    let material = key_for(ctx)?;
    let sealed = cipher::encrypt(material.key(), material.nonce(), &content)?;
    fs::write(file, sealed)?;

    info!(file = %file.display(), "encrypted");
    output::success(&format!("encrypted {}", output::path(&file.display().to_string())));
    Ok(())
}

/// Decrypt a secrets file in place.
pub fn dec(ctx: &Context, file: &Path) -> Result<()> {
    let content = fs::read(file)?;
    let Some(blob) = sealed_text(&content) else {
        return Err(Error::Other("not touching unencrypted content".to_string()));
    };

    let material = key_for(ctx)?;
    let plain = Zeroizing::new(cipher::decrypt(material.key(), material.nonce(), blob)?);
    fs::write(file, plain.as_slice())?;

    info!(file = %file.display(), "decrypted");
    output::success(&format!("decrypted {}", output::path(&file.display().to_string())));
    Ok(())
}

/// Print the decrypted contents of a secrets file.
///
/// Plaintext files are printed as they are, without a key lookup.
pub fn view(ctx: &Context, file: &Path) -> Result<()> {
    let content = Zeroizing::new(fs::read(file)?);
    let plain = match sealed_text(&content) {
        Some(blob) => {
            let material = key_for(ctx)?;
            Zeroizing::new(cipher::decrypt(material.key(), material.nonce(), blob)?)
        }
        None => {
            debug!(file = %file.display(), "file is not encrypted");
            content
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&plain)?;
    stdout.flush()?;
    Ok(())
}

/// Edit a secrets file and store the result encrypted.
///
/// A missing file starts out empty. The decrypted copy lives in the scratch
/// directory only while the editor runs.
pub fn edit(ctx: &Context, file: &Path) -> Result<()> {
    let material = key_for(ctx)?;

    let content = match fs::read(file) {
        Ok(content) => Zeroizing::new(content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(file = %file.display(), "new secrets file");
            Zeroizing::new(Vec::new())
        }
        Err(e) => return Err(e.into()),
    };

    let plain = match sealed_text(&content) {
        Some(blob) => Zeroizing::new(cipher::decrypt(material.key(), material.nonce(), blob)?),
        None => content,
    };

    let editor = Editor::from_env_value(std::env::var("EDITOR").ok())?;
    debug!(editor = %editor.program().display(), "launching editor");
    let edited = editor.edit(&plain, &ctx.config.scratch_dir())?;

    let sealed = cipher::encrypt(material.key(), material.nonce(), &edited)?;
    write_private(file, sealed.as_bytes())?;

    info!(file = %file.display(), "saved");
    output::success(&format!("saved {}", output::path(&file.display().to_string())));
    Ok(())
}

fn key_for(ctx: &Context) -> Result<KeyMaterial> {
    let deployment = ctx.deployment(&[])?;
    ctx.broker().get_or_create_key(&deployment)
}

/// Content as text if it is a sealed blob.
fn sealed_text(content: &[u8]) -> Option<&str> {
    if looks_encrypted_bytes(content) {
        std::str::from_utf8(content).ok()
    } else {
        None
    }
}

/// Replace `path` with `contents`, leaving it readable by the owner only.
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    Ok(())
}
