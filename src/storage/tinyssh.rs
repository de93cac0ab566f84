//! TinySSH key directory export

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use super::files::save_bytes;
use crate::error::{ConvertError, Result};
use crate::openssh::KeyRecord;

/// Secret key file name; hidden so directory listings do not show it
pub const SECRET_KEY_FILE: &str = ".ed25519.sk";

/// Public key file name
pub const PUBLIC_KEY_FILE: &str = "ed25519.pk";

const SECRET_KEY_MODE: u32 = 0o600;
const PUBLIC_KEY_MODE: u32 = 0o644;
const KEY_DIR_MODE: u32 = 0o700;

/// Paths written by [`export_to_tinyssh`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub secret_key: PathBuf,
    pub public_key: PathBuf,
}

/// Write the raw key halves of `key` into `dest_dir`
///
/// The directory is created (mode 0700) when missing. Existing key
/// files are only replaced when `overwrite` is set.
pub fn export_to_tinyssh(key: &KeyRecord, dest_dir: &Path, overwrite: bool) -> Result<ExportedFiles> {
    ensure_key_dir(dest_dir)?;

    let files = ExportedFiles {
        secret_key: dest_dir.join(SECRET_KEY_FILE),
        public_key: dest_dir.join(PUBLIC_KEY_FILE),
    };

    if !overwrite {
        for path in [&files.secret_key, &files.public_key] {
            if path.exists() {
                return Err(ConvertError::AlreadyExists(path.display().to_string()));
            }
        }
    }

    save_bytes(&files.secret_key, key.secret_key(), SECRET_KEY_MODE)?;
    save_bytes(&files.public_key, key.public_key(), PUBLIC_KEY_MODE)?;

    info!(dir = %dest_dir.display(), "tinyssh keys written");
    Ok(files)
}

fn ensure_key_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }
    if dir.exists() {
        return Err(ConvertError::InvalidArgument(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(KEY_DIR_MODE))?;
    }
    #[cfg(not(unix))]
    let _ = KEY_DIR_MODE;

    Ok(())
}
