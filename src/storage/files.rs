//! Whole-file reads and durable writes

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::buffer::ByteBuffer;
use crate::error::{ConvertError, Result};

/// Bytes read per chunk before they are appended to the buffer
pub const CHUNK_SIZE: usize = 1024;

/// Read the whole file at `path` into a new buffer
pub fn load_file(path: &Path) -> Result<ByteBuffer> {
    let mut file =
        File::open(path).map_err(|_| ConvertError::CannotOpenReading(path.display().to_string()))?;

    let mut buffer = ByteBuffer::new();
    let mut chunk = [0u8; CHUNK_SIZE];

    let result = loop {
        match file.read(&mut chunk) {
            Ok(0) => break Ok(()),
            Ok(n) => {
                if let Err(e) = buffer.put(&chunk[..n]) {
                    break Err(e);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => break Err(ConvertError::Io(e)),
        }
    };
    chunk.zeroize();

    result?;
    debug!(path = %path.display(), size = buffer.size(), "file loaded");
    Ok(buffer)
}

/// Write `bytes` to `path` with the given permission bits and fsync it
///
/// An existing file is truncated. If the write fails part way, the
/// partial file is removed.
pub fn save_bytes(path: &Path, bytes: &[u8], mode: u32) -> Result<()> {
    let mut file = open_restricted(path, mode)?;

    if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
        warn!(path = %path.display(), error = %e, "write failed, removing partial file");
        drop(file);
        let _ = fs::remove_file(path);
        return Err(ConvertError::IncompleteWrite(path.display().to_string()));
    }

    debug!(path = %path.display(), len = bytes.len(), "file written");
    Ok(())
}

/// Open `path` for writing with `mode` already applied, then empty it
///
/// The creation mode only applies to new files, so an existing file gets
/// its permissions tightened through the handle before it is truncated.
fn open_restricted(path: &Path, mode: u32) -> Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let file = options
        .open(path)
        .map_err(|_| ConvertError::CannotOpenWriting(path.display().to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    file.set_len(0)?;
    Ok(file)
}
