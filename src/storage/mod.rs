//! Key file storage
//!
//! Loads key files into [`ByteBuffer`](crate::buffer::ByteBuffer)s and
//! writes TinySSH key files:
//! - `.ed25519.sk`: the 64-byte secret key, mode 0600
//! - `ed25519.pk`: the 32-byte public key, mode 0644

mod files;
mod tinyssh;

pub use files::{load_file, save_bytes, CHUNK_SIZE};
pub use tinyssh::{export_to_tinyssh, ExportedFiles, PUBLIC_KEY_FILE, SECRET_KEY_FILE};
