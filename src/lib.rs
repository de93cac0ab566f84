//! tinyssh-convert - turn OpenSSH Ed25519 private keys into TinySSH key files
//!
//! This crate provides:
//! - A bounded, self-wiping byte buffer with separate read and write cursors
//! - A validating reader for the `openssh-key-v1` private key container
//! - Export of the raw key halves into a TinySSH key directory
//!
//! Only unencrypted keys (cipher and KDF "none") are supported.

pub mod buffer;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod openssh;
pub mod storage;

pub use buffer::ByteBuffer;
pub use error::{ConvertError, Result};
pub use openssh::{parse_openssh_key_v1, parse_openssh_key_v1_with, KeyRecord, ParseOptions};
pub use storage::{export_to_tinyssh, load_file, save_bytes};
