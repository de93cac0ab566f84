//! Run configuration for the converter
//!
//! Command-line flags are collected once into a [`ConvertOptions`] value
//! that is handed to the entry point; nothing is kept in global state.

use std::path::PathBuf;

use crate::openssh::ParseOptions;

/// Directory tinysshd reads its keys from by default
pub const DEFAULT_DEST_DIR: &str = "/etc/tinyssh/sshkeydir";

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// OpenSSH private key file; prompted for when missing
    pub source: Option<PathBuf>,
    /// TinySSH key directory; prompted for when missing
    pub dest: Option<PathBuf>,
    pub parse: ParseOptions,
    /// Print a summary of the key instead of exporting it
    pub inspect: bool,
    /// Print the summary as JSON
    pub json: bool,
    /// Replace existing key files without asking
    pub force: bool,
}

/// Suggested source file: `~/.ssh/id_ed25519`
pub fn default_source() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh").join("id_ed25519"))
}

pub fn default_dest() -> PathBuf {
    PathBuf::from(DEFAULT_DEST_DIR)
}
