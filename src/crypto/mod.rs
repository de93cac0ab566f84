//! Key material handling
//!
//! This module provides:
//! - Secure memory handling with automatic zeroing
//! - Ed25519 key pair consistency checks

mod ed25519;
mod secure_bytes;

pub use ed25519::{check_keypair, ED25519_PK_LEN, ED25519_SEED_LEN, ED25519_SK_LEN};
pub use secure_bytes::SecureBytes;
