//! Ed25519 key pair consistency
//!
//! OpenSSH stores the Ed25519 secret key in its 64-byte expanded form:
//! the 32-byte seed followed by the 32-byte public key. A key pair is
//! consistent when the trailing half equals the public key and the
//! public key derived from the seed matches as well.

use ed25519_dalek::{SigningKey, VerifyingKey};
use zeroize::Zeroizing;

use crate::error::{ConvertError, Result};

/// Public key length in bytes
pub const ED25519_PK_LEN: usize = 32;

/// Secret key length in bytes (seed followed by public key)
pub const ED25519_SK_LEN: usize = 64;

/// Seed length in bytes
pub const ED25519_SEED_LEN: usize = 32;

/// Verify that `secret` is the expanded form of the key whose public half is `public`
pub fn check_keypair(public: &[u8; ED25519_PK_LEN], secret: &[u8; ED25519_SK_LEN]) -> Result<()> {
    let (seed, embedded_public) = secret.split_at(ED25519_SEED_LEN);
    if embedded_public != public {
        return Err(ConvertError::InvalidPrivateFormat);
    }

    let mut seed_bytes = Zeroizing::new([0u8; ED25519_SEED_LEN]);
    seed_bytes.copy_from_slice(seed);

    let signing_key = SigningKey::from_bytes(&seed_bytes);
    let verifying_key: VerifyingKey = (&signing_key).into();

    if verifying_key.as_bytes() != public {
        return Err(ConvertError::InvalidPrivateFormat);
    }
    Ok(())
}
