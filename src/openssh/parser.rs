//! Field-by-field walk over a decoded `openssh-key-v1` container

use clap::ValueEnum;
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::armor::decode_armored;
use super::key::{deserialize_private, parse_public_blob, KeyRecord};
use super::{MAGIC, NONE, NONE_BLOCK_SIZE};
use crate::buffer::{hexdump, ByteBuffer};
use crate::crypto::check_keypair;
use crate::error::{ConvertError, Result};

/// Treatment of the deterministic padding (1, 2, 3, ...) closing the private section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaddingCheck {
    /// Skip the padding unchecked
    Ignore,
    /// Log malformed padding and carry on
    #[default]
    Warn,
    /// Reject malformed padding
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub padding: PaddingCheck,
    /// Compare the outer public key with the private one and check that
    /// the Ed25519 seed yields that public key. Off by default, the outer
    /// public key blob is then read and discarded.
    pub verify_public_key: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            padding: PaddingCheck::Warn,
            verify_public_key: false,
        }
    }
}

/// A parsed key together with its comment
#[derive(Debug)]
pub struct ParsedKey {
    pub key: KeyRecord,
    pub comment: String,
}

/// Parse an armored key file with default options
pub fn parse_openssh_key_v1(filebuf: &ByteBuffer) -> Result<KeyRecord> {
    parse_openssh_key_v1_with(filebuf, &ParseOptions::default()).map(|parsed| parsed.key)
}

/// Parse the unread bytes of `filebuf` as an armored `openssh-key-v1` key
///
/// Every intermediate buffer wipes itself when dropped, so an early
/// return leaves no decoded key material behind.
pub fn parse_openssh_key_v1_with(filebuf: &ByteBuffer, options: &ParseOptions) -> Result<ParsedKey> {
    let mut decoded = decode_armored(filebuf.unread())?;

    if !decoded.unread().starts_with(MAGIC) {
        return Err(ConvertError::InvalidFormat);
    }
    decoded.advance(MAGIC.len())?;
    debug!("magic bytes matched");

    let cipher_name = decoded.read_cstring()?;
    if cipher_name != NONE {
        return Err(ConvertError::UnsupportedCipher(cipher_name));
    }

    let kdf_name = decoded.read_cstring()?;
    if kdf_name != NONE {
        return Err(ConvertError::UnsupportedKdf(kdf_name));
    }

    // kdf options only carry salt and rounds for real KDFs
    decoded.skip_string()?;

    let key_count = decoded.read_u32()?;
    if key_count != 1 {
        return Err(ConvertError::UnsupportedMultipleKeys(key_count));
    }

    let public_blob = decoded.read_string_raw()?;
    let private_len = decoded.read_u32()? as usize;
    debug!(%cipher_name, %kdf_name, key_count, private_len, "container header read");
    trace!("container header:\n{}", hexdump(&decoded.data()[..decoded.offset()]));

    if private_len < NONE_BLOCK_SIZE
        || private_len % NONE_BLOCK_SIZE != 0
        || private_len != decoded.remaining()
    {
        return Err(ConvertError::InvalidPrivateFormat);
    }

    // with cipher "none", decryption is a plain copy into a buffer of its own
    let mut private = decoded.copy_remaining()?;
    decoded.advance(private_len)?;
    drop(decoded);

    let check1 = private.read_u32()?;
    let check2 = private.read_u32()?;
    if check1 != check2 {
        return Err(ConvertError::InvalidPrivateFormat);
    }

    let key = deserialize_private(&mut private)?;
    let comment = private.read_cstring()?;
    debug!(key_type = ?key.key_type(), %comment, "private key read");

    check_padding(&mut private, options.padding)?;

    if options.verify_public_key {
        verify_public_key(&public_blob, &key)?;
    }

    Ok(ParsedKey { key, comment })
}

fn check_padding(private: &mut ByteBuffer, policy: PaddingCheck) -> Result<()> {
    let padding = private.unread();
    let valid = padding
        .iter()
        .enumerate()
        .all(|(i, &byte)| byte == ((i + 1) & 0xff) as u8);
    let padding_len = padding.len();

    if !valid {
        match policy {
            PaddingCheck::Ignore => {}
            PaddingCheck::Warn => warn!(padding_len, "private section padding is malformed"),
            PaddingCheck::Strict => return Err(ConvertError::InvalidPadding),
        }
    }
    private.advance(padding_len)
}

fn verify_public_key(public_blob: &[u8], key: &KeyRecord) -> Result<()> {
    let (outer_type, outer_public) = parse_public_blob(public_blob)?;
    if outer_type != key.key_type() || outer_public.as_ref() != Some(key.public_key()) {
        return Err(ConvertError::PublicKeyMismatch);
    }
    check_keypair(key.public_key(), key.secret_key())?;
    debug!(fingerprint = %key.fingerprint_hex(), "public key verified");
    Ok(())
}
