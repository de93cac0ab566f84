//! Key type table and parsed key records

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use tracing::debug;
use zeroize::{Zeroize, Zeroizing};

use crate::buffer::ByteBuffer;
use crate::crypto::{ED25519_PK_LEN, ED25519_SK_LEN};
use crate::error::{ConvertError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyType {
    Ed25519,
    Ed25519Cert,
    Ecdsa,
    EcdsaCert,
    Unknown,
}

struct KeyTypeEntry {
    name: &'static str,
    short_name: &'static str,
    key_type: KeyType,
}

const KEY_TYPES: &[KeyTypeEntry] = &[
    KeyTypeEntry {
        name: "ssh-ed25519",
        short_name: "ed25519",
        key_type: KeyType::Ed25519,
    },
    KeyTypeEntry {
        name: "ssh-ed25519-cert-v01@openssh.com",
        short_name: "ed25519-cert",
        key_type: KeyType::Ed25519Cert,
    },
    KeyTypeEntry {
        name: "ecdsa-sha2-nistp256",
        short_name: "ecdsa",
        key_type: KeyType::Ecdsa,
    },
    KeyTypeEntry {
        name: "ecdsa-sha2-nistp384",
        short_name: "ecdsa",
        key_type: KeyType::Ecdsa,
    },
    KeyTypeEntry {
        name: "ecdsa-sha2-nistp521",
        short_name: "ecdsa",
        key_type: KeyType::Ecdsa,
    },
    KeyTypeEntry {
        name: "ecdsa-sha2-nistp256-cert-v01@openssh.com",
        short_name: "ecdsa-cert",
        key_type: KeyType::EcdsaCert,
    },
    KeyTypeEntry {
        name: "ecdsa-sha2-nistp384-cert-v01@openssh.com",
        short_name: "ecdsa-cert",
        key_type: KeyType::EcdsaCert,
    },
    KeyTypeEntry {
        name: "ecdsa-sha2-nistp521-cert-v01@openssh.com",
        short_name: "ecdsa-cert",
        key_type: KeyType::EcdsaCert,
    },
];

impl KeyType {
    /// Look up a type by its full wire name, or by its short alias ignoring case
    pub fn from_name(name: &str) -> KeyType {
        KEY_TYPES
            .iter()
            .find(|entry| entry.name == name || entry.short_name.eq_ignore_ascii_case(name))
            .map(|entry| entry.key_type)
            .unwrap_or(KeyType::Unknown)
    }

    /// Wire name of the type; the first table entry wins for ECDSA curves
    pub fn name(&self) -> &'static str {
        self.entry().map(|e| e.name).unwrap_or("unknown")
    }

    pub fn short_name(&self) -> &'static str {
        self.entry().map(|e| e.short_name).unwrap_or("unknown")
    }

    fn entry(&self) -> Option<&'static KeyTypeEntry> {
        KEY_TYPES.iter().find(|entry| entry.key_type == *self)
    }
}

/// An Ed25519 key pair as stored in the private section
pub struct Ed25519Keypair {
    public: [u8; ED25519_PK_LEN],
    secret: Zeroizing<[u8; ED25519_SK_LEN]>,
}

impl Ed25519Keypair {
    /// Build a key pair from raw strings, checking their exact lengths
    pub fn from_slices(public: &[u8], secret: &[u8]) -> Result<Self> {
        let public: [u8; ED25519_PK_LEN] =
            public.try_into().map_err(|_| ConvertError::InvalidFormat)?;
        if secret.len() != ED25519_SK_LEN {
            return Err(ConvertError::InvalidFormat);
        }
        let mut stored = Zeroizing::new([0u8; ED25519_SK_LEN]);
        stored.copy_from_slice(secret);
        Ok(Self {
            public,
            secret: stored,
        })
    }

    pub fn public_key(&self) -> &[u8; ED25519_PK_LEN] {
        &self.public
    }

    pub fn secret_key(&self) -> &[u8; ED25519_SK_LEN] {
        &self.secret
    }
}

impl Zeroize for Ed25519Keypair {
    fn zeroize(&mut self) {
        self.public.zeroize();
        self.secret.zeroize();
    }
}

impl Drop for Ed25519Keypair {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl std::fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Keypair")
            .field("public", &hex::encode(self.public))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// One parsed private key
#[derive(Debug)]
pub enum KeyRecord {
    Ed25519(Ed25519Keypair),
    Ed25519Cert(Ed25519Keypair),
}

impl KeyRecord {
    pub fn key_type(&self) -> KeyType {
        match self {
            KeyRecord::Ed25519(_) => KeyType::Ed25519,
            KeyRecord::Ed25519Cert(_) => KeyType::Ed25519Cert,
        }
    }

    fn keypair(&self) -> &Ed25519Keypair {
        match self {
            KeyRecord::Ed25519(pair) | KeyRecord::Ed25519Cert(pair) => pair,
        }
    }

    pub fn public_key(&self) -> &[u8; ED25519_PK_LEN] {
        self.keypair().public_key()
    }

    pub fn secret_key(&self) -> &[u8; ED25519_SK_LEN] {
        self.keypair().secret_key()
    }

    /// Hex encoding of the public key
    pub fn fingerprint_hex(&self) -> String {
        hex::encode(self.public_key())
    }

    /// The public key in OpenSSH `authorized_keys` format
    /// Format: "ssh-ed25519 <base64-encoded-key> <comment>"
    pub fn openssh_public_line(&self, comment: &str) -> String {
        // both strings are a few dozen bytes, far below the buffer limits
        let encoded = self
            .public_blob()
            .map(|blob| STANDARD.encode(blob.data()))
            .unwrap_or_default();

        if comment.is_empty() {
            format!("{} {}", KeyType::Ed25519.name(), encoded)
        } else {
            format!("{} {} {}", KeyType::Ed25519.name(), encoded, comment)
        }
    }

    /// `string "ssh-ed25519", string pk`
    fn public_blob(&self) -> Result<ByteBuffer> {
        let mut blob = ByteBuffer::new();
        blob.put_string(KeyType::Ed25519.name().as_bytes())?;
        blob.put_string(self.public_key())?;
        Ok(blob)
    }

    /// Non-secret description of the key
    pub fn summary(&self, comment: &str) -> KeySummary {
        KeySummary {
            key_type: self.key_type(),
            type_name: self.key_type().name(),
            short_name: self.key_type().short_name(),
            comment: comment.to_string(),
            public_key_hex: self.fingerprint_hex(),
            public_key_openssh: self.openssh_public_line(comment),
        }
    }
}

/// Printable, secret-free view of a parsed key
#[derive(Debug, Clone, Serialize)]
pub struct KeySummary {
    pub key_type: KeyType,
    pub type_name: &'static str,
    pub short_name: &'static str,
    pub comment: String,
    pub public_key_hex: String,
    pub public_key_openssh: String,
}

/// Read one private key record: a type name followed by type-specific fields
///
/// Ed25519 records carry `string pk, string sk`; certificate records carry
/// the certificate blob first, which is skipped. ECDSA is recognized but
/// rejected, as is every unknown name.
pub fn deserialize_private(buf: &mut ByteBuffer) -> Result<KeyRecord> {
    let type_name = buf.read_cstring()?;
    let key_type = KeyType::from_name(&type_name);
    debug!(%type_name, ?key_type, "private key type");

    match key_type {
        KeyType::Ed25519 => Ok(KeyRecord::Ed25519(read_ed25519_pair(buf)?)),
        KeyType::Ed25519Cert => {
            buf.skip_string()?;
            Ok(KeyRecord::Ed25519Cert(read_ed25519_pair(buf)?))
        }
        KeyType::Ecdsa | KeyType::EcdsaCert | KeyType::Unknown => {
            Err(ConvertError::UnsupportedKeyType(type_name))
        }
    }
}

fn read_ed25519_pair(buf: &mut ByteBuffer) -> Result<Ed25519Keypair> {
    let public = buf.read_string_raw()?;
    let secret = buf.read_string_raw()?;
    Ed25519Keypair::from_slices(&public, &secret)
}

/// Extract the key type and, for Ed25519, the public key from a public key blob
///
/// Plain keys are `string type, string pk`; certificates are
/// `string type, string nonce, string pk, ...`.
pub(crate) fn parse_public_blob(blob: &[u8]) -> Result<(KeyType, Option<[u8; ED25519_PK_LEN]>)> {
    let mut buf = ByteBuffer::from_slice(blob)?;
    let key_type = KeyType::from_name(&buf.read_cstring()?);

    let public = match key_type {
        KeyType::Ed25519 => Some(buf.read_string_raw()?),
        KeyType::Ed25519Cert => {
            buf.skip_string()?;
            Some(buf.read_string_raw()?)
        }
        _ => None,
    };

    let public = match public {
        Some(bytes) => Some(
            <[u8; ED25519_PK_LEN]>::try_from(&bytes[..]).map_err(|_| ConvertError::InvalidFormat)?,
        ),
        None => None,
    };
    Ok((key_type, public))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ssh-ed25519", KeyType::Ed25519)]
    #[case("ed25519", KeyType::Ed25519)]
    #[case("ED25519", KeyType::Ed25519)]
    #[case("ssh-ed25519-cert-v01@openssh.com", KeyType::Ed25519Cert)]
    #[case("Ed25519-Cert", KeyType::Ed25519Cert)]
    #[case("ecdsa-sha2-nistp384", KeyType::Ecdsa)]
    #[case("ECDSA", KeyType::Ecdsa)]
    #[case("ecdsa-sha2-nistp521-cert-v01@openssh.com", KeyType::EcdsaCert)]
    #[case("SSH-ED25519", KeyType::Unknown)]
    #[case("ssh-rsa", KeyType::Unknown)]
    #[case("", KeyType::Unknown)]
    fn test_key_type_from_name(#[case] name: &str, #[case] expected: KeyType) {
        assert_eq!(KeyType::from_name(name), expected);
    }

    #[test]
    fn test_key_type_names() {
        assert_eq!(KeyType::Ed25519.name(), "ssh-ed25519");
        assert_eq!(KeyType::Ecdsa.name(), "ecdsa-sha2-nistp256");
        assert_eq!(KeyType::Unknown.name(), "unknown");
        assert_eq!(KeyType::EcdsaCert.short_name(), "ecdsa-cert");
    }

    fn record(type_name: &str, public: &[u8], secret: &[u8]) -> ByteBuffer {
        let mut buf = ByteBuffer::new();
        buf.put_string(type_name.as_bytes()).unwrap();
        buf.put_string(public).unwrap();
        buf.put_string(secret).unwrap();
        buf
    }

    #[test]
    fn test_deserialize_ed25519() {
        let mut buf = record("ssh-ed25519", &[1u8; 32], &[2u8; 64]);
        let key = deserialize_private(&mut buf).unwrap();
        assert_eq!(key.key_type(), KeyType::Ed25519);
        assert_eq!(key.public_key(), &[1u8; 32]);
        assert_eq!(key.secret_key(), &[2u8; 64]);
        assert_eq!(buf.remaining(), 0);
    }

    #[test]
    fn test_deserialize_ed25519_cert_skips_certificate() {
        let mut buf = ByteBuffer::new();
        buf.put_string(b"ssh-ed25519-cert-v01@openssh.com").unwrap();
        buf.put_string(b"certificate blob").unwrap();
        buf.put_string(&[3u8; 32]).unwrap();
        buf.put_string(&[4u8; 64]).unwrap();

        let key = deserialize_private(&mut buf).unwrap();
        assert_eq!(key.key_type(), KeyType::Ed25519Cert);
        assert_eq!(key.public_key(), &[3u8; 32]);
    }

    #[rstest]
    #[case(31, 64)]
    #[case(33, 64)]
    #[case(32, 32)]
    #[case(32, 65)]
    #[case(0, 0)]
    fn test_deserialize_wrong_lengths(#[case] pk_len: usize, #[case] sk_len: usize) {
        let mut buf = record("ssh-ed25519", &vec![1u8; pk_len], &vec![2u8; sk_len]);
        assert!(matches!(
            deserialize_private(&mut buf),
            Err(ConvertError::InvalidFormat)
        ));
    }

    #[rstest]
    #[case("ecdsa-sha2-nistp256")]
    #[case("ssh-rsa")]
    #[case("ssh-dss")]
    fn test_deserialize_unsupported(#[case] name: &str) {
        let mut buf = record(name, &[1u8; 32], &[2u8; 64]);
        match deserialize_private(&mut buf) {
            Err(ConvertError::UnsupportedKeyType(found)) => assert_eq!(found, name),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_openssh_public_line() {
        let mut buf = record("ssh-ed25519", &[0u8; 32], &[0u8; 64]);
        let key = deserialize_private(&mut buf).unwrap();
        assert_eq!(
            key.openssh_public_line("me@host"),
            "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA me@host"
        );
        assert!(!key.openssh_public_line("").ends_with(' '));
    }

    #[test]
    fn test_summary_and_debug_hide_secret() {
        let mut buf = record("ssh-ed25519", &[0xAB; 32], &[0xCD; 64]);
        let key = deserialize_private(&mut buf).unwrap();

        let summary = key.summary("test");
        assert_eq!(summary.public_key_hex, "ab".repeat(32));
        assert_eq!(summary.type_name, "ssh-ed25519");

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"key_type\":\"ed25519\""));
        assert!(!json.contains("cdcd"));
        assert!(!format!("{:?}", key).contains("cdcd"));
    }

    #[test]
    fn test_parse_public_blob() {
        let mut blob = ByteBuffer::new();
        blob.put_string(b"ssh-ed25519").unwrap();
        blob.put_string(&[9u8; 32]).unwrap();
        let (key_type, public) = parse_public_blob(blob.data()).unwrap();
        assert_eq!(key_type, KeyType::Ed25519);
        assert_eq!(public, Some([9u8; 32]));

        let mut blob = ByteBuffer::new();
        blob.put_string(b"ecdsa-sha2-nistp256").unwrap();
        assert_eq!(parse_public_blob(blob.data()).unwrap(), (KeyType::Ecdsa, None));
    }
}
