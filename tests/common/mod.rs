#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use ssh_key::private::{Ed25519Keypair, KeypairData};
use ssh_key::{LineEnding, PrivateKey};

pub const SEED: [u8; 32] = [0x5A; 32];
pub const COMMENT: &str = "user@example";

/// An unencrypted OpenSSH key generated from [`SEED`]
pub fn openssh_key() -> PrivateKey {
    let keypair = Ed25519Keypair::from_seed(&SEED);
    PrivateKey::new(KeypairData::Ed25519(keypair), COMMENT).unwrap()
}

pub fn openssh_armored(key: &PrivateKey) -> String {
    let mut armored = key.to_openssh(LineEnding::LF).unwrap().to_string();
    if !armored.ends_with('\n') {
        armored.push('\n');
    }
    armored
}

pub fn encrypted_armored() -> String {
    let encrypted = openssh_key().encrypt(&mut OsRng, "password").unwrap();
    openssh_armored(&encrypted)
}

/// Public and expanded secret key expected for [`SEED`]
pub fn expected_keypair() -> ([u8; 32], [u8; 64]) {
    let signing_key = SigningKey::from_bytes(&SEED);
    (signing_key.verifying_key().to_bytes(), signing_key.to_keypair_bytes())
}

pub fn write_key_file(dir: &Path, contents: &[u8]) -> PathBuf {
    let path = dir.join("id_ed25519");
    fs::write(&path, contents).unwrap();
    path
}
