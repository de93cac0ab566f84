//! Container builder for parser tests

use base64::{engine::general_purpose::STANDARD, Engine as _};
use ed25519_dalek::SigningKey;

use super::{MARK_BEGIN, MARK_END, NONE_BLOCK_SIZE};
use crate::buffer::ByteBuffer;

/// Every field of a container, defaulting to a valid unencrypted Ed25519 key
pub(crate) struct Container {
    pub magic: Vec<u8>,
    pub cipher: Vec<u8>,
    pub kdf: Vec<u8>,
    pub kdf_options: Vec<u8>,
    pub key_count: u32,
    /// Replaces the public key inside the outer public blob
    pub outer_public: Option<Vec<u8>>,
    pub checkint1: u32,
    pub checkint2: u32,
    pub key_type: Vec<u8>,
    pub public: Vec<u8>,
    pub secret: Vec<u8>,
    pub comment: Vec<u8>,
    /// Pad bytes appended beyond block alignment
    pub extra_padding: usize,
    pub corrupt_padding: bool,
    /// Replaces the whole private section
    pub private_override: Option<Vec<u8>>,
    /// Bytes after the private section
    pub trailing: Vec<u8>,
}

impl Default for Container {
    fn default() -> Self {
        let signing_key = SigningKey::from_bytes(&[42u8; 32]);
        Self {
            magic: b"openssh-key-v1\0".to_vec(),
            cipher: b"none".to_vec(),
            kdf: b"none".to_vec(),
            kdf_options: Vec::new(),
            key_count: 1,
            outer_public: None,
            checkint1: 0x1234_5678,
            checkint2: 0x1234_5678,
            key_type: b"ssh-ed25519".to_vec(),
            public: signing_key.verifying_key().to_bytes().to_vec(),
            secret: signing_key.to_keypair_bytes().to_vec(),
            comment: b"test".to_vec(),
            extra_padding: 0,
            corrupt_padding: false,
            private_override: None,
            trailing: Vec::new(),
        }
    }
}

impl Container {
    fn public_blob(&self) -> Vec<u8> {
        let mut blob = ByteBuffer::new();
        blob.put_string(b"ssh-ed25519").unwrap();
        blob.put_string(self.outer_public.as_ref().unwrap_or(&self.public))
            .unwrap();
        blob.data().to_vec()
    }

    fn private_section(&self) -> Vec<u8> {
        if let Some(section) = &self.private_override {
            return section.clone();
        }
        let mut section = ByteBuffer::new();
        section.put_u32(self.checkint1).unwrap();
        section.put_u32(self.checkint2).unwrap();
        section.put_string(&self.key_type).unwrap();
        section.put_string(&self.public).unwrap();
        section.put_string(&self.secret).unwrap();
        section.put_string(&self.comment).unwrap();

        let mut pad = 1u8;
        while section.size() % NONE_BLOCK_SIZE != 0 {
            section.put_u8(pad).unwrap();
            pad = pad.wrapping_add(1);
        }
        for _ in 0..self.extra_padding {
            section.put_u8(pad).unwrap();
            pad = pad.wrapping_add(1);
        }
        if self.corrupt_padding {
            // a full block of wrong padding so the section stays aligned
            for _ in 0..NONE_BLOCK_SIZE {
                section.put_u8(0xEE).unwrap();
            }
        }
        section.data().to_vec()
    }

    /// The base64-decoded container
    pub fn decoded(&self) -> Vec<u8> {
        let private = self.private_section();
        let mut buf = ByteBuffer::new();
        buf.put(&self.magic).unwrap();
        buf.put_string(&self.cipher).unwrap();
        buf.put_string(&self.kdf).unwrap();
        buf.put_string(&self.kdf_options).unwrap();
        buf.put_u32(self.key_count).unwrap();
        buf.put_string(&self.public_blob()).unwrap();
        buf.put_string(&private).unwrap();
        buf.put(&self.trailing).unwrap();
        buf.data().to_vec()
    }

    /// Wrap decoded bytes in armor with 70-column base64 lines
    pub fn armor(decoded: &[u8]) -> Vec<u8> {
        let encoded = STANDARD.encode(decoded);
        let mut out = MARK_BEGIN.to_vec();
        for line in encoded.as_bytes().chunks(70) {
            out.extend_from_slice(line);
            out.push(b'\n');
        }
        out.extend_from_slice(MARK_END);
        out
    }

    pub fn armored(&self) -> Vec<u8> {
        Self::armor(&self.decoded())
    }

    pub fn file_buffer(&self) -> ByteBuffer {
        ByteBuffer::from_slice(&self.armored()).unwrap()
    }
}
