//! Owned byte strings that are wiped when dropped
//!
//! Everything copied out of a key container goes through this type, so
//! strings read from the private section never outlive their owner in
//! readable form:
//! 1. Zeroed on drop
//! 2. Redacted from `Debug` output
//! 3. Locked in memory where possible (prevents swapping)

use std::ops::Deref;
use zeroize::Zeroize;

/// A secure container for sensitive bytes that zeroes itself on drop
#[derive(Default)]
pub struct SecureBytes {
    data: Vec<u8>,
    /// Whether `data` is currently mlocked
    locked: bool,
}

impl SecureBytes {
    /// Take ownership of `data`; its memory is managed securely from now on
    pub fn new(data: Vec<u8>) -> Self {
        let mut secure = Self { data, locked: false };
        secure.lock_memory();
        secure
    }

    /// Lock memory to prevent swapping (best effort, may fail without privileges)
    #[cfg(unix)]
    fn lock_memory(&mut self) {
        if self.data.is_empty() {
            return;
        }
        // SAFETY: pointer and length describe the live allocation owned by self.
        let rc = unsafe { libc::mlock(self.data.as_ptr() as *const libc::c_void, self.data.len()) };
        self.locked = rc == 0;
    }

    #[cfg(not(unix))]
    fn lock_memory(&mut self) {}

    /// Must run while `data` still has the length it was locked with
    #[cfg(unix)]
    fn unlock_memory(&mut self) {
        if !self.locked {
            return;
        }
        // SAFETY: same region that was handed to mlock in lock_memory.
        unsafe {
            libc::munlock(self.data.as_ptr() as *const libc::c_void, self.data.len());
        }
        self.locked = false;
    }

    #[cfg(not(unix))]
    fn unlock_memory(&mut self) {}

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Zeroize for SecureBytes {
    fn zeroize(&mut self) {
        // zeroize truncates the Vec, so the region is unlocked first
        self.unlock_memory();
        self.data.zeroize();
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Deref for SecureBytes {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl AsRef<[u8]> for SecureBytes {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<&[u8]> for SecureBytes {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl PartialEq<[u8]> for SecureBytes {
    fn eq(&self, other: &[u8]) -> bool {
        self.data.as_slice() == other
    }
}

// Prevent accidental debug printing of secrets
impl std::fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.data.len())
            .field("data", &"[REDACTED]")
            .finish()
    }
}
