//! Growable byte buffer with independent write and read cursors
//!
//! Layout of a [`ByteBuffer`]:
//!
//! ```text
//! 0            offset             size                allocated
//! |--- read ---|----- unread -----|----- zeroed spare -----|
//! ```
//!
//! Writers append at `size`, readers consume from `offset`. Storage grows
//! in [`ALLOCATION_INCREMENT`] steps and never beyond
//! [`ALLOCATION_MAXIMUM`], so a hostile length field cannot drive an
//! unbounded allocation. The whole allocation is wiped before it is
//! released, both on drop and when growing moves the data elsewhere.

mod codec;
mod dump;

use codec::{encode_u32, peek_u32, peek_u8, U32_LEN};
pub use dump::hexdump;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::SecureBytes;
use crate::error::{ConvertError, Result};

/// Storage grows in multiples of this many bytes
pub const ALLOCATION_INCREMENT: usize = 2048;

/// Hard ceiling on the storage of a single buffer (64 MiB)
pub const ALLOCATION_MAXIMUM: usize = 64 * 1024 * 1024;

/// How an embedded terminator byte is treated by
/// [`ByteBuffer::read_length_prefixed_string`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// Raw binary payload, any byte value allowed
    None,
    /// The byte may appear only as the very last byte of the payload
    LastOnly(u8),
}

impl Terminator {
    fn check(self, payload: &[u8]) -> Result<()> {
        match self {
            Terminator::None => Ok(()),
            Terminator::LastOnly(c) => match payload.iter().position(|&b| b == c) {
                Some(pos) if pos + 1 < payload.len() => Err(ConvertError::InvalidFormat),
                _ => Ok(()),
            },
        }
    }
}

pub struct ByteBuffer {
    /// Backing storage, `data.len()` is the allocated capacity
    data: Vec<u8>,
    /// Bytes written
    size: usize,
    /// Read cursor
    offset: usize,
}

fn round_up(value: usize, step: usize) -> Option<usize> {
    value.checked_add(step - 1).map(|v| v / step * step)
}

impl ByteBuffer {
    /// Create an empty buffer with one increment of zeroed storage
    pub fn new() -> Self {
        Self {
            data: vec![0u8; ALLOCATION_INCREMENT],
            size: 0,
            offset: 0,
        }
    }

    /// Create a buffer holding a copy of `bytes`
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut buf = Self::new();
        buf.put(bytes)?;
        Ok(buf)
    }

    /// Bytes written so far
    pub fn size(&self) -> usize {
        self.size
    }

    /// Position of the read cursor
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Currently allocated storage
    pub fn allocated(&self) -> usize {
        self.data.len()
    }

    /// Bytes written but not yet read
    pub fn remaining(&self) -> usize {
        self.size - self.offset
    }

    /// All bytes written, including those already read
    pub fn data(&self) -> &[u8] {
        &self.data[..self.size]
    }

    /// Bytes from the read cursor to the end of the written data
    pub fn unread(&self) -> &[u8] {
        &self.data[self.offset..self.size]
    }

    /// Hexdump of the written data, for trace logging
    pub fn hexdump(&self) -> String {
        hexdump(self.data())
    }

    /// Wipe all contents and shrink back to the initial allocation
    pub fn reset(&mut self) {
        self.data.zeroize();
        self.data = vec![0u8; ALLOCATION_INCREMENT];
        self.size = 0;
        self.offset = 0;
    }

    /// Make sure `additional` more bytes fit without touching `size`
    pub fn ensure_capacity(&mut self, additional: usize) -> Result<()> {
        let requested = self.size.checked_add(additional).ok_or(
            ConvertError::CapacityExceeded {
                requested: usize::MAX,
                maximum: ALLOCATION_MAXIMUM,
            },
        )?;
        let needed = round_up(requested, ALLOCATION_INCREMENT)
            .filter(|&n| n <= ALLOCATION_MAXIMUM)
            .ok_or(ConvertError::CapacityExceeded {
                requested,
                maximum: ALLOCATION_MAXIMUM,
            })?;

        if needed > self.data.len() {
            self.grow(needed)?;
        }
        Ok(())
    }

    fn grow(&mut self, needed: usize) -> Result<()> {
        let mut grown: Vec<u8> = Vec::new();
        grown
            .try_reserve_exact(needed)
            .map_err(|_| ConvertError::AllocationFailed)?;
        grown.extend_from_slice(&self.data[..self.size]);
        grown.resize(needed, 0);

        // wipe the old storage before it is released
        self.data.zeroize();
        self.data = grown;
        Ok(())
    }

    /// Reserve `n` writable bytes at the end of the buffer
    ///
    /// `size` advances by `n` and the zeroed region is returned for the
    /// caller to fill. On failure the buffer is left untouched.
    pub fn reserve(&mut self, n: usize) -> Result<&mut [u8]> {
        self.ensure_capacity(n)?;
        let start = self.size;
        self.size += n;
        Ok(&mut self.data[start..start + n])
    }

    pub fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    pub fn put_u8(&mut self, value: u8) -> Result<()> {
        self.reserve(1)?[0] = value;
        Ok(())
    }

    pub fn put_u32(&mut self, value: u32) -> Result<()> {
        self.reserve(U32_LEN)?.copy_from_slice(&encode_u32(value));
        Ok(())
    }

    /// Append a length-prefixed string
    pub fn put_string(&mut self, bytes: &[u8]) -> Result<()> {
        let length = u32::try_from(bytes.len())
            .map_err(|_| ConvertError::LengthOverMaximum(bytes.len()))?;
        // one reservation for prefix and payload, a failure writes nothing
        let record = self.reserve(bytes.len().saturating_add(U32_LEN))?;
        let (prefix, payload) = record.split_at_mut(U32_LEN);
        codec::put_u32(prefix, length).ok_or(ConvertError::OffsetTooLarge)?;
        payload.copy_from_slice(bytes);
        Ok(())
    }

    /// Decode standard base64 and append the result
    ///
    /// Decoding stops at the first NUL byte, if any. Empty input is a no-op.
    pub fn put_base64_decoded(&mut self, text: &[u8]) -> Result<()> {
        let text = match text.iter().position(|&b| b == 0) {
            Some(end) => &text[..end],
            None => text,
        };
        if text.is_empty() {
            return Ok(());
        }
        let decoded = Zeroizing::new(STANDARD.decode(text)?);
        self.put(&decoded)
    }

    /// Move the read cursor forward by `n` bytes
    pub fn advance(&mut self, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(ConvertError::OffsetTooLarge);
        }
        self.offset += n;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let value = peek_u8(self.unread()).ok_or(ConvertError::OffsetTooLarge)?;
        self.offset += 1;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let value = peek_u32(self.unread()).ok_or(ConvertError::OffsetTooLarge)?;
        self.offset += U32_LEN;
        Ok(value)
    }

    /// View the next length-prefixed string without consuming it
    ///
    /// The returned slice borrows the buffer, so nothing can grow or
    /// reset the storage while it is alive.
    pub fn peek_length_prefixed_slice(&self) -> Result<&[u8]> {
        let unread = self.unread();
        let length = peek_u32(unread).ok_or(ConvertError::IncompleteMessage)? as usize;

        if length > ALLOCATION_MAXIMUM - U32_LEN {
            return Err(ConvertError::LengthOverMaximum(length));
        }
        if length > unread.len() - U32_LEN {
            return Err(ConvertError::IncompleteMessage);
        }
        Ok(&unread[U32_LEN..U32_LEN + length])
    }

    /// Consume the next length-prefixed string and copy it out
    ///
    /// The terminator policy is checked before the cursor moves, so a
    /// rejected string leaves the buffer where it was.
    pub fn read_length_prefixed_string(&mut self, terminator: Terminator) -> Result<SecureBytes> {
        let payload = self.peek_length_prefixed_slice()?;
        terminator.check(payload)?;
        let owned = SecureBytes::from(payload);
        self.advance(U32_LEN + owned.len())?;
        Ok(owned)
    }

    /// Consume a binary string
    pub fn read_string_raw(&mut self) -> Result<SecureBytes> {
        self.read_length_prefixed_string(Terminator::None)
    }

    /// Consume a text string that may only be NUL-terminated at its end
    ///
    /// A trailing NUL is dropped; the rest must be valid UTF-8.
    pub fn read_cstring(&mut self) -> Result<String> {
        let raw = self.read_length_prefixed_string(Terminator::LastOnly(0))?;
        let text = match raw.split_last() {
            Some((0, head)) => head,
            _ => &raw[..],
        };
        std::str::from_utf8(text)
            .map(str::to_owned)
            .map_err(|_| ConvertError::InvalidFormat)
    }

    /// Consume a length-prefixed string without copying it
    pub fn skip_string(&mut self) -> Result<()> {
        let length = self.peek_length_prefixed_slice()?.len();
        self.advance(U32_LEN + length)
    }

    /// Copy every unread byte into a fresh buffer with its own cursor
    pub fn copy_remaining(&self) -> Result<ByteBuffer> {
        ByteBuffer::from_slice(self.unread())
    }
}

impl Zeroize for ByteBuffer {
    fn zeroize(&mut self) {
        self.data.zeroize();
        self.size = 0;
        self.offset = 0;
    }
}

impl Drop for ByteBuffer {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("size", &self.size)
            .field("offset", &self.offset)
            .field("allocated", &self.data.len())
            .finish()
    }
}
