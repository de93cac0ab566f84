//! Big-endian integer encoding over raw byte ranges
//!
//! Wire integers in the key container are unsigned and MSB first.
//! These helpers carry no state; bounds are the caller's business and
//! are expressed through the fixed-size array types.

/// Width of an encoded `u32`
pub const U32_LEN: usize = 4;

/// Encode a 32-bit value, most significant byte first
pub fn encode_u32(value: u32) -> [u8; U32_LEN] {
    value.to_be_bytes()
}

/// Write a 32-bit value into the first four bytes of `dst`
///
/// Returns `None` when `dst` is too short.
pub fn put_u32(dst: &mut [u8], value: u32) -> Option<()> {
    let head = dst.get_mut(..U32_LEN)?;
    head.copy_from_slice(&encode_u32(value));
    Some(())
}

/// Decode a 32-bit big-endian value
pub fn decode_u32(src: [u8; U32_LEN]) -> u32 {
    u32::from_be_bytes(src)
}

/// Decode the 32-bit value stored at the start of `src`, if there is one
pub fn peek_u32(src: &[u8]) -> Option<u32> {
    let head: [u8; U32_LEN] = src.get(..U32_LEN)?.try_into().ok()?;
    Some(decode_u32(head))
}

/// Decode the byte stored at the start of `src`, if there is one
pub fn peek_u8(src: &[u8]) -> Option<u8> {
    src.first().copied()
}
