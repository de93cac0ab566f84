//! ASCII armor removal
//!
//! Base64 decoding needs contiguous input, so the payload lines between
//! the BEGIN and END markers are first concatenated with all line breaks
//! removed, then decoded in one go.

use tracing::{debug, trace};

use super::{MARK_BEGIN, MARK_END};
use crate::buffer::ByteBuffer;
use crate::error::{ConvertError, Result};

/// Collect the payload between the armor markers
///
/// The returned buffer holds the concatenated base64 text followed by a
/// terminating NUL. Fails with `InvalidFormat` when the input does not
/// start with the begin marker or ends before a line holding the end
/// marker.
pub fn strip_armor(raw: &[u8]) -> Result<ByteBuffer> {
    if raw.len() < MARK_BEGIN.len() + MARK_END.len() || !raw.starts_with(MARK_BEGIN) {
        return Err(ConvertError::InvalidFormat);
    }

    let mut encoded = ByteBuffer::new();
    let mut rest = &raw[MARK_BEGIN.len()..];

    while let Some((&byte, tail)) = rest.split_first() {
        if byte != b'\n' && byte != b'\r' {
            encoded.put_u8(byte)?;
        }
        rest = tail;

        // a newline may be followed by the end marker
        if byte == b'\n' && rest.starts_with(MARK_END) {
            encoded.put_u8(0)?;
            debug!(payload_len = encoded.size() - 1, "armor stripped");
            return Ok(encoded);
        }
    }

    debug!("end marker not found");
    Err(ConvertError::InvalidFormat)
}

/// Strip the armor and base64-decode the payload into a fresh buffer
pub fn decode_armored(raw: &[u8]) -> Result<ByteBuffer> {
    let encoded = strip_armor(raw)?;
    let mut decoded = ByteBuffer::new();
    decoded.put_base64_decoded(encoded.data())?;
    trace!(len = decoded.size(), "base64 payload decoded");
    Ok(decoded)
}
