//! Hexdump rendering for trace logging

use std::fmt::Write;

const ROW: usize = 16;
const BLOCK: usize = 256;

/// Render `bytes` as an offset-prefixed hexdump, sixteen bytes per row
/// with an extra gap after the eighth and a blank line every 256 bytes.
pub fn hexdump(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3 + bytes.len() / ROW * 12 + 16);
    for (row_index, row) in bytes.chunks(ROW).enumerate() {
        let address = row_index * ROW;
        if address != 0 && address % BLOCK == 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:08x} ", address);
        for (i, byte) in row.iter().enumerate() {
            if i == ROW / 2 {
                out.push(' ');
            }
            let _ = write!(out, " {:02x}", byte);
        }
        out.push('\n');
    }
    out
}
