//! Key summary output

use std::io::Write;

use colored::Colorize;

use crate::error::Result;
use crate::openssh::ParsedKey;

/// Print the non-secret details of `parsed`, as text or JSON
pub fn print_summary<W: Write>(out: &mut W, parsed: &ParsedKey, json: bool) -> Result<()> {
    let summary = parsed.key.summary(&parsed.comment);

    if json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "{}", "Key summary".cyan().bold())?;
    writeln!(out, "  type:       {} ({})", summary.type_name, summary.short_name)?;
    writeln!(out, "  comment:    {}", summary.comment)?;
    writeln!(out, "  public key: {}", summary.public_key_hex)?;
    writeln!(out)?;
    writeln!(out, "{}", summary.public_key_openssh)?;
    Ok(())
}
