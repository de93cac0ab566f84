//! Command implementations and interactive prompts

pub mod convert;
pub mod inspect;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Ask for a path on stdin, offering `default` in brackets
pub fn prompt_path(message: &str, default: Option<&Path>) -> Result<PathBuf> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    prompt_path_with(&mut stdin.lock(), &mut stdout, message, default)
}

/// Prompt on `output` and read one line from `input`
///
/// An empty answer selects the default; end of input, or an empty answer
/// without a default, cancels.
pub fn prompt_path_with<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
    default: Option<&Path>,
) -> Result<PathBuf> {
    match default {
        Some(path) => write!(output, "{} [{}]: ", message, path.display())?,
        None => write!(output, "{}: ", message)?,
    }
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(ConvertError::Cancelled);
    }

    match (line.trim(), default) {
        ("", Some(path)) => Ok(path.to_path_buf()),
        ("", None) => Err(ConvertError::Cancelled),
        (answer, _) => Ok(PathBuf::from(answer)),
    }
}

/// Ask a yes/no question on stdin
pub fn confirm(prompt: &str) -> bool {
    let stdin = io::stdin();
    confirm_with(&mut stdin.lock(), &mut io::stdout(), prompt)
}

pub fn confirm_with<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> bool {
    if write!(output, "{} [y/N] ", prompt).and_then(|_| output.flush()).is_err() {
        return false;
    }

    let mut answer = String::new();
    if input.read_line(&mut answer).is_err() {
        return false;
    }

    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
