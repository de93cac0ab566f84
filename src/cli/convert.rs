//! Convert an OpenSSH private key into TinySSH key files

use std::io;
use std::path::Path;

use colored::Colorize;
use tracing::info;

use super::inspect::print_summary;
use super::{confirm, prompt_path};
use crate::config::{default_dest, default_source, ConvertOptions};
use crate::error::{ConvertError, Result};
use crate::openssh::parse_openssh_key_v1_with;
use crate::storage::{export_to_tinyssh, load_file, PUBLIC_KEY_FILE, SECRET_KEY_FILE};

pub fn run(options: ConvertOptions) -> Result<()> {
    let source = match options.source {
        Some(path) => path,
        None => prompt_path("Enter the OpenSSH private key file", default_source().as_deref())?,
    };

    let filebuf = load_file(&source)?;
    let parsed = parse_openssh_key_v1_with(&filebuf, &options.parse)?;
    drop(filebuf);
    info!(source = %source.display(), key_type = ?parsed.key.key_type(), "key parsed");

    if options.inspect {
        return print_summary(&mut io::stdout(), &parsed, options.json);
    }

    let dest = match options.dest {
        Some(path) => path,
        None => prompt_path("Enter the TinySSH key directory", Some(default_dest().as_path()))?,
    };

    let overwrite = options.force || (keys_present(&dest) && confirm_overwrite(&dest)?);
    let files = export_to_tinyssh(&parsed.key, &dest, overwrite)?;

    println!("{} {}", "Secret key:".green().bold(), files.secret_key.display());
    println!("{} {}", "Public key:".green().bold(), files.public_key.display());
    Ok(())
}

fn keys_present(dest: &Path) -> bool {
    dest.join(SECRET_KEY_FILE).exists() || dest.join(PUBLIC_KEY_FILE).exists()
}

fn confirm_overwrite(dest: &Path) -> Result<bool> {
    println!(
        "{} TinySSH keys already exist in {}.",
        "Warning:".yellow().bold(),
        dest.display()
    );
    if confirm("Overwrite them?") {
        Ok(true)
    } else {
        Err(ConvertError::Cancelled)
    }
}
