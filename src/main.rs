use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use tinyssh_convert::cli;
use tinyssh_convert::config::ConvertOptions;
use tinyssh_convert::openssh::{PaddingCheck, ParseOptions};

#[derive(Parser)]
#[command(name = "tinyssh-convert")]
#[command(version)]
#[command(about = "Convert an OpenSSH ed25519 private key file into TinySSH key files", long_about = None)]
struct Cli {
    /// OpenSSH private key file (prompted for when omitted)
    #[arg(short = 'f', long = "file", value_name = "KEYFILE")]
    file: Option<PathBuf>,

    /// Destination TinySSH key directory (prompted for when omitted)
    #[arg(short = 'd', long = "dest", value_name = "DIR")]
    dest: Option<PathBuf>,

    /// How to treat malformed padding in the private key section
    #[arg(long, value_enum, default_value_t = PaddingCheck::Warn)]
    padding: PaddingCheck,

    /// Check the public key against the private key before converting
    #[arg(long)]
    verify_public: bool,

    /// Print a summary of the key instead of converting it
    #[arg(long)]
    inspect: bool,

    /// Print the summary as JSON
    #[arg(long, requires = "inspect")]
    json: bool,

    /// Overwrite existing TinySSH keys without asking
    #[arg(long)]
    force: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> ConvertOptions {
        ConvertOptions {
            source: self.file.clone(),
            dest: self.dest.clone(),
            parse: ParseOptions {
                padding: self.padding,
                verify_public_key: self.verify_public,
            },
            inspect: self.inspect,
            json: self.json,
            force: self.force,
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG overrides the verbosity flags
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli::convert::run(cli.options()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_map_to_options() {
        let cli = Cli::parse_from([
            "tinyssh-convert",
            "-f",
            "/tmp/id_ed25519",
            "-d",
            "/tmp/keys",
            "--padding",
            "strict",
            "--verify-public",
            "-vv",
        ]);
        let options = cli.options();
        assert_eq!(options.source, Some(PathBuf::from("/tmp/id_ed25519")));
        assert_eq!(options.dest, Some(PathBuf::from("/tmp/keys")));
        assert_eq!(options.parse.padding, PaddingCheck::Strict);
        assert!(options.parse.verify_public_key);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_public_key_check_is_opt_in() {
        let options = Cli::parse_from(["tinyssh-convert"]).options();
        assert!(!options.parse.verify_public_key);
    }

    #[test]
    fn test_json_requires_inspect() {
        assert!(Cli::try_parse_from(["tinyssh-convert", "--json"]).is_err());
        assert!(Cli::try_parse_from(["tinyssh-convert", "--inspect", "--json"]).is_ok());
    }
}
