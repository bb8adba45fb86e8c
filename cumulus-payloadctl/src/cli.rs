//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cumulus_payloads::PayloadKind;

/// Decode, check and normalize Cumulus control-plane payloads.
#[derive(Parser, Debug, Clone)]
#[command(name = "cumulus-payloadctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Payload kind (start, restart, node_connected, delete_failure).
    /// Detected from the top-level keys when omitted.
    #[arg(short, long, env = "CUMULUS_PAYLOAD_KIND")]
    pub kind: Option<PayloadKind>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Decode a payload and report its kind.
    Check(InputArgs),

    /// Decode a payload and print its canonical encoding.
    Normalize(InputArgs),

    /// Decode a payload and print it as JSON.
    Show(InputArgs),
}

impl Commands {
    pub fn input(&self) -> &InputArgs {
        match self {
            Commands::Check(args) | Commands::Normalize(args) | Commands::Show(args) => args,
        }
    }
}

/// Where to read the payload from.
#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// Payload file; `-` or nothing reads stdin.
    pub path: Option<PathBuf>,
}

impl InputArgs {
    pub fn is_stdin(&self) -> bool {
        self.path
            .as_deref()
            .map_or(true, |path| path.as_os_str() == "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_check_with_kind() {
        let cli = Cli::try_parse_from(["cumulus-payloadctl", "--kind", "start", "check", "start.yaml"])
            .unwrap();
        assert_eq!(cli.kind, Some(PayloadKind::Start));
        assert!(matches!(cli.command, Commands::Check(_)));
        assert_eq!(cli.command.input().path, Some(PathBuf::from("start.yaml")));
        assert!(!cli.command.input().is_stdin());
    }

    #[test]
    fn test_parse_defaults_to_stdin() {
        let cli = Cli::try_parse_from(["cumulus-payloadctl", "normalize"]).unwrap();
        assert!(matches!(cli.command, Commands::Normalize(_)));
        assert!(cli.command.input().is_stdin());

        let cli = Cli::try_parse_from(["cumulus-payloadctl", "show", "-"]).unwrap();
        assert!(cli.command.input().is_stdin());
    }

    #[test]
    fn test_parse_rejects_unknown_kind() {
        let result = Cli::try_parse_from(["cumulus-payloadctl", "-k", "stop", "check"]);
        assert!(result.is_err());
    }
}
