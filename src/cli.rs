//! CLI module containing the main entry point logic.

use crate::config::{BootstrapConfig, Overrides};
use crate::report::Report;
use crate::{bootstrap, logging};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser as ClapParser};
use std::path::PathBuf;

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit status for a malformed invocation.
pub const USAGE_EXIT: i32 = 1;

/// CLI arguments for the bootstrap tool.
#[derive(ClapParser, Debug)]
#[command(name = "bootstrap")]
#[command(version = PKG_VERSION)]
#[command(
    about = "Create a virtualenv pinned to an Ansible version and write .env/.env.leave",
    long_about = None
)]
struct Cli {
    /// Ansible version to install, passed verbatim to pip
    #[arg(id = "tool_version", value_name = "VERSION")]
    tool_version: String,

    /// Directory receiving the environment and the activation snippets
    #[arg(long = "working-dir", value_name = "PATH")]
    working_dir: Option<PathBuf>,

    /// Python interpreter used to create the environment [env: BOOTSTRAP_PYTHON]
    #[arg(long, value_name = "PYTHON")]
    python: Option<PathBuf>,

    /// Companion package installed alongside Ansible [env: BOOTSTRAP_COMPANION]
    #[arg(long, value_name = "PACKAGE")]
    companion: Option<String>,

    /// Print the commands and file contents without running anything
    #[arg(long)]
    dry_run: bool,

    /// Output format (stream, json)
    #[arg(long, value_name = "FORMAT", default_value = "stream")]
    output_format: OutputFormatArg,

    /// Log progress to stderr (overridden by BOOTSTRAP_LOG)
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormatArg {
    /// Stream installer output, then print the tool path and version (default)
    Stream,
    /// Print a single JSON report on stdout; tool output goes to stderr
    Json,
}

impl OutputFormatArg {
    /// Format a finished run according to this format
    /// Returns None for Stream mode (everything was already printed)
    #[must_use]
    pub fn format_report(self, report: &Report) -> Option<String> {
        match self {
            Self::Stream => None,
            Self::Json => Some(report.to_json()),
        }
    }
}

/// Usage line printed for a malformed invocation.
#[must_use]
pub fn usage() -> String {
    Cli::command().render_usage().to_string()
}

fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(args)
}

/// Whether a parse error means the positional count was wrong.
fn is_usage_error(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::MissingRequiredArgument
            | ErrorKind::UnknownArgument
            | ErrorKind::TooManyValues
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
    )
}

/// Main CLI logic.
pub fn run_cli() {
    let cli = match parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) if is_usage_error(e.kind()) => {
            println!("{}", usage());
            std::process::exit(USAGE_EXIT);
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(USAGE_EXIT);
        }
    };

    logging::init_tracing(cli.verbose);

    let overrides = Overrides {
        working_dir: cli.working_dir,
        python: cli.python,
        companion: cli.companion,
    };
    let config = BootstrapConfig::from_env(&cli.tool_version, overrides)
        .unwrap_or_else(|e| crate::fatal_error(&format!("Error: {e}")));

    if cli.dry_run {
        print!("{}", bootstrap::describe(&config));
        return;
    }

    match bootstrap::bootstrap(&config, cli.output_format) {
        Ok(report) => {
            if let Some(formatted) = cli.output_format.format_report(&report) {
                println!("{formatted}");
            }
            std::process::exit(report.exit_code);
        }
        Err(e) => crate::fatal_error(&format!("Error: {e}")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag_and_positional_coexist() {
        let err = parse_args(["bootstrap", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
        let cli = parse_args(["bootstrap", "--dry-run", "9.5.1"]).unwrap();
        assert_eq!(cli.tool_version, "9.5.1");
        assert!(cli.dry_run);
    }

    #[test]
    fn test_single_version_parses() {
        let cli = parse_args(["bootstrap", "9.5.1"]).unwrap();
        assert_eq!(cli.tool_version, "9.5.1");
        assert_eq!(cli.output_format, OutputFormatArg::Stream);
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_missing_version_is_usage_error() {
        let err = parse_args(["bootstrap"]).unwrap_err();
        assert!(is_usage_error(err.kind()));
    }

    #[test]
    fn test_extra_positional_is_usage_error() {
        let err = parse_args(["bootstrap", "9.5.1", "10.0.0"]).unwrap_err();
        assert!(is_usage_error(err.kind()));
    }

    #[test]
    fn test_flags_do_not_count_as_positionals() {
        let cli = parse_args([
            "bootstrap",
            "--companion",
            "ruff",
            "--python",
            "/usr/bin/python3.12",
            "2.10.7",
        ])
        .unwrap();
        assert_eq!(cli.tool_version, "2.10.7");
        assert_eq!(cli.companion.as_deref(), Some("ruff"));
        assert_eq!(cli.python, Some(PathBuf::from("/usr/bin/python3.12")));
    }

    #[test]
    fn test_help_is_not_usage_error() {
        let err = parse_args(["bootstrap", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert!(!is_usage_error(err.kind()));
    }

    #[test]
    fn test_usage_mentions_version() {
        let text = usage();
        assert!(text.contains("Usage:"));
        assert!(text.contains("<VERSION>"));
    }

    #[test]
    fn test_format_report_stream_returns_none() {
        let report = Report {
            version: "9.5.1".to_string(),
            env_dir: PathBuf::from("/work/ansible-9.5.1"),
            activate_file: PathBuf::from("/work/.env"),
            leave_file: PathBuf::from("/work/.env.leave"),
            steps: vec![],
            tool_path: None,
            tool_version: None,
            exit_code: 0,
        };
        assert!(OutputFormatArg::Stream.format_report(&report).is_none());
        let json = OutputFormatArg::Json.format_report(&report).unwrap();
        assert!(json.contains("\"version\": \"9.5.1\""));
    }
}
