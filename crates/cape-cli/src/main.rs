//! # cape CLI entry point
//!
//! Parses command-line arguments, initialises tracing, resolves the
//! repository root, and dispatches to the validate handler. Clap errors
//! and CLI misuse exit with code 1 so calling scripts see one failure code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cape_cli::validate::{run_validate, ValidateArgs};
use cape_cli::{find_repo_root, EXIT_FAILURE, EXIT_SUCCESS};

/// Validate CAPE artifacts against their JSON schemas.
///
/// Use --all to validate every predicate graph, policy pack, and verifier
/// rubric in the repository, or --file with --kind to validate one file.
#[derive(Parser, Debug)]
#[command(name = "cape")]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Repository root. Defaults to the nearest ancestor directory
    /// containing `schemas/`.
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(flatten)]
    validate: ValidateArgs,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.print().is_err() {
                return ExitCode::from(EXIT_FAILURE);
            }
            return ExitCode::from(parse_error_exit_code(&e));
        }
    };

    init_tracing(cli.verbose);

    if !cli.validate.has_mode() {
        if let Err(e) = Cli::command().print_help() {
            tracing::warn!(error = %e, "failed to print help");
        }
        return ExitCode::from(EXIT_FAILURE);
    }

    let repo_root = cli.root.clone().unwrap_or_else(|| {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        find_repo_root(&cwd).unwrap_or_else(|| {
            tracing::warn!("Could not locate repository root; using current directory");
            cwd
        })
    });

    tracing::debug!(repo_root = %repo_root.display(), "resolved repository root");

    match run_validate(&cli.validate, &repo_root) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

/// `--help` exits 0; every other parse error is a usage failure.
fn parse_error_exit_code(err: &clap::Error) -> u8 {
    if err.use_stderr() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}

/// Install the tracing subscriber. Logs go to stderr; stdout is the report.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use cape_cli::validate::OutputFormat;
    use cape_core::ArtifactKind;

    #[test]
    fn cli_parse_all() {
        let cli = Cli::try_parse_from(["cape", "--all"]).unwrap();
        assert!(cli.validate.all);
        assert!(cli.validate.file.is_none());
        assert_eq!(cli.validate.format, OutputFormat::Text);
    }

    #[test]
    fn cli_parse_file_with_kind() {
        let cli = Cli::try_parse_from([
            "cape",
            "--file",
            "packs/sample.json",
            "--kind",
            "policy_pack",
        ])
        .unwrap();
        assert_eq!(cli.validate.file, Some(PathBuf::from("packs/sample.json")));
        assert_eq!(cli.validate.kind, Some(ArtifactKind::PolicyPack));
    }

    #[test]
    fn cli_parse_every_registered_kind() {
        for kind in ArtifactKind::all() {
            let cli = Cli::try_parse_from(["cape", "--file", "x.json", "--kind", kind.as_str()])
                .unwrap();
            assert_eq!(cli.validate.kind, Some(*kind));
        }
    }

    #[test]
    fn cli_rejects_unknown_kind_with_valid_list() {
        let err = Cli::try_parse_from(["cape", "--file", "x.json", "--kind", "graph"]).unwrap_err();
        let rendered = err.to_string();
        assert!(
            rendered.contains("predicategraph, policy_pack, cpl_policy, verifier_rubric"),
            "{rendered}"
        );
        assert!(err.use_stderr());
    }

    #[test]
    fn cli_rejects_all_with_file() {
        assert!(Cli::try_parse_from(["cape", "--all", "--file", "x.json"]).is_err());
    }

    #[test]
    fn cli_parse_no_arguments_has_no_mode() {
        let cli = Cli::try_parse_from(["cape"]).unwrap();
        assert!(!cli.validate.has_mode());
    }

    #[test]
    fn cli_parse_schema_version_and_alias() {
        let cli = Cli::try_parse_from(["cape", "--all", "--schema-version", "1.0.0"]).unwrap();
        assert_eq!(cli.validate.schema_version.as_deref(), Some("1.0.0"));

        let cli = Cli::try_parse_from(["cape", "--all", "--version", "2.0.0"]).unwrap();
        assert_eq!(cli.validate.schema_version.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn cli_parse_verbosity_root_and_format() {
        let cli =
            Cli::try_parse_from(["cape", "-vv", "--root", "/repo", "--all", "--format", "json"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.root, Some(PathBuf::from("/repo")));
        assert_eq!(cli.validate.format, OutputFormat::Json);
    }

    #[test]
    fn parse_errors_map_to_exit_codes() {
        let help = Cli::try_parse_from(["cape", "--help"]).unwrap_err();
        assert_eq!(parse_error_exit_code(&help), EXIT_SUCCESS);

        let conflict = Cli::try_parse_from(["cape", "--all", "--file", "x.json"]).unwrap_err();
        assert_eq!(parse_error_exit_code(&conflict), EXIT_FAILURE);

        let unknown = Cli::try_parse_from(["cape", "--bogus"]).unwrap_err();
        assert_eq!(parse_error_exit_code(&unknown), EXIT_FAILURE);
    }

    #[test]
    fn cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
