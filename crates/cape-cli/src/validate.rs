//! # Validate Command
//!
//! Single-file and repository-wide validation, with text or JSON output.
//! Flags are stable; calling scripts depend on them:
//!
//! ```bash
//! cape --all
//! cape --file examples/ex1/graph.json --kind predicategraph
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cape_core::{ArtifactKind, ValidationResult};
use cape_schema::{BulkReport, FileReport, ValidationEngine, BULK_KINDS};
use clap::{Args, ValueEnum};

use crate::{resolve_path, EXIT_FAILURE, EXIT_SUCCESS};

/// Report rendering.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines with ✓/✗ markers.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Arguments for validation.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Validate all artifacts in the repository.
    #[arg(long, conflicts_with = "file")]
    pub all: bool,

    /// Path to a single file to validate.
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Kind of artifact (required with --file): predicategraph, policy_pack,
    /// cpl_policy, verifier_rubric.
    #[arg(long, value_name = "KIND")]
    pub kind: Option<ArtifactKind>,

    /// Schema version to validate against. Schemas are currently pinned to
    /// 1.0.0; other values are accepted and ignored with a warning.
    #[arg(long = "schema-version", visible_alias = "version", value_name = "SEMVER")]
    pub schema_version: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ValidateArgs {
    /// True when either `--all` or `--file` selects something to do.
    pub fn has_mode(&self) -> bool {
        self.all || self.file.is_some()
    }
}

/// Execute validation, writing the report to stdout.
pub fn run_validate(args: &ValidateArgs, repo_root: &Path) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, repo_root, &mut out)
}

/// Execute validation, writing the report to `out`.
pub fn run_validate_to(args: &ValidateArgs, repo_root: &Path, out: &mut impl Write) -> Result<u8> {
    if args.all {
        if let Some(kind) = args.kind {
            tracing::debug!(kind = %kind, "--kind is ignored with --all");
        }
        check_schema_version(args.schema_version.as_deref(), &BULK_KINDS);
        let engine = ValidationEngine::new(repo_root);
        let report = engine.validate_all();
        render_bulk(&report, args.format, out)?;
        return Ok(exit_code(report.summary.is_success()));
    }

    let Some(file) = &args.file else {
        eprintln!("Error: nothing to validate; pass --all or --file");
        return Ok(EXIT_FAILURE);
    };

    let Some(kind) = args.kind else {
        eprintln!("Error: --kind is required when using --file");
        return Ok(EXIT_FAILURE);
    };

    check_schema_version(args.schema_version.as_deref(), &[kind]);

    let path = resolve_path(file, repo_root);
    if !path.exists() {
        eprintln!("Error: File not found: {}", file.display());
        return Ok(EXIT_FAILURE);
    }

    let engine = ValidationEngine::new(repo_root);
    let result = engine.validate_file(&path, kind);
    render_single(file, &result, args.format, out)?;
    Ok(exit_code(result.is_ok()))
}

fn exit_code(success: bool) -> u8 {
    if success {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

/// Returns false when `requested` differs from the schema version pinned for
/// any of `kinds`. Resolution is unaffected either way.
fn check_schema_version(requested: Option<&str>, kinds: &[ArtifactKind]) -> bool {
    let Some(requested) = requested else {
        return true;
    };
    let mut matches = true;
    for kind in kinds {
        let pinned = kind.schema_version();
        if requested == pinned {
            tracing::debug!(kind = %kind, version = requested, "schema version matches pinned");
        } else {
            tracing::warn!(
                kind = %kind,
                requested,
                pinned,
                "schema version selection is not supported; validating against pinned schema"
            );
            matches = false;
        }
    }
    matches
}

/// Render a bulk report.
pub fn render_bulk(report: &BulkReport, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(report, out),
        OutputFormat::Text => {
            for group in &report.groups {
                writeln!(out, "\n[{}]", group.title)?;
                for file in &group.files {
                    if file.valid {
                        writeln!(out, "  ✓ {}", file.path.display())?;
                    } else {
                        writeln!(out, "  ✗ {}", file.path.display())?;
                        writeln!(out, "    {}", file.message)?;
                    }
                }
            }
            writeln!(out, "\n{}", report.summary)?;
            Ok(())
        }
    }
}

/// Render the outcome of a single-file validation.
pub fn render_single(
    file: &Path,
    result: &ValidationResult,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let report = FileReport::new(file.to_path_buf(), result);
    match format {
        OutputFormat::Json => write_json(&report, out),
        OutputFormat::Text => {
            let marker = if report.valid { '✓' } else { '✗' };
            writeln!(out, "{marker} {}: {}", file.display(), report.message)?;
            Ok(())
        }
    }
}

fn write_json<T: serde::Serialize>(value: &T, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("failed to serialize report")?;
    writeln!(out)?;
    Ok(())
}
