//! # cape-cli — CLI Tool for CAPE Artifacts
//!
//! Provides the `cape` command-line interface over the `cape-schema`
//! validation engine.
//!
//! ```bash
//! cape --all
//! cape --file packs/baseline.json --kind policy_pack
//! cape --all --format json
//! ```
//!
//! ## Exit Codes
//!
//! Calling scripts rely on these: `0` when every validated file passed,
//! `1` when any file failed or the command line was misused.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the validation logic.
//! - Handlers delegate to `cape-schema`; this crate only resolves paths,
//!   renders reports, and maps outcomes to exit codes.

pub mod validate;

use std::path::{Path, PathBuf};

/// Exit code when everything validated.
pub const EXIT_SUCCESS: u8 = 0;

/// Exit code for any validation failure or usage error.
pub const EXIT_FAILURE: u8 = 1;

/// Walk up from `start` to the first directory containing `schemas/`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if dir.join(cape_schema::SCHEMA_DIR).is_dir() {
            return Some(dir.to_path_buf());
        }
        dir = dir.parent()?;
    }
}

/// Resolve a path that may be relative to the repository root.
///
/// If the path is absolute, returns it as-is. If relative and the file
/// exists relative to `repo_root`, uses that. Otherwise returns the path
/// relative to the current directory.
pub fn resolve_path(path: &Path, repo_root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let repo_relative = repo_root.join(path);
    if repo_relative.exists() {
        repo_relative
    } else {
        path.to_path_buf()
    }
}
