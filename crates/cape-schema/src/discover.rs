//! # Discovery & Bulk Validation
//!
//! Walks the fixed directory layout of a repository, validates every
//! artifact found, and aggregates the outcomes into a [`BulkReport`].
//!
//! | Kind | Location | Excluded |
//! |------|----------|----------|
//! | `predicategraph` | `examples/*/*.json` | `*.expectations.json` |
//! | `policy_pack` | `packs/*.json` | — |
//! | `verifier_rubric` | `rubrics/*.json` | — |
//!
//! Groups are always processed in the order above and files within a group
//! in lexicographic path order, so two runs over the same tree produce the
//! same report. A failing file never stops the run.

use std::path::{Path, PathBuf};

use cape_core::{result_message, ArtifactKind, ErrorCategory, ValidationResult};
use serde::Serialize;

use crate::validate::ValidationEngine;

/// File name suffix marking expectation fixtures next to predicate graphs.
pub const EXPECTATIONS_SUFFIX: &str = ".expectations.json";

/// Kinds discovered in bulk mode, in report order.
pub const BULK_KINDS: [ArtifactKind; 3] = [
    ArtifactKind::PredicateGraph,
    ArtifactKind::PolicyPack,
    ArtifactKind::VerifierRubric,
];

/// List the artifact files of `kind` under `repo_root`, sorted.
///
/// Missing directories yield no files. `cpl_policy` has no directory
/// convention and is never discovered.
pub fn discover(repo_root: &Path, kind: ArtifactKind) -> Vec<PathBuf> {
    let mut files = match kind {
        ArtifactKind::PredicateGraph => subdirectories(&repo_root.join("examples"))
            .iter()
            .flat_map(|dir| json_files(dir))
            .filter(|path| !has_expectations_suffix(path))
            .collect(),
        ArtifactKind::PolicyPack => json_files(&repo_root.join("packs")),
        ArtifactKind::VerifierRubric => json_files(&repo_root.join("rubrics")),
        ArtifactKind::CplPolicy => Vec::new(),
    };
    files.sort();
    files
}

fn has_expectations_suffix(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(EXPECTATIONS_SUFFIX))
}

fn json_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = read_entries(dir)
        .into_iter()
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(".json"))
        })
        .collect();
    files.sort();
    files
}

fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = read_entries(dir)
        .into_iter()
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn read_entries(dir: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries.flatten().map(|entry| entry.path()).collect(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot list directory; skipping");
            Vec::new()
        }
    }
}

/// Pass/fail counters for one bulk run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Count one validation outcome.
    pub fn record(&mut self, result: &ValidationResult) {
        if result.is_ok() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed
    }

    /// True when no file failed.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Summary: {} passed, {} failed", self.passed, self.failed)
    }
}

/// Outcome for a single discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Path relative to the repository root.
    pub path: PathBuf,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
    /// `Valid`, or the failure message.
    pub message: String,
}

impl FileReport {
    pub fn new(path: PathBuf, result: &ValidationResult) -> Self {
        Self {
            path,
            valid: result.is_ok(),
            category: result.as_ref().err().map(|f| f.category()),
            message: result_message(result),
        }
    }
}

/// All files discovered for one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub kind: ArtifactKind,
    pub title: &'static str,
    pub files: Vec<FileReport>,
}

/// Result of validating every discoverable artifact in a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkReport {
    pub groups: Vec<GroupReport>,
    pub summary: RunSummary,
}

impl ValidationEngine {
    /// Discover and validate every artifact in the repository.
    ///
    /// Never stops early: each file contributes exactly one pass or fail to
    /// the summary, so `passed + failed` equals the number of files found.
    pub fn validate_all(&self) -> BulkReport {
        let root = self.repo_root();
        let mut summary = RunSummary::default();
        let mut groups = Vec::with_capacity(BULK_KINDS.len());

        for kind in BULK_KINDS {
            let paths = discover(root, kind);
            tracing::info!(kind = %kind, count = paths.len(), "discovered artifacts");

            let files = paths
                .into_iter()
                .map(|path| {
                    let result = self.validate_file(&path, kind);
                    summary.record(&result);
                    let rel = match path.strip_prefix(root) {
                        Ok(rel) => rel.to_path_buf(),
                        Err(_) => path.clone(),
                    };
                    FileReport::new(rel, &result)
                })
                .collect();

            groups.push(GroupReport {
                kind,
                title: kind.group_title(),
                files,
            });
        }

        tracing::info!(passed = summary.passed, failed = summary.failed, "bulk validation finished");
        BulkReport { groups, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GRAPH_SCHEMA: &str = r#"{
        "type": "object",
        "required": ["nodes"],
        "properties": { "nodes": { "type": "array" } }
    }"#;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn repo_with_schemas() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for kind in ArtifactKind::all() {
            write(
                dir.path(),
                &format!("schemas/{}", kind.schema_file()),
                GRAPH_SCHEMA,
            );
        }
        dir
    }

    fn rel_paths(report: &GroupReport) -> Vec<String> {
        report
            .files
            .iter()
            .map(|f| f.path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_three_valid_one_invalid_graph() {
        let dir = repo_with_schemas();
        let root = dir.path();
        write(root, "examples/a/graph.json", r#"{"nodes": []}"#);
        write(root, "examples/b/graph.json", r#"{"nodes": []}"#);
        write(root, "examples/c/graph.json", r#"{"nodes": []}"#);
        write(root, "examples/d/graph.json", r#"{"edges": []}"#);

        let report = ValidationEngine::new(root).validate_all();
        assert_eq!(report.summary, RunSummary { passed: 3, failed: 1 });
        assert_eq!(report.summary.to_string(), "Summary: 3 passed, 1 failed");
        assert!(!report.summary.is_success());

        let failed = &report.groups[0].files[3];
        assert_eq!(failed.category, Some(ErrorCategory::SchemaViolation));
        assert!(failed.message.starts_with("Validation error at root: "));
    }

    #[test]
    fn test_expectation_files_are_excluded() {
        let dir = repo_with_schemas();
        let root = dir.path();
        write(root, "examples/ex1/graph.json", r#"{"nodes": []}"#);
        write(root, "examples/ex1/graph.expectations.json", "not even json");

        let files = discover(root, ArtifactKind::PredicateGraph);
        assert_eq!(files, vec![root.join("examples/ex1/graph.json")]);
    }

    #[test]
    fn test_graphs_only_one_level_deep() {
        let dir = repo_with_schemas();
        let root = dir.path();
        write(root, "examples/top.json", r#"{"nodes": []}"#);
        write(root, "examples/ex1/graph.json", r#"{"nodes": []}"#);
        write(root, "examples/ex1/nested/deep.json", r#"{"nodes": []}"#);
        write(root, "examples/ex1/notes.txt", "hello");

        let files = discover(root, ArtifactKind::PredicateGraph);
        assert_eq!(files, vec![root.join("examples/ex1/graph.json")]);
    }

    #[test]
    fn test_discovery_order_is_lexicographic() {
        let dir = repo_with_schemas();
        let root = dir.path();
        for name in ["zeta", "alpha", "mid"] {
            write(root, &format!("packs/{name}.json"), "{}");
        }
        write(root, "examples/b/2.json", "{}");
        write(root, "examples/b/1.json", "{}");
        write(root, "examples/a/9.json", "{}");

        let report = ValidationEngine::new(root).validate_all();
        assert_eq!(
            rel_paths(&report.groups[0]),
            vec!["examples/a/9.json", "examples/b/1.json", "examples/b/2.json"]
        );
        assert_eq!(
            rel_paths(&report.groups[1]),
            vec!["packs/alpha.json", "packs/mid.json", "packs/zeta.json"]
        );
    }

    #[test]
    fn test_group_order_is_fixed() {
        let dir = repo_with_schemas();
        let report = ValidationEngine::new(dir.path()).validate_all();

        let kinds: Vec<ArtifactKind> = report.groups.iter().map(|g| g.kind).collect();
        assert_eq!(kinds, BULK_KINDS.to_vec());
        let titles: Vec<&str> = report.groups.iter().map(|g| g.title).collect();
        assert_eq!(titles, vec!["PredicateGraphs", "Policy Packs", "Verifier Rubrics"]);
    }

    #[test]
    fn test_missing_directories_yield_empty_groups() {
        let dir = tempfile::tempdir().unwrap();
        let report = ValidationEngine::new(dir.path()).validate_all();
        assert!(report.groups.iter().all(|g| g.files.is_empty()));
        assert_eq!(report.summary, RunSummary::default());
        assert!(report.summary.is_success());
    }

    #[test]
    fn test_failures_never_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        // No schemas at all, plus one malformed file.
        write(root, "examples/x/graph.json", "{");
        write(root, "packs/p.json", "{}");
        write(root, "rubrics/r.json", "{}");

        let report = ValidationEngine::new(root).validate_all();
        let categories: Vec<Option<ErrorCategory>> = report
            .groups
            .iter()
            .flat_map(|g| g.files.iter().map(|f| f.category))
            .collect();
        assert_eq!(
            categories,
            vec![
                Some(ErrorCategory::InvalidJson),
                Some(ErrorCategory::ResourceNotFoundError),
                Some(ErrorCategory::ResourceNotFoundError),
            ]
        );
        assert_eq!(report.summary, RunSummary { passed: 0, failed: 3 });
    }

    #[test]
    fn test_counts_match_discovered_files() {
        let dir = repo_with_schemas();
        let root = dir.path();
        write(root, "examples/a/g.json", r#"{"nodes": []}"#);
        write(root, "examples/a/h.json", "[]");
        write(root, "packs/p.json", r#"{"nodes": 1}"#);
        write(root, "rubrics/r1.json", r#"{"nodes": []}"#);
        write(root, "rubrics/r2.json", r#"{"nodes": []}"#);

        let report = ValidationEngine::new(root).validate_all();
        let discovered: usize = BULK_KINDS.iter().map(|k| discover(root, *k).len()).sum();
        let reported: usize = report.groups.iter().map(|g| g.files.len()).sum();
        assert_eq!(discovered, 5);
        assert_eq!(reported, discovered);
        assert_eq!(report.summary.total(), discovered);
        assert_eq!(report.summary, RunSummary { passed: 3, failed: 2 });
    }

    #[test]
    fn test_cpl_policies_are_not_discovered() {
        let dir = repo_with_schemas();
        write(dir.path(), "policies/p.json", "{}");
        assert!(discover(dir.path(), ArtifactKind::CplPolicy).is_empty());
    }

    #[test]
    fn test_file_report_serializes_category_only_on_failure() {
        let ok = FileReport::new(PathBuf::from("packs/a.json"), &Ok(()));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["valid"], true);
        assert_eq!(json["message"], "Valid");
        assert!(json.get("category").is_none());

        let err = FileReport::new(
            PathBuf::from("packs/b.json"),
            &Err(cape_core::ValidationFailure::InvalidJson("EOF".into())),
        );
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["category"], "InvalidJSON");
        assert_eq!(json["message"], "Invalid JSON: EOF");
    }
}
