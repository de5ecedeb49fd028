//! # Artifact Validation
//!
//! The single-file validation primitive: load an artifact, resolve its
//! schema, compile the schema, and report the first structural violation.
//!
//! ## Failure Reduction
//!
//! Every way a validation can go wrong is reduced to exactly one
//! [`ValidationFailure`] variant, checked in this order:
//!
//! 1. The file cannot be read → `Unknown` (I/O or UTF-8 encoding).
//! 2. The file is not JSON → `InvalidJson`, with line and column.
//! 3. The schema is missing → `ResourceNotFound`; malformed → `InvalidJson`.
//! 4. The schema does not compile → `Schema`.
//! 5. The instance violates the schema → `SchemaViolation`, first error only.
//!
//! Kinds arrive as [`ArtifactKind`], so an unregistered name is rejected
//! where it is parsed (`Configuration`), before the engine runs.
//!
//! `format` keywords are annotations only. Strings are not checked against
//! `email`, `date-time` and similar formats.
//!
//! The engine holds no state between calls. Each result is a function of the
//! artifact and schema contents at call time.

use std::path::{Path, PathBuf};

use cape_core::{ArtifactKind, ValidationFailure, ValidationResult};
use jsonschema::Validator;
use serde_json::Value;

use crate::resolve::SchemaResolver;

/// Separator between segments of a violation location.
pub const LOCATION_SEPARATOR: &str = " -> ";

/// Location reported for a violation at the document root.
pub const ROOT_LOCATION: &str = "root";

/// Validates artifact files against the schemas of a repository.
#[derive(Debug, Clone)]
pub struct ValidationEngine {
    repo_root: PathBuf,
    resolver: SchemaResolver,
}

impl ValidationEngine {
    /// Engine for the repository at `repo_root`, using its `schemas/` directory.
    pub fn new(repo_root: impl AsRef<Path>) -> Self {
        let repo_root = repo_root.as_ref().to_path_buf();
        let resolver = SchemaResolver::new(&repo_root);
        Self {
            repo_root,
            resolver,
        }
    }

    /// Returns the repository root.
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    /// Returns the schema resolver.
    pub fn resolver(&self) -> &SchemaResolver {
        &self.resolver
    }

    /// Validate the artifact at `path` against the schema for `kind`.
    pub fn validate_file(&self, path: &Path, kind: ArtifactKind) -> ValidationResult {
        let result = load_instance(path).and_then(|instance| self.validate_instance(&instance, kind));
        log_outcome(path, kind, &result);
        result
    }

    /// Validate an already-parsed instance against the schema for `kind`.
    pub fn validate_instance(&self, instance: &Value, kind: ArtifactKind) -> ValidationResult {
        let schema = self.resolver.resolve(kind)?;
        let validator = self.build_validator(&schema)?;

        let first = validator.iter_errors(instance).next();
        match first {
            None => Ok(()),
            Some(error) => Err(ValidationFailure::SchemaViolation {
                location: format_location(&error.instance_path.to_string()),
                message: error.to_string(),
            }),
        }
    }

    /// Compile `schema` into a validator.
    ///
    /// The draft is taken from the schema's `$schema` keyword (Draft 2020-12
    /// when absent). External `$ref`s resolve against the schema directory.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailure::Schema` if the schema is not a valid
    /// JSON Schema or references a document that cannot be resolved locally.
    pub fn build_validator(&self, schema: &Value) -> Result<Validator, ValidationFailure> {
        let mut opts = jsonschema::options();
        opts.with_retriever(self.resolver.retriever());
        opts.build(schema)
            .map_err(|e| ValidationFailure::Schema(e.to_string()))
    }
}

fn load_instance(path: &Path) -> Result<Value, ValidationFailure> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ValidationFailure::Unknown(format!("cannot read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&content).map_err(|e| ValidationFailure::InvalidJson(e.to_string()))
}

fn log_outcome(path: &Path, kind: ArtifactKind, result: &ValidationResult) {
    match result {
        Ok(()) => tracing::debug!(path = %path.display(), kind = %kind, "artifact valid"),
        Err(failure) => tracing::debug!(
            path = %path.display(),
            kind = %kind,
            category = %failure.category(),
            "artifact invalid"
        ),
    }
}

/// Render a JSON Pointer into the instance as a readable location.
///
/// `/rules/0/effect` becomes `rules -> 0 -> effect`; the empty pointer
/// becomes `root`. `~1` and `~0` escapes are decoded.
pub fn format_location(pointer: &str) -> String {
    if pointer.is_empty() {
        return ROOT_LOCATION.to_string();
    }
    pointer
        .strip_prefix('/')
        .unwrap_or(pointer)
        .split('/')
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(LOCATION_SEPARATOR)
}
