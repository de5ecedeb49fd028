//! # Error Types — Validation Failure Taxonomy
//!
//! Defines the flat set of failure categories a single artifact validation
//! can end in. All errors use `thiserror` for derive-based `Display` and
//! `Error` implementations.
//!
//! ## Design
//!
//! - Every failure is terminal for the file under test, never for a bulk run.
//! - Each [`ValidationFailure`] variant maps to exactly one [`ErrorCategory`];
//!   `Unknown` is the final fallback arm so the mapping stays exhaustive.
//! - Messages are one line and human-readable; schema violations carry the
//!   instance location and the validator's constraint description.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::kind::ArtifactKind;

/// Message reported for an artifact that passed validation.
pub const VALID: &str = "Valid";

/// Outcome of validating one artifact file.
pub type ValidationResult = Result<(), ValidationFailure>;

/// Tag identifying which kind of failure a validation ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// The artifact (or a schema) is not well-formed JSON.
    #[serde(rename = "InvalidJSON")]
    InvalidJson,
    /// The kind identifier is not registered.
    ConfigurationError,
    /// The schema file is absent at its expected path.
    ResourceNotFoundError,
    /// The instance fails structural checks.
    SchemaViolation,
    /// The schema document itself is not a valid JSON Schema.
    SchemaError,
    /// Anything else: I/O or encoding failures.
    UnknownError,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidJson => "InvalidJSON",
            Self::ConfigurationError => "ConfigurationError",
            Self::ResourceNotFoundError => "ResourceNotFoundError",
            Self::SchemaViolation => "SchemaViolation",
            Self::SchemaError => "SchemaError",
            Self::UnknownError => "UnknownError",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A kind identifier outside the registered table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown kind: {kind}. Valid: [{}]", ArtifactKind::valid_identifiers().join(", "))]
pub struct UnknownKind {
    kind: String,
}

impl UnknownKind {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    /// The rejected identifier.
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

/// Why a single artifact failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    /// JSON parse failure, with the parser's position and description.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// The requested kind is not registered.
    #[error(transparent)]
    Configuration(#[from] UnknownKind),

    /// No schema file at the expected location.
    #[error("Schema not found: {}", path.display())]
    ResourceNotFound {
        /// Where the schema was expected.
        path: PathBuf,
    },

    /// The first structural violation found in the instance.
    #[error("Validation error at {location}: {message}")]
    SchemaViolation {
        /// ` -> `-joined property names and array indices, or `root`.
        location: String,
        /// The validator's description of the violated constraint.
        message: String,
    },

    /// The schema could not be compiled.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Catch-all for I/O, encoding, and other unexpected conditions.
    #[error("Error: {0}")]
    Unknown(String),
}

impl ValidationFailure {
    /// The category this failure belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidJson(_) => ErrorCategory::InvalidJson,
            Self::Configuration(_) => ErrorCategory::ConfigurationError,
            Self::ResourceNotFound { .. } => ErrorCategory::ResourceNotFoundError,
            Self::SchemaViolation { .. } => ErrorCategory::SchemaViolation,
            Self::Schema(_) => ErrorCategory::SchemaError,
            Self::Unknown(_) => ErrorCategory::UnknownError,
        }
    }
}

/// The message a caller prints for a result: [`VALID`] or the failure text.
pub fn result_message(result: &ValidationResult) -> String {
    match result {
        Ok(()) => VALID.to_string(),
        Err(failure) => failure.to_string(),
    }
}
