//! # Schema Resolution
//!
//! Maps an [`ArtifactKind`] to its parsed JSON Schema document, read from
//! the `schemas/` directory of the repository being validated.
//!
//! ## No Caching
//!
//! Every call re-reads and re-parses the schema file. A validation run is a
//! short-lived process, and re-reading means an edited schema is always
//! picked up by the next call.
//!
//! ## `$ref` Retrieval
//!
//! Internal `$ref`s (`#/$defs/<name>`) are resolved by the jsonschema crate
//! natively. External `$ref`s are served by [`LocalSchemaRetriever`], which
//! maps the final path segment of the URI to a sibling file in `schemas/`.
//! Nothing is ever fetched over the network.

use std::path::{Path, PathBuf};

use cape_core::{ArtifactKind, UnknownKind, ValidationFailure};
use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use thiserror::Error;

/// Directory, relative to the repository root, holding schema documents.
pub const SCHEMA_DIR: &str = "schemas";

/// Error while resolving a kind to its schema document.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The kind identifier is not registered.
    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),

    /// No schema file at the expected location.
    #[error("Schema not found: {}", path.display())]
    NotFound {
        /// Where the schema was expected.
        path: PathBuf,
    },

    /// The schema file exists but could not be read.
    #[error("cannot read schema {}: {source}", path.display())]
    Io {
        /// Path of the schema file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not well-formed JSON.
    #[error("schema {}: {source}", path.display())]
    Parse {
        /// Path of the schema file.
        path: PathBuf,
        /// Parser error with line and column.
        #[source]
        source: serde_json::Error,
    },
}

impl From<ResolveError> for ValidationFailure {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::UnknownKind(e) => ValidationFailure::Configuration(e),
            ResolveError::NotFound { path } => ValidationFailure::ResourceNotFound { path },
            // A malformed schema surfaces as a JSON parse failure.
            e @ ResolveError::Parse { .. } => ValidationFailure::InvalidJson(e.to_string()),
            e @ ResolveError::Io { .. } => ValidationFailure::Unknown(e.to_string()),
        }
    }
}

/// Resolves artifact kinds to schema documents on disk.
#[derive(Debug, Clone)]
pub struct SchemaResolver {
    schema_dir: PathBuf,
}

impl SchemaResolver {
    /// Resolver for the `schemas/` directory under `repo_root`.
    pub fn new(repo_root: impl AsRef<Path>) -> Self {
        Self::with_schema_dir(repo_root.as_ref().join(SCHEMA_DIR))
    }

    /// Resolver for an explicit schema directory.
    pub fn with_schema_dir(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Where the schema for `kind` is expected to live.
    pub fn schema_path(&self, kind: ArtifactKind) -> PathBuf {
        self.schema_dir.join(kind.schema_file())
    }

    /// Load and parse the schema document for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] if the file is absent,
    /// [`ResolveError::Parse`] if it is not valid JSON, and
    /// [`ResolveError::Io`] for any other read failure.
    pub fn resolve(&self, kind: ArtifactKind) -> Result<Value, ResolveError> {
        let path = self.schema_path(kind);
        tracing::debug!(kind = %kind, path = %path.display(), "resolving schema");
        read_schema(&path)
    }

    /// Like [`resolve`](Self::resolve), but takes a kind identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::UnknownKind`] listing the registered kinds if
    /// `kind` is not one of them.
    pub fn resolve_named(&self, kind: &str) -> Result<(ArtifactKind, Value), ResolveError> {
        let kind: ArtifactKind = kind.parse().map_err(|e: UnknownKind| {
            tracing::debug!(kind = e.kind(), "unregistered schema kind");
            e
        })?;
        let schema = self.resolve(kind)?;
        Ok((kind, schema))
    }

    /// Retriever serving external `$ref`s from this resolver's directory.
    pub fn retriever(&self) -> LocalSchemaRetriever {
        LocalSchemaRetriever {
            schema_dir: self.schema_dir.clone(),
        }
    }
}

fn read_schema(path: &Path) -> Result<Value, ResolveError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ResolveError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ResolveError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&content).map_err(|source| ResolveError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Local retriever that resolves `$ref` URIs to files in the schema directory.
///
/// Only the final path segment of the URI is used, so
/// `https://example.org/schemas/common-v1.0.0.json` and a relative
/// `common-v1.0.0.json` both resolve to `schemas/common-v1.0.0.json`.
/// Anything that does not name an existing file there is refused.
#[derive(Debug, Clone)]
pub struct LocalSchemaRetriever {
    schema_dir: PathBuf,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        let filename = uri_str
            .split(['#', '?'])
            .next()
            .unwrap_or(uri_str)
            .rsplit('/')
            .next()
            .unwrap_or_default();

        if filename.is_empty() || filename == "." || filename == ".." {
            return Err(
                format!("cannot resolve '{uri_str}': remote schema retrieval is disabled").into(),
            );
        }

        let path = self.schema_dir.join(filename);
        if !path.is_file() {
            return Err(format!(
                "cannot resolve '{uri_str}': no schema '{filename}' in {}",
                self.schema_dir.display()
            )
            .into());
        }

        tracing::debug!(uri = uri_str, path = %path.display(), "resolved external $ref locally");
        Ok(read_schema(&path)?)
    }
}
