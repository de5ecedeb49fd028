//! # cape-schema — Schema Resolution & Artifact Validation
//!
//! Validates CAPE artifacts (predicate graphs, policy packs, CPL policies,
//! verifier rubrics) against the versioned JSON Schemas in a repository's
//! `schemas/` directory.
//!
//! ## Resolution (`resolve`)
//!
//! [`SchemaResolver`] maps an [`ArtifactKind`](cape_core::ArtifactKind) to
//! its schema file and parses it, re-reading from disk on every call.
//! External `$ref`s resolve to sibling files; nothing is fetched remotely.
//!
//! ## Validation (`validate`)
//!
//! [`ValidationEngine::validate_file`] is the primitive: it reduces every
//! outcome to `Ok(())` or a single categorised
//! [`ValidationFailure`](cape_core::ValidationFailure). Structural checking
//! is delegated to the `jsonschema` crate; only the first violation is
//! reported.
//!
//! ## Discovery (`discover`)
//!
//! [`ValidationEngine::validate_all`] walks `examples/*/`, `packs/` and
//! `rubrics/` and aggregates the outcomes into a [`BulkReport`].
//!
//! ## Crate Policy
//!
//! - Depends only on `cape-core` internally.
//! - Per-file failures are values, never panics or early returns from a run.

pub mod discover;
pub mod resolve;
pub mod validate;

pub use discover::{
    discover, BulkReport, FileReport, GroupReport, RunSummary, BULK_KINDS, EXPECTATIONS_SUFFIX,
};
pub use resolve::{LocalSchemaRetriever, ResolveError, SchemaResolver, SCHEMA_DIR};
pub use validate::{format_location, ValidationEngine};
