//! # cape-core — Foundational Types for the CAPE Validator
//!
//! Defines the two things every other crate in the workspace agrees on:
//! which artifact kinds exist, and how a validation can fail.
//!
//! ## Key Design Principles
//!
//! 1. **Closed kind table.** `ArtifactKind` is an enum, not a string. The
//!    kind→schema-file mapping is a `match`, so adding a kind forces every
//!    consumer to handle it at compile time.
//!
//! 2. **Flat failure taxonomy.** `ValidationFailure` has one variant per
//!    category and `category()` is an exhaustive match. There is no partial
//!    validity: a file either passes or fails with exactly one category.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cape-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod kind;

// Re-export primary types for ergonomic imports.
pub use error::{
    result_message, ErrorCategory, UnknownKind, ValidationFailure, ValidationResult, VALID,
};
pub use kind::{ArtifactKind, DEFAULT_SCHEMA_VERSION};
