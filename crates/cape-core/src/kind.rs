//! # Artifact Kinds — Closed Kind Table
//!
//! Defines the `ArtifactKind` enum: the four artifact families the validator
//! knows about, and the fixed one-to-one mapping from each kind to the schema
//! document that governs it.
//!
//! ## Invariant
//!
//! Every kind maps to exactly one schema file. Unknown kind identifiers are
//! rejected at the parsing boundary with an [`UnknownKind`] error that lists
//! the registered identifiers, so a caller can self-correct. There is no
//! default kind.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::UnknownKind;

/// Schema version every kind is currently pinned to.
pub const DEFAULT_SCHEMA_VERSION: &str = "1.0.0";

/// The category of an artifact, which determines the schema it must satisfy.
///
/// | Identifier | Schema file |
/// |------------|-------------|
/// | `predicategraph` | `predicate-graph-v1.0.0.json` |
/// | `policy_pack` | `policy-pack-v1.0.0.json` |
/// | `cpl_policy` | `cpl-policy-v1.0.0.json` |
/// | `verifier_rubric` | `verifier-rubric-v1.0.0.json` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Predicate graphs, discovered under `examples/<name>/`.
    #[serde(rename = "predicategraph")]
    PredicateGraph,
    /// Policy packs, discovered under `packs/`.
    #[serde(rename = "policy_pack")]
    PolicyPack,
    /// Standalone CPL policies. Never discovered in bulk mode.
    #[serde(rename = "cpl_policy")]
    CplPolicy,
    /// Verifier rubrics, discovered under `rubrics/`.
    #[serde(rename = "verifier_rubric")]
    VerifierRubric,
}

impl ArtifactKind {
    /// Returns all registered kinds in canonical order.
    pub fn all() -> &'static [ArtifactKind] {
        &[
            Self::PredicateGraph,
            Self::PolicyPack,
            Self::CplPolicy,
            Self::VerifierRubric,
        ]
    }

    /// Returns the identifier used on the command line and in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PredicateGraph => "predicategraph",
            Self::PolicyPack => "policy_pack",
            Self::CplPolicy => "cpl_policy",
            Self::VerifierRubric => "verifier_rubric",
        }
    }

    /// Returns the schema file name, relative to the `schemas/` directory.
    ///
    /// File names follow `<kind-family>-v<semver>.json`.
    pub fn schema_file(&self) -> &'static str {
        match self {
            Self::PredicateGraph => "predicate-graph-v1.0.0.json",
            Self::PolicyPack => "policy-pack-v1.0.0.json",
            Self::CplPolicy => "cpl-policy-v1.0.0.json",
            Self::VerifierRubric => "verifier-rubric-v1.0.0.json",
        }
    }

    /// Returns the version of the schema this kind resolves to.
    pub fn schema_version(&self) -> &'static str {
        DEFAULT_SCHEMA_VERSION
    }

    /// Heading used when this kind is reported as a bulk-validation group.
    pub fn group_title(&self) -> &'static str {
        match self {
            Self::PredicateGraph => "PredicateGraphs",
            Self::PolicyPack => "Policy Packs",
            Self::CplPolicy => "CPL Policies",
            Self::VerifierRubric => "Verifier Rubrics",
        }
    }

    /// Identifiers of all registered kinds, in canonical order.
    pub fn valid_identifiers() -> Vec<&'static str> {
        Self::all().iter().map(|k| k.as_str()).collect()
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = UnknownKind;

    /// Parse a kind from its identifier. Matching is exact and case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "predicategraph" => Ok(Self::PredicateGraph),
            "policy_pack" => Ok(Self::PolicyPack),
            "cpl_policy" => Ok(Self::CplPolicy),
            "verifier_rubric" => Ok(Self::VerifierRubric),
            other => Err(UnknownKind::new(other)),
        }
    }
}
