//! Deterministic PII detection
//!
//! Pattern + checksum rule engine: stateless validators for structured ID
//! numbers, a TOML-backed regex registry, and the matcher that scans page
//! text and emits entities with geometry.

pub mod deterministic;
pub mod patterns;
pub mod validators;

pub use deterministic::DeterministicMatcher;
pub use patterns::{PatternRegistry, ValidatorKind};

use crate::domain::{Entity, OcrPage};

/// Optional third detection layer
///
/// A local dictionary-based detector supplied by the caller. It runs
/// entirely in-process and returns entities in the shared shape; its
/// output is merged and deduplicated like any other layer.
pub trait HeuristicDetector: Send + Sync {
    fn detect(&self, page: &OcrPage) -> anyhow::Result<Vec<Entity>>;
}
