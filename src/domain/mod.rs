//! Core domain types
//!
//! This module contains the shared data model for the redaction pipeline:
//! positional OCR tokens, pixel geometry, detected PII entities, and
//! redaction zones, plus the crate-wide error and result types.

pub mod entity;
pub mod errors;
pub mod geometry;
pub mod result;
pub mod token;
pub mod zone;

// Re-export commonly used types
pub use entity::{Entity, PiiCategory, SourceLayer};
pub use errors::{BlackoutError, ClassifierError};
pub use geometry::Rect;
pub use result::Result;
pub use token::{OcrDocument, OcrPage, Token};
pub use zone::{RedactionZone, SpatialEntry};
