//! External collaborator interfaces
//!
//! The OCR engine, the semantic classifier, and the redaction painter are
//! external to this core. Each is specified as a trait at its seam; only
//! the classifier ships with a concrete (HTTP) implementation.

pub mod classifier;
pub mod ocr;
pub mod painter;
