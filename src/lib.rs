// Blackout - PII redaction-region engine for scanned documents
// Copyright (c) 2025 Blackout Contributors
// Licensed under the MIT License

//! # Blackout - PII redaction-region engine
//!
//! Blackout takes the OCR output of a scanned document and computes the
//! rectangular regions that must be painted over before the document can
//! be shared. It never touches image bytes itself: input is recognized
//! tokens with pixel bounding boxes, output is entities with geometry.
//!
//! ## Detection layers
//!
//! Three independent layers are merged into one result:
//!
//! - **Deterministic** - regex patterns with checksum validation for
//!   structured identifiers (national IDs, cards, tax IDs, phones, ...)
//! - **Semantic** - an external classifier service that returns verbatim
//!   "forbidden" phrases for contextual PII (names, addresses, medical)
//! - **Heuristic** - an optional caller-supplied local detector
//!
//! The semantic layer is allowed to fail: after bounded retries the
//! pipeline degrades to the surviving layers and flags the result.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (alignment, zones, merging, pipeline)
//! - [`detection`] - Deterministic pattern + checksum layer
//! - [`adapters`] - External collaborators (OCR, classifier, painter)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blackout::core::pipeline::RedactionPipeline;
//! use blackout::detection::DeterministicMatcher;
//! use blackout::domain::OcrDocument;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let json = std::fs::read_to_string("ocr.json")?;
//!     let document: OcrDocument = serde_json::from_str(&json)?;
//!
//!     let pipeline = RedactionPipeline::new(DeterministicMatcher::new()?);
//!     let outcome = pipeline.process_document(&document, None).await?;
//!
//!     println!("{} regions to redact", outcome.entities.len());
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod detection;
pub mod domain;
pub mod logging;
