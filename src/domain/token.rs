//! OCR token model
//!
//! Tokens are produced once per page by the external OCR engine and are
//! immutable afterwards. Token identity is positional (its index in the
//! page's sequence), never content-based: two tokens may carry identical
//! text.

use super::geometry::Rect;
use serde::{Deserialize, Serialize};

/// One OCR-recognized word with its confidence and pixel bounding box
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// Recognized text, exactly as the OCR engine reported it
    pub text: String,
    /// OCR confidence in [0, 1]
    pub confidence: f32,
    /// Bounding box in page-image pixel coordinates
    pub bbox: Rect,
    /// Zero-based page index
    pub page_index: u32,
}

impl Token {
    pub fn new(text: impl Into<String>, confidence: f32, bbox: Rect, page_index: u32) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 1.0),
            bbox,
            page_index,
        }
    }
}

/// One page of OCR output
///
/// `full_text` is the engine's concatenated text for the page. Its word
/// order must match token order for character-offset alignment to be
/// meaningful; when an engine cannot guarantee that, only token-sequence
/// alignment is reliable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrPage {
    pub page_index: u32,
    pub full_text: String,
    pub tokens: Vec<Token>,
}

impl OcrPage {
    /// Build the page text by joining token texts with single spaces.
    ///
    /// Used when the OCR engine supplies tokens but no full-text string;
    /// the join policy matches what the alignment engine's offset strategy
    /// expects.
    pub fn join_tokens(tokens: &[Token]) -> String {
        tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A whole scanned document as delivered by the OCR engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrDocument {
    pub pages: Vec<OcrPage>,
}
