//! OCR engine interface
//!
//! The OCR engine is a black box to this core: page image bytes go in, an
//! ordered token list plus a concatenated full-text string per page comes
//! out. The full text's word order must match token order for the
//! character-offset alignment strategy to be meaningful; engines that
//! cannot guarantee that should leave `full_text` to
//! [`OcrPage::join_tokens`](crate::domain::OcrPage::join_tokens).

use crate::domain::{OcrDocument, Result};
use async_trait::async_trait;

/// External OCR collaborator
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize one scanned document
    async fn recognize(&self, image: &[u8], mime_type: &str) -> Result<OcrDocument>;
}
