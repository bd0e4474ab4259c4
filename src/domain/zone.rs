//! Redaction zones and phrase-matcher working state

use super::geometry::Rect;
use super::token::Token;
use serde::{Deserialize, Serialize};

/// A token annotated with a mutable redaction flag
///
/// Working state used only inside the phrase-to-zone matcher; discarded
/// after zone extraction.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    pub token: Token,
    pub redact: bool,
}

impl From<Token> for SpatialEntry {
    fn from(token: Token) -> Self {
        Self {
            token,
            redact: false,
        }
    }
}

/// A merged rectangular region slated for redaction
///
/// This is the unit the cross-layer merger consumes before it is lifted
/// into an [`Entity`](super::entity::Entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionZone {
    pub rect: Rect,
    pub page_index: u32,
    /// Forbidden phrase that produced this zone
    pub matched_phrase: String,
    /// Texts of the tokens the zone covers, in token order
    pub matched_token_texts: Vec<String>,
}

impl RedactionZone {
    /// Fold another zone into this one: union the rectangles and
    /// concatenate labels and token lists.
    pub fn absorb(&mut self, other: RedactionZone) {
        self.rect = self.rect.union(&other.rect);
        if !other.matched_phrase.is_empty() {
            if self.matched_phrase.is_empty() {
                self.matched_phrase = other.matched_phrase;
            } else {
                self.matched_phrase.push_str("; ");
                self.matched_phrase.push_str(&other.matched_phrase);
            }
        }
        self.matched_token_texts.extend(other.matched_token_texts);
    }
}
