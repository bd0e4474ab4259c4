//! Text-to-geometry alignment
//!
//! The detectors work on flat text; the OCR engine reports geometry per
//! token. This module re-attaches a matched character span or a standalone
//! string onto one or more contiguous tokens and returns their enclosing
//! bounding box.
//!
//! Two strategies are tried in order, first success wins:
//!
//! 1. **Token-sequence matching.** Both sides are normalized (see
//!    [`crate::core::normalize`]) and a window of the target's word count is
//!    slid over the token sequence. If no exact window matches, a greedy
//!    partial pass anchors on the first word and consumes later tokens that
//!    match subsequent words, gaps allowed. This strategy is immune to
//!    character-offset drift from multi-byte scripts.
//! 2. **Character-offset matching.** Tokens are resolved to spans in the
//!    page's full text with a forward-only search cursor; every token whose
//!    span intersects the target range is collected.
//!
//! When both strategies fail the engine returns a zero-size sentinel at the
//! page origin instead of failing the pipeline. Callers must treat it as
//! "geometry unknown".

use crate::core::{normalize, MatchingConfig};
use crate::domain::{Rect, Token};
use std::ops::Range;

/// Result of an alignment attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRegion {
    pub rect: Rect,
    pub page_index: u32,
    /// False when the rect is the "geometry unknown" sentinel
    pub resolved: bool,
}

impl AlignedRegion {
    fn unresolved(page_index: u32) -> Self {
        Self {
            rect: Rect::ZERO,
            page_index,
            resolved: false,
        }
    }
}

/// Maps text matches back onto the token stream of one page
pub struct AlignmentEngine<'a> {
    tokens: &'a [Token],
    full_text: &'a str,
    /// Normalized token texts, cached once per page
    normalized: Vec<String>,
    config: &'a MatchingConfig,
}

impl<'a> AlignmentEngine<'a> {
    pub fn new(tokens: &'a [Token], full_text: &'a str, config: &'a MatchingConfig) -> Self {
        let normalized = tokens
            .iter()
            .map(|t| normalize(&t.text, config.extra_script))
            .collect();
        Self {
            tokens,
            full_text,
            normalized,
            config,
        }
    }

    /// Align a byte range of the page's full text
    pub fn align_span(&self, span: Range<usize>, page_index: u32) -> AlignedRegion {
        if let Some(target) = self.full_text.get(span.clone()) {
            if let Some(indices) = self.token_sequence_match(target) {
                return self.region_for(&indices, page_index);
            }
        }

        if let Some(indices) = self.char_offset_match(&span) {
            return self.region_for(&indices, page_index);
        }

        tracing::debug!(
            start = span.start,
            end = span.end,
            page = page_index,
            "Alignment failed for span, returning sentinel"
        );
        AlignedRegion::unresolved(page_index)
    }

    /// Align a standalone string that may not be verbatim in the full text
    pub fn align_text(&self, target: &str, page_index: u32) -> AlignedRegion {
        if let Some(indices) = self.token_sequence_match(target) {
            return self.region_for(&indices, page_index);
        }

        // The classifier sometimes echoes text verbatim; locate it by offset
        // as a last resort before giving up.
        if let Some(start) = self.full_text.find(target) {
            let span = start..start + target.len();
            if let Some(indices) = self.char_offset_match(&span) {
                return self.region_for(&indices, page_index);
            }
        }

        tracing::debug!(
            target = %target,
            page = page_index,
            "Alignment failed for text, returning sentinel"
        );
        AlignedRegion::unresolved(page_index)
    }

    /// Primary strategy: exact window, then greedy partial fallback
    fn token_sequence_match(&self, target: &str) -> Option<Vec<usize>> {
        let words: Vec<String> = target
            .split_whitespace()
            .map(|w| normalize(w, self.config.extra_script))
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return None;
        }

        if let Some(indices) = self.exact_window(&words) {
            return Some(indices);
        }

        self.partial_forward(&words)
    }

    /// Slide a window of `words.len()` over the token sequence; the first
    /// window matching per-position wins.
    fn exact_window(&self, words: &[String]) -> Option<Vec<usize>> {
        if words.len() > self.normalized.len() {
            return None;
        }

        for start in 0..=(self.normalized.len() - words.len()) {
            let matches = words
                .iter()
                .enumerate()
                .all(|(offset, word)| &self.normalized[start + offset] == word);
            if matches {
                return Some((start..start + words.len()).collect());
            }
        }
        None
    }

    /// Partial fallback: anchor on the first word, then greedily consume
    /// forward tokens matching the next expected word. Gaps are allowed.
    /// Accepted only when enough of the target's words were matched.
    fn partial_forward(&self, words: &[String]) -> Option<Vec<usize>> {
        let anchor = self.normalized.iter().position(|n| n == &words[0])?;

        let mut matched = vec![anchor];
        let mut expected = 1;

        for idx in anchor + 1..self.normalized.len() {
            if expected >= words.len() {
                break;
            }
            if self.normalized[idx] == words[expected] {
                matched.push(idx);
                expected += 1;
            }
        }

        let ratio = matched.len() as f32 / words.len() as f32;
        if ratio >= self.config.partial_match_ratio {
            Some(matched)
        } else {
            None
        }
    }

    /// Fallback strategy: resolve token offsets with a forward-only cursor
    /// and collect every token whose span intersects the target range.
    ///
    /// A token that cannot be located is skipped without disturbing the
    /// cursor, so one OCR artifact doesn't desynchronize the rest of the
    /// page.
    fn char_offset_match(&self, span: &Range<usize>) -> Option<Vec<usize>> {
        let mut cursor = 0usize;
        let mut collected = Vec::new();

        for (idx, token) in self.tokens.iter().enumerate() {
            if token.text.is_empty() {
                continue;
            }
            let remainder = self.full_text.get(cursor..)?;
            if let Some(rel) = remainder.find(&token.text) {
                let start = cursor + rel;
                let end = start + token.text.len();
                if start < span.end && end > span.start {
                    collected.push(idx);
                }
                cursor = end;
                if cursor >= span.end && !collected.is_empty() {
                    break;
                }
            }
        }

        if collected.is_empty() {
            None
        } else {
            Some(collected)
        }
    }

    fn region_for(&self, indices: &[usize], page_index: u32) -> AlignedRegion {
        let mut iter = indices.iter().map(|&i| self.tokens[i].bbox);
        let first = match iter.next() {
            Some(rect) => rect,
            None => return AlignedRegion::unresolved(page_index),
        };
        let rect = iter.fold(first, |acc, r| acc.union(&r));
        AlignedRegion {
            rect,
            page_index,
            resolved: true,
        }
    }
}
