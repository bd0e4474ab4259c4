//! Regex + checksum detection layer

use crate::core::alignment::AlignmentEngine;
use crate::detection::patterns::PatternRegistry;
use crate::domain::{Entity, OcrPage, PiiCategory, SourceLayer};
use anyhow::Result;
use std::sync::Arc;

/// Categories are scanned in a fixed order so entity output is stable
/// across runs for identical input.
const SCAN_ORDER: [PiiCategory; 6] = [
    PiiCategory::NationalId,
    PiiCategory::TaxId,
    PiiCategory::CardNumber,
    PiiCategory::Phone,
    PiiCategory::Email,
    PiiCategory::DateOfBirth,
];

/// Matches below this confidence are discarded rather than emitted
const DISCARD_BELOW: f32 = 0.5;

/// Pattern-scanning detector over a page's full text
pub struct DeterministicMatcher {
    registry: Arc<PatternRegistry>,
}

impl DeterministicMatcher {
    /// Create a matcher with the built-in pattern library
    pub fn new() -> Result<Self> {
        Ok(Self {
            registry: Arc::new(PatternRegistry::default_patterns()?),
        })
    }

    /// Create a matcher with a custom pattern registry
    pub fn with_registry(registry: PatternRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// Scan one page and emit entities with aligned geometry.
    ///
    /// Raw matches get their category's base confidence. A validator, when
    /// present, promotes a valid match to 1.0 or demotes an invalid one to
    /// the category floor; matches demoted below 0.5 are dropped. Surviving
    /// matches are aligned through `engine` to obtain a bounding box.
    pub fn detect(&self, page: &OcrPage, engine: &AlignmentEngine<'_>) -> Vec<Entity> {
        let mut entities = Vec::new();

        for category in SCAN_ORDER {
            let Some(patterns) = self.registry.patterns_for_category(category) else {
                continue;
            };

            for pattern in patterns {
                for m in pattern.regex.find_iter(&page.full_text) {
                    let mut confidence = pattern.confidence;

                    if let Some(validator) = pattern.validator {
                        if validator.validate(m.as_str()) {
                            confidence = 1.0;
                        } else {
                            confidence = pattern.invalid_floor;
                            if confidence < DISCARD_BELOW {
                                tracing::trace!(
                                    category = category.label(),
                                    value_len = m.len(),
                                    "Dropping match below confidence floor"
                                );
                                continue;
                            }
                        }
                    }

                    let region = engine.align_span(m.range(), page.page_index);
                    if !region.resolved {
                        tracing::warn!(
                            category = category.label(),
                            page = page.page_index,
                            "No geometry recovered for match, keeping sentinel bbox"
                        );
                    }

                    let entity = Entity::new(
                        category,
                        m.as_str(),
                        confidence,
                        region.rect,
                        page.page_index,
                        SourceLayer::Deterministic,
                    );
                    entities.push(entity);
                }
            }
        }

        tracing::debug!(
            page = page.page_index,
            count = entities.len(),
            "Deterministic scan complete"
        );
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchingConfig;
    use crate::domain::{Rect, Token};

    fn page_from_words(words: &[&str]) -> OcrPage {
        let tokens: Vec<Token> = words
            .iter()
            .enumerate()
            .map(|(i, w)| Token::new(*w, 0.95, Rect::new(i as f32 * 60.0, 20.0, 50.0, 12.0), 0))
            .collect();
        let full_text = words.join(" ");
        OcrPage {
            page_index: 0,
            full_text,
            tokens,
        }
    }

    #[test]
    fn test_valid_national_id_promoted_to_full_confidence() {
        let page = page_from_words(&["ID:", "234567890124"]);
        let cfg = MatchingConfig::default();
        let engine = AlignmentEngine::new(&page.tokens, &page.full_text, &cfg);
        let matcher = DeterministicMatcher::new().unwrap();

        let entities = matcher.detect(&page, &engine);
        let id = entities
            .iter()
            .find(|e| e.category == PiiCategory::NationalId)
            .unwrap();
        assert_eq!(id.confidence, 1.0);
        assert_eq!(id.value, "234567890124");
        assert!(id.geometry_resolved);
        assert_eq!(id.source_layer, SourceLayer::Deterministic);
    }

    #[test]
    fn test_invalid_national_id_demoted() {
        let page = page_from_words(&["ID:", "234567890125"]);
        let cfg = MatchingConfig::default();
        let engine = AlignmentEngine::new(&page.tokens, &page.full_text, &cfg);
        let matcher = DeterministicMatcher::new().unwrap();

        let entities = matcher.detect(&page, &engine);
        let id = entities
            .iter()
            .find(|e| e.category == PiiCategory::NationalId)
            .unwrap();
        assert_eq!(id.confidence, 0.6);
    }

    #[test]
    fn test_phone_gets_category_override_confidence() {
        let page = page_from_words(&["Call", "9876543210"]);
        let cfg = MatchingConfig::default();
        let engine = AlignmentEngine::new(&page.tokens, &page.full_text, &cfg);
        let matcher = DeterministicMatcher::new().unwrap();

        let entities = matcher.detect(&page, &engine);
        let phone = entities
            .iter()
            .find(|e| e.category == PiiCategory::Phone)
            .unwrap();
        assert_eq!(phone.confidence, 0.9);
    }

    #[test]
    fn test_email_and_tax_id_detected() {
        let page = page_from_words(&["mail", "jane.doe@example.com", "pan", "ABCDE1234F"]);
        let cfg = MatchingConfig::default();
        let engine = AlignmentEngine::new(&page.tokens, &page.full_text, &cfg);
        let matcher = DeterministicMatcher::new().unwrap();

        let entities = matcher.detect(&page, &engine);
        assert!(entities.iter().any(|e| e.category == PiiCategory::Email));
        let tax = entities
            .iter()
            .find(|e| e.category == PiiCategory::TaxId)
            .unwrap();
        // Structural validator passes, so the match is promoted
        assert_eq!(tax.confidence, 1.0);
    }

    #[test]
    fn test_match_geometry_covers_matched_tokens_only() {
        let page = page_from_words(&["before", "9876543210", "after"]);
        let cfg = MatchingConfig::default();
        let engine = AlignmentEngine::new(&page.tokens, &page.full_text, &cfg);
        let matcher = DeterministicMatcher::new().unwrap();

        let entities = matcher.detect(&page, &engine);
        let phone = entities
            .iter()
            .find(|e| e.category == PiiCategory::Phone)
            .unwrap();
        assert_eq!(phone.bbox, page.tokens[1].bbox);
    }

    #[test]
    fn test_clean_page_yields_nothing() {
        let page = page_from_words(&["nothing", "sensitive", "here"]);
        let cfg = MatchingConfig::default();
        let engine = AlignmentEngine::new(&page.tokens, &page.full_text, &cfg);
        let matcher = DeterministicMatcher::new().unwrap();

        assert!(matcher.detect(&page, &engine).is_empty());
    }
}
