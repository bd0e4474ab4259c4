//! Forbidden-phrase to redaction-zone matching
//!
//! The semantic classifier returns verbatim phrases with no geometry. This
//! module walks one page's [`SpatialEntry`] list, marks the tokens each
//! phrase covers, and emits padded [`RedactionZone`]s, which are then
//! compacted so overlapping rectangles are not painted twice.

pub mod compact;

use crate::core::{normalize, MatchingConfig};
use crate::domain::{RedactionZone, SpatialEntry};
use std::collections::HashMap;

/// Matches forbidden phrases onto the token stream of one page
pub struct PhraseMatcher<'a> {
    config: &'a MatchingConfig,
}

impl<'a> PhraseMatcher<'a> {
    pub fn new(config: &'a MatchingConfig) -> Self {
        Self { config }
    }

    /// Produce compacted redaction zones for the given phrases.
    ///
    /// Multi-word phrases are matched by sliding an exact window over the
    /// entries (every occurrence produces a zone); phrases with no exact
    /// window anywhere fall back to a greedy partial match that stops at
    /// the first acceptable candidate. Single-word phrases then claim any
    /// entry not already marked. Finally adjacent zones are folded
    /// together.
    pub fn match_phrases(
        &self,
        entries: &mut [SpatialEntry],
        phrases: &[String],
        page_index: u32,
    ) -> Vec<RedactionZone> {
        let normalized: Vec<String> = entries
            .iter()
            .map(|e| normalize(&e.token.text, self.config.extra_script))
            .collect();

        // Normalized word -> the phrase it came from, so emitted zones
        // carry the classifier's phrase rather than the OCR token text.
        let mut single_words: HashMap<String, &String> = HashMap::new();
        let mut multi_word: Vec<(&String, Vec<String>)> = Vec::new();

        for phrase in phrases {
            let words: Vec<String> = phrase
                .split_whitespace()
                .map(|w| normalize(w, self.config.extra_script))
                .filter(|w| !w.is_empty())
                .collect();
            match words.len() {
                0 => continue,
                1 => {
                    single_words.insert(words.into_iter().next().unwrap(), phrase);
                }
                _ => multi_word.push((phrase, words)),
            }
        }

        let mut zones = Vec::new();

        for (phrase, words) in &multi_word {
            let mut found_exact = false;
            let mut i = 0;
            while i + words.len() <= entries.len() {
                let matches = words
                    .iter()
                    .enumerate()
                    .all(|(offset, w)| &normalized[i + offset] == w);
                if matches {
                    found_exact = true;
                    let indices: Vec<usize> = (i..i + words.len()).collect();
                    zones.push(self.emit_zone(entries, &indices, phrase, page_index));
                    i += words.len();
                } else {
                    i += 1;
                }
            }

            if !found_exact {
                if let Some(indices) = self.partial_match(&normalized, words) {
                    tracing::debug!(
                        phrase = %phrase,
                        matched = indices.len(),
                        total = words.len(),
                        "Partial phrase match accepted"
                    );
                    zones.push(self.emit_zone(entries, &indices, phrase, page_index));
                }
            }
        }

        if !single_words.is_empty() {
            for idx in 0..entries.len() {
                if entries[idx].redact {
                    continue;
                }
                if let Some(phrase) = single_words.get(&normalized[idx]) {
                    zones.push(self.emit_zone(entries, &[idx], phrase, page_index));
                }
            }
        }

        compact::compact_zones(zones, self.config)
    }

    /// Greedy partial fallback for one phrase.
    ///
    /// Anchors on the first entry matching the phrase's first word, then
    /// consumes later entries matching subsequent words in order within a
    /// lookahead of twice the phrase length. First acceptable candidate
    /// wins; no further occurrences are sought.
    fn partial_match(&self, normalized: &[String], words: &[String]) -> Option<Vec<usize>> {
        let anchor = normalized.iter().position(|n| n == &words[0])?;
        let lookahead_end = (anchor + words.len() * 2).min(normalized.len());

        let mut matched = vec![anchor];
        let mut expected = 1;

        for idx in anchor + 1..lookahead_end {
            if expected >= words.len() {
                break;
            }
            if normalized[idx] == words[expected] {
                matched.push(idx);
                expected += 1;
            }
        }

        let ratio = matched.len() as f32 / words.len() as f32;
        if ratio >= self.config.phrase_match_ratio {
            Some(matched)
        } else {
            None
        }
    }

    /// Mark the entries and build a padded zone over them
    fn emit_zone(
        &self,
        entries: &mut [SpatialEntry],
        indices: &[usize],
        phrase: &str,
        page_index: u32,
    ) -> RedactionZone {
        let mut rect = entries[indices[0]].token.bbox;
        let mut texts = Vec::with_capacity(indices.len());

        for &idx in indices {
            entries[idx].redact = true;
            rect = rect.union(&entries[idx].token.bbox);
            texts.push(entries[idx].token.text.clone());
        }

        RedactionZone {
            rect: rect.inflate(self.config.padding_px),
            page_index,
            matched_phrase: phrase.to_string(),
            matched_token_texts: texts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Rect, Token};

    fn entries_from_words(words: &[&str]) -> Vec<SpatialEntry> {
        words
            .iter()
            .enumerate()
            .map(|(i, w)| {
                SpatialEntry::from(Token::new(
                    *w,
                    0.95,
                    Rect::new(i as f32 * 100.0, 40.0, 80.0, 14.0),
                    0,
                ))
            })
            .collect()
    }

    #[test]
    fn test_multi_word_phrase_marks_and_emits_one_zone() {
        let mut entries = entries_from_words(&["John", "Doe", "lives", "in", "Pune"]);
        let cfg = MatchingConfig::default();
        let matcher = PhraseMatcher::new(&cfg);

        let zones = matcher.match_phrases(&mut entries, &["John Doe".to_string()], 0);

        assert_eq!(zones.len(), 1);
        assert!(entries[0].redact);
        assert!(entries[1].redact);
        assert!(!entries[2].redact);
        assert_eq!(zones[0].matched_token_texts, vec!["John", "Doe"]);
        // Padded union of tokens 0-1
        assert_eq!(zones[0].rect.x, 0.0 - cfg.padding_px);
        assert_eq!(zones[0].rect.right(), 180.0 + cfg.padding_px);
    }

    #[test]
    fn test_every_exact_occurrence_emits_a_zone() {
        let mut entries = entries_from_words(&["John", "Doe", "and", "John", "Doe"]);
        let cfg = MatchingConfig::default();
        let matcher = PhraseMatcher::new(&cfg);

        let zones = matcher.match_phrases(&mut entries, &["John Doe".to_string()], 0);
        assert_eq!(zones.len(), 2);
        assert!(entries.iter().enumerate().all(|(i, e)| e.redact == (i != 2)));
    }

    #[test]
    fn test_partial_fallback_within_lookahead() {
        // "Rahul N. Deshpande" on the page, phrase omits the initial.
        let mut entries = entries_from_words(&["Rahul", "N.", "Deshpande", "Pune"]);
        let cfg = MatchingConfig::default();
        let matcher = PhraseMatcher::new(&cfg);

        let zones = matcher.match_phrases(&mut entries, &["Rahul Deshpande".to_string()], 0);
        assert_eq!(zones.len(), 1);
        assert!(entries[0].redact);
        assert!(entries[2].redact);
        assert!(!entries[1].redact);
    }

    #[test]
    fn test_partial_fallback_rejects_below_sixty_percent() {
        let mut entries = entries_from_words(&["Rahul", "works", "remotely"]);
        let cfg = MatchingConfig::default();
        let matcher = PhraseMatcher::new(&cfg);

        // 1 of 3 words present: 33% < 60%
        let zones = matcher.match_phrases(
            &mut entries,
            &["Rahul Narayan Deshpande".to_string()],
            0,
        );
        assert!(zones.is_empty());
        assert!(!entries[0].redact);
    }

    #[test]
    fn test_single_word_pass_skips_already_marked() {
        let mut entries = entries_from_words(&["John", "Doe"]);
        let cfg = MatchingConfig::default();
        let matcher = PhraseMatcher::new(&cfg);

        let zones = matcher.match_phrases(
            &mut entries,
            &["John Doe".to_string(), "Doe".to_string()],
            0,
        );
        // "Doe" is already covered by the multi-word zone; the single-word
        // pass must not duplicate it.
        assert_eq!(zones.len(), 1);
    }

    #[test]
    fn test_single_word_phrase_matches_with_punctuation() {
        let mut entries = entries_from_words(&["total", "Pune,", "bill"]);
        let cfg = MatchingConfig::default();
        let matcher = PhraseMatcher::new(&cfg);

        let zones = matcher.match_phrases(&mut entries, &["pune".to_string()], 0);
        assert_eq!(zones.len(), 1);
        assert!(entries[1].redact);
        assert_eq!(zones[0].matched_token_texts, vec!["Pune,"]);
        // The zone records the phrase that matched, not the OCR token text
        assert_eq!(zones[0].matched_phrase, "pune");
    }

    #[test]
    fn test_empty_phrases_filtered_silently() {
        let mut entries = entries_from_words(&["John", "Doe"]);
        let cfg = MatchingConfig::default();
        let matcher = PhraseMatcher::new(&cfg);

        let zones = matcher.match_phrases(
            &mut entries,
            &["".to_string(), "   ".to_string(), "...".to_string()],
            0,
        );
        assert!(zones.is_empty());
    }
}
