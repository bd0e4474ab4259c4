//! Core redaction logic
//!
//! - [`alignment`] - maps matched text back onto positional OCR tokens
//! - [`zones`] - turns forbidden phrases into merged redaction zones
//! - [`merge`] - cross-layer entity deduplication and filtering
//! - [`pipeline`] - orchestrates the detection layers per page

pub mod alignment;
pub mod merge;
pub mod pipeline;
pub mod zones;

use serde::{Deserialize, Serialize};

/// Inclusive Unicode code-point block kept by text normalization in
/// addition to ASCII alphanumerics. Used for documents in a non-Latin
/// script so token matching is not reduced to digits only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptRange {
    pub start: char,
    pub end: char,
}

impl ScriptRange {
    /// Devanagari block, the default target script
    pub const DEVANAGARI: ScriptRange = ScriptRange {
        start: '\u{0900}',
        end: '\u{097F}',
    };

    pub fn contains(&self, c: char) -> bool {
        c >= self.start && c <= self.end
    }
}

/// Tuning parameters shared by the alignment engine and the phrase matcher.
///
/// The acceptance ratios and pixel tolerances are heuristic constants
/// carried over from observed scanner behavior, not proven-optimal values;
/// they are configurable for that reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Padding added around zones so glyph ascenders/descenders are covered
    #[serde(default = "default_padding_px")]
    pub padding_px: f32,

    /// Vertical bucket size when sorting zones into rows for compaction
    #[serde(default = "default_row_tolerance_px")]
    pub row_tolerance_px: f32,

    /// Maximum pixel gap between zones folded into one rectangle
    #[serde(default = "default_merge_gap_px")]
    pub merge_gap_px: f32,

    /// Minimum fraction of target words a partial alignment must cover
    #[serde(default = "default_partial_match_ratio")]
    pub partial_match_ratio: f32,

    /// Minimum fraction of phrase words a partial phrase match must cover
    #[serde(default = "default_phrase_match_ratio")]
    pub phrase_match_ratio: f32,

    /// Extra Unicode block preserved by normalization, if any
    #[serde(default = "default_extra_script")]
    pub extra_script: Option<ScriptRange>,
}

fn default_padding_px() -> f32 {
    2.0
}

fn default_row_tolerance_px() -> f32 {
    5.0
}

fn default_merge_gap_px() -> f32 {
    2.0
}

fn default_partial_match_ratio() -> f32 {
    0.5
}

fn default_phrase_match_ratio() -> f32 {
    0.6
}

fn default_extra_script() -> Option<ScriptRange> {
    Some(ScriptRange::DEVANAGARI)
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            padding_px: default_padding_px(),
            row_tolerance_px: default_row_tolerance_px(),
            merge_gap_px: default_merge_gap_px(),
            partial_match_ratio: default_partial_match_ratio(),
            phrase_match_ratio: default_phrase_match_ratio(),
            extra_script: default_extra_script(),
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> crate::domain::Result<()> {
        for (name, value) in [
            ("partial_match_ratio", self.partial_match_ratio),
            ("phrase_match_ratio", self.phrase_match_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::domain::BlackoutError::Configuration(format!(
                    "matching.{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.padding_px < 0.0 || self.row_tolerance_px < 0.0 || self.merge_gap_px < 0.0 {
            return Err(crate::domain::BlackoutError::Configuration(
                "matching pixel tolerances must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Normalize text for token matching: lower-case, then keep only ASCII
/// alphanumerics plus the configured extra script block. Punctuation and
/// OCR join artifacts disappear entirely.
pub fn normalize(text: &str, extra_script: Option<ScriptRange>) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric() || extra_script.map(|r| r.contains(*c)).unwrap_or(false)
        })
        .collect()
}
