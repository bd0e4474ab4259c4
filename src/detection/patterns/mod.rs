//! Pattern library for deterministic PII detection

use crate::detection::validators;
use crate::domain::PiiCategory;
use anyhow::{Context, Result};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this category
    pub patterns: Vec<String>,
    /// Base confidence assigned to a raw match (0.0 - 1.0)
    pub confidence: f32,
    /// PII category label
    pub category: String,
    /// Optional validator applied to each raw match
    pub validator: Option<String>,
    /// Confidence assigned when the validator rejects a match
    pub invalid_floor: Option<f32>,
}

/// Validation primitive applied to a raw pattern match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidatorKind {
    /// Table-checksum for the 12-digit national ID
    NationalId,
    /// Luhn checksum for payment card numbers
    Luhn,
    /// Structural check for the alphanumeric tax ID
    TaxIdFormat,
}

impl ValidatorKind {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "national_id" => Ok(Self::NationalId),
            "luhn" => Ok(Self::Luhn),
            "tax_id_format" => Ok(Self::TaxIdFormat),
            _ => anyhow::bail!("Unknown validator: {s}"),
        }
    }

    /// Run the validator over a raw match
    pub fn validate(&self, candidate: &str) -> bool {
        match self {
            Self::NationalId => validators::validate_national_id(candidate),
            Self::Luhn => validators::validate_card_number(candidate),
            Self::TaxIdFormat => validators::validate_tax_id(candidate),
        }
    }
}

/// Compiled pattern with metadata
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Compiled regex
    pub regex: Regex,
    /// PII category
    pub category: PiiCategory,
    /// Base confidence for a raw match
    pub confidence: f32,
    /// Validator to apply, if any
    pub validator: Option<ValidatorKind>,
    /// Confidence floor for matches the validator rejects
    pub invalid_floor: f32,
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibrary {
    patterns: HashMap<String, PatternDefinition>,
}

/// Pattern registry for deterministic detection
pub struct PatternRegistry {
    patterns_by_category: HashMap<PiiCategory, Vec<CompiledPattern>>,
}

impl PatternRegistry {
    /// Create a new pattern registry from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Create a pattern registry from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibrary =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut patterns_by_category: HashMap<PiiCategory, Vec<CompiledPattern>> = HashMap::new();

        for (name, def) in library.patterns {
            let category = Self::parse_category(&def.category).with_context(|| {
                format!("Invalid category in pattern '{}': {}", name, def.category)
            })?;

            let validator = def
                .validator
                .as_deref()
                .map(ValidatorKind::parse)
                .transpose()
                .with_context(|| format!("Invalid validator in pattern '{name}'"))?;

            for pattern_str in &def.patterns {
                let regex = Regex::new(pattern_str)
                    .with_context(|| format!("Invalid regex in pattern '{name}': {pattern_str}"))?;

                patterns_by_category
                    .entry(category)
                    .or_default()
                    .push(CompiledPattern {
                        regex,
                        category,
                        confidence: def.confidence,
                        validator,
                        invalid_floor: def.invalid_floor.unwrap_or(0.0),
                    });
            }
        }

        Ok(Self {
            patterns_by_category,
        })
    }

    /// Create a default pattern registry with built-in patterns
    pub fn default_patterns() -> Result<Self> {
        let default_toml = include_str!("../../../patterns/pii_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Get patterns for a specific category
    pub fn patterns_for_category(&self, category: PiiCategory) -> Option<&[CompiledPattern]> {
        self.patterns_by_category
            .get(&category)
            .map(|v| v.as_slice())
    }

    /// Parse category string to PiiCategory enum
    ///
    /// Strict: only canonical labels are accepted here. The permissive
    /// synonym table is reserved for classifier responses.
    fn parse_category(s: &str) -> Result<PiiCategory> {
        match s.to_lowercase().as_str() {
            "national-id" => Ok(PiiCategory::NationalId),
            "tax-id" => Ok(PiiCategory::TaxId),
            "card-number" => Ok(PiiCategory::CardNumber),
            "phone" => Ok(PiiCategory::Phone),
            "name" => Ok(PiiCategory::Name),
            "address" => Ok(PiiCategory::Address),
            "medical" => Ok(PiiCategory::Medical),
            "email" => Ok(PiiCategory::Email),
            "date-of-birth" => Ok(PiiCategory::DateOfBirth),
            "generic-sensitive" => Ok(PiiCategory::GenericSensitive),
            _ => anyhow::bail!("Unknown PII category: {s}"),
        }
    }
}
