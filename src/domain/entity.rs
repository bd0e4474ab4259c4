//! Detected PII entities
//!
//! An [`Entity`] is a confirmed PII detection with category, verbatim value,
//! geometry, and a mask/keep-visible decision. Entities live for one
//! processing request and are never persisted.

use super::geometry::Rect;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Closed PII category vocabulary
///
/// The semantic classifier returns free-text category strings; they are
/// mapped onto this set via [`PiiCategory::from_label`]. Unrecognized
/// categories map to [`PiiCategory::GenericSensitive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PiiCategory {
    /// 12-digit national identity number
    NationalId,
    /// Fixed-format alphanumeric tax identifier
    TaxId,
    /// Payment card number
    CardNumber,
    /// Telephone numbers
    Phone,
    /// Personal names
    Name,
    /// Postal addresses and locations
    Address,
    /// Medical conditions, diagnoses, record numbers
    Medical,
    /// Email addresses
    Email,
    /// Dates of birth
    DateOfBirth,
    /// Anything sensitive that fits no other category
    GenericSensitive,
}

impl PiiCategory {
    /// Canonical label for the category
    pub fn label(&self) -> &'static str {
        match self {
            Self::NationalId => "national-id",
            Self::TaxId => "tax-id",
            Self::CardNumber => "card-number",
            Self::Phone => "phone",
            Self::Name => "name",
            Self::Address => "address",
            Self::Medical => "medical",
            Self::Email => "email",
            Self::DateOfBirth => "date-of-birth",
            Self::GenericSensitive => "generic-sensitive",
        }
    }

    /// Map a free-text category label onto the closed set.
    ///
    /// Lookup is case-insensitive and tolerant of spaces, hyphens, and
    /// underscores. The synonym table is fixed; anything it doesn't cover
    /// maps to `GenericSensitive`.
    pub fn from_label(label: &str) -> Self {
        let key: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match key.as_str() {
            "nationalid" | "aadhaar" | "aadhar" | "aadhaarnumber" | "ssn"
            | "socialsecuritynumber" | "nationalidentity" | "uidai" => Self::NationalId,
            "taxid" | "pan" | "pannumber" | "pancard" | "tin" | "taxnumber" => Self::TaxId,
            "cardnumber" | "card" | "creditcard" | "debitcard" | "paymentcard"
            | "creditcardnumber" => Self::CardNumber,
            "phone" | "phonenumber" | "mobile" | "mobilenumber" | "telephone" | "contactnumber" => {
                Self::Phone
            }
            "name" | "person" | "personname" | "fullname" | "patientname" => Self::Name,
            "address" | "location" | "postaladdress" | "homeaddress" | "residentialaddress" => {
                Self::Address
            }
            "medical" | "health" | "diagnosis" | "medicalrecord" | "medicalrecordnumber"
            | "healthrecord" => Self::Medical,
            "email" | "emailaddress" | "emailid" => Self::Email,
            "dateofbirth" | "dob" | "birthdate" | "birthday" => Self::DateOfBirth,
            _ => Self::GenericSensitive,
        }
    }
}

/// Detection layer that produced an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceLayer {
    /// Pattern + checksum rule engine
    Deterministic,
    /// External semantic classifier
    Semantic,
    /// Local dictionary-based detector
    Heuristic,
}

/// A confirmed PII detection
///
/// Created by a detector. Mutated only by the cross-layer merger (dropped on
/// overlap loss) and by the required-fields rule (flips `masked` to false).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this detection
    pub id: String,
    /// PII category
    pub category: PiiCategory,
    /// Verbatim matched text
    pub value: String,
    /// Confidence score in [0, 1]
    pub confidence: f32,
    /// Enclosing bounding box; `Rect::ZERO` when geometry is unknown
    pub bbox: Rect,
    /// Zero-based page index
    pub page_index: u32,
    /// False when `bbox` is the alignment sentinel and must not be trusted
    pub geometry_resolved: bool,
    /// Whether the region should be painted over
    pub masked: bool,
    /// Which detection layer produced this entity
    pub source_layer: SourceLayer,
}

impl Entity {
    pub fn new(
        category: PiiCategory,
        value: impl Into<String>,
        confidence: f32,
        bbox: Rect,
        page_index: u32,
        source_layer: SourceLayer,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            category,
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            bbox,
            page_index,
            geometry_resolved: !bbox.is_empty(),
            masked: true,
            source_layer,
        }
    }

    pub fn set_confidence(&mut self, confidence: f32) {
        self.confidence = confidence.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("aadhaar", PiiCategory::NationalId; "aadhaar synonym")]
    #[test_case("AADHAR", PiiCategory::NationalId; "uppercase misspelled synonym")]
    #[test_case("PAN number", PiiCategory::TaxId; "pan with space")]
    #[test_case("credit_card", PiiCategory::CardNumber; "underscore separator")]
    #[test_case("Mobile Number", PiiCategory::Phone; "mobile")]
    #[test_case("person name", PiiCategory::Name; "person name")]
    #[test_case("residential-address", PiiCategory::Address; "address hyphenated")]
    #[test_case("Diagnosis", PiiCategory::Medical; "medical")]
    #[test_case("Email Address", PiiCategory::Email; "email")]
    #[test_case("DOB", PiiCategory::DateOfBirth; "dob abbreviation")]
    #[test_case("zodiac sign", PiiCategory::GenericSensitive; "unknown label")]
    #[test_case("", PiiCategory::GenericSensitive; "empty label")]
    fn test_category_from_label(label: &str, expected: PiiCategory) {
        assert_eq!(PiiCategory::from_label(label), expected);
    }

    #[test]
    fn test_category_serde_uses_kebab_case() {
        let json = serde_json::to_string(&PiiCategory::DateOfBirth).unwrap();
        assert_eq!(json, "\"date-of-birth\"");
    }

    #[test]
    fn test_entity_flags_unresolved_geometry() {
        let e = Entity::new(
            PiiCategory::Phone,
            "9876543210",
            0.9,
            Rect::ZERO,
            0,
            SourceLayer::Deterministic,
        );
        assert!(!e.geometry_resolved);
        assert!(e.masked);
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let a = Entity::new(PiiCategory::Email, "a@b.c", 1.0, bbox, 0, SourceLayer::Semantic);
        let b = Entity::new(PiiCategory::Email, "a@b.c", 1.0, bbox, 0, SourceLayer::Semantic);
        assert_ne!(a.id, b.id);
    }
}
