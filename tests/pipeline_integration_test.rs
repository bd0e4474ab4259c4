//! End-to-end tests for the redaction pipeline over synthetic OCR documents

use async_trait::async_trait;
use blackout::adapters::classifier::{LabeledPhrase, SemanticClassifier};
use blackout::core::merge::MergePolicy;
use blackout::core::pipeline::{RedactionPipeline, RetryPolicy};
use blackout::detection::DeterministicMatcher;
use blackout::domain::{
    ClassifierError, OcrDocument, OcrPage, PiiCategory, Rect, SourceLayer, Token,
};
use std::sync::Arc;
use std::time::Duration;

/// Build a single-row page from words, 60px apart
fn page(page_index: u32, words: &[&str]) -> OcrPage {
    let tokens: Vec<Token> = words
        .iter()
        .enumerate()
        .map(|(i, w)| {
            Token::new(
                *w,
                0.95,
                Rect::new(i as f32 * 60.0, 40.0, 50.0, 12.0),
                page_index,
            )
        })
        .collect();
    OcrPage {
        page_index,
        full_text: words.join(" "),
        tokens,
    }
}

/// Classifier stub returning a fixed phrase list
struct FixedClassifier(Vec<String>);

#[async_trait]
impl SemanticClassifier for FixedClassifier {
    async fn forbidden_phrases(
        &self,
        _text: &str,
        _required: &[String],
    ) -> Result<Vec<String>, ClassifierError> {
        Ok(self.0.clone())
    }

    async fn classify_entities(
        &self,
        _text: &str,
        _required: &[String],
    ) -> Result<Vec<LabeledPhrase>, ClassifierError> {
        Ok(Vec::new())
    }
}

/// Classifier stub that always fails with a non-retryable error
struct BrokenClassifier;

#[async_trait]
impl SemanticClassifier for BrokenClassifier {
    async fn forbidden_phrases(
        &self,
        _text: &str,
        _required: &[String],
    ) -> Result<Vec<String>, ClassifierError> {
        Err(ClassifierError::ConnectionFailed("refused".to_string()))
    }

    async fn classify_entities(
        &self,
        _text: &str,
        _required: &[String],
    ) -> Result<Vec<LabeledPhrase>, ClassifierError> {
        Err(ClassifierError::ConnectionFailed("refused".to_string()))
    }
}

fn pipeline() -> RedactionPipeline {
    RedactionPipeline::new(DeterministicMatcher::new().unwrap()).with_retry(
        RetryPolicy::new(3, Duration::from_millis(1), 1.5),
        RetryPolicy::new(2, Duration::from_millis(1), 1.5),
    )
}

#[tokio::test]
async fn test_discharge_summary_end_to_end() {
    // A realistic page: name, valid national ID, phone, email
    let doc = OcrDocument {
        pages: vec![page(
            0,
            &[
                "Discharge", "Summary", "Patient:", "Asha", "Kulkarni", "ID:", "234567890124",
                "Phone:", "9876543210", "Email:", "asha.k@example.com",
            ],
        )],
    };

    let classifier = Arc::new(FixedClassifier(vec!["Asha Kulkarni".to_string()]));
    let pipeline = pipeline().with_classifier(classifier);

    let outcome = pipeline.process_document(&doc, None).await.unwrap();

    // Valid checksum promotes the national ID to full confidence
    let national_id = outcome
        .entities
        .iter()
        .find(|e| e.category == PiiCategory::NationalId)
        .expect("national id detected");
    assert_eq!(national_id.confidence, 1.0);
    assert!(national_id.geometry_resolved);

    assert!(outcome.entities.iter().any(|e| e.category == PiiCategory::Phone));
    assert!(outcome.entities.iter().any(|e| e.category == PiiCategory::Email));

    // The classifier phrase became a semantic entity covering both name tokens
    let name_zone = outcome
        .entities
        .iter()
        .find(|e| e.source_layer == SourceLayer::Semantic)
        .expect("semantic zone present");
    assert!(name_zone.bbox.w > 100.0, "zone spans two tokens");
    assert!(!outcome.report.degraded);
    assert!(outcome.entities.iter().all(|e| e.masked));
}

#[tokio::test]
async fn test_multi_page_document_keeps_page_indices() {
    let doc = OcrDocument {
        pages: vec![
            page(0, &["phone", "9876543210"]),
            page(1, &["mail", "a@b.example.com"]),
        ],
    };

    let outcome = pipeline().process_document(&doc, None).await.unwrap();

    let phone = outcome
        .entities
        .iter()
        .find(|e| e.category == PiiCategory::Phone)
        .unwrap();
    let email = outcome
        .entities
        .iter()
        .find(|e| e.category == PiiCategory::Email)
        .unwrap();
    assert_eq!(phone.page_index, 0);
    assert_eq!(email.page_index, 1);
    assert_eq!(outcome.report.total_pages, 2);
    assert_eq!(outcome.report.pages[0].page_index, 0);
    assert_eq!(outcome.report.pages[1].page_index, 1);
}

#[tokio::test]
async fn test_broken_classifier_degrades_to_deterministic() {
    let doc = OcrDocument {
        pages: vec![page(0, &["Patient", "Asha", "Kulkarni", "phone", "9876543210"])],
    };

    let pipeline = pipeline().with_classifier(Arc::new(BrokenClassifier));
    let outcome = pipeline.process_document(&doc, None).await.unwrap();

    assert!(outcome.report.degraded);
    // The phone number still came out of the deterministic layer
    assert!(outcome
        .entities
        .iter()
        .any(|e| e.category == PiiCategory::Phone && e.source_layer == SourceLayer::Deterministic));
    // The name is gone: no semantic layer, no dictionary
    assert!(!outcome.entities.iter().any(|e| e.category == PiiCategory::Name));
}

#[tokio::test]
async fn test_required_category_stays_visible() {
    let doc = OcrDocument {
        pages: vec![page(0, &["Patient", "Asha", "Kulkarni", "phone", "9876543210"])],
    };

    let classifier = Arc::new(FixedClassifier(vec!["Asha Kulkarni".to_string()]));
    let pipeline = pipeline()
        .with_classifier(classifier)
        .with_merge_policy(MergePolicy {
            required_categories: vec![PiiCategory::GenericSensitive],
            ..Default::default()
        });

    let outcome = pipeline.process_document(&doc, None).await.unwrap();

    let name_zone = outcome
        .entities
        .iter()
        .find(|e| e.source_layer == SourceLayer::Semantic)
        .unwrap();
    assert!(!name_zone.masked, "required category must stay visible");

    let phone = outcome
        .entities
        .iter()
        .find(|e| e.category == PiiCategory::Phone)
        .unwrap();
    assert!(phone.masked);
}

#[tokio::test]
async fn test_confidence_threshold_drops_demoted_matches() {
    // 234567890125 fails the checksum and is demoted to 0.6
    let doc = OcrDocument {
        pages: vec![page(0, &["ID:", "234567890125"])],
    };

    let pipeline = pipeline().with_merge_policy(MergePolicy {
        confidence_threshold: 0.7,
        ..Default::default()
    });
    let outcome = pipeline.process_document(&doc, None).await.unwrap();

    assert!(
        !outcome.entities.iter().any(|e| e.category == PiiCategory::NationalId),
        "demoted match below threshold must be filtered"
    );
}

#[tokio::test]
async fn test_cancellation_stops_document() {
    let doc = OcrDocument {
        pages: vec![page(0, &["phone", "9876543210"])],
    };

    let pipeline = pipeline();
    pipeline.cancel_flag().cancel();

    let result = pipeline.process_document(&doc, None).await;
    assert!(matches!(
        result,
        Err(blackout::domain::BlackoutError::Cancelled)
    ));
}

#[tokio::test]
async fn test_unmatched_phrase_produces_no_zone() {
    let doc = OcrDocument {
        pages: vec![page(0, &["nothing", "interesting", "here"])],
    };

    let classifier = Arc::new(FixedClassifier(vec!["Rajesh Sharma".to_string()]));
    let pipeline = pipeline().with_classifier(classifier);

    let outcome = pipeline.process_document(&doc, None).await.unwrap();
    assert!(outcome.entities.is_empty());
}

#[tokio::test]
async fn test_phrase_with_ocr_punctuation_still_matches() {
    // OCR glued a comma onto the surname; normalization absorbs it
    let doc = OcrDocument {
        pages: vec![page(0, &["Mr.", "Rajesh", "Sharma,", "visited"])],
    };

    let classifier = Arc::new(FixedClassifier(vec!["Rajesh Sharma".to_string()]));
    let pipeline = pipeline().with_classifier(classifier);

    let outcome = pipeline.process_document(&doc, None).await.unwrap();
    let zone = outcome
        .entities
        .iter()
        .find(|e| e.source_layer == SourceLayer::Semantic)
        .expect("zone despite punctuation");
    assert_eq!(zone.page_index, 0);
    assert!(zone.geometry_resolved);
}
