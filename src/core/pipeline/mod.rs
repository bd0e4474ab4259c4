//! Per-page redaction pipeline
//!
//! Drives the detection layers over one document: deterministic scan,
//! semantic classification with retry and fallback, phrase-to-zone
//! matching, the optional heuristic layer, and cross-layer merging.
//! Pages are processed serially and independently; a failure of the
//! semantic layer degrades the result to the surviving layers instead of
//! failing the request.

pub mod progress;
pub mod report;
pub mod retry;

pub use progress::{PipelineStage, ProgressEvent, ProgressReporter};
pub use report::{DetectionReport, PageReport};
pub use retry::RetryPolicy;

use crate::adapters::classifier::{LabeledPhrase, SemanticClassifier};
use crate::core::alignment::AlignmentEngine;
use crate::core::merge::{merge_layers, MergePolicy};
use crate::core::zones::PhraseMatcher;
use crate::core::MatchingConfig;
use crate::detection::{DeterministicMatcher, HeuristicDetector};
use crate::domain::{
    BlackoutError, Entity, OcrDocument, OcrPage, PiiCategory, Result, SourceLayer, SpatialEntry,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Confidence assigned to entities lifted from classifier phrase zones
const SEMANTIC_ZONE_CONFIDENCE: f32 = 0.9;

/// Cooperative cancellation handle
///
/// Cloneable; the caller keeps one clone and flips it from any task. The
/// pipeline polls it between stages, so an in-flight stage always runs to
/// completion.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Final pipeline output for one document
pub struct PipelineOutcome {
    pub entities: Vec<Entity>,
    pub report: DetectionReport,
}

/// Orchestrates the detection layers over a document
pub struct RedactionPipeline {
    matcher: DeterministicMatcher,
    classifier: Option<Arc<dyn SemanticClassifier>>,
    heuristic: Option<Arc<dyn HeuristicDetector>>,
    matching: MatchingConfig,
    merge_policy: MergePolicy,
    primary_retry: RetryPolicy,
    fallback_retry: RetryPolicy,
    required_categories: Vec<String>,
    cancel: CancelFlag,
}

impl RedactionPipeline {
    pub fn new(matcher: DeterministicMatcher) -> Self {
        Self {
            matcher,
            classifier: None,
            heuristic: None,
            matching: MatchingConfig::default(),
            merge_policy: MergePolicy::default(),
            primary_retry: RetryPolicy::new(3, Duration::from_millis(500), 1.5),
            fallback_retry: RetryPolicy::new(2, Duration::from_millis(500), 1.5),
            required_categories: Vec::new(),
            cancel: CancelFlag::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn SemanticClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_heuristic(mut self, heuristic: Arc<dyn HeuristicDetector>) -> Self {
        self.heuristic = Some(heuristic);
        self
    }

    pub fn with_matching(mut self, matching: MatchingConfig) -> Self {
        self.matching = matching;
        self
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_retry(mut self, primary: RetryPolicy, fallback: RetryPolicy) -> Self {
        self.primary_retry = primary;
        self.fallback_retry = fallback;
        self
    }

    /// Category labels forwarded to the classifier as keep-visible hints
    pub fn with_required_categories(mut self, categories: Vec<String>) -> Self {
        self.required_categories = categories;
        self
    }

    /// Handle the caller can use to abort processing between stages
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Process every page serially and return merged entities plus a report.
    ///
    /// Progress events, when a sender is supplied, carry a monotonically
    /// non-decreasing completion percentage across the whole document.
    pub async fn process_document(
        &self,
        document: &OcrDocument,
        progress: Option<UnboundedSender<ProgressEvent>>,
    ) -> Result<PipelineOutcome> {
        let mut reporter = ProgressReporter::new(progress, document.pages.len() as u32);
        let mut all_entities = Vec::new();
        let mut page_reports = Vec::new();
        let mut degraded = false;

        for page in &document.pages {
            let entities = self.process_page(page, &mut reporter, &mut degraded).await?;
            page_reports.push(PageReport::from_entities(page.page_index, &entities));
            all_entities.extend(entities);
        }

        let last_page = document.pages.last().map(|p| p.page_index).unwrap_or(0);
        reporter.finish(last_page);

        tracing::info!(
            pages = document.pages.len(),
            entities = all_entities.len(),
            degraded = degraded,
            "Document processing complete"
        );

        Ok(PipelineOutcome {
            entities: all_entities,
            report: DetectionReport::new(page_reports, degraded),
        })
    }

    async fn process_page(
        &self,
        page: &OcrPage,
        reporter: &mut ProgressReporter,
        degraded: &mut bool,
    ) -> Result<Vec<Entity>> {
        self.check_cancelled()?;
        reporter.report(page.page_index, PipelineStage::TokenIndexing);

        // Some OCR engines deliver tokens without a page text; synthesize
        // one so offset alignment stays meaningful.
        let synthesized;
        let page = if page.full_text.trim().is_empty() && !page.tokens.is_empty() {
            synthesized = OcrPage {
                page_index: page.page_index,
                full_text: OcrPage::join_tokens(&page.tokens),
                tokens: page.tokens.clone(),
            };
            &synthesized
        } else {
            page
        };

        let engine = AlignmentEngine::new(&page.tokens, &page.full_text, &self.matching);

        self.check_cancelled()?;
        reporter.report(page.page_index, PipelineStage::DeterministicScan);
        let mut entities = self.matcher.detect(&page, &engine);

        self.check_cancelled()?;
        reporter.report(page.page_index, PipelineStage::Classification);
        let phrases = self.classify(&page.full_text, page.page_index, degraded).await?;

        self.check_cancelled()?;
        reporter.report(page.page_index, PipelineStage::PhraseMatching);
        entities.extend(self.phrases_to_entities(&page, &phrases));

        if let Some(ref heuristic) = self.heuristic {
            match heuristic.detect(&page) {
                Ok(found) => entities.extend(found),
                // A heuristic failure degrades like a classifier failure
                Err(e) => {
                    tracing::warn!(page = page.page_index, error = %e, "Heuristic layer failed, continuing without it");
                    *degraded = true;
                }
            }
        }

        self.check_cancelled()?;
        reporter.report(page.page_index, PipelineStage::Merging);
        let merged = merge_layers(entities, &self.merge_policy);

        reporter.report(page.page_index, PipelineStage::Complete);
        Ok(merged)
    }

    /// Call the classifier with retry; fall back to the legacy entity call,
    /// then degrade to an empty phrase list.
    async fn classify(
        &self,
        text: &str,
        page_index: u32,
        degraded: &mut bool,
    ) -> Result<Vec<LabeledPhrase>> {
        let Some(ref classifier) = self.classifier else {
            return Ok(Vec::new());
        };

        let cancel = self.cancel.clone();
        let primary = retry::retry_classifier(
            &self.primary_retry,
            || cancel.is_cancelled(),
            || classifier.forbidden_phrases(text, &self.required_categories),
        )
        .await;

        let primary_error = match primary {
            Ok(phrases) => {
                return Ok(phrases
                    .into_iter()
                    .map(|text| LabeledPhrase {
                        text,
                        category: None,
                    })
                    .collect());
            }
            Err(e) => e,
        };
        self.check_cancelled()?;

        tracing::warn!(
            page = page_index,
            error = %primary_error,
            "Primary classifier call failed, trying legacy entity call"
        );

        let cancel = self.cancel.clone();
        let fallback = retry::retry_classifier(
            &self.fallback_retry,
            || cancel.is_cancelled(),
            || classifier.classify_entities(text, &self.required_categories),
        )
        .await;

        match fallback {
            Ok(labeled) => Ok(labeled),
            Err(e) => {
                self.check_cancelled()?;
                tracing::warn!(
                    page = page_index,
                    error = %e,
                    "Semantic layer unavailable, degrading to remaining layers"
                );
                *degraded = true;
                Ok(Vec::new())
            }
        }
    }

    /// Match classifier phrases onto the page tokens and lift the resulting
    /// zones into semantic-layer entities. Phrases are grouped by mapped
    /// category so a labeled legacy response keeps its labels.
    fn phrases_to_entities(&self, page: &OcrPage, phrases: &[LabeledPhrase]) -> Vec<Entity> {
        if phrases.is_empty() || page.tokens.is_empty() {
            return Vec::new();
        }

        let mut by_category: BTreeMap<&'static str, (PiiCategory, Vec<String>)> = BTreeMap::new();
        for phrase in phrases {
            let category = phrase
                .category
                .as_deref()
                .map(PiiCategory::from_label)
                .unwrap_or(PiiCategory::GenericSensitive);
            by_category
                .entry(category.label())
                .or_insert_with(|| (category, Vec::new()))
                .1
                .push(phrase.text.clone());
        }

        // Entries persist across groups so a token claimed by one phrase is
        // not re-claimed by another category's single-word pass.
        let mut entries: Vec<SpatialEntry> =
            page.tokens.iter().cloned().map(SpatialEntry::from).collect();
        let matcher = PhraseMatcher::new(&self.matching);

        let mut entities = Vec::new();
        for (category, texts) in by_category.into_values() {
            let zones = matcher.match_phrases(&mut entries, &texts, page.page_index);
            for zone in zones {
                entities.push(Entity::new(
                    category,
                    zone.matched_phrase,
                    SEMANTIC_ZONE_CONFIDENCE,
                    zone.rect,
                    zone.page_index,
                    SourceLayer::Semantic,
                ));
            }
        }

        tracing::debug!(
            page = page.page_index,
            count = entities.len(),
            "Semantic zones lifted to entities"
        );
        entities
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            tracing::info!("Processing cancelled between stages");
            return Err(BlackoutError::Cancelled);
        }
        Ok(())
    }
}
