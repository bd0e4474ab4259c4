//! Redact command implementation
//!
//! Reads an OCR document from JSON, runs the detection pipeline, and
//! writes the redaction regions (or, in dry-run mode, the detection
//! report) as JSON.

use crate::adapters::classifier::HttpClassifier;
use crate::config::{load_config, BlackoutConfig, DetectionConfig};
use crate::core::merge::MergePolicy;
use crate::core::pipeline::{ProgressEvent, RedactionPipeline, RetryPolicy};
use crate::detection::{DeterministicMatcher, PatternRegistry};
use crate::domain::{BlackoutError, OcrDocument, PiiCategory};
use clap::Args;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Path to the OCR document JSON
    #[arg(short, long)]
    pub input: String,

    /// Output path for redaction regions; defaults to <input>.redactions.json
    #[arg(short, long)]
    pub output: Option<String>,

    /// Report detections without writing redaction output
    #[arg(long)]
    pub dry_run: bool,

    /// Print per-stage progress to stderr
    #[arg(long)]
    pub progress: bool,
}

impl RedactArgs {
    /// Execute the redact command
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input, config_path = %config_path, "Starting redaction");

        let config = match self.load_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let document = match self.read_document() {
            Ok(d) => d,
            Err(e) => {
                println!("❌ Failed to read OCR document: {}", self.input);
                println!("   Error: {e}");
                return Ok(3);
            }
        };

        println!("🔍 Processing {} page(s) from {}", document.pages.len(), self.input);

        let pipeline = match build_pipeline(&config) {
            Ok(p) => p,
            Err(e) => {
                println!("❌ Failed to build pipeline");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        // Flip the cancel flag when the shutdown channel fires; the
        // pipeline stops at the next stage boundary.
        let cancel = pipeline.cancel_flag();
        tokio::spawn(async move {
            if shutdown_signal.changed().await.is_ok() && *shutdown_signal.borrow() {
                cancel.cancel();
            }
        });

        let progress_tx = if self.progress {
            let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<ProgressEvent>();
            tokio::spawn(async move {
                while let Some(event) = rx.recv().await {
                    eprintln!(
                        "  [{:>5.1}%] page {} - {}",
                        event.percent,
                        event.page_index,
                        event.stage.label()
                    );
                }
            });
            Some(tx)
        } else {
            None
        };

        let dry_run = self.dry_run || config.application.dry_run;
        let outcome = match pipeline.process_document(&document, progress_tx).await {
            Ok(outcome) => outcome,
            Err(BlackoutError::Cancelled) => {
                println!("⚠️  Redaction cancelled before completion; no output written");
                return Ok(130);
            }
            Err(e) => {
                println!("❌ Redaction failed");
                println!("   Error: {e}");
                return Ok(5);
            }
        };

        if outcome.report.degraded {
            println!("⚠️  Semantic layer unavailable; results cover the remaining layers only");
        }
        println!(
            "✅ Found {} entities ({} masked, {} without geometry)",
            outcome.report.total_entities,
            outcome.report.masked_entities,
            outcome.report.unresolved_geometry
        );

        if dry_run {
            println!("{}", serde_json::to_string_pretty(&outcome.report)?);
            return Ok(0);
        }

        let output_path = self
            .output
            .clone()
            .unwrap_or_else(|| format!("{}.redactions.json", self.input));
        std::fs::write(&output_path, serde_json::to_string_pretty(&outcome.entities)?)?;
        println!("📝 Redaction regions written to {output_path}");

        Ok(0)
    }

    /// Load the configuration, falling back to defaults when the default
    /// config file is simply absent. An explicitly passed path must exist.
    fn load_or_default(&self, config_path: &str) -> crate::domain::Result<BlackoutConfig> {
        if !Path::new(config_path).exists() && config_path == "blackout.toml" {
            tracing::info!("No configuration file found, using defaults");
            return Ok(BlackoutConfig::default());
        }
        load_config(config_path)
    }

    fn read_document(&self) -> crate::domain::Result<OcrDocument> {
        let contents = std::fs::read_to_string(&self.input)?;
        let document: OcrDocument = serde_json::from_str(&contents)?;
        if document.pages.is_empty() {
            return Err(BlackoutError::InvalidInput(
                "OCR document contains no pages".to_string(),
            ));
        }
        Ok(document)
    }
}

/// Assemble the pipeline from configuration
fn build_pipeline(config: &BlackoutConfig) -> crate::domain::Result<RedactionPipeline> {
    let matcher = match config.detection.pattern_library {
        Some(ref path) => {
            let registry = PatternRegistry::from_file(path)
                .map_err(|e| BlackoutError::Configuration(e.to_string()))?;
            DeterministicMatcher::with_registry(registry)
        }
        None => DeterministicMatcher::new()
            .map_err(|e| BlackoutError::Configuration(e.to_string()))?,
    };

    let mut pipeline = RedactionPipeline::new(matcher)
        .with_matching(config.matching.clone())
        .with_merge_policy(merge_policy(&config.detection))
        .with_required_categories(config.detection.required_categories.clone());

    if let Some(ref classifier_config) = config.classifier {
        let classifier = HttpClassifier::new(classifier_config)?;
        let initial_delay = Duration::from_millis(classifier_config.retry.initial_delay_ms);
        pipeline = pipeline.with_classifier(Arc::new(classifier)).with_retry(
            RetryPolicy::new(
                classifier_config.retry.max_attempts,
                initial_delay,
                classifier_config.retry.backoff_multiplier,
            ),
            RetryPolicy::new(
                classifier_config.retry.fallback_attempts,
                initial_delay,
                classifier_config.retry.backoff_multiplier,
            ),
        );
    }

    Ok(pipeline)
}

fn merge_policy(detection: &DetectionConfig) -> MergePolicy {
    MergePolicy {
        overlap_ratio: detection.overlap_ratio,
        confidence_threshold: detection.confidence_threshold,
        required_categories: detection
            .required_categories
            .iter()
            .map(|label| PiiCategory::from_label(label))
            .collect(),
    }
}
