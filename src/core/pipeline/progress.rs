//! Pipeline progress reporting
//!
//! Progress is a monotonic percentage derived from (page, stage) pairs.
//! Events are pushed over an unbounded channel so a slow listener can
//! never stall the pipeline; a dropped receiver is silently ignored.

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;

/// Ordered stages of per-page processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    TokenIndexing,
    DeterministicScan,
    Classification,
    PhraseMatching,
    Merging,
    Complete,
}

pub const STAGE_COUNT: u32 = 6;

impl PipelineStage {
    pub fn index(&self) -> u32 {
        match self {
            Self::TokenIndexing => 0,
            Self::DeterministicScan => 1,
            Self::Classification => 2,
            Self::PhraseMatching => 3,
            Self::Merging => 4,
            Self::Complete => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TokenIndexing => "token indexing",
            Self::DeterministicScan => "deterministic scan",
            Self::Classification => "classification",
            Self::PhraseMatching => "phrase matching",
            Self::Merging => "merging",
            Self::Complete => "complete",
        }
    }
}

/// One progress update
#[derive(Debug, Clone, Serialize)]
pub struct ProgressEvent {
    pub page_index: u32,
    pub stage: PipelineStage,
    /// Overall completion in [0, 100], never decreasing
    pub percent: f32,
}

/// Tracks and emits monotonic progress across a whole document
pub struct ProgressReporter {
    sender: Option<UnboundedSender<ProgressEvent>>,
    total_pages: u32,
    last_percent: f32,
}

impl ProgressReporter {
    pub fn new(sender: Option<UnboundedSender<ProgressEvent>>, total_pages: u32) -> Self {
        Self {
            sender,
            total_pages: total_pages.max(1),
            last_percent: 0.0,
        }
    }

    /// Report entry into a stage. Percentages are clamped so they never
    /// move backwards even if stages are re-entered.
    pub fn report(&mut self, page_index: u32, stage: PipelineStage) {
        let done = page_index * STAGE_COUNT + stage.index();
        let total = self.total_pages * STAGE_COUNT;
        let percent = (done as f32 / total as f32 * 100.0).min(100.0);
        let percent = percent.max(self.last_percent);
        self.last_percent = percent;

        tracing::debug!(
            page = page_index,
            stage = stage.label(),
            percent = percent,
            "Pipeline progress"
        );

        if let Some(ref sender) = self.sender {
            let _ = sender.send(ProgressEvent {
                page_index,
                stage,
                percent,
            });
        }
    }

    /// Mark the whole document finished
    pub fn finish(&mut self, last_page: u32) {
        self.last_percent = 100.0;
        if let Some(ref sender) = self.sender {
            let _ = sender.send(ProgressEvent {
                page_index: last_page,
                stage: PipelineStage::Complete,
                percent: 100.0,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_is_monotonic() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut reporter = ProgressReporter::new(Some(tx), 2);

        reporter.report(0, PipelineStage::TokenIndexing);
        reporter.report(0, PipelineStage::Merging);
        reporter.report(1, PipelineStage::TokenIndexing);
        reporter.finish(1);

        let mut previous = -1.0f32;
        while let Ok(event) = rx.try_recv() {
            assert!(event.percent >= previous);
            previous = event.percent;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        drop(rx);
        let mut reporter = ProgressReporter::new(Some(tx), 1);
        reporter.report(0, PipelineStage::Classification);
        reporter.finish(0);
    }

    #[test]
    fn test_stage_indices_are_ordered() {
        let stages = [
            PipelineStage::TokenIndexing,
            PipelineStage::DeterministicScan,
            PipelineStage::Classification,
            PipelineStage::PhraseMatching,
            PipelineStage::Merging,
            PipelineStage::Complete,
        ];
        for pair in stages.windows(2) {
            assert!(pair[0].index() < pair[1].index());
        }
        assert_eq!(stages.len() as u32, STAGE_COUNT);
    }
}
