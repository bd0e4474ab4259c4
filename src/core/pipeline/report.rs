//! Detection report
//!
//! A summary of what was detected and what will be painted, suitable for
//! dry runs and audit logs. The report carries counts and categories only,
//! never the matched values themselves.

use crate::domain::{Entity, SourceLayer};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-page detection summary
#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub page_index: u32,
    pub total_entities: usize,
    pub masked_entities: usize,
    /// Entities whose geometry could not be resolved to a bounding box
    pub unresolved_geometry: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_layer: BTreeMap<String, usize>,
}

impl PageReport {
    pub fn from_entities(page_index: u32, entities: &[Entity]) -> Self {
        let mut by_category = BTreeMap::new();
        let mut by_layer = BTreeMap::new();

        for entity in entities {
            *by_category
                .entry(entity.category.label().to_string())
                .or_insert(0) += 1;
            let layer = match entity.source_layer {
                SourceLayer::Deterministic => "deterministic",
                SourceLayer::Semantic => "semantic",
                SourceLayer::Heuristic => "heuristic",
            };
            *by_layer.entry(layer.to_string()).or_insert(0) += 1;
        }

        Self {
            page_index,
            total_entities: entities.len(),
            masked_entities: entities.iter().filter(|e| e.masked).count(),
            unresolved_geometry: entities.iter().filter(|e| !e.geometry_resolved).count(),
            by_category,
            by_layer,
        }
    }
}

/// Whole-document detection summary
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub generated_at: DateTime<Utc>,
    pub total_pages: usize,
    pub total_entities: usize,
    pub masked_entities: usize,
    pub unresolved_geometry: usize,
    /// True when the semantic layer failed and only surviving layers ran
    pub degraded: bool,
    pub pages: Vec<PageReport>,
}

impl DetectionReport {
    pub fn new(pages: Vec<PageReport>, degraded: bool) -> Self {
        Self {
            generated_at: Utc::now(),
            total_pages: pages.len(),
            total_entities: pages.iter().map(|p| p.total_entities).sum(),
            masked_entities: pages.iter().map(|p| p.masked_entities).sum(),
            unresolved_geometry: pages.iter().map(|p| p.unresolved_geometry).sum(),
            degraded,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PiiCategory, Rect};

    fn entity(category: PiiCategory, layer: SourceLayer, bbox: Rect, masked: bool) -> Entity {
        let mut e = Entity::new(category, "value", 0.9, bbox, 0, layer);
        e.masked = masked;
        e
    }

    #[test]
    fn test_page_report_counts() {
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let entities = vec![
            entity(PiiCategory::Phone, SourceLayer::Deterministic, bbox, true),
            entity(PiiCategory::Phone, SourceLayer::Deterministic, bbox, true),
            entity(PiiCategory::Name, SourceLayer::Semantic, Rect::ZERO, false),
        ];

        let report = PageReport::from_entities(0, &entities);
        assert_eq!(report.total_entities, 3);
        assert_eq!(report.masked_entities, 2);
        assert_eq!(report.unresolved_geometry, 1);
        assert_eq!(report.by_category["phone"], 2);
        assert_eq!(report.by_category["name"], 1);
        assert_eq!(report.by_layer["deterministic"], 2);
        assert_eq!(report.by_layer["semantic"], 1);
    }

    #[test]
    fn test_document_report_aggregates() {
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let p0 = PageReport::from_entities(
            0,
            &[entity(PiiCategory::Email, SourceLayer::Deterministic, bbox, true)],
        );
        let p1 = PageReport::from_entities(
            1,
            &[entity(PiiCategory::TaxId, SourceLayer::Deterministic, bbox, true)],
        );

        let report = DetectionReport::new(vec![p0, p1], true);
        assert_eq!(report.total_pages, 2);
        assert_eq!(report.total_entities, 2);
        assert!(report.degraded);
    }

    #[test]
    fn test_report_serializes_without_values() {
        let bbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        let page = PageReport::from_entities(
            0,
            &[entity(PiiCategory::NationalId, SourceLayer::Deterministic, bbox, true)],
        );
        let json = serde_json::to_string(&DetectionReport::new(vec![page], false)).unwrap();
        assert!(json.contains("national-id"));
        assert!(!json.contains("\"value\""));
    }
}
