//! Cross-layer entity merging
//!
//! The detection layers run independently and routinely report the same
//! region: a card number found by regex is often also inside a forbidden
//! phrase from the classifier. This module collapses the union of all
//! layers into one deduplicated, thresholded list.

use crate::domain::{Entity, PiiCategory};

/// Merger policy
///
/// The overlap ratio is measured against the smaller entity's area, not
/// full IoU, so a large zone swallowing a small one still counts as a
/// conflict.
#[derive(Debug, Clone)]
pub struct MergePolicy {
    /// Conflict when intersection exceeds this fraction of the smaller area
    pub overlap_ratio: f32,
    /// Entities below this confidence are dropped after dedup
    pub confidence_threshold: f32,
    /// Categories forced to stay visible (`masked = false`)
    pub required_categories: Vec<PiiCategory>,
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            overlap_ratio: 0.5,
            confidence_threshold: 0.0,
            required_categories: Vec::new(),
        }
    }
}

/// Deduplicate, filter, and apply the keep-visible rule.
///
/// Entities are sorted by confidence descending (stable for ties) and
/// accepted greedily; an entity loses when its bbox conflicts with an
/// already-accepted entity on the same page. Losers are dropped, not
/// merged. Unresolved-geometry sentinels have zero area and therefore
/// never conflict; they survive dedup and are flagged to the caller
/// through `geometry_resolved` instead.
pub fn merge_layers(mut entities: Vec<Entity>, policy: &MergePolicy) -> Vec<Entity> {
    // Stable sort keeps layer emission order for equal confidences
    entities.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut accepted: Vec<Entity> = Vec::with_capacity(entities.len());
    for entity in entities {
        let conflict = accepted.iter().any(|kept| conflicts(kept, &entity, policy));
        if conflict {
            tracing::trace!(
                category = entity.category.label(),
                confidence = entity.confidence,
                "Dropping entity on overlap conflict"
            );
            continue;
        }
        accepted.push(entity);
    }

    accepted.retain(|e| e.confidence >= policy.confidence_threshold);

    for entity in &mut accepted {
        if policy.required_categories.contains(&entity.category) {
            entity.masked = false;
        }
    }

    accepted
}

fn conflicts(a: &Entity, b: &Entity, policy: &MergePolicy) -> bool {
    if a.page_index != b.page_index {
        return false;
    }
    let smaller = a.bbox.area().min(b.bbox.area());
    if smaller <= 0.0 {
        return false;
    }
    a.bbox.intersection_area(&b.bbox) > policy.overlap_ratio * smaller
}
