//! Zone merge/compaction
//!
//! Phrase matching can emit several zones for the same line of text (one
//! per phrase occurrence plus single-word hits). Folding adjacent zones
//! into one rectangle bounds the number of visually redundant overlapping
//! rectangles painted later.

use crate::core::MatchingConfig;
use crate::domain::RedactionZone;

/// Fold adjacent zones into single rectangles.
///
/// Zones are sorted by page, then by vertical row bucket, then by x. Two
/// consecutive zones merge when they are on the same page and their
/// rectangles overlap or sit within the configured gap in both axes.
/// Merging unions the rectangles and concatenates phrase labels and token
/// lists. A list that is already pairwise non-adjacent comes back
/// unchanged.
pub fn compact_zones(mut zones: Vec<RedactionZone>, config: &MatchingConfig) -> Vec<RedactionZone> {
    if zones.len() < 2 {
        return zones;
    }

    let bucket = |y: f32| -> i64 {
        if config.row_tolerance_px > 0.0 {
            (y / config.row_tolerance_px).floor() as i64
        } else {
            y.floor() as i64
        }
    };

    zones.sort_by(|a, b| {
        a.page_index
            .cmp(&b.page_index)
            .then(bucket(a.rect.y).cmp(&bucket(b.rect.y)))
            .then(a.rect.x.total_cmp(&b.rect.x))
    });

    let mut compacted: Vec<RedactionZone> = Vec::with_capacity(zones.len());
    for zone in zones {
        match compacted.last_mut() {
            Some(last)
                if last.page_index == zone.page_index
                    && last.rect.within_gap(&zone.rect, config.merge_gap_px) =>
            {
                last.absorb(zone);
            }
            _ => compacted.push(zone),
        }
    }

    compacted
}
