//! Redaction painting interface
//!
//! Painting is outside this core: the pipeline produces geometry, a
//! painter applies an opaque overwrite onto the page's pixel or vector
//! content. Only entities with `masked = true` are handed over, and each
//! bbox is expected to be expanded by the configured padding before
//! painting.

use crate::domain::{Entity, Result};

/// External collaborator that paints over redaction regions
pub trait RegionPainter: Send + Sync {
    /// Opaquely overwrite each masked entity's bbox, expanded by `padding`
    /// pixels on all sides
    fn paint(&self, entities: &[Entity], padding: f32) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PiiCategory, Rect, SourceLayer};
    use std::sync::Mutex;

    /// Painter that records the rects it would fill
    struct RecordingPainter {
        painted: Mutex<Vec<Rect>>,
    }

    impl RegionPainter for RecordingPainter {
        fn paint(&self, entities: &[Entity], padding: f32) -> Result<()> {
            let mut painted = self.painted.lock().unwrap();
            for entity in entities.iter().filter(|e| e.masked && e.geometry_resolved) {
                painted.push(entity.bbox.inflate(padding));
            }
            Ok(())
        }
    }

    #[test]
    fn test_painter_skips_unmasked_and_sentinel_entities() {
        let masked = Entity::new(
            PiiCategory::Phone,
            "9876543210",
            0.9,
            Rect::new(10.0, 10.0, 80.0, 12.0),
            0,
            SourceLayer::Deterministic,
        );
        let mut visible = masked.clone();
        visible.masked = false;
        let sentinel = Entity::new(
            PiiCategory::Name,
            "unlocatable",
            0.9,
            Rect::ZERO,
            0,
            SourceLayer::Semantic,
        );

        let painter = RecordingPainter {
            painted: Mutex::new(Vec::new()),
        };
        painter.paint(&[masked, visible, sentinel], 2.0).unwrap();

        let painted = painter.painted.lock().unwrap();
        assert_eq!(painted.len(), 1);
        assert_eq!(painted[0].x, 8.0);
        assert_eq!(painted[0].w, 84.0);
    }
}
