//! Pixel geometry for redaction regions
//!
//! Coordinates are in the pixel space of the page image the OCR engine ran
//! on. Widths and heights are non-negative by construction.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in page-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Zero-size rectangle at the origin, used as the "geometry unknown"
    /// sentinel when alignment fails entirely. Consumers must treat it as
    /// untrusted geometry, not as a valid zero-area redaction.
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 0.0,
        h: 0.0,
    };

    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            x,
            y,
            w: w.max(0.0),
            h: h.max(0.0),
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn area(&self) -> f32 {
        self.w * self.h
    }

    /// True for the zero-size sentinel and any degenerate rectangle
    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }

    /// Smallest rectangle enclosing both rectangles.
    ///
    /// x = min(left), y = min(top), right = max(right), bottom = max(bottom).
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Area of the intersection, 0.0 when disjoint
    pub fn intersection_area(&self, other: &Rect) -> f32 {
        let w = (self.right().min(other.right()) - self.x.max(other.x)).max(0.0);
        let h = (self.bottom().min(other.bottom()) - self.y.max(other.y)).max(0.0);
        w * h
    }

    /// Rectangle grown by `margin` pixels on all four sides
    pub fn inflate(&self, margin: f32) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.w + 2.0 * margin,
            self.h + 2.0 * margin,
        )
    }

    /// Whether the rectangles overlap or sit within `gap` pixels of each
    /// other in both axes
    pub fn within_gap(&self, other: &Rect, gap: f32) -> bool {
        let x_close = self.x - gap <= other.right() && other.x - gap <= self.right();
        let y_close = self.y - gap <= other.bottom() && other.y - gap <= self.bottom();
        x_close && y_close
    }
}
