//! Axis-aligned collision rectangles
//!
//! Screen space: +x right, +y down. A rectangle is its top-left corner plus size.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test. Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Shrink by `inset` on every side.
    ///
    /// The inset is clamped to half the smaller side so the result never
    /// inverts and always stays inside `self`.
    pub fn inset(&self, inset: f32) -> Rect {
        let max_inset = self.size.min_element() * 0.5;
        let inset = inset.clamp(0.0, max_inset);
        Rect {
            pos: self.pos + Vec2::splat(inset),
            size: self.size - Vec2::splat(inset * 2.0),
        }
    }

    /// True if `other` lies entirely within `self` (edges may touch)
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left() >= self.left()
            && other.right() <= self.right()
            && other.top() >= self.top()
            && other.bottom() <= self.bottom()
    }

    /// True once the rectangle has scrolled fully past the left viewport edge
    pub fn is_off_left(&self) -> bool {
        self.right() <= 0.0
    }
}
