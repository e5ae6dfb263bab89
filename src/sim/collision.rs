//! Axis-aligned bounding box collision
//!
//! Rider and obstacles are plain rectangles, so overlap is a strict
//! interval test on both axes. Edges that merely touch do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangle in canvas coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }
}

/// Check whether two rectangles overlap with positive area
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Index of the first rectangle in `others` that overlaps `subject`
pub fn first_hit<I>(subject: &Rect, others: I) -> Option<usize>
where
    I: IntoIterator<Item = Rect>,
{
    others.into_iter().position(|other| overlaps(subject, &other))
}
