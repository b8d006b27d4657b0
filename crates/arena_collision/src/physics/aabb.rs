//! Axis-aligned bounding box used for broad-phase rejection

use crate::foundation::math::Vec2;

/// Axis-aligned bounding box in world coordinates
///
/// Invariant: `min_x <= max_x` and `min_y <= max_y`. Extents may be infinite,
/// which is how half-spaces are represented.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    min_x: f32,
    max_x: f32,
    min_y: f32,
    max_y: f32,
}

impl Aabb2 {
    /// Build from explicit extents
    ///
    /// Swapped bounds are reordered so the invariant always holds.
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            max_x: min_x.max(max_x),
            min_y: min_y.min(max_y),
            max_y: min_y.max(max_y),
        }
    }

    /// A box covering the whole plane
    pub fn unbounded() -> Self {
        Self {
            min_x: f32::NEG_INFINITY,
            max_x: f32::INFINITY,
            min_y: f32::NEG_INFINITY,
            max_y: f32::INFINITY,
        }
    }

    /// Smallest box containing every point, or `None` for an empty slice
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = points.first()?;
        let mut aabb = Self::new(first.x, first.x, first.y, first.y);
        aabb.rebuild_from_points(points);
        Some(aabb)
    }

    /// Rebuild in place from a point set; an empty slice leaves the box unchanged
    pub fn rebuild_from_points(&mut self, points: &[Vec2]) {
        let Some(first) = points.first() else {
            return;
        };
        let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
            min_y = min_y.min(p.y);
            max_y = max_y.max(p.y);
        }
        self.min_x = min_x;
        self.max_x = max_x;
        self.min_y = min_y;
        self.max_y = max_y;
    }

    /// Separating-axis test on X then Y
    ///
    /// Touching edges count as overlap; only a strict gap on either axis
    /// separates the boxes.
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.max_x < other.min_x || other.max_x < self.min_x {
            return false;
        }
        !(self.max_y < other.min_y || other.max_y < self.min_y)
    }

    /// Whether `p` lies inside or on the boundary
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Minimum X extent
    pub fn min_x(&self) -> f32 {
        self.min_x
    }

    /// Maximum X extent
    pub fn max_x(&self) -> f32 {
        self.max_x
    }

    /// Minimum Y extent
    pub fn min_y(&self) -> f32 {
        self.min_y
    }

    /// Maximum Y extent
    pub fn max_y(&self) -> f32 {
        self.max_y
    }
}
