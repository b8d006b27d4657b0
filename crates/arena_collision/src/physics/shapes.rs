//! Collision primitives: oriented box, finite line segment and half-plane
//!
//! Every primitive caches an [`Aabb2`] that is kept in sync with its mutable
//! fields, so broad-phase checks are O(1) and never allocate.

use crate::foundation::math::{constants::LENGTH_EPSILON, perp, rotate, Vec2};
use crate::physics::aabb::Aabb2;

/// Half-size components at or below this are rejected as degenerate
pub const MIN_HALF_EXTENT: f32 = 1.0e-4;

/// Upper bound on contacts a single narrow-phase query can report
pub const MAX_CONTACTS: usize = 4;

/// Shape construction errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A box half-size component was not strictly greater than [`MIN_HALF_EXTENT`]
    #[error(
        "degenerate collision box: half size ({x}, {y}) must exceed {min}",
        min = MIN_HALF_EXTENT
    )]
    DegenerateBox {
        /// Rejected half width
        x: f32,
        /// Rejected half height
        y: f32,
    },
}

/// A single contact reported by the narrow phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionData {
    /// Contact point in world space
    pub point: Vec2,
    /// Unit contact normal, pointing from the obstacle into the box
    pub normal: Vec2,
    /// Penetration depth, never negative
    pub depth: f32,
}

impl CollisionData {
    /// Create a contact record
    pub fn new(point: Vec2, normal: Vec2, depth: f32) -> Self {
        Self { point, normal, depth }
    }

    fn zeroed() -> Self {
        Self::new(Vec2::zeros(), Vec2::zeros(), 0.0)
    }
}

/// Fixed-capacity contact buffer returned by the narrow phase
#[derive(Debug, Clone, Copy)]
pub struct ContactSet {
    contacts: [CollisionData; MAX_CONTACTS],
    len: usize,
}

impl ContactSet {
    /// An empty set
    pub fn new() -> Self {
        Self {
            contacts: [CollisionData::zeroed(); MAX_CONTACTS],
            len: 0,
        }
    }

    /// Append a contact; returns `false` once the set is full
    pub fn push(&mut self, contact: CollisionData) -> bool {
        if self.len == MAX_CONTACTS {
            return false;
        }
        self.contacts[self.len] = contact;
        self.len += 1;
        true
    }

    /// Number of contacts held
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no contact was recorded
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Contacts as a slice
    pub fn as_slice(&self) -> &[CollisionData] {
        &self.contacts[..self.len]
    }

    /// Iterate over the contacts
    pub fn iter(&self) -> std::slice::Iter<'_, CollisionData> {
        self.as_slice().iter()
    }

    /// `None` when empty, which is how the narrow phase reports "no collision"
    pub fn non_empty(self) -> Option<Self> {
        (!self.is_empty()).then_some(self)
    }
}

impl Default for ContactSet {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a ContactSet {
    type Item = &'a CollisionData;
    type IntoIter = std::slice::Iter<'a, CollisionData>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Oriented rectangle, used for the vehicle footprint
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionBox {
    origin: Vec2,
    half_size: Vec2,
    rotation: f32,
    aabb: Aabb2,
}

impl CollisionBox {
    /// Create a box centered at `origin`, rotated by `rotation` radians
    pub fn new(origin: Vec2, half_size: Vec2, rotation: f32) -> Result<Self, ShapeError> {
        validate_half_size(half_size)?;
        let mut collision_box = Self {
            origin,
            half_size,
            rotation,
            aabb: Aabb2::new(origin.x, origin.x, origin.y, origin.y),
        };
        collision_box.refresh_aabb();
        Ok(collision_box)
    }

    /// Replace every mutable field at once
    ///
    /// On error the box is left exactly as it was.
    pub fn update(
        &mut self,
        origin: Vec2,
        half_size: Vec2,
        rotation: f32,
    ) -> Result<(), ShapeError> {
        validate_half_size(half_size)?;
        self.origin = origin;
        self.half_size = half_size;
        self.rotation = rotation;
        self.refresh_aabb();
        Ok(())
    }

    /// Move the box
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
        self.refresh_aabb();
    }

    /// Rotate the box to an absolute angle
    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
        self.refresh_aabb();
    }

    /// Resize the box
    pub fn set_half_size(&mut self, half_size: Vec2) -> Result<(), ShapeError> {
        validate_half_size(half_size)?;
        self.half_size = half_size;
        self.refresh_aabb();
        Ok(())
    }

    /// Center of the box
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Half extents along the local axes
    pub fn half_size(&self) -> Vec2 {
        self.half_size
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Cached world-space bounds
    pub fn aabb(&self) -> &Aabb2 {
        &self.aabb
    }

    /// Corner at `(x_sign * half_x, y_sign * half_y)` in local space, in world space
    pub fn corner_at(&self, x_sign: f32, y_sign: f32) -> Vec2 {
        let offset = Vec2::new(x_sign * self.half_size.x, y_sign * self.half_size.y);
        self.origin + rotate(offset, self.rotation)
    }

    /// Write the four corners, counter-clockwise from (-, -), into `out[..4]`
    pub fn write_corners(&self, out: &mut [Vec2]) {
        out[0] = self.corner_at(-1.0, -1.0);
        out[1] = self.corner_at(1.0, -1.0);
        out[2] = self.corner_at(1.0, 1.0);
        out[3] = self.corner_at(-1.0, 1.0);
    }

    /// The four corners, counter-clockwise from (-, -)
    pub fn corners(&self) -> [Vec2; 4] {
        let mut corners = [Vec2::zeros(); 4];
        self.write_corners(&mut corners);
        corners
    }

    /// World point expressed in the unrotated, origin-centered frame
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        rotate(point - self.origin, -self.rotation)
    }

    /// Local point mapped back to world space
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        self.origin + rotate(local, self.rotation)
    }

    /// Broad-phase test against another cached bounding box
    pub fn broad_check(&self, other: &Aabb2) -> bool {
        self.aabb.overlaps(other)
    }

    fn refresh_aabb(&mut self) {
        let corners = self.corners();
        self.aabb.rebuild_from_points(&corners);
    }
}

fn validate_half_size(half_size: Vec2) -> Result<(), ShapeError> {
    // Negated comparison so NaN is rejected too
    if !(half_size.x > MIN_HALF_EXTENT && half_size.y > MIN_HALF_EXTENT) {
        return Err(ShapeError::DegenerateBox {
            x: half_size.x,
            y: half_size.y,
        });
    }
    Ok(())
}

/// Immutable finite segment with a fixed facing normal, used for trail walls
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionLine {
    start: Vec2,
    end: Vec2,
    normal: Vec2,
    aabb: Aabb2,
}

impl CollisionLine {
    /// Create a segment whose normal points toward the side `facing` lies on
    ///
    /// The orientation is decided here once and never re-evaluated. A
    /// zero-length segment gets a zero normal and never reports contacts.
    pub fn new(start: Vec2, end: Vec2, facing: Vec2) -> Self {
        let mut normal = perp(end - start)
            .try_normalize(LENGTH_EPSILON)
            .unwrap_or_else(Vec2::zeros);
        if normal.dot(&(facing - start)) < 0.0 {
            normal = -normal;
        }
        Self {
            start,
            end,
            normal,
            aabb: Aabb2::new(start.x, end.x, start.y, end.y),
        }
    }

    /// First endpoint
    pub fn start(&self) -> Vec2 {
        self.start
    }

    /// Second endpoint
    pub fn end(&self) -> Vec2 {
        self.end
    }

    /// Unit facing normal (zero for a degenerate segment)
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    /// Cached bounds of the segment
    pub fn aabb(&self) -> &Aabb2 {
        &self.aabb
    }

    /// Parameter of the projection of `point` onto the segment, 0 at start and 1 at end
    ///
    /// NaN for a zero-length segment.
    pub fn project(&self, point: Vec2) -> f32 {
        let direction = self.end - self.start;
        (point - self.start).dot(&direction) / direction.norm_squared()
    }
}

/// Directed half-plane, used for arena boundaries
///
/// Points with `p · normal < offset` are behind the plane.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionPlane {
    normal: Vec2,
    offset: f32,
    aabb: Aabb2,
}

impl CollisionPlane {
    /// Create from a normal (normalized here) and a scalar offset along it
    pub fn new(normal: Vec2, offset: f32) -> Self {
        let normal = normal.try_normalize(LENGTH_EPSILON).unwrap_or_else(Vec2::zeros);
        Self {
            normal,
            offset,
            aabb: behind_bounds(normal, offset),
        }
    }

    /// Plane through `a` and `b` whose normal is the left perpendicular of `b - a`
    ///
    /// Boundaries wound counter-clockwise around the arena therefore face inward.
    pub fn through_points(a: Vec2, b: Vec2) -> Self {
        let normal = perp(b - a).try_normalize(LENGTH_EPSILON).unwrap_or_else(Vec2::zeros);
        Self::new(normal, normal.dot(&a))
    }

    /// Unit normal, pointing into the allowed side
    pub fn normal(&self) -> Vec2 {
        self.normal
    }

    /// Offset along the normal
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// The point on the plane closest to the world origin
    pub fn point(&self) -> Vec2 {
        self.normal * self.offset
    }

    /// Positive in front of the plane, negative behind it
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        point.dot(&self.normal) - self.offset
    }

    /// Bounds of the region behind the plane
    pub fn aabb(&self) -> &Aabb2 {
        &self.aabb
    }
}

#[allow(clippy::float_cmp)]
fn behind_bounds(normal: Vec2, offset: f32) -> Aabb2 {
    let (neg, pos) = (f32::NEG_INFINITY, f32::INFINITY);
    if normal.x == 0.0 && normal.y == 1.0 {
        Aabb2::new(neg, pos, neg, offset)
    } else if normal.x == 0.0 && normal.y == -1.0 {
        Aabb2::new(neg, pos, -offset, pos)
    } else if normal.y == 0.0 && normal.x == 1.0 {
        Aabb2::new(neg, offset, neg, pos)
    } else if normal.y == 0.0 && normal.x == -1.0 {
        Aabb2::new(-offset, pos, neg, pos)
    } else {
        Aabb2::unbounded()
    }
}
