//! Narrow-phase contact queries
//!
//! Each query rejects on the cached bounds first, then tests the box's four
//! corners against the obstacle and reports one [`CollisionData`] per
//! penetrating corner. `None` means no contact. No response is computed here.
//!
//! Intermediate vectors come from the caller's [`ScratchScope`] and results are
//! returned in a fixed-size [`ContactSet`], so a query never touches the heap.

use crate::foundation::math::{rotate, Vec2};
use crate::foundation::memory::ScratchScope;
use crate::physics::shapes::{
    CollisionBox, CollisionData, CollisionLine, CollisionPlane, ContactSet,
};

/// Corners of `collision_box` lying behind `plane`
///
/// Penetration depth of a corner is `(plane_point - corner) · normal`.
pub fn box_vs_plane(
    collision_box: &CollisionBox,
    plane: &CollisionPlane,
    scratch: &mut ScratchScope<'_>,
) -> Option<ContactSet> {
    if !collision_box.broad_check(plane.aabb()) {
        return None;
    }

    scratch.get(4, |corners, _| {
        collision_box.write_corners(corners);
        let plane_point = plane.point();
        let normal = plane.normal();

        let mut contacts = ContactSet::new();
        for &corner in corners.iter() {
            let depth = (plane_point - corner).dot(&normal);
            if depth > 0.0 {
                contacts.push(CollisionData::new(corner, normal, depth));
            }
        }
        contacts.non_empty()
    })
}

/// Corners of `collision_box` that crossed `line` within its extent
///
/// A corner counts only if its projection falls strictly inside the segment
/// (endpoints and the infinite extension are excluded) and it lies behind the
/// line's fixed normal. A box whose origin is already behind the line is
/// approaching from the back and never collides.
pub fn box_vs_line(
    collision_box: &CollisionBox,
    line: &CollisionLine,
    scratch: &mut ScratchScope<'_>,
) -> Option<ContactSet> {
    if !collision_box.broad_check(line.aabb()) {
        return None;
    }
    if (collision_box.origin() - line.start()).dot(&line.normal()) < 0.0 {
        return None;
    }

    scratch.get(4, |corners, _| {
        collision_box.write_corners(corners);
        let normal = line.normal();
        let start = line.start();

        let mut contacts = ContactSet::new();
        for &corner in corners.iter() {
            let t = line.project(corner);
            // NaN from a zero-length segment fails this test as well
            if !(t > 0.0 && t < 1.0) {
                continue;
            }
            let depth = (start - corner).dot(&normal);
            if depth > 0.0 {
                contacts.push(CollisionData::new(corner, normal, depth));
            }
        }
        contacts.non_empty()
    })
}

/// Corners of `subject` inside `obstacle`
///
/// Corners are moved into the obstacle's local frame; each one strictly inside
/// the half extents is pushed out along the local axis with the smaller
/// penetration. The reported point and normal are mapped back to world space, so
/// the normal points from the obstacle toward the subject.
pub fn box_vs_box(
    obstacle: &CollisionBox,
    subject: &CollisionBox,
    scratch: &mut ScratchScope<'_>,
) -> Option<ContactSet> {
    if !obstacle.broad_check(subject.aabb()) {
        return None;
    }

    scratch.get(4, |corners, scratch| {
        subject.write_corners(corners);

        scratch.get(4, |local, _| {
            let half = obstacle.half_size();
            let mut contacts = ContactSet::new();

            for (slot, &corner) in local.iter_mut().zip(corners.iter()) {
                *slot = obstacle.to_local(corner);
                let p = *slot;
                if p.x.abs() >= half.x || p.y.abs() >= half.y {
                    continue;
                }

                let pen_x = half.x - p.x.abs();
                let pen_y = half.y - p.y.abs();
                let (local_normal, depth) = if pen_x < pen_y {
                    (Vec2::new(p.x.signum(), 0.0), pen_x)
                } else {
                    (Vec2::new(0.0, p.y.signum()), pen_y)
                };

                contacts.push(CollisionData::new(
                    obstacle.to_world(p),
                    rotate(local_normal, obstacle.rotation()),
                    depth,
                ));
            }
            contacts.non_empty()
        })
    })
}
