//! Contact response for two-wheeled vehicles
//!
//! Contacts are resolved in the vehicle's wheel frame. Each contact contributes
//! three scalars:
//!
//! - a longitudinal push `(axis · n) · depth` applied to both wheels along the
//!   rear-to-front axis,
//! - a front-wheel push `(push · n) · depth · t` along the perpendicular axis,
//! - a rear-wheel push `(push · n) · depth · (1 - t)` along the same axis,
//!
//! where `t` is the contact point's clamped position between the rear (0) and
//! front (1) wheel. The contributions of all contacts on a vehicle are averaged
//! with equal weight, applied once, and the wheels are then pulled back to the
//! fixed wheelbase.

use crate::foundation::math::{constants::LENGTH_EPSILON, heading_of, perp, Vec2};
use crate::physics::shapes::CollisionData;

/// Rear-to-front axis of a vehicle and its perpendicular push axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelFrame {
    rear: Vec2,
    axis: Vec2,
    push: Vec2,
    length: f32,
}

impl WheelFrame {
    /// Frame from the current wheel positions; `None` when they coincide
    pub fn from_wheels(front: Vec2, rear: Vec2) -> Option<Self> {
        let offset = front - rear;
        let length = offset.norm();
        if length <= LENGTH_EPSILON {
            return None;
        }
        let axis = offset / length;
        Some(Self {
            rear,
            axis,
            push: perp(axis),
            length,
        })
    }

    /// Unit rear-to-front direction
    pub fn axis(&self) -> Vec2 {
        self.axis
    }

    /// Unit direction perpendicular to the axis (left of travel)
    pub fn push(&self) -> Vec2 {
        self.push
    }

    /// Distance between the wheels the frame was built from
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Position of `point` between the wheels, 0 at the rear and 1 at the front
    pub fn contact_parameter(&self, point: Vec2) -> f32 {
        ((point - self.rear).dot(&self.axis) / self.length).clamp(0.0, 1.0)
    }
}

/// Averaged correction for one vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelCorrection {
    /// Shift of both wheels along the rear-to-front axis
    pub longitudinal: f32,
    /// Shift of the front wheel along the push axis
    pub front: f32,
    /// Shift of the rear wheel along the push axis
    pub rear: f32,
}

/// Running sum of contact contributions for one vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContactAccumulator {
    sum: WheelCorrection,
    count: u32,
}

impl ContactAccumulator {
    /// An empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one contact, decomposed in `frame`
    pub fn add(&mut self, frame: &WheelFrame, contact: &CollisionData) {
        let t = frame.contact_parameter(contact.point);
        let lateral = frame.push.dot(&contact.normal) * contact.depth;
        self.add_components(
            frame.axis.dot(&contact.normal) * contact.depth,
            lateral * t,
            lateral * (1.0 - t),
        );
    }

    /// Add an already decomposed contribution
    pub fn add_components(&mut self, longitudinal: f32, front: f32, rear: f32) {
        self.sum.longitudinal += longitudinal;
        self.sum.front += front;
        self.sum.rear += rear;
        self.count += 1;
    }

    /// Number of contributions added
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Equal-weight average, `None` if nothing was added
    pub fn average(&self) -> Option<WheelCorrection> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f32;
        Some(WheelCorrection {
            longitudinal: self.sum.longitudinal / n,
            front: self.sum.front / n,
            rear: self.sum.rear / n,
        })
    }
}

/// Move the wheels by `correction`, restore the wheelbase and return the new heading
pub fn apply_correction(
    front: &mut Vec2,
    rear: &mut Vec2,
    wheelbase: f32,
    frame: &WheelFrame,
    correction: &WheelCorrection,
) -> f32 {
    let shift = frame.axis * correction.longitudinal;
    *front += shift + frame.push * correction.front;
    *rear += shift + frame.push * correction.rear;

    enforce_rigid_rod(*front, rear, wheelbase, frame.axis);
    heading_of(*front - *rear)
}

/// Pull `rear` to exactly `wheelbase` behind `front` along their current direction
///
/// Falls back to `fallback_axis` if the wheels ended up on top of each other.
pub fn enforce_rigid_rod(front: Vec2, rear: &mut Vec2, wheelbase: f32, fallback_axis: Vec2) {
    let direction = (front - *rear)
        .try_normalize(LENGTH_EPSILON)
        .unwrap_or(fallback_axis);
    *rear = front - direction * wheelbase;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn frame_along_x() -> WheelFrame {
        WheelFrame::from_wheels(Vec2::new(2.0, 0.0), Vec2::new(0.0, 0.0)).unwrap()
    }

    #[test]
    fn test_contact_parameter_is_clamped() {
        let frame = frame_along_x();
        assert_eq!(frame.contact_parameter(Vec2::new(-1.0, 3.0)), 0.0);
        assert_eq!(frame.contact_parameter(Vec2::new(1.0, -3.0)), 0.5);
        assert_eq!(frame.contact_parameter(Vec2::new(5.0, 0.0)), 1.0);
    }

    #[test]
    fn test_side_contact_splits_between_wheels() {
        let frame = frame_along_x();
        let mut accumulator = ContactAccumulator::new();
        // Quarter of the way from the rear, pushed left
        let contact = CollisionData::new(Vec2::new(0.5, -0.5), Vec2::new(0.0, 1.0), 0.4);
        accumulator.add(&frame, &contact);

        let correction = accumulator.average().unwrap();
        assert_relative_eq!(correction.longitudinal, 0.0);
        assert_relative_eq!(correction.front, 0.1, epsilon = 1e-6);
        assert_relative_eq!(correction.rear, 0.3, epsilon = 1e-6);
    }

    #[test]
    fn test_head_on_contacts_cancel_longitudinally() {
        let frame = frame_along_x();
        let diagonal = std::f32::consts::FRAC_1_SQRT_2;
        let front_tip = Vec2::new(2.0, 0.0);
        let mut accumulator = ContactAccumulator::new();
        accumulator.add(&frame, &CollisionData::new(front_tip, Vec2::new(diagonal, diagonal), 1.0));
        let contact = CollisionData::new(front_tip, Vec2::new(-diagonal, diagonal), 1.0);
        accumulator.add(&frame, &contact);

        let correction = accumulator.average().unwrap();
        assert_abs_diff_eq!(correction.longitudinal, 0.0, epsilon = 1e-6);
        assert_relative_eq!(correction.front, diagonal, epsilon = 1e-6);
        assert_abs_diff_eq!(correction.rear, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_average_is_equal_weight() {
        let mut accumulator = ContactAccumulator::new();
        accumulator.add_components(0.3, 0.5, 0.0);
        accumulator.add_components(-0.3, 0.5, 0.2);

        assert_eq!(accumulator.count(), 2);
        let correction = accumulator.average().unwrap();
        assert_abs_diff_eq!(correction.longitudinal, 0.0, epsilon = 1e-7);
        assert_relative_eq!(correction.front, 0.5);
        assert_relative_eq!(correction.rear, 0.1);
        assert!(ContactAccumulator::new().average().is_none());
    }

    #[test]
    fn test_rigid_rod_restored_after_correction() {
        let wheelbase = 2.0;
        let corrections = [
            WheelCorrection { longitudinal: 0.0, front: 0.7, rear: 0.0 },
            WheelCorrection { longitudinal: -1.5, front: 0.0, rear: 0.9 },
            WheelCorrection { longitudinal: 0.2, front: -3.0, rear: 3.0 },
        ];
        for correction in corrections {
            let mut front = Vec2::new(2.0, 0.0);
            let mut rear = Vec2::zeros();
            let frame = WheelFrame::from_wheels(front, rear).unwrap();
            let heading = apply_correction(&mut front, &mut rear, wheelbase, &frame, &correction);

            assert_relative_eq!((front - rear).norm(), wheelbase, epsilon = 1e-5);
            assert_relative_eq!(heading, heading_of(front - rear), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_front_push_turns_vehicle() {
        let mut front = Vec2::new(2.0, 0.0);
        let mut rear = Vec2::zeros();
        let frame = WheelFrame::from_wheels(front, rear).unwrap();
        let correction = WheelCorrection { longitudinal: 0.0, front: 0.5, rear: 0.0 };
        let heading = apply_correction(&mut front, &mut rear, 2.0, &frame, &correction);

        assert_relative_eq!(front, Vec2::new(2.0, 0.5), epsilon = 1e-6);
        assert!(heading > 0.0);
    }

    #[test]
    fn test_coincident_wheels_use_fallback_axis() {
        let mut rear = Vec2::new(1.0, 1.0);
        enforce_rigid_rod(Vec2::new(1.0, 1.0), &mut rear, 2.0, Vec2::new(0.0, 1.0));
        assert_relative_eq!(rear, Vec2::new(1.0, -1.0));
    }
}
