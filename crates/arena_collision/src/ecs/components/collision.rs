//! Collision cache component
//!
//! Attached lazily by the collision system to every participating entity. The
//! shape itself lives in the [`ShapePool`](crate::physics::ShapePool); this
//! component only holds the key into it.

use crate::ecs::component::Component;
use crate::physics::obstacle::ShapeHandle;

/// Per-entity collision cache entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedCollider {
    /// Key of the cached primitive in the shape pool
    pub handle: ShapeHandle,

    /// Seconds left before the collider can register hits
    pub activation_remaining: f32,
}

impl CachedCollider {
    /// Create an immediately active cache entry
    pub fn new(handle: ShapeHandle) -> Self {
        Self {
            handle,
            activation_remaining: 0.0,
        }
    }

    /// Delay activation by `seconds`
    pub fn with_activation_delay(mut self, seconds: f32) -> Self {
        self.activation_remaining = seconds.max(0.0);
        self
    }

    /// Whether the collider takes part in detection
    pub fn is_active(&self) -> bool {
        self.activation_remaining <= 0.0
    }

    /// Count down the activation delay and report whether the collider is active
    pub fn tick(&mut self, delta_time: f32) -> bool {
        self.activation_remaining = (self.activation_remaining - delta_time).max(0.0);
        self.is_active()
    }
}

impl Component for CachedCollider {}
