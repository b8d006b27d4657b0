//! Per-tick list of vehicle contacts
//!
//! Filled by the detect pass, read by the resolve pass and by downstream
//! consumers such as damage handling. Cleared, never reallocated, at the start
//! of every tick.

use crate::ecs::Entity;
use crate::physics::obstacle::ObstacleKind;
use crate::physics::shapes::{CollisionData, ContactSet};

/// A contact tagged with the vehicle and obstacle involved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRecord {
    /// Geometric contact
    pub data: CollisionData,
    /// Vehicle whose footprint was hit
    pub vehicle: Entity,
    /// Entity the vehicle ran into
    pub obstacle: Entity,
    /// What the obstacle is
    pub kind: ObstacleKind,
}

/// Contacts gathered during one tick, in detection order
#[derive(Debug, Default)]
pub struct CollisionList {
    records: Vec<CollisionRecord>,
}

impl CollisionList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a list with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Drop all records, keeping the allocation
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Append one record
    pub fn push(&mut self, record: CollisionRecord) {
        self.records.push(record);
    }

    /// Append every contact of a narrow-phase result
    pub fn extend_from_contacts(
        &mut self,
        vehicle: Entity,
        obstacle: Entity,
        kind: ObstacleKind,
        contacts: &ContactSet,
    ) {
        self.records.extend(contacts.iter().map(|&data| CollisionRecord {
            data,
            vehicle,
            obstacle,
            kind,
        }));
    }

    /// All records
    pub fn records(&self) -> &[CollisionRecord] {
        &self.records
    }

    /// Iterate over all records
    pub fn iter(&self) -> std::slice::Iter<'_, CollisionRecord> {
        self.records.iter()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the tick produced no contacts
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records involving `vehicle`
    pub fn for_vehicle(&self, vehicle: Entity) -> impl Iterator<Item = &CollisionRecord> + '_ {
        self.records.iter().filter(move |record| record.vehicle == vehicle)
    }

    /// Records against obstacles of `kind`
    pub fn of_kind(&self, kind: ObstacleKind) -> impl Iterator<Item = &CollisionRecord> + '_ {
        self.records.iter().filter(move |record| record.kind == kind)
    }

    /// Allocated capacity, for checking the buffer is reused
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }
}

impl<'a> IntoIterator for &'a CollisionList {
    type Item = &'a CollisionRecord;
    type IntoIter = std::slice::Iter<'a, CollisionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
