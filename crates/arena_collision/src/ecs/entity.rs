//! Entity implementation

use slotmap::{Key, KeyData};

slotmap::new_key_type! {
    /// Entity identifier
    ///
    /// Generational: once an entity is destroyed its identifier never matches a
    /// later entity that reuses the same slot.
    pub struct Entity;
}

impl Entity {
    /// Get the entity ID (slot and generation packed into one value)
    pub fn id(&self) -> u64 {
        self.data().as_ffi()
    }

    /// Rebuild an entity from a value returned by [`Entity::id`]
    pub fn from_id(id: u64) -> Self {
        KeyData::from_ffi(id).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let mut slots: slotmap::SlotMap<Entity, ()> = slotmap::SlotMap::with_key();
        let entity = slots.insert(());
        assert_eq!(Entity::from_id(entity.id()), entity);
    }
}
