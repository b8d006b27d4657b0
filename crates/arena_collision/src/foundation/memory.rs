//! Memory management utilities
//!
//! Two pools keep the per-tick collision path free of incidental allocation:
//!
//! - [`ScratchPool`]: short-lived `Vec2` slots that are only valid for the
//!   duration of a callback. Nested requests carve disjoint slots out of the
//!   remaining capacity, so a call chain can keep acquiring without ever
//!   aliasing a slot that is still in use.
//! - [`OwnedPool`]: a generational arena of owned values. Every acquisition
//!   hands back a key that must be released exactly once, normally from the
//!   owning entity's destruction hook.
//!
//! Neither pool is meant to be shared across threads.

use crate::foundation::math::Vec2;
use slotmap::{Key, SlotMap};

/// Memory pool errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    /// The key was never handed out, or has already been released
    #[error("stale or unknown pool handle")]
    StaleHandle,
}

/// Usage counters shared by every scope of one [`ScratchPool`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct ScratchStats {
    peak: usize,
    spills: usize,
}

/// Reusable pool of temporary `Vec2` slots
///
/// ```
/// use arena_collision::foundation::memory::ScratchPool;
/// use arena_collision::foundation::math::Vec2;
///
/// let mut pool = ScratchPool::new(8);
/// let sum = pool.get(2, |slots, scratch| {
///     slots[0] = Vec2::new(1.0, 2.0);
///     slots[1] = Vec2::new(3.0, 4.0);
///     scratch.get(1, |inner, _| {
///         inner[0] = slots[0] + slots[1];
///         inner[0]
///     })
/// });
/// assert_eq!(sum, Vec2::new(4.0, 6.0));
/// assert_eq!(pool.peak_usage(), 3);
/// ```
pub struct ScratchPool {
    slots: Vec<Vec2>,
    stats: ScratchStats,
}

impl ScratchPool {
    /// Create a pool with `capacity` scratch slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Vec2::zeros(); capacity],
            stats: ScratchStats::default(),
        }
    }

    /// Number of slots the pool can hand out before spilling to the heap
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Largest number of slots that were in use at the same time
    pub fn peak_usage(&self) -> usize {
        self.stats.peak
    }

    /// Number of requests that did not fit and fell back to a heap buffer
    pub fn spill_count(&self) -> usize {
        self.stats.spills
    }

    /// Hand out `n` zeroed slots for the duration of `f`
    ///
    /// The second callback argument is the remaining pool; use it for nested
    /// requests.
    pub fn get<R>(
        &mut self,
        n: usize,
        f: impl FnOnce(&mut [Vec2], &mut ScratchScope<'_>) -> R,
    ) -> R {
        self.scope().get(n, f)
    }

    /// Open a scope over the whole pool
    pub fn scope(&mut self) -> ScratchScope<'_> {
        ScratchScope {
            free: &mut self.slots,
            in_use: 0,
            stats: &mut self.stats,
        }
    }
}

impl Default for ScratchPool {
    fn default() -> Self {
        Self::new(64)
    }
}

/// The not-yet-handed-out remainder of a [`ScratchPool`]
pub struct ScratchScope<'a> {
    free: &'a mut [Vec2],
    in_use: usize,
    stats: &'a mut ScratchStats,
}

impl ScratchScope<'_> {
    /// Slots still available in this scope
    pub fn remaining(&self) -> usize {
        self.free.len()
    }

    /// Hand out `n` zeroed slots, disjoint from every slot already in use
    pub fn get<R>(
        &mut self,
        n: usize,
        f: impl FnOnce(&mut [Vec2], &mut ScratchScope<'_>) -> R,
    ) -> R {
        if n > self.free.len() {
            self.stats.spills += 1;
            log::warn!(
                "Scratch pool exhausted: requested {} slots with {} remaining, spilling to heap",
                n,
                self.free.len()
            );
            let mut spill = vec![Vec2::zeros(); n];
            return f(&mut spill, self);
        }

        let in_use = self.in_use + n;
        self.stats.peak = self.stats.peak.max(in_use);

        let (taken, rest) = self.free.split_at_mut(n);
        taken.fill(Vec2::zeros());
        let mut inner = ScratchScope {
            free: rest,
            in_use,
            stats: &mut *self.stats,
        };
        f(taken, &mut inner)
    }
}

/// Generational arena of owned values with explicit release
pub struct OwnedPool<K: Key, T> {
    items: SlotMap<K, T>,
    acquired: u64,
    released: u64,
}

impl<K: Key, T> OwnedPool<K, T> {
    /// Create an empty pool
    pub fn new() -> Self {
        Self {
            items: SlotMap::with_key(),
            acquired: 0,
            released: 0,
        }
    }

    /// Move `value` into the pool and return the key that owns it
    pub fn acquire(&mut self, value: T) -> K {
        self.acquired += 1;
        self.items.insert(value)
    }

    /// Borrow a live value
    pub fn get(&self, key: K) -> Option<&T> {
        self.items.get(key)
    }

    /// Mutably borrow a live value
    pub fn get_mut(&mut self, key: K) -> Option<&mut T> {
        self.items.get_mut(key)
    }

    /// Release a value, returning it to the caller
    pub fn release(&mut self, key: K) -> Result<T, MemoryError> {
        let value = self.items.remove(key).ok_or(MemoryError::StaleHandle)?;
        self.released += 1;
        Ok(value)
    }

    /// Number of values currently held
    pub fn live_count(&self) -> usize {
        self.items.len()
    }

    /// Total successful acquisitions
    pub fn acquired_count(&self) -> u64 {
        self.acquired
    }

    /// Total successful releases
    pub fn released_count(&self) -> u64 {
        self.released
    }
}

impl<K: Key, T> Default for OwnedPool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    slotmap::new_key_type! { struct TestKey; }

    #[test]
    fn test_scratch_slots_are_zeroed() {
        let mut pool = ScratchPool::new(4);
        pool.get(4, |slots, _| slots.fill(Vec2::new(9.0, 9.0)));
        pool.get(4, |slots, _| {
            assert!(slots.iter().all(|s| *s == Vec2::zeros()));
        });
    }

    #[test]
    fn test_nested_scratch_is_disjoint() {
        let mut pool = ScratchPool::new(6);
        pool.get(2, |outer, scratch| {
            outer[0] = Vec2::new(1.0, 1.0);
            outer[1] = Vec2::new(2.0, 2.0);
            assert_eq!(scratch.remaining(), 4);
            scratch.get(4, |inner, rest| {
                inner.fill(Vec2::new(-5.0, -5.0));
                assert_eq!(rest.remaining(), 0);
            });
            assert_eq!(outer[0], Vec2::new(1.0, 1.0));
            assert_eq!(outer[1], Vec2::new(2.0, 2.0));
        });
        assert_eq!(pool.peak_usage(), 6);
        assert_eq!(pool.spill_count(), 0);
    }

    #[test]
    fn test_scratch_spills_when_exhausted() {
        let mut pool = ScratchPool::new(2);
        let len = pool.get(3, |slots, scratch| {
            // A spill leaves the pool untouched for nested requests
            assert_eq!(scratch.remaining(), 2);
            slots.len()
        });
        assert_eq!(len, 3);
        assert_eq!(pool.spill_count(), 1);
    }

    #[test]
    fn test_owned_pool_release_once() {
        let mut pool: OwnedPool<TestKey, Vec2> = OwnedPool::new();
        let key = pool.acquire(Vec2::new(1.0, 2.0));
        assert_eq!(pool.get(key), Some(&Vec2::new(1.0, 2.0)));

        assert_eq!(pool.release(key), Ok(Vec2::new(1.0, 2.0)));
        assert_eq!(pool.release(key), Err(MemoryError::StaleHandle));
        assert_eq!(pool.get(key), None);
        assert_eq!(pool.acquired_count(), 1);
        assert_eq!(pool.released_count(), 1);
    }

    #[test]
    fn test_owned_pool_counts_balance_over_cycles() {
        let mut pool: OwnedPool<TestKey, u32> = OwnedPool::new();
        for cycle in 0..50 {
            let keys: Vec<_> = (0..4).map(|i| pool.acquire(cycle * 4 + i)).collect();
            for key in keys {
                pool.release(key).unwrap();
            }
        }
        assert_eq!(pool.acquired_count(), 200);
        assert_eq!(pool.released_count(), 200);
        assert_eq!(pool.live_count(), 0);
    }
}
