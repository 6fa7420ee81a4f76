//! Arena of reusable entity slots.
//!
//! Slots are never removed. Releasing a slot only marks it inactive, and the
//! next `acquire` hands the first inactive slot out again before growing the
//! vector. A `SlotId` held across ticks must be checked with `get_active`.

use rampart_core::types::SlotId;

/// An entity that lives in a `Pool`.
pub trait Poolable: Default {
    fn is_active(&self) -> bool;
    fn deactivate(&mut self);
}

#[derive(Debug, Clone)]
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Poolable> Pool<T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Hand out an inactive slot, appending a new one if none is free.
    ///
    /// The returned slot is still inactive; the caller initializes and
    /// activates it before the next `acquire`.
    pub fn acquire(&mut self) -> (SlotId, &mut T) {
        let index = match self.slots.iter().position(|slot| !slot.is_active()) {
            Some(index) => index,
            None => {
                self.slots.push(T::default());
                self.slots.len() - 1
            }
        };
        (SlotId(index as u32), &mut self.slots[index])
    }

    /// Mark a slot inactive, making it eligible for reuse.
    pub fn release(&mut self, id: SlotId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            slot.deactivate();
        }
    }

    /// Deactivate every slot. Capacity is kept.
    pub fn release_all(&mut self) {
        for slot in &mut self.slots {
            slot.deactivate();
        }
    }

    /// Slot contents regardless of liveness.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.index())
    }

    /// Slot contents only while the slot is active.
    pub fn get_active(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.index()).filter(|slot| slot.is_active())
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.index())
    }

    pub fn is_active(&self, id: SlotId) -> bool {
        self.get_active(id).is_some()
    }

    /// Iterate active slots in index order.
    pub fn iter_active(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_active())
            .map(|(i, slot)| (SlotId(i as u32), slot))
    }

    /// Iterate active slots mutably in index order.
    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.is_active())
            .map(|(i, slot)| (SlotId(i as u32), slot))
    }

    /// Ids of the currently active slots, collected so the pool can be
    /// mutated while walking them.
    pub fn active_ids(&self) -> Vec<SlotId> {
        self.iter_active().map(|(id, _)| id).collect()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_active()).count()
    }

    /// Total slots ever created (peak concurrent count).
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
