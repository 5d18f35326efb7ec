//! CLOCK Ring Module
//!
//! Fixed-size slot array scanned by a rotating hand (second-chance eviction).

use std::mem;

use crate::cache::CacheEntry;

// == Clock Ring ==
/// Slot arena giving the eviction scan a stable round-robin order.
///
/// Slots are allocated once at construction and reused by index. Free slots
/// are kept on a stack so an insert never has to search the ring.
#[derive(Debug)]
pub struct ClockRing {
    /// Entry storage, `None` = empty slot
    slots: Vec<Option<CacheEntry>>,
    /// Indices of empty slots
    free: Vec<usize>,
    /// Scan cursor
    hand: usize,
}

impl ClockRing {
    // == Constructor ==
    /// Creates a ring with `capacity` empty slots.
    ///
    /// The free stack is filled so the initial inserts land in slots
    /// 0, 1, 2, ... in order.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            free: (0..capacity).rev().collect(),
            hand: 0,
        }
    }

    // == Insert ==
    /// Places an entry in a free slot and returns the slot index.
    ///
    /// Returns None if every slot is occupied.
    pub fn insert(&mut self, entry: CacheEntry) -> Option<usize> {
        let idx = self.free.pop()?;
        self.slots[idx] = Some(entry);
        Some(idx)
    }

    /// Returns the entry stored in a slot.
    #[cfg(test)]
    pub fn get(&self, idx: usize) -> Option<&CacheEntry> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    /// Returns a mutable reference to the entry stored in a slot.
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut CacheEntry> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    // == Evict ==
    /// Runs the CLOCK scan and removes one entry.
    ///
    /// Empty slots are skipped, referenced entries lose their bit and are
    /// skipped, and the first unreferenced entry is taken out. The hand ends
    /// up one past the freed slot. Returns None if the ring is empty.
    pub fn evict(&mut self) -> Option<CacheEntry> {
        if self.is_empty() {
            return None;
        }

        // Terminates within two sweeps: the first clears every bit.
        loop {
            let idx = self.hand;
            self.hand = (self.hand + 1) % self.slots.len();

            let Some(entry) = self.slots[idx].as_mut() else {
                continue;
            };
            if !mem::replace(&mut entry.referenced, false) {
                return self.take(idx);
            }
        }
    }

    // == Take ==
    /// Empties a specific slot, returning its entry.
    pub fn take(&mut self, idx: usize) -> Option<CacheEntry> {
        let entry = self.slots.get_mut(idx)?.take()?;
        self.free.push(idx);
        Some(entry)
    }

    /// Iterates occupied slots with their indices.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (usize, &CacheEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|entry| (idx, entry)))
    }

    /// Current scan cursor position.
    #[cfg(test)]
    pub fn hand(&self) -> usize {
        self.hand
    }

    /// Number of slots.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
