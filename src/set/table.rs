//! Open-addressing blob table
//!
//! Slot array plus live-entry count. Growth and shrink rebuild the whole
//! table, because a blob's home slot depends on the capacity.

use std::fmt;
use std::slice;

use tracing::{debug, trace, warn};

use crate::config::{Config, DEFAULT_SET_CAPACITY};
use crate::error::{FlatError, Result};

use super::hash::hash_blob;

/// Shrink-rebuilds never go below this many slots
const MIN_SHRINK_CAPACITY: usize = 2;

/// A single table slot
#[derive(Debug)]
enum Slot {
    /// Never used since the last rebuild
    Empty,
    /// Holds an owned copy of an inserted blob
    Occupied(Box<[u8]>),
    /// Previously occupied; keeps probe chains through it intact
    Tombstone,
}

/// Outcome of walking a probe chain
enum Probe {
    /// Equal blob stored at this index
    Found(usize),
    /// Not present; first reusable slot on the chain
    Vacant(usize),
    /// Not present and every slot on the chain is occupied
    Full,
}

/// Hash set of byte blobs using linear probing
///
/// ## Invariants:
/// - `len < capacity`; insert grows first whenever `len + 1 >= capacity`
/// - The probe chain from a blob's home slot to its actual slot holds no
///   Empty slot. Slots only go Empty on rebuild, so lookups may stop at
///   the first Empty slot.
/// - No blob is stored twice
pub struct BlobSet {
    slots: Vec<Slot>,
    /// Number of Occupied slots
    len: usize,
}

impl BlobSet {
    /// Create an empty set with the default capacity
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_SET_CAPACITY)
    }

    /// Create an empty set with `capacity` slots (must be non-zero)
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(FlatError::InvalidArgument(
                "set capacity must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            slots: empty_slots(capacity)?,
            len: 0,
        })
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::with_capacity(config.set_capacity)
    }

    /// Build a set from any sequence of blobs; duplicates collapse
    pub fn from_blobs<I, B>(blobs: I) -> Result<Self>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut set = Self::new()?;
        for blob in blobs {
            set.insert(blob.as_ref())?;
        }
        Ok(set)
    }

    /// Number of live blobs
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots in the current table
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Iterate over live blobs in slot order
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.len,
        }
    }

    // =========================================================================
    // Core Operations
    // =========================================================================

    /// Insert a copy of `blob`
    ///
    /// Returns `Ok(true)` if inserted, `Ok(false)` if an equal blob was
    /// already present. Grows (doubling) before probing when the table
    /// would otherwise fill up. On allocation failure the set is unchanged.
    pub fn insert(&mut self, blob: &[u8]) -> Result<bool> {
        if self.len + 1 >= self.capacity() {
            let doubled = self
                .capacity()
                .checked_mul(2)
                .ok_or_else(|| FlatError::Allocation("capacity overflow".to_string()))?;
            self.rebuild(doubled)?;
        }

        match self.probe(blob) {
            Probe::Found(index) => {
                trace!(index, "blob already present");
                Ok(false)
            }
            Probe::Vacant(index) => {
                self.slots[index] = Slot::Occupied(copy_blob(blob)?);
                self.len += 1;
                trace!(index, len = self.len, "blob inserted");
                Ok(true)
            }
            Probe::Full => panic!(
                "blob set has no free slot after rebuild (len={}, capacity={})",
                self.len,
                self.capacity()
            ),
        }
    }

    /// Remove the blob equal to `blob`
    ///
    /// Returns `false` if no such blob is present. A removal that leaves
    /// the table at most a quarter full halves its capacity.
    pub fn remove(&mut self, blob: &[u8]) -> bool {
        let index = match self.probe(blob) {
            Probe::Found(index) => index,
            Probe::Vacant(_) | Probe::Full => return false,
        };

        self.slots[index] = Slot::Tombstone;
        self.len -= 1;
        trace!(index, len = self.len, "blob removed");

        self.shrink_after_removals(1);
        true
    }

    /// Whether an equal blob is present
    pub fn contains(&self, blob: &[u8]) -> bool {
        matches!(self.probe(blob), Probe::Found(_))
    }

    /// Keep only blobs for which `keep` returns true
    ///
    /// Capacity ends where removing the discarded blobs one by one would
    /// leave it.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[u8]) -> bool,
    {
        let mut removed = 0;
        for slot in self.slots.iter_mut() {
            let discard = matches!(slot, Slot::Occupied(blob) if !keep(&blob[..]));
            if discard {
                *slot = Slot::Tombstone;
                removed += 1;
            }
        }

        if removed > 0 {
            self.len -= removed;
            trace!(removed, len = self.len, "blobs discarded");
            self.shrink_after_removals(removed);
        }
    }

    /// Drop every blob, keeping the current capacity
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = Slot::Empty);
        self.len = 0;
    }

    /// Deep copy with the same capacity and slot placement
    pub fn copy(&self) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(self.capacity())?;
        for slot in &self.slots {
            slots.push(match slot {
                Slot::Empty => Slot::Empty,
                Slot::Tombstone => Slot::Tombstone,
                Slot::Occupied(blob) => Slot::Occupied(copy_blob(blob)?),
            });
        }
        Ok(Self {
            slots,
            len: self.len,
        })
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Walk the probe chain for `blob` starting at its home slot
    ///
    /// Stops at an equal blob or at the first Empty slot. Tombstones are
    /// skipped but the first one seen is remembered for reuse.
    fn probe(&self, blob: &[u8]) -> Probe {
        let capacity = self.capacity();
        let home = (hash_blob(blob) % capacity as u64) as usize;
        let mut reusable = None;

        for step in 0..capacity {
            let index = (home + step) % capacity;
            match &self.slots[index] {
                Slot::Occupied(stored) if **stored == *blob => {
                    return Probe::Found(index)
                }
                Slot::Occupied(_) => {}
                Slot::Tombstone => {
                    reusable.get_or_insert(index);
                }
                Slot::Empty => return Probe::Vacant(reusable.unwrap_or(index)),
            }
        }

        match reusable {
            Some(index) => Probe::Vacant(index),
            None => Probe::Full,
        }
    }

    /// Re-place every live blob into a fresh table of `new_capacity` slots
    ///
    /// The fresh table is allocated before anything moves, so failure
    /// leaves `self` intact. Blobs move without being copied, and placing
    /// them never triggers another rebuild.
    fn rebuild(&mut self, new_capacity: usize) -> Result<()> {
        debug_assert!(new_capacity > self.len);

        let old_capacity = self.capacity();
        let mut fresh = Self {
            slots: empty_slots(new_capacity)?,
            len: 0,
        };
        for slot in self.slots.drain(..) {
            if let Slot::Occupied(blob) = slot {
                fresh.place(blob);
            }
        }

        debug!(
            old_capacity,
            new_capacity,
            len = fresh.len,
            "blob set rebuilt"
        );
        *self = fresh;
        Ok(())
    }

    /// Store an owned blob known to be absent, without growth checks
    fn place(&mut self, blob: Box<[u8]>) {
        match self.probe(&blob) {
            Probe::Vacant(index) => {
                self.slots[index] = Slot::Occupied(blob);
                self.len += 1;
            }
            Probe::Found(index) => {
                panic!("duplicate blob found at slot {} during rebuild", index)
            }
            Probe::Full => panic!(
                "rebuild target of {} slots cannot hold {} blobs",
                self.capacity(),
                self.len + 1
            ),
        }
    }

    /// Apply the removal shrink rule for the last `removed` removals
    ///
    /// Each removal that leaves the table at most a quarter full halves it
    /// once. The halvings are replayed over the removed counts and applied
    /// as a single rebuild. Shrinking is an optimization: if the smaller
    /// table cannot be allocated the current one stays valid and is kept.
    fn shrink_after_removals(&mut self, removed: usize) {
        let capacity = self.capacity();
        let mut target = capacity;
        for len in (self.len..self.len + removed).rev() {
            if len <= target / 4 && target / 2 >= MIN_SHRINK_CAPACITY {
                target /= 2;
            }
        }
        if target == capacity {
            return;
        }
        if let Err(err) = self.rebuild(target) {
            warn!(capacity, target, len = self.len, error = %err, "skipping blob set shrink");
        }
    }
}

impl fmt::Debug for BlobSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a BlobSet {
    type Item = &'a [u8];
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the live blobs of a [`BlobSet`]
pub struct Iter<'a> {
    slots: slice::Iter<'a, Slot>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Occupied(blob) = slot {
                self.remaining -= 1;
                return Some(&blob[..]);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

fn empty_slots(capacity: usize) -> Result<Vec<Slot>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(capacity)?;
    slots.resize_with(capacity, || Slot::Empty);
    Ok(slots)
}

fn copy_blob(blob: &[u8]) -> Result<Box<[u8]>> {
    let mut copy = Vec::new();
    copy.try_reserve_exact(blob.len())?;
    copy.extend_from_slice(blob);
    Ok(copy.into_boxed_slice())
}
