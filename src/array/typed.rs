//! Typed facade over [`DynArray`]
//!
//! Elements are plain-old-data values moved in and out of the byte buffer
//! with `bytemuck`; the buffer carries no alignment guarantee, so reads go
//! through `pod_read_unaligned`.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;

use bytemuck::{bytes_of, bytes_of_mut, cast_slice, pod_read_unaligned, Pod};

use crate::config::{Config, DEFAULT_ARRAY_CAPACITY};
use crate::error::{FlatError, Result};

use super::DynArray;

/// Growable array of `T`, stored as `size_of::<T>()`-wide elements
pub struct Array<T> {
    raw: DynArray,
    _marker: PhantomData<T>,
}

impl<T: Pod> Array<T> {
    /// Create an empty array with the default capacity
    pub fn new() -> Result<Self> {
        Self::with_capacity(DEFAULT_ARRAY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Ok(Self::wrap(DynArray::with_capacity(size_of::<T>(), capacity)?))
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        Ok(Self::wrap(DynArray::with_config(size_of::<T>(), config)?))
    }

    /// Adopt a type-erased array whose element width matches `T`
    pub fn from_raw(raw: DynArray) -> Result<Self> {
        if raw.element_width() != size_of::<T>() {
            return Err(FlatError::WidthMismatch {
                expected: size_of::<T>(),
                found: raw.element_width(),
            });
        }
        Ok(Self::wrap(raw))
    }

    /// Create an array holding a copy of `values`
    pub fn from_slice(values: &[T]) -> Result<Self> {
        Ok(Self::wrap(DynArray::from_bytes(
            size_of::<T>(),
            cast_slice(values),
        )?))
    }

    pub fn as_raw(&self) -> &DynArray {
        &self.raw
    }

    pub fn into_raw(self) -> DynArray {
        self.raw
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    // =========================================================================
    // Element Access
    // =========================================================================

    pub fn get(&self, index: usize) -> Result<T> {
        Ok(pod_read_unaligned(self.raw.peek_at(index)?))
    }

    pub fn last(&self) -> Result<T> {
        Ok(pod_read_unaligned(self.raw.peek_last()?))
    }

    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        self.raw.set_at(index, bytes_of(&value))
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.raw.iter().map(pod_read_unaligned::<T>)
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub fn push(&mut self, value: T) -> Result<()> {
        self.raw.append(bytes_of(&value))
    }

    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        self.raw.insert(index, bytes_of(&value))
    }

    pub fn extend_from_slice(&mut self, values: &[T]) -> Result<()> {
        self.raw.extend_from_bytes(cast_slice(values))
    }

    pub fn pop(&mut self) -> Result<T> {
        let mut value = T::zeroed();
        self.raw.pop_into(bytes_of_mut(&mut value))?;
        Ok(value)
    }

    pub fn remove(&mut self, index: usize) -> Result<T> {
        let mut value = T::zeroed();
        self.raw.remove_into(index, bytes_of_mut(&mut value))?;
        Ok(value)
    }

    /// O(1) removal that moves the last element into `index`
    pub fn swap_remove(&mut self, index: usize) -> Result<T> {
        let mut value = T::zeroed();
        self.raw.remove_fast_into(index, bytes_of_mut(&mut value))?;
        Ok(value)
    }

    pub fn clear(&mut self) {
        self.raw.clear();
    }

    pub fn reverse(&mut self) {
        self.raw.reverse();
    }

    pub fn reversed(&self) -> Result<Self> {
        Ok(Self::wrap(self.raw.reversed()?))
    }

    pub fn copy(&self) -> Result<Self> {
        Ok(Self::wrap(self.raw.copy()?))
    }

    // =========================================================================
    // Ordering and Search
    // =========================================================================

    pub fn sort_by<F>(&mut self, mut cmp: F) -> Result<()>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.raw
            .sort_by(|a, b| cmp(&pod_read_unaligned(a), &pod_read_unaligned(b)))
    }

    pub fn sort(&mut self) -> Result<()>
    where
        T: Ord,
    {
        self.sort_by(T::cmp)
    }

    /// Binary search in an array sorted by `Ord`
    pub fn binary_search(&self, value: &T) -> Option<usize>
    where
        T: Ord,
    {
        self.raw
            .binary_search_by(bytes_of(value), |element, needle| {
                pod_read_unaligned::<T>(element).cmp(&pod_read_unaligned(needle))
            })
    }

    /// Byte-wise membership test
    pub fn contains(&self, value: &T) -> bool {
        self.raw.linear_search(bytes_of(value)).is_some()
    }

    fn wrap(raw: DynArray) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }
}

impl<T: Pod> PartialEq for Array<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
