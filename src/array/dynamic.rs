//! Type-erased dynamic array
//!
//! Stores `capacity * element_width` bytes and tracks how many leading
//! elements are live.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;
use std::slice::ChunksExact;

use tracing::{debug, trace};

use crate::config::{Config, DEFAULT_ARRAY_CAPACITY};
use crate::error::{FlatError, Result};

/// Growable array of elements that are all `element_width` bytes wide
///
/// ## Capacity policy:
/// - Grow: double until `length + k` fits (capacity 0 starts from 1)
/// - Shrink: after a removal, halve once if `length < capacity / 2`
///
/// Failed growth leaves the array untouched.
pub struct DynArray {
    /// Backing buffer, always exactly `capacity * width` bytes long
    buf: Vec<u8>,
    /// Number of live elements
    len: usize,
    /// Number of element slots in `buf`
    capacity: usize,
    /// Bytes per element, fixed at construction
    width: usize,
    /// Whether removals apply the halving rule
    shrink: bool,
}

impl DynArray {
    /// Create an empty array with the default capacity
    pub fn new(element_width: usize) -> Result<Self> {
        Self::with_capacity(element_width, DEFAULT_ARRAY_CAPACITY)
    }

    /// Create an empty array with room for `capacity` elements
    ///
    /// The backing buffer is zeroed.
    pub fn with_capacity(element_width: usize, capacity: usize) -> Result<Self> {
        if element_width == 0 {
            return Err(FlatError::InvalidArgument(
                "element width must be non-zero".to_string(),
            ));
        }

        let bytes = byte_len(capacity, element_width)?;
        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes)?;
        buf.resize(bytes, 0);

        Ok(Self {
            buf,
            len: 0,
            capacity,
            width: element_width,
            shrink: true,
        })
    }

    /// Create an empty array using the capacity and shrink policy of `config`
    pub fn with_config(element_width: usize, config: &Config) -> Result<Self> {
        let mut array = Self::with_capacity(element_width, config.array_capacity)?;
        array.shrink = config.shrink_arrays;
        Ok(array)
    }

    /// Create an array holding the elements packed in `bytes`
    pub fn from_bytes(element_width: usize, bytes: &[u8]) -> Result<Self> {
        let count = element_count(element_width, bytes)?;
        let mut array = Self::with_capacity(element_width, count)?;
        array.buf[..bytes.len()].copy_from_slice(bytes);
        array.len = count;
        Ok(array)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn element_width(&self) -> usize {
        self.width
    }

    /// Whether removals halve the capacity when it becomes sparse
    pub fn shrinks(&self) -> bool {
        self.shrink
    }

    /// The live prefix of the buffer (`len * element_width` bytes)
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len * self.width]
    }

    /// Iterate over live elements in index order
    pub fn iter(&self) -> ChunksExact<'_, u8> {
        self.as_bytes().chunks_exact(self.width)
    }

    /// Read-only view of the element at `index`
    pub fn peek_at(&self, index: usize) -> Result<&[u8]> {
        self.check_index(index)?;
        Ok(&self.buf[self.span(index)])
    }

    /// Read-only view of the last element
    pub fn peek_last(&self) -> Result<&[u8]> {
        let last = self.last_index()?;
        Ok(&self.buf[self.span(last)])
    }

    /// Mutable view of the element at `index`
    pub fn at(&mut self, index: usize) -> Result<&mut [u8]> {
        self.check_index(index)?;
        let span = self.span(index);
        Ok(&mut self.buf[span])
    }

    /// Mutable view of the last element
    pub fn at_last(&mut self) -> Result<&mut [u8]> {
        let span = self.span(self.last_index()?);
        Ok(&mut self.buf[span])
    }

    // =========================================================================
    // Insertion
    // =========================================================================

    /// Copy `value` to the end of the array
    pub fn append(&mut self, value: &[u8]) -> Result<()> {
        self.check_width(value)?;
        self.reserve(1)?;

        let span = self.span(self.len);
        self.buf[span].copy_from_slice(value);
        self.len += 1;
        Ok(())
    }

    /// Insert `value` at `index`, shifting later elements right
    pub fn insert(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.check_width(value)?;
        if index > self.len {
            return Err(FlatError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        self.reserve(1)?;

        let w = self.width;
        self.buf.copy_within(index * w..self.len * w, (index + 1) * w);
        let span = self.span(index);
        self.buf[span].copy_from_slice(value);
        self.len += 1;
        Ok(())
    }

    /// Overwrite the element at `index`
    pub fn set_at(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.check_width(value)?;
        self.at(index)?.copy_from_slice(value);
        Ok(())
    }

    /// Append every element packed in `bytes`, growing at most once
    pub fn extend_from_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let count = element_count(self.width, bytes)?;
        self.reserve(count)?;

        let start = self.len * self.width;
        self.buf[start..start + bytes.len()].copy_from_slice(bytes);
        self.len += count;
        Ok(())
    }

    /// Append every element of `other`, which must have the same width
    pub fn extend(&mut self, other: &DynArray) -> Result<()> {
        if other.width != self.width {
            return Err(FlatError::WidthMismatch {
                expected: self.width,
                found: other.width,
            });
        }
        self.extend_from_bytes(other.as_bytes())
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Remove and return the last element
    pub fn pop(&mut self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.width];
        self.take_last(Some(&mut out))?;
        Ok(out)
    }

    /// Remove the last element, copying it into `out`
    pub fn pop_into(&mut self, out: &mut [u8]) -> Result<()> {
        self.take_last(Some(out))
    }

    /// Remove and return the element at `index`, preserving order
    pub fn remove(&mut self, index: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.width];
        self.take_at(index, Some(&mut out))?;
        Ok(out)
    }

    /// Remove the element at `index` into `out`, preserving order
    pub fn remove_into(&mut self, index: usize, out: &mut [u8]) -> Result<()> {
        self.take_at(index, Some(out))
    }

    /// Remove and return the element at `index` by moving the last element
    /// into its slot. O(1), does not preserve order.
    pub fn remove_fast(&mut self, index: usize) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.width];
        self.take_swapped(index, Some(&mut out))?;
        Ok(out)
    }

    /// Like [`remove_fast`](Self::remove_fast), copying into `out`
    pub fn remove_fast_into(&mut self, index: usize, out: &mut [u8]) -> Result<()> {
        self.take_swapped(index, Some(out))
    }

    /// Drop all elements without releasing capacity
    pub fn clear(&mut self) {
        self.len = 0;
    }

    // =========================================================================
    // Whole-array Operations
    // =========================================================================

    /// Reverse element order in place
    pub fn reverse(&mut self) {
        let w = self.width;
        let (mut i, mut j) = (0, self.len);
        while i + 1 < j {
            j -= 1;
            let (head, tail) = self.buf.split_at_mut(j * w);
            head[i * w..(i + 1) * w].swap_with_slice(&mut tail[..w]);
            i += 1;
        }
    }

    /// A reversed copy of this array
    pub fn reversed(&self) -> Result<Self> {
        let mut copy = self.copy()?;
        copy.reverse();
        Ok(copy)
    }

    /// Sort elements in place with `cmp`
    ///
    /// The sort is stable. It needs scratch space proportional to the
    /// array, so it can fail with an allocation error; the array is left
    /// untouched in that case.
    pub fn sort_by<F>(&mut self, mut cmp: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        let w = self.width;
        let live_len = self.len * w;

        let mut order: Vec<usize> = Vec::new();
        order.try_reserve_exact(self.len)?;
        order.extend(0..self.len);

        let mut sorted = Vec::new();
        sorted.try_reserve_exact(live_len)?;

        let live = &self.buf[..live_len];
        order.sort_by(|&a, &b| cmp(&live[a * w..(a + 1) * w], &live[b * w..(b + 1) * w]));
        for i in order {
            sorted.extend_from_slice(&live[i * w..(i + 1) * w]);
        }

        self.buf[..live_len].copy_from_slice(&sorted);
        Ok(())
    }

    /// Find `needle` in an array already sorted by `cmp`
    ///
    /// `cmp(element, needle)` must order elements the same way the sort
    /// did. Returns the index of some matching element; which one is
    /// unspecified when duplicates exist.
    pub fn binary_search_by<F>(&self, needle: &[u8], mut cmp: F) -> Option<usize>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        if needle.len() != self.width {
            return None;
        }

        let (mut lo, mut hi) = (0, self.len);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match cmp(&self.buf[self.span(mid)], needle) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => return Some(mid),
            }
        }
        None
    }

    /// Index of the first element byte-equal to `needle`
    pub fn linear_search(&self, needle: &[u8]) -> Option<usize> {
        if needle.len() != self.width {
            return None;
        }
        self.iter().position(|element| element == needle)
    }

    /// Deep copy with the same capacity and contents
    pub fn copy(&self) -> Result<Self> {
        let mut copy = Self::with_capacity(self.width, self.capacity)?;
        copy.buf[..self.len * self.width].copy_from_slice(self.as_bytes());
        copy.len = self.len;
        copy.shrink = self.shrink;
        Ok(copy)
    }

    /// Display adapter that formats each element with `render`
    ///
    /// ```
    /// # use flatcoll::DynArray;
    /// let array = DynArray::from_bytes(1, b"abc").unwrap();
    /// let text = array.render(|e, f| write!(f, "{}", e[0] as char)).to_string();
    /// assert_eq!(text, "[a, b, c]");
    /// ```
    pub fn render<F>(&self, render: F) -> Rendered<'_, F>
    where
        F: Fn(&[u8], &mut fmt::Formatter<'_>) -> fmt::Result,
    {
        Rendered {
            array: self,
            render,
        }
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Byte range of the slot at `index`
    fn span(&self, index: usize) -> Range<usize> {
        index * self.width..(index + 1) * self.width
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(FlatError::OutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    fn last_index(&self) -> Result<usize> {
        self.len.checked_sub(1).ok_or(FlatError::Empty)
    }

    fn check_width(&self, value: &[u8]) -> Result<()> {
        if value.len() != self.width {
            return Err(FlatError::WidthMismatch {
                expected: self.width,
                found: value.len(),
            });
        }
        Ok(())
    }

    /// Make room for `additional` more elements, doubling as needed
    fn reserve(&mut self, additional: usize) -> Result<()> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or_else(capacity_overflow)?;
        if needed <= self.capacity {
            return Ok(());
        }

        let mut new_capacity = self.capacity.max(1);
        while new_capacity < needed {
            new_capacity = new_capacity.checked_mul(2).ok_or_else(capacity_overflow)?;
        }

        let bytes = byte_len(new_capacity, self.width)?;
        self.buf.try_reserve_exact(bytes - self.buf.len())?;
        self.buf.resize(bytes, 0);

        debug!(
            old_capacity = self.capacity,
            new_capacity,
            len = self.len,
            "array grown"
        );
        self.capacity = new_capacity;
        Ok(())
    }

    /// Halve capacity once if the array has become less than half full
    fn maybe_shrink(&mut self) {
        if !self.shrink || self.len >= self.capacity / 2 {
            return;
        }

        let new_capacity = self.capacity / 2;
        let bytes = new_capacity * self.width;
        self.buf.truncate(bytes);
        self.buf.shrink_to(bytes);

        debug!(
            old_capacity = self.capacity,
            new_capacity,
            len = self.len,
            "array shrunk"
        );
        self.capacity = new_capacity;
    }

    fn take_last(&mut self, out: Option<&mut [u8]>) -> Result<()> {
        let last = self.last_index()?;
        if let Some(out) = out {
            self.check_width(out)?;
            out.copy_from_slice(&self.buf[self.span(last)]);
        }
        self.len = last;
        self.maybe_shrink();
        Ok(())
    }

    fn take_at(&mut self, index: usize, out: Option<&mut [u8]>) -> Result<()> {
        self.check_index(index)?;
        if index + 1 == self.len {
            return self.take_last(out);
        }
        if let Some(out) = out {
            self.check_width(out)?;
            out.copy_from_slice(&self.buf[self.span(index)]);
        }

        let w = self.width;
        self.buf.copy_within((index + 1) * w..self.len * w, index * w);
        self.len -= 1;
        self.maybe_shrink();
        Ok(())
    }

    fn take_swapped(&mut self, index: usize, out: Option<&mut [u8]>) -> Result<()> {
        self.check_index(index)?;
        if let Some(out) = out {
            self.check_width(out)?;
            out.copy_from_slice(&self.buf[self.span(index)]);
        }

        let last = self.len - 1;
        if index != last {
            trace!(index, last, "moving last element into removed slot");
            let from = self.span(last);
            self.buf.copy_within(from, index * self.width);
        }
        self.take_last(None)
    }
}

impl PartialEq for DynArray {
    /// Element-wise equality; capacity is not compared
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DynArray {}

impl fmt::Debug for DynArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynArray")
            .field("element_width", &self.width)
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("elements", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

/// Display adapter returned by [`DynArray::render`]
pub struct Rendered<'a, F> {
    array: &'a DynArray,
    render: F,
}

impl<F> fmt::Display for Rendered<'_, F>
where
    F: Fn(&[u8], &mut fmt::Formatter<'_>) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.array.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            (self.render)(element, f)?;
        }
        f.write_str("]")
    }
}

// =============================================================================
// Size Arithmetic
// =============================================================================

fn capacity_overflow() -> FlatError {
    FlatError::Allocation("capacity overflow".to_string())
}

fn byte_len(capacity: usize, width: usize) -> Result<usize> {
    capacity.checked_mul(width).ok_or_else(capacity_overflow)
}

fn element_count(width: usize, bytes: &[u8]) -> Result<usize> {
    if width == 0 {
        return Err(FlatError::InvalidArgument(
            "element width must be non-zero".to_string(),
        ));
    }
    if bytes.len() % width != 0 {
        return Err(FlatError::InvalidArgument(format!(
            "{} bytes is not a whole number of {}-byte elements",
            bytes.len(),
            width
        )));
    }
    Ok(bytes.len() / width)
}
