//! DynArray Tests
//!
//! Tests verify:
//! - Construction and argument validation
//! - Bounds-checked access
//! - Growth and shrink policy
//! - Order-preserving and fast removal
//! - Whole-array operations (reverse, sort, search, copy)

use std::cmp::Ordering;

use flatcoll::config::Config;
use flatcoll::{DynArray, FlatError};

// =============================================================================
// Helper Functions
// =============================================================================

fn u32_array(capacity: usize, values: &[u32]) -> DynArray {
    let mut array = DynArray::with_capacity(4, capacity).unwrap();
    for v in values {
        array.append(&v.to_le_bytes()).unwrap();
    }
    array
}

fn read_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes.try_into().unwrap())
}

fn values(array: &DynArray) -> Vec<u32> {
    array.iter().map(read_u32).collect()
}

fn cmp_u32(a: &[u8], b: &[u8]) -> Ordering {
    read_u32(a).cmp(&read_u32(b))
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_new_array_is_empty() {
    let array = DynArray::new(8).unwrap();
    assert!(array.is_empty());
    assert_eq!(array.len(), 0);
    assert_eq!(array.capacity(), 8);
    assert_eq!(array.element_width(), 8);
}

#[test]
fn test_zero_width_rejected() {
    let result = DynArray::with_capacity(0, 4);
    assert!(matches!(result, Err(FlatError::InvalidArgument(_))));
}

#[test]
fn test_with_config_uses_capacity_and_shrink_flag() {
    let config = Config::builder()
        .array_capacity(3)
        .shrink_arrays(false)
        .build();
    let array = DynArray::with_config(2, &config).unwrap();
    assert_eq!(array.capacity(), 3);
    assert!(!array.shrinks());
}

#[test]
fn test_from_bytes() {
    let array = DynArray::from_bytes(2, &[1, 0, 2, 0, 3, 0]).unwrap();
    assert_eq!(array.len(), 3);
    assert_eq!(array.peek_at(1).unwrap(), &[2, 0]);
}

#[test]
fn test_from_bytes_rejects_partial_element() {
    let result = DynArray::from_bytes(4, &[1, 2, 3]);
    assert!(matches!(result, Err(FlatError::InvalidArgument(_))));
}

#[test]
fn test_oversized_capacity_reports_reservation_failure() {
    let result = DynArray::with_capacity(1, usize::MAX);
    assert!(matches!(result, Err(FlatError::Reserve(_))));
}

#[test]
fn test_capacity_arithmetic_overflow_reports_allocation_error() {
    let result = DynArray::with_capacity(2, usize::MAX);
    assert!(matches!(result, Err(FlatError::Allocation(_))));
}

// =============================================================================
// Access Tests
// =============================================================================

#[test]
fn test_peek_out_of_bounds() {
    let array = u32_array(2, &[1]);
    assert_eq!(
        array.peek_at(1),
        Err(FlatError::OutOfBounds { index: 1, len: 1 })
    );
}

#[test]
fn test_peek_last_on_empty() {
    let array = DynArray::new(4).unwrap();
    assert_eq!(array.peek_last(), Err(FlatError::Empty));
}

#[test]
fn test_at_mutates_in_place() {
    let mut array = u32_array(2, &[1, 2]);
    array.at(0).unwrap().copy_from_slice(&9u32.to_le_bytes());
    array.at_last().unwrap()[0] = 7;
    assert_eq!(values(&array), vec![9, 7]);
    assert_eq!(array.capacity(), 2);
}

#[test]
fn test_append_width_mismatch() {
    let mut array = DynArray::new(4).unwrap();
    let result = array.append(&[1, 2]);
    assert_eq!(
        result,
        Err(FlatError::WidthMismatch {
            expected: 4,
            found: 2
        })
    );
    assert!(array.is_empty());
}

#[test]
fn test_set_at() {
    let mut array = u32_array(4, &[1, 2, 3]);
    array.set_at(1, &20u32.to_le_bytes()).unwrap();
    assert_eq!(values(&array), vec![1, 20, 3]);
    assert!(array.set_at(3, &0u32.to_le_bytes()).is_err());
}

// =============================================================================
// Capacity Policy Tests
// =============================================================================

#[test]
fn test_append_grows_capacity_to_four() {
    let array = u32_array(2, &[10, 20, 30]);
    assert_eq!(array.capacity(), 4);
    assert_eq!(read_u32(array.peek_at(2).unwrap()), 30);
}

#[test]
fn test_pop_returns_last() {
    let mut array = u32_array(2, &[10, 20, 30]);
    let popped = array.pop().unwrap();
    assert_eq!(read_u32(&popped), 30);
    assert_eq!(array.len(), 2);
}

#[test]
fn test_growth_is_smallest_power_of_two_multiple() {
    for &(initial, n) in &[(1usize, 5usize), (3, 7), (3, 13), (5, 5), (2, 1)] {
        let values: Vec<u32> = (0..n as u32).collect();
        let array = u32_array(initial, &values);

        let mut expected = initial;
        while expected < n {
            expected *= 2;
        }
        assert_eq!(array.capacity(), expected, "initial={} n={}", initial, n);
    }
}

#[test]
fn test_zero_capacity_grows_from_one() {
    let mut array = DynArray::with_capacity(1, 0).unwrap();
    assert_eq!(array.capacity(), 0);
    array.append(&[1]).unwrap();
    assert_eq!(array.capacity(), 1);
    array.append(&[2]).unwrap();
    assert_eq!(array.capacity(), 2);
}

#[test]
fn test_pop_halves_capacity_once_per_crossing() {
    let mut array = u32_array(8, &[1, 2, 3, 4, 5]);
    assert_eq!(array.capacity(), 8);

    array.pop().unwrap(); // len 4, not < 4
    assert_eq!(array.capacity(), 8);
    array.pop().unwrap(); // len 3 < 4
    assert_eq!(array.capacity(), 4);
    array.pop().unwrap(); // len 2, not < 2
    assert_eq!(array.capacity(), 4);
    array.pop().unwrap(); // len 1 < 2
    assert_eq!(array.capacity(), 2);
    array.pop().unwrap(); // len 0 < 1
    assert_eq!(array.capacity(), 1);
    assert_eq!(array.pop(), Err(FlatError::Empty));
}

#[test]
fn test_shrink_disabled_keeps_capacity() {
    let config = Config::builder()
        .array_capacity(8)
        .shrink_arrays(false)
        .build();
    let mut array = DynArray::with_config(4, &config).unwrap();
    array.append(&1u32.to_le_bytes()).unwrap();
    array.pop().unwrap();
    assert_eq!(array.capacity(), 8);
}

#[test]
fn test_length_never_exceeds_capacity() {
    let mut array = DynArray::with_capacity(4, 1).unwrap();
    for i in 0..50u32 {
        if i % 3 == 2 {
            array.remove(0).unwrap();
        } else {
            array.insert(array.len() / 2, &i.to_le_bytes()).unwrap();
        }
        assert!(array.len() <= array.capacity());
    }
}

// =============================================================================
// Insert / Remove Tests
// =============================================================================

#[test]
fn test_insert_shifts_right() {
    let mut array = u32_array(2, &[1, 3]);
    array.insert(1, &2u32.to_le_bytes()).unwrap();
    array.insert(0, &0u32.to_le_bytes()).unwrap();
    array.insert(4, &4u32.to_le_bytes()).unwrap();
    assert_eq!(values(&array), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_insert_past_end_fails() {
    let mut array = u32_array(2, &[1]);
    let result = array.insert(2, &5u32.to_le_bytes());
    assert_eq!(result, Err(FlatError::OutOfBounds { index: 2, len: 1 }));
    assert_eq!(values(&array), vec![1]);
}

#[test]
fn test_remove_preserves_order() {
    let mut array = u32_array(4, &[1, 2, 3, 4]);
    let removed = array.remove(1).unwrap();
    assert_eq!(read_u32(&removed), 2);
    assert_eq!(values(&array), vec![1, 3, 4]);
}

#[test]
fn test_remove_last_behaves_like_pop() {
    let mut array = u32_array(4, &[1, 2, 3]);
    let mut out = [0u8; 4];
    array.remove_into(2, &mut out).unwrap();
    assert_eq!(u32::from_le_bytes(out), 3);
    assert_eq!(values(&array), vec![1, 2]);
}

#[test]
fn test_remove_out_of_bounds() {
    let mut array = u32_array(4, &[1, 2]);
    assert_eq!(
        array.remove(2),
        Err(FlatError::OutOfBounds { index: 2, len: 2 })
    );
}

#[test]
fn test_remove_fast_moves_last_into_slot() {
    let mut array = u32_array(4, &[1, 2, 3, 4]);
    let mut out = [0u8; 4];
    array.remove_fast_into(0, &mut out).unwrap();
    assert_eq!(u32::from_le_bytes(out), 1);
    assert_eq!(values(&array), vec![4, 2, 3]);

    let removed = array.remove_fast(2).unwrap();
    assert_eq!(read_u32(&removed), 3);
    assert_eq!(values(&array), vec![4, 2]);
}

#[test]
fn test_pop_into_wrong_width_leaves_array_intact() {
    let mut array = u32_array(4, &[1, 2]);
    let mut out = [0u8; 2];
    assert!(array.pop_into(&mut out).is_err());
    assert_eq!(array.len(), 2);
}

#[test]
fn test_clear_keeps_capacity() {
    let mut array = u32_array(4, &[1, 2, 3]);
    array.clear();
    assert!(array.is_empty());
    assert_eq!(array.capacity(), 4);
}

// =============================================================================
// Extend Tests
// =============================================================================

#[test]
fn test_extend_grows_once_for_batch() {
    let mut array = u32_array(2, &[1]);
    let other = u32_array(8, &[2, 3, 4, 5, 6]);
    array.extend(&other).unwrap();
    assert_eq!(values(&array), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(array.capacity(), 8);
}

#[test]
fn test_extend_width_mismatch() {
    let mut array = u32_array(2, &[1]);
    let other = DynArray::from_bytes(2, &[0, 0]).unwrap();
    assert_eq!(
        array.extend(&other),
        Err(FlatError::WidthMismatch {
            expected: 4,
            found: 2
        })
    );
}

#[test]
fn test_extend_from_bytes() {
    let mut array = DynArray::new(1).unwrap();
    array.extend_from_bytes(b"hello").unwrap();
    assert_eq!(array.as_bytes(), b"hello");
}

// =============================================================================
// Whole-array Operation Tests
// =============================================================================

#[test]
fn test_reverse_in_place() {
    let mut array = u32_array(8, &[1, 2, 3, 4, 5]);
    array.reverse();
    assert_eq!(values(&array), vec![5, 4, 3, 2, 1]);

    let mut even = u32_array(4, &[1, 2, 3, 4]);
    even.reverse();
    assert_eq!(values(&even), vec![4, 3, 2, 1]);
}

#[test]
fn test_reversed_twice_round_trips() {
    let array = u32_array(2, &[7, 1, 9, 3]);
    let back = array.reversed().unwrap().reversed().unwrap();
    assert_eq!(back, array);
    assert_eq!(values(&array), vec![7, 1, 9, 3]);
}

#[test]
fn test_copy_is_independent() {
    let array = u32_array(4, &[1, 2, 3]);
    let mut copy = array.copy().unwrap();
    assert_eq!(copy, array);
    assert_eq!(copy.capacity(), array.capacity());

    copy.set_at(0, &100u32.to_le_bytes()).unwrap();
    copy.append(&4u32.to_le_bytes()).unwrap();
    assert_eq!(values(&array), vec![1, 2, 3]);
    assert_ne!(copy, array);
}

#[test]
fn test_sort_and_binary_search() {
    let mut array = u32_array(4, &[42, 7, 19, 3, 88, 7]);
    array.sort_by(cmp_u32).unwrap();
    assert_eq!(values(&array), vec![3, 7, 7, 19, 42, 88]);

    let found = array.binary_search_by(&19u32.to_le_bytes(), cmp_u32);
    assert_eq!(found, Some(3));

    let dup = array
        .binary_search_by(&7u32.to_le_bytes(), cmp_u32)
        .unwrap();
    assert_eq!(read_u32(array.peek_at(dup).unwrap()), 7);

    assert_eq!(array.binary_search_by(&20u32.to_le_bytes(), cmp_u32), None);
}

#[test]
fn test_sort_empty_array() {
    let mut array = DynArray::new(4).unwrap();
    array.sort_by(cmp_u32).unwrap();
    assert!(array.is_empty());
    assert_eq!(array.binary_search_by(&1u32.to_le_bytes(), cmp_u32), None);
}

#[test]
fn test_linear_search_finds_first_match() {
    let array = u32_array(4, &[5, 6, 5]);
    assert_eq!(array.linear_search(&5u32.to_le_bytes()), Some(0));
    assert_eq!(array.linear_search(&6u32.to_le_bytes()), Some(1));
    assert_eq!(array.linear_search(&9u32.to_le_bytes()), None);
    assert_eq!(array.linear_search(&[5]), None);
}

#[test]
fn test_render_delegates_each_element() {
    let array = u32_array(4, &[1, 22, 333]);
    let text = array
        .render(|bytes, f| write!(f, "{}", read_u32(bytes)))
        .to_string();
    assert_eq!(text, "[1, 22, 333]");

    let empty = DynArray::new(4).unwrap();
    assert_eq!(empty.render(|_, _| Ok(())).to_string(), "[]");
}
