//! Allocator-parameterized containers.
//!
//! - `array`: fixed-size array with checked access
//! - `vector`: contiguous growable array
//! - `list`: doubly-linked list with a link-level merge sort
//! - `deque`: double-ended queue over a map of fixed-size buffers

pub mod array;
pub mod deque;
pub mod list;
pub mod vector;

#[cfg(feature = "serde")]
mod serde_impls;

pub use array::Array;
pub use deque::Deque;
pub use list::List;
pub use vector::Vector;

use core::ops::{Bound, RangeBounds};

/// Resolves `range` against a container of length `len` into `[first, last)`.
///
/// # Panics
/// Panics if the range is decreasing or ends past `len`.
pub(crate) fn resolve_range<R: RangeBounds<usize>>(range: &R, len: usize) -> (usize, usize) {
    let first = match range.start_bound() {
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => i + 1,
        Bound::Unbounded => 0,
    };
    let last = match range.end_bound() {
        Bound::Included(&i) => i + 1,
        Bound::Excluded(&i) => i,
        Bound::Unbounded => len,
    };
    assert!(first <= last, "range starts at {first} but ends at {last}");
    assert!(last <= len, "range end {last} out of range for length {len}");
    (first, last)
}
