//! `proptest` strategies for the containers.
//!
//! Requires crate feature `"proptest"`.
//!
//! ```rust,ignore
//! proptest! {
//!     #[test]
//!     fn sums_match(d in keel::strategy::deque::<_, 8>(any::<u8>(), 0..100)) {
//!         prop_assert_eq!(d.iter().count(), d.len());
//!     }
//! }
//! ```

use crate::collections::{Deque, List, Vector};
use core::fmt::Debug;
use proptest::collection::{vec, SizeRange};
use proptest::strategy::Strategy;

/// Deques with buffers of `BUFFER` elements and a length in `size`.
pub fn deque<S, const BUFFER: usize>(
    element: S,
    size: impl Into<SizeRange>,
) -> impl Strategy<Value = Deque<S::Value, BUFFER>>
where
    S: Strategy,
    S::Value: Debug,
{
    vec(element, size).prop_map(Deque::from)
}

/// Vectors with a length in `size`.
pub fn vector<S>(element: S, size: impl Into<SizeRange>) -> impl Strategy<Value = Vector<S::Value>>
where
    S: Strategy,
    S::Value: Debug,
{
    vec(element, size).prop_map(Vector::from)
}

/// Lists with a length in `size`.
pub fn list<S>(element: S, size: impl Into<SizeRange>) -> impl Strategy<Value = List<S::Value>>
where
    S: Strategy,
    S::Value: Debug,
{
    vec(element, size).prop_map(|items| items.into_iter().collect())
}
