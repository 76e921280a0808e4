//! Compile-time configuration shared by the containers.
//!
//! These are not runtime options: the deque buffer size is a const generic
//! parameter whose default is [`DEFAULT_BUFFER`], and the allocator of every
//! container is a type parameter.

/// Default number of elements per deque buffer.
///
/// Independent of `size_of::<T>()`; a larger buffer makes map reallocation
/// rarer at the cost of more memory per buffer.
pub const DEFAULT_BUFFER: usize = 512;

/// Smallest map a deque will allocate, in buffer slots.
pub const MIN_MAP_SIZE: usize = 8;

/// Slots kept free around the active nodes when a map is first sized.
pub(crate) const MAP_SPARE_SLOTS: usize = 2;
