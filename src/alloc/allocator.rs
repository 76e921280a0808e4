//! The typed `Allocator` trait and layout helpers.

use crate::error::AllocError;
use core::alloc::Layout;
use core::mem;
use core::ptr::{self, NonNull};

/// A typed allocator for values of `T`.
///
/// This trait plays the role of `std::alloc::Allocator` for the containers in
/// this crate, but is parameterized over the element type: `allocate(n)`
/// returns storage for `n` values of `T`, and [`Allocator::rebind`] produces
/// an allocator of the same family for another element type (the deque uses
/// it for its map of buffer pointers, the list for its nodes).
///
/// Allocators are cheap handles that containers carry by value. Two handles
/// that compare equal must be able to release each other's storage.
pub trait Allocator<T>: Clone + PartialEq {
    /// The same allocator family, producing storage for `U`.
    type Rebind<U>: Allocator<U>;

    /// Returns an allocator of the same family for element type `U`.
    fn rebind<U>(&self) -> Self::Rebind<U>;

    /// Allocates uninitialized storage for `n` values of `T`.
    ///
    /// A request of zero bytes (`n == 0` or a zero-sized `T`) succeeds with a
    /// dangling pointer that must never be dereferenced.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the backend cannot satisfy the request or the
    /// byte size overflows.
    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError>;

    /// Releases storage obtained from [`Allocator::allocate`].
    ///
    /// # Safety
    /// `ptr` must come from `allocate(n)` on this allocator (or one equal to
    /// it) with the same `n`, and must not have been released already. Any
    /// values still living in the storage are not dropped.
    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize);

    /// Moves `value` into the uninitialized slot at `ptr`.
    ///
    /// # Safety
    /// `ptr` must be valid for writes and must not hold a live value.
    #[inline]
    unsafe fn construct(&self, ptr: NonNull<T>, value: T) {
        ptr.as_ptr().write(value);
    }

    /// Drops the value at `ptr` in place without releasing its storage.
    ///
    /// # Safety
    /// `ptr` must hold a live value, which is dead afterwards.
    #[inline]
    unsafe fn destroy(&self, ptr: NonNull<T>) {
        ptr::drop_in_place(ptr.as_ptr());
    }

    /// The largest `n` that can be passed to [`Allocator::allocate`].
    #[inline]
    fn max_size(&self) -> usize {
        max_elements::<T>()
    }
}

/// Largest element count whose byte size fits a `Layout`.
#[inline]
pub(crate) const fn max_elements<T>() -> usize {
    match mem::size_of::<T>() {
        0 => usize::MAX,
        size => isize::MAX as usize / size,
    }
}

/// Layout of `n` consecutive values of `T`.
#[inline]
pub(crate) fn array_layout<T>(n: usize) -> Result<Layout, AllocError> {
    Layout::array::<T>(n).map_err(|_| AllocError::capacity_overflow())
}
