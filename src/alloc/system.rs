//! `StdAlloc`: the default, stateless allocator.
//!
//! Forwards to a `'static` [`GlobalAlloc`] backend. `std::alloc::System` is
//! always available; the `alloc-mimalloc`, `alloc-jemalloc` and
//! `alloc-snmalloc` features add the corresponding backends so a container can
//! use them without replacing the process-wide global allocator.

use super::allocator::{array_layout, Allocator};
use crate::error::AllocError;
use crate::macros::trace_event;
use core::alloc::GlobalAlloc;
use core::fmt;
use core::marker::PhantomData;
use core::ptr::NonNull;
use std::alloc::System;

/// A global allocator with a single static instance.
pub trait Backend: GlobalAlloc + Sync + 'static {
    /// The shared instance all `StdAlloc` handles forward to.
    fn instance() -> &'static Self;
}

impl Backend for System {
    #[inline(always)]
    fn instance() -> &'static Self {
        static INSTANCE: System = System;
        &INSTANCE
    }
}

#[cfg(feature = "alloc-mimalloc")]
impl Backend for mimalloc::MiMalloc {
    #[inline(always)]
    fn instance() -> &'static Self {
        static INSTANCE: mimalloc::MiMalloc = mimalloc::MiMalloc;
        &INSTANCE
    }
}

#[cfg(feature = "alloc-jemalloc")]
impl Backend for jemallocator::Jemalloc {
    #[inline(always)]
    fn instance() -> &'static Self {
        static INSTANCE: jemallocator::Jemalloc = jemallocator::Jemalloc;
        &INSTANCE
    }
}

#[cfg(feature = "alloc-snmalloc")]
impl Backend for snmalloc_rs::SnMalloc {
    #[inline(always)]
    fn instance() -> &'static Self {
        static INSTANCE: snmalloc_rs::SnMalloc = snmalloc_rs::SnMalloc;
        &INSTANCE
    }
}

/// `StdAlloc` backed by mimalloc.
#[cfg(feature = "alloc-mimalloc")]
pub type MimallocAlloc<T> = StdAlloc<T, mimalloc::MiMalloc>;

/// `StdAlloc` backed by jemalloc.
#[cfg(feature = "alloc-jemalloc")]
pub type JemallocAlloc<T> = StdAlloc<T, jemallocator::Jemalloc>;

/// `StdAlloc` backed by snmalloc.
#[cfg(feature = "alloc-snmalloc")]
pub type SnmallocAlloc<T> = StdAlloc<T, snmalloc_rs::SnMalloc>;

/// Stateless allocator for `T` over the backend `G`.
///
/// Zero-sized and `Copy`; every `StdAlloc<_, G>` compares equal to every
/// other one with the same backend, whatever the element type.
pub struct StdAlloc<T, G: Backend = System> {
    _marker: PhantomData<(fn() -> T, fn() -> G)>,
}

impl<T, G: Backend> StdAlloc<T, G> {
    /// Creates a new handle.
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T, G: Backend> Clone for StdAlloc<T, G> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, G: Backend> Copy for StdAlloc<T, G> {}

impl<T, G: Backend> Default for StdAlloc<T, G> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U, G: Backend> PartialEq<StdAlloc<U, G>> for StdAlloc<T, G> {
    #[inline(always)]
    fn eq(&self, _other: &StdAlloc<U, G>) -> bool {
        true
    }
}

impl<T, G: Backend> Eq for StdAlloc<T, G> {}

impl<T, G: Backend> fmt::Debug for StdAlloc<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StdAlloc")
    }
}

impl<T, G: Backend> Allocator<T> for StdAlloc<T, G> {
    type Rebind<U> = StdAlloc<U, G>;

    #[inline(always)]
    fn rebind<U>(&self) -> StdAlloc<U, G> {
        StdAlloc::new()
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let layout = array_layout::<T>(n)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }
        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { G::instance().alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or_else(|| {
            trace_event!(warn, bytes = layout.size(), "allocation failed");
            AllocError::new(layout.size())
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        // The layout was valid when the block was allocated.
        let Ok(layout) = array_layout::<T>(n) else {
            return;
        };
        if layout.size() != 0 {
            G::instance().dealloc(ptr.as_ptr().cast(), layout);
        }
    }
}
