//! `TrackingAllocator`: an allocator that records what it does.
//!
//! Wraps [`StdAlloc`] and counts allocations, deallocations and bytes in a
//! shared [`AllocStats`]. Every handle obtained by cloning or rebinding reports
//! into the same stats, so a deque's buffers and its map are accounted
//! together. An optional allocation budget makes `allocate` fail once it is
//! used up, which is how the teardown paths of the containers are tested.

use super::allocator::{array_layout, Allocator};
use super::system::{Backend, StdAlloc};
use crate::error::AllocError;
use core::fmt;
use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::alloc::System;
use std::sync::Arc;

const UNLIMITED: usize = usize::MAX;

/// Counters shared by a family of [`TrackingAllocator`] handles.
pub struct AllocStats {
    allocated_count: AtomicUsize,
    allocated_bytes: AtomicUsize,
    deallocated_count: AtomicUsize,
    deallocated_bytes: AtomicUsize,
    failed_count: AtomicUsize,
    budget: AtomicUsize,
}

impl AllocStats {
    /// Creates zeroed counters with no allocation budget.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::unlimited())
    }

    /// Creates counters that allow only `allocations` more successful
    /// (non-zero-sized) allocations.
    pub fn with_budget(allocations: usize) -> Arc<Self> {
        let stats = Self::unlimited();
        stats.budget.store(allocations, Ordering::Relaxed);
        Arc::new(stats)
    }

    const fn unlimited() -> Self {
        Self {
            allocated_count: AtomicUsize::new(0),
            allocated_bytes: AtomicUsize::new(0),
            deallocated_count: AtomicUsize::new(0),
            deallocated_bytes: AtomicUsize::new(0),
            failed_count: AtomicUsize::new(0),
            budget: AtomicUsize::new(UNLIMITED),
        }
    }

    /// Replaces the remaining budget; `None` removes the limit.
    pub fn set_budget(&self, allocations: Option<usize>) {
        self.budget
            .store(allocations.unwrap_or(UNLIMITED), Ordering::Relaxed);
    }

    /// Number of successful allocations.
    pub fn allocations(&self) -> usize {
        self.allocated_count.load(Ordering::Relaxed)
    }

    /// Number of deallocations.
    pub fn deallocations(&self) -> usize {
        self.deallocated_count.load(Ordering::Relaxed)
    }

    /// Allocations that have not been released yet.
    pub fn live(&self) -> usize {
        self.allocations() - self.deallocations()
    }

    /// Bytes currently held.
    pub fn live_bytes(&self) -> usize {
        self.allocated_bytes.load(Ordering::Relaxed) - self.deallocated_bytes.load(Ordering::Relaxed)
    }

    /// Requests refused because the budget ran out or the backend failed.
    pub fn failures(&self) -> usize {
        self.failed_count.load(Ordering::Relaxed)
    }

    #[inline(always)]
    fn on_alloc(&self, size: usize) {
        self.allocated_count.fetch_add(1, Ordering::Relaxed);
        self.allocated_bytes.fetch_add(size, Ordering::Relaxed);
    }

    #[inline(always)]
    fn on_dealloc(&self, size: usize) {
        self.deallocated_count.fetch_add(1, Ordering::Relaxed);
        self.deallocated_bytes.fetch_add(size, Ordering::Relaxed);
    }

    fn take_budget(&self) -> bool {
        self.budget
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| match left {
                UNLIMITED => Some(UNLIMITED),
                0 => None,
                n => Some(n - 1),
            })
            .is_ok()
    }
}

impl fmt::Debug for AllocStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocStats")
            .field("allocations", &self.allocations())
            .field("deallocations", &self.deallocations())
            .field("live_bytes", &self.live_bytes())
            .field("failures", &self.failures())
            .finish()
    }
}

/// An allocator that reports every request into a shared [`AllocStats`].
pub struct TrackingAllocator<T, G: Backend = System> {
    inner: StdAlloc<T, G>,
    stats: Arc<AllocStats>,
}

impl<T> TrackingAllocator<T> {
    /// Creates a tracking allocator over `System` with fresh counters.
    pub fn new() -> Self {
        Self::with_stats(AllocStats::new())
    }
}

impl<T> Default for TrackingAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, G: Backend> TrackingAllocator<T, G> {
    /// Creates a handle reporting into `stats`.
    pub fn with_stats(stats: Arc<AllocStats>) -> Self {
        Self {
            inner: StdAlloc::new(),
            stats,
        }
    }

    /// The counters this handle reports into.
    pub fn stats(&self) -> &Arc<AllocStats> {
        &self.stats
    }
}

impl<T, G: Backend> Clone for TrackingAllocator<T, G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner,
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<T, U, G: Backend> PartialEq<TrackingAllocator<U, G>> for TrackingAllocator<T, G> {
    fn eq(&self, other: &TrackingAllocator<U, G>) -> bool {
        Arc::ptr_eq(&self.stats, &other.stats)
    }
}

impl<T, G: Backend> Eq for TrackingAllocator<T, G> {}

impl<T, G: Backend> fmt::Debug for TrackingAllocator<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TrackingAllocator").field(&self.stats).finish()
    }
}

impl<T, G: Backend> Allocator<T> for TrackingAllocator<T, G> {
    type Rebind<U> = TrackingAllocator<U, G>;

    fn rebind<U>(&self) -> TrackingAllocator<U, G> {
        TrackingAllocator {
            inner: StdAlloc::new(),
            stats: Arc::clone(&self.stats),
        }
    }

    fn allocate(&self, n: usize) -> Result<NonNull<T>, AllocError> {
        let size = array_layout::<T>(n)?.size();
        if size == 0 {
            return self.inner.allocate(n);
        }
        if !self.stats.take_budget() {
            self.stats.failed_count.fetch_add(1, Ordering::Relaxed);
            return Err(AllocError::new(size));
        }
        match self.inner.allocate(n) {
            Ok(ptr) => {
                self.stats.on_alloc(size);
                Ok(ptr)
            }
            Err(err) => {
                self.stats.failed_count.fetch_add(1, Ordering::Relaxed);
                Err(err)
            }
        }
    }

    unsafe fn deallocate(&self, ptr: NonNull<T>, n: usize) {
        let size = array_layout::<T>(n).map_or(0, |layout| layout.size());
        if size != 0 {
            self.stats.on_dealloc(size);
        }
        self.inner.deallocate(ptr, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_allocations_and_bytes() {
        let alloc = TrackingAllocator::<u32>::new();
        let a = alloc.allocate(4).unwrap();
        let b = alloc.allocate(2).unwrap();
        assert_eq!(alloc.stats().allocations(), 2);
        assert_eq!(alloc.stats().live_bytes(), 24);
        unsafe {
            alloc.deallocate(a, 4);
            alloc.deallocate(b, 2);
        }
        assert_eq!(alloc.stats().live(), 0);
        assert_eq!(alloc.stats().live_bytes(), 0);
    }

    #[test]
    fn rebound_handles_share_stats() {
        let alloc = TrackingAllocator::<u8>::new();
        let words: TrackingAllocator<u64> = alloc.rebind();
        let p = words.allocate(1).unwrap();
        assert_eq!(alloc.stats().live(), 1);
        assert!(alloc == words);
        unsafe { words.deallocate(p, 1) };
        assert_eq!(alloc.stats().live(), 0);

        assert!(alloc != TrackingAllocator::<u8>::new());
    }

    #[test]
    fn budget_refuses_requests_once_spent() {
        let alloc = TrackingAllocator::<u16>::with_stats(AllocStats::with_budget(1));
        let p = alloc.allocate(8).unwrap();
        assert_eq!(alloc.allocate(8), Err(AllocError::new(16)));
        assert_eq!(alloc.stats().failures(), 1);

        // Zero-sized requests never consume the budget.
        assert!(alloc.allocate(0).is_ok());

        alloc.stats().set_budget(None);
        let q = alloc.allocate(8).unwrap();
        unsafe {
            alloc.deallocate(p, 8);
            alloc.deallocate(q, 8);
        }
        assert_eq!(alloc.stats().live(), 0);
    }
}
