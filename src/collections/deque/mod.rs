//! `Deque`: a double-ended queue over a map of fixed-size buffers.
//!
//! Elements live in buffers of `BUFFER` slots. A separately allocated *map*
//! holds one pointer per buffer; the active buffers occupy a contiguous run of
//! map slots `[start.node, finish.node]`, centred in the map so that both ends
//! have room to grow. Elements never move when the deque grows at either end:
//! only the map is reallocated (or recentred in place), which makes references
//! into the buffers stable under `push_front`/`push_back`.
//!
//! ```text
//!   map:  [ null | null | buf0 | buf1 | buf2 | null | null | null ]
//!                         ^start.node   ^finish.node
//!   buf0: [ .  .  a  b ]   <- start.offset = 2
//!   buf1: [ c  d  e  f ]
//!   buf2: [ g  .  .  . ]   <- finish.offset = 1 (one past `g`)
//! ```
//!
//! Performance Characteristics:
//! - Push/Pop at either end: amortized O(1); a new buffer every `BUFFER` pushes,
//!   a map reallocation far more rarely
//! - Random access: O(1), one division and two loads
//! - Insert/remove in the middle: O(min(i, len - i))
//! - Memory: at most two partially filled buffers plus the map

mod cursor;
mod iter;

pub use cursor::Cursor;
pub use iter::{IntoIter, Iter, IterMut};

use crate::alloc::uninit;
use crate::alloc::{AllocError, Allocator, StdAlloc};
use crate::collections::resolve_range;
use crate::config::{DEFAULT_BUFFER, MAP_SPARE_SLOTS, MIN_MAP_SIZE};
use crate::error::{Error, Result};
use crate::macros::trace_event;
use core::cmp::{self, Ordering};
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::mem;
use core::ops::{Index, IndexMut, RangeBounds};
use core::ptr::{self, NonNull};
use cursor::{Pos, RawCursor};

/// A double-ended queue with stable element addresses under growth at
/// either end.
///
/// `BUFFER` is the number of elements per buffer (default
/// [`DEFAULT_BUFFER`]); `A` allocates the buffers and, rebound to `*mut T`,
/// the map.
///
/// A freshly created deque is *inert*: it owns no memory until the first
/// element is inserted. [`Deque::take`] returns a deque to that state.
pub struct Deque<T, const BUFFER: usize = { DEFAULT_BUFFER }, A: Allocator<T> = StdAlloc<T>> {
    map: *mut *mut T,
    map_size: usize,
    start: Pos<BUFFER>,
    finish: Pos<BUFFER>,
    alloc: A,
    map_alloc: A::Rebind<*mut T>,
    _marker: PhantomData<T>,
}

impl<T> Deque<T> {
    /// Creates an empty deque with the default buffer size. Does not
    /// allocate.
    #[inline]
    pub fn new() -> Self {
        Self::new_in(StdAlloc::new())
    }
}

impl<T, const BUFFER: usize, A: Allocator<T>> Deque<T, BUFFER, A> {
    const VALID_BUFFER: () = assert!(BUFFER > 0, "deque buffers must hold at least one element");

    /// Number of elements per buffer.
    pub const BUFFER_SIZE: usize = BUFFER;

    /// Creates an empty deque that will allocate from `alloc`. Does not
    /// allocate.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        let () = Self::VALID_BUFFER;
        let map_alloc = alloc.rebind();
        Self {
            map: ptr::null_mut(),
            map_size: 0,
            start: Pos::default(),
            finish: Pos::default(),
            alloc,
            map_alloc,
            _marker: PhantomData,
        }
    }

    /// Creates a deque of `n` clones of `value`.
    pub fn from_elem_in(value: &T, n: usize, alloc: A) -> Self
    where
        T: Clone,
    {
        Self::try_from_elem_in(value, n, alloc).unwrap_or_else(|e| e.handle())
    }

    /// Fallible [`Deque::from_elem_in`].
    ///
    /// # Errors
    /// Returns [`AllocError`] if the map or a buffer cannot be allocated.
    pub fn try_from_elem_in(value: &T, n: usize, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        // SAFETY: `build_in` hands over exactly `n` uninitialized slots.
        Self::build_in(n, alloc, |dest| Ok(unsafe { uninit::uninitialized_fill_n(dest, n, value) }))
    }

    /// Creates a deque of `n` default values.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the map or a buffer cannot be allocated.
    pub fn try_with_len_in(n: usize, alloc: A) -> Result<Self, AllocError>
    where
        T: Default,
    {
        // SAFETY: as above.
        Self::build_in(n, alloc, |dest| Ok(unsafe { uninit::uninitialized_value_construct_n(dest, n) }))
    }

    /// Creates a deque holding clones of `items`.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the map or a buffer cannot be allocated.
    pub fn try_from_slice_in(items: &[T], alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        // SAFETY: as above.
        Self::build_in(items.len(), alloc, |dest| Ok(unsafe { uninit::uninitialized_copy(items, dest) }))
    }

    /// Creates a deque of `n` elements produced by `f(0)`, `f(1)`, ...
    ///
    /// # Errors
    /// Returns the first error of `f`, or an allocation failure converted
    /// into `E`. Elements already produced are dropped and all memory is
    /// released first.
    pub fn try_from_fn_in<E, F>(n: usize, alloc: A, mut f: F) -> Result<Self, E>
    where
        E: From<AllocError>,
        F: FnMut(usize) -> Result<T, E>,
    {
        let mut index = 0;
        Self::build_in(n, alloc, |dest| {
            // SAFETY: as above.
            unsafe {
                uninit::try_uninitialized_fill_with_n(dest, n, || {
                    let value = f(index);
                    index += 1;
                    value
                })
            }
        })
    }

    /// Lays out storage for `n` elements, then lets `fill` construct them.
    ///
    /// While `fill` runs the deque is logically empty, so an early return or
    /// a panic only has to release buffers, which `Drop` does.
    fn build_in<E, F>(n: usize, alloc: A, fill: F) -> Result<Self, E>
    where
        E: From<AllocError>,
        F: FnOnce(RawCursor<T, BUFFER>) -> Result<RawCursor<T, BUFFER>, E>,
    {
        let mut deque = Self::new_in(alloc);
        deque.initialize(n)?;
        let target = deque.finish;
        deque.finish = deque.start;
        let end = fill(deque.raw(deque.start))?;
        debug_assert!(end.pos == target);
        deque.finish = target;
        Ok(deque)
    }

    #[inline(always)]
    fn raw(&self, pos: Pos<BUFFER>) -> RawCursor<T, BUFFER> {
        RawCursor::new(self.map, pos)
    }

    /// Address of the slot at `pos`.
    ///
    /// # Safety
    /// `pos.node` must own a buffer.
    #[inline(always)]
    unsafe fn slot(&self, pos: Pos<BUFFER>) -> *mut T {
        pos.resolve(self.map)
    }

    /// Address of the element with logical index `index`.
    ///
    /// # Safety
    /// `index <= len`.
    #[inline(always)]
    unsafe fn slot_at(&self, index: usize) -> *mut T {
        self.slot(self.start.add(index as isize))
    }

    fn allocate_node(&self) -> Result<*mut T, AllocError> {
        self.alloc.allocate(BUFFER).map(NonNull::as_ptr)
    }

    /// # Safety
    /// `node` must come from `allocate_node` and hold no live elements.
    unsafe fn deallocate_node(&self, node: *mut T) {
        self.alloc.deallocate(NonNull::new_unchecked(node), BUFFER);
    }

    /// Allocates a map of `size` null slots.
    fn allocate_map(&self, size: usize) -> Result<*mut *mut T, AllocError> {
        let map = self.map_alloc.allocate(size)?.as_ptr();
        // SAFETY: `map` was just allocated for `size` pointers.
        unsafe { uninit::uninitialized_fill_n(map, size, &ptr::null_mut()) };
        Ok(map)
    }

    /// # Safety
    /// `map` must come from `allocate_map(size)`.
    unsafe fn deallocate_map(&self, map: *mut *mut T, size: usize) {
        self.map_alloc.deallocate(NonNull::new_unchecked(map), size);
    }

    /// Allocates the map and the buffers for `n` elements, centred in the
    /// map. Leaves `finish` at `start + n`; the slots are uninitialized.
    ///
    /// On failure nothing stays allocated and the deque is still inert.
    fn initialize(&mut self, n: usize) -> Result<(), AllocError> {
        debug_assert!(self.map.is_null());
        if n > self.max_size() {
            return Err(AllocError::capacity_overflow());
        }
        let num_nodes = n / BUFFER + 1;
        let map_size = cmp::max(MIN_MAP_SIZE, num_nodes + MAP_SPARE_SLOTS);
        let map = self.allocate_map(map_size)?;
        let nstart = (map_size - num_nodes) / 2;

        for i in 0..num_nodes {
            match self.allocate_node() {
                // SAFETY: nstart + i < map_size.
                Ok(node) => unsafe { *map.add(nstart + i) = node },
                Err(err) => {
                    // SAFETY: exactly the nodes [nstart, nstart + i) were
                    // allocated, and none holds elements yet.
                    unsafe {
                        for j in 0..i {
                            self.deallocate_node(*map.add(nstart + j));
                        }
                        self.deallocate_map(map, map_size);
                    }
                    return Err(err);
                }
            }
        }

        self.map = map;
        self.map_size = map_size;
        self.start = Pos::new(nstart, 0);
        self.finish = Pos::new(nstart + num_nodes - 1, n % BUFFER);
        trace_event!(trace, elements = n, map_size, nodes = num_nodes, "deque map initialized");
        Ok(())
    }

    #[inline]
    fn ensure_map(&mut self) -> Result<(), AllocError> {
        if self.map.is_null() {
            self.initialize(0)?;
        }
        Ok(())
    }

    /// Makes sure `nodes_to_add` map slots exist after `finish.node`.
    #[inline]
    fn reserve_map_at_back(&mut self, nodes_to_add: usize) -> Result<(), AllocError> {
        if nodes_to_add + 1 > self.map_size - self.finish.node {
            self.reallocate_map(nodes_to_add, false)?;
        }
        Ok(())
    }

    /// Makes sure `nodes_to_add` map slots exist before `start.node`.
    #[inline]
    fn reserve_map_at_front(&mut self, nodes_to_add: usize) -> Result<(), AllocError> {
        if nodes_to_add > self.start.node {
            self.reallocate_map(nodes_to_add, true)?;
        }
        Ok(())
    }

    /// Recentres the active nodes in the current map when it is less than
    /// half full, otherwise moves them into a larger map.
    #[cold]
    fn reallocate_map(&mut self, nodes_to_add: usize, add_at_front: bool) -> Result<(), AllocError> {
        let old_num_nodes = self.finish.node - self.start.node + 1;
        let new_num_nodes = old_num_nodes + nodes_to_add;
        let front_gap = if add_at_front { nodes_to_add } else { 0 };

        let new_start = if self.map_size > 2 * new_num_nodes {
            let new_start = (self.map_size - new_num_nodes) / 2 + front_gap;
            // SAFETY: both ranges lie inside the map; `ptr::copy` handles the
            // overlap in either direction.
            unsafe {
                ptr::copy(
                    self.map.add(self.start.node),
                    self.map.add(new_start),
                    old_num_nodes,
                );
                let old = self.start.node..self.start.node + old_num_nodes;
                let new = new_start..new_start + old_num_nodes;
                for i in old.filter(|i| !new.contains(i)) {
                    *self.map.add(i) = ptr::null_mut();
                }
            }
            trace_event!(debug, map_size = self.map_size, new_start, "deque map recentred");
            new_start
        } else {
            let new_map_size = self
                .map_size
                .checked_add(cmp::max(self.map_size, nodes_to_add))
                .and_then(|size| size.checked_add(MAP_SPARE_SLOTS))
                .ok_or_else(AllocError::capacity_overflow)?;
            let new_map = self.allocate_map(new_map_size)?;
            let new_start = (new_map_size - new_num_nodes) / 2 + front_gap;
            // SAFETY: distinct allocations; the old map is released after its
            // pointers have been copied out.
            unsafe {
                ptr::copy_nonoverlapping(
                    self.map.add(self.start.node),
                    new_map.add(new_start),
                    old_num_nodes,
                );
                self.deallocate_map(self.map, self.map_size);
            }
            trace_event!(debug, old_size = self.map_size, new_map_size, "deque map grown");
            self.map = new_map;
            self.map_size = new_map_size;
            new_start
        };

        self.start.node = new_start;
        self.finish.node = new_start + old_num_nodes - 1;
        Ok(())
    }

    /// Appends `value` at the back.
    ///
    /// # Errors
    /// Returns [`AllocError`] if a new buffer or a larger map is needed and
    /// cannot be allocated; the deque is unchanged and `value` is dropped.
    pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
        self.ensure_map()?;
        if self.finish.offset != BUFFER - 1 {
            // SAFETY: `finish` addresses a free slot of an owned buffer.
            unsafe { self.slot(self.finish).write(value) };
            self.finish.offset += 1;
        } else {
            self.reserve_map_at_back(1)?;
            let node = self.allocate_node()?;
            // SAFETY: the reserve guarantees slot `finish.node + 1` exists.
            unsafe {
                *self.map.add(self.finish.node + 1) = node;
                self.slot(self.finish).write(value);
            }
            self.finish = Pos::new(self.finish.node + 1, 0);
        }
        Ok(())
    }

    /// Prepends `value` at the front.
    ///
    /// # Errors
    /// Same as [`Deque::try_push_back`].
    pub fn try_push_front(&mut self, value: T) -> Result<(), AllocError> {
        self.ensure_map()?;
        if self.start.offset != 0 {
            let pos = Pos::new(self.start.node, self.start.offset - 1);
            // SAFETY: the slot before `start` in the same buffer is free.
            unsafe { self.slot(pos).write(value) };
            self.start = pos;
        } else {
            self.reserve_map_at_front(1)?;
            let node = self.allocate_node()?;
            let pos = Pos::new(self.start.node - 1, BUFFER - 1);
            // SAFETY: the reserve guarantees slot `start.node - 1` exists.
            unsafe {
                *self.map.add(pos.node) = node;
                self.slot(pos).write(value);
            }
            self.start = pos;
        }
        Ok(())
    }

    /// Appends `value` at the back.
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.try_push_back(value) {
            err.handle();
        }
    }

    /// Prepends `value` at the front.
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.try_push_front(value) {
            err.handle();
        }
    }

    /// Removes and returns the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        if self.finish.offset != 0 {
            self.finish.offset -= 1;
        } else {
            // SAFETY: the finish buffer holds no elements.
            unsafe {
                self.deallocate_node(*self.map.add(self.finish.node));
                *self.map.add(self.finish.node) = ptr::null_mut();
            }
            self.finish = Pos::new(self.finish.node - 1, BUFFER - 1);
        }
        // SAFETY: `finish` now addresses the last live element.
        Some(unsafe { self.slot(self.finish).read() })
    }

    /// Removes and returns the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: `start` addresses the first live element.
        let value = unsafe { self.slot(self.start).read() };
        if self.start.offset != BUFFER - 1 {
            self.start.offset += 1;
        } else {
            // SAFETY: the element just read was the last one in its buffer.
            unsafe {
                self.deallocate_node(*self.map.add(self.start.node));
                *self.map.add(self.start.node) = ptr::null_mut();
            }
            self.start = Pos::new(self.start.node + 1, 0);
        }
        Some(value)
    }

    /// Drops every element in `[start, finish)`, buffer by buffer.
    ///
    /// # Safety
    /// The caller must forget the range afterwards.
    unsafe fn drop_range(&mut self, start: Pos<BUFFER>, finish: Pos<BUFFER>) {
        if !mem::needs_drop::<T>() {
            return;
        }
        if start.node == finish.node {
            ptr::drop_in_place(self.segment(start.node, start.offset, finish.offset));
        } else {
            ptr::drop_in_place(self.segment(start.node, start.offset, BUFFER));
            for node in start.node + 1..finish.node {
                ptr::drop_in_place(self.segment(node, 0, BUFFER));
            }
            ptr::drop_in_place(self.segment(finish.node, 0, finish.offset));
        }
    }

    /// Slots `[from, to)` of buffer `node`.
    ///
    /// # Safety
    /// `node` must own a buffer.
    #[inline(always)]
    unsafe fn segment(&self, node: usize, from: usize, to: usize) -> *mut [T] {
        ptr::slice_from_raw_parts_mut((*self.map.add(node)).add(from), to - from)
    }

    /// Drops every element and releases every buffer but the first.
    ///
    /// Idempotent; the map is kept.
    pub fn clear(&mut self) {
        if self.map.is_null() {
            return;
        }
        let (start, finish) = (self.start, self.finish);
        self.finish = start;
        // SAFETY: [start, finish) were the live elements; `finish = start`
        // already forgets them. Nodes after `start.node` no longer hold
        // anything.
        unsafe {
            self.drop_range(start, finish);
            for node in start.node + 1..=finish.node {
                self.deallocate_node(*self.map.add(node));
                *self.map.add(node) = ptr::null_mut();
            }
        }
    }

    /// Shortens the deque to `len` elements, dropping the rest from the back.
    pub fn truncate(&mut self, len: usize) {
        while self.len() > len {
            drop(self.pop_back());
        }
    }

    /// Resizes to `new_len`, cloning `value` into new slots at the back.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        let len = self.len();
        if new_len <= len {
            self.truncate(new_len);
        } else {
            for _ in len..new_len {
                self.push_back(value.clone());
            }
        }
    }

    /// Inserts `value` at `index`, shifting the shorter side.
    ///
    /// # Errors
    /// Returns [`AllocError`] if growing the deque fails; the deque is left
    /// unchanged.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), AllocError> {
        let len = self.len();
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");
        if index < len / 2 {
            self.try_push_front(value)?;
            for i in 0..index {
                self.swap(i, i + 1);
            }
        } else {
            self.try_push_back(value)?;
            for i in (index..len).rev() {
                self.swap(i, i + 1);
            }
        }
        Ok(())
    }

    /// Inserts `value` at `index`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert(index, value) {
            err.handle();
        }
    }

    /// Removes and returns the element at `index`, shifting the shorter side.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let len = self.len();
        if index >= len {
            return None;
        }
        if index < len / 2 {
            for i in (0..index).rev() {
                self.swap(i, i + 1);
            }
            self.pop_front()
        } else {
            for i in index..len - 1 {
                self.swap(i, i + 1);
            }
            self.pop_back()
        }
    }

    /// Removes the elements in `range`, shifting the shorter side.
    ///
    /// # Panics
    /// Panics if the range is decreasing or extends past `len`.
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) {
        let len = self.len();
        let (first, last) = resolve_range(&range, len);

        let count = last - first;
        if count == 0 {
            return;
        }
        if first < len - last {
            for i in (0..first).rev() {
                self.swap(i, i + count);
            }
            for _ in 0..count {
                drop(self.pop_front());
            }
        } else {
            for i in last..len {
                self.swap(i, i - count);
            }
            for _ in 0..count {
                drop(self.pop_back());
            }
        }
    }

    /// Moves every element of `other` to the back of `self`.
    pub fn append<const B2: usize, A2: Allocator<T>>(&mut self, other: &mut Deque<T, B2, A2>) {
        while let Some(value) = other.pop_front() {
            self.push_back(value);
        }
    }

    /// Swaps the elements at `i` and `j`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn swap(&mut self, i: usize, j: usize) {
        let len = self.len();
        assert!(i < len && j < len, "swap indices ({i}, {j}) out of range for deque of length {len}");
        if i != j {
            // SAFETY: both indices address live elements.
            unsafe { ptr::swap(self.slot_at(i), self.slot_at(j)) };
        }
    }

    /// The element at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len() {
            // SAFETY: bounds checked.
            Some(unsafe { &*self.slot_at(index) })
        } else {
            None
        }
    }

    /// Mutable access to the element at `index`, or `None` if out of range.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len() {
            // SAFETY: bounds checked.
            Some(unsafe { &mut *self.slot_at(index) })
        } else {
            None
        }
    }

    /// Bounds-checked access.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `index >= len`.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len();
        self.get(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `index >= len`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len();
        self.get_mut(index).ok_or(Error::OutOfRange { index, len })
    }

    /// Access without a bounds check.
    ///
    /// # Safety
    /// `index < len`.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        &*self.slot_at(index)
    }

    /// Mutable access without a bounds check.
    ///
    /// # Safety
    /// `index < len`.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        &mut *self.slot_at(index)
    }

    /// The first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// The first element, mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// The last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// The last element, mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.len().checked_sub(1).and_then(move |i| self.get_mut(i))
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.finish.distance(self.start) as usize
    }

    /// `true` if the deque holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.finish
    }

    /// Number of elements the currently allocated buffers can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        if self.map.is_null() {
            0
        } else {
            (self.finish.node - self.start.node + 1) * BUFFER
        }
    }

    /// Largest number of elements the allocator could ever provide.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.alloc.max_size()
    }

    /// Number of slots in the map (0 while inert).
    #[inline]
    pub fn map_size(&self) -> usize {
        self.map_size
    }

    /// Number of elements per buffer.
    #[inline]
    pub const fn buffer_size(&self) -> usize {
        BUFFER
    }

    /// The element allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Moves the contents out, leaving `self` inert: no map, no buffers,
    /// `len() == 0` and `begin() == end()`.
    pub fn take(&mut self) -> Self {
        let inert = Self::new_in(self.alloc.clone());
        mem::replace(self, inert)
    }

    /// Cursor at the first element.
    #[inline]
    pub fn begin(&self) -> Cursor<'_, T, BUFFER> {
        self.cursor(self.start)
    }

    /// Cursor one past the last element.
    #[inline]
    pub fn end(&self) -> Cursor<'_, T, BUFFER> {
        self.cursor(self.finish)
    }

    /// Cursor at logical index `index`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn cursor_at(&self, index: usize) -> Cursor<'_, T, BUFFER> {
        let len = self.len();
        assert!(index <= len, "cursor index (is {index}) should be <= len (is {len})");
        self.cursor(self.start.add(index as isize))
    }

    #[inline(always)]
    fn cursor(&self, pos: Pos<BUFFER>) -> Cursor<'_, T, BUFFER> {
        Cursor::new(self.map, pos, self.start, self.finish)
    }

    /// Front-to-back iterator.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T, BUFFER> {
        Iter::new(self.map, self.start, self.finish)
    }

    /// Front-to-back iterator over mutable references.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T, BUFFER> {
        IterMut::new(self.map, self.start, self.finish)
    }

    /// Deep copy into a new map.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the copy cannot be allocated; nothing is
    /// leaked.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        // SAFETY: `build_in` hands over exactly `len` uninitialized slots.
        Self::build_in(self.len(), self.alloc.clone(), |dest| {
            Ok(unsafe { uninit::uninitialized_copy(self.iter(), dest) })
        })
    }

    /// Moves the first `n` items of `items` into a new deque.
    fn from_exact_iter<I>(items: I, n: usize, alloc: A) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        // SAFETY: `build_in` hands over exactly `n` uninitialized slots.
        Self::build_in(n, alloc, |dest| Ok(unsafe { uninit::uninitialized_move_n(items, n, dest) }))
            .unwrap_or_else(|e: AllocError| e.handle())
    }
}

impl<T, const BUFFER: usize, A: Allocator<T>> Drop for Deque<T, BUFFER, A> {
    fn drop(&mut self) {
        if self.map.is_null() {
            return;
        }
        // SAFETY: [start, finish) are the live elements. Every non-null map
        // slot owns exactly one buffer.
        unsafe {
            let (start, finish) = (self.start, self.finish);
            self.finish = start;
            self.drop_range(start, finish);
            for i in 0..self.map_size {
                let node = *self.map.add(i);
                if !node.is_null() {
                    self.deallocate_node(node);
                }
            }
            self.deallocate_map(self.map, self.map_size);
        }
    }
}

impl<T, const BUFFER: usize, A: Allocator<T> + Default> Default for Deque<T, BUFFER, A> {
    #[inline]
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, const BUFFER: usize, A: Allocator<T>> Clone for Deque<T, BUFFER, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| e.handle())
    }
}

impl<T: fmt::Debug, const BUFFER: usize, A: Allocator<T>> fmt::Debug for Deque<T, BUFFER, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, const BUFFER: usize, A: Allocator<T>> PartialEq for Deque<T, BUFFER, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, const BUFFER: usize, A: Allocator<T>> Eq for Deque<T, BUFFER, A> {}

impl<T: PartialOrd, const BUFFER: usize, A: Allocator<T>> PartialOrd for Deque<T, BUFFER, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord, const BUFFER: usize, A: Allocator<T>> Ord for Deque<T, BUFFER, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash, const BUFFER: usize, A: Allocator<T>> Hash for Deque<T, BUFFER, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for item in self {
            item.hash(state);
        }
    }
}

impl<T, const BUFFER: usize, A: Allocator<T>> Index<usize> for Deque<T, BUFFER, A> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index out of bounds: the len is {} but the index is {index}", self.len()),
        }
    }
}

impl<T, const BUFFER: usize, A: Allocator<T>> IndexMut<usize> for Deque<T, BUFFER, A> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T, const BUFFER: usize, A: Allocator<T>> Extend<T> for Deque<T, BUFFER, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<'a, T: Copy + 'a, const BUFFER: usize, A: Allocator<T>> Extend<&'a T> for Deque<T, BUFFER, A> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const BUFFER: usize, A: Allocator<T> + Default> FromIterator<T> for Deque<T, BUFFER, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::default();
        deque.extend(iter);
        deque
    }
}

impl<T, const BUFFER: usize, A: Allocator<T> + Default> From<Vec<T>> for Deque<T, BUFFER, A> {
    fn from(items: Vec<T>) -> Self {
        let n = items.len();
        Self::from_exact_iter(items, n, A::default())
    }
}

impl<T, const N: usize, const BUFFER: usize, A: Allocator<T> + Default> From<[T; N]> for Deque<T, BUFFER, A> {
    fn from(items: [T; N]) -> Self {
        Self::from_exact_iter(items, N, A::default())
    }
}

impl<T, const BUFFER: usize, A: Allocator<T>> IntoIterator for Deque<T, BUFFER, A> {
    type Item = T;
    type IntoIter = IntoIter<T, BUFFER, A>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T, const BUFFER: usize, A: Allocator<T>> IntoIterator for &'a Deque<T, BUFFER, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, BUFFER>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const BUFFER: usize, A: Allocator<T>> IntoIterator for &'a mut Deque<T, BUFFER, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T, BUFFER>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// SAFETY: the deque owns its map and buffers exclusively.
unsafe impl<T: Send, const BUFFER: usize, A> Send for Deque<T, BUFFER, A>
where
    A: Allocator<T> + Send,
    A::Rebind<*mut T>: Send,
{
}

// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, const BUFFER: usize, A> Sync for Deque<T, BUFFER, A>
where
    A: Allocator<T> + Sync,
    A::Rebind<*mut T>: Sync,
{
}
