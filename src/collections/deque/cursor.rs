//! Positions and cursors over a deque's map of buffers.
//!
//! A position is a `(node, offset)` pair: `node` indexes the map, `offset`
//! indexes the buffer that map slot points to. Physical addresses are formed
//! only when an element is accessed, so a position stays meaningful across a
//! map reallocation that shifts the active nodes (the deque rebases `node`
//! instead of patching pointers).
//!
//! Performance Characteristics:
//! - Increment/decrement: O(1), one branch at a buffer boundary
//! - Offset by `n`: O(1), floor division to find the target node
//! - Difference: O(1)

use crate::iter::{self, RandomAccessTag};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr;

/// A logical position inside a deque: buffer `node` of the map, slot
/// `offset` of that buffer. `offset < BUFFER` at all times.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Pos<const BUFFER: usize> {
    pub(crate) node: usize,
    pub(crate) offset: usize,
}

impl<const BUFFER: usize> Pos<BUFFER> {
    #[inline(always)]
    pub(crate) const fn new(node: usize, offset: usize) -> Self {
        Self { node, offset }
    }

    #[inline(always)]
    pub(crate) fn increment(&mut self) {
        self.offset += 1;
        if self.offset == BUFFER {
            self.node = self.node.wrapping_add(1);
            self.offset = 0;
        }
    }

    #[inline(always)]
    pub(crate) fn decrement(&mut self) {
        if self.offset == 0 {
            self.node = self.node.wrapping_sub(1);
            self.offset = BUFFER;
        }
        self.offset -= 1;
    }

    /// The position `n` slots away (backwards when `n` is negative).
    #[inline]
    pub(crate) fn add(self, n: isize) -> Self {
        let buffer = BUFFER as isize;
        let o = self.offset as isize + n;
        if (0..buffer).contains(&o) {
            return Self::new(self.node, o as usize);
        }
        let node_offset = if o > 0 {
            o / buffer
        } else {
            -((-o - 1) / buffer) - 1
        };
        Self::new(
            self.node.wrapping_add_signed(node_offset),
            (o - node_offset * buffer) as usize,
        )
    }

    /// Signed number of slots from `origin` to `self`.
    #[inline]
    pub(crate) fn distance(self, origin: Self) -> isize {
        let buffer = BUFFER as isize;
        let nodes = self.node.wrapping_sub(origin.node) as isize;
        buffer * (nodes - 1) + self.offset as isize + (buffer - origin.offset as isize)
    }

    /// Address of the slot in the map `map`.
    ///
    /// # Safety
    /// `map[node]` must point to a live buffer.
    #[inline(always)]
    pub(crate) unsafe fn resolve<T>(self, map: *const *mut T) -> *mut T {
        (*map.add(self.node)).add(self.offset)
    }
}

/// A read-only random-access cursor into a [`Deque`](super::Deque).
///
/// Obtained from [`Deque::begin`](super::Deque::begin),
/// [`Deque::end`](super::Deque::end) or
/// [`Deque::cursor_at`](super::Deque::cursor_at). The cursor borrows the deque,
/// so it can be moved anywhere (even out of range) but only dereferenced while
/// it addresses an element; [`Cursor::get`] checks that.
pub struct Cursor<'a, T, const BUFFER: usize> {
    map: *const *mut T,
    pos: Pos<BUFFER>,
    start: Pos<BUFFER>,
    finish: Pos<BUFFER>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, const BUFFER: usize> Cursor<'a, T, BUFFER> {
    #[inline(always)]
    pub(crate) fn new(
        map: *const *mut T,
        pos: Pos<BUFFER>,
        start: Pos<BUFFER>,
        finish: Pos<BUFFER>,
    ) -> Self {
        Self {
            map,
            pos,
            start,
            finish,
            _marker: PhantomData,
        }
    }

    /// The element under the cursor, or `None` outside `[begin, end)`.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        if self.pos >= self.start && self.pos < self.finish {
            // SAFETY: in-range positions address live elements of a borrowed
            // deque.
            Some(unsafe { &*self.pos.resolve(self.map) })
        } else {
            None
        }
    }

    /// The element `n` positions away from the cursor (`it[n]`).
    #[inline]
    pub fn get_at(&self, n: isize) -> Option<&'a T> {
        (*self + n).get()
    }

    /// Index of the cursor relative to the front of the deque.
    #[inline]
    pub fn position(&self) -> isize {
        self.pos.distance(self.start)
    }

    /// Buffer index and in-buffer offset of the cursor.
    #[inline]
    pub fn node_offset(&self) -> (usize, usize) {
        (self.pos.node, self.pos.offset)
    }
}

impl<T, const BUFFER: usize> Clone for Cursor<'_, T, BUFFER> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, const BUFFER: usize> Copy for Cursor<'_, T, BUFFER> {}

impl<T, const BUFFER: usize> PartialEq for Cursor<'_, T, BUFFER> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl<T, const BUFFER: usize> Eq for Cursor<'_, T, BUFFER> {}

impl<T, const BUFFER: usize> PartialOrd for Cursor<'_, T, BUFFER> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, const BUFFER: usize> Ord for Cursor<'_, T, BUFFER> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.pos.cmp(&other.pos)
    }
}

impl<T, const BUFFER: usize> Hash for Cursor<'_, T, BUFFER> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pos.hash(state);
    }
}

impl<T, const BUFFER: usize> fmt::Debug for Cursor<'_, T, BUFFER> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("node", &self.pos.node)
            .field("offset", &self.pos.offset)
            .finish()
    }
}

impl<T, const BUFFER: usize> AddAssign<isize> for Cursor<'_, T, BUFFER> {
    #[inline]
    fn add_assign(&mut self, n: isize) {
        self.pos = self.pos.add(n);
    }
}

impl<T, const BUFFER: usize> SubAssign<isize> for Cursor<'_, T, BUFFER> {
    #[inline]
    fn sub_assign(&mut self, n: isize) {
        self.pos = self.pos.add(-n);
    }
}

impl<T, const BUFFER: usize> Add<isize> for Cursor<'_, T, BUFFER> {
    type Output = Self;

    #[inline]
    fn add(mut self, n: isize) -> Self {
        self += n;
        self
    }
}

impl<T, const BUFFER: usize> Sub<isize> for Cursor<'_, T, BUFFER> {
    type Output = Self;

    #[inline]
    fn sub(mut self, n: isize) -> Self {
        self -= n;
        self
    }
}

impl<T, const BUFFER: usize> Sub for Cursor<'_, T, BUFFER> {
    type Output = isize;

    #[inline]
    fn sub(self, origin: Self) -> isize {
        self.pos.distance(origin.pos)
    }
}

impl<'a, T, const BUFFER: usize> iter::Cursor for Cursor<'a, T, BUFFER> {
    type Category = RandomAccessTag;
    type Value = T;
    type Difference = isize;
    type Pointer = *const T;
    type Reference<'b> = &'a T where Self: 'b;

    #[inline(always)]
    fn increment(&mut self) {
        self.pos.increment();
    }

    /// Null outside `[begin, end]`.
    #[inline]
    fn pointer(&self) -> *const T {
        if self.pos >= self.start && self.pos <= self.finish && !self.map.is_null() {
            // SAFETY: every node in [start.node, finish.node] owns a buffer.
            unsafe { self.pos.resolve(self.map) }
        } else {
            ptr::null()
        }
    }

    #[inline(always)]
    unsafe fn get_unchecked<'b>(&'b self) -> &'a T {
        &*self.pos.resolve(self.map)
    }
}

impl<T, const BUFFER: usize> iter::Bidirectional for Cursor<'_, T, BUFFER> {
    #[inline(always)]
    fn decrement(&mut self) {
        self.pos.decrement();
    }
}

impl<T, const BUFFER: usize> iter::RandomAccess for Cursor<'_, T, BUFFER> {
    #[inline(always)]
    fn offset(&mut self, n: isize) {
        *self += n;
    }

    #[inline(always)]
    fn difference(&self, origin: &Self) -> isize {
        *self - *origin
    }
}

// SAFETY: a cursor is a shared borrow of the deque.
unsafe impl<T: Sync, const BUFFER: usize> Send for Cursor<'_, T, BUFFER> {}
unsafe impl<T: Sync, const BUFFER: usize> Sync for Cursor<'_, T, BUFFER> {}

/// Writable cursor used while the deque fills its own uninitialized storage.
///
/// Carries no lifetime; the deque only hands it to the uninitialized
/// algorithms while the map is stable.
pub(crate) struct RawCursor<T, const BUFFER: usize> {
    map: *const *mut T,
    pub(crate) pos: Pos<BUFFER>,
}

impl<T, const BUFFER: usize> RawCursor<T, BUFFER> {
    #[inline(always)]
    pub(crate) fn new(map: *const *mut T, pos: Pos<BUFFER>) -> Self {
        Self { map, pos }
    }
}

impl<T, const BUFFER: usize> Clone for RawCursor<T, BUFFER> {
    #[inline(always)]
    fn clone(&self) -> Self {
        Self::new(self.map, self.pos)
    }
}

impl<T, const BUFFER: usize> PartialEq for RawCursor<T, BUFFER> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.pos == other.pos
    }
}

impl<T, const BUFFER: usize> iter::Cursor for RawCursor<T, BUFFER> {
    type Category = RandomAccessTag;
    type Value = T;
    type Difference = isize;
    type Pointer = *mut T;
    type Reference<'a> = &'a mut T where Self: 'a;

    #[inline(always)]
    fn increment(&mut self) {
        self.pos.increment();
    }

    #[inline(always)]
    fn pointer(&self) -> *mut T {
        // SAFETY: raw cursors only walk nodes the deque has allocated.
        unsafe { self.pos.resolve(self.map) }
    }

    #[inline(always)]
    unsafe fn get_unchecked<'a>(&'a self) -> &'a mut T {
        &mut *self.pointer()
    }
}

impl<T, const BUFFER: usize> iter::Bidirectional for RawCursor<T, BUFFER> {
    #[inline(always)]
    fn decrement(&mut self) {
        self.pos.decrement();
    }
}

impl<T, const BUFFER: usize> iter::RandomAccess for RawCursor<T, BUFFER> {
    #[inline(always)]
    fn offset(&mut self, n: isize) {
        self.pos = self.pos.add(n);
    }

    #[inline(always)]
    fn difference(&self, origin: &Self) -> isize {
        self.pos.distance(origin.pos)
    }
}
