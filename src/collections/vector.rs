//! `Vector`: a growable array over a single allocator-provided buffer.
//!
//! Performance Characteristics:
//! - Push/Pop at the back: amortized O(1); capacity doubles from 1
//! - Insert/remove at `i`: O(len - i)
//! - Access: O(1)
//!
//! Growth relocates the elements bitwise into the new buffer, so it never
//! runs user code and cannot fail halfway.

use crate::alloc::uninit;
use crate::alloc::{AllocError, Allocator, StdAlloc};
use crate::collections::resolve_range;
use crate::error::{Error, Result};
use core::cmp;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut, RangeBounds};
use core::ptr::{self, NonNull};
use core::slice;

/// A contiguous growable array.
pub struct Vector<T, A: Allocator<T> = StdAlloc<T>> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T> Vector<T> {
    /// Creates an empty vector. Does not allocate.
    #[inline]
    pub fn new() -> Self {
        Self::new_in(StdAlloc::new())
    }
}

impl<T, A: Allocator<T>> Vector<T, A> {
    /// Creates an empty vector using `alloc`. Does not allocate.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            cap: 0,
            len: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Creates an empty vector with room for `capacity` elements.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the buffer cannot be allocated.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, AllocError> {
        let mut v = Self::new_in(alloc);
        v.try_reserve(capacity)?;
        Ok(v)
    }

    /// Creates a vector of `n` clones of `value`.
    pub fn from_elem_in(value: &T, n: usize, alloc: A) -> Self
    where
        T: Clone,
    {
        Self::try_from_elem_in(value, n, alloc).unwrap_or_else(|e| e.handle())
    }

    /// Fallible [`Vector::from_elem_in`].
    ///
    /// # Errors
    /// Returns [`AllocError`] if the buffer cannot be allocated.
    pub fn try_from_elem_in(value: &T, n: usize, alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut v = Self::try_with_capacity_in(n, alloc)?;
        // SAFETY: `n` uninitialized slots were just reserved.
        unsafe { uninit::uninitialized_fill_n(v.ptr.as_ptr(), n, value) };
        v.len = n;
        Ok(v)
    }

    /// Creates a vector holding clones of `items`.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the buffer cannot be allocated.
    pub fn try_from_slice_in(items: &[T], alloc: A) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut v = Self::try_with_capacity_in(items.len(), alloc)?;
        // SAFETY: `items.len()` uninitialized slots were just reserved.
        unsafe { uninit::uninitialized_copy_n(items, items.len(), v.ptr.as_ptr()) };
        v.len = items.len();
        Ok(v)
    }

    /// Moves the live elements into a buffer of at least `min_cap` slots.
    fn grow(&mut self, min_cap: usize) -> Result<(), AllocError> {
        let new_cap = cmp::max(min_cap, cmp::max(1, self.cap.saturating_mul(2)));
        if new_cap > self.alloc.max_size() {
            return Err(AllocError::capacity_overflow());
        }
        let new_ptr = self.alloc.allocate(new_cap)?;
        // SAFETY: distinct buffers; the old one is released without dropping
        // the elements that were just moved out of it.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.len);
            if self.cap != 0 {
                self.alloc.deallocate(self.ptr, self.cap);
            }
        }
        self.ptr = new_ptr;
        self.cap = new_cap;
        Ok(())
    }

    /// Makes room for at least `additional` more elements.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the buffer cannot be grown.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or_else(AllocError::capacity_overflow)?;
        if needed > self.cap {
            self.grow(needed)?;
        }
        Ok(())
    }

    /// Makes room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            err.handle();
        }
    }

    /// Appends `value`.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the buffer is full and cannot be grown.
    pub fn try_push(&mut self, value: T) -> Result<(), AllocError> {
        if self.len == self.cap {
            self.grow(self.len + 1)?;
        }
        // SAFETY: len < cap.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Appends `value`.
    pub fn push(&mut self, value: T) {
        if let Err(err) = self.try_push(value) {
            err.handle();
        }
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot held the last live element.
        Some(unsafe { self.ptr.as_ptr().add(self.len).read() })
    }

    /// Inserts `value` at `index`, shifting later elements right.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        let len = self.len;
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");
        if len == self.cap {
            if let Err(err) = self.grow(len + 1) {
                err.handle();
            }
        }
        // SAFETY: index <= len < cap.
        unsafe {
            let p = self.ptr.as_ptr().add(index);
            ptr::copy(p, p.add(1), len - index);
            p.write(value);
        }
        self.len += 1;
    }

    /// Removes and returns the element at `index`, shifting later elements
    /// left.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: index < len.
        unsafe {
            let p = self.ptr.as_ptr().add(index);
            let value = p.read();
            ptr::copy(p.add(1), p, self.len - index - 1);
            self.len -= 1;
            Some(value)
        }
    }

    /// Removes the elements in `range`.
    ///
    /// # Panics
    /// Panics if the range is decreasing or extends past `len`.
    pub fn erase<R: RangeBounds<usize>>(&mut self, range: R) {
        let len = self.len;
        let (first, last) = resolve_range(&range, len);

        // The tail is leaked rather than double-dropped if a destructor
        // panics.
        self.len = first;
        // SAFETY: [first, last) are live and forgotten by `len`; the tail is
        // moved down over them afterwards.
        unsafe {
            let base = self.ptr.as_ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(first), last - first));
            ptr::copy(base.add(last), base.add(first), len - last);
        }
        self.len = len - (last - first);
    }

    /// Shortens the vector to `len` elements.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let tail = self.len - len;
        self.len = len;
        // SAFETY: the tail was live and is now forgotten.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr().add(len), tail));
        }
    }

    /// Drops every element, keeping the buffer.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes to `new_len`, filling new slots with clones of `value`.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len - self.len);
        // SAFETY: the slots [len, new_len) are reserved and uninitialized.
        unsafe {
            uninit::uninitialized_fill_n(self.ptr.as_ptr().add(self.len), new_len - self.len, &value);
        }
        self.len = new_len;
    }

    /// Bounds-checked access.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `index >= len`.
    pub fn at(&self, index: usize) -> Result<&T> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `index >= len`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len })
    }

    /// The first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// The last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Number of elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the vector holds no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the buffer can hold.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Largest capacity the allocator could provide.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.alloc.max_size()
    }

    /// The allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// The elements as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) are live; `ptr` is dangling only when len == 0.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// The elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Deep copy.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the copy cannot be allocated.
    pub fn try_clone(&self) -> Result<Self, AllocError>
    where
        T: Clone,
    {
        let mut v = Self::try_with_capacity_in(self.len, self.alloc.clone())?;
        // SAFETY: `len` uninitialized slots were just reserved.
        unsafe { uninit::uninitialized_copy(self.as_slice(), v.ptr.as_ptr()) };
        v.len = self.len;
        Ok(v)
    }
}

impl<T, A: Allocator<T>> Drop for Vector<T, A> {
    fn drop(&mut self) {
        // SAFETY: [0, len) are live; the buffer came from `alloc`.
        unsafe {
            ptr::drop_in_place(self.as_mut_slice());
            if self.cap != 0 {
                self.alloc.deallocate(self.ptr, self.cap);
            }
        }
    }
}

impl<T, A: Allocator<T>> Deref for Vector<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator<T>> DerefMut for Vector<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator<T> + Default> Default for Vector<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator<T>> Clone for Vector<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| e.handle())
    }
}

impl<T: fmt::Debug, A: Allocator<T>> fmt::Debug for Vector<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_slice(), f)
    }
}

impl<T: PartialEq, A: Allocator<T>> PartialEq for Vector<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator<T>> Eq for Vector<T, A> {}

impl<T: Hash, A: Allocator<T>> Hash for Vector<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, A: Allocator<T>> Extend<T> for Vector<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push(item);
        }
    }
}

impl<T, A: Allocator<T> + Default> FromIterator<T> for Vector<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Self::default();
        v.extend(iter);
        v
    }
}

impl<T, A: Allocator<T> + Default> From<Vec<T>> for Vector<T, A> {
    fn from(items: Vec<T>) -> Self {
        let n = items.len();
        let mut v = Self::default();
        v.reserve(n);
        // SAFETY: `n` uninitialized slots were just reserved.
        unsafe { uninit::uninitialized_move_n(items, n, v.ptr.as_ptr()) };
        v.len = n;
        v
    }
}

impl<T, A: Allocator<T>> IntoIterator for Vector<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let v = ManuallyDrop::new(self);
        IntoIter {
            buf: v.ptr,
            cap: v.cap,
            front: 0,
            back: v.len,
            // SAFETY: `v` is never dropped, so the allocator is moved out once.
            alloc: unsafe { ptr::read(&v.alloc) },
            _marker: PhantomData,
        }
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a Vector<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a mut Vector<T, A> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_mut_slice().iter_mut()
    }
}

// SAFETY: the vector owns its buffer exclusively.
unsafe impl<T: Send, A: Allocator<T> + Send> Send for Vector<T, A> {}
unsafe impl<T: Sync, A: Allocator<T> + Sync> Sync for Vector<T, A> {}

/// Owning iterator over a [`Vector`].
pub struct IntoIter<T, A: Allocator<T>> {
    buf: NonNull<T>,
    cap: usize,
    front: usize,
    back: usize,
    alloc: A,
    _marker: PhantomData<T>,
}

impl<T, A: Allocator<T>> Iterator for IntoIter<T, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: [front, back) are still live.
        let value = unsafe { self.buf.as_ptr().add(self.front).read() };
        self.front += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<T, A: Allocator<T>> DoubleEndedIterator for IntoIter<T, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: as above.
        Some(unsafe { self.buf.as_ptr().add(self.back).read() })
    }
}

impl<T, A: Allocator<T>> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator<T>> FusedIterator for IntoIter<T, A> {}

impl<T, A: Allocator<T>> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        // SAFETY: [front, back) are the elements not yet yielded.
        unsafe {
            let rest = self.buf.as_ptr().add(self.front);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(rest, self.back - self.front));
            if self.cap != 0 {
                self.alloc.deallocate(self.buf, self.cap);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::TrackingAllocator;
    use std::rc::Rc;

    #[test]
    fn capacity_doubles_from_one() {
        let mut v = Vector::new();
        let mut seen = Vec::new();
        for i in 0..9 {
            v.push(i);
            seen.push(v.capacity());
        }
        assert_eq!(seen, [1, 2, 4, 4, 8, 8, 8, 8, 16]);
        assert_eq!(&*v, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn insert_remove_erase() {
        let mut v: Vector<i32> = (0..8).collect();
        v.insert(0, -1);
        v.insert(9, 99);
        v.insert(4, 42);
        assert_eq!(&*v, &[-1, 0, 1, 2, 42, 3, 4, 5, 6, 7, 99]);
        assert_eq!(v.remove(4), Some(42));
        assert_eq!(v.remove(20), None);
        v.erase(1..4);
        assert_eq!(&*v, &[-1, 3, 4, 5, 6, 7, 99]);
        v.erase(5..);
        assert_eq!(&*v, &[-1, 3, 4, 5, 6]);
    }

    #[test]
    fn resize_and_truncate_drop_exactly_once() {
        let token = Rc::new(());
        let mut v = Vector::new();
        v.resize(10, Rc::clone(&token));
        assert_eq!(Rc::strong_count(&token), 11);
        v.truncate(4);
        assert_eq!(Rc::strong_count(&token), 5);
        v.erase(..2);
        assert_eq!(Rc::strong_count(&token), 3);
        v.clear();
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[test]
    fn at_is_bounds_checked() {
        let mut v: Vector<i32> = Vector::from(vec![1, 2, 3]);
        assert_eq!(v.at(1), Ok(&2));
        *v.at_mut(2).unwrap() = 30;
        assert_eq!(v.back(), Some(&30));
        assert_eq!(v.at(3), Err(Error::OutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn growth_releases_old_buffers() {
        let alloc = TrackingAllocator::<String>::new();
        let stats = alloc.stats().clone();
        let mut v = Vector::new_in(alloc);
        for i in 0..100 {
            v.push(i.to_string());
        }
        assert_eq!(stats.live(), 1);
        let copy = v.clone();
        assert_eq!(copy, v);
        assert_eq!(stats.live(), 2);
        drop(v);
        drop(copy);
        assert_eq!(stats.live(), 0);
    }

    #[test]
    fn into_iter_drops_the_rest() {
        let token = Rc::new(());
        let v: Vector<Rc<()>> = Vector::from(vec![Rc::clone(&token), Rc::clone(&token), Rc::clone(&token)]);
        let mut it = v.into_iter();
        assert!(it.next().is_some());
        assert_eq!(it.len(), 2);
        drop(it);
        assert_eq!(Rc::strong_count(&token), 1);
    }

    #[test]
    fn from_elem_and_slice() {
        let v = Vector::<char>::from_elem_in(&'x', 3, StdAlloc::new());
        assert_eq!(&*v, &['x', 'x', 'x']);
        let w = Vector::<i32>::try_from_slice_in(&[1, 2], StdAlloc::new()).unwrap();
        assert_eq!(w.front(), Some(&1));
    }
}
