use super::cursor::Pos;
use super::Deque;
use crate::alloc::Allocator;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;

/// Borrowing iterator over a deque, front to back.
pub struct Iter<'a, T, const BUFFER: usize> {
    map: *const *mut T,
    front: Pos<BUFFER>,
    back: Pos<BUFFER>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T, const BUFFER: usize> Iter<'a, T, BUFFER> {
    #[inline]
    pub(crate) fn new(map: *const *mut T, front: Pos<BUFFER>, back: Pos<BUFFER>) -> Self {
        Self {
            map,
            front,
            back,
            _marker: PhantomData,
        }
    }
}

impl<T, const BUFFER: usize> Clone for Iter<'_, T, BUFFER> {
    fn clone(&self) -> Self {
        Self::new(self.map, self.front, self.back)
    }
}

impl<T: fmt::Debug, const BUFFER: usize> fmt::Debug for Iter<'_, T, BUFFER> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, T, const BUFFER: usize> Iterator for Iter<'a, T, BUFFER> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: [front, back) is a sub-range of the live elements.
        let item = unsafe { &*self.front.resolve(self.map) };
        self.front.increment();
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back.distance(self.front) as usize;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        if n >= self.len() {
            self.front = self.back;
            return None;
        }
        self.front = self.front.add(n as isize);
        self.next()
    }

    #[inline]
    fn count(self) -> usize {
        self.len()
    }

    #[inline]
    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T, const BUFFER: usize> DoubleEndedIterator for Iter<'a, T, BUFFER> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back.decrement();
        // SAFETY: the new back is still at or after front.
        Some(unsafe { &*self.back.resolve(self.map) })
    }

    fn nth_back(&mut self, n: usize) -> Option<&'a T> {
        if n >= self.len() {
            self.back = self.front;
            return None;
        }
        self.back = self.back.add(-(n as isize));
        self.next_back()
    }
}

impl<T, const BUFFER: usize> ExactSizeIterator for Iter<'_, T, BUFFER> {}

impl<T, const BUFFER: usize> FusedIterator for Iter<'_, T, BUFFER> {}

// SAFETY: behaves like `&T`.
unsafe impl<T: Sync, const BUFFER: usize> Send for Iter<'_, T, BUFFER> {}
unsafe impl<T: Sync, const BUFFER: usize> Sync for Iter<'_, T, BUFFER> {}

/// Mutable borrowing iterator over a deque, front to back.
pub struct IterMut<'a, T, const BUFFER: usize> {
    map: *const *mut T,
    front: Pos<BUFFER>,
    back: Pos<BUFFER>,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T, const BUFFER: usize> IterMut<'a, T, BUFFER> {
    #[inline]
    pub(crate) fn new(map: *const *mut T, front: Pos<BUFFER>, back: Pos<BUFFER>) -> Self {
        Self {
            map,
            front,
            back,
            _marker: PhantomData,
        }
    }
}

impl<T: fmt::Debug, const BUFFER: usize> fmt::Debug for IterMut<'_, T, BUFFER> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(Iter::<'_, T, BUFFER>::new(self.map, self.front, self.back))
            .finish()
    }
}

impl<'a, T, const BUFFER: usize> Iterator for IterMut<'a, T, BUFFER> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: every slot is yielded at most once.
        let item = unsafe { &mut *self.front.resolve(self.map) };
        self.front.increment();
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back.distance(self.front) as usize;
        (len, Some(len))
    }

    fn nth(&mut self, n: usize) -> Option<&'a mut T> {
        if n >= self.len() {
            self.front = self.back;
            return None;
        }
        self.front = self.front.add(n as isize);
        self.next()
    }
}

impl<'a, T, const BUFFER: usize> DoubleEndedIterator for IterMut<'a, T, BUFFER> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.front == self.back {
            return None;
        }
        self.back.decrement();
        // SAFETY: every slot is yielded at most once.
        Some(unsafe { &mut *self.back.resolve(self.map) })
    }
}

impl<T, const BUFFER: usize> ExactSizeIterator for IterMut<'_, T, BUFFER> {}

impl<T, const BUFFER: usize> FusedIterator for IterMut<'_, T, BUFFER> {}

// SAFETY: behaves like `&mut T`.
unsafe impl<T: Send, const BUFFER: usize> Send for IterMut<'_, T, BUFFER> {}
unsafe impl<T: Sync, const BUFFER: usize> Sync for IterMut<'_, T, BUFFER> {}

/// Owning iterator over a deque, front to back.
pub struct IntoIter<T, const BUFFER: usize, A: Allocator<T>> {
    inner: Deque<T, BUFFER, A>,
}

impl<T, const BUFFER: usize, A: Allocator<T>> IntoIter<T, BUFFER, A> {
    #[inline]
    pub(crate) fn new(inner: Deque<T, BUFFER, A>) -> Self {
        Self { inner }
    }
}

impl<T: fmt::Debug, const BUFFER: usize, A: Allocator<T>> fmt::Debug for IntoIter<T, BUFFER, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<T, const BUFFER: usize, A: Allocator<T>> Iterator for IntoIter<T, BUFFER, A> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.pop_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T, const BUFFER: usize, A: Allocator<T>> DoubleEndedIterator for IntoIter<T, BUFFER, A> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.pop_back()
    }
}

impl<T, const BUFFER: usize, A: Allocator<T>> ExactSizeIterator for IntoIter<T, BUFFER, A> {}

impl<T, const BUFFER: usize, A: Allocator<T>> FusedIterator for IntoIter<T, BUFFER, A> {}
