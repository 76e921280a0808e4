//! `Array`: a fixed-size array with checked access.
//!
//! A thin wrapper over `[T; N]` (`N > 0`) that reports out-of-range indices
//! and wrongly sized initializers as [`Error`]s instead of panicking.

use crate::error::{Error, Result};
use core::ops::{Deref, DerefMut};

/// A fixed-size array of `N` elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Array<T, const N: usize> {
    items: [T; N],
}

impl<T, const N: usize> Array<T, N> {
    const NON_EMPTY: () = assert!(N > 0, "arrays must hold at least one element");

    /// Wraps `items`.
    #[inline]
    pub const fn new(items: [T; N]) -> Self {
        let () = Self::NON_EMPTY;
        Self { items }
    }

    /// Builds the array from `f(0)`, ..., `f(N - 1)`.
    #[inline]
    pub fn from_fn<F: FnMut(usize) -> T>(f: F) -> Self {
        Self::new(core::array::from_fn(f))
    }

    /// Bounds-checked access.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `index >= N`.
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T> {
        self.items
            .get(index)
            .ok_or(Error::OutOfRange { index, len: N })
    }

    /// Bounds-checked mutable access.
    ///
    /// # Errors
    /// Returns [`Error::OutOfRange`] if `index >= N`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        self.items
            .get_mut(index)
            .ok_or(Error::OutOfRange { index, len: N })
    }

    /// Replaces every element with clones of `items`.
    ///
    /// # Errors
    /// Returns [`Error::LengthMismatch`] unless `items.len() == N`; the array
    /// is unchanged in that case.
    pub fn assign_from(&mut self, items: &[T]) -> Result<()>
    where
        T: Clone,
    {
        if items.len() != N {
            return Err(Error::LengthMismatch {
                expected: N,
                found: items.len(),
            });
        }
        self.items.clone_from_slice(items);
        Ok(())
    }

    /// Sets every element to a clone of `value`.
    #[inline]
    pub fn fill(&mut self, value: &T)
    where
        T: Clone,
    {
        self.items.fill(value.clone());
    }

    /// Exchanges the contents with `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.items, &mut other.items);
    }

    /// The first element.
    #[inline]
    pub fn front(&self) -> &T {
        &self.items[0]
    }

    /// The last element.
    #[inline]
    pub fn back(&self) -> &T {
        &self.items[N - 1]
    }

    /// Always `N`.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always `false`.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Always `N`.
    #[inline(always)]
    pub const fn max_size(&self) -> usize {
        N
    }

    /// Pointer to the first element, usable as a random-access cursor.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.items.as_ptr()
    }

    /// Unwraps the inner array.
    #[inline]
    pub fn into_inner(self) -> [T; N] {
        self.items
    }
}

impl<T: Default, const N: usize> Default for Array<T, N> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T, const N: usize> Deref for Array<T, N> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T, const N: usize> DerefMut for Array<T, N> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<T, const N: usize> From<[T; N]> for Array<T, N> {
    #[inline]
    fn from(items: [T; N]) -> Self {
        Self::new(items)
    }
}

impl<T: Clone, const N: usize> TryFrom<&[T]> for Array<T, N> {
    type Error = Error;

    fn try_from(items: &[T]) -> Result<Self> {
        let items: &[T; N] = items.try_into().map_err(|_| Error::LengthMismatch {
            expected: N,
            found: items.len(),
        })?;
        Ok(Self::new(items.clone()))
    }
}

impl<T, const N: usize> TryFrom<Vec<T>> for Array<T, N> {
    type Error = Error;

    fn try_from(items: Vec<T>) -> Result<Self> {
        let found = items.len();
        let items: [T; N] = items
            .try_into()
            .map_err(|_| Error::LengthMismatch { expected: N, found })?;
        Ok(Self::new(items))
    }
}

impl<T, const N: usize> IntoIterator for Array<T, N> {
    type Item = T;
    type IntoIter = core::array::IntoIter<T, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T, const N: usize> IntoIterator for &'a Array<T, N> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
