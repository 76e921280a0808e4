//! Constructing values into raw, uninitialized storage.
//!
//! Every algorithm writes into a destination cursor `D` whose
//! [`Cursor::pointer`] is a `*mut T` (raw pointers qualify, and so does the
//! deque's internal cursor, which is how the deque fills storage that spans
//! several buffers). Elements are constructed lazily, one at a time, in
//! forward order.
//!
//! # Rollback
//!
//! If producing the i-th value fails (a panicking `Clone`, `Default` or
//! source iterator, or an `Err` from the generator passed to
//! [`try_uninitialized_fill_with`]), the values already written to
//! `[dest, current)` are dropped in forward order before the failure reaches
//! the caller. The caller never observes a partially constructed range; it
//! only has to release the storage itself.
//!
//! # Zero-sized types
//!
//! The range forms (`[first, last)`) stop when the cursors compare equal. Raw
//! pointers to a zero-sized `T` never change address, so with pointer
//! destinations every ZST range is empty: nothing is constructed and nothing
//! is destroyed. Use the counted `*_n` forms to construct or drop ZST values
//! through raw pointers.

use crate::iter::Cursor;
use core::marker::PhantomData;
use core::mem;
use core::ptr;

/// Writes `value` into the uninitialized slot `p` and returns `p`.
///
/// # Safety
/// `p` must be valid for writes and must not hold a live value.
#[inline(always)]
pub unsafe fn construct_at<T>(p: *mut T, value: T) -> *mut T {
    p.write(value);
    p
}

/// Drops the value at `p` in place.
///
/// # Safety
/// `p` must hold a live value, which is dead afterwards.
#[inline(always)]
pub unsafe fn destroy_at<T>(p: *mut T) {
    ptr::drop_in_place(p);
}

/// Drops every value in `[first, last)`, front to back.
///
/// With raw pointers to a zero-sized `T` the range is always empty; use
/// [`destroy_n`] for those.
///
/// # Safety
/// Every slot in the range must hold a live value, and `last` must be
/// reachable from `first`.
pub unsafe fn destroy<T, D>(mut first: D, last: D)
where
    D: Cursor<Value = T, Pointer = *mut T>,
{
    if !mem::needs_drop::<T>() {
        return;
    }
    while first != last {
        destroy_at(first.pointer());
        first.increment();
    }
}

/// Drops `n` values starting at `first` and returns the cursor past them.
///
/// # Safety
/// The `n` slots from `first` must hold live values.
pub unsafe fn destroy_n<T, D>(mut first: D, n: usize) -> D
where
    D: Cursor<Value = T, Pointer = *mut T>,
{
    for _ in 0..n {
        destroy_at(first.pointer());
        first.increment();
    }
    first
}

/// The constructed prefix `[first, current)` of a destination range, and the
/// number of values in it.
///
/// Dropping an armed guard destroys the prefix; [`Partial::finish`] disarms
/// it and hands back the end of the constructed range.
struct Partial<T, D>
where
    D: Cursor<Value = T, Pointer = *mut T>,
{
    first: D,
    current: D,
    constructed: usize,
    armed: bool,
    _marker: PhantomData<T>,
}

impl<T, D> Partial<T, D>
where
    D: Cursor<Value = T, Pointer = *mut T>,
{
    #[inline]
    fn new(dest: D) -> Self {
        Self {
            first: dest.clone(),
            current: dest,
            constructed: 0,
            armed: true,
            _marker: PhantomData,
        }
    }

    /// # Safety
    /// `current` must address an uninitialized, writable slot.
    #[inline(always)]
    unsafe fn emplace(&mut self, value: T) {
        construct_at(self.current.pointer(), value);
        self.current.increment();
        self.constructed += 1;
    }

    #[inline(always)]
    fn reached(&self, last: &D) -> bool {
        self.current == *last
    }

    #[inline]
    fn finish(mut self) -> D {
        self.armed = false;
        self.current.clone()
    }
}

impl<T, D> Drop for Partial<T, D>
where
    D: Cursor<Value = T, Pointer = *mut T>,
{
    fn drop(&mut self) {
        if self.armed {
            // SAFETY: exactly `constructed` slots from `first` were written.
            // Counting rather than comparing cursors also covers zero-sized
            // values, whose pointers never move.
            unsafe { destroy_n(self.first.clone(), self.constructed) };
        }
    }
}

/// Clones every element of `src` into the storage starting at `dest`.
///
/// Returns the cursor past the last constructed element.
///
/// # Safety
/// `dest` must address enough uninitialized, writable slots for every element
/// `src` yields.
pub unsafe fn uninitialized_copy<'s, T, I, D>(src: I, dest: D) -> D
where
    T: Clone + 's,
    I: IntoIterator<Item = &'s T>,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    let mut guard = Partial::new(dest);
    for value in src {
        guard.emplace(value.clone());
    }
    guard.finish()
}

/// Clones at most `n` elements of `src` into the storage starting at `dest`.
///
/// # Safety
/// `dest` must address at least `n` uninitialized, writable slots.
pub unsafe fn uninitialized_copy_n<'s, T, I, D>(src: I, n: usize, dest: D) -> D
where
    T: Clone + 's,
    I: IntoIterator<Item = &'s T>,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    uninitialized_copy(src.into_iter().take(n), dest)
}

/// Fills `[first, last)` with clones of `value`.
///
/// With raw pointers to a zero-sized `T` the range is always empty; use
/// [`uninitialized_fill_n`] for those.
///
/// # Safety
/// Every slot in `[first, last)` must be uninitialized and writable.
pub unsafe fn uninitialized_fill<T, D>(first: D, last: D, value: &T)
where
    T: Clone,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    let mut guard = Partial::new(first);
    while !guard.reached(&last) {
        guard.emplace(value.clone());
    }
    guard.finish();
}

/// Writes `n` clones of `value` starting at `first`.
///
/// # Safety
/// `first` must address at least `n` uninitialized, writable slots.
pub unsafe fn uninitialized_fill_n<T, D>(first: D, n: usize, value: &T) -> D
where
    T: Clone,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    let mut guard = Partial::new(first);
    for _ in 0..n {
        guard.emplace(value.clone());
    }
    guard.finish()
}

/// Moves every element of `src` into the storage starting at `dest`.
///
/// # Safety
/// `dest` must address enough uninitialized, writable slots for every element
/// `src` yields.
pub unsafe fn uninitialized_move<T, I, D>(src: I, dest: D) -> D
where
    I: IntoIterator<Item = T>,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    let mut guard = Partial::new(dest);
    for value in src {
        guard.emplace(value);
    }
    guard.finish()
}

/// Moves at most `n` elements of `src` into the storage starting at `dest`.
///
/// # Safety
/// `dest` must address at least `n` uninitialized, writable slots.
pub unsafe fn uninitialized_move_n<T, I, D>(src: I, n: usize, dest: D) -> D
where
    I: IntoIterator<Item = T>,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    uninitialized_move(src.into_iter().take(n), dest)
}

/// Default-constructs every slot in `[first, last)`.
///
/// # Safety
/// Every slot in `[first, last)` must be uninitialized and writable.
pub unsafe fn uninitialized_default_construct<T, D>(first: D, last: D)
where
    T: Default,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    let mut guard = Partial::new(first);
    while !guard.reached(&last) {
        guard.emplace(T::default());
    }
    guard.finish();
}

/// Default-constructs `n` slots starting at `first`.
///
/// # Safety
/// `first` must address at least `n` uninitialized, writable slots.
pub unsafe fn uninitialized_default_construct_n<T, D>(first: D, n: usize) -> D
where
    T: Default,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    let mut guard = Partial::new(first);
    for _ in 0..n {
        guard.emplace(T::default());
    }
    guard.finish()
}

/// Value-constructs every slot in `[first, last)`.
///
/// Rust has a single notion of a default value, so this is
/// [`uninitialized_default_construct`].
///
/// # Safety
/// Same as [`uninitialized_default_construct`].
#[inline]
pub unsafe fn uninitialized_value_construct<T, D>(first: D, last: D)
where
    T: Default,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    uninitialized_default_construct(first, last);
}

/// Value-constructs `n` slots starting at `first`.
///
/// # Safety
/// Same as [`uninitialized_default_construct_n`].
#[inline]
pub unsafe fn uninitialized_value_construct_n<T, D>(first: D, n: usize) -> D
where
    T: Default,
    D: Cursor<Value = T, Pointer = *mut T>,
{
    uninitialized_default_construct_n(first, n)
}

/// Fills `[first, last)` with values produced by `f`.
///
/// # Errors
/// Returns the first error `f` produces, after dropping the values already
/// written.
///
/// # Safety
/// Every slot in `[first, last)` must be uninitialized and writable.
pub unsafe fn try_uninitialized_fill_with<T, D, E, F>(first: D, last: D, mut f: F) -> Result<D, E>
where
    D: Cursor<Value = T, Pointer = *mut T>,
    F: FnMut() -> Result<T, E>,
{
    let mut guard = Partial::new(first);
    while !guard.reached(&last) {
        guard.emplace(f()?);
    }
    Ok(guard.finish())
}

/// Writes `n` values produced by `f` starting at `first`.
///
/// # Errors
/// Returns the first error `f` produces, after dropping the values already
/// written.
///
/// # Safety
/// `first` must address at least `n` uninitialized, writable slots.
pub unsafe fn try_uninitialized_fill_with_n<T, D, E, F>(first: D, n: usize, mut f: F) -> Result<D, E>
where
    D: Cursor<Value = T, Pointer = *mut T>,
    F: FnMut() -> Result<T, E>,
{
    let mut guard = Partial::new(first);
    for _ in 0..n {
        guard.emplace(f()?);
    }
    Ok(guard.finish())
}
