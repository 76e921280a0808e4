//! Cursor categories and category-dispatched `distance` / `advance`.
//!
//! A *cursor* is a position in a sequence, in the style of a C++ iterator: it
//! can be copied, compared and stepped, and it can be dereferenced while it
//! addresses a live element. Rust iterators are still the primary way to walk
//! the containers; cursors exist for positional algorithms (the
//! uninitialized-memory algorithms, `distance`, `advance`) that need to name
//! a position independently of consuming it.
//!
//! Every cursor declares a category tag. `distance` and `advance` pick their
//! algorithm from that tag at compile time through [`Dispatch`]: input and
//! forward cursors walk one step at a time, bidirectional cursors walk in
//! either direction, and random-access cursors jump in O(1).

use core::mem;
use num_traits::{One, PrimInt, Signed, Zero};

/// Runtime name of a cursor category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Single pass, forward only.
    Input,
    /// Multi-pass, forward only.
    Forward,
    /// Multi-pass, both directions.
    Bidirectional,
    /// Constant-time jumps and differences.
    RandomAccess,
}

/// A category tag type.
pub trait Tag: Copy + Default {
    /// The category this tag stands for.
    const CATEGORY: Category;
}

/// Tag for single-pass forward cursors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputTag;

/// Tag for multi-pass forward cursors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardTag;

/// Tag for cursors that also step backwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BidirectionalTag;

/// Tag for cursors with O(1) offset and difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomAccessTag;

impl Tag for InputTag {
    const CATEGORY: Category = Category::Input;
}

impl Tag for ForwardTag {
    const CATEGORY: Category = Category::Forward;
}

impl Tag for BidirectionalTag {
    const CATEGORY: Category = Category::Bidirectional;
}

impl Tag for RandomAccessTag {
    const CATEGORY: Category = Category::RandomAccess;
}

/// A position in a sequence.
///
/// The five associated items describe the cursor the way iterator traits do:
/// its category, the element type, the signed distance type, the raw pointer
/// type it resolves to, and the reference type it dereferences to.
pub trait Cursor: Clone + PartialEq {
    /// One of [`InputTag`], [`ForwardTag`], [`BidirectionalTag`],
    /// [`RandomAccessTag`].
    type Category: Tag;
    /// Element type.
    type Value;
    /// Signed distance between two cursors.
    type Difference: PrimInt + Signed;
    /// Raw pointer to the addressed element.
    type Pointer;
    /// Reference produced by [`Cursor::get_unchecked`].
    type Reference<'a>
    where
        Self: 'a;

    /// Moves to the next position.
    fn increment(&mut self);

    /// Raw pointer to the addressed slot.
    fn pointer(&self) -> Self::Pointer;

    /// Dereferences the cursor.
    ///
    /// # Safety
    /// The cursor must address a live element, and the usual aliasing rules
    /// for the returned reference apply.
    unsafe fn get_unchecked<'a>(&'a self) -> Self::Reference<'a>;
}

/// A cursor that can also step backwards.
pub trait Bidirectional: Cursor {
    /// Moves to the previous position.
    fn decrement(&mut self);
}

/// A cursor with constant-time jumps.
pub trait RandomAccess: Bidirectional {
    /// Moves by `n` positions (backwards when negative).
    fn offset(&mut self, n: Self::Difference);

    /// Signed number of positions from `origin` to `self`.
    fn difference(&self, origin: &Self) -> Self::Difference;
}

/// Per-category implementation of [`distance`] and [`advance`].
pub trait Dispatch<I: Cursor> {
    /// Number of increments from `first` to `last`.
    fn distance(first: &I, last: &I) -> I::Difference;

    /// Moves `it` by `n` positions.
    fn advance(it: &mut I, n: I::Difference);
}

impl<I: Cursor> Dispatch<I> for InputTag {
    fn distance(first: &I, last: &I) -> I::Difference {
        let mut it = first.clone();
        let mut n = I::Difference::zero();
        while it != *last {
            it.increment();
            n = n + I::Difference::one();
        }
        n
    }

    fn advance(it: &mut I, mut n: I::Difference) {
        debug_assert!(
            !n.is_negative(),
            "input cursors cannot be advanced backwards"
        );
        while n > I::Difference::zero() {
            it.increment();
            n = n - I::Difference::one();
        }
    }
}

impl<I: Cursor> Dispatch<I> for ForwardTag {
    #[inline]
    fn distance(first: &I, last: &I) -> I::Difference {
        <InputTag as Dispatch<I>>::distance(first, last)
    }

    #[inline]
    fn advance(it: &mut I, n: I::Difference) {
        <InputTag as Dispatch<I>>::advance(it, n);
    }
}

impl<I: Bidirectional> Dispatch<I> for BidirectionalTag {
    #[inline]
    fn distance(first: &I, last: &I) -> I::Difference {
        <InputTag as Dispatch<I>>::distance(first, last)
    }

    fn advance(it: &mut I, mut n: I::Difference) {
        let zero = I::Difference::zero();
        let one = I::Difference::one();
        while n > zero {
            it.increment();
            n = n - one;
        }
        while n < zero {
            it.decrement();
            n = n + one;
        }
    }
}

impl<I: RandomAccess> Dispatch<I> for RandomAccessTag {
    #[inline(always)]
    fn distance(first: &I, last: &I) -> I::Difference {
        last.difference(first)
    }

    #[inline(always)]
    fn advance(it: &mut I, n: I::Difference) {
        it.offset(n);
    }
}

/// Number of increments needed to go from `first` to `last`.
///
/// O(1) for random-access cursors, O(n) otherwise.
#[inline]
pub fn distance<I>(first: &I, last: &I) -> I::Difference
where
    I: Cursor,
    I::Category: Dispatch<I>,
{
    <I::Category as Dispatch<I>>::distance(first, last)
}

/// Moves `it` by `n` positions.
///
/// Input and forward cursors only move forwards; passing a negative `n` to
/// them is a precondition violation (checked in debug builds). O(1) for
/// random-access cursors.
#[inline]
pub fn advance<I>(it: &mut I, n: I::Difference)
where
    I: Cursor,
    I::Category: Dispatch<I>,
{
    <I::Category as Dispatch<I>>::advance(it, n);
}

/// Returns `it` moved by `n` positions.
#[inline]
pub fn next<I>(mut it: I, n: I::Difference) -> I
where
    I: Cursor,
    I::Category: Dispatch<I>,
{
    advance(&mut it, n);
    it
}

/// The category of cursor type `I`.
#[inline]
pub const fn category_of<I: Cursor>() -> Category {
    <I::Category as Tag>::CATEGORY
}

// Raw pointers are random-access cursors. Stepping uses wrapping arithmetic,
// so moving a pointer is always defined; dereferencing is the caller's
// responsibility. A pointer to a zero-sized `T` never changes address, so two
// such pointers are always equal and every range `[first, last)` between them
// is empty; count-based algorithms (`*_n`) are the way to walk ZST storage.

impl<T> Cursor for *const T {
    type Category = RandomAccessTag;
    type Value = T;
    type Difference = isize;
    type Pointer = *const T;
    type Reference<'a> = &'a T where Self: 'a;

    #[inline(always)]
    fn increment(&mut self) {
        *self = self.wrapping_add(1);
    }

    #[inline(always)]
    fn pointer(&self) -> *const T {
        *self
    }

    #[inline(always)]
    unsafe fn get_unchecked<'a>(&'a self) -> &'a T {
        &**self
    }
}

impl<T> Bidirectional for *const T {
    #[inline(always)]
    fn decrement(&mut self) {
        *self = self.wrapping_sub(1);
    }
}

impl<T> RandomAccess for *const T {
    #[inline(always)]
    fn offset(&mut self, n: isize) {
        *self = self.wrapping_offset(n);
    }

    #[inline(always)]
    fn difference(&self, origin: &Self) -> isize {
        pointer_difference::<T>(*self as usize, *origin as usize)
    }
}

impl<T> Cursor for *mut T {
    type Category = RandomAccessTag;
    type Value = T;
    type Difference = isize;
    type Pointer = *mut T;
    type Reference<'a> = &'a mut T where Self: 'a;

    #[inline(always)]
    fn increment(&mut self) {
        *self = self.wrapping_add(1);
    }

    #[inline(always)]
    fn pointer(&self) -> *mut T {
        *self
    }

    #[inline(always)]
    unsafe fn get_unchecked<'a>(&'a self) -> &'a mut T {
        &mut **self
    }
}

impl<T> Bidirectional for *mut T {
    #[inline(always)]
    fn decrement(&mut self) {
        *self = self.wrapping_sub(1);
    }
}

impl<T> RandomAccess for *mut T {
    #[inline(always)]
    fn offset(&mut self, n: isize) {
        *self = self.wrapping_offset(n);
    }

    #[inline(always)]
    fn difference(&self, origin: &Self) -> isize {
        pointer_difference::<T>(*self as usize, *origin as usize)
    }
}

// Zero-sized elements never advance an address, so every difference is 0.
#[inline(always)]
fn pointer_difference<T>(to: usize, from: usize) -> isize {
    match mem::size_of::<T>() {
        0 => 0,
        size => (to.wrapping_sub(from) as isize) / size as isize,
    }
}
