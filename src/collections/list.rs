//! `List`: a doubly-linked list with allocator-provided nodes.
//!
//! Nodes come from the list allocator rebound to `Node<T>`. Sorting and
//! merging relink nodes in place; elements are never moved or cloned.
//!
//! Performance Characteristics:
//! - Push/Pop at either end: O(1), one allocation per push
//! - Insert/remove at `i`: O(min(i, len - i)) to walk, O(1) to relink
//! - `append`, `splice_*`: O(1) to relink, plus the walk to each position
//! - `sort`: O(n log n) comparisons, stable
//!
//! A panicking comparator leaves `sort_by` and `merge_by` with every node
//! still linked and counted, in an unspecified order.

use super::resolve_range;
use crate::alloc::{AllocError, Allocator, StdAlloc};
use crate::iter::{self, BidirectionalTag};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::mem;
use core::ops::RangeBounds;
use core::ptr::{self, NonNull};

type Link<T> = Option<NonNull<Node<T>>>;

/// A list node. Only reachable through a [`List`].
pub struct Node<T> {
    value: T,
    prev: Link<T>,
    next: Link<T>,
}

/// A doubly-linked list.
pub struct List<T, A: Allocator<T> = StdAlloc<T>> {
    head: Link<T>,
    tail: Link<T>,
    len: usize,
    alloc: A,
    node_alloc: A::Rebind<Node<T>>,
    _marker: PhantomData<Node<T>>,
}

impl<T> List<T> {
    /// Creates an empty list.
    #[inline]
    pub fn new() -> Self {
        Self::new_in(StdAlloc::new())
    }
}

impl<T, A: Allocator<T>> List<T, A> {
    /// Creates an empty list allocating from `alloc`.
    #[inline]
    pub fn new_in(alloc: A) -> Self {
        let node_alloc = alloc.rebind();
        Self {
            head: None,
            tail: None,
            len: 0,
            alloc,
            node_alloc,
            _marker: PhantomData,
        }
    }

    fn new_node(&self, value: T, prev: Link<T>, next: Link<T>) -> Result<NonNull<Node<T>>, AllocError> {
        let node = self.node_alloc.allocate(1)?;
        // SAFETY: freshly allocated storage for one node.
        unsafe { node.as_ptr().write(Node { value, prev, next }) };
        Ok(node)
    }

    /// Unlinks `node` and returns its value.
    ///
    /// # Safety
    /// `node` must belong to this list.
    unsafe fn unlink(&mut self, node: NonNull<Node<T>>) -> T {
        let Node { value, prev, next } = node.as_ptr().read();
        match prev {
            Some(p) => (*p.as_ptr()).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => (*n.as_ptr()).prev = prev,
            None => self.tail = prev,
        }
        self.node_alloc.deallocate(node, 1);
        self.len -= 1;
        value
    }

    /// Links a new node holding `value` between `prev` and `next`, which
    /// must be adjacent.
    fn link_between(&mut self, value: T, prev: Link<T>, next: Link<T>) -> Result<(), AllocError> {
        let node = self.new_node(value, prev, next)?;
        // SAFETY: `prev` and `next` are nodes of this list (or the ends).
        unsafe {
            match prev {
                Some(p) => (*p.as_ptr()).next = Some(node),
                None => self.head = Some(node),
            }
            match next {
                Some(n) => (*n.as_ptr()).prev = Some(node),
                None => self.tail = Some(node),
            }
        }
        self.len += 1;
        Ok(())
    }

    /// The node at `index`, walking from the nearer end.
    fn node_at(&self, index: usize) -> Link<T> {
        if index >= self.len {
            return None;
        }
        // SAFETY: the walk stays within the `len` linked nodes.
        unsafe {
            if index < self.len / 2 {
                let mut node = self.head;
                for _ in 0..index {
                    node = node.and_then(|n| (*n.as_ptr()).next);
                }
                node
            } else {
                let mut node = self.tail;
                for _ in index + 1..self.len {
                    node = node.and_then(|n| (*n.as_ptr()).prev);
                }
                node
            }
        }
    }

    /// Prepends `value`.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the node cannot be allocated.
    pub fn try_push_front(&mut self, value: T) -> Result<(), AllocError> {
        self.link_between(value, None, self.head)
    }

    /// Appends `value`.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the node cannot be allocated.
    pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
        self.link_between(value, self.tail, None)
    }

    /// Prepends `value`.
    pub fn push_front(&mut self, value: T) {
        if let Err(err) = self.try_push_front(value) {
            err.handle();
        }
    }

    /// Appends `value`.
    pub fn push_back(&mut self, value: T) {
        if let Err(err) = self.try_push_back(value) {
            err.handle();
        }
    }

    /// Removes and returns the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        // SAFETY: `head` belongs to this list.
        self.head.map(|node| unsafe { self.unlink(node) })
    }

    /// Removes and returns the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        // SAFETY: `tail` belongs to this list.
        self.tail.map(|node| unsafe { self.unlink(node) })
    }

    /// Inserts `value` so that it ends up at `index`.
    ///
    /// # Errors
    /// Returns [`AllocError`] if the node cannot be allocated.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), AllocError> {
        let len = self.len;
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");
        let next = self.node_at(index);
        // SAFETY: `next` belongs to this list.
        let prev = match next {
            Some(n) => unsafe { (*n.as_ptr()).prev },
            None => self.tail,
        };
        self.link_between(value, prev, next)
    }

    /// Inserts `value` so that it ends up at `index`.
    ///
    /// # Panics
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        if let Err(err) = self.try_insert(index, value) {
            err.handle();
        }
    }

    /// Removes and returns the element at `index`.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let node = self.node_at(index)?;
        // SAFETY: `node` belongs to this list.
        Some(unsafe { self.unlink(node) })
    }

    /// Moves every node of `other` to the back of `self` in O(1).
    ///
    /// # Panics
    /// Panics if the two allocators do not compare equal.
    pub fn append(&mut self, other: &mut Self) {
        assert!(self.alloc == other.alloc, "cannot splice nodes between unequal allocators");
        let Some(other_head) = other.head.take() else {
            return;
        };
        // SAFETY: both chains are well formed; `other` is left empty.
        unsafe {
            match self.tail {
                Some(t) => {
                    (*t.as_ptr()).next = Some(other_head);
                    (*other_head.as_ptr()).prev = Some(t);
                }
                None => self.head = Some(other_head),
            }
        }
        self.tail = other.tail.take();
        self.len += other.len;
        other.len = 0;
    }

    /// Moves every node of `other` into `self` before position `index`.
    ///
    /// # Panics
    /// Panics if `index > len` or the two allocators do not compare equal.
    pub fn splice_at(&mut self, index: usize, other: &mut Self) {
        let len = other.len;
        self.splice_range(index, other, 0..len);
    }

    /// Moves the node at `from` in `other` into `self` before position
    /// `index`.
    ///
    /// # Panics
    /// Panics if `index > len`, `from >= other.len()` or the two allocators
    /// do not compare equal.
    pub fn splice_one(&mut self, index: usize, other: &mut Self, from: usize) {
        assert!(from < other.len, "splice index {from} out of range for length {}", other.len);
        self.splice_range(index, other, from..=from);
    }

    /// Moves the nodes of `other` in `range` into `self` before position
    /// `index`, keeping their order.
    ///
    /// # Panics
    /// Panics if `index > len`, the range is out of bounds for `other` or the
    /// two allocators do not compare equal.
    pub fn splice_range<R>(&mut self, index: usize, other: &mut Self, range: R)
    where
        R: RangeBounds<usize>,
    {
        assert!(self.alloc == other.alloc, "cannot splice nodes between unequal allocators");
        assert!(index <= self.len, "splice position {index} out of range for length {}", self.len);
        let (first, last) = resolve_range(&range, other.len);
        let count = last - first;
        if count == 0 {
            return;
        }
        let (Some(head), Some(tail)) = (other.node_at(first), other.node_at(last - 1)) else {
            return;
        };
        // SAFETY: `head..=tail` are `count` consecutive nodes of `other`; once
        // detached they are linked into `self` at a valid position.
        unsafe {
            other.detach(head, tail, count);
            let next = self.node_at(index);
            let prev = match next {
                Some(n) => (*n.as_ptr()).prev,
                None => self.tail,
            };
            self.attach(head, tail, count, prev, next);
        }
    }

    /// Unlinks the chain `head..=tail` of `count` nodes without freeing it.
    ///
    /// # Safety
    /// The chain must be `count` consecutive nodes of this list.
    unsafe fn detach(&mut self, head: NonNull<Node<T>>, tail: NonNull<Node<T>>, count: usize) {
        let prev = (*head.as_ptr()).prev.take();
        let next = (*tail.as_ptr()).next.take();
        match prev {
            Some(p) => (*p.as_ptr()).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => (*n.as_ptr()).prev = prev,
            None => self.tail = prev,
        }
        self.len -= count;
    }

    /// Links the detached chain `head..=tail` of `count` nodes between the
    /// adjacent `prev` and `next`.
    ///
    /// # Safety
    /// The chain must be detached from every list, and `prev`/`next` must be
    /// adjacent positions of this list.
    unsafe fn attach(
        &mut self,
        head: NonNull<Node<T>>,
        tail: NonNull<Node<T>>,
        count: usize,
        prev: Link<T>,
        next: Link<T>,
    ) {
        (*head.as_ptr()).prev = prev;
        (*tail.as_ptr()).next = next;
        match prev {
            Some(p) => (*p.as_ptr()).next = Some(head),
            None => self.head = Some(head),
        }
        match next {
            Some(n) => (*n.as_ptr()).prev = Some(tail),
            None => self.tail = Some(tail),
        }
        self.len += count;
    }

    /// Merges the sorted list `other` into the sorted `self` by relinking
    /// nodes. On ties the elements of `self` come first.
    ///
    /// If `compare` panics, both lists' nodes stay in `self` and `other` is
    /// left empty.
    ///
    /// # Panics
    /// Panics if the two allocators do not compare equal.
    pub fn merge_by<F>(&mut self, other: &mut Self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        assert!(self.alloc == other.alloc, "cannot splice nodes between unequal allocators");
        let ours = self.head;
        let theirs = other.head.take();
        // Chain `other` behind `self` through the `prev` links only; merging
        // rewrites `next` and leaves them as the unwind record.
        if let (Some(t), Some(h)) = (self.tail, theirs) {
            // SAFETY: `h` heads the chain just taken from `other`.
            unsafe { (*h.as_ptr()).prev = Some(t) };
        }
        if let Some(t) = other.tail.take() {
            self.tail = Some(t);
        }
        self.len += mem::take(&mut other.len);

        let mut guard = Relink(self);
        // SAFETY: both chains are well formed and now owned by `self`.
        unsafe {
            let merged = merge_chains(ours, theirs, &mut compare);
            guard.0.relink(merged);
        }
        mem::forget(guard);
    }

    /// [`List::merge_by`] with `Ord`.
    pub fn merge(&mut self, other: &mut Self)
    where
        T: Ord,
    {
        self.merge_by(other, T::cmp);
    }

    /// Stable merge sort over the links.
    ///
    /// If `compare` panics, every element stays in the list in an
    /// unspecified order.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut guard = Relink(self);
        // SAFETY: the chain from `head` holds exactly `len` nodes.
        unsafe {
            let sorted = sort_chain(guard.0.head, guard.0.len, &mut compare);
            guard.0.relink(sorted);
        }
        mem::forget(guard);
    }

    /// Stable sort with `Ord`.
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        self.sort_by(T::cmp);
    }

    /// Rebuilds the `prev` links and `tail` of a chain linked by `next`.
    unsafe fn relink(&mut self, head: Link<T>) {
        let mut prev = None;
        let mut current = head;
        while let Some(node) = current {
            (*node.as_ptr()).prev = prev;
            prev = current;
            current = (*node.as_ptr()).next;
        }
        self.head = head;
        self.tail = prev;
    }

    /// Rebuilds the `next` links, `head` and `len` of a chain linked by
    /// `prev` and ending at `tail`.
    unsafe fn relink_from_tail(&mut self) {
        let mut next = None;
        let mut current = self.tail;
        let mut len = 0;
        while let Some(node) = current {
            (*node.as_ptr()).next = next;
            next = current;
            current = (*node.as_ptr()).prev;
            len += 1;
        }
        self.head = next;
        self.len = len;
    }

    /// Reverses the list in place.
    pub fn reverse(&mut self) {
        let mut current = self.head;
        // SAFETY: every node is visited once.
        unsafe {
            while let Some(node) = current {
                let n = &mut *node.as_ptr();
                current = n.next;
                core::mem::swap(&mut n.prev, &mut n.next);
            }
        }
        core::mem::swap(&mut self.head, &mut self.tail);
    }

    /// Drops every element and releases every node.
    pub fn clear(&mut self) {
        while self.pop_front().is_some() {}
    }

    /// The first element.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        // SAFETY: `head` is live while `self` is borrowed.
        self.head.map(|n| unsafe { &(*n.as_ptr()).value })
    }

    /// The first element, mutably.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as above, with unique access.
        self.head.map(|n| unsafe { &mut (*n.as_ptr()).value })
    }

    /// The last element.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        // SAFETY: `tail` is live while `self` is borrowed.
        self.tail.map(|n| unsafe { &(*n.as_ptr()).value })
    }

    /// The last element, mutably.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        // SAFETY: as above, with unique access.
        self.tail.map(|n| unsafe { &mut (*n.as_ptr()).value })
    }

    /// Number of elements.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` if the list holds no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Largest number of nodes the allocator could provide.
    #[inline]
    pub fn max_size(&self) -> usize {
        self.node_alloc.max_size()
    }

    /// The element allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Cursor at the first element (the end position when empty).
    #[inline]
    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor::new(self.head, self.head, self.tail)
    }

    /// Cursor one past the last element.
    #[inline]
    pub fn cursor_end(&self) -> Cursor<'_, T> {
        Cursor::new(None, self.head, self.tail)
    }

    /// Front-to-back iterator.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            front: self.head,
            back: self.tail,
            len: self.len,
            _marker: PhantomData,
        }
    }

    /// Front-to-back iterator over mutable references.
    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            front: self.head,
            back: self.tail,
            len: self.len,
            _marker: PhantomData,
        }
    }
}

/// Stable merge of two chains linked by `next`; returns the new head.
///
/// # Safety
/// Both chains must be well formed and disjoint.
unsafe fn merge_chains<T, F>(mut a: Link<T>, mut b: Link<T>, compare: &mut F) -> Link<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut head: Link<T> = None;
    let mut slot: *mut Link<T> = &mut head;
    loop {
        match (a, b) {
            (Some(x), Some(y)) => {
                let take = if compare(&(*y.as_ptr()).value, &(*x.as_ptr()).value) == Ordering::Less {
                    b = (*y.as_ptr()).next;
                    y
                } else {
                    a = (*x.as_ptr()).next;
                    x
                };
                *slot = Some(take);
                slot = ptr::addr_of_mut!((*take.as_ptr()).next);
            }
            (rest, None) | (None, rest) => {
                *slot = rest;
                return head;
            }
        }
    }
}

/// Top-down merge sort of a chain of `len` nodes linked by `next`.
///
/// # Safety
/// The chain from `head` must hold exactly `len` nodes.
unsafe fn sort_chain<T, F>(head: Link<T>, len: usize, compare: &mut F) -> Link<T>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if len < 2 {
        return head;
    }
    let Some(mut split) = head else {
        return head;
    };
    let mid = len / 2;
    for _ in 1..mid {
        if let Some(next) = (*split.as_ptr()).next {
            split = next;
        }
    }
    let right = (*split.as_ptr()).next.take();
    let left = sort_chain(head, mid, compare);
    let right = sort_chain(right, len - mid, compare);
    merge_chains(left, right, compare)
}

/// Restores a list from its `prev` links if a comparator unwinds while the
/// `next` links are being rewritten.
struct Relink<'a, T, A: Allocator<T>>(&'a mut List<T, A>);

impl<T, A: Allocator<T>> Drop for Relink<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: sorting and merging only rewrite `next`; `tail` and the
        // `prev` links still chain every node of the list.
        unsafe { self.0.relink_from_tail() };
    }
}

impl<T, A: Allocator<T>> Drop for List<T, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, A: Allocator<T> + Default> Default for List<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator<T>> Clone for List<T, A> {
    fn clone(&self) -> Self {
        let mut list = Self::new_in(self.alloc.clone());
        list.extend(self.iter().cloned());
        list
    }
}

impl<T: fmt::Debug, A: Allocator<T>> fmt::Debug for List<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, A: Allocator<T>> PartialEq for List<T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, A: Allocator<T>> Eq for List<T, A> {}

impl<T: Hash, A: Allocator<T>> Hash for List<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for item in self {
            item.hash(state);
        }
    }
}

impl<T, A: Allocator<T>> Extend<T> for List<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push_back(item);
        }
    }
}

impl<T, A: Allocator<T> + Default> FromIterator<T> for List<T, A> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::default();
        list.extend(iter);
        list
    }
}

impl<T, A: Allocator<T>> IntoIterator for List<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        IntoIter { list: self }
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a List<T, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T, A: Allocator<T>> IntoIterator for &'a mut List<T, A> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

// SAFETY: the list owns its nodes exclusively.
unsafe impl<T: Send, A> Send for List<T, A>
where
    A: Allocator<T> + Send,
    A::Rebind<Node<T>>: Send,
{
}

unsafe impl<T: Sync, A> Sync for List<T, A>
where
    A: Allocator<T> + Sync,
    A::Rebind<Node<T>>: Sync,
{
}

/// A bidirectional position in a [`List`]; `None` is the end position,
/// which sits between the back and the front.
pub struct Cursor<'a, T> {
    node: Link<T>,
    head: Link<T>,
    tail: Link<T>,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Cursor<'a, T> {
    fn new(node: Link<T>, head: Link<T>, tail: Link<T>) -> Self {
        Self {
            node,
            head,
            tail,
            _marker: PhantomData,
        }
    }

    /// The element under the cursor, `None` at the end position.
    #[inline]
    pub fn get(&self) -> Option<&'a T> {
        // SAFETY: nodes stay live while the list is borrowed.
        self.node.map(|n| unsafe { &(*n.as_ptr()).value })
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

impl<'a, T> iter::Cursor for Cursor<'a, T> {
    type Category = BidirectionalTag;
    type Value = T;
    type Difference = isize;
    type Pointer = *const T;
    type Reference<'b> = &'a T where Self: 'b;

    fn increment(&mut self) {
        self.node = match self.node {
            // SAFETY: nodes stay live while the list is borrowed.
            Some(n) => unsafe { (*n.as_ptr()).next },
            None => self.head,
        };
    }

    fn pointer(&self) -> *const T {
        self.get().map_or(ptr::null(), |value| value as *const T)
    }

    unsafe fn get_unchecked<'b>(&'b self) -> &'a T {
        match self.node {
            Some(n) => &(*n.as_ptr()).value,
            None => core::hint::unreachable_unchecked(),
        }
    }
}

impl<T> iter::Bidirectional for Cursor<'_, T> {
    fn decrement(&mut self) {
        self.node = match self.node {
            // SAFETY: nodes stay live while the list is borrowed.
            Some(n) => unsafe { (*n.as_ptr()).prev },
            None => self.tail,
        };
    }
}

/// Borrowing iterator over a [`List`].
pub struct Iter<'a, T> {
    front: Link<T>,
    back: Link<T>,
    len: usize,
    _marker: PhantomData<&'a T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.front.map(|node| {
            self.len -= 1;
            // SAFETY: the node is live while the list is borrowed.
            let node = unsafe { &*node.as_ptr() };
            self.front = node.next;
            &node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.back.map(|node| {
            self.len -= 1;
            // SAFETY: as above.
            let node = unsafe { &*node.as_ptr() };
            self.back = node.prev;
            &node.value
        })
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable borrowing iterator over a [`List`].
pub struct IterMut<'a, T> {
    front: Link<T>,
    back: Link<T>,
    len: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        self.front.map(|node| {
            self.len -= 1;
            // SAFETY: each node is yielded at most once.
            let node = unsafe { &mut *node.as_ptr() };
            self.front = node.next;
            &mut node.value
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.len == 0 {
            return None;
        }
        self.back.map(|node| {
            self.len -= 1;
            // SAFETY: as above.
            let node = unsafe { &mut *node.as_ptr() };
            self.back = node.prev;
            &mut node.value
        })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

/// Owning iterator over a [`List`].
pub struct IntoIter<T, A: Allocator<T>> {
    list: List<T, A>,
}

impl<T, A: Allocator<T>> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len, Some(self.list.len))
    }
}

impl<T, A: Allocator<T>> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        self.list.pop_back()
    }
}

impl<T, A: Allocator<T>> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator<T>> FusedIterator for IntoIter<T, A> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alloc::{AllocStats, TrackingAllocator};
    use crate::iter::{advance, distance, Bidirectional, Cursor as _};
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;

    fn list(items: &[i32]) -> List<i32> {
        items.iter().copied().collect()
    }

    fn items<A: Allocator<i32>>(l: &List<i32, A>) -> Vec<i32> {
        l.iter().copied().collect()
    }

    #[test]
    fn push_pop_both_ends() {
        let mut l = List::new();
        l.push_back(2);
        l.push_front(1);
        l.push_back(3);
        assert_eq!(items(&l), [1, 2, 3]);
        assert_eq!(l.pop_back(), Some(3));
        assert_eq!(l.pop_front(), Some(1));
        assert_eq!(l.pop_front(), Some(2));
        assert_eq!(l.pop_front(), None);
        assert!(l.front().is_none() && l.back().is_none());
    }

    #[test]
    fn insert_and_remove_by_index() {
        let mut l = list(&[0, 1, 2, 3, 4, 5]);
        l.insert(0, -1);
        l.insert(7, 6);
        l.insert(3, 99);
        assert_eq!(items(&l), [-1, 0, 1, 99, 2, 3, 4, 5, 6]);
        assert_eq!(l.remove(3), Some(99));
        assert_eq!(l.remove(7), Some(6));
        assert_eq!(l.remove(7), None);
        assert_eq!(items(&l), [-1, 0, 1, 2, 3, 4, 5]);
        assert_eq!(l.iter().rev().copied().collect::<Vec<_>>(), [5, 4, 3, 2, 1, 0, -1]);
    }

    #[test]
    fn sort_is_stable() {
        let mut l: List<(u8, usize)> = [3, 1, 2, 1, 3, 2, 1]
            .iter()
            .enumerate()
            .map(|(i, &k)| (k, i))
            .collect();
        l.sort_by(|a, b| a.0.cmp(&b.0));
        let got: Vec<_> = l.iter().copied().collect();
        assert_eq!(got, [(1, 1), (1, 3), (1, 6), (2, 2), (2, 5), (3, 0), (3, 4)]);
        assert_eq!(l.back(), Some(&(3, 4)));
        // prev links were rebuilt.
        assert_eq!(l.iter().rev().next(), Some(&(3, 4)));
        assert_eq!(l.iter().rev().last(), Some(&(1, 1)));
    }

    #[test]
    fn merge_sorted_lists() {
        let mut a = list(&[1, 4, 4, 9]);
        let mut b = list(&[0, 4, 5, 10, 11]);
        a.merge(&mut b);
        assert!(b.is_empty());
        assert_eq!(items(&a), [0, 1, 4, 4, 4, 5, 9, 10, 11]);
        assert_eq!(a.len(), 9);
        assert_eq!(a.back(), Some(&11));
    }

    #[test]
    fn append_and_reverse() {
        let mut a = list(&[1, 2]);
        let mut b = list(&[3, 4, 5]);
        a.append(&mut b);
        a.reverse();
        assert_eq!(items(&a), [5, 4, 3, 2, 1]);
        assert_eq!(a.front(), Some(&5));
        assert!(b.is_empty());
        b.push_back(7);
        assert_eq!(items(&b), [7]);
    }

    #[test]
    fn cursor_walks_both_ways() {
        let l = list(&[10, 20, 30]);
        let first = l.cursor_front();
        let last = l.cursor_end();
        assert_eq!(distance(&first, &last), 3);

        let mut c = first;
        advance(&mut c, 2);
        assert_eq!(c.get(), Some(&30));
        c.increment();
        assert!(c == last);
        c.decrement();
        assert_eq!(unsafe { *c.get_unchecked() }, 30);
        advance(&mut c, -2);
        assert_eq!(c.pointer(), l.front().map_or(ptr::null(), |v| v as *const i32));
    }

    #[test]
    fn nodes_come_from_the_rebound_allocator() {
        let alloc = TrackingAllocator::<String>::new();
        let stats = alloc.stats().clone();
        let mut l = List::new_in(alloc);
        for i in 0..5 {
            l.push_back(i.to_string());
        }
        assert_eq!(stats.live(), 5);
        assert_eq!(stats.live_bytes(), 5 * core::mem::size_of::<Node<String>>());
        l.sort();
        assert_eq!(l.remove(2).as_deref(), Some("2"));
        drop(l);
        assert_eq!(stats.live(), 0);
    }

    fn tracked(
        stats: &Arc<AllocStats>,
        items: impl IntoIterator<Item = i32>,
    ) -> List<i32, TrackingAllocator<i32>> {
        let mut l = List::new_in(TrackingAllocator::with_stats(stats.clone()));
        l.extend(items);
        l
    }

    #[test]
    fn panicking_sort_comparator_keeps_every_node() {
        let stats = AllocStats::new();
        let mut l = tracked(&stats, (0..20).rev());
        let mut calls = 0;
        let result = catch_unwind(AssertUnwindSafe(|| {
            l.sort_by(|a, b| {
                calls += 1;
                if calls == 30 {
                    panic!("comparator gave up");
                }
                a.cmp(b)
            })
        }));
        assert!(result.is_err());
        assert_eq!(l.len(), 20);
        assert_eq!(l.iter().count(), 20);
        assert_eq!(l.iter().rev().count(), 20);
        let mut seen = items(&l);
        seen.sort_unstable();
        assert_eq!(seen, (0..20).collect::<Vec<_>>());

        // Still a working list.
        l.sort();
        assert_eq!(items(&l), (0..20).collect::<Vec<_>>());
        drop(l);
        assert_eq!(stats.live(), 0);
    }

    #[test]
    fn panicking_merge_comparator_keeps_both_lists() {
        let stats = AllocStats::new();
        let mut a = tracked(&stats, [1, 3, 5, 7]);
        let mut b = tracked(&stats, [2, 4, 6]);
        let mut calls = 0;
        let result = catch_unwind(AssertUnwindSafe(|| {
            a.merge_by(&mut b, |x, y| {
                calls += 1;
                if calls == 3 {
                    panic!("comparator gave up");
                }
                x.cmp(y)
            })
        }));
        assert!(result.is_err());
        assert!(b.is_empty() && b.iter().next().is_none());
        assert_eq!(a.len(), 7);
        assert_eq!(items(&a), [1, 3, 5, 7, 2, 4, 6]);
        assert_eq!(a.back(), Some(&6));
        drop((a, b));
        assert_eq!(stats.live(), 0);
    }

    #[test]
    fn splice_whole_list_at_a_position() {
        let mut a = list(&[1, 2, 5]);
        let mut b = list(&[3, 4]);
        a.splice_at(2, &mut b);
        assert_eq!(items(&a), [1, 2, 3, 4, 5]);
        assert_eq!(a.len(), 5);
        assert!(b.is_empty() && b.front().is_none() && b.back().is_none());

        let mut front = list(&[-1, 0]);
        a.splice_at(0, &mut front);
        let mut back = list(&[6]);
        a.splice_at(a.len(), &mut back);
        assert_eq!(items(&a), [-1, 0, 1, 2, 3, 4, 5, 6]);
        assert_eq!(a.iter().rev().copied().collect::<Vec<_>>(), [6, 5, 4, 3, 2, 1, 0, -1]);

        let mut empty = List::new();
        a.splice_at(3, &mut empty);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn splice_single_node() {
        let mut a = list(&[10, 30]);
        let mut b = list(&[0, 20, 40]);
        a.splice_one(1, &mut b, 1);
        assert_eq!(items(&a), [10, 20, 30]);
        assert_eq!(items(&b), [0, 40]);
        a.splice_one(3, &mut b, 1);
        a.splice_one(0, &mut b, 0);
        assert_eq!(items(&a), [0, 10, 20, 30, 40]);
        assert!(b.is_empty());
        assert_eq!((a.front(), a.back()), (Some(&0), Some(&40)));
    }

    #[test]
    fn splice_range_of_nodes() {
        let mut a = list(&[0, 9]);
        let mut b = list(&[100, 1, 2, 3, 200]);
        a.splice_range(1, &mut b, 1..4);
        assert_eq!(items(&a), [0, 1, 2, 3, 9]);
        assert_eq!(items(&b), [100, 200]);
        assert_eq!(b.iter().rev().copied().collect::<Vec<_>>(), [200, 100]);

        a.splice_range(0, &mut b, 2..2);
        assert_eq!(b.len(), 2);
        a.splice_range(5, &mut b, ..);
        assert_eq!(items(&a), [0, 1, 2, 3, 9, 100, 200]);
        assert_eq!(a.len(), 7);
        assert!(b.is_empty());
    }

    #[test]
    fn splice_moves_nodes_without_allocating() {
        let stats = AllocStats::new();
        let mut a = tracked(&stats, [1, 4]);
        let mut b = tracked(&stats, [2, 3, 5]);
        let before = stats.allocations();
        a.splice_range(1, &mut b, ..2);
        a.splice_one(4, &mut b, 0);
        assert_eq!(items(&a), [1, 2, 3, 4, 5]);
        assert_eq!(stats.allocations(), before);
        assert_eq!(stats.live(), 5);
        drop(b);
        assert_eq!(stats.live(), 5);
        drop(a);
        assert_eq!(stats.live(), 0);
    }

    #[test]
    #[should_panic(expected = "unequal allocators")]
    fn splice_rejects_unequal_allocators() {
        let mut a: List<i32, TrackingAllocator<i32>> = List::new_in(TrackingAllocator::new());
        let mut b: List<i32, TrackingAllocator<i32>> = List::new_in(TrackingAllocator::new());
        b.push_back(1);
        a.splice_at(0, &mut b);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn splice_rejects_a_position_past_the_end() {
        let mut a = list(&[1]);
        let mut b = list(&[2]);
        a.splice_one(2, &mut b, 0);
    }
}
