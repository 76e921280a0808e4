use super::category::{Bidirectional, Cursor, RandomAccess};

/// Walks a bidirectional cursor backwards.
///
/// `Reverse::new(c)` addresses the element *before* `c`, so reversing a
/// half-open `[first, last)` gives `[Reverse::new(last), Reverse::new(first))`
/// over the same elements. The wrapped cursor is kept already stepped back,
/// which makes dereferencing a plain forward to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reverse<C> {
    current: C,
}

impl<C: Bidirectional> Reverse<C> {
    /// Reverse cursor addressing the element before `base`.
    pub fn new(base: C) -> Self {
        let mut current = base;
        current.decrement();
        Self { current }
    }

    /// The forward cursor one past the addressed element.
    pub fn base(&self) -> C {
        let mut base = self.current.clone();
        base.increment();
        base
    }
}

impl<C: Bidirectional> Cursor for Reverse<C> {
    type Category = C::Category;
    type Value = C::Value;
    type Difference = C::Difference;
    type Pointer = C::Pointer;
    type Reference<'a> = C::Reference<'a> where Self: 'a;

    #[inline]
    fn increment(&mut self) {
        self.current.decrement();
    }

    #[inline]
    fn pointer(&self) -> C::Pointer {
        self.current.pointer()
    }

    #[inline]
    unsafe fn get_unchecked<'a>(&'a self) -> C::Reference<'a> {
        self.current.get_unchecked()
    }
}

impl<C: Bidirectional> Bidirectional for Reverse<C> {
    #[inline]
    fn decrement(&mut self) {
        self.current.increment();
    }
}

impl<C: RandomAccess> RandomAccess for Reverse<C> {
    #[inline]
    fn offset(&mut self, n: C::Difference) {
        self.current.offset(-n);
    }

    #[inline]
    fn difference(&self, origin: &Self) -> C::Difference {
        origin.current.difference(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iter::{distance, Category};

    #[test]
    fn walks_a_slice_backwards() {
        let data = [1, 2, 3, 4];
        let first = data.as_ptr();
        let last = first.wrapping_add(data.len());

        let mut it = Reverse::new(last);
        let end = Reverse::new(first);
        let mut seen = Vec::new();
        while it != end {
            seen.push(unsafe { *it.get_unchecked() });
            it.increment();
        }
        assert_eq!(seen, [4, 3, 2, 1]);
    }

    #[test]
    fn distance_and_offset_are_mirrored() {
        let data = [1u8, 2, 3, 4, 5];
        let first = data.as_ptr();
        let last = first.wrapping_add(data.len());
        let rfirst = Reverse::new(last);
        let rlast = Reverse::new(first);
        assert_eq!(distance(&rfirst, &rlast), 5);
        assert_eq!(crate::iter::category_of::<Reverse<*const u8>>(), Category::RandomAccess);

        let mut it = rfirst.clone();
        it.offset(2);
        assert_eq!(unsafe { *it.get_unchecked() }, 3);
        assert_eq!(it.base(), first.wrapping_add(3));
    }
}
