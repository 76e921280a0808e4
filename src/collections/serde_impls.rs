//! `Serialize`/`Deserialize` for the growable containers, as plain sequences.
//!
//! Requires crate feature `"serde"`. Deserialization needs a
//! default-constructible allocator.

use super::{Deque, List, Vector};
use crate::alloc::Allocator;
use core::fmt;
use core::marker::PhantomData;
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};

impl<T: Serialize, const BUFFER: usize, A: Allocator<T>> Serialize for Deque<T, BUFFER, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

impl<T: Serialize, A: Allocator<T>> Serialize for Vector<T, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

impl<T: Serialize, A: Allocator<T>> Serialize for List<T, A> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self)
    }
}

/// Sequence visitor that builds any container it can extend.
struct SeqVisitor<C, T> {
    expecting: &'static str,
    _marker: PhantomData<fn() -> (C, T)>,
}

impl<C, T> SeqVisitor<C, T> {
    fn new(expecting: &'static str) -> Self {
        Self {
            expecting,
            _marker: PhantomData,
        }
    }
}

impl<'de, C, T> Visitor<'de> for SeqVisitor<C, T>
where
    C: Default + Extend<T>,
    T: Deserialize<'de>,
{
    type Value = C;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.expecting)
    }

    fn visit_seq<S: SeqAccess<'de>>(self, mut seq: S) -> Result<C, S::Error> {
        let mut values = C::default();
        while let Some(value) = seq.next_element()? {
            values.extend(Some(value));
        }
        Ok(values)
    }
}

impl<'de, T, const BUFFER: usize, A> Deserialize<'de> for Deque<T, BUFFER, A>
where
    T: Deserialize<'de>,
    A: Allocator<T> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SeqVisitor::new("a sequence of deque elements"))
    }
}

impl<'de, T, A> Deserialize<'de> for Vector<T, A>
where
    T: Deserialize<'de>,
    A: Allocator<T> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SeqVisitor::new("a sequence of vector elements"))
    }
}

impl<'de, T, A> Deserialize<'de> for List<T, A>
where
    T: Deserialize<'de>,
    A: Allocator<T> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_seq(SeqVisitor::new("a sequence of list elements"))
    }
}
