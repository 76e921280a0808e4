//! Cursor traits, category tags and positional helpers.

mod category;
mod reverse;

pub use category::{
    advance, category_of, distance, next, Bidirectional, BidirectionalTag, Category, Cursor,
    Dispatch, ForwardTag, InputTag, RandomAccess, RandomAccessTag, Tag,
};
pub use reverse::Reverse;
