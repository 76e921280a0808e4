//! # `keel` - allocator-aware containers
//!
//! Array, vector, doubly-linked list and double-ended queue containers, each
//! parameterized over its element type and an injectable allocator, together
//! with the infrastructure they share:
//!
//! - [`alloc`]: the typed [`Allocator`] trait with `rebind`, the stateless
//!   [`StdAlloc`], the counting [`TrackingAllocator`], and the
//!   [`uninit`](alloc::uninit) algorithms that construct into raw storage with
//!   rollback on failure.
//! - [`iter`]: cursor category tags and capability traits, with
//!   `distance`/`advance` dispatched on the category at compile time.
//! - [`collections`]: [`Array`], [`Vector`], [`List`] and [`Deque`].
//!
//! ## The deque
//!
//! [`Deque`] stores its elements in fixed-size buffers reached through a map
//! of buffer pointers. Random access is O(1), pushing and popping at either
//! end is amortized O(1), and growing never moves an element: only the map is
//! reallocated. Positions inside the deque are `(buffer, offset)` pairs, so
//! cursor arithmetic crosses buffer boundaries transparently.
//!
//! ```
//! use keel::Deque;
//!
//! let mut d: Deque<i32> = (0..10).collect();
//! d.push_back(10);
//! d.push_front(-1);
//! assert_eq!(d.len(), 12);
//! assert_eq!(d[0], -1);
//! assert_eq!(d.end() - d.begin(), 12);
//! ```
//!
//! ## Errors
//!
//! Every allocating operation has a `try_*` form returning [`AllocError`];
//! the plain form hands failures to [`std::alloc::handle_alloc_error`] like
//! the standard collections. Checked accessors return [`Error`].
//!
//! ## Features
//!
//! - `tracing`: emit events for map initialization, map reallocation and
//!   allocation failures
//! - `serde`: `Serialize`/`Deserialize` for `Deque`, `Vector` and `List`
//! - `proptest`: strategies in [`strategy`]
//! - `alloc-mimalloc`, `alloc-jemalloc`, `alloc-snmalloc`: extra
//!   [`StdAlloc`] backends

#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod macros;

pub mod alloc;
pub mod collections;
pub mod config;
pub mod error;
pub mod iter;
#[cfg(feature = "proptest")]
pub mod strategy;

pub use alloc::{AllocStats, Allocator, StdAlloc, TrackingAllocator};
pub use collections::{Array, Deque, List, Vector};
pub use error::{AllocError, Error, Result};
