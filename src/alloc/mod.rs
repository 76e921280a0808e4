//! Allocation primitives consumed by every container.
//!
//! - [`Allocator`]: typed allocate/deallocate/construct/destroy with `rebind`
//! - [`StdAlloc`]: the stateless default, over a static global backend
//! - [`TrackingAllocator`]: counting (and optionally failing) allocator
//! - [`uninit`]: constructing into raw storage with rollback on failure

pub mod allocator;
pub mod system;
pub mod tracking;
pub mod uninit;

pub use allocator::Allocator;
pub use system::{Backend, StdAlloc};
#[cfg(feature = "alloc-jemalloc")]
pub use system::JemallocAlloc;
#[cfg(feature = "alloc-mimalloc")]
pub use system::MimallocAlloc;
#[cfg(feature = "alloc-snmalloc")]
pub use system::SnmallocAlloc;
pub use tracking::{AllocStats, TrackingAllocator};
pub use crate::error::AllocError;
