//! Error types shared by the allocators and the containers.

use core::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The error type for allocation failures.
///
/// Carries the number of bytes that was requested so callers can report it,
/// or forward it to [`std::alloc::handle_alloc_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocError {
    size: usize,
}

impl AllocError {
    /// Creates an error for a request of `size` bytes.
    #[inline]
    pub const fn new(size: usize) -> Self {
        Self { size }
    }

    /// An error for a request whose byte size does not fit in `usize`.
    #[inline]
    pub const fn capacity_overflow() -> Self {
        Self { size: usize::MAX }
    }

    /// Number of bytes that could not be obtained.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Hands the failure to the global allocation error handler.
    ///
    /// Used by the infallible container methods, which behave like the
    /// standard collections on out-of-memory.
    #[cold]
    pub fn handle(self) -> ! {
        match core::alloc::Layout::from_size_align(self.size.min(isize::MAX as usize), 1) {
            Ok(layout) => std::alloc::handle_alloc_error(layout),
            Err(_) => panic!("capacity overflow"),
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size == usize::MAX {
            f.write_str("memory allocation failed: capacity overflow")
        } else {
            write!(f, "memory allocation of {} bytes failed", self.size)
        }
    }
}

impl std::error::Error for AllocError {}

/// Errors reported by the bounds-checked and fallible container operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The allocator could not satisfy a request.
    Alloc(AllocError),
    /// `index` was outside `[0, len)`.
    OutOfRange {
        /// Offending index.
        index: usize,
        /// Length of the container at the time of the access.
        len: usize,
    },
    /// A fixed-size container was built or assigned from an initializer of
    /// the wrong length.
    LengthMismatch {
        /// Length required by the container.
        expected: usize,
        /// Length of the initializer.
        found: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Alloc(err) => fmt::Display::fmt(err, f),
            Error::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Error::LengthMismatch { expected, found } => {
                write!(f, "expected {expected} elements, found {found}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Alloc(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for Error {
    #[inline]
    fn from(err: AllocError) -> Self {
        Error::Alloc(err)
    }
}
