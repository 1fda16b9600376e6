//! The Failure and Result types of this library.
//!
//! Any method of the `HashMap` which may allocate memory, look up a key through
//! the user-supplied hooks, or write into a caller-provided buffer, may fail.
//! The cause of the error is then represented as a `Failure`.
//!
//! Where convenient, faillible methods come in two versions:
//!
//! -   A faillible `try_xxx` version, which returns a `Result` with `Failure` as the error type.
//! -   A convenience `xxx` version, which invokes the `try_xxx` version and panics in case of error.
//!
//! A method returning an error never leaves the `HashMap` partially modified.

use super::root::{error, fmt, result};

/// Universal Failure type of this library.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Failure {
    /// The key was required to be present, and is not.
    KeyNotFound,
    /// The key was required to be absent, and is not.
    KeyExists,
    /// The insertion would exceed the maximum capacity of the map.
    CapacityExceeded,
    /// The map was structurally modified while being enumerated, or while
    /// calling into the user-supplied hooks.
    ConcurrentModification,
    /// The destination buffer or offset cannot accommodate the request.
    InvalidArgument,
    /// The number of bytes to allocate cannot be calculated due to overflowing.
    BytesOverflow,
    /// The allocator could not allocate memory.
    OutOfMemory,
}

impl error::Error for Failure {}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Failure::KeyNotFound => "key not found",
            Failure::KeyExists => "key already exists",
            Failure::CapacityExceeded => "maximum capacity exceeded",
            Failure::ConcurrentModification => "map modified during access",
            Failure::InvalidArgument => "destination out of range",
            Failure::BytesOverflow => "allocation size overflows",
            Failure::OutOfMemory => "out of memory",
        };

        write!(f, "{} ({:?})", message, self)
    }
}

/// Universal Result type of this library.
pub type Result<T> = result::Result<T, Failure>;

//  Panics with the given failure.
//
//  Shared by the convenience versions of faillible methods.
#[cold]
#[inline(never)]
pub(crate) fn panic_from_failure(failure: Failure) -> ! {
    panic!("{}", failure);
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn failure_display() {
        assert_eq!("key not found (KeyNotFound)", format!("{}", Failure::KeyNotFound));
        assert_eq!(
            "maximum capacity exceeded (CapacityExceeded)",
            format!("{}", Failure::CapacityExceeded)
        );
    }

    #[test]
    #[should_panic(expected = "out of memory")]
    fn failure_panic() {
        panic_from_failure(Failure::OutOfMemory);
    }
}
