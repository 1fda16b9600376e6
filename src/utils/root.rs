//! Re-export core/std facilities under a unified name.

#[cfg(not(feature = "with-std"))]
pub use core::{alloc, fmt, iter, marker, mem, ops, ptr, result, slice};

#[cfg(feature = "with-std")]
pub use std::{alloc, fmt, iter, marker, mem, ops, ptr, result, slice};

#[cfg(feature = "with-std")]
pub use std::{collections, error, hash};

#[cfg(not(feature = "with-std"))]
pub mod error {

pub trait Error : super::fmt::Debug + super::fmt::Display {}

}
