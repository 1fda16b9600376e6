#![cfg_attr(not(feature = "with-std"), no_std)]
//  Lints
#![allow(clippy::module_inception)]

//! #   The Chained Library
//!
//! An embeddable hash map built directly on flat arrays.
//!
//! -   The `HashMap`: a chained hash map, whose slots are recycled through a
//!     free list and whose storage grows along a fixed table of prime sizes.
//!
//! The map trades a few ergonomic niceties for explicit control: fused
//! operations which test, read, write, and remove in a single traversal;
//! defragmentation and trimming on demand; and user-supplied hooks for
//! hashing, equality, and allocation.

pub mod allocator;
pub mod failure;
pub mod hashmap;

mod hashcore;
mod utils;

use self::utils::array;
use self::utils::raw;
use self::utils::root;
