//! Internal utilities.

pub mod array;
pub mod raw;
pub mod root;

#[cfg(test)]
pub mod tester;
