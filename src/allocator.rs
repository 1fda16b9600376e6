//! Allocator.
//!
//! The `Allocator` trait allows a user to customize how the slot and bucket
//! arrays of a `HashMap` are allocated, on a per instance basis, without
//! depending on the `alloc` crate.
//!
//! A `HashMap` only ever requests arrays: one of buckets and one of slots, both
//! sized after an entry of its growth table. An allocator may refuse a request
//! by returning a null pointer, in which case the `HashMap` retries once with the
//! smallest sufficient size before reporting `Failure::OutOfMemory`.
use super::failure::{Failure, Result};
use super::root::{alloc, mem};

/// Layout, re-exported.
pub type Layout = alloc::Layout;

/// Allocator
pub trait Allocator {
    /// Allocates memory as per the size and alignment requirements.
    ///
    /// May return a null pointer if the allocation cannot be satisfied.
    ///
    /// #   Safety
    ///
    /// -   Assumes that the size of the Layout is non-zero.
    unsafe fn allocate(&self, layout: Layout) -> *mut u8;

    /// Deallocates memory.
    ///
    /// #   Safety
    ///
    /// -   Assumes that `ptr` was allocated by `self.allocate`.
    /// -   Assumes that `ptr` was not already deallocated.
    /// -   Assumes that `layout` matches the layout with which `ptr` was allocated.
    unsafe fn deallocate(&self, ptr: *mut u8, layout: Layout);
}

impl<A: Allocator + ?Sized> Allocator for &A {
    unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
        //  Safety:
        //  -   Forwarding.
        unsafe { (**self).allocate(layout) }
    }

    unsafe fn deallocate(&self, ptr: *mut u8, layout: Layout) {
        //  Safety:
        //  -   Forwarding.
        unsafe { (**self).deallocate(ptr, layout) }
    }
}

/// DefaultAllocator
///
/// A default implementation of the `Allocator` trait, relying on the `alloc` crate global allocator.
#[cfg(feature = "with-std")]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DefaultAllocator;

#[cfg(feature = "with-std")]
impl Allocator for DefaultAllocator {
    unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
        alloc::alloc(layout)
    }

    unsafe fn deallocate(&self, ptr: *mut u8, layout: Layout) {
        alloc::dealloc(ptr, layout)
    }
}

/// Computes the layout of an array of `length` elements of type `T`.
///
/// #   Errors
///
/// Returns `Failure::BytesOverflow` if the size of the array, in bytes,
/// overflows.
///
/// #   Example
///
/// ```
/// use chained::allocator::array_layout;
/// use chained::failure::Failure;
///
/// let layout = array_layout::<u32>(4).unwrap();
/// assert_eq!(16, layout.size());
/// assert_eq!(4, layout.align());
///
/// assert_eq!(Err(Failure::BytesOverflow), array_layout::<u32>(usize::MAX));
/// ```
pub fn array_layout<T>(length: usize) -> Result<Layout> {
    let size = mem::size_of::<T>();
    let alignment = mem::align_of::<T>();

    let bytes = length.checked_mul(size).ok_or(Failure::BytesOverflow)?;

    //  Layout also requires the size, rounded up to alignment, to fit `isize`.
    Layout::from_size_align(bytes, alignment).map_err(|_| Failure::BytesOverflow)
}
