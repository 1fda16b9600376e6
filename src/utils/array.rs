//! Fixed-length arrays, allocated through an `Allocator`.

use super::root::{marker, mem, ptr, slice};

use crate::allocator::{array_layout, Allocator};
use crate::failure::{Failure, Result};

//  A fixed-length array of `T`.
//
//  The array does not know which allocator it was allocated with, hence it
//  cannot deallocate itself on drop: the owner must call `deallocate`.
//
//  Its elements are all initialized at allocation, and are never dropped, hence
//  `T` is expected not to need dropping; any non-trivial content should be
//  wrapped in `Raw`.
pub struct RawArray<T> {
    ptr: ptr::NonNull<T>,
    length: usize,
    _marker: marker::PhantomData<T>,
}

impl<T> RawArray<T> {
    //  Creates an empty instance, which owns no memory.
    pub fn empty() -> Self {
        Self { ptr: ptr::NonNull::dangling(), length: 0, _marker: marker::PhantomData }
    }

    //  Allocates an array of `length` elements, the ith initialized to `fill(i)`.
    //
    //  #   Errors
    //
    //  -   `BytesOverflow` if the size of the array overflows.
    //  -   `OutOfMemory` if the allocator fails.
    pub fn allocate<A, F>(length: usize, allocator: &A, mut fill: F) -> Result<Self>
    where
        A: Allocator + ?Sized,
        F: FnMut(usize) -> T,
    {
        debug_assert!(!mem::needs_drop::<T>());

        let layout = array_layout::<T>(length)?;

        if layout.size() == 0 {
            return Ok(Self { length, ..Self::empty() });
        }

        //  Safety:
        //  -   The size of the layout is non-zero.
        let raw = unsafe { allocator.allocate(layout) };

        let ptr = ptr::NonNull::new(raw as *mut T).ok_or(Failure::OutOfMemory)?;

        for index in 0..length {
            //  Safety:
            //  -   `index` is within the bounds of the allocation.
            unsafe { ptr::write(ptr.as_ptr().add(index), fill(index)) };
        }

        Ok(Self { ptr, length, _marker: marker::PhantomData })
    }

    //  Returns the number of elements.
    pub fn len(&self) -> usize { self.length }

    //  Returns whether the array owns any memory.
    pub fn is_allocated(&self) -> bool {
        self.length > 0 && mem::size_of::<T>() > 0
    }

    //  Returns a slice over the elements.
    pub fn as_slice(&self) -> &[T] {
        //  Safety:
        //  -   All `length` elements were initialized at allocation.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.length) }
    }

    //  Returns a mutable slice over the elements.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        //  Safety:
        //  -   All `length` elements were initialized at allocation.
        //  -   Exclusive access, per &mut self.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.length) }
    }

    //  Deallocates the array, leaving it empty.
    //
    //  #   Safety
    //
    //  -   Assumes that `allocator` is the allocator the array was allocated with.
    pub unsafe fn deallocate<A>(&mut self, allocator: &A)
    where
        A: Allocator + ?Sized,
    {
        if self.is_allocated() {
            let layout = match array_layout::<T>(self.length) {
                Ok(layout) => layout,
                Err(_) => {
                    //  Cannot error, it succeeded during the allocation.
                    debug_assert!(false, "{} elements succeeded in allocation!", self.length);
                    return;
                },
            };

            //  Safety:
            //  -   The pointer matches the pointer of the allocation.
            //  -   The layout matches the layout of the allocation.
            allocator.deallocate(self.ptr.as_ptr() as *mut u8, layout);
        }

        *self = Self::empty();
    }
}

impl<T> Default for RawArray<T> {
    fn default() -> Self { Self::empty() }
}

//  Safety:
//  -   The array uniquely owns its elements, as a `Vec` does.
unsafe impl<T: Send> Send for RawArray<T> {}

//  Safety:
//  -   Shared access only ever hands out `&T`.
unsafe impl<T: Sync> Sync for RawArray<T> {}

#[cfg(test)]
mod tests {

use super::*;

use crate::utils::tester::TestAllocator;

#[test]
fn allocate_fill() {
    let allocator = TestAllocator::unlimited();

    let mut array = RawArray::allocate(5, &allocator, |i| i as i32 * 2).unwrap();

    assert_eq!(&[0, 2, 4, 6, 8], array.as_slice());
    assert_eq!(vec![20], allocator.allocation_sizes());

    array.as_mut_slice()[1] = -1;
    assert_eq!(&[0, -1, 4, 6, 8], array.as_slice());

    unsafe { array.deallocate(&allocator) };

    assert_eq!(0, array.len());
    assert!(allocator.allocations().is_empty());
}

#[test]
fn allocate_empty() {
    let allocator = TestAllocator::default();

    let array: RawArray<i32> = RawArray::allocate(0, &allocator, |_| 0).unwrap();

    assert!(!array.is_allocated());
    assert!(array.as_slice().is_empty());
}

#[test]
fn allocate_failure() {
    let allocator = TestAllocator::default();

    let array = RawArray::allocate(3, &allocator, |_| 0i32);

    assert_eq!(Some(Failure::OutOfMemory), array.err());
}

}
