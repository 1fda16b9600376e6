//! Internal testing utilities

use std::cell::{Cell, RefCell};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::allocator::{Allocator, DefaultAllocator, Layout};
use crate::hashcore::HashHooks;

//  Allocation
//
//  Description of an allocation.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct Allocation {
    //  The size of the allocation, in bytes.
    pub size: usize,
    //  The alignment of the allocation, in bytes.
    pub alignment: usize,
    //  The pointer allocated.
    pub pointer: *mut u8,
}

impl Allocation {
    pub fn new(pointer: *mut u8, layout: Layout) -> Self {
        Allocation {
            size: layout.size(),
            alignment: layout.align(),
            pointer,
        }
    }

    pub fn layout(&self) -> Layout {
        Layout::from_size_align(self.size, self.alignment).unwrap()
    }
}

//  Test Allocator
//
//  An allocator specifically for testing:
//  -   Allows injecting allocation failures, by count or by size.
//  -   Checks that allocations and deallocations match.
//  -   Counts the allocations performed over its lifetime.
#[derive(Default)]
pub struct TestAllocator {
    //  The actual allocator.
    pub allocator: DefaultAllocator,
    //  The number of allocations allowed.
    pub allowed: Cell<usize>,
    //  The largest allocation allowed, in bytes, if any.
    pub max_size: Cell<Option<usize>>,
    //  The number of allocations performed.
    pub performed: Cell<usize>,
    //  The allocations performed; to check deallocation requests.
    pub allocations: RefCell<Vec<Allocation>>,
}

impl TestAllocator {
    pub fn unlimited() -> Self {
        Self::allowing(usize::MAX)
    }

    pub fn allowing(allowed: usize) -> Self {
        let result = Self::default();
        result.allowed.set(allowed);
        result
    }

    pub fn allocations(&self) -> Vec<Allocation> {
        self.allocations.borrow().clone()
    }

    pub fn allocation_sizes(&self) -> Vec<usize> {
        self.allocations.borrow().iter()
            .map(|&a| a.size)
            .collect()
    }

    pub fn clear(&self) {
        for a in self.allocations.borrow_mut().drain(..) {
            //  Safety:
            //  -   Were allocated, and not deallocated.
            unsafe { self.allocator.deallocate(a.pointer, a.layout()) };
        }
    }

    fn locate(&self, allocation: Allocation) -> Option<usize> {
        self.allocations.borrow().iter().position(|a| *a == allocation)
    }
}

impl Allocator for TestAllocator {
    unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
        if self.allowed.get() == 0 {
            return ptr::null_mut();
        }

        if self.max_size.get().map_or(false, |max| layout.size() > max) {
            return ptr::null_mut();
        }

        self.allowed.set(self.allowed.get() - 1);
        self.performed.set(self.performed.get() + 1);

        let result = self.allocator.allocate(layout);
        assert_ne!(ptr::null_mut(), result);

        let allocation = Allocation::new(result, layout);
        self.allocations.borrow_mut().push(allocation);

        result
    }

    unsafe fn deallocate(&self, ptr: *mut u8, layout: Layout) {
        let allocation = Allocation::new(ptr, layout);

        if let Some(index) = self.locate(allocation) {
            self.allocations.borrow_mut().remove(index);
        } else {
            panic!("Could not find {:?} in {:?}",
                allocation, &*self.allocations.borrow());
        }

        self.allocator.deallocate(ptr, layout);
    }
}

impl Drop for TestAllocator {
    fn drop(&mut self) { self.clear() }
}

//  Test Hooks
//
//  Hooks specifically for testing:
//  -   Deterministic hashing, optionally degenerate so that all keys collide.
//  -   Counting of the calls to `hash` and `equals`, to check how many times
//      the chains are traversed.
//  -   Allocation through a `TestAllocator`.
pub struct TestHooks {
    pub allocator: TestAllocator,
    pub hashes: Cell<usize>,
    pub comparisons: Cell<usize>,
    pub colliding: bool,
}

impl TestHooks {
    //  Creates hooks with unlimited allocations.
    pub fn new() -> Self { Self::allowing(usize::MAX) }

    //  Creates hooks with a limited number of allocations.
    pub fn allowing(allowed: usize) -> Self {
        TestHooks {
            allocator: TestAllocator::allowing(allowed),
            hashes: Cell::new(0),
            comparisons: Cell::new(0),
            colliding: false,
        }
    }

    //  Creates hooks hashing every key to the same value.
    pub fn colliding() -> Self {
        TestHooks { colliding: true, ..Self::new() }
    }

    pub fn hashes(&self) -> usize { self.hashes.get() }

    pub fn comparisons(&self) -> usize { self.comparisons.get() }

    pub fn reset_counts(&self) {
        self.hashes.set(0);
        self.comparisons.set(0);
    }
}

impl Default for TestHooks {
    fn default() -> Self { Self::new() }
}

impl Allocator for TestHooks {
    unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
        self.allocator.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: *mut u8, layout: Layout) {
        self.allocator.deallocate(ptr, layout)
    }
}

impl<K: Hash + Eq> HashHooks<K> for TestHooks {
    fn hash(&self, key: &K) -> i32 {
        self.hashes.set(self.hashes.get() + 1);

        if self.colliding {
            return 42;
        }

        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish() as i32
    }

    fn equals(&self, left: &K, right: &K) -> bool {
        self.comparisons.set(self.comparisons.get() + 1);
        left == right
    }
}

//  SpyCount
//
//  A counter of the number of instances of elements.
pub struct SpyCount(AtomicUsize);

impl SpyCount {
    pub fn zero() -> Self { SpyCount(AtomicUsize::new(0)) }

    pub fn get(&self) -> usize { self.0.load(Ordering::Relaxed) }

    fn decrement(&self) { self.0.fetch_sub(1, Ordering::Relaxed); }

    fn increment(&self) { self.0.fetch_add(1, Ordering::Relaxed); }
}

//  Spy Element
//
//  An element tracking the number of instances, helpful to ensure proper drop.
pub struct SpyElement<'a> {
    count: &'a SpyCount,
}

impl<'a> SpyElement<'a> {
    pub fn new(count: &'a SpyCount) -> Self {
        count.increment();
        SpyElement { count }
    }
}

impl<'a> Drop for SpyElement<'a> {
    fn drop(&mut self) {
        self.count.decrement();
    }
}

//  A value which may panic on drop.
#[derive(Debug, Eq, Hash, PartialEq)]
pub struct PanickyDrop<T>(pub T, bool);

impl<T> PanickyDrop<T> {
    //  Creates a normal instance.
    pub fn new(value: T) -> Self { Self(value, false) }

    //  Creates a panicky instance.
    pub fn panicky(value: T) -> Self { Self(value, true) }
}

impl<T> Drop for PanickyDrop<T> {
    fn drop(&mut self) { if self.1 { panic!("Oh No!") } }
}
