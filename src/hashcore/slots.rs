//! The slot store underlying the HashMap.
//!
//! Two parallel arrays, both sized after an entry of the growth table:
//!
//! -   The buckets, each holding the index of the first slot of its chain.
//! -   The slots, of which the first `touched` have ever been used: each is
//!     either live, and linked in the chain of its bucket, or free, and linked
//!     in the free list.
//!
//! All links are `i32` indexes, with `NIL` terminating chains and free list.

use super::root::mem;

use super::allocator::Allocator;
use super::array::RawArray;
use super::capacity::{next_size_index, Limit, SizeIndex};
use super::failure::{Failure, Result};
use super::slot::{Hash, Slot, NIL};

//  The storage.
pub struct SlotArray<T> {
    buckets: RawArray<i32>,
    slots: RawArray<Slot<T>>,
    //  The number of live slots.
    active: usize,
    //  The number of slots ever used, live or free.
    touched: usize,
    //  The head of the free list.
    first_free: i32,
    //  The entry of the growth table the arrays are sized after, if allocated.
    size_index: Option<SizeIndex>,
}

impl<T> SlotArray<T> {
    //  Creates an empty instance, without allocating.
    pub fn new() -> Self {
        Self {
            buckets: RawArray::empty(),
            slots: RawArray::empty(),
            active: 0,
            touched: 0,
            first_free: NIL,
            size_index: None,
        }
    }

    //  Returns the number of live slots.
    pub fn len(&self) -> usize { self.active }

    //  Returns the number of slots ever used, live or free.
    pub fn touched(&self) -> usize { self.touched }

    //  Returns the number of slots.
    pub fn capacity(&self) -> usize { self.slots.len() }

    //  Returns the number of buckets.
    pub fn bucket_count(&self) -> usize { self.buckets.len() }

    //  Returns the entry of the growth table, if allocated.
    pub fn size_index(&self) -> Option<SizeIndex> { self.size_index }

    //  Returns the first slot of the chain of `hash`, or NIL.
    pub fn head(&self, hash: Hash) -> i32 {
        let buckets = self.buckets.as_slice();

        if buckets.is_empty() {
            NIL
        } else {
            buckets[hash.bucket(buckets.len())]
        }
    }

    //  Returns the touched slots.
    pub fn touched_slots(&self) -> &[Slot<T>] {
        &self.slots.as_slice()[..self.touched]
    }

    //  Returns the touched slots.
    pub fn touched_slots_mut(&mut self) -> &mut [Slot<T>] {
        &mut self.slots.as_mut_slice()[..self.touched]
    }

    //  Returns the slot at `index`.
    //
    //  #   Panics
    //
    //  If `index` is not less than `touched`.
    pub fn slot(&self, index: usize) -> &Slot<T> { &self.touched_slots()[index] }

    //  Returns the slot at `index`.
    //
    //  #   Panics
    //
    //  If `index` is not less than `touched`.
    pub fn slot_mut(&mut self, index: usize) -> &mut Slot<T> {
        &mut self.touched_slots_mut()[index]
    }

    //  Inserts the element at the head of the chain of `hash`, allocating a
    //  slot for it.
    //
    //  `element` is only invoked once the slot is secured.
    //
    //  Returns the index of the slot.
    //
    //  #   Errors
    //
    //  -   `CapacityExceeded` if `limit` is reached.
    //  -   `BytesOverflow` or `OutOfMemory` if growing fails.
    //
    //  In case of error, the instance is left unmodified.
    //
    //  #   Safety
    //
    //  -   Assumes that `allocator` is the allocator of the instance.
    pub unsafe fn insert<A, F>(
        &mut self,
        hash: Hash,
        element: F,
        limit: Limit,
        allocator: &A,
    )
        -> Result<usize>
    where
        A: Allocator + ?Sized,
        F: FnOnce() -> T,
    {
        self.ensure_slot(limit, allocator)?;

        //  Should `element` panic, the instance is still consistent.
        let element = element();

        //  No more failure possible beyond this point.
        let index = self.alloc_slot();

        let bucket = hash.bucket(self.buckets.len());
        let buckets = self.buckets.as_mut_slice();

        let head = buckets[bucket];
        buckets[bucket] = index as i32;

        self.slots.as_mut_slice()[index].fill(hash, head, element);

        Ok(index)
    }

    //  Removes the element in slot `index`, whose predecessor in the chain of
    //  `hash` is `previous`, or NIL if first.
    //
    //  Returns the element, or None if the slot is not live.
    pub fn remove(&mut self, hash: Hash, index: usize, previous: i32) -> Option<T> {
        let next = {
            let slot = self.slot(index);

            if !slot.is_live() {
                return None;
            }

            slot.next()
        };

        if previous == NIL {
            let bucket = hash.bucket(self.buckets.len());
            self.buckets.as_mut_slice()[bucket] = next;
        } else {
            self.slot_mut(previous as usize).set_next(next);
        }

        self.free_slot(index)
    }

    //  Moves the element out of slot `index`, without unlinking it.
    //
    //  The chains and free list are left dangling: only `clear` or `release`
    //  may follow.
    pub fn take(&mut self, index: usize) -> Option<T> {
        self.slot_mut(index).vacate(NIL)
    }

    //  Compacts the live slots at the front of the array, if there are free
    //  slots and either `force` is set or less than 90% of the touched slots are
    //  live.
    //
    //  Returns whether compaction occurred.
    pub fn defragment(&mut self, force: bool) -> bool {
        if self.first_free == NIL {
            return false;
        }

        if !force && self.active * 10 >= self.touched * 9 {
            return false;
        }

        let slots = self.touched_slots_mut();

        //  [0, low) is live, [high, touched) is free.
        let (mut low, mut high) = (0, slots.len());

        loop {
            while low < high && slots[low].is_live() {
                low += 1;
            }

            while low < high && !slots[high - 1].is_live() {
                high -= 1;
            }

            if low >= high {
                break;
            }

            slots.swap(low, high - 1);

            low += 1;
            high -= 1;
        }

        debug_assert_eq!(self.active, low);

        tracing::debug!(
            touched = self.touched,
            active = self.active,
            force,
            "defragmented slots"
        );

        self.touched = self.active;
        self.first_free = NIL;
        self.rebuild_chains();

        true
    }

    //  Reserves enough slots for `extra` more elements.
    //
    //  #   Errors
    //
    //  -   `CapacityExceeded` if `limit` cannot accommodate the elements.
    //  -   `BytesOverflow` or `OutOfMemory` if growing fails.
    //
    //  In case of error, the instance is left unmodified.
    //
    //  #   Safety
    //
    //  -   Assumes that `allocator` is the allocator of the instance.
    pub unsafe fn reserve<A>(&mut self, extra: usize, limit: Limit, allocator: &A) -> Result<()>
    where
        A: Allocator + ?Sized,
    {
        let total = self.active.checked_add(extra).ok_or(Failure::CapacityExceeded)?;

        //  Both free and untouched slots are available.
        if total <= self.capacity() {
            return Ok(());
        }

        let target = limit.fit(total).ok_or(Failure::CapacityExceeded)?;

        self.resize(target, allocator)
    }

    //  Shrinks to the smallest entry of the growth table accommodating the live
    //  slots, releasing all storage if there are none.
    //
    //  Returns whether the storage was reallocated.
    //
    //  #   Errors
    //
    //  -   `BytesOverflow` or `OutOfMemory` if allocating the smaller arrays
    //      fails.
    //
    //  In case of error, the instance is left unmodified.
    //
    //  #   Safety
    //
    //  -   Assumes that `allocator` is the allocator of the instance.
    pub unsafe fn trim<A>(&mut self, allocator: &A) -> Result<bool>
    where
        A: Allocator + ?Sized,
    {
        let current = match self.size_index {
            Some(current) => current,
            None => return Ok(false),
        };

        if self.active == 0 {
            self.release(allocator);
            return Ok(true);
        }

        match next_size_index(self.active) {
            Some(target) if target < current => {
                self.resize(target, allocator)?;
                Ok(true)
            },
            _ => Ok(false),
        }
    }

    //  Drops all elements, retaining the storage.
    pub fn clear(&mut self) {
        let touched = self.touched;

        //  Pre-pooping our pants in case a Drop panics.
        self.active = 0;
        self.touched = 0;
        self.first_free = NIL;

        for head in self.buckets.as_mut_slice() {
            *head = NIL;
        }

        for slot in &mut self.slots.as_mut_slice()[..touched] {
            slot.clear();
        }
    }

    //  Drops all elements, and releases the storage.
    //
    //  #   Safety
    //
    //  -   Assumes that `allocator` is the allocator of the instance.
    pub unsafe fn release<A>(&mut self, allocator: &A)
    where
        A: Allocator + ?Sized,
    {
        self.clear();

        //  Safety:
        //  -   Both arrays were allocated by `allocator`.
        self.buckets.deallocate(allocator);
        self.slots.deallocate(allocator);

        self.size_index = None;
    }

    //  Ensures that a slot is available, growing the storage if necessary.
    //
    //  #   Safety
    //
    //  -   Assumes that `allocator` is the allocator of the instance.
    unsafe fn ensure_slot<A>(&mut self, limit: Limit, allocator: &A) -> Result<()>
    where
        A: Allocator + ?Sized,
    {
        if self.first_free == NIL && self.touched == self.capacity() {
            self.grow(limit, allocator)?;
        }

        Ok(())
    }

    //  Allocates a slot, from the free list first, and the untouched slots second.
    //
    //  The slot is counted as active, and must be filled immediately.
    //
    //  #   Panics
    //
    //  If no slot is available, see `ensure_slot`.
    fn alloc_slot(&mut self) -> usize {
        if self.first_free != NIL {
            let index = self.first_free as usize;

            self.first_free = self.slot(index).next();
            self.active += 1;

            return index;
        }

        assert!(self.touched < self.capacity());

        let index = self.touched;

        self.touched += 1;
        self.active += 1;

        index
    }

    //  Grows to the next entry of the growth table, trying the preferred entry
    //  first and the smallest sufficient one second.
    //
    //  #   Safety
    //
    //  -   Assumes that `allocator` is the allocator of the instance.
    unsafe fn grow<A>(&mut self, limit: Limit, allocator: &A) -> Result<()>
    where
        A: Allocator + ?Sized,
    {
        let (preferred, fallback) =
            limit.growth(self.size_index).ok_or(Failure::CapacityExceeded)?;

        match self.resize(preferred, allocator) {
            Err(failure) if fallback < preferred => {
                tracing::warn!(
                    ?failure,
                    preferred = preferred.slot_capacity(),
                    fallback = fallback.slot_capacity(),
                    "growth failed, retrying with smaller capacity"
                );

                self.resize(fallback, allocator)
            },
            result => result,
        }
    }

    //  Moves the live slots to freshly allocated arrays sized after `target`.
    //
    //  Free slots are discarded, so that the live slots end up compacted.
    //
    //  #   Safety
    //
    //  -   Assumes that `allocator` is the allocator of the instance.
    unsafe fn resize<A>(&mut self, target: SizeIndex, allocator: &A) -> Result<()>
    where
        A: Allocator + ?Sized,
    {
        debug_assert!(self.active <= target.slot_capacity());

        let mut buckets = RawArray::allocate(target.bucket_count(), allocator, |_| NIL)?;

        let slots = RawArray::allocate(target.slot_capacity(), allocator, |_| Slot::vacant());

        let mut slots = match slots {
            Ok(slots) => slots,
            Err(failure) => {
                //  Safety:
                //  -   Allocated by `allocator`, just above.
                buckets.deallocate(allocator);
                return Err(failure);
            },
        };

        //  No more failure possible beyond this point.
        {
            let live = self.touched_slots_mut().iter_mut().filter(|s| s.is_live());

            for (destination, source) in slots.as_mut_slice().iter_mut().zip(live) {
                mem::swap(destination, source);
            }
        }

        let previous = self.size_index.map(|p| p.slot_capacity());

        //  Safety:
        //  -   Both arrays were allocated by `allocator`.
        //  -   All live slots were moved out, only free slots remain.
        self.buckets.deallocate(allocator);
        self.slots.deallocate(allocator);

        self.buckets = buckets;
        self.slots = slots;
        self.touched = self.active;
        self.first_free = NIL;
        self.size_index = Some(target);

        self.rebuild_chains();

        tracing::debug!(
            ?previous,
            capacity = target.slot_capacity(),
            buckets = target.bucket_count(),
            active = self.active,
            "resized slots"
        );

        Ok(())
    }

    //  Links all live slots of [0, touched) into their chains, from scratch.
    fn rebuild_chains(&mut self) {
        let buckets = self.buckets.as_mut_slice();

        for head in buckets.iter_mut() {
            *head = NIL;
        }

        let bucket_count = buckets.len();
        let slots = &mut self.slots.as_mut_slice()[..self.touched];

        for (index, slot) in slots.iter_mut().enumerate() {
            if !slot.is_live() {
                continue;
            }

            let bucket = Hash::new(slot.hash()).bucket(bucket_count);

            slot.set_next(buckets[bucket]);
            buckets[bucket] = index as i32;
        }
    }

    //  Frees the slot at `index`, pushing it on the free list.
    fn free_slot(&mut self, index: usize) -> Option<T> {
        let first_free = self.first_free;
        let element = self.slot_mut(index).vacate(first_free)?;

        self.first_free = index as i32;
        self.active -= 1;

        Some(element)
    }
}

impl<T> Default for SlotArray<T> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
impl<T> SlotArray<T> {
    //  Checks all invariants, by walking the full arrays.
    pub fn verify(&self) {
        assert!(self.active <= self.touched);
        assert!(self.touched <= self.capacity());
        assert_eq!(self.size_index.map_or(0, |s| s.slot_capacity()), self.capacity());
        assert_eq!(self.size_index.map_or(0, |s| s.bucket_count()), self.bucket_count());

        let slots = self.touched_slots();
        let mut seen = vec![false; slots.len()];

        //  Free list.
        let mut free = 0;
        let mut current = self.first_free;

        while current != NIL {
            let index = current as usize;

            assert!(index < slots.len(), "{} out of {}", index, slots.len());
            assert!(!seen[index], "{} linked twice", index);
            assert!(!slots[index].is_live(), "{} live in free list", index);

            seen[index] = true;
            free += 1;
            current = slots[index].next();
        }

        //  Chains.
        let mut live = 0;
        let bucket_count = self.bucket_count();

        for (bucket, &head) in self.buckets.as_slice().iter().enumerate() {
            let mut current = head;

            while current != NIL {
                let index = current as usize;

                assert!(index < slots.len(), "{} out of {}", index, slots.len());
                assert!(!seen[index], "{} linked twice", index);
                assert!(slots[index].is_live(), "{} free in chain", index);
                assert_eq!(bucket, Hash::new(slots[index].hash()).bucket(bucket_count));

                seen[index] = true;
                live += 1;
                current = slots[index].next();
            }
        }

        assert_eq!(self.active, live);
        assert_eq!(self.touched, live + free);
    }
}

#[cfg(test)]
mod tests {

use super::*;

use crate::utils::tester::{SpyCount, SpyElement, TestAllocator};

fn insert(slots: &mut SlotArray<u32>, allocator: &TestAllocator, value: u32) -> Result<usize> {
    let hash = Hash::new(value as i32);
    //  Safety:
    //  -   Single allocator throughout each test.
    unsafe { slots.insert(hash, || value, Limit::unbounded(), allocator) }
}

fn remove(slots: &mut SlotArray<u32>, value: u32) -> Option<u32> {
    let hash = Hash::new(value as i32);
    let mut previous = NIL;
    let mut current = slots.head(hash);

    while current != NIL {
        let slot = slots.slot(current as usize);

        if slot.get() == Some(&value) {
            return slots.remove(hash, current as usize, previous);
        }

        previous = current;
        current = slot.next();
    }

    None
}

fn live(slots: &SlotArray<u32>) -> Vec<u32> {
    let mut result: Vec<_> =
        slots.touched_slots().iter().filter_map(|s| s.get().copied()).collect();
    result.sort();
    result
}

#[test]
fn new_does_not_allocate() {
    let slots: SlotArray<u32> = SlotArray::new();

    assert_eq!(0, slots.len());
    assert_eq!(0, slots.capacity());
    assert_eq!(None, slots.size_index());
    assert_eq!(NIL, slots.head(Hash::new(3)));

    slots.verify();
}

#[test]
fn insert_lazily_allocates() {
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    assert_eq!(Ok(0), insert(&mut slots, &allocator, 3));

    assert_eq!(Some(SizeIndex(0)), slots.size_index());
    assert_eq!(5, slots.capacity());
    assert_eq!(7, slots.bucket_count());
    assert_eq!(2, allocator.allocations().len());

    slots.verify();

    unsafe { slots.release(&allocator) };
    assert!(allocator.allocations().is_empty());
}

#[test]
fn insert_grows() {
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    for i in 0..6 {
        insert(&mut slots, &allocator, i).unwrap();
        slots.verify();
    }

    //  5 slots, doubled to at least 10.
    assert_eq!(Some(SizeIndex(2)), slots.size_index());
    assert_eq!(12, slots.capacity());
    assert_eq!((0..6).collect::<Vec<_>>(), live(&slots));

    unsafe { slots.release(&allocator) };
}

#[test]
fn insert_grows_fallback() {
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    for i in 0..5 {
        insert(&mut slots, &allocator, i).unwrap();
    }

    //  Slots are 12 bytes: 12 slots (144 bytes) and 17 buckets (68 bytes) are
    //  preferred, 8 slots (96 bytes) and 11 buckets (44 bytes) are sufficient.
    allocator.max_size.set(Some(40));

    assert_eq!(Err(Failure::OutOfMemory), insert(&mut slots, &allocator, 5));
    assert_eq!(Some(SizeIndex(0)), slots.size_index());
    assert_eq!((0..5).collect::<Vec<_>>(), live(&slots));
    assert_eq!(2, allocator.allocations().len());
    slots.verify();

    allocator.max_size.set(Some(100));

    assert_eq!(Ok(5), insert(&mut slots, &allocator, 5));
    assert_eq!(Some(SizeIndex(1)), slots.size_index());
    assert_eq!(8, slots.capacity());
    assert_eq!((0..6).collect::<Vec<_>>(), live(&slots));
    slots.verify();

    unsafe { slots.release(&allocator) };
}

#[test]
fn insert_capacity_exceeded() {
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();
    let limit = Limit::new(8);

    for i in 0..8 {
        unsafe { slots.insert(Hash::new(i), || i as u32, limit, &allocator) }.unwrap();
    }

    let result = unsafe { slots.insert(Hash::new(8), || 8, limit, &allocator) };

    assert_eq!(Err(Failure::CapacityExceeded), result);
    assert_eq!(8, slots.len());
    slots.verify();

    unsafe { slots.release(&allocator) };
}

#[test]
fn insert_element_panics() {
    use std::panic::{AssertUnwindSafe, catch_unwind};

    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    insert(&mut slots, &allocator, 1).unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| {
        let element = || -> u32 { panic!("Oh No!") };
        unsafe { slots.insert(Hash::new(2), element, Limit::unbounded(), &allocator) }
    }));

    assert!(result.is_err());
    assert_eq!(1, slots.len());
    assert_eq!(vec![1], live(&slots));
    slots.verify();

    unsafe { slots.release(&allocator) };
}

#[test]
fn remove_recycles() {
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    for i in 0..4 {
        insert(&mut slots, &allocator, i).unwrap();
    }

    assert_eq!(Some(1), remove(&mut slots, 1));
    assert_eq!(Some(2), remove(&mut slots, 2));
    assert_eq!(None, remove(&mut slots, 2));
    slots.verify();

    assert_eq!(2, slots.len());
    assert_eq!(4, slots.touched());

    //  Last freed, first reused.
    assert_eq!(Ok(2), insert(&mut slots, &allocator, 7));
    assert_eq!(Ok(1), insert(&mut slots, &allocator, 8));
    assert_eq!(Ok(4), insert(&mut slots, &allocator, 9));
    slots.verify();

    assert_eq!(vec![0, 3, 7, 8, 9], live(&slots));

    unsafe { slots.release(&allocator) };
}

#[test]
fn remove_colliding_chain() {
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    //  7 buckets: 0, 7, 14 share the same chain.
    for i in [0, 7, 14] {
        insert(&mut slots, &allocator, i).unwrap();
    }

    //  Middle, then head, then tail.
    assert_eq!(Some(7), remove(&mut slots, 7));
    slots.verify();
    assert_eq!(Some(14), remove(&mut slots, 14));
    slots.verify();
    assert_eq!(Some(0), remove(&mut slots, 0));
    slots.verify();

    assert_eq!(0, slots.len());

    unsafe { slots.release(&allocator) };
}

#[test]
fn defragment_threshold() {
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    for i in 0..12 {
        insert(&mut slots, &allocator, i).unwrap();
    }

    //  Nothing to compact.
    assert!(!slots.defragment(true));

    //  11 / 12 live: above 90%.
    remove(&mut slots, 4);
    assert!(!slots.defragment(false));

    //  10 / 12 live: below 90%.
    remove(&mut slots, 9);
    assert!(slots.defragment(false));

    assert_eq!(10, slots.touched());
    assert!(slots.touched_slots().iter().all(|s| s.is_live()));
    assert_eq!(vec![0, 1, 2, 3, 5, 6, 7, 8, 10, 11], live(&slots));
    slots.verify();

    unsafe { slots.release(&allocator) };
}

#[test]
fn defragment_preserves_prefix() {
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    for i in 0..8 {
        insert(&mut slots, &allocator, i).unwrap();
    }

    remove(&mut slots, 2);
    remove(&mut slots, 5);

    assert!(slots.defragment(true));
    assert!(!slots.defragment(true));

    let order: Vec<_> = slots.touched_slots().iter().filter_map(|s| s.get().copied()).collect();
    assert_eq!(vec![0, 1, 7, 3, 4, 6], order);
    slots.verify();

    unsafe { slots.release(&allocator) };
}

#[test]
fn reserve_and_trim() {
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    unsafe { slots.reserve(100, Limit::unbounded(), &allocator) }.unwrap();
    assert_eq!(Some(SizeIndex(8)), slots.size_index());

    for i in 0..10 {
        insert(&mut slots, &allocator, i).unwrap();
    }

    assert_eq!(Ok(true), unsafe { slots.trim(&allocator) });
    assert_eq!(Some(SizeIndex(2)), slots.size_index());
    assert_eq!((0..10).collect::<Vec<_>>(), live(&slots));
    slots.verify();

    assert_eq!(Ok(false), unsafe { slots.trim(&allocator) });

    for i in 0..10 {
        remove(&mut slots, i);
    }

    assert_eq!(Ok(true), unsafe { slots.trim(&allocator) });
    assert_eq!(None, slots.size_index());
    assert!(allocator.allocations().is_empty());
    slots.verify();

    assert_eq!(Ok(false), unsafe { slots.trim(&allocator) });
}

#[test]
fn reserve_beyond_limit() {
    let allocator = TestAllocator::unlimited();
    let mut slots: SlotArray<u32> = SlotArray::new();

    let result = unsafe { slots.reserve(13, Limit::new(12), &allocator) };

    assert_eq!(Err(Failure::CapacityExceeded), result);
    assert_eq!(None, slots.size_index());
}

#[test]
fn clear_retains_storage() {
    let count = SpyCount::zero();
    let allocator = TestAllocator::unlimited();
    let mut slots = SlotArray::new();

    for i in 0..4 {
        let hash = Hash::new(i);
        unsafe { slots.insert(hash, || SpyElement::new(&count), Limit::unbounded(), &allocator) }
            .unwrap();
    }

    assert_eq!(4, count.get());

    slots.clear();

    assert_eq!(0, count.get());
    assert_eq!(0, slots.len());
    assert_eq!(5, slots.capacity());
    slots.verify();

    unsafe { slots.release(&allocator) };
}

}
