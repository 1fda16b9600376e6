//! Internal slot of the HashMap.
//!
//! A slot is either live, and then holds an element and links to the next slot
//! of its bucket chain, or free, and then links to the next free slot.
//!
//! The hash doubles as the tag: hashes are masked to 31 bits, so any negative
//! value denotes a free slot.

use super::raw::Raw;

//  The end of a chain, or of the free list.
pub const NIL: i32 = -1;

//  The hash of a free slot.
pub const FREE: i32 = -1;

//  The masked hash of a key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Hash(i32);

impl Hash {
    //  Creates an instance, masking the raw hash to be non-negative.
    pub fn new(raw: i32) -> Self { Hash(raw & i32::MAX) }

    //  Returns the masked value.
    pub fn get(self) -> i32 { self.0 }

    //  Returns the bucket of this hash, among `bucket_count`.
    pub fn bucket(self, bucket_count: usize) -> usize {
        debug_assert!(bucket_count > 0);

        self.0 as usize % bucket_count
    }
}

//  The slot stored internally.
pub struct Slot<T> {
    next: i32,
    hash: i32,
    raw: Raw<T>,
}

impl<T> Slot<T> {
    //  Creates a new instance, marked as free.
    pub fn vacant() -> Self {
        Slot { next: NIL, hash: FREE, raw: Raw::new() }
    }

    //  Checks whether the slot holds an element, or not.
    pub fn is_live(&self) -> bool { self.hash >= 0 }

    //  Returns the raw hash; negative if free.
    pub fn hash(&self) -> i32 { self.hash }

    //  Returns the next slot of the chain, or of the free list.
    pub fn next(&self) -> i32 { self.next }

    //  Sets the next slot of the chain, or of the free list.
    pub fn set_next(&mut self, next: i32) { self.next = next; }

    //  Gets the element, if live.
    pub fn get(&self) -> Option<&T> {
        if self.is_live() {
            //  Safety:
            //  -   A live slot holds an initialized element.
            Some(unsafe { self.raw.get() })
        } else {
            None
        }
    }

    //  Gets the element, if live.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        if self.is_live() {
            //  Safety:
            //  -   A live slot holds an initialized element.
            Some(unsafe { self.raw.get_mut() })
        } else {
            None
        }
    }

    //  Stores the element, with its hash, linking to `next`.
    //
    //  Any former element is leaked, not dropped.
    pub fn fill(&mut self, hash: Hash, next: i32, element: T) {
        self.raw.write(element);
        self.hash = hash.get();
        self.next = next;
    }

    //  Moves the element out, if live, linking the now free slot to `next_free`.
    pub fn vacate(&mut self, next_free: i32) -> Option<T> {
        if !self.is_live() {
            return None;
        }

        //  Marked free first, so the slot is consistent even if the caller
        //  panics while handling the element.
        self.hash = FREE;
        self.next = next_free;

        //  Safety:
        //  -   The slot was live, hence the element is initialized.
        //  -   The slot is now free, hence the element will not be read again.
        Some(unsafe { self.raw.take() })
    }

    //  Drops the element, if any.
    pub fn clear(&mut self) {
        if self.is_live() {
            self.hash = FREE;
            self.next = NIL;

            //  Safety:
            //  -   The slot was live, hence the element is initialized.
            //  -   The slot is now free, hence the element will not be read again.
            unsafe { self.raw.drop() };
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self { Self::vacant() }
}
