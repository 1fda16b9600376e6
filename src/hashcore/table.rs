//! The engine of the HashMap.
//!
//! The `Table` ties together the storage, the hooks, the per-instance limit,
//! and the versions:
//!
//! -   Every lookup hashes the key once, then walks a single chain.
//! -   Every call into the hooks is bracketed by a reentrancy check.
//! -   Every structural modification bumps the versions, invalidating cursors.

use super::capacity::{Limit, SizeIndex};
use super::entry::Entry;
use super::failure::Result;
use super::hooks::HashHooks;
use super::slot::{Hash, Slot, NIL};
use super::slots::SlotArray;
use super::version::{Version, Versions};

//  The location of a key in its chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Found {
    //  The index of the slot holding the key.
    pub index: usize,
    //  The index of the preceding slot of the chain, or NIL.
    pub previous: i32,
}

//  The outcome of a lookup.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Probe {
    //  The masked hash of the key.
    pub hash: Hash,
    //  The location of the key, if present.
    pub found: Option<Found>,
}

//  The engine.
pub struct Table<K, V, H: HashHooks<K>> {
    hooks: H,
    limit: Limit,
    versions: Versions,
    slots: SlotArray<Entry<K, V>>,
}

impl<K, V, H: HashHooks<K>> Table<K, V, H> {
    //  Creates an empty instance, without allocating.
    pub fn new(hooks: H, limit: Limit) -> Self {
        Self { hooks, limit, versions: Versions::default(), slots: SlotArray::new() }
    }

    //  Returns the hooks.
    pub fn hooks(&self) -> &H { &self.hooks }

    //  Returns the limit.
    pub fn limit(&self) -> Limit { self.limit }

    //  Returns the number of entries.
    pub fn len(&self) -> usize { self.slots.len() }

    //  Returns the number of slots ever used since the last compaction.
    pub fn touched(&self) -> usize { self.slots.touched() }

    //  Returns the number of slots.
    pub fn capacity(&self) -> usize { self.slots.capacity() }

    //  Returns the number of buckets.
    pub fn bucket_count(&self) -> usize { self.slots.bucket_count() }

    //  Returns the entry of the growth table, if allocated.
    pub fn size_index(&self) -> Option<SizeIndex> { self.slots.size_index() }

    //  Returns the current structure version.
    pub fn version(&self) -> Version { self.versions.structure() }

    //  Checks that no structural modification occurred since `version`.
    #[cfg_attr(feature = "lenient-cursors", allow(dead_code))]
    pub fn validate(&self, version: Version) -> Result<()> {
        self.versions.validate(version)
    }

    //  Returns the touched slots, live or free.
    pub fn touched_slots(&self) -> &[Slot<Entry<K, V>>] { self.slots.touched_slots() }

    //  Returns the touched slots, live or free.
    //
    //  Only the values may be modified through the slots.
    pub fn touched_slots_mut(&mut self) -> &mut [Slot<Entry<K, V>>] {
        self.slots.touched_slots_mut()
    }

    //  Locates `key`, hashing it once and walking its chain once.
    //
    //  #   Errors
    //
    //  -   `ConcurrentModification` if the table was modified from within the
    //      hooks.
    pub fn locate(&self, key: &K) -> Result<Probe> {
        let stamp = self.versions.stamp();

        let hash = Hash::new(self.hooks.hash(key));
        self.versions.check(stamp)?;

        let mut previous = NIL;
        let mut current = self.slots.head(hash);

        while current != NIL {
            let index = current as usize;
            let slot = self.slots.slot(index);

            if let Some(entry) = slot.get().filter(|_| slot.hash() == hash.get()) {
                let equal = self.hooks.equals(&entry.key, key);
                self.versions.check(stamp)?;

                if equal {
                    return Ok(Probe { hash, found: Some(Found { index, previous }) });
                }
            }

            previous = current;
            current = slot.next();
        }

        Ok(Probe { hash, found: None })
    }

    //  Returns the entry at `index`, if live.
    pub fn entry(&self, index: usize) -> Option<&Entry<K, V>> {
        self.touched_slots().get(index).and_then(|slot| slot.get())
    }

    //  Returns the entry at `index`, if live.
    pub fn entry_mut(&mut self, index: usize) -> Option<&mut Entry<K, V>> {
        self.touched_slots_mut().get_mut(index).and_then(|slot| slot.get_mut())
    }

    //  Returns the entry of `key`, if any.
    pub fn get(&self, key: &K) -> Result<Option<&Entry<K, V>>> {
        let found = self.locate(key)?.found;

        Ok(found.and_then(|found| self.entry(found.index)))
    }

    //  Returns the entry of `key`, if any.
    pub fn get_mut(&mut self, key: &K) -> Result<Option<&mut Entry<K, V>>> {
        match self.locate(key)?.found {
            Some(found) => Ok(self.entry_mut(found.index)),
            None => Ok(None),
        }
    }

    //  Inserts `key`, absent from the table, in the chain of `hash`.
    //
    //  `value` is only invoked once the slot is secured, hence it is not
    //  invoked at all in case of error.
    //
    //  Returns the index of the slot.
    //
    //  #   Errors
    //
    //  -   `CapacityExceeded` if the limit is reached.
    //  -   `BytesOverflow` or `OutOfMemory` if growing fails.
    //
    //  In case of error, the table is left unmodified.
    pub fn insert_with<F>(&mut self, hash: Hash, key: K, value: F) -> Result<usize>
    where
        F: FnOnce() -> V,
    {
        let element = move || Entry::new(key, value());

        //  Safety:
        //  -   The hooks are the allocator of the slots.
        let index = unsafe { self.slots.insert(hash, element, self.limit, &self.hooks)? };

        self.versions.bump();

        Ok(index)
    }

    //  Removes the entry located at `found`, in the chain of `hash`.
    pub fn remove_found(&mut self, hash: Hash, found: Found) -> Option<Entry<K, V>> {
        let entry = self.slots.remove(hash, found.index, found.previous)?;

        self.versions.bump();

        Some(entry)
    }

    //  Removes the entry of `key`, if any.
    pub fn remove(&mut self, key: &K) -> Result<Option<Entry<K, V>>> {
        let probe = self.locate(key)?;

        Ok(probe.found.and_then(|found| self.remove_found(probe.hash, found)))
    }

    //  Moves the entry at `index` out, without unlinking its slot.
    //
    //  Only `clear`, or dropping the table, may follow.
    pub fn take(&mut self, index: usize) -> Option<Entry<K, V>> {
        self.slots.take(index)
    }

    //  Reserves enough slots for `extra` more entries.
    //
    //  #   Errors
    //
    //  -   `CapacityExceeded` if the limit cannot accommodate them.
    //  -   `BytesOverflow` or `OutOfMemory` if growing fails.
    pub fn reserve(&mut self, extra: usize) -> Result<()> {
        let before = self.size_index();

        //  Safety:
        //  -   The hooks are the allocator of the slots.
        unsafe { self.slots.reserve(extra, self.limit, &self.hooks)? };

        if before != self.size_index() {
            self.versions.bump();
        }

        Ok(())
    }

    //  Compacts the live slots, if fragmented enough or if forced.
    //
    //  Returns whether compaction occurred.
    pub fn defragment(&mut self, force: bool) -> bool {
        let compacted = self.slots.defragment(force);

        if compacted {
            self.versions.bump();
        }

        compacted
    }

    //  Shrinks the storage to the smallest sufficient entry of the growth table.
    //
    //  Returns whether the storage was reallocated.
    //
    //  #   Errors
    //
    //  -   `BytesOverflow` or `OutOfMemory` if allocating the smaller storage
    //      fails.
    pub fn trim(&mut self) -> Result<bool> {
        let before = self.capacity();

        //  Safety:
        //  -   The hooks are the allocator of the slots.
        let trimmed = unsafe { self.slots.trim(&self.hooks)? };

        if trimmed {
            self.versions.bump();

            tracing::debug!(from = before, to = self.capacity(), active = self.len(), "trimmed");
        }

        Ok(trimmed)
    }

    //  Drops all entries, retaining the storage.
    pub fn clear(&mut self) {
        let active = self.len();

        self.versions.bump();
        self.slots.clear();

        tracing::debug!(active, capacity = self.capacity(), "cleared");
    }

    #[cfg(test)]
    pub fn verify(&self) { self.slots.verify() }
}

impl<K, V, H: HashHooks<K>> Drop for Table<K, V, H> {
    fn drop(&mut self) {
        //  Safety:
        //  -   The hooks are the allocator of the slots.
        unsafe { self.slots.release(&self.hooks) };
    }
}

#[cfg(test)]
mod tests {

use super::*;

use crate::failure::Failure;
use crate::utils::tester::{SpyCount, SpyElement, TestHooks};

fn table() -> Table<i32, i32, TestHooks> { Table::new(TestHooks::new(), Limit::unbounded()) }

fn insert<V>(table: &mut Table<i32, V, TestHooks>, key: i32, value: V) -> Result<usize> {
    let probe = table.locate(&key)?;
    assert_eq!(None, probe.found);

    table.insert_with(probe.hash, key, move || value)
}

#[test]
fn locate_empty() {
    let table = table();

    let probe = table.locate(&3).unwrap();

    assert_eq!(None, probe.found);
    assert_eq!(1, table.hooks().hashes());
    assert_eq!(0, table.hooks().comparisons());
    assert_eq!(None, table.size_index());
}

#[test]
fn locate_single_traversal() {
    let mut table = table();

    for i in 0..20 {
        insert(&mut table, i, i * 10).unwrap();
    }

    table.hooks().reset_counts();

    let probe = table.locate(&7).unwrap();

    assert!(probe.found.is_some());
    assert_eq!(1, table.hooks().hashes());
    assert_eq!(Some(70), probe.found.and_then(|f| table.entry(f.index)).map(|e| e.value));

    table.verify();
}

#[test]
fn locate_colliding() {
    let mut table: Table<i32, i32, _> = Table::new(TestHooks::colliding(), Limit::unbounded());

    for i in 0..4 {
        insert(&mut table, i, i).unwrap();
    }

    table.hooks().reset_counts();

    //  Inserted at the head, hence 0 is last in the chain.
    let probe = table.locate(&0).unwrap();

    assert_eq!(Some(0), probe.found.map(|f| f.index));
    assert_eq!(Some(1), probe.found.map(|f| f.previous));
    assert_eq!(4, table.hooks().comparisons());

    assert_eq!(None, table.locate(&9).unwrap().found);
    assert_eq!(8, table.hooks().comparisons());
}

#[test]
fn insert_bumps_version() {
    let mut table = table();
    let version = table.version();

    insert(&mut table, 1, 1).unwrap();

    assert_eq!(Err(Failure::ConcurrentModification), table.validate(version));
    assert_eq!(Ok(()), table.validate(table.version()));
}

#[test]
fn read_keeps_version() {
    let mut table = table();
    insert(&mut table, 1, 1).unwrap();

    let version = table.version();

    assert_eq!(Some(1), table.get(&1).unwrap().map(|e| e.value));
    assert_eq!(None, table.get(&2).unwrap().map(|e| e.value));

    if let Some(entry) = table.get_mut(&1).unwrap() {
        entry.value = 11;
    }

    assert_eq!(Ok(()), table.validate(version));
    assert_eq!(Some(11), table.get(&1).unwrap().map(|e| e.value));
}

#[test]
fn insert_failure_unmodified() {
    let mut table: Table<i32, i32, _> = Table::new(TestHooks::allowing(0), Limit::unbounded());
    let version = table.version();

    let probe = table.locate(&1).unwrap();
    let mut invoked = false;

    let result = table.insert_with(probe.hash, 1, || { invoked = true; 1 });

    assert_eq!(Err(Failure::OutOfMemory), result);
    assert!(!invoked);
    assert_eq!(0, table.len());
    assert_eq!(Ok(()), table.validate(version));
}

#[test]
fn remove_bumps_version() {
    let mut table = table();
    insert(&mut table, 1, 1).unwrap();
    insert(&mut table, 2, 2).unwrap();

    let version = table.version();

    assert_eq!(Some((2, 2)), table.remove(&2).unwrap().map(Entry::into_pair));
    assert_eq!(Err(Failure::ConcurrentModification), table.validate(version));

    let version = table.version();

    assert!(table.remove(&2).unwrap().is_none());
    assert_eq!(Ok(()), table.validate(version));

    assert_eq!(1, table.len());
    table.verify();
}

#[test]
fn reserve_bumps_version_on_growth() {
    let mut table = table();
    let version = table.version();

    table.reserve(3).unwrap();
    assert_eq!(Err(Failure::ConcurrentModification), table.validate(version));

    let version = table.version();

    table.reserve(5).unwrap();
    assert_eq!(Ok(()), table.validate(version));
}

#[test]
fn defragment_bumps_version() {
    let mut table = table();

    for i in 0..4 {
        insert(&mut table, i, i).unwrap();
    }

    let version = table.version();

    assert!(!table.defragment(true));
    assert_eq!(Ok(()), table.validate(version));

    table.remove(&1).unwrap();

    let version = table.version();

    assert!(table.defragment(true));
    assert_eq!(Err(Failure::ConcurrentModification), table.validate(version));
    table.verify();
}

#[test]
fn trim_bumps_version() {
    let mut table = table();

    table.reserve(100).unwrap();
    insert(&mut table, 1, 1).unwrap();

    let version = table.version();

    assert_eq!(Ok(true), table.trim());
    assert_eq!(Err(Failure::ConcurrentModification), table.validate(version));

    let version = table.version();

    assert_eq!(Ok(false), table.trim());
    assert_eq!(Ok(()), table.validate(version));
}

#[test]
fn reserve_within_limit() {
    let mut table: Table<i32, i32, _> = Table::new(TestHooks::new(), Limit::new(10));

    assert_eq!(Ok(()), table.reserve(12));
    assert_eq!(Err(Failure::CapacityExceeded), table.reserve(13));
    assert_eq!(12, table.capacity());
}

#[test]
fn trim_releases() {
    let mut table = table();

    table.reserve(100).unwrap();
    insert(&mut table, 1, 1).unwrap();

    assert_eq!(Ok(true), table.trim());
    assert_eq!(5, table.capacity());

    table.remove(&1).unwrap();

    assert_eq!(Ok(true), table.trim());
    assert_eq!(0, table.capacity());
    assert!(table.hooks().allocator.allocations().is_empty());

    assert_eq!(Ok(false), table.trim());
}

#[test]
fn clear_drops() {
    let count = SpyCount::zero();
    let mut table: Table<i32, SpyElement, _> = Table::new(TestHooks::new(), Limit::unbounded());

    for i in 0..3 {
        insert(&mut table, i, SpyElement::new(&count)).unwrap();
    }

    assert_eq!(3, count.get());

    let version = table.version();
    table.clear();

    assert_eq!(0, count.get());
    assert_eq!(0, table.len());
    assert_eq!(5, table.capacity());
    assert_eq!(Err(Failure::ConcurrentModification), table.validate(version));
}

#[test]
fn drop_releases() {
    let count = SpyCount::zero();
    let hooks = TestHooks::new();

    {
        let mut table: Table<i32, SpyElement, _> = Table::new(&hooks, Limit::unbounded());

        for i in 0..7 {
            let probe = table.locate(&i).unwrap();
            table.insert_with(probe.hash, i, || SpyElement::new(&count)).unwrap();
        }

        assert_eq!(7, count.get());

        //  Partially moved out.
        assert!(table.take(3).is_some());
        assert_eq!(6, count.get());
    }

    assert_eq!(0, count.get());
    assert!(hooks.allocator.allocations().is_empty());
}

}
