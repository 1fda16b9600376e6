//! Various iterators over the HashMap.
//!
//! All iterators walk the slots in order, skipping the free ones. Borrowing
//! iterators hold a borrow of the `HashMap`, and thus statically prevent any
//! modification for as long as they live.

use super::root::{iter, slice};

use super::hashcore::HashHooks;
use super::hashcore::entry::Entry;
use super::hashcore::slot::Slot;
use super::hashcore::table::Table;

/// An iterator over the key-value pairs of a `HashMap`.
pub struct Iter<'a, K, V> {
    slots: slice::Iter<'a, Slot<Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(slots: &'a [Slot<Entry<K, V>>], len: usize) -> Self {
        Self { slots: slots.iter(), remaining: len }
    }
}

impl<'a, K, V> Clone for Iter<'a, K, V> {
    fn clone(&self) -> Self { Self { slots: self.slots.clone(), remaining: self.remaining } }
}

impl<'a, K, V> iter::Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = self.slots.next()?;

            if let Some(entry) = slot.get() {
                self.remaining -= 1;
                return Some((&entry.key, &entry.value));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<'a, K, V> iter::ExactSizeIterator for Iter<'a, K, V> {}

impl<'a, K, V> iter::FusedIterator for Iter<'a, K, V> {}

/// An iterator over the key-value pairs of a `HashMap`, with mutable values.
pub struct IterMut<'a, K, V> {
    slots: slice::IterMut<'a, Slot<Entry<K, V>>>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(slots: &'a mut [Slot<Entry<K, V>>], len: usize) -> Self {
        Self { slots: slots.iter_mut(), remaining: len }
    }
}

impl<'a, K, V> iter::Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = self.slots.next()?;

            if let Some(entry) = slot.get_mut() {
                self.remaining -= 1;
                return Some((&entry.key, &mut entry.value));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<'a, K, V> iter::ExactSizeIterator for IterMut<'a, K, V> {}

impl<'a, K, V> iter::FusedIterator for IterMut<'a, K, V> {}

/// An iterator over the keys of a `HashMap`.
pub struct Keys<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(iterator: Iter<'a, K, V>) -> Self { Self(iterator) }
}

impl<'a, K, V> Clone for Keys<'a, K, V> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<'a, K, V> iter::Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> { self.0.next().map(|(k, _)| k) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> iter::ExactSizeIterator for Keys<'a, K, V> {}

/// An iterator over the values of a `HashMap`.
pub struct Values<'a, K, V>(Iter<'a, K, V>);

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(iterator: Iter<'a, K, V>) -> Self { Self(iterator) }
}

impl<'a, K, V> Clone for Values<'a, K, V> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<'a, K, V> iter::Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> { self.0.next().map(|(_, v)| v) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> iter::ExactSizeIterator for Values<'a, K, V> {}

/// An iterator over the mutable values of a `HashMap`.
pub struct ValuesMut<'a, K, V>(IterMut<'a, K, V>);

impl<'a, K, V> ValuesMut<'a, K, V> {
    pub(crate) fn new(iterator: IterMut<'a, K, V>) -> Self { Self(iterator) }
}

impl<'a, K, V> iter::Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> { self.0.next().map(|(_, v)| v) }

    fn size_hint(&self) -> (usize, Option<usize>) { self.0.size_hint() }
}

impl<'a, K, V> iter::ExactSizeIterator for ValuesMut<'a, K, V> {}

/// An owning iterator over the key-value pairs of a `HashMap`.
///
/// The pairs not yielded are dropped alongside the iterator.
pub struct IntoIter<K, V, H: HashHooks<K>> {
    table: Table<K, V, H>,
    index: usize,
    remaining: usize,
}

impl<K, V, H: HashHooks<K>> IntoIter<K, V, H> {
    pub(crate) fn new(table: Table<K, V, H>) -> Self {
        let remaining = table.len();

        Self { table, index: 0, remaining }
    }
}

impl<K, V, H: HashHooks<K>> iter::Iterator for IntoIter<K, V, H> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        while self.index < self.table.touched() {
            let index = self.index;
            self.index += 1;

            if let Some(entry) = self.table.take(index) {
                self.remaining -= 1;
                return Some(entry.into_pair());
            }
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<K, V, H: HashHooks<K>> iter::ExactSizeIterator for IntoIter<K, V, H> {}

impl<K, V, H: HashHooks<K>> iter::FusedIterator for IntoIter<K, V, H> {}
