//! Read-only views over the keys, or values, of a HashMap.
//!
//! Views do not copy anything: they merely borrow the `HashMap`, and are
//! therefore read-only by construction.

use super::root::{fmt, iter};

use super::failure::Result;
use super::hashcore::HashHooks;
use super::iterator::{Keys, Values};
use super::HashMap;

/// A read-only view of the keys of a `HashMap`.
pub struct KeysView<'a, K, V, H: HashHooks<K>> {
    map: &'a HashMap<K, V, H>,
}

impl<'a, K, V, H: HashHooks<K>> KeysView<'a, K, V, H> {
    pub(crate) fn new(map: &'a HashMap<K, V, H>) -> Self { Self { map } }

    /// Returns the number of keys.
    pub fn len(&self) -> usize { self.map.len() }

    /// Returns whether there is any key, or not.
    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    /// Returns whether `key` is present, per the hooks of the `HashMap`.
    pub fn contains(&self, key: &K) -> Result<bool> { self.map.contains(key) }

    /// Copies the keys into `destination`, starting at `offset`.
    ///
    /// #   Errors
    ///
    /// Returns `InvalidArgument` if `destination` cannot accommodate all the
    /// keys past `offset`.
    pub fn copy_to(&self, destination: &mut [K], offset: usize) -> Result<()>
    where
        K: Clone,
    {
        self.map.copy_keys_to(destination, offset)
    }

    /// Returns an iterator over the keys.
    pub fn iter(&self) -> Keys<'a, K, V> { Keys::new(self.map.iter()) }
}

impl<'a, K, V, H: HashHooks<K>> Clone for KeysView<'a, K, V, H> {
    fn clone(&self) -> Self { *self }
}

impl<'a, K, V, H: HashHooks<K>> Copy for KeysView<'a, K, V, H> {}

impl<'a, K: fmt::Debug, V, H: HashHooks<K>> fmt::Debug for KeysView<'a, K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K, V, H: HashHooks<K>> iter::IntoIterator for KeysView<'a, K, V, H> {
    type Item = &'a K;
    type IntoIter = Keys<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

/// A read-only view of the values of a `HashMap`.
pub struct ValuesView<'a, K, V, H: HashHooks<K>> {
    map: &'a HashMap<K, V, H>,
}

impl<'a, K, V, H: HashHooks<K>> ValuesView<'a, K, V, H> {
    pub(crate) fn new(map: &'a HashMap<K, V, H>) -> Self { Self { map } }

    /// Returns the number of values.
    pub fn len(&self) -> usize { self.map.len() }

    /// Returns whether there is any value, or not.
    pub fn is_empty(&self) -> bool { self.map.is_empty() }

    /// Returns whether `value` is present.
    ///
    /// Values are not indexed, hence this is a linear search.
    pub fn contains(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.iter().any(|v| v == value)
    }

    /// Copies the values into `destination`, starting at `offset`.
    ///
    /// #   Errors
    ///
    /// Returns `InvalidArgument` if `destination` cannot accommodate all the
    /// values past `offset`.
    pub fn copy_to(&self, destination: &mut [V], offset: usize) -> Result<()>
    where
        V: Clone,
    {
        self.map.copy_values_to(destination, offset)
    }

    /// Returns an iterator over the values.
    pub fn iter(&self) -> Values<'a, K, V> { Values::new(self.map.iter()) }
}

impl<'a, K, V, H: HashHooks<K>> Clone for ValuesView<'a, K, V, H> {
    fn clone(&self) -> Self { *self }
}

impl<'a, K, V, H: HashHooks<K>> Copy for ValuesView<'a, K, V, H> {}

impl<'a, K, V: fmt::Debug, H: HashHooks<K>> fmt::Debug for ValuesView<'a, K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a, K, V, H: HashHooks<K>> iter::IntoIterator for ValuesView<'a, K, V, H> {
    type Item = &'a V;
    type IntoIter = Values<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

#[cfg(test)]
mod tests {

use super::*;

use crate::failure::Failure;
use crate::utils::tester::TestHooks;

#[test]
fn views_empty() {
    let map: HashMap<i32, i32, TestHooks> = HashMap::default();

    assert!(map.keys().is_empty());
    assert!(map.values().is_empty());

    assert_eq!(Ok(()), map.keys().copy_to(&mut [], 0));
    assert_eq!(Err(Failure::InvalidArgument), map.values().copy_to(&mut [], 1));
}

#[test]
fn views_debug() {
    let mut map: HashMap<i32, &str, TestHooks> = HashMap::default();
    map.insert(1, "one");

    assert_eq!("[1]", format!("{:?}", map.keys()));
    assert_eq!("[\"one\"]", format!("{:?}", map.values()));
}

}
