//! The HashMap

use super::root::{fmt, iter, mem, ops};

use super::cursor::Cursor;
use super::failure::{panic_from_failure, Failure, Result};
use super::hashcore::HashHooks;
use super::hashcore::capacity::Limit;
use super::hashcore::entry::Entry;
use super::hashcore::slot::Hash;
use super::hashcore::table::Table;
use super::iterator::{IntoIter, Iter, IterMut, ValuesMut};
use super::views::{KeysView, ValuesView};

#[cfg(feature = "with-std")]
use super::hashcore::DefaultHashHooks;

//
//  Public Interface
//

/// `HashMap`
///
/// A chained hash map, whose hashing, equality, and memory are all customized
/// through a single `HashHooks` instance.
#[cfg(not(feature = "with-std"))]
pub struct HashMap<K, V, H: HashHooks<K>> {
    table: Table<K, V, H>,
}

/// `HashMap`
///
/// A chained hash map, whose hashing, equality, and memory are all customized
/// through a single `HashHooks` instance.
///
/// #   Example of Send.
///
/// A `HashMap<K, V>` can be `Send` across threads whenever its keys, values,
/// and hooks can.
///
/// ```
/// # use chained::hashmap::HashMap;
/// fn ensure_send<T: Send>(_: T) {}
///
/// let mut map: HashMap<_, _> = HashMap::new();
/// map.insert("Hello", "World");
///
/// ensure_send(map);
/// ```
///
/// #   Example of Key not being Send.
///
/// A non-Send Key prevents the HashMap from being Send.
///
/// ```compile_fail
/// # use std::rc::Rc;
/// # use chained::hashmap::HashMap;
/// fn ensure_send<T: Send>(_: T) {}
///
/// let mut map: HashMap<_, _> = HashMap::new();
/// map.insert(Rc::new(3), "World");
///
/// ensure_send(map);
/// ```
///
/// #   Example of Sync.
///
/// A `HashMap<K, V>` can be shared across threads whenever its keys, values,
/// and hooks can: reads never modify it.
///
/// ```
/// # use chained::hashmap::HashMap;
/// fn ensure_sync<T: Sync>(_: &T) {}
///
/// let mut map: HashMap<_, _> = HashMap::new();
/// map.insert(1, 2);
///
/// ensure_sync(&map);
/// ```
///
/// #   Example of Value not being Sync.
///
/// ```compile_fail
/// # use std::cell::Cell;
/// # use chained::hashmap::HashMap;
/// fn ensure_sync<T: Sync>(_: &T) {}
///
/// let mut map: HashMap<_, _> = HashMap::new();
/// map.insert(1, Cell::new(2));
///
/// ensure_sync(&map);
/// ```
#[cfg(feature = "with-std")]
pub struct HashMap<K, V, H: HashHooks<K> = DefaultHashHooks> {
    table: Table<K, V, H>,
}

impl<K, V, H: HashHooks<K> + Default> HashMap<K, V, H> {
    /// Creates a new instance of the `HashMap`, bounded only by the growth
    /// table.
    ///
    /// No memory is allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let map: HashMap<i32, i32> = HashMap::new();
    ///
    /// assert_eq!(0, map.len());
    /// assert_eq!(0, map.capacity());
    /// assert_eq!(991_855_682, map.max_capacity());
    /// ```
    pub fn new() -> Self { Self::with_hooks(H::default()) }

    /// Creates a new instance of the `HashMap`, with a maximum capacity of at
    /// least `max_capacity`.
    ///
    /// The maximum capacity is rounded up to the closest entry of the growth
    /// table, and clamped to its last entry.
    ///
    /// No memory is allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let map: HashMap<i32, i32> = HashMap::with_max_capacity(10);
    ///
    /// assert_eq!(0, map.capacity());
    /// assert_eq!(12, map.max_capacity());
    /// ```
    pub fn with_max_capacity(max_capacity: usize) -> Self {
        Self::with_max_capacity_and_hooks(max_capacity, H::default())
    }
}

impl<K, V, H: HashHooks<K>> HashMap<K, V, H> {
    /// Creates a new instance of the `HashMap`, with the specified hooks.
    ///
    /// No memory is allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::{HashMap, DefaultHashHooks};
    /// let map: HashMap<i32, i32> = HashMap::with_hooks(DefaultHashHooks::default());
    ///
    /// assert_eq!(0, map.capacity());
    /// assert_eq!(991_855_682, map.max_capacity());
    /// ```
    pub fn with_hooks(hooks: H) -> Self {
        Self { table: Table::new(hooks, Limit::unbounded()) }
    }

    /// Creates a new instance of the `HashMap`, with the specified hooks and
    /// a maximum capacity of at least `max_capacity`.
    ///
    /// No memory is allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::{HashMap, DefaultHashHooks};
    /// let hooks = DefaultHashHooks::default();
    /// let map: HashMap<i32, i32> = HashMap::with_max_capacity_and_hooks(100, hooks);
    ///
    /// assert_eq!(0, map.capacity());
    /// assert_eq!(134, map.max_capacity());
    /// ```
    pub fn with_max_capacity_and_hooks(max_capacity: usize, hooks: H) -> Self {
        Self { table: Table::new(hooks, Limit::new(max_capacity)) }
    }

    /// Returns the hooks.
    pub fn hooks(&self) -> &H { self.table.hooks() }

    /// Returns whether the instance contains any element, or not.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// assert!(map.is_empty());
    ///
    /// map.insert(1, 1);
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns the number of elements contained in the instance.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// assert_eq!(0, map.len());
    ///
    /// map.insert(1, 2);
    /// assert_eq!(1, map.len());
    /// ```
    pub fn len(&self) -> usize { self.table.len() }

    /// Returns the current capacity of the instance.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// assert_eq!(0, map.capacity());
    ///
    /// map.extend([(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)].iter().copied());
    /// assert_eq!(5, map.capacity());
    ///
    /// map.insert(6, 6);
    /// assert_eq!(12, map.capacity());
    /// ```
    pub fn capacity(&self) -> usize { self.table.capacity() }

    /// Returns the maximum capacity achievable by the instance.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let map: HashMap<i32, i32> = HashMap::with_max_capacity(1000);
    /// assert_eq!(1025, map.max_capacity());
    /// ```
    pub fn max_capacity(&self) -> usize { self.table.limit().max_capacity() }

    /// Returns the number of buckets currently allocated.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// assert_eq!(0, map.bucket_count());
    ///
    /// map.insert(1, 1);
    /// assert_eq!(7, map.bucket_count());
    /// ```
    pub fn bucket_count(&self) -> usize { self.table.bucket_count() }

    /// Returns the index, in the growth table, of the current storage, if any.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// assert_eq!(None, map.size_index());
    ///
    /// map.extend((0..6).map(|i| (i, i)));
    /// assert_eq!(Some(2), map.size_index());
    /// ```
    pub fn size_index(&self) -> Option<usize> { self.table.size_index().map(|s| s.0) }

    /// Returns whether the map contains `key`.
    ///
    /// #   Errors
    ///
    /// Returns `ConcurrentModification` if the map is modified from within the
    /// hooks.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, false);
    ///
    /// assert_eq!(Ok(true), map.contains(&1));
    /// assert_eq!(Ok(false), map.contains(&0));
    /// ```
    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.table.locate(key)?.found.is_some())
    }

    /// Returns whether the map contains `key`.
    ///
    /// Calling this method is equivalent to calling `contains` and panicking
    /// on error.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, false);
    ///
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&0));
    /// ```
    pub fn contains_key(&self, key: &K) -> bool {
        self.contains(key).unwrap_or_else(|failure| panic_from_failure(failure))
    }

    /// Copies the value of `key` into `value`, if present.
    ///
    /// Returns whether `key` is present; `value` is untouched otherwise.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 10);
    ///
    /// let mut value = 0;
    /// assert_eq!(Ok(true), map.try_get(&1, &mut value));
    /// assert_eq!(10, value);
    ///
    /// let mut value = 0;
    /// assert_eq!(Ok(false), map.try_get(&2, &mut value));
    /// assert_eq!(0, value);
    /// ```
    pub fn try_get(&self, key: &K, value: &mut V) -> Result<bool>
    where
        V: Clone,
    {
        match self.table.get(key)? {
            Some(entry) => {
                value.clone_from(&entry.value);
                Ok(true)
            },
            None => Ok(false),
        }
    }

    /// Copies the value of `key` into `value`, if present, or writes the
    /// default value otherwise.
    ///
    /// Returns whether `key` is present.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 10);
    ///
    /// let mut value = 5;
    /// assert_eq!(Ok(false), map.get_or_default(&2, &mut value));
    /// assert_eq!(0, value);
    /// ```
    pub fn get_or_default(&self, key: &K, value: &mut V) -> Result<bool>
    where
        V: Clone + Default,
    {
        let present = self.try_get(key, value)?;

        if !present {
            *value = V::default();
        }

        Ok(present)
    }

    /// Exchanges the value of `key` with `value`, in place, if present.
    ///
    /// Returns whether `key` is present; `value` is untouched otherwise.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, String::from("one"));
    ///
    /// let mut value = String::from("uno");
    /// assert_eq!(Ok(true), map.try_swap(&1, &mut value));
    ///
    /// assert_eq!("one", value);
    /// assert_eq!("uno", map[&1]);
    /// ```
    pub fn try_swap(&mut self, key: &K, value: &mut V) -> Result<bool> {
        match self.table.get_mut(key)? {
            Some(entry) => {
                mem::swap(&mut entry.value, value);
                Ok(true)
            },
            None => Ok(false),
        }
    }

    /// Removes `key`, dropping it and its value, if present.
    ///
    /// Returns whether `key` was present.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 10);
    ///
    /// assert_eq!(Ok(true), map.remove(&1));
    /// assert_eq!(Ok(false), map.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &K) -> Result<bool> {
        Ok(self.table.remove(key)?.is_some())
    }

    /// Removes `key`, returning it alongside its value, if present.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 10);
    ///
    /// assert_eq!(Ok(Some((1, 10))), map.remove_entry(&1));
    /// assert_eq!(Ok(None), map.remove_entry(&1));
    /// ```
    pub fn remove_entry(&mut self, key: &K) -> Result<Option<(K, V)>> {
        Ok(self.table.remove(key)?.map(Entry::into_pair))
    }

    /// Removes `key`, moving its value into `value`, if present.
    ///
    /// Returns whether `key` was present; `value` is untouched otherwise.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 10);
    ///
    /// let mut value = 0;
    /// assert_eq!(Ok(true), map.try_get_and_remove(&1, &mut value));
    /// assert_eq!(10, value);
    /// assert!(map.is_empty());
    /// ```
    pub fn try_get_and_remove(&mut self, key: &K, value: &mut V) -> Result<bool> {
        match self.table.remove(key)? {
            Some(entry) => {
                *value = entry.value;
                Ok(true)
            },
            None => Ok(false),
        }
    }

    /// Removes `key`, moving its value into `value`, if present, or writes the
    /// default value otherwise.
    ///
    /// Returns whether `key` was present.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<i32, i32> = HashMap::new();
    ///
    /// let mut value = 7;
    /// assert_eq!(Ok(false), map.get_and_remove_or_default(&1, &mut value));
    /// assert_eq!(0, value);
    /// ```
    pub fn get_and_remove_or_default(&mut self, key: &K, value: &mut V) -> Result<bool>
    where
        V: Default,
    {
        let present = self.try_get_and_remove(key, value)?;

        if !present {
            *value = V::default();
        }

        Ok(present)
    }

    /// Inserts `key` and `value`, if `key` is absent.
    ///
    /// Returns whether the pair was inserted; it is dropped otherwise.
    ///
    /// #   Errors
    ///
    /// -   `CapacityExceeded` if the maximum capacity is reached.
    /// -   `BytesOverflow` or `OutOfMemory` if growing fails.
    ///
    /// In case of error, the map is left unmodified.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    ///
    /// assert_eq!(Ok(true), map.try_add_new(1, 10));
    /// assert_eq!(Ok(false), map.try_add_new(1, 11));
    /// assert_eq!(10, map[&1]);
    /// ```
    pub fn try_add_new(&mut self, key: K, value: V) -> Result<bool> {
        match self.find_mut(&key)? {
            Lookup::Occupied(_) => Ok(false),
            Lookup::Vacant(hash) => {
                self.table.insert_with(hash, key, move || value)?;
                Ok(true)
            },
        }
    }

    /// Inserts `key` and `value`, or overwrites the value of `key` if present.
    ///
    /// Returns whether the pair was inserted.
    ///
    /// #   Errors
    ///
    /// -   `CapacityExceeded` if the maximum capacity is reached.
    /// -   `BytesOverflow` or `OutOfMemory` if growing fails.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    ///
    /// assert_eq!(Ok(true), map.add_or_replace(1, 10));
    /// assert_eq!(Ok(false), map.add_or_replace(1, 11));
    /// assert_eq!(11, map[&1]);
    /// ```
    pub fn add_or_replace(&mut self, key: K, value: V) -> Result<bool> {
        match self.find_mut(&key)? {
            Lookup::Occupied(entry) => {
                entry.value = value;
                Ok(false)
            },
            Lookup::Vacant(hash) => {
                self.table.insert_with(hash, key, move || value)?;
                Ok(true)
            },
        }
    }

    /// Copies the value of `key` into `value`, if present, or inserts `key`
    /// with a copy of `value` otherwise.
    ///
    /// Either way, `value` ends up holding the value of `key`.
    ///
    /// Returns whether the pair was inserted.
    ///
    /// #   Errors
    ///
    /// -   `CapacityExceeded` if the maximum capacity is reached.
    /// -   `BytesOverflow` or `OutOfMemory` if growing fails.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    ///
    /// let mut value = 10;
    /// assert_eq!(Ok(true), map.add_or_get(1, &mut value));
    /// assert_eq!(10, value);
    ///
    /// let mut value = 11;
    /// assert_eq!(Ok(false), map.add_or_get(1, &mut value));
    /// assert_eq!(10, value);
    /// ```
    pub fn add_or_get(&mut self, key: K, value: &mut V) -> Result<bool>
    where
        V: Clone,
    {
        match self.find_mut(&key)? {
            Lookup::Occupied(entry) => {
                value.clone_from(&entry.value);
                Ok(false)
            },
            Lookup::Vacant(hash) => {
                self.table.insert_with(hash, key, || value.clone())?;
                Ok(true)
            },
        }
    }

    /// Exchanges the value of `key` with `value`, in place, if present, or
    /// inserts `key` with `value` otherwise, leaving the default value behind.
    ///
    /// Returns whether the pair was inserted.
    ///
    /// #   Errors
    ///
    /// -   `CapacityExceeded` if the maximum capacity is reached.
    /// -   `BytesOverflow` or `OutOfMemory` if growing fails.
    ///
    /// In case of error, `value` is untouched.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    ///
    /// let mut value = String::from("one");
    /// assert_eq!(Ok(true), map.add_or_swap(1, &mut value));
    /// assert_eq!("", value);
    ///
    /// let mut value = String::from("uno");
    /// assert_eq!(Ok(false), map.add_or_swap(1, &mut value));
    /// assert_eq!("one", value);
    /// assert_eq!("uno", map[&1]);
    /// ```
    pub fn add_or_swap(&mut self, key: K, value: &mut V) -> Result<bool>
    where
        V: Default,
    {
        match self.find_mut(&key)? {
            Lookup::Occupied(entry) => {
                mem::swap(&mut entry.value, value);
                Ok(false)
            },
            Lookup::Vacant(hash) => {
                self.table.insert_with(hash, key, || mem::take(value))?;
                Ok(true)
            },
        }
    }

    /// Returns a reference to the value of `key`, if any.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, false);
    ///
    /// assert_eq!(Ok(Some(&false)), map.get(&1));
    /// assert_eq!(Ok(None), map.get(&0));
    /// ```
    pub fn get(&self, key: &K) -> Result<Option<&V>> {
        Ok(self.table.get(key)?.map(|e| &e.value))
    }

    /// Returns a mutable reference to the value of `key`, if any.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, false);
    ///
    /// if let Ok(Some(value)) = map.get_mut(&1) {
    ///     *value = true;
    /// }
    /// assert_eq!(Ok(Some(&true)), map.get(&1));
    /// ```
    pub fn get_mut(&mut self, key: &K) -> Result<Option<&mut V>> {
        Ok(self.table.get_mut(key)?.map(|e| &mut e.value))
    }

    /// Returns the key-value pair of `key`, if any.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, false);
    ///
    /// assert_eq!(Ok(Some((&1, &false))), map.get_key_value(&1));
    /// assert_eq!(Ok(None), map.get_key_value(&0));
    /// ```
    pub fn get_key_value(&self, key: &K) -> Result<Option<(&K, &V)>> {
        Ok(self.table.get(key)?.map(|e| (&e.key, &e.value)))
    }

    /// Returns a reference to the value of `key`.
    ///
    /// #   Errors
    ///
    /// Returns `KeyNotFound` if `key` is absent.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::failure::Failure;
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, false);
    ///
    /// assert_eq!(Ok(&false), map.lookup(&1));
    /// assert_eq!(Err(Failure::KeyNotFound), map.lookup(&0));
    /// ```
    pub fn lookup(&self, key: &K) -> Result<&V> {
        self.get(key)?.ok_or(Failure::KeyNotFound)
    }

    /// Inserts `key` and `value`, which must be absent.
    ///
    /// #   Errors
    ///
    /// -   `KeyExists` if `key` is already present.
    /// -   `CapacityExceeded` if the maximum capacity is reached.
    /// -   `BytesOverflow` or `OutOfMemory` if growing fails.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::failure::Failure;
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    ///
    /// assert_eq!(Ok(()), map.insert_new(1, 10));
    /// assert_eq!(Err(Failure::KeyExists), map.insert_new(1, 11));
    /// ```
    pub fn insert_new(&mut self, key: K, value: V) -> Result<()> {
        if self.try_add_new(key, value)? {
            Ok(())
        } else {
            Err(Failure::KeyExists)
        }
    }

    /// Inserts `key` and `value`, returning the former value of `key`, if any.
    ///
    /// #   Errors
    ///
    /// -   `CapacityExceeded` if the maximum capacity is reached.
    /// -   `BytesOverflow` or `OutOfMemory` if growing fails.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    ///
    /// assert_eq!(Ok(None), map.try_insert(3, false));
    /// assert_eq!(Ok(Some(false)), map.try_insert(3, true));
    ///
    /// assert_eq!(Ok(Some(&true)), map.get(&3));
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<Option<V>> {
        match self.find_mut(&key)? {
            Lookup::Occupied(entry) => Ok(Some(mem::replace(&mut entry.value, value))),
            Lookup::Vacant(hash) => {
                self.table.insert_with(hash, key, move || value)?;
                Ok(None)
            },
        }
    }

    /// Inserts `key` and `value`, returning the former value of `key`, if any.
    ///
    /// Calling this method is equivalent to calling `try_insert` and panicking
    /// on error.
    ///
    /// #   Panics
    ///
    /// Panics if the pair cannot be inserted.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    ///
    /// assert_eq!(None, map.insert(3, false));
    /// assert_eq!(Some(false), map.insert(3, true));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(result) => result,
            Err(failure) => panic_from_failure(failure),
        }
    }

    /// Inserts multiple key-value pairs in the map, overwriting the values of
    /// already present keys.
    ///
    /// #   Errors
    ///
    /// Returns the error of the first pair which cannot be inserted; the pairs
    /// preceding it remain inserted.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::failure::Failure;
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::with_max_capacity(5);
    ///
    /// assert_eq!(Err(Failure::CapacityExceeded), map.try_extend((0..6).map(|i| (i, i))));
    /// assert_eq!(5, map.len());
    /// ```
    pub fn try_extend<C>(&mut self, collection: C) -> Result<()>
    where
        C: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in collection {
            self.try_insert(key, value)?;
        }

        Ok(())
    }

    /// Reserves slots for `extra` more elements.
    ///
    /// More capacity than strictly necessary may be allocated.
    ///
    /// #   Errors
    ///
    /// -   `CapacityExceeded` if the maximum capacity cannot accommodate them.
    /// -   `BytesOverflow` or `OutOfMemory` if allocating fails.
    ///
    /// In case of error, the map is left unmodified.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::failure::Failure;
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<i32, i32> = HashMap::with_max_capacity(100);
    ///
    /// assert_eq!(Err(Failure::CapacityExceeded), map.try_reserve(135));
    /// assert_eq!(0, map.capacity());
    ///
    /// assert_eq!(Ok(()), map.try_reserve(6));
    /// assert_eq!(8, map.capacity());
    /// ```
    pub fn try_reserve(&mut self, extra: usize) -> Result<()> {
        self.table.reserve(extra)
    }

    /// Reserves slots for `extra` more elements.
    ///
    /// Calling this method is equivalent to calling `try_reserve` and panicking
    /// on error.
    ///
    /// #   Panics
    ///
    /// Panics if sufficient space cannot be reserved.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<i32, i32> = HashMap::new();
    /// map.reserve(13);
    /// assert_eq!(17, map.capacity());
    /// ```
    pub fn reserve(&mut self, extra: usize) {
        self.try_reserve(extra).unwrap_or_else(|failure| panic_from_failure(failure));
    }

    /// Compacts the elements at the front of the storage, so that enumeration
    /// skips no hole.
    ///
    /// Unless `force` is set, compaction only occurs if less than 90% of the
    /// slots used since the last compaction are live.
    ///
    /// Returns whether compaction occurred.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.extend((0..12).map(|i| (i, i)));
    ///
    /// map.remove(&3).unwrap();
    /// assert!(!map.defragment(false));
    /// assert!(map.defragment(true));
    /// assert!(!map.defragment(true));
    /// ```
    pub fn defragment(&mut self, force: bool) -> bool { self.table.defragment(force) }

    /// Shrinks the storage to the smallest entry of the growth table which
    /// accommodates the current elements, releasing it altogether if empty.
    ///
    /// Returns whether the storage was reallocated.
    ///
    /// #   Errors
    ///
    /// Returns `OutOfMemory` if allocating the smaller storage fails, in which
    /// case the map is left unmodified.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.reserve(100);
    /// map.insert(1, 1);
    ///
    /// assert_eq!(Ok(true), map.try_trim_excess());
    /// assert_eq!(5, map.capacity());
    /// ```
    pub fn try_trim_excess(&mut self) -> Result<bool> { self.table.trim() }

    /// Shrinks the storage to the smallest entry of the growth table which
    /// accommodates the current elements, releasing it altogether if empty.
    ///
    /// Calling this method is equivalent to calling `try_trim_excess` and
    /// panicking on error.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 1);
    /// map.clear();
    ///
    /// assert!(map.trim_excess());
    /// assert_eq!(0, map.capacity());
    /// ```
    pub fn trim_excess(&mut self) -> bool {
        self.try_trim_excess().unwrap_or_else(|failure| panic_from_failure(failure))
    }

    /// Clears the instance.
    ///
    /// The instance is then empty, although it retains previously allocated
    /// memory.
    ///
    /// Use `trim_excess` to release excess memory.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.extend([(1, false), (2, true), (3, false)].iter().copied());
    ///
    /// map.clear();
    /// assert_eq!(0, map.len());
    /// assert_eq!(5, map.capacity());
    /// ```
    pub fn clear(&mut self) { self.table.clear() }

    /// Creates a `Cursor` over the elements.
    ///
    /// The `Cursor` is detached from the map: it is advanced with a reference to
    /// the map, and fails if the map was structurally modified in between.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 2);
    ///
    /// let mut cursor = map.cursor();
    /// assert_eq!(Ok(Some((&1, &2))), cursor.advance(&map));
    /// assert_eq!(Ok(None), cursor.advance(&map));
    /// ```
    pub fn cursor(&self) -> Cursor { Cursor::new(self.table.version()) }

    /// Returns a read-only view of the keys.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 2);
    ///
    /// let keys = map.keys();
    /// assert_eq!(1, keys.len());
    /// assert_eq!(Ok(true), keys.contains(&1));
    /// assert_eq!(vec![&1], keys.iter().collect::<Vec<_>>());
    /// ```
    pub fn keys(&self) -> KeysView<'_, K, V, H> { KeysView::new(self) }

    /// Returns a read-only view of the values.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 2);
    ///
    /// let values = map.values();
    /// assert_eq!(1, values.len());
    /// assert!(values.contains(&2));
    /// assert_eq!(vec![&2], values.iter().collect::<Vec<_>>());
    /// ```
    pub fn values(&self) -> ValuesView<'_, K, V, H> { ValuesView::new(self) }

    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.table.touched_slots(), self.len())
    }

    /// Returns an iterator over the key-value pairs, with mutable values.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.extend([(1, 1), (2, 2)].iter().copied());
    ///
    /// for (_, value) in map.iter_mut() {
    ///     *value *= 10;
    /// }
    ///
    /// assert_eq!(20, map[&2]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let len = self.len();
        IterMut::new(self.table.touched_slots_mut(), len)
    }

    /// Returns an iterator over the mutable values.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> { ValuesMut::new(self.iter_mut()) }

    /// Copies the keys into `destination`, starting at `offset`.
    ///
    /// #   Errors
    ///
    /// Returns `InvalidArgument` if `destination` cannot accommodate all the
    /// keys past `offset`, in which case it is left untouched.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::failure::Failure;
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.extend([(1, 1), (2, 2)].iter().copied());
    ///
    /// let mut keys = [0; 3];
    /// assert_eq!(Err(Failure::InvalidArgument), map.copy_keys_to(&mut keys, 2));
    /// assert_eq!(Ok(()), map.copy_keys_to(&mut keys, 1));
    ///
    /// keys[1..].sort();
    /// assert_eq!([0, 1, 2], keys);
    /// ```
    pub fn copy_keys_to(&self, destination: &mut [K], offset: usize) -> Result<()>
    where
        K: Clone,
    {
        copy_into(self.iter().map(|(k, _)| k.clone()), self.len(), destination, offset)
    }

    /// Copies the values into `destination`, starting at `offset`.
    ///
    /// #   Errors
    ///
    /// Returns `InvalidArgument` if `destination` cannot accommodate all the
    /// values past `offset`, in which case it is left untouched.
    pub fn copy_values_to(&self, destination: &mut [V], offset: usize) -> Result<()>
    where
        V: Clone,
    {
        copy_into(self.iter().map(|(_, v)| v.clone()), self.len(), destination, offset)
    }

    /// Copies the key-value pairs into `destination`, starting at `offset`.
    ///
    /// #   Errors
    ///
    /// Returns `InvalidArgument` if `destination` cannot accommodate all the
    /// pairs past `offset`, in which case it is left untouched.
    ///
    /// #   Example
    ///
    /// ```
    /// #   use chained::failure::Failure;
    /// #   use chained::hashmap::HashMap;
    /// let mut map: HashMap<_, _> = HashMap::new();
    /// map.insert(1, 'a');
    ///
    /// let mut pairs = [(0, ' '); 1];
    /// assert_eq!(Err(Failure::InvalidArgument), map.copy_pairs_to(&mut pairs, 2));
    /// assert_eq!(Ok(()), map.copy_pairs_to(&mut pairs, 0));
    /// assert_eq!([(1, 'a')], pairs);
    /// ```
    pub fn copy_pairs_to(&self, destination: &mut [(K, V)], offset: usize) -> Result<()>
    where
        K: Clone,
        V: Clone,
    {
        let pairs = self.iter().map(|(k, v)| (k.clone(), v.clone()));

        copy_into(pairs, self.len(), destination, offset)
    }

    //  Returns the engine.
    pub(crate) fn table(&self) -> &Table<K, V, H> { &self.table }

    //  Locates `key`, for modification or insertion.
    fn find_mut(&mut self, key: &K) -> Result<Lookup<'_, K, V>> {
        let probe = self.table.locate(key)?;

        if let Some(found) = probe.found {
            if let Some(entry) = self.table.entry_mut(found.index) {
                return Ok(Lookup::Occupied(entry));
            }
        }

        Ok(Lookup::Vacant(probe.hash))
    }
}

impl<K, V, H: HashHooks<K> + Default> Default for HashMap<K, V, H> {
    fn default() -> Self { Self::new() }
}

impl<K: fmt::Debug, V: fmt::Debug, H: HashHooks<K>> fmt::Debug for HashMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, H: HashHooks<K>> ops::Index<&K> for HashMap<K, V, H> {
    type Output = V;

    /// Returns a reference to the value of `key`.
    ///
    /// #   Panics
    ///
    /// Panics if `key` is absent.
    fn index(&self, key: &K) -> &V {
        match self.lookup(key) {
            Ok(value) => value,
            Err(failure) => panic_from_failure(failure),
        }
    }
}

impl<K, V, H: HashHooks<K>> iter::Extend<(K, V)> for HashMap<K, V, H> {
    fn extend<C>(&mut self, collection: C)
    where
        C: IntoIterator<Item = (K, V)>,
    {
        self.try_extend(collection).unwrap_or_else(|failure| panic_from_failure(failure));
    }
}

impl<K, V, H: HashHooks<K> + Default> iter::FromIterator<(K, V)> for HashMap<K, V, H> {
    fn from_iter<C>(collection: C) -> Self
    where
        C: IntoIterator<Item = (K, V)>,
    {
        let mut result = Self::new();
        result.extend(collection);
        result
    }
}

impl<'a, K, V, H: HashHooks<K>> iter::IntoIterator for &'a HashMap<K, V, H> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl<'a, K, V, H: HashHooks<K>> iter::IntoIterator for &'a mut HashMap<K, V, H> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter { self.iter_mut() }
}

impl<K, V, H: HashHooks<K>> iter::IntoIterator for HashMap<K, V, H> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V, H>;

    fn into_iter(self) -> Self::IntoIter { IntoIter::new(self.table) }
}

//
//  Implementation Details
//

//  The outcome of `find_mut`.
enum Lookup<'a, K, V> {
    Occupied(&'a mut Entry<K, V>),
    Vacant(Hash),
}

//  Copies `length` elements from `source` into `destination`, past `offset`.
fn copy_into<T, I>(source: I, length: usize, destination: &mut [T], offset: usize) -> Result<()>
where
    I: Iterator<Item = T>,
{
    let room = destination.len().checked_sub(offset).ok_or(Failure::InvalidArgument)?;

    if room < length {
        return Err(Failure::InvalidArgument);
    }

    for (slot, element) in destination[offset..].iter_mut().zip(source) {
        *slot = element;
    }

    Ok(())
}

//  mod tests
