//! A detached enumerator over the HashMap.

use super::failure::Result;
use super::hashcore::HashHooks;
use super::hashcore::version::Version;
use super::HashMap;

/// A `Cursor` over the elements of a `HashMap`.
///
/// Unlike borrowing iterators, a `Cursor` does not borrow the `HashMap` it
/// was created from: it is advanced with a reference to it. This allows
/// interleaving enumeration with other operations, at the cost of having to
/// check, on each step, that the `HashMap` was not structurally modified in
/// between.
///
/// By default, advancing after a structural modification fails with
/// `ConcurrentModification`. With the `lenient-cursors` feature, the cursor
/// keeps going instead, possibly skipping or repeating elements.
///
/// A `Cursor` is single-pass; create a new one to restart.
///
/// #   Example
///
/// ```
/// use chained::hashmap::HashMap;
///
/// let mut map: HashMap<_, _> = HashMap::new();
/// map.extend((0..4).map(|i| (i, i * i)));
///
/// let mut cursor = map.cursor();
/// let mut sum = 0;
///
/// while let Some((_, value)) = cursor.advance(&map).unwrap() {
///     sum += value;
/// }
///
/// assert_eq!(14, sum);
/// ```
#[derive(Clone, Debug)]
pub struct Cursor {
    #[cfg_attr(feature = "lenient-cursors", allow(dead_code))]
    version: Version,
    index: usize,
}

impl Cursor {
    pub(crate) fn new(version: Version) -> Self { Self { version, index: 0 } }

    /// Advances to the next element of `map`, if any.
    ///
    /// `map` is expected to be the `HashMap` the cursor was created from.
    ///
    /// #   Errors
    ///
    /// Returns `ConcurrentModification` if `map` was structurally modified since
    /// the cursor was created, unless the `lenient-cursors` feature is enabled.
    pub fn advance<'a, K, V, H>(&mut self, map: &'a HashMap<K, V, H>)
        -> Result<Option<(&'a K, &'a V)>>
    where
        H: HashHooks<K>,
    {
        let table = map.table();

        #[cfg(not(feature = "lenient-cursors"))]
        table.validate(self.version)?;

        //  The slots may have shrunk, in lenient mode.
        let slots = table.touched_slots();

        while let Some(slot) = slots.get(self.index) {
            self.index += 1;

            if let Some(entry) = slot.get() {
                return Ok(Some((&entry.key, &entry.value)));
            }
        }

        Ok(None)
    }
}
