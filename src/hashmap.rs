//! #   The HashMap.
//!
//! The `HashMap` is a chained hash map built directly on two flat arrays: one
//! of bucket heads, and one of slots threaded into chains.
//!
//! ##  Under the covers.
//!
//! -   Removed slots are recycled through a free list, rather than shifting
//!     the array.
//! -   The storage is sized after a fixed table of prime bucket counts, and
//!     fully rehashed, in a single pass, whenever it grows.
//! -   The live slots can be compacted on demand, with `defragment`, and the
//!     storage shrunk, with `trim_excess`.
//!
//! The main consequences are:
//!
//! -   The maximum capacity is bounded, either by the last entry of the growth
//!     table or by the limit specified at construction.
//! -   Iteration order is the order of the slots, and is not meaningful.
//!
//! #   Example: basic
//!
//! ```
//! use chained::hashmap::HashMap;
//!
//! let mut map: HashMap<_, _> = HashMap::new();
//! map.insert(1, false);
//! map.insert(2, true);
//!
//! assert_eq!(2, map.len());
//! assert_eq!(Ok(Some(&false)), map.get(&1));
//!
//! map.extend([(3, false), (4, true), (5, false)].iter().copied());
//!
//! assert_eq!(5, map.len());
//! assert!(map[&4]);
//!
//! for (k, v) in &map {
//!     println!("{} => {}", k, v);
//! }
//! ```
//!
//! #   Example: fused operations
//!
//! The fused operations test, read, write, and remove in a single traversal,
//! exchanging values through a `&mut V`:
//!
//! ```
//! use chained::hashmap::HashMap;
//!
//! let mut map: HashMap<_, _> = HashMap::new();
//!
//! let mut value = 10;
//! assert_eq!(Ok(true), map.add_or_get("hits", &mut value));
//! assert_eq!(10, value);
//!
//! //  Read-modify-write, with a single lookup per step.
//! let mut value = 0;
//! assert_eq!(Ok(false), map.add_or_get("hits", &mut value));
//! value += 1;
//! assert_eq!(Ok(true), map.try_swap(&"hits", &mut value));
//! assert_eq!(10, value);
//!
//! assert_eq!(Ok(Some(&11)), map.get(&"hits"));
//!
//! let mut value = 0;
//! assert_eq!(Ok(true), map.try_get_and_remove(&"hits", &mut value));
//! assert_eq!(11, value);
//! assert!(map.is_empty());
//! ```
//!
//! #   Example: managing capacity
//!
//! ```
//! use chained::failure::Failure;
//! use chained::hashmap::HashMap;
//!
//! //  The maximum capacity is rounded up to an entry of the growth table.
//! let mut map: HashMap<_, _> = HashMap::with_max_capacity(10);
//! assert_eq!(12, map.max_capacity());
//! assert_eq!(0, map.capacity());
//!
//! for i in 0..12 {
//!     map.insert(i, i);
//! }
//!
//! assert_eq!(Err(Failure::CapacityExceeded), map.try_add_new(12, 12));
//!
//! //  Removing leaves holes, which defragmentation compacts.
//! for i in 0..6 {
//!     map.remove(&i).unwrap();
//! }
//!
//! assert!(map.defragment(false));
//!
//! //  Trimming then sheds the excess capacity.
//! map.trim_excess();
//! assert_eq!(8, map.capacity());
//! ```
//!
//! #   Example: enumerating
//!
//! Borrowing iterators statically prevent modifications. A `Cursor`, on the
//! other hand, is detached from the map, and detects modifications instead:
//!
//! ```
//! use chained::failure::Failure;
//! use chained::hashmap::HashMap;
//!
//! let mut map: HashMap<_, _> = HashMap::new();
//! map.extend([(1, 1), (2, 2)].iter().copied());
//!
//! let mut cursor = map.cursor();
//! assert!(cursor.advance(&map).unwrap().is_some());
//!
//! map.insert(3, 3);
//!
//! # #[cfg(not(feature = "lenient-cursors"))]
//! assert_eq!(Err(Failure::ConcurrentModification), cursor.advance(&map).map(|_| ()));
//! ```

pub mod cursor;
pub mod iterator;
pub mod views;

mod hashmap;

pub use super::hashcore::HashHooks;
pub use self::cursor::Cursor;
pub use self::hashmap::HashMap;
pub use self::views::{KeysView, ValuesView};

#[cfg(feature = "with-std")]
pub use super::hashcore::DefaultHashHooks;

use super::failure;
use super::hashcore;
use super::root;
