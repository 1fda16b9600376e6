//! Hooks of the HashMap.

#[cfg(feature = "with-std")]
use super::root::collections::hash_map;

use super::allocator;

#[cfg(feature = "with-std")]
use super::root::hash;

/// HashHooks
///
/// There are three important hooks for a HashMap:
/// -   The hashing algorithm.
/// -   The equality of keys.
/// -   The allocator and deallocator functions.
///
/// #   Contract
///
/// `hash` and `equals` must be consistent: keys which are equal must hash
/// identically. Only the lower 31 bits of the hash are used.
///
/// Neither `hash` nor `equals` may modify the `HashMap` they are attached to,
/// even indirectly. The borrow checker prevents it in safe code; the `HashMap`
/// further detects such modifications on a best-effort basis, and reports them
/// as `Failure::ConcurrentModification`.
///
/// Also see DefaultHashHooks for the default, when the `with-std` feature is used.
///
/// #   Example
///
/// Case-insensitive keys.
///
/// ```
/// use chained::allocator::{Allocator, DefaultAllocator, Layout};
/// use chained::hashmap::{HashHooks, HashMap};
///
/// #[derive(Default)]
/// struct CaseInsensitive(DefaultAllocator);
///
/// impl Allocator for CaseInsensitive {
///     unsafe fn allocate(&self, layout: Layout) -> *mut u8 {
///         unsafe { self.0.allocate(layout) }
///     }
///
///     unsafe fn deallocate(&self, ptr: *mut u8, layout: Layout) {
///         unsafe { self.0.deallocate(ptr, layout) }
///     }
/// }
///
/// impl HashHooks<String> for CaseInsensitive {
///     fn hash(&self, key: &String) -> i32 {
///         key.bytes()
///             .map(|b| b.to_ascii_lowercase())
///             .fold(17i32, |h, b| h.wrapping_mul(31).wrapping_add(b as i32))
///     }
///
///     fn equals(&self, left: &String, right: &String) -> bool {
///         left.eq_ignore_ascii_case(right)
///     }
/// }
///
/// let mut map: HashMap<String, i32, CaseInsensitive> = HashMap::new();
/// map.insert("Hello".to_string(), 1);
///
/// assert!(map.contains_key(&"HELLO".to_string()));
/// ```
pub trait HashHooks<K: ?Sized>: allocator::Allocator {
    /// Computes the hash of `key`.
    fn hash(&self, key: &K) -> i32;

    /// Checks whether `left` and `right` are the same key.
    fn equals(&self, left: &K, right: &K) -> bool;
}

impl<K: ?Sized, H: HashHooks<K> + ?Sized> HashHooks<K> for &H {
    fn hash(&self, key: &K) -> i32 { (**self).hash(key) }

    fn equals(&self, left: &K, right: &K) -> bool { (**self).equals(left, right) }
}

/// DefaultHashHooks
///
/// Default hooks for the HashMap:
/// -   hashing with the standard `RandomState`, folded down to 32 bits.
/// -   comparing with `Eq`.
/// -   deferring allocation and deallocation to `DefaultAllocator`.
#[cfg(feature = "with-std")]
#[derive(Clone, Debug, Default)]
pub struct DefaultHashHooks(allocator::DefaultAllocator, hash_map::RandomState);

#[cfg(feature = "with-std")]
impl allocator::Allocator for DefaultHashHooks {
    unsafe fn allocate(&self, layout: allocator::Layout) -> *mut u8 {
        //  Safety:
        //  -   Forwarding.
        unsafe { self.0.allocate(layout) }
    }

    unsafe fn deallocate(&self, ptr: *mut u8, layout: allocator::Layout) {
        //  Safety:
        //  -   Forwarding.
        unsafe { self.0.deallocate(ptr, layout) }
    }
}

#[cfg(feature = "with-std")]
impl<K: ?Sized + hash::Hash + Eq> HashHooks<K> for DefaultHashHooks {
    fn hash(&self, key: &K) -> i32 {
        use self::hash::BuildHasher;

        let hash = self.1.hash_one(key);

        //  Fold, so the upper bits contribute to the bucket selection.
        (hash ^ (hash >> 32)) as i32
    }

    fn equals(&self, left: &K, right: &K) -> bool { left == right }
}

#[cfg(all(test, feature = "with-std"))]
mod tests {

use super::*;

#[test]
fn default_hooks_consistent() {
    let hooks = DefaultHashHooks::default();

    let (a, b) = (String::from("key"), String::from("key"));

    assert_eq!(HashHooks::<String>::hash(&hooks, &a), HashHooks::<String>::hash(&hooks, &b));
    assert!(hooks.equals(&a, &b));
    assert!(!hooks.equals(&a, &String::from("other")));
}

#[test]
fn default_hooks_unsized() {
    let hooks = DefaultHashHooks::default();

    assert_eq!(HashHooks::<str>::hash(&hooks, "key"), HashHooks::<str>::hash(&hooks, "key"));
    assert!(HashHooks::<str>::equals(&hooks, "key", "key"));
}

}
