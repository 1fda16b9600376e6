//! Internal Entry of the HashMap.

use super::root::fmt;

//  The actual element stored in a slot.
pub struct Entry<K, V> {
    //  The key.
    pub key: K,
    //  The value.
    pub value: V,
}

impl<K, V> Entry<K, V> {
    //  Creates an instance.
    pub fn new(key: K, value: V) -> Self { Entry { key, value } }

    //  Splits the instance into its key and value.
    pub fn into_pair(self) -> (K, V) { (self.key, self.value) }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?} => {:?}", self.key, self.value)
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for Entry<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.key.eq(&other.key) && self.value.eq(&other.value)
    }
}
