//! The growth table of the HashMap.
//!
//! The storage of a `HashMap` is always sized after one entry of a static table
//! of `(bucket count, slot capacity)` pairs:
//!
//! -   Bucket counts are primes, each about 1.5x its predecessor, so that the
//!     modulo of the hash spreads keys even when hashes share small factors.
//! -   Slot capacities are 3/4 of the bucket counts, bounding the load factor.
//!
//! The last entry fixes the maximum capacity of any `HashMap`.

//  The growth table.
const GROWTH_TABLE: [(u32, u32); 48] = [
    (7, 5),
    (11, 8),
    (17, 12),
    (23, 17),
    (37, 27),
    (53, 39),
    (79, 59),
    (127, 95),
    (179, 134),
    (269, 201),
    (409, 306),
    (607, 455),
    (911, 683),
    (1367, 1025),
    (2053, 1539),
    (3067, 2300),
    (4597, 3447),
    (6899, 5174),
    (10357, 7767),
    (15527, 11645),
    (23279, 17459),
    (34919, 26189),
    (52379, 39284),
    (78569, 58926),
    (117839, 88379),
    (176777, 132582),
    (265141, 198855),
    (397721, 298290),
    (596569, 447426),
    (894869, 671151),
    (1342259, 1006694),
    (2013391, 1510043),
    (3020117, 2265087),
    (4530121, 3397590),
    (6795199, 5096399),
    (10192783, 7644587),
    (15289151, 11466863),
    (22933727, 17200295),
    (34400591, 25800443),
    (51600907, 38700680),
    (77401351, 58051013),
    (116102011, 87076508),
    (174152999, 130614749),
    (261229513, 195922134),
    (391844221, 293883165),
    (587766323, 440824742),
    (881649481, 661237110),
    (1322474243, 991855682),
];

/// The index of an entry of the growth table.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SizeIndex(pub usize);

impl SizeIndex {
    //  The first entry.
    pub const FIRST: SizeIndex = SizeIndex(0);

    //  The last entry.
    pub const LAST: SizeIndex = SizeIndex(GROWTH_TABLE.len() - 1);

    //  Returns the number of buckets of this entry.
    pub fn bucket_count(self) -> usize { GROWTH_TABLE[self.0].0 as usize }

    //  Returns the number of slots of this entry.
    pub fn slot_capacity(self) -> usize { GROWTH_TABLE[self.0].1 as usize }

    //  Returns the following entry, if any.
    pub fn next(self) -> Option<SizeIndex> {
        if self < Self::LAST { Some(SizeIndex(self.0 + 1)) } else { None }
    }
}

//  Returns the smallest entry whose slot capacity is at least `slots`.
//
//  Returns None if `slots` exceeds the capacity of the last entry.
pub fn next_size_index(slots: usize) -> Option<SizeIndex> {
    let index = GROWTH_TABLE.partition_point(|&(_, capacity)| (capacity as usize) < slots);

    if index < GROWTH_TABLE.len() { Some(SizeIndex(index)) } else { None }
}

//  Limit.
//
//  The largest entry a given HashMap may grow to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Limit(SizeIndex);

impl Limit {
    //  Creates a limit accommodating at least `max_capacity` slots, clamped to
    //  the last entry of the growth table.
    pub fn new(max_capacity: usize) -> Self {
        Self(next_size_index(max_capacity).unwrap_or(SizeIndex::LAST))
    }

    //  Creates a limit at the last entry of the growth table.
    pub fn unbounded() -> Self { Self(SizeIndex::LAST) }

    //  Returns the maximum number of slots.
    pub fn max_capacity(self) -> usize { self.0.slot_capacity() }

    //  Returns the smallest entry accommodating `slots`, within the limit.
    pub fn fit(self, slots: usize) -> Option<SizeIndex> {
        next_size_index(slots).filter(|&index| index <= self.0)
    }

    //  Returns the entries to grow to, from `current`, in order of preference.
    //
    //  The preferred target at least doubles the slot capacity, clamped to the
    //  limit, while the fallback is the next entry. They may be identical.
    //
    //  Returns None if `current` is already at the limit.
    pub fn growth(self, current: Option<SizeIndex>) -> Option<(SizeIndex, SizeIndex)> {
        let fallback = match current {
            None => SizeIndex::FIRST,
            Some(current) => current.next().filter(|&next| next <= self.0)?,
        };

        let doubled = current.map_or(0, |c| c.slot_capacity().saturating_mul(2));

        let preferred = next_size_index(doubled)
            .map_or(self.0, |index| index.min(self.0))
            .max(fallback);

        Some((preferred, fallback))
    }
}

impl Default for Limit {
    fn default() -> Self { Self::unbounded() }
}
