//! Versions of the HashMap, to detect modifications during enumeration or
//! while calling into the hooks.

use super::failure::{Failure, Result};

//  A snapshot of the structure version.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Version(usize);

//  A snapshot of the reentrancy version, taken before calling into the hooks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Stamp(usize);

//  The pair of counters.
//
//  Both only ever increase (modulo wrap-around):
//  -   `structure` whenever a slot may have been moved, freed, or allocated.
//  -   `reentrancy` alongside; it is stamped before, and checked after, any
//      call into the hooks.
#[derive(Clone, Copy, Debug, Default)]
pub struct Versions {
    structure: usize,
    reentrancy: usize,
}

impl Versions {
    //  Returns the current structure version.
    pub fn structure(&self) -> Version { Version(self.structure) }

    //  Checks that the structure version still matches.
    #[cfg_attr(feature = "lenient-cursors", allow(dead_code))]
    pub fn validate(&self, version: Version) -> Result<()> {
        if version.0 == self.structure {
            Ok(())
        } else {
            Err(Failure::ConcurrentModification)
        }
    }

    //  Records a structural modification.
    pub fn bump(&mut self) {
        self.structure = self.structure.wrapping_add(1);
        self.reentrancy = self.reentrancy.wrapping_add(1);
    }

    //  Snapshots the reentrancy version, before calling into the hooks.
    pub fn stamp(&self) -> Stamp { Stamp(self.reentrancy) }

    //  Checks, after calling into the hooks, that nothing was modified.
    pub fn check(&self, stamp: Stamp) -> Result<()> {
        if stamp.0 == self.reentrancy {
            Ok(())
        } else {
            Err(Failure::ConcurrentModification)
        }
    }
}
