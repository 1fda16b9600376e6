//! Internal definition of the HashMap engine.

pub mod capacity;
pub mod entry;
pub mod slot;
pub mod slots;
pub mod table;
pub mod version;

mod hooks;

pub use self::hooks::HashHooks;

#[cfg(feature = "with-std")]
pub use self::hooks::DefaultHashHooks;

use super::allocator;
use super::array;
use super::failure;
use super::raw;
use super::root;
