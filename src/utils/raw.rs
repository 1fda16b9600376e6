//! Raw memory, maybe uninitialized.

use super::root::{mem, ptr};

//  Raw memory, suitably sized for T.
//
//  A building block for the slots of the HashMap, it may or may not be
//  initialized; tracking which is the responsibility of the owner.
//
//  Raw never drops its content: the owner must either `take` or `drop` it.
pub struct Raw<T>(mem::MaybeUninit<T>);

impl<T> Raw<T> {
    //  Creates a new, uninitialized, instance.
    pub fn new() -> Self { Raw(mem::MaybeUninit::uninit()) }

    //  Gets a reference to the value.
    //
    //  #   Safety
    //
    //  -   Assumes that the value is initialized.
    pub unsafe fn get(&self) -> &T { self.0.assume_init_ref() }

    //  Gets a mutable reference to the value.
    //
    //  #   Safety
    //
    //  -   Assumes that the value is initialized.
    pub unsafe fn get_mut(&mut self) -> &mut T { self.0.assume_init_mut() }

    //  Initializes the value.
    //
    //  #   Warning
    //
    //  Does not drop the former value, if any.
    pub fn write(&mut self, value: T) {
        self.0.write(value);
    }

    //  Moves the value out, leaving the memory logically uninitialized.
    //
    //  #   Safety
    //
    //  -   Assumes that the value is initialized.
    //  -   Assumes that the value is not read again until re-initialized.
    pub unsafe fn take(&mut self) -> T {
        ptr::read(self.0.as_ptr())
    }

    //  Drops the value within.
    //
    //  #   Safety
    //
    //  -   Assumes that the value is initialized.
    //  -   Assumes that the value is not read again until re-initialized.
    pub unsafe fn drop(&mut self) {
        ptr::drop_in_place(self.0.as_mut_ptr());
    }
}

impl<T> Default for Raw<T> {
    fn default() -> Self { Self::new() }
}
