//! Low-level placement primitives.
//!
//! The arena splits object creation into three steps that are otherwise
//! fused by `Box::new` and friends:
//!
//! 1. **reserve** raw bytes of a known size and alignment
//!    ([`SeqArena::reserve`](crate::SeqArena::reserve),
//!    [`SeqArena::alloc_uninit`](crate::SeqArena::alloc_uninit));
//! 2. **construct** a value into them ([`construct`]);
//! 3. **destroy** the value in place ([`destroy`]).
//!
//! The arena performs steps 1 and 2 but never step 3. Values with a
//! meaningful `Drop` must be destroyed by their owner before the memory is
//! rewound by [`clean`](crate::SeqArena::clean),
//! [`reset`](crate::SeqArena::reset) or dropping the arena.

use std::ptr::{self, NonNull};

/// Move `value` into the reserved slot and return a typed pointer to it.
///
/// # Safety
///
/// `slot` must be valid for writes of `size_of::<T>()` bytes and aligned to
/// `align_of::<T>()`. Any value previously stored there is overwritten
/// without being dropped.
pub unsafe fn construct<T>(slot: NonNull<u8>, value: T) -> NonNull<T> {
    let typed = slot.cast::<T>();
    // SAFETY: the caller guarantees the slot is valid and aligned for `T`.
    unsafe { typed.as_ptr().write(value) };
    typed
}

/// Run the destructor of the value at `obj` without releasing its storage.
///
/// # Safety
///
/// `obj` must point to a live, initialised `T` that is not used again
/// afterwards, exactly as for [`std::ptr::drop_in_place`]. Calling this
/// twice on the same value is a double drop.
pub unsafe fn destroy<T: ?Sized>(obj: *mut T) {
    // SAFETY: guaranteed by the caller.
    unsafe { ptr::drop_in_place(obj) }
}
