//! Block geometry constants and compile-time checks.
//!
//! The block size is a const generic parameter of
//! [`SeqArena`](crate::SeqArena), so every check here is a `const fn` that
//! the arena evaluates inside `const` blocks. A bad geometry is a build
//! error, never a runtime fault.

use std::mem::{align_of, size_of};

/// Exclusive lower bound on the block size, in bytes.
///
/// A block must hold the worst-case alignment padding plus at least one
/// object of reasonable size.
pub const MIN_BLOCK_SIZE: usize = 128;

/// Default block size: one 4 KiB page per block, link pointer included.
pub const DEFAULT_BLOCK_SIZE: usize = 4096 - size_of::<*const u8>();

/// Natural alignment of a block's data region.
///
/// Types with a larger alignment may need padding at the start of a block.
pub const BLOCK_ALIGN: usize = align_of::<*const u8>();

/// Whether `block_size` is an acceptable arena block size.
pub const fn valid_block_size(block_size: usize) -> bool {
    block_size > MIN_BLOCK_SIZE
}

/// Whether a `T` can ever be stored in a block of `BLOCK_SIZE` bytes.
///
/// This ignores alignment padding; see
/// [`ArenaError::AlignmentUnsatisfiable`](crate::ArenaError::AlignmentUnsatisfiable)
/// for the case where the padding makes it impossible.
pub const fn fits<T, const BLOCK_SIZE: usize>() -> bool {
    size_of::<T>() <= BLOCK_SIZE
}

/// Whether an allocation of `size` bytes aligned to `align` fits in a fresh
/// block of `block_size` bytes whatever the address of the block, i.e. even
/// with the worst-case start padding.
///
/// The arena rejects any layout failing this check up front, so the outcome
/// never depends on where a block happens to land in memory.
pub const fn fits_any_block(size: usize, align: usize, block_size: usize) -> bool {
    let worst_pad = align.saturating_sub(BLOCK_ALIGN);
    match size.checked_add(worst_pad) {
        Some(needed) => needed <= block_size,
        None => false,
    }
}

/// [`fits_any_block`] for the layout of `T`.
pub const fn always_fits<T, const BLOCK_SIZE: usize>() -> bool {
    fits_any_block(size_of::<T>(), align_of::<T>(), BLOCK_SIZE)
}
