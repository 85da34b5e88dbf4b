//! Fixed-capacity blocks and the placement arithmetic inside them.
//!
//! A [`Block`] is a `BLOCK_SIZE`-byte data region followed by a link to the
//! next block in the chain. Blocks are allocated straight from the global
//! allocator so that exhaustion surfaces as
//! [`ArenaError::OutOfMemory`] instead of aborting the process.

use std::alloc::{alloc, dealloc, Layout};
use std::mem::MaybeUninit;
use std::ops::Range;
use std::ptr::{addr_of_mut, NonNull};

use crate::error::ArenaError;

/// A block in the arena's chain.
///
/// `repr(C)` keeps `data` at offset 0, so the data region starts at the
/// block's own (pointer-sized) alignment.
#[repr(C)]
pub(crate) struct Block<const BLOCK_SIZE: usize> {
    data: [MaybeUninit<u8>; BLOCK_SIZE],
    next: Option<NonNull<Block<BLOCK_SIZE>>>,
}

impl<const BLOCK_SIZE: usize> Block<BLOCK_SIZE> {
    const LAYOUT: Layout = Layout::new::<Self>();

    /// Heap bytes held by one block, link included.
    pub(crate) const FOOTPRINT: usize = Self::LAYOUT.size();

    /// Allocate an unlinked block with uninitialised data.
    pub(crate) fn alloc() -> Result<NonNull<Self>, ArenaError> {
        // SAFETY: LAYOUT has non-zero size; the link alone is pointer-sized.
        let raw = unsafe { alloc(Self::LAYOUT) }.cast::<Self>();
        let block = NonNull::new(raw).ok_or(ArenaError::OutOfMemory {
            requested: Self::LAYOUT.size(),
        })?;
        // SAFETY: `block` is freshly allocated with the layout of `Self`.
        // Only the link is initialised; `data` stays uninitialised.
        unsafe { addr_of_mut!((*block.as_ptr()).next).write(None) };
        Ok(block)
    }

    /// Release a single block. Its successor, if any, is not touched.
    ///
    /// # Safety
    ///
    /// `block` must come from [`Block::alloc`], must not have been freed
    /// already, and must not be used afterwards.
    pub(crate) unsafe fn free(block: NonNull<Self>) {
        // SAFETY: guaranteed by the caller.
        unsafe { dealloc(block.as_ptr().cast::<u8>(), Self::LAYOUT) }
    }

    /// Release `first` and every block linked after it.
    ///
    /// Iterative, so arbitrarily long chains cannot overflow the stack.
    ///
    /// # Safety
    ///
    /// Every block reachable from `first` must be live and owned solely by
    /// this chain; none may be used afterwards.
    pub(crate) unsafe fn free_chain(first: Option<NonNull<Self>>) {
        let mut cursor = first;
        while let Some(block) = cursor {
            // SAFETY: `block` is live per the caller's contract.
            cursor = unsafe { Self::next(block) };
            // SAFETY: read its link above; nothing else refers to it.
            unsafe { Self::free(block) };
        }
    }

    /// Start of the data region.
    pub(crate) fn data(block: NonNull<Self>) -> NonNull<u8> {
        // `data` is the first field of a repr(C) struct.
        block.cast::<u8>()
    }

    /// The block linked after `block`.
    ///
    /// # Safety
    ///
    /// `block` must be live.
    pub(crate) unsafe fn next(block: NonNull<Self>) -> Option<NonNull<Self>> {
        // SAFETY: the link is always initialised by `alloc`.
        unsafe { (*block.as_ptr()).next }
    }

    /// Replace the link after `block`.
    ///
    /// # Safety
    ///
    /// `block` must be live and no reference to its link may be held.
    pub(crate) unsafe fn set_next(block: NonNull<Self>, next: Option<NonNull<Self>>) {
        // SAFETY: guaranteed by the caller.
        unsafe { (*block.as_ptr()).next = next }
    }

    /// Whether `addr` lies inside this block's data region.
    pub(crate) fn contains(block: NonNull<Self>, addr: usize) -> bool {
        let start = Self::data(block).as_ptr() as usize;
        addr >= start && addr - start < BLOCK_SIZE
    }
}

/// Place an allocation of `layout` inside a region.
///
/// `base` is the absolute address of the region's first byte, `cursor` the
/// offset of its first free byte and `limit` its length. Returns the offset
/// range the allocation occupies, or `None` if it would cross `limit`.
///
/// Rounding is applied to the absolute address, since the region itself
/// may be less aligned than `layout` requires.
pub(crate) fn place(
    base: usize,
    cursor: usize,
    layout: Layout,
    limit: usize,
) -> Option<Range<usize>> {
    let addr = base.checked_add(cursor)?;
    let pad = addr.wrapping_neg() & (layout.align() - 1);
    let start = cursor.checked_add(pad)?;
    let end = start.checked_add(layout.size())?;
    if end > limit {
        return None;
    }
    Some(start..end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: usize, align: usize) -> Layout {
        Layout::from_size_align(size, align).unwrap()
    }

    #[test]
    fn place_at_aligned_cursor_needs_no_padding() {
        assert_eq!(place(0x1000, 0, layout(64, 8), 256), Some(0..64));
        assert_eq!(place(0x1000, 64, layout(64, 8), 256), Some(64..128));
    }

    #[test]
    fn place_rounds_the_absolute_address() {
        // Region starts 8 past a 64-byte boundary: 56 bytes of padding.
        assert_eq!(place(0x1008, 0, layout(64, 64), 256), Some(56..120));
    }

    #[test]
    fn place_fills_exactly_to_limit() {
        assert_eq!(place(0x1000, 192, layout(64, 8), 256), Some(192..256));
        assert_eq!(place(0x1000, 193, layout(64, 8), 256), None);
    }

    #[test]
    fn place_rejects_when_padding_overflows_region() {
        // 256-byte object needs a 512-aligned start; the region is not.
        assert_eq!(place(0x1010, 0, layout(256, 512), 256), None);
        assert_eq!(place(0x1200, 0, layout(256, 512), 256), Some(0..256));
    }

    #[test]
    fn place_zero_sized_at_end() {
        assert_eq!(place(0x1000, 256, layout(0, 1), 256), Some(256..256));
    }

    #[test]
    fn alloc_and_link_blocks() {
        let a = Block::<256>::alloc().unwrap();
        let b = Block::<256>::alloc().unwrap();
        unsafe {
            assert_eq!(Block::next(a), None);
            Block::set_next(a, Some(b));
            assert_eq!(Block::next(a), Some(b));
            Block::free_chain(Some(a));
        }
    }

    #[test]
    fn data_region_has_block_alignment() {
        let block = Block::<256>::alloc().unwrap();
        let start = Block::data(block).as_ptr() as usize;
        assert_eq!(start % crate::config::BLOCK_ALIGN, 0);
        assert!(Block::contains(block, start));
        assert!(Block::contains(block, start + 255));
        assert!(!Block::contains(block, start + 256));
        unsafe { Block::free(block) };
    }

    #[test]
    fn footprint_includes_link() {
        assert_eq!(
            Block::<256>::FOOTPRINT,
            256 + std::mem::size_of::<*const u8>()
        );
    }
}
