//! The sequential arena.
//!
//! [`SeqArena`] owns a singly-linked chain of fixed-size blocks and bumps a
//! cursor through them. Objects are never freed individually: memory comes
//! back only in bulk, through [`SeqArena::clean`] (rewind, keep blocks),
//! [`SeqArena::reset`] (rewind, free all but the first block) or dropping
//! the arena.

use std::alloc::Layout;
use std::cell::Cell;
use std::fmt;
use std::mem::MaybeUninit;
use std::ptr::NonNull;

use crate::block::{place, Block};
use crate::config::{self, DEFAULT_BLOCK_SIZE};
use crate::error::ArenaError;
use crate::raw;

/// A bump allocator over a chain of `BLOCK_SIZE`-byte blocks.
///
/// Allocation takes `&self`, so any number of returned references may be
/// alive at once. Rewinding takes `&mut self`, which means no reference
/// handed out earlier can survive a [`clean`](Self::clean) or
/// [`reset`](Self::reset).
///
/// The arena **never runs destructors** of the values it stores. A value
/// that owns resources must be destroyed by its owner (for instance with
/// [`raw::destroy`]) before the arena rewinds or is dropped; otherwise
/// those resources leak.
///
/// `SeqArena` is neither `Clone`, `Send` nor `Sync`: exactly one owner on
/// one thread drives it. Shard one arena per thread for parallel use.
///
/// # Example
///
/// ```
/// use seqalloc::SeqArena;
///
/// let mut arena: SeqArena<256> = SeqArena::new()?;
/// let a = arena.alloc(7u64)?;
/// let b = arena.alloc([1u8; 3])?;
/// *a += 1;
/// assert_eq!((*a, *b), (8, [1, 1, 1]));
///
/// arena.clean();
/// assert_eq!(arena.used(), 0);
/// # Ok::<(), seqalloc::ArenaError>(())
/// ```
pub struct SeqArena<const BLOCK_SIZE: usize = DEFAULT_BLOCK_SIZE> {
    /// First block; owns the rest of the chain. Fixed for the arena's life.
    head: NonNull<Block<BLOCK_SIZE>>,
    /// Block currently being filled. Always reachable from `head`.
    tail: Cell<NonNull<Block<BLOCK_SIZE>>>,
    /// Offset of the first free byte in `tail`, at most `BLOCK_SIZE`.
    cursor: Cell<usize>,
    /// Position of `tail` in the chain.
    active: Cell<usize>,
    /// Blocks currently linked from `head`.
    blocks: Cell<usize>,
}

impl<const BLOCK_SIZE: usize> SeqArena<BLOCK_SIZE> {
    /// Create an arena with one pre-allocated block.
    ///
    /// A `BLOCK_SIZE` of 128 bytes or less does not compile:
    ///
    /// ```compile_fail
    /// let arena = seqalloc::SeqArena::<128>::new();
    /// ```
    ///
    /// # Errors
    ///
    /// [`ArenaError::OutOfMemory`] if the first block cannot be allocated.
    pub fn new() -> Result<Self, ArenaError> {
        const {
            assert!(
                config::valid_block_size(BLOCK_SIZE),
                "arena block size must exceed 128 bytes"
            )
        };
        let head = Block::alloc()?;
        Ok(Self {
            head,
            tail: Cell::new(head),
            cursor: Cell::new(0),
            active: Cell::new(0),
            blocks: Cell::new(1),
        })
    }

    /// Move `value` into the arena and return a reference to it.
    ///
    /// The arena owns the storage; the caller owns the value's lifecycle.
    /// `value` is never dropped by the arena.
    ///
    /// A type larger than a block does not compile:
    ///
    /// ```compile_fail
    /// let arena = seqalloc::SeqArena::<256>::new().unwrap();
    /// let _ = arena.alloc([0u8; 257]);
    /// ```
    ///
    /// # Errors
    ///
    /// - [`ArenaError::AlignmentUnsatisfiable`] if `T` does not fit in a
    ///   fresh block once worst-case alignment padding is added.
    /// - [`ArenaError::OutOfMemory`] if a new block was needed and could not
    ///   be allocated.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc<T>(&self, value: T) -> Result<&mut T, ArenaError> {
        let slot = self.reserve_for::<T>()?;
        // SAFETY: `slot` is freshly reserved for a `T` and handed out only
        // once; it stays valid until `&mut self` is next taken.
        Ok(unsafe { raw::construct(slot, value).as_mut() })
    }

    /// Reserve storage for a `T`, then build the value with `f`.
    ///
    /// The storage is reserved before `f` runs; the value `f` returns is
    /// then moved into it. `f` may itself allocate from this arena. If `f`
    /// panics the reserved bytes are simply wasted.
    ///
    /// # Errors
    ///
    /// As for [`alloc`](Self::alloc).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_with<T, F>(&self, f: F) -> Result<&mut T, ArenaError>
    where
        F: FnOnce() -> T,
    {
        let slot = self.reserve_for::<T>()?;
        // SAFETY: as in `alloc`; later reservations made by `f` land past
        // `slot`.
        Ok(unsafe { raw::construct(slot, f()).as_mut() })
    }

    /// Reserve uninitialised storage for a `T`.
    ///
    /// # Errors
    ///
    /// As for [`alloc`](Self::alloc).
    #[allow(clippy::mut_from_ref)]
    pub fn alloc_uninit<T>(&self) -> Result<&mut MaybeUninit<T>, ArenaError> {
        let slot = self.reserve_for::<T>()?;
        // SAFETY: the slot is sized and aligned for `T`; `MaybeUninit`
        // needs no initialisation.
        Ok(unsafe { slot.cast::<MaybeUninit<T>>().as_mut() })
    }

    /// Reserve `layout.size()` bytes aligned to `layout.align()`.
    ///
    /// The returned memory is uninitialised and lies entirely within one
    /// block. It stays valid until the next [`clean`](Self::clean),
    /// [`reset`](Self::reset) or drop of the arena.
    ///
    /// # Errors
    ///
    /// - [`ArenaError::Oversized`] if `layout.size()` exceeds `BLOCK_SIZE`.
    /// - [`ArenaError::AlignmentUnsatisfiable`] if the layout does not fit
    ///   in a fresh block once worst-case alignment padding is added. The
    ///   chain is left untouched and the same layout always fails the same
    ///   way.
    /// - [`ArenaError::OutOfMemory`] if a new block could not be allocated.
    pub fn reserve(&self, layout: Layout) -> Result<NonNull<u8>, ArenaError> {
        if layout.size() > BLOCK_SIZE {
            return Err(ArenaError::Oversized {
                size: layout.size(),
                block_size: BLOCK_SIZE,
            });
        }
        // Blocks are only `BLOCK_ALIGN`-aligned. Decide from geometry alone
        // so the answer is the same for every block and the chain is never
        // touched on failure.
        if !config::fits_any_block(layout.size(), layout.align(), BLOCK_SIZE) {
            return Err(Self::unsatisfiable(layout));
        }
        self.reserve_fitting(layout)
    }

    /// Rewind to the start of the first block, keeping every block.
    ///
    /// Memory handed out earlier will be overwritten by later allocations.
    /// No destructor runs.
    pub fn clean(&mut self) {
        self.tail.set(self.head);
        self.cursor.set(0);
        self.active.set(0);
    }

    /// Free every block after the first, then [`clean`](Self::clean).
    ///
    /// No destructor runs.
    pub fn reset(&mut self) {
        // SAFETY: `head` is live and owned by `self`; the detached tail of
        // the chain is unreachable once the link is cut.
        unsafe {
            let rest = Block::next(self.head);
            Block::set_next(self.head, None);
            Block::free_chain(rest);
        }
        self.blocks.set(1);
        self.clean();
    }

    /// Capacity of a single block in bytes.
    pub const fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    /// Number of blocks in the chain.
    pub fn block_count(&self) -> usize {
        self.blocks.get()
    }

    /// Zero-based position of the block currently being filled.
    pub fn active_block(&self) -> usize {
        self.active.get()
    }

    /// Bytes consumed in the current block, alignment padding included.
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Bytes still free in the current block.
    pub fn remaining(&self) -> usize {
        BLOCK_SIZE - self.cursor.get()
    }

    /// Object space across all blocks, in bytes.
    pub fn capacity(&self) -> usize {
        self.blocks.get() * BLOCK_SIZE
    }

    /// Heap bytes held by the arena, block links included.
    pub fn memory_bytes(&self) -> usize {
        self.blocks.get() * Block::<BLOCK_SIZE>::FOOTPRINT
    }

    /// Position in the chain of the block whose data region holds `ptr`.
    ///
    /// Returns `None` if `ptr` does not point into any block.
    pub fn block_index_of(&self, ptr: *const u8) -> Option<usize> {
        let addr = ptr as usize;
        let mut block = Some(self.head);
        let mut index = 0;
        while let Some(b) = block {
            if Block::contains(b, addr) {
                return Some(index);
            }
            // SAFETY: every block reachable from `head` is live.
            block = unsafe { Block::next(b) };
            index += 1;
        }
        None
    }

    fn reserve_for<T>(&self) -> Result<NonNull<u8>, ArenaError> {
        const {
            assert!(
                config::fits::<T, BLOCK_SIZE>(),
                "type is larger than the arena block size"
            )
        };
        if !config::always_fits::<T, BLOCK_SIZE>() {
            return Err(Self::unsatisfiable(Layout::new::<T>()));
        }
        self.reserve_fitting(Layout::new::<T>())
    }

    /// Reserve a layout already known to fit any fresh block.
    fn reserve_fitting(&self, layout: Layout) -> Result<NonNull<u8>, ArenaError> {
        if let Some(slot) = self.bump(layout) {
            return Ok(slot);
        }

        self.advance()?;
        let slot = self.bump(layout);
        debug_assert!(slot.is_some(), "fresh block rejected a fitting layout");
        slot.ok_or(Self::unsatisfiable(layout))
    }

    fn unsatisfiable(layout: Layout) -> ArenaError {
        ArenaError::AlignmentUnsatisfiable {
            size: layout.size(),
            align: layout.align(),
            block_size: BLOCK_SIZE,
        }
    }

    /// Place `layout` in the current block, if it fits.
    fn bump(&self, layout: Layout) -> Option<NonNull<u8>> {
        let data = Block::data(self.tail.get());
        let base = data.as_ptr() as usize;
        let range = place(base, self.cursor.get(), layout, BLOCK_SIZE)?;
        self.cursor.set(range.end);
        // SAFETY: `range.start <= BLOCK_SIZE`, so the pointer stays within
        // (or one past the end of) the data region.
        Some(unsafe { data.add(range.start) })
    }

    /// Move to the next block, reusing a retained one or linking a new one.
    fn advance(&self) -> Result<(), ArenaError> {
        let tail = self.tail.get();
        // SAFETY: `tail` is live and reachable from `head`.
        let next = match unsafe { Block::next(tail) } {
            Some(next) => next,
            None => {
                let fresh = Block::alloc()?;
                // SAFETY: `tail` is live and no reference to its link exists.
                unsafe { Block::set_next(tail, Some(fresh)) };
                self.blocks.set(self.blocks.get() + 1);
                fresh
            }
        };
        self.tail.set(next);
        self.cursor.set(0);
        self.active.set(self.active.get() + 1);
        debug_assert!(self.active.get() < self.blocks.get());
        Ok(())
    }
}

impl<const BLOCK_SIZE: usize> Drop for SeqArena<BLOCK_SIZE> {
    fn drop(&mut self) {
        // SAFETY: the arena exclusively owns the whole chain from `head`.
        unsafe { Block::free_chain(Some(self.head)) }
    }
}

impl<const BLOCK_SIZE: usize> fmt::Debug for SeqArena<BLOCK_SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeqArena")
            .field("block_size", &BLOCK_SIZE)
            .field("block_count", &self.block_count())
            .field("active_block", &self.active_block())
            .field("used", &self.used())
            .finish()
    }
}
