//! Arena-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during arena operations.
///
/// None of these are retried internally. `Oversized` and
/// `AlignmentUnsatisfiable` are deterministic for a given layout and block
/// size: the only remedy is a larger `BLOCK_SIZE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArenaError {
    /// The requested size is larger than a whole block.
    ///
    /// Typed allocations reject this at compile time; only the raw
    /// [`reserve`](crate::SeqArena::reserve) path can report it.
    Oversized {
        /// Number of bytes requested.
        size: usize,
        /// Capacity of a single block in bytes.
        block_size: usize,
    },
    /// The allocation does not fit at the start of a fresh block once the
    /// worst-case alignment padding is accounted for.
    AlignmentUnsatisfiable {
        /// Number of bytes requested.
        size: usize,
        /// Required alignment in bytes.
        align: usize,
        /// Capacity of a single block in bytes.
        block_size: usize,
    },
    /// The global allocator could not supply a new block.
    OutOfMemory {
        /// Number of bytes requested from the global allocator.
        requested: usize,
    },
}

impl ArenaError {
    /// Whether this error stems from the arena's geometry rather than from
    /// memory exhaustion.
    ///
    /// Configuration errors fail identically on every retry; the caller must
    /// rebuild the arena with a larger block size.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Oversized { .. } | Self::AlignmentUnsatisfiable { .. }
        )
    }
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Oversized { size, block_size } => {
                write!(
                    f,
                    "allocation of {size} bytes can never fit in a {block_size}-byte block"
                )
            }
            Self::AlignmentUnsatisfiable {
                size,
                align,
                block_size,
            } => {
                write!(
                    f,
                    "allocation of {size} bytes aligned to {align} does not fit in a fresh \
                     {block_size}-byte block; use a larger block size"
                )
            }
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory allocating a {requested}-byte block")
            }
        }
    }
}

impl Error for ArenaError {}
