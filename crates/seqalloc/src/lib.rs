//! Sequential (bump) allocation of heterogeneous objects with bulk release.
//!
//! A [`SeqArena`] hands out typed, constructed objects from a chain of
//! fixed-size blocks it owns. Objects are never freed one by one and the
//! arena never runs their destructors; memory comes back only in bulk:
//!
//! - [`SeqArena::clean`] rewinds to the first block and keeps every block
//!   for reuse;
//! - [`SeqArena::reset`] rewinds and frees every block but the first;
//! - dropping the arena frees everything.
//!
//! This suits workloads that allocate many short-lived objects whose
//! lifetime is managed externally, per generation or epoch.
//!
//! # Architecture
//!
//! ```text
//! SeqArena<BLOCK_SIZE>
//! ├── head ──▶ Block ──▶ Block ──▶ Block ──▶ None
//! │                        ▲
//! ├── tail ────────────────┘   (block being filled)
//! └── cursor                   (offset of the first free byte in tail)
//! ```
//!
//! No allocation straddles two blocks. Block geometry is a const generic
//! checked at compile time: a `BLOCK_SIZE` of 128 bytes or less, or a type
//! larger than a block, is a build error.
//!
//! # Errors
//!
//! Runtime failures are [`ArenaError`] values, never panics:
//! an alignment that can never be satisfied with the chosen block size is
//! [`ArenaError::AlignmentUnsatisfiable`], distinct from
//! [`ArenaError::OutOfMemory`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod arena;
mod block;
pub mod config;
pub mod error;
pub mod raw;

// Public re-exports for the primary API surface.
pub use arena::SeqArena;
pub use config::{DEFAULT_BLOCK_SIZE, MIN_BLOCK_SIZE};
pub use error::ArenaError;
