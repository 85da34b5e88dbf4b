//! Benchmark workloads for the seqalloc arena.
//!
//! Provides deterministic, heterogeneous allocation mixes for benchmarks and
//! examples:
//!
//! - [`frame_kinds`]: a seeded sequence of object kinds for one frame
//! - [`fill_frame`]: allocate a frame into a [`SeqArena`]
//! - [`fill_boxed`]: the same frame through the global allocator, as a
//!   baseline

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use seqalloc::{ArenaError, SeqArena};

/// A simulated particle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    /// Position.
    pub pos: [f32; 3],
    /// Velocity.
    pub vel: [f32; 3],
    /// Remaining lifetime in ticks.
    pub ttl: u32,
}

/// A logged event with a small inline payload.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Event {
    /// Tick the event was raised on.
    pub tick: u64,
    /// Event discriminator.
    pub kind: u16,
    /// Opaque payload.
    pub payload: [u8; 22],
}

/// A contact pair, cache-line aligned.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(align(64))]
pub struct Contact {
    /// First body.
    pub a: u32,
    /// Second body.
    pub b: u32,
    /// Contact normal.
    pub normal: [f32; 3],
    /// Penetration depth.
    pub depth: f32,
}

/// Which object a frame slot allocates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    /// A [`Particle`].
    Particle,
    /// An [`Event`].
    Event,
    /// A [`Contact`].
    Contact,
}

/// Generate `n` object kinds from `seed`.
///
/// Roughly 60% particles, 30% events and 10% contacts.
pub fn frame_kinds(n: usize, seed: u64) -> Vec<Kind> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            match (state >> 33) % 10 {
                0..=5 => Kind::Particle,
                6..=8 => Kind::Event,
                _ => Kind::Contact,
            }
        })
        .collect()
}

/// Allocate one object per entry of `kinds` into `arena`.
///
/// Returns the number of object bytes written, padding excluded.
pub fn fill_frame<const N: usize>(
    arena: &SeqArena<N>,
    kinds: &[Kind],
) -> Result<usize, ArenaError> {
    let mut bytes = 0;
    for (i, kind) in kinds.iter().enumerate() {
        bytes += match kind {
            Kind::Particle => {
                arena.alloc(Particle {
                    ttl: i as u32,
                    ..Particle::default()
                })?;
                std::mem::size_of::<Particle>()
            }
            Kind::Event => {
                arena.alloc(Event {
                    tick: i as u64,
                    ..Event::default()
                })?;
                std::mem::size_of::<Event>()
            }
            Kind::Contact => {
                arena.alloc(Contact {
                    a: i as u32,
                    ..Contact::default()
                })?;
                std::mem::size_of::<Contact>()
            }
        };
    }
    Ok(bytes)
}

/// Baseline: box every object of the frame individually.
///
/// Returns the number of object bytes allocated; every box is freed before
/// returning.
pub fn fill_boxed(kinds: &[Kind]) -> usize {
    let mut particles = Vec::new();
    let mut events = Vec::new();
    let mut contacts = Vec::new();
    for (i, kind) in kinds.iter().enumerate() {
        match kind {
            Kind::Particle => particles.push(Box::new(Particle {
                ttl: i as u32,
                ..Particle::default()
            })),
            Kind::Event => events.push(Box::new(Event {
                tick: i as u64,
                ..Event::default()
            })),
            Kind::Contact => contacts.push(Box::new(Contact {
                a: i as u32,
                ..Contact::default()
            })),
        }
    }
    particles.len() * std::mem::size_of::<Particle>()
        + events.len() * std::mem::size_of::<Event>()
        + contacts.len() * std::mem::size_of::<Contact>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_kinds_is_deterministic() {
        assert_eq!(frame_kinds(500, 7), frame_kinds(500, 7));
        assert_ne!(frame_kinds(500, 7), frame_kinds(500, 8));
    }

    #[test]
    fn frame_kinds_mixes_all_kinds() {
        let kinds = frame_kinds(1_000, 42);
        for k in [Kind::Particle, Kind::Event, Kind::Contact] {
            assert!(kinds.contains(&k));
        }
    }

    #[test]
    fn arena_and_boxed_account_the_same_bytes() {
        let kinds = frame_kinds(1_000, 42);
        let arena: SeqArena = SeqArena::new().unwrap();
        assert_eq!(fill_frame(&arena, &kinds).unwrap(), fill_boxed(&kinds));
        assert!(arena.block_count() > 1);
    }
}
