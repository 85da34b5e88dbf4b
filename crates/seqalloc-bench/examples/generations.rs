//! Epoch-managed allocation example.
//!
//! Demonstrates: allocate a generation of objects → destroy the ones that
//! own resources → rewind with clean (keep blocks) → repeat → release extra
//! blocks with reset.

use seqalloc::raw;
use seqalloc::SeqArena;

/// An arena-resident message that owns a heap string.
struct Message {
    id: u32,
    body: String,
}

fn main() -> Result<(), seqalloc::ArenaError> {
    println!("=== seqalloc generations example ===\n");

    let mut arena: SeqArena<1024> = SeqArena::new()?;

    for generation in 0..3u32 {
        let count = 50 * (generation + 1);
        let mut live: Vec<&mut Message> = Vec::with_capacity(count as usize);
        for id in 0..count {
            live.push(arena.alloc(Message {
                id,
                body: format!("gen {generation} msg {id}"),
            })?);
        }
        let last = live.last().map(|m| (m.id, m.body.clone()));

        // The arena never drops values: release each String before rewinding.
        for msg in live {
            unsafe { raw::destroy(msg as *mut Message) };
        }

        println!(
            "generation {generation}: {count} messages, {} blocks, last = {last:?}",
            arena.block_count()
        );
        arena.clean();
    }

    println!("\nbefore reset: {arena:?}");
    arena.reset();
    println!("after reset:  {arena:?}");
    Ok(())
}
