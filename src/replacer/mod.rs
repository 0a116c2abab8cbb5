//! Replacement policies: choosing which frame to evict when no frame is free.
//!
//! A replacer is consulted only once the frame table is saturated, so every
//! frame it inspects has a resident page. Policies pick a victim frame and
//! nothing more; the swap engine owns the actual write-back and load-in.

mod clean;
mod fifo;
mod random;

pub use clean::CleanSample;
pub use fifo::Fifo;
pub use random::Random;

use crate::frame_table::FrameTable;
use crate::page_table::{FrameId, PageTable};

/// A pluggable eviction-target selector.
pub trait Replacer {
    /// Picks the frame whose resident page should be evicted next.
    ///
    /// The returned frame is always in `[0, frame_count)`. Implementations
    /// may consult the page table (for dirty bits) but must not mutate
    /// anything outside their own bookkeeping.
    fn choose_victim(&mut self, frames: &FrameTable, pages: &PageTable) -> FrameId;
}

/// The replacement policies a run can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Policy {
    /// Uniform random victim, with no preference for clean frames.
    Rand,
    /// Strict round-robin victim order, independent of access recency.
    Fifo,
    /// Random sample of frames, preferring a clean one to avoid write-backs.
    Custom,
}

impl Policy {
    /// Builds the replacer value for this policy, seeding any randomness
    /// from `seed`.
    pub fn build(self, seed: u64) -> Box<dyn Replacer> {
        match self {
            Policy::Rand => Box::new(Random::new(seed)),
            Policy::Fifo => Box::new(Fifo::new()),
            Policy::Custom => Box::new(CleanSample::new(seed)),
        }
    }
}
