use super::Replacer;
use crate::frame_table::FrameTable;
use crate::page_table::{FrameId, PageState, PageTable};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Samples a bounded number of random frames and prefers a clean victim.
///
/// Candidates are drawn uniformly with repetition and scanned in draw order;
/// the first one whose resident page is not writable wins, since evicting it
/// costs no write-back. If every candidate is dirty, the policy settles for
/// the last candidate drawn rather than sampling indefinitely. The fallback
/// to the last (rather than, say, the first) candidate is a tunable
/// tie-break, not a load-bearing choice.
pub struct CleanSample {
    /// Seeded once per run so victim sequences are reproducible.
    rng: StdRng,

    /// Candidates drawn per eviction.
    samples: usize,
}

impl CleanSample {
    /// The default number of candidates drawn per eviction. Ten keeps the
    /// odds of missing an available clean frame low without approaching the
    /// bookkeeping cost of true LRU.
    pub const SAMPLES: usize = 10;

    /// Creates the policy with [`Self::SAMPLES`] candidates per eviction.
    pub fn new(seed: u64) -> Self {
        Self::with_samples(seed, Self::SAMPLES)
    }

    /// Creates the policy with a custom sample width.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is zero; the policy must draw at least one
    /// candidate to have a fallback victim.
    pub fn with_samples(seed: u64, samples: usize) -> Self {
        assert!(samples >= 1, "the sample width must be at least 1");

        Self {
            rng: StdRng::seed_from_u64(seed),
            samples,
        }
    }
}

impl Replacer for CleanSample {
    fn choose_victim(&mut self, frames: &FrameTable, pages: &PageTable) -> FrameId {
        let mut last = 0;

        for _ in 0..self.samples {
            let frame = self.rng.gen_range(0..frames.frame_count());
            last = frame;

            let page = frames
                .resident(frame)
                .expect("the replacer is only consulted once every frame is occupied");

            if pages.state(page) != PageState::Writable {
                return frame;
            }
        }

        last
    }
}
