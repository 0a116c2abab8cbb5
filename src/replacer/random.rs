use super::Replacer;
use crate::frame_table::FrameTable;
use crate::page_table::{FrameId, PageTable};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Picks victims uniformly at random.
///
/// Keeps no history between calls and ignores dirty state entirely, so it may
/// force a write-back even when a clean frame was available. It exists as the
/// baseline the other policies are measured against.
pub struct Random {
    /// Seeded once per run so victim sequences are reproducible.
    rng: StdRng,
}

impl Random {
    /// Creates the policy with its generator seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Replacer for Random {
    fn choose_victim(&mut self, frames: &FrameTable, _pages: &PageTable) -> FrameId {
        self.rng.gen_range(0..frames.frame_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_table::PageTable;

    #[test]
    fn victims_stay_in_range() {
        let frames = FrameTable::new(3);
        let pages = PageTable::new(8, 3);
        let mut policy = Random::new(62087);

        for _ in 0..100 {
            assert!(policy.choose_victim(&frames, &pages) < 3);
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let frames = FrameTable::new(5);
        let pages = PageTable::new(8, 5);

        let mut a = Random::new(42);
        let mut b = Random::new(42);

        for _ in 0..20 {
            assert_eq!(
                a.choose_victim(&frames, &pages),
                b.choose_victim(&frames, &pages)
            );
        }
    }
}
