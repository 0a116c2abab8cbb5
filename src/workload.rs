//! Synthetic access patterns that drive fault traffic through a session.
//!
//! Each workload only sees the session's `load`/`store` surface, so every
//! byte it touches transits the protection check and, when capabilities are
//! missing, the fault dispatcher. After running, each workload verifies its
//! own results, which doubles as an end-to-end check that the paging
//! machinery never corrupted data.

use crate::page_table::PAGE_SIZE;
use crate::pager::Pager;
use anyhow::{ensure, Result};
use rand::distributions::Distribution;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::info;
use zipf::ZipfDistribution;

/// Read-modify-write accesses issued per virtual page by the focus workload.
const FOCUS_ACCESSES_PER_PAGE: usize = 256;

/// Zipf exponent for the focus workload's page popularity. Just above 1 so a
/// handful of pages absorb most of the traffic while the tail still gets
/// touched.
const FOCUS_SKEW: f64 = 1.1;

/// The access patterns a run can replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Workload {
    /// Random fill followed by an in-place sort of the whole space.
    Sort,
    /// One sequential write pass, then a sequential read-back pass.
    Scan,
    /// Read-modify-write traffic concentrated on a few hot pages.
    Focus,
}

impl Workload {
    /// Runs the pattern over the whole of `pager`'s address space, seeding
    /// any randomness from `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the workload's self-check fails afterwards, which
    /// would mean the paging machinery corrupted data in flight.
    pub fn run(self, pager: &mut Pager, seed: u64) -> Result<()> {
        match self {
            Workload::Sort => sort(pager, seed),
            Workload::Scan => scan(pager),
            Workload::Focus => focus(pager, seed),
        }
    }
}

/// Writes every byte in order, then reads every byte back into a checksum.
fn scan(pager: &mut Pager) -> Result<()> {
    let nbytes = pager.virt_size();

    for addr in 0..nbytes {
        pager.store(addr, addr as u8);
    }

    let mut sum: u64 = 0;
    for addr in 0..nbytes {
        sum += u64::from(pager.load(addr));
    }

    let expected: u64 = (0..nbytes).map(|addr| (addr & 0xFF) as u64).sum();
    ensure!(
        sum == expected,
        "scan read back checksum {sum}, expected {expected}"
    );

    info!(nbytes, sum, "scan complete");
    Ok(())
}

/// Fills the space with random bytes, quicksorts it in place, then verifies
/// ascending order.
fn sort(pager: &mut Pager, seed: u64) -> Result<()> {
    let nbytes = pager.virt_size();
    let mut rng = StdRng::seed_from_u64(seed);

    for addr in 0..nbytes {
        pager.store(addr, rng.gen());
    }

    quicksort(pager, 0, nbytes);

    for addr in 1..nbytes {
        ensure!(
            pager.load(addr - 1) <= pager.load(addr),
            "sort left bytes {} and {} out of order",
            addr - 1,
            addr
        );
    }

    info!(nbytes, "sort complete");
    Ok(())
}

/// Issues read-modify-write accesses whose page numbers follow a Zipf
/// distribution, so a few hot pages see most of the traffic.
fn focus(pager: &mut Pager, seed: u64) -> Result<()> {
    let npages = pager.virt_size() / PAGE_SIZE;
    let mut rng = StdRng::seed_from_u64(seed);
    let popularity =
        ZipfDistribution::new(npages, FOCUS_SKEW).expect("a session has at least one page");

    let accesses = npages * FOCUS_ACCESSES_PER_PAGE;
    let mut sum: u64 = 0;

    for _ in 0..accesses {
        // Ranks are 1-based; rank 1 is the hottest page.
        let page = popularity.sample(&mut rng) - 1;
        let offset = rng.gen_range(0..PAGE_SIZE);
        let addr = page * PAGE_SIZE + offset;

        let value = pager.load(addr);
        sum = sum.wrapping_add(u64::from(value));
        pager.store(addr, value.wrapping_add(1));
    }

    info!(accesses, sum, "focus complete");
    Ok(())
}

/// Iterative three-way quicksort over the half-open byte range `[lo, hi)` of
/// virtual memory.
///
/// Three-way partitioning matters here: the value domain is only 256 bytes
/// wide, so equal runs are long and a two-way partition would degrade
/// quadratically on them. The explicit stack keeps pathological pivots from
/// overflowing the call stack.
fn quicksort(pager: &mut Pager, lo: usize, hi: usize) {
    let mut ranges = vec![(lo, hi)];

    while let Some((lo, hi)) = ranges.pop() {
        if hi - lo < 2 {
            continue;
        }

        let pivot = pager.load(lo + (hi - lo) / 2);

        // Partition into [lo, lt) < pivot, [lt, gt) == pivot, [gt, hi) > pivot.
        let (mut lt, mut i, mut gt) = (lo, lo, hi);
        while i < gt {
            let value = pager.load(i);
            if value < pivot {
                swap_bytes(pager, i, lt);
                lt += 1;
                i += 1;
            } else if value > pivot {
                gt -= 1;
                swap_bytes(pager, i, gt);
            } else {
                i += 1;
            }
        }

        ranges.push((lo, lt));
        ranges.push((gt, hi));
    }
}

/// Swaps two bytes of virtual memory through the faulting access path.
fn swap_bytes(pager: &mut Pager, a: usize, b: usize) {
    if a == b {
        return;
    }

    let (va, vb) = (pager.load(a), pager.load(b));
    pager.store(a, vb);
    pager.store(b, va);
}
