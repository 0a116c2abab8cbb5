//! End-to-end fault-accounting scenarios: known access sequences against
//! small address spaces, with exact counter and victim-order expectations.

use virtmem::page_table::PageState;
use virtmem::pager::{Pager, Stats};
use virtmem::replacer::Policy;
use virtmem::workload::Workload;
use virtmem::PAGE_SIZE;

const SEED: u64 = 62087;

fn pager(npages: usize, nframes: usize, policy: Policy) -> Pager {
    Pager::new(npages, nframes, policy.build(SEED))
}

/// Verifies the exclusivity invariant: the frame table and page table agree,
/// and no two pages claim the same frame.
fn assert_consistent(pager: &Pager) {
    let pages = pager.page_table();
    let frames = pager.frame_table();

    let mut claims = vec![0usize; pages.frame_count()];

    for page in 0..pages.page_count() {
        if let (Some(frame), _) = pages.get(page) {
            claims[frame] += 1;
            assert_eq!(
                frames.resident(frame),
                Some(page),
                "page {page} claims frame {frame} but the frame table disagrees"
            );
        }
    }

    for (frame, &count) in claims.iter().enumerate() {
        assert!(count <= 1, "frame {frame} is claimed by {count} pages");
        if count == 0 {
            assert_eq!(frames.resident(frame), None);
        }
    }
}

#[test]
fn single_frame_dirty_eviction() {
    let mut p = pager(2, 1, Policy::Fifo);

    p.load(0); // Load page 0.
    p.store(0, 7); // Upgrade page 0 to writable.
    p.load(PAGE_SIZE); // Load page 1, evicting dirty page 0.

    // Three dispatcher invocations: the load of page 0, the in-place upgrade
    // of page 0, and the load of page 1.
    assert_eq!(
        p.stats(),
        Stats {
            disk_reads: 2,
            disk_writes: 1,
            page_faults: 3,
        }
    );

    assert_eq!(p.page_table().state(0), PageState::Absent);
    assert_eq!(p.page_table().state(1), PageState::Readable);
    assert_consistent(&p);

    // The write-back preserved page 0's data.
    assert_eq!(p.load(0), 7);
}

#[test]
fn read_before_write_two_step() {
    let mut p = pager(1, 1, Policy::Fifo);

    // A write to an absent page never goes straight to writable: the first
    // fault installs it readable, the retry faults again and dirties it.
    p.store(0, 1);

    assert_eq!(p.page_table().state(0), PageState::Writable);
    assert_eq!(p.stats().page_faults, 2);
    assert_eq!(p.stats().disk_reads, 1);
    assert_eq!(p.stats().disk_writes, 0);
}

#[test]
fn fifo_evicts_first_loaded_first() {
    let mut p = pager(4, 2, Policy::Fifo);

    for page in 0..4 {
        p.load(page * PAGE_SIZE);
    }

    // Pages 0 and 1 filled the two frames; loading 2 and 3 evicted them in
    // that order, regardless of recency.
    assert_eq!(p.page_table().state(0), PageState::Absent);
    assert_eq!(p.page_table().state(1), PageState::Absent);
    assert_eq!(p.page_table().get(2).0, Some(0));
    assert_eq!(p.page_table().get(3).0, Some(1));
    assert_consistent(&p);
}

#[test]
fn fifo_victims_cover_every_frame_per_cycle() {
    let mut p = pager(9, 3, Policy::Fifo);

    // Fill all three frames, then force six more evictions: two full cycles,
    // each hitting frames 0, 1, 2 in ascending order.
    for page in 0..9 {
        p.load(page * PAGE_SIZE);
    }

    assert_eq!(p.page_table().get(6).0, Some(0));
    assert_eq!(p.page_table().get(7).0, Some(1));
    assert_eq!(p.page_table().get(8).0, Some(2));
    assert_eq!(p.stats().disk_reads, 9);
    assert_eq!(p.stats().disk_writes, 0);
}

#[test]
fn clean_preferring_policy_avoids_write_backs_when_all_clean() {
    let mut p = pager(4, 2, Policy::Custom);

    // Read-only traffic: every resident page stays clean, so no eviction may
    // ever cost a disk write.
    for page in 0..4 {
        p.load(page * PAGE_SIZE);
    }

    assert_eq!(p.stats().disk_reads, 4);
    assert_eq!(p.stats().disk_writes, 0);
    assert_consistent(&p);
}

#[test]
fn scan_counters_add_up_exactly() {
    let mut p = pager(4, 2, Policy::Fifo);

    Workload::Scan.run(&mut p, SEED).unwrap();

    // Write pass: pages 0 and 1 fill the free frames, pages 2 and 3 evict
    // them dirty (2 writes). Each page costs a load fault plus an upgrade
    // fault. Read pass: pages 0 and 1 evict dirty pages 2 and 3 (2 more
    // writes); pages 2 and 3 then evict the now-clean pages 0 and 1. Eight
    // loads in total, four faults per page.
    assert_eq!(
        p.stats(),
        Stats {
            disk_reads: 8,
            disk_writes: 4,
            page_faults: 12,
        }
    );
    assert_consistent(&p);
}

#[test]
fn counters_track_loads_and_dirty_evictions() {
    let mut p = pager(3, 1, Policy::Fifo);

    p.store(0, 1); // Load + dirty page 0.
    p.load(PAGE_SIZE); // Evict dirty page 0, load page 1.
    p.load(2 * PAGE_SIZE); // Evict clean page 1, load page 2.
    p.store(2 * PAGE_SIZE, 9); // Upgrade page 2 in place.

    // Reads count load-ins, writes count dirty evictions, faults count every
    // dispatcher invocation: three loads plus the two in-place upgrades.
    assert_eq!(
        p.stats(),
        Stats {
            disk_reads: 3,
            disk_writes: 1,
            page_faults: 5,
        }
    );
}

#[test]
fn all_policies_and_workloads_leave_consistent_tables() {
    for policy in [Policy::Rand, Policy::Fifo, Policy::Custom] {
        for workload in [Workload::Sort, Workload::Scan, Workload::Focus] {
            let mut p = pager(6, 3, policy);

            workload.run(&mut p, SEED).unwrap();

            assert_consistent(&p);

            let stats = p.stats();
            assert!(stats.disk_reads >= 1);
            assert!(stats.page_faults >= stats.disk_reads);
        }
    }
}
