//! The simulation session: the fault dispatcher, the swap engine, and the
//! run's statistics.
//!
//! A [`Pager`] owns every piece of run state (page table, frame table,
//! physical memory, disk, replacement policy, counters), so independent
//! sessions can coexist side by side. Everything is single-threaded and
//! synchronous: a fault is an ordinary call that returns once the mapping is
//! resolved.

use crate::disk::Disk;
use crate::frame_table::FrameTable;
use crate::page_table::{FrameId, PageId, PageState, PageTable, ProtFlags, PAGE_SIZE};
use crate::replacer::Replacer;
use tracing::{debug, trace};

/// The kind of memory access that raised a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The access only needs the page to be readable.
    Read,
    /// The access needs the page to be writable.
    Write,
}

/// I/O and fault counters for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Blocks read from disk; one per load-in of an absent page.
    pub disk_reads: u64,

    /// Blocks written to disk; one per eviction of a dirty page.
    pub disk_writes: u64,

    /// Fault dispatcher invocations, protection upgrades included.
    pub page_faults: u64,
}

/// A single-threaded demand-paging session over a synthetic address space.
pub struct Pager {
    /// Forward mapping: page -> (frame, capability bits).
    pages: PageTable,

    /// Reverse mapping: frame -> resident page.
    frames: FrameTable,

    /// Physical memory, one `PAGE_SIZE` slice per frame.
    physmem: Vec<u8>,

    /// Backing store, one block per virtual page.
    disk: Disk,

    /// The eviction policy, consulted only when no frame is free.
    replacer: Box<dyn Replacer>,

    /// Counters, incremented only by the dispatcher and the swap engine.
    stats: Stats,
}

impl Pager {
    /// Creates a session over `npages` virtual pages and `nframes` physical
    /// frames, evicting through `replacer`.
    ///
    /// # Panics
    ///
    /// Panics if `npages` or `nframes` is zero.
    pub fn new(npages: usize, nframes: usize, replacer: Box<dyn Replacer>) -> Self {
        assert!(npages >= 1, "a session needs at least one virtual page");
        assert!(nframes >= 1, "a session needs at least one physical frame");

        Self {
            pages: PageTable::new(npages, nframes),
            frames: FrameTable::new(nframes),
            physmem: vec![0; nframes * PAGE_SIZE],
            disk: Disk::new(npages),
            replacer,
            stats: Stats::default(),
        }
    }

    /// The number of addressable bytes in the virtual address space.
    pub fn virt_size(&self) -> usize {
        self.pages.page_count() * PAGE_SIZE
    }

    /// The counters accumulated so far.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    /// A shared view of the page table.
    pub fn page_table(&self) -> &PageTable {
        &self.pages
    }

    /// A shared view of the frame table.
    pub fn frame_table(&self) -> &FrameTable {
        &self.frames
    }

    /// Reads one byte of virtual memory, faulting the page in if needed.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is outside the address space.
    pub fn load(&mut self, addr: usize) -> u8 {
        let (page, offset) = self.split(addr);

        // At most one fault: an absent page is installed readable.
        while !self.flags(page).contains(ProtFlags::READ) {
            self.fault(page, Access::Read);
        }

        let frame = self.frame_of(page);
        self.physmem[frame * PAGE_SIZE + offset]
    }

    /// Writes one byte of virtual memory, faulting and dirtying as needed.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is outside the address space.
    pub fn store(&mut self, addr: usize, value: u8) {
        let (page, offset) = self.split(addr);

        // At most two faults: an absent page is first installed readable,
        // and the retry upgrades it to writable.
        while !self.flags(page).contains(ProtFlags::WRITE) {
            self.fault(page, Access::Write);
        }

        let frame = self.frame_of(page);
        self.physmem[frame * PAGE_SIZE + offset] = value;
    }

    /// The page fault dispatcher, invoked whenever an access lacks a
    /// capability.
    fn fault(&mut self, page: PageId, access: Access) {
        self.stats.page_faults += 1;

        let state = self.pages.state(page);
        trace!(page, ?access, ?state, "page fault");

        match (state, access) {
            // A write hit a resident read-only page: record the dirty bit in
            // place. No frame movement, no I/O.
            (PageState::Readable, Access::Write) => {
                let (frame, flags) = self.pages.get(page);
                let frame = frame.expect("a readable page must be resident");
                self.pages.set(page, frame, flags | ProtFlags::WRITE);
            }

            // First touch: the page must be brought in from disk. A free
            // frame always takes precedence over an eviction, so the policy
            // only ever sees a saturated frame table.
            (PageState::Absent, _) => {
                let frame = match self.frames.find_free() {
                    Some(frame) => frame,
                    None => self.replacer.choose_victim(&self.frames, &self.pages),
                };

                self.swap(page, frame);
            }

            // The access path only faults on a missing capability.
            (PageState::Readable, Access::Read) | (PageState::Writable, _) => {
                unreachable!("fault on page {page} which is already {state:?}")
            }
        }
    }

    /// The swap engine: evicts whatever occupies `frame` (writing it back
    /// only when dirty) and loads `page` into it.
    ///
    /// Performs exactly one disk read and at most one disk write, and leaves
    /// the page table and frame table mutually consistent.
    fn swap(&mut self, page: PageId, frame: FrameId) {
        if let Some(victim) = self.frames.resident(frame) {
            let dirty = self.pages.state(victim) == PageState::Writable;
            debug!(victim, frame, dirty, "evicting");

            if dirty {
                self.disk
                    .write_block(victim, &self.physmem[frame * PAGE_SIZE..][..PAGE_SIZE]);
                self.stats.disk_writes += 1;
            }

            self.pages.clear(victim);
            self.frames.clear(frame);
        }

        self.disk
            .read_block(page, &mut self.physmem[frame * PAGE_SIZE..][..PAGE_SIZE]);
        self.stats.disk_reads += 1;

        self.pages.set(page, frame, ProtFlags::READ);
        self.frames.assign(frame, page);
        debug!(page, frame, "installed");

        debug_assert_eq!(self.pages.get(page).0, Some(frame));
        debug_assert_eq!(self.frames.resident(frame), Some(page));
    }

    /// Splits a virtual address into its page number and offset.
    fn split(&self, addr: usize) -> (PageId, usize) {
        assert!(
            addr < self.virt_size(),
            "virtual address {addr:#x} is out of range"
        );

        (addr / PAGE_SIZE, addr % PAGE_SIZE)
    }

    /// The current capability bits of `page`.
    fn flags(&self, page: PageId) -> ProtFlags {
        self.pages.get(page).1
    }

    /// The frame of a resident page.
    fn frame_of(&self, page: PageId) -> FrameId {
        self.pages
            .get(page)
            .0
            .expect("the fault loop only exits once the page is resident")
    }
}
