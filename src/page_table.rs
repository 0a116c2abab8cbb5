//! The page table: maps virtual page numbers to physical frames plus a small
//! capability bitmask.
//!
//! The table is indexed by page. The reverse mapping, which eviction needs, is
//! kept separately in a [`FrameTable`](crate::frame_table::FrameTable).

use bitflags::bitflags;
use std::fmt;

/// The size of a virtual page and of a physical frame, in bytes.
pub const PAGE_SIZE: usize = 1 << 12; // 4096

/// A virtual page number.
pub type PageId = usize;

/// A physical frame number.
pub type FrameId = usize;

bitflags! {
    /// Capability bits attached to a page table entry.
    ///
    /// `WRITE` doubles as the dirty bit. A page is always installed with
    /// `READ` only, so the first write to it faults again, and that second
    /// fault is the one (and only) place `WRITE` is ever set. A resident page
    /// carrying `WRITE` is therefore exactly a page whose frame contents have
    /// diverged from its disk block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ProtFlags: u8 {
        /// The page may be read.
        const READ = 1 << 0;
        /// The page may be written. Always accompanied by `READ`.
        const WRITE = 1 << 1;
    }
}

/// The logical state of a virtual page, derived from its entry's bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// No valid mapping.
    Absent,
    /// Resident and readable; its frame matches its disk block.
    Readable,
    /// Resident, readable, and writable; its frame is dirty.
    Writable,
}

/// One page table entry. The frame number is meaningless while the flags are
/// empty.
#[derive(Debug, Clone, Copy, Default)]
struct Entry {
    frame: FrameId,
    flags: ProtFlags,
}

/// Maps virtual page numbers to resident frames and capability bits.
pub struct PageTable {
    /// One entry per virtual page, all absent at construction.
    entries: Vec<Entry>,

    /// The number of physical frames entries may legally name.
    nframes: usize,
}

impl PageTable {
    /// Creates a table of `npages` absent entries over `nframes` frames.
    pub fn new(npages: usize, nframes: usize) -> Self {
        Self {
            entries: vec![Entry::default(); npages],
            nframes,
        }
    }

    /// Returns the entry for `page`: its frame, if resident, and its bits.
    pub fn get(&self, page: PageId) -> (Option<FrameId>, ProtFlags) {
        let entry = self.entries[page];

        if entry.flags.contains(ProtFlags::READ) {
            (Some(entry.frame), entry.flags)
        } else {
            (None, entry.flags)
        }
    }

    /// Installs or updates the mapping for `page`.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is out of range; entries never name frames that do
    /// not exist.
    pub fn set(&mut self, page: PageId, frame: FrameId, flags: ProtFlags) {
        assert!(frame < self.nframes, "frame {frame} is out of range");
        debug_assert!(
            !flags.contains(ProtFlags::WRITE) || flags.contains(ProtFlags::READ),
            "a writable page must also be readable"
        );

        self.entries[page] = Entry { frame, flags };
    }

    /// Drops the mapping for `page` entirely.
    pub fn clear(&mut self, page: PageId) {
        self.entries[page] = Entry::default();
    }

    /// The derived logical state of `page`.
    pub fn state(&self, page: PageId) -> PageState {
        let flags = self.entries[page].flags;

        if flags.contains(ProtFlags::WRITE) {
            PageState::Writable
        } else if flags.contains(ProtFlags::READ) {
            PageState::Readable
        } else {
            PageState::Absent
        }
    }

    /// The number of virtual pages this table covers.
    pub fn page_count(&self) -> usize {
        self.entries.len()
    }

    /// The number of physical frames entries may name.
    pub fn frame_count(&self) -> usize {
        self.nframes
    }
}

impl fmt::Display for PageTable {
    /// Dumps every resident mapping, one `page -> frame [bits]` line each.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (page, entry) in self.entries.iter().enumerate() {
            if entry.flags.contains(ProtFlags::READ) {
                let mode = if entry.flags.contains(ProtFlags::WRITE) {
                    "RW"
                } else {
                    "R-"
                };
                writeln!(f, "page {page:4} -> frame {:4} [{mode}]", entry.frame)?;
            }
        }

        Ok(())
    }
}
