//! The disk: a fixed-size array of page-sized blocks with indexed,
//! synchronous, non-failing reads and writes.
//!
//! Swap-space allocation is the identity mapping: disk block `i` backs
//! virtual page `i`, so the store holds exactly one block per page.

use crate::page_table::PAGE_SIZE;

/// A reliable, synchronous block store backing a virtual address space.
pub struct Disk {
    /// All blocks, allocated up front as one flat zeroed buffer.
    data: Vec<u8>,

    /// The number of `PAGE_SIZE`d blocks in `data`.
    nblocks: usize,
}

impl Disk {
    /// Creates a zero-filled disk of `nblocks` page-sized blocks.
    pub fn new(nblocks: usize) -> Self {
        Self {
            data: vec![0; nblocks * PAGE_SIZE],
            nblocks,
        }
    }

    /// The number of blocks this disk holds.
    pub fn block_count(&self) -> usize {
        self.nblocks
    }

    /// Copies block `block` into `dest`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is out of range or `dest` is not exactly one block
    /// long; both indicate a defect in the caller, not a recoverable failure.
    pub fn read_block(&self, block: usize, dest: &mut [u8]) {
        assert!(block < self.nblocks, "block {block} is out of range");
        assert_eq!(dest.len(), PAGE_SIZE);

        dest.copy_from_slice(&self.data[block * PAGE_SIZE..][..PAGE_SIZE]);
    }

    /// Copies `src` into block `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` is out of range or `src` is not exactly one block
    /// long.
    pub fn write_block(&mut self, block: usize, src: &[u8]) {
        assert!(block < self.nblocks, "block {block} is out of range");
        assert_eq!(src.len(), PAGE_SIZE);

        self.data[block * PAGE_SIZE..][..PAGE_SIZE].copy_from_slice(src);
    }
}
