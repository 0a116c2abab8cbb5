//! The frame table: the session's private reverse mapping from physical
//! frames to the pages resident in them.
//!
//! The page table is indexed by page, but eviction starts from a frame, so
//! the session mirrors occupancy here. At most one page may claim a frame at
//! a time; [`FrameTable::assign`] enforces that a frame is cleared before it
//! is reused.

use crate::page_table::{FrameId, PageId};

/// Tracks, per physical frame, which page (if any) currently occupies it.
pub struct FrameTable {
    /// `residents[f]` is the page occupying frame `f`, or `None` if free.
    residents: Vec<Option<PageId>>,
}

impl FrameTable {
    /// Creates a table of `nframes` free frames.
    pub fn new(nframes: usize) -> Self {
        Self {
            residents: vec![None; nframes],
        }
    }

    /// The first free frame in ascending order, or `None` once saturated.
    ///
    /// The scan order is deterministic so that frame assignment, and with it
    /// the FIFO victim sequence, is reproducible across runs.
    pub fn find_free(&self) -> Option<FrameId> {
        self.residents.iter().position(Option::is_none)
    }

    /// Records that `frame` now holds `page`.
    ///
    /// # Panics
    ///
    /// Panics if `frame` is already occupied: an occupant must be evicted
    /// (and the frame cleared) before the frame is handed to another page.
    pub fn assign(&mut self, frame: FrameId, page: PageId) {
        assert!(
            self.residents[frame].is_none(),
            "frame {frame} is still occupied"
        );

        self.residents[frame] = Some(page);
    }

    /// Marks `frame` free.
    pub fn clear(&mut self, frame: FrameId) {
        self.residents[frame] = None;
    }

    /// The page occupying `frame`, if any.
    pub fn resident(&self, frame: FrameId) -> Option<PageId> {
        self.residents[frame]
    }

    /// The number of frames this table covers.
    pub fn frame_count(&self) -> usize {
        self.residents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_scan_is_ascending() {
        let mut ft = FrameTable::new(3);

        assert_eq!(ft.find_free(), Some(0));
        ft.assign(0, 7);
        assert_eq!(ft.find_free(), Some(1));
        ft.assign(1, 8);
        ft.assign(2, 9);
        assert_eq!(ft.find_free(), None);

        ft.clear(1);
        assert_eq!(ft.find_free(), Some(1));
    }

    #[test]
    fn tracks_residents() {
        let mut ft = FrameTable::new(2);

        ft.assign(1, 5);
        assert_eq!(ft.resident(1), Some(5));
        assert_eq!(ft.resident(0), None);

        ft.clear(1);
        assert_eq!(ft.resident(1), None);
    }

    #[test]
    #[should_panic(expected = "still occupied")]
    fn rejects_double_assignment() {
        let mut ft = FrameTable::new(1);
        ft.assign(0, 1);
        ft.assign(0, 2);
    }
}
