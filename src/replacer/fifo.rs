use super::Replacer;
use crate::frame_table::FrameTable;
use crate::page_table::{FrameId, PageTable};

/// Evicts frames in strict round-robin order.
///
/// The cursor advances exactly once per invocation, modulo the frame count.
/// Because free frames are handed out in ascending order before this policy
/// is ever consulted, the first frame ever filled is also the first victim,
/// no matter how recently it was touched.
#[derive(Default)]
pub struct Fifo {
    /// The next victim frame. Always below the frame count.
    cursor: usize,
}

impl Fifo {
    /// Creates the policy with its cursor at frame 0.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Replacer for Fifo {
    fn choose_victim(&mut self, frames: &FrameTable, _pages: &PageTable) -> FrameId {
        let victim = self.cursor;
        self.cursor = (self.cursor + 1) % frames.frame_count();
        victim
    }
}
