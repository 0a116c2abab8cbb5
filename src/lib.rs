//! A demand-paged virtual memory simulator.
//!
//! A synthetic virtual address space routes every byte access through a
//! protection check. Accesses lacking the required capability raise a page
//! fault, and the fault dispatcher resolves it by upgrading protection bits in
//! place, installing the page into a free frame, or evicting a victim chosen
//! by a pluggable replacement policy. Synthetic workloads (sequential scan,
//! in-place sort, hot-page focus) drive the fault traffic, and each run
//! reports its disk writes, disk reads, and page fault count.

#![warn(missing_docs)]
#![warn(clippy::missing_errors_doc)]
#![warn(clippy::missing_panics_doc)]

pub mod disk;
pub mod frame_table;
pub mod page_table;
pub mod pager;
pub mod replacer;
pub mod workload;

pub use page_table::{FrameId, PageId, PAGE_SIZE};
