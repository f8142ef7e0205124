//! Tracking-store backends.

mod memory;
mod sheets;

pub use memory::MemoryTracker;
pub use sheets::{SheetsTracker, SheetsTrackerOptions};
