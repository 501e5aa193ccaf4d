//! Render module orchestrator.

mod core;

pub use core::{OWNED, SeatGrid, TAKEN, VACANT, write_screen_view};
