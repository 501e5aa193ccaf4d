//! Allocation policy module orchestrator.
//!
//! Two narrow seams: `SeatSelectionPolicy` picks exact seat indices inside a
//! row, `RowSelectionPolicy` walks rows and spills unmet demand forward.
//! Both are injected into the screen orchestrator as trait objects, so a
//! different house style of seating can be swapped in without touching the
//! orchestration code.

mod cascade;
mod seat;

pub use cascade::{RowCascadePolicy, RowSelectionPolicy};
pub use seat::{Allocation, CenterOutPolicy, SeatSelectionPolicy};
