//! Catalog module orchestrator.
//!
//! `Cinema` maps case-folded titles to screens and is the validation
//! boundary consumed by the console layer.

mod core;

pub use core::{BookingConfig, Cinema};
