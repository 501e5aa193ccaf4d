//! Seat-allocation engine for the GIC cinema booking console.
//!
//! A `Cinema` maps titles to `Screen`s; each screen owns its seat rows, its
//! reservation table and the two allocation policies (center-out seats
//! within a row, forward cascade across rows). Reservations are held
//! tentatively, amendable any number of times, and become permanent exactly
//! once on confirmation. The interactive console in `src/bin/console.rs`
//! is a thin layer over this crate.

pub mod audit;
pub mod catalog;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod policy;
pub mod render;
pub mod reservation;
pub mod row;
pub mod screen;
pub mod seat_code;

pub use audit::{AuditEvent, AuditEventBuilder, AuditStage, BookingAudit, NullBookingAudit};
pub use catalog::{BookingConfig, Cinema};
pub use error::{BookingError, Result};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{BookingMetrics, MetricSnapshot};
pub use policy::{
    Allocation, CenterOutPolicy, RowCascadePolicy, RowSelectionPolicy, SeatSelectionPolicy,
};
pub use render::{SeatGrid, write_screen_view};
pub use reservation::{Reservation, ReservationId};
pub use row::{HoldAccounting, SeatRow, SeatState};
pub use screen::{MAX_ROWS, MAX_SEATS_PER_ROW, ReserveOutcome, Screen};
pub use seat_code::parse_seat_code;
