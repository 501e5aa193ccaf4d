use thiserror::Error;

/// Unified result type for the booking crate.
pub type Result<T> = std::result::Result<T, BookingError>;

/// Errors surfaced by the seat-allocation engine.
///
/// A capacity shortfall is not an error: it is reported through
/// `ReserveOutcome::Shortfall` and the caller may retry with fewer tickets.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("screen title must not be empty")]
    EmptyTitle,
    #[error("no screen registered for title `{0}`")]
    UnknownTitle(String),
    #[error("row count {0} outside 1..=26")]
    InvalidRowCount(usize),
    #[error("seats per row {0} outside 1..=50")]
    InvalidSeatsPerRow(usize),
    #[error("ticket count must be at least 1")]
    InvalidTicketCount,
    #[error("start seat (row {row}, col {col}) outside the screen")]
    InvalidStartSeat { row: usize, col: usize },
    #[error("reservation `{0}` not found")]
    UnknownReservation(String),
    #[error("reservation `{0}` is already confirmed")]
    AlreadyConfirmed(String),
    #[error("{unplaced} of {requested} tickets left unplaced after a passed availability check")]
    InvariantViolation { requested: usize, unplaced: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
