use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::audit::{AuditEventBuilder, AuditStage, BookingAudit, NullBookingAudit};
use crate::error::{BookingError, Result};
use crate::logging::{LogLevel, Logger, fields};
use crate::metrics::BookingMetrics;
use crate::policy::{CenterOutPolicy, RowCascadePolicy, RowSelectionPolicy, SeatSelectionPolicy};
use crate::render::{OWNED, SeatGrid, TAKEN, VACANT};
use crate::reservation::{Reservation, ReservationId};
use crate::row::{HoldAccounting, SeatRow};

/// Hard ceiling on rows per screen (row letters run `A..=Z`).
pub const MAX_ROWS: usize = 26;
/// Hard ceiling on seats per row (seat codes carry two digits).
pub const MAX_SEATS_PER_ROW: usize = 50;

const LOG_TARGET: &str = "cinema::screen";

/// Result of a `reserve` call that passed validation.
///
/// A shortfall is a recoverable outcome, not an error: nothing was mutated
/// and the caller may retry with fewer tickets.
#[derive(Debug, Clone)]
pub enum ReserveOutcome {
    /// Seats are held under the returned reservation snapshot.
    Reserved(Reservation),
    /// The request exceeded current availability.
    Shortfall { requested: usize, available: usize },
}

impl ReserveOutcome {
    pub fn reservation(&self) -> Option<&Reservation> {
        match self {
            ReserveOutcome::Reserved(reservation) => Some(reservation),
            ReserveOutcome::Shortfall { .. } => None,
        }
    }

    pub fn is_shortfall(&self) -> bool {
        matches!(self, ReserveOutcome::Shortfall { .. })
    }
}

/// One auditorium screen: the ordered seat rows (row 0 nearest the screen),
/// the reservation table, and the id counter, orchestrating the two injected
/// allocation policies.
///
/// A screen assumes a single logical writer; reads like `seats_available`
/// are pure aggregation over the rows.
pub struct Screen {
    title: String,
    rows: Vec<SeatRow>,
    reservations: HashMap<String, Reservation>,
    next_id: u32,
    seat_policy: Box<dyn SeatSelectionPolicy>,
    row_policy: Box<dyn RowSelectionPolicy>,
    accounting: HoldAccounting,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<BookingMetrics>>>,
    audit: Arc<dyn BookingAudit>,
}

impl Screen {
    /// Build a screen with the house policies (center-out seats, forward
    /// row cascade).
    pub fn new(title: impl Into<String>, rows: usize, seats_per_row: usize) -> Result<Self> {
        let title = title.into().trim().to_string();
        if title.is_empty() {
            return Err(BookingError::EmptyTitle);
        }
        if !(1..=MAX_ROWS).contains(&rows) {
            return Err(BookingError::InvalidRowCount(rows));
        }
        if !(1..=MAX_SEATS_PER_ROW).contains(&seats_per_row) {
            return Err(BookingError::InvalidSeatsPerRow(seats_per_row));
        }
        Ok(Self {
            title,
            rows: (0..rows).map(|_| SeatRow::new(seats_per_row)).collect(),
            reservations: HashMap::new(),
            next_id: 0,
            seat_policy: Box::new(CenterOutPolicy),
            row_policy: Box::new(RowCascadePolicy),
            accounting: HoldAccounting::default(),
            logger: None,
            metrics: None,
            audit: Arc::new(NullBookingAudit),
        })
    }

    /// Build a screen with caller-supplied policies.
    pub fn with_policies(
        title: impl Into<String>,
        rows: usize,
        seats_per_row: usize,
        seat_policy: Box<dyn SeatSelectionPolicy>,
        row_policy: Box<dyn RowSelectionPolicy>,
    ) -> Result<Self> {
        let mut screen = Self::new(title, rows, seats_per_row)?;
        screen.seat_policy = seat_policy;
        screen.row_policy = row_policy;
        Ok(screen)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn seats_per_row(&self) -> usize {
        self.rows.first().map_or(0, SeatRow::len)
    }

    pub fn seat_rows(&self) -> &[SeatRow] {
        &self.rows
    }

    pub fn reservation(&self, id: &str) -> Option<&Reservation> {
        self.reservations.get(id.trim())
    }

    pub fn set_accounting(&mut self, accounting: HoldAccounting) {
        self.accounting = accounting;
    }

    pub fn set_logger(&mut self, logger: Option<Logger>) {
        self.logger = logger;
    }

    pub fn set_metrics(&mut self, metrics: Option<Arc<Mutex<BookingMetrics>>>) {
        self.metrics = metrics;
    }

    pub fn set_audit(&mut self, audit: Arc<dyn BookingAudit>) {
        self.audit = audit;
    }

    /// Seats this screen can still sell, summed over the rows.
    pub fn seats_available(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.available_seats(self.accounting))
            .sum()
    }

    /// Hold `tickets` seats, either as a fresh reservation (empty or unknown
    /// `id`) or as a full amendment of an unconfirmed one (known `id`; the
    /// previous seat set is released first and the id is preserved).
    ///
    /// With a `start` position the designated row is filled rightward from
    /// that seat before the cascade continues on the following rows;
    /// otherwise the cascade runs from row 0.
    ///
    /// # Errors
    ///
    /// `InvalidTicketCount` for zero tickets, `InvalidStartSeat` for a start
    /// position outside the screen, `AlreadyConfirmed` when amending a
    /// confirmed reservation, and `InvariantViolation` if demand survives
    /// the cascade despite the passed availability check.
    pub fn reserve(
        &mut self,
        id: Option<&str>,
        tickets: usize,
        start: Option<(usize, usize)>,
    ) -> Result<ReserveOutcome> {
        if tickets == 0 {
            return Err(BookingError::InvalidTicketCount);
        }
        if let Some((row, col)) = start {
            if row >= self.rows.len() || col >= self.seats_per_row() {
                return Err(BookingError::InvalidStartSeat { row, col });
            }
        }

        let amend_key = match id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(key) if self.reservations.contains_key(key) => {
                if self
                    .reservations
                    .get(key)
                    .is_some_and(Reservation::is_confirmed)
                {
                    return Err(BookingError::AlreadyConfirmed(key.to_string()));
                }
                Some(key.to_string())
            }
            _ => None,
        };

        let available = self.seats_available();
        if tickets > available {
            self.note_shortfall(tickets, available);
            return Ok(ReserveOutcome::Shortfall {
                requested: tickets,
                available,
            });
        }

        if let Some(key) = &amend_key {
            let old = match self.reservations.get(key) {
                Some(reservation) => reservation.seats().clone(),
                None => BTreeMap::new(),
            };
            for (&row, cols) in &old {
                self.rows[row].release(self.seat_policy.as_ref(), cols);
            }
        }

        let mut placed: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut remaining = tickets;
        let cascade_from = match start {
            Some((row, col)) => {
                let claimed =
                    self.rows[row].reserve_from(self.seat_policy.as_ref(), col, remaining);
                if !claimed.is_empty() {
                    remaining -= claimed.len();
                    placed.insert(row, claimed);
                }
                row + 1
            }
            None => 0,
        };
        if remaining > 0 {
            remaining = self.row_policy.allocate_across_rows(
                &mut self.rows,
                self.seat_policy.as_ref(),
                cascade_from,
                remaining,
                &mut placed,
            );
        }
        if remaining > 0 {
            // The availability precheck passed, so running out of empty
            // seats mid-cascade is a broken contract, not a user error.
            if let Some(logger) = &self.logger {
                let _ = logger.log_with_fields(
                    LogLevel::Error,
                    LOG_TARGET,
                    "cascade_shortfall_after_precheck",
                    fields([
                        ("screen", json!(self.title)),
                        ("requested", json!(tickets)),
                        ("unplaced", json!(remaining)),
                    ]),
                );
            }
            return Err(BookingError::InvariantViolation {
                requested: tickets,
                unplaced: remaining,
            });
        }

        match amend_key {
            Some(key) => {
                let snapshot = {
                    let reservation = self
                        .reservations
                        .get_mut(&key)
                        .ok_or_else(|| BookingError::UnknownReservation(key.clone()))?;
                    reservation.replace_seats(placed);
                    reservation.clone()
                };
                self.note_amended(&snapshot, tickets);
                Ok(ReserveOutcome::Reserved(snapshot))
            }
            None => {
                let rid = ReservationId::from_counter(self.next_id);
                self.next_id += 1;
                let reservation = Reservation::new(rid.clone(), placed);
                self.reservations
                    .insert(rid.as_str().to_string(), reservation.clone());
                self.note_created(&reservation, tickets);
                Ok(ReserveOutcome::Reserved(reservation))
            }
        }
    }

    /// Make a reservation's held seats permanent. Returns `true` when the
    /// state changed; confirming an already-confirmed reservation is a
    /// no-op returning `false`.
    ///
    /// # Errors
    ///
    /// `UnknownReservation` for an empty or unrecognized id.
    pub fn confirm_reservation(&mut self, id: &str) -> Result<bool> {
        let id = id.trim();
        if id.is_empty() {
            return Err(BookingError::UnknownReservation(id.to_string()));
        }
        let seats = match self.reservations.get(id) {
            None => return Err(BookingError::UnknownReservation(id.to_string())),
            Some(reservation) if reservation.is_confirmed() => return Ok(false),
            Some(reservation) => reservation.seats().clone(),
        };
        for (&row, cols) in &seats {
            self.rows[row].confirm(self.seat_policy.as_ref(), cols);
        }
        if let Some(reservation) = self.reservations.get_mut(id) {
            reservation.mark_confirmed();
        }
        self.note_confirmed(id, seats.values().map(Vec::len).sum());
        Ok(true)
    }

    /// Row-major character grid for the given reservation: `'#'` for its own
    /// seats (held or confirmed), `'x'` for seats confirmed by others, `' '`
    /// everywhere else. Row 0 comes first; the display layer reverses the
    /// rows for a back-to-front view.
    ///
    /// # Errors
    ///
    /// `UnknownReservation` for an unrecognized id.
    pub fn render_map(&self, id: &str) -> Result<SeatGrid> {
        let id = id.trim();
        let reservation = self
            .reservations
            .get(id)
            .ok_or_else(|| BookingError::UnknownReservation(id.to_string()))?;
        let cells = self
            .rows
            .iter()
            .enumerate()
            .map(|(row_index, row)| {
                (0..row.len())
                    .map(|col| {
                        if reservation.owns(row_index, col) {
                            OWNED
                        } else if row.state(col).is_confirmed() {
                            TAKEN
                        } else {
                            VACANT
                        }
                    })
                    .collect()
            })
            .collect();
        Ok(SeatGrid::from_cells(cells))
    }

    fn note_created(&self, reservation: &Reservation, tickets: usize) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_with_fields(
                LogLevel::Info,
                LOG_TARGET,
                "reservation_created",
                fields([
                    ("screen", json!(self.title)),
                    ("id", json!(reservation.id().as_str())),
                    ("tickets", json!(tickets)),
                    ("seats", json!(reservation.total_seats())),
                ]),
            );
        }
        if let Some(metrics) = &self.metrics {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_reservation(reservation.total_seats());
            }
        }
        self.audit.record(
            AuditEventBuilder::new(AuditStage::ReservationCreated)
                .detail("screen", json!(self.title))
                .detail("id", json!(reservation.id().as_str()))
                .detail("seats", json!(reservation.total_seats()))
                .finish(),
        );
    }

    fn note_amended(&self, reservation: &Reservation, tickets: usize) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_with_fields(
                LogLevel::Info,
                LOG_TARGET,
                "reservation_amended",
                fields([
                    ("screen", json!(self.title)),
                    ("id", json!(reservation.id().as_str())),
                    ("tickets", json!(tickets)),
                ]),
            );
        }
        if let Some(metrics) = &self.metrics {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_amendment(reservation.total_seats());
            }
        }
        self.audit.record(
            AuditEventBuilder::new(AuditStage::ReservationAmended)
                .detail("screen", json!(self.title))
                .detail("id", json!(reservation.id().as_str()))
                .finish(),
        );
    }

    fn note_confirmed(&self, id: &str, seats: usize) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_with_fields(
                LogLevel::Info,
                LOG_TARGET,
                "reservation_confirmed",
                fields([
                    ("screen", json!(self.title)),
                    ("id", json!(id)),
                    ("seats", json!(seats)),
                ]),
            );
        }
        if let Some(metrics) = &self.metrics {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_confirmation();
            }
        }
        self.audit.record(
            AuditEventBuilder::new(AuditStage::ReservationConfirmed)
                .detail("screen", json!(self.title))
                .detail("id", json!(id))
                .finish(),
        );
    }

    fn note_shortfall(&self, requested: usize, available: usize) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_with_fields(
                LogLevel::Warn,
                LOG_TARGET,
                "capacity_shortfall",
                fields([
                    ("screen", json!(self.title)),
                    ("requested", json!(requested)),
                    ("available", json!(available)),
                ]),
            );
        }
        if let Some(metrics) = &self.metrics {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_shortfall();
            }
        }
        self.audit.record(
            AuditEventBuilder::new(AuditStage::CapacityShortfall)
                .detail("screen", json!(self.title))
                .detail("requested", json!(requested))
                .detail("available", json!(available))
                .finish(),
        );
    }
}
