use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::json;

use crate::audit::{AuditEventBuilder, AuditStage, BookingAudit};
use crate::error::{BookingError, Result};
use crate::logging::Logger;
use crate::metrics::BookingMetrics;
use crate::render::SeatGrid;
use crate::row::HoldAccounting;
use crate::screen::{ReserveOutcome, Screen};

/// Knobs shared by every screen a catalog creates.
#[derive(Clone, Default)]
pub struct BookingConfig {
    /// Optional structured logger wired into each screen.
    pub logger: Option<Logger>,
    /// Metrics accumulator shared across screens.
    pub metrics: Option<Arc<Mutex<BookingMetrics>>>,
    /// Audit sink for reservation lifecycle checkpoints.
    pub audit: Option<Arc<dyn BookingAudit>>,
    /// How held-but-unconfirmed seats count toward availability.
    pub accounting: HoldAccounting,
}

impl BookingConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(BookingMetrics::new())));
        }
    }

    /// Disable metrics collection for screens created afterwards.
    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<BookingMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Title-keyed collection of screens.
///
/// Titles are trimmed and case-folded before use, so `Avatar`, `avatar`
/// and ` AVATAR ` all address the same screen.
#[derive(Default)]
pub struct Cinema {
    screens: HashMap<String, Screen>,
    config: BookingConfig,
}

impl Cinema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: BookingConfig) -> Self {
        Self {
            screens: HashMap::new(),
            config,
        }
    }

    pub fn config(&self) -> &BookingConfig {
        &self.config
    }

    fn fold_title(title: &str) -> String {
        title.trim().to_lowercase()
    }

    /// Register a screen for `title` and return its current availability.
    /// Re-registering an existing title leaves the screen untouched and
    /// just reports its availability.
    ///
    /// # Errors
    ///
    /// `EmptyTitle`, `InvalidRowCount` or `InvalidSeatsPerRow` when the
    /// layout is out of range.
    pub fn create_screen(
        &mut self,
        title: &str,
        rows: usize,
        seats_per_row: usize,
    ) -> Result<usize> {
        let key = Self::fold_title(title);
        if key.is_empty() {
            return Err(BookingError::EmptyTitle);
        }
        if !self.screens.contains_key(&key) {
            let mut screen = Screen::new(key.clone(), rows, seats_per_row)?;
            screen.set_accounting(self.config.accounting);
            screen.set_logger(self.config.logger.clone());
            screen.set_metrics(self.config.metrics_handle());
            if let Some(audit) = &self.config.audit {
                screen.set_audit(Arc::clone(audit));
                audit.record(
                    AuditEventBuilder::new(AuditStage::ScreenCreated)
                        .detail("title", json!(key))
                        .detail("rows", json!(rows))
                        .detail("seats_per_row", json!(seats_per_row))
                        .finish(),
                );
            }
            self.screens.insert(key.clone(), screen);
        }
        Ok(self
            .screens
            .get(&key)
            .map_or(0, Screen::seats_available))
    }

    /// Availability for `title`; unknown titles report 0.
    pub fn seats_available(&self, title: &str) -> usize {
        self.screens
            .get(&Self::fold_title(title))
            .map_or(0, Screen::seats_available)
    }

    pub fn screen(&self, title: &str) -> Option<&Screen> {
        self.screens.get(&Self::fold_title(title))
    }

    /// Reserve `tickets` on `title`, minting a new reservation for an empty
    /// or unknown id and amending an unconfirmed one otherwise. `start` is
    /// the optional designated seat (0-based row and column, as produced by
    /// `parse_seat_code`).
    ///
    /// # Errors
    ///
    /// `UnknownTitle` plus everything `Screen::reserve` reports.
    pub fn reserve(
        &mut self,
        title: &str,
        id: Option<&str>,
        tickets: usize,
        start: Option<(usize, usize)>,
    ) -> Result<ReserveOutcome> {
        let key = Self::fold_title(title);
        let screen = self
            .screens
            .get_mut(&key)
            .ok_or_else(|| BookingError::UnknownTitle(title.trim().to_string()))?;
        screen.reserve(id, tickets, start)
    }

    /// Confirm a reservation on `title`. Returns `true` when the state
    /// changed, `false` when it was already confirmed.
    ///
    /// # Errors
    ///
    /// `UnknownTitle` or `UnknownReservation`.
    pub fn confirm(&mut self, title: &str, id: &str) -> Result<bool> {
        let key = Self::fold_title(title);
        let screen = self
            .screens
            .get_mut(&key)
            .ok_or_else(|| BookingError::UnknownTitle(title.trim().to_string()))?;
        screen.confirm_reservation(id)
    }

    /// Render the seat map of `title` from the perspective of `id`.
    ///
    /// # Errors
    ///
    /// `UnknownTitle` or `UnknownReservation`.
    pub fn render_map(&self, title: &str, id: &str) -> Result<SeatGrid> {
        let key = Self::fold_title(title);
        let screen = self
            .screens
            .get(&key)
            .ok_or_else(|| BookingError::UnknownTitle(title.trim().to_string()))?;
        screen.render_map(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemorySink};

    #[test]
    fn titles_are_case_folded_and_deduped() {
        let mut cinema = Cinema::new();
        assert_eq!(cinema.create_screen("Avatar", 10, 10).unwrap(), 100);
        cinema.reserve("avatar", None, 4, None).unwrap();
        // Same title, different casing: no new screen, availability reported.
        assert_eq!(cinema.create_screen(" AVATAR ", 5, 5).unwrap(), 100);
        assert_eq!(cinema.seats_available("aVaTaR"), 100);
    }

    #[test]
    fn unknown_titles_report_zero_availability() {
        let cinema = Cinema::new();
        assert_eq!(cinema.seats_available("nope"), 0);
    }

    #[test]
    fn unknown_titles_fail_booking_operations() {
        let mut cinema = Cinema::new();
        assert!(matches!(
            cinema.reserve("nope", None, 1, None),
            Err(BookingError::UnknownTitle(_))
        ));
        assert!(matches!(
            cinema.confirm("nope", "GIC0000"),
            Err(BookingError::UnknownTitle(_))
        ));
        assert!(matches!(
            cinema.render_map("nope", "GIC0000"),
            Err(BookingError::UnknownTitle(_))
        ));
    }

    #[test]
    fn empty_titles_are_rejected() {
        let mut cinema = Cinema::new();
        assert!(matches!(
            cinema.create_screen("   ", 10, 10),
            Err(BookingError::EmptyTitle)
        ));
    }

    #[test]
    fn booking_flow_works_through_the_catalog() {
        let mut cinema = Cinema::new();
        cinema.create_screen("Dune", 10, 10).unwrap();

        let outcome = cinema.reserve("Dune", None, 4, None).unwrap();
        let id = outcome.reservation().unwrap().id().as_str().to_string();
        assert_eq!(id, "GIC0000");

        assert!(cinema.confirm("dune", &id).unwrap());
        let grid = cinema.render_map("DUNE", &id).unwrap();
        assert_eq!(grid.to_lines()[0], "   ####   ");
        assert_eq!(cinema.seats_available("Dune"), 96);
    }

    #[test]
    fn configured_logger_and_metrics_observe_bookings() {
        let sink = MemorySink::new();
        let mut config = BookingConfig {
            logger: Some(Logger::new(sink.clone())),
            ..BookingConfig::default()
        };
        config.enable_metrics();
        let metrics = config.metrics_handle().unwrap();

        let mut cinema = Cinema::with_config(config);
        cinema.create_screen("Tron", 2, 4).unwrap();
        let id = cinema
            .reserve("Tron", None, 3, None)
            .unwrap()
            .reservation()
            .unwrap()
            .id()
            .as_str()
            .to_string();
        cinema.confirm("Tron", &id).unwrap();
        cinema.reserve("Tron", None, 9, None).unwrap();

        let events = sink.events();
        let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "reservation_created",
                "reservation_confirmed",
                "capacity_shortfall"
            ]
        );
        assert_eq!(events[2].level, LogLevel::Warn);

        let snapshot = metrics.lock().unwrap().snapshot();
        assert_eq!(snapshot.reservations, 1);
        assert_eq!(snapshot.confirmations, 1);
        assert_eq!(snapshot.shortfalls, 1);
        assert_eq!(snapshot.seats_allocated, 3);
    }
}
