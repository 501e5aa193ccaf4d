use serde_json::json;

use crate::logging::{LogEvent, LogFields, LogLevel};

/// Booking activity counters, shared across a catalog's screens.
/// Counters saturate rather than wrap.
#[derive(Debug, Default, Clone)]
pub struct BookingMetrics {
    reservations: u64,
    amendments: u64,
    confirmations: u64,
    shortfalls: u64,
    seats_allocated: u64,
}

impl BookingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_reservation(&mut self, seats: usize) {
        self.reservations = self.reservations.saturating_add(1);
        self.seats_allocated = self.seats_allocated.saturating_add(seats as u64);
    }

    pub fn record_amendment(&mut self, seats: usize) {
        self.amendments = self.amendments.saturating_add(1);
        self.seats_allocated = self.seats_allocated.saturating_add(seats as u64);
    }

    pub fn record_confirmation(&mut self) {
        self.confirmations = self.confirmations.saturating_add(1);
    }

    pub fn record_shortfall(&mut self) {
        self.shortfalls = self.shortfalls.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            reservations: self.reservations,
            amendments: self.amendments,
            confirmations: self.confirmations,
            shortfalls: self.shortfalls,
            seats_allocated: self.seats_allocated,
        }
    }
}

/// Point-in-time copy of the counters, convertible to a log event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub reservations: u64,
    pub amendments: u64,
    pub confirmations: u64,
    pub shortfalls: u64,
    pub seats_allocated: u64,
}

impl MetricSnapshot {
    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("reservations".to_string(), json!(self.reservations));
        map.insert("amendments".to_string(), json!(self.amendments));
        map.insert("confirmations".to_string(), json!(self.confirmations));
        map.insert("shortfalls".to_string(), json!(self.shortfalls));
        map.insert("seats_allocated".to_string(), json!(self.seats_allocated));
        map
    }

    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target.to_string(),
            "booking_metrics".to_string(),
            self.as_fields(),
        )
    }
}
