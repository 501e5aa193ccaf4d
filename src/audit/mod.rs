//! Reservation lifecycle audit hooks.
//!
//! Lightweight instrumentation so callers can observe the major transitions
//! of a screen's reservation table. Records capture a stage identifier plus
//! structured details so downstream code can log, buffer, or visualize the
//! booking flow without contorting the allocation path.

use std::time::SystemTime;

use serde_json::Value;

/// Distinct checkpoints emitted while a screen processes bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStage {
    /// A screen was added to the catalog.
    ScreenCreated,
    /// A new reservation was minted and its seats held.
    ReservationCreated,
    /// An unconfirmed reservation's seat set was replaced.
    ReservationAmended,
    /// A reservation's held seats became permanent.
    ReservationConfirmed,
    /// A request exceeded current availability and was turned away.
    CapacityShortfall,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub timestamp: SystemTime,
    pub stage: AuditStage,
    pub details: Vec<(String, Value)>,
}

impl AuditEvent {
    fn new(stage: AuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }
}

/// Builder helper to append details ergonomically.
pub struct AuditEventBuilder {
    event: AuditEvent,
}

impl AuditEventBuilder {
    pub fn new(stage: AuditStage) -> Self {
        Self {
            event: AuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> AuditEvent {
        self.event
    }
}

/// Trait implemented by any audit sink.
pub trait BookingAudit: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Default no-op implementation used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullBookingAudit;

impl BookingAudit for NullBookingAudit {
    fn record(&self, _event: AuditEvent) {}
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    #[derive(Default, Clone)]
    struct RecordingAudit {
        stages: Arc<Mutex<Vec<AuditStage>>>,
    }

    impl BookingAudit for RecordingAudit {
        fn record(&self, event: AuditEvent) {
            self.stages.lock().unwrap().push(event.stage);
        }
    }

    #[test]
    fn builder_collects_details() {
        let event = AuditEventBuilder::new(AuditStage::ReservationCreated)
            .detail("id", json!("GIC0000"))
            .detail("tickets", json!(4))
            .finish();
        assert_eq!(event.stage, AuditStage::ReservationCreated);
        assert_eq!(event.details.len(), 2);
        assert_eq!(event.details[0].0, "id");
    }

    #[test]
    fn sinks_receive_recorded_events() {
        let audit = RecordingAudit::default();
        audit.record(AuditEventBuilder::new(AuditStage::ScreenCreated).finish());
        audit.record(AuditEventBuilder::new(AuditStage::CapacityShortfall).finish());
        assert_eq!(
            audit.stages.lock().unwrap().as_slice(),
            &[AuditStage::ScreenCreated, AuditStage::CapacityShortfall]
        );
    }
}
