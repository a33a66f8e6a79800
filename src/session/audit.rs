//! Session lifecycle audit hooks.
//!
//! Records capture a stage identifier plus structured details so callers can
//! buffer, log or assert on what the session did without hooking the
//! evaluation path itself.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Checkpoints emitted by `PlacementSession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAuditStage {
    /// Zones and items were registered.
    SessionConstructed,
    /// An item was grabbed by the pointer.
    DragStarted,
    /// A position update was evaluated.
    PositionEvaluated,
    /// An item moved to a new placement state.
    StateChanged,
    /// A position update was refused (degenerate shape).
    EvaluationRejected,
    /// The active drag ended.
    DragReleased,
}

#[derive(Debug, Clone)]
pub struct SessionAuditEvent {
    pub timestamp: SystemTime,
    pub stage: SessionAuditStage,
    pub details: Vec<(String, Value)>,
}

impl SessionAuditEvent {
    fn new(stage: SessionAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }
}

pub struct SessionAuditEventBuilder {
    event: SessionAuditEvent,
}

impl SessionAuditEventBuilder {
    pub fn new(stage: SessionAuditStage) -> Self {
        Self {
            event: SessionAuditEvent::new(stage),
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> SessionAuditEvent {
        self.event
    }
}

pub trait SessionAudit: Send + Sync {
    fn record(&self, event: SessionAuditEvent);
}

/// Default no-op sink.
#[derive(Debug, Default)]
pub struct NullSessionAudit;

impl SessionAudit for NullSessionAudit {
    fn record(&self, _event: SessionAuditEvent) {}
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct BufferedSessionAudit {
    events: Mutex<Vec<SessionAuditEvent>>,
}

impl BufferedSessionAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stages(&self) -> Vec<SessionAuditStage> {
        self.events
            .lock()
            .map(|guard| guard.iter().map(|event| event.stage).collect())
            .unwrap_or_default()
    }

    pub fn drain(&self) -> Vec<SessionAuditEvent> {
        self.events
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }
}

impl SessionAudit for BufferedSessionAudit {
    fn record(&self, event: SessionAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}

impl<A: SessionAudit + ?Sized> SessionAudit for std::sync::Arc<A> {
    fn record(&self, event: SessionAuditEvent) {
        (**self).record(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_details() {
        let mut builder = SessionAuditEventBuilder::new(SessionAuditStage::StateChanged);
        builder.detail("item", json!("a")).detail("to", json!("out_of_bounds"));
        let event = builder.finish();
        assert_eq!(event.stage, SessionAuditStage::StateChanged);
        assert_eq!(event.detail("to"), Some(&json!("out_of_bounds")));
        assert!(event.detail("missing").is_none());
    }

    #[test]
    fn buffered_audit_drains() {
        let audit = BufferedSessionAudit::new();
        audit.record(SessionAuditEventBuilder::new(SessionAuditStage::DragStarted).finish());
        assert_eq!(audit.stages(), vec![SessionAuditStage::DragStarted]);
        assert_eq!(audit.drain().len(), 1);
        assert!(audit.stages().is_empty());
    }
}
