use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct SessionMetrics {
    events: u64,
    evaluations: u64,
    state_changes: u64,
    conflicts: u64,
    degenerate_rejections: u64,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    /// One completed evaluation; `conflicting` when it landed on a conflict.
    pub fn record_evaluation(&mut self, conflicting: bool) {
        self.evaluations = self.evaluations.saturating_add(1);
        if conflicting {
            self.conflicts = self.conflicts.saturating_add(1);
        }
    }

    pub fn record_state_changes(&mut self, count: usize) {
        if count > 0 {
            self.state_changes = self.state_changes.saturating_add(count as u64);
        }
    }

    pub fn record_rejection(&mut self) {
        self.degenerate_rejections = self.degenerate_rejections.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            evaluations: self.evaluations,
            state_changes: self.state_changes,
            conflicts: self.conflicts,
            degenerate_rejections: self.degenerate_rejections,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub evaluations: u64,
    pub state_changes: u64,
    pub conflicts: u64,
    pub degenerate_rejections: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "session_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("evaluations".to_string(), json!(self.evaluations));
        map.insert("state_changes".to_string(), json!(self.state_changes));
        map.insert("conflicts".to_string(), json!(self.conflicts));
        map.insert(
            "degenerate_rejections".to_string(),
            json!(self.degenerate_rejections),
        );
        map
    }
}
