//! Event-driven placement session.
//!
//! The session owns the zone set, the item registry and the drag controller.
//! Every position update is evaluated exactly once, when its event arrives;
//! nothing is recomputed on a timer.

use std::time::Instant;

use serde_json::{Value, json};

use crate::config::{BoardConfig, SessionConfig};
use crate::error::{PlacementError, Result};
use crate::geometry::Point;
use crate::logging::{LogLevel, event_with_fields, json_kv};
use crate::metrics::MetricSnapshot;
use crate::placement::{ItemId, PlacementState};
use crate::registry::{ItemRegistry, MoveOutcome, StateChange};
use crate::zone::ZoneSet;

pub mod audit;
pub mod drag;

use audit::{SessionAuditEventBuilder, SessionAuditStage};
use drag::DragController;

/// Position-update events the session reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementEvent {
    /// Pick up `item` with the pointer at `pointer`.
    Grab { item: ItemId, pointer: Point },
    /// Pointer moved while holding the grabbed item.
    Drag { pointer: Point },
    /// Let go of the grabbed item where it is.
    Release,
    /// Place `item` at an explicit anchor, bypassing the pointer.
    Move { item: ItemId, anchor: Point },
}

/// Raw pointer input in session space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Drag(Point),
    Up(Point),
}

pub struct PlacementSession {
    zones: ZoneSet,
    registry: ItemRegistry,
    drag: DragController,
    config: SessionConfig,
    started_at: Instant,
}

impl PlacementSession {
    pub fn new(board: BoardConfig, config: SessionConfig) -> Result<Self> {
        let (zones, registry) = board.build()?;
        Ok(Self::from_parts(zones, registry, config))
    }

    pub fn from_parts(zones: ZoneSet, registry: ItemRegistry, config: SessionConfig) -> Self {
        let session = Self {
            zones,
            registry,
            drag: DragController::new(),
            config,
            started_at: Instant::now(),
        };
        session.audit(SessionAuditStage::SessionConstructed, |b| {
            b.detail("zones", json!(session.zones.len()))
                .detail("items", json!(session.registry.len()));
        });
        session.log(
            LogLevel::Info,
            "session_started",
            [
                json_kv("zones", json!(session.zones.len())),
                json_kv("items", json!(session.registry.len())),
            ],
        );
        session
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn zones(&self) -> &ZoneSet {
        &self.zones
    }

    pub fn registry(&self) -> &ItemRegistry {
        &self.registry
    }

    pub fn state_of(&self, item: &str) -> Result<PlacementState> {
        self.registry.state_of(item)
    }

    pub fn snapshot(&self) -> Vec<(ItemId, PlacementState)> {
        self.registry.snapshot()
    }

    /// Items whose state changed since the last call; feed for a feedback layer.
    pub fn take_dirty(&mut self) -> Vec<(ItemId, PlacementState)> {
        self.registry.take_dirty()
    }

    /// Every item sits validly on a target zone.
    pub fn is_complete(&self) -> bool {
        self.registry.all_in_target_valid()
    }

    pub fn dragging(&self) -> Option<&str> {
        self.drag.current().map(|drag| drag.item.as_str())
    }

    /// Apply one event and return the state transitions it caused.
    pub fn handle(&mut self, event: PlacementEvent) -> Result<Vec<StateChange>> {
        self.record_event_metric();
        match event {
            PlacementEvent::Grab { item, pointer } => {
                let anchor = self.registry.get(&item)?.anchor;
                let offset = self.drag.grab(item.clone(), pointer, anchor).offset;
                self.audit(SessionAuditStage::DragStarted, |b| {
                    b.detail("item", json!(item))
                        .detail("offset", point_value(offset));
                });
                self.log(LogLevel::Debug, "drag_started", [json_kv("item", json!(item))]);
                Ok(Vec::new())
            }
            PlacementEvent::Drag { pointer } => {
                let Some((item, anchor)) = self.drag.follow(pointer) else {
                    self.log(
                        LogLevel::Debug,
                        "drag_ignored",
                        [json_kv("reason", "no active grab")],
                    );
                    return Ok(Vec::new());
                };
                let item = item.to_string();
                self.apply_move(&item, anchor)
            }
            PlacementEvent::Release => {
                if let Some(released) = self.drag.release() {
                    self.audit(SessionAuditStage::DragReleased, |b| {
                        b.detail("item", json!(released.item));
                    });
                    self.log(
                        LogLevel::Debug,
                        "drag_released",
                        [json_kv("item", json!(released.item))],
                    );
                }
                Ok(Vec::new())
            }
            PlacementEvent::Move { item, anchor } => self.apply_move(&item, anchor),
        }
    }

    /// Translate pointer input into placement events. A press grabs the
    /// topmost item under the pointer; a press on empty space does nothing.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<Vec<StateChange>> {
        match event {
            PointerEvent::Down(point) => {
                let Some(item) = self.registry.hit_test(point).map(|item| item.id.clone()) else {
                    return Ok(Vec::new());
                };
                self.handle(PlacementEvent::Grab {
                    item,
                    pointer: point,
                })
            }
            PointerEvent::Drag(point) => self.handle(PlacementEvent::Drag { pointer: point }),
            PointerEvent::Up(_) => self.handle(PlacementEvent::Release),
        }
    }

    /// Replay events in order, stopping at the first error.
    pub fn run_scripted<I>(&mut self, events: I) -> Result<Vec<StateChange>>
    where
        I: IntoIterator<Item = PlacementEvent>,
    {
        let mut changes = Vec::new();
        for event in events {
            changes.extend(self.handle(event)?);
        }
        self.emit_metrics();
        Ok(changes)
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.started_at.elapsed()))
    }

    /// Log a metrics snapshot if both a logger and metrics are configured.
    pub fn emit_metrics(&self) {
        let (Some(logger), Some(snapshot)) = (self.config.logger.as_ref(), self.metrics_snapshot())
        else {
            return;
        };
        let _ = logger.log_event(snapshot.to_log_event(&self.config.metrics_target));
    }

    fn apply_move(&mut self, item: &str, anchor: Point) -> Result<Vec<StateChange>> {
        match self.registry.move_to(item, anchor, &self.zones) {
            Ok(outcome) => {
                self.report_outcome(item, anchor, &outcome);
                Ok(outcome.changes)
            }
            Err(err @ PlacementError::DegenerateShape { .. }) => {
                self.record_rejection_metric();
                let reason = err.to_string();
                self.audit(SessionAuditStage::EvaluationRejected, |b| {
                    b.detail("item", json!(item)).detail("reason", json!(reason));
                });
                self.log(
                    LogLevel::Warn,
                    "degenerate_shape",
                    [json_kv("item", json!(item)), json_kv("reason", json!(reason))],
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    fn report_outcome(&self, item: &str, anchor: Point, outcome: &MoveOutcome) {
        let evaluation = &outcome.evaluation;
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_evaluation(evaluation.state.is_conflicting());
                guard.record_state_changes(outcome.changes.len());
            }
        }

        self.audit(SessionAuditStage::PositionEvaluated, |b| {
            b.detail("item", json!(item))
                .detail("anchor", point_value(anchor))
                .detail("state", json!(evaluation.state))
                .detail("zone", json!(evaluation.zone))
                .detail("conflicts", json!(evaluation.conflicts));
        });
        self.log(
            LogLevel::Debug,
            "placement_evaluated",
            [
                json_kv("item", json!(item)),
                json_kv("state", json!(evaluation.state)),
                json_kv("zone", json!(evaluation.zone)),
                json_kv("conflicts", json!(evaluation.conflicts.len())),
            ],
        );

        for change in &outcome.changes {
            self.audit(SessionAuditStage::StateChanged, |b| {
                b.detail("item", json!(change.item))
                    .detail("from", json!(change.from))
                    .detail("to", json!(change.to));
            });
            self.log(
                LogLevel::Info,
                "state_changed",
                [
                    json_kv("item", json!(change.item)),
                    json_kv("from", json!(change.from)),
                    json_kv("to", json!(change.to)),
                ],
            );
        }
    }

    fn audit(&self, stage: SessionAuditStage, fill: impl FnOnce(&mut SessionAuditEventBuilder)) {
        let mut builder = SessionAuditEventBuilder::new(stage);
        fill(&mut builder);
        self.config.audit.record(builder.finish());
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, &self.config.log_target, message, fields);
            let _ = logger.log_event(event);
        }
    }

    fn record_event_metric(&self) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_event();
            }
        }
    }

    fn record_rejection_metric(&self) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                guard.record_rejection();
            }
        }
    }
}

fn point_value(point: Point) -> Value {
    json!({ "x": point.x, "y": point.y })
}
