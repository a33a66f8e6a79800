//! Placement validation engine for drag-and-drop stamp boards.
//!
//! Items are polygons dragged between a source tray and a target sheet. Each
//! position update re-evaluates where the item sits and whether it overlaps
//! another item already placed on the same target zone.

pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod metrics;
pub mod placement;
pub mod registry;
pub mod session;
pub mod zone;

pub use config::{BoardConfig, SessionConfig};
pub use error::{PlacementError, Result};
pub use geometry::{Bounds, Point, Polygon};
pub use input::{CellScale, pointer_from_mouse};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, SessionMetrics};
pub use placement::{Evaluation, ItemId, PlaceableItem, PlacementState, evaluate, evaluate_detailed};
pub use registry::{ItemRegistry, MoveOutcome, StateChange, StateCounts};
pub use session::audit::{
    BufferedSessionAudit, NullSessionAudit, SessionAudit, SessionAuditEvent,
    SessionAuditEventBuilder, SessionAuditStage,
};
pub use session::drag::{ActiveDrag, DragController};
pub use session::{PlacementEvent, PlacementSession, PointerEvent};
pub use zone::{Zone, ZoneId, ZoneRole, ZoneSet, ZoneShape};
