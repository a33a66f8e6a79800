//! Board and session configuration.
//!
//! `BoardConfig` is the declarative description of a board (zones plus the
//! items that start on it) and is usually read from JSON. `SessionConfig`
//! carries the runtime knobs: logging, metrics and auditing.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::Logger;
use crate::metrics::SessionMetrics;
use crate::placement::PlaceableItem;
use crate::registry::ItemRegistry;
use crate::session::audit::{NullSessionAudit, SessionAudit};
use crate::zone::{Zone, ZoneSet};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub items: Vec<PlaceableItem>,
}

impl BoardConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate the zones and register the items.
    pub fn build(self) -> Result<(ZoneSet, ItemRegistry)> {
        let zones = ZoneSet::from_zones(self.zones)?;
        let mut registry = ItemRegistry::new();
        for item in self.items {
            registry.insert(item)?;
        }
        Ok((zones, registry))
    }
}

/// Runtime knobs for a `PlacementSession`.
#[derive(Clone)]
pub struct SessionConfig {
    /// Optional structured logger used by the session.
    pub logger: Option<Logger>,
    /// Target field for session log events.
    pub log_target: String,
    /// Metrics accumulator shared with the host.
    pub metrics: Option<Arc<Mutex<SessionMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    pub audit: Arc<dyn SessionAudit>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            logger: None,
            log_target: "stamp::session".to_string(),
            metrics: None,
            metrics_target: "stamp::session.metrics".to_string(),
            audit: Arc::new(NullSessionAudit),
        }
    }
}

impl SessionConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit<A>(mut self, audit: A) -> Self
    where
        A: SessionAudit + 'static,
    {
        self.audit = Arc::new(audit);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(SessionMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<SessionMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlacementError;
    use crate::geometry::Point;
    use crate::zone::ZoneRole;

    const BOARD: &str = r#"{
        "zones": [
            {
                "id": "paper",
                "role": "target",
                "shape": {
                    "kind": "rect",
                    "bounds": { "min": { "x": 0, "y": 0 }, "max": { "x": 100, "y": 100 } }
                }
            },
            {
                "id": "tray",
                "role": "source",
                "shape": { "kind": "polygon", "points": [
                    { "x": 200, "y": 0 }, { "x": 300, "y": 0 },
                    { "x": 300, "y": 100 }, { "x": 200, "y": 100 }
                ] }
            }
        ],
        "items": [
            {
                "id": "cat",
                "shape": [ { "x": 0, "y": 0 }, { "x": 10, "y": 0 }, { "x": 5, "y": 8 } ],
                "anchor": { "x": 210, "y": 10 }
            },
            {
                "id": "dog",
                "shape": [ { "x": 0, "y": 0 }, { "x": 10, "y": 0 }, { "x": 10, "y": 10 } ]
            }
        ]
    }"#;

    #[test]
    fn board_parses_from_json() {
        let board = BoardConfig::from_json_str(BOARD).unwrap();
        assert_eq!(board.zones.len(), 2);
        assert_eq!(board.items[1].anchor, Point::origin());

        let (zones, registry) = board.build().unwrap();
        assert_eq!(zones.iter().next().map(|z| z.role), Some(ZoneRole::Source));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("cat").unwrap().anchor, Point::new(210.0, 10.0));
    }

    #[test]
    fn pretty_output_reparses() {
        let board = BoardConfig::from_json_str(BOARD).unwrap();
        let again = BoardConfig::from_json_str(&board.to_json_pretty().unwrap()).unwrap();
        assert_eq!(board, again);
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = BoardConfig::from_json_str("{ \"zones\": 3 }").unwrap_err();
        assert!(matches!(err, PlacementError::Config(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = BoardConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, PlacementError::Io(_)));
    }

    #[test]
    fn metrics_toggle() {
        let mut config = SessionConfig::default();
        assert!(config.metrics_handle().is_none());
        config.enable_metrics();
        let handle = config.metrics_handle().unwrap();
        config.enable_metrics();
        assert!(Arc::ptr_eq(&handle, &config.metrics_handle().unwrap()));
        config.disable_metrics();
        assert!(config.metrics_handle().is_none());
    }
}
