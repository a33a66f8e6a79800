use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::geometry::{Bounds, Point, Polygon};

pub type ZoneId = String;

/// What a zone means to the board. The variant order is the evaluation
/// priority: source zones are always tested before target zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneRole {
    /// Tray the items start from.
    Source,
    /// Surface items are placed onto; overlaps here are conflicts.
    Target,
}

/// Boundary of a zone in session space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneShape {
    Rect { bounds: Bounds },
    Polygon { points: Polygon },
}

impl ZoneShape {
    pub fn contains_point(&self, p: Point) -> bool {
        match self {
            ZoneShape::Rect { bounds } => bounds.contains(p),
            ZoneShape::Polygon { points } => points.contains_point(p),
        }
    }

    fn encloses_area(&self) -> bool {
        match self {
            ZoneShape::Rect { bounds } => !bounds.is_empty(),
            ZoneShape::Polygon { points } => !points.is_degenerate(),
        }
    }
}

/// Immutable named region items are validated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub role: ZoneRole,
    pub shape: ZoneShape,
}

impl Zone {
    pub fn new(id: impl Into<ZoneId>, role: ZoneRole, shape: ZoneShape) -> Self {
        Self {
            id: id.into(),
            role,
            shape,
        }
    }

    pub fn rect(id: impl Into<ZoneId>, role: ZoneRole, bounds: Bounds) -> Self {
        Self::new(id, role, ZoneShape::Rect { bounds })
    }

    pub fn polygon(id: impl Into<ZoneId>, role: ZoneRole, points: Polygon) -> Self {
        Self::new(id, role, ZoneShape::Polygon { points })
    }

    /// Strict full containment: every vertex must lie inside (edges inclusive).
    /// An empty polygon is never contained.
    pub fn contains(&self, polygon: &Polygon) -> bool {
        !polygon.is_empty()
            && polygon
                .points()
                .iter()
                .all(|p| self.shape.contains_point(*p))
    }
}

/// Zones held in evaluation priority order.
#[derive(Debug, Clone, Default)]
pub struct ZoneSet {
    zones: Vec<Zone>,
}

impl ZoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from zones in any order, rejecting duplicates and shapes
    /// without area.
    pub fn from_zones(zones: impl IntoIterator<Item = Zone>) -> Result<Self> {
        let mut set = Self::new();
        for zone in zones {
            set.insert(zone)?;
        }
        Ok(set)
    }

    /// Insert keeping role priority; zones of equal role keep insertion order.
    pub fn insert(&mut self, zone: Zone) -> Result<()> {
        if self.zones.iter().any(|z| z.id == zone.id) {
            return Err(PlacementError::DuplicateZone(zone.id));
        }
        if !zone.shape.encloses_area() {
            return Err(PlacementError::InvalidZone(zone.id));
        }
        let idx = self
            .zones
            .iter()
            .position(|z| z.role > zone.role)
            .unwrap_or(self.zones.len());
        self.zones.insert(idx, zone);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// First zone in priority order that fully contains the polygon.
    pub fn resolve(&self, polygon: &Polygon) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.contains(polygon))
    }
}
