use serde::{Deserialize, Serialize};

use crate::error::{PlacementError, Result};
use crate::geometry::{Point, Polygon};
use crate::zone::{ZoneId, ZoneRole, ZoneSet};

/// Stable identifier for a placeable item.
pub type ItemId = String;

/// Where an item currently sits. Exactly one state holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementState {
    /// Never evaluated.
    #[default]
    Unplaced,
    InSourceZone,
    InTargetZoneValid,
    InTargetZoneConflicting,
    OutOfBounds,
}

impl PlacementState {
    pub fn is_in_target(&self) -> bool {
        matches!(
            self,
            PlacementState::InTargetZoneValid | PlacementState::InTargetZoneConflicting
        )
    }

    pub fn is_conflicting(&self) -> bool {
        matches!(self, PlacementState::InTargetZoneConflicting)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlacementState::Unplaced => "unplaced",
            PlacementState::InSourceZone => "in_source_zone",
            PlacementState::InTargetZoneValid => "in_target_zone_valid",
            PlacementState::InTargetZoneConflicting => "in_target_zone_conflicting",
            PlacementState::OutOfBounds => "out_of_bounds",
        }
    }
}

/// Draggable polygon: local-space outline plus the anchor it is drawn at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceableItem {
    pub id: ItemId,
    pub shape: Polygon,
    #[serde(default)]
    pub anchor: Point,
}

impl PlaceableItem {
    pub fn new(id: impl Into<ItemId>, shape: Polygon, anchor: Point) -> Self {
        Self {
            id: id.into(),
            shape,
            anchor,
        }
    }

    /// Outline translated into session space.
    pub fn world_shape(&self) -> Polygon {
        self.shape.translated(self.anchor)
    }
}

/// Full outcome of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub state: PlacementState,
    /// Zone that fully contains the item, if any.
    pub zone: Option<ZoneId>,
    /// Siblings in the same target zone whose outlines touch the item.
    pub conflicts: Vec<ItemId>,
}

/// Resolve the placement state of `item` against its siblings and the zones.
///
/// `all_items` may contain `item` itself; it is skipped by id.
pub fn evaluate(
    item: &PlaceableItem,
    all_items: &[PlaceableItem],
    zones: &ZoneSet,
) -> Result<PlacementState> {
    evaluate_detailed(item, all_items, zones).map(|eval| eval.state)
}

pub fn evaluate_detailed(
    item: &PlaceableItem,
    all_items: &[PlaceableItem],
    zones: &ZoneSet,
) -> Result<Evaluation> {
    let shape = item.world_shape();
    if shape.is_degenerate() {
        return Err(PlacementError::DegenerateShape {
            item: item.id.clone(),
            vertices: shape.len(),
        });
    }

    let Some(zone) = zones.resolve(&shape) else {
        return Ok(Evaluation {
            state: PlacementState::OutOfBounds,
            zone: None,
            conflicts: Vec::new(),
        });
    };

    if zone.role == ZoneRole::Source {
        return Ok(Evaluation {
            state: PlacementState::InSourceZone,
            zone: Some(zone.id.clone()),
            conflicts: Vec::new(),
        });
    }

    let mut conflicts = Vec::new();
    for other in all_items.iter().filter(|other| other.id != item.id) {
        let other_shape = other.world_shape();
        if other_shape.is_degenerate() {
            continue;
        }
        let same_zone = zones
            .resolve(&other_shape)
            .is_some_and(|other_zone| other_zone.id == zone.id);
        if same_zone && shape.intersects(&other_shape) {
            conflicts.push(other.id.clone());
        }
    }

    let state = if conflicts.is_empty() {
        PlacementState::InTargetZoneValid
    } else {
        PlacementState::InTargetZoneConflicting
    };

    Ok(Evaluation {
        state,
        zone: Some(zone.id.clone()),
        conflicts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounds;
    use crate::zone::Zone;

    fn zones() -> ZoneSet {
        ZoneSet::from_zones([
            Zone::polygon(
                "paper",
                ZoneRole::Target,
                Polygon::from_pairs(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]),
            ),
            Zone::rect(
                "tray",
                ZoneRole::Source,
                Bounds::from_origin_size(200.0, 0.0, 100.0, 100.0),
            ),
        ])
        .unwrap()
    }

    fn stamp(id: &str, x: f64, y: f64) -> PlaceableItem {
        PlaceableItem::new(id, Polygon::rect(10.0, 10.0), Point::new(x, y))
    }

    #[test]
    fn item_alone_in_target_is_valid() {
        let a = stamp("a", 10.0, 10.0);
        let eval = evaluate_detailed(&a, std::slice::from_ref(&a), &zones()).unwrap();
        assert_eq!(eval.state, PlacementState::InTargetZoneValid);
        assert_eq!(eval.zone.as_deref(), Some("paper"));
        assert!(eval.conflicts.is_empty());
    }

    #[test]
    fn vertex_on_zone_edge_is_inside() {
        let item = PlaceableItem::new(
            "edge",
            Polygon::from_pairs(&[(50.0, 40.0), (100.0, 50.0), (50.0, 60.0)]),
            Point::origin(),
        );
        assert_eq!(
            evaluate(&item, &[], &zones()).unwrap(),
            PlacementState::InTargetZoneValid
        );
    }

    #[test]
    fn partial_overlap_is_out_of_bounds() {
        let item = stamp("a", 95.0, 10.0);
        assert_eq!(evaluate(&item, &[], &zones()).unwrap(), PlacementState::OutOfBounds);
    }

    #[test]
    fn item_in_tray_is_in_source_zone() {
        let item = stamp("a", 250.0, 50.0);
        assert_eq!(evaluate(&item, &[], &zones()).unwrap(), PlacementState::InSourceZone);
    }

    #[test]
    fn overlapping_pair_conflicts_both_ways() {
        let a = stamp("a", 10.0, 10.0);
        let b = stamp("b", 15.0, 15.0);
        let all = vec![a.clone(), b.clone()];
        let zones = zones();
        assert_eq!(
            evaluate(&a, &all, &zones).unwrap(),
            PlacementState::InTargetZoneConflicting
        );
        let eval_b = evaluate_detailed(&b, &all, &zones).unwrap();
        assert_eq!(eval_b.state, PlacementState::InTargetZoneConflicting);
        assert_eq!(eval_b.conflicts, vec!["a".to_string()]);
    }

    #[test]
    fn sibling_outside_target_never_conflicts() {
        // b straddles the paper edge, so it resolves out of bounds.
        let a = stamp("a", 88.0, 10.0);
        let b = stamp("b", 95.0, 12.0);
        let all = vec![a.clone(), b];
        assert_eq!(
            evaluate(&a, &all, &zones()).unwrap(),
            PlacementState::InTargetZoneValid
        );
    }

    #[test]
    fn conflicts_stay_within_the_resolved_target_zone() {
        // Two sheets overlapping on x in 50..=100; "left" has priority.
        let zones = ZoneSet::from_zones([
            Zone::rect(
                "left",
                ZoneRole::Target,
                Bounds::from_origin_size(0.0, 0.0, 100.0, 100.0),
            ),
            Zone::rect(
                "right",
                ZoneRole::Target,
                Bounds::from_origin_size(50.0, 0.0, 100.0, 100.0),
            ),
        ])
        .unwrap();

        // Inside both sheets, so it resolves to "left".
        let shared = stamp("shared", 88.0, 10.0);
        // Straddles x = 100, so only "right" contains it.
        let right_only = stamp("right_only", 95.0, 10.0);
        let all = vec![shared.clone(), right_only.clone()];

        let eval = evaluate_detailed(&shared, &all, &zones).unwrap();
        assert_eq!(eval.zone.as_deref(), Some("left"));
        assert_eq!(eval.state, PlacementState::InTargetZoneValid);

        let eval = evaluate_detailed(&right_only, &all, &zones).unwrap();
        assert_eq!(eval.zone.as_deref(), Some("right"));
        assert_eq!(eval.state, PlacementState::InTargetZoneValid);

        // Nudged past x = 100 the shared stamp lands on "right" and now clashes.
        let moved = stamp("shared", 91.0, 10.0);
        let all = vec![moved.clone(), right_only.clone()];
        let eval = evaluate_detailed(&moved, &all, &zones).unwrap();
        assert_eq!(eval.zone.as_deref(), Some("right"));
        assert_eq!(eval.state, PlacementState::InTargetZoneConflicting);
        assert_eq!(eval.conflicts, vec!["right_only".to_string()]);
        assert_eq!(
            evaluate(&right_only, &all, &zones).unwrap(),
            PlacementState::InTargetZoneConflicting
        );
    }

    #[test]
    fn evaluation_is_idempotent() {
        let a = stamp("a", 10.0, 10.0);
        let b = stamp("b", 18.0, 10.0);
        let all = vec![a.clone(), b];
        let zones = zones();
        let first = evaluate(&a, &all, &zones).unwrap();
        let second = evaluate(&a, &all, &zones).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn two_point_shape_is_degenerate() {
        let item = PlaceableItem::new(
            "line",
            Polygon::from_pairs(&[(0.0, 0.0), (5.0, 5.0)]),
            Point::new(10.0, 10.0),
        );
        let err = evaluate(&item, &[], &zones()).unwrap_err();
        assert!(matches!(
            err,
            PlacementError::DegenerateShape { ref item, vertices: 2 } if item == "line"
        ));
    }

    #[test]
    fn state_names_match_serde() {
        let json = serde_json::to_string(&PlacementState::InTargetZoneConflicting).unwrap();
        assert_eq!(json, format!("\"{}\"", PlacementState::InTargetZoneConflicting.as_str()));
    }
}
