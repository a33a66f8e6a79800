use std::collections::{HashMap, HashSet};

use crate::error::{PlacementError, Result};
use crate::geometry::Point;
use crate::placement::{
    Evaluation, ItemId, PlaceableItem, PlacementState, evaluate, evaluate_detailed,
};
use crate::zone::ZoneSet;

/// A state transition produced by a position update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub item: ItemId,
    pub from: PlacementState,
    pub to: PlacementState,
}

/// Result of moving one item: its own evaluation plus every transition the
/// move caused across the board (the moved item first).
#[derive(Debug, Clone, PartialEq)]
pub struct MoveOutcome {
    pub evaluation: Evaluation,
    pub changes: Vec<StateChange>,
}

/// Number of items per state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateCounts {
    pub unplaced: usize,
    pub in_source: usize,
    pub in_target_valid: usize,
    pub in_target_conflicting: usize,
    pub out_of_bounds: usize,
}

/// Registry of placeable items in insertion order.
#[derive(Debug, Default)]
pub struct ItemRegistry {
    items: Vec<PlaceableItem>,
    states: HashMap<ItemId, PlacementState>,
    dirty: HashSet<ItemId>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item in the `Unplaced` state. Shapes are not validated
    /// here; a degenerate outline fails on its first evaluation.
    pub fn insert(&mut self, item: PlaceableItem) -> Result<()> {
        if self.states.contains_key(&item.id) {
            return Err(PlacementError::DuplicateItem(item.id));
        }
        self.states.insert(item.id.clone(), PlacementState::Unplaced);
        self.items.push(item);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&PlaceableItem> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or_else(|| PlacementError::ItemNotFound(id.to_string()))
    }

    pub fn items(&self) -> &[PlaceableItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state_of(&self, id: &str) -> Result<PlacementState> {
        self.states
            .get(id)
            .copied()
            .ok_or_else(|| PlacementError::ItemNotFound(id.to_string()))
    }

    /// Move an item to `anchor` and re-evaluate the board.
    ///
    /// On a degenerate shape the anchor and every state stay as they were.
    pub fn move_to(&mut self, id: &str, anchor: Point, zones: &ZoneSet) -> Result<MoveOutcome> {
        let idx = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| PlacementError::ItemNotFound(id.to_string()))?;

        let previous_anchor = self.items[idx].anchor;
        self.items[idx].anchor = anchor;

        // Items that were never positioned are not on the board yet and take
        // no part in conflict checks.
        let placed = self.placed_items(idx);
        let evaluation = match evaluate_detailed(&self.items[idx], &placed, zones) {
            Ok(evaluation) => evaluation,
            Err(err) => {
                self.items[idx].anchor = previous_anchor;
                return Err(err);
            }
        };

        let mut changes = Vec::new();
        if let Some(change) = self.set_state(idx, evaluation.state) {
            changes.push(change);
        }

        // Siblings only re-evaluate once they have left `Unplaced`, so an
        // untouched item keeps its initial state.
        let placed = self.placed_items(idx);
        for other in 0..self.items.len() {
            if other == idx || self.states[&self.items[other].id] == PlacementState::Unplaced {
                continue;
            }
            let Ok(state) = evaluate(&self.items[other], &placed, zones) else {
                continue;
            };
            if let Some(change) = self.set_state(other, state) {
                changes.push(change);
            }
        }

        Ok(MoveOutcome {
            evaluation,
            changes,
        })
    }

    /// Items that have left `Unplaced`, plus the item at `moving`.
    fn placed_items(&self, moving: usize) -> Vec<PlaceableItem> {
        self.items
            .iter()
            .enumerate()
            .filter(|(idx, item)| {
                *idx == moving || self.states[&item.id] != PlacementState::Unplaced
            })
            .map(|(_, item)| item.clone())
            .collect()
    }

    fn set_state(&mut self, idx: usize, state: PlacementState) -> Option<StateChange> {
        let id = &self.items[idx].id;
        let slot = self.states.get_mut(id)?;
        if *slot == state {
            return None;
        }
        let change = StateChange {
            item: id.clone(),
            from: *slot,
            to: state,
        };
        *slot = state;
        self.dirty.insert(id.clone());
        Some(change)
    }

    /// Items whose state changed since the last call, in insertion order.
    pub fn take_dirty(&mut self) -> Vec<(ItemId, PlacementState)> {
        if self.dirty.is_empty() {
            return Vec::new();
        }
        let dirty = std::mem::take(&mut self.dirty);
        self.items
            .iter()
            .filter(|item| dirty.contains(&item.id))
            .map(|item| (item.id.clone(), self.states[&item.id]))
            .collect()
    }

    pub fn has_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Every item with its current state, in insertion order.
    pub fn snapshot(&self) -> Vec<(ItemId, PlacementState)> {
        self.items
            .iter()
            .map(|item| (item.id.clone(), self.states[&item.id]))
            .collect()
    }

    pub fn counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for state in self.states.values() {
            match state {
                PlacementState::Unplaced => counts.unplaced += 1,
                PlacementState::InSourceZone => counts.in_source += 1,
                PlacementState::InTargetZoneValid => counts.in_target_valid += 1,
                PlacementState::InTargetZoneConflicting => counts.in_target_conflicting += 1,
                PlacementState::OutOfBounds => counts.out_of_bounds += 1,
            }
        }
        counts
    }

    /// True once every item sits validly in a target zone.
    pub fn all_in_target_valid(&self) -> bool {
        !self.items.is_empty()
            && self
                .states
                .values()
                .all(|state| *state == PlacementState::InTargetZoneValid)
    }

    /// Topmost item whose outline contains `point`. Later items draw on top.
    pub fn hit_test(&self, point: Point) -> Option<&PlaceableItem> {
        self.items
            .iter()
            .rev()
            .find(|item| item.world_shape().contains_point(point))
    }
}
