//! Placement validation.
//!
//! `evaluate` is a pure function of the item's polygon, its siblings'
//! polygons and the zone set. It never mutates anything; the registry decides
//! what to do with the answer.

mod core;

pub use self::core::{
    Evaluation, ItemId, PlaceableItem, PlacementState, evaluate, evaluate_detailed,
};
