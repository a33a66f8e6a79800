//! Item registry: the session-owned set of placeable items and their last
//! evaluated states.

mod core;

pub use crate::placement::ItemId;
pub use self::core::{ItemRegistry, MoveOutcome, StateChange, StateCounts};
