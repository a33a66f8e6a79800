//! Zone module orchestrator.
//!
//! Zones are the immutable regions items are validated against. Callers import
//! the types from here while the containment logic lives in `core`.

mod core;

pub use self::core::{Zone, ZoneId, ZoneRole, ZoneSet, ZoneShape};
