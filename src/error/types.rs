use thiserror::Error;

use crate::placement::ItemId;
use crate::zone::ZoneId;

/// Unified result type for the stamp board crate.
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Errors surfaced by the placement engine.
///
/// Zone misses and overlaps are placement states, not errors.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("item `{item}` has a degenerate shape ({vertices} vertices)")]
    DegenerateShape { item: ItemId, vertices: usize },
    #[error("item `{0}` not found")]
    ItemNotFound(ItemId),
    #[error("item `{0}` is already registered")]
    DuplicateItem(ItemId),
    #[error("zone `{0}` is already registered")]
    DuplicateZone(ZoneId),
    #[error("zone `{0}` does not enclose any area")]
    InvalidZone(ZoneId),
    #[error("board config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
