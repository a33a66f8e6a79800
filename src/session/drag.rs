use crate::geometry::Point;
use crate::placement::ItemId;

/// Item currently held by the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    pub item: ItemId,
    /// `pointer - anchor` captured at grab time.
    pub offset: Point,
}

/// Tracks the single active drag. A new grab replaces the previous one.
#[derive(Debug, Default)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grab(&mut self, item: impl Into<ItemId>, pointer: Point, anchor: Point) -> &ActiveDrag {
        self.active.insert(ActiveDrag {
            item: item.into(),
            offset: pointer - anchor,
        })
    }

    /// Anchor the held item should move to for `pointer`.
    pub fn follow(&self, pointer: Point) -> Option<(&str, Point)> {
        self.active
            .as_ref()
            .map(|drag| (drag.item.as_str(), pointer - drag.offset))
    }

    pub fn release(&mut self) -> Option<ActiveDrag> {
        self.active.take()
    }

    pub fn current(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }
}
