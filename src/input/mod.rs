//! Terminal pointer input.
//!
//! Maps crossterm mouse events onto session-space `PointerEvent`s. Only the
//! left button drives dragging; everything else is ignored.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::geometry::Point;
use crate::session::PointerEvent;

/// Session units per terminal cell on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub x: f64,
    pub y: f64,
}

impl Default for CellScale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

impl CellScale {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_point(&self, column: u16, row: u16) -> Point {
        Point::new(f64::from(column) * self.x, f64::from(row) * self.y)
    }
}

pub fn pointer_from_mouse(event: &MouseEvent, scale: CellScale) -> Option<PointerEvent> {
    let point = scale.to_point(event.column, event.row);
    match event.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down(point)),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerEvent::Drag(point)),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up(point)),
        _ => None,
    }
}
