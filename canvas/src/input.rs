//! Input model: pointer sources, buttons, and the drag gesture state machine.
//!
//! The canvas follows a single-pointer model. A gesture starts when the
//! primary button (or the first touch) goes down on a placed sprite and ends
//! on release, touch end, or the pointer leaving the container. While a drag
//! is active, `InputState::Dragging` carries the grab offset captured at press
//! time; the offset stays fixed for the whole session so the sprite keeps the
//! same relationship to the pointer it had when it was picked up.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::layout::Point;
use crate::store::DishId;

/// Where a pointer event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerSource {
    /// Mouse or pen reported through mouse events.
    #[default]
    Mouse,
    /// Touch screen; only the first touch point is tracked.
    Touch,
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button (or single-finger tap).
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button (or two-finger tap).
    Secondary,
}

/// Internal state for the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress; waiting for the next press.
    #[default]
    Idle,
    /// A placed sprite is following the pointer.
    Dragging {
        /// The dish whose placement is being moved.
        dish_id: DishId,
        /// Pointer position minus sprite center at press time, container pixels.
        grab_offset: Point,
        /// Which kind of pointer started the drag.
        source: PointerSource,
    },
}

impl InputState {
    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// The dish being dragged, if any.
    #[must_use]
    pub fn dragged_dish(&self) -> Option<DishId> {
        match self {
            Self::Dragging { dish_id, .. } => Some(*dish_id),
            Self::Idle => None,
        }
    }

    /// Sprite center for a container-space pointer position during a drag.
    ///
    /// Moves from a different source than the one that started the drag are
    /// ignored, so emulated mouse events cannot steer a touch drag.
    #[must_use]
    pub fn drag_target(&self, pointer: Point, from: PointerSource) -> Option<Point> {
        match self {
            Self::Dragging { grab_offset, source, .. } if *source == from => Some(pointer.minus(*grab_offset)),
            Self::Dragging { .. } | Self::Idle => None,
        }
    }
}
