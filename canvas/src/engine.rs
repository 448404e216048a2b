//! Placement canvas controller.
//!
//! DESIGN
//! ======
//! The host owns the DOM; this module owns state. Every handler takes a host
//! event (pointer or touch position in client coordinates, a sidebar button,
//! a container measurement), mutates the store and gesture state, and returns
//! the [`Action`]s the host should apply: cursor changes, placement updates
//! to mirror, and redraw requests. Handlers never fail; anything that cannot
//! apply (unknown dish, unmeasured container, no drag) returns no actions.
//!
//! Only one drag runs at a time. Moves are honored only from the pointer
//! source that started the drag.

use crate::consts::{CURSOR_DEFAULT, CURSOR_GRABBING, DEFAULT_SCALE};
use crate::hit;
use crate::input::{Button, InputState, PointerSource};
use crate::layout::{BackgroundLayout, BackgroundSize, Container, Point};
use crate::scene::{self, Scene};
use crate::store::{DishId, DishStore, ImageRef, NewPlacement, PartialPlacement, Placement2D};
use crate::zorder::ZOrderOp;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    PlacementAdded(Placement2D),
    PlacementUpdated { dish_id: DishId, fields: PartialPlacement },
    PlacementRemoved { dish_id: DishId },
    ZOrderChanged,
    SetCursor(String),
    RenderNeeded,
}

/// Placement canvas controller.
///
/// Owns the entity store and the gesture state, and translates host input
/// (pointer/touch events in client coordinates, sidebar buttons) into store
/// mutations. The background layout is recomputed from the last measured
/// container on every use, so a resize or background change is picked up by
/// the next event without any invalidation step.
#[derive(Debug, Clone, Default)]
pub struct EngineCore {
    pub store: DishStore,
    pub input: InputState,
    /// Last measured container, `None` until the host reports a size.
    pub container: Option<Container>,
    /// Real-world size the background photo represents.
    pub background_size: BackgroundSize,
}

impl EngineCore {
    #[must_use]
    pub fn new(background_size: BackgroundSize) -> Self {
        Self { background_size, ..Self::default() }
    }

    /// Wrap an existing store.
    #[must_use]
    pub fn with_store(store: DishStore, background_size: BackgroundSize) -> Self {
        Self { store, background_size, ..Self::default() }
    }

    // --- Viewport / background ---

    /// Record a new container measurement (mount or resize).
    pub fn set_container(&mut self, container: Container) -> Vec<Action> {
        self.container = Some(container);
        vec![Action::RenderNeeded]
    }

    /// Forget the container measurement (canvas unmounted). Ends any drag.
    pub fn clear_container(&mut self) -> Vec<Action> {
        self.container = None;
        self.input = InputState::Idle;
        vec![Action::RenderNeeded]
    }

    /// Replace or clear the background photo.
    pub fn set_background(&mut self, image: Option<ImageRef>) -> Vec<Action> {
        self.store.set_background_image(image);
        vec![Action::RenderNeeded]
    }

    /// Change the real-world size the background represents.
    pub fn set_background_size(&mut self, size: BackgroundSize) -> Vec<Action> {
        self.background_size = size;
        vec![Action::RenderNeeded]
    }

    /// Current contain-fit layout, or `None` while the container is unmeasured.
    #[must_use]
    pub fn layout(&self) -> Option<BackgroundLayout> {
        let container = self.container?;
        BackgroundLayout::for_container(&container, self.background_size)
    }

    /// Paint list for the host renderer, if the layout is available.
    #[must_use]
    pub fn scene(&self) -> Option<Scene> {
        self.layout().map(|layout| scene::build(&self.store, &layout))
    }

    // --- Canvas membership ---

    /// Put a selected dish on the canvas, centered on the background.
    ///
    /// Silently skipped when the dish is unknown, unselected, already placed,
    /// or the container hasn't been measured yet.
    pub fn add_to_canvas(&mut self, dish_id: &DishId) -> Vec<Action> {
        if self.store.dish(dish_id).is_none() || !self.store.is_selected(dish_id) {
            tracing::debug!(%dish_id, "add_to_canvas skipped: not a selected dish");
            return Vec::new();
        }
        if self.store.is_placed(dish_id) {
            tracing::debug!(%dish_id, "add_to_canvas skipped: already placed");
            return Vec::new();
        }
        let Some(layout) = self.layout() else {
            tracing::debug!(%dish_id, "add_to_canvas skipped: container not measured");
            return Vec::new();
        };

        let center = layout.center();
        let placed = self.store.place_dish_2d(NewPlacement {
            dish_id: *dish_id,
            x: center.x,
            y: center.y,
            scale: DEFAULT_SCALE,
            rotation: 0.0,
            z_index: None,
        });
        match (placed, self.store.placement(dish_id)) {
            (true, Some(p)) => vec![Action::PlacementAdded(p.clone()), Action::RenderNeeded],
            _ => Vec::new(),
        }
    }

    /// Take a dish off the canvas. Its catalog entry and selection are kept.
    pub fn remove_from_canvas(&mut self, dish_id: &DishId) -> Vec<Action> {
        self.release_if_dragging(dish_id);
        match self.store.remove_placed_dish_2d(dish_id) {
            Some(_) => vec![Action::PlacementRemoved { dish_id: *dish_id }, Action::RenderNeeded],
            None => Vec::new(),
        }
    }

    /// Take every dish off the canvas.
    pub fn clear_canvas(&mut self) -> Vec<Action> {
        self.input = InputState::Idle;
        let removed: Vec<DishId> = self.store.placements().iter().map(|p| p.dish_id).collect();
        self.store.clear_placed_dishes_2d();
        let mut actions: Vec<Action> =
            removed.into_iter().map(|dish_id| Action::PlacementRemoved { dish_id }).collect();
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Delete a dish from the catalog, cascading to selection and placement.
    pub fn remove_dish(&mut self, dish_id: &DishId) -> Vec<Action> {
        self.release_if_dragging(dish_id);
        let was_placed = self.store.is_placed(dish_id);
        if self.store.remove_dish(dish_id).is_none() {
            return Vec::new();
        }
        if was_placed {
            vec![Action::PlacementRemoved { dish_id: *dish_id }, Action::RenderNeeded]
        } else {
            vec![Action::RenderNeeded]
        }
    }

    // --- Transforms ---

    /// Grow or shrink a placement by `delta`, clamped to the allowed range.
    pub fn adjust_scale(&mut self, dish_id: &DishId, delta: f64) -> Vec<Action> {
        let Some(current) = self.store.placement(dish_id).map(|p| p.scale) else {
            return Vec::new();
        };
        self.update(dish_id, PartialPlacement { scale: Some(current + delta), ..Default::default() })
    }

    /// Rotate a placement by `delta` degrees.
    pub fn rotate(&mut self, dish_id: &DishId, delta: f64) -> Vec<Action> {
        let Some(current) = self.store.placement(dish_id).map(|p| p.rotation) else {
            return Vec::new();
        };
        self.update(dish_id, PartialPlacement { rotation: Some(current + delta), ..Default::default() })
    }

    /// Restack a placement.
    pub fn reorder(&mut self, dish_id: &DishId, op: ZOrderOp) -> Vec<Action> {
        if self.store.reorder(dish_id, op) {
            vec![Action::ZOrderChanged, Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Gestures ---

    /// Start dragging a specific placed dish from a client-space point.
    ///
    /// Used directly by hosts whose sprites are their own event targets;
    /// `on_pointer_down` / `on_touch_start` hit-test first and then call this.
    pub fn begin_drag(&mut self, dish_id: &DishId, client_pt: Point, source: PointerSource) -> Vec<Action> {
        if self.input.is_dragging() {
            return Vec::new();
        }
        let Some(container) = self.container else {
            return Vec::new();
        };
        let Some(placement) = self.store.placement(dish_id) else {
            return Vec::new();
        };

        let pointer = container.client_to_container(client_pt);
        let grab_offset = pointer.minus(Point::new(placement.x, placement.y));
        self.input = InputState::Dragging { dish_id: *dish_id, grab_offset, source };
        vec![Action::SetCursor(CURSOR_GRABBING.into())]
    }

    pub fn on_pointer_down(&mut self, client_pt: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        self.press(client_pt, PointerSource::Mouse)
    }

    pub fn on_pointer_move(&mut self, client_pt: Point) -> Vec<Action> {
        self.drag_to(client_pt, PointerSource::Mouse)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.end_drag()
    }

    /// The pointer left the container; treated as a release.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.end_drag()
    }

    /// Touch start; only the first touch point is tracked.
    pub fn on_touch_start(&mut self, touches: &[Point]) -> Vec<Action> {
        match touches.first() {
            Some(pt) => self.press(*pt, PointerSource::Touch),
            None => Vec::new(),
        }
    }

    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        match touches.first() {
            Some(pt) => self.drag_to(*pt, PointerSource::Touch),
            None => Vec::new(),
        }
    }

    pub fn on_touch_end(&mut self) -> Vec<Action> {
        self.end_drag()
    }

    // --- Queries ---

    #[must_use]
    pub fn placement(&self, dish_id: &DishId) -> Option<&Placement2D> {
        self.store.placement(dish_id)
    }

    /// The dish currently being dragged, if any.
    #[must_use]
    pub fn dragging(&self) -> Option<DishId> {
        self.input.dragged_dish()
    }

    // --- Internals ---

    fn press(&mut self, client_pt: Point, source: PointerSource) -> Vec<Action> {
        let (Some(container), Some(layout)) = (self.container, self.layout()) else {
            return Vec::new();
        };
        let pointer = container.client_to_container(client_pt);
        match hit::hit_test(pointer, &self.store, &layout) {
            Some(dish_id) => self.begin_drag(&dish_id, client_pt, source),
            None => Vec::new(),
        }
    }

    fn drag_to(&mut self, client_pt: Point, source: PointerSource) -> Vec<Action> {
        let (Some(dish_id), Some(container)) = (self.input.dragged_dish(), self.container) else {
            return Vec::new();
        };
        let Some(target) = self.input.drag_target(container.client_to_container(client_pt), source) else {
            return Vec::new();
        };
        self.update(&dish_id, PartialPlacement { x: Some(target.x), y: Some(target.y), ..Default::default() })
    }

    fn end_drag(&mut self) -> Vec<Action> {
        if !self.input.is_dragging() {
            return Vec::new();
        }
        self.input = InputState::Idle;
        vec![Action::SetCursor(CURSOR_DEFAULT.into())]
    }

    fn release_if_dragging(&mut self, dish_id: &DishId) {
        if self.input.dragged_dish().as_ref() == Some(dish_id) {
            self.input = InputState::Idle;
        }
    }

    /// Apply `partial` and report the stored (clamped/normalized) values.
    fn update(&mut self, dish_id: &DishId, partial: PartialPlacement) -> Vec<Action> {
        if !self.store.update_placed_dish_2d(dish_id, &partial) {
            return Vec::new();
        }
        let Some(p) = self.store.placement(dish_id) else {
            return Vec::new();
        };
        let fields = PartialPlacement {
            x: partial.x.map(|_| p.x),
            y: partial.y.map(|_| p.y),
            scale: partial.scale.map(|_| p.scale),
            rotation: partial.rotation.map(|_| p.rotation),
            z_index: partial.z_index.map(|_| p.z_index),
        };
        vec![Action::PlacementUpdated { dish_id: *dish_id, fields }, Action::RenderNeeded]
    }
}
