//! Entity store: the dish catalog, selection set, 2D placements, and background.
//!
//! This module defines the records that describe what the user has registered
//! (`DishRecord`), which of those are marked for placement (the selection
//! set), where placed dishes sit on the canvas (`Placement2D`), and which
//! background photo they are composed onto. `DishStore` owns all of it.
//!
//! Every mutation is a total `&mut self` method: operations that reference an
//! unknown id are silently ignored and report `false`. Because a mutation is a
//! single method call, readers can never observe a half-applied change (for
//! example a removed dish that is still selected or placed).

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_SCALE, FULL_TURN_DEG, MAX_SCALE, MIN_SCALE};
use crate::zorder::{self, ZOrderOp};

/// Unique identifier for a dish record.
pub type DishId = Uuid;

/// Opaque handle to image content (a `data:` URL or a static asset path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A registered physical object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DishRecord {
    /// Unique identifier, assigned by the store.
    pub id: DishId,
    /// Display name.
    pub name: String,
    /// Physical width in centimeters. Always positive.
    pub width_cm: f64,
    /// Physical height in centimeters. Always positive.
    pub height_cm: f64,
    /// Photo as uploaded.
    pub original_image: ImageRef,
    /// Photo with the background removed; this is what the canvas draws.
    pub processed_image: ImageRef,
    /// Milliseconds since the Unix epoch at registration.
    pub created_at: i64,
}

/// Fields supplied when registering a dish. Callers validate before adding.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDish {
    pub name: String,
    pub width_cm: f64,
    pub height_cm: f64,
    pub original_image: ImageRef,
    pub processed_image: ImageRef,
}

/// Sparse update for a dish record. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartialDish {
    pub name: Option<String>,
    pub width_cm: Option<f64>,
    pub height_cm: Option<f64>,
    pub original_image: Option<ImageRef>,
    pub processed_image: Option<ImageRef>,
}

/// A dish positioned on the 2D canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement2D {
    /// The placed dish. At most one placement exists per dish.
    pub dish_id: DishId,
    /// Sprite center x in container pixels.
    pub x: f64,
    /// Sprite center y in container pixels.
    pub y: f64,
    /// Multiplier on the dish's physical size, within `MIN_SCALE..=MAX_SCALE`.
    pub scale: f64,
    /// Clockwise rotation in degrees, in `[0, 360)`.
    pub rotation: f64,
    /// Paint order; higher values are drawn on top.
    pub z_index: i64,
}

/// Fields supplied when placing a dish. `z_index` defaults to one above the current top.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlacement {
    pub dish_id: DishId,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub rotation: f64,
    pub z_index: Option<i64>,
}

/// Sparse update for a placement. Only present fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialPlacement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

/// Clamp a scale multiplier into the allowed range.
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

/// Reduce an angle in degrees to its representative in `[0, 360)`.
#[must_use]
pub fn normalize_rotation(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(FULL_TURN_DEG);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= FULL_TURN_DEG { 0.0 } else { wrapped }
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// In-memory store of dishes and their placement state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DishStore {
    dishes: Vec<DishRecord>,
    selection: HashSet<DishId>,
    placements: Vec<Placement2D>,
    background_image: Option<ImageRef>,
    initialized: bool,
}

impl DishStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Catalog ---

    /// Register a dish, returning its new id.
    pub fn add_dish(&mut self, dish: NewDish) -> DishId {
        let id = Uuid::new_v4();
        self.dishes.push(DishRecord {
            id,
            name: dish.name,
            width_cm: dish.width_cm,
            height_cm: dish.height_cm,
            original_image: dish.original_image,
            processed_image: dish.processed_image,
            created_at: now_ms(),
        });
        id
    }

    /// Merge `partial` into a dish. Returns false if the dish doesn't exist.
    ///
    /// Non-positive dimensions are ignored so records keep positive sizes.
    pub fn update_dish(&mut self, id: &DishId, partial: PartialDish) -> bool {
        let Some(dish) = self.dishes.iter_mut().find(|d| d.id == *id) else {
            tracing::debug!(dish_id = %id, "update_dish: unknown dish");
            return false;
        };
        if let Some(name) = partial.name {
            dish.name = name;
        }
        if let Some(w) = partial.width_cm.filter(|w| positive(*w)) {
            dish.width_cm = w;
        }
        if let Some(h) = partial.height_cm.filter(|h| positive(*h)) {
            dish.height_cm = h;
        }
        if let Some(img) = partial.original_image {
            dish.original_image = img;
        }
        if let Some(img) = partial.processed_image {
            dish.processed_image = img;
        }
        true
    }

    /// Remove a dish along with its selection entry and placement.
    pub fn remove_dish(&mut self, id: &DishId) -> Option<DishRecord> {
        let idx = self.dishes.iter().position(|d| d.id == *id)?;
        self.selection.remove(id);
        self.placements.retain(|p| p.dish_id != *id);
        Some(self.dishes.remove(idx))
    }

    /// Remove every dish, selection entry, and placement.
    pub fn clear_dishes(&mut self) {
        self.dishes.clear();
        self.selection.clear();
        self.placements.clear();
    }

    /// Look up a dish by id.
    #[must_use]
    pub fn dish(&self, id: &DishId) -> Option<&DishRecord> {
        self.dishes.iter().find(|d| d.id == *id)
    }

    /// All dishes in registration order.
    #[must_use]
    pub fn dishes(&self) -> &[DishRecord] {
        &self.dishes
    }

    /// Number of registered dishes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dishes.len()
    }

    /// Returns `true` if no dishes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }

    // --- Seeding guard ---

    /// Whether default seeding has already run for this store.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Record that default seeding has run.
    pub fn mark_initialized(&mut self) {
        self.initialized = true;
    }

    // --- Selection ---

    /// Add the dish to the selection if absent, remove it if present.
    ///
    /// Unknown ids are ignored. Returns whether the dish is selected afterwards.
    pub fn toggle_selection(&mut self, id: &DishId) -> bool {
        if self.dish(id).is_none() {
            tracing::debug!(dish_id = %id, "toggle_selection: unknown dish");
            return false;
        }
        if self.selection.remove(id) {
            false
        } else {
            self.selection.insert(*id);
            true
        }
    }

    /// Deselect everything.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn is_selected(&self, id: &DishId) -> bool {
        self.selection.contains(id)
    }

    /// The raw selection set.
    #[must_use]
    pub fn selection(&self) -> &HashSet<DishId> {
        &self.selection
    }

    /// Selected dishes in catalog order.
    #[must_use]
    pub fn selected_dishes(&self) -> Vec<&DishRecord> {
        self.dishes.iter().filter(|d| self.selection.contains(&d.id)).collect()
    }

    // --- Background ---

    /// Replace or clear the background photo. Existing placements keep their coordinates.
    pub fn set_background_image(&mut self, image: Option<ImageRef>) {
        self.background_image = image;
    }

    #[must_use]
    pub fn background_image(&self) -> Option<&ImageRef> {
        self.background_image.as_ref()
    }

    // --- Placements ---

    /// Place a dish on the canvas. Returns false if it is already placed.
    ///
    /// Scale is clamped and rotation normalized on the way in; non-finite
    /// values fall back to the defaults (origin, scale 1, no rotation). Without an
    /// explicit `z_index` the placement goes one above the current top (or 1
    /// on an empty canvas).
    pub fn place_dish_2d(&mut self, placement: NewPlacement) -> bool {
        if self.is_placed(&placement.dish_id) {
            tracing::debug!(dish_id = %placement.dish_id, "place_dish_2d: already placed");
            return false;
        }
        let z_index = placement
            .z_index
            .unwrap_or_else(|| self.placements.iter().map(|p| p.z_index).max().unwrap_or(0).saturating_add(1));
        self.placements.push(Placement2D {
            dish_id: placement.dish_id,
            x: finite_or(placement.x, 0.0),
            y: finite_or(placement.y, 0.0),
            scale: clamp_scale(finite_or(placement.scale, DEFAULT_SCALE)),
            rotation: normalize_rotation(finite_or(placement.rotation, 0.0)),
            z_index,
        });
        true
    }

    /// Merge `partial` into a placement. Returns false if the dish isn't placed.
    ///
    /// Non-finite position, scale, or rotation fields are ignored.
    pub fn update_placed_dish_2d(&mut self, dish_id: &DishId, partial: &PartialPlacement) -> bool {
        let Some(p) = self.placements.iter_mut().find(|p| p.dish_id == *dish_id) else {
            tracing::debug!(%dish_id, "update_placed_dish_2d: not placed");
            return false;
        };
        if let Some(x) = partial.x.filter(|v| v.is_finite()) {
            p.x = x;
        }
        if let Some(y) = partial.y.filter(|v| v.is_finite()) {
            p.y = y;
        }
        if let Some(scale) = partial.scale.filter(|v| v.is_finite()) {
            p.scale = clamp_scale(scale);
        }
        if let Some(rotation) = partial.rotation.filter(|v| v.is_finite()) {
            p.rotation = normalize_rotation(rotation);
        }
        if let Some(z) = partial.z_index {
            p.z_index = z;
        }
        true
    }

    /// Take a dish off the canvas, returning its placement if it had one.
    pub fn remove_placed_dish_2d(&mut self, dish_id: &DishId) -> Option<Placement2D> {
        let idx = self.placements.iter().position(|p| p.dish_id == *dish_id)?;
        Some(self.placements.remove(idx))
    }

    /// Take every dish off the canvas.
    pub fn clear_placed_dishes_2d(&mut self) {
        self.placements.clear();
    }

    #[must_use]
    pub fn placement(&self, dish_id: &DishId) -> Option<&Placement2D> {
        self.placements.iter().find(|p| p.dish_id == *dish_id)
    }

    #[must_use]
    pub fn is_placed(&self, dish_id: &DishId) -> bool {
        self.placement(dish_id).is_some()
    }

    /// Placements in insertion order.
    #[must_use]
    pub fn placements(&self) -> &[Placement2D] {
        &self.placements
    }

    /// Placements in paint order (bottom first).
    #[must_use]
    pub fn sorted_placements(&self) -> Vec<&Placement2D> {
        let mut sorted: Vec<&Placement2D> = self.placements.iter().collect();
        sorted.sort_by_key(|p| p.z_index);
        sorted
    }

    // --- Z-order ---

    /// Apply a z-order operation. Returns whether any z-index changed.
    pub fn reorder(&mut self, dish_id: &DishId, op: ZOrderOp) -> bool {
        zorder::apply(&mut self.placements, dish_id, op)
    }

    pub fn bring_to_front(&mut self, dish_id: &DishId) -> bool {
        self.reorder(dish_id, ZOrderOp::BringToFront)
    }

    pub fn send_to_back(&mut self, dish_id: &DishId) -> bool {
        self.reorder(dish_id, ZOrderOp::SendToBack)
    }

    pub fn bring_forward(&mut self, dish_id: &DishId) -> bool {
        self.reorder(dish_id, ZOrderOp::BringForward)
    }

    pub fn send_backward(&mut self, dish_id: &DishId) -> bool {
        self.reorder(dish_id, ZOrderOp::SendBackward)
    }
}
