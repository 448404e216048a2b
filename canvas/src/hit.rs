#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::layout::{BackgroundLayout, Point};
use crate::store::{DishId, DishStore, Placement2D};

/// Whether `pt` (container pixels) falls inside a `width` × `height` sprite
/// centered on the placement and rotated by its `rotation`.
#[must_use]
pub fn sprite_contains(placement: &Placement2D, width: f64, height: f64, pt: Point) -> bool {
    let dx = pt.x - placement.x;
    let dy = pt.y - placement.y;
    // Undo the sprite's clockwise rotation to test in its local frame.
    let (sin, cos) = (-placement.rotation.to_radians()).sin_cos();
    let local_x = dx * cos - dy * sin;
    let local_y = dx * sin + dy * cos;
    local_x.abs() <= width / 2.0 && local_y.abs() <= height / 2.0
}

/// The topmost placed dish under `pt` (container pixels), if any.
///
/// Placements whose dish is missing from the catalog are never hit.
#[must_use]
pub fn hit_test(pt: Point, store: &DishStore, layout: &BackgroundLayout) -> Option<DishId> {
    store.sorted_placements().into_iter().rev().find_map(|placement| {
        let dish = store.dish(&placement.dish_id)?;
        let (w, h) = layout.sprite_size_px(dish.width_cm, dish.height_cm, placement.scale);
        sprite_contains(placement, w, h, pt).then_some(placement.dish_id)
    })
}
