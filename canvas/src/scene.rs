//! Scene projection: what the host renderer should draw, and where.
//!
//! The canvas crate does not touch any drawing API. Instead it projects the
//! store and the current layout into a flat, serializable [`Scene`]: the
//! background rectangle followed by one [`SpriteFrame`] per placement in paint
//! order. The host turns that into DOM nodes, canvas draw calls, or anything
//! else. Building a scene never mutates state.

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;

use serde::Serialize;

use crate::layout::BackgroundLayout;
use crate::store::{DishId, DishStore, ImageRef};

/// The background photo's on-screen rectangle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackgroundFrame {
    /// Background photo, or `None` when the user hasn't chosen one yet.
    pub image: Option<ImageRef>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Real-world size shown in the size badge.
    pub width_cm: f64,
    pub height_cm: f64,
}

/// One placed dish, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteFrame {
    pub dish_id: DishId,
    /// Label for hover text.
    pub name: String,
    /// Background-removed photo.
    pub image: ImageRef,
    /// Sprite center in container pixels.
    pub center_x: f64,
    pub center_y: f64,
    /// Drawn size in container pixels.
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees.
    pub rotation: f64,
    pub z_index: i64,
    /// Physical size for the hover label.
    pub width_cm: f64,
    pub height_cm: f64,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub background: BackgroundFrame,
    /// Sprites bottom first.
    pub sprites: Vec<SpriteFrame>,
}

/// Project the store through `layout`.
///
/// Placements whose dish no longer exists are skipped.
#[must_use]
pub fn build(store: &DishStore, layout: &BackgroundLayout) -> Scene {
    let background = BackgroundFrame {
        image: store.background_image().cloned(),
        x: layout.offset_x,
        y: layout.offset_y,
        width: layout.display_width,
        height: layout.display_height,
        width_cm: layout.background.width_cm,
        height_cm: layout.background.height_cm,
    };

    let sprites = store
        .sorted_placements()
        .into_iter()
        .filter_map(|p| {
            let dish = store.dish(&p.dish_id)?;
            let (width, height) = layout.sprite_size_px(dish.width_cm, dish.height_cm, p.scale);
            Some(SpriteFrame {
                dish_id: p.dish_id,
                name: dish.name.clone(),
                image: dish.processed_image.clone(),
                center_x: p.x,
                center_y: p.y,
                width,
                height,
                rotation: p.rotation,
                z_index: p.z_index,
                width_cm: dish.width_cm,
                height_cm: dish.height_cm,
            })
        })
        .collect();

    Scene { background, sprites }
}

impl SpriteFrame {
    /// CSS `left`/`top` for an element positioned by its top-left corner.
    #[must_use]
    pub fn top_left(&self) -> (f64, f64) {
        (self.center_x - self.width / 2.0, self.center_y - self.height / 2.0)
    }
}
