//! Preset catalog loaded on first start.
//!
//! Images are paths into the host's static assets; the processed versions
//! were cut out ahead of time, so seeding never runs the upload pipeline.
//! Sizes are rough and meant to be adjusted by the user.

use canvas::store::{DishStore, ImageRef, NewDish};

#[cfg(test)]
#[path = "seed_test.rs"]
mod seed_test;

pub const DEFAULT_BACKGROUND_IMAGE: &str = "/机2.png";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetDish {
    pub name: &'static str,
    pub width_cm: f64,
    pub height_cm: f64,
    pub original_image: &'static str,
    pub processed_image: &'static str,
}

impl PresetDish {
    const fn new(
        name: &'static str,
        width_cm: f64,
        height_cm: f64,
        original_image: &'static str,
        processed_image: &'static str,
    ) -> Self {
        Self { name, width_cm, height_cm, original_image, processed_image }
    }

    fn to_new_dish(self) -> NewDish {
        NewDish {
            name: self.name.to_owned(),
            width_cm: self.width_cm,
            height_cm: self.height_cm,
            original_image: ImageRef::from(self.original_image),
            processed_image: ImageRef::from(self.processed_image),
        }
    }
}

pub const DEFAULT_DISHES: [PresetDish; 12] = [
    PresetDish::new("器1", 10.0, 10.0, "/器1.jpg", "/器1_processed.png"),
    PresetDish::new("器2", 15.0, 15.0, "/器2.jpg", "/器2_processed.png"),
    PresetDish::new("器3", 20.0, 20.0, "/器3.jpg", "/器3_processed.png"),
    PresetDish::new("器4", 12.0, 12.0, "/器4.jpg", "/器4_processed.png"),
    PresetDish::new("器5", 6.0, 6.0, "/器5.jpg", "/器5_processed.png"),
    PresetDish::new("器6", 16.0, 16.0, "/器6.jpg", "/器6_processed.png"),
    PresetDish::new("器7", 6.0, 6.0, "/器7.jpg", "/器7_processed.png"),
    // No source photo survives for this one.
    PresetDish::new("器8", 13.0, 13.0, "/器8_processed.png", "/器8_processed.png"),
    PresetDish::new("器10", 5.0, 5.0, "/器10.jpg", "/器10_processed.png"),
    PresetDish::new("器11", 17.0, 17.0, "/器11.jpg", "/器11_processed.png"),
    PresetDish::new("おぼん1", 35.0, 25.0, "/おぼん1.jpg", "/おぼん1_processed.png"),
    PresetDish::new("マット1", 40.0, 30.0, "/マット1.jpg", "/マット1_processed.png"),
];

/// Load the presets and default background into an untouched store.
///
/// Runs at most once per store: skipped when the catalog already has dishes
/// or initialization already happened. A background the user already picked
/// is kept. Returns whether anything was seeded.
pub fn initialize_with_defaults(store: &mut DishStore) -> bool {
    if store.is_initialized() || !store.is_empty() {
        tracing::debug!(dishes = store.len(), "seeding skipped");
        store.mark_initialized();
        return false;
    }
    for preset in DEFAULT_DISHES {
        store.add_dish(preset.to_new_dish());
    }
    if store.background_image().is_none() {
        store.set_background_image(Some(ImageRef::from(DEFAULT_BACKGROUND_IMAGE)));
    }
    store.mark_initialized();
    tracing::info!(dishes = DEFAULT_DISHES.len(), "catalog seeded with presets");
    true
}
