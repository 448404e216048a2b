#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::consts::{MAX_SCALE, MIN_SCALE};
use crate::store::NewDish;

// =============================================================
// Helpers
// =============================================================

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn new_dish(name: &str, w: f64, h: f64) -> NewDish {
    NewDish {
        name: name.into(),
        width_cm: w,
        height_cm: h,
        original_image: ImageRef::from(format!("/{name}.jpg")),
        processed_image: ImageRef::from(format!("/{name}_processed.png")),
    }
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Engine with a 60×40 cm background in a 1000×500 container whose top-left
/// sits at client (50, 80). Layout: 12.5 px/cm, background center (500, 250).
fn measured_core() -> EngineCore {
    let mut core = EngineCore::new(BackgroundSize::new(60.0, 40.0));
    core.set_container(Container::new(pt(50.0, 80.0), 1000.0, 500.0));
    core
}

/// Add and select a dish.
fn selected(core: &mut EngineCore, name: &str, w: f64, h: f64) -> DishId {
    let id = core.store.add_dish(new_dish(name, w, h));
    core.store.toggle_selection(&id);
    id
}

/// Add, select, and place a dish at the background center.
fn placed(core: &mut EngineCore, name: &str, w: f64, h: f64) -> DishId {
    let id = selected(core, name, w, h);
    core.add_to_canvas(&id);
    id
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn position(core: &EngineCore, id: &DishId) -> (f64, f64) {
    core.placement(id).map_or((f64::NAN, f64::NAN), |p| (p.x, p.y))
}

// =============================================================
// Construction and layout
// =============================================================

#[test]
fn core_default_is_idle_and_unmeasured() {
    let core = EngineCore::default();
    assert_eq!(core.input, InputState::Idle);
    assert!(core.container.is_none());
    assert!(core.layout().is_none());
    assert!(core.scene().is_none());
    assert_eq!(core.background_size, BackgroundSize::default());
}

#[test]
fn layout_scenario_1000_by_500() {
    let core = measured_core();
    let layout = core.layout().unwrap();
    assert!(approx_eq(layout.display_width, 750.0));
    assert!(approx_eq(layout.display_height, 500.0));
    assert!(approx_eq(layout.offset_x, 125.0));
    assert!(approx_eq(layout.offset_y, 0.0));
    assert!(approx_eq(layout.pixels_per_cm, 12.5));
}

#[test]
fn layout_recomputed_after_resize() {
    let mut core = measured_core();
    let actions = core.set_container(Container::new(pt(0.0, 0.0), 600.0, 800.0));
    assert!(has_render_needed(&actions));
    let layout = core.layout().unwrap();
    assert!(approx_eq(layout.display_width, 600.0));
    assert!(approx_eq(layout.display_height, 400.0));
    assert!(approx_eq(layout.offset_y, 200.0));
    assert!(approx_eq(layout.pixels_per_cm, 10.0));
}

#[test]
fn layout_follows_background_size_change() {
    let mut core = measured_core();
    core.set_background_size(BackgroundSize::new(100.0, 70.0));
    let layout = core.layout().unwrap();
    assert!(approx_eq(layout.display_height, 500.0));
    assert!(approx_eq(layout.display_width, 500.0 * 100.0 / 70.0));
}

#[test]
fn clear_container_drops_layout() {
    let mut core = measured_core();
    core.clear_container();
    assert!(core.layout().is_none());
}

// =============================================================
// add_to_canvas
// =============================================================

#[test]
fn add_to_canvas_centers_on_background() {
    let mut core = measured_core();
    let id = selected(&mut core, "plate", 20.0, 20.0);
    let actions = core.add_to_canvas(&id);

    assert!(has_action(&actions, |a| matches!(a, Action::PlacementAdded(p) if p.dish_id == id)));
    assert!(has_render_needed(&actions));
    let p = core.placement(&id).unwrap();
    assert!(approx_eq(p.x, 500.0));
    assert!(approx_eq(p.y, 250.0));
    assert_eq!(p.scale, 1.0);
    assert_eq!(p.rotation, 0.0);
    assert_eq!(p.z_index, 1);
}

#[test]
fn add_to_canvas_skipped_before_measurement() {
    let mut core = EngineCore::new(BackgroundSize::new(60.0, 40.0));
    let id = selected(&mut core, "plate", 20.0, 20.0);
    assert!(core.add_to_canvas(&id).is_empty());
    assert!(core.store.placements().is_empty());
}

#[test]
fn add_to_canvas_skipped_for_unselected_dish() {
    let mut core = measured_core();
    let id = core.store.add_dish(new_dish("cup", 8.0, 8.0));
    assert!(core.add_to_canvas(&id).is_empty());
    assert!(!core.store.is_placed(&id));
}

#[test]
fn add_to_canvas_is_idempotent() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    core.store.update_placed_dish_2d(&id, &PartialPlacement { x: Some(10.0), ..Default::default() });
    assert!(core.add_to_canvas(&id).is_empty());
    assert_eq!(core.store.placements().len(), 1);
    assert_eq!(position(&core, &id).0, 10.0);
}

#[test]
fn add_to_canvas_stacks_new_dishes_on_top() {
    let mut core = measured_core();
    let a = placed(&mut core, "a", 10.0, 10.0);
    let b = placed(&mut core, "b", 10.0, 10.0);
    assert_eq!(core.placement(&a).unwrap().z_index, 1);
    assert_eq!(core.placement(&b).unwrap().z_index, 2);
}

#[test]
fn add_after_resize_uses_new_center() {
    let mut core = measured_core();
    let a = placed(&mut core, "a", 10.0, 10.0);
    core.set_container(Container::new(pt(0.0, 0.0), 400.0, 400.0));
    let b = placed(&mut core, "b", 10.0, 10.0);
    // Existing placements keep their pixel coordinates.
    assert_eq!(position(&core, &a), (500.0, 250.0));
    let (bx, by) = position(&core, &b);
    assert!(approx_eq(bx, 200.0));
    assert!(approx_eq(by, 200.0));
}

// =============================================================
// Mouse drag
// =============================================================

#[test]
fn drag_keeps_grab_offset() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);

    // Sprite center (500, 250) is client (550, 330). Grab 10 px right, 5 px down.
    let actions = core.on_pointer_down(pt(560.0, 335.0), Button::Primary);
    assert!(has_action(&actions, |a| matches!(a, Action::SetCursor(c) if c == "grabbing")));
    assert_eq!(core.dragging(), Some(id));

    let actions = core.on_pointer_move(pt(660.0, 435.0));
    assert!(has_action(&actions, |a| matches!(
        a,
        Action::PlacementUpdated { dish_id, fields } if *dish_id == id && fields.x == Some(600.0) && fields.y == Some(350.0)
    )));
    assert_eq!(position(&core, &id), (600.0, 350.0));

    // The offset is not re-derived from the moved sprite.
    core.on_pointer_move(pt(160.0, 135.0));
    assert_eq!(position(&core, &id), (100.0, 50.0));

    let actions = core.on_pointer_up();
    assert!(has_action(&actions, |a| matches!(a, Action::SetCursor(c) if c == "default")));
    assert!(core.dragging().is_none());
    assert_eq!(position(&core, &id), (100.0, 50.0));
}

#[test]
fn move_without_drag_does_nothing() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    assert!(core.on_pointer_move(pt(0.0, 0.0)).is_empty());
    assert_eq!(position(&core, &id), (500.0, 250.0));
}

#[test]
fn press_on_empty_space_does_not_drag() {
    let mut core = measured_core();
    placed(&mut core, "cup", 4.0, 4.0);
    assert!(core.on_pointer_down(pt(60.0, 90.0), Button::Primary).is_empty());
    assert!(core.dragging().is_none());
}

#[test]
fn secondary_button_does_not_drag() {
    let mut core = measured_core();
    placed(&mut core, "plate", 20.0, 20.0);
    assert!(core.on_pointer_down(pt(550.0, 330.0), Button::Secondary).is_empty());
    assert!(core.dragging().is_none());
}

#[test]
fn pointer_leave_ends_drag() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    core.on_pointer_down(pt(550.0, 330.0), Button::Primary);
    core.on_pointer_move(pt(600.0, 330.0));
    core.on_pointer_leave();
    assert!(core.dragging().is_none());
    // Later moves no longer affect the sprite.
    core.on_pointer_move(pt(900.0, 330.0));
    assert_eq!(position(&core, &id), (550.0, 250.0));
}

#[test]
fn press_picks_topmost_sprite() {
    let mut core = measured_core();
    let a = placed(&mut core, "a", 10.0, 10.0);
    let b = placed(&mut core, "b", 10.0, 10.0);
    core.on_pointer_down(pt(550.0, 330.0), Button::Primary);
    assert_eq!(core.dragging(), Some(b));
    core.on_pointer_up();

    core.reorder(&a, ZOrderOp::BringToFront);
    core.on_pointer_down(pt(550.0, 330.0), Button::Primary);
    assert_eq!(core.dragging(), Some(a));
}

#[test]
fn only_one_drag_at_a_time() {
    let mut core = measured_core();
    let a = placed(&mut core, "a", 10.0, 10.0);
    let b = selected(&mut core, "b", 10.0, 10.0);
    core.add_to_canvas(&b);
    core.begin_drag(&a, pt(550.0, 330.0), PointerSource::Mouse);
    assert!(core.begin_drag(&b, pt(550.0, 330.0), PointerSource::Mouse).is_empty());
    assert_eq!(core.dragging(), Some(a));
}

#[test]
fn begin_drag_requires_placement_and_container() {
    let mut core = EngineCore::new(BackgroundSize::new(60.0, 40.0));
    let id = selected(&mut core, "a", 10.0, 10.0);
    assert!(core.begin_drag(&id, pt(0.0, 0.0), PointerSource::Mouse).is_empty());
    let mut core = measured_core();
    assert!(core.begin_drag(&Uuid::new_v4(), pt(0.0, 0.0), PointerSource::Mouse).is_empty());
}

#[test]
fn release_without_drag_is_noop() {
    let mut core = measured_core();
    assert!(core.on_pointer_up().is_empty());
    assert!(core.on_touch_end().is_empty());
}

// =============================================================
// Touch drag
// =============================================================

#[test]
fn touch_drag_tracks_first_touch() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);

    core.on_touch_start(&[pt(550.0, 330.0), pt(10.0, 10.0)]);
    assert_eq!(core.input, InputState::Dragging { dish_id: id, grab_offset: pt(0.0, 0.0), source: PointerSource::Touch });

    core.on_touch_move(&[pt(450.0, 230.0)]);
    assert_eq!(position(&core, &id), (400.0, 150.0));
    core.on_touch_end();
    assert!(core.dragging().is_none());
}

#[test]
fn mouse_move_does_not_steer_touch_drag() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);

    core.on_touch_start(&[pt(550.0, 330.0)]);
    assert!(core.on_pointer_move(pt(10.0, 10.0)).is_empty());
    assert_eq!(position(&core, &id), (500.0, 250.0));

    core.on_touch_move(&[pt(560.0, 340.0)]);
    assert_eq!(position(&core, &id), (510.0, 260.0));
}

#[test]
fn touch_move_does_not_steer_mouse_drag() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);

    core.on_pointer_down(pt(550.0, 330.0), Button::Primary);
    assert!(core.on_touch_move(&[pt(10.0, 10.0)]).is_empty());
    assert_eq!(position(&core, &id), (500.0, 250.0));
    assert_eq!(core.dragging(), Some(id));
}

#[test]
fn touch_without_points_is_ignored() {
    let mut core = measured_core();
    placed(&mut core, "plate", 20.0, 20.0);
    assert!(core.on_touch_start(&[]).is_empty());
    assert!(core.on_touch_move(&[]).is_empty());
}

// =============================================================
// Scale and rotation
// =============================================================

#[test]
fn scale_steps_clamp_to_range() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    for _ in 0..40 {
        core.adjust_scale(&id, 0.1);
        let s = core.placement(&id).unwrap().scale;
        assert!((MIN_SCALE..=MAX_SCALE).contains(&s));
    }
    assert_eq!(core.placement(&id).unwrap().scale, MAX_SCALE);
    for _ in 0..40 {
        core.adjust_scale(&id, -0.1);
    }
    assert_eq!(core.placement(&id).unwrap().scale, MIN_SCALE);
}

#[test]
fn non_finite_deltas_leave_transform_in_range() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    core.adjust_scale(&id, f64::NAN);
    core.rotate(&id, f64::INFINITY);

    let p = core.placement(&id).unwrap();
    assert_eq!(p.scale, 1.0);
    assert_eq!(p.rotation, 0.0);
}

#[test]
fn scale_action_reports_clamped_value() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    let actions = core.adjust_scale(&id, 10.0);
    assert!(has_action(&actions, |a| matches!(
        a,
        Action::PlacementUpdated { fields, .. } if fields.scale == Some(MAX_SCALE) && fields.x.is_none()
    )));
}

#[test]
fn rotate_wraps_into_canonical_range() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    for _ in 0..9 {
        core.rotate(&id, 45.0);
    }
    assert_eq!(core.placement(&id).unwrap().rotation, 45.0);
    core.rotate(&id, -90.0);
    assert_eq!(core.placement(&id).unwrap().rotation, 315.0);
}

#[test]
fn transforms_on_unplaced_dish_are_noops() {
    let mut core = measured_core();
    let before = core.store.clone();
    let ghost = Uuid::new_v4();
    assert!(core.adjust_scale(&ghost, 0.1).is_empty());
    assert!(core.rotate(&ghost, 45.0).is_empty());
    assert!(core.reorder(&ghost, ZOrderOp::BringToFront).is_empty());
    assert!(core.remove_from_canvas(&ghost).is_empty());
    assert_eq!(core.store, before);
}

#[test]
fn scaled_sprite_scenario() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    core.adjust_scale(&id, 1.0);
    let scene = core.scene().unwrap();
    assert!(approx_eq(scene.sprites[0].width, 500.0));
    assert!(approx_eq(scene.sprites[0].height, 500.0));
}

// =============================================================
// Z-order
// =============================================================

#[test]
fn reorder_reports_change() {
    let mut core = measured_core();
    let a = placed(&mut core, "a", 10.0, 10.0);
    let b = placed(&mut core, "b", 10.0, 10.0);
    let actions = core.reorder(&b, ZOrderOp::SendToBack);
    assert!(has_action(&actions, |a| matches!(a, Action::ZOrderChanged)));
    assert_eq!(core.placement(&b).unwrap().z_index, 0);
    assert_eq!(core.placement(&a).unwrap().z_index, 1);
}

#[test]
fn reorder_noop_reports_nothing() {
    let mut core = measured_core();
    placed(&mut core, "a", 10.0, 10.0);
    let b = placed(&mut core, "b", 10.0, 10.0);
    assert!(core.reorder(&b, ZOrderOp::BringForward).is_empty());
}

// =============================================================
// Removal
// =============================================================

#[test]
fn remove_from_canvas_keeps_catalog_and_selection() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    let actions = core.remove_from_canvas(&id);
    assert!(has_action(&actions, |a| matches!(a, Action::PlacementRemoved { dish_id } if *dish_id == id)));
    assert!(!core.store.is_placed(&id));
    assert!(core.store.is_selected(&id));
    assert!(core.store.dish(&id).is_some());
}

#[test]
fn remove_dish_mid_drag_ends_gesture() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    core.on_pointer_down(pt(550.0, 330.0), Button::Primary);
    let actions = core.remove_dish(&id);
    assert!(has_action(&actions, |a| matches!(a, Action::PlacementRemoved { .. })));
    assert!(core.dragging().is_none());
    assert!(core.store.dish(&id).is_none());
    assert!(!core.store.is_selected(&id));
    assert!(core.on_pointer_move(pt(0.0, 0.0)).is_empty());
}

#[test]
fn remove_unplaced_dish_only_rerenders() {
    let mut core = measured_core();
    let id = selected(&mut core, "cup", 8.0, 8.0);
    assert_eq!(core.remove_dish(&id), vec![Action::RenderNeeded]);
    assert!(core.remove_dish(&id).is_empty());
}

#[test]
fn clear_canvas_removes_all_placements() {
    let mut core = measured_core();
    placed(&mut core, "a", 10.0, 10.0);
    placed(&mut core, "b", 10.0, 10.0);
    let actions = core.clear_canvas();
    assert_eq!(actions.iter().filter(|a| matches!(a, Action::PlacementRemoved { .. })).count(), 2);
    assert!(core.store.placements().is_empty());
    assert!(core.clear_canvas().is_empty());
}

// =============================================================
// Background
// =============================================================

#[test]
fn background_change_leaves_placements_in_place() {
    let mut core = measured_core();
    let id = placed(&mut core, "plate", 20.0, 20.0);
    core.set_background(Some("/desk.png".into()));
    core.set_background(None);
    assert_eq!(position(&core, &id), (500.0, 250.0));
    assert!(core.store.background_image().is_none());
}
