//! Placement canvas core for composing dish photos onto a scaled background.
//!
//! This crate owns everything about the 2D placement canvas that can be
//! expressed without a browser: the dish catalog and placement state, the
//! contain-fit mapping between container pixels and real-world centimeters,
//! the drag gesture state machine, stacking order, and a projection of all of
//! that into a paint list. The host layer forwards DOM measurements and input
//! events to [`engine::EngineCore`] and draws the resulting [`scene::Scene`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Placement canvas controller and the [`engine::Action`]s it emits |
//! | [`store`] | Dish catalog, selection set, placements, background handle |
//! | [`layout`] | Contain-fit background layout and coordinate conversions |
//! | [`input`] | Pointer types and the drag gesture state machine |
//! | [`zorder`] | Stacking operations with dense renumbering |
//! | [`hit`] | Hit-testing rotated sprites |
//! | [`scene`] | Read-only paint list for the renderer |
//! | [`consts`] | Shared numeric constants (scale limits, default background size) |

pub mod consts;
pub mod engine;
pub mod hit;
pub mod input;
pub mod layout;
pub mod scene;
pub mod store;
pub mod zorder;
