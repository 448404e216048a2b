//! Dish placement planner: register photographed dishes with their physical
//! size, then lay them out at true scale on a photo of a table.
//!
//! The placement core (store, layout, gestures, stacking) lives in the
//! `canvas` crate. This crate adds what surrounds it in the app:
//!
//! | Module | Role |
//! |--------|------|
//! | [`app`] | Shell wiring config, engine, add-dish flow and viewport together |
//! | [`config`] | `DISHBOARD_*` environment configuration |
//! | [`error`] | [`error::ErrorCode`] trait for user-facing failures |
//! | [`form`] | Add-dish draft, validation, upload bookkeeping |
//! | [`imaging`] | `data:` URL image transforms (resize, crop, trim) |
//! | [`mode`] | Device detection and canvas mode selection |
//! | [`pipeline`] | Async upload pipeline and stale-result tracking |
//! | [`seed`] | Preset catalog |
//! | [`viewport`] | Container measurements fanned out to open canvases |

pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod imaging;
pub mod mode;
pub mod pipeline;
pub mod seed;
pub mod viewport;
