//! Coordinate mapping between container pixels, the background rectangle, and centimeters.
//!
//! The background photo represents a surface of fixed real-world size
//! ([`BackgroundSize`]). It is drawn "contain"-fit inside the measured
//! container: scaled uniformly until it touches the container on one axis and
//! centered on the other. [`BackgroundLayout`] is the result of that fit and
//! carries everything needed to convert between the three spaces used by the
//! canvas:
//!
//! - **container pixels**: CSS pixels relative to the container's top-left,
//!   the space placements are stored in;
//! - **normalized**: `0.0..=1.0` on both axes across the displayed background;
//! - **centimeters**: real-world units measured from the background's top-left.
//!
//! A layout is derived on demand from the current container size and
//! background size. It is never cached across a resize or background change.

#[cfg(test)]
#[path = "layout_test.rs"]
mod layout_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BACKGROUND_HEIGHT_CM, DEFAULT_BACKGROUND_WIDTH_CM};

/// A point in client, container, normalized, or centimeter space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Component-wise `self - other`.
    #[must_use]
    pub fn minus(self, other: Point) -> Point {
        Point { x: self.x - other.x, y: self.y - other.y }
    }
}

/// Measured placement container.
///
/// `origin` is the container's top-left in client coordinates (what
/// `getBoundingClientRect` reports); `width` / `height` are CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
}

impl Container {
    #[must_use]
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self { origin, width, height }
    }

    /// A container whose top-left sits at the client origin.
    #[must_use]
    pub fn sized(width: f64, height: f64) -> Self {
        Self { origin: Point::new(0.0, 0.0), width, height }
    }

    /// Whether the container has a usable, strictly positive size.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Convert a client-space point into container-relative pixels.
    #[must_use]
    pub fn client_to_container(&self, client: Point) -> Point {
        client.minus(self.origin)
    }
}

/// Real-world size of the surface the background photo depicts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundSize {
    pub width_cm: f64,
    pub height_cm: f64,
}

impl Default for BackgroundSize {
    fn default() -> Self {
        Self { width_cm: DEFAULT_BACKGROUND_WIDTH_CM, height_cm: DEFAULT_BACKGROUND_HEIGHT_CM }
    }
}

impl BackgroundSize {
    #[must_use]
    pub fn new(width_cm: f64, height_cm: f64) -> Self {
        Self { width_cm, height_cm }
    }

    /// Width-to-height ratio, or `None` when either side is not a positive number.
    #[must_use]
    pub fn aspect(&self) -> Option<f64> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width_cm) && valid(self.height_cm) {
            Some(self.width_cm / self.height_cm)
        } else {
            None
        }
    }
}

/// The contain-fit placement of the background inside a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundLayout {
    /// Displayed background width in container pixels.
    pub display_width: f64,
    /// Displayed background height in container pixels.
    pub display_height: f64,
    /// Left edge of the displayed background within the container.
    pub offset_x: f64,
    /// Top edge of the displayed background within the container.
    pub offset_y: f64,
    /// Container pixels per real-world centimeter.
    pub pixels_per_cm: f64,
    /// Real-world size the layout was derived from.
    pub background: BackgroundSize,
}

impl BackgroundLayout {
    /// Fit `background` inside a `container_width` × `container_height` box.
    ///
    /// Returns `None` while the container is unmeasured (non-positive size) or
    /// the background size is degenerate.
    #[must_use]
    pub fn compute(container_width: f64, container_height: f64, background: BackgroundSize) -> Option<Self> {
        if !Container::sized(container_width, container_height).is_measured() {
            return None;
        }
        let bg_aspect = background.aspect()?;
        let container_aspect = container_width / container_height;

        let (display_width, display_height) = if container_aspect > bg_aspect {
            (container_height * bg_aspect, container_height)
        } else {
            (container_width, container_width / bg_aspect)
        };

        Some(Self {
            display_width,
            display_height,
            offset_x: (container_width - display_width) / 2.0,
            offset_y: (container_height - display_height) / 2.0,
            pixels_per_cm: display_width / background.width_cm,
            background,
        })
    }

    /// Fit `background` inside a measured [`Container`].
    #[must_use]
    pub fn for_container(container: &Container, background: BackgroundSize) -> Option<Self> {
        Self::compute(container.width, container.height, background)
    }

    /// Center of the displayed background in container pixels.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.offset_x + self.display_width / 2.0, self.offset_y + self.display_height / 2.0)
    }

    /// Whether a container-space point lies on the displayed background.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x >= self.offset_x
            && pt.x <= self.offset_x + self.display_width
            && pt.y >= self.offset_y
            && pt.y <= self.offset_y + self.display_height
    }

    /// Container pixels → normalized background space.
    #[must_use]
    pub fn container_to_normalized(&self, pt: Point) -> Point {
        Point::new((pt.x - self.offset_x) / self.display_width, (pt.y - self.offset_y) / self.display_height)
    }

    /// Normalized background space → container pixels.
    #[must_use]
    pub fn normalized_to_container(&self, pt: Point) -> Point {
        Point::new(self.offset_x + pt.x * self.display_width, self.offset_y + pt.y * self.display_height)
    }

    /// Container pixels → centimeters from the background's top-left.
    #[must_use]
    pub fn container_to_cm(&self, pt: Point) -> Point {
        Point::new(self.px_to_cm(pt.x - self.offset_x), self.px_to_cm(pt.y - self.offset_y))
    }

    /// Centimeters from the background's top-left → container pixels.
    #[must_use]
    pub fn cm_to_container(&self, pt: Point) -> Point {
        Point::new(self.offset_x + self.cm_to_px(pt.x), self.offset_y + self.cm_to_px(pt.y))
    }

    /// A real-world length in container pixels.
    #[must_use]
    pub fn cm_to_px(&self, cm: f64) -> f64 {
        cm * self.pixels_per_cm
    }

    /// A container-pixel length in centimeters.
    #[must_use]
    pub fn px_to_cm(&self, px: f64) -> f64 {
        px / self.pixels_per_cm
    }

    /// On-screen size of a `width_cm` × `height_cm` object drawn at `scale`.
    ///
    /// Sprite sizing is always anchored to the background's scale factor.
    #[must_use]
    pub fn sprite_size_px(&self, width_cm: f64, height_cm: f64, scale: f64) -> (f64, f64) {
        (self.cm_to_px(width_cm) * scale, self.cm_to_px(height_cm) * scale)
    }
}
