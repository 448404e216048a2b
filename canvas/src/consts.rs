//! Shared numeric constants for the canvas crate.

// ── Placement transforms ────────────────────────────────────────

/// Smallest scale multiplier a placement may carry.
pub const MIN_SCALE: f64 = 0.5;

/// Largest scale multiplier a placement may carry.
pub const MAX_SCALE: f64 = 3.0;

/// Scale assigned to a freshly placed dish (1.0 = real size).
pub const DEFAULT_SCALE: f64 = 1.0;

/// Full turn in degrees; rotations are stored modulo this value.
pub const FULL_TURN_DEG: f64 = 360.0;

// ── Background ──────────────────────────────────────────────────

/// Default real-world width of the background surface, in centimeters.
pub const DEFAULT_BACKGROUND_WIDTH_CM: f64 = 100.0;

/// Default real-world height of the background surface, in centimeters.
pub const DEFAULT_BACKGROUND_HEIGHT_CM: f64 = 70.0;

// ── Cursors ─────────────────────────────────────────────────────

/// CSS cursor shown while a sprite is being dragged.
pub const CURSOR_GRABBING: &str = "grabbing";

/// CSS cursor shown when no drag is in progress.
pub const CURSOR_DEFAULT: &str = "default";
