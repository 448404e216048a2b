//! Application configuration parsed from environment variables.

use canvas::layout::BackgroundSize;

use crate::imaging::{DEFAULT_MAX_IMAGE_PX, ResizeLimits};
use crate::mode::ViewMode;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_MIN_DIMENSION_CM: f64 = 0.0;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    /// A variable was set but could not be parsed.
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid { var: &'static str, value: String, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Real-world size the background photo represents.
    pub background: BackgroundSize,
    /// Dish dimensions must be strictly greater than this.
    pub min_dimension_cm: f64,
    pub resize: ResizeLimits,
    /// Load the preset catalog at startup.
    pub seed_defaults: bool,
    /// Mode asked for by the host, if any; still subject to device checks.
    pub requested_mode: Option<ViewMode>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            background: BackgroundSize::default(),
            min_dimension_cm: DEFAULT_MIN_DIMENSION_CM,
            resize: ResizeLimits::default(),
            seed_defaults: true,
            requested_mode: None,
        }
    }
}

impl Config {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `DISHBOARD_BACKGROUND_WIDTH_CM`: default 100
    /// - `DISHBOARD_BACKGROUND_HEIGHT_CM`: default 70
    /// - `DISHBOARD_MIN_DIMENSION_CM`: default 0
    /// - `DISHBOARD_MAX_IMAGE_PX`: default 1024 (both axes)
    /// - `DISHBOARD_SEED_DEFAULTS`: `true` (default) or `false`
    /// - `DISHBOARD_MODE`: `placement-2d` or `camera-ar`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (used by `from_env` and tests).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a present value fails to parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let width_cm = parse_positive_f64(
            "DISHBOARD_BACKGROUND_WIDTH_CM",
            lookup("DISHBOARD_BACKGROUND_WIDTH_CM"),
            defaults.background.width_cm,
        )?;
        let height_cm = parse_positive_f64(
            "DISHBOARD_BACKGROUND_HEIGHT_CM",
            lookup("DISHBOARD_BACKGROUND_HEIGHT_CM"),
            defaults.background.height_cm,
        )?;
        let min_dimension_cm =
            parse_min_dimension(lookup("DISHBOARD_MIN_DIMENSION_CM"), defaults.min_dimension_cm)?;
        let max_px = parse_max_px(lookup("DISHBOARD_MAX_IMAGE_PX"), DEFAULT_MAX_IMAGE_PX)?;
        let seed_defaults = parse_bool("DISHBOARD_SEED_DEFAULTS", lookup("DISHBOARD_SEED_DEFAULTS"), true)?;
        let requested_mode = parse_mode(lookup("DISHBOARD_MODE"))?;

        Ok(Self {
            background: BackgroundSize::new(width_cm, height_cm),
            min_dimension_cm,
            resize: ResizeLimits { max_width: max_px, max_height: max_px },
            seed_defaults,
            requested_mode,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { var, value: value.to_owned(), reason }
}

fn parse_positive_f64(var: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(invalid(var, &raw, "expected a positive number")),
    }
}

fn parse_min_dimension(raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let var = "DISHBOARD_MIN_DIMENSION_CM";
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        _ => Err(invalid(var, &raw, "expected a non-negative number")),
    }
}

fn parse_max_px(raw: Option<String>, default: u32) -> Result<u32, ConfigError> {
    let var = "DISHBOARD_MAX_IMAGE_PX";
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(invalid(var, &raw, "expected a positive integer")),
    }
}

fn parse_bool(var: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, &raw, "expected true or false")),
    }
}

fn parse_mode(raw: Option<String>) -> Result<Option<ViewMode>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match ViewMode::parse(raw.trim()) {
        Some(mode) => Ok(Some(mode)),
        None => Err(invalid("DISHBOARD_MODE", &raw, "expected placement-2d or camera-ar")),
    }
}
