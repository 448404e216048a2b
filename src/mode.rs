//! Canvas mode selection and device detection.
//!
//! There is one canvas, parameterized by [`ViewMode`]. Camera AR needs an
//! iOS device; everything else gets the 2D placement canvas. The device class
//! is the only capability check.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

#[cfg(test)]
#[path = "mode_test.rs"]
mod mode_test;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    #[default]
    Placement2d,
    CameraAr,
}

impl ViewMode {
    /// Parse the wire name (`placement-2d` or `camera-ar`).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "placement-2d" => Some(Self::Placement2d),
            "camera-ar" => Some(Self::CameraAr),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placement2d => "placement-2d",
            Self::CameraAr => "camera-ar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Ios,
    Android,
    Desktop,
}

impl DeviceClass {
    /// Classify a browser user-agent string.
    #[must_use]
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ["iphone", "ipad", "ipod"].iter().any(|needle| ua.contains(needle)) {
            Self::Ios
        } else if ua.contains("android") {
            Self::Android
        } else {
            Self::Desktop
        }
    }

    #[must_use]
    pub fn is_mobile(self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }
}

/// Pick the mode the canvas actually runs in.
///
/// Camera AR only when it was asked for and the device is iOS; any other
/// combination falls back to 2D placement.
#[must_use]
pub fn resolve_mode(requested: Option<ViewMode>, device: DeviceClass) -> ViewMode {
    match (requested, device) {
        (Some(ViewMode::CameraAr), DeviceClass::Ios) => ViewMode::CameraAr,
        (Some(ViewMode::CameraAr), _) => {
            tracing::debug!(?device, "camera-ar unavailable, using placement-2d");
            ViewMode::Placement2d
        }
        _ => ViewMode::Placement2d,
    }
}

/// Reasons the canvas refuses to open.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EntryError {
    /// The host should route back to the catalog.
    #[error("no dishes selected")]
    NothingSelected,
}

impl ErrorCode for EntryError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NothingSelected => "E_NOTHING_SELECTED",
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::NothingSelected => "配置する器を選択してください".to_owned(),
        }
    }
}
