//! Wheel segment model

use serde::{Deserialize, Serialize};

use super::DrawNumber;

/// Fill and text color for one wedge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentColor {
    pub fill: String,
    pub text: String,
}

impl SegmentColor {
    pub fn new(fill: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            fill: fill.into(),
            text: text.into(),
        }
    }

    /// Brand palette used when the configuration does not provide one
    pub fn default_palette() -> Vec<SegmentColor> {
        vec![
            SegmentColor::new("#1756a5", "#FFFFFF"),
            SegmentColor::new("#dea842", "#FFFFFF"),
            SegmentColor::new("#e68740", "#FFFFFF"),
            SegmentColor::new("#ed5836", "#FFFFFF"),
        ]
    }
}

/// One wedge of the wheel. Several wedges may carry the same value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelSegment {
    pub text: String,
    pub value: DrawNumber,
    pub is_blacklisted: bool,
    pub color: String,
    pub text_color: String,
}
