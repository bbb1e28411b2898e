//! Risk level to zone style mapping

use flood_types::RiskLevel;
use serde::Serialize;
use serde_json::Value;

pub const HIGH_RISK_COLOR: &str = "#ef4444";
pub const MODERATE_RISK_COLOR: &str = "#eab308";
pub const LOW_RISK_COLOR: &str = "#22c55e";
pub const DEFAULT_ZONE_COLOR: &str = "#3b82f6";

pub const ZONE_FILL_OPACITY: f32 = 0.5;
pub const ZONE_STROKE_WEIGHT: u32 = 2;

/// Visual style of one zone. Stroke and fill share a colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStyle {
    pub color: &'static str,
    pub fill_color: &'static str,
    pub fill_opacity: f32,
    pub weight: u32,
}

impl ZoneStyle {
    const fn solid(color: &'static str) -> Self {
        Self {
            color,
            fill_color: color,
            fill_opacity: ZONE_FILL_OPACITY,
            weight: ZONE_STROKE_WEIGHT,
        }
    }

    pub fn for_level(level: RiskLevel) -> Self {
        match level {
            RiskLevel::High => Self::solid(HIGH_RISK_COLOR),
            RiskLevel::Moderate => Self::solid(MODERATE_RISK_COLOR),
            RiskLevel::Low => Self::solid(LOW_RISK_COLOR),
            RiskLevel::Unknown => Self::solid(DEFAULT_ZONE_COLOR),
        }
    }

    /// Style for a raw `riskLevel` property value. Absent or non-string values get the default.
    pub fn for_property(value: Option<&Value>) -> Self {
        Self::for_level(RiskLevel::from_property(value))
    }
}

impl Default for ZoneStyle {
    fn default() -> Self {
        Self::solid(DEFAULT_ZONE_COLOR)
    }
}
