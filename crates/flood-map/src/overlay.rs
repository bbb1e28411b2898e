//! Zone overlay construction
//!
//! An overlay is built in full from one [`PredictionArtifact`] before it is
//! shown. Building is all-or-nothing: a single malformed feature rejects the
//! whole artifact.

use crate::error::RenderError;
use crate::geometry::Geometry;
use crate::style::ZoneStyle;
use flood_types::artifact::{display_value, is_geometry_type};
use flood_types::{GeoBounds, PredictionArtifact, RiskLevel};
use serde::Serialize;
use serde_json::Value;

/// Popup content bound to a zone that carries properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Popup {
    pub risk_level: String,
    pub warning: String,
}

impl Popup {
    fn from_properties(properties: &serde_json::Map<String, Value>) -> Self {
        let text = |key: &str| properties.get(key).map(display_value).unwrap_or_default();
        Self {
            risk_level: text("riskLevel"),
            warning: text("warning"),
        }
    }

    /// Markup shown on click. Values are inserted literally.
    pub fn html(&self) -> String {
        format!(
            "<strong>Risk Level:</strong> {}<br><strong>Warning:</strong> {}",
            self.risk_level, self.warning
        )
    }
}

/// One styled zone of an overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneFeature {
    /// Position of the feature in the artifact
    pub index: usize,
    pub risk_level: RiskLevel,
    pub geometry: Geometry,
    pub style: ZoneStyle,
    pub popup: Option<Popup>,
}

/// Fully built overlay, ready to attach to a surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneOverlay {
    zones: Vec<ZoneFeature>,
    bounds: GeoBounds,
}

impl ZoneOverlay {
    /// Build the overlay for every feature of `artifact`.
    ///
    /// Features with a null or absent geometry are skipped. The overlay must
    /// cover at least one position.
    pub fn build(artifact: &PredictionArtifact) -> Result<Self, RenderError> {
        let mut zones = Vec::new();
        let mut bounds: Option<GeoBounds> = None;

        for (index, feature) in artifact.features()?.iter().enumerate() {
            let Some(zone) = build_zone(index, feature)? else {
                continue;
            };
            if let Some(extent) = zone.geometry.bounds() {
                bounds = Some(match bounds {
                    Some(acc) => acc.union(&extent),
                    None => extent,
                });
            }
            zones.push(zone);
        }

        let bounds = bounds.ok_or(RenderError::EmptyExtent)?;
        Ok(Self { zones, bounds })
    }

    pub fn zones(&self) -> &[ZoneFeature] {
        &self.zones
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn popup_count(&self) -> usize {
        self.zones.iter().filter(|z| z.popup.is_some()).count()
    }
}

fn build_zone(index: usize, feature: &Value) -> Result<Option<ZoneFeature>, RenderError> {
    let invalid = |reason: &str| RenderError::InvalidFeature {
        index,
        reason: reason.to_string(),
    };

    let object = feature.as_object().ok_or_else(|| invalid("expected an object"))?;
    let geometry = match object.get("type").and_then(Value::as_str) {
        Some("Feature") => match object.get("geometry") {
            None | Some(Value::Null) => return Ok(None),
            Some(raw) => raw,
        },
        // A bare geometry stands for a feature without properties
        Some(ty) if is_geometry_type(ty) => feature,
        _ => return Err(invalid("expected type Feature or a geometry")),
    };
    let geometry =
        Geometry::from_value(geometry).map_err(|source| RenderError::Geometry { index, source })?;

    let properties = object.get("properties").and_then(Value::as_object);
    let risk_property = properties.and_then(|p| p.get("riskLevel"));

    Ok(Some(ZoneFeature {
        index,
        risk_level: RiskLevel::from_property(risk_property),
        geometry,
        style: ZoneStyle::for_property(risk_property),
        popup: properties.map(Popup::from_properties),
    }))
}
