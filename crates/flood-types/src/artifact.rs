//! Prediction artifact: the feature collection emitted by the computation

use crate::risk::RiskLevel;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while decoding or interpreting an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Body is not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The computation reported an error in place of a feature collection
    #[error("{0}")]
    Reported(String),

    /// JSON is valid but not a GeoJSON feature or feature collection
    #[error("Invalid GeoJSON object: {0}")]
    Shape(String),
}

/// Immutable prediction artifact.
///
/// Cloning is cheap and shares the decoded document. The document is never
/// mutated after construction; a new prediction replaces the whole value.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionArtifact {
    document: Arc<Value>,
}

/// Flattened view of one zone, for listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub index: usize,
    pub id: Option<String>,
    pub risk_level: RiskLevel,
    pub raw_risk_level: Option<String>,
    pub probability: Option<f64>,
    pub warning: Option<String>,
    pub geometry_type: Option<String>,
}

impl PredictionArtifact {
    pub fn from_value(document: Value) -> Self {
        Self {
            document: Arc::new(document),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, ArtifactError> {
        Ok(Self::from_value(serde_json::from_slice(bytes)?))
    }

    pub fn as_value(&self) -> &Value {
        &self.document
    }

    /// The zone features in document order.
    ///
    /// Accepts a `FeatureCollection`, a top-level array of features, or a
    /// single `Feature` or bare geometry (a one-element collection). An object
    /// with an `error` field and no `type` is the computation's own error report.
    pub fn features(&self) -> Result<&[Value], ArtifactError> {
        let object = match &*self.document {
            Value::Array(items) => return Ok(items.as_slice()),
            Value::Object(object) => object,
            _ => {
                return Err(ArtifactError::Shape(
                    "expected a JSON object or array".to_string(),
                ))
            }
        };

        match object.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => object
                .get("features")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .ok_or_else(|| {
                    ArtifactError::Shape("FeatureCollection without a features array".to_string())
                }),
            Some("Feature") => Ok(std::slice::from_ref(&*self.document)),
            Some(ty) if is_geometry_type(ty) => Ok(std::slice::from_ref(&*self.document)),
            Some(other) => Err(ArtifactError::Shape(format!(
                "unsupported top-level type {other}"
            ))),
            None => match object.get("error") {
                Some(Value::String(message)) => Err(ArtifactError::Reported(message.clone())),
                Some(other) => Err(ArtifactError::Reported(other.to_string())),
                None => Err(ArtifactError::Shape("missing type".to_string())),
            },
        }
    }

    pub fn zone_count(&self) -> usize {
        self.features().map(<[Value]>::len).unwrap_or(0)
    }

    /// Summaries of every zone, tolerating missing properties.
    pub fn zone_summaries(&self) -> Result<Vec<ZoneSummary>, ArtifactError> {
        Ok(self
            .features()?
            .iter()
            .enumerate()
            .map(|(index, feature)| summarize(index, feature))
            .collect())
    }
}

/// GeoJSON geometry object types.
pub const GEOMETRY_TYPES: [&str; 7] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
];

pub fn is_geometry_type(ty: &str) -> bool {
    GEOMETRY_TYPES.contains(&ty)
}

fn summarize(index: usize, feature: &Value) -> ZoneSummary {
    let properties = feature.get("properties").and_then(Value::as_object);
    let property = |key: &str| properties.and_then(|p| p.get(key));

    ZoneSummary {
        index,
        id: property("id").map(display_value),
        risk_level: RiskLevel::from_property(property("riskLevel")),
        raw_risk_level: property("riskLevel").map(display_value),
        probability: property("probability").and_then(Value::as_f64),
        warning: property("warning").map(display_value),
        geometry_type: feature
            .pointer("/geometry/type")
            .or_else(|| {
                feature
                    .get("type")
                    .filter(|t| t.as_str().is_some_and(is_geometry_type))
            })
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

/// Render a JSON value the way it should read in text: strings without quotes.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PredictionArtifact {
        PredictionArtifact::from_value(json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [80.2, 13.0] },
                    "properties": {
                        "id": "flood-zone-high-1",
                        "riskLevel": "high",
                        "probability": 85,
                        "warning": "Evacuate"
                    }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [80.3, 12.9] }
                }
            ]
        }))
    }

    #[test]
    fn test_features_in_order() {
        let artifact = sample();
        let features = artifact.features().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["properties"]["riskLevel"], "high");
    }

    #[test]
    fn test_summaries_tolerate_missing_properties() {
        let summaries = sample().zone_summaries().unwrap();
        assert_eq!(summaries[0].id.as_deref(), Some("flood-zone-high-1"));
        assert_eq!(summaries[0].risk_level, RiskLevel::High);
        assert_eq!(summaries[0].probability, Some(85.0));
        assert_eq!(summaries[1].risk_level, RiskLevel::Unknown);
        assert_eq!(summaries[1].warning, None);
        assert_eq!(summaries[1].geometry_type.as_deref(), Some("Point"));
    }

    #[test]
    fn test_single_feature_is_a_collection_of_one() {
        let artifact = PredictionArtifact::from_value(json!({
            "type": "Feature",
            "geometry": null,
            "properties": {}
        }));
        assert_eq!(artifact.zone_count(), 1);
    }

    #[test]
    fn test_reported_error() {
        let artifact = PredictionArtifact::from_value(json!({ "error": "No valid flood zones found" }));
        match artifact.features() {
            Err(ArtifactError::Reported(msg)) => assert_eq!(msg, "No valid flood zones found"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_scalar_is_a_shape_error() {
        let artifact = PredictionArtifact::from_slice(b"42").unwrap();
        assert!(matches!(artifact.features(), Err(ArtifactError::Shape(_))));
        assert_eq!(artifact.zone_count(), 0);

        let artifact = PredictionArtifact::from_value(json!({ "type": "Topology" }));
        assert!(matches!(artifact.features(), Err(ArtifactError::Shape(_))));
    }

    #[test]
    fn test_top_level_array_is_a_collection() {
        let artifact = PredictionArtifact::from_value(json!([
            { "type": "Feature", "properties": { "riskLevel": "low" },
              "geometry": { "type": "Point", "coordinates": [80.2, 13.0] } },
            { "type": "Polygon", "coordinates": [] }
        ]));
        assert_eq!(artifact.zone_count(), 2);
        let summaries = artifact.zone_summaries().unwrap();
        assert_eq!(summaries[0].risk_level, RiskLevel::Low);
        assert_eq!(summaries[1].geometry_type.as_deref(), Some("Polygon"));
    }

    #[test]
    fn test_bare_geometry_is_a_collection_of_one() {
        let artifact = PredictionArtifact::from_value(json!({
            "type": "MultiPolygon",
            "coordinates": []
        }));
        assert_eq!(artifact.zone_count(), 1);
        let summary = &artifact.zone_summaries().unwrap()[0];
        assert_eq!(summary.geometry_type.as_deref(), Some("MultiPolygon"));
        assert_eq!(summary.risk_level, RiskLevel::Unknown);
    }

    #[test]
    fn test_from_slice_rejects_garbage() {
        assert!(matches!(
            PredictionArtifact::from_slice(b"not json"),
            Err(ArtifactError::Json(_))
        ));
    }
}
