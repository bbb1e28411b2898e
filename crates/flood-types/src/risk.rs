//! Risk level classification for flood zones

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Risk label attached to a zone.
///
/// Parsing is exact and case-sensitive: `"High"` is not `"high"`. Anything that
/// is not one of the three known labels, including a missing or non-string
/// value, lands in [`RiskLevel::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
    Unknown,
}

impl RiskLevel {
    /// Classify a raw label.
    pub fn from_label(label: &str) -> Self {
        match label {
            "high" => RiskLevel::High,
            "moderate" => RiskLevel::Moderate,
            "low" => RiskLevel::Low,
            _ => RiskLevel::Unknown,
        }
    }

    /// Classify the `riskLevel` property of a feature, if any.
    pub fn from_property(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(label)) => Self::from_label(label),
            _ => RiskLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::High => "high",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Low => "low",
            RiskLevel::Unknown => "unknown",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_labels() {
        assert_eq!(RiskLevel::from_label("high"), RiskLevel::High);
        assert_eq!(RiskLevel::from_label("moderate"), RiskLevel::Moderate);
        assert_eq!(RiskLevel::from_label("low"), RiskLevel::Low);
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert_eq!(RiskLevel::from_label("High"), RiskLevel::Unknown);
        assert_eq!(RiskLevel::from_label("LOW"), RiskLevel::Unknown);
        assert_eq!(RiskLevel::from_label(" high"), RiskLevel::Unknown);
    }

    #[test]
    fn test_property_classification_is_total() {
        assert_eq!(RiskLevel::from_property(None), RiskLevel::Unknown);
        assert_eq!(RiskLevel::from_property(Some(&json!(null))), RiskLevel::Unknown);
        assert_eq!(RiskLevel::from_property(Some(&json!(3))), RiskLevel::Unknown);
        assert_eq!(
            RiskLevel::from_property(Some(&json!("moderate"))),
            RiskLevel::Moderate
        );
    }
}
