//! JSON error envelope of the prediction endpoint

use serde::{Deserialize, Serialize};

/// Error response body.
///
/// `error` is always present. `details` carries captured stderr on process
/// failure; `raw_output` carries captured stdout when it was not valid JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            raw_output: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_raw_output(mut self, raw_output: impl Into<String>) -> Self {
        self.raw_output = Some(raw_output.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted() {
        let json = serde_json::to_value(ErrorBody::new("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "boom" }));
    }

    #[test]
    fn test_details_serialized_when_present() {
        let body = ErrorBody::new("failed").with_details("Traceback ...\n");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["details"], "Traceback ...\n");
        assert!(json.get("raw_output").is_none());
    }

    #[test]
    fn test_decodes_foreign_error_bodies() {
        let body: ErrorBody = serde_json::from_str(r#"{"error":"nope","code":"X"}"#).unwrap();
        assert_eq!(body.error, "nope");
        assert_eq!(body.details, None);
    }
}
