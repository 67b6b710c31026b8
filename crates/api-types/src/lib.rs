//! Shared request/response types used by API-facing crates.

use serde::{Deserialize, Serialize};

pub mod forms;
pub mod views;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
}

impl HealthCheckResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// A single validation message attached to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Body of every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_number: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            incident_number: None,
            fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_check_ok_payload() {
        let response = HealthCheckResponse::ok();
        assert_eq!(response.status, "ok");
    }

    #[test]
    fn error_response_omits_empty_extras() {
        let response = ErrorResponse::new("not_found", "resource missing");

        let json = serde_json::to_value(&response).expect("serialize error response");

        assert_eq!(
            json,
            serde_json::json!({ "code": "not_found", "message": "resource missing" })
        );
    }

    #[test]
    fn error_response_carries_incident_and_fields() {
        let mut response = ErrorResponse::new("internal_error", "internal error");
        response.incident_number = Some(4242);
        response.fields.push(FieldError {
            field: "email".to_string(),
            message: "this field is required".to_string(),
        });

        let json = serde_json::to_string(&response).expect("serialize error response");
        let decoded: ErrorResponse =
            serde_json::from_str(&json).expect("deserialize error response");

        assert_eq!(decoded, response);
    }
}
