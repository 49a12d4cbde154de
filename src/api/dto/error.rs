//! Error response DTOs.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::error::ValidationFieldError;

/// Standard error response format.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "code": "NOT_FOUND",
    "message": "student not found: id=7f1c",
    "details": { "entity": "student", "field": "id", "value": "7f1c" }
}))]
pub struct ErrorResponse {
    /// Machine readable error code
    pub code: String,
    /// Human readable message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with code and message.
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }

    pub fn not_found_error(entity: &str, field: &str, value: &str, message: &str) -> Self {
        Self::new("NOT_FOUND", message).with_details(json!({
            "entity": entity,
            "field": field,
            "value": value,
        }))
    }

    pub fn duplicate_error(entity: &str, field: &str, value: &str, message: &str) -> Self {
        Self::new("DUPLICATE_ENTRY", message).with_details(json!({
            "entity": entity,
            "field": field,
            "value": value,
        }))
    }

    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::new("VALIDATION_ERROR", reason).with_details(json!({ "field": field }))
    }

    pub fn field_errors(errors: &[ValidationFieldError]) -> Self {
        Self::new("VALIDATION_ERROR", "Request validation failed")
            .with_details(json!({ "fields": errors }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_skipped() {
        let json = serde_json::to_value(ErrorResponse::new("BAD_REQUEST", "nope")).unwrap();
        assert_eq!(json, json!({ "code": "BAD_REQUEST", "message": "nope" }));
    }

    #[test]
    fn test_field_errors_details() {
        let errors = vec![ValidationFieldError {
            field: "name".to_string(),
            message: "too long".to_string(),
        }];
        let response = ErrorResponse::field_errors(&errors).with_request_id("req-1");
        let json = serde_json::to_value(response).unwrap();

        assert_eq!(json["details"]["fields"][0]["field"], "name");
        assert_eq!(json["request_id"], "req-1");
    }
}
