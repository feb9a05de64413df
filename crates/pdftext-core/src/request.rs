//! Wire types for `POST /parse-pdf` and validation of the request body.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ParseError;

/// JSON field carrying the base64 payload.
pub const FILE_FIELD: &str = "fileBase64";

/// Request body, as produced by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseRequest {
    #[serde(rename = "fileBase64")]
    pub file_base64: String,
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResponse {
    pub text: String,
}

/// Error response body. `details` is only present for extraction failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&ParseError> for ErrorBody {
    fn from(err: &ParseError) -> Self {
        Self {
            error: err.public_message().to_string(),
            details: err.details(),
        }
    }
}

/// Pull the base64 payload out of a raw request body.
///
/// Bodies that are not JSON objects, lack the field, carry a non-string value
/// or an empty string are all reported as [`ParseError::InvalidRequestBody`].
pub fn validate_request(body: &[u8]) -> Result<String, ParseError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "request body is not valid JSON");
        ParseError::InvalidRequestBody
    })?;

    match value.get(FILE_FIELD) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ParseError::InvalidRequestBody),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_string_field() {
        let body = br#"{"fileBase64": "JVBERi0xLjQ="}"#;
        assert_eq!(validate_request(body).unwrap(), "JVBERi0xLjQ=");
    }

    #[test]
    fn ignores_unknown_fields() {
        let body = br#"{"fileBase64": "abcd", "filename": "a.pdf"}"#;
        assert_eq!(validate_request(body).unwrap(), "abcd");
    }

    #[test]
    fn rejects_missing_field() {
        assert!(matches!(
            validate_request(br#"{"file": "abcd"}"#),
            Err(ParseError::InvalidRequestBody)
        ));
    }

    #[test]
    fn rejects_non_string_values() {
        for body in [
            &br#"{"fileBase64": 42}"#[..],
            br#"{"fileBase64": null}"#,
            br#"{"fileBase64": ["abcd"]}"#,
            br#"{"fileBase64": {"data": "abcd"}}"#,
            br#"{"fileBase64": true}"#,
        ] {
            assert!(
                matches!(validate_request(body), Err(ParseError::InvalidRequestBody)),
                "body {:?} should be rejected",
                String::from_utf8_lossy(body)
            );
        }
    }

    #[test]
    fn rejects_empty_string() {
        assert!(matches!(
            validate_request(br#"{"fileBase64": ""}"#),
            Err(ParseError::InvalidRequestBody)
        ));
    }

    #[test]
    fn rejects_non_object_bodies() {
        assert!(validate_request(b"").is_err());
        assert!(validate_request(b"fileBase64=abcd").is_err());
        assert!(validate_request(br#"["abcd"]"#).is_err());
        assert!(validate_request(br#""abcd""#).is_err());
    }

    #[test]
    fn request_uses_camel_case_field() {
        let req = ParseRequest {
            file_base64: "abcd".into(),
        };
        assert_eq!(
            serde_json::to_string(&req).unwrap(),
            r#"{"fileBase64":"abcd"}"#
        );
    }

    #[test]
    fn error_body_omits_absent_details() {
        let body = ErrorBody::from(&ParseError::InvalidRequestBody);
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "Missing or invalid \"fileBase64\" in request body." })
        );
    }

    #[test]
    fn error_body_carries_failure_details() {
        let body = ErrorBody::from(&ParseError::ExtractionFailure("bad xref".into()));
        assert_eq!(body.error, "Failed to parse PDF.");
        assert_eq!(body.details.as_deref(), Some("bad xref"));
    }
}
