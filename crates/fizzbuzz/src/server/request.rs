//! JSON request body decoding.

use axum::http::{header, HeaderMap};
use serde_json::{Map, Value};

use super::error::ApiError;

/// Decode a request body that must be a JSON object.
///
/// The body is only parsed when the request declares a JSON content type.
pub fn decode_json_object(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if !has_json_content_type(headers) {
        return Err(ApiError::BadRequest(
            "Content-Type must be application/json.".to_string(),
        ));
    }

    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty request body.".to_string()));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON: {e}")))?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ApiError::BadRequest(
            "JSON must represent an object.".to_string(),
        )),
    }
}

/// `application/json` or any `+json` media type, parameters ignored.
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return false;
    };

    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    media_type == "application/json" || media_type.ends_with("+json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap(),
        );
        headers
    }

    fn message(result: Result<Map<String, Value>, ApiError>) -> String {
        match result {
            Err(ApiError::BadRequest(message)) => message,
            other => panic!("expected a bad request, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_valid_json() {
        let data = decode_json_object(
            &headers("application/json"),
            br#"{"name":"Valdo","age":33}"#,
        )
        .unwrap();

        assert_eq!(data["name"], "Valdo");
        assert_eq!(data["age"], 33);
    }

    #[test]
    fn test_content_type_parameters_are_ignored() {
        let result = decode_json_object(&headers("Application/JSON; charset=utf-8"), b"{}");

        assert!(result.is_ok());
    }

    #[test]
    fn test_json_suffix_is_accepted() {
        let result = decode_json_object(&headers("application/merge-patch+json"), b"{}");

        assert!(result.is_ok());
    }

    #[test]
    fn test_rejects_non_json_content_type() {
        assert_eq!(
            message(decode_json_object(&headers("text/plain"), br#"{"name":"Valdo"}"#)),
            "Content-Type must be application/json."
        );
    }

    #[test]
    fn test_rejects_missing_content_type() {
        assert_eq!(
            message(decode_json_object(&HeaderMap::new(), b"{}")),
            "Content-Type must be application/json."
        );
    }

    #[test]
    fn test_rejects_empty_body() {
        assert_eq!(
            message(decode_json_object(&headers("application/json"), b"")),
            "Empty request body."
        );
    }

    #[test]
    fn test_rejects_invalid_json() {
        let msg = message(decode_json_object(
            &headers("application/json"),
            br#"{"invalid_json": "missing_end""#,
        ));

        assert!(msg.starts_with("Invalid JSON:"), "{msg}");
    }

    #[test]
    fn test_rejects_non_object_json() {
        assert_eq!(
            message(decode_json_object(
                &headers("application/json"),
                br#""a simple string""#
            )),
            "JSON must represent an object."
        );
        assert_eq!(
            message(decode_json_object(&headers("application/json"), b"[1, 2]")),
            "JSON must represent an object."
        );
    }
}
