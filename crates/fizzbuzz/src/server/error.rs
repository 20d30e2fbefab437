//! JSON error envelope for API routes.

use axum::extract::rejection::BytesRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use fizzbuzz_core::validation::FieldErrors;
use serde::Serialize;

use crate::error::Error;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Resource not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    /// The request body could not be read, e.g. it exceeds the size limit.
    #[error("{message}")]
    Body { status: StatusCode, message: String },

    #[error("Internal server error")]
    Internal {
        #[source]
        source: Error,
        debug: bool,
    },
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    debug: Option<serde_json::Value>,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Body { status, .. } => *status,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn debug_details(&self) -> Option<serde_json::Value> {
        let ApiError::Internal {
            source,
            debug: true,
        } = self
        else {
            return None;
        };

        let mut chain = Vec::new();
        let mut current = std::error::Error::source(source);
        while let Some(cause) = current {
            chain.push(cause.to_string());
            current = cause.source();
        }

        Some(serde_json::json!({
            "error": source.to_string(),
            "chain": chain,
        }))
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        ApiError::Body {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Validation failures are expected and not worth an error log.
        if let ApiError::Internal { source, .. } = &self {
            log::error!("API error occurred: {source}");
        }

        let body = ErrorBody {
            status: "error",
            message: self.to_string(),
            errors: match &self {
                ApiError::Validation(errors) => Some(errors),
                _ => None,
            },
            debug: self.debug_details(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fizzbuzz_core::stats::StoreError;

    fn storage_error() -> Error {
        Error::Storage(StoreError::Io {
            path: "var/statistics.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation(FieldErrors::default()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BadRequest("nope".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::MethodNotAllowed.status_code(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            ApiError::Body {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                message: "too large".to_string()
            }
            .status_code(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::Internal {
                source: storage_error(),
                debug: false
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_debug_details_only_when_enabled() {
        let hidden = ApiError::Internal {
            source: storage_error(),
            debug: false,
        };
        assert!(hidden.debug_details().is_none());

        let shown = ApiError::Internal {
            source: storage_error(),
            debug: true,
        };
        let details = shown.debug_details().unwrap();
        assert!(details["error"]
            .as_str()
            .unwrap()
            .starts_with("Statistics storage failed"));
        assert!(!details["chain"].as_array().unwrap().is_empty());
    }
}
