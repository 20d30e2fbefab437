use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use fizzbuzz_core::sequence::FizzBuzzResult;
use fizzbuzz_core::validation::validate;

use super::error::ApiError;
use super::request::decode_json_object;
use super::AppState;

/// `POST /api/fizzbuzz`
pub async fn fizzbuzz_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<FizzBuzzResult>, ApiError> {
    let body = body?;
    let data = decode_json_object(&headers, &body)?;
    let params = validate(&data).map_err(ApiError::Validation)?;

    // Generation and the statistics file are both blocking work.
    let service = state.service.clone();
    let result = tokio::task::spawn_blocking(move || service.process_and_record(&params))
        .await
        .map_err(|e| state.internal(e.into()))?
        .map_err(|e| state.internal(e))?;

    Ok(Json(result))
}

/// `GET /api/fizzbuzz/stats`
pub async fn stats_handler(State(state): State<AppState>) -> Result<Response, ApiError> {
    let statistics = state.service.statistics().clone();
    let entry = tokio::task::spawn_blocking(move || statistics.most_frequent_request())
        .await
        .map_err(|e| state.internal(e.into()))?
        .map_err(|e| state.internal(e))?;

    Ok(match entry {
        Some(entry) => Json(entry).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

/// Unknown routes: JSON envelope under `/api`, plain 404 elsewhere.
pub async fn not_found(uri: Uri) -> Response {
    if is_api_path(uri.path()) {
        ApiError::NotFound.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Not Found").into_response()
    }
}

/// Known API route, unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_api_path() {
        assert!(is_api_path("/api"));
        assert!(is_api_path("/api/fizzbuzz"));
        assert!(is_api_path("/api/nonexistent"));
        assert!(!is_api_path("/apis"));
        assert!(!is_api_path("/non-api/route"));
    }
}
