use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use cloud_auditor_core::AppError;
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .map(|value| value.as_bytes());

    if !api_key_matches(presented, state.api_key.as_ref()) {
        warn!(
            method = %request.method(),
            path = %request.uri().path(),
            key_present = presented.is_some(),
            "rejected request with invalid api key"
        );
        return Err(AppError::Forbidden("Could not validate credentials".to_owned()).into());
    }

    Ok(next.run(request).await)
}

/// Compares in constant time for keys of equal length.
fn api_key_matches(presented: Option<&[u8]>, expected: &str) -> bool {
    presented.is_some_and(|presented| bool::from(presented.ct_eq(expected.as_bytes())))
}
