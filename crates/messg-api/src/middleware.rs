use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::{self, AppState};
use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// The stored key that authorized the current request.
#[derive(Debug, Clone, Copy)]
pub struct ApiKeyCredential(pub Uuid);

/// Reject the request with 401 unless `X-API-Key` matches a stored key.
pub async fn require_api_key(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let raw = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            debug!("Missing {} header on {} {}", API_KEY_HEADER, req.method(), req.uri().path());
            ApiError::Unauthorized
        })?
        .to_owned();

    let key = auth::authorize(&state, &raw).await?;

    req.extensions_mut().insert(ApiKeyCredential(key));
    Ok(next.run(req).await)
}
