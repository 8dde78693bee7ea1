use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, error};

use messg_types::api::{ErrorResponse, MessageSend, SuccessResponse, UnauthorizedResponse};
use messg_types::models::Message;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::ApiKeyCredential;
use crate::service::{MessageError, MessageService};

/// Path ids that are not integers name no message.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

/// Run a service call off the async runtime.
async fn run<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&MessageService) -> Result<T, MessageError> + Send + 'static,
    T: Send + 'static,
{
    let service = state.messages.clone();
    tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::internal(e)
        })?
        .map_err(ApiError::from)
}

/// GET /messages/ — every message, oldest first.
#[utoipa::path(
    get,
    path = "/messages/",
    responses(
        (status = 200, description = "All messages", body = [Message])
    ),
    tag = "messages"
)]
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<Message>>, ApiError> {
    let messages = run(&state, |svc| svc.list()).await?;
    Ok(Json(messages))
}

/// GET /messages/{id}/ — returns the message and bumps its counter.
#[utoipa::path(
    get,
    path = "/messages/{id}/",
    params(("id" = i64, Path, description = "Message id")),
    responses(
        (status = 200, description = "Message with incremented counter", body = Message),
        (status = 404, description = "No such message", body = ErrorResponse)
    ),
    tag = "messages"
)]
pub async fn get_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&raw_id)?;
    let message = run(&state, move |svc| svc.get(id)).await?;
    Ok(Json(message))
}

#[utoipa::path(
    post,
    path = "/messages/",
    request_body = MessageSend,
    responses(
        (status = 200, description = "Created message", body = Message),
        (status = 401, description = "Missing or unknown API key", body = UnauthorizedResponse),
        (status = 422, description = "Text longer than 160 characters", body = ErrorResponse)
    ),
    security(("api_key" = [])),
    tag = "messages"
)]
pub async fn create_message(
    State(state): State<AppState>,
    Extension(credential): Extension<ApiKeyCredential>,
    Json(req): Json<MessageSend>,
) -> Result<Json<Message>, ApiError> {
    debug!("Create requested with key {}", credential.0);
    let message = run(&state, move |svc| svc.create(&req.text)).await?;
    Ok(Json(message))
}

/// PUT /messages/{id}/ — overwrites text and resets the counter.
#[utoipa::path(
    put,
    path = "/messages/{id}/",
    params(("id" = i64, Path, description = "Message id")),
    request_body = MessageSend,
    responses(
        (status = 200, description = "Replaced message", body = Message),
        (status = 401, description = "Missing or unknown API key", body = UnauthorizedResponse),
        (status = 404, description = "No such message", body = ErrorResponse)
    ),
    security(("api_key" = [])),
    tag = "messages"
)]
pub async fn replace_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(credential): Extension<ApiKeyCredential>,
    Json(req): Json<MessageSend>,
) -> Result<Json<Message>, ApiError> {
    let id = parse_id(&raw_id)?;
    debug!("Replace of {} requested with key {}", id, credential.0);
    let message = run(&state, move |svc| svc.replace(id, &req.text)).await?;
    Ok(Json(message))
}

#[utoipa::path(
    delete,
    path = "/messages/{id}/",
    params(("id" = i64, Path, description = "Message id")),
    responses(
        (status = 204, description = "Message deleted", body = SuccessResponse),
        (status = 401, description = "Missing or unknown API key", body = UnauthorizedResponse),
        (status = 404, description = "No such message", body = ErrorResponse)
    ),
    security(("api_key" = [])),
    tag = "messages"
)]
pub async fn delete_message(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Extension(credential): Extension<ApiKeyCredential>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&raw_id)?;
    debug!("Delete of {} requested with key {}", id, credential.0);
    run(&state, move |svc| svc.delete(id)).await?;
    Ok((StatusCode::NO_CONTENT, Json(SuccessResponse { success: true })))
}
