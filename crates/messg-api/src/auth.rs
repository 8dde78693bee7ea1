use std::sync::Arc;

use tracing::{debug, error};
use uuid::Uuid;

use messg_db::{ApiKeyRepository, Database};

use crate::error::ApiError;
use crate::service::MessageService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Arc<Database>,
    pub messages: MessageService,
}

impl AppStateInner {
    pub fn new(db: Arc<Database>) -> AppState {
        Arc::new(Self {
            messages: MessageService::new(db.clone()),
            db,
        })
    }
}

/// Resolve a raw `X-API-Key` header value to a stored key.
///
/// The value must parse as a UUID; it is matched against the store in its
/// canonical hyphenated lowercase form, so any spelling of the same UUID works.
pub async fn authorize(state: &AppState, raw: &str) -> Result<Uuid, ApiError> {
    let key = Uuid::parse_str(raw.trim()).map_err(|_| {
        debug!("Rejected malformed API key");
        ApiError::Unauthorized
    })?;

    let db = state.db.clone();
    let canonical = key.hyphenated().to_string();
    let found = tokio::task::spawn_blocking(move || db.with_conn(|conn| conn.api_key_exists(&canonical)))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::internal(e)
        })?
        .map_err(|e| {
            error!("DB api_key_exists error: {}", e);
            ApiError::internal(e)
        })?;

    if !found {
        debug!("Rejected unknown API key");
        return Err(ApiError::Unauthorized);
    }
    Ok(key)
}

/// Store `key` unless an identical row already exists. Returns true if a row
/// was inserted.
pub fn provision_api_key(db: &Database, key: Uuid) -> anyhow::Result<bool> {
    let canonical = key.hyphenated().to_string();
    db.transaction(|tx| {
        if tx.api_key_exists(&canonical)? {
            return Ok(false);
        }
        tx.insert_api_key(&canonical)?;
        Ok(true)
    })
}
