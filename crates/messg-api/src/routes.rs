use std::sync::Arc;

use axum::{
    Json, Router,
    handler::Handler,
    middleware,
    routing::{MethodFilter, MethodRouter, get, on},
};

use crate::auth::AppState;
use crate::messages;
use crate::middleware::require_api_key;
use crate::openapi;

/// Who may call a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// Requires a stored key in `X-API-Key`.
    ApiKey,
}

pub struct RouteSpec {
    pub method: MethodFilter,
    pub path: &'static str,
    pub access: Access,
    pub handler: MethodRouter<AppState>,
}

impl RouteSpec {
    /// Bind `handler` to `method` on `path`.
    fn new<H, T>(method: MethodFilter, path: &'static str, access: Access, handler: H) -> Self
    where
        H: Handler<T, AppState>,
        T: 'static,
    {
        Self {
            method,
            path,
            access,
            handler: on(method, handler),
        }
    }
}

/// Every message route, relative to the base path.
pub fn route_table() -> Vec<RouteSpec> {
    vec![
        RouteSpec::new(MethodFilter::GET, "/messages/", Access::Public, messages::list_messages),
        RouteSpec::new(MethodFilter::GET, "/messages/{id}/", Access::Public, messages::get_message),
        RouteSpec::new(MethodFilter::POST, "/messages/", Access::ApiKey, messages::create_message),
        RouteSpec::new(MethodFilter::PUT, "/messages/{id}/", Access::ApiKey, messages::replace_message),
        RouteSpec::new(
            MethodFilter::DELETE,
            "/messages/{id}/",
            Access::ApiKey,
            messages::delete_message,
        ),
    ]
}

/// Build the application router from [`route_table`].
///
/// Routes are mounted under `base_path` (e.g. `/api`); an empty base path
/// mounts them at the root. `/health` always lives at the root.
pub fn build_router(state: AppState, base_path: &str) -> Router {
    let mut api = Router::new();
    for spec in route_table() {
        let handler = match spec.access {
            Access::Public => spec.handler,
            Access::ApiKey => spec
                .handler
                .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key)),
        };
        // Same path registered twice merges the method routers
        api = api.route(spec.path, handler);
    }

    let doc = Arc::new(openapi::document(base_path));
    let api = api
        .route(
            "/openapi.json",
            get(move || {
                let doc = doc.clone();
                async move { Json(doc.as_ref().clone()) }
            }),
        )
        .with_state(state);

    let root = Router::new().route("/health", get(health));
    if base_path.is_empty() || base_path == "/" {
        root.merge(api)
    } else {
        root.nest(base_path, api)
    }
}

/// GET /health — liveness check (no auth).
pub async fn health() -> &'static str {
    "ok"
}
