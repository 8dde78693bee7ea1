//! OpenAPI document for the message routes.
//!
//! Served as JSON at `{base_path}/openapi.json`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::openapi::server::Server;
use utoipa::{Modify, OpenApi};

use messg_types::api::{ErrorResponse, MessageSend, SuccessResponse, UnauthorizedResponse};
use messg_types::models::Message;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    "X-API-Key",
                    "UUID of a provisioned API key. Required for create, replace and delete.",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "messg",
        version = "0.1.0",
        description = "Short text messages with a read counter."
    ),
    paths(
        crate::messages::list_messages,
        crate::messages::get_message,
        crate::messages::create_message,
        crate::messages::replace_message,
        crate::messages::delete_message,
    ),
    components(schemas(Message, MessageSend, ErrorResponse, SuccessResponse, UnauthorizedResponse)),
    modifiers(&SecurityAddon),
    tags((name = "messages", description = "Message storage"))
)]
pub struct ApiDoc;

/// The document with its server URL pointing at the mounted base path.
pub fn document(base_path: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    let url = if base_path.is_empty() { "/" } else { base_path };
    doc.servers = Some(vec![Server::new(url)]);
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_message_routes_are_documented() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/messages/"));
        assert!(doc.paths.paths.contains_key("/messages/{id}/"));
    }

    #[test]
    fn api_key_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("should have components");
        assert!(components.security_schemes.contains_key("api_key"));
    }

    #[test]
    fn server_url_follows_base_path() {
        let doc = document("/api");
        let servers = doc.servers.expect("servers set");
        assert_eq!(servers[0].url, "/api");
    }
}
