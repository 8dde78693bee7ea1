use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// -- Requests --

/// Body of create and replace requests.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MessageSend {
    pub text: String,
}

// -- Responses --

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Body returned for any rejected credential.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UnauthorizedResponse {
    pub detail: String,
}

impl Default for UnauthorizedResponse {
    fn default() -> Self {
        Self {
            detail: "Unauthorized".to_string(),
        }
    }
}
