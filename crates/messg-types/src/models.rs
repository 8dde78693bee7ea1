use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upper bound on message text enforced at creation time, in characters.
pub const MAX_TEXT_CHARS: usize = 160;

/// A stored message as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Message {
    pub id: i64,
    /// Number of times the message has been fetched since it was last written.
    pub counter: i64,
    pub text: String,
}
