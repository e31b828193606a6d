//! API DTOs
//!
//! Request bodies are the application `*Input` types; this module holds the
//! response shapes that are not entities.

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
