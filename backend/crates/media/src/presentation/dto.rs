//! API DTOs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedUrlQuery {
    pub key: Option<String>,
    pub expires_in: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyQuery {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
