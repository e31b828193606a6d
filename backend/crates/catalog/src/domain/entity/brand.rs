//! Brand Entity

use chrono::{DateTime, Utc};
use kernel::id::BrandId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct BrandFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
}
