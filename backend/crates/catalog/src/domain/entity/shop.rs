//! Shop Entity

use chrono::{DateTime, Utc};
use kernel::id::{ShopId, UserId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: ShopId,
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewShop {
    pub owner_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct ShopChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}
