//! Banner Entity
//!
//! A banner promotes an ordered list of products.

use chrono::{DateTime, Utc};
use kernel::id::{BannerId, ProductId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: BannerId,
    pub title: String,
    pub image_url: Option<String>,
    pub is_active: bool,
    /// In display order
    pub product_ids: Vec<ProductId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBanner {
    pub title: String,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub product_ids: Vec<ProductId>,
}

/// Partial update; a supplied `product_ids` replaces the whole list
#[derive(Debug, Clone, Default)]
pub struct BannerChanges {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub product_ids: Option<Vec<ProductId>>,
}
