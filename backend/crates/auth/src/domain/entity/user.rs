//! User Entity

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::Serialize;

use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword,
};

/// User entity, including the stored password hash
///
/// Never serialized directly; responses go through [`UserView`].
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: UserName,
    pub email: Email,
    pub full_name: String,
    pub password: UserPassword,
    /// URL or storage key
    pub image: Option<String>,
    pub phone: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Safe projection for API responses
    pub fn view(&self) -> UserView {
        UserView {
            id: self.id,
            username: self.username.as_str().to_owned(),
            email: self.email.as_str().to_owned(),
            full_name: self.full_name.clone(),
            image: self.image.clone(),
            phone: self.phone.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// User without credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub image: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data for a user that does not exist yet
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: UserName,
    pub email: Email,
    pub full_name: String,
    pub password: UserPassword,
    pub phone: Option<String>,
}

/// Partial update; `None` keeps the stored value
///
/// `phone` and `image` are nullable columns: `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<UserName>,
    pub email: Option<Email>,
    pub full_name: Option<String>,
    pub phone: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub password: Option<UserPassword>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_none()
            && self.phone.is_none()
            && self.image.is_none()
            && self.password.is_none()
    }
}
