//! Update Profile Use Case
//!
//! Applies a partial update to the current user. Uniqueness checks exclude
//! the user's own row, so re-submitting one's own username or email is fine.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::register::{normalize_full_name, normalize_phone};
use crate::domain::entity::user::{UserChanges, UserView};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
pub struct UpdateProfileInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub image: Option<String>,
    pub password: Option<String>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId, input: UpdateProfileInput) -> AuthResult<UserView> {
        let mut changes = UserChanges::default();

        if let Some(raw) = input.username {
            let username = UserName::new(&raw)?;
            if !self
                .user_repo
                .is_username_unique(&username, Some(user_id))
                .await?
            {
                return Err(AuthError::DuplicateUser("Username already exists".to_string()));
            }
            changes.username = Some(username);
        }

        if let Some(raw) = input.email {
            let email = Email::new(&raw)?;
            if !self.user_repo.is_email_unique(&email, Some(user_id)).await? {
                return Err(AuthError::DuplicateUser("Email already exists".to_string()));
            }
            changes.email = Some(email);
        }

        if let Some(raw) = input.full_name {
            changes.full_name = Some(normalize_full_name(&raw)?);
        }
        // A blank phone or image clears the stored value
        if let Some(raw) = input.phone {
            changes.phone = Some(normalize_phone(Some(raw))?);
        }
        changes.image = input.image.map(|raw| {
            let image = raw.trim();
            (!image.is_empty()).then(|| image.to_owned())
        });

        // Only a supplied password is re-hashed
        if let Some(raw) = input.password {
            let raw_password = RawPassword::new(raw)?;
            changes.password = Some(UserPassword::hash(raw_password).await?);
        }

        let user = if changes.is_empty() {
            self.user_repo
                .find_by_id(user_id)
                .await?
                .ok_or(AuthError::UserNotFound)?
        } else {
            self.user_repo.update(user_id, &changes).await?
        };

        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(user.view())
    }
}
