//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//! Unless stated otherwise, lookups only see users that are not soft-deleted.

use kernel::id::UserId;

use crate::domain::entity::user::{NewUser, User, UserChanges};
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::AuthResult;

/// User directory
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>>;

    /// Lookup that also returns soft-deleted users
    async fn find_by_id_including_deleted(&self, id: UserId) -> AuthResult<Option<User>>;

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// First user matching either the username or the email
    async fn find_by_username_or_email(
        &self,
        username: &UserName,
        email: &Email,
    ) -> AuthResult<Option<User>>;

    /// All users, newest first
    async fn find_all(&self) -> AuthResult<Vec<User>>;

    /// True when no other user holds `username`
    async fn is_username_unique(
        &self,
        username: &UserName,
        exclude_id: Option<UserId>,
    ) -> AuthResult<bool>;

    /// True when no other user holds `email`
    async fn is_email_unique(&self, email: &Email, exclude_id: Option<UserId>) -> AuthResult<bool>;

    /// Insert a user. Fails with `DuplicateUser` when a unique constraint fires.
    async fn create(&self, user: &NewUser) -> AuthResult<User>;

    /// Merge the provided fields. `UserNotFound` when no live row matches.
    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<User>;

    async fn soft_delete(&self, id: UserId) -> AuthResult<()>;
}
