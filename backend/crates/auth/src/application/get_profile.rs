//! Get Profile Use Case

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::entity::user::UserView;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct GetProfileUseCase<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> GetProfileUseCase<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<UserView> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(|user| user.view())
            .ok_or(AuthError::UserNotFound)
    }
}
