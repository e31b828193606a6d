//! List Users Use Case

use std::sync::Arc;

use crate::domain::entity::user::UserView;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

pub struct ListUsersUseCase<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self) -> AuthResult<Vec<UserView>> {
        let users = self.user_repo.find_all().await?;
        Ok(users.iter().map(|u| u.view()).collect())
    }
}
