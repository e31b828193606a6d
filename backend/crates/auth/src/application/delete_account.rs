//! Delete Account Use Case
//!
//! Soft delete: the row is kept but hidden from every lookup.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::UserRepository;
use crate::error::AuthResult;

pub struct DeleteAccountUseCase<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> DeleteAccountUseCase<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<()> {
        self.user_repo.soft_delete(user_id).await?;
        tracing::info!(user_id = %user_id, "Account deleted");
        Ok(())
    }
}
