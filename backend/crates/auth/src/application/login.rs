//! Login Use Case
//!
//! Verifies a username/password pair and issues a bearer token.

use std::sync::Arc;

use platform::token::TokenCodec;

use crate::application::AuthOutput;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub struct LoginUseCase<U: UserRepository> {
    user_repo: Arc<U>,
    tokens: Arc<TokenCodec>,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenCodec>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<AuthOutput> {
        // A name that cannot exist cannot be found
        let username = UserName::new(&input.username).map_err(|_| AuthError::UserNotFound)?;

        let user = self
            .user_repo
            .find_by_username(&username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user
            .password
            .matches(RawPassword::for_login(input.password))
            .await
        {
            tracing::warn!(user_id = %user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id.as_i32(), user.email.as_str())?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthOutput {
            user: user.view(),
            token,
        })
    }
}
