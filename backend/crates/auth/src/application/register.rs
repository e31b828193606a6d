//! Register Use Case
//!
//! Creates a user and signs them in.

use std::sync::Arc;

use kernel::error::app_error::AppError;
use platform::token::TokenCodec;

use crate::application::AuthOutput;
use crate::domain::entity::user::NewUser;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

pub(crate) const FULL_NAME_MAX_LENGTH: usize = 100;
pub(crate) const PHONE_MAX_LENGTH: usize = 32;

pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

pub struct RegisterUseCase<U: UserRepository> {
    user_repo: Arc<U>,
    tokens: Arc<TokenCodec>,
}

impl<U: UserRepository> RegisterUseCase<U> {
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenCodec>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<AuthOutput> {
        let username = UserName::new(&input.username)?;
        let email = Email::new(&input.email)?;
        let full_name = normalize_full_name(&input.full_name)?;
        let phone = normalize_phone(input.phone)?;
        let raw_password = RawPassword::new(input.password)?;

        if self
            .user_repo
            .find_by_username_or_email(&username, &email)
            .await?
            .is_some()
        {
            return Err(AuthError::duplicate());
        }

        let password = UserPassword::hash(raw_password).await?;

        // A concurrent registration can still win the race; the repository
        // maps the unique violation to DuplicateUser
        let user = self
            .user_repo
            .create(&NewUser {
                username,
                email,
                full_name,
                password,
                phone,
            })
            .await?;

        let token = self.tokens.issue(user.id.as_i32(), user.email.as_str())?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(AuthOutput {
            user: user.view(),
            token,
        })
    }
}

pub(crate) fn normalize_full_name(raw: &str) -> AuthResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AuthError::Validation(AppError::bad_request(
            "Full name cannot be empty",
        )));
    }
    if name.chars().count() > FULL_NAME_MAX_LENGTH {
        return Err(AuthError::Validation(AppError::bad_request(
            format!("Full name must be at most {FULL_NAME_MAX_LENGTH} characters"),
        )));
    }
    Ok(name.to_owned())
}

/// Blank phone numbers are treated as absent
pub(crate) fn normalize_phone(raw: Option<String>) -> AuthResult<Option<String>> {
    let Some(phone) = raw.map(|p| p.trim().to_owned()).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    if phone.chars().count() > PHONE_MAX_LENGTH
        || !phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(AuthError::Validation(AppError::bad_request(
            "Invalid phone number",
        )));
    }
    Ok(Some(phone))
}
