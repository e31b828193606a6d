//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use kernel::extract::AppJson;
use std::sync::Arc;

use platform::token::TokenCodec;

use crate::application::{
    DeleteAccountUseCase, GetProfileUseCase, ListUsersUseCase, LoginInput, LoginUseCase,
    RegisterInput, RegisterUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use crate::domain::entity::user::UserView;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UpdateProfileRequest,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub tokens: Arc<TokenCodec>,
}

/// POST /api/users/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.repo.clone(), state.tokens.clone());

    let output = use_case
        .execute(RegisterInput {
            username: req.username,
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            phone: req.phone,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: output.user,
            token: output.token,
        }),
    ))
}

/// POST /api/users/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    AppJson(req): AppJson<LoginRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.repo.clone(), state.tokens.clone());

    let output = use_case
        .execute(LoginInput {
            username: req.username,
            password: req.password,
        })
        .await?;

    Ok(Json(AuthResponse {
        user: output.user,
        token: output.token,
    }))
}

/// GET /api/users
pub async fn list_users<R>(
    State(state): State<AuthAppState<R>>,
    _user: CurrentUser,
) -> AuthResult<Json<Vec<UserView>>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let users = ListUsersUseCase::new(state.repo.clone()).execute().await?;
    Ok(Json(users))
}

/// GET /api/users/profile
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    user: CurrentUser,
) -> AuthResult<Json<UserView>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let view = GetProfileUseCase::new(state.repo.clone())
        .execute(user.id)
        .await?;
    Ok(Json(view))
}

/// PUT /api/users
pub async fn update_profile<R>(
    State(state): State<AuthAppState<R>>,
    user: CurrentUser,
    AppJson(req): AppJson<UpdateProfileRequest>,
) -> AuthResult<Json<UserView>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let view = UpdateProfileUseCase::new(state.repo.clone())
        .execute(
            user.id,
            UpdateProfileInput {
                username: req.username,
                email: req.email,
                full_name: req.full_name,
                phone: req.phone,
                image: req.image,
                password: req.password,
            },
        )
        .await?;
    Ok(Json(view))
}

/// DELETE /api/users
pub async fn delete_account<R>(
    State(state): State<AuthAppState<R>>,
    user: CurrentUser,
) -> AuthResult<Json<MessageResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    DeleteAccountUseCase::new(state.repo.clone())
        .execute(user.id)
        .await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
