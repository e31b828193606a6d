//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod delete_account;
pub mod get_profile;
pub mod list_users;
pub mod login;
pub mod register;
pub mod update_profile;

// Re-exports
pub use config::AuthConfig;
pub use delete_account::DeleteAccountUseCase;
pub use get_profile::GetProfileUseCase;
pub use list_users::ListUsersUseCase;
pub use login::{LoginInput, LoginUseCase};
pub use register::{RegisterInput, RegisterUseCase};
pub use update_profile::{UpdateProfileInput, UpdateProfileUseCase};

use crate::domain::entity::user::UserView;

/// User plus a freshly issued bearer token
#[derive(Debug, Clone)]
pub struct AuthOutput {
    pub user: UserView,
    pub token: String,
}
