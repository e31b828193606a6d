//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use sqlx::PgPool;

use crate::domain::entity::user::{NewUser, User, UserChanges};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, user_name::UserName, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult, map_write_error};

const USER_COLUMNS: &str = r#"
    id,
    username,
    email,
    full_name,
    password_hash,
    image,
    phone,
    is_deleted,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user directory
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn select_where(predicate: &str) -> String {
    format!("SELECT {USER_COLUMNS} FROM users WHERE {predicate} LIMIT 1")
}

impl UserRepository for PgAuthRepository {
    async fn find_by_id(&self, id: UserId) -> AuthResult<Option<User>> {
        let sql = select_where("id = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_id_including_deleted(&self, id: UserId) -> AuthResult<Option<User>> {
        let sql = select_where("id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        let sql = select_where("username = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let sql = select_where("email = $1 AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_by_username_or_email(
        &self,
        username: &UserName,
        email: &Email,
    ) -> AuthResult<Option<User>> {
        let sql = select_where("(username = $1 OR email = $2) AND is_deleted = FALSE");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username.as_str())
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(UserRow::into_user).transpose()
    }

    async fn find_all(&self) -> AuthResult<Vec<User>> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE is_deleted = FALSE ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(UserRow::into_user).collect()
    }

    async fn is_username_unique(
        &self,
        username: &UserName,
        exclude_id: Option<UserId>,
    ) -> AuthResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE username = $1
                  AND is_deleted = FALSE
                  AND ($2::INT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(username.as_str())
        .bind(exclude_id.map(|id| id.as_i32()))
        .fetch_one(&self.pool)
        .await?;

        Ok(!taken)
    }

    async fn is_email_unique(&self, email: &Email, exclude_id: Option<UserId>) -> AuthResult<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1
                  AND is_deleted = FALSE
                  AND ($2::INT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(email.as_str())
        .bind(exclude_id.map(|id| id.as_i32()))
        .fetch_one(&self.pool)
        .await?;

        Ok(!taken)
    }

    async fn create(&self, user: &NewUser) -> AuthResult<User> {
        let sql = format!(
            r#"
            INSERT INTO users (username, email, full_name, password_hash, phone)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.username.as_str())
            .bind(user.email.as_str())
            .bind(&user.full_name)
            .bind(user.password.as_phc_string())
            .bind(user.phone.as_deref())
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)?;

        row.into_user()
    }

    async fn update(&self, id: UserId, changes: &UserChanges) -> AuthResult<User> {
        let sql = format!(
            r#"
            UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                full_name = COALESCE($4, full_name),
                phone = CASE WHEN $5 THEN $6 ELSE phone END,
                image = CASE WHEN $7 THEN $8 ELSE image END,
                password_hash = COALESCE($9, password_hash),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING {USER_COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_i32())
            .bind(changes.username.as_ref().map(|u| u.as_str()))
            .bind(changes.email.as_ref().map(|e| e.as_str()))
            .bind(changes.full_name.as_deref())
            .bind(changes.phone.is_some())
            .bind(changes.phone.as_ref().and_then(|p| p.as_deref()))
            .bind(changes.image.is_some())
            .bind(changes.image.as_ref().and_then(|i| i.as_deref()))
            .bind(changes.password.as_ref().map(|p| p.as_phc_string()))
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)?;

        row.ok_or(AuthError::UserNotFound)?.into_user()
    }

    async fn soft_delete(&self, id: UserId) -> AuthResult<()> {
        let affected = sqlx::query(
            "UPDATE users SET is_deleted = TRUE, updated_at = NOW() WHERE id = $1 AND is_deleted = FALSE",
        )
        .bind(id.as_i32())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Row mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    full_name: String,
    password_hash: String,
    image: Option<String>,
    phone: Option<String>,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        Ok(User {
            id: UserId::new(self.id),
            username: UserName::from_db(self.username),
            email: Email::from_db(self.email),
            full_name: self.full_name,
            password: UserPassword::from_phc_string(self.password_hash)?,
            image: self.image,
            phone: self.phone,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
