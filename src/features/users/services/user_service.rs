use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use validator::Validate;

use crate::features::users::models::{Credentials, NewUser, User, UserId, UserRecord};
use crate::features::users::services::password_hasher::{hash_password, verify_password};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("{0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Email already registered. Please sign in instead.")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Read access to registered users, used to snapshot display names
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, UserError>;
}

/// Registration and credential checks over the `users` table
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user and return its id
    pub async fn register(&self, new_user: NewUser) -> Result<UserId, UserError> {
        let new_user = new_user.normalized();
        new_user.validate()?;

        let password = new_user.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| UserError::Hashing(e.to_string()))?
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (name, number, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.number)
        .bind(&new_user.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => UserError::EmailTaken,
            e => {
                tracing::error!("Failed to register user: {:?}", e);
                UserError::Database(e)
            }
        })?;

        tracing::info!("Registered user: {}", id);
        Ok(id)
    }

    /// Check credentials. Unknown e-mail and wrong password look the same to the caller.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<UserRecord, UserError> {
        let email = credentials.email.trim().to_lowercase();
        if email.is_empty() || credentials.password.is_empty() {
            return Err(UserError::InvalidCredentials);
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, number, email, password_hash, is_admin, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(&email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to look up user by email: {:?}", e);
            UserError::Database(e)
        })?
        .ok_or(UserError::InvalidCredentials)?;

        let password = credentials.password.clone();
        let stored_hash = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
            .await
            .map_err(|e| UserError::Hashing(e.to_string()))?
            .map_err(|e| {
                tracing::error!("Stored password hash for user {} is unusable: {}", user.id, e);
                UserError::Hashing(e.to_string())
            })?;

        if !matches {
            tracing::debug!("Password mismatch for user {}", user.id);
            return Err(UserError::InvalidCredentials);
        }

        Ok(user.into())
    }
}

#[async_trait]
impl UserDirectory for UserService {
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, UserError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, number, email, password_hash, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user {}: {:?}", id, e);
            UserError::Database(e)
        })?;

        Ok(user.map(UserRecord::from))
    }
}
