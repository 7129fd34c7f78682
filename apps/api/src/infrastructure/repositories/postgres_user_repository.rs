use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::repositories::user_repository::{RepositoryError, UserRepository};
use crate::domain::user::{Email, OAuthUserInfo, SignupInfo, UserId};

/// PostgreSQL implementation of UserRepository
///
/// Expects a `users` table with a `BIGSERIAL` id and unique `phone` and
/// `email` columns.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_by_phone(&self, phone: &str) -> Result<UserId, RepositoryError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM users WHERE phone = $1
            "#,
        )
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to find user by phone: {}", e)))?
        .ok_or_else(|| RepositoryError::NotFound("user".to_string()))
    }

    async fn get_by_email(&self, email: &Email) -> Result<UserId, RepositoryError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id FROM users WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to find user by email: {}", e)))?
        .ok_or_else(|| RepositoryError::NotFound("user".to_string()))
    }

    async fn create(&self, info: &SignupInfo) -> Result<UserId, RepositoryError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (phone, dial_code, country, locale)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&info.phone)
        .bind(&info.dial_code)
        .bind(&info.country)
        .bind(&info.locale)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to create user: {}", e)))
    }

    async fn upsert_by_email(&self, info: &OAuthUserInfo) -> Result<UserId, RepositoryError> {
        // The no-op update makes RETURNING yield the existing id on conflict
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (email, name, picture, locale, provider, provider_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
            RETURNING id
            "#,
        )
        .bind(&info.email)
        .bind(&info.name)
        .bind(&info.picture)
        .bind(&info.locale)
        .bind(&info.provider)
        .bind(&info.provider_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(format!("Failed to upsert user by email: {}", e)))
    }
}
