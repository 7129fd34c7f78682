use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::{Email, OAuthUserInfo, SignupInfo, UserId};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Repository trait for user identities
///
/// Uniqueness of phone and email is enforced by the implementation, not by
/// callers. Existing rows are never modified through this trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user id by phone number, `RepositoryError::NotFound` when absent
    async fn get_by_phone(&self, phone: &str) -> Result<UserId, RepositoryError>;

    /// Find a user id by email address, `RepositoryError::NotFound` when absent
    async fn get_by_email(&self, email: &Email) -> Result<UserId, RepositoryError>;

    /// Create a user from phone signup data
    async fn create(&self, info: &SignupInfo) -> Result<UserId, RepositoryError>;

    /// Create the user if the email is unknown, otherwise return the existing id
    async fn upsert_by_email(&self, info: &OAuthUserInfo) -> Result<UserId, RepositoryError>;
}
