use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

use crate::domain::repositories::user_repository::{RepositoryError, UserRepository};
use crate::domain::user::{Email, OAuthUserInfo, SignupInfo, UserId};

#[derive(Default)]
struct Users {
    next_id: UserId,
    by_phone: HashMap<String, UserId>,
    by_email: HashMap<String, UserId>,
}

impl Users {
    fn allocate(&mut self) -> UserId {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process UserRepository with the same uniqueness rules as the Postgres one
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Users>,
    create_calls: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `create` has been called
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_phone(&self, phone: &str) -> Result<UserId, RepositoryError> {
        self.users
            .lock()
            .await
            .by_phone
            .get(phone)
            .copied()
            .ok_or_else(|| RepositoryError::NotFound("user".to_string()))
    }

    async fn get_by_email(&self, email: &Email) -> Result<UserId, RepositoryError> {
        self.users
            .lock()
            .await
            .by_email
            .get(email.as_str())
            .copied()
            .ok_or_else(|| RepositoryError::NotFound("user".to_string()))
    }

    async fn create(&self, info: &SignupInfo) -> Result<UserId, RepositoryError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        let mut users = self.users.lock().await;
        if users.by_phone.contains_key(&info.phone) {
            return Err(RepositoryError::Database(format!(
                "duplicate phone: {}",
                info.phone
            )));
        }
        let id = users.allocate();
        users.by_phone.insert(info.phone.clone(), id);
        Ok(id)
    }

    async fn upsert_by_email(&self, info: &OAuthUserInfo) -> Result<UserId, RepositoryError> {
        let mut users = self.users.lock().await;
        if let Some(id) = users.by_email.get(&info.email) {
            return Ok(*id);
        }
        let id = users.allocate();
        users.by_email.insert(info.email.clone(), id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_then_find_by_phone() {
        let repo = InMemoryUserRepository::new();
        let id = repo.create(&SignupInfo::new("+14155550100")).await.unwrap();

        assert_eq!(repo.get_by_phone("+14155550100").await.unwrap(), id);
        assert_eq!(repo.create_calls(), 1);
    }

    #[tokio::test]
    async fn unknown_phone_is_not_found() {
        let repo = InMemoryUserRepository::new();
        assert!(matches!(
            repo.get_by_phone("+14155550100").await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicate_phone_rejected() {
        let repo = InMemoryUserRepository::new();
        let info = SignupInfo::new("+14155550100");
        repo.create(&info).await.unwrap();

        assert!(matches!(
            repo.create(&info).await,
            Err(RepositoryError::Database(_))
        ));
    }

    #[tokio::test]
    async fn upsert_by_email_returns_existing_id() {
        let repo = InMemoryUserRepository::new();
        let info = OAuthUserInfo {
            email: "ada@example.com".to_string(),
            ..Default::default()
        };

        let first = repo.upsert_by_email(&info).await.unwrap();
        let second = repo.upsert_by_email(&info).await.unwrap();

        assert_eq!(first, second);
        let email = Email::new("ada@example.com").unwrap();
        assert_eq!(repo.get_by_email(&email).await.unwrap(), first);
    }
}
