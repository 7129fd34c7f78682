// Identity resolution and token issuance

use std::sync::Arc;

use crate::auth::jwt::TokenService;
use crate::domain::errors::{AuthError, AuthResult};
use crate::domain::repositories::{RepositoryError, UserRepository};
use crate::domain::user::{Email, OAuthUserInfo, SignupInfo, UserId};

/// Access and refresh tokens issued together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }

    /// Resolves the user owning `info.phone`, creating it on first login
    pub async fn upsert_user(&self, info: &SignupInfo) -> AuthResult<TokenPair> {
        let user_id = match self.users.get_by_phone(&info.phone).await {
            Ok(id) => id,
            Err(RepositoryError::NotFound(_)) => {
                let id = self
                    .users
                    .create(info)
                    .await
                    .map_err(|e| AuthError::server("error creating user", e))?;
                tracing::info!(user_id = id, "user created");
                id
            }
            Err(e) => return Err(AuthError::server("error getting user", e)),
        };

        self.issue_token_pair(user_id)
    }

    /// Resolves or creates the user identified by an OAuth email
    pub async fn upsert_oauth_user(&self, info: &OAuthUserInfo) -> AuthResult<TokenPair> {
        Email::new(info.email.as_str()).map_err(|e| AuthError::invalid("email", e))?;

        let user_id = self
            .users
            .upsert_by_email(info)
            .await
            .map_err(|e| AuthError::server("error upserting oauth user", e))?;
        tracing::info!(user_id, provider = %info.provider, "oauth user resolved");

        self.issue_token_pair(user_id)
    }

    /// Exchanges a refresh token for a new token pair
    ///
    /// Every verification failure is the caller's fault and surfaces as an
    /// invalid parameter. The presented token stays valid until it expires.
    pub async fn refresh_token(&self, refresh_token: &str) -> AuthResult<TokenPair> {
        let claims = self
            .tokens
            .verify_token(refresh_token)
            .map_err(|e| AuthError::invalid("token", e.to_string()))?;
        let subject = self
            .tokens
            .validate_refresh_claims(&claims)
            .map_err(|e| AuthError::invalid("token", e.to_string()))?;
        let user_id = subject
            .parse::<UserId>()
            .map_err(|_| AuthError::invalid("token", "invalid token subject"))?;

        tracing::debug!(user_id, "refreshing token pair");
        self.issue_token_pair(user_id)
    }

    fn issue_token_pair(&self, user_id: UserId) -> AuthResult<TokenPair> {
        let subject = user_id.to_string();

        let access_token = self
            .tokens
            .sign(&self.tokens.new_access_claims(&subject))
            .map_err(|e| AuthError::server("unable to generate access token", e))?;
        let refresh_token = self
            .tokens
            .sign(&self.tokens.new_refresh_claims(&subject))
            .map_err(|e| AuthError::server("unable to generate refresh token", e))?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.tokens.access_validity_seconds(),
            refresh_expires_in: self.tokens.refresh_validity_seconds(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Audience;
    use crate::config::AuthConfig;
    use crate::infrastructure::repositories::InMemoryUserRepository;
    use async_trait::async_trait;

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(&AuthConfig {
            secret_key: "service-test-secret".to_string(),
            access_token_validity_seconds: 600,
            refresh_token_validity_seconds: 3600,
        }))
    }

    fn service() -> (AuthService, Arc<InMemoryUserRepository>, Arc<TokenService>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let tokens = token_service();
        (AuthService::new(users.clone(), tokens.clone()), users, tokens)
    }

    fn subject_of(tokens: &TokenService, access_token: &str) -> String {
        let claims = tokens.verify_token(access_token).unwrap();
        tokens.validate_access_claims(&claims).unwrap()
    }

    struct UnavailableRepository;

    #[async_trait]
    impl UserRepository for UnavailableRepository {
        async fn get_by_phone(&self, _phone: &str) -> Result<UserId, RepositoryError> {
            Err(RepositoryError::Database("connection reset".to_string()))
        }

        async fn get_by_email(&self, _email: &Email) -> Result<UserId, RepositoryError> {
            Err(RepositoryError::Database("connection reset".to_string()))
        }

        async fn create(&self, _info: &SignupInfo) -> Result<UserId, RepositoryError> {
            Err(RepositoryError::Database("connection reset".to_string()))
        }

        async fn upsert_by_email(&self, _info: &OAuthUserInfo) -> Result<UserId, RepositoryError> {
            Err(RepositoryError::Database("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn upsert_user_twice_resolves_same_subject() {
        let (svc, users, tokens) = service();
        let info = SignupInfo::new("+919876543210");

        let first = svc.upsert_user(&info).await.unwrap();
        let second = svc.upsert_user(&info).await.unwrap();

        assert_eq!(users.create_calls(), 1);
        assert_eq!(
            subject_of(&tokens, &first.access_token),
            subject_of(&tokens, &second.access_token)
        );
    }

    #[tokio::test]
    async fn token_pair_reports_validities() {
        let (svc, _, tokens) = service();

        let pair = svc.upsert_user(&SignupInfo::new("+14155550100")).await.unwrap();

        assert_eq!(pair.expires_in, 600);
        assert_eq!(pair.refresh_expires_in, 3600);
        let refresh = tokens.verify_token(&pair.refresh_token).unwrap();
        assert_eq!(refresh.aud, Audience::Refresh);
    }

    #[tokio::test]
    async fn upsert_user_store_failure_is_server_error() {
        let svc = AuthService::new(Arc::new(UnavailableRepository), token_service());

        let err = svc
            .upsert_user(&SignupInfo::new("+14155550100"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Server { .. }));
    }

    #[tokio::test]
    async fn upsert_oauth_user_is_idempotent_per_email() {
        let (svc, users, tokens) = service();
        let info = OAuthUserInfo {
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            provider: "google".to_string(),
            provider_id: "g-123".to_string(),
            ..Default::default()
        };

        let first = svc.upsert_oauth_user(&info).await.unwrap();
        let second = svc.upsert_oauth_user(&info).await.unwrap();

        assert_eq!(
            subject_of(&tokens, &first.access_token),
            subject_of(&tokens, &second.access_token)
        );
        let email = Email::new("ada@example.com").unwrap();
        assert!(users.get_by_email(&email).await.is_ok());
    }

    #[tokio::test]
    async fn upsert_oauth_user_rejects_bad_email() {
        let (svc, _, _) = service();
        let info = OAuthUserInfo {
            email: "not-an-email".to_string(),
            ..Default::default()
        };

        let err = svc.upsert_oauth_user(&info).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidParameter { field: "email", .. }));
    }

    #[tokio::test]
    async fn refresh_issues_new_pair_for_same_subject() {
        let (svc, _, tokens) = service();
        let pair = svc.upsert_user(&SignupInfo::new("+14155550100")).await.unwrap();

        let refreshed = svc.refresh_token(&pair.refresh_token).await.unwrap();

        assert_eq!(
            subject_of(&tokens, &refreshed.access_token),
            subject_of(&tokens, &pair.access_token)
        );
    }

    #[tokio::test]
    async fn refresh_with_access_token_is_rejected() {
        let (svc, _, _) = service();
        let pair = svc.upsert_user(&SignupInfo::new("+14155550100")).await.unwrap();

        let err = svc.refresh_token(&pair.access_token).await.unwrap_err();

        assert!(matches!(err, AuthError::InvalidParameter { field: "token", .. }));
        assert_eq!(err.reason(), Some("invalid token audience"));
    }

    #[tokio::test]
    async fn refresh_with_garbage_is_invalid_parameter() {
        let (svc, _, _) = service();

        let err = svc.refresh_token("garbage").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidParameter { .. }));
    }

    #[tokio::test]
    async fn refresh_with_expired_token_is_invalid_parameter() {
        let (svc, _, tokens) = service();
        let mut claims = tokens.new_refresh_claims("1");
        claims.exp = chrono::Utc::now().timestamp() - 120;
        let expired = tokens.sign(&claims).unwrap();

        let err = svc.refresh_token(&expired).await.unwrap_err();
        assert_eq!(err.reason(), Some("expired token"));
    }
}
