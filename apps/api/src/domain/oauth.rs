use async_trait::async_trait;

use super::errors::AuthResult;
use super::user::OAuthUserInfo;

/// Identity provider capable of exchanging an authorization code
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// Exchange an authorization code for the provider's user information
    async fn exchange_code(&self, code: &str) -> AuthResult<OAuthUserInfo>;

    /// Name used to select the provider, e.g. "google"
    fn provider_name(&self) -> &str;
}
