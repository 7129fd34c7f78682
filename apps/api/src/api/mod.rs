// API layer module (adapters for controllers)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod handlers;
pub mod middleware;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::{AuthService, OtpService, TokenService};
use crate::domain::oauth::OAuthProvider;
use handlers::auth as auth_handlers;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub otp: Arc<OtpService>,
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    oauth_providers: Arc<HashMap<String, Arc<dyn OAuthProvider>>>,
}

impl AppState {
    pub fn new(otp: Arc<OtpService>, auth: Arc<AuthService>, tokens: Arc<TokenService>) -> Self {
        Self {
            otp,
            auth,
            tokens,
            oauth_providers: Arc::new(HashMap::new()),
        }
    }

    /// Registers an OAuth provider under its `provider_name()`
    pub fn with_oauth_provider(mut self, provider: Arc<dyn OAuthProvider>) -> Self {
        Arc::make_mut(&mut self.oauth_providers)
            .insert(provider.provider_name().to_string(), provider);
        self
    }

    pub fn oauth_provider(&self, name: &str) -> Option<Arc<dyn OAuthProvider>> {
        self.oauth_providers.get(name).cloned()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Builds the application router without transport-level layers
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(auth_handlers::health_check))
        .route("/api/auth/otp/send", post(auth_handlers::send_otp))
        .route("/api/auth/otp/verify", post(auth_handlers::verify_otp))
        .route("/api/auth/oauth", post(auth_handlers::oauth_login))
        .route("/api/auth/token/refresh", post(auth_handlers::refresh_token))
        .route("/api/auth/me", get(auth_handlers::me))
        .with_state(state)
}
