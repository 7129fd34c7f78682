use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use otpauth_api::api::{self, AppState};
use otpauth_api::auth::{AuthService, OtpService, TokenService};
use otpauth_api::config::Config;
use otpauth_api::domain::repositories::CacheStore;
use otpauth_api::infrastructure::cache::{InMemoryCache, RedisCache};
use otpauth_api::infrastructure::messaging::LogMessageSender;
use otpauth_api::infrastructure::repositories::PostgresUserRepository;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "server terminated");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    tracing::info!("Database connected successfully");

    let cache: Arc<dyn CacheStore> = match &config.redis_url {
        Some(url) => {
            tracing::info!("Using redis for otp state");
            Arc::new(RedisCache::connect(url).await?)
        }
        None => {
            tracing::warn!("REDIS_URL not set, keeping otp state in memory");
            Arc::new(InMemoryCache::new())
        }
    };

    tracing::warn!("Using log message sender, OTP codes are not delivered");
    let sender = Arc::new(LogMessageSender);

    let tokens = Arc::new(TokenService::new(&config.auth));
    let otp = Arc::new(OtpService::new(config.otp.clone(), sender, cache));
    let users = Arc::new(PostgresUserRepository::new(pool));
    let auth = Arc::new(AuthService::new(users, tokens.clone()));

    let state = AppState::new(otp, auth, tokens);

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Server listening on {}", config.bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
