use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use subscription_tracker::ai::GeminiClient;
use subscription_tracker::auth::hash_password;
use subscription_tracker::models::User;
use subscription_tracker::{build_router, create_pool, db, run_migrations, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "subscription_tracker=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Subscription Tracker Server...");

    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        "Environment: {}, Server: {}",
        config.environment,
        config.server_address()
    );

    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    run_migrations(&pool).await?;

    if let Some(admin) = &config.bootstrap_admin {
        let email = User::normalize_email(&admin.email);
        let password = admin.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

        if db::users::ensure_admin(&pool, &email, &password_hash).await? {
            tracing::info!("Created bootstrap admin {}", email);
        } else {
            tracing::info!("Bootstrap admin {} already exists", email);
        }
    }

    if config.llm_api_key.is_none() {
        tracing::warn!("LLM_API_KEY not set, /ai requests will fail");
    }
    let llm = Arc::new(GeminiClient::from_config(&config)?);

    let state = AppState::new(pool, config.clone(), llm);
    let app = build_router(state);

    // Start server
    let addr: SocketAddr = config.server_address().parse()?;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
