//! Subscription Tracker Server Library
//!
//! This module exports the core types and functions for testing and reuse.

pub mod ai;
pub mod auth;
pub mod billing;
pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod extract;
pub mod models;
pub mod routes;

pub use config::Config;
pub use db::{create_pool, run_migrations, Db};
pub use error::{AppError, Result};

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ai::TextGenerator;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: Db,
    pub config: Config,
    pub llm: Arc<dyn TextGenerator>,
}

impl AppState {
    /// Create a new AppState with the given pool, configuration and model client
    pub fn new(pool: Db, config: Config, llm: Arc<dyn TextGenerator>) -> Self {
        Self { pool, config, llm }
    }
}

/// Build the full HTTP surface with CORS and request tracing
pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_check))
        .route("/login", post(routes::login))
        .route("/signup", post(routes::signup))
        .route("/users", get(routes::list_users))
        .route("/checkrole", get(routes::check_role))
        .route(
            "/subscriptions",
            get(routes::list_subscriptions)
                .post(routes::create_subscription)
                .put(routes::update_subscription)
                .delete(routes::delete_subscription),
        )
        .route("/subscriptions/visibility", put(routes::set_visibility))
        .route("/subscriptions/shared", get(routes::list_shared))
        .route("/subscriptions/upcoming", get(routes::upcoming_renewals))
        .route("/insights", get(routes::spend_insights))
        .route("/ai", post(routes::ai_categorize))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
