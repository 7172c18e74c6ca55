//! Bilingual Portfolio CMS Backend
//!
//! REST backend for the admin panel of a small bilingual (en/pt) portfolio
//! site: a versioned content store with a revert workflow and bearer-token
//! admin sessions, persisted in SQLite.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::SessionStore;
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub sessions: Arc<SessionStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Portfolio CMS Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if the documented default password is still active
    if config.admin_password == config::DEFAULT_ADMIN_PASSWORD {
        tracing::warn!("Default admin password in use (CMS_ADMIN_PASSWORD). Change it!");
    }

    // Initialize database (migrations + content seed)
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        sessions: Arc::new(SessionStore::new()),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone the session store for the auth layer
    let sessions = state.sessions.clone();

    // Protected admin routes
    let admin_routes = Router::new()
        .route(
            "/content",
            get(api::get_content).put(api::update_content),
        )
        .route("/content/versions", get(api::list_versions))
        .route("/content/revert/{id}", post(api::revert_version))
        .route("/logout", post(api::logout))
        // Apply bearer session auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::bearer_auth_layer(sessions.clone(), req, next)
        }))
        // Added after the layer so login itself needs no token
        .route("/login", post(api::login));

    // Public routes: the snapshot the site renders from, health check
    let public_routes = Router::new()
        .route("/api/content", get(api::get_content))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api/admin", admin_routes)
        .merge(public_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
