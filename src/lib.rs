//! Conduit - a content-platform backend
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - User account endpoints                                   │
//! │  - Profile / follow endpoints                               │
//! │  - Article bookmark endpoints                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Credential resolution                                    │
//! │  - Profile mutation with uniqueness validation              │
//! │  - Idempotent relation management                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - SQLite (sqlx): users, articles, relations                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers and DTO envelopes
//! - `service`: Business logic layer
//! - `data`: Database layer
//! - `auth`: Tokens, passwords, credential resolution
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod service;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the database pool and services.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// Credential resolution for protected endpoints
    pub auth: Arc<auth::AuthResolver>,

    /// Registration and login
    pub users: Arc<service::UserService>,

    /// Partial profile mutation
    pub profile_updates: Arc<service::ProfileUpdateService>,

    /// Follow and bookmark relations
    pub relations: Arc<service::RelationService>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to SQLite database (runs migrations)
    /// 2. Construct the token service and credential resolver
    /// 3. Construct the domain services
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        let db = Arc::new(data::Database::connect(&config.database.path).await?);
        tracing::info!("Database connected");

        let tokens = auth::AuthTokens::new(
            config.auth.token_secret.clone(),
            config.auth.token_ttl_seconds,
        );

        let auth = Arc::new(auth::AuthResolver::new(db.clone(), tokens.clone()));
        let users = Arc::new(service::UserService::new(
            db.clone(),
            tokens,
            config.users.default_image.clone(),
        ));
        let profile_updates = Arc::new(service::ProfileUpdateService::new(db.clone()));
        let relations = Arc::new(service::RelationService::new(db.clone()));

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db,
            auth,
            users,
            profile_updates,
            relations,
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(api::api_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
