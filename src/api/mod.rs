//! API layer
//!
//! HTTP handlers for:
//! - User accounts (register, login, current user)
//! - Profiles and follow relations
//! - Article views and bookmarks

mod articles;
mod dto;
mod profiles;
mod users;

pub use dto::*;

use axum::routing::{get, post};
use axum::Router;

use crate::AppState;

/// All application routes
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/users", post(users::register))
        .route("/users/login", post(users::login))
        .route("/user", get(users::current_user).put(users::update_user))
        .route("/profiles/:username", get(profiles::get_profile))
        .route(
            "/profiles/:username/follow",
            post(profiles::follow).delete(profiles::unfollow),
        )
        .route("/articles/:slug", get(articles::get_article))
        .route(
            "/articles/:slug/bookmark",
            post(articles::bookmark).delete(articles::unbookmark),
        )
}
