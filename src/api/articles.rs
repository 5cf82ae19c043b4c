//! Article endpoints: view and bookmark management
//!
//! Article authoring is out of scope; only the read view and the
//! per-viewer bookmark relation are served here.

use axum::extract::{Path, State};
use axum::response::Json;

use super::dto::ArticleResponse;
use crate::auth::{MaybePrincipal, Principal};
use crate::error::AppError;
use crate::AppState;

/// GET /articles/:slug
pub async fn get_article(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, AppError> {
    let viewer_id = principal.as_ref().map(|p| p.0.id.as_str());
    let article = state
        .db
        .article_view(&slug, viewer_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(ArticleResponse { article }))
}

/// POST /articles/:slug/bookmark
pub async fn bookmark(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = state.relations.bookmark(&user.id, &slug).await?;
    Ok(Json(ArticleResponse { article }))
}

/// DELETE /articles/:slug/bookmark
pub async fn unbookmark(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(slug): Path<String>,
) -> Result<Json<ArticleResponse>, AppError> {
    let article = state.relations.unbookmark(&user.id, &slug).await?;
    Ok(Json(ArticleResponse { article }))
}
