//! Profile endpoints: view, follow, unfollow

use axum::extract::{Path, State};
use axum::response::Json;

use super::dto::ProfileResponse;
use crate::auth::{MaybePrincipal, Principal};
use crate::error::AppError;
use crate::AppState;

/// GET /profiles/:username
///
/// Anonymous viewers get `following: false`; a supplied credential must
/// still be valid.
pub async fn get_profile(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let viewer_id = principal.as_ref().map(|p| p.0.id.as_str());
    let profile = state
        .db
        .profile_view(&username, viewer_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(ProfileResponse { profile }))
}

/// POST /profiles/:username/follow
pub async fn follow(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.relations.follow(&user.id, &username).await?;
    Ok(Json(ProfileResponse { profile }))
}

/// DELETE /profiles/:username/follow
pub async fn unfollow(
    State(state): State<AppState>,
    Principal(user): Principal,
    Path(username): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.relations.unfollow(&user.id, &username).await?;
    Ok(Json(ProfileResponse { profile }))
}
