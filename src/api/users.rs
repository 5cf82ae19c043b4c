//! User endpoints: registration, login, current user

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use super::dto::*;
use crate::auth::Principal;
use crate::error::AppError;
use crate::service::{Registration, UserUpdate};
use crate::AppState;

/// POST /users
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<UserEnvelope<RegisterRequest>>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let (user, token) = state
        .users
        .register(Registration {
            username: body.user.username,
            email: body.user.email,
            password: body.user.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::new(user, token))))
}

/// POST /users/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<UserEnvelope<LoginRequest>>,
) -> Result<Json<UserResponse>, AppError> {
    let (user, token) = state
        .users
        .login(&body.user.email, &body.user.password)
        .await?;

    Ok(Json(UserResponse::new(user, token)))
}

/// GET /user
pub async fn current_user(
    State(state): State<AppState>,
    Principal(user): Principal,
) -> Result<Json<UserResponse>, AppError> {
    let token = state.users.issue_token(&user)?;
    Ok(Json(UserResponse::new(user, token)))
}

/// PUT /user
pub async fn update_user(
    State(state): State<AppState>,
    Principal(user): Principal,
    Json(body): Json<UserEnvelope<UpdateUserRequest>>,
) -> Result<Json<UserResponse>, AppError> {
    let updated = state
        .profile_updates
        .update(
            &user,
            UserUpdate {
                email: body.user.email,
                username: body.user.username,
                password: body.user.password,
                bio: body.user.bio,
                image: body.user.image,
            },
        )
        .await?;

    let token = state.users.issue_token(&updated)?;
    Ok(Json(UserResponse::new(updated, token)))
}
