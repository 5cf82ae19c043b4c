//! Request and response DTOs
//!
//! The wire format wraps every body in a single-key envelope:
//! `{"user": ...}`, `{"profile": ...}`, `{"article": ...}`.

use serde::{Deserialize, Serialize};

use crate::data::{ArticleData, ProfileData, User};

/// Generic `{"user": ...}` request envelope
#[derive(Debug, Deserialize)]
pub struct UserEnvelope<T> {
    pub user: T,
}

/// Registration payload; missing fields validate as empty
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login payload
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent fields are left untouched
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// `{"user": ...}` response body with the access token
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserWithToken,
}

#[derive(Debug, Serialize)]
pub struct UserWithToken {
    pub email: String,
    pub username: String,
    pub bio: String,
    pub image: String,
    pub token: String,
}

impl UserResponse {
    pub fn new(user: User, token: String) -> Self {
        Self {
            user: UserWithToken {
                email: user.email,
                username: user.username,
                bio: user.bio,
                image: user.image,
                token,
            },
        }
    }
}

/// `{"profile": ...}` response body
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: ProfileData,
}

/// `{"article": ...}` response body
#[derive(Debug, Serialize)]
pub struct ArticleResponse {
    pub article: ArticleData,
}
