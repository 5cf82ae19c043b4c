//! Profile update service
//!
//! Applies partial profile mutations with uniqueness validation. Errors
//! accumulate across all provided fields; the update is all-or-nothing.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::hash_password;
use crate::data::{unique_violation_field, Database, User};
use crate::error::{AppError, FieldErrors};

use super::is_valid_email;

/// A partial profile mutation
///
/// `None` means "leave untouched". An explicit empty string is a value and
/// is applied; empty bio and image are valid.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Applies partial profile mutations against the user store
pub struct ProfileUpdateService {
    db: Arc<Database>,
}

impl ProfileUpdateService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Apply a partial update for the authenticated user.
    ///
    /// Validation runs over every provided field before rejecting, so one
    /// response can carry both an email and a username error. A user
    /// re-submitting their own current email or username is not a
    /// collision; only values held by a different user are.
    pub async fn update(&self, principal: &User, patch: UserUpdate) -> Result<User, AppError> {
        let mut errors = FieldErrors::new();

        if let Some(email) = patch.email.as_deref() {
            if !is_valid_email(email) {
                errors.add("email", "should be an email");
            } else if let Some(holder) = self.db.find_user_by_email(email).await? {
                if holder.id != principal.id {
                    errors.add("email", "email already exist");
                }
            }
        }

        if let Some(username) = patch.username.as_deref() {
            if let Some(holder) = self.db.find_user_by_username(username).await? {
                if holder.id != principal.id {
                    errors.add("username", "username already exist");
                }
            }
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let mut user = principal.clone();
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(password) = patch.password {
            let hashed = hash_password(&password);
            user.password_hash = hashed.hash;
            user.password_salt = hashed.salt;
        }
        if let Some(bio) = patch.bio {
            user.bio = bio;
        }
        if let Some(image) = patch.image {
            user.image = image;
        }
        user.updated_at = Utc::now();

        // A concurrent update can claim the value between validation and
        // save; the store's unique index is the safety net. Surface that as
        // the same field error, not a 5xx.
        match self.db.update_user(&user).await {
            Ok(()) => {
                tracing::info!(user = %user.username, "profile updated");
                Ok(user)
            }
            Err(AppError::Database(error)) => match unique_violation_field(&error) {
                Some(field) => Err(AppError::Validation(FieldErrors::single(
                    field,
                    &format!("{field} already exist"),
                ))),
                None => Err(AppError::Database(error)),
            },
            Err(other) => Err(other),
        }
    }
}
