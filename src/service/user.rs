//! User account service
//!
//! Registration and login. Both return the user together with a freshly
//! issued access token; validation uses the same accumulated field-error
//! contract as profile updates.

use std::sync::Arc;

use chrono::Utc;

use crate::auth::{hash_password, verify_password, AuthTokens};
use crate::data::{unique_violation_field, Database, EntityId, User};
use crate::error::{AppError, FieldErrors};

use super::is_valid_email;

/// Registration request fields
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration and login against the user store
pub struct UserService {
    db: Arc<Database>,
    tokens: AuthTokens,
    default_image: String,
}

impl UserService {
    pub fn new(db: Arc<Database>, tokens: AuthTokens, default_image: String) -> Self {
        Self {
            db,
            tokens,
            default_image,
        }
    }

    /// Register a new account.
    ///
    /// Returns the created user and an access token for it.
    pub async fn register(&self, request: Registration) -> Result<(User, String), AppError> {
        let mut errors = FieldErrors::new();

        if request.username.is_empty() {
            errors.add("username", "can't be empty");
        } else if self
            .db
            .find_user_by_username(&request.username)
            .await?
            .is_some()
        {
            errors.add("username", "username already exist");
        }

        if request.email.is_empty() {
            errors.add("email", "can't be empty");
        } else if !is_valid_email(&request.email) {
            errors.add("email", "should be an email");
        } else if self.db.find_user_by_email(&request.email).await?.is_some() {
            errors.add("email", "email already exist");
        }

        if request.password.is_empty() {
            errors.add("password", "can't be empty");
        }

        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let hashed = hash_password(&request.password);
        let user = User {
            id: EntityId::new().0,
            username: request.username,
            email: request.email,
            password_hash: hashed.hash,
            password_salt: hashed.salt,
            bio: String::new(),
            image: self.default_image.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        // Two concurrent registrations can pass the read-side checks; the
        // unique index decides, and the loser gets the same field error.
        match self.db.insert_user(&user).await {
            Ok(()) => {}
            Err(AppError::Database(error)) => {
                return match unique_violation_field(&error) {
                    Some(field) => Err(AppError::Validation(FieldErrors::single(
                        field,
                        &format!("{field} already exist"),
                    ))),
                    None => Err(AppError::Database(error)),
                };
            }
            Err(other) => return Err(other),
        }

        tracing::info!(user = %user.username, "account registered");
        let token = self.tokens.issue(&user.id)?;
        Ok((user, token))
    }

    /// Authenticate by email and password.
    ///
    /// A wrong email and a wrong password are indistinguishable to the
    /// caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let invalid =
            || AppError::Validation(FieldErrors::single("email or password", "is invalid"));

        let user = self
            .db
            .find_user_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_salt, &user.password_hash) {
            return Err(invalid());
        }

        let token = self.tokens.issue(&user.id)?;
        Ok((user, token))
    }

    /// Issue a fresh token for an already-authenticated user.
    pub fn issue_token(&self, user: &User) -> Result<String, AppError> {
        self.tokens.issue(&user.id)
    }
}
