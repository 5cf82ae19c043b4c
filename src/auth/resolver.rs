//! Credential resolution
//!
//! Turns the `Authorization` header of an incoming request into an
//! authenticated principal, or an authorization failure. Every protected
//! operation goes through here before any business logic runs.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use super::token::AuthTokens;
use crate::data::{Database, User};
use crate::error::AppError;
use crate::AppState;

/// Why credential resolution failed
///
/// All variants surface as the same 401 externally; the distinction exists
/// for diagnostics and tests only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No Authorization header, or an empty one
    NoCredential,
    /// Header present but not `Token <value>` (case-sensitive, single space)
    MalformedCredential,
    /// Token did not verify or has expired
    InvalidToken,
    /// Token verified but its subject matches no user record
    UnknownSubject,
}

/// The authenticated identity attached to a request
#[derive(Debug, Clone)]
pub struct Principal(pub User);

/// Optional principal for endpoints that serve anonymous viewers too
#[derive(Debug, Clone)]
pub struct MaybePrincipal(pub Option<Principal>);

/// Credential scheme prefix, case-sensitive with exactly one space.
const TOKEN_SCHEME: &str = "Token ";

/// Parse the raw header value down to the bare token string.
fn parse_credential(header: Option<&str>) -> Result<&str, AuthFailure> {
    let header = header.filter(|h| !h.is_empty()).ok_or(AuthFailure::NoCredential)?;
    let token = header
        .strip_prefix(TOKEN_SCHEME)
        .ok_or(AuthFailure::MalformedCredential)?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(AuthFailure::MalformedCredential);
    }
    Ok(token)
}

/// Resolves bearer credentials against the token service and the user store
pub struct AuthResolver {
    db: Arc<Database>,
    tokens: AuthTokens,
}

impl AuthResolver {
    pub fn new(db: Arc<Database>, tokens: AuthTokens) -> Self {
        Self { db, tokens }
    }

    /// Full resolution pipeline, keeping the failure subtype.
    ///
    /// The outer error is infrastructure (store unavailable); the inner
    /// result is the authentication outcome.
    pub(crate) async fn classify(
        &self,
        header: Option<&str>,
    ) -> Result<std::result::Result<Principal, AuthFailure>, AppError> {
        let token = match parse_credential(header) {
            Ok(token) => token,
            Err(failure) => return Ok(Err(failure)),
        };

        let Some(subject) = self.tokens.extract_subject(token) else {
            return Ok(Err(AuthFailure::InvalidToken));
        };

        match self.db.find_user_by_id(&subject).await? {
            Some(user) => Ok(Ok(Principal(user))),
            None => Ok(Err(AuthFailure::UnknownSubject)),
        }
    }

    /// Resolve a principal or fail with 401.
    pub async fn resolve(&self, header: Option<&str>) -> Result<Principal, AppError> {
        match self.classify(header).await? {
            Ok(principal) => Ok(principal),
            Err(failure) => {
                tracing::debug!(?failure, "authentication failed");
                Err(AppError::Unauthorized)
            }
        }
    }

    /// Resolve a principal if a credential was supplied.
    ///
    /// A missing credential yields `None`; a malformed or invalid one still
    /// fails hard. Anonymous is a choice, a broken credential is not.
    pub async fn try_resolve(&self, header: Option<&str>) -> Result<Option<Principal>, AppError> {
        match self.classify(header).await? {
            Ok(principal) => Ok(Some(principal)),
            Err(AuthFailure::NoCredential) => Ok(None),
            Err(failure) => {
                tracing::debug!(?failure, "authentication failed");
                Err(AppError::Unauthorized)
            }
        }
    }
}

fn authorization_header(parts: &Parts) -> Result<Option<&str>, AppError> {
    match parts.headers.get(AUTHORIZATION) {
        None => Ok(None),
        // A header that is not valid UTF-8 is a malformed credential.
        Some(value) => match value.to_str() {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(AppError::Unauthorized),
        },
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Extract the authenticated principal, rejecting with 401 otherwise.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let header = authorization_header(parts)?;
        state.auth.resolve(header).await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybePrincipal
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    /// Extract an optional principal; absent credentials yield `None`.
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let header = authorization_header(parts)?;
        Ok(MaybePrincipal(state.auth.try_resolve(header).await?))
    }
}
