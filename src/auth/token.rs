//! Access tokens
//!
//! HMAC-signed bearer tokens. No server-side token storage needed;
//! the signature plus an expiry claim is the whole credential.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Claims carried inside an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the user id the token was issued for
    pub sub: String,
    /// Expiry timestamp
    pub exp: DateTime<Utc>,
}

impl TokenClaims {
    fn is_expired(&self) -> bool {
        self.exp < Utc::now()
    }
}

/// Token service: issues and verifies signed access tokens
///
/// Token format: `base64(claims).base64(hmac_sha256(claims))`.
#[derive(Clone)]
pub struct AuthTokens {
    secret: String,
    ttl: Duration,
}

impl AuthTokens {
    pub fn new(secret: impl Into<String>, ttl_seconds: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::seconds(ttl_seconds),
        }
    }

    /// Issue a signed token for a user id
    pub fn issue(&self, user_id: &str) -> Result<String, AppError> {
        use base64::{engine::general_purpose, Engine as _};
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        let claims = TokenClaims {
            sub: user_id.to_string(),
            exp: Utc::now() + self.ttl,
        };

        let payload = serde_json::to_string(&claims).map_err(|e| AppError::Internal(e.into()))?;
        let payload_b64 = general_purpose::URL_SAFE_NO_PAD.encode(payload.as_bytes());

        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid HMAC key: {e}")))?;
        mac.update(payload_b64.as_bytes());
        let signature = mac.finalize().into_bytes();
        let signature_b64 = general_purpose::URL_SAFE_NO_PAD.encode(signature);

        Ok(format!("{}.{}", payload_b64, signature_b64))
    }

    /// Extract the subject id from a token
    ///
    /// Returns `None` for anything that does not verify: wrong shape, bad
    /// signature, undecodable claims, or an expired token. Callers never
    /// learn which; an unverifiable token has no further structure.
    pub fn extract_subject(&self, token: &str) -> Option<String> {
        use base64::{engine::general_purpose, Engine as _};
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        let (payload_b64, signature_b64) = token.split_once('.')?;
        if signature_b64.contains('.') {
            return None;
        }

        type HmacSha256 = Hmac<Sha256>;
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes()).ok()?;
        mac.update(payload_b64.as_bytes());

        let expected_signature = general_purpose::URL_SAFE_NO_PAD.decode(signature_b64).ok()?;
        mac.verify_slice(&expected_signature).ok()?;

        let payload_bytes = general_purpose::URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
        let claims: TokenClaims = serde_json::from_slice(&payload_bytes).ok()?;

        if claims.is_expired() {
            return None;
        }

        Some(claims.sub)
    }
}
