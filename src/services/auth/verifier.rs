use std::{fmt, sync::Arc};

use axum::http::{HeaderMap, header};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Validation, errors::ErrorKind};
use serde::Deserialize;

use crate::services::auth::{error::AuthError, keys::KeyProvider};

/// Verified access token claims.
///
/// `aud` may be a string or an array; `Validation::set_audience` does the check,
/// so it is kept as a raw value here.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    pub iss: String,
    #[serde(default)]
    pub aud: serde_json::Value,
    pub exp: u64,

    // 型の検査は guard 側 (配列でなければ invalid_claims)
    #[serde(default)]
    pub permissions: Option<serde_json::Value>,
}

impl Claims {
    /// Non-empty `permissions` array, or None when absent, empty or not an array.
    pub fn permission_list(&self) -> Option<&[serde_json::Value]> {
        match &self.permissions {
            Some(serde_json::Value::Array(items)) if !items.is_empty() => Some(items),
            _ => None,
        }
    }
}

/// Bearer token verifier.
///
/// Checks, in order, failing on the first violation:
/// 1. `Authorization: Bearer <token>` is present
/// 2. the token has three base64url segments
/// 3. the signature verifies against the key named by `kid`
/// 4. `exp` is in the future
/// 5. `iss` and `aud` match
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<dyn KeyProvider>,
    issuer: String,
    audience: String,
    leeway_seconds: u64,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(
        keys: Arc<dyn KeyProvider>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        leeway_seconds: u64,
    ) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
            leeway_seconds,
        }
    }

    /// Extract the bearer token from request headers and verify it.
    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let token = bearer_token(headers)?;
        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        ensure_well_formed(token)?;

        let header = jsonwebtoken::decode_header(token).map_err(|_| AuthError::Malformed)?;
        let kid = header.kid.as_deref().ok_or(AuthError::MissingKeyId)?;
        let key = self.keys.key(kid).ok_or(AuthError::UnknownKey)?;

        // Only the algorithm registered for this key is accepted.
        let mut validation = Validation::new(key.algorithm);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = self.leeway_seconds;
        // jsonwebtoken only rejects `exp < now - leeway`; a token is valid while `now < exp`.
        if self.leeway_seconds == 0 {
            validation.reject_tokens_expiring_in_less_than = 1;
        }

        let data = jsonwebtoken::decode::<Claims>(token, &key.decoding_key, &validation)
            .map_err(|err| classify(err.kind()))?;

        Ok(data.claims)
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::HeaderMissing)?
        .to_str()
        .map_err(|_| AuthError::Malformed)?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or(AuthError::HeaderMissing)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::NotBearer);
    }

    let token = parts.next().ok_or(AuthError::Malformed)?;
    if parts.next().is_some() {
        return Err(AuthError::Malformed);
    }

    Ok(token)
}

fn ensure_well_formed(token: &str) -> Result<(), AuthError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return Err(AuthError::Malformed);
    }

    // header + payload must be base64url; the signature is checked by jsonwebtoken
    for segment in &segments[..2] {
        URL_SAFE_NO_PAD
            .decode(segment)
            .map_err(|_| AuthError::Malformed)?;
    }

    Ok(())
}

fn classify(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidAudience
        | ErrorKind::MissingRequiredClaim(_)
        | ErrorKind::ImmatureSignature => AuthError::InvalidClaims,
        _ => AuthError::InvalidToken,
    }
}
