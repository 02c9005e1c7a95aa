/*
 * Responsibility
 * - 認証 / 認可の失敗を表す型 (AuthError)
 * - code / description / status を 1 か所で決める (handler 側で組み立てない)
 */
use axum::http::StatusCode;
use thiserror::Error;

/// Authentication and authorization failures.
///
/// The `Display` text is the client-facing description; it never contains
/// token material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,
    #[error("Authorization header must start with \"Bearer\".")]
    NotBearer,
    #[error("Authorization header must be a well-formed bearer token.")]
    Malformed,
    #[error("Authorization malformed.")]
    MissingKeyId,
    #[error("Unable to find the appropriate key.")]
    UnknownKey,
    #[error("Unable to parse authentication token.")]
    InvalidToken,
    #[error("Token expired.")]
    TokenExpired,
    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,
    #[error("Permissions not included in JWT.")]
    PermissionsMissing,
    #[error("Permission not found.")]
    PermissionDenied,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::HeaderMissing | Self::NotBearer => "authorization_header_missing",
            Self::Malformed | Self::MissingKeyId | Self::UnknownKey | Self::InvalidToken => {
                "invalid_header"
            }
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims | Self::PermissionsMissing => "invalid_claims",
            Self::PermissionDenied => "unauthorized",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::PermissionsMissing => StatusCode::BAD_REQUEST,
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_non_bearer_header_share_a_code() {
        assert_eq!(AuthError::HeaderMissing.code(), "authorization_header_missing");
        assert_eq!(AuthError::NotBearer.code(), "authorization_header_missing");
        assert_eq!(AuthError::NotBearer.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn permission_failures_use_400_and_403() {
        assert_eq!(AuthError::PermissionsMissing.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::PermissionsMissing.code(), "invalid_claims");
        assert_eq!(AuthError::PermissionDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(AuthError::PermissionDenied.code(), "unauthorized");
    }

    #[test]
    fn claim_failures_are_401() {
        assert_eq!(AuthError::InvalidClaims.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::TokenExpired.code(), "token_expired");
        assert_eq!(AuthError::UnknownKey.code(), "invalid_header");
    }
}
