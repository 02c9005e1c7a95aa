/// Factory: build `TokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{StaticKeyProvider, TokenVerifier, keys::KeyError};

pub fn build_token_verifier(config: &Config) -> Result<Arc<TokenVerifier>, KeyError> {
    let keys = StaticKeyProvider::from_jwks_json(&config.auth_jwks)?;
    tracing::info!(keys = keys.len(), "loaded signing keys");

    let verifier = TokenVerifier::new(
        Arc::new(keys),
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    );

    Ok(Arc::new(verifier))
}
