//! Signing-key lookup by `kid`.
//!
//! Fetching and refreshing the key set belongs to the identity provider
//! integration; the verifier only asks for a key that is already loaded.
use std::{collections::HashMap, fmt};

use jsonwebtoken::{
    Algorithm, DecodingKey,
    jwk::{AlgorithmParameters, EllipticCurve, Jwk, JwkSet, KeyAlgorithm},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid jwks json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid jwk '{kid}': {source}")]
    Jwk {
        kid: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
    #[error("jwk without 'kid'")]
    MissingKeyId,
    #[error("unsupported jwk algorithm for '{kid}': {alg}")]
    UnsupportedAlgorithm { kid: String, alg: String },
    #[error("jwks contains no keys")]
    Empty,
}

/// A public key plus the one algorithm tokens signed with it may use.
#[derive(Clone)]
pub struct VerificationKey {
    pub decoding_key: DecodingKey,
    pub algorithm: Algorithm,
}

impl VerificationKey {
    pub fn new(decoding_key: DecodingKey, algorithm: Algorithm) -> Self {
        Self {
            decoding_key,
            algorithm,
        }
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("VerificationKey")
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

pub trait KeyProvider: Send + Sync {
    // Returns None when the kid is unknown.
    fn key(&self, kid: &str) -> Option<VerificationKey>;
}

/// Key provider backed by an already-fetched key set.
#[derive(Clone, Default)]
pub struct StaticKeyProvider {
    keys: HashMap<String, VerificationKey>,
}

impl StaticKeyProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, kid: impl Into<String>, key: VerificationKey) -> Self {
        self.keys.insert(kid.into(), key);
        self
    }

    pub fn from_jwks_json(json: &str) -> Result<Self, KeyError> {
        let set: JwkSet = serde_json::from_str(json)?;
        Self::from_jwk_set(&set)
    }

    pub fn from_jwk_set(set: &JwkSet) -> Result<Self, KeyError> {
        let mut provider = Self::new();

        for jwk in &set.keys {
            let kid = jwk.common.key_id.clone().ok_or(KeyError::MissingKeyId)?;
            let algorithm = algorithm_for(&kid, jwk)?;
            let decoding_key = DecodingKey::from_jwk(jwk).map_err(|source| KeyError::Jwk {
                kid: kid.clone(),
                source,
            })?;

            provider = provider.with_key(kid, VerificationKey::new(decoding_key, algorithm));
        }

        if provider.keys.is_empty() {
            return Err(KeyError::Empty);
        }

        Ok(provider)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl fmt::Debug for StaticKeyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticKeyProvider")
            .field("kids", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeyProvider for StaticKeyProvider {
    fn key(&self, kid: &str) -> Option<VerificationKey> {
        self.keys.get(kid).cloned()
    }
}

// `alg` wins when present; otherwise infer from the key type.
#[allow(unreachable_patterns)]
fn algorithm_for(kid: &str, jwk: &Jwk) -> Result<Algorithm, KeyError> {
    let unsupported = |alg: String| KeyError::UnsupportedAlgorithm {
        kid: kid.to_string(),
        alg,
    };

    if let Some(alg) = &jwk.common.key_algorithm {
        return match alg {
            KeyAlgorithm::HS256 => Ok(Algorithm::HS256),
            KeyAlgorithm::HS384 => Ok(Algorithm::HS384),
            KeyAlgorithm::HS512 => Ok(Algorithm::HS512),
            KeyAlgorithm::RS256 => Ok(Algorithm::RS256),
            KeyAlgorithm::RS384 => Ok(Algorithm::RS384),
            KeyAlgorithm::RS512 => Ok(Algorithm::RS512),
            KeyAlgorithm::PS256 => Ok(Algorithm::PS256),
            KeyAlgorithm::PS384 => Ok(Algorithm::PS384),
            KeyAlgorithm::PS512 => Ok(Algorithm::PS512),
            KeyAlgorithm::ES256 => Ok(Algorithm::ES256),
            KeyAlgorithm::ES384 => Ok(Algorithm::ES384),
            KeyAlgorithm::EdDSA => Ok(Algorithm::EdDSA),
            other => Err(unsupported(format!("{other:?}"))),
        };
    }

    match &jwk.algorithm {
        AlgorithmParameters::RSA(_) => Ok(Algorithm::RS256),
        AlgorithmParameters::EllipticCurve(params) => match params.curve {
            EllipticCurve::P384 => Ok(Algorithm::ES384),
            EllipticCurve::P256 => Ok(Algorithm::ES256),
            ref other => Err(unsupported(format!("{other:?}"))),
        },
        AlgorithmParameters::OctetKeyPair(_) => Ok(Algorithm::EdDSA),
        AlgorithmParameters::OctetKey(_) => Ok(Algorithm::HS256),
        _ => Err(unsupported("unknown key type".to_string())),
    }
}
