pub mod error;
pub mod factory;
pub mod keys;
pub mod verifier;

pub use error::AuthError;
pub use factory::build_token_verifier;
pub use keys::{KeyProvider, StaticKeyProvider, VerificationKey};
pub use verifier::{Claims, TokenVerifier};

/// Permission scopes granted by the identity provider.
pub mod scope {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";
}
