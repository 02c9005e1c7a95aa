//! Permission guard: bearer token 検証 + scope チェック → AuthCtx を extensions に入れる
//!
//! handler ごとに必要な scope が違うので、Router 全体ではなく MethodRouter 単位で掛ける。
//!
//! ```ignore
//! .route("/drinks-detail", requires_auth(scope::GET_DRINKS_DETAIL, &state, get(list_drinks_detail)))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AuthError, Claims, TokenVerifier};
use crate::state::AppState;

#[derive(Clone)]
struct Guard {
    scope: &'static str,
    verifier: Arc<TokenVerifier>,
}

/// Wrap `handler` so it only runs for tokens granting `scope`.
///
/// Failures short-circuit before the handler (and so before any store access).
pub fn requires_auth(
    scope: &'static str,
    state: &AppState,
    handler: MethodRouter<AppState>,
) -> MethodRouter<AppState> {
    let guard = Guard {
        scope,
        verifier: state.verifier.clone(),
    };

    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    handler.route_layer(middleware::from_fn_with_state(guard, guard_middleware))
}

/// An absent, empty or non-array `permissions` claim is `invalid_claims` (400).
pub fn check_permission(scope: &str, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims.permission_list().ok_or(AuthError::PermissionsMissing)?;

    if !permissions.iter().any(|p| p.as_str() == Some(scope)) {
        return Err(AuthError::PermissionDenied);
    }

    Ok(())
}

async fn guard_middleware(
    State(guard): State<Guard>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let claims = guard.verifier.verify_headers(req.headers()).map_err(|err| {
        tracing::warn!(code = err.code(), error = %err, "access token verification failed");
        err
    })?;

    if let Err(err) = check_permission(guard.scope, &claims) {
        tracing::warn!(
            code = err.code(),
            scope = guard.scope,
            sub = claims.sub.as_deref().unwrap_or("-"),
            "permission check failed"
        );
        return Err(err.into());
    }

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from(claims));

    Ok(next.run(req).await)
}
