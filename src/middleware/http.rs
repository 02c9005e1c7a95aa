//! Transport middleware shared by every route.
//!
//! - `x-request-id` を付与して response にも返す (ログ相関用)
//! - TraceLayer で access log
//! - body 上限は `DefaultBodyLimit` に任せ、超過は `Json` extractor の rejection
//!   として handler 側で `AppError` (JSON) に変換する

use axum::{Router, extract::DefaultBodyLimit, http::HeaderName};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

// A drink is a title plus a handful of ingredients.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

pub fn apply(router: Router) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    router.layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES)).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
            .layer(PropagateRequestIdLayer::new(request_id))
            .layer(TraceLayer::new_for_http()),
    )
}
