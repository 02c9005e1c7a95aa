//! CORS for the barista / manager frontend.
//!
//! 開発中は任意の origin、本番は CORS_ALLOWED_ORIGINS に列挙した origin のみ。
//! credentials は使わない (token は Authorization header で送る)。

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::Config;

fn allow_origin(config: &Config) -> AllowOrigin {
    if !config.app_env.is_production() {
        return Any.into();
    }

    // 空なら CORS header は一切付かない。"*" は list に入れられない (panic する) ので落とす
    AllowOrigin::list(
        config
            .cors_allowed_origins
            .iter()
            .filter(|origin| origin.as_str() != "*")
            .filter_map(|origin| HeaderValue::from_str(origin).ok()),
    )
}

pub fn apply(router: Router, config: &Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allow_origin(config))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    router.layer(cors)
}
