/*
 * Responsibility
 * - URL 構造を定義 (/health, /drinks, /drinks-detail, /drinks/{drink_id})
 * - scope が必要な handler だけ requires_auth で包む (GET /drinks は認証なし)
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::error::AppError;
use crate::middleware::auth::requires_auth;
use crate::services::auth::scope;
use crate::state::AppState;

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
    health::health,
};

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route(
            "/drinks",
            get(list_drinks).merge(requires_auth(scope::POST_DRINKS, state, post(create_drink))),
        )
        .route(
            "/drinks-detail",
            requires_auth(scope::GET_DRINKS_DETAIL, state, get(list_drinks_detail)),
        )
        .route(
            "/drinks/{drink_id}",
            requires_auth(scope::PATCH_DRINKS, state, patch(update_drink)).merge(requires_auth(
                scope::DELETE_DRINKS,
                state,
                delete(delete_drink),
            )),
        )
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
