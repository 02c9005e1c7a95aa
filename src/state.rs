/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - drinks: DrinkRepo (Postgres or in-memory), verifier: TokenVerifier
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 * - グローバル変数は使わず、起動時に 1 度だけ組み立てて注入する
 */
use std::sync::Arc;

use crate::{repos::DrinkRepo, services::auth::TokenVerifier};

#[derive(Clone)]
pub struct AppState {
    pub drinks: Arc<dyn DrinkRepo>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(drinks: Arc<dyn DrinkRepo>, verifier: Arc<TokenVerifier>) -> Self {
        Self { drinks, verifier }
    }
}
