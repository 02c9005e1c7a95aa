/*
 * Responsibility
 * - Path の {id} を整数の内部 ID として受け取る
 * - 整数でない / 範囲外の id は「存在しないリソース」として 404 にする
 *   (route 自体が整数 id にしかマッチしない扱い)
 */
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Clone, Copy)]
pub struct ResourceId<T> {
    pub id: i64,
    _marker: PhantomData<T>,
}

impl<T> ResourceId<T> {
    fn new(id: i64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

impl<T> FromRequestParts<AppState> for ResourceId<T>
where
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;
        let id = parse_id(&raw).ok_or(AppError::NotFound)?;
        Ok(Self::new(id))
    }
}

impl<T> std::fmt::Debug for ResourceId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceId").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::parse_id;

    #[test]
    fn only_positive_integers_are_ids() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("0"), None);
        assert_eq!(parse_id("-3"), None);
        assert_eq!(parse_id("latte"), None);
        assert_eq!(parse_id("99999999999999999999"), None);
    }
}
