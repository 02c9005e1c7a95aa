/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - guard middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 */

use crate::services::auth::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `subject` は IdP 側のユーザー識別子 (ログ相関用)
/// - scope の判定は guard で済んでいるので permissions は持たない
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: Option<String>,
}

impl AuthCtx {
    pub fn subject_or_anonymous(&self) -> &str {
        self.subject.as_deref().unwrap_or("-")
    }
}

impl From<Claims> for AuthCtx {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn claims(sub: Option<&str>) -> Claims {
        Claims {
            sub: sub.map(str::to_string),
            iss: "https://issuer.test/".to_string(),
            aud: json!("drinks"),
            exp: u64::MAX,
            permissions: Some(json!(["post:drinks"])),
        }
    }

    #[test]
    fn keeps_only_the_subject_for_log_correlation() {
        assert_eq!(
            AuthCtx::from(claims(Some("auth0|manager"))).subject_or_anonymous(),
            "auth0|manager"
        );
        assert_eq!(AuthCtx::from(claims(None)).subject_or_anonymous(), "-");
    }
}
