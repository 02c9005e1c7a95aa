#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use drinks_api::{
    app::build_router,
    config::{AppEnv, Config},
    repos::MemoryDrinkRepo,
    services::auth::{StaticKeyProvider, TokenVerifier, VerificationKey},
    state::AppState,
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use serde_json::{Value, json};
use tower::ServiceExt;

pub const SECRET: &[u8] = b"integration-secret-integration-secret";
pub const KID: &str = "test-key";
pub const ISSUER: &str = "https://coffee.test/";
pub const AUDIENCE: &str = "drinks";

pub const BARISTA: &[&str] = &["get:drinks-detail"];
pub const MANAGER: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<MemoryDrinkRepo>,
}

pub fn config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: None,
        db_reset_on_start: false,
        app_env: AppEnv::Development,
        cors_allowed_origins: Vec::new(),
        auth_issuer: ISSUER.to_string(),
        auth_audience: AUDIENCE.to_string(),
        access_token_leeway_seconds: 0,
        auth_jwks: String::new(),
    }
}

pub fn app() -> TestApp {
    let repo = Arc::new(MemoryDrinkRepo::new());
    let keys = StaticKeyProvider::new().with_key(
        KID,
        VerificationKey::new(DecodingKey::from_secret(SECRET), Algorithm::HS256),
    );
    let verifier = Arc::new(TokenVerifier::new(Arc::new(keys), ISSUER, AUDIENCE, 0));
    let state = AppState::new(repo.clone(), verifier);

    TestApp {
        router: build_router(state, &config()),
        repo,
    }
}

pub fn token_with(claims: Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = Some(KID.to_string());
    jsonwebtoken::encode(&header, &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

pub fn token(permissions: &[&str]) -> String {
    token_with(json!({
        "sub": "auth0|tester",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "exp": chrono::Utc::now().timestamp() + 3600,
        "permissions": permissions,
    }))
}

pub fn expired_token(permissions: &[&str]) -> String {
    token_with(json!({
        "sub": "auth0|tester",
        "iss": ISSUER,
        "aud": AUDIENCE,
        "exp": chrono::Utc::now().timestamp() - 3600,
        "permissions": permissions,
    }))
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<String>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<String>,
        raw_body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }

        let response = self
            .router
            .clone()
            .oneshot(builder.body(Body::from(raw_body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

pub fn bearer(token: String) -> Option<String> {
    Some(format!("Bearer {token}"))
}

pub fn latte() -> Value {
    json!({
        "title": "Latte",
        "recipe": [{"name": "Milk", "color": "white", "parts": 1}],
    })
}
