/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - RepoError / validation error / AuthError をここ 1 か所で status に変換する
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::AuthError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: u16,
    pub message: &'static str,
}

// AuthError はそのまま {code, description} で返す
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub code: &'static str,
    pub description: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("resource not found")]
    NotFound,
    #[error("unprocessable: {reason}")]
    Unprocessable { reason: String },
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn unprocessable(reason: impl Into<String>) -> Self {
        Self::Unprocessable {
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(err) => err.status(),
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            AppError::Auth(err) => {
                let body = AuthErrorResponse {
                    code: err.code(),
                    description: err.to_string(),
                };
                return (status, Json(body)).into_response();
            }
            AppError::NotFound => "resource not found",
            AppError::Unprocessable { reason } => {
                // reason はログのみ。クライアントには固定文言
                tracing::debug!(%reason, "unprocessable request");
                "unprocessable"
            }
            AppError::MethodNotAllowed => "method not allowed",
            AppError::PayloadTooLarge => "request body too large",
            AppError::Internal => "internal server error",
        };

        let body = ErrorResponse {
            error: status.as_u16(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Constraint(reason) => AppError::unprocessable(reason),
            RepoError::Db(_) | RepoError::CorruptRecipe { .. } | RepoError::Encode(_) => {
                tracing::error!(error = ?e, "repository failure");
                AppError::Internal
            }
        }
    }
}
