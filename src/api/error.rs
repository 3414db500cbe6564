use crate::application::{ErrorKind, LibraryApplicationError};
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーとリクエストの解析エラーをまとめ、
/// HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Application(LibraryApplicationError),
    /// JSON・パス・クエリの解析に失敗
    BadRequest(String),
    /// 未定義のエンドポイント
    NotFound(String),
    /// パスは存在するがメソッドが異なる
    MethodNotAllowed(String),
}

impl From<LibraryApplicationError> for ApiError {
    fn from(err: LibraryApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(format!("Invalid query parameter: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::MethodNotAllowed(msg) => (StatusCode::METHOD_NOT_ALLOWED, msg),
            ApiError::Application(err) => match err.kind() {
                // 400 Bad Request - 入力値の不備
                ErrorKind::Validation => (StatusCode::BAD_REQUEST, err.to_string()),
                // 404 Not Found - 参照先が存在しない
                ErrorKind::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
                // 409 Conflict - 現在の状態と衝突
                ErrorKind::Conflict => (StatusCode::CONFLICT, err.to_string()),
                // 500 Internal Server Error - システム障害
                // 詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                ErrorKind::Internal => {
                    tracing::error!("Internal error: {:?}", err);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
