//! エラーを共通のレスポンス形式で返すエクストラクター

use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

/// `axum::Json`の代わりに使う。解析エラーは`ApiError::BadRequest`になる。
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
