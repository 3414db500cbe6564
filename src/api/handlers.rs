use crate::application::{self, ServiceDependencies};
use crate::domain::BookId;
use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;
use std::sync::Arc;

use super::{
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
    types::*,
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Catalog handlers
// ============================================================================

/// POST /api/books - 書籍を登録
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<(StatusCode, Json<BookMutationResponse>), ApiError> {
    let book = application::add_book(&state.service_deps, req.to_add_command()).await?;

    let response = BookMutationResponse {
        success: true,
        message: format!("Book '{}' added successfully", book.title),
        book,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /api/books/:id - 書誌情報を更新
pub async fn update_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<i64>,
    ApiJson(req): ApiJson<BookRequest>,
) -> Result<Json<BookMutationResponse>, ApiError> {
    let cmd = req.to_update_command(BookId::new(book_id));
    let book = application::update_book(&state.service_deps, cmd).await?;

    Ok(Json(BookMutationResponse {
        success: true,
        message: format!("Book {} updated successfully", book.id),
        book,
    }))
}

/// DELETE /api/books/:id - 書籍を削除
///
/// 貸出中の書籍は削除できない。
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    ApiPath(book_id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let book_id = BookId::new(book_id);
    application::delete_book(&state.service_deps, book_id).await?;

    Ok(Json(MessageResponse::ok(format!(
        "Book {} deleted successfully",
        book_id
    ))))
}

/// GET /api/books - 全書籍
pub async fn list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BooksResponse>, ApiError> {
    let books = application::list_books(&state.service_deps).await?;

    Ok(Json(BooksResponse {
        success: true,
        books,
    }))
}

/// GET /api/books/search?keyword= - タイトル・著者で検索
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<BooksResponse>, ApiError> {
    let keyword = query.keyword.unwrap_or_default();
    let books = application::search_books(&state.service_deps, &keyword).await?;

    Ok(Json(BooksResponse {
        success: true,
        books,
    }))
}

/// GET /api/books/author/:author - 著者名で検索
pub async fn books_by_author(
    State(state): State<Arc<AppState>>,
    ApiPath(author): ApiPath<String>,
) -> Result<Json<BooksResponse>, ApiError> {
    let books = application::books_by_author(&state.service_deps, &author).await?;

    Ok(Json(BooksResponse {
        success: true,
        books,
    }))
}

// ============================================================================
// User handlers
// ============================================================================

/// POST /api/register - 利用者を登録
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let user = application::register_user(&state.service_deps, req.to_command(Utc::now())).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::ok(format!(
            "User '{}' registered successfully",
            user.name
        ))),
    ))
}

// ============================================================================
// Circulation handlers
// ============================================================================

/// POST /api/borrow - 書籍を貸し出す
///
/// 強制されるビジネスルール:
/// - 利用者が登録済みであること
/// - 書籍が存在し、貸出中でないこと
pub async fn borrow_book(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CirculationRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let cmd = req.to_borrow_command(Utc::now().date_naive());
    let record = application::borrow_book(&state.service_deps, cmd).await?;

    Ok(Json(MessageResponse::ok(format!(
        "'{}' borrowed '{}'",
        record.user_name, record.book_title
    ))))
}

/// POST /api/return - 書籍を返却
///
/// 強制されるビジネスルール:
/// - 未返却の貸出記録があること
/// - 借りた本人による返却であること
pub async fn return_book(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CirculationRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let cmd = req.to_return_command(Utc::now().date_naive());
    let record = application::return_book(&state.service_deps, cmd).await?;

    Ok(Json(MessageResponse::ok(format!(
        "'{}' returned '{}'",
        record.user_name, record.book_title
    ))))
}

/// GET /api/borrowed - 貸出記録（返却済みを含む）
pub async fn list_borrowed(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BorrowedBooksResponse>, ApiError> {
    let borrowed_books = application::list_borrow_records(&state.service_deps).await?;

    Ok(Json(BorrowedBooksResponse {
        success: true,
        borrowed_books,
    }))
}

// ============================================================================
// Statistics handlers
// ============================================================================

/// GET /api/statistics/book-status
pub async fn book_status(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatisticsResponse>, ApiError> {
    let statistics = application::book_status(&state.service_deps).await?;

    Ok(Json(StatisticsResponse {
        success: true,
        statistics,
    }))
}

/// GET /api/statistics/author-distribution
pub async fn author_distribution(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DistributionResponse>, ApiError> {
    let distribution = application::author_distribution(&state.service_deps).await?;

    Ok(Json(DistributionResponse {
        success: true,
        distribution,
    }))
}

/// GET /api/statistics/borrow-trend?days= - 日別の貸出推移
pub async fn borrow_trend(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<TrendQuery>,
) -> Result<Json<TrendResponse>, ApiError> {
    let today = Utc::now().date_naive();
    let trend = application::borrow_trend(&state.service_deps, query.days, today).await?;

    Ok(Json(TrendResponse {
        success: true,
        trend,
    }))
}

// ============================================================================
// Misc
// ============================================================================

/// GET /api/health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 未定義のエンドポイント
pub async fn not_found() -> ApiError {
    ApiError::NotFound("API endpoint not found".to_string())
}

/// 定義済みのパスに対する未対応のメソッド
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method not allowed for this endpoint".to_string())
}
