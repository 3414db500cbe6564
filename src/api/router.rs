use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::*;

/// Creates the API router with all circulation endpoints
///
/// Catalog:
/// - GET /api/books, POST /api/books
/// - PUT /api/books/:id, DELETE /api/books/:id
/// - GET /api/books/search?keyword=
/// - GET /api/books/author/:author
///
/// Users and circulation:
/// - POST /api/register
/// - POST /api/borrow, POST /api/return
/// - GET /api/borrowed
///
/// Statistics:
/// - GET /api/statistics/book-status
/// - GET /api/statistics/author-distribution
/// - GET /api/statistics/borrow-trend?days=
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        // Catalog
        .route("/books", get(list_books).post(add_book))
        .route("/books/search", get(search_books))
        .route("/books/author/:author", get(books_by_author))
        .route("/books/:id", put(update_book).delete(delete_book))
        // Users and circulation
        .route("/register", post(register_user))
        .route("/borrow", post(borrow_book))
        .route("/return", post(return_book))
        .route("/borrowed", get(list_borrowed))
        // Statistics
        .route("/statistics/book-status", get(book_status))
        .route("/statistics/author-distribution", get(author_distribution))
        .route("/statistics/borrow-trend", get(borrow_trend))
        .method_not_allowed_fallback(method_not_allowed);

    // The browser client is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
