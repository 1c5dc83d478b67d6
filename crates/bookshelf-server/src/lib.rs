//! Bookshelf server library logic.
//!
//! Routes map an HTTP verb and path to a catalog operation, then either
//! redirect (after a mutation) or render a page (for reads).

pub mod api;
pub mod api_authors;
pub mod api_books;
pub mod config;
pub mod views;

use api::PageError;
use axum::{
    response::{IntoResponse, Redirect},
    routing::get,
    Extension, Json, Router,
};
use bookshelf_db::DbPool;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use views::Views;

/// Application state shared across all request handlers.
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Compiled page templates.
    pub views: Views,
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /
async fn root_handler() -> Redirect {
    Redirect::to("/authors")
}

/// Fallback for every unmatched path.
async fn not_found_handler() -> impl IntoResponse {
    PageError::NotFound
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health))
        .route(
            "/authors",
            get(api_authors::list_authors_handler).post(api_authors::create_author_handler),
        )
        .route("/authors/new", get(api_authors::new_author_handler))
        .route(
            "/authors/{author_id}",
            get(api_authors::show_author_handler)
                .patch(api_authors::update_author_handler)
                .delete(api_authors::delete_author_handler)
                .post(api_authors::author_form_method_handler),
        )
        .route(
            "/authors/{author_id}/edit",
            get(api_authors::edit_author_handler),
        )
        .route(
            "/authors/{author_id}/books",
            get(api_books::list_books_handler).post(api_books::create_book_handler),
        )
        .route(
            "/authors/{author_id}/books/new",
            get(api_books::new_book_handler),
        )
        .route(
            "/authors/{author_id}/show/{book_id}",
            get(api_books::show_book_handler)
                .patch(api_books::update_book_handler)
                .delete(api_books::delete_book_handler)
                .post(api_books::book_form_method_handler),
        )
        .route(
            "/authors/{author_id}/edit/{book_id}",
            get(api_books::edit_book_handler),
        )
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(Arc::new(state)))
}
