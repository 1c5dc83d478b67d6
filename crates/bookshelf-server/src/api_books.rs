//! Book pages, nested under their author.
//!
//! A book is only reachable through the author that owns it: a valid book id
//! paired with a different author's id is treated as missing.

use crate::api::{with_conn, FormFields, FormMethod, MethodOverride, PageError, PathIds};
use crate::views::{author_context, book_context};
use crate::AppState;
use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use bookshelf_catalog::{
    create_book, delete_book, get_author, get_author_book, list_books_for_author, update_book,
    Author, Book, BookParams,
};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct BookForm {
    pub title: Option<String>,
}

impl From<BookForm> for BookParams {
    fn from(form: BookForm) -> Self {
        BookParams { title: form.title }
    }
}

fn books_path(author_id: i64) -> String {
    format!("/authors/{author_id}/books")
}

/// Loads an author and one of its books, or `NotFound` if either is missing
/// or the book belongs to someone else.
fn find_author_book(
    conn: &Connection,
    author_id: i64,
    book_id: i64,
) -> Result<(Author, Book), PageError> {
    let author = get_author(conn, author_id)?.ok_or(PageError::NotFound)?;
    let book = get_author_book(conn, author_id, book_id)?.ok_or(PageError::NotFound)?;
    Ok((author, book))
}

/// GET /authors/{author_id}/books
pub async fn list_books_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds(author_id): PathIds<i64>,
) -> Result<Html<String>, PageError> {
    let (author, books) = with_conn(&state, move |conn| {
        let author = get_author(conn, author_id)?.ok_or(PageError::NotFound)?;
        let books = list_books_for_author(conn, author_id)?;
        Ok((author, books))
    })
    .await?;

    let books: Vec<_> = books.iter().map(|b| book_context(author_id, b)).collect();
    Ok(state.views.render(
        "books/index",
        &json!({
            "author": author_context(&author),
            "books": books,
            "new_path": format!("/authors/{author_id}/books/new"),
        }),
    )?)
}

/// POST /authors/{author_id}/books
///
/// An unknown author renders the not-found page and inserts nothing.
pub async fn create_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds(author_id): PathIds<i64>,
    FormFields(form): FormFields<BookForm>,
) -> Result<Redirect, PageError> {
    let params = BookParams::from(form);
    let book = with_conn(&state, move |conn| {
        get_author(conn, author_id)?.ok_or(PageError::NotFound)?;
        Ok(create_book(conn, author_id, &params)?)
    })
    .await?;
    tracing::info!(author_id, book_id = book.id, "book created");

    Ok(Redirect::to(&books_path(author_id)))
}

/// GET /authors/{author_id}/books/new
pub async fn new_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds(author_id): PathIds<i64>,
) -> Result<Html<String>, PageError> {
    Ok(state
        .views
        .render("books/new", &json!({ "author_id": author_id }))?)
}

/// GET /authors/{author_id}/show/{book_id}
pub async fn show_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds((author_id, book_id)): PathIds<(i64, i64)>,
) -> Result<Html<String>, PageError> {
    let (author, book) =
        with_conn(&state, move |conn| find_author_book(conn, author_id, book_id)).await?;

    Ok(state.views.render(
        "books/show",
        &json!({
            "author": author_context(&author),
            "book": book_context(author_id, &book),
        }),
    )?)
}

/// GET /authors/{author_id}/edit/{book_id}
pub async fn edit_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds((author_id, book_id)): PathIds<(i64, i64)>,
) -> Result<Html<String>, PageError> {
    let (_, book) =
        with_conn(&state, move |conn| find_author_book(conn, author_id, book_id)).await?;

    Ok(state.views.render(
        "books/edit",
        &json!({ "author_id": author_id, "book": book_context(author_id, &book) }),
    )?)
}

/// PATCH /authors/{author_id}/show/{book_id}
pub async fn update_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds((author_id, book_id)): PathIds<(i64, i64)>,
    FormFields(form): FormFields<BookForm>,
) -> Result<Redirect, PageError> {
    update(&state, author_id, book_id, form).await
}

/// DELETE /authors/{author_id}/show/{book_id}
pub async fn delete_book_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds((author_id, book_id)): PathIds<(i64, i64)>,
) -> Result<Redirect, PageError> {
    delete(&state, author_id, book_id).await
}

/// POST /authors/{author_id}/show/{book_id}?_method=PATCH|DELETE
pub async fn book_form_method_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds((author_id, book_id)): PathIds<(i64, i64)>,
    Query(method): Query<MethodOverride>,
    FormFields(form): FormFields<BookForm>,
) -> Response {
    match method.requested() {
        Some(FormMethod::Patch) => update(&state, author_id, book_id, form)
            .await
            .into_response(),
        Some(FormMethod::Delete) => delete(&state, author_id, book_id).await.into_response(),
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn update(
    state: &AppState,
    author_id: i64,
    book_id: i64,
    form: BookForm,
) -> Result<Redirect, PageError> {
    let params = BookParams::from(form);
    with_conn(state, move |conn| {
        find_author_book(conn, author_id, book_id)?;
        Ok(update_book(conn, book_id, &params)?)
    })
    .await?;
    tracing::info!(author_id, book_id, "book updated");

    Ok(Redirect::to(&books_path(author_id)))
}

async fn delete(state: &AppState, author_id: i64, book_id: i64) -> Result<Redirect, PageError> {
    with_conn(state, move |conn| {
        find_author_book(conn, author_id, book_id)?;
        Ok(delete_book(conn, book_id)?)
    })
    .await?;
    tracing::info!(author_id, book_id, "book deleted");

    Ok(Redirect::to(&books_path(author_id)))
}
