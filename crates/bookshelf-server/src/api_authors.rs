//! Author pages: list, create, show, update, delete and the two forms.

use crate::api::{with_conn, FormFields, FormMethod, MethodOverride, PageError, PathIds};
use crate::views::author_context;
use crate::AppState;
use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use bookshelf_catalog::{
    count_books_for_author, create_author, delete_author, get_author, list_authors, update_author,
    AuthorParams,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Form fields submitted by the new/edit author pages. Absent fields are stored as NULL.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<AuthorForm> for AuthorParams {
    fn from(form: AuthorForm) -> Self {
        AuthorParams {
            first_name: form.first_name,
            last_name: form.last_name,
        }
    }
}

/// GET /authors
pub async fn list_authors_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, PageError> {
    let authors = with_conn(&state, |conn| Ok(list_authors(conn)?)).await?;
    let authors: Vec<_> = authors.iter().map(author_context).collect();

    Ok(state
        .views
        .render("authors/index", &json!({ "authors": authors }))?)
}

/// POST /authors
pub async fn create_author_handler(
    Extension(state): Extension<Arc<AppState>>,
    FormFields(form): FormFields<AuthorForm>,
) -> Result<Redirect, PageError> {
    let params = AuthorParams::from(form);
    let author = with_conn(&state, move |conn| Ok(create_author(conn, &params)?)).await?;
    tracing::info!(author_id = author.id, "author created");

    Ok(Redirect::to("/authors"))
}

/// GET /authors/new
pub async fn new_author_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Html<String>, PageError> {
    Ok(state.views.render("authors/new", &json!({}))?)
}

/// GET /authors/{id}
pub async fn show_author_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds(id): PathIds<i64>,
) -> Result<Html<String>, PageError> {
    let (author, book_count) = with_conn(&state, move |conn| {
        let author = get_author(conn, id)?.ok_or(PageError::NotFound)?;
        let book_count = count_books_for_author(conn, id)?;
        Ok((author, book_count))
    })
    .await?;

    Ok(state.views.render(
        "authors/show",
        &json!({ "author": author_context(&author), "book_count": book_count }),
    )?)
}

/// GET /authors/{id}/edit
pub async fn edit_author_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds(id): PathIds<i64>,
) -> Result<Html<String>, PageError> {
    let author = with_conn(&state, move |conn| {
        get_author(conn, id)?.ok_or(PageError::NotFound)
    })
    .await?;

    Ok(state
        .views
        .render("authors/edit", &json!({ "author": author_context(&author) }))?)
}

/// PATCH /authors/{id}
///
/// Overwrites both name fields, then returns to the author list.
pub async fn update_author_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds(id): PathIds<i64>,
    FormFields(form): FormFields<AuthorForm>,
) -> Result<Redirect, PageError> {
    update(&state, id, form).await
}

/// DELETE /authors/{id}
///
/// The author's books are removed with it.
pub async fn delete_author_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds(id): PathIds<i64>,
) -> Result<Redirect, PageError> {
    delete(&state, id).await
}

/// POST /authors/{id}?_method=PATCH|DELETE
pub async fn author_form_method_handler(
    Extension(state): Extension<Arc<AppState>>,
    PathIds(id): PathIds<i64>,
    Query(method): Query<MethodOverride>,
    FormFields(form): FormFields<AuthorForm>,
) -> Response {
    match method.requested() {
        Some(FormMethod::Patch) => update(&state, id, form).await.into_response(),
        Some(FormMethod::Delete) => delete(&state, id).await.into_response(),
        None => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn update(state: &AppState, id: i64, form: AuthorForm) -> Result<Redirect, PageError> {
    let params = AuthorParams::from(form);
    with_conn(state, move |conn| Ok(update_author(conn, id, &params)?)).await?;
    tracing::info!(author_id = id, "author updated");

    Ok(Redirect::to("/authors"))
}

async fn delete(state: &AppState, id: i64) -> Result<Redirect, PageError> {
    with_conn(state, move |conn| Ok(delete_author(conn, id)?)).await?;
    tracing::info!(author_id = id, "author deleted");

    Ok(Redirect::to("/authors"))
}
