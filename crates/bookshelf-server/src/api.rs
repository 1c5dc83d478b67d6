//! Shared plumbing for the page handlers.

use crate::views::{ViewError, NOT_FOUND_PAGE};
use crate::AppState;
use axum::{
    extract::{Form, FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{Html, IntoResponse, Response},
};
use bookshelf_catalog::CatalogError;
use rusqlite::Connection;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};
use std::convert::Infallible;
use thiserror::Error;

/// Page error type mapping to HTTP status codes.
///
/// Every missing entity renders the same not-found page as an unmatched
/// route.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("not found")]
    NotFound,
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => (StatusCode::NOT_FOUND, Html(NOT_FOUND_PAGE)).into_response(),
            PageError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

impl From<CatalogError> for PageError {
    fn from(e: CatalogError) -> Self {
        if e.is_not_found() {
            PageError::NotFound
        } else {
            PageError::InternalServerError(e.to_string())
        }
    }
}

impl From<ViewError> for PageError {
    fn from(e: ViewError) -> Self {
        PageError::InternalServerError(e.to_string())
    }
}

/// Integer path segments.
///
/// A segment that does not coerce to the target type is treated like an
/// unmatched route.
pub struct PathIds<T>(pub T);

impl<S, T> FromRequestParts<S> for PathIds<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(ids)) => Ok(PathIds(ids)),
            Err(rejection) => {
                tracing::debug!(%rejection, uri = %parts.uri, "path segment is not an id");
                Err(PageError::NotFound)
            }
        }
    }
}

/// Submitted form fields, read the way HTML forms are read: never rejected.
///
/// A body that is missing, not `application/x-www-form-urlencoded`, or not
/// decodable yields `T::default()`, so every field is stored as NULL. A field
/// repeated in the body keeps its first value.
pub struct FormFields<T>(pub T);

impl<S, T> FromRequest<S> for FormFields<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let pairs = match Form::<Vec<(String, String)>>::from_request(req, state).await {
            Ok(Form(pairs)) => pairs,
            Err(rejection) => {
                tracing::debug!(%rejection, "unreadable form body, storing nulls");
                return Ok(FormFields(T::default()));
            }
        };

        Ok(FormFields(fields_from_pairs(pairs)))
    }
}

fn fields_from_pairs<T: DeserializeOwned + Default>(pairs: Vec<(String, String)>) -> T {
    let mut fields = Map::new();
    for (key, value) in pairs {
        fields.entry(key).or_insert(Value::String(value));
    }

    serde_json::from_value(Value::Object(fields)).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "form fields do not fit, storing nulls");
        T::default()
    })
}

/// Override requested by an HTML form through `?_method=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMethod {
    Patch,
    Delete,
}

#[derive(Debug, Default, Deserialize)]
pub struct MethodOverride {
    #[serde(rename = "_method")]
    pub method: Option<String>,
}

impl MethodOverride {
    pub fn requested(&self) -> Option<FormMethod> {
        let method = self.method.as_deref()?;
        if method.eq_ignore_ascii_case("PATCH") {
            Some(FormMethod::Patch)
        } else if method.eq_ignore_ascii_case("DELETE") {
            Some(FormMethod::Delete)
        } else {
            None
        }
    }
}

/// Runs `f` on a pooled connection off the async runtime.
pub async fn with_conn<T, F>(state: &AppState, f: F) -> Result<T, PageError>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, PageError> + Send + 'static,
{
    let pool = state.pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool
            .get()
            .map_err(|e| PageError::InternalServerError(format!("db connection failed: {}", e)))?;
        f(&conn)
    })
    .await
    .map_err(|e| PageError::InternalServerError(format!("task join error: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn override_of(method: &str) -> MethodOverride {
        MethodOverride {
            method: Some(method.to_string()),
        }
    }

    #[test]
    fn method_override_is_case_insensitive() {
        assert_eq!(override_of("PATCH").requested(), Some(FormMethod::Patch));
        assert_eq!(override_of("patch").requested(), Some(FormMethod::Patch));
        assert_eq!(override_of("Delete").requested(), Some(FormMethod::Delete));
    }

    #[test]
    fn unknown_or_missing_override_is_ignored() {
        assert_eq!(override_of("PUT").requested(), None);
        assert_eq!(MethodOverride::default().requested(), None);
    }

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct NameFields {
        first_name: Option<String>,
        last_name: Option<String>,
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn repeated_form_field_keeps_first_value() {
        let fields: NameFields =
            fields_from_pairs(pairs(&[("first_name", "A"), ("first_name", "B")]));
        assert_eq!(fields.first_name.as_deref(), Some("A"));
        assert_eq!(fields.last_name, None);
    }

    #[test]
    fn unknown_form_fields_are_ignored() {
        let fields: NameFields =
            fields_from_pairs(pairs(&[("last_name", "Austen"), ("_method", "PATCH")]));
        assert_eq!(
            fields,
            NameFields {
                first_name: None,
                last_name: Some("Austen".to_string()),
            }
        );
    }

    #[test]
    fn catalog_not_found_maps_to_not_found_page() {
        let err: PageError = CatalogError::AuthorNotFound(1).into();
        assert!(matches!(err, PageError::NotFound));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn database_errors_map_to_server_error() {
        let err: PageError = CatalogError::Database(rusqlite::Error::InvalidQuery).into();
        assert!(matches!(err, PageError::InternalServerError(_)));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
