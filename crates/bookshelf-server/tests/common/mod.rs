#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use bookshelf_db::{create_pool, run_migrations, DbPool, DbRuntimeSettings};
use bookshelf_server::{app, views::Views, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    // Keeps the database file alive for the duration of the test.
    _dir: TempDir,
}

pub fn setup_app() -> TestApp {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("bookshelf.db");
    let pool = create_pool(path.to_str().unwrap(), DbRuntimeSettings::default()).unwrap();
    {
        let conn = pool.get().unwrap();
        run_migrations(&conn).unwrap();
    }

    let state = AppState {
        pool: pool.clone(),
        views: Views::new().unwrap(),
    };

    TestApp {
        router: app(state),
        pool,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn form(&self, method: &str, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Sends `method` with an empty body and no content type.
    pub async fn bare(&self, method: &str, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn delete(&self, uri: &str) -> Response<Body> {
        self.bare("DELETE", uri).await
    }

    pub fn seed_author(&self, first: &str, last: &str) -> i64 {
        let conn = self.pool.get().unwrap();
        conn.execute(
            "INSERT INTO authors (first_name, last_name) VALUES (?1, ?2)",
            [first, last],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub fn seed_book(&self, author_id: i64, title: &str) -> i64 {
        let conn = self.pool.get().unwrap();
        conn.execute(
            "INSERT INTO books (title, author_id) VALUES (?1, ?2)",
            rusqlite::params![title, author_id],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub fn count(&self, sql: &str) -> i64 {
        let conn = self.pool.get().unwrap();
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn assert_redirect(response: &Response<Body>, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        location
    );
}

pub async fn assert_not_found(response: Response<Body>) {
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_text(response).await;
    assert!(body.contains("does not exist"), "unexpected body: {body}");
}
