use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// A row of the `books` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub title: Option<String>,
    /// Nullable at the schema level; rows written through this crate always set it.
    pub author_id: Option<i64>,
}

/// Column values for creating or overwriting a book.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookParams {
    pub title: Option<String>,
}

const BOOK_COLUMNS: &str = "id, title, author_id";

/// Inserts a book owned by `author_id`.
///
/// An unknown `author_id` is rejected by the foreign key and surfaces as
/// [`CatalogError::Database`].
pub fn create_book(
    conn: &Connection,
    author_id: i64,
    params: &BookParams,
) -> Result<Book, CatalogError> {
    conn.execute(
        "INSERT INTO books (title, author_id) VALUES (?1, ?2)",
        params![params.title, author_id],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(book_id = id, author_id, "created book");

    Ok(Book {
        id,
        title: params.title.clone(),
        author_id: Some(author_id),
    })
}

/// Looks up a single book by id, regardless of its author.
pub fn get_book(conn: &Connection, id: i64) -> Result<Option<Book>, CatalogError> {
    let book = conn
        .query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1"),
            [id],
            map_row_to_book,
        )
        .optional()?;
    Ok(book)
}

/// Looks up a book only if it belongs to `author_id`.
pub fn get_author_book(
    conn: &Connection,
    author_id: i64,
    book_id: i64,
) -> Result<Option<Book>, CatalogError> {
    let book = conn
        .query_row(
            &format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?1 AND author_id = ?2"),
            params![book_id, author_id],
            map_row_to_book,
        )
        .optional()?;
    Ok(book)
}

/// Lists the books of one author in insertion order.
pub fn list_books_for_author(conn: &Connection, author_id: i64) -> Result<Vec<Book>, CatalogError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOK_COLUMNS} FROM books WHERE author_id = ?1 ORDER BY id ASC"
    ))?;

    let rows = stmt.query_map([author_id], map_row_to_book)?;
    let mut books = Vec::new();
    for row in rows {
        books.push(row?);
    }
    Ok(books)
}

/// Counts the books of one author without loading them.
pub fn count_books_for_author(conn: &Connection, author_id: i64) -> Result<i64, CatalogError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM books WHERE author_id = ?1",
        [author_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Overwrites the title of an existing book and returns the stored row.
pub fn update_book(conn: &Connection, id: i64, params: &BookParams) -> Result<Book, CatalogError> {
    let count = conn.execute(
        "UPDATE books SET title = ?1 WHERE id = ?2",
        params![params.title, id],
    )?;
    if count == 0 {
        return Err(CatalogError::BookNotFound(id));
    }

    get_book(conn, id)?.ok_or(CatalogError::BookNotFound(id))
}

/// Deletes a single book.
pub fn delete_book(conn: &Connection, id: i64) -> Result<(), CatalogError> {
    let count = conn.execute("DELETE FROM books WHERE id = ?1", [id])?;
    if count == 0 {
        return Err(CatalogError::BookNotFound(id));
    }
    tracing::debug!(book_id = id, "deleted book");
    Ok(())
}

fn map_row_to_book(row: &Row) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author_id: row.get(2)?,
    })
}
