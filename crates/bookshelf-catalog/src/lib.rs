//! Author and book catalog for Bookshelf.
//!
//! Typed records for the `authors` and `books` tables, explicit row
//! mapping, and the create/read/update/delete operations the HTTP layer
//! delegates to. Every function takes a borrowed [`rusqlite::Connection`];
//! callers decide where the connection comes from.
//!
//! Books belong to exactly one author. Removing an author removes its books
//! through the schema's `ON DELETE CASCADE`, so no operation here deletes
//! books on an author's behalf.

mod author;
mod book;

pub use author::{
    create_author, delete_author, get_author, list_authors, update_author, Author, AuthorParams,
};
pub use book::{
    count_books_for_author, create_book, delete_book, get_author_book, get_book,
    list_books_for_author, update_book, Book, BookParams,
};

use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("author not found: {0}")]
    AuthorNotFound(i64),
    #[error("book not found: {0}")]
    BookNotFound(i64),
}

impl CatalogError {
    /// Returns `true` for the "no row with this id" variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AuthorNotFound(_) | Self::BookNotFound(_))
    }
}
