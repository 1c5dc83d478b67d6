use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::CatalogError;

/// A row of the `authors` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Author {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Author {
    /// The present name parts joined by a space; empty when both are null.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Column values for creating or overwriting an author.
///
/// `None` is stored as NULL; an update writes both fields unconditionally.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

const AUTHOR_COLUMNS: &str = "id, first_name, last_name";

/// Inserts a new author and returns it with its generated id.
pub fn create_author(conn: &Connection, params: &AuthorParams) -> Result<Author, CatalogError> {
    conn.execute(
        "INSERT INTO authors (first_name, last_name) VALUES (?1, ?2)",
        params![params.first_name, params.last_name],
    )?;
    let id = conn.last_insert_rowid();
    tracing::debug!(author_id = id, "created author");

    Ok(Author {
        id,
        first_name: params.first_name.clone(),
        last_name: params.last_name.clone(),
    })
}

/// Looks up a single author by id.
pub fn get_author(conn: &Connection, id: i64) -> Result<Option<Author>, CatalogError> {
    let author = conn
        .query_row(
            &format!("SELECT {AUTHOR_COLUMNS} FROM authors WHERE id = ?1"),
            [id],
            map_row_to_author,
        )
        .optional()?;
    Ok(author)
}

/// Lists every author in insertion order.
pub fn list_authors(conn: &Connection) -> Result<Vec<Author>, CatalogError> {
    let mut stmt = conn.prepare(&format!("SELECT {AUTHOR_COLUMNS} FROM authors ORDER BY id ASC"))?;

    let rows = stmt.query_map([], map_row_to_author)?;
    let mut authors = Vec::new();
    for row in rows {
        authors.push(row?);
    }
    Ok(authors)
}

/// Overwrites both name fields of an existing author.
pub fn update_author(
    conn: &Connection,
    id: i64,
    params: &AuthorParams,
) -> Result<Author, CatalogError> {
    let count = conn.execute(
        "UPDATE authors SET first_name = ?1, last_name = ?2 WHERE id = ?3",
        params![params.first_name, params.last_name, id],
    )?;
    if count == 0 {
        return Err(CatalogError::AuthorNotFound(id));
    }

    Ok(Author {
        id,
        first_name: params.first_name.clone(),
        last_name: params.last_name.clone(),
    })
}

/// Deletes an author. Its books go with it through the foreign key cascade.
pub fn delete_author(conn: &Connection, id: i64) -> Result<(), CatalogError> {
    let count = conn.execute("DELETE FROM authors WHERE id = ?1", [id])?;
    if count == 0 {
        return Err(CatalogError::AuthorNotFound(id));
    }
    tracing::debug!(author_id = id, "deleted author");
    Ok(())
}

fn map_row_to_author(row: &Row) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
    })
}
