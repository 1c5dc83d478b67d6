//! Database layer for Bookshelf.
//!
//! Provides SQLite connection pooling (via `r2d2`), pragma initialization,
//! and the embedded SQL migrations that create the `authors` and `books`
//! tables.
//!
//! Every pooled connection runs with `foreign_keys = ON`, so the
//! `books.author_id` reference and its `ON DELETE CASCADE` are enforced by
//! the store rather than by application code.

mod migrations;
mod pool;

pub use migrations::{run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
