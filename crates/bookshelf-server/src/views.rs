//! HTML views rendered with Handlebars.
//!
//! Templates are compiled into the binary and registered once at startup.
//! Handlers pass a `serde_json` context; null names and titles render as
//! empty strings.

use axum::response::Html;
use bookshelf_catalog::{Author, Book};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// The static page served for every unmatched route or missing entity.
pub const NOT_FOUND_PAGE: &str = include_str!("../templates/not_found.html");

const LAYOUT: &str = include_str!("../templates/layout.hbs");

const TEMPLATES: &[(&str, &str)] = &[
    ("authors/index", include_str!("../templates/authors/index.hbs")),
    ("authors/show", include_str!("../templates/authors/show.hbs")),
    ("authors/new", include_str!("../templates/authors/new.hbs")),
    ("authors/edit", include_str!("../templates/authors/edit.hbs")),
    ("books/index", include_str!("../templates/books/index.hbs")),
    ("books/show", include_str!("../templates/books/show.hbs")),
    ("books/new", include_str!("../templates/books/new.hbs")),
    ("books/edit", include_str!("../templates/books/edit.hbs")),
];

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("failed to register template: {0}")]
    Template(#[from] handlebars::TemplateError),
    #[error("failed to render template: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Template registry shared by all handlers.
pub struct Views {
    registry: Handlebars<'static>,
}

impl Views {
    /// Compiles the layout partial and every page template.
    pub fn new() -> Result<Self, ViewError> {
        let mut registry = Handlebars::new();
        registry.register_partial("layout", LAYOUT)?;
        for (name, source) in TEMPLATES {
            registry.register_template_string(name, source)?;
        }
        Ok(Self { registry })
    }

    pub fn render<T: Serialize>(&self, name: &str, context: &T) -> Result<Html<String>, ViewError> {
        Ok(Html(self.registry.render(name, context)?))
    }
}

/// Context for a single author, with the derived display name.
pub fn author_context(author: &Author) -> Value {
    json!({
        "id": author.id,
        "first_name": author.first_name,
        "last_name": author.last_name,
        "full_name": author.full_name(),
    })
}

/// Context for a single book, with links resolved against `author_id`.
pub fn book_context(author_id: i64, book: &Book) -> Value {
    json!({
        "id": book.id,
        "title": book.title,
        "author_id": book.author_id,
        "show_path": format!("/authors/{author_id}/show/{}", book.id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn austen() -> Author {
        Author {
            id: 3,
            first_name: Some("Jane".to_string()),
            last_name: Some("Austen".to_string()),
        }
    }

    #[test]
    fn all_templates_compile() {
        let views = Views::new().expect("templates should compile");
        for (name, _) in TEMPLATES {
            assert!(views.registry.has_template(name), "missing {name}");
        }
    }

    #[test]
    fn author_index_lists_names_inside_layout() {
        let views = Views::new().unwrap();
        let html = views
            .render(
                "authors/index",
                &json!({ "authors": [author_context(&austen())] }),
            )
            .unwrap()
            .0;

        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains(r#"<a href="/authors/3">Jane Austen</a>"#));
    }

    #[test]
    fn null_fields_render_empty() {
        let views = Views::new().unwrap();
        let book = Book {
            id: 9,
            title: None,
            author_id: Some(3),
        };
        let html = views
            .render(
                "books/edit",
                &json!({ "author_id": 3, "book": book_context(3, &book) }),
            )
            .unwrap()
            .0;

        assert!(html.contains(r#"name="title" value="""#));
        assert!(html.contains("/authors/3/show/9?_method=PATCH"));
    }

    #[test]
    fn names_are_html_escaped() {
        let views = Views::new().unwrap();
        let author = Author {
            id: 1,
            first_name: Some("<script>".to_string()),
            last_name: None,
        };
        let html = views
            .render("authors/show", &json!({ "author": author_context(&author), "book_count": 0 }))
            .unwrap()
            .0;

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
